//! Document-level persistence on top of the key/value [`Store`]:
//! save/load, the first-run flag, and export.

use super::{Store, StorageError, CONTENT_KEY, WELCOME_KEY};

/// Filename used when exporting the document.
pub const EXPORT_FILENAME: &str = "document.md";

/// MIME type of the exported artifact.
pub const EXPORT_MIME: &str = "text/markdown";

/// The document shown on a fresh session with nothing saved.
const SAMPLE_DOCUMENT: &str = r#"# Welcome to Markpad

This editor supports an extended set of markdown features. Let's explore them!

## Features

1. **Syntax Highlighting**: Code blocks are beautifully highlighted.
2. **Live Preview**: See rendered HTML as you type (F2 cycles views).
3. **Formatting Shortcuts**: Ctrl+F opens the format picker.
4. **Emoji Support**: Type ':' followed by the emoji name, like :smile:
5. **Word Count Goal**: Set a goal with Ctrl+G and track your progress.
6. **Auto-save**: Your work is automatically saved a few seconds after you stop typing.

## Code Example

```javascript
function greet(name) {
  return `Hello, ${name}! Welcome to the editor.`;
}

console.log(greet('User'));
```

## Task List

- [x] Implement basic Markdown support
- [x] Add syntax highlighting
- [ ] Implement collaborative editing
- [ ] Add more export options

Happy writing!
"#;

/// An exported file: name, MIME type, and contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Project the document into its export artifact. Pure; never mutates
/// anything.
pub fn export(document: &str) -> Artifact {
    Artifact {
        filename: EXPORT_FILENAME.to_string(),
        mime: EXPORT_MIME.to_string(),
        bytes: document.as_bytes().to_vec(),
    }
}

/// The built-in sample document.
pub fn sample_document() -> &'static str {
    SAMPLE_DOCUMENT
}

/// Typed access to the document and welcome-flag keys.
#[derive(Debug)]
pub struct DocumentStore<S> {
    store: S,
}

impl<S: Store> DocumentStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Persist the document under [`CONTENT_KEY`].
    ///
    /// # Errors
    ///
    /// Propagates [`StorageError`] from the backing store.
    pub fn save(&mut self, document: &str) -> Result<(), StorageError> {
        self.store.set(CONTENT_KEY, document)
    }

    /// Load the last-saved document, if any.
    ///
    /// # Errors
    ///
    /// Propagates [`StorageError`] from the backing store.
    pub fn load(&self) -> Result<Option<String>, StorageError> {
        self.store.get(CONTENT_KEY)
    }

    /// Load the last-saved document, or the sample when nothing was saved.
    /// Read failures also fall back to the sample; a fresh session must not
    /// fail to start over a corrupt store.
    pub fn load_or_sample(&self) -> String {
        match self.load() {
            Ok(Some(document)) => document,
            Ok(None) => SAMPLE_DOCUMENT.to_string(),
            Err(err) => {
                tracing::warn!("failed to load saved document: {err}");
                SAMPLE_DOCUMENT.to_string()
            }
        }
    }

    /// Whether the first-run welcome notice has not been shown yet.
    pub fn welcome_pending(&self) -> bool {
        !matches!(
            self.store.get(WELCOME_KEY),
            Ok(Some(ref v)) if v == "true"
        )
    }

    /// Record that the welcome notice was shown.
    ///
    /// # Errors
    ///
    /// Propagates [`StorageError`] from the backing store.
    pub fn mark_welcome_shown(&mut self) -> Result<(), StorageError> {
        self.store.set(WELCOME_KEY, "true")
    }
}
