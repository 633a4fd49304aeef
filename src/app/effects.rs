use std::io::{stdout, Write};
use std::path::Path;

use base64::Engine;

use crate::app::model::{image_mime_for_path, is_markdown_path, PromptKind};
use crate::app::{Message, Model, ToastLevel};
use crate::editor::Selection;
use crate::storage::{self, DocumentStore, Store};

/// Run the side effects a message calls for, after [`update`](super::update)
/// has applied its pure state changes.
///
/// Failures never propagate; every error path degrades to a toast.
pub(super) fn handle_message_side_effects<S: Store>(
    model: &mut Model,
    docs: &mut DocumentStore<S>,
    msg: &Message,
) {
    match msg {
        Message::Save => save_document(model, docs, true),
        Message::AutosaveFired => save_document(model, docs, false),
        Message::Export => export_document(model),
        Message::CopyDocument => copy_document(model),
        Message::OpenBrowserPreview => open_browser_preview(model),
        Message::PromptSubmit => submit_file_prompt(model),
        _ => {}
    }
}

fn save_document<S: Store>(model: &mut Model, docs: &mut DocumentStore<S>, explicit: bool) {
    match docs.save(&model.buffer.text()) {
        Ok(()) => {
            model.buffer.mark_clean();
            if explicit {
                model.show_toast(ToastLevel::Info, "Saved");
            } else {
                model.show_toast(ToastLevel::Info, "Auto-saved");
            }
        }
        Err(err) => model.show_toast(ToastLevel::Error, format!("Save failed: {err}")),
    }
}

fn export_document(model: &mut Model) {
    let artifact = storage::export(&model.buffer.text());
    match std::fs::write(&artifact.filename, &artifact.bytes) {
        Ok(()) => model.show_toast(ToastLevel::Info, format!("Exported {}", artifact.filename)),
        Err(err) => model.show_toast(ToastLevel::Error, format!("Export failed: {err}")),
    }
}

fn copy_document(model: &mut Model) {
    match copy_to_clipboard(&model.buffer.text()) {
        Ok(()) => model.show_toast(ToastLevel::Info, "Copied to clipboard"),
        Err(err) => model.show_toast(ToastLevel::Error, format!("Copy failed: {err}")),
    }
}

fn open_browser_preview(model: &mut Model) {
    let page = preview_page(&model.preview_html);
    let path = std::env::temp_dir().join("markpad-preview.html");
    if let Err(err) = std::fs::write(&path, page) {
        model.show_toast(ToastLevel::Error, format!("Preview failed: {err}"));
        return;
    }
    match open_external(&path.display().to_string()) {
        Ok(()) => model.show_toast(ToastLevel::Info, "Opened preview in browser"),
        Err(err) => model.show_toast(ToastLevel::Error, format!("Open failed: {err}")),
    }
}

/// Handle submission of the file prompts (import, attach image). The goal
/// prompt is pure and already consumed by `update`.
fn submit_file_prompt(model: &mut Model) {
    let kind = match model.prompt.as_ref() {
        Some(p) if p.kind == PromptKind::ImportPath => PromptKind::ImportPath,
        Some(p) if p.kind == PromptKind::AttachImagePath => PromptKind::AttachImagePath,
        _ => return,
    };
    let Some(prompt) = model.prompt.take() else {
        return;
    };
    let path = Path::new(prompt.input.trim()).to_path_buf();
    match kind {
        PromptKind::ImportPath => import_file(model, &path),
        PromptKind::AttachImagePath => attach_image(model, &path),
        PromptKind::WordCountGoal => {}
    }
}

fn import_file(model: &mut Model, path: &Path) {
    if !is_markdown_path(path) {
        model.show_toast(
            ToastLevel::Warning,
            format!("Not a markdown file: {}", path.display()),
        );
        return;
    }
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            model.show_toast(ToastLevel::Error, format!("Import failed: {err}"));
            return;
        }
    };
    let Ok(contents) = String::from_utf8(bytes) else {
        model.show_toast(
            ToastLevel::Error,
            format!("Import failed: {} is not UTF-8 text", path.display()),
        );
        return;
    };
    model.import(&contents);
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| {
            n.to_string_lossy().into_owned()
        });
    model.show_toast(ToastLevel::Info, format!("Imported {name}"));
}

fn attach_image(model: &mut Model, path: &Path) {
    let Some(mime) = image_mime_for_path(path) else {
        model.show_toast(
            ToastLevel::Warning,
            format!("Not an image file: {}", path.display()),
        );
        return;
    };
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            model.show_toast(ToastLevel::Error, format!("Attach failed: {err}"));
            return;
        }
    };
    let name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
    let snippet = image_snippet(&name, &image_data_url(mime, &bytes));
    let end = Selection::caret(model.buffer.len_chars());
    // Appending at the document end is always in bounds.
    let _ = model.buffer.apply(end, &snippet);
    model.sync_preview();
    model.ensure_cursor_visible();
    model.show_toast(ToastLevel::Info, format!("Attached {name}"));
}

/// Encode image bytes as a `data:` URL.
fn image_data_url(mime: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

/// The markdown appended for an attached image.
fn image_snippet(name: &str, data_url: &str) -> String {
    format!("\n\n![{name}]({data_url})")
}

/// Wrap rendered HTML into a standalone page for the browser preview.
fn preview_page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>markpad preview</title>\n\
         <style>\nbody {{ max-width: 48rem; margin: 2rem auto; padding: 0 1rem; \
         font-family: sans-serif; line-height: 1.6; }}\n\
         pre {{ padding: 0.75rem; overflow-x: auto; }}\n\
         code {{ font-family: monospace; }}\n\
         blockquote {{ border-left: 3px solid #ccc; margin-left: 0; padding-left: 1rem; }}\n\
         table, th, td {{ border: 1px solid #ccc; border-collapse: collapse; padding: 0.3rem; }}\n\
         </style>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

fn open_external(target: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(target)
            .spawn()?
            .wait()?;
        Ok(())
    }
    #[cfg(target_os = "windows")]
    {
        use std::process::Stdio;
        std::process::Command::new("cmd")
            .args(["/C", "start", "", target])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        return Ok(());
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        std::process::Command::new("xdg-open")
            .arg(target)
            .spawn()?
            .wait()?;
        Ok(())
    }
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        if copy_to_pbcopy(text).is_ok() {
            return Ok(());
        }
    }
    copy_to_clipboard_osc52(text)
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::model::Prompt;
    use crate::storage::MemStore;
    use std::io::Write as _;

    fn model_with_prompt(kind: PromptKind, input: &str) -> Model {
        let mut model = Model::new("existing", (80, 24));
        model.prompt = Some(Prompt {
            kind,
            input: input.to_string(),
        });
        model
    }

    #[test]
    fn test_osc52_sequence_encodes_text() {
        let seq = osc52_sequence("hi");
        assert_eq!(seq, "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_image_data_url_shape() {
        let url = image_data_url("image/png", &[1, 2, 3]);
        assert_eq!(url, "data:image/png;base64,AQID");
    }

    #[test]
    fn test_image_snippet_appends_blank_line() {
        let snippet = image_snippet("cat.png", "data:image/png;base64,AQID");
        assert_eq!(snippet, "\n\n![cat.png](data:image/png;base64,AQID)");
    }

    #[test]
    fn test_preview_page_embeds_body() {
        let page = preview_page("<h1>Hi</h1>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<h1>Hi</h1>"));
    }

    #[test]
    fn test_save_marks_buffer_clean() {
        let mut model = Model::new("doc", (80, 24));
        model.buffer.insert_char('!');
        let mut docs = DocumentStore::new(MemStore::new());
        handle_message_side_effects(&mut model, &mut docs, &Message::Save);
        assert!(!model.buffer.is_dirty());
        assert_eq!(docs.load().unwrap().as_deref(), Some("!doc"));
        assert_eq!(model.active_toast().map(|(m, _)| m), Some("Saved"));
    }

    #[test]
    fn test_autosave_uses_distinct_toast() {
        let mut model = Model::new("doc", (80, 24));
        let mut docs = DocumentStore::new(MemStore::new());
        handle_message_side_effects(&mut model, &mut docs, &Message::AutosaveFired);
        assert_eq!(model.active_toast().map(|(m, _)| m), Some("Auto-saved"));
    }

    #[test]
    fn test_import_prompt_replaces_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# Imported\n").unwrap();

        let mut model = model_with_prompt(PromptKind::ImportPath, &path.display().to_string());
        let mut docs = DocumentStore::new(MemStore::new());
        handle_message_side_effects(&mut model, &mut docs, &Message::PromptSubmit);

        assert_eq!(model.buffer.text(), "# Imported\n");
        assert_eq!(model.buffer.selection().start, 0);
        assert!(model.prompt.is_none());
        assert!(model.preview_html.contains("<h1>Imported</h1>"));
    }

    #[test]
    fn test_import_rejects_non_markdown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain").unwrap();

        let mut model = model_with_prompt(PromptKind::ImportPath, &path.display().to_string());
        let mut docs = DocumentStore::new(MemStore::new());
        handle_message_side_effects(&mut model, &mut docs, &Message::PromptSubmit);

        // Document unchanged, warning shown.
        assert_eq!(model.buffer.text(), "existing");
        assert_eq!(
            model.active_toast().map(|(_, level)| level),
            Some(ToastLevel::Warning)
        );
    }

    #[test]
    fn test_import_invalid_utf8_leaves_document_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&[0xff, 0xfe, 0x80]).unwrap();

        let mut model = model_with_prompt(PromptKind::ImportPath, &path.display().to_string());
        let mut docs = DocumentStore::new(MemStore::new());
        handle_message_side_effects(&mut model, &mut docs, &Message::PromptSubmit);

        assert_eq!(model.buffer.text(), "existing");
        assert_eq!(
            model.active_toast().map(|(_, level)| level),
            Some(ToastLevel::Error)
        );
    }

    #[test]
    fn test_attach_image_appends_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        std::fs::write(&path, [1, 2, 3]).unwrap();

        let mut model = model_with_prompt(PromptKind::AttachImagePath, &path.display().to_string());
        let mut docs = DocumentStore::new(MemStore::new());
        handle_message_side_effects(&mut model, &mut docs, &Message::PromptSubmit);

        assert_eq!(
            model.buffer.text(),
            "existing\n\n![dot.png](data:image/png;base64,AQID)"
        );
    }

    #[test]
    fn test_attach_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "md").unwrap();

        let mut model = model_with_prompt(PromptKind::AttachImagePath, &path.display().to_string());
        let mut docs = DocumentStore::new(MemStore::new());
        handle_message_side_effects(&mut model, &mut docs, &Message::PromptSubmit);

        assert_eq!(model.buffer.text(), "existing");
        assert_eq!(
            model.active_toast().map(|(_, level)| level),
            Some(ToastLevel::Warning)
        );
    }
}
