//! Markdown to HTML rendering.
//!
//! One entry point, [`render`]: GitHub-flavored markdown in, sanitized HTML
//! out. Fenced code blocks are highlighted through the comrak syntect
//! adapter; raw HTML in the source is escaped by comrak, so the output
//! carries no markup the author did not write in markdown.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, OnceLock};

use comrak::plugins::syntect::SyntectAdapter;
use comrak::{markdown_to_html_with_plugins, Options, Plugins};

/// Render a markdown document to HTML.
///
/// Total: the same input always yields the same output, and a panic inside
/// the parser or highlighter degrades to the raw text escaped inside a
/// `<pre>` block rather than unwinding into the caller.
pub fn render(document: &str) -> String {
    match panic::catch_unwind(AssertUnwindSafe(|| render_html(document))) {
        Ok(html) => html,
        Err(_) => {
            tracing::error!("markdown renderer panicked, falling back to escaped source");
            format!("<pre>{}</pre>\n", escape_html(document))
        }
    }
}

fn render_html(document: &str) -> String {
    let mut plugins = Plugins::default();
    plugins.render.codefence_syntax_highlighter = Some(adapter());
    markdown_to_html_with_plugins(document, &options(), &plugins)
}

fn options() -> Options {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    options.extension.shortcodes = true;
    options.render.hardbreaks = true;
    options
}

fn adapter() -> &'static SyntectAdapter {
    static ADAPTER: OnceLock<SyntectAdapter> = OnceLock::new();
    ADAPTER.get_or_init(|| {
        let theme = match background_mode() {
            BackgroundMode::Dark => "base16-ocean.dark",
            BackgroundMode::Light => "InspiredGitHub",
        };
        SyntectAdapter::new(Some(theme))
    })
}

/// Minimal HTML escaping for the panic fallback path.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackgroundMode {
    Dark,
    Light,
}

/// Forced highlight theme background, set from the CLI before first render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightBackground {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: OnceLock<Mutex<Option<HighlightBackground>>> = OnceLock::new();

/// Override the highlight theme background. Must be called before the first
/// [`render`]; the adapter is built once and cached.
pub fn set_background_mode(mode: Option<HighlightBackground>) {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    let mut guard = lock.lock().expect("highlight background lock");
    *guard = mode;
}

fn background_mode() -> BackgroundMode {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(guard) = lock.lock() {
        if let Some(mode) = *guard {
            return match mode {
                HighlightBackground::Light => BackgroundMode::Light,
                HighlightBackground::Dark => BackgroundMode::Dark,
            };
        }
    }
    background_mode_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_mode_from_colorfgbg(colorfgbg: Option<&str>) -> BackgroundMode {
    let Some(value) = colorfgbg else {
        return BackgroundMode::Dark;
    };
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    let Ok(bg) = bg_str.parse::<u8>() else {
        return BackgroundMode::Dark;
    };

    if bg >= 7 {
        BackgroundMode::Light
    } else {
        BackgroundMode::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_render_heading() {
        let html = render("# Title");
        assert!(html.contains("<h1>Title</h1>"), "got: {html}");
    }

    #[test]
    fn test_render_gfm_table() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"), "got: {html}");
        assert!(html.contains("<td>1</td>"), "got: {html}");
    }

    #[test]
    fn test_render_strikethrough() {
        let html = render("~~gone~~");
        assert!(html.contains("<del>gone</del>"), "got: {html}");
    }

    #[test]
    fn test_render_task_list() {
        let html = render("- [x] done\n- [ ] todo");
        assert!(html.contains("type=\"checkbox\""), "got: {html}");
        assert!(html.contains("checked"), "got: {html}");
    }

    #[test]
    fn test_render_hard_line_breaks() {
        let html = render("first\nsecond");
        assert!(html.contains("<br />"), "got: {html}");
    }

    #[test]
    fn test_render_autolink() {
        let html = render("see https://example.com please");
        assert!(
            html.contains("<a href=\"https://example.com\">"),
            "got: {html}"
        );
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render("<script>alert('x')</script>");
        assert!(!html.contains("<script>"), "got: {html}");
        assert!(html.contains("&lt;script&gt;"), "got: {html}");
    }

    #[test]
    fn test_code_block_is_highlighted() {
        let html = render("```rust\nfn main() {}\n```");
        // The syntect adapter emits inline-styled spans.
        assert!(html.contains("<span"), "got: {html}");
        assert!(html.contains("main"), "got: {html}");
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain() {
        let html = render("```nosuchlang\nplain body\n```");
        assert!(html.contains("plain body"), "got: {html}");
    }

    #[test]
    fn test_render_is_deterministic() {
        let doc = "# Hi\n\nsome *text* with `code`\n\n```rust\nlet x = 1;\n```\n";
        assert_eq!(render(doc), render(doc));
    }

    #[test]
    fn test_render_empty_document() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_escape_html_covers_all_specials() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_colorfgbg_dark_background() {
        let mode = background_mode_from_colorfgbg(Some("15;0"));
        assert_eq!(mode, BackgroundMode::Dark);
    }

    #[test]
    fn test_colorfgbg_light_background() {
        let mode = background_mode_from_colorfgbg(Some("0;15"));
        assert_eq!(mode, BackgroundMode::Light);
    }

    #[test]
    fn test_colorfgbg_missing_defaults_to_dark() {
        assert_eq!(background_mode_from_colorfgbg(None), BackgroundMode::Dark);
        assert_eq!(
            background_mode_from_colorfgbg(Some("garbage")),
            BackgroundMode::Dark
        );
    }

    proptest! {
        #[test]
        fn test_render_never_panics(input in ".{0,400}") {
            let _ = render(&input);
        }

        #[test]
        fn test_render_never_panics_on_markdownish_input(
            input in r"[-#>*`\[\]()!~|\n a-z0-9]{0,400}"
        ) {
            let _ = render(&input);
        }
    }
}
