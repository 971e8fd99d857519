//! Markup sanitization for submitted page HTML.
//!
//! The browser extension injects its own UI into every page it runs on, so
//! the submitted markup carries fragments that must never reach the retrieval
//! index. Sanitization removes those fragments and reduces the rest of the
//! document to its rendered text.

use crate::error::{PageChatError, Result};
use scraper::{ElementRef, Html, Node, Selector};

/// Element selectors for the UI fragments the extension injects.
const INJECTED_UI_SELECTORS: [&str; 3] = [
    "iframe#pageassist-iframe",
    "div#pageassist-icon",
    "div#__plasmo-loading__",
];

/// Fallback title when the document has no `<title>` element.
pub const UNTITLED_PAGE: &str = "Untitled Page";

/// Title, favicon, and sanitized text extracted from a page for saving.
#[derive(Debug, Clone)]
pub struct PageExtract {
    /// Page title, or the fixed placeholder.
    pub title: String,
    /// Favicon href verbatim from `link[rel~=icon]`, if present.
    pub icon: Option<String>,
    /// Sanitized rendered text.
    pub text: String,
}

/// Strip injected UI fragments and return the page's rendered text.
pub fn sanitize_html(html: &str) -> Result<String> {
    let document = strip_injected_ui(html)?;
    Ok(rendered_text(&document))
}

/// Sanitize a page and additionally extract its title and favicon.
pub fn extract_page(html: &str) -> Result<PageExtract> {
    let document = strip_injected_ui(html)?;

    let title_sel = parse_selector("title")?;
    let title = document
        .select(&title_sel)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED_PAGE.to_string());

    // Matches rel="icon" and rel="shortcut icon"; href is kept verbatim.
    let icon_sel = parse_selector(r#"link[rel~="icon"]"#)?;
    let icon = document
        .select(&icon_sel)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(str::to_string);

    Ok(PageExtract {
        title,
        icon,
        text: rendered_text(&document),
    })
}

/// Parse the document and detach every injected UI fragment.
fn strip_injected_ui(html: &str) -> Result<Html> {
    let mut document = Html::parse_document(html);

    let mut doomed = Vec::new();
    for selector in INJECTED_UI_SELECTORS {
        let sel = parse_selector(selector)?;
        doomed.extend(document.select(&sel).map(|el| el.id()));
    }
    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    Ok(document)
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| PageChatError::Sanitize(format!("bad selector {selector:?}: {e}")))
}

/// Collect the document's rendered text, skipping non-rendered subtrees
/// (`head` included, so the title lands only in the title field) and
/// collapsing all whitespace runs to single spaces.
fn rendered_text(document: &Html) -> String {
    let mut out = String::new();
    collect_text(&document.tree.root(), &mut out);
    collapse_whitespace(&out)
}

fn collect_text(node: &ego_tree::NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => {
            out.push_str(&text);
            out.push(' ');
        }
        Node::Element(_) => {
            if let Some(el) = ElementRef::wrap(*node) {
                if matches!(
                    el.value().name(),
                    "head" | "script" | "style" | "noscript" | "template"
                ) {
                    return;
                }
            }
            for child in node.children() {
                collect_text(&child, out);
            }
        }
        _ => {
            for child in node.children() {
                collect_text(&child, out);
            }
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
          <head>
            <title>My Page</title>
            <link rel="icon" href="/favicon.ico">
            <style>body { color: red; }</style>
          </head>
          <body>
            <iframe id="pageassist-iframe" src="chrome-extension://x">widget frame</iframe>
            <div id="pageassist-icon"><span>floating icon</span></div>
            <div id="__plasmo-loading__">loading overlay</div>
            <p>The sky is blue.</p>
            <script>console.log("noise");</script>
          </body>
        </html>
    "#;

    #[test]
    fn test_injected_fragments_are_removed() {
        let text = sanitize_html(PAGE).unwrap();
        assert!(!text.contains("widget frame"));
        assert!(!text.contains("floating icon"));
        assert!(!text.contains("loading overlay"));
        assert!(text.contains("The sky is blue."));
    }

    #[test]
    fn test_script_and_style_are_not_rendered() {
        let text = sanitize_html(PAGE).unwrap();
        assert!(!text.contains("console.log"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let text = sanitize_html("<p>a   b\n\n  c</p>").unwrap();
        assert_eq!(text, "a b c");
    }

    #[test]
    fn test_extract_title_and_icon() {
        let extract = extract_page(PAGE).unwrap();
        assert_eq!(extract.title, "My Page");
        assert_eq!(extract.icon.as_deref(), Some("/favicon.ico"));
        assert!(extract.text.contains("The sky is blue."));
    }

    #[test]
    fn test_missing_title_falls_back_to_placeholder() {
        let extract = extract_page("<html><body><p>hi</p></body></html>").unwrap();
        assert_eq!(extract.title, UNTITLED_PAGE);
        assert_eq!(extract.icon, None);
    }

    #[test]
    fn test_shortcut_icon_rel_matches() {
        let html = r#"<head><link rel="shortcut icon" href="https://x.test/i.png"></head>"#;
        let extract = extract_page(html).unwrap();
        assert_eq!(extract.icon.as_deref(), Some("https://x.test/i.png"));
    }

    #[test]
    fn test_plain_text_without_markup() {
        // html5ever recovers from anything, including non-HTML input.
        let text = sanitize_html("just words").unwrap();
        assert_eq!(text, "just words");
    }
}
