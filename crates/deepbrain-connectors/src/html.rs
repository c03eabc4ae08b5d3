//! HTML to text conversion and link extraction.

use scraper::{ElementRef, Html, Node, Selector};
use url::Url;


/// Elements whose content never reaches the cleaned text.
const EXCLUDED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "svg", "form",
];

/// Elements that start a new line in the cleaned text.
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "section", "article", "main", "aside", "li", "ul", "ol", "table", "tr", "td",
    "th", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "dl", "dt", "dd", "br",
];

/// Result of [`web_html_cleanup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHtml {
    /// Page title, from `<title>` or else the first `<h1>`.
    pub title: Option<String>,
    /// Readable text, one block per line.
    pub cleaned_text: String,
}

/// Extract a title and readable text from an HTML page.
///
/// Navigation, scripts, styles and forms are dropped. Whitespace is
/// collapsed within each line and blank lines are removed.
///
/// ```
/// use deepbrain_connectors::html::web_html_cleanup;
///
/// let parsed = web_html_cleanup(
///     "<html><head><title> Risques </title></head>\
///      <body><nav>Menu</nav><p>Zone   inondable</p></body></html>",
/// );
/// assert_eq!(parsed.title.as_deref(), Some("Risques"));
/// assert_eq!(parsed.cleaned_text, "Zone inondable");
/// ```
pub fn web_html_cleanup(html: &str) -> ParsedHtml {
    let document = Html::parse_document(html);

    let title = first_text(&document, "title").or_else(|| first_text(&document, "h1"));

    let root = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    let mut raw = String::new();
    collect_text(root, &mut raw);

    ParsedHtml {
        title,
        cleaned_text: collapse_lines(&raw),
    }
}

/// Links to PDF files found in `<a href>` anchors, resolved against `base`.
///
/// Only hrefs ending in `.pdf` are kept, so `x.PDF` or `x.pdf?v=1` are not
/// followed. Duplicates are removed, keeping document order.
pub fn pdf_links(html: &str, base: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    let mut links: Vec<Url> = Vec::new();
    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if !href.ends_with(".pdf") {
            continue;
        }
        let Ok(resolved) = base.join(href) else {
            log::debug!("Skipping unresolvable link '{href}'");
            continue;
        };
        if !links.contains(&resolved) {
            links.push(resolved);
        }
    }
    links
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|text| !text.is_empty())
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if EXCLUDED_ELEMENTS.contains(&name) {
                    continue;
                }
                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(child_ref, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collapse_lines(text: &str) -> String {
    text.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
