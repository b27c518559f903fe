//! Helpers for presenting a single article page.

use std::sync::LazyLock;

use regex::Regex;

use folio_shared::{Article, DEFAULT_SALUTATION};

use crate::book::Book;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<[a-z][\s\S]*>").expect("valid regex"));
static BLOCK_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6])>").expect("valid regex"));
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Whether the text already carries HTML markup.
pub fn has_html(text: &str) -> bool {
    HTML_TAG.is_match(text)
}

/// Article body or bio as HTML.
///
/// Marked-up text is returned untouched. Plain text becomes one `<p>` per
/// non-blank line.
pub fn render_html(text: &str) -> String {
    if has_html(text) {
        return text.to_string();
    }
    paragraphs(text)
        .map(|line| format!("<p>{line}</p>"))
        .collect()
}

/// Non-blank trimmed lines of plain text.
pub fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Paragraphs of text that may carry markup, with tags removed.
///
/// Block-level closing tags and `<br>` count as line breaks.
pub fn plain_paragraphs(text: &str) -> Vec<String> {
    if !has_html(text) {
        return paragraphs(text).map(str::to_string).collect();
    }
    let broken = BLOCK_BREAK.replace_all(text, "\n");
    let stripped = ANY_TAG.replace_all(&broken, "");
    paragraphs(&stripped).map(str::to_string).collect()
}

/// Salutation with its first letter capitalised; blank means the default.
pub fn salutation(author_gen: &str) -> String {
    let trimmed = author_gen.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => DEFAULT_SALUTATION.to_string(),
    }
}

/// Where an article sits in the flat reading order.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    /// Zero-based index into the flat list.
    pub index: usize,
    pub total: usize,
    pub previous: Option<&'a Article>,
    pub next: Option<&'a Article>,
}

impl Page<'_> {
    /// `"k / n"` with `k` counted from one.
    pub fn position(&self) -> String {
        format!("{} / {}", self.index + 1, self.total)
    }
}

/// Page for an article id, or `None` when the book has no such article.
pub fn page<'a>(book: &'a Book, id: &str) -> Option<Page<'a>> {
    let flat = book.flat();
    let index = flat.iter().position(|a| a.id == id)?;
    Some(Page {
        index,
        total: flat.len(),
        previous: index.checked_sub(1).map(|i| flat[i]),
        next: flat.get(index + 1).copied(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_shared::AuthorGroup;

    fn fixture_book() -> Book {
        let fixture = std::fs::read_to_string("../../../fixtures/json/groups.fixture.json")
            .expect("read fixture");
        let groups: Vec<AuthorGroup> = serde_json::from_str(&fixture).expect("parse fixture");
        Book::new(groups)
    }

    #[test]
    fn plain_text_becomes_paragraphs() {
        assert_eq!(
            render_html("Đoạn một.\n\n   \n  Đoạn hai.  \r\n"),
            "<p>Đoạn một.</p><p>Đoạn hai.</p>"
        );
        assert_eq!(render_html(""), "");
    }

    #[test]
    fn html_passes_through() {
        let html = "<p>Nội dung đã có <b>HTML</b>.</p>";
        assert_eq!(render_html(html), html);
        assert!(has_html("<DIV class=\"x\">a</DIV>"));
        assert!(!has_html("1 < 2 > 0"));
    }

    #[test]
    fn markup_reduces_to_plain_paragraphs() {
        assert_eq!(
            plain_paragraphs("<p>Một <b>hai</b></p><p>Ba</p>Bốn<br/>Năm"),
            vec!["Một hai", "Ba", "Bốn", "Năm"]
        );
        assert_eq!(plain_paragraphs("Dòng một\nDòng hai"), vec!["Dòng một", "Dòng hai"]);
    }

    #[test]
    fn salutation_is_capitalised() {
        assert_eq!(salutation("bà"), "Bà");
        assert_eq!(salutation("ông"), "Ông");
        assert_eq!(salutation("  "), DEFAULT_SALUTATION);
    }

    #[test]
    fn page_neighbours_cross_groups() {
        let book = fixture_book();

        let first = page(&book, "row-2").unwrap();
        assert_eq!(first.position(), "1 / 3");
        assert!(first.previous.is_none());
        assert_eq!(first.next.map(|a| a.id.as_str()), Some("row-1"));

        let last = page(&book, "row-3").unwrap();
        assert_eq!(last.position(), "3 / 3");
        assert_eq!(last.previous.map(|a| a.id.as_str()), Some("row-1"));
        assert!(last.next.is_none());

        assert!(page(&book, "row-7").is_none());
    }
}
