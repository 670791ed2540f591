//! Pagination Module
//!
//! Total-page detection.
//!
//! Each strategy looks at the pagination block of page 1 and may return a
//! page count. Strategies are tried in order and the first answer wins; with
//! no answer the listing is treated as a single page. These are guesses about
//! markup, so the only promise is a count of at least 1.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

// == Pagination Hints ==
/// Pagination facts pulled from a page before the document is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationHints {
    /// Visible text of the pagination block
    pub text: String,
    /// `href` of every link in the pagination block
    pub hrefs: Vec<String>,
    /// Text of every link in the pagination block
    pub link_texts: Vec<String>,
}

impl PaginationHints {
    /// Collects hints from every element matching `selector`.
    pub fn extract(document: &Html, selector: &Selector) -> Self {
        let link_selector = match Selector::parse("a") {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };

        let mut hints = Self::default();
        for block in document.select(selector) {
            hints.text.push_str(&collapse_whitespace(&block));
            hints.text.push(' ');
            for link in block.select(&link_selector) {
                if let Some(href) = link.value().attr("href") {
                    hints.hrefs.push(href.to_string());
                }
                hints.link_texts.push(collapse_whitespace(&link));
            }
        }
        hints
    }
}

fn collapse_whitespace(element: &ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

// == Strategies ==
/// One way of guessing the page count.
pub type PageCountStrategy = fn(&PaginationHints) -> Option<u32>;

/// Strategies in the order they are tried.
pub const STRATEGIES: &[PageCountStrategy] = &[from_page_of_text, from_page_hrefs, from_numeric_links];

/// Runs [`STRATEGIES`] in order; 1 when none of them answers.
pub fn detect_total_pages(hints: &PaginationHints) -> u32 {
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(hints))
        .filter(|n| *n >= 1)
        .unwrap_or(1)
}

// == Patterns ==
fn page_of_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)page\s+\d+\s+of\s+(\d+)").expect("static regex"))
}

fn page_href_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:/page/|[?&]page=)(\d+)").expect("static regex"))
}

/// "Page 3 of 17" → 17
pub fn from_page_of_text(hints: &PaginationHints) -> Option<u32> {
    page_of_re()
        .captures(&hints.text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Highest `/page/N` or `?page=N` among the pagination links.
pub fn from_page_hrefs(hints: &PaginationHints) -> Option<u32> {
    hints
        .hrefs
        .iter()
        .filter_map(|href| page_href_re().captures(href))
        .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()))
        .max()
}

/// Highest link whose whole text is a number.
pub fn from_numeric_links(hints: &PaginationHints) -> Option<u32> {
    hints
        .link_texts
        .iter()
        .filter_map(|text| text.trim().parse::<u32>().ok())
        .max()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn hints(html: &str) -> PaginationHints {
        let document = Html::parse_document(html);
        let selector = Selector::parse(".pagination").unwrap();
        PaginationHints::extract(&document, &selector)
    }

    #[test]
    fn test_page_of_text_wins() {
        let h = hints(
            r#"<div class="pagination"><span>Page 1 of 12</span>
               <a href="/anime/page/2/">2</a><a href="/anime/page/3/">3</a></div>"#,
        );
        assert_eq!(from_page_of_text(&h), Some(12));
        assert_eq!(detect_total_pages(&h), 12);
    }

    #[test]
    fn test_hrefs_used_when_no_text() {
        let h = hints(
            r#"<nav class="pagination"><a href="/anime/page/2/">2</a>
               <a href="/anime/page/9/">Last &raquo;</a></nav>"#,
        );
        assert_eq!(from_page_of_text(&h), None);
        assert_eq!(detect_total_pages(&h), 9);
    }

    #[test]
    fn test_query_style_hrefs() {
        let h = hints(r#"<div class="pagination"><a href="?page=4">4</a><a href="?page=2">2</a></div>"#);
        assert_eq!(from_page_hrefs(&h), Some(4));
    }

    #[test]
    fn test_numeric_link_text_fallback() {
        let h = hints(
            r##"<div class="pagination"><a href="#">1</a><a href="#"> 2 </a>
               <a href="#">5</a><a href="#">Next</a></div>"##,
        );
        assert_eq!(from_page_hrefs(&h), None);
        assert_eq!(detect_total_pages(&h), 5);
    }

    #[test]
    fn test_no_pagination_is_single_page() {
        let h = hints("<html><body><p>nothing here</p></body></html>");
        assert_eq!(h, PaginationHints::default());
        assert_eq!(detect_total_pages(&h), 1);
    }

    #[test]
    fn test_zero_count_reads_as_one() {
        let h = PaginationHints {
            text: "Page 0 of 0".into(),
            ..PaginationHints::default()
        };
        assert_eq!(detect_total_pages(&h), 1);
    }
}
