//! SEO fragments of a fetched page.
//!
//! Parsing is done with `scraper`, which never fails on malformed markup.
//! `Html` is not `Send`, so everything here is synchronous and returns owned
//! data that can be carried across `.await` points.

use scraper::{ElementRef, Html, Selector};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeoData {
    /// Text of the document `<title>`.
    pub title: Option<String>,
    /// Text of the first `<h1>`.
    pub h1: Option<String>,
    /// `content` of the first `<meta name="description">`.
    pub description: Option<String>,
}

pub fn extract_seo(html: &str) -> SeoData {
    let document = Html::parse_document(html);

    SeoData {
        title: first_text(&document, "title"),
        h1: first_text(&document, "h1"),
        description: meta_description(&document),
    }
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    let element = document.select(&selector).next()?;
    normalized_text(element)
}

fn meta_description(document: &Html) -> Option<String> {
    let selector = Selector::parse("meta[name]").ok()?;
    document
        .select(&selector)
        .find(|meta| {
            meta.value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
        })
        .and_then(|meta| meta.value().attr("content"))
        .and_then(|content| non_empty(collapse_whitespace(content)))
}

fn normalized_text(element: ElementRef<'_>) -> Option<String> {
    let text: String = element.text().collect();
    non_empty(collapse_whitespace(&text))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_h1_and_description() {
        let html = r#"
        <html><head>
          <title> Example Domain </title>
          <meta name="description" content="An example page">
        </head><body>
          <h1>Hello <b>world</b></h1>
          <h1>Second heading</h1>
        </body></html>
        "#;

        let seo = extract_seo(html);
        assert_eq!(seo.title.as_deref(), Some("Example Domain"));
        assert_eq!(seo.h1.as_deref(), Some("Hello world"));
        assert_eq!(seo.description.as_deref(), Some("An example page"));
    }

    #[test]
    fn missing_or_empty_fragments_are_none() {
        let html = r#"
        <html><head><title>   </title><meta name="description" content=""></head>
        <body><p>no heading</p></body></html>
        "#;

        assert_eq!(extract_seo(html), SeoData::default());
        assert_eq!(extract_seo(""), SeoData::default());
    }

    #[test]
    fn matches_description_name_case_insensitively() {
        let html = r#"<meta name="keywords" content="a, b"><meta name="Description" content="Mixed case">"#;
        assert_eq!(
            extract_seo(html).description.as_deref(),
            Some("Mixed case")
        );
    }

    #[test]
    fn tolerates_broken_markup() {
        let html = "<title>Broken<h1>Still <i>here";
        let seo = extract_seo(html);
        assert!(seo.title.is_some());
        assert!(seo.description.is_none());
    }

    #[test]
    fn collapses_inner_whitespace() {
        let html = "<h1>\n  Multi\n\t line   heading \n</h1>";
        assert_eq!(extract_seo(html).h1.as_deref(), Some("Multi line heading"));
    }
}
