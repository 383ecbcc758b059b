//! Rendered document
//!
//! A [`Document`] is the page a controller owns: the body markup produced by
//! the views plus an optional modal layered on top. Handles are cheap to
//! clone and share the same page, so a controller and the navigator that
//! replaces its page can both hold one.
//!
//! Queries follow the testing contract of the markup (`data-testid`, visible
//! text, image alt text). They read the markup emitted by the templates in
//! this crate, which always quote attribute values with double quotes.

use indexmap::IndexMap;
use regex::{Captures, Regex};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

#[derive(Debug, Default)]
struct Page {
    body: String,
    modal: Option<String>,
}

/// Shared handle on the rendered page
#[derive(Debug, Clone, Default)]
pub struct Document {
    page: Arc<RwLock<Page>>,
}

/// An element start tag and its attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
}

impl Element {
    /// Attribute value; boolean attributes read as `""`
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn test_id(&self) -> Option<&str> {
        self.attr("data-testid")
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(body: impl Into<String>) -> Self {
        let document = Self::new();
        document.set_body(body);
        document
    }

    /// Replace the page body; any open modal is closed
    pub fn set_body(&self, body: impl Into<String>) {
        let mut page = self.page.write().unwrap_or_else(PoisonError::into_inner);
        page.body = body.into();
        page.modal = None;
    }

    pub fn body(&self) -> String {
        self.page
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .body
            .clone()
    }

    pub fn show_modal(&self, markup: impl Into<String>) {
        self.page
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .modal = Some(markup.into());
    }

    pub fn modal(&self) -> Option<String> {
        self.page
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .modal
            .clone()
    }

    /// Full markup: body followed by the open modal
    pub fn html(&self) -> String {
        let page = self.page.read().unwrap_or_else(PoisonError::into_inner);
        match &page.modal {
            Some(modal) => format!("{}\n{}", page.body, modal),
            None => page.body.clone(),
        }
    }

    /// Every element start tag, in document order
    pub fn elements(&self) -> Vec<Element> {
        parse_elements(&self.html())
    }

    pub fn query_all_by_test_id(&self, test_id: &str) -> Vec<Element> {
        self.elements()
            .into_iter()
            .filter(|e| e.test_id() == Some(test_id))
            .collect()
    }

    pub fn get_by_test_id(&self, test_id: &str) -> Option<Element> {
        self.query_all_by_test_id(test_id).into_iter().next()
    }

    pub fn get_by_alt_text(&self, alt: &str) -> Option<Element> {
        self.elements().into_iter().find(|e| e.attr("alt") == Some(alt))
    }

    /// Visible text with whitespace collapsed
    pub fn text_content(&self) -> String {
        text_of(&self.html())
    }

    /// Whether `text` appears in the visible text
    pub fn has_text(&self, text: &str) -> bool {
        let needle = text.split_whitespace().collect::<Vec<_>>().join(" ");
        self.text_content().contains(&needle)
    }
}

fn tag_regex() -> &'static Regex {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_REGEX.get_or_init(|| {
        Regex::new(r#"<([a-zA-Z][a-zA-Z0-9]*)((?:\s+[^\s=>/"]+(?:\s*=\s*"[^"]*")?)*)\s*/?>"#)
            .expect("tag regex is valid")
    })
}

fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE_REGEX: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE_REGEX.get_or_init(|| {
        Regex::new(r#"([^\s=>/"]+)(?:\s*=\s*"([^"]*)")?"#).expect("attribute regex is valid")
    })
}

fn parse_elements(html: &str) -> Vec<Element> {
    tag_regex()
        .captures_iter(html)
        .map(|caps| {
            let attributes = caps
                .get(2)
                .map(|raw| {
                    attribute_regex()
                        .captures_iter(raw.as_str())
                        .map(|a| {
                            let value = a.get(2).map(|v| decode_entities(v.as_str()));
                            (a[1].to_lowercase(), value.unwrap_or_default())
                        })
                        .collect()
                })
                .unwrap_or_default();
            Element {
                tag: caps[1].to_lowercase(),
                attributes,
            }
        })
        .collect()
}

fn text_of(html: &str) -> String {
    static MARKUP_REGEX: OnceLock<Regex> = OnceLock::new();
    let markup = MARKUP_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("markup regex is valid"));
    let text = markup.replace_all(html, " ");
    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode the character references the templates and the escaper emit
pub fn decode_entities(text: &str) -> String {
    static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();
    let entity = ENTITY_REGEX.get_or_init(|| {
        Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos|times|nbsp);")
            .expect("entity regex is valid")
    });

    entity
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "times" => Some('×'),
                "nbsp" => Some('\u{a0}'),
                _ => {
                    let code = if let Some(hex) = name.strip_prefix("#x").or(name.strip_prefix("#X")) {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        name[1..].parse::<u32>().ok()
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_elements_and_attributes() {
        let document = Document::with_body(
            r#"<div data-testid="icon-eye" data-bill-url="https:&#x2F;&#x2F;a.test&#x2F;x.jpg" class="a b"></div>
               <input required type="file" data-testid="file" />"#,
        );

        let icon = document.get_by_test_id("icon-eye").unwrap();
        assert_eq!(icon.tag, "div");
        assert_eq!(icon.attr("data-bill-url"), Some("https://a.test/x.jpg"));
        assert!(icon.has_class("b"));
        assert!(!icon.has_class("c"));

        let file = document.get_by_test_id("file").unwrap();
        assert_eq!(file.attr("required"), Some(""));
        assert_eq!(file.attr("type"), Some("file"));
    }

    #[test]
    fn test_text_content_collapses_whitespace_and_decodes() {
        let document = Document::with_body("<p>Mes   notes</p>\n<span>de &amp; frais &#233;</span>");
        assert_eq!(document.text_content(), "Mes notes de & frais é");
        assert!(document.has_text("notes de"));
        assert!(!document.has_text("Justificatif"));
    }

    #[test]
    fn test_modal_is_layered_and_reset_by_set_body() {
        let document = Document::with_body("<p>page</p>");
        let handle = document.clone();
        handle.show_modal(r#"<h5>Justificatif</h5><img alt="Bill" src="x" />"#);

        assert!(document.has_text("Justificatif"));
        assert!(document.get_by_alt_text("Bill").is_some());

        document.set_body("<p>other</p>");
        assert!(handle.modal().is_none());
        assert!(!document.has_text("Justificatif"));
    }

    #[test]
    fn test_unknown_entities_are_kept() {
        assert_eq!(decode_entities("a &#xZZ; b"), "a &#xZZ; b");
        assert_eq!(decode_entities("&lt;b&gt;"), "<b>");
    }
}
