//! A parsed HTML page reduced to the few queries field rules need.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use scraper::{ElementRef, Html};

/// Attribute predicate used to locate elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Predicate<'p> {
    /// `id="…"` equals the value.
    Id(&'p str),
    /// `class="…"` contains the value as one of its classes.
    Class(&'p str),
    /// The element's tag name, e.g. `img` or `a`.
    Tag(&'p str),
}
impl Predicate<'_> {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        let value = element.value();
        match self {
            Self::Id(id) => value.id() == Some(*id),
            Self::Class(class) => value.classes().any(|c| c == *class),
            Self::Tag(tag) => value.name().eq_ignore_ascii_case(tag),
        }
    }
}

/// A parsed document.
pub struct Document {
    html: Html,
}
impl Document {
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Every element matching the predicate, in document order.
    pub fn find_all(&self, predicate: Predicate<'_>) -> Vec<Element<'_>> {
        Element(self.html.root_element()).find_all(predicate)
    }

    /// The first element matching the predicate.
    pub fn find(&self, predicate: Predicate<'_>) -> Option<Element<'_>> {
        Element(self.html.root_element()).find(predicate)
    }
}
impl From<Html> for Document {
    fn from(html: Html) -> Self {
        Self { html }
    }
}
impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Document").field("errors", &self.html.errors.len()).finish_non_exhaustive()
    }
}

/// A borrowed element within a [`Document`].
#[derive(Clone, Copy, Debug)]
pub struct Element<'a>(ElementRef<'a>);
impl<'a> Element<'a> {
    /// Every descendant (not including this element) matching the predicate.
    pub fn find_all(&self, predicate: Predicate<'_>) -> Vec<Element<'a>> {
        self.descendants().filter(|el| predicate.matches(el)).map(Element).collect()
    }

    /// The first descendant matching the predicate.
    pub fn find(&self, predicate: Predicate<'_>) -> Option<Element<'a>> {
        self.descendants().find(|el| predicate.matches(el)).map(Element)
    }

    /// Concatenated text content, untrimmed.
    pub fn text(&self) -> String {
        self.0.text().collect()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    fn descendants(&self) -> impl Iterator<Item = ElementRef<'a>> + use<'a> {
        let id = self.0.id();
        self.0.descendants().filter(move |node| node.id() != id).filter_map(ElementRef::wrap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <html><body>
            <div id="row" class="row wide">
                <div class="label">Name:</div>
                <div class="value"> Llanowar Elves </div>
                <img src="a.gif" alt="Green">
            </div>
            <div class="value">Other</div>
        </body></html>
    "#;

    #[test]
    fn test_find_by_id_then_class() {
        let document = Document::parse(HTML);
        let row = document.find(Predicate::Id("row")).unwrap();
        let value = row.find(Predicate::Class("value")).unwrap();
        assert_eq!(value.text().trim(), "Llanowar Elves");
    }

    #[test]
    fn test_find_all_is_document_ordered() {
        let document = Document::parse(HTML);
        let values: Vec<_> = document.find_all(Predicate::Class("value")).iter().map(|e| e.text()).collect();
        assert_eq!(values, vec![" Llanowar Elves ".to_string(), "Other".to_string()]);
    }

    #[test]
    fn test_multi_class_match() {
        let document = Document::parse(HTML);
        assert!(document.find(Predicate::Class("wide")).is_some());
        assert!(document.find(Predicate::Class("narrow")).is_none());
    }

    #[test]
    fn test_attributes() {
        let document = Document::parse(HTML);
        let img = document.find(Predicate::Tag("img")).unwrap();
        assert_eq!(img.attr("alt"), Some("Green"));
        assert_eq!(img.attr("title"), None);
    }

    #[test]
    fn test_find_excludes_self() {
        let document = Document::parse(HTML);
        let row = document.find(Predicate::Id("row")).unwrap();
        assert!(row.find(Predicate::Id("row")).is_none());
    }
}
