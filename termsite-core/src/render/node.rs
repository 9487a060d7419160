//! Minimal view tree serialisable to HTML

use std::fmt;

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &["img", "br", "hr", "input", "meta", "link", "source"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Text content, escaped on output
    Text(String),
    /// Trusted markup, written as is
    Raw(String),
}

/// Attribute; `None` renders a boolean attribute such as `muted`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: &'static str,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self { tag, attrs: Vec::new(), children: Vec::new() }
    }

    /// Set an attribute, replacing any earlier value
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.set_attr(name, Some(value.into()));
        self
    }

    pub fn flag(mut self, name: &'static str) -> Self {
        self.set_attr(name, None);
        self
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn raw(self, html: impl Into<String>) -> Self {
        self.child(Node::Raw(html.into()))
    }

    fn set_attr(&mut self, name: &'static str, value: Option<String>) {
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attrs.push(Attr { name, value }),
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|a| a.name == name).and_then(|a| a.value.as_deref())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    pub fn element_id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class").map(|c| c.split_whitespace().any(|c| c == class)).unwrap_or(false)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let classes = match self.get_attr("class") {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attr("class", Some(classes));
    }

    pub fn remove_class(&mut self, class: &str) {
        if let Some(existing) = self.get_attr("class") {
            let kept: Vec<&str> = existing.split_whitespace().filter(|c| *c != class).collect();
            let joined = kept.join(" ");
            self.set_attr("class", Some(joined));
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Depth-first search for the first element carrying `class`, self included
    pub fn find_class(&self, class: &str) -> Option<&Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.child_elements().find_map(|e| e.find_class(class))
    }

    /// Concatenated text of all descendants, markup excluded
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => out.push_str(&e.text_content()),
                Node::Raw(_) => {}
            }
        }
        out
    }

    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for attr in &self.attrs {
            match &attr.value {
                Some(value) => write!(f, " {}=\"{}\"", attr.name, escape_attr(value))?,
                None => write!(f, " {}", attr.name)?,
            }
        }
        f.write_str(">")?;

        if VOID_ELEMENTS.contains(&self.tag) {
            return Ok(());
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(e) => write!(f, "{}", e),
            Node::Text(t) => f.write_str(&escape_text(t)),
            Node::Raw(html) => f.write_str(html),
        }
    }
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialises_attributes_and_children() {
        let el = Element::new("a").class("button").attr("href", "faq.html").text("View FAQ");
        assert_eq!(el.to_html(), r#"<a class="button" href="faq.html">View FAQ</a>"#);
    }

    #[test]
    fn test_escaping() {
        let el = Element::new("h2").attr("title", "\"quoted\"").text("<script>&");
        assert_eq!(el.to_html(), r#"<h2 title="&quot;quoted&quot;">&lt;script&gt;&amp;</h2>"#);

        let raw = Element::new("div").raw("<strong>ok</strong>");
        assert_eq!(raw.to_html(), "<div><strong>ok</strong></div>");
    }

    #[test]
    fn test_void_and_boolean_attributes() {
        let img = Element::new("img").attr("src", "a.png").attr("alt", "");
        assert_eq!(img.to_html(), r#"<img src="a.png" alt="">"#);

        let video = Element::new("video").flag("muted").flag("playsinline");
        assert_eq!(video.to_html(), "<video muted playsinline></video>");
    }

    #[test]
    fn test_class_manipulation() {
        let mut el = Element::new("div").class("faq-item");
        el.add_class("highlighted");
        el.add_class("highlighted");
        assert_eq!(el.get_attr("class"), Some("faq-item highlighted"));
        el.remove_class("highlighted");
        assert!(!el.has_class("highlighted"));
        assert!(el.has_class("faq-item"));
    }

    #[test]
    fn test_find_and_text_content() {
        let tree = Element::new("section")
            .child(Element::new("h2").class("title").text("Hello "))
            .child(Element::new("p").text("world").raw("<b>ignored</b>"));
        assert_eq!(tree.find_class("title").map(|e| e.tag), Some("h2"));
        assert_eq!(tree.text_content(), "Hello world");
    }
}
