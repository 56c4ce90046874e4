//! Owned SVG document model.
//!
//! `roxmltree` gives us a strict, read-only parse. The pipeline needs to drop
//! nodes and attach attributes, so the parse is copied into a small owned tree
//! that can be transformed and serialized back to markup.
//!
//! Namespace declarations are kept as plain `xmlns` attributes on the element
//! that declared them, so serialization reproduces them where they were.

use crate::error::{PlotError, StructureError};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A node in the owned tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

/// An element with its qualified name, attributes in source order, and children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Items between the XML declaration and the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrologItem {
    Instruction { target: String, value: Option<String> },
    Comment(String),
}

/// A parsed plot document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    pub prolog: Vec<PrologItem>,
    pub root: Element,
}

impl SvgDocument {
    /// Parse tool output. Only well-formedness and an `<svg>` root are checked here.
    pub fn parse(raw: &str) -> Result<Self, PlotError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(raw, options)
            .map_err(|e| PlotError::malformed(StructureError::NotWellFormed(e.to_string()), raw))?;

        let root_node = doc.root_element();
        if root_node.tag_name().name() != "svg" {
            return Err(PlotError::malformed(
                StructureError::UnexpectedRoot(root_node.tag_name().name().to_string()),
                raw,
            ));
        }

        let mut prolog = Vec::new();
        for child in doc.root().children() {
            if child.is_element() {
                break;
            }
            if let Some(pi) = child.pi() {
                prolog.push(PrologItem::Instruction {
                    target: pi.target.to_string(),
                    value: pi.value.map(str::to_string),
                });
            } else if child.is_comment() {
                prolog.push(PrologItem::Comment(child.text().unwrap_or_default().to_string()));
            }
        }

        Ok(Self {
            prolog,
            root: convert_element(root_node, None),
        })
    }

    /// Full document with an XML declaration, suitable for writing to a `.svg` file.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        for item in &self.prolog {
            match item {
                PrologItem::Instruction { target, value } => {
                    out.push_str("<?");
                    out.push_str(target);
                    if let Some(value) = value {
                        out.push(' ');
                        out.push_str(value);
                    }
                    out.push_str("?>\n");
                }
                PrologItem::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->\n");
                }
            }
        }
        self.root.write_markup(&mut out);
        out.push('\n');
        out
    }
}

fn convert_element(node: roxmltree::Node<'_, '_>, parent: Option<roxmltree::Node<'_, '_>>) -> Element {
    let mut attributes = Vec::new();

    // Declarations new to this element (not inherited unchanged from the parent).
    for ns in node.namespaces() {
        if ns.name() == Some("xml") {
            continue;
        }
        let inherited = parent
            .map(|p| p.namespaces().any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri()))
            .unwrap_or(false);
        if inherited {
            continue;
        }
        let key = match ns.name() {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        attributes.push((key, ns.uri().to_string()));
    }

    for attr in node.attributes() {
        let name = match attr.namespace() {
            Some(uri) => match prefix_for(node, uri) {
                Some(prefix) => format!("{}:{}", prefix, attr.name()),
                None => attr.name().to_string(),
            },
            None => attr.name().to_string(),
        };
        attributes.push((name, attr.value().to_string()));
    }

    let tag = node.tag_name();
    let name = match tag.namespace() {
        Some(uri) if !is_default_namespace(node, uri) => match prefix_for(node, uri) {
            Some(prefix) => format!("{}:{}", prefix, tag.name()),
            None => tag.name().to_string(),
        },
        _ => tag.name().to_string(),
    };

    let children = node
        .children()
        .filter_map(|child| {
            if child.is_element() {
                Some(Node::Element(convert_element(child, Some(node))))
            } else if child.is_text() {
                child.text().map(|t| Node::Text(t.to_string()))
            } else if child.is_comment() {
                child.text().map(|t| Node::Comment(t.to_string()))
            } else {
                None
            }
        })
        .collect();

    Element {
        name,
        attributes,
        children,
    }
}

fn is_default_namespace(node: roxmltree::Node<'_, '_>, uri: &str) -> bool {
    node.namespaces().any(|ns| ns.name().is_none() && ns.uri() == uri)
}

fn prefix_for(node: roxmltree::Node<'_, '_>, uri: &str) -> Option<String> {
    if uri == XML_NAMESPACE {
        return Some("xml".to_string());
    }
    node.lookup_prefix(uri)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Name without any namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// True if the local name equals `name`.
    pub fn is(&self, name: &str) -> bool {
        self.local_name() == name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let value = match self.attribute("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attribute("class", &value);
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Concatenated descendant text, like DOM `textContent`.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
                Node::Comment(_) => {}
            }
        }
    }

    /// Visit this element and all descendant elements, pre-order.
    pub fn walk_mut<F: FnMut(&mut Element)>(&mut self, f: &mut F) {
        f(self);
        for child in self.child_elements_mut() {
            child.walk_mut(f);
        }
    }

    /// First element (self included) matching the predicate, pre-order.
    pub fn find<P: Fn(&Element) -> bool>(&self, predicate: &P) -> Option<&Element> {
        if predicate(self) {
            return Some(self);
        }
        self.child_elements().find_map(|c| c.find(predicate))
    }

    /// Outer markup of this element.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attribute(value));
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');

        let raw_text = self.is("style") || self.is("script");
        for child in &self.children {
            match child {
                Node::Element(e) => e.write_markup(out),
                Node::Text(t) if raw_text && needs_escape(t) && !t.contains("]]>") => {
                    out.push_str("<![CDATA[");
                    out.push_str(t);
                    out.push_str("]]>");
                }
                Node::Text(t) => out.push_str(&escape_text(t)),
                Node::Comment(c) => {
                    out.push_str("<!--");
                    out.push_str(c);
                    out.push_str("-->");
                }
            }
        }

        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

fn needs_escape(s: &str) -> bool {
    s.contains(|c| matches!(c, '&' | '<' | '>'))
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attribute(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
