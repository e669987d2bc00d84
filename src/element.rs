// In-memory XML element used to assemble request documents
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Result, UpsError};

// An attribute-free XML element.
// A node is either a text leaf or a container of child elements. Setting
// text drops any children and appending a child drops any text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementNode {
    tag: String,
    children: Vec<ElementNode>,
    text: Option<String>,
}

impl ElementNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            children: Vec::new(),
            text: None,
        }
    }

    // Leaf element holding a single text value
    pub fn leaf(tag: impl Into<String>, value: impl Into<String>) -> Self {
        let mut node = Self::new(tag);
        node.set_text(value);
        node
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[ElementNode] {
        &self.children
    }

    pub fn append_child(&mut self, child: ElementNode) {
        self.text = None;
        self.children.push(child);
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        self.children.clear();
        self.text = Some(value.into());
    }

    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.append_child(child);
        self
    }

    pub fn with_value(self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_child(Self::leaf(tag, value))
    }

    pub fn with_optional_value(self, tag: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.with_value(tag, value),
            None => self,
        }
    }

    // Most recently appended child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&ElementNode> {
        self.children.iter().rev().find(|c| c.tag == tag)
    }

    pub fn child_mut(&mut self, tag: &str) -> Option<&mut ElementNode> {
        self.children.iter_mut().rev().find(|c| c.tag == tag)
    }

    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a ElementNode> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    // Walks (and creates where missing) a chain of containers below this node
    pub(crate) fn descend_or_create(&mut self, path: &[&str]) -> &mut ElementNode {
        let mut node = self;
        for tag in path {
            let index = match node.children.iter().rposition(|c| c.tag == *tag) {
                Some(index) => index,
                None => {
                    node.append_child(ElementNode::new(*tag));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }
        node
    }

    // Element markup without an XML declaration.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer)?;
        into_string(writer)
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let tag = self.tag.as_str();
        match (&self.text, self.children.is_empty()) {
            (None, true) => write(writer, Event::Empty(BytesStart::new(tag))),
            (Some(text), _) => {
                write(writer, Event::Start(BytesStart::new(tag)))?;
                write(writer, Event::Text(BytesText::new(text)))?;
                write(writer, Event::End(BytesEnd::new(tag)))
            }
            (None, false) => {
                write(writer, Event::Start(BytesStart::new(tag)))?;
                for child in &self.children {
                    child.write_to(writer)?;
                }
                write(writer, Event::End(BytesEnd::new(tag)))
            }
        }
    }
}

// Serializes `node` as a standalone document: declaration followed by the
// element, with no whitespace between them.
pub fn serialize(node: &ElementNode) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", None, None)),
    )?;
    node.write_to(&mut writer)?;
    into_string(writer)
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| UpsError::Serialization(e.to_string()))
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(writer.into_inner()).map_err(|e| UpsError::Serialization(e.to_string()))
}
