//! Literal YAML syntax tree with source offsets.
//!
//! Built from yaml-rust2's marked event stream. The tree knows nothing about
//! workflows: it only records mappings, sequences and scalars together with the
//! character offset at which each one starts.
//!
//! Offsets are rebuilt from the scanner's line and column. `Marker::index()`
//! advances by bytes inside block scalars, so it drifts after multi-byte text.

use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::Marker;

use super::position::PositionIndex;
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Character offset of the first character of this node.
    pub offset: usize,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Scalar(String),
    Sequence(Vec<Node>),
    Mapping(Vec<Entry>),
    /// `*anchor` reference. Aliases are not expanded.
    Alias,
}

/// One `key: value` pair of a mapping, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: Node,
    pub value: Node,
}

impl Node {
    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, NodeKind::Sequence(_))
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Mapping entries, or an empty slice for any other node.
    pub fn entries(&self) -> &[Entry] {
        match &self.kind {
            NodeKind::Mapping(entries) => entries,
            _ => &[],
        }
    }

    /// Sequence items, or an empty slice for any other node.
    pub fn items(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Sequence(items) => items,
            _ => &[],
        }
    }

    /// First entry whose key is the scalar `key`.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries()
            .iter()
            .find(|e| e.key.as_scalar() == Some(key))
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entry(key).map(|e| &e.value)
    }
}

/// Parse the first YAML document of `source` into a [`Node`] tree.
///
/// `index` must be built from the same `source`.
pub fn parse(source: &str, index: &PositionIndex) -> Result<Node, ParseError> {
    let mut parser = Parser::new_from_str(source);
    let mut builder = TreeBuilder::new(index);

    parser
        .load(&mut builder, false)
        .map_err(|e| ParseError::ast("A001", format!("Failed to scan YAML: {}", e)))?;

    builder.finish()
}

struct TreeBuilder<'a> {
    index: &'a PositionIndex,
    stack: Vec<Open>,
    root: Option<Node>,
    error: Option<String>,
}

/// A collection whose end event has not arrived yet.
enum Open {
    Sequence {
        offset: usize,
        items: Vec<Node>,
    },
    Mapping {
        offset: usize,
        entries: Vec<Entry>,
        pending_key: Option<Node>,
    },
}

impl<'a> TreeBuilder<'a> {
    fn new(index: &'a PositionIndex) -> Self {
        TreeBuilder {
            index,
            stack: Vec::new(),
            root: None,
            error: None,
        }
    }

    fn offset(&self, marker: &Marker) -> usize {
        self.index.line_col_to_index(marker.line(), marker.col())
    }

    fn finish(self) -> Result<Node, ParseError> {
        if let Some(message) = self.error {
            return Err(ParseError::ast("A001", message));
        }
        self.root
            .ok_or_else(|| ParseError::ast("A001", "No YAML document found"))
    }

    fn push_complete(&mut self, node: Node) {
        match self.stack.last_mut() {
            // Only the first document is kept.
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(Open::Sequence { items, .. }) => items.push(node),
            Some(Open::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => entries.push(Entry { key, value: node }),
                None => *pending_key = Some(node),
            },
        }
    }

    fn fail(&mut self, message: &str) {
        if self.error.is_none() {
            self.error = Some(message.to_string());
        }
    }
}

impl MarkedEventReceiver for TreeBuilder<'_> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        let offset = self.offset(&marker);
        match ev {
            Event::Scalar(value, ..) => self.push_complete(Node {
                offset,
                kind: NodeKind::Scalar(value),
            }),
            Event::Alias(..) => self.push_complete(Node {
                offset,
                kind: NodeKind::Alias,
            }),
            Event::SequenceStart(..) => self.stack.push(Open::Sequence {
                offset,
                items: Vec::new(),
            }),
            Event::MappingStart(..) => self.stack.push(Open::Mapping {
                offset,
                entries: Vec::new(),
                pending_key: None,
            }),
            Event::SequenceEnd => match self.stack.pop() {
                Some(Open::Sequence { offset, items }) => self.push_complete(Node {
                    offset,
                    kind: NodeKind::Sequence(items),
                }),
                _ => self.fail("Sequence end without a matching start"),
            },
            Event::MappingEnd => match self.stack.pop() {
                Some(Open::Mapping {
                    offset,
                    entries,
                    pending_key: None,
                }) => self.push_complete(Node {
                    offset,
                    kind: NodeKind::Mapping(entries),
                }),
                Some(Open::Mapping { .. }) => self.fail("Mapping key without a value"),
                _ => self.fail("Mapping end without a matching start"),
            },
            _ => {}
        }
    }
}
