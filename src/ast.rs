use crate::state::RefDef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column alignment of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// Payload of a node produced by a user-defined rule: a tag plus a string
/// data map and child nodes. When a rule's parse function leaves `kind`
/// empty, the dispatcher fills it with the rule name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomNode {
    pub kind: String,
    pub data: HashMap<String, String>,
    pub children: Vec<Node>,
}

/// A parsed AST node.
///
/// The variant is the rule-name tag: [`Node::kind`] returns it as the string
/// the rule table is keyed by, which is how the output dispatcher finds the
/// matching output function. Nodes are plain values; reference links and
/// images are created without a target and patched after the parse
/// completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Text {
        content: String,
    },
    Heading {
        level: usize,
        content: Vec<Node>,
    },
    Hr,
    CodeBlock {
        lang: Option<String>,
        content: String,
    },
    BlockQuote {
        content: Vec<Node>,
    },
    List {
        ordered: bool,
        start: Option<u32>,
        items: Vec<Vec<Node>>,
    },
    Def {
        def: String,
        target: String,
        title: Option<String>,
    },
    Table {
        header: Vec<Vec<Node>>,
        align: Vec<Option<Align>>,
        cells: Vec<Vec<Vec<Node>>>,
    },
    /// Transient cell divider produced only while parsing table rows; never
    /// rendered.
    TableSeparator,
    Newline,
    Paragraph {
        content: Vec<Node>,
    },
    Link {
        content: Vec<Node>,
        target: Option<String>,
        title: Option<String>,
        /// Canonical key of the reference this link was written with, when
        /// it came from a `[text][ref]` form.
        reference: Option<String>,
    },
    Image {
        alt: String,
        target: Option<String>,
        title: Option<String>,
        reference: Option<String>,
    },
    Em {
        content: Vec<Node>,
    },
    Strong {
        content: Vec<Node>,
    },
    U {
        content: Vec<Node>,
    },
    Del {
        content: Vec<Node>,
    },
    InlineCode {
        content: String,
    },
    Br,
    Custom(CustomNode),
}

impl Node {
    /// Convenience constructor for the most common node.
    pub fn text(content: impl Into<String>) -> Node {
        Node::Text {
            content: content.into(),
        }
    }

    /// The rule-name tag of this node.
    pub fn kind(&self) -> &str {
        match self {
            Node::Text { .. } => "text",
            Node::Heading { .. } => "heading",
            Node::Hr => "hr",
            Node::CodeBlock { .. } => "codeBlock",
            Node::BlockQuote { .. } => "blockQuote",
            Node::List { .. } => "list",
            Node::Def { .. } => "def",
            Node::Table { .. } => "table",
            Node::TableSeparator => "tableSeparator",
            Node::Newline => "newline",
            Node::Paragraph { .. } => "paragraph",
            Node::Link { .. } => "link",
            Node::Image { .. } => "image",
            Node::Em { .. } => "em",
            Node::Strong { .. } => "strong",
            Node::U { .. } => "u",
            Node::Del { .. } => "del",
            Node::InlineCode { .. } => "inlineCode",
            Node::Br => "br",
            Node::Custom(custom) => &custom.kind,
        }
    }
}

/// Fills `target` and `title` on reference links and images from the
/// collected definitions. Runs once over the finished tree at the end of
/// each top-level parse, so definitions apply to references on either side
/// of them; the last definition of a key wins for every reference.
pub(crate) fn patch_references(nodes: &mut [Node], defs: &HashMap<String, RefDef>) {
    for node in nodes.iter_mut() {
        match node {
            Node::Link {
                content,
                target,
                title,
                reference,
            } => {
                if let Some(def) = reference.as_ref().and_then(|key| defs.get(key)) {
                    *target = Some(def.target.clone());
                    *title = def.title.clone();
                }
                patch_references(content, defs);
            }
            Node::Image {
                target,
                title,
                reference,
                ..
            } => {
                if let Some(def) = reference.as_ref().and_then(|key| defs.get(key)) {
                    *target = Some(def.target.clone());
                    *title = def.title.clone();
                }
            }
            Node::Heading { content, .. }
            | Node::Paragraph { content }
            | Node::BlockQuote { content }
            | Node::Em { content }
            | Node::Strong { content }
            | Node::U { content }
            | Node::Del { content } => patch_references(content, defs),
            Node::List { items, .. } => {
                for item in items {
                    patch_references(item, defs);
                }
            }
            Node::Table { header, cells, .. } => {
                for cell in header.iter_mut() {
                    patch_references(cell, defs);
                }
                for row in cells.iter_mut() {
                    for cell in row.iter_mut() {
                        patch_references(cell, defs);
                    }
                }
            }
            Node::Custom(custom) => patch_references(&mut custom.children, defs),
            _ => {}
        }
    }
}
