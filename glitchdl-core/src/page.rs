// Mutable document tree for a fetched page

use html5ever::driver::{self, ParseOpts};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use scraper::{Html, HtmlTreeSink, Node};
use std::collections::HashMap;
use tracing::debug;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Index of a node in a [`Page`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Namespace an element was parsed into. Inline `<svg>` and `<math>`
/// subtrees are foreign content and follow different text rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementNamespace {
    Html,
    Svg,
    MathMl,
    Other,
}

impl ElementNamespace {
    fn from_uri(uri: &str) -> Self {
        match uri {
            HTML_NAMESPACE => Self::Html,
            SVG_NAMESPACE => Self::Svg,
            MATHML_NAMESPACE => Self::MathMl,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    Element {
        name: String,
        namespace: ElementNamespace,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct PageNode {
    pub data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl PageNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A parsed HTML document stored as an arena of nodes.
///
/// Nodes are stored in document order (pre-order) and are never inserted or
/// removed after parsing; only element attributes change. That keeps every
/// untouched part of the page exactly as the parser produced it.
#[derive(Debug, Clone)]
pub struct Page {
    nodes: Vec<PageNode>,
    warnings: Vec<String>,
}

impl Page {
    /// Parse an HTML document. Never fails: malformed markup is repaired by
    /// the parser and each repair is recorded as a warning.
    ///
    /// Scripting is off, so `<noscript>` content is parsed as markup and the
    /// elements inside it can be found.
    pub fn parse(source: &str) -> Self {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                scripting_enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let html =
            driver::parse_document(HtmlTreeSink::new(Html::new_document()), opts).one(source);

        let mut page = Page {
            nodes: Vec::new(),
            warnings: html.errors.iter().map(|e| e.to_string()).collect(),
        };

        // Maps parser node ids to arena ids
        let mut ids = HashMap::new();

        for node in html.tree.root().descendants() {
            let data = match node.value() {
                Node::Document => NodeData::Document,
                Node::Doctype(doctype) => NodeData::Doctype {
                    name: doctype.name().to_string(),
                    public_id: doctype.public_id().to_string(),
                    system_id: doctype.system_id().to_string(),
                },
                Node::Element(element) => NodeData::Element {
                    name: element.name().to_string(),
                    namespace: ElementNamespace::from_uri(&element.name.ns),
                    attrs: element
                        .attrs()
                        .map(|(name, value)| (name.to_string(), value.to_string()))
                        .collect(),
                },
                Node::Text(text) => NodeData::Text(String::from(&**text)),
                Node::Comment(comment) => NodeData::Comment(String::from(&**comment)),
                // Fragments are transparent: their children attach to the nearest kept ancestor
                Node::Fragment | Node::ProcessingInstruction(_) => continue,
            };

            let parent = node
                .ancestors()
                .find_map(|ancestor| ids.get(&ancestor.id()).copied());
            let id = page.push(data, parent);
            ids.insert(node.id(), id);
        }

        if !page.warnings.is_empty() {
            debug!("Parser recovered from {} markup issue(s)", page.warnings.len());
            for warning in &page.warnings {
                debug!("  parse warning: {}", warning);
            }
        }

        page
    }

    fn push(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(PageNode {
            data,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> Option<&PageNode> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Markup problems the parser recovered from.
    pub fn parse_warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn namespace(&self, id: NodeId) -> Option<ElementNamespace> {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Element { namespace, .. }) => Some(*namespace),
            _ => None,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Element { name, .. }) => Some(name),
            _ => None,
        }
    }

    /// All elements whose tag name is one of `tags`, in document order.
    pub fn elements_by_tag(&self, tags: &[&str]) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| match &node.data {
                NodeData::Element { name, .. } if tags.contains(&name.as_str()) => {
                    Some(NodeId(index))
                }
                _ => None,
            })
            .collect()
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Element { attrs, .. }) => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// Set an attribute on an element, replacing the value in place if it
    /// exists. Returns false when `id` is not an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        let Some(NodeData::Element { attrs, .. }) = self.nodes.get_mut(id.0).map(|n| &mut n.data)
        else {
            return false;
        };

        let value = value.into();
        match attrs.iter().position(|(key, _)| key == name) {
            Some(index) => attrs[index].1 = value,
            None => attrs.push((name.to_string(), value)),
        }
        true
    }
}
