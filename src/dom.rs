use std::collections::HashMap;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Document-relative vertical geometry for an element.
///
/// The runtime has no real layout engine; fixtures declare where elements sit
/// via `data-top` / `data-height` attributes (or [`crate::Page::set_rect`]),
/// and everything else defaults to a zero-sized rect at the top of the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub top: i64,
    pub height: i64,
}

impl Rect {
    pub fn bottom(&self) -> i64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) disabled: bool,
    pub(crate) rect: Rect,
}

pub(crate) fn class_tokens(attr: Option<&str>) -> Vec<String> {
    attr.map(|value| {
        value
            .split_ascii_whitespace()
            .map(|token| token.to_string())
            .collect()
    })
    .unwrap_or_default()
}

fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.remove("class");
    } else {
        element.attrs.insert("class".into(), classes.join(" "));
    }
}

fn rect_from_attrs(attrs: &HashMap<String, String>) -> Rect {
    let read = |key: &str| {
        attrs
            .get(key)
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(0)
    };
    Rect {
        top: read("data-top"),
        height: read("data-height"),
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    nodes: Vec<Node>,
    pub(crate) root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let id = self.create_detached_element(tag_name, attrs);
        self.append_child(parent, id);
        id
    }

    pub(crate) fn create_detached_element(
        &mut self,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let disabled = attrs.contains_key("disabled");
        let rect = rect_from_attrs(&attrs);
        let element = Element {
            tag_name,
            attrs,
            value,
            disabled,
            rect,
        };
        let id = self.push_node(Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Element(element),
        });
        self.register_id(id);
        id
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        let id = self.push_node(Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Text(text),
        });
        self.append_child(parent, id);
        id
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        self.register_id(child);
    }

    /// Attaches `node` as the next sibling of `anchor`.
    pub(crate) fn insert_after(&mut self, anchor: NodeId, node: NodeId) -> Result<()> {
        let parent = self
            .parent(anchor)
            .ok_or_else(|| Error::Runtime("insert_after anchor has no parent".into()))?;
        self.detach(node);
        self.nodes[node.0].parent = Some(parent);
        let children = &mut self.nodes[parent.0].children;
        let at = children
            .iter()
            .position(|child| *child == anchor)
            .map(|index| index + 1)
            .unwrap_or(children.len());
        children.insert(at, node);
        self.register_id(node);
        Ok(())
    }

    /// Unlinks a node from its parent. Arena slots are never reclaimed, so a
    /// detached node simply becomes unreachable from the tree. Freshly created
    /// nodes have no parent yet; detaching them must not disturb the id index.
    pub(crate) fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return;
        };
        self.nodes[parent.0].children.retain(|child| *child != node);
        if let Some(id_attr) = self
            .element(node)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            if self.id_index.get(&id_attr) == Some(&node) {
                self.id_index.remove(&id_attr);
            }
        }
    }

    fn register_id(&mut self, node: NodeId) {
        if let Some(id_attr) = self
            .element(node)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            self.id_index.insert(id_attr, node);
        }
    }

    pub(crate) fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|node| node.parent)
    }

    pub(crate) fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn element(&self, node: NodeId) -> Option<&Element> {
        match self.nodes.get(node.0).map(|node| &node.node_type) {
            Some(NodeType::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(node.0).map(|node| &mut node.node_type) {
            Some(NodeType::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.tag_name.as_str())
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub(crate) fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|element| element.attrs.get(name))
            .map(String::as_str)
    }

    pub(crate) fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        if name == "id" {
            if let Some(old) = self.attr(node, "id").map(str::to_string) {
                if self.id_index.get(&old) == Some(&node) {
                    self.id_index.remove(&old);
                }
            }
            self.id_index.insert(value.to_string(), node);
        }
        let element = self
            .element_mut(node)
            .ok_or_else(|| Error::Runtime(format!("setAttribute target is not an element: {name}")))?;
        element.attrs.insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub(crate) fn remove_attr(&mut self, node: NodeId, name: &str) -> Result<()> {
        let element = self
            .element_mut(node)
            .ok_or_else(|| Error::Runtime(format!("removeAttribute target is not an element: {name}")))?;
        element.attrs.remove(name);
        Ok(())
    }

    pub(crate) fn value(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.value.as_str())
    }

    pub(crate) fn set_value(&mut self, node: NodeId, value: &str) -> Result<()> {
        let element = self
            .element_mut(node)
            .ok_or_else(|| Error::Runtime("value target is not an element".into()))?;
        element.value = value.to_string();
        Ok(())
    }

    pub(crate) fn disabled(&self, node: NodeId) -> bool {
        self.element(node)
            .map(|element| element.disabled)
            .unwrap_or(false)
    }

    pub(crate) fn set_disabled(&mut self, node: NodeId, disabled: bool) -> Result<()> {
        let element = self
            .element_mut(node)
            .ok_or_else(|| Error::Runtime("disabled target is not an element".into()))?;
        element.disabled = disabled;
        if disabled {
            element.attrs.insert("disabled".into(), "true".into());
        } else {
            element.attrs.remove("disabled");
        }
        Ok(())
    }

    pub(crate) fn rect(&self, node: NodeId) -> Rect {
        self.element(node)
            .map(|element| element.rect)
            .unwrap_or_default()
    }

    pub(crate) fn set_rect(&mut self, node: NodeId, rect: Rect) -> Result<()> {
        let element = self
            .element_mut(node)
            .ok_or_else(|| Error::Runtime("rect target is not an element".into()))?;
        element.rect = rect;
        Ok(())
    }

    pub(crate) fn class_contains(&self, node: NodeId, class_name: &str) -> bool {
        self.element(node)
            .map(|element| {
                class_tokens(element.attrs.get("class").map(String::as_str))
                    .iter()
                    .any(|name| name == class_name)
            })
            .unwrap_or(false)
    }

    pub(crate) fn class_add(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node)
            .ok_or_else(|| Error::Runtime("classList target is not an element".into()))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_remove(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node)
            .ok_or_else(|| Error::Runtime("classList target is not an element".into()))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        classes.retain(|name| name != class_name);
        set_class_attr(element, &classes);
        Ok(())
    }

    /// Sets the class list membership to `on`, regardless of current state.
    pub(crate) fn class_set(&mut self, node: NodeId, class_name: &str, on: bool) -> Result<()> {
        if on {
            self.class_add(node, class_name)
        } else {
            self.class_remove(node, class_name)
        }
    }

    pub(crate) fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].node_type {
            NodeType::Text(text) => out.push_str(text),
            _ => {
                for child in self.nodes[node.0].children.clone() {
                    self.collect_text(child, out);
                }
            }
        }
    }

    pub(crate) fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<()> {
        if self.element(node).is_none() {
            return Err(Error::Runtime("textContent target is not an element".into()));
        }
        for child in self.nodes[node.0].children.clone() {
            self.detach(child);
        }
        if !text.is_empty() {
            self.create_text(node, text.to_string());
        }
        Ok(())
    }

    pub(crate) fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub(crate) fn collect_elements_dfs(&self, node: NodeId, out: &mut Vec<NodeId>) {
        if self.element(node).is_some() {
            out.push(node);
        }
        for child in self.children(node).to_vec() {
            self.collect_elements_dfs(child, out);
        }
    }

    pub(crate) fn collect_element_descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(node).to_vec() {
            self.collect_elements_dfs(child, out);
        }
    }

    /// Renders a node back to HTML for assertion failure snippets.
    pub(crate) fn dump(&self, node: NodeId) -> String {
        match &self.nodes[node.0].node_type {
            NodeType::Text(text) => text.clone(),
            NodeType::Document => {
                let mut out = String::new();
                for child in self.children(node) {
                    out.push_str(&self.dump(*child));
                }
                out
            }
            NodeType::Element(element) => {
                let mut out = format!("<{}", element.tag_name);
                let mut attrs: Vec<_> = element.attrs.iter().collect();
                attrs.sort();
                for (name, value) in attrs {
                    out.push_str(&format!(" {name}=\"{value}\""));
                }
                out.push('>');
                for child in self.children(node) {
                    out.push_str(&self.dump(*child));
                }
                out.push_str(&format!("</{}>", element.tag_name));
                out
            }
        }
    }
}
