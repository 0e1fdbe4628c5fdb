//! Arena-backed node tree.
//!
//! Nodes are never freed; removing a node only detaches it from its parent.

use super::parse::is_void;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
    /// Root of an isolated content subtree.
    Fragment,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_owned()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Comment(text.to_owned()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.push(NodeKind::Fragment)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node < self.nodes.len()
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node].kind
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node].children
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.nodes[node].kind, NodeKind::Element { .. })
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node].kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// No-op on non-element nodes.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[node].kind {
            match attributes.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_owned(),
                None => attributes.push((name.to_owned(), value.to_owned())),
            }
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[node].kind {
            attributes.retain(|(key, _)| key != name);
        }
    }

    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node].parent.take() {
            self.nodes[parent].children.retain(|&child| child != node);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Insert `nodes` in place of `anchor`, then detach `anchor`.
    pub fn replace_with(&mut self, anchor: NodeId, nodes: &[NodeId]) {
        let Some(parent) = self.nodes[anchor].parent else {
            return;
        };
        for &node in nodes {
            self.detach(node);
            self.nodes[node].parent = Some(parent);
        }
        let siblings = &mut self.nodes[parent].children;
        if let Some(index) = siblings.iter().position(|&child| child == anchor) {
            siblings.splice(index..=index, nodes.iter().copied());
        }
        self.nodes[anchor].parent = None;
    }

    /// Descendants of `root` in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[root].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node].children.iter().rev().copied());
        }
        out
    }

    pub fn text_content(&self, node: NodeId) -> String {
        match &self.nodes[node].kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Comment(_) => String::new(),
            _ => self.nodes[node]
                .children
                .iter()
                .map(|&child| self.text_content(child))
                .collect(),
        }
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        self.nodes[node]
            .children
            .iter()
            .map(|&child| self.outer_html(child))
            .collect()
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        match &self.nodes[node].kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Comment(text) => format!("<!--{text}-->"),
            NodeKind::Fragment => self.inner_html(node),
            NodeKind::Element { tag, attributes } => {
                let mut html = format!("<{tag}");
                for (name, value) in attributes {
                    html.push_str(&format!(" {name}=\"{value}\""));
                }
                html.push('>');
                if is_void(tag) {
                    return html;
                }
                html.push_str(&self.inner_html(node));
                html.push_str(&format!("</{tag}>"));
                html
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_with_splices_in_place() {
        let mut tree = Tree::default();
        let root = tree.create_element("div");
        let a = tree.create_text("a");
        let b = tree.create_text("b");
        let c = tree.create_text("c");
        tree.append_child(root, a);
        tree.append_child(root, b);
        tree.append_child(root, c);

        let x = tree.create_element("x");
        let y = tree.create_element("y");
        tree.replace_with(b, &[x, y]);

        assert_eq!(tree.inner_html(root), "a<x></x><y></y>c");
        assert_eq!(tree.parent(b), None);
        assert_eq!(tree.parent(x), Some(root));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let mut tree = Tree::default();
        let root = tree.create_fragment();
        let p = tree.create_element("p");
        let b = tree.create_element("b");
        let i = tree.create_element("i");
        tree.append_child(root, p);
        tree.append_child(p, b);
        tree.append_child(root, i);
        assert_eq!(tree.descendants(root), vec![p, b, i]);
    }
}
