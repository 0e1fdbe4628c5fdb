//! In-memory DOM host.
//!
//! A `MemoryHost` is one custom element living in its own arena tree:
//! the element itself (attributes and light-DOM children), an optional
//! content subtree created from the component template, and a registry of
//! element types that get upgraded to components when they appear in that
//! subtree. Tests and the native demo drive components through it.

mod parse;
mod selector;
mod tree;

use std::rc::Rc;

use rustc_hash::FxHashMap;

pub use selector::Selector;
pub use tree::{NodeId, NodeKind, Tree};

use crate::error::HostError;
use crate::host::{EventTarget, Host, Notification, Slot, Template};
use crate::state::ChildRef;

type ElementFactory = Box<dyn Fn() -> ChildRef>;

/// Element types known to the in-memory document, by tag name.
#[derive(Default)]
pub struct ElementRegistry {
    factories: FxHashMap<String, ElementFactory>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tag`; every instance is created by calling `factory`.
    pub fn define<F>(&mut self, tag: &str, factory: F)
    where
        F: Fn() -> ChildRef + 'static,
    {
        self.factories.insert(tag.to_ascii_lowercase(), Box::new(factory));
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    fn create(&self, tag: &str) -> Option<ChildRef> {
        self.factories.get(tag).map(|factory| factory())
    }
}

pub struct MemoryHost {
    tree: Tree,
    element: NodeId,
    content: Option<NodeId>,
    registry: Rc<ElementRegistry>,
    upgraded: FxHashMap<NodeId, ChildRef>,
    listening: Vec<String>,
    notifications: Vec<Notification>,
}

impl MemoryHost {
    pub fn new(tag: &str) -> Self {
        Self::with_registry(tag, Rc::new(ElementRegistry::new()))
    }

    pub fn with_registry(tag: &str, registry: Rc<ElementRegistry>) -> Self {
        let mut tree = Tree::default();
        let element = tree.create_element(tag);
        Self {
            tree,
            element,
            content: None,
            registry,
            upgraded: FxHashMap::default(),
            listening: Vec::new(),
            notifications: Vec::new(),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The host element node.
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Root of the content subtree, once a template has been attached.
    pub fn content(&self) -> Option<NodeId> {
        self.content
    }

    /// Replace the light-DOM children with parsed `html`.
    pub fn set_inner_html(&mut self, html: &str) -> Result<(), HostError> {
        for child in self.tree.children(self.element).to_vec() {
            self.tree.detach(child);
        }
        let nodes = parse::parse_fragment(&mut self.tree, html)?;
        for node in nodes {
            self.tree.append_child(self.element, node);
        }
        Ok(())
    }

    pub fn inner_html(&self) -> String {
        self.tree.inner_html(self.element)
    }

    pub fn content_html(&self) -> Option<String> {
        self.content.map(|root| self.tree.inner_html(root))
    }

    /// First content-subtree element matching `selector`.
    pub fn query_content(&self, selector: &str) -> Option<NodeId> {
        let root = self.content?;
        Selector::parse(selector)?.find(&self.tree, root)
    }

    /// Target of an event landing on `node`.
    ///
    /// The name is the node's own; the id is the one of the closest element
    /// at or above `node` that has one, so a click on an icon inside a menu
    /// entry reports the entry's id.
    pub fn event_target(&self, node: NodeId) -> EventTarget {
        let mut target = EventTarget::new(self.tree.tag(node).unwrap_or("#text"));
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if let Some(id) = self.tree.attribute(current, "id").filter(|id| !id.is_empty()) {
                target.id = Some(id.to_owned());
                break;
            }
            cursor = self.tree.parent(current);
        }
        target
    }

    /// Attribute of a content-subtree element.
    pub fn content_attribute(&self, selector: &str, name: &str) -> Option<&str> {
        let node = self.query_content(selector)?;
        self.tree.attribute(node, name)
    }

    pub fn set_content_attribute(&mut self, selector: &str, name: &str, value: &str) -> Result<(), HostError> {
        let node = self.query_content(selector).ok_or(HostError::UnknownNode)?;
        self.tree.set_attribute(node, name, value);
        Ok(())
    }

    pub fn remove_content_attribute(&mut self, selector: &str, name: &str) -> Result<(), HostError> {
        let node = self.query_content(selector).ok_or(HostError::UnknownNode)?;
        self.tree.remove_attribute(node, name);
        Ok(())
    }

    /// Events the component asked to receive.
    pub fn listening(&self) -> &[String] {
        &self.listening
    }

    pub fn is_listening(&self, event: &str) -> bool {
        self.listening.iter().any(|e| e == event)
    }

    /// Notifications emitted so far, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    fn upgrade_subtree(&mut self, root: NodeId) {
        for node in self.tree.descendants(root) {
            let Some(tag) = self.tree.tag(node) else {
                continue;
            };
            if let Some(component) = self.registry.create(tag) {
                self.upgraded.insert(node, component);
            }
        }
    }

    fn check(&self, node: NodeId) -> Result<(), HostError> {
        if self.tree.contains(node) {
            Ok(())
        } else {
            Err(HostError::UnknownNode)
        }
    }
}

impl Host for MemoryHost {
    type Node = NodeId;

    fn attribute(&self, name: &str) -> Option<String> {
        self.tree.attribute(self.element, name).map(str::to_owned)
    }

    fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), HostError> {
        self.tree.set_attribute(self.element, name, value);
        Ok(())
    }

    fn remove_attribute(&mut self, name: &str) -> Result<(), HostError> {
        self.tree.remove_attribute(self.element, name);
        Ok(())
    }

    fn attach_content(&mut self, template: &Template) -> Result<(), HostError> {
        let root = self.tree.create_fragment();
        for node in parse::parse_fragment(&mut self.tree, &template.markup())? {
            self.tree.append_child(root, node);
        }
        self.content = Some(root);
        self.upgrade_subtree(root);
        Ok(())
    }

    fn child_component(&self, selector: &str) -> Option<ChildRef> {
        let node = self.query_content(selector)?;
        self.upgraded.get(&node).cloned()
    }

    fn slot_occupants(&self, slot: &Slot) -> Vec<NodeId> {
        match slot {
            Slot::Named(name) => self
                .tree
                .descendants(self.element)
                .into_iter()
                .filter(|&node| self.tree.is_element(node) && self.tree.attribute(node, "slot") == Some(name.as_str()))
                .collect(),
            Slot::Default => self
                .tree
                .children(self.element)
                .iter()
                .copied()
                .filter(|&child| !self.tree.is_element(child) || self.tree.attribute(child, "slot").is_none())
                .collect(),
        }
    }

    fn parse_fragment(&mut self, html: &str) -> Result<Vec<NodeId>, HostError> {
        parse::parse_fragment(&mut self.tree, html)
    }

    fn is_element(&self, node: &NodeId) -> bool {
        self.tree.contains(*node) && self.tree.is_element(*node)
    }

    fn set_node_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), HostError> {
        self.check(*node)?;
        self.tree.set_attribute(*node, name, value);
        Ok(())
    }

    fn remove_node(&mut self, node: &NodeId) -> Result<(), HostError> {
        self.check(*node)?;
        self.tree.detach(*node);
        Ok(())
    }

    fn replace_with(&mut self, anchor: &NodeId, nodes: Vec<NodeId>) -> Result<(), HostError> {
        self.check(*anchor)?;
        self.tree.replace_with(*anchor, &nodes);
        Ok(())
    }

    fn append_nodes(&mut self, nodes: Vec<NodeId>) -> Result<(), HostError> {
        for node in nodes {
            self.check(node)?;
            self.tree.append_child(self.element, node);
        }
        Ok(())
    }

    fn listen(&mut self, event: &str) {
        if !self.is_listening(event) {
            self.listening.push(event.to_owned());
        }
    }

    fn emit(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}
