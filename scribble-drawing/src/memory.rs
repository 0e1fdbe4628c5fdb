//! In-memory drawing host: a [`MemoryHost`] plus a recording canvas.

use std::cell::RefCell;
use std::rc::Rc;

use scribble_component::dom::NodeId;
use scribble_component::{ChildRef, Host, HostError, MemoryHost, Notification, Slot, Template};

use crate::canvas::{Canvas, RecordingCanvas};
use crate::overlay::DrawingHost;
use crate::template::{CANVAS_SELECTOR, COLOR_INDICATOR_ID, MENU_CHECKBOX_ID};

pub struct MemoryDrawingHost {
    inner: MemoryHost,
    canvas: Rc<RefCell<RecordingCanvas>>,
}

impl MemoryDrawingHost {
    pub fn new(canvas: RecordingCanvas) -> Self {
        Self {
            inner: MemoryHost::new(crate::overlay::ELEMENT_NAME),
            canvas: Rc::new(RefCell::new(canvas)),
        }
    }

    pub fn inner(&self) -> &MemoryHost {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut MemoryHost {
        &mut self.inner
    }

    pub fn recording(&self) -> Rc<RefCell<RecordingCanvas>> {
        Rc::clone(&self.canvas)
    }

    /// Whether the menu toggle is checked.
    pub fn menu_open(&self) -> bool {
        self.inner
            .content_attribute(&format!("#{MENU_CHECKBOX_ID}"), "checked")
            .is_some()
    }

    /// Open the menu the way a click on its toggle does.
    pub fn open_menu(&mut self) -> Result<(), HostError> {
        self.inner
            .set_content_attribute(&format!("#{MENU_CHECKBOX_ID}"), "checked", "")
    }

    /// Inline style of the colour indicator.
    pub fn indicator_style(&self) -> Option<&str> {
        self.inner
            .content_attribute(&format!("#{COLOR_INDICATOR_ID}"), "style")
    }
}

impl Host for MemoryDrawingHost {
    type Node = NodeId;

    fn attribute(&self, name: &str) -> Option<String> {
        self.inner.attribute(name)
    }

    fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), HostError> {
        self.inner.set_attribute(name, value)
    }

    fn remove_attribute(&mut self, name: &str) -> Result<(), HostError> {
        self.inner.remove_attribute(name)
    }

    fn attach_content(&mut self, template: &Template) -> Result<(), HostError> {
        self.inner.attach_content(template)
    }

    fn child_component(&self, selector: &str) -> Option<ChildRef> {
        self.inner.child_component(selector)
    }

    fn slot_occupants(&self, slot: &Slot) -> Vec<NodeId> {
        self.inner.slot_occupants(slot)
    }

    fn parse_fragment(&mut self, html: &str) -> Result<Vec<NodeId>, HostError> {
        self.inner.parse_fragment(html)
    }

    fn is_element(&self, node: &NodeId) -> bool {
        self.inner.is_element(node)
    }

    fn set_node_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), HostError> {
        self.inner.set_node_attribute(node, name, value)
    }

    fn remove_node(&mut self, node: &NodeId) -> Result<(), HostError> {
        self.inner.remove_node(node)
    }

    fn replace_with(&mut self, anchor: &NodeId, nodes: Vec<NodeId>) -> Result<(), HostError> {
        self.inner.replace_with(anchor, nodes)
    }

    fn append_nodes(&mut self, nodes: Vec<NodeId>) -> Result<(), HostError> {
        self.inner.append_nodes(nodes)
    }

    fn listen(&mut self, event: &str) {
        self.inner.listen(event);
    }

    fn emit(&mut self, notification: Notification) {
        self.inner.emit(notification);
    }
}

impl DrawingHost for MemoryDrawingHost {
    fn canvas(&self) -> Option<Rc<RefCell<dyn Canvas>>> {
        self.inner.query_content(CANVAS_SELECTOR)?;
        let canvas: Rc<RefCell<dyn Canvas>> = self.canvas.clone();
        Some(canvas)
    }

    fn set_indicator_color(&mut self, color: &str) -> Result<(), HostError> {
        self.inner.set_content_attribute(
            &format!("#{COLOR_INDICATOR_ID}"),
            "style",
            &format!("background-color: {color}"),
        )
    }

    fn close_menu(&mut self) -> Result<(), HostError> {
        self.inner
            .remove_content_attribute(&format!("#{MENU_CHECKBOX_ID}"), "checked")
    }
}
