//! The seam between the component engine and a concrete DOM.
//!
//! The engine never touches a DOM directly. It composes the primitive
//! operations below; an adapter implements them for whatever tree the
//! component lives in (the in-memory [`dom`](crate::dom) tree, or the
//! browser behind the `web` feature).

use crate::error::HostError;
use crate::state::ChildRef;

/// Name of the implicit slot holding every non-slotted child node.
pub const DEFAULT_SLOT: &str = "default";

/// A region of the component's light DOM refilled from state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// All child nodes without a `slot` attribute.
    Default,
    /// Elements tagged `slot="<name>"`.
    Named(String),
}

impl Slot {
    pub fn name(&self) -> &str {
        match self {
            Slot::Default => DEFAULT_SLOT,
            Slot::Named(name) => name,
        }
    }
}

impl From<&str> for Slot {
    fn from(name: &str) -> Self {
        if name == DEFAULT_SLOT {
            Slot::Default
        } else {
            Slot::Named(name.to_owned())
        }
    }
}

/// Markup instantiated into each instance's isolated content subtree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    pub html: String,
    pub style: String,
}

impl Template {
    /// The style sheet followed by the template body.
    pub fn markup(&self) -> String {
        format!("<style>{}</style>{}", self.style, self.html)
    }
}

/// Bubbling notifications a component emits on its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Upgraded,
    Connected,
    Disconnected,
}

impl Notification {
    pub fn event_name(self) -> &'static str {
        match self {
            Notification::Upgraded => "upgraded",
            Notification::Connected => "connected",
            Notification::Disconnected => "disconnected",
        }
    }
}

/// The element an input event was dispatched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTarget {
    /// Uppercase node name, e.g. `CANVAS`.
    pub node_name: String,
    pub id: Option<String>,
}

impl EventTarget {
    pub fn new(node_name: &str) -> Self {
        Self {
            node_name: node_name.to_ascii_uppercase(),
            id: None,
        }
    }

    pub fn with_id(node_name: &str, id: &str) -> Self {
        Self {
            node_name: node_name.to_ascii_uppercase(),
            id: Some(id.to_owned()),
        }
    }

    pub fn is(&self, node_name: &str) -> bool {
        self.node_name.eq_ignore_ascii_case(node_name)
    }
}

/// One pointer position in client (viewport) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerInput {
    pub client_x: f64,
    pub client_y: f64,
    pub target: Option<EventTarget>,
}

/// A DOM input event, reduced to what listeners consume.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: String,
    /// Set for mouse-family events.
    pub pointer: Option<PointerInput>,
    /// Active touch points for touch-family events.
    pub touches: Vec<PointerInput>,
}

impl Event {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_owned(),
            pointer: None,
            touches: Vec::new(),
        }
    }

    pub fn mouse(kind: &str, client_x: f64, client_y: f64, target: Option<EventTarget>) -> Self {
        Self {
            pointer: Some(PointerInput { client_x, client_y, target }),
            ..Self::new(kind)
        }
    }

    pub fn touch(kind: &str, touches: Vec<PointerInput>) -> Self {
        Self {
            touches,
            ..Self::new(kind)
        }
    }

    /// Target of the pointer, if this is a mouse-family event.
    pub fn target(&self) -> Option<&EventTarget> {
        self.pointer.as_ref().and_then(|p| p.target.as_ref())
    }
}

/// What a listener did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerOutcome {
    /// Stop propagation and suppress default handling.
    Handled,
    /// Let the event continue.
    Pass,
}

/// Aggregate result of dispatching an event to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// No listener is installed for the event.
    Ignored,
    Passed,
    Handled,
}

/// DOM operations the engine is built from.
pub trait Host {
    type Node: Clone;

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), HostError>;
    fn remove_attribute(&mut self, name: &str) -> Result<(), HostError>;

    /// Instantiate `template` into the isolated content subtree.
    fn attach_content(&mut self, template: &Template) -> Result<(), HostError>;

    /// The component mounted on the first content element matching `selector`.
    fn child_component(&self, selector: &str) -> Option<ChildRef>;

    /// Nodes currently occupying `slot`, in document order.
    fn slot_occupants(&self, slot: &Slot) -> Vec<Self::Node>;

    /// Parse `html` into detached top-level nodes.
    fn parse_fragment(&mut self, html: &str) -> Result<Vec<Self::Node>, HostError>;

    fn is_element(&self, node: &Self::Node) -> bool;
    fn set_node_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<(), HostError>;
    fn remove_node(&mut self, node: &Self::Node) -> Result<(), HostError>;

    /// Put `nodes` where `anchor` is and detach `anchor`.
    fn replace_with(&mut self, anchor: &Self::Node, nodes: Vec<Self::Node>) -> Result<(), HostError>;

    /// Append `nodes` as the last children of the host element.
    fn append_nodes(&mut self, nodes: Vec<Self::Node>) -> Result<(), HostError>;

    /// Start forwarding `event` to the component.
    fn listen(&mut self, event: &str);

    fn emit(&mut self, notification: Notification);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_from_name() {
        assert_eq!(Slot::from("default"), Slot::Default);
        assert_eq!(Slot::from("title"), Slot::Named("title".into()));
        assert_eq!(Slot::Named("x".into()).name(), "x");
    }

    #[test]
    fn test_template_markup_prepends_style() {
        let template = Template {
            html: "<p>hi</p>".into(),
            style: "p { color: red }".into(),
        };
        assert_eq!(template.markup(), "<style>p { color: red }</style><p>hi</p>");
    }

    #[test]
    fn test_event_target_matching_ignores_case() {
        let event = Event::mouse("mousedown", 1.0, 2.0, Some(EventTarget::new("canvas")));
        assert!(event.target().unwrap().is("CANVAS"));
        assert!(Event::touch("touchstart", Vec::new()).target().is_none());
    }
}
