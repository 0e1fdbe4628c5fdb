//! `Host` over a browser element (feature `web`).
//!
//! The element's custom-element callbacks forward to the matching
//! [`Component`] methods; [`mount`] routes the events the component listens
//! for from the DOM into [`Component::dispatch`]. Nested components are
//! found through a per-thread registry keyed by a generated element id.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CustomEvent, CustomEventInit, Element, EventTarget as DomEventTarget, HtmlElement, MouseEvent, Node,
    ShadowRoot, ShadowRootInit, ShadowRootMode, TouchEvent,
};

use crate::component::Component;
use crate::error::{ComponentError, HostError};
use crate::host::{Event, EventOutcome, EventTarget, Host, Notification, PointerInput, Slot, Template};
use crate::state::{ChildRef, State, StateSink};

const COMPONENT_ID_ATTR: &str = "data-scribble-id";

thread_local! {
    static MOUNTED: RefCell<FxHashMap<String, ChildRef>> = RefCell::new(FxHashMap::default());
}

fn js_error(err: JsValue) -> HostError {
    HostError::Dom(format!("{err:?}"))
}

/// Make `component` reachable from parents whose content contains `element`.
pub fn register(element: &Element, component: ChildRef) -> Result<(), HostError> {
    let id = uuid::Uuid::new_v4().to_string();
    element.set_attribute(COMPONENT_ID_ATTR, &id).map_err(js_error)?;
    MOUNTED.with(|mounted| mounted.borrow_mut().insert(id, component));
    Ok(())
}

pub fn unregister(element: &Element) {
    if let Some(id) = element.get_attribute(COMPONENT_ID_ATTR) {
        MOUNTED.with(|mounted| mounted.borrow_mut().remove(&id));
    }
}

/// Child binding that looks the component up on every delivery.
///
/// Until the nested element has registered, updates are dropped; the
/// parent re-pushes its state from [`Component::child_upgraded`].
struct LazyChild {
    element: Element,
}

impl StateSink for LazyChild {
    fn update_state(&mut self, update: State) -> Result<(), ComponentError> {
        let Some(id) = self.element.get_attribute(COMPONENT_ID_ATTR) else {
            return Ok(());
        };
        let Some(child) = MOUNTED.with(|mounted| mounted.borrow().get(&id).cloned()) else {
            return Ok(());
        };
        let result = child.borrow_mut().update_state(update);
        result
    }
}

pub struct ElementHost {
    element: HtmlElement,
    shadow: Option<ShadowRoot>,
    listening: Vec<String>,
}

impl ElementHost {
    pub fn new(element: HtmlElement) -> Self {
        Self {
            element,
            shadow: None,
            listening: Vec::new(),
        }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    pub fn shadow_root(&self) -> Option<&ShadowRoot> {
        self.shadow.as_ref()
    }

    /// First element in the shadow content matching `selector`.
    pub fn query_content(&self, selector: &str) -> Option<Element> {
        self.shadow.as_ref()?.query_selector(selector).ok().flatten()
    }

    pub fn listening(&self) -> &[String] {
        &self.listening
    }

    /// Where listeners are installed: the shadow root when there is one.
    fn event_root(&self) -> DomEventTarget {
        match &self.shadow {
            Some(shadow) => shadow.clone().unchecked_into(),
            None => self.element.clone().unchecked_into(),
        }
    }
}

impl Host for ElementHost {
    type Node = Node;

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), HostError> {
        self.element.set_attribute(name, value).map_err(js_error)
    }

    fn remove_attribute(&mut self, name: &str) -> Result<(), HostError> {
        self.element.remove_attribute(name).map_err(js_error)
    }

    fn attach_content(&mut self, template: &Template) -> Result<(), HostError> {
        let init = ShadowRootInit::new(ShadowRootMode::Open);
        let shadow = self.element.attach_shadow(&init).map_err(js_error)?;
        shadow.set_inner_html(&template.markup());
        self.shadow = Some(shadow);
        Ok(())
    }

    fn child_component(&self, selector: &str) -> Option<ChildRef> {
        let element = self.query_content(selector)?;
        Some(Rc::new(RefCell::new(LazyChild { element })))
    }

    fn slot_occupants(&self, slot: &Slot) -> Vec<Node> {
        match slot {
            Slot::Named(name) => match self.element.query_selector_all("[slot]") {
                Ok(list) => (0..list.length())
                    .filter_map(|i| list.item(i))
                    .filter(|node| {
                        node.dyn_ref::<Element>()
                            .and_then(|el| el.get_attribute("slot"))
                            .is_some_and(|slot| slot == *name)
                    })
                    .collect(),
                Err(err) => {
                    log::warn!("slot lookup failed: {err:?}");
                    Vec::new()
                }
            },
            Slot::Default => {
                let list = self.element.child_nodes();
                (0..list.length())
                    .filter_map(|i| list.item(i))
                    .filter(|node| node.dyn_ref::<Element>().map_or(true, |el| !el.has_attribute("slot")))
                    .collect()
            }
        }
    }

    fn parse_fragment(&mut self, html: &str) -> Result<Vec<Node>, HostError> {
        let document = self
            .element
            .owner_document()
            .ok_or_else(|| HostError::Dom("element has no owner document".into()))?;
        let range = document.create_range().map_err(js_error)?;
        range.select_node_contents(&self.element).map_err(js_error)?;
        let fragment = range.create_contextual_fragment(html).map_err(js_error)?;
        let list = fragment.child_nodes();
        Ok((0..list.length()).filter_map(|i| list.item(i)).collect())
    }

    fn is_element(&self, node: &Node) -> bool {
        node.node_type() == Node::ELEMENT_NODE
    }

    fn set_node_attribute(&mut self, node: &Node, name: &str, value: &str) -> Result<(), HostError> {
        let element = node.dyn_ref::<Element>().ok_or(HostError::UnknownNode)?;
        element.set_attribute(name, value).map_err(js_error)
    }

    fn remove_node(&mut self, node: &Node) -> Result<(), HostError> {
        if let Some(parent) = node.parent_node() {
            parent.remove_child(node).map_err(js_error)?;
        }
        Ok(())
    }

    fn replace_with(&mut self, anchor: &Node, nodes: Vec<Node>) -> Result<(), HostError> {
        let parent = anchor.parent_node().ok_or(HostError::UnknownNode)?;
        for node in &nodes {
            parent.insert_before(node, Some(anchor)).map_err(js_error)?;
        }
        parent.remove_child(anchor).map_err(js_error)?;
        Ok(())
    }

    fn append_nodes(&mut self, nodes: Vec<Node>) -> Result<(), HostError> {
        for node in &nodes {
            self.element.append_child(node).map_err(js_error)?;
        }
        Ok(())
    }

    fn listen(&mut self, event: &str) {
        if !self.listening.iter().any(|e| e == event) {
            self.listening.push(event.to_owned());
        }
    }

    fn emit(&mut self, notification: Notification) {
        let target = match notification {
            Notification::Upgraded => self.element.clone().unchecked_into(),
            Notification::Connected | Notification::Disconnected => self.event_root(),
        };
        announce(&target, notification);
    }
}

/// Fire `notification` as a bubbling custom event on `target`.
fn announce(target: &DomEventTarget, notification: Notification) {
    let init = CustomEventInit::new();
    init.set_bubbles(true);
    let Ok(event) = CustomEvent::new_with_event_init_dict(notification.event_name(), &init) else {
        log::warn!("cannot create `{}` event", notification.event_name());
        return;
    };
    if let Err(err) = target.dispatch_event(&event) {
        log::warn!("dispatching `{}` failed: {err:?}", notification.event_name());
    }
}

/// The innermost element's name, with the id of its closest identified
/// ancestor-or-self.
fn target_of(target: DomEventTarget) -> Option<EventTarget> {
    let element = target.dyn_into::<Element>().ok()?;
    let id = element
        .closest("[id]")
        .ok()
        .flatten()
        .map(|identified| identified.id())
        .filter(|id| !id.is_empty());
    Some(EventTarget {
        node_name: element.node_name(),
        id,
    })
}

fn convert_event(event: &web_sys::Event) -> Event {
    let kind = event.type_();
    if let Some(touch_event) = event.dyn_ref::<TouchEvent>() {
        let list = touch_event.touches();
        let touches = (0..list.length())
            .filter_map(|i| list.item(i))
            .map(|touch| PointerInput {
                client_x: f64::from(touch.client_x()),
                client_y: f64::from(touch.client_y()),
                target: touch.target().and_then(target_of),
            })
            .collect();
        return Event::touch(&kind, touches);
    }
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        return Event::mouse(
            &kind,
            f64::from(mouse.client_x()),
            f64::from(mouse.client_y()),
            event.target().and_then(target_of),
        );
    }
    Event::new(&kind)
}

type DomListener = Closure<dyn FnMut(web_sys::Event)>;

/// Installed DOM listeners and registration; dropping the handle removes both.
pub struct Mounted {
    element: Element,
    target: DomEventTarget,
    listeners: Vec<(String, DomListener)>,
}

impl Mounted {
    fn add(&mut self, name: String, listener: DomListener) -> Result<(), HostError> {
        self.target
            .add_event_listener_with_callback(&name, listener.as_ref().unchecked_ref())
            .map_err(js_error)?;
        self.listeners.push((name, listener));
        Ok(())
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        for (name, listener) in &self.listeners {
            let _ = self
                .target
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
        unregister(&self.element);
    }
}

/// Wire `component` into the page. Call after the first `connect()`.
///
/// Routes the DOM events the component listens for into
/// [`Component::dispatch`], and re-synchronises it whenever a nested
/// component inside its shadow root reports `upgraded`. The element is then
/// registered for enclosing components and `upgraded` is announced again,
/// so a parent that already pushed state before registration pushes it
/// once more.
pub fn mount<C: 'static>(component: &Rc<RefCell<Component<ElementHost, C>>>) -> Result<Mounted, HostError> {
    let (element, target, has_shadow, events) = {
        let component = component.borrow();
        let host = component.host();
        let element: Element = host.element().clone().into();
        let events = host.listening().to_vec();
        (element, host.event_root(), host.shadow_root().is_some(), events)
    };
    let mut mounted = Mounted {
        element: element.clone(),
        target,
        listeners: Vec::new(),
    };

    if has_shadow {
        let weak: Weak<RefCell<Component<ElementHost, C>>> = Rc::downgrade(component);
        let listener = DomListener::new(move |event: web_sys::Event| {
            event.stop_propagation();
            let Some(component) = weak.upgrade() else {
                return;
            };
            let Ok(mut component) = component.try_borrow_mut() else {
                log::debug!("child upgraded during synchronisation");
                return;
            };
            if let Err(err) = component.child_upgraded() {
                log::error!("resync after child upgrade failed: {err}");
            }
        });
        mounted.add(Notification::Upgraded.event_name().to_owned(), listener)?;
    }

    for name in events {
        let weak: Weak<RefCell<Component<ElementHost, C>>> = Rc::downgrade(component);
        let listener = DomListener::new(move |event: web_sys::Event| {
            let Some(component) = weak.upgrade() else {
                return;
            };
            let converted = convert_event(&event);
            let outcome = component.borrow_mut().dispatch(&converted);
            match outcome {
                Ok(EventOutcome::Handled) => {
                    event.stop_propagation();
                    event.prevent_default();
                }
                Ok(_) => {}
                Err(err) => log::error!("`{}` listener failed: {err}", converted.kind),
            }
        });
        mounted.add(name, listener)?;
    }

    let sink: ChildRef = component.clone();
    register(&element, sink)?;
    let element_target: &DomEventTarget = element.as_ref();
    announce(element_target, Notification::Upgraded);
    Ok(mounted)
}
