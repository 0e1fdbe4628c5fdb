//! Component lifecycle controller.
//!
//! ```text
//! new() ──► constructed ──connect()──► connected ◄──► disconnected
//!              │                          │               │
//!          "upgraded"              first time only:   "disconnected"
//!                                  listeners, start    state = None
//!                                  state, forced sync
//! ```
//!
//! The native host calls the lifecycle methods from its own hooks
//! (custom-element callbacks in a browser, explicit calls in tests).

use std::rc::Rc;

use serde_json::Value;

use crate::attrs::{self, AttrType};
use crate::definition::{Definition, Instance};
use crate::error::ComponentError;
use crate::host::{Event, EventOutcome, Host, ListenerOutcome, Notification};
use crate::state::{self, ChildRef, State, StateSink};
use crate::sync::{self, SlotCache};

/// One live component: state store, synchroniser and lifecycle in one value.
pub struct Component<H: Host, C = ()> {
    definition: Rc<Definition<H, C>>,
    instance: Instance<H, C>,
    state: Option<State>,
    initialised: bool,
    connected: bool,
    slots: SlotCache,
    children: Vec<Option<ChildRef>>,
}

impl<H: Host, C> Component<H, C> {
    /// Construct on `host`, instantiating the template and resolving child bindings.
    pub fn new(
        definition: Rc<Definition<H, C>>,
        mut host: H,
        context: C,
        state: Option<State>,
    ) -> Result<Self, ComponentError> {
        let mut children = Vec::new();
        if let Some(template) = &definition.template {
            host.attach_content(template)?;
            children = definition
                .child_states
                .iter()
                .map(|binding| host.child_component(&binding.selector))
                .collect();
        }
        host.emit(Notification::Upgraded);
        log::debug!("<{}> upgraded", definition.name);

        Ok(Self {
            definition,
            instance: Instance { host, context },
            state,
            initialised: false,
            connected: false,
            slots: SlotCache::default(),
            children,
        })
    }

    pub fn definition(&self) -> &Definition<H, C> {
        &self.definition
    }

    pub fn state(&self) -> Option<&State> {
        self.state.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn host(&self) -> &H {
        &self.instance.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.instance.host
    }

    pub fn context(&self) -> &C {
        &self.instance.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.instance.context
    }

    /// Attach to the document.
    ///
    /// The first connection installs listeners and computes the start state;
    /// later connections only re-mark the component and notify.
    pub fn connect(&mut self) -> Result<(), ComponentError> {
        self.connected = true;
        if !self.initialised {
            self.initialised = true;
            let definition = Rc::clone(&self.definition);
            for event in definition.listened_events() {
                self.instance.host.listen(event);
            }
            let start = self.start_state()?;
            self.state = None;
            self.set_state(Some(start), true)?;
        }
        self.instance.host.emit(Notification::Connected);
        log::debug!("<{}> connected", self.definition.name);
        Ok(())
    }

    pub fn disconnect(&mut self) -> Result<(), ComponentError> {
        self.connected = false;
        self.instance.host.emit(Notification::Disconnected);
        log::debug!("<{}> disconnected", self.definition.name);
        self.set_state(None, false)
    }

    /// Construction state, then declared defaults, then present attributes.
    fn start_state(&mut self) -> Result<State, ComponentError> {
        let mut start = self.state.take().unwrap_or_default();
        for (field, value) in &self.definition.default_state {
            start.insert(field.clone(), value.clone());
        }
        for spec in self.definition.attrs.iter() {
            let Some(raw) = self.instance.host.attribute(&spec.attribute) else {
                continue;
            };
            let decoded = attrs::decode(Some(&raw), spec.ty).map_err(|source| {
                ComponentError::Attribute {
                    attribute: spec.attribute.clone(),
                    source,
                }
            })?;
            if let Some(value) = decoded.filter(|v| !v.is_null()) {
                start.insert(spec.field.clone(), value);
            }
        }
        Ok(start)
    }

    /// Host notification that a declared attribute changed.
    pub fn attribute_changed(
        &mut self,
        name: &str,
        _old: Option<&str>,
        new: Option<&str>,
    ) -> Result<(), ComponentError> {
        let Some(spec) = self.definition.attrs.by_attribute(name) else {
            return Ok(());
        };
        let decoded = attrs::decode(new, spec.ty).map_err(|source| ComponentError::Attribute {
            attribute: spec.attribute.clone(),
            source,
        })?;
        let Some(value) = decoded else {
            log::debug!("<{}> ignoring NaN for `{name}`", self.definition.name);
            return Ok(());
        };
        let Some(current) = &self.state else {
            return Ok(());
        };

        let current_value = current.get(&spec.field).unwrap_or(&Value::Null);
        if spec.ty == AttrType::Json && new == Some(current_value.to_string().as_str()) {
            return Ok(());
        }
        if state::values_equal(current_value, &value) {
            return Ok(());
        }

        let field = spec.field.clone();
        let mut update = State::new();
        update.insert(field, value);
        let next = state::merged(self.state.as_ref(), update);
        self.set_state(Some(next), true)
    }

    /// Replace the state; synchronise when it changed or `force` is set.
    ///
    /// Before the first connection the value is only stored.
    pub fn set_state(&mut self, next: Option<State>, force: bool) -> Result<(), ComponentError> {
        let previous = std::mem::replace(&mut self.state, next);
        if !self.initialised {
            return Ok(());
        }
        if !force && state::shallow_equal(self.state.as_ref(), previous.as_ref()) {
            return Ok(());
        }
        let Self {
            definition,
            instance,
            state,
            slots,
            children,
            ..
        } = self;
        sync::synchronize(definition, instance, slots, children, state.as_ref(), previous.as_ref())
    }

    /// Merge `update` over the current state.
    pub fn update_state(&mut self, update: State) -> Result<(), ComponentError> {
        let next = state::merged(self.state.as_ref(), update);
        self.set_state(Some(next), false)
    }

    /// A component inside the content subtree finished upgrading; push the
    /// current state down again.
    pub fn child_upgraded(&mut self) -> Result<(), ComponentError> {
        if !self.initialised {
            return Ok(());
        }
        let current = self.state.clone();
        self.set_state(current, true)
    }

    /// Run the listeners declared for `event.kind`.
    pub fn dispatch(&mut self, event: &Event) -> Result<EventOutcome, ComponentError> {
        if !self.initialised {
            return Ok(EventOutcome::Ignored);
        }
        let definition = Rc::clone(&self.definition);
        let mut outcome = EventOutcome::Ignored;
        for (_, listener) in definition.listeners.iter().filter(|(kind, _)| *kind == event.kind) {
            match listener(event, &mut self.instance)? {
                ListenerOutcome::Handled => outcome = EventOutcome::Handled,
                ListenerOutcome::Pass if outcome == EventOutcome::Ignored => {
                    outcome = EventOutcome::Passed
                }
                ListenerOutcome::Pass => {}
            }
        }
        Ok(outcome)
    }
}

impl<H: Host, C> StateSink for Component<H, C> {
    fn update_state(&mut self, update: State) -> Result<(), ComponentError> {
        Component::update_state(self, update)
    }
}
