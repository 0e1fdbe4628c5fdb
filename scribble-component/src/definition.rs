//! Per-type component configuration, fixed when the element type is defined.

use std::rc::Rc;

use crate::attrs::{AttrTable, AttrType};
use crate::error::ComponentError;
use crate::host::{Event, ListenerOutcome, Slot, Template};
use crate::state::State;

/// The host element plus the per-instance scratch context of a component.
///
/// Callbacks receive this instead of the component itself, so they can
/// mutate the DOM and their own context but never re-enter the state store.
pub struct Instance<H, C> {
    pub host: H,
    pub context: C,
}

pub type StateChangeFn<H, C> =
    Box<dyn Fn(Option<&State>, Option<&State>, &mut Instance<H, C>) -> Result<(), ComponentError>>;
pub type ListenerFn<H, C> =
    Box<dyn Fn(&Event, &mut Instance<H, C>) -> Result<ListenerOutcome, ComponentError>>;
pub type SlotFn<H, C> = Box<dyn Fn(&State, Option<&State>, &Instance<H, C>) -> Vec<(Slot, String)>>;
pub type ChildStateFn<H, C> = Box<dyn Fn(&State, &Instance<H, C>) -> State>;

/// Selector resolved once at construction, and the transform feeding it.
pub struct ChildState<H, C> {
    pub selector: String,
    pub transform: ChildStateFn<H, C>,
}

/// Everything that distinguishes one component type from another.
pub struct Definition<H, C> {
    pub(crate) name: String,
    pub(crate) template: Option<Template>,
    pub(crate) default_state: State,
    pub(crate) attrs: AttrTable,
    pub(crate) child_states: Vec<ChildState<H, C>>,
    pub(crate) listeners: Vec<(String, ListenerFn<H, C>)>,
    pub(crate) slots: Option<SlotFn<H, C>>,
    pub(crate) on_state_change: Option<StateChangeFn<H, C>>,
}

impl<H, C> Definition<H, C> {
    pub fn builder(name: impl Into<String>) -> DefinitionBuilder<H, C> {
        DefinitionBuilder {
            definition: Definition {
                name: name.into(),
                template: None,
                default_state: State::new(),
                attrs: AttrTable::new(),
                child_states: Vec::new(),
                listeners: Vec::new(),
                slots: None,
                on_state_change: None,
            },
        }
    }

    /// Element name this type is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> &AttrTable {
        &self.attrs
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    pub fn default_state(&self) -> &State {
        &self.default_state
    }

    /// Attribute names whose changes must be reported to the component.
    pub fn observed_attributes(&self) -> Vec<&str> {
        self.attrs.observed_attributes()
    }

    /// Event names with at least one declared listener, without repeats.
    pub fn listened_events(&self) -> Vec<&str> {
        let mut events: Vec<&str> = Vec::new();
        for (event, _) in &self.listeners {
            if !events.contains(&event.as_str()) {
                events.push(event);
            }
        }
        events
    }
}

pub struct DefinitionBuilder<H, C> {
    definition: Definition<H, C>,
}

impl<H, C> DefinitionBuilder<H, C> {
    /// Content instantiated into each instance's isolated subtree.
    pub fn template(mut self, html: impl Into<String>) -> Self {
        self.definition.template.get_or_insert_with(Template::default).html = html.into();
        self
    }

    /// Style sheet for the content subtree; ignored without a template.
    pub fn style(mut self, css: impl Into<String>) -> Self {
        self.definition.template.get_or_insert_with(Template::default).style = css.into();
        self
    }

    pub fn state(mut self, defaults: State) -> Self {
        self.definition.default_state = defaults;
        self
    }

    pub fn attr(mut self, field: impl Into<String>, ty: AttrType) -> Self {
        self.definition.attrs.declare(field, ty);
        self
    }

    pub fn child_state<F>(mut self, selector: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&State, &Instance<H, C>) -> State + 'static,
    {
        self.definition.child_states.push(ChildState {
            selector: selector.into(),
            transform: Box::new(transform),
        });
        self
    }

    pub fn listener<F>(mut self, event: impl Into<String>, listener: F) -> Self
    where
        F: Fn(&Event, &mut Instance<H, C>) -> Result<ListenerOutcome, ComponentError> + 'static,
    {
        self.definition.listeners.push((event.into(), Box::new(listener)));
        self
    }

    pub fn slots<F>(mut self, slots: F) -> Self
    where
        F: Fn(&State, Option<&State>, &Instance<H, C>) -> Vec<(Slot, String)> + 'static,
    {
        self.definition.slots = Some(Box::new(slots));
        self
    }

    pub fn on_state_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(Option<&State>, Option<&State>, &mut Instance<H, C>) -> Result<(), ComponentError> + 'static,
    {
        self.definition.on_state_change = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> Rc<Definition<H, C>> {
        Rc::new(self.definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_collects_configuration() {
        let defaults = match json!({"count": 0}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let def: Rc<Definition<(), ()>> = Definition::builder("x-counter")
            .style(":host { display: block }")
            .template("<span></span>")
            .state(defaults.clone())
            .attr("count", AttrType::Number)
            .attr("isEnabled", AttrType::Boolean)
            .listener("click", |_, _| Ok(ListenerOutcome::Pass))
            .listener("click", |_, _| Ok(ListenerOutcome::Handled))
            .listener("keydown", |_, _| Ok(ListenerOutcome::Pass))
            .build();

        assert_eq!(def.name(), "x-counter");
        assert_eq!(def.default_state(), &defaults);
        assert_eq!(def.observed_attributes(), vec!["count", "is-enabled"]);
        assert_eq!(def.listened_events(), vec!["click", "keydown"]);
        let template = def.template().unwrap();
        assert_eq!(template.html, "<span></span>");
        assert_eq!(template.style, ":host { display: block }");
    }
}
