//! End-to-end lifecycle tests against the in-memory host.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use scribble_component::{
    AttrType, ChildRef, Component, ComponentError, Definition, ElementRegistry, Event, EventOutcome,
    EventTarget, Host, ListenerOutcome, MemoryHost, Notification, Slot, State, StateSink,
};
use serde_json::{json, Value};

fn state(value: Value) -> State {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

/// Child double recording every update it receives.
#[derive(Default)]
struct Recorder {
    updates: Vec<State>,
}

impl StateSink for Recorder {
    fn update_state(&mut self, update: State) -> Result<(), ComponentError> {
        self.updates.push(update);
        Ok(())
    }
}

fn counter_definition(calls: Rc<Cell<usize>>) -> Rc<Definition<MemoryHost, ()>> {
    Definition::builder("x-counter")
        .state(state(json!({"count": 0})))
        .attr("count", AttrType::Number)
        .attr("isActive", AttrType::Boolean)
        .attr("title", AttrType::String)
        .attr("config", AttrType::Json)
        .on_state_change(move |_, _, _| {
            calls.set(calls.get() + 1);
            Ok(())
        })
        .build()
}

#[test]
fn test_attribute_before_connect_seeds_state() {
    let calls = Rc::new(Cell::new(0));
    let mut host = MemoryHost::new("x-counter");
    host.set_attribute("count", "5").unwrap();

    let mut component = Component::new(counter_definition(calls.clone()), host, (), None).unwrap();
    assert_eq!(calls.get(), 0);
    component.connect().unwrap();

    assert_eq!(component.state(), Some(&state(json!({"count": 5}))));
    assert_eq!(calls.get(), 1);
    assert_eq!(
        component.host().notifications(),
        &[Notification::Upgraded, Notification::Connected]
    );
}

#[test]
fn test_start_state_layers() {
    let host = {
        let mut host = MemoryHost::new("x-counter");
        host.set_attribute("title", "from-dom").unwrap();
        host.set_attribute("is-active", "").unwrap();
        host
    };
    let initial = state(json!({"count": 9, "extra": true}));
    let mut component =
        Component::new(counter_definition(Rc::new(Cell::new(0))), host, (), Some(initial)).unwrap();
    component.connect().unwrap();

    assert_eq!(
        component.state(),
        Some(&state(json!({"count": 0, "extra": true, "title": "from-dom", "isActive": true})))
    );
}

#[test]
fn test_repeated_identical_state_syncs_once() {
    let calls = Rc::new(Cell::new(0));
    let mut component =
        Component::new(counter_definition(calls.clone()), MemoryHost::new("x-counter"), (), None).unwrap();
    component.connect().unwrap();
    assert_eq!(calls.get(), 1);

    let next = state(json!({"count": 3}));
    component.set_state(Some(next.clone()), false).unwrap();
    component.set_state(Some(next), false).unwrap();
    assert_eq!(calls.get(), 2);
    assert_eq!(component.host().attribute("count").as_deref(), Some("3"));

    component.set_state(Some(state(json!({"count": 3}))), true).unwrap();
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_attributes_follow_state() {
    let mut component = Component::new(
        counter_definition(Rc::new(Cell::new(0))),
        MemoryHost::new("x-counter"),
        (),
        None,
    )
    .unwrap();
    component.connect().unwrap();

    component
        .update_state(state(json!({"isActive": true, "title": "hi", "config": {"a": [1]}})))
        .unwrap();
    let host = component.host();
    assert_eq!(host.attribute("count").as_deref(), Some("0"));
    assert_eq!(host.attribute("is-active").as_deref(), Some(""));
    assert_eq!(host.attribute("title").as_deref(), Some("hi"));
    assert_eq!(host.attribute("config").as_deref(), Some("{\"a\":[1]}"));

    component
        .update_state(state(json!({"isActive": false, "title": null})))
        .unwrap();
    assert_eq!(component.host().attribute("is-active"), None);
    assert_eq!(component.host().attribute("title"), None);
}

#[test]
fn test_disconnect_tears_down_attributes_and_children() {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let mut registry = ElementRegistry::new();
    let for_factory = recorder.clone();
    registry.define("x-label", move || -> ChildRef { for_factory.clone() });

    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_in_callback = seen.clone();
    let definition: Rc<Definition<MemoryHost, ()>> = Definition::builder("x-panel")
        .template("<x-label id=\"label\"></x-label>")
        .state(state(json!({"count": 1})))
        .attr("count", AttrType::Number)
        .child_state("#label", |s, _| state(json!({"label": s["count"]})))
        .on_state_change(move |next, _, _| {
            seen_in_callback.borrow_mut().push(next.cloned());
            Ok(())
        })
        .build();

    let host = MemoryHost::with_registry("x-panel", Rc::new(registry));
    let mut component = Component::new(definition, host, (), None).unwrap();
    component.connect().unwrap();
    assert_eq!(component.host().attribute("count").as_deref(), Some("1"));
    assert_eq!(recorder.borrow().updates.len(), 1);

    component.disconnect().unwrap();
    assert_eq!(component.state(), None);
    assert_eq!(component.host().attribute("count"), None);
    assert_eq!(recorder.borrow().updates.len(), 1);
    assert_eq!(seen.borrow().last(), Some(&None));
    assert_eq!(component.host().notifications().last(), Some(&Notification::Disconnected));
}

#[test]
fn test_child_receives_one_update_per_parent_change() {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let mut registry = ElementRegistry::new();
    let for_factory = recorder.clone();
    registry.define("x-label", move || -> ChildRef { for_factory.clone() });

    let definition: Rc<Definition<MemoryHost, ()>> = Definition::builder("x-parent")
        .template("<x-label class=\"title\"></x-label>")
        .state(state(json!({"title": "a"})))
        .child_state(".title", |s, _| state(json!({"label": s["title"]})))
        .build();
    let host = MemoryHost::with_registry("x-parent", Rc::new(registry));
    let mut parent = Component::new(definition, host, (), None).unwrap();
    parent.connect().unwrap();
    let before = recorder.borrow().updates.len();

    parent.update_state(state(json!({"title": "b"}))).unwrap();

    let updates = &recorder.borrow().updates;
    assert_eq!(updates.len(), before + 1);
    assert_eq!(updates.last(), Some(&state(json!({"label": "b"}))));
}

#[test]
fn test_nested_component_mirrors_derived_state() {
    let child_definition: Rc<Definition<MemoryHost, ()>> = Definition::builder("x-badge")
        .attr("label", AttrType::String)
        .build();
    let child = Rc::new(RefCell::new(
        Component::new(child_definition, MemoryHost::new("x-badge"), (), None).unwrap(),
    ));
    child.borrow_mut().connect().unwrap();

    let mut registry = ElementRegistry::new();
    let for_factory = child.clone();
    registry.define("x-badge", move || -> ChildRef { for_factory.clone() });

    let parent_definition: Rc<Definition<MemoryHost, ()>> = Definition::builder("x-card")
        .template("<x-badge></x-badge>")
        .state(state(json!({"title": "first"})))
        .child_state("x-badge", |s, _| state(json!({"label": s["title"]})))
        .build();
    let mut parent = Component::new(
        parent_definition,
        MemoryHost::with_registry("x-card", Rc::new(registry)),
        (),
        None,
    )
    .unwrap();
    parent.connect().unwrap();
    assert_eq!(child.borrow().host().attribute("label").as_deref(), Some("first"));

    parent.update_state(state(json!({"title": "second"}))).unwrap();
    assert_eq!(child.borrow().host().attribute("label").as_deref(), Some("second"));
}

/// Child binding whose component registers after the parent's first sync.
struct LateChild {
    target: Rc<RefCell<Option<ChildRef>>>,
}

impl StateSink for LateChild {
    fn update_state(&mut self, update: State) -> Result<(), ComponentError> {
        let Some(child) = self.target.borrow().clone() else {
            return Ok(());
        };
        let result = child.borrow_mut().update_state(update);
        result
    }
}

#[test]
fn test_late_child_gets_state_on_upgrade() {
    let slot: Rc<RefCell<Option<ChildRef>>> = Rc::new(RefCell::new(None));
    let mut registry = ElementRegistry::new();
    let for_factory = slot.clone();
    registry.define("x-badge", move || -> ChildRef {
        Rc::new(RefCell::new(LateChild {
            target: for_factory.clone(),
        }))
    });
    let parent_definition: Rc<Definition<MemoryHost, ()>> = Definition::builder("x-card")
        .template("<x-badge></x-badge>")
        .state(state(json!({"title": "first"})))
        .child_state("x-badge", |s, _| state(json!({"label": s["title"]})))
        .build();
    let mut parent = Component::new(
        parent_definition,
        MemoryHost::with_registry("x-card", Rc::new(registry)),
        (),
        None,
    )
    .unwrap();
    parent.connect().unwrap();

    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let registered: ChildRef = recorder.clone();
    *slot.borrow_mut() = Some(registered);
    assert!(recorder.borrow().updates.is_empty());

    parent.child_upgraded().unwrap();
    assert_eq!(recorder.borrow().updates, vec![state(json!({"label": "first"}))]);
}

#[test]
fn test_missing_child_fails_at_first_propagation() {
    let definition: Rc<Definition<MemoryHost, ()>> = Definition::builder("x-broken")
        .template("<span></span>")
        .child_state("#absent", |_, _| State::new())
        .build();
    let mut component = Component::new(definition, MemoryHost::new("x-broken"), (), None).unwrap();
    let err = component.connect().unwrap_err();
    assert!(matches!(err, ComponentError::MissingChild { ref selector } if selector == "#absent"));
}

#[test]
fn test_slots_replace_previous_occupants() {
    let definition: Rc<Definition<MemoryHost, ()>> = Definition::builder("x-card")
        .state(state(json!({"title": "One", "body": "text"})))
        .slots(|s, _, _| {
            vec![
                (Slot::from("title"), format!("<h1>{}</h1>", s["title"].as_str().unwrap_or_default())),
                (Slot::Default, format!("<p>{}</p>", s["body"].as_str().unwrap_or_default())),
            ]
        })
        .build();
    let mut host = MemoryHost::new("x-card");
    host.set_inner_html("<b slot=\"title\">old</b><i slot=\"title\">stale</i>loose<em>node</em>")
        .unwrap();

    let mut component = Component::new(definition, host, (), None).unwrap();
    component.connect().unwrap();
    assert_eq!(
        component.host().inner_html(),
        "<h1 slot=\"title\">One</h1><p>text</p>"
    );

    component.update_state(state(json!({"title": "Two"}))).unwrap();
    assert_eq!(
        component.host().inner_html(),
        "<h1 slot=\"title\">Two</h1><p>text</p>"
    );
}

#[test]
fn test_callback_sees_slots_before_attributes() {
    let observed = Rc::new(RefCell::new(Vec::new()));
    let log = observed.clone();
    let definition = Definition::<MemoryHost, ()>::builder("x-order")
        .state(state(json!({"count": 1})))
        .attr("count", AttrType::Number)
        .slots(|s, _, _| vec![(Slot::Default, format!("<span>{}</span>", s["count"]))])
        .on_state_change(move |next, _, instance| {
            if next.is_some() {
                log.borrow_mut()
                    .push((instance.host.inner_html(), instance.host.attribute("count")));
            }
            Ok(())
        })
        .build();
    let mut component = Component::new(definition, MemoryHost::new("x-order"), (), None).unwrap();
    component.connect().unwrap();
    component.update_state(state(json!({"count": 2}))).unwrap();

    let observed = observed.borrow();
    assert_eq!(observed[0], ("<span>1</span>".to_string(), None));
    assert_eq!(observed[1], ("<span>2</span>".to_string(), Some("1".to_string())));
}

#[test]
fn test_attribute_changed_paths() {
    let calls = Rc::new(Cell::new(0));
    let mut component =
        Component::new(counter_definition(calls.clone()), MemoryHost::new("x-counter"), (), None).unwrap();

    // No live state yet: accepted but ignored.
    component.attribute_changed("count", None, Some("4")).unwrap();
    assert_eq!(component.state(), None);

    component.connect().unwrap();
    component.attribute_changed("count", None, Some("4")).unwrap();
    assert_eq!(component.state().unwrap()["count"], json!(4));

    component.attribute_changed("count", Some("4"), Some("not a number")).unwrap();
    assert_eq!(component.state().unwrap()["count"], json!(4));

    let before = calls.get();
    component.attribute_changed("count", Some("4"), Some("4")).unwrap();
    assert_eq!(calls.get(), before);

    component.attribute_changed("config", None, Some("{\"k\":1}")).unwrap();
    assert_eq!(component.state().unwrap()["config"], json!({"k": 1}));

    let err = component.attribute_changed("config", None, Some("{oops")).unwrap_err();
    assert!(matches!(err, ComponentError::Attribute { ref attribute, .. } if attribute == "config"));

    component.attribute_changed("unknown-attr", None, Some("x")).unwrap();

    // Boolean attributes are presence-only, whatever their text.
    component.attribute_changed("is-active", None, Some("false")).unwrap();
    assert_eq!(component.state().unwrap()["isActive"], json!(true));
    assert_eq!(component.host().attribute("is-active").as_deref(), Some(""));
    let before = calls.get();
    component.attribute_changed("is-active", Some(""), Some("false")).unwrap();
    assert_eq!(calls.get(), before);

    component.attribute_changed("is-active", Some("false"), None).unwrap();
    assert_eq!(component.state().unwrap()["isActive"], json!(false));
    assert_eq!(component.host().attribute("is-active"), None);
    assert_eq!(calls.get(), before + 1);
}

#[test]
fn test_integral_float_state_echo_is_quiet() {
    let calls = Rc::new(Cell::new(0));
    let mut component =
        Component::new(counter_definition(calls.clone()), MemoryHost::new("x-counter"), (), None).unwrap();
    component.connect().unwrap();

    component.update_state(state(json!({"count": 2.0}))).unwrap();
    assert_eq!(component.host().attribute("count").as_deref(), Some("2"));
    let before = calls.get();

    component.attribute_changed("count", None, Some("2")).unwrap();
    component.attribute_changed("count", Some("2"), Some("2.0")).unwrap();
    component.update_state(state(json!({"count": 2}))).unwrap();
    assert_eq!(calls.get(), before);
    assert_eq!(component.host().attribute("count").as_deref(), Some("2"));
}

#[test]
fn test_malformed_json_attribute_fails_connect() {
    let mut host = MemoryHost::new("x-counter");
    host.set_attribute("config", "{").unwrap();
    let mut component =
        Component::new(counter_definition(Rc::new(Cell::new(0))), host, (), None).unwrap();
    assert!(matches!(component.connect(), Err(ComponentError::Attribute { .. })));
}

#[test]
fn test_reconnect_keeps_torn_down_state() {
    let calls = Rc::new(Cell::new(0));
    let mut component =
        Component::new(counter_definition(calls.clone()), MemoryHost::new("x-counter"), (), None).unwrap();
    component.connect().unwrap();
    component.disconnect().unwrap();
    component.host_mut().set_attribute("count", "7").unwrap();
    component.connect().unwrap();

    assert!(component.is_connected());
    assert_eq!(component.state(), None);
    assert_eq!(calls.get(), 2);
    assert_eq!(
        component.host().notifications(),
        &[
            Notification::Upgraded,
            Notification::Connected,
            Notification::Disconnected,
            Notification::Connected
        ]
    );
}

#[test]
fn test_listeners_installed_on_first_connect() {
    let clicks = Rc::new(Cell::new(0));
    let counted = clicks.clone();
    let definition = Definition::<MemoryHost, u32>::builder("x-button")
        .listener("click", move |event, instance| {
            counted.set(counted.get() + 1);
            instance.context += 1;
            if event.target().is_some_and(|t| t.is("button")) {
                Ok(ListenerOutcome::Handled)
            } else {
                Ok(ListenerOutcome::Pass)
            }
        })
        .build();
    let mut component = Component::new(definition, MemoryHost::new("x-button"), 0, None).unwrap();

    let click = Event::mouse("click", 0.0, 0.0, Some(EventTarget::new("button")));
    assert_eq!(component.dispatch(&click).unwrap(), EventOutcome::Ignored);

    component.connect().unwrap();
    assert!(component.host().is_listening("click"));
    assert_eq!(component.dispatch(&click).unwrap(), EventOutcome::Handled);
    let stray = Event::mouse("click", 0.0, 0.0, None);
    assert_eq!(component.dispatch(&stray).unwrap(), EventOutcome::Passed);
    assert_eq!(component.dispatch(&Event::new("keydown")).unwrap(), EventOutcome::Ignored);

    assert_eq!(clicks.get(), 2);
    assert_eq!(*component.context(), 2);
}

#[test]
fn test_child_upgraded_forces_resync() {
    let calls = Rc::new(Cell::new(0));
    let mut component =
        Component::new(counter_definition(calls.clone()), MemoryHost::new("x-counter"), (), None).unwrap();
    component.child_upgraded().unwrap();
    assert_eq!(calls.get(), 0);

    component.connect().unwrap();
    component.child_upgraded().unwrap();
    assert_eq!(calls.get(), 2);
}
