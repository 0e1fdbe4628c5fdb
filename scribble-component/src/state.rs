//! Component state values and the change test that gates synchronisation.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::ComponentError;

/// A component's state: named fields to JSON values.
///
/// Storage is `Option<State>`; `None` is the torn-down state.
pub type State = Map<String, Value>;

/// Shared handle to something that accepts partial state updates.
pub type ChildRef = Rc<RefCell<dyn StateSink>>;

/// Receiver of derived state pushed down from a parent component.
pub trait StateSink {
    /// Merge `update` over the current state and synchronise.
    fn update_state(&mut self, update: State) -> Result<(), ComponentError>;
}

/// Shallow equality over top-level fields.
///
/// Both `None` are equal, one `None` is unequal; otherwise the field sets
/// must match and every field value must compare equal.
pub fn shallow_equal(a: Option<&State>, b: Option<&State>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, value)| b.get(key).is_some_and(|other| values_equal(value, other)))
        }
        _ => false,
    }
}

/// Value equality where numbers compare by numeric value, so `2.0 == 2`.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(key, value)| y.get(key).is_some_and(|other| values_equal(value, other)))
        }
        _ => a == b,
    }
}

/// `base` with every field of `update` written over it.
pub fn merged(base: Option<&State>, update: State) -> State {
    let mut next = base.cloned().unwrap_or_default();
    next.extend(update);
    next
}
