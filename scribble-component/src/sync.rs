//! State → DOM synchronisation.
//!
//! Runs after every effective state change, always in this order:
//!
//! ```text
//! slots ──► on_state_change ──► child states ──► attributes
//! ```
//!
//! so a callback sees current slot content but the previous attributes.

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::attrs;
use crate::definition::{Definition, Instance};
use crate::error::{ComponentError, HostError};
use crate::host::{Host, Slot};
use crate::state::{self, ChildRef, State};

/// Last HTML rendered into each slot.
pub type SlotCache = FxHashMap<Slot, String>;

pub(crate) fn synchronize<H: Host, C>(
    definition: &Definition<H, C>,
    instance: &mut Instance<H, C>,
    slot_cache: &mut SlotCache,
    children: &[Option<ChildRef>],
    next: Option<&State>,
    previous: Option<&State>,
) -> Result<(), ComponentError> {
    if let (Some(next), Some(slots)) = (next, &definition.slots) {
        let contents = slots(next, previous, instance);
        fill_slots(&mut instance.host, slot_cache, contents)?;
    }

    if let Some(callback) = &definition.on_state_change {
        callback(next, previous, instance)?;
    }

    if let Some(next) = next {
        for (binding, child) in definition.child_states.iter().zip(children) {
            let child = child.as_ref().ok_or_else(|| ComponentError::MissingChild {
                selector: binding.selector.clone(),
            })?;
            let child_state = (binding.transform)(next, instance);
            child.borrow_mut().update_state(child_state)?;
        }
    }

    sync_attributes(definition, &mut instance.host, next, previous)?;
    Ok(())
}

/// Replace the content of every slot whose HTML changed.
pub(crate) fn fill_slots<H: Host>(
    host: &mut H,
    cache: &mut SlotCache,
    contents: Vec<(Slot, String)>,
) -> Result<(), HostError> {
    for (slot, html) in contents {
        if cache.get(&slot) == Some(&html) {
            continue;
        }
        let occupants = host.slot_occupants(&slot);
        for stale in occupants.iter().skip(1) {
            host.remove_node(stale)?;
        }

        let roots = host.parse_fragment(&html)?;
        if let Slot::Named(name) = &slot {
            for root in &roots {
                if host.is_element(root) {
                    host.set_node_attribute(root, "slot", name)?;
                }
            }
        }
        match occupants.first() {
            Some(anchor) => host.replace_with(anchor, roots)?,
            None => host.append_nodes(roots)?,
        }
        log::trace!("slot `{}` refilled", slot.name());
        cache.insert(slot, html);
    }
    Ok(())
}

/// Mirror declared fields onto DOM attributes.
fn sync_attributes<H: Host, C>(
    definition: &Definition<H, C>,
    host: &mut H,
    next: Option<&State>,
    previous: Option<&State>,
) -> Result<(), HostError> {
    for spec in definition.attrs.iter() {
        let Some(next) = next else {
            host.remove_attribute(&spec.attribute)?;
            continue;
        };
        let value = next.get(&spec.field);
        let changed = previous.map_or(true, |prev| match (prev.get(&spec.field), value) {
            (Some(before), Some(after)) => !state::values_equal(before, after),
            (before, after) => before.is_some() != after.is_some(),
        });
        if !changed {
            continue;
        }
        match attrs::encode(value.unwrap_or(&Value::Null), spec.ty) {
            Some(text) => host.set_attribute(&spec.attribute, &text)?,
            None => host.remove_attribute(&spec.attribute)?,
        }
    }
    Ok(())
}
