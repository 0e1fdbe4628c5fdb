//! # scribble-component: a small custom-element engine
//!
//! Binds a component's state to its host element: attributes, slot
//! content and the state of nested components follow every state change.
//!
//! ## Architecture
//!
//! ```text
//! host lifecycle / attribute events
//!        │
//!        ▼
//! ┌──────────────┐  set_state   ┌─────────────┐  changed?  ┌──────────────┐
//! │  Component   │ ───────────► │ State store │ ─────────► │ Synchroniser │
//! │ (lifecycle)  │              │ (shallow eq)│            │ slots → cb → │
//! └──────┬───────┘              └─────────────┘            │ children →   │
//!        │ decode / encode                                 │ attributes   │
//!        ▼                                                 └──────┬───────┘
//! ┌──────────────┐                                                │
//! │ Attr codec   │                                     Host trait ▼
//! └──────────────┘                                     (dom / web adapters)
//! ```
//!
//! ## Modules
//!
//! - [`attrs`]: attribute codec and per-type codec table
//! - [`state`]: state values, shallow equality, the child `StateSink` seam
//! - [`host`]: the `Host` trait, events, notifications, slots
//! - [`definition`]: per-type configuration and its builder
//! - [`component`]: lifecycle controller and state store
//! - [`dom`]: in-memory host used by tests and native embeddings
//! - `web`: `Host` over `web-sys` elements (feature `web`)

pub mod attrs;
pub mod component;
pub mod definition;
pub mod dom;
pub mod error;
pub mod host;
pub mod state;
mod sync;
#[cfg(feature = "web")]
pub mod web;

pub use attrs::{AttrSpec, AttrTable, AttrType};
pub use component::Component;
pub use definition::{Definition, DefinitionBuilder, Instance};
pub use dom::{ElementRegistry, MemoryHost};
pub use error::{AttrError, ComponentError, HostError};
pub use host::{
    Event, EventOutcome, EventTarget, Host, ListenerOutcome, Notification, PointerInput, Slot, Template,
};
pub use state::{shallow_equal, values_equal, ChildRef, State, StateSink};
pub use sync::SlotCache;
