//! # scribble-drawing: collaborative freehand drawing
//!
//! A `yrs` shared array of strokes, rendered onto a canvas and edited by
//! pointer and touch input through the `y-demo-drawing` component.
//!
//! ## Architecture
//!
//! ```text
//!   local input                         remote participants
//!       │                                        │
//!       ▼                                        ▼
//! ┌─────────────┐  begin/extend/clear  ┌───────────────────┐
//! │   overlay   │ ───────────────────► │  SharedDrawing    │
//! │ (component) │                      │  (yrs "drawing")  │
//! └─────────────┘                      └─────────┬─────────┘
//!                                                │ deep observer
//!                                                ▼
//!                 ┌────────────┐  frame   ┌────────────┐
//!                 │ RedrawLoop │ ───────► │  replay()  │ ──► Canvas
//!                 └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`stroke`]: stroke elements and the shared sequence
//! - [`canvas`]: the `Canvas` seam, coordinate mapping, replay
//! - [`redraw`]: frame scheduling and the coalescing redraw loop
//! - [`overlay`]: the drawing component definition and its context
//! - [`memory`]: in-memory drawing host over `MemoryHost`
//! - `web`: browser canvas and scheduler (feature `web`)

pub mod canvas;
pub mod error;
pub mod memory;
pub mod overlay;
pub mod redraw;
pub mod stroke;
pub mod template;
#[cfg(feature = "web")]
pub mod web;

use std::rc::Rc;

use scribble_component::Component;

pub use canvas::{normalize, replay, Canvas, ClientRect, DrawCommand, LineStyle, RecordingCanvas};
pub use error::DrawingError;
pub use memory::MemoryDrawingHost;
pub use overlay::{drawing_definition, DrawingContext, DrawingHost, Palette, Session, ELEMENT_NAME};
pub use redraw::{FrameScheduler, ManualScheduler, RedrawLoop};
pub use stroke::{Point, SharedDrawing, Stroke};

/// A drawing element bound to `drawing`, constructed but not yet connected.
pub fn create_drawing<H: DrawingHost + 'static>(
    host: H,
    drawing: SharedDrawing,
    scheduler: Rc<dyn FrameScheduler>,
) -> Result<Component<H, DrawingContext>, DrawingError> {
    let context = DrawingContext::new(drawing, scheduler);
    Ok(Component::new(drawing_definition(), host, context, None)?)
}
