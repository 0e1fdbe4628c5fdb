//! The `y-demo-drawing` element.
//!
//! ```text
//!  mouse / touch ──► listeners ──► SharedDrawing ──► deep observer
//!                        │          (yrs array)          │
//!                 DrawingContext                          ▼
//!               (colour, open path)                RedrawLoop ──► Canvas
//! ```
//!
//! Every state change tears the per-instance context down first. A
//! non-null state then opens a [`Session`]: a redraw loop bound to the
//! host canvas plus the subscription that feeds it. Dropping the session
//! releases the subscription, so reconnects never stack observers.

use std::cell::RefCell;
use std::rc::Rc;

use scribble_component::{
    ComponentError, Definition, Event, Host, HostError, Instance, ListenerOutcome, PointerInput,
};
use yrs::{ArrayRef, Subscription};

use crate::canvas::{normalize, Canvas};
use crate::error::DrawingError;
use crate::redraw::{FrameScheduler, RedrawLoop};
use crate::stroke::{Point, SharedDrawing};
use crate::template::{CLEAR_ACTION_ID, STYLE, TEMPLATE};

pub const ELEMENT_NAME: &str = "y-demo-drawing";

/// The four selectable brush colours, keyed by their menu entry id.
pub struct Palette;

impl Palette {
    pub const BLACK: &'static str = "#333";
    pub const ORANGE: &'static str = "#ffbc42";
    pub const BLUE: &'static str = "#30bced";
    pub const GREEN: &'static str = "#6eeb83";

    pub const ENTRIES: [(&'static str, &'static str); 4] = [
        ("drawer-menubar-colors-black", Self::BLACK),
        ("drawer-menubar-colors-orange", Self::ORANGE),
        ("drawer-menubar-colors-blue", Self::BLUE),
        ("drawer-menubar-colors-green", Self::GREEN),
    ];

    /// Colour selected by clicking the menu entry `id`.
    pub fn color_for(id: &str) -> Option<&'static str> {
        Self::ENTRIES
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, color)| *color)
    }
}

/// Host capabilities the drawing element needs beyond [`Host`].
pub trait DrawingHost: Host {
    /// The `<canvas>` of the content subtree.
    fn canvas(&self) -> Option<Rc<RefCell<dyn Canvas>>>;
    /// Paint the colour indicator in the menubar.
    fn set_indicator_color(&mut self, color: &str) -> Result<(), HostError>;
    /// Uncheck the menu toggle.
    fn close_menu(&mut self) -> Result<(), HostError>;
}

/// Live rendering of one connected, non-null drawing state.
pub struct Session {
    redraw: Rc<RedrawLoop>,
    _subscription: Subscription,
}

impl Session {
    pub fn redraw(&self) -> &Rc<RedrawLoop> {
        &self.redraw
    }
}

/// Scratch state of one drawing element.
pub struct DrawingContext {
    drawing: SharedDrawing,
    scheduler: Rc<dyn FrameScheduler>,
    current_color: &'static str,
    open_path: Option<ArrayRef>,
    session: Option<Session>,
}

impl DrawingContext {
    pub fn new(drawing: SharedDrawing, scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            drawing,
            scheduler,
            current_color: Palette::BLACK,
            open_path: None,
            session: None,
        }
    }

    pub fn drawing(&self) -> &SharedDrawing {
        &self.drawing
    }

    /// Colour the next stroke starts with.
    pub fn current_color(&self) -> &str {
        self.current_color
    }

    pub fn has_open_stroke(&self) -> bool {
        self.open_path.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn reset(&mut self) {
        self.open_path = None;
        self.current_color = Palette::BLACK;
        self.session = None;
    }

    fn open_session(&mut self, canvas: Rc<RefCell<dyn Canvas>>) {
        let redraw = RedrawLoop::new(self.drawing.clone(), canvas, Rc::clone(&self.scheduler));
        let observer = Rc::clone(&redraw);
        let subscription = self.drawing.subscribe(move || observer.request());
        redraw.request();
        self.session = Some(Session {
            redraw,
            _subscription: subscription,
        });
    }
}

type DrawingInstance<H> = Instance<H, DrawingContext>;

fn on_canvas(pointer: &PointerInput) -> bool {
    pointer.target.as_ref().map_or(true, |target| target.is("canvas"))
}

fn position<H: DrawingHost>(pointer: &PointerInput, host: &H) -> Result<Point, ComponentError> {
    let canvas = host
        .canvas()
        .ok_or_else(|| ComponentError::callback(DrawingError::MissingCanvas))?;
    let rect = canvas.borrow().bounding_client_rect();
    Ok(normalize(&rect, pointer.client_x, pointer.client_y))
}

fn draw_start<H: DrawingHost>(pointer: &PointerInput, el: &mut DrawingInstance<H>) -> Result<(), ComponentError> {
    if !on_canvas(pointer) {
        return Ok(());
    }
    let at = position(pointer, &el.host)?;
    let ctx = &mut el.context;
    ctx.open_path = Some(ctx.drawing.begin_stroke(ctx.current_color, at));
    Ok(())
}

fn draw_move<H: DrawingHost>(pointer: &PointerInput, el: &mut DrawingInstance<H>) -> Result<(), ComponentError> {
    if !on_canvas(pointer) || el.context.open_path.is_none() {
        return Ok(());
    }
    let at = position(pointer, &el.host)?;
    if let Some(path) = &el.context.open_path {
        el.context.drawing.extend_stroke(path, at);
    }
    Ok(())
}

fn single_touch(event: &Event) -> Option<&PointerInput> {
    match event.touches.as_slice() {
        [touch] => Some(touch),
        _ => None,
    }
}

fn close_stroke<H>(_: &Event, el: &mut DrawingInstance<H>) -> Result<ListenerOutcome, ComponentError> {
    el.context.open_path = None;
    Ok(ListenerOutcome::Handled)
}

fn click<H: DrawingHost>(event: &Event, el: &mut DrawingInstance<H>) -> Result<ListenerOutcome, ComponentError> {
    if el.context.session.is_none() {
        return Ok(ListenerOutcome::Pass);
    }
    let Some(id) = event.target().and_then(|target| target.id.as_deref()) else {
        return Ok(ListenerOutcome::Pass);
    };
    if let Some(color) = Palette::color_for(id) {
        el.host.set_indicator_color(color)?;
        el.context.current_color = color;
    } else if id == CLEAR_ACTION_ID {
        el.context.drawing.clear();
        el.host.close_menu()?;
        log::info!("drawing cleared");
    }
    Ok(ListenerOutcome::Pass)
}

/// Definition of the drawing element for host type `H`.
pub fn drawing_definition<H: DrawingHost + 'static>() -> Rc<Definition<H, DrawingContext>> {
    Definition::<H, DrawingContext>::builder(ELEMENT_NAME)
        .template(TEMPLATE)
        .style(STYLE)
        .listener("mousedown", |event, el| {
            if let Some(pointer) = &event.pointer {
                draw_start(pointer, el)?;
            }
            Ok(ListenerOutcome::Handled)
        })
        .listener("touchstart", |event, el| {
            if let Some(touch) = single_touch(event) {
                draw_start(touch, el)?;
            }
            Ok(ListenerOutcome::Handled)
        })
        .listener("mouseleave", close_stroke)
        .listener("mouseup", close_stroke)
        .listener("touchcancel", close_stroke)
        .listener("touchend", close_stroke)
        .listener("mousemove", |event, el| {
            if let Some(pointer) = &event.pointer {
                draw_move(pointer, el)?;
            }
            Ok(ListenerOutcome::Handled)
        })
        .listener("touchmove", |event, el| {
            if let Some(touch) = single_touch(event) {
                draw_move(touch, el)?;
            }
            Ok(ListenerOutcome::Handled)
        })
        .listener("click", click)
        .on_state_change(|state, _previous, el| {
            el.context.reset();
            if state.is_some() {
                let canvas = el
                    .host
                    .canvas()
                    .ok_or_else(|| ComponentError::callback(DrawingError::MissingCanvas))?;
                el.context.open_session(canvas);
            }
            Ok(())
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDrawingHost;

    #[test]
    fn test_palette_lookup() {
        assert_eq!(Palette::color_for("drawer-menubar-colors-blue"), Some(Palette::BLUE));
        assert_eq!(Palette::color_for("drawer-menubar-colors-red"), None);
        assert_eq!(Palette::ENTRIES.len(), 4);
    }

    #[test]
    fn test_definition_listens_for_pointer_and_touch() {
        let definition = drawing_definition::<MemoryDrawingHost>();
        assert_eq!(definition.name(), ELEMENT_NAME);
        assert_eq!(
            definition.listened_events(),
            vec![
                "mousedown",
                "touchstart",
                "mouseleave",
                "mouseup",
                "touchcancel",
                "touchend",
                "mousemove",
                "touchmove",
                "click",
            ]
        );
        assert!(definition.observed_attributes().is_empty());
    }
}
