//! One simulated user: a document, a drawing element on it, and a way to
//! feed it pointer input.

use std::rc::Rc;

use scribble_component::{Component, Event, EventTarget};
use scribble_drawing::{
    create_drawing, DrawingContext, DrawingError, ManualScheduler, MemoryDrawingHost, Palette, Point,
    RecordingCanvas, SharedDrawing,
};
use yrs::Doc;

use crate::provider::{LoopbackProvider, PeerId};

pub struct Participant {
    name: String,
    peer: PeerId,
    canvas_size: f64,
    drawing: SharedDrawing,
    scheduler: Rc<ManualScheduler>,
    element: Component<MemoryDrawingHost, DrawingContext>,
}

impl Participant {
    /// Create a document, connect it to `provider` and mount a drawing on it.
    pub fn join(provider: &mut LoopbackProvider, name: impl Into<String>, canvas_size: f64) -> Result<Self, DrawingError> {
        let drawing = SharedDrawing::new(Doc::new());
        let peer = provider.connect(drawing.doc().clone());
        let scheduler = Rc::new(ManualScheduler::new());
        let host = MemoryDrawingHost::new(RecordingCanvas::new(canvas_size));
        let mut element = create_drawing(host, drawing.clone(), scheduler.clone())?;
        element.connect()?;
        Ok(Self {
            name: name.into(),
            peer,
            canvas_size,
            drawing,
            scheduler,
            element,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn peer(&self) -> PeerId {
        self.peer
    }

    pub fn drawing(&self) -> &SharedDrawing {
        &self.drawing
    }

    fn pointer(&mut self, kind: &str, at: Point) -> Result<(), DrawingError> {
        let event = Event::mouse(
            kind,
            at.x * self.canvas_size,
            at.y * self.canvas_size,
            Some(EventTarget::new("canvas")),
        );
        self.element.dispatch(&event)?;
        Ok(())
    }

    fn click(&mut self, id: &str) -> Result<(), DrawingError> {
        let event = Event::mouse("click", 0.0, 0.0, Some(EventTarget::with_id("div", id)));
        self.element.dispatch(&event)?;
        Ok(())
    }

    /// Press at the first point, drag through the rest, release.
    pub fn draw(&mut self, points: &[Point]) -> Result<(), DrawingError> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.pointer("mousedown", *first)?;
        for point in rest {
            self.pointer("mousemove", *point)?;
        }
        self.pointer("mouseup", *points.last().unwrap_or(first))
    }

    /// Pick the palette entry at `index`, wrapping around.
    pub fn pick_color(&mut self, index: usize) -> Result<(), DrawingError> {
        let (id, _) = Palette::ENTRIES[index % Palette::ENTRIES.len()];
        self.click(id)
    }

    pub fn clear(&mut self) -> Result<(), DrawingError> {
        self.element.host_mut().open_menu()?;
        self.click(scribble_drawing::template::CLEAR_ACTION_ID)
    }

    /// Run due animation frames; returns how many ran.
    pub fn render(&self) -> usize {
        self.scheduler.run_pending()
    }

    pub fn redraw_passes(&self) -> u64 {
        self.element
            .context()
            .session()
            .map_or(0, |session| session.redraw().passes())
    }

    /// Strokes painted by the last redraw.
    pub fn painted(&self) -> usize {
        self.element.host().recording().borrow().visible_colors().len()
    }
}
