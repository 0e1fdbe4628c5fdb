//! Frame-coalesced redraw.
//!
//! ```text
//! change ─┐
//! change ─┼─► dirty = true ──► one frame request ──► replay(strokes)
//! change ─┘                    (while pending)
//! ```
//!
//! A dirty flag, not a queue: any number of changes before the frame runs
//! produce a single replay.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::canvas::{replay, Canvas};
use crate::stroke::SharedDrawing;

pub type FrameCallback = Box<dyn FnOnce()>;

/// Runs callbacks on the next animation frame.
pub trait FrameScheduler {
    fn request_frame(&self, callback: FrameCallback);
}

/// Scheduler whose frames run only when [`run_pending`](Self::run_pending)
/// is called.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<Vec<FrameCallback>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run every callback queued so far and return how many ran.
    ///
    /// Callbacks queued while running wait for the next call.
    pub fn run_pending(&self) -> usize {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let count = due.len();
        for callback in due {
            callback();
        }
        count
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        self.queue.borrow_mut().push(callback);
    }
}

/// Repaints a canvas from a shared drawing, at most once per frame.
pub struct RedrawLoop {
    drawing: SharedDrawing,
    canvas: Rc<RefCell<dyn Canvas>>,
    scheduler: Rc<dyn FrameScheduler>,
    dirty: Cell<bool>,
    pending: Cell<bool>,
    passes: Cell<u64>,
}

impl RedrawLoop {
    pub fn new(
        drawing: SharedDrawing,
        canvas: Rc<RefCell<dyn Canvas>>,
        scheduler: Rc<dyn FrameScheduler>,
    ) -> Rc<Self> {
        Rc::new(Self {
            drawing,
            canvas,
            scheduler,
            dirty: Cell::new(false),
            pending: Cell::new(false),
            passes: Cell::new(0),
        })
    }

    /// Mark the canvas stale and make sure a frame is on its way.
    pub fn request(self: &Rc<Self>) {
        self.dirty.set(true);
        if self.pending.replace(true) {
            return;
        }
        let this = Rc::downgrade(self);
        self.scheduler.request_frame(Box::new(move || {
            // A loop dropped before its frame ran paints nothing.
            if let Some(this) = this.upgrade() {
                this.frame();
            }
        }));
    }

    fn frame(&self) {
        self.pending.set(false);
        if !self.dirty.replace(false) {
            return;
        }
        let strokes = self.drawing.strokes();
        replay(&mut *self.canvas.borrow_mut(), &strokes);
        self.passes.set(self.passes.get() + 1);
        log::trace!("redraw pass {} ({} strokes)", self.passes.get(), strokes.len());
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Replays performed so far.
    pub fn passes(&self) -> u64 {
        self.passes.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::stroke::Point;
    use yrs::Doc;

    fn setup() -> (SharedDrawing, Rc<RefCell<RecordingCanvas>>, Rc<ManualScheduler>, Rc<RedrawLoop>) {
        let drawing = SharedDrawing::new(Doc::new());
        let canvas = Rc::new(RefCell::new(RecordingCanvas::new(100.0)));
        let scheduler = Rc::new(ManualScheduler::new());
        let redraw = RedrawLoop::new(drawing.clone(), canvas.clone(), scheduler.clone());
        (drawing, canvas, scheduler, redraw)
    }

    #[test]
    fn test_requests_coalesce_into_one_pass() {
        let (_drawing, canvas, scheduler, redraw) = setup();
        redraw.request();
        redraw.request();
        redraw.request();
        assert_eq!(scheduler.pending(), 1);
        assert!(redraw.is_dirty());

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(redraw.passes(), 1);
        assert_eq!(canvas.borrow().clears(), 1);
        assert!(!redraw.is_dirty());
    }

    #[test]
    fn test_frame_replays_current_strokes() {
        let (drawing, canvas, scheduler, redraw) = setup();
        drawing.begin_stroke("#ffbc42", Point::new(0.1, 0.1));
        redraw.request();
        drawing.begin_stroke("#30bced", Point::new(0.2, 0.2));
        scheduler.run_pending();
        assert_eq!(canvas.borrow().visible_colors(), vec!["#ffbc42", "#30bced"]);
    }

    #[test]
    fn test_request_after_frame_schedules_again() {
        let (_drawing, _canvas, scheduler, redraw) = setup();
        redraw.request();
        scheduler.run_pending();
        redraw.request();
        assert_eq!(scheduler.pending(), 1);
        scheduler.run_pending();
        assert_eq!(redraw.passes(), 2);
    }

    #[test]
    fn test_dropped_loop_skips_its_frame() {
        let (_drawing, canvas, scheduler, redraw) = setup();
        redraw.request();
        drop(redraw);
        scheduler.run_pending();
        assert_eq!(canvas.borrow().clears(), 0);
    }
}
