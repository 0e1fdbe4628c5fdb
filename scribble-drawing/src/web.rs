//! Browser canvas, animation-frame scheduler and [`DrawingHost`] for
//! [`ElementHost`] (feature `web`).

use std::cell::RefCell;
use std::rc::Rc;

use scribble_component::web::ElementHost;
use scribble_component::HostError;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, HtmlInputElement};

use crate::canvas::{Canvas, ClientRect, LineStyle};
use crate::overlay::DrawingHost;
use crate::redraw::{FrameCallback, FrameScheduler};
use crate::template::{CANVAS_SELECTOR, COLOR_INDICATOR_ID, MENU_CHECKBOX_ID};

pub struct WebCanvas {
    element: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebCanvas {
    pub fn new(element: HtmlCanvasElement) -> Option<Self> {
        let ctx = element
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { element, ctx })
    }
}

impl Canvas for WebCanvas {
    fn width(&self) -> f64 {
        f64::from(self.element.width())
    }

    fn height(&self) -> f64 {
        f64::from(self.element.height())
    }

    fn bounding_client_rect(&self) -> ClientRect {
        let rect = self.element.get_bounding_client_rect();
        ClientRect {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        }
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn set_line_style(&mut self, style: &LineStyle) {
        self.ctx.set_line_width(style.width);
        self.ctx.set_line_join("round");
        self.ctx.set_line_cap("round");
        self.ctx.set_shadow_blur(style.shadow_blur);
        self.ctx.set_shadow_color(&style.shadow_color);
        self.ctx.set_stroke_style_str(&style.color);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.ctx.quadratic_curve_to(cpx, cpy, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }
}

/// Schedules frames with `window.requestAnimationFrame`.
#[derive(Default)]
pub struct RafScheduler;

impl FrameScheduler for RafScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        let Some(window) = web_sys::window() else {
            log::warn!("no window, running frame immediately");
            callback();
            return;
        };
        let frame = Closure::once_into_js(move || callback());
        if let Err(err) = window.request_animation_frame(frame.unchecked_ref()) {
            log::warn!("requestAnimationFrame failed: {err:?}");
        }
    }
}

fn js_error(err: wasm_bindgen::JsValue) -> HostError {
    HostError::Dom(format!("{err:?}"))
}

impl DrawingHost for ElementHost {
    fn canvas(&self) -> Option<Rc<RefCell<dyn Canvas>>> {
        let element = self
            .query_content(CANVAS_SELECTOR)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        let canvas: Rc<RefCell<dyn Canvas>> = Rc::new(RefCell::new(WebCanvas::new(element)?));
        Some(canvas)
    }

    fn set_indicator_color(&mut self, color: &str) -> Result<(), HostError> {
        let indicator = self
            .query_content(&format!("#{COLOR_INDICATOR_ID}"))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or(HostError::UnknownNode)?;
        indicator
            .style()
            .set_property("background-color", color)
            .map_err(js_error)
    }

    fn close_menu(&mut self) -> Result<(), HostError> {
        let checkbox = self
            .query_content(&format!("#{MENU_CHECKBOX_ID}"))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .ok_or(HostError::UnknownNode)?;
        checkbox.set_checked(false);
        Ok(())
    }
}
