use conju_engine::{FontSpec, TextMeasure};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Text measurement backed by an off-screen canvas.
///
/// The canvas is created on first use and reused afterwards. The context
/// font is only reassigned when the requested font changes.
#[derive(Default)]
pub struct CanvasMeasure {
    ctx: Option<CanvasRenderingContext2d>,
    font: String,
}

impl CanvasMeasure {
    pub fn new() -> Self {
        Self::default()
    }

    fn context(&mut self) -> Option<&CanvasRenderingContext2d> {
        if self.ctx.is_none() {
            self.ctx = create_context();
            if self.ctx.is_none() {
                log::warn!("canvas text metrics unavailable; using minimum piece widths");
            }
        }
        self.ctx.as_ref()
    }
}

fn create_context() -> Option<CanvasRenderingContext2d> {
    let document = web_sys::window()?.document()?;
    let canvas = document
        .create_element("canvas")
        .ok()?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

impl TextMeasure for CanvasMeasure {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f32 {
        let css = font.css();
        let font_changed = self.font != css;
        let Some(ctx) = self.context() else {
            return 0.0;
        };
        if font_changed {
            ctx.set_font(&css);
        }
        let width = ctx
            .measure_text(text)
            .map(|metrics| metrics.width() as f32)
            .unwrap_or(0.0);
        if font_changed {
            self.font = css;
        }
        width
    }
}
