//! Figures rasterized to PNG. The displayed size is the figure size in inches at 72 pixels per
//! inch; the `dpi` option only controls the resolution of the rasterized image.

use crate::prelude::*;

use crate::config::Config;
use crate::document::Properties;
use crate::pane::Pane;
use crate::pane::PaneType;
use crate::pane::Renderer;
use crate::pane::div::DivContent;
use crate::pane::div::DivRenderer;
use crate::pane::image;
use crate::pane::image::ImageFormat;
use crate::value::Value;



/// Rank of the figure pane.
pub const PRIORITY : f64 = 0.5;

/// Pixels per inch of the displayed figure.
pub const POINTS_PER_INCH : f64 = 72.0;



// ==============
// === Figure ===
// ==============

/// A figure which can be rasterized.
pub trait Figure : Debug {
    /// Width and height in inches.
    fn size_inches(&self) -> (f64,f64);

    /// Rasterizes the figure to PNG at the given resolution.
    fn render_png(&self, dpi:u32) -> Result<Vec<u8>>;
}

/// Displayed size of the figure in pixels.
pub fn shape(figure:&dyn Figure) -> (u32,u32) {
    let (width,height) = figure.size_inches();
    ((width * POINTS_PER_INCH) as u32, (height * POINTS_PER_INCH) as u32)
}

#[derive(Clone,Copy,Debug)]
struct Rasterized;

impl DivContent for Rasterized {
    fn properties(&self, pane:&Pane) -> Result<Properties> {
        let value  = pane.value()?;
        let figure = value.as_figure().ok_or_else(|| {
            let pane     = pane.type_name();
            let expected = "figure".to_string();
            let actual   = value.type_name();
            Error::TypeMismatch {pane,expected,actual}
        })?;
        let data = figure.render_png(pane.config().dpi)?;
        image::image_properties(pane,ImageFormat::Png,&data,shape(figure))
    }
}

/// Checks whether the value is a figure.
pub fn applies(value:&Value) -> bool {
    value.as_figure().is_some()
}

/// The figure pane type.
pub fn pane_type() -> PaneType {
    let factory = |_:&Config| Ok(Box::new(DivRenderer::new(Rasterized)) as Box<dyn Renderer>);
    PaneType::new("Figure","figure",PRIORITY,applies,factory).with_options(&["dpi"])
}



// =============
// === Tests ===
// =============
