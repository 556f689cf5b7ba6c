//! Markup passed through to a `Div`: strings, and objects with an HTML representation.

use crate::prelude::*;

use crate::config::Config;
use crate::document::Properties;
use crate::pane::Pane;
use crate::pane::PaneType;
use crate::pane::Renderer;
use crate::pane::div;
use crate::pane::div::DivContent;
use crate::pane::div::DivRenderer;
use crate::value::Value;



/// Rank of the HTML pane.
pub const PRIORITY : f64 = 0.2;

#[derive(Clone,Copy,Debug)]
struct Markup;

impl DivContent for Markup {
    fn properties(&self, pane:&Pane) -> Result<Properties> {
        let value = pane.value()?;
        let text  = value.repr_html().or_else(|| value.as_str().map(String::from));
        Ok(div::with_text(pane,text.unwrap_or_default()))
    }
}

/// Checks whether the value is markup.
pub fn applies(value:&Value) -> bool {
    value.as_str().is_some() || value.repr_html().is_some()
}

/// The HTML pane type.
pub fn pane_type() -> PaneType {
    let factory = |_:&Config| Ok(Box::new(DivRenderer::new(Markup)) as Box<dyn Renderer>);
    PaneType::new("HTML","HTML",PRIORITY,applies,factory)
}



// =============
// === Tests ===
// =============
