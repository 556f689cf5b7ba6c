//! Fallback pane: any object, printed as preformatted text with its markup escaped.

use crate::prelude::*;

use crate::config::Config;
use crate::document::Properties;
use crate::pane::Pane;
use crate::pane::PaneType;
use crate::pane::Renderer;
use crate::pane::div;
use crate::pane::div::DivContent;
use crate::pane::div::DivRenderer;



/// Rank of the Str pane. The lowest, every other pane is a better representation.
pub const PRIORITY : f64 = 0.0;

/// Escapes the characters with a meaning in HTML.
pub fn escape(text:&str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c    => out.push(c),
        }
    }
    out
}

#[derive(Clone,Copy,Debug)]
struct Preformatted;

impl DivContent for Preformatted {
    fn properties(&self, pane:&Pane) -> Result<Properties> {
        let text = pane.value()?.to_text();
        Ok(div::with_text(pane,format!("<pre>{}</pre>",escape(&text))))
    }
}

/// The Str pane type.
pub fn pane_type() -> PaneType {
    let factory = |_:&Config| Ok(Box::new(DivRenderer::new(Preformatted)) as Box<dyn Renderer>);
    PaneType::new("Str","any",PRIORITY,|_| true,factory)
}



// =============
// === Tests ===
// =============
