//! Objects with an HTML representation composed of several plots. Unless configured, the `Div` is
//! sized to hold the plots stacked vertically: as wide as the widest and as high as all of them.

use crate::prelude::*;

use crate::config::Config;
use crate::document::Properties;
use crate::pane::Pane;
use crate::pane::PaneType;
use crate::pane::Renderer;
use crate::pane::div;
use crate::pane::div::DivContent;
use crate::pane::div::DivRenderer;
use crate::pane::image;
use crate::value::Value;



/// Rank of the composite pane.
pub const PRIORITY : f64 = 0.5;

/// Size of the plots stacked vertically.
pub fn stacked_shape(subplots:&[Vec<u8>]) -> Result<(u32,u32)> {
    subplots.iter().try_fold((0,0),|(width,height),png| {
        let (w,h) = image::png_shape(png)?;
        Ok((width.max(w),height + h))
    })
}

#[derive(Clone,Copy,Debug)]
struct Stacked;

impl DivContent for Stacked {
    fn properties(&self, pane:&Pane) -> Result<Properties> {
        let value      = pane.value()?;
        let config     = pane.config();
        let text       = value.repr_html().unwrap_or_default();
        let mut result = div::with_text(pane,text);
        if config.width.is_none() || config.height.is_none() {
            let subplots       = value.repr_subplots().unwrap_or_default();
            let (width,height) = stacked_shape(&subplots)?;
            result.insert("width".into(),config.width.unwrap_or(width).into());
            result.insert("height".into(),config.height.unwrap_or(height).into());
        }
        Ok(result)
    }
}

/// Checks whether the value is markup composed of plots.
pub fn applies(value:&Value) -> bool {
    value.repr_html().is_some() && value.repr_subplots().is_some()
}

/// The composite pane type.
pub fn pane_type() -> PaneType {
    let factory = |_:&Config| Ok(Box::new(DivRenderer::new(Stacked)) as Box<dyn Renderer>);
    PaneType::new("Composite","HTML composed of plots",PRIORITY,applies,factory)
}



// =============
// === Tests ===
// =============

#[cfg(test)]
mod tests {
    use super::*;

    use crate::document::Document;
    use crate::value::Object;

    use serde_json::json;

    fn png(width:u32, height:u32) -> Vec<u8> {
        let mut data = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data
    }

    #[derive(Debug)]
    struct Panels {
        shapes : Vec<(u32,u32)>,
    }

    impl Object for Panels {
        fn repr_html(&self) -> Option<String> {
            Some("<div class='panels'></div>".into())
        }

        fn repr_subplots(&self) -> Option<Vec<Vec<u8>>> {
            Some(self.shapes.iter().map(|&(w,h)| png(w,h)).collect())
        }
    }

    fn displayed(panels:Panels, options:serde_json::Value) -> Result<crate::document::Node> {
        let pane_type = Rc::new(pane_type());
        let config    = pane_type.config(options.as_object().unwrap())?;
        let pane      = Pane::new(pane_type,Value::new(panels),config)?;
        let root      = pane.get_root(&Document::new(),None)?;
        Ok(root.children()[0].clone())
    }

    #[test]
    fn plots_are_stacked() {
        let node = displayed(Panels {shapes:vec![(300,200),(400,100)]},json!({})).unwrap();
        assert_eq!(node.property("text")  , Some(json!("<div class='panels'></div>")));
        assert_eq!(node.property("width") , Some(json!(400)));
        assert_eq!(node.property("height"), Some(json!(300)));
    }

    #[test]
    fn configured_sizes_win() {
        let node = displayed(Panels {shapes:vec![(300,200),(400,100)]},json!({"width":120})).unwrap();
        assert_eq!(node.property("width") , Some(json!(120)));
        assert_eq!(node.property("height"), Some(json!(300)));
    }

    #[test]
    fn truncated_plots_fail_to_render() {
        let error = stacked_shape(&[png(1,1)[..18].to_vec()]).unwrap_err();
        assert!(error.is_render_error());
        assert_eq!(stacked_shape(&[]).unwrap(), (0,0));
    }
}
