//! Configuration of panes. Options arrive either typed (`Config` with public fields) or as a
//! configuration map which is validated against the options recognized by a pane type.

use crate::prelude::*;

use crate::document::Properties;
use crate::error::ConfigError;
use crate::widget::WidgetOverride;

use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;



// ==================
// === SizingMode ===
// ==================

/// How the item being displayed should size itself.
#[derive(Clone,Copy,Debug,Deserialize,Display,Eq,Hash,PartialEq,Serialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum SizingMode {
    #[display(fmt = "fixed")]        Fixed,
    #[display(fmt = "scale_width")]  ScaleWidth,
    #[display(fmt = "scale_height")] ScaleHeight,
    #[display(fmt = "scale_both")]   ScaleBoth,
    #[display(fmt = "stretch_both")] StretchBoth,
}



// ==============
// === Config ===
// ==============

/// Options recognized by every pane type.
pub const COMMON_OPTIONS : &[&str] = &["width","height","sizing_mode","sizingMode","style"];

/// Resolution used to rasterize figures, unless configured otherwise.
pub const DEFAULT_DPI : u32 = 144;

/// Configuration of a single pane.
#[derive(Clone,Debug,Deserialize)]
#[serde(default)]
pub struct Config {
    /// Explicit width in pixels.
    pub width        : Option<u32>,
    /// Explicit height in pixels.
    pub height       : Option<u32>,
    /// Sizing behavior of the node.
    #[serde(alias = "sizingMode")]
    pub sizing_mode  : Option<SizingMode>,
    /// CSS property/value pairs.
    pub style        : BTreeMap<String,String>,
    /// Resolution of rasterized figures. Must be at least 1.
    pub dpi          : u32,
    /// Plotting backend used by plot panes. The current backend if unset.
    pub backend      : Option<String>,
    /// Whether plot panes lay out the widgets they synthesize.
    pub show_widgets : bool,
    /// Explicit widgets of plot panes, by dimension name.
    #[serde(skip)]
    pub widgets      : HashMap<String,WidgetOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width        : None,
            height       : None,
            sizing_mode  : None,
            style        : default(),
            dpi          : DEFAULT_DPI,
            backend      : None,
            show_widgets : true,
            widgets      : default(),
        }
    }
}

impl Config {
    /// Parses a configuration map for the named pane type, which recognizes `options` on top of
    /// the common ones.
    pub fn for_pane(pane:&str, options:&[&str], map:&Properties) -> Result<Self> {
        let recognized = |key:&str| COMMON_OPTIONS.contains(&key) || options.contains(&key);
        if let Some(key) = map.keys().find(|key| !recognized(key.as_str())) {
            let pane   = pane.into();
            let option = key.clone();
            return Err(ConfigError::UnknownOption {pane,option}.into())
        }
        let value  = serde_json::Value::Object(map.clone());
        let config = serde_json::from_value::<Self>(value).map_err(|e| malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value constraints which the types do not express.
    pub fn validate(&self) -> Result<()> {
        if self.dpi < 1 {
            return Err(malformed(format!("dpi must be at least 1, got {}",self.dpi)))
        }
        Ok(())
    }

    /// Sets an explicit widget for the named dimension.
    pub fn with_widget(mut self, dimension:impl Into<String>, widget:WidgetOverride) -> Self {
        self.widgets.insert(dimension.into(),widget);
        self
    }

    /// The sizing and style properties which are set, as node properties.
    pub fn layout_properties(&self) -> Properties {
        let mut properties = Properties::new();
        if let Some(width) = self.width {
            properties.insert("width".into(),width.into());
        }
        if let Some(height) = self.height {
            properties.insert("height".into(),height.into());
        }
        if let Some(mode) = self.sizing_mode {
            properties.insert("sizing_mode".into(),mode.to_string().into());
        }
        if !self.style.is_empty() {
            let style = self.style.iter().map(|(k,v)| (k.clone(),v.as_str().into())).collect();
            properties.insert("style".into(),serde_json::Value::Object(style));
        }
        properties
    }
}

fn malformed(reason:String) -> Error {
    ConfigError::Malformed {reason}.into()
}



// =============
// === Tests ===
// =============
