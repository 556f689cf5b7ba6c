//! Resolution of values to pane types. Pane types are ranked by priority; a value is wrapped by
//! the highest ranked type accepting it, ties going to the type registered first.

use crate::prelude::*;

use crate::document::Properties;
use crate::pane::Pane;
use crate::pane::PaneType;
use crate::pane::composite;
use crate::pane::figure;
use crate::pane::html;
use crate::pane::image;
use crate::pane::image::ImageFormat;
use crate::pane::native;
use crate::pane::text;
use crate::value::Value;



// ================
// === Registry ===
// ================

/// Registered pane types. Clones share the registrations.
#[derive(Clone,Debug)]
pub struct Registry {
    logger  : Logger,
    entries : Rc<RefCell<Vec<Rc<PaneType>>>>,
}

impl Registry {
    /// A registry without pane types.
    pub fn empty() -> Self {
        let logger  = Logger::new("registry");
        let entries = default();
        Self {logger,entries}
    }

    /// A registry with the built-in pane types: native nodes, the image formats, figures,
    /// composites of plots, HTML and the text fallback. Plot panes need backends and are
    /// registered separately.
    pub fn with_default_panes() -> Self {
        let registry = Self::empty();
        registry.register(native::pane_type());
        for format in &ImageFormat::ALL {
            registry.register(image::pane_type(*format));
        }
        registry.register(figure::pane_type());
        registry.register(composite::pane_type());
        registry.register(html::pane_type());
        registry.register(text::pane_type());
        registry
    }

    /// Registers a pane type.
    pub fn register(&self, pane_type:PaneType) -> Rc<PaneType> {
        let pane_type = Rc::new(pane_type);
        let name      = &pane_type.name;
        trace!(self.logger, "Registering {name} pane type.");
        self.entries.borrow_mut().push(pane_type.clone_ref());
        pane_type
    }

    /// Registered pane types, highest priority first. Equal priorities keep registration order.
    pub fn pane_types(&self) -> Vec<Rc<PaneType>> {
        let mut types = self.entries.borrow().clone();
        types.sort_by(|a,b| b.priority.partial_cmp(&a.priority).unwrap_or(std::cmp::Ordering::Equal));
        types
    }

    /// The pane type displaying the value. A pane is displayed by its own type. Fails with
    /// `UnsupportedValue` if no registered type accepts the value.
    pub fn resolve(&self, value:&Value) -> Result<Rc<PaneType>> {
        if let Some(pane) = value.as_pane() {
            return Ok(pane.pane_type().clone_ref())
        }
        let found = self.pane_types().into_iter().find(|tp| tp.applies(value));
        match found {
            Some(pane_type) => {
                let name = &pane_type.name;
                debug!(self.logger, "Resolved {value:?} to {name} pane type.");
                Ok(pane_type)
            }
            None => {
                let kind = value.type_name();
                Err(Error::UnsupportedValue {kind})
            }
        }
    }

    /// Wraps the value in a pane of the resolved type, configured by the configuration map. A
    /// pane is returned as is.
    pub fn pane(&self, value:impl Into<Value>, options:&Properties) -> Result<Pane> {
        let value = value.into();
        if let Some(pane) = value.as_pane() {
            return Ok(pane.clone_ref())
        }
        let pane_type = self.resolve(&value)?;
        let config    = pane_type.config(options)?;
        Pane::new(pane_type,value,config)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_default_panes()
    }
}

impl CloneRef for Registry {
    fn clone_ref(&self) -> Self {
        self.clone()
    }
}



// =============
// === Tests ===
// =============
