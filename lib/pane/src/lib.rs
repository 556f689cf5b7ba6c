//! Panes: wrappers turning arbitrary objects into nodes of a document tree.
//!
//! A `Registry` resolves a value to the best ranked `PaneType` accepting it. The resulting `Pane`
//! renders the value into a node and keeps that node up to date when the value is reassigned,
//! either patching it in place or splicing a replacement into the tree. Declarative
//! visualizations get control widgets synthesized from their dimensions.

#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_import_braces)]

#[macro_use]
extern crate logger;

pub mod binding;
pub mod config;
pub mod dimension;
pub mod document;
pub mod error;
pub mod pane;
pub mod prelude;
pub mod registry;
pub mod value;
pub mod widget;

pub use config::Config;
pub use document::Document;
pub use document::Node;
pub use error::Error;
pub use error::Result;
pub use pane::Pane;
pub use pane::PaneType;
pub use registry::Registry;
pub use value::Object;
pub use value::Value;
pub use widget::Widget;
