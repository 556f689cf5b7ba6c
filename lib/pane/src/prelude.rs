//! Common imports of the pane library.

pub use derivative::Derivative;
pub use derive_more::Display;
pub use failure::Fail;
pub use itertools::Itertools;
pub use logger::LoggerApi;
pub use logger::enabled::Logger;
pub use shrinkwraprs::Shrinkwrap;
pub use std::cell::Cell;
pub use std::cell::RefCell;
pub use std::collections::HashMap;
pub use std::fmt::Debug;
pub use std::rc::Rc;
pub use std::rc::Weak;

pub use crate::error::Error;
pub use crate::error::Result;



/// Alias for `Default::default()`.
pub fn default<T:Default>() -> T {
    Default::default()
}



// ================
// === CloneRef ===
// ================

/// Clone for internal-mutable structures. This trait can be implemented only if mutating one
/// structure will be reflected in all of its clones. Nodes, documents, panes and widgets are
/// handles, and `clone_ref` makes it explicit at the call site that no data is copied.
pub trait CloneRef: Sized {
    /// Creates another handle to the same shared data.
    fn clone_ref(&self) -> Self;
}

impl<T:?Sized> CloneRef for Rc<T> {
    fn clone_ref(&self) -> Self {
        self.clone()
    }
}

impl<T:CloneRef> CloneRef for Option<T> {
    fn clone_ref(&self) -> Self {
        self.as_ref().map(CloneRef::clone_ref)
    }
}
