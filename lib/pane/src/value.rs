//! Values displayed by panes.
//!
//! A `Value` is an opaque, shared handle to an application object. Panes never copy the object;
//! they hold a handle and query the object's capabilities through the `Object` trait, whose
//! optional methods play the role of representation protocols (an HTML representation, an
//! encoded image, a visualization with dimensions, ...).

use crate::prelude::*;

use crate::dimension::Visualization;
use crate::document::Node;
use crate::pane::Pane;
use crate::pane::figure::Figure;
use crate::pane::image::ImageFormat;

use serde::Deserialize;
use serde::Serialize;
use std::fmt;



// ==============
// === Object ===
// ==============

/// Capabilities of objects that can be wrapped in panes. Every method has a default, so an
/// implementation only declares the representations it actually supports.
pub trait Object : Debug + 'static {
    /// Short name of the object's type, used in error messages.
    fn type_name(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }

    /// The object viewed as text, if it is text.
    fn as_str(&self) -> Option<&str> {
        None
    }

    /// HTML representation of the object.
    fn repr_html(&self) -> Option<String> {
        None
    }

    /// Encoded image of the given format representing the object.
    fn repr_image(&self, _format:ImageFormat) -> Option<Vec<u8>> {
        None
    }

    /// Checks whether `repr_image` yields an image of the given format. Implementations with
    /// costly encoders should override it.
    fn has_image(&self, format:ImageFormat) -> bool {
        self.repr_image(format).is_some()
    }

    /// PNG images of the plots the object is composed of.
    fn repr_subplots(&self) -> Option<Vec<Vec<u8>>> {
        None
    }

    /// The object if it already is a document node.
    fn as_node(&self) -> Option<&Node> {
        None
    }

    /// The object if it already is a pane.
    fn as_pane(&self) -> Option<&Pane> {
        None
    }

    /// The object if it is a declarative visualization with dimensions.
    fn as_visualization(&self) -> Option<&dyn Visualization> {
        None
    }

    /// The object if it is a figure which can be rasterized.
    fn as_figure(&self) -> Option<&dyn Figure> {
        None
    }

    /// Plain text representation, used when nothing better applies.
    fn to_text(&self) -> String {
        format!("{:?}",self)
    }
}

fn short_type_name(name:&str) -> String {
    let base = name.split('<').next().unwrap_or(name);
    let args = &name[base.len()..];
    let base = base.rsplit("::").next().unwrap_or(base);
    format!("{}{}",base,args)
}


// === Instances ===

impl Object for String {
    fn type_name(&self) -> String { "str".into() }
    fn as_str(&self) -> Option<&str> { Some(self) }
    fn to_text(&self) -> String { self.clone() }
}

impl Object for &'static str {
    fn type_name(&self) -> String { "str".into() }
    fn as_str(&self) -> Option<&str> { Some(self) }
    fn to_text(&self) -> String { (*self).to_string() }
}

impl Object for Vec<u8> {
    fn type_name(&self) -> String { "bytes".into() }
    fn repr_image(&self, format:ImageFormat) -> Option<Vec<u8>> {
        self.has_image(format).then(|| self.clone())
    }
    fn has_image(&self, format:ImageFormat) -> bool {
        format.matches_signature(self)
    }
}

macro_rules! impl_display_object {
    ($($tp:ty),*) => {$(
        impl Object for $tp {
            fn to_text(&self) -> String { self.to_string() }
        }
    )*};
}

impl_display_object!(i32,i64,u32,u64,usize,f32,f64,bool);


// === Html ===

/// Text which is already HTML markup.
#[derive(Clone,Debug,Display,PartialEq)]
#[display(fmt = "{}", _0)]
pub struct Html(pub String);

impl Object for Html {
    fn repr_html(&self) -> Option<String> {
        Some(self.0.clone())
    }
}



// =============
// === Value ===
// =============

/// Shared handle to a displayed object.
#[derive(Clone,Shrinkwrap)]
pub struct Value(Rc<dyn Object>);

impl Value {
    /// Wraps an object.
    pub fn new<T:Object>(object:T) -> Self {
        Self(Rc::new(object))
    }

    /// Checks whether both values refer to the same object.
    pub fn ptr_eq(&self, other:&Value) -> bool {
        Rc::as_ptr(&self.0) as *const () == Rc::as_ptr(&other.0) as *const ()
    }
}

impl CloneRef for Value {
    fn clone_ref(&self) -> Self {
        self.clone()
    }
}

impl Debug for Value {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&*self.0,f)
    }
}

impl From<&'static str> for Value {
    fn from(t:&'static str) -> Self { Value::new(t) }
}

impl From<String> for Value {
    fn from(t:String) -> Self { Value::new(t) }
}

impl From<Vec<u8>> for Value {
    fn from(t:Vec<u8>) -> Self { Value::new(t) }
}

impl From<Html> for Value {
    fn from(t:Html) -> Self { Value::new(t) }
}

impl From<i64> for Value {
    fn from(t:i64) -> Self { Value::new(t) }
}

impl From<f64> for Value {
    fn from(t:f64) -> Self { Value::new(t) }
}

impl From<Node> for Value {
    fn from(t:Node) -> Self { Value::new(t) }
}

impl From<Pane> for Value {
    fn from(t:Pane) -> Self { Value::new(t) }
}



// ==============
// === Scalar ===
// ==============

/// A single value along a dimension, also used as the value of widgets.
#[derive(Clone,Debug,Deserialize,Display,PartialEq,Serialize)]
#[serde(untagged)]
#[allow(missing_docs)]
pub enum Scalar {
    #[display(fmt = "{}", _0)]
    Int(i64),
    #[display(fmt = "{}", _0)]
    Float(f64),
    #[display(fmt = "{}", _0)]
    Text(String),
}

impl Scalar {
    /// Checks whether the scalar is a number.
    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }

    /// The scalar as a floating point number, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i)   => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(_)  => None,
        }
    }

    /// Converts the scalar to a property value of a node.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Scalar::Int(i)   => serde_json::Value::from(*i),
            Scalar::Float(f) => serde_json::Value::from(*f),
            Scalar::Text(s)  => serde_json::Value::from(s.as_str()),
        }
    }
}

impl From<i64> for Scalar {
    fn from(t:i64) -> Self { Scalar::Int(t) }
}

impl From<i32> for Scalar {
    fn from(t:i32) -> Self { Scalar::Int(t as i64) }
}

impl From<f64> for Scalar {
    fn from(t:f64) -> Self { Scalar::Float(t) }
}

impl From<&str> for Scalar {
    fn from(t:&str) -> Self { Scalar::Text(t.into()) }
}

impl From<String> for Scalar {
    fn from(t:String) -> Self { Scalar::Text(t) }
}



// =============
// === Tests ===
// =============
