//! Control widgets. A widget exposes a current value and notifies its observers when the value
//! changes. Widgets are shared handles, the same widget may be displayed by several nodes.

use crate::prelude::*;

use crate::document;
use crate::document::Node;
use crate::document::NodeKind;
use crate::error::ConfigError;
use crate::value::Scalar;

use enso_callback as callback;
use serde_json::json;
use std::fmt;



// ==================
// === WidgetType ===
// ==================

/// Kinds of widgets. A type can be given explicitly as the constructor of a synthesized widget.
#[derive(Clone,Copy,Debug,Display,Eq,Hash,PartialEq)]
pub enum WidgetType {
    /// Slider moving over a finite list of labeled values.
    DiscreteSlider,
    /// Choice list.
    Select,
    /// Slider over a continuous range.
    FloatSlider,
}

impl WidgetType {
    /// Builds a widget of this type. Fails if the type cannot display the options.
    pub fn construct(self, name:&str, options:Options, value:Scalar) -> Result<Widget> {
        let valid = match (self,&options) {
            (WidgetType::FloatSlider, Options::Range{..}) => true,
            (WidgetType::FloatSlider, _)                  => false,
            (_, Options::Range{..})                       => false,
            _                                             => true,
        };
        if !valid {
            let dimension = name.into();
            let reason    = format!("{} cannot display {}",self,options.describe());
            return Err(ConfigError::InvalidWidget {dimension,reason}.into())
        }
        Ok(Widget::new(self,name,options,value))
    }

    fn node_kind(self) -> NodeKind {
        match self {
            WidgetType::Select => NodeKind::Select,
            _                  => NodeKind::Slider,
        }
    }
}



// ===============
// === Options ===
// ===============

/// Values a widget can take.
#[derive(Clone,Debug,PartialEq)]
pub enum Options {
    /// Values shown under the given labels.
    Labeled(Vec<(String,Scalar)>),
    /// Values shown as they print.
    List(Vec<Scalar>),
    /// A continuous range.
    Range {
        /// Lower bound.
        start : f64,
        /// Upper bound.
        end   : f64,
        /// Distance between consecutive positions.
        step  : f64,
    },
}

impl Options {
    /// Labels of the discrete values.
    pub fn labels(&self) -> Vec<String> {
        match self {
            Options::Labeled(pairs) => pairs.iter().map(|(label,_)| label.clone()).collect(),
            Options::List(values)   => values.iter().map(|v| v.to_string()).collect(),
            Options::Range{..}      => default(),
        }
    }

    /// The discrete values.
    pub fn values(&self) -> Vec<Scalar> {
        match self {
            Options::Labeled(pairs) => pairs.iter().map(|(_,value)| value.clone()).collect(),
            Options::List(values)   => values.clone(),
            Options::Range{..}      => default(),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Options::Range{..} => "a continuous range",
            _                  => "a list of values",
        }
    }

    fn to_properties(&self) -> document::Properties {
        match self {
            Options::Range {start,end,step} =>
                document::properties(vec![("start",json!(start)),("end",json!(end)),("step",json!(step))]),
            _ => document::properties(vec![("options",json!(self.labels()))]),
        }
    }
}



// ==============
// === Widget ===
// ==============

struct WidgetModel {
    logger    : Logger,
    kind      : WidgetType,
    name      : String,
    options   : Options,
    value     : RefCell<Scalar>,
    nodes     : RefCell<Vec<Node>>,
    on_change : callback::Registry1<Scalar,Result<()>>,
}

/// A control widget.
#[derive(Clone)]
pub struct Widget {
    model : Rc<WidgetModel>,
}

/// Weak version of `Widget`.
#[derive(Clone)]
pub struct WeakWidget {
    model : Weak<WidgetModel>,
}

impl Widget {
    fn new(kind:WidgetType, name:&str, options:Options, value:Scalar) -> Self {
        let logger    = Logger::new(format!("widget.{}",name));
        let name      = name.into();
        let value     = RefCell::new(value);
        let nodes     = default();
        let on_change = default();
        Self {model:Rc::new(WidgetModel {logger,kind,name,options,value,nodes,on_change})}
    }

    /// Weak handle to this widget.
    pub fn downgrade(&self) -> WeakWidget {
        WeakWidget {model:Rc::downgrade(&self.model)}
    }

    /// Type of the widget.
    pub fn kind(&self) -> WidgetType {
        self.model.kind
    }

    /// Name shown as the widget title.
    pub fn name(&self) -> &str {
        &self.model.name
    }

    /// Values the widget can take.
    pub fn options(&self) -> &Options {
        &self.model.options
    }

    /// The current value.
    pub fn value(&self) -> Scalar {
        self.model.value.borrow().clone()
    }

    /// Sets the value, updates the nodes displaying the widget and notifies the observers. The
    /// first error raised by an observer is returned.
    pub fn set_value(&self, value:impl Into<Scalar>) -> Result<()> {
        let value = value.into();
        debug!(self.model.logger, "Value set to {value}.");
        *self.model.value.borrow_mut() = value.clone();
        let update = document::properties(vec![("value",value.to_json())]);
        for node in self.model.nodes.borrow().iter() {
            node.update_properties(update.clone());
        }
        self.model.on_change.try_run_all(&value)
    }

    /// Registers an observer of value changes. It stays registered while the handle is alive.
    pub fn on_change(&self, f:impl Fn(&Scalar) -> Result<()> + 'static) -> callback::Handle {
        self.model.on_change.add(f)
    }

    /// Builds a node displaying the widget.
    pub fn produce_node(&self) -> Node {
        let mut properties = self.model.options.to_properties();
        properties.insert("title".into(),json!(self.model.name));
        properties.insert("value".into(),self.value().to_json());
        let node = Node::new(self.model.kind.node_kind(),properties);
        self.model.nodes.borrow_mut().push(node.clone_ref());
        node
    }

    /// Stops updating a node built by `produce_node`.
    pub fn release_node(&self, node:&Node) {
        self.model.nodes.borrow_mut().retain(|n| n != node);
    }
}

impl WeakWidget {
    /// Upgrades to a strong handle, if the widget is still alive.
    pub fn upgrade(&self) -> Option<Widget> {
        self.model.upgrade().map(|model| Widget {model})
    }
}

impl CloneRef for Widget {
    fn clone_ref(&self) -> Self {
        self.clone()
    }
}

impl PartialEq for Widget {
    fn eq(&self, other:&Self) -> bool {
        Rc::ptr_eq(&self.model,&other.model)
    }
}

impl Debug for Widget {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"{}({:?}, value: {})",self.kind(),self.name(),self.value())
    }
}

impl Debug for WeakWidget {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"WeakWidget")
    }
}



// ======================
// === WidgetOverride ===
// ======================

/// Widget given explicitly for a dimension.
#[derive(Clone,Debug)]
pub enum WidgetOverride {
    /// Used as is.
    Instance(Widget),
    /// Used as the constructor of the synthesized widget.
    Type(WidgetType),
}

impl From<Widget> for WidgetOverride {
    fn from(widget:Widget) -> Self {
        WidgetOverride::Instance(widget)
    }
}

impl From<WidgetType> for WidgetOverride {
    fn from(tp:WidgetType) -> Self {
        WidgetOverride::Type(tp)
    }
}



// =============
// === Tests ===
// =============
