//! Synthesis of control widgets from the dimensions of a declarative visualization.
//!
//! Every dimension which is constrained, either by a list of values or by a continuous range,
//! gets exactly one widget, in the order the visualization declares its dimensions.

use crate::prelude::*;

use crate::error::ConfigError;
use crate::value::Scalar;
use crate::widget::Options;
use crate::widget::Widget;
use crate::widget::WidgetOverride;
use crate::widget::WidgetType;



// =================
// === Constants ===
// =================

/// Name of the dimension of static visualizations, which index a single frame.
pub const FRAME_DIMENSION : &str = "Frame";

/// Step of continuous sliders whose dimension declares none.
pub const DEFAULT_STEP : f64 = 0.1;



// =================
// === Dimension ===
// =================

/// A named axis of variation of a visualization.
#[derive(Clone,Debug,Default,PartialEq)]
pub struct Dimension {
    /// Identifier of the dimension.
    pub name    : String,
    /// Human readable name. The name if unset.
    pub label   : Option<String>,
    /// Declared discrete values.
    pub values  : Vec<Scalar>,
    /// Declared continuous range. Only a range with both bounds constrains the dimension.
    pub range   : (Option<f64>,Option<f64>),
    /// Declared default value.
    pub default : Option<Scalar>,
    /// Declared step of the continuous range.
    pub step    : Option<f64>,
}

impl Dimension {
    /// An unconstrained dimension.
    pub fn new(name:impl Into<String>) -> Self {
        let name = name.into();
        Self {name,..default()}
    }

    /// Sets the human readable name.
    pub fn with_label(mut self, label:impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Declares the discrete values.
    pub fn with_values<T:Into<Scalar>>(mut self, values:impl IntoIterator<Item=T>) -> Self {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Declares the continuous range.
    pub fn with_range(mut self, start:f64, end:f64) -> Self {
        self.range = (Some(start),Some(end));
        self
    }

    /// Declares the default value.
    pub fn with_default(mut self, default:impl Into<Scalar>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Declares the step of the continuous range.
    pub fn with_step(mut self, step:f64) -> Self {
        self.step = Some(step);
        self
    }

    /// The label, or the name if no label was set.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Both bounds of the range, if declared.
    pub fn bounds(&self) -> Option<(f64,f64)> {
        match self.range {
            (Some(start),Some(end)) => Some((start,end)),
            _                       => None,
        }
    }

    /// Formats a value of this dimension. Whole floats keep a trailing `.0`.
    pub fn pprint_value(&self, value:&Scalar) -> String {
        match value {
            Scalar::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.1}",f),
            other                                                 => other.to_string(),
        }
    }
}



// =====================
// === Visualization ===
// =====================

/// Declarative visualization indexed by its dimensions.
pub trait Visualization : Debug {
    /// Dimensions in declaration order.
    fn dimensions(&self) -> Vec<Dimension>;

    /// Indexing keys of the visualization. Each key holds one value per dimension.
    fn keys(&self) -> Vec<Vec<Scalar>>;
}

fn is_static(dimensions:&[Dimension], keys:&[Vec<Scalar>]) -> bool {
    let single_frame = matches!(dimensions, [dim] if dim.name == FRAME_DIMENSION);
    single_frame && keys == [vec![Scalar::Int(0)]]
}

/// Distinct values of the dimension at `index` across the keys, in encounter order.
fn observed_values(keys:&[Vec<Scalar>], index:usize) -> Vec<Scalar> {
    let mut values : Vec<Scalar> = Vec::new();
    for value in keys.iter().filter_map(|key| key.get(index)) {
        if !values.contains(value) {
            values.push(value.clone());
        }
    }
    values
}



// ===============
// === Widgets ===
// ===============

/// Builds one widget per constrained dimension of the visualization. Explicit widgets given in
/// `overrides` by dimension name are used as is; explicit widget types replace the synthesized
/// type.
pub fn widgets_from_dimensions
(vis:&dyn Visualization, overrides:&HashMap<String,WidgetOverride>) -> Result<Vec<Widget>> {
    let dimensions = vis.dimensions();
    let keys       = vis.keys();
    if is_static(&dimensions,&keys) {
        return Ok(default())
    }
    let mut widgets = Vec::new();
    for (index,dim) in dimensions.iter().enumerate() {
        let widget_type = match overrides.get(&dim.name) {
            Some(WidgetOverride::Instance(widget)) => {
                widgets.push(widget.clone_ref());
                continue
            }
            Some(WidgetOverride::Type(tp)) => Some(*tp),
            None                           => None,
        };
        let values = if dim.values.is_empty() { observed_values(&keys,index) }
                     else                     { dim.values.clone() };
        if !values.is_empty() {
            widgets.push(discrete_widget(dim,values,widget_type)?);
        } else if let Some((start,end)) = dim.bounds() {
            let step    = dim.step.unwrap_or(DEFAULT_STEP);
            let default = dim.default.clone().unwrap_or(Scalar::Float(start));
            let options = Options::Range {start,end,step};
            let tp      = widget_type.unwrap_or(WidgetType::FloatSlider);
            widgets.push(tp.construct(dim.label(),options,default)?);
        } else if widget_type.is_some() {
            let dimension = dim.name.clone();
            let reason    = "the dimension declares neither values nor a range".to_string();
            return Err(ConfigError::InvalidWidget {dimension,reason}.into())
        }
    }
    Ok(widgets)
}

fn discrete_widget
(dim:&Dimension, mut values:Vec<Scalar>, widget_type:Option<WidgetType>) -> Result<Widget> {
    let numeric = values.iter().all(Scalar::is_numeric);
    let (options,tp) = if numeric {
        values.sort_by(|a,b| {
            let (a,b) = (a.as_f64().unwrap_or_default(),b.as_f64().unwrap_or_default());
            a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
        });
        let labeled = values.iter().map(|v| (dim.pprint_value(v),v.clone())).collect();
        (Options::Labeled(labeled),widget_type.unwrap_or(WidgetType::DiscreteSlider))
    } else {
        (Options::List(values.clone()),widget_type.unwrap_or(WidgetType::Select))
    };
    let default = dim.default.clone().or_else(|| values.first().cloned());
    let default = default.unwrap_or(Scalar::Int(0));
    tp.construct(dim.label(),options,default)
}



// =============
// === Tests ===
// =============

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug,Default)]
    struct Grid {
        dimensions : Vec<Dimension>,
        keys       : Vec<Vec<Scalar>>,
    }

    impl Visualization for Grid {
        fn dimensions(&self) -> Vec<Dimension> { self.dimensions.clone() }
        fn keys(&self) -> Vec<Vec<Scalar>> { self.keys.clone() }
    }

    fn synthesize(grid:&Grid) -> Vec<Widget> {
        widgets_from_dimensions(grid,&default()).unwrap()
    }

    #[test]
    fn values_come_from_keys() {
        let keys = vec![
            vec![Scalar::from(3),"b".into()],
            vec![Scalar::from(1),"a".into()],
            vec![Scalar::from(3),"a".into()],
        ];
        let grid    = Grid {dimensions:vec![Dimension::new("x"),Dimension::new("y")],keys};
        let widgets = synthesize(&grid);
        assert_eq!(widgets.len(), 2);
        assert_eq!(widgets[0].kind()             , WidgetType::DiscreteSlider);
        assert_eq!(widgets[0].options().labels() , vec!["1","3"]);
        assert_eq!(widgets[0].value()            , Scalar::Int(1));
        assert_eq!(widgets[1].kind()             , WidgetType::Select);
        assert_eq!(widgets[1].options().values() , vec![Scalar::from("b"),"a".into()]);
        assert_eq!(widgets[1].value()            , Scalar::from("b"));
    }

    #[test]
    fn declared_values_take_precedence() {
        let dim     = Dimension::new("z").with_values(vec![2.0,0.5]).with_default(2.0);
        let keys    = vec![vec![Scalar::from(7)]];
        let widgets = synthesize(&Grid {dimensions:vec![dim],keys});
        assert_eq!(widgets[0].options().labels(), vec!["0.5","2.0"]);
        assert_eq!(widgets[0].value(), Scalar::Float(2.0));
    }

    #[test]
    fn continuous_ranges() {
        let dim     = Dimension::new("t").with_label("Time").with_range(1.0,5.0);
        let widgets = synthesize(&Grid {dimensions:vec![dim],keys:vec![]});
        assert_eq!(widgets[0].kind(), WidgetType::FloatSlider);
        assert_eq!(widgets[0].name(), "Time");
        assert_eq!(widgets[0].options(), &Options::Range {start:1.0,end:5.0,step:DEFAULT_STEP});
        assert_eq!(widgets[0].value(), Scalar::Float(1.0));
    }

    #[test]
    fn unconstrained_dimensions_get_no_widget() {
        let mut half = Dimension::new("half");
        half.range   = (Some(0.0),None);
        let grid     = Grid {dimensions:vec![Dimension::new("free"),half],keys:vec![]};
        assert!(synthesize(&grid).is_empty());
    }

    #[test]
    fn static_objects_get_no_widgets() {
        let grid = Grid {dimensions:vec![Dimension::new(FRAME_DIMENSION)],keys:vec![vec![0.into()]]};
        assert!(synthesize(&grid).is_empty());
        let grid = Grid {dimensions:vec![Dimension::new(FRAME_DIMENSION)],keys:vec![vec![1.into()]]};
        assert_eq!(synthesize(&grid).len(), 1);
    }

    #[test]
    fn overrides() {
        let explicit = WidgetType::Select
            .construct("mine",Options::List(vec!["only".into()]),"only".into()).unwrap();
        let dims = vec![
            Dimension::new("a").with_values(vec!["p","q"]),
            Dimension::new("b").with_values(vec![1,2]),
            Dimension::new("c").with_range(0.0,1.0),
        ];
        let mut overrides = HashMap::new();
        overrides.insert("a".to_string(),WidgetOverride::from(explicit.clone()));
        overrides.insert("b".to_string(),WidgetOverride::from(WidgetType::Select));
        let grid    = Grid {dimensions:dims.clone(),keys:vec![]};
        let widgets = widgets_from_dimensions(&grid,&overrides).unwrap();
        assert_eq!(widgets[0], explicit);
        assert_eq!(widgets[1].kind(), WidgetType::Select);
        assert_eq!(widgets[1].options().labels(), vec!["1","2"]);
        assert_eq!(widgets[2].kind(), WidgetType::FloatSlider);

        overrides.insert("c".to_string(),WidgetOverride::from(WidgetType::DiscreteSlider));
        let error = widgets_from_dimensions(&grid,&overrides).unwrap_err();
        assert!(error.is_config_error());
    }
}
