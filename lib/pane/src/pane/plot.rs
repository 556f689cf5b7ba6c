//! Declarative visualizations rendered by a plotting backend.
//!
//! The backend turns the visualization into a `Plot`, whose current state is displayed by an
//! inner pane. Widgets are synthesized from the dimensions of the visualization and laid out next
//! to the plot. Moving a widget recomputes the plot at the tuple of the widget values.
//!
//! The plot pane always displays a `Row` layout of its own, holding the node of the inner pane.
//! The inner pane splices its replacements into that layout, which the plot pane alone replaces.

use crate::prelude::*;

use crate::config::Config;
use crate::dimension;
use crate::dimension::Visualization;
use crate::document;
use crate::document::Document;
use crate::document::Node;
use crate::document::NodeId;
use crate::document::NodeKind;
use crate::document::Session;
use crate::error::RenderError;
use crate::pane::Pane;
use crate::pane::PaneType;
use crate::pane::RenderContext;
use crate::pane::Renderer;
use crate::registry::Registry;
use crate::value::Scalar;
use crate::value::Value;
use crate::widget::WeakWidget;
use crate::widget::Widget;



/// Rank of the plot pane.
pub const PRIORITY : f64 = 0.8;

/// Name reported when no backend is selected and none is current.
pub const NO_BACKEND : &str = "default";



// ============
// === Plot ===
// ============

/// A visualization rendered by a backend.
pub trait Plot : Debug {
    /// Object displaying the current state of the plot, typically a document node.
    fn state(&self) -> Value;

    /// Recomputes the plot at the given key, one value per widget.
    fn update(&self, key:&[Scalar]) -> Result<()>;

    /// Whether `update` modifies the nodes of `state` in place. Otherwise `state` is displayed
    /// anew after every update.
    fn is_incremental(&self) -> bool {
        false
    }

    /// Sends the pending changes of the plot to a live session.
    fn push(&self, document:&Document, session:&dyn Session) {
        document::flush(document,session)
    }

    /// Makes the plot refer to the root of the tree it is displayed in.
    fn bind_root(&self, _root:&Node, _live:bool) {}

    /// Detaches resources tied to the node which displayed the plot.
    fn cleanup(&self, _node:&Node) {}
}



// ===================
// === PlotBackend ===
// ===================

/// A plotting library able to render visualizations.
pub trait PlotBackend : Debug {
    /// Name the backend is selected by.
    fn name(&self) -> &str;

    /// Renders the visualization.
    fn render(&self, vis:&dyn Visualization, ctx:&RenderContext) -> Result<Rc<dyn Plot>>;
}

#[derive(Debug,Default)]
struct BackendsModel {
    backends : Vec<Rc<dyn PlotBackend>>,
    current  : Option<String>,
}

/// Registered plotting backends. The first registered backend becomes the current one.
#[derive(Clone,Debug,Default)]
pub struct Backends {
    model : Rc<RefCell<BackendsModel>>,
}

impl Backends {
    /// Constructor.
    pub fn new() -> Self {
        default()
    }

    /// Registers a backend, replacing a backend of the same name.
    pub fn register(&self, backend:impl PlotBackend + 'static) {
        let mut model = self.model.borrow_mut();
        let name      = backend.name().to_string();
        model.backends.retain(|b| b.name() != name);
        model.backends.push(Rc::new(backend));
        if model.current.is_none() {
            model.current = Some(name);
        }
    }

    /// Makes the named backend the current one.
    pub fn set_current(&self, name:&str) -> Result<()> {
        self.get(Some(name))?;
        self.model.borrow_mut().current = Some(name.into());
        Ok(())
    }

    /// Name of the current backend.
    pub fn current(&self) -> Option<String> {
        self.model.borrow().current.clone()
    }

    /// The named backend, or the current one. Fails with `BackendNotInitialized` if there is none.
    pub fn get(&self, name:Option<&str>) -> Result<Rc<dyn PlotBackend>> {
        let model   = self.model.borrow();
        let name    = name.map(String::from).or_else(|| model.current.clone());
        let backend = name.as_ref().and_then(|n| model.backends.iter().find(|b| b.name() == n));
        backend.cloned().ok_or_else(|| {
            let backend = name.unwrap_or_else(|| NO_BACKEND.into());
            RenderError::BackendNotInitialized {backend}.into()
        })
    }
}

impl CloneRef for Backends {
    fn clone_ref(&self) -> Self {
        self.clone()
    }
}



// ====================
// === PlotRenderer ===
// ====================

/// A plot displayed by one layout, together with the pane displaying its state and the nodes
/// displaying its widgets.
#[derive(Debug)]
struct Rendered {
    plot     : Rc<dyn Plot>,
    inner    : Pane,
    node     : Node,
    controls : Vec<(WeakWidget,Node)>,
}

/// Renders visualizations with the selected backend.
#[derive(Debug)]
pub struct PlotRenderer {
    logger   : Logger,
    backends : Backends,
    panes    : Registry,
    widgets  : RefCell<Vec<Widget>>,
    rendered : RefCell<HashMap<NodeId,Rendered>>,
}

impl PlotRenderer {
    /// Constructor. The state of plots is displayed by the default pane types.
    pub fn new(backends:&Backends) -> Self {
        let logger   = Logger::new("pane.Plot.renderer");
        let backends = backends.clone_ref();
        let panes    = Registry::with_default_panes();
        let widgets  = default();
        let rendered = default();
        Self {logger,backends,panes,widgets,rendered}
    }

    /// Subscribes the plot to the widgets. The subscriptions are tied to the layout node.
    fn link_widgets
    (&self, pane:&Pane, layout:&Node, widgets:&[Widget], plot:&Rc<dyn Plot>, inner:&Pane
    , ctx:&RenderContext) {
        let weak_widgets = widgets.iter().map(Widget::downgrade).collect_vec();
        for widget in widgets {
            let weak_widgets = weak_widgets.clone();
            let plot         = plot.clone_ref();
            let inner        = inner.clone_ref();
            let ctx          = ctx.clone();
            let key_node     = layout.id();
            let logger       = self.logger.clone();
            let handle       = widget.on_change(move |_| {
                let key = weak_widgets.iter().filter_map(WeakWidget::upgrade).map(|w| w.value());
                let key = key.collect_vec();
                debug!(logger, "Widgets moved to {key:?}.");
                update_plot(&plot,&inner,key,&ctx,key_node,&logger)
            });
            pane.add_subscription(layout,handle);
        }
    }
}

fn update_plot
( plot:&Rc<dyn Plot>, inner:&Pane, key:Vec<Scalar>, ctx:&RenderContext, key_node:NodeId
, logger:&Logger) -> Result<()> {
    if !plot.is_incremental() {
        plot.update(&key)?;
        return inner.set_object(plot.state())
    }
    match &ctx.session {
        Some(session) => {
            plot.update(&key)?;
            plot.push(&ctx.document,&**session);
        }
        None => {
            let plot   = plot.clone_ref();
            let logger = logger.clone();
            ctx.document.schedule_on_next_tick(key_node,move || {
                if let Err(error) = plot.update(&key) {
                    error!(logger, "Could not update the plot: {error}");
                }
            });
        }
    }
    Ok(())
}

impl Renderer for PlotRenderer {
    fn render(&self, pane:&Pane, ctx:&RenderContext) -> Result<Node> {
        let value  = pane.value()?;
        let vis    = value.as_visualization().ok_or_else(|| {
            let pane     = pane.type_name();
            let expected = "visualization".to_string();
            let actual   = value.type_name();
            Error::TypeMismatch {pane,expected,actual}
        })?;
        let config  = pane.config();
        let backend = self.backends.get(config.backend.as_deref())?;
        let widgets = dimension::widgets_from_dimensions(vis,&config.widgets)?;
        let plot    = backend.render(vis,ctx)?;
        plot.bind_root(&ctx.root,ctx.session.is_some());
        let inner   = self.panes.pane(plot.state(),&default())?;
        let layout  = Node::new(NodeKind::Row,config.layout_properties());
        let node    = inner.produce_node(&ctx.with_parent(&layout))?;
        let mut children = vec![node.clone_ref()];
        let mut controls = Vec::new();
        if config.show_widgets && !widgets.is_empty() {
            let nodes = widgets.iter().map(Widget::produce_node).collect_vec();
            controls  = widgets.iter().map(Widget::downgrade).zip(nodes.iter().cloned()).collect();
            children.push(Node::with_children(NodeKind::WidgetBox,default(),nodes));
        }
        layout.set_children(children);
        let count = widgets.len();
        debug!(pane.logger(), "Rendered with {} backend and {count} widgets.", backend.name());
        self.link_widgets(pane,&layout,&widgets,&plot,&inner,ctx);
        *self.widgets.borrow_mut() = widgets;
        self.rendered.borrow_mut().insert(layout.id(),Rendered {plot,inner,node,controls});
        Ok(layout)
    }

    fn cleanup(&self, _pane:&Pane, node:&Node) {
        let rendered = self.rendered.borrow_mut().remove(&node.id());
        if let Some(rendered) = rendered {
            for (widget,control) in &rendered.controls {
                if let Some(widget) = widget.upgrade() {
                    widget.release_node(control);
                }
            }
            rendered.plot.cleanup(node);
            if let Some(current) = node.children().first() {
                rendered.inner.release_resources(current,false);
            }
            rendered.inner.release_resources(&rendered.node,true);
        }
    }

    fn widgets(&self) -> Vec<Widget> {
        self.widgets.borrow().clone()
    }
}

/// Checks whether the value is a visualization.
pub fn applies(value:&Value) -> bool {
    value.as_visualization().is_some()
}

/// The plot pane type, rendering with the given backends.
pub fn pane_type(backends:&Backends) -> PaneType {
    let backends = backends.clone_ref();
    let factory  = move |_:&Config| Ok(Box::new(PlotRenderer::new(&backends)) as Box<dyn Renderer>);
    PaneType::new("Plot","visualization",PRIORITY,applies,factory)
        .with_options(&["backend","show_widgets"])
}



// =============
// === Tests ===
// =============
