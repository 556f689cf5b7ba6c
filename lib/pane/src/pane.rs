//! Panes wrap an arbitrary object and render it as a document node. A `Pane` pairs one object
//! with the `Renderer` of its `PaneType` and keeps the nodes it produced up to date when the
//! object is reassigned.

pub mod composite;
pub mod div;
pub mod figure;
pub mod html;
pub mod image;
pub mod native;
pub mod plot;
pub mod text;

use crate::prelude::*;

use crate::binding;
use crate::binding::BindingState;
use crate::binding::Subscription;
use crate::config::Config;
use crate::document::Document;
use crate::document::Node;
use crate::document::NodeId;
use crate::document::NodeKind;
use crate::document::Properties;
use crate::document::Session;
use crate::error::RenderError;
use crate::value::Object;
use crate::value::Value;
use crate::widget::Widget;

use enso_callback as callback;



// ================
// === PaneType ===
// ================

/// Predicate telling whether a pane type can render a value.
pub type Predicate = dyn Fn(&Value) -> bool;

/// Constructor of the renderer of a pane type.
pub type RendererConstructor = dyn Fn(&Config) -> Result<Box<dyn Renderer>>;

/// A kind of pane: which values it accepts, how it ranks against other kinds and how its
/// renderer is built.
#[derive(Clone,Derivative)]
#[derivative(Debug)]
pub struct PaneType {
    /// Name of the pane type, as used in error messages.
    pub name     : String,
    /// Description of the values the pane type accepts.
    pub expected : String,
    /// Rank used when several pane types accept a value. Higher wins.
    pub priority : f64,
    /// Options recognized on top of the common ones.
    pub options  : Vec<&'static str>,
    #[derivative(Debug="ignore")]
    applies      : Rc<Predicate>,
    #[derivative(Debug="ignore")]
    factory      : Rc<RendererConstructor>,
}

impl PaneType {
    /// Constructor.
    pub fn new<A,F>
    (name:impl Into<String>, expected:impl Into<String>, priority:f64, applies:A, factory:F) -> Self
    where A : Fn(&Value) -> bool + 'static,
          F : Fn(&Config) -> Result<Box<dyn Renderer>> + 'static {
        let name     = name.into();
        let expected = expected.into();
        let options  = default();
        let applies  = Rc::new(applies);
        let factory  = Rc::new(factory);
        Self {name,expected,priority,options,applies,factory}
    }

    /// Declares the options recognized by this pane type on top of the common ones.
    pub fn with_options(mut self, options:&[&'static str]) -> Self {
        self.options = options.to_vec();
        self
    }

    /// Checks whether panes of this type can render the value.
    pub fn applies(&self, value:&Value) -> bool {
        (self.applies)(value)
    }

    /// Parses a configuration map with the options this pane type recognizes.
    pub fn config(&self, options:&Properties) -> Result<Config> {
        Config::for_pane(&self.name,&self.options,options)
    }

    fn renderer(&self, config:&Config) -> Result<Box<dyn Renderer>> {
        (self.factory)(config)
    }

    fn type_mismatch(&self, value:&Value) -> Error {
        let pane     = self.name.clone();
        let expected = self.expected.clone();
        let actual   = value.type_name();
        Error::TypeMismatch {pane,expected,actual}
    }
}



// =====================
// === RenderContext ===
// =====================

/// Where a node is being rendered.
#[derive(Clone,Debug)]
pub struct RenderContext {
    /// Document owning the tree.
    pub document : Document,
    /// Root node of the tree.
    pub root     : Node,
    /// Node the rendered node is placed in. Replacements are spliced into it.
    pub parent   : Option<Node>,
    /// Live session mirroring the document, if any.
    pub session  : Option<Rc<dyn Session>>,
}

impl RenderContext {
    /// Context of a node placed directly in `root`, without a live session.
    pub fn new(document:&Document, root:&Node) -> Self {
        let document = document.clone_ref();
        let parent   = Some(root.clone_ref());
        let root     = root.clone_ref();
        let session  = None;
        Self {document,root,parent,session}
    }

    /// Sets the live session.
    pub fn with_session(mut self, session:Option<Rc<dyn Session>>) -> Self {
        self.session = session;
        self
    }

    /// The same context with a different parent.
    pub fn with_parent(&self, parent:&Node) -> Self {
        let mut ctx = self.clone();
        ctx.parent = Some(parent.clone_ref());
        ctx
    }
}



// =============
// === Patch ===
// =============

/// A computed in-place update of a node. Applying it cannot fail.
#[derive(Clone,Debug)]
pub struct Patch {
    /// Node to update.
    pub target     : Node,
    /// Properties to set.
    pub properties : Properties,
}

impl Patch {
    /// Constructor.
    pub fn new(target:&Node, properties:Properties) -> Self {
        let target = target.clone_ref();
        Self {target,properties}
    }

    /// Sets the properties on the target node.
    pub fn apply(self) {
        self.target.update_properties(self.properties)
    }
}



// ================
// === Renderer ===
// ================

/// Conversion of a pane's object into nodes. One renderer is built per pane.
pub trait Renderer : Debug {
    /// Whether `compute_update` is supported. Renderers which do not support it have their nodes
    /// replaced whenever the object changes.
    fn supports_in_place_update(&self) -> bool {
        false
    }

    /// Builds a fresh node representing the pane's current object.
    fn render(&self, pane:&Pane, ctx:&RenderContext) -> Result<Node>;

    /// Computes the update which makes `node` reflect the pane's current object.
    fn compute_update(&self, pane:&Pane, _node:&Node) -> Result<Patch> {
        let pane = pane.type_name();
        Err(RenderError::UpdateNotSupported {pane}.into())
    }

    /// Releases resources this renderer tied to the node.
    fn cleanup(&self, _pane:&Pane, _node:&Node) {}

    /// Widgets synthesized by the renderer.
    fn widgets(&self) -> Vec<Widget> {
        default()
    }
}



// ============
// === Pane ===
// ============

/// Internal data of a `Pane`.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct PaneModel {
    logger        : Logger,
    pane_type     : Rc<PaneType>,
    config        : Config,
    renderer      : Box<dyn Renderer>,
    object        : RefCell<Option<Value>>,
    watchers      : callback::Registry1<Value,Result<()>>,
    #[derivative(Debug="ignore")]
    subscriptions : RefCell<HashMap<NodeId,Subscription>>,
}

/// An object together with the renderer displaying it.
#[derive(Clone,Debug)]
pub struct Pane {
    model : Rc<PaneModel>,
}

/// Weak version of `Pane`.
#[derive(Clone,Debug)]
pub struct WeakPane {
    model : Weak<PaneModel>,
}

impl Pane {
    /// Wraps the value. Fails with `TypeMismatch` if the pane type does not accept it.
    pub fn new(pane_type:Rc<PaneType>, value:Value, config:Config) -> Result<Self> {
        if !pane_type.applies(&value) {
            return Err(pane_type.type_mismatch(&value))
        }
        config.validate()?;
        let logger        = Logger::new(format!("pane.{}",pane_type.name));
        let renderer      = pane_type.renderer(&config)?;
        let object        = RefCell::new(Some(value));
        let watchers      = default();
        let subscriptions = default();
        let model         = PaneModel {logger,pane_type,config,renderer,object,watchers,subscriptions};
        Ok(Self {model:Rc::new(model)})
    }

    /// Weak handle to this pane.
    pub fn downgrade(&self) -> WeakPane {
        WeakPane {model:Rc::downgrade(&self.model)}
    }

    /// The pane type.
    pub fn pane_type(&self) -> &Rc<PaneType> {
        &self.model.pane_type
    }

    /// Name of the pane type.
    pub fn type_name(&self) -> String {
        self.model.pane_type.name.clone()
    }

    /// The pane's configuration.
    pub fn config(&self) -> &Config {
        &self.model.config
    }

    /// Logger of this pane.
    pub fn logger(&self) -> &Logger {
        &self.model.logger
    }

    /// The renderer of this pane.
    pub fn renderer(&self) -> &dyn Renderer {
        &*self.model.renderer
    }

    /// Widgets the pane synthesized for its object.
    pub fn widget_box(&self) -> Vec<Widget> {
        self.model.renderer.widgets()
    }


    // === Object ===

    /// The wrapped object. `None` after final teardown.
    pub fn object(&self) -> Option<Value> {
        self.model.object.borrow().clone()
    }

    /// The wrapped object, or `RenderError::NoObject` after final teardown.
    pub fn value(&self) -> Result<Value> {
        let pane = self.type_name();
        self.object().ok_or_else(|| RenderError::NoObject {pane}.into())
    }

    /// Reassigns the object and refreshes every node bound to this pane. Fails with
    /// `TypeMismatch` and keeps the old object if the pane type does not accept the value. Errors
    /// raised while computing the refresh are returned; the nodes displayed before stay in place.
    pub fn set_object(&self, value:impl Into<Value>) -> Result<()> {
        let value = value.into();
        if !self.model.pane_type.applies(&value) {
            return Err(self.model.pane_type.type_mismatch(&value))
        }
        debug!(self.model.logger, "Object set to {value:?}.");
        *self.model.object.borrow_mut() = Some(value.clone_ref());
        self.model.watchers.try_run_all(&value)
    }

    pub(crate) fn watch(&self, f:impl Fn(&Value) -> Result<()> + 'static) -> callback::Handle {
        self.model.watchers.add(f)
    }


    // === Nodes ===

    /// Builds a new node representing the current object and binds it, so that later changes of
    /// the object are reflected in it.
    pub fn produce_node(&self, ctx:&RenderContext) -> Result<Node> {
        let node = self.model.renderer.render(self,ctx)?;
        binding::attach(self,&node,ctx);
        Ok(node)
    }

    /// Builds a `Row` root containing this pane's node and adds it to the document.
    pub fn get_root(&self, document:&Document, session:Option<Rc<dyn Session>>) -> Result<Node> {
        let root = Node::new(NodeKind::Row,default());
        let ctx  = RenderContext::new(document,&root).with_session(session);
        let node = self.produce_node(&ctx)?;
        root.add_child(&node);
        document.add_root(&root);
        Ok(root)
    }

    /// Updates the node in place to reflect the current object.
    pub fn apply_update(&self, node:&Node) -> Result<()> {
        self.model.renderer.compute_update(self,node)?.apply();
        Ok(())
    }

    /// Releases the subscriptions and renderer resources tied to the node. Releasing a node which
    /// is not bound does nothing. On final teardown the object is cleared as well.
    pub fn release_resources(&self, node:&Node, final_teardown:bool) {
        let released = {
            let mut subscriptions = self.model.subscriptions.borrow_mut();
            subscriptions.get_mut(&node.id()).and_then(Subscription::tear_down)
        };
        if let Some(handles) = released {
            let count = handles.len();
            debug!(self.model.logger, "Releasing {count} subscriptions of {node:?}.");
            drop(handles);
            self.model.renderer.cleanup(self,node);
        }
        if final_teardown {
            *self.model.object.borrow_mut() = None;
        }
    }

    /// State of the binding between this pane and the node.
    pub fn binding_state(&self, node:&Node) -> BindingState {
        let subscriptions = self.model.subscriptions.borrow();
        subscriptions.get(&node.id()).map(|s| s.state).unwrap_or(BindingState::Unbound)
    }

    /// Ties an auxiliary watcher to the node. It is released together with the node.
    pub fn add_subscription(&self, node:&Node, handle:callback::Handle) {
        let mut subscriptions = self.model.subscriptions.borrow_mut();
        subscriptions.entry(node.id()).or_default().handles.push(handle);
    }

    pub(crate) fn subscriptions(&self) -> &RefCell<HashMap<NodeId,Subscription>> {
        &self.model.subscriptions
    }
}

impl WeakPane {
    /// Upgrades to a strong handle, if the pane is still alive.
    pub fn upgrade(&self) -> Option<Pane> {
        self.model.upgrade().map(|model| Pane {model})
    }
}

impl CloneRef for Pane {
    fn clone_ref(&self) -> Self {
        self.clone()
    }
}

impl PartialEq for Pane {
    fn eq(&self, other:&Self) -> bool {
        Rc::ptr_eq(&self.model,&other.model)
    }
}

impl Object for Pane {
    fn type_name(&self) -> String {
        format!("{} pane",self.model.pane_type.name)
    }

    fn as_pane(&self) -> Option<&Pane> {
        Some(self)
    }
}



// =============
// === Tests ===
// =============
