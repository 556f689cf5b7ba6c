//! Nodes of the document tree. A node has an identity, a kind, a property map and an ordered
//! list of children. Nodes are shared handles: cloning a `Node` never copies the node.

use crate::prelude::*;

use crate::document::Document;
use crate::document::DocumentModel;
use crate::document::Event;
use crate::value::Object;

use serde::Serialize;
use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;



// =============
// === Types ===
// =============

/// Properties of a node.
pub type Properties = serde_json::Map<String,serde_json::Value>;

/// Unique identifier of a node.
#[derive(Clone,Copy,Debug,Display,Eq,Hash,Ord,PartialEq,PartialOrd,Serialize)]
#[display(fmt = "{}", _0)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        static NEXT : AtomicU64 = AtomicU64::new(1);
        NodeId(NEXT.fetch_add(1,Ordering::Relaxed))
    }

    /// The textual reference id, as embedded in generated code.
    pub fn reference(self) -> String {
        format!("node-{}",self.0)
    }
}

/// The kind of a node determines which properties it declares.
#[derive(Clone,Copy,Debug,Display,Eq,Hash,PartialEq)]
#[allow(missing_docs)]
pub enum NodeKind {Row,WidgetBox,Div,Slider,Select,Plot,CustomJs}

impl NodeKind {
    /// Names of the properties declared by nodes of this kind.
    pub fn declared_properties(self) -> &'static [&'static str] {
        match self {
            NodeKind::Row       => &["width","height","sizing_mode","children"],
            NodeKind::WidgetBox => &["width","height","sizing_mode","children"],
            NodeKind::Div       => &["width","height","sizing_mode","style","text"],
            NodeKind::Slider    => &["title","value","start","end","step","options","width","height"],
            NodeKind::Select    => &["title","value","options","width","height"],
            NodeKind::Plot      => &["width","height","sizing_mode","title"],
            NodeKind::CustomJs  => &["code","args"],
        }
    }

    /// Checks whether nodes of this kind are input widgets.
    pub fn is_widget(self) -> bool {
        matches!(self, NodeKind::Slider | NodeKind::Select)
    }
}



// ============
// === Node ===
// ============

pub(crate) struct NodeModel {
    id         : NodeId,
    kind       : NodeKind,
    properties : RefCell<Properties>,
    children   : RefCell<Vec<Node>>,
    parent     : RefCell<Weak<NodeModel>>,
    document   : RefCell<Weak<DocumentModel>>,
}

/// A node of the document tree.
#[derive(Clone)]
pub struct Node {
    model : Rc<NodeModel>,
}

impl Node {
    /// Creates a detached node.
    pub fn new(kind:NodeKind, properties:Properties) -> Self {
        let id         = NodeId::next();
        let properties = RefCell::new(properties);
        let children   = default();
        let parent     = default();
        let document   = default();
        let model      = Rc::new(NodeModel {id,kind,properties,children,parent,document});
        Self {model}
    }

    /// Creates a detached node with the given children.
    pub fn with_children(kind:NodeKind, properties:Properties, children:Vec<Node>) -> Self {
        let node = Self::new(kind,properties);
        node.set_children(children);
        node
    }

    /// Identity of the node.
    pub fn id(&self) -> NodeId {
        self.model.id
    }

    /// Kind of the node.
    pub fn kind(&self) -> NodeKind {
        self.model.kind
    }

    /// Names of the properties declared by the node's kind.
    pub fn properties(&self) -> &'static [&'static str] {
        self.kind().declared_properties()
    }

    /// Current value of a property.
    pub fn property(&self, name:&str) -> Option<serde_json::Value> {
        self.model.properties.borrow().get(name).cloned()
    }

    /// Snapshot of all property values.
    pub fn property_values(&self) -> Properties {
        self.model.properties.borrow().clone()
    }

    /// Sets the given properties, keeping the others. Changes are recorded in the owning
    /// document, if any.
    pub fn update_properties(&self, properties:Properties) {
        let keys = properties.keys().cloned().collect_vec();
        self.model.properties.borrow_mut().extend(properties);
        if let Some(document) = self.document() {
            document.record(Event::PropertiesChanged {node:self.id(),keys});
        }
    }


    // === Hierarchy ===

    /// Children of the node, in order.
    pub fn children(&self) -> Vec<Node> {
        self.model.children.borrow().clone()
    }

    /// Parent of the node, if attached.
    pub fn parent(&self) -> Option<Node> {
        self.model.parent.borrow().upgrade().map(|model| Node {model})
    }

    /// Index of the given child.
    pub fn index_of(&self, child:&Node) -> Option<usize> {
        self.model.children.borrow().iter().position(|c| c == child)
    }

    /// Appends a child, detaching it from its previous parent.
    pub fn add_child(&self, child:&Node) {
        child.unset_parent();
        *child.model.parent.borrow_mut() = Rc::downgrade(&self.model);
        self.model.children.borrow_mut().push(child.clone_ref());
    }

    /// Replaces all children.
    pub fn set_children(&self, children:Vec<Node>) {
        for old in std::mem::take(&mut *self.model.children.borrow_mut()) {
            *old.model.parent.borrow_mut() = Weak::new();
        }
        for child in &children {
            self.add_child(child);
        }
    }

    /// Removes a child. Returns false if the node was not a child of this node.
    pub fn remove_child(&self, child:&Node) -> bool {
        let index = self.index_of(child);
        if let Some(index) = index {
            self.model.children.borrow_mut().remove(index);
            *child.model.parent.borrow_mut() = Weak::new();
        }
        index.is_some()
    }

    /// Detaches the node from its parent, if any.
    pub fn unset_parent(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }
    }

    /// Replaces `old` with `new` at the position `old` occupied. Returns false and leaves the
    /// children untouched if `old` is not a child of this node.
    pub fn splice_child(&self, old:&Node, new:&Node) -> bool {
        if old == new {
            return self.index_of(old).is_some()
        }
        new.unset_parent();
        let index = self.index_of(old);
        if let Some(index) = index {
            self.model.children.borrow_mut()[index] = new.clone_ref();
            *old.model.parent.borrow_mut() = Weak::new();
            *new.model.parent.borrow_mut() = Rc::downgrade(&self.model);
            if let Some(document) = self.document() {
                document.record(Event::ChildReplaced {parent:self.id(),old:old.id(),new:new.id()});
            }
        }
        index.is_some()
    }

    /// The topmost ancestor of this node.
    pub fn root(&self) -> Node {
        let mut node = self.clone_ref();
        while let Some(parent) = node.parent() {
            node = parent;
        }
        node
    }

    /// The document this node belongs to, through its root.
    pub fn document(&self) -> Option<Document> {
        let root = self.root();
        let doc  = root.model.document.borrow().upgrade();
        doc.map(Document::from_model)
    }

    pub(crate) fn model_document(&self) -> &RefCell<Weak<DocumentModel>> {
        &self.model.document
    }

    /// Removes this node from the roots of the given document. Does nothing if it is not a root
    /// there.
    pub fn remove_from_document(&self, document:&Document) {
        document.remove_root(self);
    }

    /// All nodes of the given kind in the subtree rooted at this node, in depth-first order.
    pub fn select(&self, kind:NodeKind) -> Vec<Node> {
        let mut out   = Vec::new();
        let mut stack = vec![self.clone_ref()];
        while let Some(node) = stack.pop() {
            if node.kind() == kind {
                out.push(node.clone_ref());
            }
            stack.extend(node.children().into_iter().rev());
        }
        out
    }
}

impl CloneRef for Node {
    fn clone_ref(&self) -> Self {
        self.clone()
    }
}

impl PartialEq for Node {
    fn eq(&self, other:&Self) -> bool {
        Rc::ptr_eq(&self.model,&other.model)
    }
}

impl Eq for Node {}

impl Debug for Node {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"Node({} {})",self.kind(),self.id())
    }
}

impl Object for Node {
    fn type_name(&self) -> String {
        format!("{} node",self.kind())
    }

    fn as_node(&self) -> Option<&Node> {
        Some(self)
    }
}

/// Builds a property map from a list of pairs.
pub fn properties<K:Into<String>>(pairs:impl IntoIterator<Item=(K,serde_json::Value)>) -> Properties {
    pairs.into_iter().map(|(k,v)| (k.into(),v)).collect()
}



// =============
// === Tests ===
// =============
