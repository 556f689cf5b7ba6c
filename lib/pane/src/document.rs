//! In-memory document toolkit the panes render into. A `Document` owns root nodes, records the
//! mutations applied to its tree and runs callbacks scheduled for its next processing tick.

pub mod node;
pub mod session;

pub use node::properties;
pub use node::Node;
pub use node::NodeId;
pub use node::NodeKind;
pub use node::Properties;
pub use session::flush;
pub use session::Comm;
pub use session::Session;

use crate::prelude::*;

use std::fmt;



// =============
// === Event ===
// =============

/// A mutation of the document tree, recorded until it is pushed to a session.
#[derive(Clone,Debug,PartialEq)]
#[allow(missing_docs)]
pub enum Event {
    PropertiesChanged { node:NodeId, keys:Vec<String> },
    ChildReplaced     { parent:NodeId, old:NodeId, new:NodeId },
    RootAdded         (NodeId),
    RootRemoved       (NodeId),
}



// ================
// === Document ===
// ================

type TickCallback = Box<dyn FnOnce()>;

pub(crate) struct DocumentModel {
    logger    : Logger,
    roots     : RefCell<Vec<Node>>,
    events    : RefCell<Vec<Event>>,
    next_tick : RefCell<Vec<(Option<NodeId>,TickCallback)>>,
}

/// Shared handle to a document.
#[derive(Clone)]
pub struct Document {
    model : Rc<DocumentModel>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        let logger    = Logger::new("document");
        let roots     = default();
        let events    = default();
        let next_tick = default();
        Self {model:Rc::new(DocumentModel {logger,roots,events,next_tick})}
    }

    pub(crate) fn from_model(model:Rc<DocumentModel>) -> Self {
        Self {model}
    }


    // === Roots ===

    /// Adds a root node. The node is detached from its parent and from its previous document.
    pub fn add_root(&self, node:&Node) {
        node.unset_parent();
        if let Some(previous) = node.document() {
            previous.remove_root(node);
        }
        *node.model_document().borrow_mut() = Rc::downgrade(&self.model);
        self.model.roots.borrow_mut().push(node.clone_ref());
        self.record(Event::RootAdded(node.id()));
    }

    /// Removes a root node. Returns false if the node was not a root of this document.
    pub fn remove_root(&self, node:&Node) -> bool {
        let index = self.model.roots.borrow().iter().position(|root| root == node);
        if let Some(index) = index {
            self.model.roots.borrow_mut().remove(index);
            *node.model_document().borrow_mut() = Weak::new();
            self.record(Event::RootRemoved(node.id()));
        }
        index.is_some()
    }

    /// Root nodes in insertion order.
    pub fn roots(&self) -> Vec<Node> {
        self.model.roots.borrow().clone()
    }


    // === Events ===

    pub(crate) fn record(&self, event:Event) {
        self.model.events.borrow_mut().push(event);
    }

    /// Mutations recorded since the last push.
    pub fn pending_events(&self) -> Vec<Event> {
        self.model.events.borrow().clone()
    }

    /// Takes the mutations recorded since the last push.
    pub fn take_events(&self) -> Vec<Event> {
        std::mem::take(&mut *self.model.events.borrow_mut())
    }


    // === Next Tick ===

    /// Schedules a callback for the next tick. A callback scheduled with the same key before the
    /// tick replaces the earlier one, keeping its position in the queue.
    pub fn schedule_on_next_tick(&self, key:NodeId, callback:impl FnOnce() + 'static) {
        let callback  = Box::new(callback) as TickCallback;
        let mut queue = self.model.next_tick.borrow_mut();
        match queue.iter_mut().find(|(k,_)| *k == Some(key)) {
            Some(entry) => {
                trace!(self.model.logger, "Superseding update queued for node {key}.");
                entry.1 = callback
            }
            None => queue.push((Some(key),callback)),
        }
    }

    /// Schedules a callback for the next tick, never coalesced with others.
    pub fn add_next_tick_callback(&self, callback:impl FnOnce() + 'static) {
        self.model.next_tick.borrow_mut().push((None,Box::new(callback)));
    }

    /// Number of callbacks waiting for the next tick.
    pub fn pending_callbacks(&self) -> usize {
        self.model.next_tick.borrow().len()
    }

    /// Runs the callbacks queued before this call. Callbacks scheduled while the tick runs wait
    /// for the following tick. Returns the number of callbacks run.
    pub fn process_tick(&self) -> usize {
        let batch = std::mem::take(&mut *self.model.next_tick.borrow_mut());
        let count = batch.len();
        if count == 0 {
            return 0
        }
        group!(self.model.logger, "Processing tick with {count} callbacks.", {
            for (_,callback) in batch {
                callback()
            }
        });
        count
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl CloneRef for Document {
    fn clone_ref(&self) -> Self {
        self.clone()
    }
}

impl PartialEq for Document {
    fn eq(&self, other:&Self) -> bool {
        Rc::ptr_eq(&self.model,&other.model)
    }
}

impl Debug for Document {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"Document({} roots)",self.model.roots.borrow().len())
    }
}



// =============
// === Tests ===
// =============
