//! Live sessions mirror a document to a remote viewer. Mutations of a document with a live
//! session are pushed synchronously, within the call which caused them.

use crate::prelude::*;

use crate::document::Document;
use crate::document::Event;



// ===============
// === Session ===
// ===============

/// An open channel to a remote viewer.
pub trait Session : Debug {
    /// Pushes the pending mutations of the document to the viewer.
    fn push(&self, document:&Document);
}

/// Pushes pending mutations of the document to the session now.
pub fn flush(document:&Document, session:&dyn Session) {
    session.push(document)
}



// ============
// === Comm ===
// ============

/// A session which records every pushed batch of mutations, in push order.
#[derive(Debug,Default)]
pub struct Comm {
    messages : RefCell<Vec<Vec<Event>>>,
}

impl Comm {
    /// Constructor.
    pub fn new() -> Self {
        default()
    }

    /// Number of pushes received.
    pub fn push_count(&self) -> usize {
        self.messages.borrow().len()
    }

    /// Batches received so far.
    pub fn messages(&self) -> Vec<Vec<Event>> {
        self.messages.borrow().clone()
    }

    /// The last batch received.
    pub fn last_message(&self) -> Option<Vec<Event>> {
        self.messages.borrow().last().cloned()
    }
}

impl Session for Comm {
    fn push(&self, document:&Document) {
        self.messages.borrow_mut().push(document.take_events());
    }
}



// =============
// === Tests ===
// =============
