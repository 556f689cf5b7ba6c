//! Reactive binding between a pane and the nodes it produced.
//!
//! Every produced node is attached: a watcher is registered on the pane's object slot, keyed by
//! the node identity. When the object is reassigned the watcher either patches the node in place,
//! if the renderer supports it, or renders a replacement and splices it into the parent at the
//! position of the old node. With a live session the mutation is applied and flushed immediately,
//! otherwise it is scheduled on the document's next tick, where a later update of the same node
//! supersedes an earlier one.

use crate::prelude::*;

use crate::document;
use crate::document::Node;
use crate::document::NodeId;
use crate::pane::Pane;
use crate::pane::RenderContext;

use enso_callback as callback;



// ====================
// === BindingState ===
// ====================

/// State of the binding between a pane and one of its nodes.
#[derive(Clone,Copy,Debug,Display,Eq,PartialEq)]
pub enum BindingState {
    /// The node was never attached to the pane.
    Unbound,
    /// Changes of the pane's object are reflected in the node.
    Bound,
    /// The node was released. Terminal.
    TornDown,
}



// ====================
// === Subscription ===
// ====================

/// Watchers a pane holds for one of its nodes: the object watcher and any auxiliary ones.
#[derive(Debug)]
pub struct Subscription {
    /// State of the binding.
    pub state   : BindingState,
    /// Handles of the active watchers.
    pub handles : Vec<callback::Handle>,
}

impl Default for Subscription {
    fn default() -> Self {
        let state   = BindingState::Unbound;
        let handles = default();
        Self {state,handles}
    }
}

impl Subscription {
    /// Moves to the `TornDown` state and returns the handles to release. Returns `None` if the
    /// subscription was already torn down.
    pub fn tear_down(&mut self) -> Option<Vec<callback::Handle>> {
        match self.state {
            BindingState::TornDown => None,
            _ => {
                self.state = BindingState::TornDown;
                Some(std::mem::take(&mut self.handles))
            }
        }
    }
}



// ==============
// === Attach ===
// ==============

/// Binds the node to the pane: reassigning the pane's object refreshes the node from now on.
/// Attaching a node which is already bound replaces its object watcher.
pub fn attach(pane:&Pane, node:&Node, ctx:&RenderContext) {
    let weak    = pane.downgrade();
    let watched = node.clone_ref();
    let context = ctx.clone();
    let handle  = pane.watch(move |_| match weak.upgrade() {
        Some(pane) => refresh(&pane,&watched,&context),
        None       => Ok(()),
    });
    let previous = {
        let mut subscriptions = pane.subscriptions().borrow_mut();
        let subscription      = subscriptions.entry(node.id()).or_default();
        let previous          = match subscription.state {
            BindingState::Bound => std::mem::take(&mut subscription.handles),
            _                   => default(),
        };
        subscription.state = BindingState::Bound;
        subscription.handles.push(handle);
        previous
    };
    drop(previous);
    trace!(pane.logger(), "Attached {node:?}.");
}

/// Tears the binding down, releasing the resources tied to the node. Detaching twice is a no-op.
pub fn detach(pane:&Pane, node:&Node, final_teardown:bool) {
    trace!(pane.logger(), "Detaching {node:?}, final: {final_teardown}.");
    pane.release_resources(node,final_teardown)
}

/// Applies a tree mutation: immediately followed by a flush if the context has a live session,
/// otherwise on the next tick of the document, superseding a mutation queued under the same key.
pub fn apply_and_sync(ctx:&RenderContext, key:NodeId, mutation:impl FnOnce() + 'static) {
    match &ctx.session {
        Some(session) => {
            mutation();
            document::flush(&ctx.document,&**session);
        }
        None => ctx.document.schedule_on_next_tick(key,mutation),
    }
}



// ===============
// === Refresh ===
// ===============

/// Reflects the current object of the pane in the node, by patching or replacing it.
fn refresh(pane:&Pane, node:&Node, ctx:&RenderContext) -> Result<()> {
    if pane.binding_state(node) != BindingState::Bound {
        return Ok(())
    }
    if pane.renderer().supports_in_place_update() {
        let patch = pane.renderer().compute_update(pane,node)?;
        debug!(pane.logger(), "Patching {node:?} in place.");
        apply_and_sync(ctx,node.id(),move || patch.apply());
        return Ok(())
    }
    let replacement = pane.produce_node(ctx)?;
    if replacement == *node {
        debug!(pane.logger(), "{node:?} was rendered again, keeping it.");
        return Ok(())
    }
    debug!(pane.logger(), "Replacing {node:?} with {replacement:?}.");
    pane.release_resources(node,false);
    let old    = node.clone_ref();
    let parent = ctx.parent.clone();
    let logger = pane.logger().clone();
    apply_and_sync(ctx,node.id(),move || {
        let spliced = parent.as_ref().map(|parent| parent.splice_child(&old,&replacement));
        if spliced != Some(true) {
            warning!(logger, "{old:?} is no longer displayed, {replacement:?} was not inserted.");
        }
    });
    Ok(())
}



// =============
// === Tests ===
// =============

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::Config;
    use crate::document::Comm;
    use crate::document::Document;
    use crate::document::NodeKind;
    use crate::document::Session;
    use crate::error::RenderError;
    use crate::pane::PaneType;
    use crate::pane::Patch;
    use crate::pane::Renderer;
    use crate::value::Value;

    use serde_json::json;

    /// Renders strings into `Div`s, counting calls. Fails on the string "fail".
    #[derive(Debug)]
    struct Counting {
        in_place : bool,
        renders  : Rc<Cell<usize>>,
        cleanups : Rc<Cell<usize>>,
    }

    fn text_of(pane:&Pane) -> Result<String> {
        let text = pane.value()?.to_text();
        if text == "fail" {
            let pane   = pane.type_name();
            let reason = "refused".to_string();
            return Err(RenderError::Backend {backend:pane,reason}.into())
        }
        Ok(text)
    }

    impl Renderer for Counting {
        fn supports_in_place_update(&self) -> bool {
            self.in_place
        }

        fn render(&self, pane:&Pane, _ctx:&RenderContext) -> Result<Node> {
            self.renders.set(self.renders.get() + 1);
            let text = text_of(pane)?;
            Ok(Node::new(NodeKind::Div,document::properties(vec![("text",json!(text))])))
        }

        fn compute_update(&self, pane:&Pane, node:&Node) -> Result<Patch> {
            let text = text_of(pane)?;
            Ok(Patch::new(node,document::properties(vec![("text",json!(text))])))
        }

        fn cleanup(&self, _pane:&Pane, _node:&Node) {
            self.cleanups.set(self.cleanups.get() + 1);
        }
    }

    struct Fixture {
        pane     : Pane,
        document : Document,
        root     : Node,
        renders  : Rc<Cell<usize>>,
        cleanups : Rc<Cell<usize>>,
    }

    fn fixture(in_place:bool, session:Option<Rc<dyn Session>>) -> Fixture {
        let renders   = Rc::new(Cell::new(0));
        let cleanups  = Rc::new(Cell::new(0));
        let (r,c)     = (renders.clone(),cleanups.clone());
        let factory   = move |_:&Config| {
            let renderer = Counting {in_place,renders:r.clone(),cleanups:c.clone()};
            Ok(Box::new(renderer) as Box<dyn Renderer>)
        };
        let pane_type = PaneType::new("Counting","text",0.0,|v:&Value| v.as_str().is_some(),factory);
        let pane      = Pane::new(Rc::new(pane_type),"a".into(),default()).unwrap();
        let document  = Document::new();
        let root      = pane.get_root(&document,session).unwrap();
        Fixture {pane,document,root,renders,cleanups}
    }

    fn displayed(f:&Fixture) -> Node {
        f.root.children()[0].clone()
    }

    #[test]
    fn in_place_updates_wait_for_the_tick() {
        let f    = fixture(true,None);
        let node = displayed(&f);
        f.pane.set_object("b").unwrap();
        assert_eq!(node.property("text"), Some(json!("a")));
        f.pane.set_object("c").unwrap();
        assert_eq!(f.document.process_tick(), 1);
        assert_eq!(displayed(&f), node);
        assert_eq!(node.property("text"), Some(json!("c")));
        assert_eq!(f.renders.get(), 1);
    }

    #[test]
    fn replacement_is_spliced_on_the_tick() {
        let f   = fixture(false,None);
        let old = displayed(&f);
        f.pane.set_object("b").unwrap();
        assert_eq!(displayed(&f), old);
        f.document.process_tick();
        let new = displayed(&f);
        assert_ne!(new, old);
        assert_eq!(new.property("text"), Some(json!("b")));
        assert_eq!(f.pane.binding_state(&old), BindingState::TornDown);
        assert_eq!(f.pane.binding_state(&new), BindingState::Bound);
        assert_eq!(f.cleanups.get(), 1);
    }

    #[test]
    fn live_sessions_are_flushed_immediately() {
        let comm = Rc::new(Comm::new());
        let f    = fixture(false,Some(comm.clone() as Rc<dyn Session>));
        let old  = displayed(&f);
        f.document.take_events();
        f.pane.set_object("b").unwrap();
        let new = displayed(&f);
        assert_ne!(new, old);
        assert_eq!(comm.push_count(), 1);
        assert_eq!(comm.last_message(), Some(vec![document::Event::ChildReplaced {
            parent : f.root.id(),
            old    : old.id(),
            new    : new.id(),
        }]));
        assert_eq!(f.document.pending_callbacks(), 0);
    }

    #[test]
    fn failed_refresh_keeps_the_old_node() {
        let f   = fixture(false,None);
        let old = displayed(&f);
        assert!(f.pane.set_object("fail").unwrap_err().is_render_error());
        f.document.process_tick();
        assert_eq!(displayed(&f), old);
        assert_eq!(f.pane.binding_state(&old), BindingState::Bound);
        f.pane.set_object("b").unwrap();
        f.document.process_tick();
        assert_eq!(displayed(&f).property("text"), Some(json!("b")));
    }

    #[test]
    fn torn_down_nodes_are_not_refreshed() {
        let f    = fixture(true,None);
        let node = displayed(&f);
        detach(&f.pane,&node,false);
        detach(&f.pane,&node,false);
        f.pane.set_object("b").unwrap();
        assert_eq!(f.document.pending_callbacks(), 0);
        assert_eq!(f.cleanups.get(), 1);
        assert_eq!(f.pane.object().and_then(|v| v.as_str().map(String::from)), Some("b".into()));
    }

    #[test]
    fn successive_replacements_within_one_tick() {
        let f = fixture(false,None);
        f.pane.set_object("b").unwrap();
        f.pane.set_object("c").unwrap();
        f.document.process_tick();
        assert_eq!(f.root.children().len(), 1);
        assert_eq!(displayed(&f).property("text"), Some(json!("c")));
        assert_eq!(f.cleanups.get(), 2);
    }
}
