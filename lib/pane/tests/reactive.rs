//! Reassigning the objects of panes displayed in documents, with and without a live session.

use pane::prelude::*;

use pane::Document;
use pane::Node;
use pane::Registry;
use pane::binding;
use pane::binding::BindingState;
use pane::document::Comm;
use pane::document::Event;
use pane::document::NodeKind;
use pane::document::Session;
use serde_json::json;



fn displayed(root:&Node) -> Node {
    root.children()[0].clone()
}

#[test]
fn in_place_updates_keep_the_node() {
    let document = Document::new();
    let pane     = Registry::default().pane("<p>one</p>",&default()).unwrap();
    let root     = pane.get_root(&document,None).unwrap();
    let node     = displayed(&root);
    pane.set_object("<p>two</p>").unwrap();
    assert_eq!(node.property("text"), Some(json!("<p>one</p>")));
    assert_eq!(document.process_tick(), 1);
    assert_eq!(displayed(&root), node);
    assert_eq!(node.property("text"), Some(json!("<p>two</p>")));
}

#[test]
fn refreshing_with_the_same_value_changes_nothing() {
    let document = Document::new();
    let pane     = Registry::default().pane("<p>same</p>",&default()).unwrap();
    let root     = pane.get_root(&document,None).unwrap();
    let node     = displayed(&root);
    let before   = node.property_values();
    pane.set_object(pane.object().unwrap()).unwrap();
    document.process_tick();
    assert_eq!(displayed(&root), node);
    assert_eq!(node.property_values(), before);
}

#[test]
fn replaced_nodes_are_released_once() {
    let document = Document::new();
    let first    = Node::new(NodeKind::Plot,default());
    let second   = Node::new(NodeKind::Plot,default());
    let pane     = Registry::default().pane(first.clone(),&default()).unwrap();
    let root     = pane.get_root(&document,None).unwrap();
    pane.set_object(second.clone()).unwrap();
    document.process_tick();
    assert_eq!(displayed(&root), second);
    assert_eq!(pane.binding_state(&first), BindingState::TornDown);
    binding::detach(&pane,&first,false);
    assert_eq!(pane.binding_state(&first), BindingState::TornDown);
    assert_eq!(pane.binding_state(&second), BindingState::Bound);
}

#[test]
fn live_sessions_receive_every_change() {
    let comm     = Rc::new(Comm::new());
    let session  = Some(comm.clone() as Rc<dyn Session>);
    let document = Document::new();
    let pane     = Registry::default().pane("<p>one</p>",&default()).unwrap();
    let root     = pane.get_root(&document,session).unwrap();
    let node     = displayed(&root);
    document.take_events();
    pane.set_object("<p>two</p>").unwrap();
    pane.set_object("<p>three</p>").unwrap();
    assert_eq!(node.property("text"), Some(json!("<p>three</p>")));
    assert_eq!(comm.push_count(), 2);
    assert_eq!(document.pending_callbacks(), 0);
    let keys = vec!["text".to_string()];
    assert_eq!(comm.last_message(), Some(vec![Event::PropertiesChanged {node:node.id(),keys}]));
}

#[test]
fn changes_within_one_tick_are_coalesced() {
    let document = Document::new();
    let pane     = Registry::default().pane("<p>a</p>",&default()).unwrap();
    let root     = pane.get_root(&document,None).unwrap();
    for text in &["<p>b</p>","<p>c</p>","<p>d</p>"] {
        pane.set_object(*text).unwrap();
    }
    assert_eq!(document.pending_callbacks(), 1);
    document.process_tick();
    assert_eq!(displayed(&root).property("text"), Some(json!("<p>d</p>")));
}

#[test]
fn rejected_values_keep_the_display() {
    let document = Document::new();
    let pane     = Registry::default().pane("<p>kept</p>",&default()).unwrap();
    let root     = pane.get_root(&document,None).unwrap();
    let error    = pane.set_object(7_i64).unwrap_err();
    assert!(matches!(error, Error::TypeMismatch{..}));
    assert_eq!(document.pending_callbacks(), 0);
    assert_eq!(displayed(&root).property("text"), Some(json!("<p>kept</p>")));
}

#[test]
fn final_teardown_is_idempotent() {
    let document = Document::new();
    let pane     = Registry::default().pane("<p>gone</p>",&default()).unwrap();
    let root     = pane.get_root(&document,None).unwrap();
    let node     = displayed(&root);
    root.remove_child(&node);
    binding::detach(&pane,&node,true);
    assert!(pane.object().is_none());
    binding::detach(&pane,&node,true);
    assert_eq!(pane.binding_state(&node), BindingState::TornDown);
}
