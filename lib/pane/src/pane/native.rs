//! Values which already are document nodes. The node is displayed as is, except for input
//! widgets, which are wrapped in a `WidgetBox` inheriting their sizing.

use crate::prelude::*;

use crate::config::Config;
use crate::document::Node;
use crate::document::NodeKind;
use crate::document::Properties;
use crate::pane::Pane;
use crate::pane::PaneType;
use crate::pane::RenderContext;
use crate::pane::Renderer;
use crate::value::Value;



/// Rank of the native node pane.
pub const PRIORITY : f64 = 0.8;

/// Properties a `WidgetBox` takes over from the widget it wraps.
pub const BOX_PROPERTIES : &[&str] = &["width","height","sizing_mode"];



// ======================
// === NativeRenderer ===
// ======================

/// Displays the node held by the pane.
#[derive(Clone,Copy,Debug,Default)]
pub struct NativeRenderer;

impl NativeRenderer {
    /// The `WidgetBox` displaying the widget. A box which already holds only this widget is
    /// reused, so rendering the same widget again leaves the tree untouched.
    fn widget_box(node:&Node) -> Node {
        let current = node.parent().filter(|parent| {
            parent.kind() == NodeKind::WidgetBox && parent.children() == vec![node.clone_ref()]
        });
        if let Some(current) = current {
            return current
        }
        let declared   = node.properties();
        let forwarded  = BOX_PROPERTIES.iter().filter(|name| declared.contains(*name));
        let properties = forwarded.filter_map(|name| Some(((*name).into(),node.property(name)?)));
        let properties = properties.collect::<Properties>();
        Node::with_children(NodeKind::WidgetBox,properties,vec![node.clone_ref()])
    }

    /// Makes generated code refer to the root instead of the node itself.
    fn retarget_code(model:&Node, node:&Node, root:&Node) {
        let from = node.id().reference();
        let to   = root.id().reference();
        for js in model.select(NodeKind::CustomJs) {
            let code = js.property("code");
            if let Some(code) = code.as_ref().and_then(|c| c.as_str()) {
                if code.contains(&from) {
                    let code = code.replace(&from,&to);
                    js.update_properties(crate::document::properties(vec![("code",code.into())]));
                }
            }
        }
    }
}

impl Renderer for NativeRenderer {
    fn render(&self, pane:&Pane, ctx:&RenderContext) -> Result<Node> {
        let value = pane.value()?;
        let node  = value.as_node().cloned().ok_or_else(|| {
            let pane     = pane.type_name();
            let expected = "node".to_string();
            let actual   = value.type_name();
            Error::TypeMismatch {pane,expected,actual}
        })?;
        if let Some(document) = node.document() {
            if document != ctx.document {
                debug!(pane.logger(), "Moving {node:?} out of its previous document.");
                node.remove_from_document(&document);
            }
        }
        let model = if node.kind().is_widget() { Self::widget_box(&node) } else { node.clone_ref() };
        Self::retarget_code(&model,&node,&ctx.root);
        Ok(model)
    }
}

/// Checks whether the value is a node.
pub fn applies(value:&Value) -> bool {
    value.as_node().is_some()
}

/// The native node pane type.
pub fn pane_type() -> PaneType {
    let factory = |_:&Config| Ok(Box::new(NativeRenderer) as Box<dyn Renderer>);
    PaneType::new("Native","node",PRIORITY,applies,factory)
}



// =============
// === Tests ===
// =============

#[cfg(test)]
mod tests {
    use super::*;

    use crate::document;
    use crate::document::Document;

    use serde_json::json;

    fn pane(node:&Node) -> Pane {
        Pane::new(Rc::new(pane_type()),node.clone().into(),default()).unwrap()
    }

    #[test]
    fn widgets_are_boxed() {
        let props  = document::properties(vec![("width",json!(200)),("title",json!("x"))]);
        let slider = Node::new(NodeKind::Slider,props);
        let root   = pane(&slider).get_root(&Document::new(),None).unwrap();
        let boxed  = &root.children()[0];
        assert_eq!(boxed.kind(), NodeKind::WidgetBox);
        assert_eq!(boxed.children(), vec![slider]);
        assert_eq!(boxed.property_values(), document::properties(vec![("width",json!(200))]));
    }

    #[test]
    fn rendering_the_same_widget_keeps_its_box() {
        let document = Document::new();
        let slider   = Node::new(NodeKind::Slider,default());
        let pane     = pane(&slider);
        let root     = pane.get_root(&document,None).unwrap();
        let boxed    = root.children()[0].clone();
        pane.set_object(slider.clone()).unwrap();
        assert_eq!(boxed.children(), vec![slider.clone()]);
        assert_eq!(document.pending_callbacks(), 0);
        document.process_tick();
        assert_eq!(root.children(), vec![boxed.clone()]);
        assert_eq!(slider.parent(), Some(boxed));
    }

    #[test]
    fn code_refers_to_the_root() {
        let js    = Node::new(NodeKind::CustomJs,default());
        let plot  = Node::with_children(NodeKind::Plot,default(),vec![js.clone()]);
        let code  = format!("view('{}').refresh()",plot.id().reference());
        js.update_properties(document::properties(vec![("code",json!(code))]));
        let root  = pane(&plot).get_root(&Document::new(),None).unwrap();
        let code  = format!("view('{}').refresh()",root.id().reference());
        assert_eq!(js.property("code"), Some(json!(code)));
    }

    #[test]
    fn nodes_leave_their_previous_document() {
        let other = Document::new();
        let node  = Node::new(NodeKind::Plot,default());
        other.add_root(&node);
        let document = Document::new();
        let root     = pane(&node).get_root(&document,None).unwrap();
        assert!(other.roots().is_empty());
        assert_eq!(node.parent(), Some(root));
        assert_eq!(node.document(), Some(document));
    }

    #[test]
    fn reassignment_replaces_the_node() {
        let document = Document::new();
        let first    = Node::new(NodeKind::Plot,default());
        let second   = Node::new(NodeKind::Plot,default());
        let pane     = pane(&first);
        let root     = pane.get_root(&document,None).unwrap();
        pane.set_object(second.clone()).unwrap();
        document.process_tick();
        assert_eq!(root.children(), vec![second.clone()]);
        assert_eq!(pane.binding_state(&first) , crate::binding::BindingState::TornDown);
        assert_eq!(pane.binding_state(&second), crate::binding::BindingState::Bound);
    }
}
