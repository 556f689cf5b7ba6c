//! Base of panes rendering their object as markup inside a `Div` node. Div panes support
//! in-place updates: a changed object only updates the properties of the existing `Div`.

use crate::prelude::*;

use crate::document::Node;
use crate::document::NodeKind;
use crate::document::Properties;
use crate::pane::Pane;
use crate::pane::Patch;
use crate::pane::RenderContext;
use crate::pane::Renderer;



// ==================
// === DivContent ===
// ==================

/// Content of a div pane.
pub trait DivContent : Debug {
    /// Properties of the `Div` displaying the pane's object.
    fn properties(&self, pane:&Pane) -> Result<Properties>;
}



// ===================
// === DivRenderer ===
// ===================

/// Renders the content into a `Div` and patches it in place on change.
#[derive(Debug)]
pub struct DivRenderer<C> {
    content : C,
}

impl<C:DivContent> DivRenderer<C> {
    /// Constructor.
    pub fn new(content:C) -> Self {
        Self {content}
    }
}

impl<C:DivContent> Renderer for DivRenderer<C> {
    fn supports_in_place_update(&self) -> bool {
        true
    }

    fn render(&self, pane:&Pane, _ctx:&RenderContext) -> Result<Node> {
        Ok(Node::new(NodeKind::Div,self.content.properties(pane)?))
    }

    fn compute_update(&self, pane:&Pane, node:&Node) -> Result<Patch> {
        let target = if node.kind() == NodeKind::Div { Some(node.clone_ref()) }
                     else                            { node.children().into_iter().next() };
        let target = target.unwrap_or_else(|| node.clone_ref());
        Ok(Patch::new(&target,self.content.properties(pane)?))
    }
}

/// Properties of a `Div` showing `text`, on top of the configured sizing and style.
pub fn with_text(pane:&Pane, text:String) -> Properties {
    let mut properties = pane.config().layout_properties();
    properties.insert("text".into(),text.into());
    properties
}
