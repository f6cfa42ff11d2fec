//! Decoded button-list tree.
//!
//! This mirrors the XML payload one-to-one, with every attribute block
//! optional. Nothing here is validated; deciding what to keep is the
//! normalizer's job.

use std::collections::HashMap;

use super::xml::XmlElement;

/// Attribute name to raw attribute value.
pub type Attributes = HashMap<String, String>;

/// Root of a decoded `BUTTON_LIST` payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonListDocument {
    /// The `<buttons>` root, absent when the payload had another root.
    pub buttons: Option<ButtonsNode>,
}

/// `<buttons>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonsNode {
    pub pages: Vec<PageNode>,
    pub faders: Vec<LabelNode>,
}

/// `<page>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageNode {
    pub attributes: Option<Attributes>,
    pub buttons: Vec<LabelNode>,
}

/// `<button>` or `<fader>` element: attributes plus a text label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelNode {
    pub attributes: Option<Attributes>,
    pub text: Option<String>,
}

impl ButtonListDocument {
    /// Pick the known schema out of a generic element tree.
    ///
    /// Unknown elements are ignored at every level.
    pub fn from_element(root: &XmlElement) -> Self {
        if root.name != "buttons" {
            return Self::default();
        }

        let mut buttons = ButtonsNode::default();
        for child in &root.children {
            match child.name.as_str() {
                "page" => buttons.pages.push(PageNode {
                    attributes: child.attributes.clone(),
                    buttons: child
                        .children
                        .iter()
                        .filter(|e| e.name == "button")
                        .map(LabelNode::from_element)
                        .collect(),
                }),
                "fader" => buttons.faders.push(LabelNode::from_element(child)),
                _ => {}
            }
        }

        Self {
            buttons: Some(buttons),
        }
    }
}

impl LabelNode {
    fn from_element(element: &XmlElement) -> Self {
        Self {
            attributes: element.attributes.clone(),
            text: element.text.clone(),
        }
    }
}
