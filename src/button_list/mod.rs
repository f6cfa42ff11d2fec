//! Button-list module - the `BUTTON_LIST` layout payload.
//!
//! The controller answers a `BUTTON_LIST` request with an XML feed:
//!
//! ```text
//! <buttons>
//!   <page name="head" columns="2" colbuttons_1="2" colbuttons_2="2">
//!     <button index="0" flash="0" pressed="0" line="1" column="1" color="#80FFFF">Button name 1</button>
//!     ...
//!   </page>
//!   <fader value="0">Fader name 1</fader>
//!   ...
//! </buttons>
//! ```
//!
//! Handling happens in three steps:
//! - [`xml::decode`] - raw text to a generic element tree
//! - [`ButtonListDocument::from_element`] - element tree to the known schema
//! - [`normalize`] - schema to the [`ButtonList`] domain model
//!
//! # Example
//!
//! ```
//! use tlc_client::button_list::ButtonList;
//!
//! let list = ButtonList::from_xml(
//!     r#"<buttons><page name="GLOBAL" columns="1" colbuttons_1="1"><button index="8" flash="0" pressed="0" line="1" column="1" color="black">BLACKOUT</button></page></buttons>"#,
//! )
//! .unwrap();
//!
//! assert_eq!(list.pages[0].buttons[0].name, "BLACKOUT");
//! ```

mod document;
mod model;
mod normalize;
pub mod xml;

pub use document::{Attributes, ButtonListDocument, ButtonsNode, LabelNode, PageNode};
pub use model::{Button, ButtonList, Fader, Page};
pub use normalize::normalize;
pub(crate) use normalize::parse_number;

use crate::error::Result;

impl ButtonList {
    /// Decode and normalize a raw `BUTTON_LIST` payload.
    ///
    /// # Errors
    ///
    /// Fails only when the text is not well-formed XML. Partial or unknown
    /// nodes are dropped silently.
    pub fn from_xml(raw: &str) -> Result<Self> {
        let root = xml::decode(raw)?;
        Ok(normalize(&ButtonListDocument::from_element(&root)))
    }

    /// Encode in the controller's XML format.
    pub fn to_xml(&self) -> Result<String> {
        xml::encode(self)
    }
}
