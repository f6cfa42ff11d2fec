//! Normalized button-list layout.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Pages of buttons plus the flat list of master faders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonList {
    pub pages: Vec<Page>,
    pub faders: Vec<Fader>,
}

/// One page of the controller's button grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub name: String,
    pub columns: u32,
    /// Column index (1-based) to number of buttons in that column.
    ///
    /// Sparse: columns the controller did not describe have no entry.
    pub column_buttons: BTreeMap<u32, u32>,
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub name: String,
    pub index: i32,
    /// Monostable (push) button.
    pub flash: bool,
    pub pressed: bool,
    pub line: i32,
    pub column: i32,
    /// HTML color, e.g. `#80FFFF`.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fader {
    pub name: String,
    pub value: f64,
}

impl ButtonList {
    /// Whether the layout holds neither pages nor faders.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.faders.is_empty()
    }

    /// Find a button by name across all pages.
    pub fn find_button(&self, name: &str) -> Option<&Button> {
        self.pages
            .iter()
            .flat_map(|page| page.buttons.iter())
            .find(|button| button.name == name)
    }
}
