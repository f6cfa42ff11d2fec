//! Button-list normalization.
//!
//! Turns a decoded [`ButtonListDocument`] into a [`ButtonList`]. The payload
//! is generated by the controller and may hold partial nodes, so nothing
//! here fails: pages, buttons and faders without an attribute block are
//! skipped, and attribute values that do not parse fall back to neutral
//! values.

use std::collections::BTreeMap;

use super::document::{Attributes, ButtonListDocument, LabelNode, PageNode};
use super::model::{Button, ButtonList, Fader, Page};

/// Normalize a decoded button-list tree.
///
/// Input order of pages, buttons and faders is preserved.
pub fn normalize(document: &ButtonListDocument) -> ButtonList {
    let Some(buttons) = &document.buttons else {
        return ButtonList::default();
    };

    ButtonList {
        pages: buttons.pages.iter().filter_map(normalize_page).collect(),
        faders: buttons.faders.iter().filter_map(normalize_fader).collect(),
    }
}

fn normalize_page(node: &PageNode) -> Option<Page> {
    let Some(attrs) = &node.attributes else {
        tracing::warn!("Skipping button-list page without attributes");
        return None;
    };

    let columns = attr_count(attrs, "columns");
    let column_buttons: BTreeMap<u32, u32> = attrs
        .iter()
        .filter_map(|(key, count)| {
            let column = column_suffix(key)?;
            (1..=columns)
                .contains(&column)
                .then(|| (column, parse_count(count)))
        })
        .collect();

    Some(Page {
        name: attr_string(attrs, "name"),
        columns,
        column_buttons,
        buttons: node.buttons.iter().filter_map(normalize_button).collect(),
    })
}

fn normalize_button(node: &LabelNode) -> Option<Button> {
    let Some(attrs) = &node.attributes else {
        tracing::warn!(label = ?node.text, "Skipping button without attributes");
        return None;
    };

    Some(Button {
        name: node.text.clone().unwrap_or_default(),
        index: attr_int(attrs, "index"),
        flash: attr_flag(attrs, "flash"),
        pressed: attr_flag(attrs, "pressed"),
        line: attr_int(attrs, "line"),
        column: attr_int(attrs, "column"),
        color: attr_string(attrs, "color"),
    })
}

fn normalize_fader(node: &LabelNode) -> Option<Fader> {
    let Some(attrs) = &node.attributes else {
        tracing::warn!(label = ?node.text, "Skipping fader without attributes");
        return None;
    };

    Some(Fader {
        name: node.text.clone().unwrap_or_default(),
        value: attrs.get("value").map_or(f64::NAN, |v| parse_number(v)),
    })
}

fn attr_string(attrs: &Attributes, key: &str) -> String {
    attrs.get(key).cloned().unwrap_or_default()
}

/// Column number of a `colbuttons_<n>` key, in canonical decimal form.
fn column_suffix(key: &str) -> Option<u32> {
    let suffix = key.strip_prefix("colbuttons_")?;
    if suffix.starts_with(['0', '+']) {
        return None;
    }
    suffix.parse().ok()
}

/// Numeric attributes may carry a fraction (`"1.0"`); it is truncated.
fn attr_int(attrs: &Attributes, key: &str) -> i32 {
    attrs.get(key).map_or(0, |v| parse_number(v).trunc() as i32)
}

fn attr_count(attrs: &Attributes, key: &str) -> u32 {
    attrs.get(key).map_or(0, |v| parse_count(v))
}

/// A flag is set when the attribute parses to a nonzero number.
fn attr_flag(attrs: &Attributes, key: &str) -> bool {
    attrs
        .get(key)
        .map(|v| parse_number(v))
        .is_some_and(|n| !n.is_nan() && n != 0.0)
}

/// Non-numeric and negative counts become 0.
fn parse_count(value: &str) -> u32 {
    parse_number(value).trunc() as u32
}

pub(crate) fn parse_number(value: &str) -> f64 {
    value.trim().parse().unwrap_or(f64::NAN)
}
