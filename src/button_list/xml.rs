//! XML decoding and encoding for `BUTTON_LIST` payloads.
//!
//! Decoding turns raw text into a generic [`XmlElement`] tree: element name,
//! an attribute block that is `None` when the element carried no attributes,
//! trimmed text content, and child elements in document order.
//!
//! Encoding writes a [`ButtonList`] back out in the controller's format.

use std::collections::HashMap;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event as XmlEvent};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use super::model::ButtonList;
use crate::error::{ControllerError, Result};

/// A generic attributed XML element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Option<HashMap<String, String>>,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

/// Decode raw XML text into its root element.
///
/// # Errors
///
/// Returns [`ControllerError::Xml`] for malformed markup, a missing root,
/// unclosed elements, or content after the root element.
pub fn decode(raw: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            XmlEvent::Start(start) => {
                ensure_single_root(&root)?;
                stack.push(element_from_start(&start)?);
            }
            XmlEvent::Empty(start) => {
                ensure_single_root(&root)?;
                let element = element_from_start(&start)?;
                close_element(&mut stack, &mut root, element);
            }
            XmlEvent::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ControllerError::Xml("unexpected closing tag".into()))?;
                close_element(&mut stack, &mut root, element);
            }
            XmlEvent::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut stack, &text)?;
            }
            XmlEvent::CData(data) => {
                let data = data.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&data))?;
            }
            XmlEvent::Eof => break,
            // declaration, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ControllerError::Xml(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| ControllerError::Xml("no root element".into()))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut attributes = HashMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.insert(key, value);
    }

    Ok(XmlElement {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        attributes: (!attributes.is_empty()).then_some(attributes),
        text: None,
        children: Vec::new(),
    })
}

fn ensure_single_root(root: &Option<XmlElement>) -> Result<()> {
    match root {
        Some(_) => Err(ControllerError::Xml("content after root element".into())),
        None => Ok(()),
    }
}

fn close_element(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<()> {
    let current = stack
        .last_mut()
        .ok_or_else(|| ControllerError::Xml("text outside root element".into()))?;
    current.text.get_or_insert_with(String::new).push_str(text);
    Ok(())
}

/// Encode a button list in the controller's XML format.
pub fn encode(list: &ButtonList) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(XmlEvent::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(XmlEvent::Start(BytesStart::new("buttons")))?;

    for page in &list.pages {
        let mut start = BytesStart::new("page");
        start.push_attribute(("name", page.name.as_str()));
        start.push_attribute(("columns", page.columns.to_string().as_str()));
        for (column, count) in &page.column_buttons {
            let key = format!("colbuttons_{column}");
            start.push_attribute((key.as_str(), count.to_string().as_str()));
        }
        writer.write_event(XmlEvent::Start(start))?;

        for button in &page.buttons {
            let mut start = BytesStart::new("button");
            start.push_attribute(("index", button.index.to_string().as_str()));
            start.push_attribute(("flash", flag(button.flash)));
            start.push_attribute(("pressed", flag(button.pressed)));
            start.push_attribute(("line", button.line.to_string().as_str()));
            start.push_attribute(("column", button.column.to_string().as_str()));
            start.push_attribute(("color", button.color.as_str()));
            write_labelled(&mut writer, start, "button", &button.name)?;
        }

        writer.write_event(XmlEvent::End(BytesEnd::new("page")))?;
    }

    for fader in &list.faders {
        let mut start = BytesStart::new("fader");
        start.push_attribute(("value", fader.value.to_string().as_str()));
        write_labelled(&mut writer, start, "fader", &fader.name)?;
    }

    writer.write_event(XmlEvent::End(BytesEnd::new("buttons")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| ControllerError::Xml(e.to_string()))
}

fn write_labelled(
    writer: &mut Writer<Vec<u8>>,
    start: BytesStart<'_>,
    name: &str,
    label: &str,
) -> Result<()> {
    writer.write_event(XmlEvent::Start(start))?;
    if !label.is_empty() {
        writer.write_event(XmlEvent::Text(BytesText::new(label)))?;
    }
    writer.write_event(XmlEvent::End(BytesEnd::new(name)))?;
    Ok(())
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button_list::{Button, Fader, Page};
    use std::collections::BTreeMap;

    #[test]
    fn test_decode_attributes_and_text() {
        let root = decode(
            r##"<?xml version="1.0" encoding="UTF-8"?><buttons><page name="head" columns="1" colbuttons_1="1"><button index="0" flash="0" pressed="1" line="1" column="1" color="#80FFFF">Button name 1</button></page></buttons>"##,
        )
        .unwrap();

        assert_eq!(root.name, "buttons");
        assert_eq!(root.attributes, None);

        let page = &root.children[0];
        let attrs = page.attributes.as_ref().unwrap();
        assert_eq!(attrs["name"], "head");
        assert_eq!(attrs["colbuttons_1"], "1");

        let button = &page.children[0];
        assert_eq!(button.text.as_deref(), Some("Button name 1"));
        assert_eq!(button.attributes.as_ref().unwrap()["color"], "#80FFFF");
    }

    #[test]
    fn test_decode_trims_indented_labels() {
        let root = decode("<buttons>\n  <fader value=\"50\">\n    Fader name 2\n  </fader>\n</buttons>")
            .unwrap();

        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].text.as_deref(), Some("Fader name 2"));
    }

    #[test]
    fn test_decode_unescapes_entities() {
        let root = decode(r#"<buttons><fader value="0">R &amp; B</fader></buttons>"#).unwrap();
        assert_eq!(root.children[0].text.as_deref(), Some("R & B"));
    }

    #[test]
    fn test_decode_self_closing_element() {
        let root = decode(r#"<buttons><page name="empty" columns="0"/></buttons>"#).unwrap();

        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].text, None);
        assert!(root.children[0].children.is_empty());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode("").is_err());
        assert!(decode("not xml at all").is_err());
        assert!(decode("<buttons><page></buttons>").is_err());
        assert!(decode("<buttons>").is_err());
        assert!(decode("<buttons/><buttons/>").is_err());
    }

    #[test]
    fn test_encode_writes_wire_format() {
        let list = ButtonList {
            pages: vec![Page {
                name: "EFFECTS".into(),
                columns: 2,
                column_buttons: BTreeMap::from([(1, 1), (2, 1)]),
                buttons: vec![Button {
                    name: "lasers".into(),
                    index: 0,
                    flash: false,
                    pressed: true,
                    line: 1,
                    column: 1,
                    color: "#FFFFFF".into(),
                }],
            }],
            faders: vec![Fader {
                name: "ELLIP DIMMER".into(),
                value: 0.0,
            }],
        };

        let xml = encode(&list).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><buttons>"#));
        assert!(xml.contains(
            r#"<page name="EFFECTS" columns="2" colbuttons_1="1" colbuttons_2="1">"#
        ));
        assert!(xml.contains(
            r##"<button index="0" flash="0" pressed="1" line="1" column="1" color="#FFFFFF">lasers</button>"##
        ));
        assert!(xml.ends_with(r#"<fader value="0">ELLIP DIMMER</fader></buttons>"#));
    }

    #[test]
    fn test_encode_escapes_labels() {
        let list = ButtonList {
            pages: vec![],
            faders: vec![Fader {
                name: "<R & B>".into(),
                value: 1.0,
            }],
        };

        let xml = encode(&list).unwrap();
        let root = decode(&xml).unwrap();

        assert_eq!(root.children[0].text.as_deref(), Some("<R & B>"));
    }
}
