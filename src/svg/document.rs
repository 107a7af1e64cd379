//! Parsed SVG template.
//!
//! A template is held as the owned quick-xml event stream of the source
//! text. Parsing rejects anything that is not a single well-formed `<svg>`
//! element tree, so every later edit operates on a document known to be
//! sound.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// Which of the three input templates a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Map,
    Army,
    Fleet,
}

impl TemplateKind {
    pub const fn name(self) -> &'static str {
        match self {
            TemplateKind::Map => "map",
            TemplateKind::Army => "army",
            TemplateKind::Fleet => "fleet",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised while reading or writing SVG templates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("{template} template is not well-formed: {reason}")]
    Malformed { template: TemplateKind, reason: String },

    #[error("{template} template has no <svg> root element")]
    MissingRoot { template: TemplateKind },

    #[error("{template} template ends with <{element}> still open")]
    Unclosed { template: TemplateKind, element: String },

    #[error("failed to serialize composed document: {0}")]
    Serialize(String),
}

fn malformed(template: TemplateKind, reason: impl Into<String>) -> TemplateError {
    TemplateError::Malformed {
        template,
        reason: reason.into(),
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// A well-formed SVG document.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    events: Vec<Event<'static>>,
    root_tag: BytesStart<'static>,
    root: usize,
    /// Index of the root's end tag; `None` for a self-closing root.
    root_end: Option<usize>,
}

impl SvgDocument {
    /// Parses and validates `text`.
    pub fn parse(kind: TemplateKind, text: &str) -> Result<Self, TemplateError> {
        let mut reader = Reader::from_str(text);
        let mut events = Vec::new();
        let mut open: Vec<Vec<u8>> = Vec::new();
        let mut root: Option<(usize, BytesStart<'static>)> = None;
        let mut root_end = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    return Err(malformed(
                        kind,
                        format!("{e} (near byte {})", reader.buffer_position()),
                    ))
                }
            };
            let index = events.len();
            match &event {
                Event::Start(start) => {
                    check_attributes(kind, start)?;
                    if open.is_empty() {
                        begin_root(kind, start, &mut root, index)?;
                    }
                    open.push(start.name().as_ref().to_vec());
                }
                Event::Empty(start) => {
                    check_attributes(kind, start)?;
                    if open.is_empty() {
                        begin_root(kind, start, &mut root, index)?;
                    }
                }
                Event::End(end) => {
                    match open.pop() {
                        Some(name) if name == end.name().as_ref() => {}
                        Some(name) => {
                            return Err(malformed(
                                kind,
                                format!("</{}> closes <{}>", lossy(end.name().as_ref()), lossy(&name)),
                            ))
                        }
                        None => {
                            return Err(malformed(
                                kind,
                                format!("unexpected </{}>", lossy(end.name().as_ref())),
                            ))
                        }
                    }
                    if open.is_empty() {
                        root_end = Some(index);
                    }
                }
                Event::Text(text) if open.is_empty() => {
                    if !text.iter().all(u8::is_ascii_whitespace) {
                        return Err(malformed(kind, "text outside the root element"));
                    }
                }
                Event::CData(_) if open.is_empty() => {
                    return Err(malformed(kind, "character data outside the root element"));
                }
                Event::Eof => break,
                _ => {}
            }
            events.push(event.into_owned());
        }

        if let Some(name) = open.last() {
            return Err(TemplateError::Unclosed {
                template: kind,
                element: lossy(name),
            });
        }
        let (root, root_tag) = root.ok_or(TemplateError::MissingRoot { template: kind })?;

        Ok(Self {
            events,
            root_tag,
            root,
            root_end,
        })
    }

    /// Returns the root `<svg>` start tag.
    pub fn root(&self) -> &BytesStart<'static> {
        &self.root_tag
    }

    /// Returns the full event stream.
    pub(crate) fn events(&self) -> &[Event<'static>] {
        &self.events
    }

    /// Iterates every element start tag in document order.
    pub fn elements(&self) -> impl Iterator<Item = &BytesStart<'static>> {
        self.events.iter().filter_map(|event| match event {
            Event::Start(start) | Event::Empty(start) => Some(start),
            _ => None,
        })
    }

    /// Returns the events strictly inside the root element.
    pub fn children(&self) -> &[Event<'static>] {
        match self.root_end {
            Some(end) => &self.events[self.root + 1..end],
            None => &[],
        }
    }

    /// Returns the set of all `id` attribute values.
    pub fn element_ids(&self) -> BTreeSet<String> {
        self.elements().filter_map(|el| attribute(el, "id")).collect()
    }

    /// Writes the document back out.
    ///
    /// Elements whose `id` is a key of `fills` get their fill replaced.
    /// `layers` are appended as the last children of the root element.
    pub fn write(
        &self,
        fills: &BTreeMap<String, String>,
        layers: &[Event<'static>],
    ) -> Result<String, TemplateError> {
        let mut writer = Writer::new(Vec::with_capacity(self.events.len() * 64));

        for (index, event) in self.events.iter().enumerate() {
            if index == self.root {
                if let Event::Empty(start) = event {
                    // A self-closing root has to be opened to take the layers.
                    let name = lossy(start.name().as_ref());
                    emit(&mut writer, Event::Start(start.borrow()))?;
                    for layer in layers {
                        emit(&mut writer, layer.borrow())?;
                    }
                    emit(&mut writer, Event::End(BytesEnd::new(name)))?;
                    continue;
                }
            }
            if Some(index) == self.root_end {
                for layer in layers {
                    emit(&mut writer, layer.borrow())?;
                }
            }
            let rewritten = match event {
                Event::Start(start) if index != self.root => {
                    fill_for(start, fills).map(|color| Event::Start(with_fill(start, color)))
                }
                Event::Empty(start) => {
                    fill_for(start, fills).map(|color| Event::Empty(with_fill(start, color)))
                }
                _ => None,
            };
            match rewritten {
                Some(event) => emit(&mut writer, event)?,
                None => emit(&mut writer, event.borrow())?,
            }
        }

        String::from_utf8(writer.into_inner()).map_err(|e| TemplateError::Serialize(e.to_string()))
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), TemplateError> {
    writer
        .write_event(event)
        .map_err(|e| TemplateError::Serialize(e.to_string()))
}

fn fill_for<'f>(start: &BytesStart<'_>, fills: &'f BTreeMap<String, String>) -> Option<&'f str> {
    attribute(start, "id").and_then(|id| fills.get(&id)).map(String::as_str)
}

fn begin_root(
    kind: TemplateKind,
    start: &BytesStart<'_>,
    root: &mut Option<(usize, BytesStart<'static>)>,
    index: usize,
) -> Result<(), TemplateError> {
    if root.is_some() {
        return Err(malformed(kind, "more than one root element"));
    }
    if start.local_name().as_ref() != b"svg" {
        return Err(TemplateError::MissingRoot { template: kind });
    }
    *root = Some((index, start.clone().into_owned()));
    Ok(())
}

fn check_attributes(kind: TemplateKind, start: &BytesStart<'_>) -> Result<(), TemplateError> {
    for attr in start.attributes() {
        attr.map_err(|e| {
            malformed(
                kind,
                format!("bad attribute on <{}>: {e}", lossy(start.name().as_ref())),
            )
        })?;
    }
    Ok(())
}

/// Returns the unescaped value of attribute `name`.
pub fn attribute(start: &BytesStart<'_>, name: &str) -> Option<String> {
    start
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name.as_bytes())
        .map(|attr| attribute_value(&attr))
}

fn attribute_value(attr: &Attribute<'_>) -> String {
    attr.unescape_value()
        .map(Cow::into_owned)
        .unwrap_or_else(|_| lossy(&attr.value))
}

/// What to do with one attribute when copying a start tag.
pub(crate) enum AttrEdit {
    Keep,
    Replace(String),
    Drop,
}

/// Copies a start tag, letting `edit` rewrite or drop attribute values.
/// Kept attributes are copied byte for byte.
pub(crate) fn rewrite_start(
    start: &BytesStart<'_>,
    mut edit: impl FnMut(&str, &str) -> AttrEdit,
) -> BytesStart<'static> {
    let mut out = BytesStart::new(lossy(start.name().as_ref()));
    for attr in start.attributes().flatten() {
        let key = lossy(attr.key.as_ref());
        let value = attribute_value(&attr);
        match edit(&key, &value) {
            AttrEdit::Keep => out.push_attribute(attr),
            AttrEdit::Replace(new) => out.push_attribute((key.as_str(), new.as_str())),
            AttrEdit::Drop => {}
        }
    }
    out
}

/// Copies a start tag with its fill set to `color`. A `fill` declaration
/// inside `style` is removed so it cannot override the attribute.
pub(crate) fn with_fill(start: &BytesStart<'_>, color: &str) -> BytesStart<'static> {
    let mut replaced = false;
    let mut out = rewrite_start(start, |key, value| match key {
        "fill" => {
            replaced = true;
            AttrEdit::Replace(color.to_string())
        }
        "style" if style_has_property(value, "fill") => {
            strip_style_property(value, "fill").map_or(AttrEdit::Drop, AttrEdit::Replace)
        }
        _ => AttrEdit::Keep,
    });
    if !replaced {
        out.push_attribute(("fill", color));
    }
    out
}

fn style_property_name(declaration: &str) -> &str {
    declaration.split(':').next().unwrap_or("").trim()
}

fn style_has_property(style: &str, property: &str) -> bool {
    style.split(';').any(|decl| style_property_name(decl) == property)
}

pub(crate) fn strip_style_property(style: &str, property: &str) -> Option<String> {
    let kept: Vec<&str> = style
        .split(';')
        .filter(|decl| !decl.trim().is_empty() && style_property_name(decl) != property)
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(";"))
    }
}

/// Builds an owned start tag.
pub(crate) fn open(name: &str, attrs: &[(&str, &str)]) -> Event<'static> {
    Event::Start(BytesStart::new(name.to_string()).with_attributes(attrs.iter().copied()))
}

/// Builds an owned self-closing tag.
pub(crate) fn leaf(name: &str, attrs: &[(&str, &str)]) -> Event<'static> {
    Event::Empty(BytesStart::new(name.to_string()).with_attributes(attrs.iter().copied()))
}

/// Builds an owned end tag.
pub(crate) fn close(name: &str) -> Event<'static> {
    Event::End(BytesEnd::new(name.to_string()))
}

/// Builds an owned, escaped text node.
pub(crate) fn text(content: &str) -> Event<'static> {
    Event::Text(BytesText::new(content).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
  <path id="par" d="M0 0h10v10z" style="fill:#ffffff;stroke:#000"/>
  <g id="layer"><path id="bur" fill="#eee" d="M10 0h10v10z"></path></g>
</svg>
"##;

    #[test]
    fn parses_well_formed_map() {
        let doc = SvgDocument::parse(TemplateKind::Map, MAP).unwrap();
        assert_eq!(attribute(doc.root(), "width").as_deref(), Some("100"));
        let ids = doc.element_ids();
        assert!(ids.contains("par"));
        assert!(ids.contains("bur"));
        assert!(ids.contains("layer"));
    }

    #[test]
    fn rejects_mismatched_tags() {
        let err = SvgDocument::parse(TemplateKind::Army, "<svg><g></svg>").unwrap_err();
        assert!(matches!(err, TemplateError::Malformed { template: TemplateKind::Army, .. }));
    }

    #[test]
    fn rejects_unclosed_root() {
        let err = SvgDocument::parse(TemplateKind::Fleet, "<svg><g></g>").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::Unclosed { template: TemplateKind::Fleet, .. }
                | TemplateError::Malformed { template: TemplateKind::Fleet, .. }
        ));
    }

    #[test]
    fn rejects_non_svg_root() {
        let err = SvgDocument::parse(TemplateKind::Map, "<html></html>").unwrap_err();
        assert_eq!(err, TemplateError::MissingRoot { template: TemplateKind::Map });
        let err = SvgDocument::parse(TemplateKind::Map, "").unwrap_err();
        assert_eq!(err, TemplateError::MissingRoot { template: TemplateKind::Map });
    }

    #[test]
    fn rejects_duplicate_attributes_and_second_root() {
        assert!(SvgDocument::parse(TemplateKind::Map, r#"<svg a="1" a="2"></svg>"#).is_err());
        assert!(SvgDocument::parse(TemplateKind::Map, "<svg></svg><svg></svg>").is_err());
        assert!(SvgDocument::parse(TemplateKind::Map, "<svg></svg>trailing").is_err());
    }

    #[test]
    fn write_without_edits_preserves_content() {
        let doc = SvgDocument::parse(TemplateKind::Map, MAP).unwrap();
        let out = doc.write(&BTreeMap::new(), &[]).unwrap();
        assert_eq!(out, MAP);
    }

    #[test]
    fn write_replaces_fill_and_style_fill() {
        let doc = SvgDocument::parse(TemplateKind::Map, MAP).unwrap();
        let fills: BTreeMap<String, String> = [
            ("par".to_string(), "#112233".to_string()),
            ("bur".to_string(), "#445566".to_string()),
        ]
        .into();
        let out = doc.write(&fills, &[]).unwrap();
        assert!(out.contains(r##"<path id="par" d="M0 0h10v10z" style="stroke:#000" fill="#112233"/>"##));
        assert!(out.contains(r##"<path id="bur" fill="#445566" d="M10 0h10v10z">"##));
    }

    #[test]
    fn write_appends_layers_inside_root() {
        let doc = SvgDocument::parse(TemplateKind::Map, MAP).unwrap();
        let layers = vec![open("g", &[("id", "units")]), text("a<b"), close("g")];
        let out = doc.write(&BTreeMap::new(), &layers).unwrap();
        assert!(out.contains("<g id=\"units\">a&lt;b</g></svg>"));
    }

    #[test]
    fn write_opens_self_closing_root() {
        let doc = SvgDocument::parse(TemplateKind::Map, r#"<svg width="5"/>"#).unwrap();
        assert!(doc.children().is_empty());
        let layers = vec![leaf("g", &[("id", "units")])];
        let out = doc.write(&BTreeMap::new(), &layers).unwrap();
        assert_eq!(out, r#"<svg width="5"><g id="units"/></svg>"#);
    }

    #[test]
    fn style_property_stripping() {
        assert_eq!(strip_style_property("fill:#fff;stroke:#000", "fill").as_deref(), Some("stroke:#000"));
        assert_eq!(strip_style_property("fill:#fff;", "fill"), None);
        assert!(!style_has_property("fill-opacity:0.5", "fill"));
    }
}
