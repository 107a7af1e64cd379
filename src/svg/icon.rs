//! Unit icon templates.
//!
//! An icon template is instantiated once per unit as a nested `<svg>`
//! element centred on the unit's anchor. Every copy gets its internal ids
//! prefixed with the copy's own id, and `url(#...)` / `href="#..."`
//! references are rewritten to match, so any number of copies can live in
//! one document. The icon root's namespace declarations and presentation
//! attributes move onto each copy's outer element, so prefixed names inside
//! the icon stay bound whatever the map declares.

use quick_xml::events::{BytesStart, Event};

use super::anchor::{length, Point};
use super::document::{
    attribute, close, open, rewrite_start, strip_style_property, text, with_fill, AttrEdit, SvgDocument,
};
use super::{number, parse_numbers};

/// Size used when an icon declares neither width/height nor a viewBox.
pub const DEFAULT_ICON_SIZE: f64 = 40.0;

/// Id of the icon element that receives the nation color.
pub const BODY_ID: &str = "body";

/// Root attributes that only place the icon document itself.
const PLACEMENT_ATTRIBUTES: [&str; 6] = ["id", "x", "y", "width", "height", "viewBox"];

/// Where and how to draw one icon copy.
#[derive(Debug, Clone, Copy)]
pub struct IconPlacement<'a> {
    /// Id of the copy; also the prefix for its internal ids.
    pub id: &'a str,
    pub center: Point,
    pub fill: &'a str,
    /// Extra attributes for the copy's outer element.
    pub attributes: &'a [(&'a str, &'a str)],
    /// Optional tooltip text.
    pub title: Option<&'a str>,
}

/// A reusable icon.
#[derive(Debug, Clone)]
pub struct IconTemplate {
    width: f64,
    height: f64,
    view_box: Option<String>,
    /// Root attributes carried onto every copy.
    root_attributes: Vec<(String, String)>,
    body: Vec<Event<'static>>,
    has_body: bool,
}

impl IconTemplate {
    /// Builds a template from a parsed icon document.
    pub fn from_document(doc: &SvgDocument) -> Self {
        let root = doc.root();
        let view_box = attribute(root, "viewBox");
        let box_size = view_box
            .as_deref()
            .map(parse_numbers)
            .and_then(|n| match n.as_slice() {
                [_, _, w, h] if *w > 0.0 && *h > 0.0 => Some((*w, *h)),
                _ => None,
            });
        let width = length(root, "width")
            .filter(|w| *w > 0.0)
            .or(box_size.map(|(w, _)| w))
            .unwrap_or(DEFAULT_ICON_SIZE);
        let height = length(root, "height")
            .filter(|h| *h > 0.0)
            .or(box_size.map(|(_, h)| h))
            .unwrap_or(DEFAULT_ICON_SIZE);
        let has_body = doc
            .elements()
            .any(|el| attribute(el, "id").as_deref() == Some(BODY_ID));
        let root_attributes = root
            .attributes()
            .flatten()
            .filter_map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                if PLACEMENT_ATTRIBUTES.contains(&key.as_str()) {
                    return None;
                }
                let value = attribute(root, &key)?;
                Some((key, value))
            })
            .collect();

        Self {
            width,
            height,
            view_box,
            root_attributes,
            body: doc.children().to_vec(),
            has_body,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns true if the icon has an element with id `body` to tint.
    pub fn has_body(&self) -> bool {
        self.has_body
    }

    /// Produces the events of one tinted copy.
    pub fn instantiate(&self, placement: &IconPlacement<'_>) -> Vec<Event<'static>> {
        let x = number(placement.center.x - self.width / 2.0);
        let y = number(placement.center.y - self.height / 2.0);
        let width = number(self.width);
        let height = number(self.height);

        // Without a body the whole copy is tinted, so a root fill gives way.
        let root_style = self
            .root_attributes
            .iter()
            .find(|(key, _)| key == "style")
            .and_then(|(_, style)| {
                if self.has_body {
                    Some(style.clone())
                } else {
                    strip_style_property(style, "fill")
                }
            });

        let mut attrs: Vec<(&str, &str)> = vec![
            ("id", placement.id),
            ("x", x.as_str()),
            ("y", y.as_str()),
            ("width", width.as_str()),
            ("height", height.as_str()),
        ];
        if let Some(view_box) = &self.view_box {
            attrs.push(("viewBox", view_box.as_str()));
        }
        attrs.push(("overflow", "visible"));
        for (key, value) in &self.root_attributes {
            let overridden = key == "overflow"
                || (key == "fill" && !self.has_body)
                || placement.attributes.iter().any(|(name, _)| name == key);
            match key.as_str() {
                _ if overridden => {}
                "style" => {
                    if let Some(style) = &root_style {
                        attrs.push(("style", style.as_str()));
                    }
                }
                _ => attrs.push((key.as_str(), value.as_str())),
            }
        }
        if !self.has_body {
            attrs.push(("fill", placement.fill));
        }
        attrs.extend_from_slice(placement.attributes);

        let mut events = Vec::with_capacity(self.body.len() + 5);
        events.push(open("svg", &attrs));
        if let Some(title) = placement.title {
            events.push(open("title", &[]));
            events.push(text(title));
            events.push(close("title"));
        }
        for event in &self.body {
            events.push(match event {
                Event::Start(start) => Event::Start(tag_copy(start, placement.id, placement.fill)),
                Event::Empty(start) => Event::Empty(tag_copy(start, placement.id, placement.fill)),
                other => other.clone(),
            });
        }
        events.push(close("svg"));
        events
    }
}

/// Prefixes ids and references inside one element and tints the body.
fn tag_copy(start: &BytesStart<'_>, prefix: &str, fill: &str) -> BytesStart<'static> {
    let is_body = attribute(start, "id").as_deref() == Some(BODY_ID);
    let url_ref = format!("url(#{prefix}-");
    let tagged = rewrite_start(start, |key, value| match key {
        "id" => AttrEdit::Replace(format!("{prefix}-{value}")),
        "href" | "xlink:href" if value.starts_with('#') => {
            AttrEdit::Replace(format!("#{prefix}-{}", &value[1..]))
        }
        _ if value.contains("url(#") => AttrEdit::Replace(value.replace("url(#", &url_ref)),
        _ => AttrEdit::Keep,
    });
    if is_body {
        with_fill(&tagged, fill)
    } else {
        tagged
    }
}
