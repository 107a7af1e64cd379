//! Placement anchors read from the base map.
//!
//! The map marks the drawing anchor of a province or sub-area with an
//! element whose id is the location followed by `Center` (`parCenter`,
//! `spa/ncCenter`). The `translate(...)` of the element and of every
//! enclosing element is applied; other transform functions are ignored.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};

use super::document::{attribute, SvgDocument};
use super::parse_numbers;

/// Suffix that marks an anchor element id.
pub const ANCHOR_SUFFIX: &str = "Center";

/// Anchors keyed by location identifier.
pub type AnchorTable = BTreeMap<String, Point>;

/// A point in the map's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Collects every anchor marked in `doc`, in the root's coordinates.
pub fn extract_anchors(doc: &SvgDocument) -> AnchorTable {
    let mut anchors = AnchorTable::new();
    // Translation accumulated by each open element.
    let mut origins = vec![Point::default()];
    for event in doc.events() {
        let origin = origins.last().copied().unwrap_or_default();
        match event {
            Event::Start(el) => {
                record_anchor(&mut anchors, el, origin);
                let inner = match attribute(el, "transform") {
                    Some(transform) => apply_translate(origin, &transform),
                    None => origin,
                };
                origins.push(inner);
            }
            Event::Empty(el) => record_anchor(&mut anchors, el, origin),
            Event::End(_) => {
                origins.pop();
            }
            _ => {}
        }
    }
    anchors
}

fn record_anchor(anchors: &mut AnchorTable, el: &BytesStart<'_>, origin: Point) {
    let Some(id) = attribute(el, "id") else {
        return;
    };
    let Some(location) = id.strip_suffix(ANCHOR_SUFFIX).filter(|l| !l.is_empty()) else {
        return;
    };
    if let Some(point) = element_anchor(el) {
        anchors.insert(location.to_string(), point.offset(origin.x, origin.y));
    }
}

/// Computes the anchor point of a single element, if its shape has one.
pub fn element_anchor(el: &BytesStart<'_>) -> Option<Point> {
    let point = match el.local_name().as_ref() {
        b"circle" | b"ellipse" => Point::new(length(el, "cx").unwrap_or(0.0), length(el, "cy").unwrap_or(0.0)),
        b"rect" => {
            let x = length(el, "x").unwrap_or(0.0);
            let y = length(el, "y").unwrap_or(0.0);
            let w = length(el, "width").unwrap_or(0.0);
            let h = length(el, "height").unwrap_or(0.0);
            Point::new(x + w / 2.0, y + h / 2.0)
        }
        b"path" => first_moveto(&attribute(el, "d")?)?,
        b"text" | b"use" | b"image" => Point::new(length(el, "x").unwrap_or(0.0), length(el, "y").unwrap_or(0.0)),
        _ => return None,
    };
    Some(match attribute(el, "transform") {
        Some(transform) => apply_translate(point, &transform),
        None => point,
    })
}

/// Parses a plain length attribute, accepting a `px` suffix.
pub(crate) fn length(el: &BytesStart<'_>, name: &str) -> Option<f64> {
    let raw = attribute(el, name)?;
    raw.trim().trim_end_matches("px").trim().parse().ok()
}

fn first_moveto(d: &str) -> Option<Point> {
    let rest = d.trim_start().strip_prefix(['M', 'm'])?;
    match parse_numbers(rest).as_slice() {
        [x, y, ..] => Some(Point::new(*x, *y)),
        _ => None,
    }
}

fn apply_translate(point: Point, transform: &str) -> Point {
    let Some(start) = transform.find("translate(") else {
        return point;
    };
    let args = &transform[start + "translate(".len()..];
    let args = args.split(')').next().unwrap_or("");
    match parse_numbers(args).as_slice() {
        [tx, ty, ..] => point.offset(*tx, *ty),
        [tx] => point.offset(*tx, 0.0),
        [] => point,
    }
}
