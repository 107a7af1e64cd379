//! Order overlays.
//!
//! Every order becomes one `<g class="order ...">` group in the `orders`
//! layer, stroked in the ordering nation's color:
//!
//! - Move: a solid arrow from source to target. A move between provinces
//!   that are not adjacent, and every `MoveViaConvoy`, bends through the
//!   fleets convoying it when a chain of them connects the two ends.
//! - Support: a dashed line. A support hold ends in a dashed ring around
//!   the supported unit; a support move ends in an arrow at the
//!   destination.
//! - Convoy: a dotted arrow from the army through the fleet to the
//!   destination.
//! - Hold: a ring around the unit. Build: a ring with a plus. Disband: a
//!   cross.
//!
//! Resolved orders carry a text label with their result. Pending orders
//! are drawn translucent and unlabelled.

use std::collections::BTreeSet;

use quick_xml::events::Event;

use super::{ComposeError, MapRenderer};
use crate::board::{province_of, OrderAnnotation, OrderType};
use crate::svg::document::{close, leaf, open, text};
use crate::svg::{number, Point};

pub const ORDERS_LAYER: &str = "orders";

pub const STROKE_WIDTH: f64 = 4.0;
pub const ARROW_LENGTH: f64 = 12.0;
pub const ARROW_WIDTH: f64 = 8.0;
pub const RING_RADIUS: f64 = 14.0;
/// Half the span of build and disband marks.
pub const MARK_SIZE: f64 = 8.0;

pub const SUPPORT_DASH: &str = "8,4";
pub const CONVOY_DASH: &str = "2,4";
pub const PENDING_OPACITY: &str = "0.5";

/// Height of a result label above the point it describes.
const LABEL_RISE: f64 = 18.0;

/// Checks that an order names what its type needs and that every location
/// and the nation resolve.
pub(super) fn validate_order(renderer: &MapRenderer, order: &OrderAnnotation) -> Result<(), ComposeError> {
    renderer.colors().resolve(&order.nation)?;
    renderer.graph().locate(&order.source)?;
    match order.order_type {
        OrderType::Move | OrderType::MoveViaConvoy | OrderType::Support => {
            required(order, order.target.as_deref(), "target")?;
        }
        OrderType::Convoy => {
            required(order, order.target.as_deref(), "target")?;
            required(order, order.aux.as_deref(), "aux")?;
        }
        OrderType::Hold | OrderType::Build | OrderType::Disband => {}
    }
    for location in [&order.target, &order.aux].into_iter().flatten() {
        renderer.graph().locate(location)?;
    }
    Ok(())
}

fn required<'o>(order: &OrderAnnotation, value: Option<&'o str>, missing: &'static str) -> Result<&'o str, ComposeError> {
    value.ok_or_else(|| ComposeError::InvalidOrder {
        order_type: order.order_type,
        location: order.source.clone(),
        missing,
    })
}

/// Builds the order layer.
pub(super) fn order_layer(renderer: &MapRenderer, orders: &[OrderAnnotation]) -> Result<Vec<Event<'static>>, ComposeError> {
    let mut events = vec![open("g", &[("id", ORDERS_LAYER)])];
    for (index, order) in orders.iter().enumerate() {
        let color = renderer.colors().resolve(&order.nation)?;
        let (shapes, label_at) = draw(renderer, order, orders, color)?;

        let id = format!("order-{index}");
        let status = match order.result {
            Some(result) => format!("result-{}", result.label()),
            None => "pending".to_string(),
        };
        let class = format!("order order-{} {status}", order.order_type.class_name());
        let mut attributes = vec![
            ("id", id.as_str()),
            ("class", class.as_str()),
            ("data-nation", order.nation.as_str()),
            ("data-source", order.source.as_str()),
        ];
        if order.is_pending() {
            attributes.push(("opacity", PENDING_OPACITY));
        }

        events.push(open("g", &attributes));
        events.extend(shapes);
        if let Some(result) = order.result {
            let x = number(label_at.x);
            let y = number(label_at.y - LABEL_RISE);
            events.push(open(
                "text",
                &[
                    ("x", x.as_str()),
                    ("y", y.as_str()),
                    ("class", "order-result"),
                    ("text-anchor", "middle"),
                    ("fill", color),
                ],
            ));
            events.push(text(result.label()));
            events.push(close("text"));
        }
        events.push(close("g"));
    }
    events.push(close("g"));
    Ok(events)
}

/// Draws one order. Returns its shapes and the point its label belongs to.
fn draw(
    renderer: &MapRenderer,
    order: &OrderAnnotation,
    orders: &[OrderAnnotation],
    color: &str,
) -> Result<(Vec<Event<'static>>, Point), ComposeError> {
    let graph = renderer.graph();
    let source = graph.locate(&order.source)?;
    let target = || endpoint(renderer, order, order.target.as_deref(), "target");
    let aux = || endpoint(renderer, order, order.aux.as_deref(), "aux").map(|(_, point)| point);

    let mut shapes = Vec::new();
    let label_at = match order.order_type {
        OrderType::Hold => {
            shapes.push(ring(source, color, None));
            source
        }
        OrderType::Move | OrderType::MoveViaConvoy => {
            let (target_id, to) = target()?;
            let needs_route =
                order.order_type == OrderType::MoveViaConvoy || !graph.is_adjacent(&order.source, target_id);
            let mut points = vec![source];
            if needs_route {
                points.extend(convoy_route(renderer, &order.source, target_id, orders).unwrap_or_default());
            }
            points.push(to);
            shapes.extend(connector(&points, color, None, true));
            to
        }
        OrderType::Support if order.is_support_hold() => {
            let (_, supported) = target()?;
            let edge = toward(supported, source, RING_RADIUS);
            shapes.extend(connector(&[source, edge], color, Some(SUPPORT_DASH), false));
            shapes.push(ring(supported, color, Some(SUPPORT_DASH)));
            supported
        }
        OrderType::Support => {
            target()?;
            let dest = aux()?;
            shapes.extend(connector(&[source, dest], color, Some(SUPPORT_DASH), true));
            dest
        }
        OrderType::Convoy => {
            let (_, army) = target()?;
            let dest = aux()?;
            shapes.extend(connector(&[army, source, dest], color, Some(CONVOY_DASH), true));
            source
        }
        OrderType::Build => {
            shapes.push(ring(source, color, None));
            shapes.push(marks(
                &[
                    (source.offset(-MARK_SIZE, 0.0), source.offset(MARK_SIZE, 0.0)),
                    (source.offset(0.0, -MARK_SIZE), source.offset(0.0, MARK_SIZE)),
                ],
                color,
            ));
            source
        }
        OrderType::Disband => {
            shapes.push(marks(
                &[
                    (source.offset(-MARK_SIZE, -MARK_SIZE), source.offset(MARK_SIZE, MARK_SIZE)),
                    (source.offset(-MARK_SIZE, MARK_SIZE), source.offset(MARK_SIZE, -MARK_SIZE)),
                ],
                color,
            ));
            source
        }
    };
    Ok((shapes, label_at))
}

fn endpoint<'o>(
    renderer: &MapRenderer,
    order: &OrderAnnotation,
    value: Option<&'o str>,
    missing: &'static str,
) -> Result<(&'o str, Point), ComposeError> {
    let id = required(order, value, missing)?;
    Ok((id, renderer.graph().locate(id)?))
}

/// Anchors of the convoying fleets a move passes through, in travel order.
///
/// Only convoy orders for this exact army and destination count, and only
/// when the fleet sits somewhere that can carry a convoy.
fn convoy_route(renderer: &MapRenderer, source: &str, target: &str, orders: &[OrderAnnotation]) -> Option<Vec<Point>> {
    let graph = renderer.graph();
    let from = province_of(source);
    let to = province_of(target);
    let fleets: BTreeSet<&str> = orders
        .iter()
        .filter(|o| o.order_type == OrderType::Convoy)
        .filter(|o| o.target.as_deref().map(province_of) == Some(from))
        .filter(|o| o.aux.as_deref().map(province_of) == Some(to))
        .filter(|o| graph.is_convoy_eligible(&o.source))
        .map(|o| province_of(&o.source))
        .collect();
    if fleets.is_empty() {
        return None;
    }
    let chain = graph.shortest_path_through(source, target, &fleets)?;
    chain.iter().map(|province| graph.locate(province).ok()).collect()
}

/// Returns the point `distance` away from `to`, on the way towards `from`.
fn toward(to: Point, from: Point, distance: f64) -> Point {
    let length = to.distance(from);
    if length <= distance {
        return to;
    }
    let t = distance / length;
    Point::new(to.x + (from.x - to.x) * t, to.y + (from.y - to.y) * t)
}

fn connector(points: &[Point], color: &str, dash: Option<&str>, arrow: bool) -> Vec<Event<'static>> {
    let mut events = Vec::with_capacity(2);
    let Some((&tip, rest)) = points.split_last() else {
        return events;
    };
    let Some(&prev) = rest.last() else {
        return events;
    };
    let with_head = arrow && prev.distance(tip) > ARROW_LENGTH;
    let end = if with_head { toward(tip, prev, ARROW_LENGTH) } else { tip };

    let mut d = String::new();
    for (i, point) in rest.iter().chain(std::iter::once(&end)).enumerate() {
        let command = if i == 0 { 'M' } else { 'L' };
        if i > 0 {
            d.push(' ');
        }
        d.push_str(&format!("{command}{},{}", number(point.x), number(point.y)));
    }

    let width = number(STROKE_WIDTH);
    let mut attributes = vec![
        ("class", "order-line"),
        ("d", d.as_str()),
        ("fill", "none"),
        ("stroke", color),
        ("stroke-width", width.as_str()),
        ("stroke-linecap", "round"),
        ("stroke-linejoin", "round"),
    ];
    if let Some(dash) = dash {
        attributes.push(("stroke-dasharray", dash));
    }
    events.push(leaf("path", &attributes));

    if with_head {
        let points = arrowhead(prev, tip);
        events.push(leaf(
            "polygon",
            &[("class", "order-arrowhead"), ("points", points.as_str()), ("fill", color)],
        ));
    }
    events
}

/// Polygon points of an arrowhead whose tip is at `tip`, pointing away
/// from `from`.
fn arrowhead(from: Point, tip: Point) -> String {
    let length = from.distance(tip);
    let (ux, uy) = ((tip.x - from.x) / length, (tip.y - from.y) / length);
    let base = Point::new(tip.x - ux * ARROW_LENGTH, tip.y - uy * ARROW_LENGTH);
    let half = ARROW_WIDTH / 2.0;
    let left = base.offset(-uy * half, ux * half);
    let right = base.offset(uy * half, -ux * half);
    [tip, left, right]
        .iter()
        .map(|p| format!("{},{}", number(p.x), number(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn ring(center: Point, color: &str, dash: Option<&str>) -> Event<'static> {
    let cx = number(center.x);
    let cy = number(center.y);
    let r = number(RING_RADIUS);
    let width = number(STROKE_WIDTH);
    let mut attributes = vec![
        ("class", "order-ring"),
        ("cx", cx.as_str()),
        ("cy", cy.as_str()),
        ("r", r.as_str()),
        ("fill", "none"),
        ("stroke", color),
        ("stroke-width", width.as_str()),
    ];
    if let Some(dash) = dash {
        attributes.push(("stroke-dasharray", dash));
    }
    leaf("circle", &attributes)
}

fn marks(segments: &[(Point, Point)], color: &str) -> Event<'static> {
    let d = segments
        .iter()
        .map(|(a, b)| format!("M{},{} L{},{}", number(a.x), number(a.y), number(b.x), number(b.y)))
        .collect::<Vec<_>>()
        .join(" ");
    let width = number(STROKE_WIDTH);
    leaf(
        "path",
        &[
            ("class", "order-mark"),
            ("d", d.as_str()),
            ("fill", "none"),
            ("stroke", color),
            ("stroke-width", width.as_str()),
            ("stroke-linecap", "round"),
        ],
    )
}
