//! Unit icon layers.

use quick_xml::events::Event;

use super::{ComposeError, MapRenderer};
use crate::board::{Phase, Unit, UnitType};
use crate::svg::document::{close, open};
use crate::svg::{sanitize_id, IconPlacement, Point};

pub const UNITS_LAYER: &str = "units";
pub const DISLODGED_LAYER: &str = "dislodged-units";

/// Opacity of dislodged unit icons.
pub const DISLODGED_OPACITY: &str = "0.6";

/// Builds the layer of active units.
pub(super) fn unit_layer(renderer: &MapRenderer, phase: &Phase) -> Result<Vec<Event<'static>>, ComposeError> {
    let mut events = vec![open("g", &[("id", UNITS_LAYER)])];
    for state in &phase.units {
        let center = renderer.graph().locate(&state.province)?;
        let id = format!("unit-{}", sanitize_id(&state.province));
        let title = unit_title(renderer, &state.unit, &state.province);
        let class = format!("unit unit-{}", state.unit.unit_type.class_name());
        let attributes = [
            ("class", class.as_str()),
            ("data-province", state.province.as_str()),
            ("data-unit", state.unit.unit_type.name()),
            ("data-nation", state.unit.nation.as_str()),
        ];
        events.extend(place(renderer, &state.unit, &id, center, &attributes, &title)?);
    }
    events.push(close("g"));
    Ok(events)
}

/// Builds the layer of dislodged units.
///
/// Each icon is shifted right by the widest icon and down by half the
/// tallest, so it never overlaps a unit standing on the same anchor.
pub(super) fn dislodged_layer(renderer: &MapRenderer, phase: &Phase) -> Result<Vec<Event<'static>>, ComposeError> {
    let (dx, dy) = dislodged_offset(renderer);
    let mut events = vec![open("g", &[("id", DISLODGED_LAYER)])];
    for dislodged in &phase.dislodged_units {
        let center = renderer.graph().locate(&dislodged.province)?.offset(dx, dy);
        let id = format!("dislodged-{}", sanitize_id(&dislodged.province));
        let attacker = phase.dislodger_of(&dislodged.province);
        let unit = unit_title(renderer, &dislodged.unit, &dislodged.province);
        let title = match attacker {
            Some(from) => format!("{unit}, dislodged from {}", renderer.place_name(from)),
            None => format!("{unit}, dislodged"),
        };
        let class = format!("unit unit-dislodged unit-{}", dislodged.unit.unit_type.class_name());
        let mut attributes = vec![
            ("class", class.as_str()),
            ("opacity", DISLODGED_OPACITY),
            ("data-province", dislodged.province.as_str()),
            ("data-unit", dislodged.unit.unit_type.name()),
            ("data-nation", dislodged.unit.nation.as_str()),
        ];
        if let Some(from) = attacker {
            attributes.push(("data-dislodged-by", from));
        }
        events.extend(place(renderer, &dislodged.unit, &id, center, &attributes, &title)?);
    }
    events.push(close("g"));
    Ok(events)
}

/// Offset from a province anchor to its dislodged icon's centre.
pub fn dislodged_offset(renderer: &MapRenderer) -> (f64, f64) {
    let army = renderer.icon(UnitType::Army);
    let fleet = renderer.icon(UnitType::Fleet);
    (army.width().max(fleet.width()), army.height().max(fleet.height()) / 2.0)
}

fn place(
    renderer: &MapRenderer,
    unit: &Unit,
    id: &str,
    center: Point,
    attributes: &[(&str, &str)],
    title: &str,
) -> Result<Vec<Event<'static>>, ComposeError> {
    let fill = renderer.colors().resolve(&unit.nation)?;
    Ok(renderer.icon(unit.unit_type).instantiate(&IconPlacement {
        id,
        center,
        fill,
        attributes,
        title: Some(title),
    }))
}

/// Tooltip such as `Army (France) in Paris`.
fn unit_title(renderer: &MapRenderer, unit: &Unit, location: &str) -> String {
    format!("{} ({}) in {}", unit.unit_type.name(), unit.nation, renderer.place_name(location))
}
