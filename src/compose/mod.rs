//! Map compositor.
//!
//! Turns a variant, a phase and the three SVG templates into one composed
//! SVG document: province fills from supply-center ownership, a layer of
//! unit icons, a layer of dislodged unit icons, and optionally a layer of
//! order overlays.
//!
//! Rendering is a pure function of its inputs. All templates are parsed and
//! every province and nation the phase mentions is checked before any
//! output is produced, so a render either succeeds completely or fails
//! with the stage that broke.

pub mod orders;
pub mod units;

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use thiserror::Error;

use crate::board::{province_of, GraphError, OrderAnnotation, OrderType, Phase, ProvinceGraph, UnitType, Variant};
use crate::color::{ColorError, ColorResolver};
use crate::svg::{extract_anchors, IconTemplate, SvgDocument, TemplateError, TemplateKind};

/// Errors raised while composing a map.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error(transparent)]
    MalformedTemplate(#[from] TemplateError),

    #[error("variant mismatch: {0}")]
    VariantMismatch(#[from] GraphError),

    #[error("color resolution failed: {0}")]
    ColorResolution(#[from] ColorError),

    #[error("{order_type:?} order from {location:?} is missing its {missing}")]
    InvalidOrder {
        order_type: OrderType,
        location: String,
        missing: &'static str,
    },
}

impl ComposeError {
    /// Names the rendering stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            ComposeError::MalformedTemplate(TemplateError::Serialize(_)) => "serialize",
            ComposeError::MalformedTemplate(_) => "template-parse",
            ComposeError::VariantMismatch(_) => "province-lookup",
            ComposeError::ColorResolution(_) => "color-resolution",
            ComposeError::InvalidOrder { .. } => "order-annotation",
        }
    }
}

/// A compositor prepared for one variant and one set of templates.
///
/// Parsing the templates and building the province graph happen once;
/// the renderer can then draw any number of phases, from any thread.
#[derive(Debug, Clone)]
pub struct MapRenderer {
    map: SvgDocument,
    army: IconTemplate,
    fleet: IconTemplate,
    graph: ProvinceGraph,
    colors: ColorResolver,
    /// Provinces that have a shape element in the map.
    shapes: BTreeSet<String>,
    /// Display name of every province.
    place_names: BTreeMap<String, String>,
}

impl MapRenderer {
    /// Parses the templates and prepares the variant lookups.
    ///
    /// All three templates are validated before anything else is done.
    pub fn new(map_svg: &str, army_svg: &str, fleet_svg: &str, variant: &Variant) -> Result<Self, ComposeError> {
        let map = SvgDocument::parse(TemplateKind::Map, map_svg)?;
        let army = SvgDocument::parse(TemplateKind::Army, army_svg)?;
        let fleet = SvgDocument::parse(TemplateKind::Fleet, fleet_svg)?;

        let anchors = extract_anchors(&map);
        let graph = ProvinceGraph::new(variant, anchors);
        let ids = map.element_ids();
        let shapes: BTreeSet<String> = graph
            .provinces()
            .filter(|province| ids.contains(*province))
            .map(str::to_string)
            .collect();
        let place_names = variant
            .graph
            .keys()
            .filter_map(|province| Some((province.clone(), variant.long_name(province)?.to_string())))
            .collect();

        tracing::debug!(
            target: "cartographer::compose",
            variant = %variant.name,
            provinces = variant.graph.len(),
            shapes = shapes.len(),
            anchors = graph.anchors().len(),
            "compose.renderer.ready"
        );

        Ok(Self {
            map,
            army: IconTemplate::from_document(&army),
            fleet: IconTemplate::from_document(&fleet),
            graph,
            colors: ColorResolver::new(variant),
            shapes,
            place_names,
        })
    }

    pub fn graph(&self) -> &ProvinceGraph {
        &self.graph
    }

    pub fn colors(&self) -> &ColorResolver {
        &self.colors
    }

    /// Returns the display name of a location's province.
    pub fn place_name<'a>(&'a self, location: &'a str) -> &'a str {
        let province = province_of(location);
        self.place_names.get(province).map_or(province, String::as_str)
    }

    /// Returns the icon template for a unit type.
    pub fn icon(&self, unit_type: UnitType) -> &IconTemplate {
        match unit_type {
            UnitType::Army => &self.army,
            UnitType::Fleet => &self.fleet,
        }
    }

    /// Renders one phase, with optional order overlays.
    pub fn render(&self, phase: &Phase, orders: Option<&[OrderAnnotation]>) -> Result<String, ComposeError> {
        self.validate(phase, orders.unwrap_or_default())?;

        let fills = self.province_fills(phase)?;
        let mut layers = units::unit_layer(self, phase)?;
        layers.extend(units::dislodged_layer(self, phase)?);
        if let Some(orders) = orders {
            layers.extend(orders::order_layer(self, orders)?);
        }

        let svg = self.map.write(&fills, &layers)?;
        tracing::debug!(
            target: "cartographer::compose",
            phase = phase.ordinal,
            units = phase.units.len(),
            dislodged = phase.dislodged_units.len(),
            orders = orders.map_or(0, <[_]>::len),
            bytes = svg.len(),
            "compose.render.done"
        );
        Ok(svg)
    }

    /// Renders many phases of this variant in parallel. Results are in the
    /// order of `phases`.
    pub fn render_many(&self, phases: &[Phase]) -> Vec<Result<String, ComposeError>> {
        phases.par_iter().map(|phase| self.render(phase, None)).collect()
    }

    /// Checks every location and nation the phase and orders mention.
    fn validate(&self, phase: &Phase, orders: &[OrderAnnotation]) -> Result<(), ComposeError> {
        for sc in &phase.supply_centers {
            self.graph.resolve_location(&sc.province)?;
            if !sc.owner.is_empty() {
                self.colors.resolve(&sc.owner)?;
            }
        }
        for unit in &phase.units {
            self.graph.locate(&unit.province)?;
            self.colors.resolve(&unit.unit.nation)?;
        }
        for dislodged in &phase.dislodged_units {
            self.graph.locate(&dislodged.province)?;
            self.colors.resolve(&dislodged.unit.nation)?;
        }
        for dislodging in &phase.dislodging_provinces {
            self.graph.resolve_location(&dislodging.province)?;
            self.graph.resolve_location(&dislodging.dislodging_province)?;
        }
        for order in orders {
            orders::validate_order(self, order)?;
        }
        Ok(())
    }

    /// Computes the fill of every province that has a shape in the map.
    fn province_fills(&self, phase: &Phase) -> Result<BTreeMap<String, String>, ComposeError> {
        let owners: BTreeMap<&str, &str> = phase
            .supply_centers
            .iter()
            .filter(|sc| !sc.owner.is_empty())
            .map(|sc| (province_of(&sc.province), sc.owner.as_str()))
            .collect();

        self.shapes
            .iter()
            .map(|province| {
                let owner = owners.get(province.as_str()).copied();
                let color = self.colors.province_fill(owner)?;
                Ok((province.clone(), color.to_string()))
            })
            .collect()
    }
}

/// Composes one phase in a single call.
pub fn compose(
    map_svg: &str,
    army_svg: &str,
    fleet_svg: &str,
    variant: &Variant,
    phase: &Phase,
    orders: Option<&[OrderAnnotation]>,
) -> Result<String, ComposeError> {
    MapRenderer::new(map_svg, army_svg, fleet_svg, variant)?.render(phase, orders)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names() {
        let parse = ComposeError::from(TemplateError::MissingRoot { template: TemplateKind::Army });
        assert_eq!(parse.stage(), "template-parse");
        let write = ComposeError::from(TemplateError::Serialize("x".into()));
        assert_eq!(write.stage(), "serialize");
        let lookup = ComposeError::from(GraphError::ProvinceNotFound("xyz".into()));
        assert_eq!(lookup.stage(), "province-lookup");
        let color = ComposeError::from(ColorError::NationNotFound {
            nation: "Italy".into(),
            variant: "Mini".into(),
        });
        assert_eq!(color.stage(), "color-resolution");
        let order = ComposeError::InvalidOrder {
            order_type: OrderType::Move,
            location: "par".into(),
            missing: "target",
        };
        assert_eq!(order.stage(), "order-annotation");
        assert_eq!(order.to_string(), "Move order from \"par\" is missing its target");
    }

    #[test]
    fn template_errors_name_the_template() {
        let err = compose("<svg/>", "<svg>", "<svg/>", &Variant::default(), &Phase::default(), None).unwrap_err();
        match err {
            ComposeError::MalformedTemplate(
                TemplateError::Unclosed { template, .. } | TemplateError::Malformed { template, .. },
            ) => assert_eq!(template, TemplateKind::Army),
            other => panic!("unexpected error: {other}"),
        }
    }
}
