//! Normalized variant definition.
//!
//! A variant is the ruleset and topology for one game type: its nations in
//! a significant order, optional display colors, the province graph, and
//! the starting position. Variants are read-only inputs; nothing in the
//! renderer mutates them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::province::MAIN_SUB;
use super::unit::Unit;

/// Named boolean flags on an edge or sub-area (`Land`, `Sea`, ...).
pub type Flags = BTreeMap<String, bool>;

/// Returns true if `name` is present and set in `flags`.
pub fn flag_set(flags: &Flags, name: &str) -> bool {
    flags.get(name).copied().unwrap_or(false)
}

/// A directed edge to a neighboring location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default)]
    pub flags: Flags,
}

/// A subdivision of a province (its main body or a coast).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubArea {
    /// Outgoing edges keyed by neighbor location identifier.
    #[serde(default)]
    pub edges: BTreeMap<String, Edge>,
    #[serde(default)]
    pub flags: Flags,
}

/// A province node in the variant graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceNode {
    pub name: String,
    /// Sub-areas keyed by sub-area identifier; the main body uses `""`.
    #[serde(default)]
    pub subs: BTreeMap<String, SubArea>,
    /// Present iff the province is a supply center. Holds the home nation
    /// or an empty/neutral marker.
    #[serde(default)]
    pub supply_center: Option<String>,
}

impl ProvinceNode {
    /// Creates a node with an empty main body.
    pub fn new(name: impl Into<String>) -> Self {
        let mut subs = BTreeMap::new();
        subs.insert(MAIN_SUB.to_string(), SubArea::default());
        Self {
            name: name.into(),
            subs,
            supply_center: None,
        }
    }

    /// Marks the province as a supply center.
    pub fn supply_center(mut self, marker: impl Into<String>) -> Self {
        self.supply_center = Some(marker.into());
        self
    }

    /// Sets flags on a sub-area, creating the sub-area if needed.
    pub fn sub_flags(mut self, sub: &str, flags: &[&str]) -> Self {
        let area = self.subs.entry(sub.to_string()).or_default();
        for flag in flags {
            area.flags.insert((*flag).to_string(), true);
        }
        self
    }

    /// Adds an outgoing edge from `sub` to `neighbor` with the given flags.
    pub fn edge(mut self, sub: &str, neighbor: &str, flags: &[&str]) -> Self {
        let area = self.subs.entry(sub.to_string()).or_default();
        let edge = area.edges.entry(neighbor.to_string()).or_default();
        for flag in flags {
            edge.flags.insert((*flag).to_string(), true);
        }
        self
    }

    /// Returns true if this province is a supply center.
    pub fn is_supply_center(&self) -> bool {
        self.supply_center.is_some()
    }
}

/// Normalized variant as produced by the upstream adapters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub name: String,
    /// Nations in variant order. The order drives fallback coloring.
    pub nations: Vec<String>,
    #[serde(default)]
    pub nation_colors: Option<BTreeMap<String, String>>,
    pub graph: BTreeMap<String, ProvinceNode>,
    #[serde(default)]
    pub unit_types: Vec<String>,
    #[serde(default)]
    pub order_types: Vec<String>,
    #[serde(default)]
    pub phase_types: Vec<String>,
    #[serde(default)]
    pub seasons: Vec<String>,
    #[serde(default)]
    pub province_long_names: BTreeMap<String, String>,
    #[serde(default)]
    pub start_year: i32,
    #[serde(default)]
    pub start_season: String,
    #[serde(default)]
    pub start_type: String,
    #[serde(default, rename = "startSCs")]
    pub start_scs: BTreeMap<String, String>,
    #[serde(default)]
    pub start_units: BTreeMap<String, Unit>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: String,
    #[serde(default)]
    pub map: String,
}

impl Variant {
    /// Returns the position of `nation` in the variant's nation order.
    pub fn nation_index(&self, nation: &str) -> Option<usize> {
        self.nations.iter().position(|n| n == nation)
    }

    /// Returns the explicit color override for `nation`, if configured.
    pub fn nation_color(&self, nation: &str) -> Option<&str> {
        self.nation_colors
            .as_ref()
            .and_then(|colors| colors.get(nation))
            .map(String::as_str)
    }

    /// Returns the human-readable name of a province, falling back to the
    /// graph node name.
    pub fn long_name(&self, province: &str) -> Option<&str> {
        self.province_long_names
            .get(province)
            .or_else(|| self.graph.get(province).map(|node| &node.name))
            .map(String::as_str)
    }
}
