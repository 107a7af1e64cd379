//! Province graph model.
//!
//! Joins a variant's topology with the drawing anchors read from its base
//! map, answering the two questions the compositor asks: where a location
//! is drawn, and which locations connect to it.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use thiserror::Error;

use super::province::{province_of, Location, FLAG_CONVOYABLE, FLAG_LAND, FLAG_SEA, MAIN_SUB};
use super::variant::{flag_set, Flags, ProvinceNode, SubArea, Variant};
use crate::svg::{AnchorTable, Point};

/// Errors raised by graph lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("province {0:?} is not in the variant graph")]
    ProvinceNotFound(String),

    #[error("province {province:?} has no sub-area {sub:?}")]
    SubAreaNotFound { province: String, sub: String },

    #[error("location {0:?} has no anchor in the map artwork")]
    MissingAnchor(String),
}

impl GraphError {
    /// Returns the location identifier the error is about.
    pub fn location(&self) -> String {
        match self {
            GraphError::ProvinceNotFound(id) | GraphError::MissingAnchor(id) => id.clone(),
            GraphError::SubAreaNotFound { province, sub } => format!("{province}/{sub}"),
        }
    }
}

/// One outgoing connection of a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    pub neighbor: String,
    pub flags: Flags,
}

/// Variant topology plus map geometry.
#[derive(Debug, Clone)]
pub struct ProvinceGraph {
    nodes: BTreeMap<String, ProvinceNode>,
    anchors: AnchorTable,
}

impl ProvinceGraph {
    pub fn new(variant: &Variant, anchors: AnchorTable) -> Self {
        Self {
            nodes: variant.graph.clone(),
            anchors,
        }
    }

    /// Iterates province identifiers in order.
    pub fn provinces(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn anchors(&self) -> &AnchorTable {
        &self.anchors
    }

    /// Resolves a location to its province node and sub-area key.
    ///
    /// A bare province resolves to its main body.
    pub fn resolve_location<'a>(&self, id: &'a str) -> Result<(&ProvinceNode, &'a str), GraphError> {
        let loc = Location::parse(id);
        let node = self
            .nodes
            .get(loc.province)
            .ok_or_else(|| GraphError::ProvinceNotFound(loc.province.to_string()))?;
        match loc.sub {
            Some(sub) if node.subs.contains_key(sub) => Ok((node, sub)),
            Some(sub) => Err(GraphError::SubAreaNotFound {
                province: loc.province.to_string(),
                sub: sub.to_string(),
            }),
            None => Ok((node, MAIN_SUB)),
        }
    }

    /// Returns the drawing anchor of a location.
    ///
    /// A sub-area without its own anchor is drawn at its province's anchor.
    pub fn locate(&self, id: &str) -> Result<Point, GraphError> {
        self.resolve_location(id)?;
        self.anchors
            .get(id)
            .or_else(|| self.anchors.get(province_of(id)))
            .copied()
            .ok_or_else(|| GraphError::MissingAnchor(id.to_string()))
    }

    /// Lists outgoing connections, sorted by neighbor.
    ///
    /// A bare province merges the edges of all its sub-areas, combining the
    /// flags of duplicate neighbors.
    pub fn adjacency(&self, id: &str) -> Result<Vec<Adjacency>, GraphError> {
        let (node, sub) = self.resolve_location(id)?;
        let areas: Vec<&SubArea> = if Location::parse(id).has_sub() {
            node.subs.get(sub).into_iter().collect()
        } else {
            node.subs.values().collect()
        };

        let mut merged: BTreeMap<&str, Flags> = BTreeMap::new();
        for area in areas {
            for (neighbor, edge) in &area.edges {
                let flags = merged.entry(neighbor.as_str()).or_default();
                for (name, set) in &edge.flags {
                    let entry = flags.entry(name.clone()).or_insert(false);
                    *entry |= *set;
                }
            }
        }
        Ok(merged
            .into_iter()
            .map(|(neighbor, flags)| Adjacency {
                neighbor: neighbor.to_string(),
                flags,
            })
            .collect())
    }

    /// Returns true if some edge leads from `from` to the province of `to`.
    pub fn is_adjacent(&self, from: &str, to: &str) -> bool {
        let target = province_of(to);
        self.adjacency(from)
            .map(|edges| edges.iter().any(|a| province_of(&a.neighbor) == target))
            .unwrap_or(false)
    }

    /// Returns true if a fleet at `id` can carry a convoy: the sub-area is
    /// flagged convoyable, or it is sea without land.
    pub fn is_convoy_eligible(&self, id: &str) -> bool {
        let Ok((node, sub)) = self.resolve_location(id) else {
            return false;
        };
        let Some(area) = node.subs.get(sub) else {
            return false;
        };
        flag_set(&area.flags, FLAG_CONVOYABLE)
            || (flag_set(&area.flags, FLAG_SEA) && !flag_set(&area.flags, FLAG_LAND))
    }

    /// Returns true if `id` lies in a supply-center province.
    pub fn is_supply_center(&self, id: &str) -> bool {
        self.nodes
            .get(province_of(id))
            .is_some_and(ProvinceNode::is_supply_center)
    }

    /// Finds the shortest chain of provinces from `source` to `target` that
    /// steps only through provinces in `via`.
    ///
    /// Returns the intermediate provinces in travel order, or `None` when no
    /// such chain exists.
    pub fn shortest_path_through(&self, source: &str, target: &str, via: &BTreeSet<&str>) -> Option<Vec<String>> {
        let start = province_of(source);
        let goal = province_of(target);
        if !self.nodes.contains_key(start) || !self.nodes.contains_key(goal) {
            return None;
        }

        let mut parent: BTreeMap<&str, &str> = BTreeMap::new();
        let mut queue = VecDeque::from([start]);
        let mut seen = BTreeSet::from([start]);

        while let Some(current) = queue.pop_front() {
            for next in self.province_neighbors(current) {
                if next == goal && current != start {
                    let mut path = vec![current.to_string()];
                    let mut step = current;
                    while let Some(prev) = parent.get(step) {
                        if *prev == start {
                            break;
                        }
                        path.push(prev.to_string());
                        step = prev;
                    }
                    path.reverse();
                    return Some(path);
                }
                if via.contains(next) && seen.insert(next) {
                    parent.insert(next, current);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    fn province_neighbors(&self, province: &str) -> BTreeSet<&str> {
        self.nodes
            .get(province)
            .map(|node| {
                node.subs
                    .values()
                    .flat_map(|area| area.edges.keys())
                    .map(|neighbor| province_of(neighbor))
                    .filter(|p| *p != province)
                    .collect()
            })
            .unwrap_or_default()
    }
}
