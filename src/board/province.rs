//! Province and sub-area addressing.
//!
//! Provinces are open, variant-defined identifiers rather than a fixed
//! enumeration. A location names either a whole province (`spa`) or one of
//! its sub-areas, such as a coast, joined with a slash (`spa/nc`).

/// Separator between a province and its sub-area in a location identifier.
pub const SUB_SEPARATOR: char = '/';

/// Sub-area key of a province's main body in the variant graph.
pub const MAIN_SUB: &str = "";

/// Flag marking a sub-area or edge as passable by armies.
pub const FLAG_LAND: &str = "Land";

/// Flag marking a sub-area or edge as passable by fleets.
pub const FLAG_SEA: &str = "Sea";

/// Flag marking a sub-area as able to carry a convoy.
pub const FLAG_CONVOYABLE: &str = "Convoyable";

/// A parsed location identifier borrowing from its source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location<'a> {
    pub province: &'a str,
    pub sub: Option<&'a str>,
}

impl<'a> Location<'a> {
    /// Splits `id` at the first separator. An empty sub-area part is
    /// treated as no sub-area.
    pub fn parse(id: &'a str) -> Self {
        match id.split_once(SUB_SEPARATOR) {
            Some((province, sub)) if !sub.is_empty() => Self {
                province,
                sub: Some(sub),
            },
            Some((province, _)) => Self {
                province,
                sub: None,
            },
            None => Self {
                province: id,
                sub: None,
            },
        }
    }

    /// Returns true if this location addresses a specific sub-area.
    pub const fn has_sub(&self) -> bool {
        self.sub.is_some()
    }
}

/// Returns the province part of a location identifier.
pub fn province_of(id: &str) -> &str {
    Location::parse(id).province
}
