//! Nation display colors.
//!
//! A nation's color is its explicit override from the variant when one is
//! configured, otherwise the entry of a fixed high-contrast palette at the
//! nation's position in the variant's nation list. The pseudo-nation
//! `Neutral` always has a fixed gray unless the variant overrides it.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::board::Variant;

/// Name of the pseudo-nation owning unowned supply centers.
pub const NEUTRAL_NATION: &str = "Neutral";

/// Fill used for neutral and unowned provinces.
pub const NEUTRAL_COLOR: &str = "#d0d0d0";

/// Fallback palette, indexed by nation position. Covers the largest
/// supported player count.
pub const CONTRAST_COLORS: [&str; 20] = [
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
    "#bcf60c", "#fabebe", "#008080", "#e6beff", "#9a6324", "#fffac8", "#800000", "#aaffc3",
    "#808000", "#ffd8b1", "#000075", "#000000",
];

/// Errors raised while resolving a nation's color.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("nation {nation:?} is not part of variant {variant:?}")]
    NationNotFound { nation: String, variant: String },

    #[error("nation {nation:?} is at position {index}, past the {len}-color palette")]
    PaletteExhausted {
        nation: String,
        index: usize,
        len: usize,
    },
}

/// Resolves the display color of `nation` in `variant`.
pub fn resolve<'a>(variant: &'a Variant, nation: &str) -> Result<&'a str, ColorError> {
    if let Some(color) = variant.nation_color(nation) {
        return Ok(color);
    }
    if nation == NEUTRAL_NATION {
        return Ok(NEUTRAL_COLOR);
    }
    let index = variant
        .nation_index(nation)
        .ok_or_else(|| ColorError::NationNotFound {
            nation: nation.to_string(),
            variant: variant.name.clone(),
        })?;
    CONTRAST_COLORS
        .get(index)
        .copied()
        .ok_or_else(|| ColorError::PaletteExhausted {
            nation: nation.to_string(),
            index,
            len: CONTRAST_COLORS.len(),
        })
}

/// Precomputed colors for every nation of one variant.
///
/// Answers exactly as [`resolve`] does; build it once per variant when
/// rendering many phases.
#[derive(Debug, Clone)]
pub struct ColorResolver {
    variant: String,
    colors: BTreeMap<String, Result<String, ColorError>>,
    neutral: String,
}

impl ColorResolver {
    pub fn new(variant: &Variant) -> Self {
        let overridden = variant.nation_colors.iter().flat_map(|colors| colors.keys());
        let colors = variant
            .nations
            .iter()
            .chain(overridden)
            .map(|nation| (nation.clone(), resolve(variant, nation).map(str::to_string)))
            .collect();
        let neutral = variant.nation_color(NEUTRAL_NATION).unwrap_or(NEUTRAL_COLOR).to_string();
        Self {
            variant: variant.name.clone(),
            colors,
            neutral,
        }
    }

    /// Returns the color of `nation`.
    pub fn resolve(&self, nation: &str) -> Result<&str, ColorError> {
        if let Some(entry) = self.colors.get(nation) {
            return entry.as_deref().map_err(Clone::clone);
        }
        if nation == NEUTRAL_NATION {
            return Ok(&self.neutral);
        }
        Err(ColorError::NationNotFound {
            nation: nation.to_string(),
            variant: self.variant.clone(),
        })
    }

    /// Returns the fill for a province owned by `owner`, or the neutral
    /// fill when it has no owner.
    pub fn province_fill(&self, owner: Option<&str>) -> Result<&str, ColorError> {
        match owner {
            Some(nation) => self.resolve(nation),
            None => Ok(&self.neutral),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn classic() -> Variant {
        Variant {
            name: "Classical".to_string(),
            nations: ["England", "France", "Germany"].map(String::from).to_vec(),
            ..Variant::default()
        }
    }

    #[test]
    fn palette_entries_are_distinct() {
        let unique: BTreeSet<&str> = CONTRAST_COLORS.iter().copied().collect();
        assert_eq!(unique.len(), CONTRAST_COLORS.len());
        assert!(!unique.contains(NEUTRAL_COLOR));
    }

    #[test]
    fn fallback_uses_nation_position() {
        let v = classic();
        assert_eq!(resolve(&v, "England"), Ok(CONTRAST_COLORS[0]));
        assert_eq!(resolve(&v, "France"), Ok(CONTRAST_COLORS[1]));
        assert_eq!(resolve(&v, "Germany"), Ok(CONTRAST_COLORS[2]));
    }

    #[test]
    fn neutral_is_gray() {
        assert_eq!(resolve(&classic(), NEUTRAL_NATION), Ok(NEUTRAL_COLOR));
    }

    #[test]
    fn unknown_nation_fails() {
        let err = resolve(&classic(), "Italy").unwrap_err();
        assert_eq!(
            err,
            ColorError::NationNotFound {
                nation: "Italy".to_string(),
                variant: "Classical".to_string(),
            }
        );
    }

    #[test]
    fn override_wins_even_on_collision() {
        let mut v = classic();
        v.nation_colors = Some(
            [
                ("Germany".to_string(), CONTRAST_COLORS[0].to_string()),
                ("Neutral".to_string(), "#ffffff".to_string()),
            ]
            .into(),
        );
        assert_eq!(resolve(&v, "Germany"), Ok(CONTRAST_COLORS[0]));
        assert_eq!(resolve(&v, "England"), Ok(CONTRAST_COLORS[0]));
        assert_eq!(resolve(&v, "Neutral"), Ok("#ffffff"));
    }

    #[test]
    fn palette_exhaustion_is_an_error() {
        let v = Variant {
            name: "Huge".to_string(),
            nations: (0..21).map(|i| format!("N{i}")).collect(),
            ..Variant::default()
        };
        assert_eq!(resolve(&v, "N19"), Ok(CONTRAST_COLORS[19]));
        assert!(matches!(
            resolve(&v, "N20"),
            Err(ColorError::PaletteExhausted { index: 20, len: 20, .. })
        ));
    }

    #[test]
    fn resolver_agrees_with_resolve() {
        let mut v = classic();
        v.nation_colors = Some(
            [
                ("France".to_string(), "#0000ff".to_string()),
                ("Austria".to_string(), "#ff00ff".to_string()),
            ]
            .into(),
        );
        let resolver = ColorResolver::new(&v);
        for nation in ["England", "France", "Germany", "Neutral", "Italy", "Austria"] {
            assert_eq!(resolver.resolve(nation), resolve(&v, nation));
        }
        assert_eq!(resolver.province_fill(None), Ok(NEUTRAL_COLOR));
        assert_eq!(resolver.province_fill(Some("France")), Ok("#0000ff"));
    }
}
