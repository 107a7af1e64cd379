//! Property tests for color resolution and composition.
//!
//! Run with: PROPTEST_CASES=10000 cargo test --release prop_compose

#![allow(clippy::unwrap_used)]

mod common;

use std::collections::BTreeMap;

use proptest::prelude::*;

use cartographer::board::{Phase, Unit, UnitType, Variant};
use cartographer::color::{self, ColorError, ColorResolver, CONTRAST_COLORS, NEUTRAL_COLOR, NEUTRAL_NATION};
use cartographer::{compose, MapRenderer};

use common::*;

const PROVINCES: [&str; 9] = ["lon", "eng", "bre", "pic", "par", "bur", "gas", "mao", "spa"];
const SUPPLY_CENTERS: [&str; 4] = ["lon", "bre", "par", "spa"];
const NATIONS: [&str; 3] = ["England", "France", "Germany"];

fn nation_list(len: usize) -> Variant {
    Variant {
        name: "Generated".to_string(),
        nations: (0..len).map(|i| format!("Nation{i}")).collect(),
        ..Variant::default()
    }
}

prop_compose! {
    /// A random but valid phase of the mini variant: at most one unit per
    /// province, any supply-center ownership, some dislodgements.
    fn phase()(
        units in proptest::collection::btree_map(
            proptest::sample::select(PROVINCES.to_vec()),
            (any::<bool>(), proptest::sample::select(NATIONS.to_vec())),
            0..PROVINCES.len(),
        ),
        owners in proptest::collection::btree_map(
            proptest::sample::select(SUPPLY_CENTERS.to_vec()),
            proptest::option::of(proptest::sample::select(NATIONS.to_vec())),
            0..SUPPLY_CENTERS.len(),
        ),
        dislodged in proptest::collection::btree_set(proptest::sample::select(PROVINCES.to_vec()), 0..3),
    ) -> Phase {
        let mut phase = Phase::empty(1, "Fall", 1901, "Retreat");
        for (province, (fleet, nation)) in units {
            let unit_type = if fleet { UnitType::Fleet } else { UnitType::Army };
            phase.place_unit(province, Unit::new(unit_type, nation));
        }
        for (province, owner) in owners {
            phase.set_sc_owner(province, owner.unwrap_or(""));
        }
        for province in dislodged {
            phase.set_dislodged(province, Unit::army("Germany"), None);
        }
        phase
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The palette fallback depends only on the nation's position.
    #[test]
    fn fallback_is_index_stable(len in 1usize..=CONTRAST_COLORS.len(), pick in any::<prop::sample::Index>()) {
        let variant = nation_list(len);
        let index = pick.index(len);
        let nation = &variant.nations[index];
        prop_assert_eq!(color::resolve(&variant, nation), Ok(CONTRAST_COLORS[index]));
        prop_assert_eq!(color::resolve(&variant, nation), color::resolve(&variant, nation));
    }

    /// The precomputed resolver answers exactly like the free function.
    #[test]
    fn resolver_matches_resolve(
        len in 0usize..=CONTRAST_COLORS.len() + 3,
        overrides in proptest::collection::btree_map(0usize..30, "#[0-9a-f]{6}", 0..4),
        probe in "[A-Za-z]{1,8}",
    ) {
        let mut variant = nation_list(len);
        let colors: BTreeMap<String, String> = overrides
            .into_iter()
            .map(|(i, color)| (format!("Nation{i}"), color))
            .collect();
        variant.nation_colors = Some(colors);
        let resolver = ColorResolver::new(&variant);

        let mut names: Vec<String> = (0..30).map(|i| format!("Nation{i}")).collect();
        names.push(NEUTRAL_NATION.to_string());
        names.push(probe);
        for name in &names {
            prop_assert_eq!(resolver.resolve(name), color::resolve(&variant, name));
        }
    }

    /// Overrides win, whatever the palette would have said.
    #[test]
    fn override_always_wins(len in 1usize..=CONTRAST_COLORS.len(), pick in any::<prop::sample::Index>(), color in "#[0-9a-f]{6}") {
        let mut variant = nation_list(len);
        let nation = variant.nations[pick.index(len)].clone();
        variant.nation_colors = Some(BTreeMap::from([(nation.clone(), color.clone())]));
        prop_assert_eq!(color::resolve(&variant, &nation), Ok(color.as_str()));
    }

    /// Nations past the palette fail instead of wrapping around.
    #[test]
    fn palette_does_not_wrap(extra in 1usize..5) {
        let len = CONTRAST_COLORS.len() + extra;
        let variant = nation_list(len);
        let last = &variant.nations[len - 1];
        let exhausted = matches!(color::resolve(&variant, last), Err(ColorError::PaletteExhausted { .. }));
        prop_assert!(exhausted);
    }

    /// Same inputs, same bytes; and the renderer agrees with one-shot
    /// composition.
    #[test]
    fn compose_is_pure(phase in phase()) {
        let variant = variant();
        let before = phase.clone();
        let first = compose(MAP_SVG, ARMY_SVG, FLEET_SVG, &variant, &phase, None).unwrap();
        let second = compose(MAP_SVG, ARMY_SVG, FLEET_SVG, &variant, &phase, None).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&phase, &before);

        let renderer = MapRenderer::new(MAP_SVG, ARMY_SVG, FLEET_SVG, &variant).unwrap();
        prop_assert_eq!(renderer.render(&phase, None).unwrap(), first);
    }

    /// Every province fill is its owner's color, or neutral.
    #[test]
    fn fills_follow_ownership(phase in phase()) {
        let variant = variant();
        let svg = compose(MAP_SVG, ARMY_SVG, FLEET_SVG, &variant, &phase, None).unwrap();
        for province in PROVINCES {
            let expected = match phase.supply_center_owner(province) {
                Some(owner) => color::resolve(&variant, owner).unwrap(),
                None => NEUTRAL_COLOR,
            };
            let tag = tag_with_id(&svg, province).unwrap();
            prop_assert_eq!(attr(tag, "fill"), Some(expected));
        }
        prop_assert_eq!(count(&svg, r#"<svg id="unit-"#), phase.units.len());
        prop_assert_eq!(count(&svg, r#"<svg id="dislodged-"#), phase.dislodged_units.len());
    }
}
