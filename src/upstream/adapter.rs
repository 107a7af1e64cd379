//! Conversion of raw API records into the normalized board types.

use std::collections::BTreeMap;

use thiserror::Error;

use super::types::{ApiGame, ApiGraph, ApiOrder, ApiPhase, ApiUnit, ApiVariant};
use crate::board::{
    apply_resolutions, Bounce, DislodgedUnit, DislodgingProvince, Edge, Game, GameStatus, OrderAnnotation, OrderType,
    Phase, PhaseMeta, PlayerIdentity, PreliminaryScore, ProvinceNode, Resolution, SubArea, SupplyCenterState, Unit,
    UnitState, UnitType, Variant, Visibility,
};

/// Errors raised while normalizing upstream records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdaptError {
    #[error("unknown unit type '{0}'")]
    UnknownUnitType(String),

    #[error("unknown order type '{0}'")]
    UnknownOrderType(String),

    #[error("order '{parts}' from {nation} is missing its {expected}")]
    IncompleteOrder {
        nation: String,
        parts: String,
        expected: &'static str,
    },
}

fn unit(raw: &ApiUnit) -> Result<Unit, AdaptError> {
    let unit_type = UnitType::from_name(&raw.unit_type).ok_or_else(|| AdaptError::UnknownUnitType(raw.unit_type.clone()))?;
    Ok(Unit::new(unit_type, raw.nation.clone()))
}

fn graph(raw: &ApiGraph) -> BTreeMap<String, ProvinceNode> {
    raw.nodes
        .iter()
        .map(|(id, node)| {
            let subs = node
                .subs
                .iter()
                .map(|(sub_id, sub)| {
                    let edges = sub
                        .edges
                        .iter()
                        .map(|(neighbor, edge)| (neighbor.clone(), Edge { flags: edge.flags.clone() }))
                        .collect();
                    (
                        sub_id.clone(),
                        SubArea {
                            edges,
                            flags: sub.flags.clone(),
                        },
                    )
                })
                .collect();
            let node = ProvinceNode {
                name: node.name.clone(),
                subs,
                supply_center: node.sc.clone(),
            };
            (id.clone(), node)
        })
        .collect()
}

/// Normalizes a variant definition.
pub fn variant_adapter(raw: &ApiVariant) -> Result<Variant, AdaptError> {
    let start_units = raw
        .start
        .units
        .iter()
        .map(|(province, u)| Ok((province.clone(), unit(u)?)))
        .collect::<Result<_, AdaptError>>()?;

    Ok(Variant {
        name: raw.name.clone(),
        nations: raw.nations.clone(),
        nation_colors: raw.nation_colors.clone(),
        graph: graph(&raw.graph),
        unit_types: raw.unit_types.clone(),
        order_types: raw.order_types.clone(),
        phase_types: raw.phase_types.clone(),
        seasons: raw.seasons.clone(),
        province_long_names: raw.province_long_names.clone(),
        start_year: raw.start.year,
        start_season: raw.start.season.clone(),
        start_type: raw.start.phase_type.clone(),
        start_scs: raw.start.scs.clone(),
        start_units,
        created_by: raw.created_by.clone(),
        description: raw.description.clone(),
        rules: raw.rules.clone(),
        map: raw.start.map.clone(),
    })
}

/// Normalizes a phase snapshot.
pub fn phase_adapter(raw: &ApiPhase) -> Result<Phase, AdaptError> {
    let units = raw
        .units
        .iter()
        .map(|u| {
            Ok(UnitState {
                province: u.province.clone(),
                unit: unit(&u.unit)?,
            })
        })
        .collect::<Result<_, AdaptError>>()?;
    let dislodged_units = raw
        .dislodgeds
        .iter()
        .map(|d| {
            Ok(DislodgedUnit {
                province: d.province.clone(),
                unit: unit(&d.dislodged)?,
            })
        })
        .collect::<Result<_, AdaptError>>()?;

    Ok(Phase {
        ordinal: raw.phase_ordinal,
        season: raw.season.clone(),
        year: raw.year,
        phase_type: raw.phase_type.clone(),
        resolved: raw.resolved,
        created_at: raw.created_at.clone(),
        resolved_at: raw.resolved_at.clone(),
        deadline_at: raw.deadline_at.clone(),
        units,
        supply_centers: raw
            .scs
            .iter()
            .map(|sc| SupplyCenterState {
                province: sc.province.clone(),
                owner: sc.owner.clone(),
            })
            .collect(),
        dislodged_units,
        dislodging_provinces: raw
            .dislodgers
            .iter()
            .map(|d| DislodgingProvince {
                province: d.province.clone(),
                dislodging_province: d.dislodger.clone(),
            })
            .collect(),
        force_disbands: raw.force_disbands.clone(),
        bounces: raw
            .bounces
            .iter()
            .map(|b| Bounce {
                province: b.province.clone(),
                bounce_list: b.bounce_list.clone(),
            })
            .collect(),
        resolutions: raw
            .resolutions
            .iter()
            .map(|r| Resolution {
                province: r.province.clone(),
                resolution: r.resolution.clone(),
            })
            .collect(),
        preliminary_scores: raw
            .preliminary_scores
            .iter()
            .map(|s| PreliminaryScore {
                user_id: s.user_id.clone(),
                member: s.member.clone(),
                supply_centers: s.scs,
                score: s.score,
                explanation: s.explanation.clone(),
            })
            .collect(),
    })
}

/// Normalizes a game record.
pub fn game_adapter(raw: &ApiGame) -> Game {
    Game {
        id: raw.id.clone(),
        name: raw.desc.clone(),
        variant: raw.variant.clone(),
        status: GameStatus::from_flags(raw.started, raw.finished),
        visibility: if raw.private { Visibility::Private } else { Visibility::Public },
        player_identity: if raw.anonymous {
            PlayerIdentity::Anonymous
        } else {
            PlayerIdentity::Public
        },
        anonymous: raw.anonymous,
        private_game: raw.private,
        closed: raw.closed,
        started: raw.started,
        finished: raw.finished,
        chat_disabled: raw.disable_conference_chat && raw.disable_group_chat && raw.disable_private_chat,
        conference_chat_enabled: !raw.disable_conference_chat,
        group_chat_enabled: !raw.disable_group_chat,
        private_chat_enabled: !raw.disable_private_chat,
        chat_language: raw.chat_language.clone(),
        num_players: raw.n_members,
        end_year: raw.last_year,
        created_at: raw.created_at.clone(),
        started_at: raw.started_at.clone(),
        finished_at: raw.finished_at.clone(),
        newest_phase_meta: raw
            .newest_phase_meta
            .iter()
            .map(|m| PhaseMeta {
                ordinal: m.phase_ordinal,
                season: m.season.clone(),
                year: m.year,
                phase_type: m.phase_type.clone(),
                resolved: m.resolved,
                created_at: m.created_at.clone(),
                resolved_at: m.resolved_at.clone(),
                deadline_at: m.deadline_at.clone(),
            })
            .collect(),
    }
}

/// Normalizes one order.
///
/// The order parts are `[source, type, ...]`: a move adds its target, a
/// support adds the supported unit and, for a support move, the
/// destination; a convoy adds the army's origin and destination. The unit
/// type named by a build is not drawn and is ignored.
pub fn order_adapter(raw: &ApiOrder) -> Result<OrderAnnotation, AdaptError> {
    let incomplete = |expected| AdaptError::IncompleteOrder {
        nation: raw.nation.clone(),
        parts: raw.parts.join(" "),
        expected,
    };
    let part = |index: usize, expected| raw.parts.get(index).cloned().ok_or_else(|| incomplete(expected));

    let source = part(0, "source")?;
    let type_name = part(1, "type")?;
    let order_type = OrderType::from_name(&type_name).ok_or_else(|| AdaptError::UnknownOrderType(type_name.clone()))?;
    let order = OrderAnnotation::new(raw.nation.clone(), order_type, source);

    Ok(match order_type {
        OrderType::Move | OrderType::MoveViaConvoy => order.target(part(2, "target")?),
        OrderType::Support => {
            let order = order.target(part(2, "supported unit")?);
            match raw.parts.get(3) {
                Some(dest) => order.aux(dest.clone()),
                None => order,
            }
        }
        OrderType::Convoy => order.target(part(2, "convoyed army")?).aux(part(3, "destination")?),
        OrderType::Hold | OrderType::Build | OrderType::Disband => order,
    })
}

/// Normalizes a phase's orders and marks each with its result when the
/// phase is resolved.
pub fn orders_adapter(raw: &[ApiOrder], phase: &Phase) -> Result<Vec<OrderAnnotation>, AdaptError> {
    let mut orders = raw.iter().map(order_adapter).collect::<Result<Vec<_>, _>>()?;
    apply_resolutions(&mut orders, phase);
    Ok(orders)
}
