//! Phase snapshot representation.
//!
//! Holds one turn of a game as resolved upstream: unit positions,
//! supply-center ownership, dislodgements, and the auxiliary result lists
//! that are carried through for display.

use serde::{Deserialize, Serialize};

use super::order::OrderResult;
use super::province::province_of;
use super::unit::Unit;

/// A unit standing at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitState {
    pub province: String,
    pub unit: Unit,
}

/// Ownership of one supply center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyCenterState {
    pub province: String,
    pub owner: String,
}

/// A unit displaced from its location this phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DislodgedUnit {
    pub province: String,
    pub unit: Unit,
}

/// Records which province the successful attack on `province` came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DislodgingProvince {
    pub province: String,
    pub dislodging_province: String,
}

/// Provinces that bounced a move into `province`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounce {
    pub province: String,
    pub bounce_list: String,
}

/// Textual resolution of the order given from `province`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub province: String,
    pub resolution: String,
}

impl Resolution {
    /// Maps the upstream resolution text onto a display outcome.
    ///
    /// `OK` is a success; bounce errors are bounces; everything else is a
    /// failure.
    pub fn outcome(&self) -> OrderResult {
        match self.resolution.as_str() {
            "OK" => OrderResult::Success,
            r if r.starts_with("ErrBounce") => OrderResult::Bounce,
            _ => OrderResult::Failed,
        }
    }
}

/// Preliminary score of one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreliminaryScore {
    pub user_id: String,
    pub member: String,
    #[serde(rename = "scs")]
    pub supply_centers: u32,
    pub score: f64,
    pub explanation: String,
}

/// Normalized phase as produced by the upstream adapters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    #[serde(alias = "id")]
    pub ordinal: u32,
    pub season: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub phase_type: String,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub resolved_at: String,
    #[serde(default)]
    pub deadline_at: String,
    #[serde(default)]
    pub units: Vec<UnitState>,
    #[serde(default)]
    pub supply_centers: Vec<SupplyCenterState>,
    #[serde(default)]
    pub dislodged_units: Vec<DislodgedUnit>,
    #[serde(default)]
    pub dislodging_provinces: Vec<DislodgingProvince>,
    #[serde(default)]
    pub force_disbands: Vec<String>,
    #[serde(default)]
    pub bounces: Vec<Bounce>,
    #[serde(default)]
    pub resolutions: Vec<Resolution>,
    #[serde(default)]
    pub preliminary_scores: Vec<PreliminaryScore>,
}

impl Phase {
    /// Creates an empty phase.
    pub fn empty(ordinal: u32, season: impl Into<String>, year: i32, phase_type: impl Into<String>) -> Self {
        Self {
            ordinal,
            season: season.into(),
            year,
            phase_type: phase_type.into(),
            ..Self::default()
        }
    }

    /// Places a unit at `province`.
    pub fn place_unit(&mut self, province: impl Into<String>, unit: Unit) {
        self.units.push(UnitState {
            province: province.into(),
            unit,
        });
    }

    /// Records supply-center ownership.
    pub fn set_sc_owner(&mut self, province: impl Into<String>, owner: impl Into<String>) {
        self.supply_centers.push(SupplyCenterState {
            province: province.into(),
            owner: owner.into(),
        });
    }

    /// Records a dislodged unit and, optionally, where the attack came from.
    pub fn set_dislodged(&mut self, province: impl Into<String>, unit: Unit, attacker_from: Option<&str>) {
        let province = province.into();
        if let Some(from) = attacker_from {
            self.dislodging_provinces.push(DislodgingProvince {
                province: province.clone(),
                dislodging_province: from.to_string(),
            });
        }
        self.dislodged_units.push(DislodgedUnit { province, unit });
    }

    /// Returns the owner of the supply center in `province`, if any.
    /// An empty owner string counts as unowned.
    pub fn supply_center_owner(&self, province: &str) -> Option<&str> {
        self.supply_centers
            .iter()
            .find(|sc| sc.province == province)
            .map(|sc| sc.owner.as_str())
            .filter(|owner| !owner.is_empty())
    }

    /// Returns the province the attack on `province` came from.
    pub fn dislodger_of(&self, province: &str) -> Option<&str> {
        let target = province_of(province);
        self.dislodging_provinces
            .iter()
            .find(|d| province_of(&d.province) == target)
            .map(|d| d.dislodging_province.as_str())
    }

    /// Returns the resolution recorded for the order from `province`.
    pub fn resolution_at(&self, province: &str) -> Option<&Resolution> {
        let target = province_of(province);
        self.resolutions
            .iter()
            .find(|r| province_of(&r.province) == target)
    }
}
