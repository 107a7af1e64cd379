//! Raw Diplicity API records.
//!
//! These mirror the upstream JSON field for field (PascalCase) and are only
//! ever read. Lists the API sends as `null` deserialize as empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// Envelope around every API payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiResponse<P> {
    pub properties: P,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "Type")]
    pub kind: Option<String>,
}

/// A list response: an envelope of envelopes.
pub type ApiList<P> = ApiResponse<Vec<ApiResponse<P>>>;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiEdge {
    #[serde(default, deserialize_with = "null_as_default")]
    pub flags: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiSub {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: BTreeMap<String, ApiEdge>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reverse_edges: BTreeMap<String, ApiEdge>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flags: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiNode {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subs: BTreeMap<String, ApiSub>,
    #[serde(default, rename = "SC")]
    pub sc: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiGraph {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: BTreeMap<String, ApiNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiUnit {
    #[serde(rename = "Type")]
    pub unit_type: String,
    pub nation: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiStart {
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub season: String,
    #[serde(default, rename = "Type")]
    pub phase_type: String,
    #[serde(default, rename = "SCs", deserialize_with = "null_as_default")]
    pub scs: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub units: BTreeMap<String, ApiUnit>,
    #[serde(default)]
    pub map: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiVariant {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phase_types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub seasons: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_types: Vec<String>,
    #[serde(default, rename = "SVGVersion")]
    pub svg_version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub province_long_names: BTreeMap<String, String>,
    #[serde(default)]
    pub nation_colors: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: String,
    #[serde(default)]
    pub start: ApiStart,
    #[serde(default)]
    pub graph: ApiGraph,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiPhaseMeta {
    pub phase_ordinal: u32,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default, rename = "Type")]
    pub phase_type: String,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub resolved_at: String,
    #[serde(default)]
    pub deadline_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiGame {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub desc: String,
    pub variant: String,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub disable_conference_chat: bool,
    #[serde(default)]
    pub disable_group_chat: bool,
    #[serde(default)]
    pub disable_private_chat: bool,
    #[serde(default, rename = "ChatLanguageISO639_1")]
    pub chat_language: String,
    #[serde(default, rename = "NMembers")]
    pub n_members: u32,
    #[serde(default)]
    pub last_year: i32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub started_at: String,
    #[serde(default)]
    pub finished_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub newest_phase_meta: Vec<ApiPhaseMeta>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiUnitState {
    pub province: String,
    pub unit: ApiUnit,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiScState {
    pub province: String,
    #[serde(default)]
    pub owner: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiDislodged {
    pub province: String,
    pub dislodged: ApiUnit,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiDislodger {
    pub province: String,
    pub dislodger: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiBounce {
    pub province: String,
    pub bounce_list: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiResolution {
    pub province: String,
    pub resolution: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiPreliminaryScore {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub member: String,
    #[serde(default, rename = "SCs")]
    pub scs: u32,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiPhase {
    pub phase_ordinal: u32,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default, rename = "Type")]
    pub phase_type: String,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub resolved_at: String,
    #[serde(default)]
    pub deadline_at: String,
    #[serde(default, rename = "GameID")]
    pub game_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub units: Vec<ApiUnitState>,
    #[serde(default, rename = "SCs", deserialize_with = "null_as_default")]
    pub scs: Vec<ApiScState>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dislodgeds: Vec<ApiDislodged>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dislodgers: Vec<ApiDislodger>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub force_disbands: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bounces: Vec<ApiBounce>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resolutions: Vec<ApiResolution>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preliminary_scores: Vec<ApiPreliminaryScore>,
}

/// An order as listed for a phase. `Parts` holds the source, the order
/// type and then the type-specific locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiOrder {
    pub nation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<String>,
}
