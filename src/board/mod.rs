//! Board representation and game-state types.
//!
//! Contains the normalized variant, phase, game and order records, plus
//! the province graph that ties the variant topology to map geometry.

pub mod game;
pub mod graph;
pub mod order;
pub mod province;
pub mod state;
pub mod unit;
pub mod variant;

pub use game::{Game, GameStatus, PhaseMeta, PlayerIdentity, Visibility};
pub use graph::{Adjacency, GraphError, ProvinceGraph};
pub use order::{apply_resolutions, OrderAnnotation, OrderResult, OrderType};
pub use province::{province_of, Location, FLAG_CONVOYABLE, FLAG_LAND, FLAG_SEA, MAIN_SUB, SUB_SEPARATOR};
pub use state::{
    Bounce, DislodgedUnit, DislodgingProvince, Phase, PreliminaryScore, Resolution, SupplyCenterState, UnitState,
};
pub use unit::{Unit, UnitType};
pub use variant::{flag_set, Edge, Flags, ProvinceNode, SubArea, Variant};
