//! Order annotations for map overlays.
//!
//! Orders here are display records of already-adjudicated instructions.
//! Field meaning depends on the order type:
//!
//! - `Move` / `MoveViaConvoy`: `source` moves to `target`.
//! - `Support`: `source` supports the unit at `target`, moving to `aux`
//!   (no `aux`, or `aux == target`, is a support hold).
//! - `Convoy`: the fleet at `source` convoys the army at `target` to `aux`.
//! - `Hold`, `Build`, `Disband`: only `source` is used.

use serde::{Deserialize, Serialize};

use super::province::province_of;
use super::state::Phase;

/// The kind of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    Move,
    MoveViaConvoy,
    Support,
    Hold,
    Convoy,
    Build,
    Disband,
}

impl OrderType {
    /// Returns the upstream name of this order type.
    pub const fn name(self) -> &'static str {
        match self {
            OrderType::Move => "Move",
            OrderType::MoveViaConvoy => "MoveViaConvoy",
            OrderType::Support => "Support",
            OrderType::Hold => "Hold",
            OrderType::Convoy => "Convoy",
            OrderType::Build => "Build",
            OrderType::Disband => "Disband",
        }
    }

    /// Returns the lowercase class name used in the SVG overlay.
    pub const fn class_name(self) -> &'static str {
        match self {
            OrderType::Move => "move",
            OrderType::MoveViaConvoy => "move-via-convoy",
            OrderType::Support => "support",
            OrderType::Hold => "hold",
            OrderType::Convoy => "convoy",
            OrderType::Build => "build",
            OrderType::Disband => "disband",
        }
    }

    /// Parses an order type from its upstream name.
    pub fn from_name(name: &str) -> Option<OrderType> {
        match name {
            "Move" => Some(OrderType::Move),
            "MoveViaConvoy" => Some(OrderType::MoveViaConvoy),
            "Support" => Some(OrderType::Support),
            "Hold" => Some(OrderType::Hold),
            "Convoy" => Some(OrderType::Convoy),
            "Build" => Some(OrderType::Build),
            "Disband" => Some(OrderType::Disband),
            _ => None,
        }
    }
}

/// Adjudicated outcome of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderResult {
    Success,
    Bounce,
    Failed,
    Dislodged,
}

impl OrderResult {
    /// Returns the label drawn next to a resolved order.
    pub const fn label(self) -> &'static str {
        match self {
            OrderResult::Success => "success",
            OrderResult::Bounce => "bounce",
            OrderResult::Failed => "failed",
            OrderResult::Dislodged => "dislodged",
        }
    }
}

/// One order to draw on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAnnotation {
    pub nation: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub source: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub aux: Option<String>,
    /// `None` means the order is still pending.
    #[serde(default)]
    pub result: Option<OrderResult>,
}

impl OrderAnnotation {
    /// Creates an order with only a source location.
    pub fn new(nation: impl Into<String>, order_type: OrderType, source: impl Into<String>) -> Self {
        Self {
            nation: nation.into(),
            order_type,
            source: source.into(),
            target: None,
            aux: None,
            result: None,
        }
    }

    pub fn hold(nation: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(nation, OrderType::Hold, source)
    }

    pub fn move_to(nation: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(nation, OrderType::Move, source).target(target)
    }

    /// Support for the unit at `supported`, moving to `dest` when given.
    pub fn support(
        nation: impl Into<String>,
        source: impl Into<String>,
        supported: impl Into<String>,
        dest: Option<&str>,
    ) -> Self {
        let order = Self::new(nation, OrderType::Support, source).target(supported);
        match dest {
            Some(d) => order.aux(d),
            None => order,
        }
    }

    pub fn convoy(
        nation: impl Into<String>,
        fleet: impl Into<String>,
        army_from: impl Into<String>,
        army_to: impl Into<String>,
    ) -> Self {
        Self::new(nation, OrderType::Convoy, fleet).target(army_from).aux(army_to)
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn aux(mut self, aux: impl Into<String>) -> Self {
        self.aux = Some(aux.into());
        self
    }

    pub fn resolved(mut self, result: OrderResult) -> Self {
        self.result = Some(result);
        self
    }

    /// Returns true if no result is known yet.
    pub fn is_pending(&self) -> bool {
        self.result.is_none()
    }

    /// Returns true if this is a support for a unit that is not moving.
    pub fn is_support_hold(&self) -> bool {
        self.order_type == OrderType::Support
            && match (&self.target, &self.aux) {
                (_, None) => true,
                (Some(t), Some(a)) => province_of(t) == province_of(a),
                (None, Some(_)) => false,
            }
    }
}

/// Fills in missing order results from a resolved phase's resolution list.
///
/// Orders that already carry a result are left alone. Orders whose source
/// unit was dislodged are marked [`OrderResult::Dislodged`] when the
/// resolution list has no entry for them.
pub fn apply_resolutions(orders: &mut [OrderAnnotation], phase: &Phase) {
    if !phase.resolved {
        return;
    }
    for order in orders.iter_mut().filter(|o| o.is_pending()) {
        if let Some(resolution) = phase.resolution_at(&order.source) {
            order.result = Some(resolution.outcome());
        } else if phase
            .dislodged_units
            .iter()
            .any(|d| province_of(&d.province) == province_of(&order.source))
        {
            order.result = Some(OrderResult::Dislodged);
        }
    }
}
