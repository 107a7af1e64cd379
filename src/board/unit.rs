//! Unit types and ownership.
//!
//! Represents armies and fleets and the nation that owns them. Units are
//! plain values: they are never mutated after construction and compare
//! by value.

use serde::{Deserialize, Serialize};

/// The type of a military unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitType {
    Army,
    Fleet,
}

impl UnitType {
    /// Returns the name used by the upstream API (`Army` / `Fleet`).
    pub const fn name(self) -> &'static str {
        match self {
            UnitType::Army => "Army",
            UnitType::Fleet => "Fleet",
        }
    }

    /// Returns the lowercase name used in SVG class names.
    pub const fn class_name(self) -> &'static str {
        match self {
            UnitType::Army => "army",
            UnitType::Fleet => "fleet",
        }
    }

    /// Parses a unit type from its upstream name.
    pub fn from_name(name: &str) -> Option<UnitType> {
        match name {
            "Army" => Some(UnitType::Army),
            "Fleet" => Some(UnitType::Fleet),
            _ => None,
        }
    }
}

/// A military unit: its type and owning nation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub nation: String,
}

impl Unit {
    /// Creates a unit owned by `nation`.
    pub fn new(unit_type: UnitType, nation: impl Into<String>) -> Self {
        Self {
            unit_type,
            nation: nation.into(),
        }
    }

    pub fn army(nation: impl Into<String>) -> Self {
        Self::new(UnitType::Army, nation)
    }

    pub fn fleet(nation: impl Into<String>) -> Self {
        Self::new(UnitType::Fleet, nation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_type_name_roundtrip() {
        assert_eq!(UnitType::from_name("Army"), Some(UnitType::Army));
        assert_eq!(UnitType::from_name("Fleet"), Some(UnitType::Fleet));
        assert_eq!(UnitType::from_name("army"), None);
        assert_eq!(UnitType::from_name("Zeppelin"), None);
    }

    #[test]
    fn units_compare_by_value() {
        assert_eq!(Unit::army("France"), Unit::new(UnitType::Army, "France"));
        assert_ne!(Unit::army("France"), Unit::fleet("France"));
        assert_ne!(Unit::army("France"), Unit::army("England"));
    }

    #[test]
    fn unit_json_shape() {
        let unit: Unit = serde_json::from_str(r#"{"type":"Fleet","nation":"England"}"#).unwrap();
        assert_eq!(unit, Unit::fleet("England"));
    }
}
