//! Point identifiers, value types and write rules.

use serde::{Deserialize, Serialize};

/// Compact stable identifier for a registered point.
///
/// Assigned once at registration; replaces name lookup on the hot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(pub u16);

impl PointId {
    pub fn new(id: u16) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl From<u16> for PointId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

/// Value type of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointKind {
    Float,
    Bool,
    UInt,
}

impl PointKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Float => "Float",
            Self::Bool => "Bool",
            Self::UInt => "UInt",
        }
    }
}

/// A scalar point value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointValue {
    Float(f64),
    Bool(bool),
    UInt(u32),
}

impl PointValue {
    pub fn kind(&self) -> PointKind {
        match self {
            Self::Float(_) => PointKind::Float,
            Self::Bool(_) => PointKind::Bool,
            Self::UInt(_) => PointKind::UInt,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::UInt(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for PointValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for PointValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u32> for PointValue {
    fn from(v: u32) -> Self {
        Self::UInt(v)
    }
}

/// Access level of a point as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    /// State-backed: published by the engine, external writes rejected.
    ReadOnly,
    /// Config-backed: externally writable.
    ReadWrite,
}

/// On-write filter for a point.
///
/// Most config points accept any value of the right type and are sanitized
/// by the owning model on its next update; the few points where a bad value
/// is structurally meaningless reject on write instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WriteRule {
    Any,
    FloatRange { min: f64, max: f64 },
    UIntRange { min: u32, max: u32 },
}

impl WriteRule {
    /// Whether `value` passes this rule. Type agreement is checked by the
    /// registry before the rule applies.
    pub fn allows(&self, value: &PointValue) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (Self::FloatRange { min, max }, PointValue::Float(v)) => (*min..=*max).contains(v),
            (Self::UIntRange { min, max }, PointValue::UInt(v)) => (*min..=*max).contains(v),
            // Rule/value kind disagreement is a registration bug; reject.
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_kind_accessors() {
        assert_eq!(PointValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(PointValue::Float(1.5).as_bool(), None);
        assert_eq!(PointValue::Bool(true).as_bool(), Some(true));
        assert_eq!(PointValue::UInt(7).as_u32(), Some(7));
        assert_eq!(PointValue::UInt(7).kind(), PointKind::UInt);
    }

    #[test]
    fn float_range_rule() {
        let rule = WriteRule::FloatRange { min: 0.1, max: 10.0 };
        assert!(rule.allows(&PointValue::Float(0.1)));
        assert!(rule.allows(&PointValue::Float(10.0)));
        assert!(!rule.allows(&PointValue::Float(0.05)));
        assert!(!rule.allows(&PointValue::Float(11.0)));
        assert!(!rule.allows(&PointValue::Bool(true)));
    }

    #[test]
    fn uint_range_rule() {
        let rule = WriteRule::UIntRange { min: 1, max: 3 };
        assert!(rule.allows(&PointValue::UInt(1)));
        assert!(rule.allows(&PointValue::UInt(3)));
        assert!(!rule.allows(&PointValue::UInt(0)));
        assert!(!rule.allows(&PointValue::UInt(4)));
    }
}
