use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// RGB presentation color attached to a track; carries no tracking semantics.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

pub const COLOR_PERSON: Color = Color(0, 200, 0);
pub const COLOR_CAR: Color = Color(220, 0, 0);
pub const COLOR_UNKNOWN: Color = Color(128, 128, 128);

/// Category reported by the detector. `Unknown` acts as a wildcard during
/// association and never participates in collisions.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ObjectClass {
    Person,
    Car,
    Unknown,
}

impl ObjectClass {
    #[inline]
    pub fn color(&self) -> Color {
        match self {
            ObjectClass::Person => COLOR_PERSON,
            ObjectClass::Car => COLOR_CAR,
            ObjectClass::Unknown => COLOR_UNKNOWN,
        }
    }

    /// Whether `self` and `other` are compatible for association purposes.
    #[inline]
    pub fn matches(&self, other: ObjectClass) -> bool {
        *self == other || *self == ObjectClass::Unknown || other == ObjectClass::Unknown
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectClass::Person => "person",
            ObjectClass::Car => "car",
            ObjectClass::Unknown => "unknown",
        };

        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_matching() {
        assert!(ObjectClass::Person.matches(ObjectClass::Person));
        assert!(ObjectClass::Unknown.matches(ObjectClass::Car));
        assert!(ObjectClass::Car.matches(ObjectClass::Unknown));
        assert!(!ObjectClass::Car.matches(ObjectClass::Person));
    }

    #[test]
    fn test_class_colors() {
        assert_eq!(ObjectClass::Person.color(), COLOR_PERSON);
        assert_eq!(ObjectClass::Car.color(), COLOR_CAR);
        assert_eq!(ObjectClass::Unknown.color(), COLOR_UNKNOWN);
    }
}
