use std::fmt;

use serde::{Deserialize, Serialize};

/// Survey object identifier (e.g. `"ZTF21abcdefg"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub String);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Photometric band of a measurement.
///
/// The upstream wire format encodes bands as integer filter ids
/// (1 = g, 2 = r).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    G,
    R,
}

impl Band {
    /// Decode the upstream integer filter id. Unknown ids map to `None`.
    pub fn from_filter_id(fid: u8) -> Option<Self> {
        match fid {
            1 => Some(Self::G),
            2 => Some(Self::R),
            _ => None,
        }
    }

    pub fn filter_id(self) -> u8 {
        match self {
            Self::G => 1,
            Self::R => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::G => "g",
            Self::R => "r",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_filter_id_round_trip() {
        assert_eq!(Band::from_filter_id(1), Some(Band::G));
        assert_eq!(Band::from_filter_id(2), Some(Band::R));
        assert_eq!(Band::from_filter_id(3), None);
        assert_eq!(Band::G.filter_id(), 1);
        assert_eq!(Band::R.filter_id(), 2);
    }

    #[test]
    fn band_labels() {
        assert_eq!(Band::G.label(), "g");
        assert_eq!(Band::R.to_string(), "r");
    }

    #[test]
    fn object_id_display() {
        assert_eq!(ObjectId("ZTF21abcdefg".to_string()).to_string(), "ZTF21abcdefg");
    }
}
