use serde::{Deserialize, Serialize};

/// A side of a debate. On ballots and in stored rounds the winning side is
/// written as `1` (affirmative) or `0` (negative).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(into = "u8", try_from = "u8")]
pub enum Side {
    Negative,
    Affirmative,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Affirmative => Side::Negative,
            Side::Negative => Side::Affirmative,
        }
    }
}

impl From<Side> for u8 {
    fn from(side: Side) -> u8 {
        match side {
            Side::Negative => 0,
            Side::Affirmative => 1,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Side::Negative),
            1 => Ok(Side::Affirmative),
            other => Err(format!("invalid win value {other}, expected 0 or 1")),
        }
    }
}

pub fn name_of_side(side: Side, short: bool) -> &'static str {
    match (side, short) {
        (Side::Affirmative, true) => "Aff",
        (Side::Affirmative, false) => "Affirmative",
        (Side::Negative, true) => "Neg",
        (Side::Negative, false) => "Negative",
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(name_of_side(*self, false))
    }
}

#[cfg(test)]
#[test]
fn test_win_values() {
    assert_eq!(serde_json::to_string(&Side::Affirmative).unwrap(), "1");
    assert_eq!(serde_json::from_str::<Side>("0").unwrap(), Side::Negative);
    assert!(serde_json::from_str::<Side>("2").is_err());
}
