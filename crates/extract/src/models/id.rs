use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// Remote identifier of one specific printing of a card (a multiverse id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct CardId(pub u64);
impl CardId {
    pub fn get(&self) -> u64 {
        self.0
    }
}
impl FromStr for CardId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u64>() {
            Ok(id) => Ok(Self(id)),
            Err(_) => exn::bail!(ErrorKind::ParseError { field: "card id", value: s.to_string() }),
        }
    }
}
impl From<u64> for CardId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("3921", 3921)]
    #[case(" 42\n", 42)]
    #[case("0", 0)]
    fn test_parse(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(input.parse::<CardId>().unwrap(), CardId(expected));
    }

    #[rstest]
    #[case("")]
    #[case("-1")]
    #[case("12a")]
    #[case("Details.aspx?name")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(input.parse::<CardId>().is_err());
    }

    #[test]
    fn test_orders_numerically() {
        let mut ids = vec![CardId(100), CardId(9), CardId(20)];
        ids.sort();
        assert_eq!(ids, vec![CardId(9), CardId(20), CardId(100)]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serializes_as_bare_number() {
        assert_eq!(serde_json::to_string(&CardId(966)).unwrap(), "966");
        assert_eq!(serde_json::from_str::<CardId>("2268").unwrap(), CardId(2268));
    }
}
