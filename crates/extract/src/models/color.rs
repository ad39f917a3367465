use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// A color symbol as the card page spells it in mana-symbol alt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}
impl Color {
    pub const ALL: [Color; 6] = [Self::White, Self::Blue, Self::Black, Self::Red, Self::Green, Self::Colorless];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Blue => "Blue",
            Self::Black => "Black",
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Colorless => "Colorless",
        }
    }

    /// Every color named anywhere in a mana symbol's alt text.
    ///
    /// "Variable Colorless" (the X symbol) is not a color commitment and is
    /// removed before matching, so `"Variable Colorless"` yields nothing
    /// while hybrid symbols such as `"Red or White"` yield both.
    pub fn scan_alt_text(alt: &str) -> impl Iterator<Item = Color> {
        let alt = alt.replace("Variable Colorless", "");
        Self::ALL.into_iter().filter(move |color| alt.contains(color.as_str()))
    }
}
impl FromStr for Color {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::ALL.into_iter().find(|color| color.as_str().eq_ignore_ascii_case(s.trim())) {
            Some(color) => Ok(color),
            None => exn::bail!(ErrorKind::ParseError { field: "color", value: s.to_string() }),
        }
    }
}
impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Set of colors, kept in the canonical White-Blue-Black-Red-Green order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct ColorIdentity(BTreeSet<Color>);
impl ColorIdentity {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl FromIterator<Color> for ColorIdentity {
    fn from_iter<T: IntoIterator<Item = Color>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
impl Display for ColorIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let names: Vec<&str> = self.0.iter().map(Color::as_str).collect();
        f.write_str(&names.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Green", vec![Color::Green])]
    #[case("Red or White", vec![Color::White, Color::Red])]
    #[case("Variable Colorless", vec![])]
    #[case("Colorless", vec![Color::Colorless])]
    #[case("Phyrexian Blue", vec![Color::Blue])]
    #[case("Tap", vec![])]
    fn test_scan_alt_text(#[case] alt: &str, #[case] expected: Vec<Color>) {
        assert_eq!(Color::scan_alt_text(alt).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_identity_display_is_canonical_order() {
        let identity: ColorIdentity = [Color::Green, Color::White, Color::Black].into_iter().collect();
        assert_eq!(identity.to_string(), "White Black Green");
    }

    #[test]
    fn test_parse_color() {
        assert_eq!("blue".parse::<Color>().unwrap(), Color::Blue);
        assert!("Purple".parse::<Color>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_identity_serializes_as_list() {
        let identity: ColorIdentity = [Color::Red, Color::White].into_iter().collect();
        assert_eq!(serde_json::to_string(&identity).unwrap(), r#"["White","Red"]"#);
    }
}
