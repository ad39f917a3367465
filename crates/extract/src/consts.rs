//! Element ids and classes of the card details page.

macro_rules! element_id {
    ($name:ident, $suffix:literal) => {
        pub(crate) const $name: &str = concat!("ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_", $suffix);
    };
}

element_id!(NAME_ROW, "nameRow");
element_id!(MANA_ROW, "manaRow");
element_id!(TEXT_ROW, "textRow");
element_id!(FLAVOR_ROW, "FlavorText");
element_id!(TYPE_ROW, "typeRow");
element_id!(PT_ROW, "ptRow");
element_id!(SET_ROW, "setRow");
element_id!(RARITY_ROW, "rarityRow");
element_id!(NUMBER_ROW, "numberRow");
element_id!(ARTIST_ROW, "artistRow");
element_id!(CARD_IMAGE, "cardImage");
element_id!(OTHER_SETS, "otherSetsValue");

pub(crate) const VALUE_CLASS: &str = "value";
pub(crate) const FLAVOR_CLASS: &str = "flavortextbox";
/// Class on every mana-cost row (one per face on double-faced pages).
pub(crate) const MANA_ROW_CLASS: &str = "manaRow";
pub(crate) const TEXT_BOX_CLASS: &str = "cardtextbox";

/// Image `src` values are page-relative (`../../Handlers/Image.ashx?…`).
pub(crate) const IMAGE_RELATIVE_PREFIX: &str = "../..";
pub const DEFAULT_IMAGE_HOST: &str = "https://gatherer.wizards.com";

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_";

    #[test]
    fn test_ids_share_prefix() {
        for id in [NAME_ROW, MANA_ROW, OTHER_SETS, CARD_IMAGE] {
            assert!(id.starts_with(PREFIX));
        }
        assert_eq!(OTHER_SETS, "ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_otherSetsValue");
    }
}
