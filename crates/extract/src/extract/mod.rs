//! Card record extraction from a card details page.

mod rules;

use exn::OptionExt;
use tracing::instrument;

pub use self::rules::{Field, FieldRule, FieldValue};
use crate::consts;
use crate::document::{Document, Element, Predicate};
use crate::error::{Error, ErrorKind, Result};
use crate::models::{CardId, CardInfo, Color, ColorIdentity};
use crate::split::Step;

/// One field that could not be read, and why.
#[derive(Debug)]
pub struct FieldFailure {
    pub field: Field,
    pub error: Error,
}

/// Outcome of a best-effort whole-record extraction.
#[derive(Debug)]
pub struct Extracted {
    /// `None` when not a single field could be read.
    pub card: Option<CardInfo>,
    /// Every field left at its default, with the reason.
    pub failures: Vec<FieldFailure>,
}

#[derive(Debug)]
pub struct Extractor {
    document: Document,
    image_host: String,
}
impl Extractor {
    pub fn new(document: Document) -> Self {
        Self { document, image_host: consts::DEFAULT_IMAGE_HOST.to_string() }
    }

    pub fn from_html(html: &str) -> Self {
        Self::new(Document::parse(html))
    }

    /// Host prepended to page-relative image links.
    pub fn with_image_host(mut self, host: impl Into<String>) -> Self {
        self.image_host = host.into().trim_end_matches('/').to_string();
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn image_host(&self) -> &str {
        &self.image_host
    }

    /// Apply every rule in the field table. A failing rule leaves its field
    /// at the default and is reported in [`Extracted::failures`]; it never
    /// aborts the others.
    #[instrument(skip(self))]
    pub fn card(&self) -> Extracted {
        let mut builder = CardInfo::builder();
        let mut failures = Vec::new();
        for (field, rule) in rules::RULES.iter() {
            let outcome = rule.apply(self).and_then(|value| rules::store(&mut builder, *field, value));
            if let Err(error) = outcome {
                tracing::debug!(%field, %error, "Field unavailable; leaving default");
                failures.push(FieldFailure { field: *field, error });
            }
        }
        Extracted { card: builder.build(), failures }
    }

    /// The card name alone.
    pub fn name(&self) -> Result<String> {
        self.direct_text(consts::NAME_ROW, consts::VALUE_CLASS)
    }

    /// Colors named by mana symbols in every mana-cost row and rules-text
    /// box on the page.
    ///
    /// Fails only when the page has none of those regions at all; a page
    /// whose symbols are all generic mana yields an empty identity.
    #[instrument(level = "trace", skip(self))]
    pub fn color_identity(&self) -> Result<ColorIdentity> {
        let mut regions = self.document.find_all(Predicate::Class(consts::MANA_ROW_CLASS));
        regions.extend(self.document.find_all(Predicate::Class(consts::TEXT_BOX_CLASS)));
        if regions.is_empty() {
            exn::bail!(ErrorKind::MissingElement("mana rows or text boxes"));
        }
        Ok(regions
            .iter()
            .flat_map(|region| region.find_all(Predicate::Tag("img")))
            .filter_map(|img| img.attr("alt"))
            .flat_map(Color::scan_alt_text)
            .collect())
    }

    /// Identifiers linked from the "other printings" box.
    ///
    /// A link that has no address, or whose trailing `=` segment is not an
    /// identifier, is logged and skipped. Fails with
    /// [`MissingElement`](ErrorKind::MissingElement) when the box itself is
    /// missing (split and double-faced cards); the caller decides what that
    /// means.
    #[instrument(level = "trace", skip(self))]
    pub fn other_printings(&self) -> Result<Vec<CardId>> {
        let container = self
            .document
            .find(Predicate::Id(consts::OTHER_SETS))
            .ok_or_raise(|| ErrorKind::MissingElement("other printings"))?;
        let mut printings = Vec::new();
        for link in container.find_all(Predicate::Tag("a")) {
            match Self::printing_from_link(&link) {
                Ok(id) => printings.push(id),
                Err(error) => tracing::warn!(%error, href = link.attr("href"), "Skipping unparsable printing link"),
            }
        }
        Ok(printings)
    }

    fn printing_from_link(link: &Element<'_>) -> Result<CardId> {
        let href = link.attr("href").ok_or_raise(|| ErrorKind::MissingAttribute("href"))?;
        Step::new("=", -1).apply(href)?.parse()
    }

    pub(crate) fn direct_element(&self, container_id: &'static str, value_class: &str) -> Result<Element<'_>> {
        self.document
            .find(Predicate::Id(container_id))
            .ok_or_raise(|| ErrorKind::MissingElement(container_id))?
            .find(Predicate::Class(value_class))
            .ok_or_raise(|| ErrorKind::MissingElement(container_id))
    }

    pub(crate) fn direct_text(&self, container_id: &'static str, value_class: &str) -> Result<String> {
        Ok(self.direct_element(container_id, value_class)?.text().trim().to_string())
    }
}
impl From<Document> for Extractor {
    fn from(document: Document) -> Self {
        Self::new(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(suffix: &str, value: &str) -> String {
        format!(
            r#"<div id="ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_{suffix}" class="row">
                <div class="label">Label:</div><div class="value">{value}</div>
            </div>"#
        )
    }

    fn page(body: &str) -> Extractor {
        Extractor::from_html(&format!("<html><body>{body}</body></html>"))
    }

    fn full_page() -> Extractor {
        let body = [
            row("nameRow", " Kird Ape "),
            r#"<div id="ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_manaRow" class="row manaRow">
                <div class="value"><img src="r.gif" alt="Red"></div>
            </div>"#
                .to_string(),
            row("textRow", r#"<div class="cardtextbox">Kird Ape gets +1/+2 as long as you control a Forest.</div>"#),
            r#"<div id="ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_FlavorText" class="row">
                <div class="flavortextbox">It puts the "fight" in "fruit."</div>
            </div>"#
                .to_string(),
            row("typeRow", "Creature  — Ape"),
            row("ptRow", "1 / 1"),
            row("setRow", "Arabian Nights"),
            row("rarityRow", "Common"),
            row("numberRow", "45"),
            row("artistRow", "Ken Meyer, Jr."),
            r#"<img id="ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_cardImage"
                src="../../Handlers/Image.ashx?multiverseid=966&amp;type=card">"#
                .to_string(),
            r#"<div id="ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_otherSetsValue">
                <a href="Details.aspx?multiverseid=2268"><img alt="Fourth Edition"></a>
                <a href="Details.aspx?multiverseid=966"><img alt="Arabian Nights"></a>
            </div>"#
                .to_string(),
        ]
        .join("\n");
        page(&body)
    }

    #[test]
    fn test_full_record() {
        let extracted = full_page().card();
        assert!(extracted.failures.is_empty(), "{:?}", extracted.failures);
        let card = extracted.card.unwrap();
        assert_eq!(card.name(), "Kird Ape");
        assert_eq!(card.cost(), "{Red}");
        assert_eq!(card.text(), "Kird Ape gets +1/+2 as long as you control a Forest.");
        assert_eq!(card.flavor_text(), r#"It puts the "fight" in "fruit.""#);
        assert_eq!(card.types(), "Creature  — Ape");
        assert_eq!(card.power(), "1");
        assert_eq!(card.toughness(), "1");
        assert_eq!(card.printing(), "Arabian Nights");
        assert_eq!(card.rarity(), "Common");
        assert_eq!(card.number(), 45);
        assert_eq!(card.artist(), "Ken Meyer, Jr.");
        assert_eq!(card.image_link(), "https://gatherer.wizards.com/Handlers/Image.ashx?multiverseid=966&type=card");
        assert_eq!(card.color_identity().to_string(), "Red");
        assert_eq!(card.other_printings(), &[CardId(2268), CardId(966)]);
    }

    #[test]
    fn test_zero_fields_is_no_record() {
        let extracted = page("<p>Your search returned zero results.</p>").card();
        assert!(extracted.card.is_none());
        assert_eq!(extracted.failures.len(), rules::RULES.len());
    }

    #[test]
    fn test_name_only_record() {
        let extracted = page(&row("nameRow", "Fog")).card();
        let card = extracted.card.unwrap();
        assert_eq!(card.name(), "Fog");
        assert_eq!(card, {
            let mut expected = CardInfo::builder();
            expected.name("Fog");
            expected.build().unwrap()
        });
        assert_eq!(extracted.failures.len(), rules::RULES.len() - 1);
        assert!(extracted.failures.iter().all(|failure| failure.field != Field::Name));
    }

    #[test]
    fn test_custom_image_host() {
        let extractor = page(
            r#"<img id="ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_cardImage" src="../../img.png">"#,
        )
        .with_image_host("http://mirror.test/");
        assert_eq!(extractor.card().card.unwrap().image_link(), "http://mirror.test/img.png");
    }

    #[test]
    fn test_color_identity_accumulates_every_region() {
        let extractor = page(
            r#"<div class="manaRow"><img alt="Green"><img alt="Variable Colorless"></div>
               <div class="manaRow"><img alt="Blue"></div>
               <div class="cardtextbox"><img alt="Black"> <img alt="Tap"></div>"#,
        );
        let identity = extractor.color_identity().unwrap();
        assert_eq!(identity.to_string(), "Blue Black Green");
    }

    #[test]
    fn test_color_identity_generic_only_is_empty() {
        let extractor = page(r#"<div class="manaRow"><img alt="3"></div>"#);
        assert!(extractor.color_identity().unwrap().is_empty());
    }

    #[test]
    fn test_color_identity_without_regions_fails() {
        assert!(page("<p>nothing</p>").color_identity().is_err());
    }

    #[test]
    fn test_bad_printing_link_is_skipped() {
        let extractor = page(
            r#"<div id="ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_otherSetsValue">
                <a href="Details.aspx?multiverseid=1">one</a>
                <a>no address</a>
                <a href="Details.aspx?name=Bolt">not an id</a>
                <a href="Details.aspx?multiverseid=3">three</a>
            </div>"#,
        );
        assert_eq!(extractor.other_printings().unwrap(), vec![CardId(1), CardId(3)]);
    }

    #[test]
    fn test_missing_printings_container() {
        let err = page(&row("nameRow", "Fire // Ice")).other_printings().unwrap_err();
        assert_eq!(*err, ErrorKind::MissingElement("other printings"));
    }

    #[test]
    fn test_loyalty_row() {
        let card = page(&row("ptRow", "3")).card().card.unwrap();
        assert_eq!(card.power(), "3");
        assert_eq!(card.toughness(), "");
    }
}
