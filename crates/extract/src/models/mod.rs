mod card;
mod color;
mod id;

pub use self::card::{CardInfo, CardInfoBuilder, UNKNOWN, UNKNOWN_NUMBER, UNKNOWN_PRINTING};
pub use self::color::{Color, ColorIdentity};
pub use self::id::CardId;
