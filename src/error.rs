//! Binary Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("configuration error")]
    Config,
    #[display("cannot set up the card source")]
    Source,
    #[display("card lookup failed")]
    Lookup,
    #[display("cannot process file")]
    File,
}
