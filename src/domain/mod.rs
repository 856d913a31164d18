mod member;
mod totals;
mod transaction;

pub use member::*;
pub use totals::Totals;
pub use transaction::*;

pub use rust_decimal::Decimal;

/// Store-assigned, opaque.
pub type MemberId = String;
/// Store-assigned, opaque.
pub type TransactionId = String;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FormError {
    #[error("Member name is blank")]
    BlankName,
    #[error("No member selected")]
    MissingMember,
    #[error("Missing amount")]
    MissingAmount,
    #[error("Amount `{0}` is not a number")]
    InvalidAmount(String),
}
