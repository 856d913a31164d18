use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::{Decimal, FormError, MemberId, TransactionId};

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Deposit,
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
        }
    }

    /// Applies the type's sign to `amount`, ignoring whatever sign it was typed with.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        if amount.is_zero() {
            return Decimal::ZERO;
        }
        match self {
            TransactionType::Deposit => amount.abs(),
            TransactionType::Withdrawal => -amount.abs(),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction as delivered by the store.
#[derive(serde::Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub member_id: MemberId,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Fields written when a transaction is recorded. `timestamp` is filled in by the store.
#[derive(serde::Serialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    member_id: MemberId,
    #[serde(rename = "type")]
    kind: TransactionType,
    amount: Decimal,
    description: String,
}

impl NewTransaction {
    pub fn get_member_id(&self) -> &str {
        &self.member_id
    }
    pub fn get_kind(&self) -> TransactionType {
        self.kind
    }
    pub fn get_amount(&self) -> Decimal {
        self.amount
    }
    pub fn get_description(&self) -> &str {
        &self.description
    }
}

/// Raw input of the "Record Transaction" form.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct TransactionForm {
    pub member_id: MemberId,
    pub kind: TransactionType,
    pub amount: String,
    pub description: String,
}

impl TransactionForm {
    pub fn new(member_id: impl Into<MemberId>, kind: TransactionType, amount: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            kind,
            amount: amount.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validate(&self) -> Result<NewTransaction, FormError> {
        if self.member_id.is_empty() {
            return Err(FormError::MissingMember);
        }
        let raw = self.amount.trim();
        if raw.is_empty() {
            return Err(FormError::MissingAmount);
        }
        let amount = Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .map_err(|_| FormError::InvalidAmount(raw.to_string()))?;

        let description = if self.description.trim().is_empty() {
            self.kind.to_string()
        } else {
            self.description.clone()
        };

        Ok(NewTransaction {
            member_id: self.member_id.clone(),
            kind: self.kind,
            amount: self.kind.signed(amount),
            description,
        })
    }
}
