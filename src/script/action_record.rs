use crate::domain::TransactionType;

#[derive(thiserror::Error, Debug)]
pub enum ActionRecordError {
    #[error("Missing `{0}` field")]
    MissingField(&'static str),
    #[error("Invalid row number `{0}`")]
    InvalidRow(String),
    #[error("csv error")]
    CsvError(#[from] csv_async::Error),
}

/// One row of a ledger script.
#[derive(serde::Deserialize, Debug)]
pub struct ActionRecord {
    action: ActionType,
    target: Option<String>,
    r#type: Option<TransactionType>,
    amount: Option<String>,
    description: Option<String>,
}

#[derive(serde::Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "snake_case")]
enum ActionType {
    AddMember,
    Record,
    Delete,
    ConnectWallet,
}

/// A user interaction with the ledger page.
#[derive(Debug, PartialEq, Clone)]
pub enum Action {
    AddMember {
        name: String,
    },
    /// `member` is the name picked from the member list.
    Record {
        member: String,
        kind: TransactionType,
        amount: String,
        description: String,
    },
    /// `row` is the 1-based position in the displayed transaction list.
    Delete {
        row: usize,
    },
    ConnectWallet,
}

impl TryFrom<ActionRecord> for Action {
    type Error = ActionRecordError;

    fn try_from(value: ActionRecord) -> Result<Self, Self::Error> {
        match value.action {
            // Blank names and amounts are left to the form guards.
            ActionType::AddMember => Ok(Self::AddMember {
                name: value.target.unwrap_or_default(),
            }),
            ActionType::Record => Ok(Self::Record {
                member: value.target.unwrap_or_default(),
                kind: value.r#type.unwrap_or_default(),
                amount: value.amount.unwrap_or_default(),
                description: value.description.unwrap_or_default(),
            }),
            ActionType::Delete => {
                let target = value.target.ok_or(ActionRecordError::MissingField("target"))?;
                match target.parse::<usize>() {
                    Ok(row) if row > 0 => Ok(Self::Delete { row }),
                    _ => Err(ActionRecordError::InvalidRow(target)),
                }
            }
            ActionType::ConnectWallet => Ok(Self::ConnectWallet),
        }
    }
}
