use futures::StreamExt;

use super::{Action, ActionRecord, ActionRecordError};

pub async fn create_action_stream<R>(
    reader: R,
) -> impl futures::Stream<Item = Result<Action, ActionRecordError>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    csv_async::AsyncReaderBuilder::new()
        // trim whitespaces if we encounter them
        .trim(csv_async::Trim::All)
        // trailing columns are optional for most actions
        .flexible(true)
        .create_deserializer(reader)
        .into_deserialize::<ActionRecord>()
        .map(|r| match r {
            Ok(r) => r.try_into(),
            Err(e) => Err(e.into()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionType;

    #[tokio::test]
    async fn test_action_stream_works_with_whitespaces() {
        let test_data = "
            action, target, type, amount, description
            add_member,   Alice
            record, Alice, withdrawal, 25.5, Snacks
            delete, 1
            connect_wallet
        ";
        let mut action_stream = create_action_stream(test_data.as_bytes()).await;

        assert_eq!(
            action_stream.next().await.unwrap().unwrap(),
            Action::AddMember {
                name: "Alice".to_string()
            }
        );
        assert_eq!(
            action_stream.next().await.unwrap().unwrap(),
            Action::Record {
                member: "Alice".to_string(),
                kind: TransactionType::Withdrawal,
                amount: "25.5".to_string(),
                description: "Snacks".to_string(),
            }
        );
        assert_eq!(
            action_stream.next().await.unwrap().unwrap(),
            Action::Delete { row: 1 }
        );
        assert_eq!(
            action_stream.next().await.unwrap().unwrap(),
            Action::ConnectWallet
        );
    }

    #[tokio::test]
    async fn test_record_without_optional_columns_uses_form_defaults() {
        let test_data = "action,target,type,amount,description
record,Bob,,,";
        let mut action_stream = create_action_stream(test_data.as_bytes()).await;

        assert_eq!(
            action_stream.next().await.unwrap().unwrap(),
            Action::Record {
                member: "Bob".to_string(),
                kind: TransactionType::Deposit,
                amount: String::new(),
                description: String::new(),
            }
        );
    }

    #[tokio::test]
    async fn test_action_stream_returns_err_for_bad_rows_and_continues() {
        let test_data = "
            action, target, type, amount, description
            inexistent, 1
            delete
            delete, zero
            delete, 0
            record, Bob, chargeback, 1
            add_member, Carol
        ";
        let mut action_stream = create_action_stream(test_data.as_bytes()).await;

        assert!(action_stream.next().await.unwrap().is_err());
        assert!(matches!(
            action_stream.next().await.unwrap(),
            Err(ActionRecordError::MissingField("target"))
        ));
        assert!(matches!(
            action_stream.next().await.unwrap(),
            Err(ActionRecordError::InvalidRow(row)) if row == "zero"
        ));
        assert!(action_stream.next().await.unwrap().is_err());
        assert!(action_stream.next().await.unwrap().is_err());
        assert_eq!(
            action_stream.next().await.unwrap().unwrap(),
            Action::AddMember {
                name: "Carol".to_string()
            }
        );
    }
}
