use futures::StreamExt;
use tracing::warn;

use crate::domain::TransactionForm;
use crate::script::{create_action_stream, Action};
use crate::view_model::{LedgerError, LedgerViewModel};
use crate::wallet::{WalletProvider, WalletSession};

/// Plays a script of page interactions against a mounted view-model.
/// Failing actions are logged and skipped, the page keeps going.
pub async fn run<R>(
    reader: R,
    view_model: &mut LedgerViewModel,
    wallet: &mut WalletSession,
    wallet_provider: Option<&dyn WalletProvider>,
) where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    let mut action_stream = create_action_stream(reader).await;
    let mut line = 0usize;

    while let Some(action_result) = action_stream.next().await {
        line += 1;
        match action_result {
            Ok(action) => {
                if let Err(e) = perform(action, view_model, wallet, wallet_provider).await {
                    warn!(line, "Error processing action: {e}");
                }
                // Store pushes land before the next action reads the lists.
                view_model.apply_pending();
            }
            Err(e) => warn!(line, ?e, "Error in action stream"),
        }
    }
}

async fn perform(
    action: Action,
    view_model: &mut LedgerViewModel,
    wallet: &mut WalletSession,
    wallet_provider: Option<&dyn WalletProvider>,
) -> Result<(), LedgerError> {
    match action {
        Action::AddMember { name } => {
            view_model.add_member(&name).await?;
        }
        Action::Record {
            member,
            kind,
            amount,
            description,
        } => {
            let member_id = view_model
                .member_id_by_name(&member)
                .unwrap_or_default()
                .to_string();
            let form = TransactionForm::new(member_id, kind, amount).with_description(description);
            view_model.record_transaction(&form).await?;
        }
        Action::Delete { row } => match view_model.transactions().get(row - 1) {
            Some(transaction) => {
                let id = transaction.id.clone();
                view_model.delete_transaction(&id).await?;
            }
            None => warn!(row, "No transaction at that row"),
        },
        Action::ConnectWallet => {
            if let Some(notice) = wallet.connect(wallet_provider).await {
                warn!("{notice}");
            }
        }
    }
    Ok(())
}
