use std::fmt;

use tracing::{error, info, warn};

use super::{wei_to_ether, WalletError, WalletProvider};
use crate::domain::Decimal;
use crate::format::{format_ether, truncate_address};

pub const INSTALL_WALLET_NOTICE: &str = "Install MetaMask first.";

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum WalletStatus {
    #[default]
    Disconnected,
    Connected,
    Error,
}

impl fmt::Display for WalletStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WalletStatus::Disconnected => "Disconnected",
            WalletStatus::Connected => "Connected",
            WalletStatus::Error => "Error",
        })
    }
}

/// What the wallet widget shows. Read-only, nothing is ever signed.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct WalletSession {
    status: WalletStatus,
    account: Option<String>,
    balance: Option<Decimal>,
}

impl WalletSession {
    /// Returns a notice for the user when no provider is installed.
    pub async fn connect(&mut self, provider: Option<&dyn WalletProvider>) -> Option<&'static str> {
        let Some(provider) = provider else {
            warn!("No wallet provider available");
            return Some(INSTALL_WALLET_NOTICE);
        };

        match self.fetch(provider).await {
            Ok(()) => {
                self.status = WalletStatus::Connected;
                info!(account = ?self.account, "Wallet connected");
            }
            Err(e) => {
                error!("Wallet connection failed: {e}");
                self.status = WalletStatus::Error;
            }
        }
        None
    }

    // The account is kept even if reading its balance fails afterwards.
    async fn fetch(&mut self, provider: &dyn WalletProvider) -> Result<(), WalletError> {
        let accounts = provider.request_accounts().await?;
        let account = accounts.into_iter().next().ok_or(WalletError::NoAccounts)?;
        self.account = Some(account.clone());
        let wei = provider.get_balance(&account).await?;
        self.balance = Some(wei_to_ether(wei)?);
        Ok(())
    }

    pub fn get_status(&self) -> WalletStatus {
        self.status
    }
    pub fn get_account(&self) -> Option<&str> {
        self.account.as_deref()
    }
    pub fn get_balance(&self) -> Option<Decimal> {
        self.balance
    }

    pub fn button_label(&self) -> &'static str {
        if self.account.is_some() {
            "Connected"
        } else {
            "Connect MetaMask"
        }
    }

    pub fn account_label(&self) -> String {
        self.account
            .as_deref()
            .map_or_else(|| "N/A".to_string(), truncate_address)
    }

    pub fn balance_label(&self) -> String {
        self.balance.map_or_else(|| "—".to_string(), format_ether)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::StaticWallet;
    use rust_decimal_macros::dec;

    const ADDRESS: &str = "0x1234567890abcdef1234567890abcdef12345678";

    struct BrokenBalance;

    #[async_trait::async_trait]
    impl WalletProvider for BrokenBalance {
        async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
            Ok(vec![ADDRESS.to_string()])
        }
        async fn get_balance(&self, _address: &str) -> Result<u128, WalletError> {
            Err(WalletError::ProviderError("rpc down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_connect_reads_first_account_and_balance() {
        let wallet = StaticWallet::new(ADDRESS, 2_000_000_000_000_000_000);
        let mut session = WalletSession::default();

        let notice = session.connect(Some(&wallet)).await;

        assert_eq!(notice, None);
        assert_eq!(session.get_status(), WalletStatus::Connected);
        assert_eq!(session.get_account(), Some(ADDRESS));
        assert_eq!(session.get_balance(), Some(dec!(2)));
        assert_eq!(session.account_label(), "0x1234...5678");
        assert_eq!(session.balance_label(), "2.0000 ETH");
        assert_eq!(session.button_label(), "Connected");
    }

    #[tokio::test]
    async fn test_connect_without_provider_returns_notice() {
        let mut session = WalletSession::default();

        let notice = session.connect(None).await;

        assert_eq!(notice, Some(INSTALL_WALLET_NOTICE));
        assert_eq!(session, WalletSession::default());
        assert_eq!(session.account_label(), "N/A");
        assert_eq!(session.balance_label(), "—");
        assert_eq!(session.button_label(), "Connect MetaMask");
    }

    #[tokio::test]
    async fn test_connect_failure_sets_error_status() {
        let mut session = WalletSession::default();

        session.connect(Some(&StaticWallet::default())).await;

        assert_eq!(session.get_status(), WalletStatus::Error);
        assert_eq!(session.get_account(), None);
    }

    #[tokio::test]
    async fn test_balance_failure_keeps_account() {
        let mut session = WalletSession::default();

        session.connect(Some(&BrokenBalance)).await;

        assert_eq!(session.get_status(), WalletStatus::Error);
        assert_eq!(session.get_account(), Some(ADDRESS));
        assert_eq!(session.get_balance(), None);
        assert_eq!(session.get_status().to_string(), "Error");
    }
}
