use std::collections::HashMap;

use super::{WalletError, WalletProvider};
use crate::configuration::WalletSettings;

/// Provider with a fixed set of accounts and balances.
#[derive(Debug, Default, Clone)]
pub struct StaticWallet {
    accounts: Vec<String>,
    balances: HashMap<String, u128>,
}

impl StaticWallet {
    pub fn new(address: impl Into<String>, balance_wei: u128) -> Self {
        let address = address.into();
        Self {
            accounts: vec![address.clone()],
            balances: HashMap::from([(address, balance_wei)]),
        }
    }

    pub fn from_settings(settings: &WalletSettings) -> Result<Self, WalletError> {
        let balance = match settings.balance_wei.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw
                .parse::<u128>()
                .map_err(|_| WalletError::InvalidBalance(raw.to_string()))?,
        };
        Ok(Self::new(settings.address.trim(), balance))
    }
}

#[async_trait::async_trait]
impl WalletProvider for StaticWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        if self.accounts.is_empty() {
            return Err(WalletError::NoAccounts);
        }
        Ok(self.accounts.clone())
    }

    async fn get_balance(&self, address: &str) -> Result<u128, WalletError> {
        self.balances
            .get(address)
            .copied()
            .ok_or_else(|| WalletError::UnknownAccount(address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings_parses_balance() {
        let wallet = StaticWallet::from_settings(&WalletSettings {
            address: "0xabc".to_string(),
            balance_wei: Some(" 42 ".to_string()),
        })
        .unwrap();
        assert_eq!(wallet.balances.get("0xabc"), Some(&42));
    }

    #[test]
    fn test_from_settings_rejects_bad_balance() {
        let result = StaticWallet::from_settings(&WalletSettings {
            address: "0xabc".to_string(),
            balance_wei: Some("lots".to_string()),
        });
        assert_eq!(
            result.unwrap_err(),
            WalletError::InvalidBalance("lots".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_wallet_has_no_accounts() {
        let wallet = StaticWallet::default();
        assert_eq!(
            wallet.request_accounts().await,
            Err(WalletError::NoAccounts)
        );
    }
}
