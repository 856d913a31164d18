//! Cosmetic wallet connection: account and balance display only.

mod session;
mod static_wallet;

pub use session::*;
pub use static_wallet::StaticWallet;

use crate::domain::Decimal;

/// Placeholder, nothing is ever sent to it.
pub const CONTRACT_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
/// Placeholder, no contract calls are made.
pub const CONTRACT_ABI: &[&str] = &[];

const WEI_DECIMALS: u32 = 18;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WalletError {
    #[error("Wallet exposed no accounts")]
    NoAccounts,
    #[error("Account `{0}` is unknown to the wallet")]
    UnknownAccount(String),
    #[error("Balance of {0} wei can't be represented")]
    BalanceOverflow(u128),
    #[error("Invalid balance `{0}`")]
    InvalidBalance(String),
    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Injected wallet provider.
#[async_trait::async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

    /// Native balance in wei.
    async fn get_balance(&self, address: &str) -> Result<u128, WalletError>;
}

pub fn wei_to_ether(wei: u128) -> Result<Decimal, WalletError> {
    let mantissa = i128::try_from(wei).map_err(|_| WalletError::BalanceOverflow(wei))?;
    Decimal::try_from_i128_with_scale(mantissa, WEI_DECIMALS)
        .map(|ether| ether.normalize())
        .map_err(|_| WalletError::BalanceOverflow(wei))
}
