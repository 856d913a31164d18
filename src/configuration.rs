use config::Config;
use serde::Deserialize;

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Settings {
    #[serde(default)]
    pub store: StoreSettings,
    pub wallet: Option<WalletSettings>,
}

/// Connection parameters of the document store.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct StoreSettings {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    pub measurement_id: Option<String>,
}

impl StoreSettings {
    pub fn get_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Account exposed by the console's stand-in wallet provider.
#[derive(Deserialize, Debug, Clone)]
pub struct WalletSettings {
    pub address: String,
    /// Decimal string, wei don't fit the integer types config can carry.
    pub balance_wei: Option<String>,
}

/// Reads `ledger.toml` (optional) and `LEDGER_*` environment variables,
/// e.g. `LEDGER_STORE__API_KEY`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = Config::builder()
        .add_source(config::File::with_name("ledger").required(false))
        .add_source(
            config::Environment::with_prefix("LEDGER")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}
