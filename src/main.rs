use anyhow::{anyhow, Context};
use tracing::error;

use member_ledger::configuration::get_configuration;
use member_ledger::render::render_page;
use member_ledger::run_script::run;
use member_ledger::store;
use member_ledger::view_model::LedgerViewModel;
use member_ledger::wallet::{StaticWallet, WalletProvider, WalletSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args();
    let file_name = args.nth(1).ok_or(anyhow!("Input script not provided"))?;
    let input = tokio::fs::File::open(&file_name)
        .await
        .context(format!("Can't open input script: `{}`", file_name))?;
    setup_tracing();

    let settings = get_configuration().context("Can't load configuration")?;
    let store = store::connect(&settings.store);
    if let Some(store) = &store {
        if let Err(e) = store.sign_in_anonymously().await {
            error!("Anonymous sign-in failed: {e}");
        }
    }
    let wallet_provider = settings
        .wallet
        .as_ref()
        .map(StaticWallet::from_settings)
        .transpose()
        .context("Invalid wallet settings")?;

    let mut view_model = LedgerViewModel::new(store);
    view_model.mount();
    view_model.apply_pending();

    let mut wallet = WalletSession::default();
    run(
        input,
        &mut view_model,
        &mut wallet,
        wallet_provider.as_ref().map(|p| p as &dyn WalletProvider),
    )
    .await;

    let mut output = std::io::stdout().lock();
    render_page(&view_model, &wallet, &mut output)?;
    view_model.unmount();
    Ok(())
}

fn setup_tracing() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "error")
    }
    tracing_subscriber::fmt::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
