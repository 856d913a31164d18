//! Text rendition of the ledger page.

use std::io::Write;

use chrono::Local;

use crate::format::{format_currency, format_date};
use crate::view_model::LedgerViewModel;
use crate::wallet::WalletSession;

pub fn render_page<W>(
    view_model: &LedgerViewModel,
    wallet: &WalletSession,
    w: &mut W,
) -> std::io::Result<()>
where
    W: Write,
{
    writeln!(w, "Web3 Ledger")?;
    if let Some(banner) = view_model.banner() {
        writeln!(w, "! {banner}")?;
    }
    writeln!(w)?;
    render_wallet(wallet, w)?;
    writeln!(w)?;
    render_members(view_model, w)?;
    writeln!(w)?;
    render_transactions(view_model, w)?;
    writeln!(w)?;
    render_summary(view_model, w)?;
    w.flush()
}

pub fn render_wallet<W: Write>(wallet: &WalletSession, w: &mut W) -> std::io::Result<()> {
    writeln!(w, "[{}]", wallet.button_label())?;
    writeln!(w, "Status: {}", wallet.get_status())?;
    writeln!(w, "Wallet: {}", wallet.account_label())?;
    writeln!(w, "Balance: {}", wallet.balance_label())
}

pub fn render_members<W: Write>(view_model: &LedgerViewModel, w: &mut W) -> std::io::Result<()> {
    writeln!(w, "Members")?;
    for member in view_model.members() {
        writeln!(w, "{}", member.name)?;
    }
    Ok(())
}

pub fn render_transactions<W: Write>(
    view_model: &LedgerViewModel,
    w: &mut W,
) -> std::io::Result<()> {
    writeln!(w, "Transactions")?;
    if let Some(notice) = view_model.notice() {
        writeln!(w, "({notice})")?;
    }
    for (row, t) in view_model.transactions().iter().enumerate() {
        writeln!(
            w,
            "{}. {} | {} | {} | {}",
            row + 1,
            t.description,
            format_date(&t.timestamp.with_timezone(&Local)),
            view_model.member_name(&t.member_id).unwrap_or(t.member_id.as_str()),
            format_currency(t.amount)
        )?;
    }
    Ok(())
}

pub fn render_summary<W: Write>(view_model: &LedgerViewModel, w: &mut W) -> std::io::Result<()> {
    let totals = view_model.totals();
    writeln!(w, "Summary")?;
    writeln!(w, "Total In: {}", format_currency(totals.total_in))?;
    writeln!(w, "Total Out: {}", format_currency(totals.total_out))?;
    writeln!(w, "Net: {}", format_currency(totals.net))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_model::STORE_UNAVAILABLE_BANNER;

    #[test]
    fn test_disabled_ledger_still_renders() {
        let view_model = LedgerViewModel::new(None);
        let mut output = Vec::new();

        render_page(&view_model, &WalletSession::default(), &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains(STORE_UNAVAILABLE_BANNER));
        assert!(output.contains("Status: Disconnected"));
        assert!(output.contains("Net: ₹0.00"));
    }
}
