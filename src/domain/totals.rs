use tracing::warn;

use super::{Decimal, Transaction};

/// Aggregates derived from the full transaction list. Never persisted.
#[derive(Default, Debug, PartialEq, Clone, Copy)]
pub struct Totals {
    pub total_in: Decimal,
    pub total_out: Decimal,
    pub net: Decimal,
}

impl Totals {
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let (total_in, total_out) = transactions.into_iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(total_in, total_out), t| {
                if t.amount > Decimal::ZERO {
                    (saturating_sum(total_in, t.amount, &t.id), total_out)
                } else {
                    (total_in, saturating_sum(total_out, t.amount.abs(), &t.id))
                }
            },
        );
        // Both sides are within 0..=MAX, the difference can't overflow.
        Self {
            total_in,
            total_out,
            net: total_in - total_out,
        }
    }
}

/// Sums stop at `Decimal::MAX` instead of overflowing.
fn saturating_sum(total: Decimal, amount: Decimal, id: &str) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        warn!(transaction = id, "Total overflowed, capped at the largest amount");
        Decimal::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionType;
    use chrono::Utc;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn transaction(amount: Decimal) -> Transaction {
        let kind = if amount < Decimal::ZERO {
            TransactionType::Withdrawal
        } else {
            TransactionType::Deposit
        };
        Transaction {
            id: "tx".to_string(),
            member_id: "m".to_string(),
            kind,
            amount,
            description: kind.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_empty_list_has_zero_totals() {
        assert_eq!(Totals::from_transactions(&[]), Totals::default());
    }

    #[test]
    fn test_one_deposit_and_one_withdrawal_cancel_out() {
        let transactions = [transaction(dec!(100)), transaction(dec!(-100))];
        let totals = Totals::from_transactions(&transactions);
        assert_eq!(
            totals,
            Totals {
                total_in: dec!(100),
                total_out: dec!(100),
                net: dec!(0),
            }
        );
    }

    #[test]
    fn test_totals_partition_by_sign() {
        let transactions = [
            transaction(dec!(10.50)),
            transaction(dec!(-2.25)),
            transaction(dec!(0)),
            transaction(dec!(4)),
            transaction(dec!(-20)),
        ];
        let totals = Totals::from_transactions(&transactions);
        assert_eq!(totals.total_in, dec!(14.50));
        assert_eq!(totals.total_out, dec!(22.25));
        assert_eq!(totals.net, dec!(-7.75));
    }

    #[test]
    fn test_two_largest_deposits_cap_total_instead_of_overflowing() {
        let transactions = [
            transaction(Decimal::MAX),
            transaction(Decimal::MAX),
            transaction(Decimal::MIN),
            transaction(Decimal::MIN),
        ];
        let totals = Totals::from_transactions(&transactions);
        assert_eq!(totals.total_in, Decimal::MAX);
        assert_eq!(totals.total_out, Decimal::MAX);
        assert_eq!(totals.net, Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn test_net_is_total_in_minus_total_out(cents in proptest::collection::vec(-1_000_000_000i64..1_000_000_000, 0..64)) {
            let transactions: Vec<_> = cents.iter().map(|c| transaction(Decimal::new(*c, 2))).collect();
            let totals = Totals::from_transactions(&transactions);
            prop_assert_eq!(totals.total_in - totals.total_out, totals.net);
            prop_assert!(totals.total_in >= Decimal::ZERO);
            prop_assert!(totals.total_out >= Decimal::ZERO);
        }
    }
}
