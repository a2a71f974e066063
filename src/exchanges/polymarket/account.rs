//! Account snapshot - balance injected through configuration

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

use crate::core::{Account, Balance, BalanceMap, ConfigSource};

use super::{ENV_BALANCE_USDC, SETTLEMENT_CURRENCY};

/// Build a fresh account view. Only USDC is reported, and only when
/// `POLYMARKET_BALANCE_USDC` holds a decimal.
pub fn snapshot(config: &dyn ConfigSource) -> Account {
    let mut account = Account::new();

    if let Some(raw) = config.get_trimmed(ENV_BALANCE_USDC) {
        match Decimal::from_str(&raw) {
            Ok(available) => {
                let balance = Balance {
                    currency: SETTLEMENT_CURRENCY.to_string(),
                    available,
                    locked: Decimal::ZERO,
                };
                account.update_balances(BalanceMap::from([(
                    SETTLEMENT_CURRENCY.to_string(),
                    balance,
                )]));
            }
            Err(e) => warn!(key = ENV_BALANCE_USDC, value = %raw, error = %e, "Ignoring balance"),
        }
    }

    account.has_fee_rate = true;
    account.maker_fee_rate = Decimal::ZERO;
    account.taker_fee_rate = Decimal::ZERO;
    account
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StaticConfig;

    #[test]
    fn test_no_balance_configured() {
        let account = snapshot(&StaticConfig::new());
        assert!(account.balances().is_empty());
        assert!(account.has_fee_rate);
        assert_eq!(account.maker_fee_rate, Decimal::ZERO);
        assert_eq!(account.taker_fee_rate, Decimal::ZERO);
    }

    #[test]
    fn test_balance_parsed() {
        let cfg = StaticConfig::new().with(ENV_BALANCE_USDC, " 1234.56 ");
        let account = snapshot(&cfg);
        let usdc = account.balance("USDC").unwrap();
        assert_eq!(usdc.available, Decimal::new(123456, 2));
        assert_eq!(usdc.total(), usdc.available);
    }

    #[test]
    fn test_bad_balance_ignored() {
        let cfg = StaticConfig::new().with(ENV_BALANCE_USDC, "lots");
        assert!(snapshot(&cfg).balances().is_empty());
    }
}
