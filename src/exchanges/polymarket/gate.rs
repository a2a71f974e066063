//! Submission gate - dry-run vs live resolution

use tracing::{info, warn};

use crate::core::config::parse_bool;
use crate::core::{ConfigSource, Error, Order, Result};

use super::ENV_DRY_RUN;

/// Trading mode for one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    DryRun,
    Live,
}

/// Resolve the mode from `POLYMARKET_DRY_RUN`. Unset, blank or
/// unparseable values keep dry-run on.
pub fn resolve_mode(config: &dyn ConfigSource) -> SubmitMode {
    let Some(raw) = config.get_trimmed(ENV_DRY_RUN) else {
        return SubmitMode::DryRun;
    };

    match parse_bool(&raw) {
        Some(false) => SubmitMode::Live,
        Some(true) => SubmitMode::DryRun,
        None => {
            warn!(key = ENV_DRY_RUN, value = %raw, "Unparseable boolean, keeping dry-run");
            SubmitMode::DryRun
        }
    }
}

/// Reject submissions that would need a real CLOB connection.
///
/// Credentials only change the message: live placement is refused either way.
pub fn admit(mode: SubmitMode, has_credentials: bool) -> Result<()> {
    match mode {
        SubmitMode::DryRun => Ok(()),
        // TODO: signed CLOB order placement (EIP-712 payload, token id from `local_symbol`)
        SubmitMode::Live => {
            let mut msg = format!(
                "real trading is not implemented yet; set {}=true to use dry-run",
                ENV_DRY_RUN
            );
            if has_credentials {
                msg.push_str(" (API credentials are configured but unused)");
            }
            Err(Error::Unsupported(msg))
        }
    }
}

/// Record an accepted dry-run order.
pub fn log_created(order: &Order) {
    info!(
        exchange = %order.exchange,
        order_id = order.order_id,
        symbol = %order.submit.symbol,
        side = %order.submit.side,
        price = %order.submit.price,
        quantity = %order.submit.quantity,
        tag = order.submit.tag.as_deref().unwrap_or(""),
        "polymarket(dry-run) order created: {}",
        order
    );
}
