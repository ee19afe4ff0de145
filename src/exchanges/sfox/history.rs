use crate::core::errors::ExchangeError;
use crate::core::types::{TradeAction, TradeRecord};
use crate::exchanges::sfox::types::SfoxTransaction;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Every SFOX trade settles in dollars
pub const STAKE_CURRENCY: &str = "USD";

fn action(raw: &str) -> Option<TradeAction> {
    match raw {
        "Buy" => Some(TradeAction::Buy),
        "Sell" => Some(TradeAction::Sell),
        _ => None,
    }
}

fn parse_time(day: &str) -> Result<DateTime<Utc>, ExchangeError> {
    DateTime::parse_from_rfc3339(day)
        .map(|time| time.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(day, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
        })
        .map_err(|e| ExchangeError::InvalidParameters(format!("Bad transaction time {}: {}", day, e)))
}

fn id_text(id: &Value) -> String {
    match id {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Executed trades out of the transaction ledger; deposits, withdrawals and
/// other ledger rows are skipped.
pub fn parse_transactions(value: &Value) -> Result<Vec<TradeRecord>, ExchangeError> {
    let rows: Vec<SfoxTransaction> = serde_json::from_value(value.clone()).map_err(|e| {
        ExchangeError::InvalidParameters(format!("Unexpected transactions format: {}", e))
    })?;

    rows.into_iter()
        .filter_map(|row| action(&row.action).map(|action| (action, row)))
        .map(|(action, row)| {
            Ok(TradeRecord {
                exchange_txn_id: id_text(&row.id),
                client_order_id: row.client_order_id.filter(|id| !id.is_empty()),
                time: parse_time(&row.day)?,
                action,
                stake_curr: STAKE_CURRENCY.to_string(),
                trade_curr: row.currency.to_uppercase(),
                amount: row.amount,
                price: row.price,
                fees: row.fees,
            })
        })
        .collect()
}
