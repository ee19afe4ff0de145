use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Row of `GET /v1/account/transactions`
#[derive(Debug, Deserialize)]
pub struct SfoxTransaction {
    pub id: Value,
    #[serde(default)]
    pub client_order_id: Option<String>,
    /// ISO 8601 timestamp of the transaction
    pub day: String,
    /// `Buy`, `Sell`, `Deposit`, `Withdraw`, ...
    pub action: String,
    pub currency: String,
    #[serde(deserialize_with = "decimal_from_any")]
    pub amount: Decimal,
    #[serde(deserialize_with = "decimal_from_any")]
    pub price: Decimal,
    #[serde(deserialize_with = "decimal_from_any")]
    pub fees: Decimal,
}

/// Amounts arrive as JSON numbers or numeric strings depending on the endpoint version
fn decimal_from_any<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Null => return Ok(Decimal::ZERO),
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a decimal, got {}",
                other
            )))
        }
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(serde::de::Error::custom)
}
