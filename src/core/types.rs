use crate::core::errors::ExchangeError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// HTTP verbs accepted by the adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "DELETE" => Ok(Self::Delete),
            other => Err(ExchangeError::InvalidParameters(format!(
                "Unsupported HTTP method: {}",
                other
            ))),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// Ordered query parameters. Repeated keys encode list values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Add a list value as one `key=value` pair per element.
    #[must_use]
    pub fn with_list<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        for value in values {
            self.push(key, value);
        }
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Request body: structured JSON or bytes that are sent untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Json(Value),
    Raw(Vec<u8>),
}

impl Body {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Json(_) => false,
            Self::Raw(bytes) => bytes.is_empty(),
        }
    }

    /// Compact JSON for structured bodies; raw bodies pass through unchanged.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ExchangeError> {
        match self {
            Self::Empty => Ok(Vec::new()),
            Self::Json(value) => serde_json::to_vec(value).map_err(|e| {
                ExchangeError::InvalidParameters(format!("Failed to serialize request body: {}", e))
            }),
            Self::Raw(bytes) => Ok(bytes.clone()),
        }
    }

    /// The body as a JSON object, treating an empty body as `{}`.
    pub fn to_object(&self) -> Result<serde_json::Map<String, Value>, ExchangeError> {
        let value = match self {
            Self::Empty => return Ok(serde_json::Map::new()),
            Self::Json(value) => value.clone(),
            Self::Raw(bytes) => serde_json::from_slice(bytes).map_err(|e| {
                ExchangeError::InvalidParameters(format!("Raw body is not JSON: {}", e))
            })?,
        };

        match value {
            Value::Object(map) => Ok(map),
            other => Err(ExchangeError::InvalidParameters(format!(
                "Expected a JSON object body, got {}",
                other
            ))),
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Raw(bytes)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Raw(text.as_bytes().to_vec())
    }
}

/// A generic call against one exchange: version, endpoint and optional signing.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessRequest {
    pub api_version: u32,
    pub endpoint: String,
    pub authenticate: bool,
    pub method: HttpMethod,
    pub params: Params,
    pub body: Body,
}

impl BusinessRequest {
    pub fn new(api_version: u32, endpoint: impl Into<String>) -> Self {
        Self {
            api_version,
            endpoint: endpoint.into(),
            authenticate: false,
            method: HttpMethod::Get,
            params: Params::new(),
            body: Body::Empty,
        }
    }

    pub fn get(api_version: u32, endpoint: impl Into<String>) -> Self {
        Self::new(api_version, endpoint)
    }

    pub fn post(api_version: u32, endpoint: impl Into<String>) -> Self {
        Self::new(api_version, endpoint).method(HttpMethod::Post)
    }

    pub fn delete(api_version: u32, endpoint: impl Into<String>) -> Self {
        Self::new(api_version, endpoint).method(HttpMethod::Delete)
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn authenticated(mut self) -> Self {
        self.authenticate = true;
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }
}

/// Canonical `TRADE/STAKE` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolPair {
    pub trade: String,
    pub stake: String,
}

impl SymbolPair {
    /// Both sides must be uppercase alphanumeric with at least 3 characters.
    pub fn new(trade: &str, stake: &str) -> Result<Self, ExchangeError> {
        if !is_currency_token(trade) || !is_currency_token(stake) {
            return Err(ExchangeError::InvalidSymbolFormat(format!(
                "Format of symbol should be $trade_currency/$stake_currency: {}/{}",
                trade, stake
            )));
        }
        Ok(Self {
            trade: trade.to_string(),
            stake: stake.to_string(),
        })
    }
}

pub(crate) fn is_currency_token(token: &str) -> bool {
    token.len() >= 3
        && token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

impl FromStr for SymbolPair {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (trade, stake) = s.split_once('/').ok_or_else(|| {
            ExchangeError::InvalidSymbolFormat(format!("Missing '/' in pair: {}", s))
        })?;
        Self::new(trade, stake)
    }
}

impl fmt::Display for SymbolPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.trade, self.stake)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

/// One executed trade in the normalized cross-exchange history format.
/// Deposits and withdrawals are never represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub exchange_txn_id: String,
    pub client_order_id: Option<String>,
    pub time: DateTime<Utc>,
    pub action: TradeAction,
    pub stake_curr: String,
    pub trade_curr: String,
    pub amount: Decimal,
    /// Price per unit of `trade_curr`
    pub price: Decimal,
    /// Always denominated in `stake_curr`
    pub fees: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_parsing() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!(matches!(
            "PATCH".parse::<HttpMethod>(),
            Err(ExchangeError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_json_body_is_compact() {
        let body = Body::Json(json!({"offer_id": 124124, "note": "a b"}));
        assert_eq!(
            body.to_bytes().unwrap(),
            br#"{"offer_id":124124,"note":"a b"}"#.to_vec()
        );
    }

    #[test]
    fn test_raw_body_passes_through() {
        let body = Body::from(r#"{ "spaced" : true }"#);
        assert_eq!(body.to_bytes().unwrap(), br#"{ "spaced" : true }"#.to_vec());
    }

    #[test]
    fn test_pair_validation() {
        let pair: SymbolPair = "ETH/USDT".parse().unwrap();
        assert_eq!(pair.trade, "ETH");
        assert_eq!(pair.to_string(), "ETH/USDT");

        assert!("ET/USDT".parse::<SymbolPair>().is_err());
        assert!("eth/USDT".parse::<SymbolPair>().is_err());
        assert!("ETHUSDT".parse::<SymbolPair>().is_err());
    }

    #[test]
    fn test_params_keep_order_and_lists() {
        let params = Params::new()
            .with("b", "2")
            .with_list("symbols", ["BTC-PERP", "ETH-PERP"])
            .with("a", "1");
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "symbols", "symbols", "a"]);
        assert_eq!(params.get("symbols"), Some("BTC-PERP"));
    }

    #[test]
    fn test_trade_record_serializes_time_as_rfc3339() {
        let record = TradeRecord {
            exchange_txn_id: "1".to_string(),
            client_order_id: None,
            time: DateTime::parse_from_rfc3339("2021-03-24T18:37:32Z")
                .unwrap()
                .with_timezone(&Utc),
            action: TradeAction::Sell,
            stake_curr: "USD".to_string(),
            trade_curr: "BTC".to_string(),
            amount: Decimal::new(5, 1),
            price: Decimal::new(52000, 0),
            fees: Decimal::new(13, 0),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["time"], "2021-03-24T18:37:32Z");
        assert_eq!(value["action"], "sell");
        assert_eq!(serde_json::from_value::<TradeRecord>(value).unwrap(), record);
    }
}
