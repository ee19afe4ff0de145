use serde::Deserialize;

/// Entry of `GET /api/v3/exchangeInfo`; only the fields the symbol table needs
#[derive(Debug, Deserialize)]
pub struct BinanceMarket {
    pub symbol: String,
    #[serde(rename = "baseAsset")]
    pub base_asset: String,
    #[serde(rename = "quoteAsset")]
    pub quote_asset: String,
}

#[derive(Debug, Deserialize)]
pub struct BinanceExchangeInfo {
    pub symbols: Vec<BinanceMarket>,
}
