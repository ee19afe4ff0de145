use exchange_apis::core::traits::SymbolCodec;
use exchange_apis::exchanges::{
    binance::BinanceCodec, bitfinex::BitfinexCodec, ftx::FtxCodec, kucoin::KucoinCodec,
    sfox::SfoxCodec,
};
use exchange_apis::SymbolPair;
use proptest::prelude::*;

fn currency() -> impl Strategy<Value = String> {
    "[A-Z0-9]{3,8}"
}

fn round_trip(codec: &dyn SymbolCodec, trade: &str, stake: &str) -> SymbolPair {
    let native = codec.encode(trade, stake).unwrap();
    codec.decode(&native).unwrap()
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(trade in currency(), stake in currency()) {
        let expected = SymbolPair::new(&trade, &stake).unwrap();

        let binance = BinanceCodec::new();
        let sfox = SfoxCodec::new();
        let codecs: [&dyn SymbolCodec; 5] = [&binance, &BitfinexCodec, &FtxCodec, &KucoinCodec, &sfox];

        for codec in codecs {
            prop_assert_eq!(round_trip(codec, &trade, &stake), expected.clone());
        }
    }

    #[test]
    fn prop_bitfinex_delimiter_only_for_long_sides(trade in currency(), stake in currency()) {
        let native = BitfinexCodec.encode(&trade, &stake).unwrap();
        prop_assert_eq!(native.contains(':'), trade.len() > 3 || stake.len() > 3);
    }

    #[test]
    fn prop_short_sides_are_rejected(side in "[A-Z0-9]{1,2}", other in currency()) {
        prop_assert!(BitfinexCodec.encode(&side, &other).is_err());
        prop_assert!(KucoinCodec.encode(&other, &side).is_err());
    }
}
