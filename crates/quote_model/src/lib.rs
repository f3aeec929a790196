use serde::{Deserialize, Serialize};
use std::fmt;

/// One currency pair price snapshot as published by the quote provider.
///
/// Every value is kept as the provider's original string so it round-trips
/// byte-for-byte. Decoding requires all eleven fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub code: String,
    pub codein: String,
    pub name: String,
    pub high: String,
    pub low: String,
    #[serde(rename = "varBid")]
    pub var_bid: String,
    #[serde(rename = "pctChange")]
    pub pct_change: String,
    pub bid: String,
    pub ask: String,
    pub timestamp: String,
    pub create_date: String,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{} bid={} ask={} at {}",
            self.code, self.codein, self.bid, self.ask, self.create_date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USDBRL: &str = r#"{
        "code": "USD",
        "codein": "BRL",
        "name": "Dólar Americano/Real Brasileiro",
        "high": "5.1234",
        "low": "5.0010",
        "varBid": "-0.0150",
        "pctChange": "-0.29",
        "bid": "5.10",
        "ask": "5.12",
        "timestamp": "1718380800",
        "create_date": "2024-06-14 13:00:00"
    }"#;

    #[test]
    fn decode_keeps_strings_verbatim() {
        let quote: Quote = serde_json::from_str(USDBRL).unwrap();
        assert_eq!(quote.var_bid, "-0.0150");
        assert_eq!(quote.pct_change, "-0.29");
        assert_eq!(quote.bid, "5.10");
        assert_eq!(quote.create_date, "2024-06-14 13:00:00");
    }

    #[test]
    fn encode_uses_provider_field_names() {
        let quote: Quote = serde_json::from_str(USDBRL).unwrap();
        let value = serde_json::to_value(&quote).unwrap();
        assert_eq!(value["varBid"], "-0.0150");
        assert_eq!(value["pctChange"], "-0.29");
        assert_eq!(value["create_date"], "2024-06-14 13:00:00");
        assert!(value.get("var_bid").is_none());
        assert_eq!(value.as_object().unwrap().len(), 11);
    }

    #[test]
    fn decode_fails_on_missing_field() {
        let mut value: serde_json::Value = serde_json::from_str(USDBRL).unwrap();
        value.as_object_mut().unwrap().remove("ask");
        assert!(serde_json::from_value::<Quote>(value).is_err());
    }

    #[test]
    fn decode_rejects_numeric_values() {
        let json = USDBRL.replace(r#""5.10""#, "5.10");
        assert!(serde_json::from_str::<Quote>(&json).is_err());
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let json = USDBRL.replace(r#""code": "USD","#, r#""code": "USD", "extra": 1,"#);
        let quote: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(quote.code, "USD");
    }

    #[test]
    fn display_summary() {
        let quote: Quote = serde_json::from_str(USDBRL).unwrap();
        assert_eq!(
            quote.to_string(),
            "USD/BRL bid=5.10 ask=5.12 at 2024-06-14 13:00:00"
        );
    }
}
