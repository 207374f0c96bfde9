//! Quote types exchanged between the service and the requester.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, Result};
use crate::time::{now, Timestamp};

/// A single exchange-rate observation. Immutable once produced.
///
/// The bid is kept as the upstream's original string so the value served to
/// requesters and the value persisted are byte-identical; construction only
/// validates that it is a well-formed decimal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Quoted exchange rate, decimal-as-string.
    pub bid: String,
    /// When the quote was observed.
    pub observed_at: Timestamp,
}

impl Quote {
    /// Create a quote observed now. Fails with [`QuoteError::Decode`] if
    /// `bid` is not a decimal number.
    pub fn new(bid: impl Into<String>) -> Result<Self> {
        let bid = bid.into();
        Decimal::from_str(&bid)
            .map_err(|e| QuoteError::Decode(format!("bid {:?} is not a decimal: {}", bid, e)))?;

        Ok(Self {
            bid,
            observed_at: now(),
        })
    }

    /// The bid as a decimal value.
    pub fn bid_decimal(&self) -> Decimal {
        // Validated at construction.
        Decimal::from_str(&self.bid).unwrap_or_default()
    }
}

/// Wire body of a successful quote response: `{"bid": "<string>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteBody {
    /// Quoted exchange rate, decimal-as-string.
    pub bid: String,
}

impl From<Quote> for QuoteBody {
    fn from(quote: Quote) -> Self {
        Self { bid: quote.bid }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_keeps_bid_verbatim() {
        let quote = Quote::new("5.4320").unwrap();
        assert_eq!(quote.bid, "5.4320");
        assert_eq!(quote.bid_decimal(), dec!(5.4320));
    }

    #[test]
    fn test_quote_rejects_non_decimal_bid() {
        let err = Quote::new("not-a-number").unwrap_err();
        assert!(matches!(err, QuoteError::Decode(_)));
    }

    #[test]
    fn test_quote_body_round_trip() {
        let body = QuoteBody {
            bid: "5.43".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"bid":"5.43"}"#);

        let decoded: QuoteBody = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, body);
    }
}
