//! Quote service client.

use tracing::debug;

use cambio_common::{Budget, QuoteBody, QuoteError, Result};

/// Decode the bid from a quote service response body.
///
/// Pure: the same body always yields the same bid.
pub fn decode_body(body: &[u8]) -> Result<String> {
    let body: QuoteBody = serde_json::from_slice(body)
        .map_err(|e| QuoteError::Decode(format!("unexpected service body: {}", e)))?;
    Ok(body.bid)
}

/// Fetch the current bid from the quote service.
///
/// The whole round trip (send, await response, read body) runs under
/// `budget`; once the deadline passes the request is aborted and the call
/// fails with a deadline error.
pub async fn fetch_bid(client: &reqwest::Client, url: &str, budget: &Budget) -> Result<String> {
    let body = budget
        .enforce("quote service round trip", async {
            let response = client.get(url).send().await.map_err(classify)?;

            let status = response.status();
            if !status.is_success() {
                return Err(QuoteError::Transport(format!(
                    "quote service returned {}",
                    status
                )));
            }

            response.bytes().await.map_err(classify)
        })
        .await?;

    let bid = decode_body(&body)?;
    debug!(bid = %bid, "Got quote from service");
    Ok(bid)
}

fn classify(err: reqwest::Error) -> QuoteError {
    if err.is_builder() {
        QuoteError::RequestConstruction(err.to_string())
    } else {
        QuoteError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_body() {
        let bid = decode_body(br#"{"bid":"5.43"}"#).unwrap();
        assert_eq!(bid, "5.43");
    }

    #[test]
    fn test_decode_body_is_idempotent() {
        let body = br#"{"bid":"5.43"}"#;
        assert_eq!(decode_body(body).unwrap(), decode_body(body).unwrap());
    }

    #[test]
    fn test_decode_body_missing_field() {
        let err = decode_body(br#"{"ask":"5.43"}"#).unwrap_err();
        assert!(matches!(err, QuoteError::Decode(_)));
    }
}
