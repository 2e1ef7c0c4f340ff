//! HTTP client for the external statement-analysis service.

use super::{AnalyzerError, StatementAnalyzer};
use crate::domain::{AccountId, Direction, TransactionDraft};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Statement analyzer backed by an external AI extraction API.
///
/// Posts the raw image bytes and expects a JSON array of movements:
/// `[{"date": "2024-01-15", "description": "...", "amount": "158.50",
/// "direction": "expense"}, ...]`.
#[derive(Debug, Clone)]
pub struct HttpAnalyzer {
    client: Client,
    base_url: String,
}

impl HttpAnalyzer {
    /// Create an analyzer against the given service base URL.
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn post_image(&self, image: &[u8]) -> Result<serde_json::Value, AnalyzerError> {
        let url = format!("{}/analyze", self.base_url);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .post(&url)
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(image.to_vec())
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(AnalyzerError::NetworkError(e.to_string()))
                })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(AnalyzerError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(AnalyzerError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(AnalyzerError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(AnalyzerError::ParseError(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl StatementAnalyzer for HttpAnalyzer {
    async fn analyze(&self, image: &[u8]) -> Result<Vec<TransactionDraft>, AnalyzerError> {
        debug!("Analyzing statement image ({} bytes)", image.len());

        let response = self.post_image(image).await?;

        let movements = response
            .as_array()
            .ok_or_else(|| AnalyzerError::ParseError("Expected array response".to_string()))?;

        let mut drafts = Vec::new();
        for movement in movements {
            match parse_draft(movement) {
                Ok(draft) => drafts.push(draft),
                Err(e) => {
                    warn!("Skipping unparseable movement: {}", e);
                }
            }
        }

        Ok(drafts)
    }
}

fn parse_draft(movement: &serde_json::Value) -> Result<TransactionDraft, AnalyzerError> {
    let date_str = movement
        .get("date")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AnalyzerError::ParseError("Missing date field".to_string()))?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| AnalyzerError::ParseError(format!("Invalid date '{}': {}", date_str, e)))?;

    let description = movement
        .get("description")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AnalyzerError::ParseError("Missing description field".to_string()))?
        .to_string();

    let amount = match movement.get("amount") {
        Some(serde_json::Value::String(s)) => Decimal::from_str(s)
            .map_err(|e| AnalyzerError::ParseError(format!("Invalid amount '{}': {}", s, e)))?,
        Some(serde_json::Value::Number(n)) => Decimal::from_str(&n.to_string())
            .map_err(|e| AnalyzerError::ParseError(format!("Invalid amount '{}': {}", n, e)))?,
        _ => return Err(AnalyzerError::ParseError("Missing amount field".to_string())),
    };

    let direction_str = movement
        .get("direction")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AnalyzerError::ParseError("Missing direction field".to_string()))?;
    let direction = direction_str
        .parse::<Direction>()
        .map_err(|e| AnalyzerError::ParseError(e.to_string()))?;

    // account_id is left empty on purpose: the user picks the account.
    Ok(TransactionDraft::new(
        AccountId::new(""),
        date,
        description,
        amount.abs(),
        direction,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_draft_valid() {
        let movement = serde_json::json!({
            "date": "2024-01-15",
            "description": "OXXO EXPRESS GDL",
            "amount": "158.50",
            "direction": "expense"
        });

        let draft = parse_draft(&movement).unwrap();
        assert!(draft.account_id.is_empty());
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(draft.description, "OXXO EXPRESS GDL");
        assert_eq!(draft.amount, Decimal::from_str("158.50").unwrap());
        assert_eq!(draft.direction, Direction::Expense);
    }

    #[test]
    fn test_parse_draft_numeric_amount() {
        let movement = serde_json::json!({
            "date": "2024-01-15",
            "description": "PAYROLL",
            "amount": 12500.0,
            "direction": "income"
        });

        let draft = parse_draft(&movement).unwrap();
        assert_eq!(draft.amount, Decimal::from_str("12500").unwrap());
        assert_eq!(draft.direction, Direction::Income);
    }

    #[test]
    fn test_parse_draft_negative_amount_normalized() {
        let movement = serde_json::json!({
            "date": "2024-01-15",
            "description": "UBER TRIP",
            "amount": "-89.90",
            "direction": "expense"
        });

        let draft = parse_draft(&movement).unwrap();
        assert_eq!(draft.amount, Decimal::from_str("89.90").unwrap());
    }

    #[test]
    fn test_parse_draft_missing_field() {
        let movement = serde_json::json!({
            "date": "2024-01-15",
            "amount": "10",
            "direction": "expense"
        });
        assert!(matches!(
            parse_draft(&movement),
            Err(AnalyzerError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_draft_unknown_direction() {
        let movement = serde_json::json!({
            "date": "2024-01-15",
            "description": "???",
            "amount": "10",
            "direction": "sideways"
        });
        assert!(matches!(
            parse_draft(&movement),
            Err(AnalyzerError::ParseError(_))
        ));
    }
}
