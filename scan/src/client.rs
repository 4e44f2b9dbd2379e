//! HTTP client for the external transaction-history provider.
//!
//! The provider speaks the Etherscan account API: one GET with
//! module/action query parameters, answered with a status envelope whose
//! `result` is the transaction array on success and an error string
//! otherwise. The public fetch surface is fail-soft by upstream contract:
//! any transport or provider failure yields an empty list.

use crate::ScanError;
use callscope_types::{Address, Timestamp};
use serde::Deserialize;
use std::time::Duration;

/// Default provider endpoint (SonicScan account API).
const DEFAULT_BASE_URL: &str = "https://api.sonicscan.org/api";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Provider status value meaning "query succeeded, result is the array".
const PROVIDER_OK: &str = "1";

/// One raw transaction record as the provider reports it.
///
/// Only the fields the reconciler consumes are decoded; everything else
/// in the provider payload is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub from: String,
    /// Empty for contract-creation transactions.
    #[serde(default)]
    pub to: String,
    /// Epoch seconds as a decimal string.
    #[serde(rename = "timeStamp", default)]
    pub time_stamp: Option<String>,
    /// Human-readable function name, absent for plain transfers.
    #[serde(rename = "functionName", default)]
    pub function_name: Option<String>,
}

impl RawTransaction {
    /// The record's timestamp, when present and well-formed epoch seconds.
    pub fn timestamp(&self) -> Option<Timestamp> {
        let raw = self.time_stamp.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        raw.parse::<u64>().ok().map(Timestamp::from_unix_secs)
    }

    /// The function name, with the provider's blank/absent cases collapsed
    /// to `"unknown"`.
    pub fn method(&self) -> String {
        match self.function_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => "unknown".to_owned(),
        }
    }
}

/// Provider response envelope.
///
/// `result` holds the transaction array only when `status` is `"1"`; on
/// errors the provider reuses the field for a message string, so it has to
/// be decoded leniently.
#[derive(Debug, Deserialize)]
struct TxListResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: serde_json::Value,
}

/// HTTP client for the transaction-history provider.
pub struct ScanClient {
    /// Base URL of the provider API.
    base_url: String,
    /// Reusable HTTP client.
    client: reqwest::Client,
    /// Provider API key, sent with every request.
    api_key: String,
    /// Per-request timeout.
    timeout: Duration,
}

impl ScanClient {
    /// Create a client for the default provider endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a client pointing at a custom provider URL.
    pub fn with_url(base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Query parameters for an account transaction-list request: full
    /// block range, newest first.
    fn txlist_params(&self, address: &Address) -> [(&'static str, String); 7] {
        [
            ("module", "account".to_owned()),
            ("action", "txlist".to_owned()),
            ("address", address.as_str().to_owned()),
            ("startblock", "0".to_owned()),
            ("endblock", "99999999".to_owned()),
            ("sort", "desc".to_owned()),
            ("apikey", self.api_key.clone()),
        ]
    }

    /// Fetch the transaction history for `address`.
    ///
    /// Fail-soft: transport failures, non-2xx answers, provider error
    /// statuses, and undecodable bodies all yield an empty list. The
    /// provider reports "no transactions" through the same error-status
    /// channel, so the two cases are indistinguishable here.
    pub async fn fetch_transactions(&self, address: &Address) -> Vec<RawTransaction> {
        match self.try_fetch(address).await {
            Ok(records) => records,
            Err(ScanError::Provider(message)) => {
                // Covers both provider-side errors and the legitimate
                // "no transactions found" answer.
                tracing::debug!(wallet = %address, %message, "provider returned no result set");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(
                    wallet = %address,
                    error = %err,
                    "provider fetch failed, treating as empty"
                );
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, address: &Address) -> Result<Vec<RawTransaction>, ScanError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&self.txlist_params(address))
            .timeout(self.timeout)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ScanError::HttpStatus(resp.status().as_u16()));
        }

        let envelope: TxListResponse = resp.json().await?;
        parse_txlist(envelope)
    }
}

/// Decode the provider envelope into records.
fn parse_txlist(envelope: TxListResponse) -> Result<Vec<RawTransaction>, ScanError> {
    if envelope.status != PROVIDER_OK {
        return Err(ScanError::Provider(envelope.message));
    }
    serde_json::from_value(envelope.result).map_err(|e| ScanError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_client_points_at_sonicscan() {
        let client = ScanClient::new("key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.timeout, Duration::from_secs(10));
    }

    #[test]
    fn custom_url_is_trimmed() {
        let client = ScanClient::with_url("http://localhost:9000/api/", "key");
        assert_eq!(client.base_url, "http://localhost:9000/api");
    }

    #[test]
    fn txlist_params_identify_an_account_query() {
        let client = ScanClient::new("secret");
        let params = client.txlist_params(&Address::from("0xabc"));
        assert!(params.contains(&("module", "account".to_owned())));
        assert!(params.contains(&("action", "txlist".to_owned())));
        assert!(params.contains(&("address", "0xabc".to_owned())));
        assert!(params.contains(&("startblock", "0".to_owned())));
        assert!(params.contains(&("endblock", "99999999".to_owned())));
        assert!(params.contains(&("sort", "desc".to_owned())));
        assert!(params.contains(&("apikey", "secret".to_owned())));
    }

    #[test]
    fn parse_txlist_decodes_success_result() {
        let json = r#"{
            "status": "1",
            "message": "OK",
            "result": [
                {"from": "0xa", "to": "0xb", "timeStamp": "1700000000", "functionName": "transfer(address,uint256)"},
                {"from": "0xc", "to": "", "timeStamp": "1700000001"}
            ]
        }"#;
        let envelope: TxListResponse = serde_json::from_str(json).unwrap();
        let records = parse_txlist(envelope).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].from, "0xa");
        assert_eq!(records[1].to, "");
        assert!(records[1].function_name.is_none());
    }

    #[test]
    fn parse_txlist_rejects_provider_error_status() {
        // On errors the provider reuses `result` for a message string.
        let json = r#"{"status": "0", "message": "NOTOK", "result": "Max rate limit reached"}"#;
        let envelope: TxListResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            parse_txlist(envelope),
            Err(ScanError::Provider(message)) if message == "NOTOK"
        ));
    }

    #[test]
    fn parse_txlist_rejects_undecodable_result() {
        let json = r#"{"status": "1", "message": "OK", "result": "surprise"}"#;
        let envelope: TxListResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(parse_txlist(envelope), Err(ScanError::Decode(_))));
    }

    #[test]
    fn timestamp_parses_epoch_seconds() {
        let record = RawTransaction {
            from: "0xa".to_owned(),
            to: "0xb".to_owned(),
            time_stamp: Some("1700000000".to_owned()),
            function_name: None,
        };
        assert_eq!(
            record.timestamp(),
            Some(Timestamp::from_unix_secs(1_700_000_000))
        );
    }

    #[test]
    fn timestamp_rejects_absent_empty_and_garbage() {
        let mut record = RawTransaction {
            from: "0xa".to_owned(),
            to: "0xb".to_owned(),
            time_stamp: None,
            function_name: None,
        };
        assert_eq!(record.timestamp(), None);

        record.time_stamp = Some("  ".to_owned());
        assert_eq!(record.timestamp(), None);

        record.time_stamp = Some("not-a-number".to_owned());
        assert_eq!(record.timestamp(), None);
    }

    #[test]
    fn method_defaults_to_unknown() {
        let mut record = RawTransaction {
            from: "0xa".to_owned(),
            to: "0xb".to_owned(),
            time_stamp: None,
            function_name: Some("transfer(address,uint256)".to_owned()),
        };
        assert_eq!(record.method(), "transfer(address,uint256)");

        record.function_name = Some("   ".to_owned());
        assert_eq!(record.method(), "unknown");

        record.function_name = None;
        assert_eq!(record.method(), "unknown");
    }
}
