//! JSON-RPC `eth_call` client for aggregator contracts
//!
//! Encodes the two zero-argument calls the bot needs and decodes their
//! ABI return words without pulling in a full contract binding layer.

use super::{OracleError, OracleReader, RoundData};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// `latestRoundData()` function selector
const LATEST_ROUND_DATA_SELECTOR: &str = "0xfeaf968c";

/// `decimals()` function selector
const DECIMALS_SELECTOR: &str = "0x313ce567";

/// Size of one ABI word in bytes
const WORD_LEN: usize = 32;

/// Configuration for the JSON-RPC client
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// HTTP(S) endpoint of the node
    pub url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl RpcConfig {
    /// Create a new config with the given endpoint and a 10 second timeout
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (CallParams<'a>, &'static str),
}

#[derive(Debug, Serialize)]
struct CallParams<'a> {
    to: &'a str,
    data: &'static str,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Read-only oracle access over an Ethereum-compatible JSON-RPC endpoint
pub struct JsonRpcOracle {
    config: RpcConfig,
    client: Client,
    next_id: AtomicU64,
}

impl JsonRpcOracle {
    /// Create a new client for the given endpoint
    pub fn new(config: RpcConfig) -> Result<Self, OracleError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            config,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Get the configured endpoint
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Issue an `eth_call` against `address` at the latest block
    async fn eth_call(&self, address: &str, data: &'static str) -> Result<String, OracleError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method: "eth_call",
            params: (CallParams { to: address, data }, "latest"),
        };

        tracing::trace!(address, data, "eth_call");

        let response: RpcResponse = self
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(OracleError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        response.result.ok_or(OracleError::EmptyResponse)
    }
}

#[async_trait]
impl OracleReader for JsonRpcOracle {
    async fn latest_round_data(&self, address: &str) -> Result<RoundData, OracleError> {
        let raw = self.eth_call(address, LATEST_ROUND_DATA_SELECTOR).await?;
        decode_round_data(&raw)
    }

    async fn decimals(&self, address: &str) -> Result<u8, OracleError> {
        let raw = self.eth_call(address, DECIMALS_SELECTOR).await?;
        decode_decimals(&raw)
    }
}

/// Decode `(uint80 roundId, int256 answer, uint256 startedAt, uint256 updatedAt, uint80 answeredInRound)`
pub(crate) fn decode_round_data(raw: &str) -> Result<RoundData, OracleError> {
    let words = decode_words(raw, 5)?;

    Ok(RoundData {
        round_id: word_to_u128(&words[0])?,
        answer: word_to_i128(&words[1])?,
        updated_at: word_to_u64(&words[3])?,
    })
}

/// Decode a single `uint8` return value
pub(crate) fn decode_decimals(raw: &str) -> Result<u8, OracleError> {
    let words = decode_words(raw, 1)?;
    let value = word_to_u64(&words[0])?;
    u8::try_from(value).map_err(|_| OracleError::Overflow("u8"))
}

fn decode_words(raw: &str, min_words: usize) -> Result<Vec<[u8; WORD_LEN]>, OracleError> {
    let stripped = raw.strip_prefix("0x").unwrap_or(raw);
    let bytes = hex::decode(stripped).map_err(|e| OracleError::MalformedData(e.to_string()))?;

    if bytes.len() < min_words * WORD_LEN {
        return Err(OracleError::MalformedData(format!(
            "expected at least {} bytes, got {}",
            min_words * WORD_LEN,
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(WORD_LEN)
        .map(|chunk| {
            let mut word = [0u8; WORD_LEN];
            word.copy_from_slice(chunk);
            word
        })
        .collect())
}

fn low_half(word: &[u8; WORD_LEN]) -> [u8; 16] {
    let mut half = [0u8; 16];
    half.copy_from_slice(&word[16..]);
    half
}

fn word_to_u128(word: &[u8; WORD_LEN]) -> Result<u128, OracleError> {
    if word[..16].iter().any(|b| *b != 0) {
        return Err(OracleError::Overflow("u128"));
    }
    Ok(u128::from_be_bytes(low_half(word)))
}

fn word_to_u64(word: &[u8; WORD_LEN]) -> Result<u64, OracleError> {
    let value = word_to_u128(word)?;
    u64::try_from(value).map_err(|_| OracleError::Overflow("u64"))
}

/// Two's complement int256 narrowed to i128 when the high half is pure sign extension
fn word_to_i128(word: &[u8; WORD_LEN]) -> Result<i128, OracleError> {
    let value = i128::from_be_bytes(low_half(word));
    let extension = if value < 0 { 0xff } else { 0x00 };

    if word[..16].iter().any(|b| *b != extension) {
        return Err(OracleError::Overflow("i128"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(value: i128) -> String {
        let fill = if value < 0 { "ff" } else { "00" };
        format!("{}{:032x}", fill.repeat(16), value)
    }

    fn round_payload(round_id: i128, answer: i128, updated_at: i128) -> String {
        format!(
            "0x{}{}{}{}{}",
            word(round_id),
            word(answer),
            word(updated_at - 5),
            word(updated_at),
            word(round_id)
        )
    }

    #[test]
    fn test_decode_round_data() {
        let raw = round_payload(42, 4_512_345_000_000, 1_704_067_200);
        let round = decode_round_data(&raw).unwrap();

        assert_eq!(round.round_id, 42);
        assert_eq!(round.answer, 4_512_345_000_000);
        assert_eq!(round.updated_at, 1_704_067_200);
    }

    #[test]
    fn test_decode_negative_answer() {
        let raw = round_payload(1, -250, 1_704_067_200);
        let round = decode_round_data(&raw).unwrap();
        assert_eq!(round.answer, -250);
    }

    #[test]
    fn test_decode_round_data_too_short() {
        let raw = format!("0x{}{}", word(1), word(2));
        let err = decode_round_data(&raw).unwrap_err();
        assert!(matches!(err, OracleError::MalformedData(_)));
    }

    #[test]
    fn test_decode_invalid_hex() {
        let err = decode_decimals("0xzz").unwrap_err();
        assert!(matches!(err, OracleError::MalformedData(_)));
    }

    #[test]
    fn test_decode_answer_overflow() {
        let huge = format!("0x{}{}", "01", "00".repeat(31));
        let raw = format!("0x{}{}{}{}{}", word(1), &huge[2..], word(0), word(0), word(1));
        let err = decode_round_data(&raw).unwrap_err();
        assert!(matches!(err, OracleError::Overflow("i128")));
    }

    #[test]
    fn test_decode_decimals() {
        let raw = format!("0x{}", word(8));
        assert_eq!(decode_decimals(&raw).unwrap(), 8);

        let raw = format!("0x{}", word(18));
        assert_eq!(decode_decimals(&raw).unwrap(), 18);
    }

    #[test]
    fn test_decode_decimals_out_of_range() {
        let raw = format!("0x{}", word(300));
        let err = decode_decimals(&raw).unwrap_err();
        assert!(matches!(err, OracleError::Overflow("u8")));
    }

    #[test]
    fn test_request_serialization() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "eth_call",
            params: (
                CallParams {
                    to: "0xabc",
                    data: DECIMALS_SELECTOR,
                },
                "latest",
            ),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["method"], "eth_call");
        assert_eq!(json["params"][0]["to"], "0xabc");
        assert_eq!(json["params"][0]["data"], "0x313ce567");
        assert_eq!(json["params"][1], "latest");
    }

    #[test]
    fn test_response_with_error_object() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"execution reverted"}}"#;
        let response: RpcResponse = serde_json::from_str(body).unwrap();
        assert!(response.result.is_none());
        assert_eq!(response.error.unwrap().code, -32000);
    }

    #[test]
    fn test_rpc_config_builder() {
        let config = RpcConfig::new("http://localhost:8545").timeout(Duration::from_secs(3));
        assert_eq!(config.url, "http://localhost:8545");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
