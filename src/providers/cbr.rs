use crate::core::currency::CurrencyRateProvider;
use crate::core::error::{Result, SyncError};
use crate::providers::util::USER_AGENT;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument};

const DAILY_RATES_PATH: &str = "/scripts/XML_daily.asp";

/// Daily official rates of the Central Bank of Russia.
pub struct CbrRateProvider {
    base_url: String,
    timeout: Duration,
}

impl CbrRateProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        CbrRateProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValCurs {
    #[serde(rename = "Valute", default)]
    valutes: Vec<Valute>,
}

#[derive(Debug, Deserialize)]
struct Valute {
    #[serde(rename = "CharCode")]
    char_code: String,
    #[serde(rename = "Value")]
    value: String,
}

/// Extracts the rate of `currency_code` from a daily rates document.
/// The feed writes decimals with a comma (`81,2345`).
fn parse_rate(document: &str, currency_code: &str) -> Result<Decimal> {
    let curs: ValCurs =
        quick_xml::de::from_str(document).map_err(|e| SyncError::RateFeed(format!("{e}")))?;

    let valute = curs
        .valutes
        .into_iter()
        .find(|v| v.char_code.trim() == currency_code)
        .ok_or_else(|| SyncError::CurrencyNotFound(currency_code.to_string()))?;

    let value = valute.value.trim().replace(',', ".");
    Decimal::from_str(&value).map_err(|e| {
        SyncError::RateFeed(format!(
            "invalid value '{}' for {}: {}",
            valute.value, currency_code, e
        ))
    })
}

#[async_trait]
impl CurrencyRateProvider for CbrRateProvider {
    #[instrument(
        name = "CbrRateFetch",
        skip(self),
        fields(currency = %currency_code)
    )]
    async fn get_rate(&self, currency_code: &str) -> Result<Decimal> {
        let url = format!("{}{}", self.base_url, DAILY_RATES_PATH);
        debug!("Requesting daily rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(|e| SyncError::RateFeed(format!("failed to build client: {e}")))?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::Timeout(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SyncError::Timeout(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SyncError::Timeout(format!("failed to read body from {url}: {e}")))?;
        if body.trim().is_empty() {
            return Err(SyncError::Timeout(format!("empty response from {url}")));
        }

        let rate = parse_rate(&body, currency_code)?;
        debug!(%rate, "Parsed exchange rate");
        Ok(rate)
    }
}
