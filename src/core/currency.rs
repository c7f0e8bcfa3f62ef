//! Currency conversion abstractions

use crate::core::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Returns how many roubles one unit of `currency_code` is worth today.
    async fn get_rate(&self, currency_code: &str) -> Result<Decimal>;
}
