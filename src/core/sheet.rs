//! Spreadsheet access abstractions

use crate::core::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Returns every row of `range` in `sheet_id` as raw string cells, header included.
    async fn fetch_values(&self, sheet_id: &str, range: &str) -> Result<Vec<Vec<String>>>;
}
