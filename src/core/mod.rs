//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod notify;
pub mod order;
pub mod sheet;
pub mod store;

// Re-export main types for cleaner imports
pub use currency::CurrencyRateProvider;
pub use error::{Result, SyncError};
pub use notify::Notifier;
pub use order::{OrderField, OrderId, OrderRow, UPDATE_FIELDS};
pub use sheet::SheetSource;
pub use store::{OrderStore, StoreOp};
