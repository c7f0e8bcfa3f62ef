pub mod list;
pub mod notify;
pub mod setup;
pub mod sync;
pub mod ui;
