pub mod cbr;
pub mod google_sheets;
pub mod telegram;
pub mod util;
