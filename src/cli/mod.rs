pub mod commands;
pub mod ui;

pub use commands::generate::{GenerateOptions, PinTarget};
pub use ui::{CampaignTable, Output};
