pub mod output;
pub mod table;

pub use output::Output;
pub use table::CampaignTable;
