pub mod campaign;
pub mod error;

pub use campaign::{AdGroup, Campaign, Description, GenerationResult, Headline, Settings};
pub use error::{AdForgeError, Result};
