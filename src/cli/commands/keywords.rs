//! Keywords Command
//!
//! Preview the keywords read from an input file.
//!
//! Usage:
//!   adforge keywords FILE [--json]

use std::path::Path;

use crate::cli::ui::Output;
use crate::ingest::parse_keywords_from_file;
use crate::types::Result;

pub fn run(file: &Path, json: bool) -> Result<()> {
    let keywords = parse_keywords_from_file(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&keywords)?);
        return Ok(());
    }

    for keyword in &keywords {
        println!("{}", keyword);
    }
    Output::new().info(&format!(
        "{} keywords in {}",
        keywords.len(),
        file.display()
    ));
    Ok(())
}
