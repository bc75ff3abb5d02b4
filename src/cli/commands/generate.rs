//! Generate Command
//!
//! Group keywords into ad groups and write ad copy for each.
//!
//! Usage:
//!   adforge generate [KEYWORDS...] [--file PATH] [--groups N] [--min N] [--max N]
//!                    [--pin GROUP_ID:N]... [--export[=PATH]] [--json]

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tokio::runtime::Runtime;
use tracing::debug;

use crate::ai::provider::Credentials;
use crate::cli::ui::{CampaignTable, Output};
use crate::config::{Config, ConfigLoader};
use crate::export::write_xlsx;
use crate::generator::CampaignGenerator;
use crate::ingest::{parse_keyword_text, parse_keywords_from_file};
use crate::types::{AdForgeError, Campaign, Result, Settings};

/// Headline to pin, as `GROUP_ID:N` with a 1-based headline number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinTarget {
    pub group_id: String,
    pub headline_index: usize,
}

impl FromStr for PinTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Group ids may themselves contain ':'
        let (group_id, number) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("Invalid pin '{}'. Expected GROUP_ID:N", s))?;

        let number: usize = number
            .trim()
            .parse()
            .map_err(|_| format!("Invalid headline number '{}' in pin '{}'", number, s))?;
        if number == 0 || group_id.is_empty() {
            return Err(format!(
                "Invalid pin '{}'. Headline numbers start at 1",
                s
            ));
        }

        Ok(Self {
            group_id: group_id.to_string(),
            headline_index: number - 1,
        })
    }
}

/// Generate options (consolidated parameters)
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Keywords given on the command line
    pub keywords: Vec<String>,
    /// CSV or XLSX keyword file
    pub file: Option<PathBuf>,
    pub num_ad_groups: Option<u32>,
    pub min_keywords: Option<u32>,
    pub max_keywords: Option<u32>,
    pub pins: Vec<PinTarget>,
    /// `Some(None)` exports to the configured file name
    pub export: Option<Option<PathBuf>>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: GenerateOptions) -> Result<()> {
    let config = ConfigLoader::load()?;
    let output = Output::quiet(options.quiet || options.json);

    let settings = resolve_settings(&config, &options)?;
    let keywords = collect_keywords(&options)?;
    output.info(&format!(
        "Grouping {} keywords into {} ad groups ({}-{} keywords each)",
        keywords.len(),
        settings.num_ad_groups,
        settings.min_keywords_per_group,
        settings.max_keywords_per_group
    ));

    let generator = CampaignGenerator::from_config(&config, &Credentials::from_env())?;
    let skipped = generator.chain().skipped_missing_credential();
    if skipped > 0 {
        output.info(&format!("Skipping {} model(s) without an API key", skipped));
    }

    let rt = Runtime::new()?;
    let (campaign, stats) = rt.block_on(generator.generate_with_stats(&keywords, &settings))?;
    output.chain_summary(&stats);

    let campaign = apply_pins(campaign, &options.pins)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&campaign)?);
    } else {
        print!("{}", CampaignTable::new(console::colors_enabled()).render(&campaign));
        println!();
    }
    output.success(&format!("Generated {} ad groups", campaign.len()));

    if let Some(target) = &options.export {
        let path = export_path(target.as_deref(), &config.export.file_name);
        write_xlsx(&campaign, &path)?;
        output.success(&format!("Exported to {}", path.display()));
    }

    Ok(())
}

/// Config defaults overridden by flags, checked against the offered ranges
fn resolve_settings(config: &Config, options: &GenerateOptions) -> Result<Settings> {
    let defaults = config.settings;
    let settings = Settings::new(
        options.num_ad_groups.unwrap_or(defaults.num_ad_groups),
        options.min_keywords.unwrap_or(defaults.min_keywords_per_group),
        options.max_keywords.unwrap_or(defaults.max_keywords_per_group),
    );
    settings.validate()?;
    Ok(settings)
}

/// Arguments and file keywords, or stdin lines when neither is given
fn collect_keywords(options: &GenerateOptions) -> Result<Vec<String>> {
    let mut keywords: Vec<String> = options
        .keywords
        .iter()
        .flat_map(|arg| parse_keyword_text(arg))
        .collect();

    if let Some(file) = &options.file {
        keywords.extend(parse_keywords_from_file(file)?);
    }

    if keywords.is_empty() && !std::io::stdin().is_terminal() {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        keywords = parse_keyword_text(&text);
        debug!(count = keywords.len(), "Read keywords from stdin");
    }

    if keywords.is_empty() {
        return Err(AdForgeError::InvalidInput(
            "Please enter or upload some keywords.".to_string(),
        ));
    }
    Ok(keywords)
}

fn apply_pins(campaign: Campaign, pins: &[PinTarget]) -> Result<Campaign> {
    pins.iter().try_fold(campaign, |campaign, pin| {
        campaign.toggle_pin(&pin.group_id, pin.headline_index)
    })
}

/// A directory target gets the default file name appended
fn export_path(target: Option<&Path>, file_name: &str) -> PathBuf {
    match target {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AdGroup, Headline};
    use tempfile::TempDir;

    #[test]
    fn test_pin_target_parse() {
        let pin: PinTarget = "Custom-Tees-0:3".parse().unwrap();
        assert_eq!(pin.group_id, "Custom-Tees-0");
        assert_eq!(pin.headline_index, 2);

        let with_colon: PinTarget = "Brand:Tees-1:1".parse().unwrap();
        assert_eq!(with_colon.group_id, "Brand:Tees-1");
        assert_eq!(with_colon.headline_index, 0);
    }

    #[test]
    fn test_pin_target_rejects_invalid() {
        assert!("no-number".parse::<PinTarget>().is_err());
        assert!("group:zero".parse::<PinTarget>().is_err());
        assert!("group:0".parse::<PinTarget>().is_err());
        assert!(":2".parse::<PinTarget>().is_err());
    }

    #[test]
    fn test_resolve_settings_overrides_config() {
        let options = GenerateOptions {
            num_ad_groups: Some(8),
            max_keywords: Some(6),
            ..Default::default()
        };
        let settings = resolve_settings(&Config::default(), &options).unwrap();
        assert_eq!(settings, Settings::new(8, 3, 6));
    }

    #[test]
    fn test_resolve_settings_enforces_ranges() {
        let options = GenerateOptions {
            num_ad_groups: Some(51),
            ..Default::default()
        };
        assert!(matches!(
            resolve_settings(&Config::default(), &options),
            Err(AdForgeError::Config(_))
        ));
    }

    #[test]
    fn test_collect_keywords_from_args_and_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("kw.csv");
        std::fs::write(&file, "bulk tees,print shop\n").unwrap();

        let options = GenerateOptions {
            keywords: vec!["custom t-shirts".to_string(), "  ".to_string()],
            file: Some(file),
            ..Default::default()
        };
        assert_eq!(
            collect_keywords(&options).unwrap(),
            vec!["custom t-shirts", "bulk tees", "print shop"]
        );
    }

    #[test]
    fn test_apply_pins_in_order() {
        let campaign = Campaign::new(vec![AdGroup {
            id: "A-0".to_string(),
            name: "A".to_string(),
            keywords: vec!["a".to_string()],
            headlines: vec![Headline::new("one"), Headline::new("two")],
            descriptions: vec![],
        }]);
        let pins = vec![
            "A-0:2".parse::<PinTarget>().unwrap(),
            "A-0:1".parse().unwrap(),
            "A-0:2".parse().unwrap(),
        ];

        let pinned = apply_pins(campaign, &pins).unwrap();
        let group = pinned.get("A-0").unwrap();
        assert!(group.headlines[0].is_pinned);
        assert!(!group.headlines[1].is_pinned);

        let missing = vec!["B-1:1".parse::<PinTarget>().unwrap()];
        assert!(matches!(
            apply_pins(pinned, &missing),
            Err(AdForgeError::NotFound(_))
        ));
    }

    #[test]
    fn test_export_path() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            export_path(Some(dir.path()), "Google-Ads-Campaign.xlsx"),
            dir.path().join("Google-Ads-Campaign.xlsx")
        );
        assert_eq!(
            export_path(Some(Path::new("out/custom.xlsx")), "x.xlsx"),
            PathBuf::from("out/custom.xlsx")
        );
        assert_eq!(
            export_path(None, "Google-Ads-Campaign.xlsx"),
            PathBuf::from("Google-Ads-Campaign.xlsx")
        );
    }
}
