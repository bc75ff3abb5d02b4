//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/adforge/config.toml)
//! 3. Project config (.adforge/config.toml)
//! 4. Environment variables (ADFORGE_* prefix, `__` separates nesting)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{AdForgeError, Result};

const ENV_PREFIX: &str = "ADFORGE_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .map_err(|e| AdForgeError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| AdForgeError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // ADFORGE_LLM__TIMEOUT_SECS -> llm.timeout_secs
        figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true))
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/adforge/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("adforge"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    /// Get project config directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".adforge")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;
        println!("{}", Self::render(&config, as_json)?);
        Ok(())
    }

    fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| AdForgeError::Config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            AdForgeError::Config("Cannot determine global config directory".to_string())
        })?;
        Self::write_default(&global_dir, force)
    }

    /// Initialize project configuration
    pub fn init_project(force: bool) -> Result<PathBuf> {
        Self::write_default(&Self::project_dir(), force)
    }

    fn write_default(dir: &Path, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_config())?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Generate default config content (TOML)
    fn default_config() -> String {
        r#"# AdForge Configuration
# Project settings in .adforge/config.toml override ~/.config/adforge/config.toml.
# API keys are read from GEMINI_API_KEY and OPENROUTER_API_KEY, never from here.

version = "1.0"

# Default grouping settings (overridable with --groups/--min/--max)
[settings]
num_ad_groups = 20
min_keywords_per_group = 3
max_keywords_per_group = 10

[llm]
timeout_secs = 300
thinking_budget = 32768

# Attempted in order; entries whose API key is missing are skipped
[[llm.chain]]
provider = "gemini"
model = "gemini-2.5-pro"

[[llm.chain]]
provider = "gemini"
model = "gemini-2.5-flash"
thinking_budget = 24576

[[llm.chain]]
provider = "openrouter"
model = "openai/gpt-4o-mini"

[export]
file_name = "Google-Ads-Campaign.xlsx"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::ProviderFamily;
    use figment::Jail;

    fn isolate(jail: &mut Jail) {
        let home = jail.directory().join("home");
        jail.set_env("HOME", home.display());
        jail.set_env("XDG_CONFIG_HOME", home.join(".config").display());
    }

    #[test]
    fn test_load_default_config() {
        Jail::expect_with(|jail| {
            isolate(jail);
            let config = ConfigLoader::load().unwrap();
            assert_eq!(config.version, "1.0");
            assert_eq!(config.llm.chain.len(), 3);
            Ok(())
        });
    }

    #[test]
    fn test_default_config_template_matches_defaults() {
        let parsed: Config = toml::from_str(&ConfigLoader::default_config()).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.settings, defaults.settings);
        assert_eq!(parsed.llm.chain, defaults.llm.chain);
        assert_eq!(parsed.llm.thinking_budget, defaults.llm.thinking_budget);
    }

    #[test]
    fn test_project_overrides_global() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_dir("home/.config/adforge")?;
            jail.create_file(
                "home/.config/adforge/config.toml",
                "[settings]\nnum_ad_groups = 30\nmin_keywords_per_group = 4\n",
            )?;
            jail.create_dir(".adforge")?;
            jail.create_file(".adforge/config.toml", "[settings]\nnum_ad_groups = 12\n")?;

            let config = ConfigLoader::load().unwrap();
            assert_eq!(config.settings.num_ad_groups, 12);
            assert_eq!(config.settings.min_keywords_per_group, 4);
            assert_eq!(config.settings.max_keywords_per_group, 10);
            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.set_env("ADFORGE_LLM__TIMEOUT_SECS", "45");
            jail.set_env("ADFORGE_SETTINGS__MAX_KEYWORDS_PER_GROUP", "15");

            let config = ConfigLoader::load().unwrap();
            assert_eq!(config.llm.timeout_secs, 45);
            assert_eq!(config.settings.max_keywords_per_group, 15);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_layer_is_config_error() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_dir(".adforge")?;
            jail.create_file(".adforge/config.toml", "[llm]\ntimeout_secs = 0\n")?;

            assert!(matches!(ConfigLoader::load(), Err(AdForgeError::Config(_))));
            Ok(())
        });
    }

    #[test]
    fn test_init_project_and_load_from_file() {
        Jail::expect_with(|jail| {
            isolate(jail);
            let path = ConfigLoader::init_project(false).unwrap();
            assert_eq!(path, PathBuf::from(".adforge/config.toml"));
            assert!(path.exists());

            let config = ConfigLoader::load_from_file(&path).unwrap();
            assert_eq!(config.llm.chain[2].provider, ProviderFamily::OpenRouter);
            Ok(())
        });
    }

    #[test]
    fn test_init_does_not_overwrite_without_force() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_dir(".adforge")?;
            jail.create_file(".adforge/config.toml", "version = \"custom\"\n")?;

            ConfigLoader::init_project(false).unwrap();
            let kept = fs::read_to_string(".adforge/config.toml").unwrap();
            assert_eq!(kept, "version = \"custom\"\n");

            ConfigLoader::init_project(true).unwrap();
            let replaced = fs::read_to_string(".adforge/config.toml").unwrap();
            assert!(replaced.contains("[[llm.chain]]"));
            Ok(())
        });
    }

    #[test]
    fn test_init_global_uses_xdg_dir() {
        Jail::expect_with(|jail| {
            isolate(jail);
            let path = ConfigLoader::init_global(false).unwrap();
            assert!(path.ends_with("home/.config/adforge/config.toml"));
            assert!(path.exists());
            Ok(())
        });
    }

    #[test]
    fn test_render_formats() {
        let config = Config::default();
        let json = ConfigLoader::render(&config, true).unwrap();
        assert!(json.contains("\"num_ad_groups\": 20"));
        let toml = ConfigLoader::render(&config, false).unwrap();
        assert!(toml.contains("num_ad_groups = 20"));
    }
}
