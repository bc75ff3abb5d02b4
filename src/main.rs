use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adforge::cli::{GenerateOptions, Output, PinTarget};

#[derive(Parser)]
#[command(name = "adforge")]
#[command(
    version,
    about = "AI-driven Google Ads ad group and ad copy generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Group keywords into ad groups and generate ad copy
    Generate {
        #[arg(help = "Keywords (one per argument); read from stdin when none are given")]
        keywords: Vec<String>,
        #[arg(long, short, help = "CSV or XLSX file with keywords")]
        file: Option<PathBuf>,
        #[arg(long, help = "Number of ad groups (5-50)")]
        groups: Option<u32>,
        #[arg(long, help = "Minimum keywords per group (2-10)")]
        min: Option<u32>,
        #[arg(long, help = "Maximum keywords per group (5-20)")]
        max: Option<u32>,
        #[arg(
            long = "pin",
            value_name = "GROUP_ID:N",
            help = "Toggle the pin on headline N (1-based) of a group; repeatable"
        )]
        pins: Vec<PinTarget>,
        #[arg(
            long,
            value_name = "PATH",
            num_args = 0..=1,
            require_equals = true,
            help = "Export to XLSX, optionally --export=PATH (default: Google-Ads-Campaign.xlsx)"
        )]
        export: Option<Option<PathBuf>>,
        #[arg(long, help = "Print the campaign as JSON instead of a table")]
        json: bool,
    },

    /// Show the keywords read from a CSV or XLSX file
    Keywords {
        #[arg(help = "CSV or XLSX file")]
        file: PathBuf,
        #[arg(long, help = "Print as a JSON array")]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mAdForge encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Default hook prints the backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new().error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate {
            keywords,
            file,
            groups,
            min,
            max,
            pins,
            export,
            json,
        } => {
            adforge::cli::commands::generate::run(GenerateOptions {
                keywords,
                file,
                num_ad_groups: groups,
                min_keywords: min,
                max_keywords: max,
                pins,
                export,
                json,
                quiet: cli.quiet,
            })?;
        }
        Commands::Keywords { file, json } => {
            adforge::cli::commands::keywords::run(&file, json)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                adforge::cli::commands::config::show(global, &format)?;
            }
            ConfigAction::Path => {
                adforge::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                adforge::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_generate(args: &[&str]) -> (Vec<String>, Option<Option<PathBuf>>) {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Generate {
                keywords, export, ..
            } => (keywords, export),
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_bare_export_keeps_following_keywords() {
        let (keywords, export) = parse_generate(&["adforge", "generate", "--export", "shoes", "boots"]);
        assert_eq!(keywords, vec!["shoes", "boots"]);
        assert_eq!(export, Some(None));
    }

    #[test]
    fn test_export_path_requires_equals() {
        let (keywords, export) =
            parse_generate(&["adforge", "generate", "--export=out.xlsx", "shoes"]);
        assert_eq!(keywords, vec!["shoes"]);
        assert_eq!(export, Some(Some(PathBuf::from("out.xlsx"))));

        let (_, export) = parse_generate(&["adforge", "generate", "shoes"]);
        assert_eq!(export, None);
    }
}
