use console::style;

use crate::ai::provider::ChainStats;

/// Status lines for interactive use. Everything goes to stderr so that
/// stdout stays clean for `--json` and piping.
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Suppress everything except errors
    pub fn quiet(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("✓").green(), message);
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// One line per failed attempt, then the provider that answered
    pub fn chain_summary(&self, stats: &ChainStats) {
        for attempt in stats.attempts.iter().filter(|a| !a.success) {
            self.warning(&format!(
                "{} ({}) failed after {}ms: {}",
                attempt.provider_name,
                attempt.model,
                attempt.duration_ms,
                attempt.error.as_deref().unwrap_or("unknown error")
            ));
        }
        if let Some(provider) = &stats.successful_provider {
            self.info(&format!(
                "Generated by {} in {:.1}s",
                provider,
                stats.total_duration_ms as f64 / 1000.0
            ));
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
