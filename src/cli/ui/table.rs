//! Terminal rendering of a campaign.
//!
//! Each ad group is printed as a block: name and id, keywords, then the
//! numbered headlines and descriptions with `[count/limit]` annotations.
//! Counts over the limit are shown in red; the limit is advisory only.

use std::fmt::Write;

use console::style;

use crate::constants::ad::{DESCRIPTION_MAX_CHARS, HEADLINE_MAX_CHARS};
use crate::types::{AdGroup, Campaign};

const PIN_MARKER: &str = "📌";

pub struct CampaignTable {
    colors: bool,
}

impl CampaignTable {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    pub fn render(&self, campaign: &Campaign) -> String {
        let mut out = String::new();
        for group in campaign.groups() {
            self.render_group(&mut out, group);
        }
        out
    }

    fn render_group(&self, out: &mut String, group: &AdGroup) {
        let _ = writeln!(
            out,
            "\n{}  {}",
            style(&group.name).bold().cyan().force_styling(self.colors),
            style(format!("({})", group.id)).dim().force_styling(self.colors)
        );
        let _ = writeln!(out, "  Keywords: {}", group.keywords.join(", "));

        let _ = writeln!(out, "  Headlines:");
        for (i, headline) in group.headlines.iter().enumerate() {
            let marker = if headline.is_pinned { PIN_MARKER } else { "  " };
            let _ = writeln!(
                out,
                "    {:>2}. {} {} {}",
                i + 1,
                marker,
                headline.text,
                self.annotation(headline.char_count(), HEADLINE_MAX_CHARS)
            );
        }

        let _ = writeln!(out, "  Descriptions:");
        for (i, description) in group.descriptions.iter().enumerate() {
            let _ = writeln!(
                out,
                "    {:>2}. {} {}",
                i + 1,
                description.text,
                self.annotation(description.char_count(), DESCRIPTION_MAX_CHARS)
            );
        }
    }

    fn annotation(&self, count: usize, limit: usize) -> String {
        let text = format!("[{}/{}]", count, limit);
        let styled = if count > limit {
            style(text).red().bold()
        } else {
            style(text).dim()
        };
        styled.force_styling(self.colors).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Description, Headline};

    fn campaign() -> Campaign {
        Campaign::new(vec![AdGroup {
            id: "Custom-Tees-0".to_string(),
            name: "Custom Tees".to_string(),
            keywords: vec!["custom t-shirts".to_string(), "design tees".to_string()],
            headlines: vec![
                Headline::new("Custom Tees Online"),
                Headline::new("This Headline Is Definitely Too Long"),
            ],
            descriptions: vec![Description::new("Print your design.")],
        }])
    }

    #[test]
    fn test_render_plain() {
        let text = CampaignTable::new(false).render(&campaign());

        assert!(text.contains("Custom Tees  (Custom-Tees-0)"));
        assert!(text.contains("Keywords: custom t-shirts, design tees"));
        assert!(text.contains(" 1.    Custom Tees Online [18/30]"));
        assert!(text.contains("[36/30]"));
        assert!(text.contains(" 1. Print your design. [18/90]"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_render_marks_pinned() {
        let pinned = campaign().toggle_pin("Custom-Tees-0", 1).unwrap();
        let text = CampaignTable::new(false).render(&pinned);
        assert!(text.contains(" 2. 📌 This Headline"));
        assert!(text.contains(" 1.    Custom Tees Online"));
    }

    #[test]
    fn test_over_limit_is_red() {
        let text = CampaignTable::new(true).render(&campaign());
        let red_count = style("[36/30]").red().bold().force_styling(true).to_string();
        assert!(text.contains(&red_count));
    }
}
