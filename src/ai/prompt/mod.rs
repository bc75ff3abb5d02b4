//! Prompt Builder System
//!
//! Standardized prompt construction for ad campaign generation.
//!
//! ## Structure
//!
//! 1. **Role Definition**: campaign manager persona
//! 2. **Input**: the keyword list
//! 3. **Objectives**: grouping, headlines, descriptions, output format
//! 4. **Output Schema**: JSON structure sent alongside the prompt
//!
//! Settings are interpolated as-is. Nothing here validates them, so an
//! out-of-range value reaches the model as an instruction rather than
//! failing locally.

use serde_json::{Value, json};

use crate::constants::ad;
use crate::types::Settings;

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Role definition with the task it performs
    Role { expertise: String, task: String },
    /// Numbered objectives
    Objectives(Vec<String>),
    /// Headed block of text
    Text { header: String, content: String },
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role definition section
    pub fn role(mut self, expertise: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            expertise: expertise.to_string(),
            task: task.to_string(),
        });
        self
    }

    /// Add objectives section
    pub fn objectives(mut self, objectives: Vec<String>) -> Self {
        self.sections.push(PromptSection::Objectives(objectives));
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: header.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { expertise, task } => {
                    prompt.push_str(&format!(
                        "You are an expert {}. Your task is to {}.\n\n",
                        expertise, task
                    ));
                }
                PromptSection::Objectives(objectives) => {
                    prompt.push_str("**Instructions:**\n");
                    for (i, obj) in objectives.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, obj));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    prompt.push_str(&format!("**{}:**\n", header));
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

// =============================================================================
// Ad Campaign Prompt
// =============================================================================

/// Prompt text plus the structured-output schema for one request
#[derive(Debug, Clone)]
pub struct AdPrompt {
    pub text: String,
    pub schema: Value,
}

impl AdPrompt {
    pub fn new(keywords: &[String], settings: &Settings) -> Self {
        Self {
            text: build_prompt(keywords, settings),
            schema: response_schema(),
        }
    }
}

/// Build the campaign generation instruction for the given keywords
pub fn build_prompt(keywords: &[String], settings: &Settings) -> String {
    PromptBuilder::new()
        .role(
            "Google Ads campaign manager",
            "process a list of marketing keywords, group them into tightly themed ad groups, \
             and write compelling ad copy (headlines and descriptions) for each group",
        )
        .section("Input Keywords", &keywords.join(", "))
        .objectives(vec![
            format!(
                "**Analyze and Group:** Analyze the provided keywords and group them into exactly {} \
                 distinct, intent-based ad groups. Each ad group must have a descriptive name and \
                 contain between {} and {} keywords from the provided list. Only use keywords \
                 from the provided list.",
                settings.num_ad_groups,
                settings.min_keywords_per_group,
                settings.max_keywords_per_group
            ),
            format!(
                "**Generate Headlines:** For each ad group, generate exactly {} unique, professional, \
                 and high-CTR headlines. Each headline MUST be {} characters or less. At least {} \
                 headlines per group MUST include one of the keywords from that group. Vary the \
                 headlines: use questions, calls-to-action, and feature/benefit statements.",
                ad::HEADLINES_PER_GROUP,
                ad::HEADLINE_MAX_CHARS,
                ad::MIN_KEYWORD_HEADLINES
            ),
            format!(
                "**Generate Descriptions:** For each ad group, generate exactly {} unique and concise \
                 descriptions. Each description MUST be {} characters or less. The descriptions \
                 should complement the headlines and encourage clicks.",
                ad::DESCRIPTIONS_PER_GROUP,
                ad::DESCRIPTION_MAX_CHARS
            ),
            "**Output Format:** Provide the entire output as a single JSON array that strictly \
             adheres to the provided schema. Do not include any explanatory text, markdown \
             formatting, or anything else before or after the JSON array."
                .to_string(),
        ])
        .build()
}

/// Structured output schema: an array of ad group objects
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "description": "A list of ad groups.",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": {
                    "type": "STRING",
                    "description": "Descriptive name for the ad group."
                },
                "keywords": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "List of keywords belonging to this ad group."
                },
                "headlines": {
                    "type": "ARRAY",
                    "items": {
                        "type": "STRING",
                        "description": format!("A headline, {} characters or less.", ad::HEADLINE_MAX_CHARS)
                    },
                    "description": "List of generated ad headlines."
                },
                "descriptions": {
                    "type": "ARRAY",
                    "items": {
                        "type": "STRING",
                        "description": format!("A description, {} characters or less.", ad::DESCRIPTION_MAX_CHARS)
                    },
                    "description": "List of generated ad descriptions."
                }
            },
            "required": ["name", "keywords", "headlines", "descriptions"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn keywords() -> Vec<String> {
        vec![
            "custom t-shirt printing".to_string(),
            "bulk shirt orders".to_string(),
        ]
    }

    #[test]
    fn test_basic_prompt() {
        let prompt = PromptBuilder::new()
            .role("copywriter", "write ads")
            .section("Input Keywords", "tees, hoodies")
            .objectives(vec!["Group".to_string(), "Write".to_string()])
            .build();

        assert!(prompt.contains("**Input Keywords:**\ntees, hoodies\n\n**Instructions:**"));

        assert!(prompt.starts_with("You are an expert copywriter."));
        assert!(prompt.contains("1. Group"));
        assert!(prompt.contains("2. Write"));
    }

    #[test]
    fn test_prompt_lists_keywords_and_limits() {
        let prompt = build_prompt(&keywords(), &Settings::default());

        assert!(prompt.contains("custom t-shirt printing, bulk shirt orders"));
        assert!(prompt.contains("exactly 8 unique"));
        assert!(prompt.contains("30 characters or less"));
        assert!(prompt.contains("90 characters or less"));
        assert!(prompt.contains("single JSON array"));
    }

    #[test]
    fn test_prompt_passes_out_of_range_settings_through() {
        let prompt = build_prompt(&keywords(), &Settings::new(0, 12, 4));
        assert!(prompt.contains("exactly 0 distinct"));
        assert!(prompt.contains("between 12 and 4 keywords"));
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = response_schema();
        assert_eq!(schema["type"], "ARRAY");
        let required: Vec<&str> = schema["items"]["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(required, vec!["name", "keywords", "headlines", "descriptions"]);
    }

    proptest! {
        #[test]
        fn prop_prompt_contains_settings(groups in 1u32..500, min in 1u32..50, extra in 0u32..50) {
            let max = min + extra;
            let prompt = AdPrompt::new(&keywords(), &Settings::new(groups, min, max)).text;
            let groups_text = format!("exactly {} distinct", groups);
            let range_text = format!("between {} and {} keywords", min, max);
            prop_assert!(prompt.contains(&groups_text));
            prop_assert!(prompt.contains(&range_text));
        }
    }
}
