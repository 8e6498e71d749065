//! Markdown rendering of individual responses

use chrono::{DateTime, SecondsFormat, Utc};
use panel_application::{RenderedDocument, ResponseRenderer};
use panel_domain::LlmResponse;
use panel_domain::util::sanitize_file_component;

/// Renders each response as a standalone markdown document named
/// `<provider>-<model_id>.md`
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn file_name(response: &LlmResponse) -> String {
        format!(
            "{}-{}.md",
            sanitize_file_component(&response.provider),
            sanitize_file_component(&response.model_id)
        )
    }
}

impl ResponseRenderer for MarkdownRenderer {
    fn render(&self, response: &LlmResponse, generated_at: DateTime<Utc>) -> RenderedDocument {
        let mut content = format!("# {}\n\n", response.key());

        if let Some(group) = &response.group_info {
            content.push_str(&format!("*Group: {}*\n\n", group.name));
        }
        content.push_str(&format!(
            "Generated: {}\n\n",
            generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ));

        match &response.error {
            Some(error) => {
                content.push_str("## Error\n\n");
                match response.error_category {
                    Some(category) => {
                        content.push_str(&format!("{} ({})\n", error, category.label()))
                    }
                    None => content.push_str(&format!("{}\n", error)),
                }
            }
            None => {
                content.push_str("## Response\n\n");
                content.push_str(response.text.trim_end());
                content.push('\n');
            }
        }

        if !response.metadata.is_empty() {
            let json = serde_json::to_string_pretty(&response.metadata)
                .unwrap_or_else(|_| "{}".to_string());
            content.push_str(&format!("\n## Metadata\n\n```json\n{}\n```\n", json));
        }

        RenderedDocument {
            file_name: Self::file_name(response),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use panel_domain::{GroupInfo, ModelSpec, PanelError};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_success_document() {
        let spec = ModelSpec::new("openai", "gpt-4o");
        let response = LlmResponse::success(&spec, "The answer.\n\n")
            .with_group_info(GroupInfo::new("coding", "You review code."));

        let doc = MarkdownRenderer.render(&response, at());
        assert_eq!(doc.file_name, "openai-gpt-4o.md");
        assert_eq!(
            doc.content,
            "# openai:gpt-4o\n\n*Group: coding*\n\nGenerated: 2025-01-02T03:04:05.000Z\n\n## Response\n\nThe answer.\n"
        );
    }

    #[test]
    fn test_error_document_with_metadata() {
        let spec = ModelSpec::new("anthropic", "claude-3-7-sonnet-latest");
        let response = LlmResponse::failure(&spec, &PanelError::api("anthropic", "Rate limit exceeded"))
            .with_metadata("status", 429);

        let doc = MarkdownRenderer.render(&response, at());
        assert!(doc.content.contains("## Error\n\nRate limit exceeded (API)\n"));
        assert!(!doc.content.contains("## Response"));
        assert!(!doc.content.contains("*Group:"));
        assert!(doc.content.contains("## Metadata\n\n```json\n{\n  \"status\": 429\n}\n```\n"));
    }

    #[test]
    fn test_file_name_replaces_unsafe_characters() {
        let spec = ModelSpec::new("openrouter", "meta-llama/llama-3.1:free");
        let response = LlmResponse::success(&spec, "hi");
        assert_eq!(
            MarkdownRenderer::file_name(&response),
            "openrouter-meta-llama-llama-3.1-free.md"
        );
    }
}
