use crate::domain::analysis::AgentResponse;
use once_cell::sync::Lazy;
use regex::Regex;

/// Anything after this marker is provider metadata echoed into the text.
pub const METADATA_MARKER: &str = "response_metadata";
pub const CONTENT_PREFIX: &str = "content=";
pub const EMPTY_RESPONSE_NOTICE: &str = "A análise não retornou conteúdo.";

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Turns whatever the agent returned into the string shown in the transcript.
/// Never fails and never returns an empty string.
pub fn format_agent_response(response: &AgentResponse) -> String {
    let content = match response {
        AgentResponse::Structured { completion } => completion.content.as_str(),
        AgentResponse::RawText { text } => text.as_str(),
    };

    let cleaned = clean_llm_response(content);
    if cleaned.is_empty() {
        EMPTY_RESPONSE_NOTICE.to_string()
    } else {
        cleaned
    }
}

/// Cuts at the metadata marker, drops `content=` prefixes and surrounding
/// quotes, then removes reasoning tags some models emit.
pub fn clean_llm_response(response: &str) -> String {
    let head = response.split(METADATA_MARKER).next().unwrap_or_default();

    let mut cleaned = head.replace(CONTENT_PREFIX, "");
    cleaned = THINK_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    cleaned = cleaned
        .trim_matches(|c: char| c == '\'' || c == '"' || c.is_whitespace())
        .to_string();

    MULTIPLE_NEWLINES_PATTERN
        .replace_all(&cleaned, "\n\n")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm_config::Completion;

    #[test]
    fn test_truncates_at_metadata_marker() {
        let input = "content='Resposta final' response_metadata={'id': 'msg_1'}";
        assert_eq!(clean_llm_response(input), "Resposta final");
    }

    #[test]
    fn test_strips_content_prefix_and_quotes() {
        assert_eq!(clean_llm_response("content=\"Olá\""), "Olá");
    }

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>raciocínio</think>A resposta";
        assert_eq!(clean_llm_response(input), "A resposta");
    }

    #[test]
    fn test_clean_multiple_newlines() {
        let input = "Linha 1\n\n\n\n\nLinha 2";
        assert_eq!(clean_llm_response(input), "Linha 1\n\nLinha 2");
    }

    #[test]
    fn test_clean_preserves_normal_text() {
        let input = "O departamento de TI tem a maior média salarial.";
        assert_eq!(clean_llm_response(input), input);
    }

    #[test]
    fn test_structured_uses_completion_content() {
        let response = AgentResponse::Structured {
            completion: Completion {
                content: "Análise pronta".to_string(),
                model: Some("claude-3-opus-20240229".to_string()),
                stop_reason: Some("end_turn".to_string()),
                input_tokens: Some(10),
                output_tokens: Some(3),
            },
        };
        assert_eq!(format_agent_response(&response), "Análise pronta");
    }

    #[test]
    fn test_raw_text_is_never_empty() {
        for input in ["", "   ", "''", "response_metadata={}", "content="] {
            let out = format_agent_response(&AgentResponse::raw(input));
            assert!(!out.is_empty(), "empty output for {:?}", input);
        }
        assert_eq!(
            format_agent_response(&AgentResponse::raw("")),
            EMPTY_RESPONSE_NOTICE
        );
    }

    #[test]
    fn test_error_text_passes_through() {
        let text = "Erro ao processar a análise: LLM error: API error (401 Unauthorized): {}";
        assert_eq!(format_agent_response(&AgentResponse::raw(text)), text);
    }
}
