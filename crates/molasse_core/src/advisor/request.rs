//! Request payloads for the advisor provider.

use super::prompt::{lab_analysis_prompt, LabAnalysisKind};
use super::{ChatMessage, ChatRole, InlineImage};
use crate::config::AdvisorConfig;
use serde::Serialize;

/// One generation call, laid out like a `generateContent` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorRequest {
    pub model: String,
    pub contents: Vec<ContentTurn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<u32>,
    /// Ask the provider for search grounding (sources in the reply).
    pub use_search: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentTurn {
    pub role: ChatRole,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Text(String),
    InlineData(InlineImage),
}

/// Conversation request over the full history.
///
/// `image` is attached to the last turn when that turn is the user's.
pub fn advice_request(
    config: &AdvisorConfig,
    history: &[ChatMessage],
    image: Option<&InlineImage>,
) -> AdvisorRequest {
    let last_index = history.len().checked_sub(1);
    let contents = history
        .iter()
        .enumerate()
        .map(|(index, message)| {
            let mut parts = vec![Part::Text(message.content.clone())];
            if let Some(image) = image {
                if Some(index) == last_index && message.role == ChatRole::User {
                    parts.push(Part::InlineData(image.clone()));
                }
            }
            ContentTurn {
                role: message.role,
                parts,
            }
        })
        .collect();

    AdvisorRequest {
        model: config.advice_model.clone(),
        contents,
        system_instruction: Some(config.system_instruction.clone()),
        thinking_budget: Some(config.thinking_budget),
        use_search: false,
    }
}

/// Single-turn lab analysis with search grounding.
pub fn lab_request(config: &AdvisorConfig, kind: LabAnalysisKind, data_json: &str) -> AdvisorRequest {
    single_turn(
        config.lab_model.clone(),
        lab_analysis_prompt(kind, data_json),
    )
}

/// Free-text grounded lookup.
pub fn search_request(config: &AdvisorConfig, query: &str) -> AdvisorRequest {
    single_turn(config.search_model.clone(), query.trim().to_string())
}

fn single_turn(model: String, text: String) -> AdvisorRequest {
    AdvisorRequest {
        model,
        contents: vec![ContentTurn {
            role: ChatRole::User,
            parts: vec![Part::Text(text)],
        }],
        system_instruction: None,
        thinking_budget: None,
        use_search: true,
    }
}

#[cfg(test)]
mod tests {
    use super::{advice_request, lab_request, Part};
    use crate::advisor::prompt::LabAnalysisKind;
    use crate::advisor::{ChatMessage, InlineImage};
    use crate::config::AdvisorConfig;

    fn image() -> InlineImage {
        InlineImage {
            mime_type: "image/png".to_string(),
            data: "AAAA".to_string(),
        }
    }

    #[test]
    fn image_is_attached_to_final_user_turn_only() {
        let config = AdvisorConfig::default();
        let history = vec![
            ChatMessage::model("Greetings."),
            ChatMessage::user("first"),
            ChatMessage::user("thin section attached"),
        ];
        let request = advice_request(&config, &history, Some(&image()));
        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[1].parts.len(), 1);
        assert_eq!(request.contents[2].parts.len(), 2);
        assert_eq!(request.contents[2].parts[1], Part::InlineData(image()));
        assert_eq!(request.model, config.advice_model);
        assert_eq!(request.thinking_budget, Some(32_768));
    }

    #[test]
    fn image_is_dropped_when_last_turn_is_model() {
        let config = AdvisorConfig::default();
        let history = vec![ChatMessage::user("hi"), ChatMessage::model("hello")];
        let request = advice_request(&config, &history, Some(&image()));
        assert!(request.contents.iter().all(|turn| turn.parts.len() == 1));
    }

    #[test]
    fn request_serializes_with_camel_case_wire_names() {
        let config = AdvisorConfig::default();
        let request = advice_request(&config, &[ChatMessage::user("look")], Some(&image()));
        let json = serde_json::to_value(&request).expect("request serializes");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "look");
        assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/png");
        assert!(json["systemInstruction"].is_string());
        assert_eq!(json["useSearch"], false);
    }

    #[test]
    fn lab_request_uses_lab_model_with_search() {
        let config = AdvisorConfig::default();
        let request = lab_request(&config, LabAnalysisKind::DickinsonQfl, "{}");
        assert_eq!(request.model, config.lab_model);
        assert!(request.use_search);
        assert!(request.system_instruction.is_none());
        let json = serde_json::to_value(&request).expect("request serializes");
        assert!(json.get("thinkingBudget").is_none());
    }
}
