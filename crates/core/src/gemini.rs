use crate::config::GeminiConfig;
use crate::traits::TextGenerator;
use crate::FallbackError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

const API_KEY_HEADER: &str = "x-goog-api-key";

pub const NO_ANSWER: &str = "I don't have an answer right now.";

const SYSTEM_INSTRUCTION: &str = "You are an assistant specialized in space biology. \
Answer concisely and factually. If relevant, structure as: Short summary (2–3 lines), \
Detailed answer, Numbered sources (if provided), and 2 suggested follow-up queries.";

/// `generateContent` client for the Gemini API.
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(client: Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn endpoint(&self) -> Result<Url, FallbackError> {
        let raw = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        Ok(Url::parse(&raw)?)
    }
}

pub fn build_prompt(question: &str) -> String {
    format!("{SYSTEM_INSTRUCTION}\n\nQuestion: {question}")
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Default)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, question: &str) -> Result<String, FallbackError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(FallbackError::MissingCredential)?;

        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: build_prompt(question),
                }],
            }],
        };

        // The key travels in a header so transport errors, which carry the
        // URL, never contain it.
        let response = self
            .client
            .post(self.endpoint()?)
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(|error| FallbackError::Http(error.without_url()))?;

        if !response.status().is_success() {
            return Err(FallbackError::Status(response.status().as_u16()));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|error| FallbackError::Http(error.without_url()))?;
        Ok(candidate_text(&body))
    }
}

/// Joins the parts of the first candidate; an empty answer becomes
/// [`NO_ANSWER`].
fn candidate_text(body: &GenerateResponse) -> String {
    let text = body
        .candidates
        .first()
        .map(|candidate| {
            candidate
                .content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        NO_ANSWER.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> GenerateResponse {
        serde_json::from_str(raw).unwrap_or_default()
    }

    #[test]
    fn joins_parts_of_first_candidate() {
        let body = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Line one"},{"text":"Line two"}]}},
                {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        );
        assert_eq!(candidate_text(&body), "Line one\nLine two");
    }

    #[test]
    fn empty_answers_get_placeholder() {
        assert_eq!(candidate_text(&parse(r#"{"candidates":[]}"#)), NO_ANSWER);
        assert_eq!(candidate_text(&parse(r#"{"promptFeedback":{}}"#)), NO_ANSWER);
        assert_eq!(
            candidate_text(&parse(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#)),
            NO_ANSWER
        );
    }

    #[test]
    fn prompt_carries_instruction_and_question() {
        let prompt = build_prompt("How does microgravity affect bone?");
        assert!(prompt.starts_with("You are an assistant specialized in space biology."));
        assert!(prompt.ends_with("Question: How does microgravity affect bone?"));
    }

    #[test]
    fn endpoint_embeds_model_without_credentials() -> Result<(), FallbackError> {
        let client = GeminiClient::new(Client::new(), GeminiConfig::default());
        let url = client.endpoint()?;
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent"
        );
        assert!(url.query().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn transport_errors_never_carry_the_api_key() {
        let client = GeminiClient::new(
            Client::new(),
            GeminiConfig {
                base_url: "http://127.0.0.1:9/v1beta".to_string(),
                model: "m".to_string(),
                api_key: Some("SUPERSECRETKEY".to_string()),
            },
        );

        let error = match client.generate("q").await {
            Ok(text) => panic!("unreachable host answered: {text}"),
            Err(error) => error,
        };
        assert!(matches!(error, FallbackError::Http(_)));
        assert!(!error.to_string().contains("SUPERSECRETKEY"));
        assert!(!format!("{error:?}").contains("SUPERSECRETKEY"));
    }

    #[tokio::test]
    async fn missing_key_fails_without_calling_out() {
        let client = GeminiClient::new(Client::new(), GeminiConfig::default());
        assert!(!client.is_configured());
        let result = client.generate("anything").await;
        assert!(matches!(result, Err(FallbackError::MissingCredential)));
    }
}
