//! Gemini `generateContent` adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{PlanProposal, PlanRequest, StudyPlanner, MAX_SESSION_MINUTES, MIN_SESSION_MINUTES};
use crate::error::PlanningError;
use crate::storage::PlannerConfig;

pub const FALLBACK_QUOTE: &str = "You've got this. One step at a time.";
pub const UNCONFIGURED_QUOTE: &str = "Please configure your API key.";

const QUOTE_PROMPT: &str = "Give me a short, punchy, non-cringe motivational quote for a \
university student who is stressed about exams. Keep it under 20 words.";

pub struct GeminiPlanner {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiPlanner {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.resolved_api_key(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// POST a request body and return the first candidate's text.
    async fn generate(&self, body: Value) -> Result<String, PlanningError> {
        let key = self.api_key.as_deref().ok_or(PlanningError::MissingApiKey)?;
        let resp: Value = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        resp["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<String>()
            })
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| PlanningError::MalformedResponse("no candidate text".into()))
    }

    /// A short motivational line. Never fails.
    pub async fn motivational_quote(&self) -> String {
        if !self.is_configured() {
            return UNCONFIGURED_QUOTE.to_string();
        }
        match self.generate(text_request(QUOTE_PROMPT)).await {
            Ok(text) => text.replace('"', "").trim().to_string(),
            Err(e) => {
                warn!(error = %e, "motivational quote request failed");
                FALLBACK_QUOTE.to_string()
            }
        }
    }

    /// Name of the task to tackle first, or an empty string on any failure.
    pub async fn suggest_priority(&self, titles: &[String]) -> String {
        if !self.is_configured() || titles.is_empty() {
            return String::new();
        }
        let prompt = format!(
            "I have these tasks: {}. Which one should I do first for maximum impact? \
             Reply with just the task name.",
            titles.join(", ")
        );
        match self.generate(text_request(&prompt)).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                debug!(error = %e, "priority suggestion failed");
                String::new()
            }
        }
    }
}

#[async_trait]
impl StudyPlanner for GeminiPlanner {
    async fn generate_plan(
        &self,
        request: &PlanRequest,
    ) -> Result<Vec<PlanProposal>, PlanningError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": plan_prompt(request) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "topic": { "type": "STRING", "description": "Focus topic for the session" },
                            "daysFromNow": { "type": "INTEGER", "description": "Number of days from today (0 is today, 1 is tomorrow)" },
                            "durationMinutes": { "type": "INTEGER", "description": "Duration in minutes" }
                        },
                        "required": ["topic", "daysFromNow", "durationMinutes"]
                    }
                }
            }
        });

        let text = self.generate(body).await?;
        serde_json::from_str(&text).map_err(|e| PlanningError::MalformedResponse(e.to_string()))
    }
}

fn text_request(prompt: &str) -> Value {
    json!({ "contents": [{ "parts": [{ "text": prompt }] }] })
}

fn plan_prompt(request: &PlanRequest) -> String {
    format!(
        "I have a {difficulty} difficulty exam on {subject} in {days} days (Date: {date}).\n\
         Generate a study plan.\n\
         Create a list of specific study sessions.\n\
         Each session should have a topic and a duration in minutes \
         (between {MIN_SESSION_MINUTES} and {MAX_SESSION_MINUTES}).\n\
         Do not schedule sessions on the day of the exam.\n\
         Balance the load.",
        difficulty = request.difficulty,
        subject = request.subject,
        days = request.days_until(),
        date = request.date,
    )
}
