use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::models::{LessonSlot, ScheduleData};

pub const GENERATE_PATH: &str = "v1beta/models/gemini-pro:generateContent";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Generation API responded with {0}")]
    Api(String),
    #[error("Generation API returned no candidates")]
    EmptyResponse,
    #[error("Generated timetable is not a valid lesson array: {0}")]
    MalformedTimetable(String),
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Client for the external text-generation endpoint. Serializes the aggregate
/// into a fixed instruction prompt, posts it with the caller's key as a query
/// parameter and validates the reply into lesson slots. The key is taken per
/// call and never stored or logged.
#[derive(Clone)]
pub struct ScheduleGenerator {
    client: reqwest::Client,
    endpoint: Url,
    fence_regex: Regex,
}

impl ScheduleGenerator {
    pub fn new(base_url: &Url) -> Self {
        let endpoint = Url::parse(&format!(
            "{}/{}",
            base_url.as_str().trim_end_matches('/'),
            GENERATE_PATH
        ))
        .expect("generation endpoint URL is valid");
        Self {
            client: reqwest::Client::new(),
            endpoint,
            fence_regex: Regex::new(r"(?s)```(?:json)?\s*(.+?)\s*```").expect("regex compiles"),
        }
    }

    /// The full instruction sent upstream. The aggregate JSON is embedded
    /// verbatim between the header and the rule list.
    pub fn build_prompt(&self, data: &ScheduleData) -> String {
        let json = serde_json::to_string_pretty(data).expect("aggregate serializes");
        format!(
            "Act as a school timetabling expert. Generate an optimized school \
             timetable from the following JSON data:\n\n{json}\n\nRules:\n\
             1. Respect teacher availability.\n\
             2. Do not exceed room capacity.\n\
             3. Distribute lessons evenly across the week.\n\
             4. Return ONLY the JSON of the generated timetable, without markdown or explanations.\n\
             5. The output must be a JSON array of objects: \
             {{ \"classId\": \"...\", \"day\": \"mon\", \"period\": 1, \
             \"subject\": \"...\", \"teacher\": \"...\", \"room\": \"...\" }}"
        )
    }

    /// One synchronous POST, no retry. Returns the raw text of the first
    /// candidate; any non-success status collapses into a single error
    /// carrying the status text.
    pub async fn generate(
        &self,
        data: &ScheduleData,
        api_key: &str,
    ) -> Result<String, GenerateError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("key", api_key);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: self.build_prompt(data),
                }],
            }],
        };

        let response = self.client.post(url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(GenerateError::Api(response.status().to_string()));
        }

        let body: GenerateResponse = response.json().await?;
        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(GenerateError::EmptyResponse)
    }

    /// Validates the model's reply instead of trusting it verbatim: strips
    /// markdown fences, isolates the array and deserializes every slot.
    pub fn parse_timetable(&self, text: &str) -> Result<Vec<LessonSlot>, GenerateError> {
        let inner = self
            .fence_regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(text);

        let array = match (inner.find('['), inner.rfind(']')) {
            (Some(start), Some(end)) if start < end => &inner[start..=end],
            _ => inner.trim(),
        };

        serde_json::from_str(array).map_err(|err| GenerateError::MalformedTimetable(err.to_string()))
    }
}
