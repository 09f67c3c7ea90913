use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::models::ScheduleData;

/// Fixed key of the single aggregate document. Everything the console edits
/// lives under this one path; every save overwrites it, last writer wins.
pub const DOCUMENT_KEY: &str = "schedules/default_school";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cloud store is not configured")]
    NotConfigured,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Cloud store responded with {0}")]
    Status(String),
}

/// Wire shape of the persisted document: the aggregate sections at the top
/// level plus a write timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    #[serde(flatten)]
    pub data: ScheduleData,
    pub updated_at: DateTime<Utc>,
}

impl StoredDocument {
    /// Overwrites each in-memory section the document carries a non-empty
    /// value for. Absent or empty sections leave the caller's state alone.
    pub fn apply(self, data: &mut ScheduleData) {
        if self.data.school.is_some() {
            data.school = self.data.school;
        }
        if !self.data.classes.is_empty() {
            data.classes = self.data.classes;
        }
        if !self.data.teachers.is_empty() {
            data.teachers = self.data.teachers;
        }
        if !self.data.subjects.subjects.is_empty() || !self.data.subjects.rooms.is_empty() {
            data.subjects = self.data.subjects;
        }
    }
}

#[derive(Clone)]
pub struct DocumentStore {
    client: reqwest::Client,
    document_url: Option<Url>,
}

impl DocumentStore {
    pub fn new(base_url: Option<&Url>) -> Self {
        let document_url = base_url.and_then(|base| {
            Url::parse(&format!(
                "{}/{}",
                base.as_str().trim_end_matches('/'),
                DOCUMENT_KEY
            ))
            .ok()
        });
        Self {
            client: reqwest::Client::new(),
            document_url,
        }
    }

    /// Fetches the aggregate document. `Ok(None)` means the document does
    /// not exist yet and the caller keeps its defaults.
    pub async fn load(&self) -> Result<Option<StoredDocument>, StoreError> {
        let url = self.document_url.as_ref().ok_or(StoreError::NotConfigured)?;
        let response = self.client.get(url.as_str()).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().to_string()));
        }
        let document = response.json().await?;
        Ok(Some(document))
    }

    /// Serializes the whole aggregate and overwrites the document
    /// unconditionally. No optimistic concurrency, no partial update.
    pub async fn save(&self, data: &ScheduleData) -> Result<DateTime<Utc>, StoreError> {
        let url = self.document_url.as_ref().ok_or(StoreError::NotConfigured)?;
        let document = StoredDocument {
            data: data.clone(),
            updated_at: Utc::now(),
        };
        let response = self
            .client
            .put(url.as_str())
            .json(&document)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().to_string()));
        }
        Ok(document.updated_at)
    }

    pub fn is_configured(&self) -> bool {
        self.document_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Availability, Teacher};

    fn sample_data() -> ScheduleData {
        ScheduleData {
            teachers: vec![Teacher {
                id: 7,
                name: "João Silva".to_string(),
                subjects: vec!["Matemática".to_string()],
                availability: Availability::default(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_document_serializes_flat_with_updated_at() {
        let doc = StoredDocument {
            data: sample_data(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("teachers").is_some());
        assert!(json.get("school").is_some());
        assert!(json.get("subjects").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_document_roundtrip_preserves_sections() {
        let doc = StoredDocument {
            data: sample_data(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&doc).unwrap();
        let back: StoredDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data, doc.data);
    }

    #[test]
    fn test_apply_skips_empty_sections() {
        let mut current = sample_data();
        let loaded = StoredDocument {
            data: ScheduleData::default(),
            updated_at: Utc::now(),
        };
        loaded.apply(&mut current);
        assert_eq!(current.teachers.len(), 1);
    }

    #[test]
    fn test_apply_overwrites_present_sections() {
        let mut current = ScheduleData::default();
        let loaded = StoredDocument {
            data: sample_data(),
            updated_at: Utc::now(),
        };
        loaded.apply(&mut current);
        assert_eq!(current.teachers.len(), 1);
        assert_eq!(current.teachers[0].name, "João Silva");
    }

    #[test]
    fn test_unconfigured_store() {
        let store = DocumentStore::new(None);
        assert!(!store.is_configured());
    }

    #[test]
    fn test_document_url_built_from_base() {
        let base = Url::parse("https://store.example.com/").unwrap();
        let store = DocumentStore::new(Some(&base));
        assert!(store.is_configured());
        assert_eq!(
            store.document_url.as_ref().unwrap().as_str(),
            "https://store.example.com/schedules/default_school"
        );
    }
}
