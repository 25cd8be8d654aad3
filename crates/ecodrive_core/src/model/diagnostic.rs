//! Diagnostic requests submitted by drivers and answered by mechanics.

use super::validation::ValidationError;
use super::{Entity, RecordId};
use crate::store::CollectionKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: RecordId,
    pub user_id: RecordId,
    /// Symptoms in the order the driver selected them.
    pub symptoms: Vec<String>,
    pub mechanic_id: Option<RecordId>,
    /// Empty until a mechanic completes the diagnostic.
    pub recommendations: String,
    pub date: DateTime<Utc>,
    pub status: DiagnosticStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for Diagnostic {
    const COLLECTION: CollectionKey = CollectionKey::Diagnostics;
    const NAME: &'static str = "diagnostic";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Input for submitting a diagnostic request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDiagnostic {
    pub user_id: RecordId,
    pub symptoms: Vec<String>,
    pub description: Option<String>,
    /// Defaults to now.
    pub date: Option<DateTime<Utc>>,
}

impl NewDiagnostic {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.symptoms.iter().all(|symptom| symptom.trim().is_empty()) {
            return Err(ValidationError::NoSymptoms);
        }
        Ok(())
    }
}
