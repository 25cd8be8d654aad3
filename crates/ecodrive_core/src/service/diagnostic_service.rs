//! Diagnostic request use-case service.
//!
//! # Invariants
//! - User listings are sorted by `date DESC`.
//! - Completing with recommendations always sets status `completed`.

use super::notifier::Notifier;
use super::{log_failure, ServiceResult};
use crate::model::diagnostic::{Diagnostic, DiagnosticStatus, NewDiagnostic};
use crate::model::RecordId;
use crate::repo::collection_repo::CollectionRepository;
use crate::store::KeyValueStore;
use chrono::Utc;
use log::info;
use uuid::Uuid;

pub struct DiagnosticService<'s, S: ?Sized> {
    repo: CollectionRepository<'s, S, Diagnostic>,
    notifier: Notifier<'s, S>,
}

impl<'s, S: KeyValueStore + ?Sized> DiagnosticService<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            repo: CollectionRepository::new(store),
            notifier: Notifier::new(store),
        }
    }

    pub fn list_for_user(&self, user_id: RecordId) -> Vec<Diagnostic> {
        let mut diagnostics = self
            .repo
            .list_where(|diagnostic| diagnostic.user_id == user_id);
        diagnostics.sort_by(|a, b| b.date.cmp(&a.date));
        diagnostics
    }

    pub fn get(&self, id: RecordId) -> Option<Diagnostic> {
        self.repo.get(id)
    }

    /// Submits a pending diagnostic request.
    pub fn create(&self, new: NewDiagnostic) -> ServiceResult<Diagnostic> {
        log_failure("diagnostic_create", new.validate())?;

        let diagnostic = Diagnostic {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            symptoms: new.symptoms,
            mechanic_id: None,
            recommendations: String::new(),
            date: new.date.unwrap_or_else(Utc::now),
            status: DiagnosticStatus::Pending,
            description: new.description,
        };

        let created = log_failure("diagnostic_create", self.repo.insert(diagnostic))?;
        info!(
            "event=diagnostic_create module=service status=ok diagnostic_id={} symptoms={}",
            created.id,
            created.symptoms.len()
        );
        self.notifier.diagnostic(&created);
        Ok(created)
    }

    pub fn update_status(
        &self,
        id: RecordId,
        status: DiagnosticStatus,
    ) -> ServiceResult<Diagnostic> {
        let updated = log_failure(
            "diagnostic_update_status",
            self.repo.update(id, |diagnostic| diagnostic.status = status),
        )?;
        self.notifier.diagnostic(&updated);
        Ok(updated)
    }

    /// Records the mechanic's answer and marks the diagnostic completed.
    pub fn complete_with_recommendations(
        &self,
        id: RecordId,
        mechanic_id: RecordId,
        recommendations: impl Into<String>,
    ) -> ServiceResult<Diagnostic> {
        let recommendations = recommendations.into();
        let updated = log_failure(
            "diagnostic_complete",
            self.repo.update(id, |diagnostic| {
                diagnostic.mechanic_id = Some(mechanic_id);
                diagnostic.recommendations = recommendations;
                diagnostic.status = DiagnosticStatus::Completed;
            }),
        )?;
        self.notifier.diagnostic(&updated);
        Ok(updated)
    }

    pub fn delete(&self, id: RecordId) -> ServiceResult<bool> {
        Ok(log_failure("diagnostic_delete", self.repo.delete(id))?)
    }
}
