//! Core use-case services.
//!
//! # Responsibility
//! - Expose the per-entity operations used by app screens.
//! - Orchestrate notification fan-out after primary writes.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - Failures are logged here and returned unchanged to the caller.
//! - A failed notification write never undoes the primary write.

use crate::model::validation::ValidationError;
use crate::model::RecordId;
use crate::repo::collection_repo::RepoError;
use crate::store::StoreError;
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod appointment_service;
pub mod auth_service;
pub mod diagnostic_service;
pub mod maintenance_service;
pub mod notification_service;
pub mod notifier;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error for appointment, diagnostic, maintenance and notification use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    NotFound { entity: &'static str, id: RecordId },
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::Store(err) => Self::Store(err),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Logs a failed use-case result and hands it back unchanged.
pub(crate) fn log_failure<T, E: Display>(event: &str, result: Result<T, E>) -> Result<T, E> {
    if let Err(err) = &result {
        error!("event={event} module=service status=error error={err}");
    }
    result
}
