//! Core domain logic for EcoDrive.
//! This crate is the single source of truth for app data and its invariants.

pub mod crypto;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod time_format;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::appointment::{Appointment, AppointmentChanges, AppointmentStatus, NewAppointment};
pub use model::diagnostic::{Diagnostic, DiagnosticStatus, NewDiagnostic};
pub use model::maintenance::{MaintenanceChanges, MaintenanceRecord, NewMaintenanceRecord};
pub use model::notification::{
    NewNotification, Notification, NotificationKind, NotificationPayload,
};
pub use model::user::{ProfileUpdate, PublicUser, Role, User};
pub use model::validation::ValidationError;
pub use model::{Entity, RecordId};
pub use repo::collection_repo::{CollectionRepository, RepoError, RepoResult};
pub use service::appointment_service::AppointmentService;
pub use service::auth_service::{AuthError, AuthResult, AuthService, Session};
pub use service::diagnostic_service::DiagnosticService;
pub use service::maintenance_service::MaintenanceService;
pub use service::notification_service::NotificationService;
pub use service::{ServiceError, ServiceResult};
pub use store::{
    clear_all_data, initialize_storage, CollectionKey, KeyValueStore, SecureStore,
    SqliteKeyValueStore, SqliteSecureStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
