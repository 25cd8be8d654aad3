//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose screen-level use-cases to Dart via FRB.
//! - Translate core errors into stable, user-presentable messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Ids cross the boundary as strings, instants as epoch milliseconds.
//! - Raw error text is kept in `detail`; `message` is safe to show users.

use chrono::{DateTime, TimeZone, Utc};
use ecodrive_core::db::open_db;
use ecodrive_core::time_format::{format_date_time, format_relative_time};
use ecodrive_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    initialize_storage, ping as ping_inner, AppointmentService, AuthError, AuthService,
    DiagnosticService, MaintenanceService, NewAppointment, NewDiagnostic, Notification,
    NotificationService, PublicUser, RecordId, ServiceError, SqliteKeyValueStore,
    SqliteSecureStore,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const DB_FILE_NAME: &str = "ecodrive.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Id of the created or touched record, when there is one.
    pub id: Option<String>,
    /// User-presentable text.
    pub message: String,
    /// Raw error text for diagnostics; empty on success.
    pub detail: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
            detail: String::new(),
        }
    }

    fn failure(failure: Failure) -> Self {
        Self {
            ok: false,
            id: None,
            message: failure.message.to_string(),
            detail: failure.detail,
        }
    }
}

/// User as shown by profile and home screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentItem {
    pub id: String,
    pub service_type: String,
    pub scheduled_at_ms: i64,
    /// `dd/mm/yyyy HH:MM`.
    pub scheduled_label: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationItem {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at_ms: i64,
    /// Relative "time ago" label computed at call time.
    pub created_label: String,
}

/// Registers an account. Does not log in.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_register(name: String, email: String, password: String) -> ActionResponse {
    let result = with_stores(|store, secure| {
        AuthService::new(store, secure)
            .register(&name, &email, &password)
            .map_err(Failure::from)
    });
    match result {
        Ok(user) => ActionResponse::success("Account created.", Some(user.id.to_string())),
        Err(failure) => ActionResponse::failure(failure),
    }
}

/// Logs in and returns the session user id.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_login(email: String, password: String) -> ActionResponse {
    let result = with_stores(|store, secure| {
        AuthService::new(store, secure)
            .login(&email, &password)
            .map_err(Failure::from)
    });
    match result {
        Ok(session) => ActionResponse::success("Signed in.", Some(session.user.id.to_string())),
        Err(failure) => ActionResponse::failure(failure),
    }
}

/// Ends the persisted session, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_logout() -> ActionResponse {
    let result = with_stores(|store, secure| {
        let auth = AuthService::new(store, secure);
        match auth.restore_session() {
            Some(session) => auth.logout(session).map_err(Failure::from),
            None => Ok(()),
        }
    });
    match result {
        Ok(()) => ActionResponse::success("Signed out.", None),
        Err(failure) => ActionResponse::failure(failure),
    }
}

/// Returns the signed-in user, or `None` when signed out or on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_current_user() -> Option<UserView> {
    with_stores(|store, secure| {
        Ok(AuthService::new(store, secure)
            .restore_session()
            .map(|session| to_user_view(&session.user)))
    })
    .ok()
    .flatten()
}

#[flutter_rust_bridge::frb(sync)]
pub fn appointments_upcoming(user_id: String) -> Vec<AppointmentItem> {
    let result = with_stores(|store, _| {
        let user_id = parse_id(&user_id)?;
        Ok(AppointmentService::new(store)
            .upcoming_for_user(user_id)
            .into_iter()
            .map(|appointment| AppointmentItem {
                id: appointment.id.to_string(),
                service_type: appointment.service_type,
                scheduled_at_ms: appointment.scheduled_at.timestamp_millis(),
                scheduled_label: format_date_time(appointment.scheduled_at),
                status: enum_label(&appointment.status),
            })
            .collect())
    });
    result.unwrap_or_default()
}

#[flutter_rust_bridge::frb(sync)]
pub fn appointment_create(
    user_id: String,
    service_type: String,
    scheduled_at_ms: i64,
    notes: Option<String>,
) -> ActionResponse {
    let result = with_stores(|store, _| {
        let new = NewAppointment {
            user_id: parse_id(&user_id)?,
            service_type: service_type.trim().to_string(),
            scheduled_at: from_epoch_ms(scheduled_at_ms)?,
            status: None,
            notes: notes.filter(|notes| !notes.trim().is_empty()),
        };
        AppointmentService::new(store)
            .create(new)
            .map_err(Failure::from)
    });
    match result {
        Ok(created) => {
            ActionResponse::success("Appointment booked.", Some(created.id.to_string()))
        }
        Err(failure) => ActionResponse::failure(failure),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn diagnostic_create(
    user_id: String,
    symptoms: Vec<String>,
    description: Option<String>,
) -> ActionResponse {
    let result = with_stores(|store, _| {
        let new = NewDiagnostic {
            user_id: parse_id(&user_id)?,
            symptoms,
            description,
            date: None,
        };
        DiagnosticService::new(store)
            .create(new)
            .map_err(Failure::from)
    });
    match result {
        Ok(created) => ActionResponse::success(
            "Diagnostic request sent.",
            Some(created.id.to_string()),
        ),
        Err(failure) => ActionResponse::failure(failure),
    }
}

/// Total maintenance spend for the user; `0.0` on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn maintenance_total_cost(user_id: String) -> f64 {
    with_stores(|store, _| Ok(MaintenanceService::new(store).total_cost(parse_id(&user_id)?)))
        .unwrap_or(0.0)
}

#[flutter_rust_bridge::frb(sync)]
pub fn notifications_list(user_id: String) -> Vec<NotificationItem> {
    let result = with_stores(|store, _| {
        let user_id = parse_id(&user_id)?;
        let now = Utc::now();
        Ok(NotificationService::new(store)
            .list_for_user(user_id)
            .iter()
            .map(|notification| to_notification_item(notification, now))
            .collect())
    });
    result.unwrap_or_default()
}

#[flutter_rust_bridge::frb(sync)]
pub fn notifications_mark_all_read(user_id: String) -> ActionResponse {
    let result = with_stores(|store, _| {
        NotificationService::new(store)
            .mark_all_read(parse_id(&user_id)?)
            .map_err(Failure::from)
    });
    match result {
        Ok(count) => ActionResponse::success(format!("{count} notification(s) read."), None),
        Err(failure) => ActionResponse::failure(failure),
    }
}

/// Error split into user-facing text and raw detail.
struct Failure {
    message: &'static str,
    detail: String,
}

impl Failure {
    fn generic(detail: impl Into<String>) -> Self {
        Self {
            message: GENERIC_FAILURE_MESSAGE,
            detail: detail.into(),
        }
    }
}

impl From<AuthError> for Failure {
    fn from(value: AuthError) -> Self {
        let message = match &value {
            AuthError::Validation(_) => "Please check the highlighted fields.",
            AuthError::DuplicateEmail => "This email is already registered.",
            AuthError::InvalidCredentials => "Incorrect email or password. Please try again.",
            AuthError::UserNotFound(_) | AuthError::Store(_) => GENERIC_FAILURE_MESSAGE,
        };
        Self {
            message,
            detail: value.to_string(),
        }
    }
}

impl From<ServiceError> for Failure {
    fn from(value: ServiceError) -> Self {
        let message = match &value {
            ServiceError::Validation(_) => "Please fill in all required fields.",
            ServiceError::NotFound { .. } => "This item no longer exists.",
            ServiceError::Store(_) => GENERIC_FAILURE_MESSAGE,
        };
        Self {
            message,
            detail: value.to_string(),
        }
    }
}

fn with_stores<T>(
    f: impl FnOnce(&SqliteKeyValueStore<'_>, &SqliteSecureStore<'_>) -> Result<T, Failure>,
) -> Result<T, Failure> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| Failure::generic(format!("db open failed: {err}")))?;
    let store = SqliteKeyValueStore::try_new(&conn)
        .map_err(|err| Failure::generic(format!("store init failed: {err}")))?;
    let secure = SqliteSecureStore::try_new(&conn)
        .map_err(|err| Failure::generic(format!("secure store init failed: {err}")))?;
    initialize_storage(&store)
        .map_err(|err| Failure::generic(format!("storage bootstrap failed: {err}")))?;

    let result = f(&store, &secure);
    if let Err(failure) = &result {
        warn!(
            "event=ffi_call module=ffi status=error detail={}",
            failure.detail
        );
    }
    result
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("ECODRIVE_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn parse_id(raw: &str) -> Result<RecordId, Failure> {
    Uuid::parse_str(raw.trim()).map_err(|_| Failure::generic(format!("invalid id `{raw}`")))
}

fn from_epoch_ms(value: i64) -> Result<DateTime<Utc>, Failure> {
    Utc.timestamp_millis_opt(value)
        .single()
        .ok_or_else(|| Failure::generic(format!("invalid timestamp {value}")))
}

/// Serialized snake_case name of a unit enum variant.
fn enum_label<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|json| json.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn to_user_view(user: &PublicUser) -> UserView {
    UserView {
        id: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: enum_label(&user.role),
    }
}

fn to_notification_item(notification: &Notification, now: DateTime<Utc>) -> NotificationItem {
    NotificationItem {
        id: notification.id.to_string(),
        kind: enum_label(&notification.kind()),
        title: notification.title().to_string(),
        message: notification.message(),
        read: notification.read,
        created_at_ms: notification.created_at.timestamp_millis(),
        created_label: format_relative_time(notification.created_at, now),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        appointment_create, appointments_upcoming, auth_current_user, auth_login, auth_logout,
        auth_register, core_version, diagnostic_create, init_logging, maintenance_total_cost,
        notifications_list, notifications_mark_all_read, ping, resolve_db_path,
    };
    use chrono::{TimeZone, Utc};
    use ecodrive_core::time_format::format_date_time;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn register_login_and_book_flow() {
        let email = format!("{}@example.com", unique_token("driver"));
        let registered = auth_register("Driver".to_string(), email.clone(), "s3cret!".to_string());
        assert!(registered.ok, "{}", registered.detail);

        let duplicate = auth_register("Other".to_string(), email.to_uppercase(), "s3cret!".to_string());
        assert!(!duplicate.ok);
        assert_eq!(duplicate.message, "This email is already registered.");

        let bad_login = auth_login(email.clone(), "wrong-pass".to_string());
        assert!(!bad_login.ok);
        assert_eq!(bad_login.message, "Incorrect email or password. Please try again.");

        let login = auth_login(email.clone(), "s3cret!".to_string());
        assert!(login.ok, "{}", login.detail);
        let user_id = login.id.clone().expect("login should return user id");
        assert_eq!(login.id, registered.id);

        let tomorrow_ms = now_ms() + 86_400_000;
        let booked = appointment_create(
            user_id.clone(),
            "oil_change".to_string(),
            tomorrow_ms,
            Some("  ".to_string()),
        );
        assert!(booked.ok, "{}", booked.detail);

        let upcoming = appointments_upcoming(user_id.clone());
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].status, "pending");
        assert_eq!(upcoming[0].scheduled_at_ms, tomorrow_ms);
        let tomorrow = Utc.timestamp_millis_opt(tomorrow_ms).unwrap();
        assert_eq!(upcoming[0].scheduled_label, format_date_time(tomorrow));

        let diagnostic = diagnostic_create(user_id.clone(), vec!["noise".to_string()], None);
        assert!(diagnostic.ok, "{}", diagnostic.detail);

        let listed = notifications_list(user_id.clone());
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|item| !item.read));
        assert!(listed.iter().any(|item| item.kind == "appointment"));
        assert!(listed.iter().all(|item| item.created_label == "just now"));

        let marked = notifications_mark_all_read(user_id.clone());
        assert!(marked.ok);
        assert!(notifications_list(user_id.clone()).iter().all(|item| item.read));

        assert_eq!(maintenance_total_cost(user_id), 0.0);
    }

    #[test]
    fn invalid_ids_fail_softly() {
        assert!(appointments_upcoming("not-a-uuid".to_string()).is_empty());
        let response = appointment_create(
            "not-a-uuid".to_string(),
            "oil_change".to_string(),
            now_ms(),
            None,
        );
        assert!(!response.ok);
        assert!(response.detail.contains("invalid id"));
    }

    #[test]
    fn logout_is_safe_without_session_and_db_path_is_stable() {
        let _ = auth_current_user();
        assert!(auth_logout().ok);
        assert_eq!(resolve_db_path(), resolve_db_path());
    }

    fn now_ms() -> i64 {
        i64::try_from(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("time went backwards")
                .as_millis(),
        )
        .expect("epoch millis fit in i64")
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
