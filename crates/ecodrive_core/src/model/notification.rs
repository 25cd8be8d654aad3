//! In-app notifications and their display text.
//!
//! # Invariants
//! - Payload shape is determined by notification kind; the pair is stored
//!   as `type` + `payload` fields of the record.
//! - Display text is derived from the payload alone and never fails.
//! - Stored records with an unknown `type` or a malformed payload still
//!   decode, as `General` notifications carrying any `payload.message`.

use super::appointment::AppointmentStatus;
use super::diagnostic::DiagnosticStatus;
use super::{Entity, RecordId};
use crate::store::CollectionKey;
use crate::time_format::format_date;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification category, serialized as the record `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Reminder,
    Appointment,
    Maintenance,
    Diagnostic,
    General,
}

/// Kind-specific notification data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum NotificationPayload {
    Reminder {
        #[serde(default)]
        service_type: Option<String>,
        #[serde(default)]
        last_service_date: Option<DateTime<Utc>>,
    },
    Appointment {
        appointment_id: RecordId,
        service_type: String,
        date: DateTime<Utc>,
        status: AppointmentStatus,
    },
    Maintenance {
        maintenance_id: RecordId,
        service_type: String,
        cost: f64,
        #[serde(default)]
        status: Option<String>,
    },
    Diagnostic {
        diagnostic_id: RecordId,
        status: DiagnosticStatus,
    },
    General {
        #[serde(default)]
        message: Option<String>,
    },
}

impl NotificationPayload {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::Reminder { .. } => NotificationKind::Reminder,
            Self::Appointment { .. } => NotificationKind::Appointment,
            Self::Maintenance { .. } => NotificationKind::Maintenance,
            Self::Diagnostic { .. } => NotificationKind::Diagnostic,
            Self::General { .. } => NotificationKind::General,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind() {
            NotificationKind::Reminder => "Maintenance reminder",
            NotificationKind::Appointment => "Appointment",
            NotificationKind::Maintenance => "Maintenance",
            NotificationKind::Diagnostic => "Diagnostic",
            NotificationKind::General => "Notification",
        }
    }

    /// Builds the user-facing message, falling back to default wording
    /// whenever an optional payload field is missing or blank.
    pub fn message(&self) -> String {
        match self {
            Self::Reminder { service_type, .. } => format!(
                "It's time to schedule your next {} service.",
                non_blank(service_type.as_deref()).unwrap_or("regular")
            ),
            Self::Appointment { date, status, .. } => {
                let wording = if *status == AppointmentStatus::Confirmed {
                    "has been confirmed"
                } else {
                    "is coming up"
                };
                format!("Your appointment {wording} on {}.", format_date(*date))
            }
            Self::Maintenance {
                service_type,
                status,
                ..
            } => {
                let subject = match non_blank(Some(service_type.as_str())) {
                    Some(service) => format!("Your {service} service"),
                    None => "Your service".to_string(),
                };
                format!(
                    "{subject} has been {}.",
                    non_blank(status.as_deref()).unwrap_or("performed")
                )
            }
            Self::Diagnostic { status, .. } => {
                if *status == DiagnosticStatus::Completed {
                    "Your diagnostic is complete.".to_string()
                } else {
                    "Your diagnostic has been updated.".to_string()
                }
            }
            Self::General { message } => non_blank(message.as_deref())
                .unwrap_or("New notification")
                .to_string(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredNotification")]
pub struct Notification {
    pub id: RecordId,
    pub user_id: RecordId,
    #[serde(flatten)]
    pub payload: NotificationPayload,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Wire shape of a stored notification before its payload is interpreted.
#[derive(Deserialize)]
struct StoredNotification {
    id: RecordId,
    user_id: RecordId,
    #[serde(rename = "type", default)]
    kind: serde_json::Value,
    #[serde(default)]
    payload: serde_json::Value,
    #[serde(default)]
    read: bool,
    created_at: DateTime<Utc>,
}

impl From<StoredNotification> for Notification {
    fn from(stored: StoredNotification) -> Self {
        let payload = decode_payload(stored.kind, stored.payload);
        Self {
            id: stored.id,
            user_id: stored.user_id,
            payload,
            read: stored.read,
            created_at: stored.created_at,
        }
    }
}

fn decode_payload(kind: serde_json::Value, payload: serde_json::Value) -> NotificationPayload {
    let message = payload
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);
    let tagged = serde_json::json!({ "type": kind, "payload": payload });
    serde_json::from_value(tagged).unwrap_or(NotificationPayload::General { message })
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        self.payload.kind()
    }

    pub fn title(&self) -> &'static str {
        self.payload.title()
    }

    pub fn message(&self) -> String {
        self.payload.message()
    }
}

impl Entity for Notification {
    const COLLECTION: CollectionKey = CollectionKey::Notifications;
    const NAME: &'static str = "notification";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Input for creating a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: RecordId,
    pub payload: NotificationPayload,
}
