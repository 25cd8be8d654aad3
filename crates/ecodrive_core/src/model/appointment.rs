//! Service appointments.

use super::validation::{validate_service_type, ValidationError};
use super::{Entity, RecordId};
use crate::store::CollectionKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Appointment lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Whether the appointment may still take place.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: RecordId,
    pub user_id: RecordId,
    /// Free-form service label, e.g. `oil_change`.
    pub service_type: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Open and scheduled strictly after `now`.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.status.is_open() && self.scheduled_at > now
    }
}

impl Entity for Appointment {
    const COLLECTION: CollectionKey = CollectionKey::Appointments;
    const NAME: &'static str = "appointment";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Input for booking an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub user_id: RecordId,
    pub service_type: String,
    pub scheduled_at: DateTime<Utc>,
    /// Defaults to `pending`.
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

impl NewAppointment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_service_type(&self.service_type)
    }
}

/// Editable appointment fields. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentChanges {
    pub service_type: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

impl AppointmentChanges {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.service_type.as_deref() {
            Some(service_type) => validate_service_type(service_type),
            None => Ok(()),
        }
    }

    pub(crate) fn apply_to(self, appointment: &mut Appointment) {
        if let Some(service_type) = self.service_type {
            appointment.service_type = service_type;
        }
        if let Some(scheduled_at) = self.scheduled_at {
            appointment.scheduled_at = scheduled_at;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        if let Some(notes) = self.notes {
            appointment.notes = Some(notes);
        }
    }
}
