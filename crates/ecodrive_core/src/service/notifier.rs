//! Best-effort notification fan-out for entity mutations.

use super::notification_service::NotificationService;
use crate::model::appointment::Appointment;
use crate::model::diagnostic::Diagnostic;
use crate::model::maintenance::MaintenanceRecord;
use crate::model::notification::{NewNotification, Notification, NotificationPayload};
use crate::model::RecordId;
use crate::store::KeyValueStore;
use log::warn;

/// Status reported in maintenance notifications; records are only logged
/// once the work is done.
const MAINTENANCE_DONE_STATUS: &str = "completed";

pub struct Notifier<'s, S: ?Sized> {
    notifications: NotificationService<'s, S>,
}

impl<'s, S: KeyValueStore + ?Sized> Notifier<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            notifications: NotificationService::new(store),
        }
    }

    /// Creates a notification, logging and discarding any failure.
    pub fn notify(&self, user_id: RecordId, payload: NotificationPayload) -> Option<Notification> {
        let kind = payload.kind();
        match self
            .notifications
            .create(NewNotification { user_id, payload })
        {
            Ok(notification) => Some(notification),
            Err(err) => {
                warn!(
                    "event=notification_fanout module=service status=skipped kind={kind:?} error={err}"
                );
                None
            }
        }
    }

    pub fn appointment(&self, appointment: &Appointment) -> Option<Notification> {
        self.notify(
            appointment.user_id,
            NotificationPayload::Appointment {
                appointment_id: appointment.id,
                service_type: appointment.service_type.clone(),
                date: appointment.scheduled_at,
                status: appointment.status,
            },
        )
    }

    pub fn diagnostic(&self, diagnostic: &Diagnostic) -> Option<Notification> {
        self.notify(
            diagnostic.user_id,
            NotificationPayload::Diagnostic {
                diagnostic_id: diagnostic.id,
                status: diagnostic.status,
            },
        )
    }

    pub fn maintenance(&self, record: &MaintenanceRecord) -> Option<Notification> {
        self.notify(
            record.user_id,
            NotificationPayload::Maintenance {
                maintenance_id: record.id,
                service_type: record.service.clone(),
                cost: record.cost,
                status: Some(MAINTENANCE_DONE_STATUS.to_string()),
            },
        )
    }
}
