//! Appointment use-case service.
//!
//! # Responsibility
//! - Book, reschedule, re-status and delete service appointments.
//! - Fan out an appointment notification on create and status change.
//!
//! # Invariants
//! - `id`, `user_id` and `created_at` never change after creation.
//! - Upcoming means `pending|confirmed` and strictly after now, sorted by
//!   `scheduled_at ASC`.

use super::notifier::Notifier;
use super::{log_failure, ServiceResult};
use crate::model::appointment::{
    Appointment, AppointmentChanges, AppointmentStatus, NewAppointment,
};
use crate::model::RecordId;
use crate::repo::collection_repo::CollectionRepository;
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

pub struct AppointmentService<'s, S: ?Sized> {
    repo: CollectionRepository<'s, S, Appointment>,
    notifier: Notifier<'s, S>,
}

impl<'s, S: KeyValueStore + ?Sized> AppointmentService<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            repo: CollectionRepository::new(store),
            notifier: Notifier::new(store),
        }
    }

    /// All appointments of `user_id` in booking order.
    pub fn list_for_user(&self, user_id: RecordId) -> Vec<Appointment> {
        self.repo
            .list_where(|appointment| appointment.user_id == user_id)
    }

    pub fn upcoming_for_user(&self, user_id: RecordId) -> Vec<Appointment> {
        self.upcoming_for_user_at(user_id, Utc::now())
    }

    /// Same as [`Self::upcoming_for_user`] with an explicit reference time.
    pub fn upcoming_for_user_at(&self, user_id: RecordId, now: DateTime<Utc>) -> Vec<Appointment> {
        let mut upcoming = self.repo.list_where(|appointment| {
            appointment.user_id == user_id && appointment.is_upcoming(now)
        });
        upcoming.sort_by_key(|appointment| appointment.scheduled_at);
        upcoming
    }

    pub fn get(&self, id: RecordId) -> Option<Appointment> {
        self.repo.get(id)
    }

    pub fn create(&self, new: NewAppointment) -> ServiceResult<Appointment> {
        log_failure("appointment_create", new.validate())?;

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            service_type: new.service_type,
            scheduled_at: new.scheduled_at,
            status: new.status.unwrap_or_default(),
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };

        let created = log_failure("appointment_create", self.repo.insert(appointment))?;
        info!(
            "event=appointment_create module=service status=ok appointment_id={}",
            created.id
        );
        self.notifier.appointment(&created);
        Ok(created)
    }

    pub fn update_status(
        &self,
        id: RecordId,
        status: AppointmentStatus,
    ) -> ServiceResult<Appointment> {
        let updated = log_failure(
            "appointment_update_status",
            self.repo.update(id, |appointment| {
                appointment.status = status;
                appointment.updated_at = Utc::now();
            }),
        )?;
        self.notifier.appointment(&updated);
        Ok(updated)
    }

    /// Edits appointment details without notifying the user.
    pub fn update(&self, id: RecordId, changes: AppointmentChanges) -> ServiceResult<Appointment> {
        log_failure("appointment_update", changes.validate())?;
        let updated = self.repo.update(id, |appointment| {
            changes.apply_to(appointment);
            appointment.updated_at = Utc::now();
        });
        Ok(log_failure("appointment_update", updated)?)
    }

    /// Removes the appointment. Returns whether it existed.
    pub fn delete(&self, id: RecordId) -> ServiceResult<bool> {
        Ok(log_failure("appointment_delete", self.repo.delete(id))?)
    }
}
