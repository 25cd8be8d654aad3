//! Maintenance history use-case service.
//!
//! # Responsibility
//! - Log, edit and delete maintenance records.
//! - Aggregate spend and derive service reminders from history.
//!
//! # Invariants
//! - User listings are sorted by `date DESC`.
//! - `id`, `user_id` and `created_at` never change after creation.

use super::notification_service::NotificationService;
use super::notifier::Notifier;
use super::{log_failure, ServiceResult};
use crate::model::maintenance::{MaintenanceChanges, MaintenanceRecord, NewMaintenanceRecord};
use crate::model::notification::{NewNotification, Notification, NotificationPayload};
use crate::model::RecordId;
use crate::repo::collection_repo::CollectionRepository;
use crate::store::KeyValueStore;
use chrono::Utc;
use log::info;
use uuid::Uuid;

/// Number of records returned by [`MaintenanceService::recent_for_user`]
/// when no limit is given.
pub const RECENT_RECORDS_DEFAULT_LIMIT: usize = 5;

pub struct MaintenanceService<'s, S: ?Sized> {
    repo: CollectionRepository<'s, S, MaintenanceRecord>,
    notifications: NotificationService<'s, S>,
    notifier: Notifier<'s, S>,
}

impl<'s, S: KeyValueStore + ?Sized> MaintenanceService<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            repo: CollectionRepository::new(store),
            notifications: NotificationService::new(store),
            notifier: Notifier::new(store),
        }
    }

    pub fn list_for_user(&self, user_id: RecordId) -> Vec<MaintenanceRecord> {
        let mut records = self.repo.list_where(|record| record.user_id == user_id);
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }

    pub fn recent_for_user(&self, user_id: RecordId, limit: Option<usize>) -> Vec<MaintenanceRecord> {
        let mut records = self.list_for_user(user_id);
        records.truncate(limit.unwrap_or(RECENT_RECORDS_DEFAULT_LIMIT));
        records
    }

    pub fn get(&self, id: RecordId) -> Option<MaintenanceRecord> {
        self.repo.get(id)
    }

    pub fn create(&self, new: NewMaintenanceRecord) -> ServiceResult<MaintenanceRecord> {
        log_failure("maintenance_create", new.validate())?;

        let now = Utc::now();
        let record = MaintenanceRecord {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            date: new.date.unwrap_or(now),
            service: new.service,
            parts_replaced: new.parts_replaced,
            cost: new.cost,
            mechanic_notes: new.mechanic_notes,
            created_at: now,
        };

        let created = log_failure("maintenance_create", self.repo.insert(record))?;
        info!(
            "event=maintenance_create module=service status=ok maintenance_id={}",
            created.id
        );
        self.notifier.maintenance(&created);
        Ok(created)
    }

    pub fn update(
        &self,
        id: RecordId,
        changes: MaintenanceChanges,
    ) -> ServiceResult<MaintenanceRecord> {
        log_failure("maintenance_update", changes.validate())?;
        let updated = self.repo.update(id, |record| changes.apply_to(record));
        Ok(log_failure("maintenance_update", updated)?)
    }

    pub fn delete(&self, id: RecordId) -> ServiceResult<bool> {
        Ok(log_failure("maintenance_delete", self.repo.delete(id))?)
    }

    /// Sum of `cost` over every record of `user_id`.
    pub fn total_cost(&self, user_id: RecordId) -> f64 {
        self.repo
            .list_where(|record| record.user_id == user_id)
            .iter()
            .map(|record| record.cost)
            .sum()
    }

    /// Creates a reminder for `service_type` based on the latest matching
    /// record. Returns `None` when the user never had that service.
    ///
    /// Unlike fan-out notifications, a failed reminder write is an error.
    pub fn generate_reminder(
        &self,
        user_id: RecordId,
        service_type: &str,
    ) -> ServiceResult<Option<Notification>> {
        let Some(last_service) = self
            .list_for_user(user_id)
            .into_iter()
            .find(|record| record.service == service_type)
        else {
            return Ok(None);
        };

        let reminder = self.notifications.create(NewNotification {
            user_id,
            payload: NotificationPayload::Reminder {
                service_type: Some(service_type.to_string()),
                last_service_date: Some(last_service.date),
            },
        });
        Ok(Some(log_failure("maintenance_reminder", reminder)?))
    }
}
