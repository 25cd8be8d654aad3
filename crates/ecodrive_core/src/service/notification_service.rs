//! Notification use-case service.
//!
//! # Invariants
//! - User listings are sorted by `created_at DESC`.
//! - Bulk operations only touch records of the given user.

use super::{log_failure, ServiceResult};
use crate::model::notification::{NewNotification, Notification};
use crate::model::RecordId;
use crate::repo::collection_repo::CollectionRepository;
use crate::store::KeyValueStore;
use chrono::Utc;
use log::info;
use uuid::Uuid;

pub struct NotificationService<'s, S: ?Sized> {
    repo: CollectionRepository<'s, S, Notification>,
}

impl<'s, S: KeyValueStore + ?Sized> NotificationService<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            repo: CollectionRepository::new(store),
        }
    }

    /// Newest first.
    pub fn list_for_user(&self, user_id: RecordId) -> Vec<Notification> {
        let mut notifications = self
            .repo
            .list_where(|notification| notification.user_id == user_id);
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications
    }

    pub fn unread_for_user(&self, user_id: RecordId) -> Vec<Notification> {
        self.list_for_user(user_id)
            .into_iter()
            .filter(|notification| !notification.read)
            .collect()
    }

    pub fn unread_count(&self, user_id: RecordId) -> usize {
        self.repo
            .list_where(|notification| notification.user_id == user_id && !notification.read)
            .len()
    }

    pub fn get(&self, id: RecordId) -> Option<Notification> {
        self.repo.get(id)
    }

    /// Stores a new unread notification.
    pub fn create(&self, new: NewNotification) -> ServiceResult<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            payload: new.payload,
            read: false,
            created_at: Utc::now(),
        };
        let kind = notification.kind();
        let created = log_failure("notification_create", self.repo.insert(notification))?;
        info!(
            "event=notification_create module=service status=ok kind={:?} notification_id={}",
            kind, created.id
        );
        Ok(created)
    }

    pub fn mark_read(&self, id: RecordId) -> ServiceResult<Notification> {
        let updated = self.repo.update(id, |notification| notification.read = true);
        Ok(log_failure("notification_mark_read", updated)?)
    }

    /// Marks every notification of `user_id` as read. Returns how many
    /// records belong to the user.
    pub fn mark_all_read(&self, user_id: RecordId) -> ServiceResult<usize> {
        let touched = self.repo.update_where(
            |notification| notification.user_id == user_id,
            |notification| notification.read = true,
        );
        Ok(log_failure("notification_mark_all_read", touched)?)
    }

    pub fn delete(&self, id: RecordId) -> ServiceResult<bool> {
        Ok(log_failure("notification_delete", self.repo.delete(id))?)
    }

    pub fn delete_all_for_user(&self, user_id: RecordId) -> ServiceResult<usize> {
        let removed = self
            .repo
            .delete_where(|notification| notification.user_id == user_id);
        Ok(log_failure("notification_delete_all", removed)?)
    }
}
