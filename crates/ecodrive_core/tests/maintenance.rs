use chrono::{Duration, TimeZone, Utc};
use ecodrive_core::db::open_db_in_memory;
use ecodrive_core::{
    MaintenanceChanges, MaintenanceService, NewMaintenanceRecord, NotificationKind,
    NotificationPayload, NotificationService, ServiceError, SqliteKeyValueStore, ValidationError,
};
use uuid::Uuid;

fn service_entry(user_id: Uuid, service: &str, cost: f64, days_ago: i64) -> NewMaintenanceRecord {
    NewMaintenanceRecord {
        user_id,
        date: Some(Utc::now() - Duration::days(days_ago)),
        service: service.to_string(),
        parts_replaced: vec!["filter".to_string()],
        cost,
        mechanic_notes: String::new(),
    }
}

#[test]
fn create_notifies_with_completed_status() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let maintenance = MaintenanceService::new(&store);
    let notifications = NotificationService::new(&store);
    let user_id = Uuid::new_v4();

    let created = maintenance
        .create(service_entry(user_id, "oil_change", 79.5, 0))
        .unwrap();

    let sent = notifications.list_for_user(user_id);
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].payload,
        NotificationPayload::Maintenance {
            maintenance_id: created.id,
            service_type: "oil_change".to_string(),
            cost: 79.5,
            status: Some("completed".to_string()),
        }
    );
    assert_eq!(
        sent[0].message(),
        "Your oil_change service has been completed."
    );
}

#[test]
fn create_rejects_negative_cost() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let maintenance = MaintenanceService::new(&store);
    let user_id = Uuid::new_v4();

    let err = maintenance
        .create(service_entry(user_id, "oil_change", -10.0, 0))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::InvalidCost(_))
    ));
    assert!(maintenance.list_for_user(user_id).is_empty());
}

#[test]
fn list_is_newest_first_and_recent_is_truncated() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let maintenance = MaintenanceService::new(&store);
    let user_id = Uuid::new_v4();

    for days_ago in [30, 5, 90, 1, 60, 10, 45] {
        maintenance
            .create(service_entry(user_id, "inspection", 10.0, days_ago))
            .unwrap();
    }

    let all = maintenance.list_for_user(user_id);
    assert_eq!(all.len(), 7);
    assert!(all.windows(2).all(|pair| pair[0].date >= pair[1].date));

    let recent = maintenance.recent_for_user(user_id, None);
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[..], all[..5]);
    assert_eq!(maintenance.recent_for_user(user_id, Some(2)).len(), 2);
}

#[test]
fn delete_removes_exactly_one_record_and_total_cost_follows() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let maintenance = MaintenanceService::new(&store);
    let user_id = Uuid::new_v4();
    let other_user = Uuid::new_v4();

    let oil = maintenance
        .create(service_entry(user_id, "oil_change", 80.0, 3))
        .unwrap();
    let tires = maintenance
        .create(service_entry(user_id, "tires", 400.0, 2))
        .unwrap();
    let brakes = maintenance
        .create(service_entry(user_id, "brakes", 150.25, 1))
        .unwrap();
    let foreign = maintenance
        .create(service_entry(other_user, "tires", 999.0, 1))
        .unwrap();

    assert_eq!(maintenance.total_cost(user_id), 630.25);

    assert!(maintenance.delete(tires.id).unwrap());

    assert_eq!(maintenance.get(tires.id), None);
    assert_eq!(maintenance.get(oil.id), Some(oil));
    assert_eq!(maintenance.get(brakes.id), Some(brakes));
    assert_eq!(maintenance.get(foreign.id), Some(foreign));
    assert_eq!(maintenance.total_cost(user_id), 230.25);
    assert_eq!(maintenance.total_cost(other_user), 999.0);
}

#[test]
fn update_keeps_identity_fields() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let maintenance = MaintenanceService::new(&store);
    let user_id = Uuid::new_v4();

    let created = maintenance
        .create(service_entry(user_id, "oil_change", 80.0, 3))
        .unwrap();
    let updated = maintenance
        .update(
            created.id,
            MaintenanceChanges {
                cost: Some(95.0),
                mechanic_notes: Some("synthetic oil".to_string()),
                ..MaintenanceChanges::default()
            },
        )
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.user_id, created.user_id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.service, "oil_change");
    assert_eq!(updated.cost, 95.0);
    assert_eq!(updated.mechanic_notes, "synthetic oil");

    assert!(matches!(
        maintenance
            .update(created.id, MaintenanceChanges {
                cost: Some(f64::NAN),
                ..MaintenanceChanges::default()
            })
            .unwrap_err(),
        ServiceError::Validation(_)
    ));
    assert!(matches!(
        maintenance
            .update(Uuid::new_v4(), MaintenanceChanges::default())
            .unwrap_err(),
        ServiceError::NotFound { .. }
    ));
}

#[test]
fn reminder_uses_latest_record_of_that_service() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let maintenance = MaintenanceService::new(&store);
    let notifications = NotificationService::new(&store);
    let user_id = Uuid::new_v4();
    let older = Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap();
    let newer = Utc.with_ymd_and_hms(2025, 7, 2, 9, 0, 0).unwrap();

    for date in [older, newer] {
        maintenance
            .create(NewMaintenanceRecord {
                date: Some(date),
                ..service_entry(user_id, "oil_change", 70.0, 0)
            })
            .unwrap();
    }

    assert_eq!(
        maintenance.generate_reminder(user_id, "timing_belt").unwrap(),
        None
    );

    let reminder = maintenance
        .generate_reminder(user_id, "oil_change")
        .unwrap()
        .unwrap();
    assert_eq!(reminder.kind(), NotificationKind::Reminder);
    assert_eq!(
        reminder.payload,
        NotificationPayload::Reminder {
            service_type: Some("oil_change".to_string()),
            last_service_date: Some(newer),
        }
    );
    assert_eq!(
        reminder.message(),
        "It's time to schedule your next oil_change service."
    );
    assert_eq!(notifications.unread_count(user_id), 3);
}
