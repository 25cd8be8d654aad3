use chrono::{Duration, Utc};
use ecodrive_core::db::open_db_in_memory;
use ecodrive_core::{
    AppointmentChanges, AppointmentService, AppointmentStatus, NewAppointment,
    NotificationPayload, NotificationService, ServiceError, SqliteKeyValueStore, ValidationError,
};
use uuid::Uuid;

fn booking(user_id: Uuid, service_type: &str, in_days: i64) -> NewAppointment {
    NewAppointment {
        user_id,
        service_type: service_type.to_string(),
        scheduled_at: Utc::now() + Duration::days(in_days),
        status: None,
        notes: None,
    }
}

#[test]
fn create_defaults_to_pending_and_notifies() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let appointments = AppointmentService::new(&store);
    let notifications = NotificationService::new(&store);
    let user_id = Uuid::new_v4();

    let created = appointments
        .create(NewAppointment {
            notes: Some("rattling noise".to_string()),
            ..booking(user_id, "oil_change", 3)
        })
        .unwrap();

    assert_eq!(created.status, AppointmentStatus::Pending);
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(appointments.get(created.id), Some(created.clone()));

    let sent = notifications.list_for_user(user_id);
    assert_eq!(sent.len(), 1);
    assert!(!sent[0].read);
    match &sent[0].payload {
        NotificationPayload::Appointment {
            appointment_id,
            service_type,
            date,
            status,
        } => {
            assert_eq!(*appointment_id, created.id);
            assert_eq!(service_type, "oil_change");
            assert_eq!(*date, created.scheduled_at);
            assert_eq!(*status, AppointmentStatus::Pending);
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[test]
fn create_rejects_blank_service_type() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let appointments = AppointmentService::new(&store);
    let user_id = Uuid::new_v4();

    let err = appointments.create(booking(user_id, "  ", 1)).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::EmptyServiceType)
    ));
    assert!(appointments.list_for_user(user_id).is_empty());
}

#[test]
fn upcoming_filters_by_status_time_and_owner_sorted_ascending() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let appointments = AppointmentService::new(&store);
    let user_id = Uuid::new_v4();
    let other_user = Uuid::new_v4();

    let later = appointments.create(booking(user_id, "tires", 10)).unwrap();
    let sooner = appointments
        .create(NewAppointment {
            status: Some(AppointmentStatus::Confirmed),
            ..booking(user_id, "brakes", 2)
        })
        .unwrap();
    appointments.create(booking(user_id, "past", -2)).unwrap();
    appointments
        .create(NewAppointment {
            status: Some(AppointmentStatus::Cancelled),
            ..booking(user_id, "cancelled", 5)
        })
        .unwrap();
    appointments.create(booking(other_user, "someone else", 1)).unwrap();

    let upcoming = appointments.upcoming_for_user(user_id);
    let ids: Vec<Uuid> = upcoming.iter().map(|appointment| appointment.id).collect();
    assert_eq!(ids, vec![sooner.id, later.id]);
    assert_eq!(appointments.list_for_user(user_id).len(), 4);
}

#[test]
fn upcoming_excludes_appointment_scheduled_exactly_now() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let appointments = AppointmentService::new(&store);
    let user_id = Uuid::new_v4();

    let created = appointments.create(booking(user_id, "wash", 1)).unwrap();

    assert!(appointments
        .upcoming_for_user_at(user_id, created.scheduled_at)
        .is_empty());
    assert_eq!(
        appointments
            .upcoming_for_user_at(user_id, created.scheduled_at - Duration::seconds(1))
            .len(),
        1
    );
}

#[test]
fn completing_removes_from_upcoming_but_keeps_record() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let appointments = AppointmentService::new(&store);
    let notifications = NotificationService::new(&store);
    let user_id = Uuid::new_v4();

    let created = appointments.create(booking(user_id, "oil_change", 1)).unwrap();
    assert_eq!(appointments.upcoming_for_user(user_id).len(), 1);

    let completed = appointments
        .update_status(created.id, AppointmentStatus::Completed)
        .unwrap();

    assert_eq!(completed.status, AppointmentStatus::Completed);
    assert!(completed.updated_at >= created.updated_at);
    assert!(appointments.upcoming_for_user(user_id).is_empty());
    assert_eq!(
        appointments.get(created.id).map(|appointment| appointment.status),
        Some(AppointmentStatus::Completed)
    );
    assert_eq!(notifications.list_for_user(user_id).len(), 2);
}

#[test]
fn update_status_of_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let appointments = AppointmentService::new(&store);
    let missing = Uuid::new_v4();

    let err = appointments
        .update_status(missing, AppointmentStatus::Confirmed)
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { id, .. } if id == missing));
}

#[test]
fn update_changes_details_but_not_identity_and_does_not_notify() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let appointments = AppointmentService::new(&store);
    let notifications = NotificationService::new(&store);
    let user_id = Uuid::new_v4();

    let created = appointments.create(booking(user_id, "oil_change", 1)).unwrap();
    let new_time = created.scheduled_at + Duration::hours(4);

    let updated = appointments
        .update(
            created.id,
            AppointmentChanges {
                scheduled_at: Some(new_time),
                notes: Some("afternoon please".to_string()),
                ..AppointmentChanges::default()
            },
        )
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.user_id, user_id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.service_type, "oil_change");
    assert_eq!(updated.scheduled_at, new_time);
    assert_eq!(updated.notes.as_deref(), Some("afternoon please"));
    assert_eq!(notifications.list_for_user(user_id).len(), 1);
}

#[test]
fn delete_removes_only_target() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let appointments = AppointmentService::new(&store);
    let user_id = Uuid::new_v4();

    let first = appointments.create(booking(user_id, "a", 1)).unwrap();
    let second = appointments.create(booking(user_id, "b", 2)).unwrap();

    assert!(appointments.delete(first.id).unwrap());
    assert!(!appointments.delete(first.id).unwrap());
    assert_eq!(appointments.list_for_user(user_id), vec![second]);
}
