//! Booking flow integration tests
//!
//! Exercise the fetch → validate → write sequence against an in-memory
//! database, including the transactional double-booking guard that closes
//! the race between two concurrent submissions.

use salon_server::db::define_schema;
use salon_server::db::models::{
    Appointment, AppointmentStatus, Client, ClientCreate, Service, ServiceCreate,
};
use salon_server::db::repository::{
    AppointmentRepository, BusinessHoursRepository, ClientRepository, DayOffRepository,
    RepoError, Repository, ServiceRepository,
};
use salon_server::scheduling::{BookingRequest, Decision, SchedulePolicy, validate};
use salon_server::utils::time::time_to_minutes;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

// Monday, inside the default business hours
const DATE: &str = "2024-06-03";

async fn open_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("petala").use_db("salon").await.unwrap();
    define_schema(&db).await.unwrap();
    db
}

async fn seed_catalog(db: &Surreal<Db>) -> (Client, Service) {
    let client = ClientRepository::new(db.clone())
        .create(ClientCreate {
            name: "Ana Souza".to_string(),
            phone: "+55 11 98888-0000".to_string(),
            photo_url: None,
        })
        .await
        .unwrap();

    let service = ServiceRepository::new(db.clone())
        .create(ServiceCreate {
            name: "Corte".to_string(),
            description: Some("Corte feminino".to_string()),
            duration_minutes: 60,
            price: 80.0,
        })
        .await
        .unwrap();

    (client, service)
}

fn appointment_record(
    client: &Client,
    service: &Service,
    date: &str,
    start: &str,
    end: &str,
) -> Appointment {
    Appointment {
        id: None,
        client: client.id.clone().unwrap(),
        client_name: client.name.clone(),
        service: service.id.clone().unwrap(),
        service_name: service.name.clone(),
        date: date.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        start_minutes: time_to_minutes(start).unwrap() as i64,
        end_minutes: time_to_minutes(end).unwrap() as i64,
        price: service.price,
        status: AppointmentStatus::AwaitingConfirmation,
        note: None,
        created_at: shared::util::now_millis(),
        reminded: false,
    }
}

/// Run the validator over freshly fetched policy and day state
async fn validate_against_db(
    db: &Surreal<Db>,
    date: &str,
    start: &str,
    duration: u32,
    exclude_id: Option<&str>,
) -> Decision {
    let days_off = DayOffRepository::new(db.clone())
        .get_or_create()
        .await
        .unwrap();
    let hours = BusinessHoursRepository::new(db.clone())
        .get_or_create()
        .await
        .unwrap();
    let existing = AppointmentRepository::new(db.clone())
        .find_by_date(date)
        .await
        .unwrap();

    validate(
        &BookingRequest {
            date,
            start_time: start,
            duration_minutes: duration,
            exclude_id,
        },
        &SchedulePolicy {
            days_off: &days_off.entries,
            business_hours: &hours.days,
        },
        &existing,
    )
    .unwrap()
}

#[tokio::test]
async fn test_validate_then_write_round_trip() {
    let db = open_db().await;
    let (client, service) = seed_catalog(&db).await;
    let repo = AppointmentRepository::new(db.clone());

    let decision = validate_against_db(&db, DATE, "10:00", 60, None).await;
    let Decision::Accepted(accepted) = decision else {
        panic!("expected acceptance, got {decision:?}");
    };
    assert_eq!(accepted.end_time, "11:00");

    let created = repo
        .create(appointment_record(
            &client,
            &service,
            DATE,
            "10:00",
            &accepted.end_time,
        ))
        .await
        .unwrap();
    assert!(created.id.is_some());
    assert_eq!(created.status, AppointmentStatus::AwaitingConfirmation);

    let day = repo.find_by_date(DATE).await.unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].start_time, "10:00");
    assert_eq!(day[0].end_time, "11:00");
}

#[tokio::test]
async fn test_validator_rejects_overlap_and_accepts_touching_slot() {
    let db = open_db().await;
    let (client, service) = seed_catalog(&db).await;
    let repo = AppointmentRepository::new(db.clone());

    repo.create(appointment_record(&client, &service, DATE, "09:00", "10:00"))
        .await
        .unwrap();

    let decision = validate_against_db(&db, DATE, "09:30", 30, None).await;
    assert!(
        matches!(decision, Decision::Rejected(_)),
        "overlapping request must be rejected, got {decision:?}"
    );

    let decision = validate_against_db(&db, DATE, "10:00", 30, None).await;
    let Decision::Accepted(accepted) = decision else {
        panic!("touching request must be accepted, got {decision:?}");
    };
    assert_eq!(accepted.end_time, "10:30");
}

#[tokio::test]
async fn test_write_guard_rejects_racing_double_booking() {
    let db = open_db().await;
    let (client, service) = seed_catalog(&db).await;
    let repo = AppointmentRepository::new(db.clone());

    repo.create(appointment_record(&client, &service, DATE, "09:00", "10:00"))
        .await
        .unwrap();

    // Both submissions validated against the same snapshot; the second
    // write must fail inside the transaction
    let err = repo
        .create(appointment_record(&client, &service, DATE, "09:30", "10:30"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, RepoError::Conflict(_)),
        "expected conflict, got {err:?}"
    );

    let day = repo.find_by_date(DATE).await.unwrap();
    assert_eq!(day.len(), 1, "conflicting booking must not be persisted");
}

#[tokio::test]
async fn test_day_off_blocks_booking() {
    let db = open_db().await;
    seed_catalog(&db).await;

    DayOffRepository::new(db.clone())
        .add_entry(DATE, "Feriado municipal")
        .await
        .unwrap();

    let decision = validate_against_db(&db, DATE, "10:00", 30, None).await;
    let Decision::Rejected(rejection) = decision else {
        panic!("expected rejection, got {decision:?}");
    };
    assert_eq!(
        rejection.message(),
        "The salon is closed on that date: Feriado municipal"
    );
}

#[tokio::test]
async fn test_edit_excludes_itself_from_the_guard() {
    let db = open_db().await;
    let (client, service) = seed_catalog(&db).await;
    let repo = AppointmentRepository::new(db.clone());

    let created = repo
        .create(appointment_record(&client, &service, DATE, "09:00", "10:00"))
        .await
        .unwrap();
    let id = created.id.as_ref().unwrap().to_string();

    // Unchanged slot revalidates cleanly with self-exclusion
    let decision = validate_against_db(&db, DATE, "09:00", 60, Some(&id)).await;
    assert!(matches!(decision, Decision::Accepted(_)));

    // The transactional guard honors the exclusion too
    let mut edited = appointment_record(&client, &service, DATE, "09:00", "10:00");
    edited.note = Some("Reagendado".to_string());
    let updated = repo.update(&id, edited).await.unwrap();
    assert_eq!(updated.note.as_deref(), Some("Reagendado"));

    let day = repo.find_by_date(DATE).await.unwrap();
    assert_eq!(day.len(), 1);
}

#[tokio::test]
async fn test_cancelled_booking_releases_the_slot() {
    let db = open_db().await;
    let (client, service) = seed_catalog(&db).await;
    let repo = AppointmentRepository::new(db.clone());

    let created = repo
        .create(appointment_record(&client, &service, DATE, "09:00", "10:00"))
        .await
        .unwrap();
    let id = created.id.as_ref().unwrap().to_string();

    repo.set_status(&id, AppointmentStatus::Cancelled)
        .await
        .unwrap();

    // Validator ignores the cancelled slot
    let decision = validate_against_db(&db, DATE, "09:00", 60, None).await;
    assert!(matches!(decision, Decision::Accepted(_)));

    // And the write guard lets the new booking through
    repo.create(appointment_record(&client, &service, DATE, "09:00", "10:00"))
        .await
        .unwrap();

    let day = repo.find_by_date(DATE).await.unwrap();
    assert_eq!(day.len(), 2);
}

#[tokio::test]
async fn test_db_service_opens_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("petala.db");

    let service = salon_server::db::DbService::new(&db_path.to_string_lossy())
        .await
        .unwrap();

    // Schema applied and the store is usable
    let (client, _service) = seed_catalog(&service.db).await;
    let found = ClientRepository::new(service.db.clone())
        .find_by_id(&client.id.unwrap().to_string())
        .await
        .unwrap();
    assert_eq!(found.unwrap().name, "Ana Souza");
}

#[tokio::test]
async fn test_service_deactivation_keeps_existing_appointments() {
    let db = open_db().await;
    let (client, service) = seed_catalog(&db).await;
    let service_repo = ServiceRepository::new(db.clone());
    let repo = AppointmentRepository::new(db.clone());

    repo.create(appointment_record(&client, &service, DATE, "09:00", "10:00"))
        .await
        .unwrap();

    let service_id = service.id.as_ref().unwrap().to_string();
    assert!(service_repo.delete(&service_id).await.unwrap());

    let stored = service_repo
        .find_by_id(&service_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.is_active);

    // Hidden from the booking catalog, still present on the appointment
    assert!(service_repo.find_active().await.unwrap().is_empty());
    let day = repo.find_by_date(DATE).await.unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].price, 80.0);
}
