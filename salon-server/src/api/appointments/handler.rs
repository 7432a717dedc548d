//! Appointment API Handlers
//!
//! Booking flow: validate the request formats, resolve the referenced
//! client and service, run the schedule validator over the fetched policy
//! and the day's appointments, and persist only on acceptance. The
//! repository re-checks the slot transactionally, so a race between two
//! submissions surfaces as the same conflict rejection.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::models::{
    Appointment, AppointmentCreate, AppointmentStatus, AppointmentStatusUpdate, AppointmentUpdate,
    Client, Service,
};
use crate::db::repository::{
    AppointmentRepository, BusinessHoursRepository, ClientRepository, DayOffRepository,
    Repository, ServiceRepository,
};
use crate::scheduling::{Accepted, BookingRequest, Decision, SchedulePolicy, validate};
use crate::utils::time::{parse_date, time_to_minutes};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "appointment";

#[derive(serde::Deserialize)]
pub struct ListQuery {
    /// Single-day view (`YYYY-MM-DD`)
    pub date: Option<String>,
    /// Range view, inclusive on both ends
    pub from: Option<String>,
    pub to: Option<String>,
}

/// GET /api/appointments - list by day, by range, or all
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    let repo = AppointmentRepository::new(state.get_db());

    let appointments = if let Some(date) = query.date.as_deref() {
        parse_date(date)?;
        repo.find_by_date(date).await?
    } else if let (Some(from), Some(to)) = (query.from.as_deref(), query.to.as_deref()) {
        parse_date(from)?;
        parse_date(to)?;
        repo.find_in_range(from, to).await?
    } else {
        repo.find_all().await?
    };

    Ok(Json(appointments))
}

/// GET /api/appointments/:id - fetch one appointment
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Appointment>> {
    let repo = AppointmentRepository::new(state.get_db());
    let appointment = repo.find_by_id(&id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::AppointmentNotFound, format!("Appointment {}", id))
    })?;
    Ok(Json(appointment))
}

/// POST /api/appointments - book an appointment
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AppointmentCreate>,
) -> AppResult<Json<Appointment>> {
    parse_date(&payload.date)?;
    time_to_minutes(&payload.start_time)?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let client = resolve_client(&state, &payload.client).await?;
    let service = resolve_service(&state, &payload.service).await?;
    if !service.is_active {
        return Err(AppError::new(ErrorCode::ServiceInactive));
    }

    let accepted = check_schedule(
        &state,
        &payload.date,
        &payload.start_time,
        service.duration_minutes as u32,
        None,
    )
    .await?;

    let appointment = Appointment {
        id: None,
        client: client_ref(&client)?,
        client_name: client.name.clone(),
        service: service_ref(&service)?,
        service_name: service.name.clone(),
        date: payload.date,
        start_time: payload.start_time,
        end_time: accepted.end_time,
        start_minutes: accepted.start_minutes as i64,
        end_minutes: accepted.end_minutes as i64,
        price: service.price,
        status: AppointmentStatus::AwaitingConfirmation,
        note: payload.note,
        created_at: shared::util::now_millis(),
        reminded: false,
    };

    let repo = AppointmentRepository::new(state.get_db());
    let created = repo.create(appointment).await?;

    let id = created.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    state.broadcast_sync(RESOURCE, "created", &id, Some(&created));
    state.notify_reminder_scheduler();

    Ok(Json(created))
}

/// PUT /api/appointments/:id - edit an appointment and revalidate
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AppointmentUpdate>,
) -> AppResult<Json<Appointment>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let repo = AppointmentRepository::new(state.get_db());
    let existing = repo.find_by_id(&id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::AppointmentNotFound, format!("Appointment {}", id))
    })?;

    let client_id = payload
        .client
        .unwrap_or_else(|| existing.client.to_string());
    let service_id = payload
        .service
        .unwrap_or_else(|| existing.service.to_string());
    let date = payload.date.unwrap_or_else(|| existing.date.clone());
    let start_time = payload
        .start_time
        .unwrap_or_else(|| existing.start_time.clone());

    parse_date(&date)?;
    time_to_minutes(&start_time)?;

    let client = resolve_client(&state, &client_id).await?;
    let service = resolve_service(&state, &service_id).await?;

    let accepted = check_schedule(
        &state,
        &date,
        &start_time,
        service.duration_minutes as u32,
        Some(&id),
    )
    .await?;

    // Re-fire the reminder when the slot moved
    let slot_changed = date != existing.date || start_time != existing.start_time;

    let appointment = Appointment {
        id: None,
        client: client_ref(&client)?,
        client_name: client.name.clone(),
        service: service_ref(&service)?,
        service_name: service.name.clone(),
        date,
        start_time,
        end_time: accepted.end_time,
        start_minutes: accepted.start_minutes as i64,
        end_minutes: accepted.end_minutes as i64,
        price: existing.price,
        status: existing.status,
        note: payload.note.or(existing.note),
        created_at: existing.created_at,
        reminded: existing.reminded && !slot_changed,
    };

    let updated = repo.update(&id, appointment).await?;

    state.broadcast_sync(RESOURCE, "updated", &id, Some(&updated));
    state.notify_reminder_scheduler();

    Ok(Json(updated))
}

/// PATCH /api/appointments/:id/status - set the status
///
/// Any status is settable by staff; no transition graph is enforced.
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AppointmentStatusUpdate>,
) -> AppResult<Json<Appointment>> {
    let repo = AppointmentRepository::new(state.get_db());
    let updated = repo.set_status(&id, payload.status).await?;

    state.broadcast_sync(RESOURCE, "updated", &id, Some(&updated));
    state.notify_reminder_scheduler();

    Ok(Json(updated))
}

// =============================================================================
// Booking helpers
// =============================================================================

fn client_ref(client: &Client) -> AppResult<surrealdb::sql::Thing> {
    client
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Stored client is missing its id"))
}

fn service_ref(service: &Service) -> AppResult<surrealdb::sql::Thing> {
    service
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Stored service is missing its id"))
}

async fn resolve_client(state: &ServerState, id: &str) -> AppResult<Client> {
    let repo = ClientRepository::new(state.get_db());
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::ClientNotFound, format!("Client {}", id)))
}

async fn resolve_service(state: &ServerState, id: &str) -> AppResult<Service> {
    let repo = ServiceRepository::new(state.get_db());
    repo.find_by_id(id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::ServiceNotFound, format!("Service {}", id))
    })
}

/// Fetch the schedule policy and the day's appointments, then run the
/// validator. A rejection becomes the matching 422 error.
async fn check_schedule(
    state: &ServerState,
    date: &str,
    start_time: &str,
    duration_minutes: u32,
    exclude_id: Option<&str>,
) -> AppResult<Accepted> {
    let days_off = DayOffRepository::new(state.get_db()).get_or_create().await?;
    let business_hours = BusinessHoursRepository::new(state.get_db())
        .get_or_create()
        .await?;
    let existing = AppointmentRepository::new(state.get_db())
        .find_by_date(date)
        .await?;

    let request = BookingRequest {
        date,
        start_time,
        duration_minutes,
        exclude_id,
    };
    let policy = SchedulePolicy {
        days_off: &days_off.entries,
        business_hours: &business_hours.days,
    };

    match validate(&request, &policy, &existing)? {
        Decision::Accepted(accepted) => Ok(accepted),
        Decision::Rejected(rejection) => Err(rejection.into()),
    }
}
