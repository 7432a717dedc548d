//! Appointment Repository
//!
//! The booking validator runs over data fetched ahead of time, so two
//! concurrent submissions can both pass it. `create` and `update` therefore
//! re-run the overlap predicate against live data inside a single database
//! transaction and abort with a conflict when the slot was taken in the
//! meantime.

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Appointment, AppointmentStatus, AppointmentStatusUpdate};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "appointment";

/// Sentinel thrown inside the write transaction when the slot is taken
const SLOT_TAKEN: &str = "slot_taken";

#[derive(Clone)]
pub struct AppointmentRepository {
    base: BaseRepository,
}

impl AppointmentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All appointments for one calendar date, ordered by start time
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Vec<Appointment>> {
        let appointments: Vec<Appointment> = self
            .base
            .db()
            .query(
                "SELECT * FROM appointment WHERE date = $date \
                 ORDER BY start_minutes ASC",
            )
            .bind(("date", date.to_string()))
            .await?
            .take(0)?;
        Ok(appointments)
    }

    /// Appointments within an inclusive date range
    pub async fn find_in_range(&self, from: &str, to: &str) -> RepoResult<Vec<Appointment>> {
        let appointments: Vec<Appointment> = self
            .base
            .db()
            .query(
                "SELECT * FROM appointment \
                 WHERE date >= $from AND date <= $to \
                 ORDER BY date ASC, start_minutes ASC",
            )
            .bind(("from", from.to_string()))
            .bind(("to", to.to_string()))
            .await?
            .take(0)?;
        Ok(appointments)
    }

    /// All appointments, newest date first
    pub async fn find_all(&self) -> RepoResult<Vec<Appointment>> {
        let appointments: Vec<Appointment> = self
            .base
            .db()
            .query("SELECT * FROM appointment ORDER BY date DESC, start_minutes ASC")
            .await?
            .take(0)?;
        Ok(appointments)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Appointment>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let appointment: Option<Appointment> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(appointment)
    }

    /// Insert a new appointment, re-checking the slot inside a transaction
    pub async fn create(&self, appointment: Appointment) -> RepoResult<Appointment> {
        let date = appointment.date.clone();
        let start_min = appointment.start_minutes;
        let end_min = appointment.end_minutes;

        let response = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 LET $clash = (
                     SELECT VALUE id FROM appointment
                     WHERE date = $date
                       AND status != 'CANCELLED'
                       AND status != 'NO_SHOW'
                       AND start_minutes < $end_min
                       AND end_minutes > $start_min
                 );
                 IF array::len($clash) > 0 { THROW 'slot_taken' };
                 CREATE appointment CONTENT $data;
                 COMMIT TRANSACTION;",
            )
            .bind(("date", date))
            .bind(("start_min", start_min))
            .bind(("end_min", end_min))
            .bind(("data", appointment))
            .await?;

        let mut response = response.check().map_err(conflict_or_db)?;
        let created: Option<Appointment> = response.take(response.num_statements() - 1)?;
        created.ok_or_else(|| RepoError::Database("Failed to create appointment".to_string()))
    }

    /// Replace an appointment, re-checking the slot with itself excluded
    pub async fn update(&self, id: &str, appointment: Appointment) -> RepoResult<Appointment> {
        let pure_id = strip_table_prefix(TABLE, id).to_string();
        let date = appointment.date.clone();
        let start_min = appointment.start_minutes;
        let end_min = appointment.end_minutes;

        let response = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 LET $clash = (
                     SELECT VALUE id FROM appointment
                     WHERE date = $date
                       AND id != type::thing('appointment', $exclude)
                       AND status != 'CANCELLED'
                       AND status != 'NO_SHOW'
                       AND start_minutes < $end_min
                       AND end_minutes > $start_min
                 );
                 IF array::len($clash) > 0 { THROW 'slot_taken' };
                 UPDATE type::thing('appointment', $exclude) CONTENT $data;
                 COMMIT TRANSACTION;",
            )
            .bind(("date", date))
            .bind(("exclude", pure_id))
            .bind(("start_min", start_min))
            .bind(("end_min", end_min))
            .bind(("data", appointment))
            .await?;

        let mut response = response.check().map_err(conflict_or_db)?;
        let updated: Option<Appointment> = response.take(response.num_statements() - 1)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Appointment {}", id)))
    }

    /// Status-only update; no slot re-check (freeing a slot never conflicts,
    /// and re-occupying one goes through the edit path)
    pub async fn set_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> RepoResult<Appointment> {
        let pure_id = strip_table_prefix(TABLE, id).to_string();
        let updated: Option<Appointment> = self
            .base
            .db()
            .update((TABLE, pure_id))
            .merge(AppointmentStatusUpdate { status })
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Appointment {}", id)))
    }

    /// Next appointment the reminder scheduler has not fired for yet
    pub async fn find_next_unreminded(
        &self,
        today: &str,
        now_minutes: i64,
    ) -> RepoResult<Option<Appointment>> {
        let appointments: Vec<Appointment> = self
            .base
            .db()
            .query(
                "SELECT * FROM appointment
                 WHERE reminded = false
                   AND status != 'CANCELLED'
                   AND status != 'NO_SHOW'
                   AND (date > $today OR (date = $today AND start_minutes >= $now_min))
                 ORDER BY date ASC, start_minutes ASC
                 LIMIT 1",
            )
            .bind(("today", today.to_string()))
            .bind(("now_min", now_minutes))
            .await?
            .take(0)?;
        Ok(appointments.into_iter().next())
    }

    /// Mark an appointment's reminder as fired
    pub async fn mark_reminded(&self, id: &str) -> RepoResult<()> {
        #[derive(Serialize)]
        struct Reminded {
            reminded: bool,
        }

        let pure_id = strip_table_prefix(TABLE, id).to_string();
        let _updated: Option<Appointment> = self
            .base
            .db()
            .update((TABLE, pure_id))
            .merge(Reminded { reminded: true })
            .await?;
        Ok(())
    }
}

/// Map a transaction failure to a conflict when our sentinel was thrown
fn conflict_or_db(err: surrealdb::Error) -> RepoError {
    let msg = err.to_string();
    if msg.contains(SLOT_TAKEN) {
        RepoError::Conflict("Requested time conflicts with another appointment".to_string())
    } else {
        RepoError::Database(msg)
    }
}
