//! Appointment reminder scheduler
//!
//! Watches upcoming appointments and emits a `reminder` sync event
//! `lead_minutes` before each one starts. Reminders are fire-and-forget:
//! a failure is logged and swallowed, it never affects booking flow.
//!
//! Reacts to the state's reminder `Notify` signal so a settings change or a
//! new booking recomputes the next wake-up immediately.

use std::sync::Arc;
use std::time::Duration;

use chrono::Timelike;
use serde::Serialize;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::core::ServerState;
use crate::db::models::Appointment;
use crate::db::repository::{AppointmentRepository, NotificationSettingsRepository};
use crate::utils::time::{date_minutes_to_millis, parse_date};

const RESOURCE: &str = "reminder";

/// Re-check interval when there is nothing scheduled
const IDLE_RECHECK: Duration = Duration::from_secs(3600);

/// Payload of a fired reminder event
#[derive(Debug, Clone, Serialize)]
pub struct ReminderEvent {
    pub client_name: String,
    pub service_name: String,
    pub date: String,
    pub start_time: String,
    pub lead_minutes: i64,
}

/// Reminder scheduler
///
/// Spawned from `Server::run()`; stops when the shutdown token fires.
pub struct ReminderScheduler {
    state: ServerState,
    shutdown: CancellationToken,
    notify: Arc<Notify>,
}

impl ReminderScheduler {
    pub fn new(state: ServerState, shutdown: CancellationToken) -> Self {
        let notify = state.reminder_notify();
        Self {
            state,
            shutdown,
            notify,
        }
    }

    /// Main loop: sleep until the next reminder, a change signal, or shutdown
    pub async fn run(self) {
        tracing::info!("Reminder scheduler started");

        loop {
            let next = self.next_due().await;
            let sleep_for = next
                .as_ref()
                .map(|(wait, _, _)| *wait)
                .unwrap_or(IDLE_RECHECK);

            tokio::select! {
                _ = tokio::time::sleep(sleep_for) => {
                    if let Some((_, appointment, lead_minutes)) = next {
                        self.fire(appointment, lead_minutes).await;
                    }
                }
                // Settings or appointments changed → recompute the wake-up
                _ = self.notify.notified() => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Reminder scheduler received shutdown signal");
                    return;
                }
            }
        }
    }

    /// Find the next appointment whose reminder is still in the future
    ///
    /// Appointments whose reminder window already passed are marked as
    /// reminded without firing, the same way the mobile app skips them.
    async fn next_due(&self) -> Option<(Duration, Appointment, i64)> {
        let settings_repo = NotificationSettingsRepository::new(self.state.get_db());
        let settings = match settings_repo.get_or_create().await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load notification settings");
                return None;
            }
        };
        if !settings.is_active {
            return None;
        }

        let tz = self.state.config.timezone;
        let repo = AppointmentRepository::new(self.state.get_db());

        loop {
            let now = chrono::Utc::now().with_timezone(&tz);
            let today = now.date_naive().format("%Y-%m-%d").to_string();
            let now_minutes = (now.hour() * 60 + now.minute()) as i64;

            let appointment = match repo.find_next_unreminded(&today, now_minutes).await {
                Ok(Some(appointment)) => appointment,
                Ok(None) => return None,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to query upcoming appointments");
                    return None;
                }
            };

            let date = parse_date(&appointment.date).ok()?;
            let start_millis = date_minutes_to_millis(date, appointment.start_minutes as u32, tz);
            let fire_at = start_millis - settings.lead_minutes * 60_000;
            let now_ms = shared::util::now_millis();

            if fire_at <= now_ms {
                // Window already passed; skip without firing
                let id = appointment_id(&appointment);
                if let Err(e) = repo.mark_reminded(&id).await {
                    tracing::warn!(error = %e, id = %id, "Failed to skip stale reminder");
                    return None;
                }
                continue;
            }

            let wait = Duration::from_millis((fire_at - now_ms) as u64);
            return Some((wait, appointment, settings.lead_minutes));
        }
    }

    /// Emit the reminder event and mark the appointment
    async fn fire(&self, appointment: Appointment, lead_minutes: i64) {
        let id = appointment_id(&appointment);

        tracing::info!(
            client = %appointment.client_name,
            service = %appointment.service_name,
            date = %appointment.date,
            time = %appointment.start_time,
            "Appointment reminder due"
        );

        let event = ReminderEvent {
            client_name: appointment.client_name.clone(),
            service_name: appointment.service_name.clone(),
            date: appointment.date.clone(),
            start_time: appointment.start_time.clone(),
            lead_minutes,
        };
        self.state.broadcast_sync(RESOURCE, "due", &id, Some(&event));

        let repo = AppointmentRepository::new(self.state.get_db());
        if let Err(e) = repo.mark_reminded(&id).await {
            tracing::warn!(error = %e, id = %id, "Failed to mark reminder as fired");
        }
    }
}

fn appointment_id(appointment: &Appointment) -> String {
    appointment
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default()
}
