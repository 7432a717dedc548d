//! Database Models

// Serde helpers
pub mod serde_helpers;
pub mod serde_thing;

// People and catalog
pub mod client;
pub mod service;

// Scheduling
pub mod appointment;
pub mod business_hours;
pub mod day_off;

// Configuration
pub mod notification_settings;
pub mod salon_info;

// Re-exports
pub use appointment::{
    Appointment, AppointmentCreate, AppointmentStatus, AppointmentStatusUpdate, AppointmentUpdate,
};
pub use business_hours::{BusinessHours, BusinessHoursUpdate, DayHours, WEEKDAY_KEYS};
pub use client::{Client, ClientCreate, ClientUpdate};
pub use day_off::{DayOffCalendar, DayOffCreate, DayOffEntry};
pub use notification_settings::{NotificationSettings, NotificationSettingsUpdate};
pub use salon_info::{SalonInfo, SalonInfoUpdate};
pub use service::{Service, ServiceCreate, ServiceUpdate};
