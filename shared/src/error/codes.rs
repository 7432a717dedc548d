//! Unified error codes for the salon server
//!
//! Error codes are shared between the server and its frontends so that a
//! rejection can be matched on a stable number rather than on message text.
//! Codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Booking / appointment errors
//! - 5xxx: File upload errors
//! - 6xxx: Service catalog errors
//! - 7xxx: Schedule configuration errors
//! - 8xxx: Client errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Booking ====================
    /// Appointment not found
    AppointmentNotFound = 4001,
    /// Requested date is a configured day off
    BookingDayOff = 4101,
    /// Salon is closed on the requested weekday
    BookingClosedDay = 4102,
    /// Requested start time falls outside business hours
    BookingOutsideHours = 4103,
    /// Requested slot overlaps an existing appointment
    BookingConflict = 4104,

    // ==================== 5xxx: File Upload ====================
    /// File too large
    FileTooLarge = 5001,
    /// Unsupported file format
    UnsupportedFileFormat = 5002,
    /// Invalid image file
    InvalidImageFile = 5003,
    /// No file provided
    NoFileProvided = 5004,
    /// Empty file provided
    EmptyFile = 5005,
    /// Image processing failed
    ImageProcessingFailed = 5006,
    /// File storage failed
    FileStorageFailed = 5007,

    // ==================== 6xxx: Service ====================
    /// Service not found
    ServiceNotFound = 6001,
    /// Service is deactivated and cannot take new bookings
    ServiceInactive = 6002,
    /// Service duration must be positive
    ServiceInvalidDuration = 6003,
    /// Service price must not be negative
    ServiceInvalidPrice = 6004,

    // ==================== 7xxx: Schedule ====================
    /// Business hours entry is invalid (open must precede close)
    BusinessHoursInvalid = 7001,
    /// Unknown weekday key
    UnknownWeekday = 7002,
    /// Day-off entry not found
    DayOffNotFound = 7003,
    /// Day-off entry already exists for that date
    DayOffExists = 7004,

    // ==================== 8xxx: Client ====================
    /// Client not found
    ClientNotFound = 8001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Booking
            ErrorCode::AppointmentNotFound => "Appointment not found",
            ErrorCode::BookingDayOff => "The salon is closed on that date",
            ErrorCode::BookingClosedDay => "The salon does not open on that weekday",
            ErrorCode::BookingOutsideHours => "Requested time is outside business hours",
            ErrorCode::BookingConflict => "Requested time conflicts with another appointment",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "File storage failed",

            // Service
            ErrorCode::ServiceNotFound => "Service not found",
            ErrorCode::ServiceInactive => "Service is deactivated",
            ErrorCode::ServiceInvalidDuration => "Service duration must be greater than zero",
            ErrorCode::ServiceInvalidPrice => "Service price must not be negative",

            // Schedule
            ErrorCode::BusinessHoursInvalid => "Opening time must precede closing time",
            ErrorCode::UnknownWeekday => "Unknown weekday key",
            ErrorCode::DayOffNotFound => "Day-off entry not found",
            ErrorCode::DayOffExists => "Day-off entry already exists for that date",

            // Client
            ErrorCode::ClientNotFound => "Client not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            6 => ErrorCode::InvalidFormat,
            7 => ErrorCode::RequiredField,
            8 => ErrorCode::ValueOutOfRange,

            4001 => ErrorCode::AppointmentNotFound,
            4101 => ErrorCode::BookingDayOff,
            4102 => ErrorCode::BookingClosedDay,
            4103 => ErrorCode::BookingOutsideHours,
            4104 => ErrorCode::BookingConflict,

            5001 => ErrorCode::FileTooLarge,
            5002 => ErrorCode::UnsupportedFileFormat,
            5003 => ErrorCode::InvalidImageFile,
            5004 => ErrorCode::NoFileProvided,
            5005 => ErrorCode::EmptyFile,
            5006 => ErrorCode::ImageProcessingFailed,
            5007 => ErrorCode::FileStorageFailed,

            6001 => ErrorCode::ServiceNotFound,
            6002 => ErrorCode::ServiceInactive,
            6003 => ErrorCode::ServiceInvalidDuration,
            6004 => ErrorCode::ServiceInvalidPrice,

            7001 => ErrorCode::BusinessHoursInvalid,
            7002 => ErrorCode::UnknownWeekday,
            7003 => ErrorCode::DayOffNotFound,
            7004 => ErrorCode::DayOffExists,

            8001 => ErrorCode::ClientNotFound,

            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9003 => ErrorCode::NetworkError,
            9004 => ErrorCode::TimeoutError,
            9005 => ErrorCode::ConfigError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::BookingConflict.code(), 4104);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_round_trip() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::BookingDayOff,
            ErrorCode::ServiceInactive,
            ErrorCode::DayOffExists,
            ErrorCode::ClientNotFound,
            ErrorCode::InternalError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::BookingConflict).unwrap();
        assert_eq!(json, "4104");
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorCode::BookingConflict);
    }
}
