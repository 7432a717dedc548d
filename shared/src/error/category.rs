//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 4xxx: Booking errors
/// - 5xxx: File upload errors
/// - 6xxx: Service catalog errors
/// - 7xxx: Schedule configuration errors
/// - 8xxx: Client errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Booking errors (4xxx)
    Booking,
    /// File upload errors (5xxx)
    Upload,
    /// Service catalog errors (6xxx)
    Service,
    /// Schedule configuration errors (7xxx)
    Schedule,
    /// Client errors (8xxx)
    Client,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..4000 => Self::General,
            4000..5000 => Self::Booking,
            5000..6000 => Self::Upload,
            6000..7000 => Self::Service,
            7000..8000 => Self::Schedule,
            8000..9000 => Self::Client,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Booking => "booking",
            Self::Upload => "upload",
            Self::Service => "service",
            Self::Schedule => "schedule",
            Self::Client => "client",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(3), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(4104), ErrorCategory::Booking);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Upload);
        assert_eq!(ErrorCategory::from_code(6002), ErrorCategory::Service);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::Schedule);
        assert_eq!(ErrorCategory::from_code(8001), ErrorCategory::Client);
        assert_eq!(ErrorCategory::from_code(9002), ErrorCategory::System);
    }

    #[test]
    fn test_code_category() {
        assert_eq!(
            ErrorCode::BookingConflict.category(),
            ErrorCategory::Booking
        );
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }
}
