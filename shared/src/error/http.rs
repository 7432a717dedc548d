//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::AppointmentNotFound
            | Self::ServiceNotFound
            | Self::ClientNotFound
            | Self::DayOffNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::DayOffExists => StatusCode::CONFLICT,

            // 422 Unprocessable Entity (booking rejections; the user can
            // adjust the request and resubmit)
            Self::BookingDayOff
            | Self::BookingClosedDay
            | Self::BookingOutsideHours
            | Self::BookingConflict
            | Self::ServiceInactive => StatusCode::UNPROCESSABLE_ENTITY,

            // 413 Payload Too Large
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::ImageProcessingFailed
            | Self::FileStorageFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::AppointmentNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::ClientNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_booking_rejections_are_unprocessable() {
        for code in [
            ErrorCode::BookingDayOff,
            ErrorCode::BookingClosedDay,
            ErrorCode::BookingOutsideHours,
            ErrorCode::BookingConflict,
        ] {
            assert_eq!(code.http_status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn test_transient_errors_are_retryable() {
        assert_eq!(
            ErrorCode::TimeoutError.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_default_is_bad_request() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ServiceInvalidDuration.http_status(),
            StatusCode::BAD_REQUEST
        );
    }
}
