//! HTTP status of each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Codes not listed are client errors (400)
    pub fn http_status(&self) -> StatusCode {
        use ErrorCode::*;

        match self {
            Success => StatusCode::OK,
            NotAuthenticated | InvalidCredentials | TokenExpired | TokenInvalid
            | AccountDisabled => StatusCode::UNAUTHORIZED,
            PaymentDeclined => StatusCode::PAYMENT_REQUIRED,
            PermissionDenied => StatusCode::FORBIDDEN,
            NotFound | OrderNotFound | ProductNotFound | IngredientNotFound
            | CartItemNotFound => StatusCode::NOT_FOUND,
            AlreadyExists | EmailAlreadyRegistered | IngredientNameExists | InsufficientStock
            | InvalidStatusTransition => StatusCode::CONFLICT,
            // well-formed, but breaks a business rule
            ProductUnavailable | CartEmpty | InvalidCustomization => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Unknown | InternalError | DatabaseError | ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
