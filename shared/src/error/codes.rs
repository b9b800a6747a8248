//! Numeric error codes
//!
//! The thousands digit names the family (see [`super::ErrorCategory`]);
//! clients switch on the number, never on the message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Serialized as a bare number; [`ErrorCode::message`] holds the default text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // 0xxx
    Success = 0,
    Unknown = 1,
    ValidationFailed = 2,
    NotFound = 3,
    AlreadyExists = 4,
    InvalidRequest = 5,
    TooManyRequests = 9,

    // 1xxx
    NotAuthenticated = 1001,
    InvalidCredentials = 1002,
    TokenExpired = 1003,
    TokenInvalid = 1004,
    AccountDisabled = 1007,
    EmailAlreadyRegistered = 1008,
    PasswordPolicy = 1009,

    // 2xxx
    PermissionDenied = 2001,

    // 4xxx
    OrderNotFound = 4001,
    InvalidStatusTransition = 4002,
    AddressRequired = 4003,

    // 5xxx
    PaymentDeclined = 5001,
    InvalidCardNumber = 5002,

    // 6xxx
    ProductNotFound = 6001,
    ProductUnavailable = 6002,
    InsufficientStock = 6003,
    IngredientNotFound = 6004,
    IngredientNameExists = 6005,
    InvalidCustomization = 6006,
    ProductKindMismatch = 6007,

    // 7xxx
    CartEmpty = 7001,
    CartItemNotFound = 7002,
    InvalidQuantity = 7003,

    // 9xxx
    InternalError = 9001,
    DatabaseError = 9002,
    ConfigError = 9101,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 33] = [
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::InvalidRequest,
        ErrorCode::TooManyRequests,
        ErrorCode::NotAuthenticated,
        ErrorCode::InvalidCredentials,
        ErrorCode::TokenExpired,
        ErrorCode::TokenInvalid,
        ErrorCode::AccountDisabled,
        ErrorCode::EmailAlreadyRegistered,
        ErrorCode::PasswordPolicy,
        ErrorCode::PermissionDenied,
        ErrorCode::OrderNotFound,
        ErrorCode::InvalidStatusTransition,
        ErrorCode::AddressRequired,
        ErrorCode::PaymentDeclined,
        ErrorCode::InvalidCardNumber,
        ErrorCode::ProductNotFound,
        ErrorCode::ProductUnavailable,
        ErrorCode::InsufficientStock,
        ErrorCode::IngredientNotFound,
        ErrorCode::IngredientNameExists,
        ErrorCode::InvalidCustomization,
        ErrorCode::ProductKindMismatch,
        ErrorCode::CartEmpty,
        ErrorCode::CartItemNotFound,
        ErrorCode::InvalidQuantity,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
        ErrorCode::ConfigError,
    ];

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
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::EmailAlreadyRegistered => "Email is already registered",
            ErrorCode::PasswordPolicy => "Password must be between 8 and 128 characters",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidStatusTransition => "Order status transition is not allowed",
            ErrorCode::AddressRequired => "Delivery address is incomplete",

            // Payment
            ErrorCode::PaymentDeclined => "Payment was declined",
            ErrorCode::InvalidCardNumber => "Card number is invalid",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductUnavailable => "Product is not available",
            ErrorCode::InsufficientStock => "Insufficient stock",
            ErrorCode::IngredientNotFound => "Ingredient not found",
            ErrorCode::IngredientNameExists => "Ingredient name already exists",
            ErrorCode::InvalidCustomization => "Invalid pizza customization",
            ErrorCode::ProductKindMismatch => "Product kind does not match",

            // Cart
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::CartItemNotFound => "Cart item not found",
            ErrorCode::InvalidQuantity => "Quantity must be a positive integer",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
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
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
