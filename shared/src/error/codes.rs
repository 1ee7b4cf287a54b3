//! Unified error codes for Señor Arroz
//!
//! This module defines all error codes shared by the REST client and the
//! POS core. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Catalog errors
//! - 8xxx: Customer errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
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

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Operation only allowed on the day the order was created
    SameDayRequired = 2003,

    // ==================== 4xxx: Order ====================
    OrderNotFound = 4001,
    OrderAlreadyDelivered = 4002,
    OrderAlreadyCancelled = 4003,
    OrderItemNotFound = 4006,
    OrderEmpty = 4007,
    /// Status change not allowed by the state machine
    InvalidStatusTransition = 4008,
    /// Delivery order needs a deliveryman before going on the way
    DeliverymanRequired = 4009,
    /// No branch selected for the operator
    BranchRequired = 4010,

    // ==================== 5xxx: Payment ====================
    PaymentFailed = 5001,
    /// Payments add up to more than the order total
    PaymentExceedsTotal = 5002,
    PaymentInvalidMethod = 5003,
    PaymentNotFound = 5006,
    /// Only one app payment is allowed per order
    AppPaymentAlreadyExists = 5007,

    // ==================== 6xxx: Catalog ====================
    ProductNotFound = 6001,
    ProductInvalidPrice = 6002,
    CategoryNotFound = 6101,

    // ==================== 8xxx: Customer ====================
    CustomerNotFound = 8001,
    AddressNotFound = 8002,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    /// Local storage failure
    StorageError = 9002,
    ConfigError = 9003,
    NetworkError = 9004,
    TimeoutError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operación completada",
            ErrorCode::Unknown => "Ocurrió un error desconocido",
            ErrorCode::ValidationFailed => "La validación falló",
            ErrorCode::NotFound => "Recurso no encontrado",
            ErrorCode::AlreadyExists => "El recurso ya existe",
            ErrorCode::InvalidRequest => "Solicitud inválida",
            ErrorCode::InvalidFormat => "Formato inválido",
            ErrorCode::RequiredField => "Falta un campo obligatorio",
            ErrorCode::ValueOutOfRange => "Valor fuera de rango",

            ErrorCode::NotAuthenticated => "Debe iniciar sesión",
            ErrorCode::InvalidCredentials => "Usuario o contraseña incorrectos",
            ErrorCode::TokenExpired => "La sesión expiró",
            ErrorCode::TokenInvalid => "Token de sesión inválido",
            ErrorCode::SessionExpired => "La sesión expiró",

            ErrorCode::PermissionDenied => "No tiene permiso para esta acción",
            ErrorCode::RoleRequired => "Se requiere un rol específico",
            ErrorCode::SameDayRequired => "Solo se permite el mismo día del pedido",

            ErrorCode::OrderNotFound => "Pedido no encontrado",
            ErrorCode::OrderAlreadyDelivered => "El pedido ya fue entregado",
            ErrorCode::OrderAlreadyCancelled => "El pedido ya fue cancelado",
            ErrorCode::OrderItemNotFound => "Producto del pedido no encontrado",
            ErrorCode::OrderEmpty => "El pedido no tiene productos",
            ErrorCode::InvalidStatusTransition => "Cambio de estado no permitido",
            ErrorCode::DeliverymanRequired => "Debe asignar un domiciliario",
            ErrorCode::BranchRequired => "No hay una sucursal seleccionada",

            ErrorCode::PaymentFailed => "No se pudo registrar el pago",
            ErrorCode::PaymentExceedsTotal => "Los pagos superan el total del pedido",
            ErrorCode::PaymentInvalidMethod => "Método de pago inválido",
            ErrorCode::PaymentNotFound => "Pago no encontrado",
            ErrorCode::AppPaymentAlreadyExists => "Solo se permite un pago por app",

            ErrorCode::ProductNotFound => "Producto no encontrado",
            ErrorCode::ProductInvalidPrice => "El producto tiene un precio inválido",
            ErrorCode::CategoryNotFound => "Categoría no encontrada",

            ErrorCode::CustomerNotFound => "Cliente no encontrado",
            ErrorCode::AddressNotFound => "Dirección no encontrada",

            ErrorCode::InternalError => "Error interno",
            ErrorCode::StorageError => "Error de almacenamiento local",
            ErrorCode::ConfigError => "Error de configuración",
            ErrorCode::NetworkError => "Error de conexión con el servidor",
            ErrorCode::TimeoutError => "El servidor tardó demasiado en responder",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
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
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::SameDayRequired),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyDelivered),
            4003 => Ok(ErrorCode::OrderAlreadyCancelled),
            4006 => Ok(ErrorCode::OrderItemNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::InvalidStatusTransition),
            4009 => Ok(ErrorCode::DeliverymanRequired),
            4010 => Ok(ErrorCode::BranchRequired),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::PaymentExceedsTotal),
            5003 => Ok(ErrorCode::PaymentInvalidMethod),
            5006 => Ok(ErrorCode::PaymentNotFound),
            5007 => Ok(ErrorCode::AppPaymentAlreadyExists),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6101 => Ok(ErrorCode::CategoryNotFound),

            // Customer
            8001 => Ok(ErrorCode::CustomerNotFound),
            8002 => Ok(ErrorCode::AddressNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::NetworkError),
            9005 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
