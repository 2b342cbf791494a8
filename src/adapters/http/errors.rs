use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::auth::AuthError;
use crate::domain::invoice::InvoiceError;

use super::dtos::ErrorResponse;

/// Maps domain errors to HTTP responses.
///
/// Business-rule rejections are 422 so clients can distinguish "valid
/// request, forbidden by ledger state" from malformed input (400).
/// Transaction failures are 503 because they are retryable.
#[derive(Debug)]
pub enum ApiError {
  /// 400 Bad Request
  Validation(String),

  /// 401 Unauthorized
  Unauthorized(String),

  /// 404 Not Found
  NotFound(String),

  /// 422 Unprocessable Entity
  BusinessRule(String),

  /// 503 Service Unavailable
  ServiceUnavailable(String),

  /// 500 Internal Server Error
  Internal(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg)
      | ApiError::Unauthorized(msg)
      | ApiError::NotFound(msg)
      | ApiError::BusinessRule(msg)
      | ApiError::ServiceUnavailable(msg)
      | ApiError::Internal(msg) => write!(f, "{}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BusinessRule(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();

    let message = match self {
      // Never leak storage details to clients.
      ApiError::Internal(msg) => {
        tracing::error!("Internal error: {}", msg);
        "An internal server error occurred".to_string()
      }
      other => other.to_string(),
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(ErrorResponse {
        success: false,
        message,
        status_code: status.as_u16(),
      })
  }
}

impl From<InvoiceError> for ApiError {
  fn from(error: InvoiceError) -> Self {
    match error {
      InvoiceError::Validation(err) => ApiError::Validation(err.to_string()),
      InvoiceError::NotFound(msg) => ApiError::NotFound(msg),
      err @ (InvoiceError::ArchivedInvoice
      | InvoiceError::AlreadySettled
      | InvoiceError::Overpayment { .. }
      | InvoiceError::FutureDate
      | InvoiceError::NotArchived
      | InvoiceError::InvoiceNumberAlreadyExists(_)) => ApiError::BusinessRule(err.to_string()),
      InvoiceError::TransactionFailed(msg) => ApiError::ServiceUnavailable(msg),
      InvoiceError::Database(err) => ApiError::Internal(err.to_string()),
      InvoiceError::Internal(msg) => ApiError::Internal(msg),
    }
  }
}

impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::InvalidSession => {
        ApiError::Unauthorized("Authentication required. Please log in.".to_string())
      }
      AuthError::Database(err) => ApiError::Internal(err.to_string()),
    }
  }
}

impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let message = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errs)| {
        errs.iter().map(move |e| {
          e.message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid field: {}", field))
        })
      })
      .collect::<Vec<_>>()
      .join(", ");

    ApiError::Validation(message)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_status_codes() {
    assert_eq!(
      ApiError::from(InvoiceError::not_found()).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::from(InvoiceError::ArchivedInvoice).status_code(),
      StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
      ApiError::from(InvoiceError::Overpayment {
        amount: dec!(100),
        balance_due: dec!(90),
      })
      .status_code(),
      StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
      ApiError::from(InvoiceError::TransactionFailed("pool timeout".to_string())).status_code(),
      StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
      ApiError::from(AuthError::InvalidSession).status_code(),
      StatusCode::UNAUTHORIZED
    );
  }

  #[test]
  fn test_internal_errors_are_not_leaked() {
    let err = ApiError::Internal("connection refused at 10.0.0.5".to_string());
    let response = err.error_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
