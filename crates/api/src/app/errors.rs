use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use beerstock_infra::StockError;

use crate::app::validation::FieldViolation;

pub fn stock_error_to_response(err: StockError) -> axum::response::Response {
    match err {
        StockError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "beer not found"),
        StockError::AlreadyExists(msg) => json_error(StatusCode::BAD_REQUEST, "already_exists", msg),
        StockError::CapacityExceeded(msg) => {
            json_error(StatusCode::BAD_REQUEST, "capacity_exceeded", msg)
        }
        StockError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        StockError::Store(e) => {
            tracing::error!(error = %e, "record store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn validation_error(violations: Vec<FieldViolation>) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": "validation_error",
            "message": "request has invalid fields",
            "violations": violations,
        })),
    )
        .into_response()
}

/// Malformed bodies are client errors (400), not axum's default 422.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_json", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use beerstock_infra::StoreError;

    #[test]
    fn stock_errors_map_to_fixed_statuses() {
        let cases = [
            (StockError::NotFound, StatusCode::NOT_FOUND),
            (StockError::AlreadyExists("dup".into()), StatusCode::BAD_REQUEST),
            (StockError::CapacityExceeded("over".into()), StatusCode::BAD_REQUEST),
            (StockError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                StockError::Store(StoreError::Backend("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(stock_error_to_response(err).status(), status);
        }
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let res = validation_error(vec![FieldViolation {
            field: "name",
            message: "is required".to_string(),
        }]);
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
