use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};

use beerstock_core::BeerId;

use crate::app::services::AppServices;
use crate::app::{dto, errors, validation};

// `GET /:id` looks a beer up by name; every other `:id` segment is a numeric id.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_beers).post(create_beer))
        .route("/:id", get(find_by_name).delete(delete_beer))
        .route("/:id/increment", patch(increment))
        .route("/:id/decrement", patch(decrement))
}

pub async fn create_beer(
    Extension(services): Extension<AppServices>,
    body: Result<Json<dto::CreateBeerRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let new_beer = match validation::validate_create(body) {
        Ok(b) => b,
        Err(violations) => return errors::validation_error(violations),
    };

    match services.manager().create(new_beer).await {
        Ok(beer) => (StatusCode::CREATED, Json(dto::BeerResponse::from(beer))).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn find_by_name(
    Extension(services): Extension<AppServices>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.manager().find_by_name(&name).await {
        Ok(beer) => (StatusCode::OK, Json(dto::BeerResponse::from(beer))).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn list_beers(Extension(services): Extension<AppServices>) -> axum::response::Response {
    match services.manager().list_all().await {
        Ok(beers) => {
            let body: Vec<dto::BeerResponse> = beers.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn delete_beer(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BeerId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid beer id"),
    };

    match services.manager().delete_by_id(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn increment(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
    body: Result<Json<dto::QuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    adjust(services, id, body, StockChange::Increment).await
}

pub async fn decrement(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
    body: Result<Json<dto::QuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    adjust(services, id, body, StockChange::Decrement).await
}

#[derive(Debug, Copy, Clone)]
enum StockChange {
    Increment,
    Decrement,
}

async fn adjust(
    services: AppServices,
    id: String,
    body: Result<Json<dto::QuantityRequest>, JsonRejection>,
    change: StockChange,
) -> axum::response::Response {
    let id: BeerId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid beer id"),
    };

    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let amount = match validation::validate_quantity(body) {
        Ok(a) => a,
        Err(violations) => return errors::validation_error(violations),
    };

    let result = match change {
        StockChange::Increment => services.manager().increment(id, amount).await,
        StockChange::Decrement => services.manager().decrement(id, amount).await,
    };

    match result {
        Ok(beer) => (StatusCode::OK, Json(dto::BeerResponse::from(beer))).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}
