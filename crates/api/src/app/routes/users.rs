use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, OriginalUri, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio_stream::StreamExt;

use userhub_core::{validation, UserId, UserRequest, UserResponse};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(save_user).get(list_users))
        .route("/:id", get(get_user).patch(update_user).delete(delete_user))
}

/// `POST /users` → 201 with an empty body.
pub async fn save_user(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<UserRequest>, JsonRejection>,
) -> Response {
    let path = uri.path();
    let Json(request) = match body {
        Ok(b) => b,
        Err(rej) => return errors::json_rejection_to_response(rej, path),
    };

    if let Err(e) = validation::validate_create(&request).into_result() {
        return errors::domain_error_to_response(e, path);
    }

    match services.users.save(&request).await {
        Ok(_) => StatusCode::CREATED.into_response(),
        Err(e) => errors::domain_error_to_response(e, path),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Response {
    let users = &services.users;
    match users.find_by_id(&UserId::new(id)).await {
        Ok(user) => (StatusCode::OK, Json(users.mapper().to_response(user))).into_response(),
        Err(e) => errors::domain_error_to_response(e, uri.path()),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let users = &services.users;
    let mapper = users.mapper();
    let mut stream = users.find_all();

    let mut items: Vec<UserResponse> = Vec::new();
    while let Some(next) = stream.next().await {
        match next {
            Ok(user) => items.push(mapper.to_response(user)),
            Err(e) => return errors::domain_error_to_response(e, uri.path()),
        }
    }

    (StatusCode::OK, Json(items)).into_response()
}

/// `PATCH /users/:id` → 200 with the merged user.
pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    body: Result<Json<UserRequest>, JsonRejection>,
) -> Response {
    let path = uri.path();
    let Json(request) = match body {
        Ok(b) => b,
        Err(rej) => return errors::json_rejection_to_response(rej, path),
    };

    if let Err(e) = validation::validate_update(&request).into_result() {
        return errors::domain_error_to_response(e, path);
    }

    let users = &services.users;
    match users.update(&UserId::new(id), &request).await {
        Ok(user) => (StatusCode::OK, Json(users.mapper().to_response(user))).into_response(),
        Err(e) => errors::domain_error_to_response(e, path),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Response {
    match services.users.delete(&UserId::new(id)).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::domain_error_to_response(e, uri.path()),
    }
}
