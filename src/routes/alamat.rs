use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::alamat::{AlamatList, CreateAlamatRequest, UpdateAlamatRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Alamat,
    response::ApiResponse,
    services::alamat_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_alamat))
        .route(
            "/{id}",
            get(list_alamat).put(update_alamat).delete(delete_alamat),
        )
}

#[utoipa::path(
    post,
    path = "/api/alamat",
    request_body = CreateAlamatRequest,
    responses(
        (status = 200, description = "Create address", body = ApiResponse<Alamat>),
        (status = 400, description = "Missing fields or coordinates out of range"),
        (status = 404, description = "Owner not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Alamat"
)]
pub async fn create_alamat(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateAlamatRequest>,
) -> AppResult<Json<ApiResponse<Alamat>>> {
    let resp = alamat_service::create_alamat(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/alamat/{user_id}",
    params(
        ("user_id" = i32, Path, description = "Owner user ID")
    ),
    responses(
        (status = 200, description = "List addresses", body = ApiResponse<AlamatList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Alamat"
)]
pub async fn list_alamat(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<ApiResponse<AlamatList>>> {
    let resp = alamat_service::list_alamat(&state, user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/alamat/{id}",
    params(
        ("id" = i32, Path, description = "Alamat ID")
    ),
    request_body = UpdateAlamatRequest,
    responses(
        (status = 200, description = "Updated address", body = ApiResponse<Alamat>),
        (status = 400, description = "Coordinates out of range"),
        (status = 404, description = "Not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Alamat"
)]
pub async fn update_alamat(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAlamatRequest>,
) -> AppResult<Json<ApiResponse<Alamat>>> {
    let resp = alamat_service::update_alamat(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/alamat/{id}",
    params(
        ("id" = i32, Path, description = "Alamat ID")
    ),
    responses(
        (status = 200, description = "Deleted address"),
        (status = 404, description = "Not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Alamat"
)]
pub async fn delete_alamat(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = alamat_service::delete_alamat(&state, id).await?;
    Ok(Json(resp))
}
