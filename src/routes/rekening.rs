use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    audit::log_audit,
    dto::rekening::{CreateRekeningRequest, RekeningList, UpdateRekeningRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Rekening,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_rekening))
        .route(
            "/{id}",
            get(list_rekening).put(update_rekening).delete(delete_rekening),
        )
}

#[utoipa::path(
    post,
    path = "/api/rekening",
    request_body = CreateRekeningRequest,
    responses(
        (status = 200, description = "Create bank account", body = ApiResponse<Rekening>),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Owner not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Rekening"
)]
pub async fn create_rekening(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRekeningRequest>,
) -> AppResult<Json<ApiResponse<Rekening>>> {
    if payload.nama_bank.trim().is_empty()
        || payload.nomor_rekening.trim().is_empty()
        || payload.atas_nama.trim().is_empty()
    {
        return Err(AppError::BadRequest("Semua field wajib diisi!".to_string()));
    }
    if payload.nomor_rekening.len() > 30 {
        return Err(AppError::BadRequest(
            "Nomor rekening terlalu panjang!".to_string(),
        ));
    }

    let owner: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(payload.user_id)
        .fetch_optional(&state.pool)
        .await?;
    if owner.is_none() {
        return Err(AppError::NotFound);
    }

    let rekening = sqlx::query_as::<_, Rekening>(
        r#"
        INSERT INTO rekening (user_id, nama_bank, nomor_rekening, atas_nama)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(payload.user_id)
    .bind(payload.nama_bank)
    .bind(payload.nomor_rekening)
    .bind(payload.atas_nama)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "rekening_create",
        Some("rekening"),
        Some(serde_json::json!({ "rekening_id": rekening.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Json(ApiResponse::success(
        "Rekening berhasil ditambahkan!",
        rekening,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/rekening/{user_id}",
    params(
        ("user_id" = i32, Path, description = "Owner user ID")
    ),
    responses(
        (status = 200, description = "List bank accounts", body = ApiResponse<RekeningList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Rekening"
)]
pub async fn list_rekening(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<ApiResponse<RekeningList>>> {
    let items = sqlx::query_as::<_, Rekening>(
        "SELECT * FROM rekening WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success(
        "Ok",
        RekeningList { items },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    put,
    path = "/api/rekening/{id}",
    params(
        ("id" = i32, Path, description = "Rekening ID")
    ),
    request_body = UpdateRekeningRequest,
    responses(
        (status = 200, description = "Updated bank account", body = ApiResponse<Rekening>),
        (status = 404, description = "Not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Rekening"
)]
pub async fn update_rekening(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRekeningRequest>,
) -> AppResult<Json<ApiResponse<Rekening>>> {
    let existing = sqlx::query_as::<_, Rekening>("SELECT * FROM rekening WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let nama_bank = payload.nama_bank.unwrap_or(existing.nama_bank);
    let nomor_rekening = payload.nomor_rekening.unwrap_or(existing.nomor_rekening);
    let atas_nama = payload.atas_nama.unwrap_or(existing.atas_nama);
    if nomor_rekening.trim().is_empty() || nomor_rekening.len() > 30 {
        return Err(AppError::BadRequest(
            "Nomor rekening tidak valid!".to_string(),
        ));
    }

    let rekening = sqlx::query_as::<_, Rekening>(
        r#"
        UPDATE rekening
        SET nama_bank = $2, nomor_rekening = $3, atas_nama = $4
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(nama_bank)
    .bind(nomor_rekening)
    .bind(atas_nama)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success(
        "Rekening berhasil diperbarui!",
        rekening,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/rekening/{id}",
    params(
        ("id" = i32, Path, description = "Rekening ID")
    ),
    responses(
        (status = 200, description = "Deleted bank account"),
        (status = 404, description = "Not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Rekening"
)]
pub async fn delete_rekening(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let result = sqlx::query("DELETE FROM rekening WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "rekening_delete",
        Some("rekening"),
        Some(serde_json::json!({ "rekening_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Json(ApiResponse::success(
        "Rekening berhasil dihapus!",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
