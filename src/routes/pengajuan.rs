use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State, multipart::Field},
    routing::{get, post, put},
};
use rust_decimal::Decimal;

use crate::{
    dto::pengajuan::{
        CreatePengajuanInput, DijemputRequest, MengantarRequest, PengajuanDetail, PengajuanList,
        TerimaPengajuanRequest, TolakPengajuanRequest,
    },
    entity::penjualan_sampah::StatusPengajuan,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Pengajuan,
    response::ApiResponse,
    routes::params::PengajuanListQuery,
    services::pengajuan_service,
    state::AppState,
    upload::save_upload,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_pengajuan))
        .route("/{user_id}", get(list_by_user))
        .route("/{user_id}/status/{status}", get(list_by_user_status))
        .route("/status/{status}", get(list_by_status))
        .route("/id/{id}", get(get_pengajuan))
        .route("/detail/{id}", get(detail_pengajuan))
        .route("/terima/{id}", put(terima_pengajuan))
        .route("/tolak/{id}", put(tolak_pengajuan))
        .route("/mengantar/{id}", put(mengantar))
        .route("/dijemput/{id}", put(dijemput))
}

pub fn penawaran_router() -> Router<AppState> {
    Router::new().route("/tolak/{id}", put(tolak_penawaran))
}

pub fn penjualan_router() -> Router<AppState> {
    Router::new().route("/selesai/{id}", put(selesai))
}

#[utoipa::path(
    post,
    path = "/api/pengajuan",
    responses(
        (status = 200, description = "Create submission (multipart: user_id, kategori, berat, gambar)", body = ApiResponse<Pengajuan>),
        (status = 400, description = "Missing fields or invalid file"),
        (status = 404, description = "Owner not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pengajuan"
)]
pub async fn create_pengajuan(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Pengajuan>>> {
    let mut user_id: Option<i32> = None;
    let mut kategori: Option<String> = None;
    let mut berat: Option<Decimal> = None;
    let mut gambar: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = next_field(&mut multipart).await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "user_id" => {
                let text = text_field(field).await?;
                user_id = Some(
                    text.trim()
                        .parse::<i32>()
                        .map_err(|_| AppError::BadRequest("user_id tidak valid".to_string()))?,
                );
            }
            "kategori" => kategori = Some(text_field(field).await?),
            "berat" => {
                let text = text_field(field).await?;
                berat = Some(
                    text.trim()
                        .parse::<Decimal>()
                        .map_err(|_| AppError::BadRequest("Berat tidak valid".to_string()))?,
                );
            }
            "gambar" => {
                let filename = field.file_name().map(std::string::ToString::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Upload(e.to_string()))?
                    .to_vec();
                gambar = Some((filename, bytes));
            }
            _ => {}
        }
    }

    let (user_id, kategori, berat) = match (user_id, kategori, berat) {
        (Some(u), Some(k), Some(b)) => (u, k, b),
        _ => {
            return Err(AppError::BadRequest("Semua field wajib diisi!".to_string()));
        }
    };
    let (filename, bytes) =
        gambar.ok_or_else(|| AppError::BadRequest("Gambar wajib diunggah!".to_string()))?;

    let stored = save_upload(&state.config.upload_dir, filename.as_deref(), &bytes).await?;

    let input = CreatePengajuanInput {
        user_id,
        kategori,
        berat,
        gambar: stored,
    };
    let resp = pengajuan_service::create_pengajuan(&state, &user, input).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/pengajuan/{user_id}",
    params(("user_id" = i32, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "List submissions for a user", body = ApiResponse<PengajuanList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Pengajuan"
)]
pub async fn list_by_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<ApiResponse<PengajuanList>>> {
    let resp = pengajuan_service::list_by_user(&state, user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/pengajuan/{user_id}/status/{status}",
    params(
        ("user_id" = i32, Path, description = "Owner user ID"),
        ("status" = String, Path, description = "Submission status")
    ),
    responses(
        (status = 200, description = "List a user's submissions by status", body = ApiResponse<PengajuanList>),
        (status = 400, description = "Unknown status"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pengajuan"
)]
pub async fn list_by_user_status(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((user_id, status)): Path<(i32, String)>,
) -> AppResult<Json<ApiResponse<PengajuanList>>> {
    let status = parse_status(&status)?;
    let resp = pengajuan_service::list_by_user_status(&state, user_id, status).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/pengajuan/status/{status}",
    params(
        ("status" = String, Path, description = "Submission status"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "List all submissions by status (admin only)", body = ApiResponse<PengajuanList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pengajuan"
)]
pub async fn list_by_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(status): Path<String>,
    Query(query): Query<PengajuanListQuery>,
) -> AppResult<Json<ApiResponse<PengajuanList>>> {
    let status = parse_status(&status)?;
    let resp = pengajuan_service::list_by_status(&state, &user, status, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/pengajuan/id/{id}",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Get submission", body = ApiResponse<Pengajuan>),
        (status = 404, description = "Not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pengajuan"
)]
pub async fn get_pengajuan(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Pengajuan>>> {
    let resp = pengajuan_service::get_pengajuan(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/pengajuan/detail/{id}",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Flattened submission detail", body = ApiResponse<PengajuanDetail>),
        (status = 404, description = "Not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pengajuan"
)]
pub async fn detail_pengajuan(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<PengajuanDetail>>> {
    let resp = pengajuan_service::detail_pengajuan(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/pengajuan/terima/{id}",
    params(("id" = i32, Path, description = "Submission ID")),
    request_body = TerimaPengajuanRequest,
    responses(
        (status = 200, description = "Accept submission (admin only)", body = ApiResponse<Pengajuan>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Illegal status transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pengajuan"
)]
pub async fn terima_pengajuan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<TerimaPengajuanRequest>,
) -> AppResult<Json<ApiResponse<Pengajuan>>> {
    let resp = pengajuan_service::terima_pengajuan(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/pengajuan/tolak/{id}",
    params(("id" = i32, Path, description = "Submission ID")),
    request_body = TolakPengajuanRequest,
    responses(
        (status = 200, description = "Reject submission (admin only)", body = ApiResponse<Pengajuan>),
        (status = 400, description = "Reason too short"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Illegal status transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pengajuan"
)]
pub async fn tolak_pengajuan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<TolakPengajuanRequest>,
) -> AppResult<Json<ApiResponse<Pengajuan>>> {
    let resp = pengajuan_service::tolak_pengajuan(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/pengajuan/mengantar/{id}",
    params(("id" = i32, Path, description = "Submission ID")),
    request_body = MengantarRequest,
    responses(
        (status = 200, description = "Accept offer, self-deliver", body = ApiResponse<Pengajuan>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Illegal status transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pengajuan"
)]
pub async fn mengantar(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<MengantarRequest>,
) -> AppResult<Json<ApiResponse<Pengajuan>>> {
    let resp = pengajuan_service::mengantar(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/pengajuan/dijemput/{id}",
    params(("id" = i32, Path, description = "Submission ID")),
    request_body = DijemputRequest,
    responses(
        (status = 200, description = "Accept offer, request pickup", body = ApiResponse<Pengajuan>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Illegal status transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pengajuan"
)]
pub async fn dijemput(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<DijemputRequest>,
) -> AppResult<Json<ApiResponse<Pengajuan>>> {
    let resp = pengajuan_service::dijemput(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/penawaran/tolak/{id}",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Reject offer", body = ApiResponse<Pengajuan>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Illegal status transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pengajuan"
)]
pub async fn tolak_penawaran(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Pengajuan>>> {
    let resp = pengajuan_service::tolak_penawaran(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/penjualan/selesai/{id}",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Complete sale (multipart: bukti_transaksi)", body = ApiResponse<Pengajuan>),
        (status = 400, description = "Missing proof file"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Illegal status transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pengajuan"
)]
pub async fn selesai(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Pengajuan>>> {
    let mut bukti: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = next_field(&mut multipart).await? {
        let name = field.name().unwrap_or("").to_string();
        if name == "bukti_transaksi" {
            let filename = field.file_name().map(std::string::ToString::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Upload(e.to_string()))?
                .to_vec();
            bukti = Some((filename, bytes));
        }
    }

    let (filename, bytes) = bukti.ok_or_else(|| {
        AppError::BadRequest("Bukti transaksi wajib diunggah!".to_string())
    })?;
    let stored = save_upload(&state.config.upload_dir, filename.as_deref(), &bytes).await?;

    let resp = pengajuan_service::selesai(&state, &user, id, stored).await?;
    Ok(Json(resp))
}

async fn next_field(multipart: &mut Multipart) -> AppResult<Option<Field<'_>>> {
    multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(e.to_string()))
}

async fn text_field(field: Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::Upload(e.to_string()))
}

fn parse_status(status: &str) -> AppResult<StatusPengajuan> {
    StatusPengajuan::parse(status)
        .ok_or_else(|| AppError::BadRequest(format!("Status '{status}' tidak dikenal")))
}
