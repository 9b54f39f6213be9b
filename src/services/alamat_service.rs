use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::{
    audit::log_audit,
    dto::alamat::{AlamatList, CreateAlamatRequest, UpdateAlamatRequest},
    entity::{
        alamat::{ActiveModel as AlamatActive, Column as AlamatCol, Entity as Alamat, Model as AlamatModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    models,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn create_alamat(
    state: &AppState,
    payload: CreateAlamatRequest,
) -> AppResult<ApiResponse<models::Alamat>> {
    if payload.label.trim().is_empty() || payload.alamat_lengkap.trim().is_empty() {
        return Err(AppError::BadRequest("Semua field wajib diisi!".to_string()));
    }
    validate_koordinat(payload.latitude, payload.longitude)?;

    // Owner check and insert share one transaction so a concurrent user
    // delete cannot slip between them.
    let txn = state.orm.begin().await?;

    let owner = Users::find_by_id(payload.user_id).one(&txn).await?;
    if owner.is_none() {
        return Err(AppError::NotFound);
    }

    let alamat = AlamatActive {
        id: NotSet,
        user_id: Set(payload.user_id),
        label: Set(payload.label),
        alamat_lengkap: Set(payload.alamat_lengkap),
        latitude: Set(payload.latitude),
        longitude: Set(payload.longitude),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(alamat.user_id),
        "alamat_create",
        Some("alamat"),
        Some(serde_json::json!({ "alamat_id": alamat.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Alamat berhasil ditambahkan!",
        alamat_from_entity(alamat),
        Some(Meta::empty()),
    ))
}

pub async fn list_alamat(state: &AppState, user_id: i32) -> AppResult<ApiResponse<AlamatList>> {
    let items = Alamat::find()
        .filter(AlamatCol::UserId.eq(user_id))
        .order_by_desc(AlamatCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(alamat_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        AlamatList { items },
        Some(Meta::empty()),
    ))
}

pub async fn update_alamat(
    state: &AppState,
    id: i32,
    payload: UpdateAlamatRequest,
) -> AppResult<ApiResponse<models::Alamat>> {
    let existing = Alamat::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(a) => a,
        None => return Err(AppError::NotFound),
    };

    let latitude = payload.latitude.unwrap_or(existing.latitude);
    let longitude = payload.longitude.unwrap_or(existing.longitude);
    validate_koordinat(latitude, longitude)?;

    let mut active: AlamatActive = existing.into();
    if let Some(label) = payload.label {
        active.label = Set(label);
    }
    if let Some(alamat_lengkap) = payload.alamat_lengkap {
        active.alamat_lengkap = Set(alamat_lengkap);
    }
    active.latitude = Set(latitude);
    active.longitude = Set(longitude);
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Alamat berhasil diperbarui!",
        alamat_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_alamat(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Alamat::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Alamat berhasil dihapus!",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn validate_koordinat(latitude: f64, longitude: f64) -> Result<(), AppError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::BadRequest(
            "Latitude harus di antara -90 dan 90".to_string(),
        ));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::BadRequest(
            "Longitude harus di antara -180 dan 180".to_string(),
        ));
    }
    Ok(())
}

fn alamat_from_entity(model: AlamatModel) -> models::Alamat {
    models::Alamat {
        id: model.id,
        user_id: model.user_id,
        label: model.label,
        alamat_lengkap: model.alamat_lengkap,
        latitude: model.latitude,
        longitude: model.longitude,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
