use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sqlx::FromRow;

use crate::{
    audit::log_audit,
    dto::pengajuan::{
        CreatePengajuanInput, DijemputRequest, MengantarRequest, PengajuanDetail, PengajuanList,
        TerimaPengajuanRequest, TolakPengajuanRequest,
    },
    entity::{
        alamat::Entity as Alamat,
        penjualan_sampah::{
            ActiveModel as PengajuanActive, Column as PengajuanCol, Entity as PenjualanSampah,
            Model as PengajuanModel, StatusPengajuan,
        },
        rekening::Entity as Rekening,
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Pengajuan,
    response::{ApiResponse, Meta},
    routes::params::{PengajuanListQuery, SortOrder},
    state::AppState,
    upload::public_path,
};

pub async fn create_pengajuan(
    state: &AppState,
    user: &AuthUser,
    input: CreatePengajuanInput,
) -> AppResult<ApiResponse<Pengajuan>> {
    if input.kategori.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Kategori sampah wajib diisi!".to_string(),
        ));
    }
    if input.berat <= Decimal::ZERO {
        return Err(AppError::BadRequest("Berat harus lebih dari 0".to_string()));
    }

    let txn = state.orm.begin().await?;

    // The owner must still exist at insert time.
    if Users::find_by_id(input.user_id).one(&txn).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let row = PengajuanActive {
        id: NotSet,
        user_id: Set(input.user_id),
        kategori: Set(input.kategori),
        berat: Set(input.berat),
        harga_per_kg: Set(None),
        total_harga: Set(None),
        opsi_pengiriman: Set(None),
        tanggal_awal: Set(None),
        tanggal_akhir: Set(None),
        alamat_admin_id: Set(None),
        alamat_user_id: Set(None),
        rekening_id: Set(None),
        gambar: Set(input.gambar),
        bukti_transaksi: Set(None),
        alasan_penolakan: Set(None),
        ongkir: Set(None),
        jarak_estimasi_km: Set(None),
        status: Set(StatusPengajuan::Pengajuan),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    audit(state, user, "pengajuan_create", row.id).await;

    Ok(ApiResponse::success(
        "Pengajuan berhasil dibuat!",
        pengajuan_from_entity(row),
        Some(Meta::empty()),
    ))
}

pub async fn terima_pengajuan(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: TerimaPengajuanRequest,
) -> AppResult<ApiResponse<Pengajuan>> {
    ensure_admin(user)?;
    if payload.harga_per_kg <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Harga per kg harus lebih dari 0".to_string(),
        ));
    }

    let txn = state.orm.begin().await?;
    let row = find_for_update(&txn, id).await?;
    ensure_transition(row.status, StatusPengajuan::PengajuanDiterima)?;

    if Alamat::find_by_id(payload.alamat_id).one(&txn).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let mut active: PengajuanActive = row.into();
    active.status = Set(StatusPengajuan::PengajuanDiterima);
    active.alamat_admin_id = Set(Some(payload.alamat_id));
    active.harga_per_kg = Set(Some(payload.harga_per_kg));
    active.updated_at = Set(Utc::now().into());
    let row = active.update(&txn).await?;

    txn.commit().await?;

    audit(state, user, "pengajuan_terima", row.id).await;

    Ok(ApiResponse::success(
        "Pengajuan diterima!",
        pengajuan_from_entity(row),
        Some(Meta::empty()),
    ))
}

pub async fn tolak_pengajuan(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: TolakPengajuanRequest,
) -> AppResult<ApiResponse<Pengajuan>> {
    ensure_admin(user)?;
    if payload.alasan.trim().chars().count() < 10 {
        return Err(AppError::BadRequest(
            "Alasan penolakan minimal 10 karakter".to_string(),
        ));
    }

    let txn = state.orm.begin().await?;
    let row = find_for_update(&txn, id).await?;
    ensure_transition(row.status, StatusPengajuan::PengajuanDitolak)?;

    let mut active: PengajuanActive = row.into();
    active.status = Set(StatusPengajuan::PengajuanDitolak);
    active.alasan_penolakan = Set(Some(payload.alasan));
    active.updated_at = Set(Utc::now().into());
    let row = active.update(&txn).await?;

    txn.commit().await?;

    audit(state, user, "pengajuan_tolak", row.id).await;

    Ok(ApiResponse::success(
        "Pengajuan ditolak",
        pengajuan_from_entity(row),
        Some(Meta::empty()),
    ))
}

pub async fn mengantar(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: MengantarRequest,
) -> AppResult<ApiResponse<Pengajuan>> {
    if payload.total <= Decimal::ZERO {
        return Err(AppError::BadRequest("Total harus lebih dari 0".to_string()));
    }
    let (awal, akhir) = parse_rentang(&payload.tanggal_awal, &payload.tanggal_akhir)?;

    let txn = state.orm.begin().await?;
    let row = find_for_update(&txn, id).await?;
    ensure_transition(row.status, StatusPengajuan::PenawaranDiterima)?;
    ensure_rekening_milik(&txn, payload.rekening_id, row.user_id).await?;

    let mut active: PengajuanActive = row.into();
    active.status = Set(StatusPengajuan::PenawaranDiterima);
    active.opsi_pengiriman = Set(Some("mengantar".to_string()));
    active.rekening_id = Set(Some(payload.rekening_id));
    active.total_harga = Set(Some(payload.total));
    active.tanggal_awal = Set(Some(awal));
    active.tanggal_akhir = Set(Some(akhir));
    active.updated_at = Set(Utc::now().into());
    let row = active.update(&txn).await?;

    txn.commit().await?;

    audit(state, user, "penawaran_mengantar", row.id).await;

    Ok(ApiResponse::success(
        "Penawaran diterima, sampah diantar sendiri",
        pengajuan_from_entity(row),
        Some(Meta::empty()),
    ))
}

pub async fn dijemput(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: DijemputRequest,
) -> AppResult<ApiResponse<Pengajuan>> {
    if payload.total <= Decimal::ZERO {
        return Err(AppError::BadRequest("Total harus lebih dari 0".to_string()));
    }
    if payload.ongkir < Decimal::ZERO {
        return Err(AppError::BadRequest("Ongkir tidak valid".to_string()));
    }
    if payload.jarak_estimasi_km <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Jarak estimasi tidak valid".to_string(),
        ));
    }
    let (awal, akhir) = parse_rentang(&payload.tanggal_awal, &payload.tanggal_akhir)?;

    let txn = state.orm.begin().await?;
    let row = find_for_update(&txn, id).await?;
    ensure_transition(row.status, StatusPengajuan::PenawaranDiterima)?;
    ensure_rekening_milik(&txn, payload.rekening_id, row.user_id).await?;

    let alamat = Alamat::find_by_id(payload.alamat_user_id).one(&txn).await?;
    match alamat {
        None => return Err(AppError::NotFound),
        Some(a) if a.user_id != row.user_id => {
            return Err(AppError::BadRequest(
                "Alamat bukan milik pemohon".to_string(),
            ));
        }
        Some(_) => {}
    }

    let mut active: PengajuanActive = row.into();
    active.status = Set(StatusPengajuan::PenawaranDiterima);
    active.opsi_pengiriman = Set(Some("dijemput".to_string()));
    active.rekening_id = Set(Some(payload.rekening_id));
    active.alamat_user_id = Set(Some(payload.alamat_user_id));
    active.total_harga = Set(Some(payload.total));
    active.ongkir = Set(Some(payload.ongkir));
    active.jarak_estimasi_km = Set(Some(payload.jarak_estimasi_km));
    active.tanggal_awal = Set(Some(awal));
    active.tanggal_akhir = Set(Some(akhir));
    active.updated_at = Set(Utc::now().into());
    let row = active.update(&txn).await?;

    txn.commit().await?;

    audit(state, user, "penawaran_dijemput", row.id).await;

    Ok(ApiResponse::success(
        "Penawaran diterima, sampah akan dijemput",
        pengajuan_from_entity(row),
        Some(Meta::empty()),
    ))
}

pub async fn tolak_penawaran(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<Pengajuan>> {
    let txn = state.orm.begin().await?;
    let row = find_for_update(&txn, id).await?;
    ensure_transition(row.status, StatusPengajuan::PenawaranDitolak)?;

    let mut active: PengajuanActive = row.into();
    active.status = Set(StatusPengajuan::PenawaranDitolak);
    active.updated_at = Set(Utc::now().into());
    let row = active.update(&txn).await?;

    txn.commit().await?;

    audit(state, user, "penawaran_tolak", row.id).await;

    Ok(ApiResponse::success(
        "Penawaran ditolak",
        pengajuan_from_entity(row),
        Some(Meta::empty()),
    ))
}

pub async fn selesai(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    bukti_transaksi: String,
) -> AppResult<ApiResponse<Pengajuan>> {
    let txn = state.orm.begin().await?;
    let row = find_for_update(&txn, id).await?;
    ensure_transition(row.status, StatusPengajuan::Selesai)?;

    let mut active: PengajuanActive = row.into();
    active.status = Set(StatusPengajuan::Selesai);
    active.bukti_transaksi = Set(Some(bukti_transaksi));
    active.updated_at = Set(Utc::now().into());
    let row = active.update(&txn).await?;

    txn.commit().await?;

    audit(state, user, "penjualan_selesai", row.id).await;

    Ok(ApiResponse::success(
        "Penjualan selesai!",
        pengajuan_from_entity(row),
        Some(Meta::empty()),
    ))
}

pub async fn list_by_user(
    state: &AppState,
    user_id: i32,
) -> AppResult<ApiResponse<PengajuanList>> {
    let items = PenjualanSampah::find()
        .filter(PengajuanCol::UserId.eq(user_id))
        .order_by_desc(PengajuanCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(pengajuan_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        PengajuanList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_by_user_status(
    state: &AppState,
    user_id: i32,
    status: StatusPengajuan,
) -> AppResult<ApiResponse<PengajuanList>> {
    let items = PenjualanSampah::find()
        .filter(PengajuanCol::UserId.eq(user_id))
        .filter(PengajuanCol::Status.eq(status))
        .order_by_desc(PengajuanCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(pengajuan_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        PengajuanList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_by_status(
    state: &AppState,
    user: &AuthUser,
    status: StatusPengajuan,
    query: PengajuanListQuery,
) -> AppResult<ApiResponse<PengajuanList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let finder = PenjualanSampah::find().filter(PengajuanCol::Status.eq(status));
    let finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(PengajuanCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(PengajuanCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(pengajuan_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        PengajuanList { items },
        Some(meta),
    ))
}

pub async fn get_pengajuan(state: &AppState, id: i32) -> AppResult<ApiResponse<Pengajuan>> {
    let row = PenjualanSampah::find_by_id(id).one(&state.orm).await?;
    let row = match row {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success(
        "Ok",
        pengajuan_from_entity(row),
        Some(Meta::empty()),
    ))
}

#[derive(FromRow)]
struct DetailRow {
    id: i32,
    user_id: i32,
    nama_lengkap: String,
    no_hp: String,
    kategori: String,
    berat: Decimal,
    harga_per_kg: Option<Decimal>,
    total_harga: Option<Decimal>,
    opsi_pengiriman: Option<String>,
    ongkir: Option<Decimal>,
    jarak_estimasi_km: Option<Decimal>,
    tanggal_awal: Option<NaiveDate>,
    tanggal_akhir: Option<NaiveDate>,
    alamat_admin: Option<String>,
    gambar: String,
    bukti_transaksi: Option<String>,
    alasan_penolakan: Option<String>,
    status: String,
    created_at: chrono::DateTime<Utc>,
}

pub async fn detail_pengajuan(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<PengajuanDetail>> {
    let row = sqlx::query_as::<_, DetailRow>(
        r#"
        SELECT p.id, p.user_id, u.nama_lengkap, u.no_hp, p.kategori, p.berat,
               p.harga_per_kg, p.total_harga, p.opsi_pengiriman, p.ongkir,
               p.jarak_estimasi_km, p.tanggal_awal, p.tanggal_akhir,
               a.alamat_lengkap AS alamat_admin,
               p.gambar, p.bukti_transaksi, p.alasan_penolakan, p.status, p.created_at
        FROM penjualan_sampah p
        JOIN users u ON u.id = p.user_id
        LEFT JOIN alamat a ON a.id = p.alamat_admin_id
        WHERE p.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?;

    let row = match row {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let detail = PengajuanDetail {
        id: row.id,
        user_id: row.user_id,
        nama_lengkap: row.nama_lengkap,
        no_hp: row.no_hp,
        kategori: row.kategori,
        berat: dec_f64(row.berat),
        harga_per_kg: row.harga_per_kg.map(dec_f64),
        total_harga: row.total_harga.map(dec_f64),
        opsi_pengiriman: row.opsi_pengiriman,
        ongkir: row.ongkir.map(dec_f64),
        jarak_estimasi_km: row.jarak_estimasi_km.map(dec_f64),
        tanggal_awal: row.tanggal_awal,
        tanggal_akhir: row.tanggal_akhir,
        alamat_admin: row.alamat_admin,
        gambar: public_path(&row.gambar),
        bukti_transaksi: row.bukti_transaksi.as_deref().map(public_path),
        alasan_penolakan: row.alasan_penolakan,
        status: row.status,
        created_at: row.created_at,
    };

    Ok(ApiResponse::success("Ok", detail, Some(Meta::empty())))
}

/// Lock the submission row for the rest of the transaction. Concurrent
/// transitions on the same id queue up here, so the status guard always sees
/// the committed state of the winner.
async fn find_for_update(txn: &DatabaseTransaction, id: i32) -> AppResult<PengajuanModel> {
    let row = PenjualanSampah::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?;
    match row {
        Some(r) => Ok(r),
        None => Err(AppError::NotFound),
    }
}

fn ensure_transition(from: StatusPengajuan, to: StatusPengajuan) -> Result<(), AppError> {
    if !from.can_transition_to(to) {
        return Err(AppError::StateConflict(format!(
            "Status '{}' tidak dapat diubah menjadi '{}'",
            from.as_str(),
            to.as_str()
        )));
    }
    Ok(())
}

async fn ensure_rekening_milik(
    txn: &DatabaseTransaction,
    rekening_id: i32,
    pemilik_id: i32,
) -> AppResult<()> {
    let rekening = Rekening::find_by_id(rekening_id).one(txn).await?;
    match rekening {
        None => Err(AppError::NotFound),
        Some(r) if r.user_id != pemilik_id => Err(AppError::BadRequest(
            "Rekening bukan milik pemohon".to_string(),
        )),
        Some(_) => Ok(()),
    }
}

async fn audit(state: &AppState, user: &AuthUser, action: &str, pengajuan_id: i32) {
    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        action,
        Some("penjualan_sampah"),
        Some(serde_json::json!({ "pengajuan_id": pengajuan_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }
}

fn parse_rentang(awal: &str, akhir: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let awal = parse_tanggal(awal)?;
    let akhir = parse_tanggal(akhir)?;
    if awal > akhir {
        return Err(AppError::BadRequest(
            "Rentang tanggal tidak valid".to_string(),
        ));
    }
    Ok((awal, akhir))
}

fn parse_tanggal(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Format tanggal harus YYYY-MM-DD".to_string()))
}

fn dec_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or_default()
}

fn pengajuan_from_entity(model: PengajuanModel) -> Pengajuan {
    Pengajuan {
        id: model.id,
        user_id: model.user_id,
        kategori: model.kategori,
        berat: dec_f64(model.berat),
        harga_per_kg: model.harga_per_kg.map(dec_f64),
        total_harga: model.total_harga.map(dec_f64),
        opsi_pengiriman: model.opsi_pengiriman,
        tanggal_awal: model.tanggal_awal,
        tanggal_akhir: model.tanggal_akhir,
        alamat_admin_id: model.alamat_admin_id,
        alamat_user_id: model.alamat_user_id,
        rekening_id: model.rekening_id,
        gambar: public_path(&model.gambar),
        bukti_transaksi: model.bukti_transaksi.as_deref().map(public_path),
        alasan_penolakan: model.alasan_penolakan,
        ongkir: model.ongkir.map(dec_f64),
        jarak_estimasi_km: model.jarak_estimasi_km.map(dec_f64),
        status: model.status.as_str().to_string(),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
