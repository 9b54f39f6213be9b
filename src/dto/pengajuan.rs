use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Pengajuan;

/// Assembled by the route handler from the multipart form; `gambar` is the
/// filename the upload was stored under.
#[derive(Debug, ToSchema)]
pub struct CreatePengajuanInput {
    pub user_id: i32,
    pub kategori: String,
    #[schema(value_type = f64)]
    pub berat: Decimal,
    pub gambar: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TerimaPengajuanRequest {
    pub alamat_id: i32,
    #[schema(value_type = f64)]
    pub harga_per_kg: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TolakPengajuanRequest {
    pub alasan: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MengantarRequest {
    pub rekening_id: i32,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub tanggal_awal: String,
    pub tanggal_akhir: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DijemputRequest {
    pub rekening_id: i32,
    pub alamat_user_id: i32,
    #[schema(value_type = f64)]
    pub total: Decimal,
    #[schema(value_type = f64)]
    pub ongkir: Decimal,
    #[schema(value_type = f64)]
    pub jarak_estimasi_km: Decimal,
    pub tanggal_awal: String,
    pub tanggal_akhir: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PengajuanList {
    pub items: Vec<Pengajuan>,
}

/// Flattened projection joining the owner and the admin drop-off address.
#[derive(Debug, Serialize, ToSchema)]
pub struct PengajuanDetail {
    pub id: i32,
    pub user_id: i32,
    pub nama_lengkap: String,
    pub no_hp: String,
    pub kategori: String,
    pub berat: f64,
    pub harga_per_kg: Option<f64>,
    pub total_harga: Option<f64>,
    pub opsi_pengiriman: Option<String>,
    pub ongkir: Option<f64>,
    pub jarak_estimasi_km: Option<f64>,
    pub tanggal_awal: Option<NaiveDate>,
    pub tanggal_akhir: Option<NaiveDate>,
    pub alamat_admin: Option<String>,
    pub gambar: String,
    pub bukti_transaksi: Option<String>,
    pub alasan_penolakan: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
