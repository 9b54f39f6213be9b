use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub nama_lengkap: String,
    pub email: String,
    pub no_hp: String,
    pub username: String,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Alamat {
    pub id: i32,
    pub user_id: i32,
    pub label: String,
    pub alamat_lengkap: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rekening {
    pub id: i32,
    pub user_id: i32,
    pub nama_bank: String,
    pub nomor_rekening: String,
    pub atas_nama: String,
    pub created_at: DateTime<Utc>,
}

/// Flattened submission view. NUMERIC columns are surfaced as plain numbers
/// and image paths always carry the `/uploads/` prefix, however they were
/// stored.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Pengajuan {
    pub id: i32,
    pub user_id: i32,
    pub kategori: String,
    pub berat: f64,
    pub harga_per_kg: Option<f64>,
    pub total_harga: Option<f64>,
    pub opsi_pengiriman: Option<String>,
    pub tanggal_awal: Option<NaiveDate>,
    pub tanggal_akhir: Option<NaiveDate>,
    pub alamat_admin_id: Option<i32>,
    pub alamat_user_id: Option<i32>,
    pub rekening_id: Option<i32>,
    pub gambar: String,
    pub bukti_transaksi: Option<String>,
    pub alasan_penolakan: Option<String>,
    pub ongkir: Option<f64>,
    pub jarak_estimasi_km: Option<f64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
