use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Rekening;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRekeningRequest {
    pub user_id: i32,
    pub nama_bank: String,
    pub nomor_rekening: String,
    pub atas_nama: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRekeningRequest {
    pub nama_bank: Option<String>,
    pub nomor_rekening: Option<String>,
    pub atas_nama: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RekeningList {
    pub items: Vec<Rekening>,
}
