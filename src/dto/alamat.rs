use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Alamat;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAlamatRequest {
    pub user_id: i32,
    pub label: String,
    pub alamat_lengkap: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAlamatRequest {
    pub label: Option<String>,
    pub alamat_lengkap: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlamatList {
    pub items: Vec<Alamat>,
}
