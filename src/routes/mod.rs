use axum::Router;

use crate::state::AppState;

pub mod alamat;
pub mod auth;
pub mod doc;
pub mod health;
pub mod params;
pub mod pengajuan;
pub mod rekening;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/alamat", alamat::router())
        .nest("/rekening", rekening::router())
        .nest("/pengajuan", pengajuan::router())
        .nest("/penawaran", pengajuan::penawaran_router())
        .nest("/penjualan", pengajuan::penjualan_router())
}
