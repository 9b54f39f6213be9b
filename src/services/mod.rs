pub mod alamat_service;
pub mod auth_service;
pub mod pengajuan_service;
