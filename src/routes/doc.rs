use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        alamat::AlamatList,
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        pengajuan::{
            DijemputRequest, MengantarRequest, PengajuanDetail, PengajuanList,
            TerimaPengajuanRequest, TolakPengajuanRequest,
        },
        rekening::{CreateRekeningRequest, RekeningList, UpdateRekeningRequest},
    },
    models::{Alamat, Pengajuan, Rekening, User},
    response::{ApiResponse, Meta},
    routes::{alamat as alamat_routes, auth, health, params, pengajuan, rekening, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        users::get_user,
        users::update_user,
        users::delete_user,
        alamat_routes::create_alamat,
        alamat_routes::list_alamat,
        alamat_routes::update_alamat,
        alamat_routes::delete_alamat,
        rekening::create_rekening,
        rekening::list_rekening,
        rekening::update_rekening,
        rekening::delete_rekening,
        pengajuan::create_pengajuan,
        pengajuan::list_by_user,
        pengajuan::list_by_user_status,
        pengajuan::list_by_status,
        pengajuan::get_pengajuan,
        pengajuan::detail_pengajuan,
        pengajuan::terima_pengajuan,
        pengajuan::tolak_pengajuan,
        pengajuan::mengantar,
        pengajuan::dijemput,
        pengajuan::tolak_penawaran,
        pengajuan::selesai
    ),
    components(
        schemas(
            User,
            Alamat,
            Rekening,
            Pengajuan,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateRekeningRequest,
            UpdateRekeningRequest,
            users::UpdateUserRequest,
            TerimaPengajuanRequest,
            TolakPengajuanRequest,
            MengantarRequest,
            DijemputRequest,
            AlamatList,
            RekeningList,
            PengajuanList,
            PengajuanDetail,
            params::Pagination,
            params::PengajuanListQuery,
            Meta,
            ApiResponse<User>,
            ApiResponse<LoginResponse>,
            ApiResponse<Alamat>,
            ApiResponse<Rekening>,
            ApiResponse<Pengajuan>,
            ApiResponse<PengajuanList>,
            ApiResponse<PengajuanDetail>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Users", description = "User profile endpoints"),
        (name = "Alamat", description = "Address endpoints"),
        (name = "Rekening", description = "Bank account endpoints"),
        (name = "Pengajuan", description = "Waste submission lifecycle endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
