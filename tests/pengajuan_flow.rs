use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use setor_sampah_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        alamat::CreateAlamatRequest,
        pengajuan::{
            CreatePengajuanInput, DijemputRequest, TerimaPengajuanRequest, TolakPengajuanRequest,
        },
    },
    entity::{
        alamat::ActiveModel as AlamatActive,
        penjualan_sampah::{ActiveModel as PengajuanActive, StatusPengajuan},
        rekening::ActiveModel as RekeningActive,
        users::ActiveModel as UserActive,
    },
    error::AppError,
    middleware::auth::AuthUser,
    services::{alamat_service, pengajuan_service},
    state::AppState,
};

// Integration flow: user submits waste -> admin prices it -> user accepts the
// offer with pickup -> admin uploads the transfer proof. Exercises the status
// guard on every transition, then the validation and projection edge cases.
#[tokio::test]
async fn pengajuan_lifecycle_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    happy_path_with_guards(&state).await?;
    rejection_reason_and_terminal_rejection(&state).await?;
    offer_rejected_then_complete_refused(&state).await?;
    alamat_validation_and_not_found(&state).await?;
    legacy_image_paths_normalize(&state).await?;

    Ok(())
}

// terima -> tolak penawaran -> selesai, invoked in that literal sequence:
// the rejection lands, and the completion is refused instead of leaving a
// "selesai" record with no transfer proof stage behind it.
async fn offer_rejected_then_complete_refused(state: &AppState) -> anyhow::Result<()> {
    let user_id = create_user(state, "pengguna", "rina@example.com", "rina").await?;
    let admin_id = create_user(state, "admin", "admin3@example.com", "admin3").await?;
    let auth_user = AuthUser {
        user_id,
        role: "pengguna".into(),
    };
    let auth_admin = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
    };
    let gudang_id = create_alamat(state, admin_id, "Gudang").await?;

    let created = pengajuan_service::create_pengajuan(
        state,
        &auth_user,
        CreatePengajuanInput {
            user_id,
            kategori: "botol kaca".into(),
            berat: dec("7"),
            gambar: "botol.jpg".into(),
        },
    )
    .await?;
    let id = created.data.unwrap().id;

    pengajuan_service::terima_pengajuan(
        state,
        &auth_admin,
        id,
        TerimaPengajuanRequest {
            alamat_id: gudang_id,
            harga_per_kg: dec("1500"),
        },
    )
    .await?;

    let rejected = pengajuan_service::tolak_penawaran(state, &auth_user, id).await?;
    assert_eq!(rejected.data.unwrap().status, "penawaran ditolak");

    let err = pengajuan_service::selesai(state, &auth_admin, id, "bukti.png".into())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StateConflict(_)));

    let current = pengajuan_service::get_pengajuan(state, id).await?;
    let current = current.data.unwrap();
    assert_eq!(current.status, "penawaran ditolak");
    assert!(current.bukti_transaksi.is_none());

    Ok(())
}

async fn happy_path_with_guards(state: &AppState) -> anyhow::Result<()> {
    let user_id = create_user(state, "pengguna", "budi@example.com", "budi").await?;
    let admin_id = create_user(state, "admin", "admin@example.com", "admin").await?;

    let auth_user = AuthUser {
        user_id,
        role: "pengguna".into(),
    };
    let auth_admin = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
    };

    // Addresses and payout account referenced by the transitions.
    let gudang_id = create_alamat(state, admin_id, "Gudang").await?;
    let rumah_id = create_alamat(state, user_id, "Rumah").await?;
    let rekening_id = create_rekening(state, user_id).await?;

    // Create: status starts at `pengajuan` and the id is retrievable.
    let created = pengajuan_service::create_pengajuan(
        state,
        &auth_user,
        CreatePengajuanInput {
            user_id,
            kategori: "plastik".into(),
            berat: dec("12.5"),
            gambar: "sampah.jpg".into(),
        },
    )
    .await?;
    let pengajuan = created.data.unwrap();
    assert_eq!(pengajuan.status, "pengajuan");
    assert_eq!(pengajuan.gambar, "/uploads/sampah.jpg");

    let fetched = pengajuan_service::get_pengajuan(state, pengajuan.id).await?;
    assert_eq!(fetched.data.unwrap().id, pengajuan.id);

    // Pricing is the admin's call.
    let err = pengajuan_service::terima_pengajuan(
        state,
        &auth_user,
        pengajuan.id,
        TerimaPengajuanRequest {
            alamat_id: gudang_id,
            harga_per_kg: dec("3000"),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let accepted = pengajuan_service::terima_pengajuan(
        state,
        &auth_admin,
        pengajuan.id,
        TerimaPengajuanRequest {
            alamat_id: gudang_id,
            harga_per_kg: dec("3000"),
        },
    )
    .await?;
    let accepted = accepted.data.unwrap();
    assert_eq!(accepted.status, "pengajuan diterima");
    assert_eq!(accepted.harga_per_kg, Some(3000.0));

    // Accepting twice is an illegal move, not a silent overwrite.
    let err = pengajuan_service::terima_pengajuan(
        state,
        &auth_admin,
        pengajuan.id,
        TerimaPengajuanRequest {
            alamat_id: gudang_id,
            harga_per_kg: dec("9999"),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::StateConflict(_)));

    // Completing before the offer stage is settled must be refused.
    let err = pengajuan_service::selesai(state, &auth_admin, pengajuan.id, "bukti.png".into())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StateConflict(_)));

    // User takes the pickup option.
    let picked = pengajuan_service::dijemput(
        state,
        &auth_user,
        pengajuan.id,
        DijemputRequest {
            rekening_id,
            alamat_user_id: rumah_id,
            total: dec("37500"),
            ongkir: dec("5000"),
            jarak_estimasi_km: dec("4.2"),
            tanggal_awal: "2025-06-01".into(),
            tanggal_akhir: "2025-06-03".into(),
        },
    )
    .await?;
    let picked = picked.data.unwrap();
    assert_eq!(picked.status, "penawaran diterima");
    assert_eq!(picked.opsi_pengiriman.as_deref(), Some("dijemput"));

    // Rejecting an offer that was already accepted is an illegal move.
    let err = pengajuan_service::tolak_penawaran(state, &auth_user, pengajuan.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StateConflict(_)));

    let done =
        pengajuan_service::selesai(state, &auth_admin, pengajuan.id, "bukti.png".into()).await?;
    let done = done.data.unwrap();
    assert_eq!(done.status, "selesai");
    assert_eq!(done.bukti_transaksi.as_deref(), Some("/uploads/bukti.png"));

    // Terminal state: every further transition is refused.
    let err = pengajuan_service::tolak_pengajuan(
        state,
        &auth_admin,
        pengajuan.id,
        TolakPengajuanRequest {
            alasan: "kategori tidak sesuai".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::StateConflict(_)));

    // Detail projection joins the owner and the drop-off address.
    let detail = pengajuan_service::detail_pengajuan(state, pengajuan.id).await?;
    let detail = detail.data.unwrap();
    assert_eq!(detail.nama_lengkap, "Budi");
    assert_eq!(detail.status, "selesai");
    assert_eq!(detail.gambar, "/uploads/sampah.jpg");
    assert!(detail.alamat_admin.is_some());

    // Status listings see the completed record.
    let listed = pengajuan_service::list_by_user_status(
        state,
        user_id,
        StatusPengajuan::Selesai,
    )
    .await?;
    assert!(
        listed
            .data
            .unwrap()
            .items
            .iter()
            .any(|p| p.id == pengajuan.id)
    );

    Ok(())
}

async fn rejection_reason_and_terminal_rejection(state: &AppState) -> anyhow::Result<()> {
    let user_id = create_user(state, "pengguna", "sari@example.com", "sari").await?;
    let admin_id = create_user(state, "admin", "admin2@example.com", "admin2").await?;
    let auth_user = AuthUser {
        user_id,
        role: "pengguna".into(),
    };
    let auth_admin = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
    };

    let created = pengajuan_service::create_pengajuan(
        state,
        &auth_user,
        CreatePengajuanInput {
            user_id,
            kategori: "kardus".into(),
            berat: dec("3"),
            gambar: "kardus.jpg".into(),
        },
    )
    .await?;
    let id = created.data.unwrap().id;

    // Nine characters: refused before any state is touched.
    let err = pengajuan_service::tolak_pengajuan(
        state,
        &auth_admin,
        id,
        TolakPengajuanRequest {
            alasan: "012345678".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Exactly ten characters is accepted.
    let rejected = pengajuan_service::tolak_pengajuan(
        state,
        &auth_admin,
        id,
        TolakPengajuanRequest {
            alasan: "0123456789".into(),
        },
    )
    .await?;
    assert_eq!(rejected.data.unwrap().status, "pengajuan ditolak");

    // Rejection is absorbing; completion must not resurrect the record.
    let err = pengajuan_service::selesai(state, &auth_admin, id, "bukti.png".into())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StateConflict(_)));

    Ok(())
}

async fn alamat_validation_and_not_found(state: &AppState) -> anyhow::Result<()> {
    let user_id = create_user(state, "pengguna", "dewi@example.com", "dewi").await?;

    let err = alamat_service::create_alamat(
        state,
        CreateAlamatRequest {
            user_id,
            label: "Rumah".into(),
            alamat_lengkap: "Jl. Melati No. 2".into(),
            latitude: 91.0,
            longitude: 112.75,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = alamat_service::create_alamat(
        state,
        CreateAlamatRequest {
            user_id,
            label: "Rumah".into(),
            alamat_lengkap: "Jl. Melati No. 2".into(),
            latitude: -7.25,
            longitude: -180.5,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Owner must exist.
    let err = alamat_service::create_alamat(
        state,
        CreateAlamatRequest {
            user_id: 999_999,
            label: "Rumah".into(),
            alamat_lengkap: "Jl. Melati No. 2".into(),
            latitude: -7.25,
            longitude: 112.75,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Deleting something that is not there is a distinct not-found.
    let err = alamat_service::delete_alamat(state, 999_999)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

async fn legacy_image_paths_normalize(state: &AppState) -> anyhow::Result<()> {
    let user_id = create_user(state, "pengguna", "joko@example.com", "joko").await?;

    // Older rows stored the prefix; bare filenames came later.
    for stored in ["uploads/lama.jpg", "/uploads/lama.jpg", "lama.jpg"] {
        let row = PengajuanActive {
            id: NotSet,
            user_id: Set(user_id),
            kategori: Set("plastik".into()),
            berat: Set(dec("1")),
            gambar: Set(stored.into()),
            status: Set(StatusPengajuan::Pengajuan),
            harga_per_kg: Set(None),
            total_harga: Set(None),
            opsi_pengiriman: Set(None),
            tanggal_awal: Set(None),
            tanggal_akhir: Set(None),
            alamat_admin_id: Set(None),
            alamat_user_id: Set(None),
            rekening_id: Set(None),
            bukti_transaksi: Set(None),
            alasan_penolakan: Set(None),
            ongkir: Set(None),
            jarak_estimasi_km: Set(None),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&state.orm)
        .await?;

        let fetched = pengajuan_service::get_pengajuan(state, row.id).await?;
        assert_eq!(fetched.data.unwrap().gambar, "/uploads/lama.jpg");
    }

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE penjualan_sampah, rekening, alamat, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        upload_dir: std::env::temp_dir()
            .join("setor-sampah-test-uploads")
            .to_string_lossy()
            .into_owned(),
    };

    Ok(AppState { pool, orm, config })
}

async fn create_user(
    state: &AppState,
    role: &str,
    email: &str,
    username: &str,
) -> anyhow::Result<i32> {
    let user = UserActive {
        id: NotSet,
        nama_lengkap: Set("Budi".to_string()),
        email: Set(email.to_string()),
        no_hp: Set("081234567890".to_string()),
        username: Set(username.to_string()),
        password: Set("dummy".to_string()),
        role: Set(role.to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

async fn create_alamat(state: &AppState, user_id: i32, label: &str) -> anyhow::Result<i32> {
    let alamat = AlamatActive {
        id: NotSet,
        user_id: Set(user_id),
        label: Set(label.to_string()),
        alamat_lengkap: Set("Jl. Mawar No. 10, Surabaya".to_string()),
        latitude: Set(-7.2575),
        longitude: Set(112.7521),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(alamat.id)
}

async fn create_rekening(state: &AppState, user_id: i32) -> anyhow::Result<i32> {
    let rekening = RekeningActive {
        id: NotSet,
        user_id: Set(user_id),
        nama_bank: Set("BCA".to_string()),
        nomor_rekening: Set("1234567890".to_string()),
        atas_nama: Set("Budi".to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(rekening.id)
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}
