use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use setor_sampah_api::{config::AppConfig, db::create_pool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(
        &pool,
        "Admin Bank Sampah",
        "admin@example.com",
        "admin",
        "admin123",
        "admin",
    )
    .await?;
    let user_id = ensure_user(
        &pool,
        "Budi Santoso",
        "budi@example.com",
        "budi",
        "budi123",
        "pengguna",
    )
    .await?;
    seed_alamat_admin(&pool, admin_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    nama: &str,
    email: &str,
    username: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<i32> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(i32,)> = sqlx::query_as(
        r#"
        INSERT INTO users (nama_lengkap, email, no_hp, username, password, role)
        VALUES ($1, $2, '0800000000', $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(nama)
    .bind(email)
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (i32,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_alamat_admin(pool: &sqlx::PgPool, admin_id: i32) -> anyhow::Result<()> {
    let exist: Option<(i32,)> =
        sqlx::query_as("SELECT id FROM alamat WHERE user_id = $1 AND label = 'Gudang'")
            .bind(admin_id)
            .fetch_optional(pool)
            .await?;
    if exist.is_some() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO alamat (user_id, label, alamat_lengkap, latitude, longitude)
        VALUES ($1, 'Gudang', 'Jl. Raya Bank Sampah No. 1, Surabaya', -7.2575, 112.7521)
        "#,
    )
    .bind(admin_id)
    .execute(pool)
    .await?;

    println!("Seeded drop-off address");
    Ok(())
}
