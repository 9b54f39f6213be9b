use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
};

pub async fn register_user(
    pool: &DbPool,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let RegisterRequest {
        name,
        email,
        phone,
        username,
        password,
        re_password,
    } = payload;

    if [&name, &email, &phone, &username, &password, &re_password]
        .iter()
        .any(|f| f.trim().is_empty())
    {
        return Err(AppError::BadRequest("Semua field wajib diisi!".to_string()));
    }
    if password != re_password {
        return Err(AppError::BadRequest("Password tidak cocok!".to_string()));
    }
    if email.len() > 100 {
        return Err(AppError::BadRequest("Email terlalu panjang!".to_string()));
    }
    if username.len() > 50 {
        return Err(AppError::BadRequest("Username terlalu panjang!".to_string()));
    }
    if phone.len() > 20 {
        return Err(AppError::BadRequest(
            "Nomor telepon terlalu panjang!".to_string(),
        ));
    }

    let exist: Option<(i32,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1 OR username = $2")
            .bind(email.as_str())
            .bind(username.as_str())
            .fetch_optional(pool)
            .await?;

    if exist.is_some() {
        return Err(AppError::Conflict(
            "Email atau username sudah digunakan!".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (nama_lengkap, email, no_hp, username, password, role)
        VALUES ($1, $2, $3, $4, $5, 'pengguna')
        RETURNING *
        "#,
    )
    .bind(name.as_str())
    .bind(email.as_str())
    .bind(phone.as_str())
    .bind(username.as_str())
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|err| match &err {
        // Unique constraint lost a race with a concurrent registration.
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            AppError::Conflict("Email atau username sudah digunakan!".to_string())
        }
        _ => AppError::DbError(err),
    })?;

    if let Err(err) = log_audit(
        pool,
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }
    Ok(ApiResponse::success("Registrasi berhasil!", user, None))
}

pub async fn login_user(
    pool: &DbPool,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest {
        email_or_username,
        password,
    } = payload;

    let user: Option<User> =
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 OR username = $1")
            .bind(email_or_username.as_str())
            .fetch_optional(pool)
            .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::BadRequest("User tidak ditemukan!".into())),
    };

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Password salah!".into()));
    }

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    if let Err(err) = log_audit(
        pool,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        user,
    };

    Ok(ApiResponse::success(
        "Login berhasil!",
        resp,
        Some(Meta::empty()),
    ))
}
