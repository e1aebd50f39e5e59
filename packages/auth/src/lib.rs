#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Admin authentication for the rth-map backend.
//!
//! Credentials are bcrypt-hashed; sessions are stateless HS256 JWTs with a
//! `jti` so logout can blacklist individual tokens. The token secret and
//! expiry come from the environment ([`AuthConfig::from_env`]) and are held
//! in one place — handlers receive the config through app state rather than
//! reading ambient globals.

pub mod token;

use rth_map_database::DbError;
use rth_map_database::admin::{self, AdminRow, NewAdmin};
use switchy_database::Database;

pub use token::{AuthConfig, Claims};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Errors from authentication and account management.
///
/// Token failures are deliberately split into distinct variants so the API
/// can tell the client whether to re-login (expired) or treat the token as
/// garbage (invalid).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown username or wrong password.
    #[error("Username atau password salah")]
    InvalidCredentials,

    /// The account exists but has been disabled.
    #[error("Akun dinonaktifkan")]
    AccountInactive,

    /// No `Authorization: Bearer` header was supplied.
    #[error("Access denied. No token provided.")]
    MissingToken,

    /// The token's signature or shape is wrong.
    #[error("Invalid token.")]
    TokenInvalid,

    /// The token was valid once but has expired.
    #[error("Token expired.")]
    TokenExpired,

    /// The token was blacklisted by a logout.
    #[error("Token has been revoked.")]
    TokenRevoked,

    /// The token verified but its admin no longer exists.
    #[error("Token is valid but admin not found.")]
    NoAdminForToken,

    /// First-admin setup was attempted after an admin already exists.
    #[error("Admin sudah ada. Setup tidak diperlukan.")]
    AdminExists,

    /// The username is already taken.
    #[error("Username sudah digunakan")]
    DuplicateUsername,

    /// Username or password missing from the request.
    #[error("Username dan password harus diisi")]
    MissingFields,

    /// The password is shorter than [`MIN_PASSWORD_LEN`].
    #[error("Password minimal {MIN_PASSWORD_LEN} karakter")]
    WeakPassword,

    /// Password hashing failed.
    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// A database operation failed.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Hashes a plaintext password with bcrypt.
///
/// # Errors
///
/// Returns [`AuthError::Hash`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Verifies a plaintext password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns [`AuthError::Hash`] if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    Ok(bcrypt::verify(password, hash)?)
}

/// Authenticates an admin and issues a session token.
///
/// The active check runs after password verification so a disabled
/// account with a correct password fails with [`AuthError::AccountInactive`]
/// rather than leaking as a credential error. Records `last_login` on
/// success.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] for unknown usernames or wrong
/// passwords, [`AuthError::AccountInactive`] for disabled accounts, and
/// propagates database or hashing failures.
pub async fn login(
    db: &dyn Database,
    config: &AuthConfig,
    username: &str,
    password: &str,
) -> Result<(String, AdminRow), AuthError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }

    let Some(account) = admin::find_by_username(db, username).await? else {
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password, &account.password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    if !account.is_active {
        return Err(AuthError::AccountInactive);
    }

    admin::update_last_login(db, account.id).await?;
    let token = token::generate(config, account.id)?;

    log::info!("Admin '{}' logged in", account.username);

    Ok((token, account))
}

/// Extracts the raw token from an `Authorization` header value.
///
/// # Errors
///
/// Returns [`AuthError::MissingToken`] if the header is absent or not a
/// `Bearer` credential.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let token = header.strip_prefix("Bearer ").unwrap_or("").trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Verifies a bearer token and resolves it to an active admin account.
///
/// Checks, in order: header shape, signature and expiry, the revocation
/// list, admin existence, and the active flag.
///
/// # Errors
///
/// Returns the matching [`AuthError`] variant for each failure mode.
pub async fn authorize(
    db: &dyn Database,
    config: &AuthConfig,
    auth_header: Option<&str>,
) -> Result<AdminRow, AuthError> {
    let raw = extract_bearer(auth_header)?;
    let claims = token::decode(config, raw)?;

    if admin::is_token_revoked(db, &claims.jti).await? {
        return Err(AuthError::TokenRevoked);
    }

    let Some(account) = admin::find_by_id(db, claims.sub).await? else {
        return Err(AuthError::NoAdminForToken);
    };

    if !account.is_active {
        return Err(AuthError::AccountInactive);
    }

    Ok(account)
}

/// Invalidates the session token carried in the given header.
///
/// Best-effort: an already-expired or malformed token is treated as a
/// successful logout rather than an error.
///
/// # Errors
///
/// Returns [`AuthError::Db`] if recording the revocation fails.
pub async fn logout(
    db: &dyn Database,
    config: &AuthConfig,
    auth_header: Option<&str>,
) -> Result<(), AuthError> {
    let Ok(raw) = extract_bearer(auth_header) else {
        return Ok(());
    };
    let Ok(claims) = token::decode(config, raw) else {
        return Ok(());
    };

    admin::revoke_token(db, &claims.jti).await?;
    Ok(())
}

/// Creates the very first admin account.
///
/// Refuses once any admin exists — this path must be unreachable after
/// initial setup. The first admin gets the `super_admin` role.
///
/// # Errors
///
/// Returns [`AuthError::AdminExists`] if an account already exists,
/// [`AuthError::MissingFields`] / [`AuthError::WeakPassword`] for invalid
/// input, and propagates database or hashing failures.
pub async fn setup_initial_admin(
    db: &dyn Database,
    username: &str,
    password: &str,
    email: Option<String>,
) -> Result<AdminRow, AuthError> {
    if admin::count_admins(db).await? > 0 {
        return Err(AuthError::AdminExists);
    }

    create_admin(db, username, password, email, "super_admin").await
}

/// Creates an admin account with the given role.
///
/// # Errors
///
/// Returns [`AuthError::DuplicateUsername`] if the username is taken,
/// [`AuthError::MissingFields`] / [`AuthError::WeakPassword`] for invalid
/// input, and propagates database or hashing failures.
pub async fn create_admin(
    db: &dyn Database,
    username: &str,
    password: &str,
    email: Option<String>,
    role: &str,
) -> Result<AdminRow, AuthError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }

    if admin::find_by_username(db, username).await?.is_some() {
        return Err(AuthError::DuplicateUsername);
    }

    let new_admin = NewAdmin {
        username: username.to_string(),
        password_hash: hash_password(password)?,
        email,
        role: role.to_string(),
    };

    let id = admin::insert_admin(db, &new_admin).await?;
    log::info!("Created admin '{}' with role '{role}'", new_admin.username);

    admin::find_by_id(db, id)
        .await?
        .ok_or(AuthError::NoAdminForToken)
}

/// Changes an admin's password after verifying the current one.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] if the current password is
/// wrong, [`AuthError::WeakPassword`] if the new one is too short, and
/// propagates database or hashing failures.
pub async fn change_password(
    db: &dyn Database,
    account: &AdminRow,
    current_password: &str,
    new_password: &str,
) -> Result<(), AuthError> {
    if current_password.is_empty() || new_password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    if new_password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }

    if !verify_password(current_password, &account.password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    let hash = hash_password(new_password)?;
    admin::update_password_hash(db, account.id, &hash).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_temp(name: &str) -> Box<dyn Database> {
        let path = std::env::temp_dir().join(format!(
            "rth-map-auth-test-{name}-{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        rth_map_database::open_db(&path).await.expect("open temp db")
    }

    fn test_config() -> AuthConfig {
        AuthConfig {
            secret: "test_secret".to_string(),
            expiry_hours: 1,
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("rahasia123").unwrap();
        assert!(verify_password("rahasia123", &hash).unwrap());
        assert!(!verify_password("salah", &hash).unwrap());
    }

    #[test]
    fn extract_bearer_rejects_missing_and_empty() {
        assert!(matches!(extract_bearer(None), Err(AuthError::MissingToken)));
        assert!(matches!(
            extract_bearer(Some("Bearer ")),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            extract_bearer(Some("Basic abc")),
            Err(AuthError::MissingToken)
        ));
        assert_eq!(extract_bearer(Some("Bearer abc")).unwrap(), "abc");
    }

    #[tokio::test]
    async fn setup_refuses_once_admin_exists() {
        let db = open_temp("setup").await;

        setup_initial_admin(db.as_ref(), "budi", "rahasia123", None)
            .await
            .unwrap();

        let err = setup_initial_admin(db.as_ref(), "siti", "rahasia123", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AdminExists));
        assert_eq!(
            rth_map_database::admin::count_admins(db.as_ref())
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn first_admin_gets_super_admin_role() {
        let db = open_temp("role").await;
        let account = setup_initial_admin(db.as_ref(), "budi", "rahasia123", None)
            .await
            .unwrap();
        assert_eq!(account.role, "super_admin");
        assert!(account.is_active);
    }

    #[tokio::test]
    async fn login_full_flow() {
        let db = open_temp("login").await;
        let config = test_config();
        setup_initial_admin(db.as_ref(), "budi", "rahasia123", None)
            .await
            .unwrap();

        let (token, account) = login(db.as_ref(), &config, "budi", "rahasia123")
            .await
            .unwrap();
        assert_eq!(account.username, "budi");
        assert!(account.last_login.is_none());

        let authorized = authorize(db.as_ref(), &config, Some(&format!("Bearer {token}")))
            .await
            .unwrap();
        assert_eq!(authorized.id, account.id);
        assert!(authorized.last_login.is_some());
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let db = open_temp("wrong-pw").await;
        setup_initial_admin(db.as_ref(), "budi", "rahasia123", None)
            .await
            .unwrap();

        let err = login(db.as_ref(), &test_config(), "budi", "salah")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_rejects_inactive_account_with_correct_password() {
        let db = open_temp("inactive").await;
        let account = setup_initial_admin(db.as_ref(), "budi", "rahasia123", None)
            .await
            .unwrap();
        rth_map_database::admin::set_active(db.as_ref(), account.id, false)
            .await
            .unwrap();

        let err = login(db.as_ref(), &test_config(), "budi", "rahasia123")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountInactive));
    }

    #[tokio::test]
    async fn logout_revokes_the_token() {
        let db = open_temp("logout").await;
        let config = test_config();
        setup_initial_admin(db.as_ref(), "budi", "rahasia123", None)
            .await
            .unwrap();
        let (token, _) = login(db.as_ref(), &config, "budi", "rahasia123")
            .await
            .unwrap();
        let header = format!("Bearer {token}");

        logout(db.as_ref(), &config, Some(&header)).await.unwrap();

        let err = authorize(db.as_ref(), &config, Some(&header))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenRevoked));
    }

    #[tokio::test]
    async fn create_admin_rejects_duplicate_username() {
        let db = open_temp("dup").await;
        create_admin(db.as_ref(), "budi", "rahasia123", None, "admin")
            .await
            .unwrap();

        let err = create_admin(db.as_ref(), "BUDI", "rahasia456", None, "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername));
    }

    #[tokio::test]
    async fn change_password_requires_current() {
        let db = open_temp("change-pw").await;
        let config = test_config();
        let account = setup_initial_admin(db.as_ref(), "budi", "rahasia123", None)
            .await
            .unwrap();

        let err = change_password(db.as_ref(), &account, "salah", "barubaru1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        change_password(db.as_ref(), &account, "rahasia123", "barubaru1")
            .await
            .unwrap();
        login(db.as_ref(), &config, "budi", "barubaru1")
            .await
            .unwrap();
    }
}
