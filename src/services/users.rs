//! Authentication service: signup, login and token checks

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{Credentials, LoginResponse, User, UserClaims},
    repository::DynStore,
};

#[derive(Clone)]
pub struct UsersService {
    store: DynStore,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(store: DynStore, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Register a new account; the email must not be taken
    pub async fn signup(&self, credentials: &Credentials) -> AppResult<User> {
        credentials.validate()?;

        if self.store.users_email_exists(&credentials.email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = self.hash_password(&credentials.password)?;
        let user = self
            .store
            .users_create(&credentials.email, &password_hash)
            .await?;

        tracing::info!(user_id = user.user_id, "User signed up");
        Ok(user)
    }

    /// Check credentials and issue a bearer token
    ///
    /// Unknown email and wrong password both answer `NotFound`.
    pub async fn login(&self, credentials: &Credentials) -> AppResult<LoginResponse> {
        let user = self
            .store
            .users_get_by_email(&credentials.email)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid email or password".to_string()))?;

        if !self.verify_password(&user, &credentials.password)? {
            tracing::debug!(user_id = user.user_id, "Rejected login attempt");
            return Err(AppError::NotFound("Invalid email or password".to_string()));
        }

        let now = Utc::now().timestamp();
        let expires_in = i64::try_from(self.config.jwt_expiration_hours)
            .ok()
            .and_then(|hours| hours.checked_mul(3600))
            .filter(|seconds| now.checked_add(*seconds).is_some())
            .ok_or_else(|| AppError::Internal("Token lifetime is out of range".to_string()))?;
        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.user_id,
            exp: now + expires_in,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(user_id = user.user_id, "User logged in");
        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        })
    }

    /// Decode a bearer token issued by [`UsersService::login`]
    pub fn validate_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.store.users_get_by_id(id).await
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
