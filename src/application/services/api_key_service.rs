//! API key issuance, validation and rotation.

use chrono::{DateTime, Utc};
use rand::{Rng, distr::Alphanumeric};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::entities::{ApiKey, key_validity};
use crate::domain::repositories::ApiKeyRepository;
use crate::error::{AppError, AuthError};

/// Length of generated raw secrets.
const SECRET_LENGTH: usize = 48;

/// Shortest caller-supplied secret accepted by [`ApiKeyService::issue`].
pub const MIN_SECRET_LENGTH: usize = 16;

/// A freshly stored key together with its raw secret.
///
/// This is the only place the raw secret exists; it cannot be recovered once
/// dropped.
#[derive(Debug, Clone)]
pub struct IssuedKey {
    pub secret: String,
    pub key: ApiKey,
}

/// Service for API key lifecycle.
///
/// Secrets are hashed with SHA-256 before storage and comparison; stored
/// timestamps are compared in UTC.
pub struct ApiKeyService<R: ApiKeyRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ApiKeyRepository + ?Sized> ApiKeyService<R> {
    /// Creates a new API key service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Hashes a raw secret with SHA-256.
    ///
    /// Returns a 64-character lowercase hex digest.
    pub fn hash_key(raw: &str) -> String {
        hex::encode(Sha256::digest(raw.as_bytes()))
    }

    /// Generates a random 48-character alphanumeric secret.
    pub fn generate_secret() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SECRET_LENGTH)
            .map(char::from)
            .collect()
    }

    /// Creates and stores a new random key valid for one week.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn generate(&self) -> Result<IssuedKey, AppError> {
        self.store(Self::generate_secret()).await
    }

    /// Validates a candidate secret against stored hashes.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidKey`] if no stored hash matches.
    /// Returns [`AuthError::KeyExpired`] if the match is past its expiry.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn validate(&self, candidate: &str) -> Result<ApiKey, AppError> {
        self.validate_at(candidate, Utc::now()).await
    }

    /// Same as [`Self::validate`] with an explicit reference time.
    pub async fn validate_at(
        &self,
        candidate: &str,
        now: DateTime<Utc>,
    ) -> Result<ApiKey, AppError> {
        let key_hash = Self::hash_key(candidate);

        let Some(key) = self.repository.find_by_hash(&key_hash).await? else {
            warn!(key_prefix = %key_prefix(candidate), "Rejected unknown API key");
            return Err(AuthError::InvalidKey.into());
        };

        if key.is_expired_at(now) {
            warn!(key_prefix = %key_prefix(candidate), key_id = %key.id, "Rejected expired API key");
            return Err(AuthError::KeyExpired.into());
        }

        debug!(key_prefix = %key_prefix(candidate), "API key validated");
        Ok(key)
    }

    /// Stores a new key without any authorization check.
    ///
    /// `secret` is stored as given when present, otherwise a random secret is
    /// generated. Used by the admin CLI and by [`Self::issue`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `secret` is shorter than
    /// [`MIN_SECRET_LENGTH`].
    pub async fn create(&self, secret: Option<String>) -> Result<IssuedKey, AppError> {
        if let Some(secret) = &secret
            && secret.len() < MIN_SECRET_LENGTH
        {
            return Err(AppError::bad_request(
                format!("API key must be at least {MIN_SECRET_LENGTH} characters long."),
                json!({ "provided_length": secret.len() }),
            ));
        }

        self.store(secret.unwrap_or_else(Self::generate_secret))
            .await
    }

    /// Administrative issuance of a new key.
    ///
    /// - Without `old_key`, issuance is only allowed while no key exists yet.
    /// - With `old_key`, it must match a stored key. Its expiry is not checked,
    ///   so an expired key can still be rolled forward.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a key already exists and no old key
    /// was given, or if `new_key` is too short.
    /// Returns [`AuthError::InvalidKey`] if `old_key` matches nothing.
    pub async fn issue(
        &self,
        old_key: Option<&str>,
        new_key: Option<String>,
    ) -> Result<IssuedKey, AppError> {
        match old_key {
            None => {
                if self.repository.exists_any().await? {
                    return Err(AppError::bad_request(
                        "API key already exists. Provide the current key to replace it.",
                        json!({}),
                    ));
                }
            }
            Some(old) => {
                if self
                    .repository
                    .find_by_hash(&Self::hash_key(old))
                    .await?
                    .is_none()
                {
                    warn!(key_prefix = %key_prefix(old), "Key issuance with unknown old key");
                    return Err(AuthError::InvalidKey.into());
                }
            }
        }

        self.create(new_key).await
    }

    /// Runs one rotation check.
    ///
    /// A replacement is generated when there is no key, the newest key has
    /// no expiry, or the newest key has expired. Returns the replacement, if
    /// any.
    pub async fn rotate_if_needed(&self) -> Result<Option<IssuedKey>, AppError> {
        self.rotate_if_needed_at(Utc::now()).await
    }

    /// Same as [`Self::rotate_if_needed`] with an explicit reference time.
    pub async fn rotate_if_needed_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<IssuedKey>, AppError> {
        let needs_rotation = match self.repository.latest().await? {
            None => true,
            Some(key) => key.needs_rotation_at(now),
        };

        if !needs_rotation {
            return Ok(None);
        }

        let issued = self.generate().await?;
        metrics::counter!("shortener_api_keys_rotated_total").increment(1);
        Ok(Some(issued))
    }

    /// Lists all stored keys, newest first.
    pub async fn list(&self) -> Result<Vec<ApiKey>, AppError> {
        self.repository.list().await
    }

    async fn store(&self, secret: String) -> Result<IssuedKey, AppError> {
        let expires_at = Utc::now() + key_validity();
        let key = self
            .repository
            .insert(&Self::hash_key(&secret), Some(expires_at))
            .await?;

        info!(
            key_prefix = %key_prefix(&secret),
            key_id = %key.id,
            expires_at = %expires_at,
            "New API key generated"
        );

        Ok(IssuedKey { secret, key })
    }
}

/// First four characters of a secret, masked for logs.
fn key_prefix(raw: &str) -> String {
    let prefix: String = raw.chars().take(4).collect();
    format!("{prefix}****")
}
