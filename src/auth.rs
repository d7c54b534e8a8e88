// ABOUTME: Credential signer creating and verifying access and refresh JWTs
// ABOUTME: Each token class signs with its own secret; verification returns a tagged result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Credential Signer
//!
//! Stateless HS256 signing of claim bundles. Access and refresh tokens use
//! separate keys, so a leaked access secret cannot mint refresh tokens and the
//! reverse. Every token carries a random `jti`, which makes two tokens issued
//! for the same identity in the same second distinct.
//!
//! Verification checks, in order: signature (under the requested class key),
//! the `typ` claim, then `exp` against the clock with no leeway.

use crate::config::environment::AuthConfig;
use crate::constants::{service_names, tokens::GENERATED_SECRET_BYTES};
use crate::errors::{AppError, AppResult};
use crate::models::{Identity, TokenClass, UserRole};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use uuid::Uuid;

/// Convert a duration to a human-readable format
fn humanize_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds().abs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;

    if hours > 0 {
        format!("{hours} hours")
    } else if minutes > 0 {
        format!("{minutes} minutes")
    } else {
        format!("{total_secs} seconds")
    }
}

/// `JWT` validation error with detailed information
///
/// The detail is for logs. Callers map every variant to a coarse outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
        /// Current time for reference
        current_time: DateTime<Utc>,
    },
    /// Token signature is invalid or the token belongs to another class
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl JwtValidationError {
    /// Whether the only problem is the token's age
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        matches!(self, Self::TokenExpired { .. })
    }
}

impl fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenExpired {
                expired_at,
                current_time,
            } => write!(
                f,
                "JWT token expired {} ago at {}",
                humanize_duration(current_time.signed_duration_since(*expired_at)),
                expired_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Self::TokenInvalid { reason } => {
                write!(f, "JWT token signature is invalid: {reason}")
            }
            Self::TokenMalformed { details } => {
                write!(f, "JWT token is malformed: {details}")
            }
        }
    }
}

impl StdError for JwtValidationError {}

/// `JWT` claims shared by both token classes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Identity id
    pub sub: String,
    /// Identity role at issuance
    pub role: UserRole,
    /// Token class
    pub typ: TokenClass,
    /// Issuer
    pub iss: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

/// A freshly signed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Serialized token
    pub token: String,
    /// Class it was signed for
    pub class: TokenClass,
    /// Moment the token stops verifying
    pub expires_at: DateTime<Utc>,
}

/// Claims recovered from a token that passed verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// Identity id from `sub`
    pub user_id: Uuid,
    /// Role from `role`
    pub role: UserRole,
    /// Class from `typ`
    pub class: TokenClass,
    /// Issued at
    pub issued_at: DateTime<Utc>,
    /// Expiry
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
struct ClassKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

/// Stateless signer holding one key pair and lifetime per token class
#[derive(Clone)]
pub struct TokenSigner {
    access: ClassKeys,
    refresh: ClassKeys,
    validation: Validation,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("access_ttl", &self.access.ttl)
            .field("refresh_ttl", &self.refresh.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Create a signer from raw secrets and lifetimes
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_INVALID` if the secrets are empty or identical, or a
    /// lifetime is not positive
    pub fn new(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> AppResult<Self> {
        if access_secret.is_empty() || refresh_secret.is_empty() {
            return Err(AppError::config_invalid("Signing secrets must not be empty"));
        }
        if access_secret == refresh_secret {
            return Err(AppError::config_invalid(
                "Access and refresh tokens must use different secrets",
            ));
        }
        if access_ttl <= Duration::zero() || refresh_ttl <= Duration::zero() {
            return Err(AppError::config_invalid("Token lifetimes must be positive"));
        }

        // Expiry is checked by hand so the caller learns when the token expired
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_issuer(&[service_names::TOKEN_ISSUER]);

        Ok(Self {
            access: ClassKeys {
                encoding: EncodingKey::from_secret(access_secret),
                decoding: DecodingKey::from_secret(access_secret),
                ttl: access_ttl,
            },
            refresh: ClassKeys {
                encoding: EncodingKey::from_secret(refresh_secret),
                decoding: DecodingKey::from_secret(refresh_secret),
                ttl: refresh_ttl,
            },
            validation,
        })
    }

    /// Create a signer from validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration violates [`Self::new`]'s checks
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        Self::new(
            config.access_secret.as_bytes(),
            config.refresh_secret.as_bytes(),
            config.access_ttl,
            config.refresh_ttl,
        )
    }

    const fn keys(&self, class: TokenClass) -> &ClassKeys {
        match class {
            TokenClass::Access => &self.access,
            TokenClass::Refresh => &self.refresh,
        }
    }

    /// Lifetime of tokens of `class`
    #[must_use]
    pub const fn ttl(&self, class: TokenClass) -> Duration {
        self.keys(class).ttl
    }

    /// Sign a token of `class` for `identity`, valid from now
    ///
    /// # Errors
    ///
    /// Returns `SIGNING_ERROR` if encoding fails
    pub fn issue(&self, identity: &Identity, class: TokenClass) -> AppResult<IssuedToken> {
        self.issue_at(identity, class, Utc::now())
    }

    /// Sign a token of `class` for `identity` as if issued at `now`
    ///
    /// # Errors
    ///
    /// Returns `SIGNING_ERROR` if encoding fails
    pub fn issue_at(
        &self,
        identity: &Identity,
        class: TokenClass,
        now: DateTime<Utc>,
    ) -> AppResult<IssuedToken> {
        let keys = self.keys(class);
        let expires_at = now + keys.ttl;

        let claims = Claims {
            sub: identity.id.to_string(),
            role: identity.role,
            typ: class,
            iss: service_names::TOKEN_ISSUER.to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| AppError::signing(format!("Failed to sign {class} token: {e}")))?;

        // Second precision, matching what verification will see
        let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or(expires_at);

        Ok(IssuedToken {
            token,
            class,
            expires_at,
        })
    }

    /// Verify a token as `class` against the current time
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if the signature fails under the class
    /// key, the token is of another class, it is malformed, or it has expired
    pub fn verify(
        &self,
        token: &str,
        class: TokenClass,
    ) -> Result<VerifiedToken, JwtValidationError> {
        self.verify_at(token, class, Utc::now())
    }

    /// Verify a token as `class` against the supplied clock
    ///
    /// # Errors
    ///
    /// See [`Self::verify`]
    pub fn verify_at(
        &self,
        token: &str,
        class: TokenClass,
        now: DateTime<Utc>,
    ) -> Result<VerifiedToken, JwtValidationError> {
        let claims = self.decode_token_claims(token, class)?;

        if claims.typ != class {
            tracing::warn!(
                token.expected = %class,
                token.actual = %claims.typ,
                "Token presented for the wrong class"
            );
            return Err(JwtValidationError::TokenInvalid {
                reason: format!("expected {class} token, found {}", claims.typ),
            });
        }

        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or_else(|| {
            JwtValidationError::TokenMalformed {
                details: "exp claim out of range".to_owned(),
            }
        })?;
        Self::check_token_expiry(&claims, now, expires_at)?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|e| JwtValidationError::TokenMalformed {
                details: format!("sub claim is not a valid identity id: {e}"),
            })?;

        Ok(VerifiedToken {
            user_id,
            role: claims.role,
            class: claims.typ,
            issued_at: DateTime::from_timestamp(claims.iat, 0).unwrap_or(expires_at),
            expires_at,
        })
    }

    /// Decode claims under the class key without expiration validation
    fn decode_token_claims(
        &self,
        token: &str,
        class: TokenClass,
    ) -> Result<Claims, JwtValidationError> {
        decode::<Claims>(token, &self.keys(class).decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(&e, class))
    }

    /// A token is valid strictly before its `exp`
    fn check_token_expiry(
        claims: &Claims,
        current_time: DateTime<Utc>,
        expired_at: DateTime<Utc>,
    ) -> Result<(), JwtValidationError> {
        if current_time.timestamp() >= claims.exp {
            tracing::debug!(
                user.id = %claims.sub,
                token.class = %claims.typ,
                "Token expired {} ago",
                humanize_duration(current_time.signed_duration_since(expired_at))
            );
            return Err(JwtValidationError::TokenExpired {
                expired_at,
                current_time,
            });
        }
        Ok(())
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(e: &JwtError, class: TokenClass) -> JwtValidationError {
        tracing::debug!(token.class = %class, error = ?e.kind(), "Token verification failed");

        match e.kind() {
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".to_owned(),
            },
            ErrorKind::InvalidIssuer => JwtValidationError::TokenInvalid {
                reason: "Token issuer is not accepted".to_owned(),
            },
            ErrorKind::InvalidAlgorithm => JwtValidationError::TokenInvalid {
                reason: "Token algorithm is not accepted".to_owned(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".to_owned(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            ErrorKind::Utf8(utf8_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid UTF-8: {utf8_err}"),
            },
            ErrorKind::MissingRequiredClaim(claim) => JwtValidationError::TokenMalformed {
                details: format!("Token is missing the {claim} claim"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }
}

/// Generate a random `JWT` secret
///
/// # Errors
///
/// Returns an error if the system RNG fails; the service cannot sign tokens
/// safely without it
pub fn generate_jwt_secret() -> AppResult<[u8; GENERATED_SECRET_BYTES]> {
    let rng = SystemRandom::new();
    let mut secret = [0u8; GENERATED_SECRET_BYTES];

    rng.fill(&mut secret).map_err(|e| {
        tracing::error!("CRITICAL: Failed to generate JWT secret: {e}");
        AppError::internal("System RNG failure - cannot generate secure JWT secret")
    })?;

    Ok(secret)
}
