//! Bearer tokens issued by the realm and the expiry helpers that drive cache reuse.
//!
//! The realm issues compact JWTs (`header.payload.signature`). Only the `exp` claim is read;
//! signatures are never verified because the token is opaque to this client and is only
//! forwarded to AIPE, which performs its own validation.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::{_prelude::*, auth::Secret};

/// Failures raised while reading the expiry of a bearer token.
#[derive(Debug, ThisError)]
pub enum TokenError {
	/// Token does not consist of exactly three dot-separated segments.
	#[error("Token has {segments} dot-separated segments; expected 3.")]
	Malformed {
		/// Number of segments found.
		segments: usize,
	},
	/// Payload segment is not padding-free base64url.
	#[error("Token payload is not valid base64url.")]
	PayloadEncoding(#[source] base64::DecodeError),
	/// Payload segment is not a JSON claims object.
	#[error("Token payload is not a JSON claims object.")]
	PayloadJson(#[source] serde_json::Error),
	/// Payload carries no `exp` claim.
	#[error("Token has no exp claim.")]
	MissingExp,
	/// `exp` claim cannot be represented as an instant.
	#[error("Token exp claim {exp} is out of range.")]
	ExpOutOfRange {
		/// Raw claim value in Unix seconds.
		exp: i64,
	},
}

#[derive(Deserialize)]
struct ExpClaim {
	exp: Option<i64>,
}

/// Access token plus the expiry decoded from its claims.
///
/// The expiry is decoded once at construction. Tokens whose expiry cannot be read are still
/// usable for requests but never count as valid for cache reuse.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
	secret: Secret,
	expires_at: Option<OffsetDateTime>,
}
impl BearerToken {
	/// Wraps a raw access token and decodes its expiry.
	pub fn new(raw: impl Into<String>) -> Self {
		let secret = Secret::new(raw);
		let expires_at = Self::expiration_time(secret.expose()).ok();

		Self { secret, expires_at }
	}

	/// Extracts the `exp` claim of a compact JWT as an instant.
	pub fn expiration_time(raw: &str) -> Result<OffsetDateTime, TokenError> {
		let payload = payload_segment(raw)?;
		let payload = URL_SAFE_NO_PAD.decode(payload).map_err(TokenError::PayloadEncoding)?;
		let claims: ExpClaim = serde_json::from_slice(&payload).map_err(TokenError::PayloadJson)?;
		let exp = claims.exp.ok_or(TokenError::MissingExp)?;

		OffsetDateTime::from_unix_timestamp(exp).map_err(|_| TokenError::ExpOutOfRange { exp })
	}

	/// Returns the raw token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.secret.expose()
	}

	/// Expiry decoded from the `exp` claim, if readable.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_at
	}

	/// Returns `true` if the token is still valid `delta` after `now`.
	///
	/// Tokens without a readable expiry are never valid.
	pub fn is_valid_at(&self, now: OffsetDateTime, delta: Duration) -> bool {
		self.expires_at.is_some_and(|expires_at| now + delta < expires_at)
	}

	/// Returns `true` if the token is still valid `delta` from the current UTC instant.
	pub fn is_valid_in(&self, delta: Duration) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc(), delta)
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerToken")
			.field("token", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
impl Display for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Checks whether a raw compact JWT is still valid at `now + delta`.
///
/// Returns `false` when the expiry cannot be read.
pub fn is_valid_in(raw: &str, delta: Duration) -> bool {
	BearerToken::expiration_time(raw)
		.is_ok_and(|expires_at| OffsetDateTime::now_utc() + delta < expires_at)
}

fn payload_segment(raw: &str) -> Result<&str, TokenError> {
	let mut segments = raw.split('.');

	match (segments.next(), segments.next(), segments.next(), segments.next()) {
		(Some(_), Some(payload), Some(_), None) => Ok(payload),
		_ => Err(TokenError::Malformed { segments: raw.split('.').count() }),
	}
}
