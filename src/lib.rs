//! Async client for the AIPE data-object API: OIDC client-credentials token caching, object
//! CRUD, and link-set reconciliation behind one strongly typed surface.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod aipe;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod session;

mod oauth;

#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
	// self
	use crate::{
		aipe::AipeClient,
		auth::{Authenticator, BearerToken},
		http::ReqwestHttpClient,
	};

	/// Username used by the integration-test authenticator.
	pub const TEST_USERNAME: &str = "aipe-user";
	/// Password used by the integration-test authenticator.
	pub const TEST_PASSWORD: &str = "aipe-pass";
	/// `Authorization` header the token endpoint expects for [`TEST_USERNAME`]/[`TEST_PASSWORD`].
	pub const TEST_BASIC_AUTHORIZATION: &str = "Basic YWlwZS11c2VyOmFpcGUtcGFzcw==";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs an [`Authenticator`] pointed at `realm_url` using the test credentials.
	pub fn build_reqwest_test_authenticator(realm_url: &str) -> Authenticator {
		let realm = Url::parse(realm_url).expect("Failed to parse test realm URL.");

		Authenticator::with_http_client(
			realm,
			TEST_USERNAME,
			TEST_PASSWORD,
			test_reqwest_http_client(),
		)
		.expect("Failed to build test authenticator.")
	}

	/// Constructs an [`AipeClient`] pointed at `base_url` carrying `token`.
	pub fn build_reqwest_test_client(base_url: &str, token: &str) -> AipeClient {
		let base = Url::parse(base_url).expect("Failed to parse test AIPE URL.");

		AipeClient::with_http_client(test_reqwest_http_client(), base, BearerToken::new(token))
			.expect("Failed to build test AIPE client.")
	}

	/// Encodes an unsigned compact JWT whose payload is `claims`.
	pub fn encode_test_jwt(claims: &serde_json::Value) -> String {
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
		let payload = URL_SAFE_NO_PAD.encode(claims.to_string());

		format!("{header}.{payload}.signature")
	}

	/// Encodes a compact JWT that expires `ttl` from now.
	pub fn test_jwt_expiring_in(ttl: Duration) -> String {
		let exp = (OffsetDateTime::now_utc() + ttl).unix_timestamp();

		encode_test_jwt(&serde_json::json!({ "exp": exp, "sub": "service-account-aipe" }))
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
