//! Client-level error types shared by the authenticator, the AIPE client, and configuration.

// self
use crate::{_prelude::*, auth::TokenError};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// AIPE answered with a status outside the operation's success set.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Response body or token could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Token endpoint rejected the client credentials.
	#[error("Authentication failed: {reason}.")]
	Authentication {
		/// HTTP status code returned by the token endpoint, when available.
		status: Option<u16>,
		/// Endpoint- or client-supplied reason string.
		reason: String,
	},
}
impl Error {
	/// Returns `true` when the error is an AIPE API error with status `404 Not Found`.
	///
	/// Hosts use this to treat an object that vanished server-side as drift rather than as a
	/// hard failure.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::Api(api) if api.is_not_found())
	}

	/// Returns the HTTP status carried by API or authentication failures.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api(api) => Some(api.status),
			Self::Authentication { status, .. } => *status,
			_ => None,
		}
	}
}
impl From<TokenError> for Error {
	fn from(e: TokenError) -> Self {
		DecodeError::Token(e).into()
	}
}

/// Non-success HTTP status returned by the AIPE API.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct ApiError {
	/// HTTP status code.
	pub status: u16,
	/// Human-readable summary.
	pub message: String,
}
impl ApiError {
	/// Builds an error for an unexpected status code.
	pub fn unexpected_status(status: u16) -> Self {
		Self { status, message: format!("Unexpected status code: {status}.") }
	}

	/// Returns `true` for `404 Not Found`.
	pub fn is_not_found(&self) -> bool {
		self.status == 404
	}
}

/// Configuration and validation failures raised before any network activity.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A configured URL cannot be parsed.
	#[error("Setting `{setting}` is not a valid URL.")]
	InvalidUrl {
		/// Setting name.
		setting: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A configured URL cannot carry path segments (e.g. `mailto:`).
	#[error("Setting `{setting}` cannot be used as a base URL.")]
	NotABaseUrl {
		/// Setting name.
		setting: &'static str,
	},

	/// One or more required settings are absent from both explicit config and environment.
	#[error("Missing required settings: {}.", .settings.join(", "))]
	MissingSettings {
		/// Names of every missing setting.
		settings: Vec<&'static str>,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, deadline).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Endpoint label (`token endpoint`, `AIPE API`).
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request did not complete before the HTTP client's deadline.
	#[error("Request to {endpoint} timed out.")]
	Timeout {
		/// Endpoint label (`token endpoint`, `AIPE API`).
		endpoint: &'static str,
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Timeout { endpoint, source: Box::new(src) }
	}
}

/// Malformed payloads: JSON bodies, property values, and bearer tokens.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Response body was not the expected JSON document.
	#[error("Response body is malformed JSON.")]
	Json {
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: Option<u16>,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Serialize(#[source] serde_json::Error),
	/// A property value was neither a string nor a boolean.
	#[error("Property `{key}` holds an unsupported {kind} value.")]
	UnsupportedPropertyValue {
		/// Property name.
		key: String,
		/// JSON type name of the offending value.
		kind: &'static str,
	},
	/// Bearer token structure or claims could not be decoded.
	#[error(transparent)]
	Token(TokenError),
	/// Token endpoint answered 200 with something that is not a token response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenResponse {
		/// Summary of the unexpected payload.
		message: String,
	},
}
