//! Provider settings with environment-variable fallback.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Environment variable consulted for [`ProviderConfig::application_username`].
pub const ENV_APPLICATION_USERNAME: &str = "SWP_APPLICATION_USER_USERNAME";
/// Environment variable consulted for [`ProviderConfig::application_password`].
pub const ENV_APPLICATION_PASSWORD: &str = "SWP_APPLICATION_USER_PASSWORD";
/// Environment variable consulted for [`ProviderConfig::authenticator_realm_url`].
pub const ENV_AUTHENTICATOR_URL: &str = "SWP_AUTHENTICATOR_URL";
/// Environment variable consulted for [`ProviderConfig::aipe_url`].
pub const ENV_AIPE_URL: &str = "SWP_AIPE_URL";

/// Settings as a host supplies them; any field may be left for the environment to fill.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProviderConfig {
	/// Service-account username.
	#[serde(default)]
	pub application_username: Option<String>,
	/// Service-account password.
	#[serde(default)]
	pub application_password: Option<Secret>,
	/// OIDC realm URL; the token endpoint is derived from it.
	#[serde(default)]
	pub authenticator_realm_url: Option<String>,
	/// AIPE API base URL.
	#[serde(default)]
	pub aipe_url: Option<String>,
	/// Deadline applied to every HTTP request, in seconds. Unset means no client-side deadline.
	#[serde(default)]
	pub request_timeout_secs: Option<u64>,
}
impl ProviderConfig {
	/// Resolves the configuration against the process environment.
	pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
		self.resolve_with(|name| std::env::var(name).ok())
	}

	/// Resolves the configuration using `lookup` for fallback values.
	///
	/// Explicit non-empty values win; empty strings count as absent. Every missing setting is
	/// reported in one [`ConfigError::MissingSettings`].
	pub fn resolve_with<F>(self, lookup: F) -> Result<ResolvedConfig, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let pick = |explicit: Option<String>, env: &str| {
			explicit.filter(|v| !v.is_empty()).or_else(|| lookup(env).filter(|v| !v.is_empty()))
		};
		let username = pick(self.application_username, ENV_APPLICATION_USERNAME);
		let password = pick(
			self.application_password.map(|secret| secret.expose().to_owned()),
			ENV_APPLICATION_PASSWORD,
		);
		let realm_url = pick(self.authenticator_realm_url, ENV_AUTHENTICATOR_URL);
		let aipe_url = pick(self.aipe_url, ENV_AIPE_URL);
		let missing = [
			("application_username", username.is_none()),
			("application_password", password.is_none()),
			("authenticator_realm_url", realm_url.is_none()),
			("aipe_url", aipe_url.is_none()),
		]
		.into_iter()
		.filter_map(|(setting, absent)| absent.then_some(setting))
		.collect::<Vec<_>>();

		let (Some(username), Some(password), Some(realm_url), Some(aipe_url)) =
			(username, password, realm_url, aipe_url)
		else {
			return Err(ConfigError::MissingSettings { settings: missing });
		};

		Ok(ResolvedConfig {
			application_username: username,
			application_password: Secret::new(password),
			authenticator_realm_url: parse_url("authenticator_realm_url", &realm_url)?,
			aipe_url: parse_url("aipe_url", &aipe_url)?,
			request_timeout: self.request_timeout_secs.map(StdDuration::from_secs),
		})
	}
}

/// Fully resolved settings ready to open a [`Session`](crate::session::Session).
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
	/// Service-account username.
	pub application_username: String,
	/// Service-account password.
	pub application_password: Secret,
	/// OIDC realm URL.
	pub authenticator_realm_url: Url,
	/// AIPE API base URL.
	pub aipe_url: Url,
	/// Per-request deadline, if any.
	pub request_timeout: Option<StdDuration>,
}

fn parse_url(setting: &'static str, raw: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { setting, source })?;

	if url.cannot_be_a_base() {
		return Err(ConfigError::NotABaseUrl { setting });
	}

	Ok(url)
}
