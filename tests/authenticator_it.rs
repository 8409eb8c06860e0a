// std
use std::time::Duration as StdDuration;
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use httpmock::prelude::*;
use serde_json::json;
// self
use aipe_client::{_preludet::*, auth::Authenticator, error::DecodeError};

const REALM_PATH: &str = "/realms/aipe";
const TOKEN_PATH: &str = "/realms/aipe/protocol/openid-connect/token";

fn token_body(access_token: &str) -> serde_json::Value {
	json!({ "access_token": access_token, "token_type": "Bearer", "expires_in": 300 })
}

#[tokio::test]
async fn authenticate_sends_basic_credentials_and_caches_token() {
	let server = MockServer::start_async().await;
	let authenticator = build_reqwest_test_authenticator(&server.url(REALM_PATH));
	let jwt = test_jwt_expiring_in(Duration::hours(1));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("authorization", TEST_BASIC_AUTHORIZATION)
				.form_urlencoded_tuple("grant_type", "client_credentials");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(token_body(&jwt));
		})
		.await;
	let first = authenticator.authenticate().await.expect("Initial authentication should succeed.");
	let second = authenticator.authenticate().await.expect("Cached authentication should succeed.");

	assert_eq!(first.expose(), jwt);
	assert_eq!(second, first);
	assert!(first.expires_at().is_some());

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn access_token_alone_is_a_complete_answer() {
	let server = MockServer::start_async().await;
	let authenticator = build_reqwest_test_authenticator(&server.url(REALM_PATH));
	let jwt = test_jwt_expiring_in(Duration::hours(1));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).json_body(json!({ "access_token": jwt }));
		})
		.await;
	let token = authenticator.authenticate().await.expect("Bare access token should be accepted.");

	assert_eq!(token.expose(), jwt);
	assert!(token.expires_at().is_some());

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn credentials_with_reserved_characters_are_sent_verbatim() {
	let server = MockServer::start_async().await;
	let realm = Url::parse(&server.url(REALM_PATH)).expect("Mock realm URL should parse.");
	let authenticator =
		Authenticator::with_http_client(realm, "svc@corp", "p:ss w+rd", test_reqwest_http_client())
			.expect("Authenticator should build.");
	let jwt = test_jwt_expiring_in(Duration::hours(1));
	let expected = format!("Basic {}", STANDARD.encode("svc@corp:p:ss w+rd"));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH).header("authorization", &expected);
			then.status(200).json_body(token_body(&jwt));
		})
		.await;

	authenticator.authenticate().await.expect("Verbatim credentials should be accepted.");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn concurrent_callers_share_one_exchange() {
	let server = MockServer::start_async().await;
	let authenticator = build_reqwest_test_authenticator(&server.url(REALM_PATH));
	let jwt = test_jwt_expiring_in(Duration::hours(1));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.json_body(token_body(&jwt))
				.delay(StdDuration::from_millis(100));
		})
		.await;
	let (first, second, third) = tokio::join!(
		authenticator.authenticate(),
		authenticator.authenticate(),
		authenticator.authenticate(),
	);
	let first = first.expect("First concurrent call should succeed.");

	assert_eq!(second.expect("Second concurrent call should succeed."), first);
	assert_eq!(third.expect("Third concurrent call should succeed."), first);

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn token_inside_safety_margin_is_refreshed() {
	let server = MockServer::start_async().await;
	let authenticator = build_reqwest_test_authenticator(&server.url(REALM_PATH));
	let jwt = test_jwt_expiring_in(Duration::seconds(3));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.json_body(token_body(&jwt));
		})
		.await;

	authenticator.authenticate().await.expect("First authentication should succeed.");
	authenticator.authenticate().await.expect("Second authentication should succeed.");

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn token_without_exp_is_never_reused() {
	let server = MockServer::start_async().await;
	let authenticator = build_reqwest_test_authenticator(&server.url(REALM_PATH));
	let opaque = encode_test_jwt(&json!({ "sub": "service-account-aipe" }));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.json_body(token_body(&opaque));
		})
		.await;
	let token = authenticator.authenticate().await.expect("Token without exp is still usable.");

	assert_eq!(token.expose(), opaque);
	assert!(token.expires_at().is_none());

	authenticator.authenticate().await.expect("Second authentication should succeed.");

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn rejected_credentials_surface_authentication_error() {
	let server = MockServer::start_async().await;
	let authenticator = build_reqwest_test_authenticator(&server.url(REALM_PATH));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(401).header("content-type", "application/json").json_body(json!({
				"error": "invalid_client",
				"error_description": "Invalid client credentials",
			}));
		})
		.await;
	let err = authenticator.authenticate().await.expect_err("Bad credentials must fail.");

	assert!(matches!(err, Error::Authentication { status: Some(401), .. }));
	assert!(authenticator.cached_token().await.is_none());

	mock.assert_async().await;
}

#[tokio::test]
async fn non_json_failure_is_classified_by_status() {
	let server = MockServer::start_async().await;
	let authenticator = build_reqwest_test_authenticator(&server.url(REALM_PATH));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(503).header("content-type", "text/html").body("<h1>Unavailable</h1>");
		})
		.await;
	let err = authenticator.authenticate().await.expect_err("Unavailable realm must fail.");

	assert_eq!(err.status(), Some(503));
	assert!(matches!(err, Error::Authentication { .. }));

	mock.assert_async().await;
}

#[tokio::test]
async fn ok_status_without_token_is_a_decode_error() {
	let server = MockServer::start_async().await;
	let authenticator = build_reqwest_test_authenticator(&server.url(REALM_PATH));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "unexpected": true }));
		})
		.await;
	let err = authenticator.authenticate().await.expect_err("Body lacks an access token.");

	assert!(matches!(err, Error::Decode(DecodeError::TokenResponse { .. })));

	mock.assert_async().await;
}
