// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use aipe_client::{
	_preludet::*,
	config::{ENV_AIPE_URL, ProviderConfig},
	session::Session,
};

const TOKEN_PATH: &str = "/realms/aipe/protocol/openid-connect/token";

fn provider_config(server: &MockServer) -> ProviderConfig {
	ProviderConfig {
		application_username: Some(TEST_USERNAME.into()),
		application_password: Some(TEST_PASSWORD.into()),
		authenticator_realm_url: Some(server.url("/realms/aipe/")),
		aipe_url: None,
		request_timeout_secs: Some(10),
	}
}

#[tokio::test]
async fn session_authenticates_once_and_reuses_token() {
	let server = MockServer::start_async().await;
	let jwt = test_jwt_expiring_in(Duration::hours(1));
	let aipe_url = server.url("/aipe");
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH).header("authorization", TEST_BASIC_AUTHORIZATION);
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "access_token": jwt, "token_type": "Bearer" }));
		})
		.await;
	let object = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/aipe/data/api/v1/objects/obj-9")
				.header("authorization", format!("Bearer {jwt}"));
			then.status(200).json_body(json!({ "dataObject": { "name": "edge" } }));
		})
		.await;
	let resolved = provider_config(&server)
		.resolve_with(|name| (name == ENV_AIPE_URL).then(|| aipe_url.clone()))
		.expect("Config should resolve with the AIPE URL from the environment.");
	let session = Session::connect_with_http_client(resolved, test_reqwest_http_client())
		.await
		.expect("Session should connect.");

	assert_eq!(session.aipe_url().as_str(), aipe_url);

	let client = session.client().await.expect("Client should be issued.");
	let properties = client.get_object("obj-9").await.expect("Read should succeed.");

	assert_eq!(properties.get("name").map(String::as_str), Some("edge"));

	token.assert_calls_async(1).await;
	object.assert_async().await;
}

#[tokio::test]
async fn session_fails_fast_on_rejected_credentials() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(401)
				.header("content-type", "application/json")
				.json_body(json!({ "error": "unauthorized_client" }));
		})
		.await;
	let resolved = ProviderConfig { aipe_url: Some(server.url("/aipe")), ..provider_config(&server) }
		.resolve_with(|_| None)
		.expect("Explicit config should resolve.");
	let err = Session::connect(resolved).await.expect_err("Rejected credentials must fail.");

	assert!(matches!(err, Error::Authentication { status: Some(401), .. }));

	mock.assert_async().await;
}
