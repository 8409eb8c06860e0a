//! Demonstrates opening a session from provider settings and walking one data object through
//! create, read, update, and delete against a mocked realm and AIPE backend.

// std
use std::time::Duration as StdDuration;
// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use time::{Duration, OffsetDateTime};
// self
use aipe_client::{
	aipe::Properties,
	config::ProviderConfig,
	http::ReqwestHttpClient,
	reqwest::Client,
	session::Session,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let exp = (OffsetDateTime::now_utc() + Duration::minutes(10)).unix_timestamp();
	let jwt = format!(
		"{}.{}.demo",
		URL_SAFE_NO_PAD.encode(r#"{"alg":"none"}"#),
		URL_SAFE_NO_PAD.encode(json!({ "exp": exp }).to_string()),
	);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/realms/demo/protocol/openid-connect/token");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "access_token": jwt, "token_type": "Bearer" }));
		})
		.await;
	let create_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/data/api/v1/objects");
			then.status(201).json_body(json!({ "dataObjectId": "demo-server" }));
		})
		.await;
	let read_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/data/api/v1/objects/demo-server");
			then.status(200).json_body(json!({
				"dataObject": {
					"system": { "id": "demo-server" },
					"hostname": "edge-01",
					"monitored": true,
				}
			}));
		})
		.await;
	let update_mock = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/data/api/v1/objects/demo-server");
			then.status(200);
		})
		.await;
	let delete_mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/data/api/v1/objects/demo-server");
			then.status(204);
		})
		.await;
	let config = ProviderConfig {
		application_username: Some("demo-user".into()),
		application_password: Some("demo-pass".into()),
		authenticator_realm_url: Some(server.url("/realms/demo")),
		aipe_url: Some(server.base_url()),
		request_timeout_secs: Some(10),
	}
	.resolve()?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder().timeout(StdDuration::from_secs(10)).build()?,
	);
	let session = Session::connect_with_http_client(config, http_client).await?;
	let client = session.client().await?;
	let mut properties = Properties::from([
		("hostname".to_owned(), "edge-01".to_owned()),
		("monitored".to_owned(), "true".to_owned()),
	]);
	let id = client.create_object("server", &properties).await?;

	println!("Created object {id}.");
	println!("Read back: {:?}.", client.get_object(&id).await?);

	properties.insert("monitored".into(), "false".into());
	client.update_object(&id, &properties).await?;

	println!("Deleted: {}.", client.delete_object_if_exists(&id).await?);

	token_mock.assert_async().await;
	create_mock.assert_async().await;
	read_mock.assert_async().await;
	update_mock.assert_async().await;
	delete_mock.assert_async().await;

	Ok(())
}
