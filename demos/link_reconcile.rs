//! Demonstrates reading a paginated relation and reconciling it to a desired target set with a
//! single link patch.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use aipe_client::{aipe::AipeClient, auth::BearerToken};

const LINK: &str = "server-hosted-by-hoster";
const RELATION: &str = "hosts";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let page_0 = server
		.mock_async(|when, then| {
			when.method(GET).path("/data/api/v1/objects/hoster-1/links").query_param("page", "0");
			then.status(200).json_body(json!({
				"totalElements": 3,
				"objects": [{ "system": { "id": "srv-b" } }, { "system": { "id": "srv-a" } }],
			}));
		})
		.await;
	let page_1 = server
		.mock_async(|when, then| {
			when.method(GET).path("/data/api/v1/objects/hoster-1/links").query_param("page", "1");
			then.status(200).json_body(json!({
				"totalElements": 3,
				"objects": [{ "system": { "id": "srv-c" } }],
			}));
		})
		.await;
	let patch = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/data/api/v1/objects/hoster-1");
			then.status(204);
		})
		.await;
	// Token obtained out of band; a realm-backed session would supply it instead.
	let client = AipeClient::new(Url::parse(&server.base_url())?, BearerToken::new("demo-token"))?;
	let current = client.get_data_object_links("hoster-1", LINK, RELATION).await?;

	println!("Currently linked: {current:?}.");

	let delta = client
		.reconcile_links("hoster-1", LINK, RELATION, &current, ["srv-a", "srv-c", "srv-d"])
		.await?;

	println!("Added {:?}, removed {:?}.", delta.add, delta.remove);

	page_0.assert_async().await;
	page_1.assert_async().await;
	patch.assert_async().await;

	Ok(())
}
