//! Object CRUD against `{base}/data/api/v1/objects`.

// crates.io
use reqwest::StatusCode;
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	aipe::{self, AipeClient, Properties, WireProperties, property},
	obs::{self, OperationKind},
};

#[derive(Deserialize)]
struct ObjectResponse {
	#[serde(default, rename = "dataObject")]
	data_object: Option<Map<String, Value>>,
}

#[derive(Serialize)]
struct ObjectCreateRequest<'a> {
	#[serde(rename = "typeName")]
	type_name: &'a str,
	#[serde(rename = "dataObject")]
	data_object: WireProperties,
}

#[derive(Deserialize)]
struct ObjectCreateResponse {
	#[serde(rename = "dataObjectId")]
	id: String,
}

#[derive(Serialize)]
struct ObjectUpdateRequest {
	#[serde(rename = "dataObject")]
	data_object: WireProperties,
}

impl AipeClient {
	/// Fetches an object's properties, without the reserved `system` entry.
	///
	/// A missing object surfaces as an API error for which
	/// [`Error::is_not_found`](crate::error::Error::is_not_found) is `true`.
	pub async fn get_object(&self, id: &str) -> Result<Properties> {
		const KIND: OperationKind = OperationKind::GetObject;

		obs::observe(KIND, async {
			let url = self.objects_url(&[id])?;

			obs::event!(info, object_id = id, url = %url, "Reading object.");

			let response = self.send(self.http().get(url.clone())).await?;
			let response = aipe::expect_status(KIND, &url, response, &[StatusCode::OK]).await?;
			let body: ObjectResponse = aipe::read_json(response).await?;
			let properties = property::from_wire(body.data_object.unwrap_or_default())?;

			obs::event!(debug, object_id = id, properties = properties.len(), "Read object.");

			Ok(properties)
		})
		.await
	}

	/// Creates an object of `type_name` and returns its server-assigned ID.
	pub async fn create_object(&self, type_name: &str, properties: &Properties) -> Result<String> {
		const KIND: OperationKind = OperationKind::CreateObject;

		obs::observe(KIND, async {
			let url = self.objects_url(&[])?;
			let data_object = property::to_wire(properties);
			let request = ObjectCreateRequest { type_name, data_object };

			obs::event!(info, object_type = type_name, "Creating object.");

			let response = self.send_json(self.http().post(url.clone()), &request).await?;
			let response = aipe::expect_status(KIND, &url, response, &[StatusCode::CREATED]).await?;
			let created: ObjectCreateResponse = aipe::read_json(response).await?;

			obs::event!(info, object_type = type_name, object_id = %created.id, "Created object.");

			Ok(created.id)
		})
		.await
	}

	/// Partially updates an object; properties absent from `properties` are left untouched.
	pub async fn update_object(&self, id: &str, properties: &Properties) -> Result<()> {
		const KIND: OperationKind = OperationKind::UpdateObject;

		obs::observe(KIND, async {
			let url = self.objects_url(&[id])?;
			let request = ObjectUpdateRequest { data_object: property::to_wire(properties) };

			obs::event!(info, object_id = id, "Updating object.");

			let response = self.send_json(self.http().patch(url.clone()), &request).await?;

			aipe::expect_status(KIND, &url, response, &[StatusCode::OK]).await?;

			Ok(())
		})
		.await
	}

	/// Deletes an object.
	pub async fn delete_object(&self, id: &str) -> Result<()> {
		const KIND: OperationKind = OperationKind::DeleteObject;

		obs::observe(KIND, async {
			let url = self.objects_url(&[id])?;

			obs::event!(info, object_id = id, "Deleting object.");

			let response = self.send(self.http().delete(url.clone())).await?;

			aipe::expect_status(KIND, &url, response, &[StatusCode::NO_CONTENT]).await?;

			Ok(())
		})
		.await
	}
}
