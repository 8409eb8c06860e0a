//! Link reads (paginated) and link-set patches for a source object.

// crates.io
use reqwest::StatusCode;
// self
use crate::{
	_prelude::*,
	aipe::{self, AipeClient},
	obs::{self, OperationKind},
};

/// Identifies one side of a link definition on a source object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinkRef<'a> {
	/// Source object ID.
	pub source_id: &'a str,
	/// Link definition name (the relation type), e.g. `server-hosted-by-hoster`.
	pub link_name: &'a str,
	/// Directional role on the link, e.g. `hosts`.
	pub relation_name: &'a str,
}
impl<'a> LinkRef<'a> {
	/// Creates a reference to the `(source, link, relation)` triple.
	pub fn new(source_id: &'a str, link_name: &'a str, relation_name: &'a str) -> Self {
		Self { source_id, link_name, relation_name }
	}
}

#[derive(Deserialize)]
struct LinksPage {
	#[serde(default, rename = "totalElements")]
	total_elements: usize,
	#[serde(default)]
	objects: Vec<LinkedObject>,
}

#[derive(Deserialize)]
struct LinkedObject {
	system: LinkedSystem,
}

#[derive(Deserialize)]
struct LinkedSystem {
	id: String,
}

#[derive(Serialize)]
struct UpdateLinksRequest<'a> {
	links: [LinkDefinitionPatch<'a>; 1],
}

#[derive(Serialize)]
struct LinkDefinitionPatch<'a> {
	#[serde(rename = "linkDefinitionName")]
	link_name: &'a str,
	#[serde(rename = "relationName")]
	relation_name: &'a str,
	#[serde(skip_serializing_if = "<[String]>::is_empty")]
	add: &'a [String],
	#[serde(skip_serializing_if = "<[String]>::is_empty")]
	remove: &'a [String],
}

/// Lazy, finite, non-restartable sequence of link pages for one relation.
///
/// The first page fixes the expected total (`totalElements`); pages are fetched one at a time
/// until that many IDs have been yielded. A page without objects ends the sequence early so a
/// stale total cannot loop forever.
#[derive(Debug)]
pub struct LinkPages<'c> {
	client: &'c AipeClient,
	link: LinkRef<'c>,
	next_page: u32,
	fetched: usize,
	total: Option<usize>,
	done: bool,
}
impl<'c> LinkPages<'c> {
	/// Fetches the next page of target IDs, or `None` once the relation is exhausted.
	pub async fn fetch_next(&mut self) -> Result<Option<Vec<String>>> {
		if self.done || self.total.is_some_and(|total| self.fetched >= total) {
			self.done = true;

			return Ok(None);
		}

		let page = self.next_page;
		let mut url = self.client.objects_url(&[self.link.source_id, "links"])?;

		url.query_pairs_mut()
			.append_pair("linkDefinitionName", self.link.link_name)
			.append_pair("relationName", self.link.relation_name)
			.append_pair("page", &page.to_string());

		obs::event!(info, url = %url, page, "Reading object links.");

		let response = self.client.send(self.client.http().get(url.clone())).await?;
		let response =
			aipe::expect_status(OperationKind::GetLinks, &url, response, &[StatusCode::OK]).await?;
		let body: LinksPage = aipe::read_json(response).await?;
		let total = *self.total.get_or_insert(body.total_elements);
		let ids = body.objects.into_iter().map(|object| object.system.id).collect::<Vec<_>>();

		self.next_page += 1;
		self.fetched += ids.len();

		if ids.is_empty() && self.fetched < total {
			obs::event!(
				warn,
				page,
				fetched = self.fetched,
				total,
				"Link page was empty before the declared total was reached."
			);

			self.done = true;
		}

		Ok(Some(ids))
	}
}

impl AipeClient {
	/// Starts a paginated read of the IDs linked from `link.source_id`.
	pub fn link_pages<'c>(&'c self, link: LinkRef<'c>) -> LinkPages<'c> {
		LinkPages { client: self, link, next_page: 0, fetched: 0, total: None, done: false }
	}

	/// Returns every target ID linked from `source_id` through `link_name`/`relation_name`,
	/// sorted lexicographically. An empty relation yields an empty vector.
	pub async fn get_data_object_links(
		&self,
		source_id: &str,
		link_name: &str,
		relation_name: &str,
	) -> Result<Vec<String>> {
		obs::observe(OperationKind::GetLinks, async {
			let mut pages = self.link_pages(LinkRef::new(source_id, link_name, relation_name));
			let mut ids = Vec::new();

			while let Some(page) = pages.fetch_next().await? {
				ids.extend(page);
			}

			ids.sort_unstable();

			Ok(ids)
		})
		.await
	}

	/// Adds and removes targets on one link definition with a single PATCH.
	///
	/// Empty `add`/`remove` lists are omitted from the body rather than sent as `[]`.
	pub async fn update_data_object_links(
		&self,
		source_id: &str,
		link_name: &str,
		relation_name: &str,
		add: &[String],
		remove: &[String],
	) -> Result<()> {
		const KIND: OperationKind = OperationKind::UpdateLinks;

		obs::observe(KIND, async {
			let url = self.objects_url(&[source_id])?;
			let request = UpdateLinksRequest {
				links: [LinkDefinitionPatch { link_name, relation_name, add, remove }],
			};

			obs::event!(
				info,
				source_id,
				link_name,
				relation_name,
				add = ?add,
				remove = ?remove,
				"Updating data object links."
			);

			let response = self.send_json(self.http().patch(url.clone()), &request).await?;

			aipe::expect_status(KIND, &url, response, &[StatusCode::OK, StatusCode::NO_CONTENT])
				.await?;

			Ok(())
		})
		.await
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn patch_body_omits_empty_lists() {
		let add = vec!["b".to_owned()];
		let request = UpdateLinksRequest {
			links: [LinkDefinitionPatch {
				link_name: "server-hosted-by-hoster",
				relation_name: "hosts",
				add: &add,
				remove: &[],
			}],
		};

		assert_eq!(
			serde_json::to_value(&request).expect("Patch should serialize."),
			json!({
				"links": [{
					"linkDefinitionName": "server-hosted-by-hoster",
					"relationName": "hosts",
					"add": ["b"],
				}]
			})
		);
	}

	#[test]
	fn page_decodes_nested_system_ids() {
		let page: LinksPage = serde_json::from_value(json!({
			"totalElements": 2,
			"objects": [
				{ "system": { "id": "b", "typeName": "hoster" }, "name": "B" },
				{ "system": { "id": "a" } },
			],
		}))
		.expect("Page should decode.");

		assert_eq!(page.total_elements, 2);
		assert_eq!(page.objects.iter().map(|o| o.system.id.as_str()).collect::<Vec<_>>(), ["b", "a"]);
	}
}
