//! Resource-lifecycle conveniences layered over the raw object and link calls.

// self
use crate::{
	_prelude::*,
	aipe::{AipeClient, LinkDelta, Properties, diff},
	obs,
};

impl AipeClient {
	/// Reads an object, mapping "not found" to `None` so callers can drop it from their state.
	pub async fn read_object(&self, id: &str) -> Result<Option<Properties>> {
		match self.get_object(id).await {
			Ok(properties) => Ok(Some(properties)),
			Err(e) if e.is_not_found() => {
				obs::event!(info, object_id = id, "Object no longer exists.");

				Ok(None)
			},
			Err(e) => Err(e),
		}
	}

	/// Deletes an object, treating an already-missing object as success.
	///
	/// Returns `true` when this call removed the object.
	pub async fn delete_object_if_exists(&self, id: &str) -> Result<bool> {
		match self.delete_object(id).await {
			Ok(()) => Ok(true),
			Err(e) if e.is_not_found() => Ok(false),
			Err(e) => Err(e),
		}
	}

	/// Moves a relation from `previous` to `desired` with at most one patch.
	///
	/// No request is issued when the two sets are equal. The returned delta is what was sent.
	pub async fn reconcile_links<P, D>(
		&self,
		source_id: &str,
		link_name: &str,
		relation_name: &str,
		previous: P,
		desired: D,
	) -> Result<LinkDelta>
	where
		P: IntoIterator,
		P::Item: AsRef<str>,
		D: IntoIterator,
		D::Item: AsRef<str>,
	{
		let delta = diff::diff(previous, desired);

		if delta.is_empty() {
			obs::event!(debug, source_id, link_name, relation_name, "Links already in sync.");

			return Ok(delta);
		}

		self.update_data_object_links(
			source_id,
			link_name,
			relation_name,
			&delta.add,
			&delta.remove,
		)
		.await?;

		Ok(delta)
	}
}
