//! Set difference between a relation's previous and desired target IDs.

// self
use crate::_prelude::*;

/// Targets to add to and remove from a relation to move it from one state to another.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkDelta {
	/// IDs present in the desired set but not in the previous one, sorted.
	pub add: Vec<String>,
	/// IDs present in the previous set but not in the desired one, sorted.
	pub remove: Vec<String>,
}
impl LinkDelta {
	/// Returns `true` when the two sets were equal and no patch is needed.
	pub fn is_empty(&self) -> bool {
		self.add.is_empty() && self.remove.is_empty()
	}

	/// Applies the delta to `previous`, returning the resulting sorted, deduplicated set.
	pub fn apply<I, S>(&self, previous: I) -> Vec<String>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut set = previous.into_iter().map(Into::into).collect::<BTreeSet<String>>();

		for id in &self.remove {
			set.remove(id);
		}

		set.extend(self.add.iter().cloned());

		set.into_iter().collect()
	}
}

/// Computes the minimal [`LinkDelta`] turning `previous` into `desired`.
///
/// Inputs may be unordered and contain duplicates; both outputs are deduplicated and sorted.
pub fn diff<P, D>(previous: P, desired: D) -> LinkDelta
where
	P: IntoIterator,
	P::Item: AsRef<str>,
	D: IntoIterator,
	D::Item: AsRef<str>,
{
	let previous = collect_set(previous);
	let desired = collect_set(desired);

	LinkDelta {
		add: desired.difference(&previous).map(|id| (*id).to_owned()).collect(),
		remove: previous.difference(&desired).map(|id| (*id).to_owned()).collect(),
	}
}

fn collect_set<I>(ids: I) -> BTreeSet<String>
where
	I: IntoIterator,
	I::Item: AsRef<str>,
{
	ids.into_iter().map(|id| id.as_ref().to_owned()).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn ids(values: &[&str]) -> Vec<String> {
		values.iter().map(|v| (*v).to_owned()).collect()
	}

	#[test]
	fn diff_reports_added_and_removed_only() {
		assert_eq!(
			diff(["a", "b"], ["b", "c"]),
			LinkDelta { add: ids(&["c"]), remove: ids(&["a"]) }
		);
		assert_eq!(diff(["a"], ["a"]), LinkDelta::default());
		assert_eq!(
			diff(Vec::<String>::new(), ["x", "y"]),
			LinkDelta { add: ids(&["x", "y"]), remove: Vec::new() }
		);
		assert_eq!(
			diff(["a", "b"], Vec::<&str>::new()),
			LinkDelta { add: Vec::new(), remove: ids(&["a", "b"]) }
		);
	}

	#[test]
	fn diff_dedupes_and_sorts() {
		let delta = diff(["q", "a", "a"], ["z", "m", "z", "q"]);

		assert_eq!(delta.add, ids(&["m", "z"]));
		assert_eq!(delta.remove, ids(&["a"]));
	}

	#[test]
	fn apply_reaches_desired_set() {
		let previous = ids(&["d", "a", "b"]);
		let desired = ids(&["b", "c", "e"]);
		let delta = diff(&previous, &desired);

		assert!(!delta.is_empty());
		assert_eq!(delta.apply(previous.clone()), desired);
		assert!(diff(&desired, delta.apply(previous)).is_empty());
	}

	#[test]
	fn unchanged_ids_never_appear_in_delta() {
		let delta = diff(["a", "b", "c"], ["c", "b", "d"]);

		assert!(!delta.add.iter().any(|id| id == "b" || id == "c"));
		assert!(!delta.remove.iter().any(|id| id == "b" || id == "c"));
	}
}
