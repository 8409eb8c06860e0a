//! Spans, events, and counters around client operations.
//!
//! # Feature Flags
//!
//! - `tracing` (on by default): every operation runs inside an `aipe_client.operation` span
//!   carrying `operation` and, once finished, `outcome`. Failures are logged at `warn`; a
//!   missing object is logged at `debug` since callers routinely treat it as drift.
//! - `metrics`: `aipe_client_operation_total` is incremented once per attempt and once per
//!   outcome, labeled by `operation` + `outcome`.

// self
use crate::_prelude::*;

/// Emits a `tracing` event when the `tracing` feature is enabled; compiles to nothing otherwise.
macro_rules! event {
	($level:ident, $($arg:tt)+) => {{
		#[cfg(feature = "tracing")]
		{
			::tracing::$level!($($arg)+);
		}
	}};
}
pub(crate) use event;

/// Client operations observed by spans and counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Client-credentials token acquisition (cached or fresh).
	Authenticate,
	/// Object fetch.
	GetObject,
	/// Object creation.
	CreateObject,
	/// Partial object update.
	UpdateObject,
	/// Object deletion.
	DeleteObject,
	/// Paginated link read.
	GetLinks,
	/// Link add/remove patch.
	UpdateLinks,
}
impl OperationKind {
	/// Stable label used for the `operation` span field and metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Authenticate => "authenticate",
			Self::GetObject => "get_object",
			Self::CreateObject => "create_object",
			Self::UpdateObject => "update_object",
			Self::DeleteObject => "delete_object",
			Self::GetLinks => "get_links",
			Self::UpdateLinks => "update_links",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// What happened to one operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// The operation started.
	Attempt,
	/// The operation completed.
	Success,
	/// AIPE answered `404 Not Found`.
	NotFound,
	/// Any other error reached the caller.
	Failure,
}
impl OperationOutcome {
	/// Classifies a finished operation.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => Self::Success,
			Err(e) if e.is_not_found() => Self::NotFound,
			Err(_) => Self::Failure,
		}
	}

	/// Stable label used for the `outcome` span field and metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Attempt => "attempt",
			Self::Success => "success",
			Self::NotFound => "not_found",
			Self::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` as one observed operation of `kind`.
pub(crate) async fn observe<T, Fut>(kind: OperationKind, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	count(kind, OperationOutcome::Attempt);

	#[cfg(feature = "tracing")]
	let span = ::tracing::info_span!(
		"aipe_client.operation",
		operation = kind.as_str(),
		outcome = ::tracing::field::Empty
	);
	#[cfg(feature = "tracing")]
	let result = ::tracing::Instrument::instrument(fut, span.clone()).await;
	#[cfg(not(feature = "tracing"))]
	let result = fut.await;
	let outcome = OperationOutcome::of(&result);

	#[cfg(feature = "tracing")]
	span.record("outcome", outcome.as_str());

	count(kind, outcome);

	if let Err(_e) = &result {
		if outcome == OperationOutcome::NotFound {
			event!(debug, operation = kind.as_str(), "Object not found.");
		} else {
			event!(warn, operation = kind.as_str(), error = %_e, "Operation failed.");
		}
	}

	result
}

fn count(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	::metrics::counter!(
		"aipe_client_operation_total",
		"operation" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}
