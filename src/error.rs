//! Typed error taxonomy for the assembly engine (§7, §6B of the spec).
//!
//! The teacher repo returns `Result<_, String>` from its top-level solve functions; here the
//! spec names five distinct error Kinds that callers need to match on (a rejected vertex during
//! pruning is *not* one of these - it's a result, not an error), so a `thiserror` enum is used
//! instead of ad hoc strings.

use crate::VertexId;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AssemblyError {
	/// A vertex index fell outside `[0, N)` where the operation requires it to be valid
	/// (iterator creation, degree queries). Range violations on `add`/`remove` are tolerated
	/// silently and never produce this variant - see the engine tolerance policy in §7.
	#[error("vertex {index} is outside the valid range [0, {capacity})")]
	RangeViolation { index: VertexId, capacity: usize },

	/// A byte record was malformed or truncated beyond what can be recovered. PLVR reads
	/// recover a partial record instead of raising; this variant is reserved for the
	/// fixed-size edge-record framing (tag 2), which has no partial form.
	#[error("malformed record framing: {reason}")]
	FramingError { reason: String },

	/// A branch record was fed to the chain compressor, or an empty value set was fed to the
	/// coverage pruner.
	#[error("invalid input: {reason}")]
	InvalidInput { reason: String },

	/// Inserting an edge would push a vertex's per-direction edge count past
	/// [`crate::MAX_EDGES_PER_DIRECTION`].
	#[error("vertex {vertex} would exceed the {limit}-edge-per-direction capacity")]
	CapacityExceeded { vertex: VertexId, limit: usize },

	/// Coverage was non-positive when pruning was requested, or a merge was attempted between
	/// records with different ids.
	#[error("precondition violated: {reason}")]
	PreconditionViolation { reason: String },
}
