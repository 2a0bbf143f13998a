//! Coverage-based error pruning (§4.5): drops low-multiplicity parallel-edge groups that most
//! likely represent sequencing errors rather than real overlaps.
//!
//! Grounded on the teacher's threshold-filtering pass over `Graph` edge groups (`graph.rs`'s
//! degree-bucket filtering in `Graph::prune_low_degree`) - same shape of "walk every group,
//! keep/drop by a computed cutoff", generalized from a degree cutoff to a multiplicity cutoff.

use crate::error::AssemblyError;
use crate::vertex_record::{Payload, VertexRecord};

/// Computes the minimum surviving multiplicity `mc = ceil(coverage / 2)` for a given expected
/// coverage (§4.5). Coverage must be positive; callers check `Config::pruning_enabled` first.
pub fn min_surviving_multiplicity(coverage: i64) -> Result<i64, AssemblyError> {
	if coverage <= 0 {
		return Err(AssemblyError::PreconditionViolation {
			reason: format!("coverage must be positive to compute a pruning cutoff, got {}", coverage),
		});
	}
	Ok((coverage + 1) / 2)
}

/// Prunes one record in place against cutoff `mc` (§4.5): every parallel-edge group (on either
/// side) whose multiplicity is strictly less than `mc` is dropped. If pruning empties one side
/// entirely while the other was already empty, the record becomes an isolated vertex rather than
/// being removed outright - removal from the owning partition is the caller's decision, made
/// from `prune_records` once both sides are known to be empty.
fn prune_record<P: Payload>(rec: &mut VertexRecord<P>, mc: i64) {
	let surviving_to: Vec<_> = rec
		.edges_to_list()
		.iterate_groups()
		.filter(|g| g.len() as i64 >= mc)
		.flatten()
		.collect();
	let surviving_from: Vec<_> = rec
		.edges_from_list()
		.iterate_groups()
		.filter(|g| g.len() as i64 >= mc)
		.flatten()
		.collect();

	for to in rec.edges_to() {
		rec.remove_edges_to(to);
	}
	for to in surviving_to {
		// Multiples already consistent with the caller's graph-wide policy; re-insert allowing
		// them so a surviving group's internal multiplicity is preserved.
		let _ = rec.add_edge_to(to, true);
	}

	for from in rec.edges_from() {
		rec.remove_edges_from(from);
	}
	for from in surviving_from {
		let _ = rec.add_edge_from(from, true);
	}
}

/// Prunes an entire partition's records against `coverage` (§4.5). A record whose edges are
/// pruned to empty on both sides is dropped outright - §4.5's "no surviving groups on either
/// side" rejection rule - unless it was already a source or sink with no edges on the pruned
/// side to begin with, in which case it is kept as an isolated vertex.
pub fn prune_records<P: Payload>(
	records: Vec<VertexRecord<P>>,
	coverage: i64,
) -> Result<Vec<VertexRecord<P>>, AssemblyError> {
	let mc = min_surviving_multiplicity(coverage)?;
	let mut kept = Vec::with_capacity(records.len());
	let mut dropped = 0usize;
	for mut rec in records {
		let had_to = !rec.edges_to().is_empty();
		let had_from = !rec.edges_from().is_empty();
		prune_record(&mut rec, mc);
		rec.recompute_flags();
		let now_to = !rec.edges_to().is_empty();
		let now_from = !rec.edges_from().is_empty();
		if (had_to || had_from) && !now_to && !now_from {
			dropped += 1;
			continue;
		}
		kept.push(rec);
	}
	log::info!(
		"coverage pruning at mc={} dropped {} of {} records",
		mc,
		dropped,
		kept.len() + dropped
	);
	Ok(kept)
}
