//! Chain compression (§4.4): randomized pairwise merging of linear (non-branch) chains, driven
//! to a fixpoint.
//!
//! Grounded on the teacher's annealing solver (`plow::PlowSolver::solve` in `plow.rs`): a run
//! owns its own `rand` generator and its own iteration/termination counters (never a process
//! global, per SPEC_FULL.md §9's note on the source's module-level statics), logs one line per
//! round at `debug!`, and stops once a termination condition holds. The per-key grouping uses
//! `indexmap::IndexMap` the same way the teacher's `Graph` uses it for per-vertex edge storage,
//! so iteration order is deterministic given a seed.

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::AssemblyError;
use crate::vertex_record::{Payload, VertexRecord};
use crate::VertexId;

/// Request-scoped state for one compression run: the RNG driving pairing-key selection and the
/// iteration/silent-round counters (§4.4, §9). Never shared across runs or threads - a harness
/// sharding work across workers seeds one `CompressionRun` per worker.
pub struct CompressionRun {
	rng: StdRng,
	termination_count: u32,
	silent_rounds: u32,
	rounds_run: u32,
	multiples_must_match: bool,
	allow_multiples: bool,
}

impl CompressionRun {
	pub fn new(seed: u64, termination_count: u32, multiples_must_match: bool, allow_multiples: bool) -> Self {
		Self {
			rng: StdRng::seed_from_u64(seed),
			termination_count: termination_count.max(1),
			silent_rounds: 0,
			rounds_run: 0,
			multiples_must_match,
			allow_multiples,
		}
	}

	pub fn rounds_run(&self) -> u32 {
		self.rounds_run
	}

	/// The pairing key for one non-branch record (§4.4): a fair coin chooses between the
	/// record's own id (head) and its unique successor's id (tail); a sink always keys on its
	/// own id.
	fn pairing_key<P: Payload>(&mut self, rec: &VertexRecord<P>) -> VertexId {
		match rec.edges_to_list().unique_key() {
			Some(successor) if !rec.edges_to().is_empty() => {
				if self.rng.gen_bool(0.5) {
					rec.id
				} else {
					successor
				}
			}
			_ => rec.id,
		}
	}

	/// Runs one compression round over `records`, returning the next round's working set and
	/// whether any merge occurred.
	fn run_round<P: Payload>(
		&mut self,
		records: Vec<VertexRecord<P>>,
	) -> Result<(Vec<VertexRecord<P>>, bool), AssemblyError> {
		for r in &records {
			if r.is_branch {
				return Err(AssemblyError::InvalidInput {
					reason: format!("branch record {} fed to the chain compressor", r.id),
				});
			}
		}

		let mut groups: IndexMap<VertexId, Vec<VertexRecord<P>>> = IndexMap::new();
		for r in records {
			let key = self.pairing_key(&r);
			groups.entry(key).or_default().push(r);
		}

		let mut next_round = Vec::new();
		let mut merged_any = false;
		for (key, mut group) in groups {
			if group.len() == 2 {
				let head_pos = group.iter().position(|r| r.id == key);
				match head_pos {
					Some(hi) => {
						let head = group.swap_remove(hi);
						let tail = group.pop().unwrap();
						// `tail` must have `head` as its unique successor for the pairing to be
						// the harness-guaranteed "predecessor meets its successor" shape.
						if tail.edges_to_list().unique_key() == Some(head.id) {
							match compress_chain(&tail, &head, self.multiples_must_match, self.allow_multiples)? {
								Some(merged) => {
									merged_any = true;
									next_round.push(merged);
								}
								None => {
									next_round.push(tail);
									next_round.push(head);
								}
							}
						} else {
							next_round.push(tail);
							next_round.push(head);
						}
					}
					None => {
						next_round.extend(group);
					}
				}
			} else {
				next_round.extend(group);
			}
		}
		Ok((next_round, merged_any))
	}

	/// Drives `run_round` to a fixpoint: stops after `termination_count` consecutive silent
	/// rounds (§4.4). Each record's monotone non-increase in count guarantees termination within
	/// at most the initial record count of rounds.
	pub fn run_to_fixpoint<P: Payload>(
		&mut self,
		mut records: Vec<VertexRecord<P>>,
	) -> Result<Vec<VertexRecord<P>>, AssemblyError> {
		self.silent_rounds = 0;
		loop {
			let before = records.len();
			let (next, merged_any) = self.run_round(records)?;
			records = next;
			self.rounds_run += 1;
			log::debug!(
				"compression round {}: {} -> {} records (merged: {})",
				self.rounds_run,
				before,
				records.len(),
				merged_any
			);
			if merged_any {
				self.silent_rounds = 0;
			} else {
				self.silent_rounds += 1;
			}
			if self.silent_rounds >= self.termination_count {
				break;
			}
		}
		Ok(records)
	}
}

/// Attempts to collapse `u -> w` into a single record (§4.4). `u` is the surviving record; `w`
/// is discarded on success. Returns `Ok(None)` (not an error) when the multiplicities-must-match
/// policy blocks the merge this round; returns `Err(InvalidInput)` if either record is a branch.
pub fn compress_chain<P: Payload>(
	u: &VertexRecord<P>,
	w: &VertexRecord<P>,
	multiples_must_match: bool,
	allow_multiples: bool,
) -> Result<Option<VertexRecord<P>>, AssemblyError> {
	if u.is_branch || w.is_branch {
		return Err(AssemblyError::InvalidInput {
			reason: "branch record fed to compress_chain".to_string(),
		});
	}
	let u_to = u.edges_to();
	if u_to.is_empty() || u_to.iter().any(|&t| t != w.id) {
		return Err(AssemblyError::InvalidInput {
			reason: format!("record {}'s unique successor is not {}", u.id, w.id),
		});
	}
	let mult_u_w = u_to.len();

	// A sink has no successor, so it cannot be `u`'s pairing partner for a collapse: §4.4
	// requires "w has a unique successor", and a chain's sink record must survive as its own
	// record rather than being absorbed and losing the chain's terminal vertex.
	let w_to = w.edges_to();
	if w_to.is_empty() {
		return Ok(None);
	}
	let next = w_to[0];
	let mult_w_next = w_to.len();
	let new_to: Vec<VertexId> = if multiples_must_match {
		if mult_u_w != mult_w_next {
			return Ok(None);
		}
		vec![next; mult_w_next]
	} else {
		vec![next; mult_u_w.min(mult_w_next)]
	};

	let mut merged = VertexRecord::new(u.id, u.payload.fuse(&w.payload));
	for from in u.edges_from() {
		merged.add_edge_from(from, allow_multiples)?;
	}
	for to in new_to {
		merged.add_edge_to(to, allow_multiples)?;
	}
	merged.recompute_flags();
	Ok(Some(merged))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::vertex_record::BytesPayload;

	fn chain_record(id: VertexId, to: Option<VertexId>) -> VertexRecord<BytesPayload> {
		let mut r = VertexRecord::new(id, BytesPayload(vec![id as u8]));
		if let Some(t) = to {
			r.add_edge_to(t, false).unwrap();
		}
		r
	}

	#[test]
	fn compress_chain_collapses_and_fuses_payload_in_order() {
		let u = chain_record(1, Some(2));
		let w = chain_record(2, Some(3));
		let merged = compress_chain(&u, &w, true, false).unwrap().unwrap();
		assert_eq!(merged.id, 1);
		assert_eq!(merged.edges_to(), vec![3]);
		assert_eq!(merged.payload, BytesPayload(vec![1, 2]));
	}

	#[test]
	fn compress_chain_rejects_branch_records() {
		let mut u = chain_record(1, Some(2));
		u.add_edge_to(9, true).unwrap(); // now branches to {2,9}
		let w = chain_record(2, Some(3));
		assert!(matches!(
			compress_chain(&u, &w, true, false),
			Err(AssemblyError::InvalidInput { .. })
		));
	}

	#[test]
	fn compress_chain_respects_multiples_must_match() {
		let mut u = VertexRecord::new(1, BytesPayload::default());
		u.add_edge_to(2, true).unwrap();
		u.add_edge_to(2, true).unwrap(); // mult 2
		let mut w = VertexRecord::new(2, BytesPayload::default());
		w.add_edge_to(3, true).unwrap(); // mult 1
		assert_eq!(compress_chain(&u, &w, true, true).unwrap(), None);
		let merged = compress_chain(&u, &w, false, true).unwrap().unwrap();
		assert_eq!(merged.edges_to(), vec![3]); // min(2,1) = 1
	}

	#[test]
	fn run_to_fixpoint_collapses_three_record_chain() {
		let a = chain_record(1, Some(2));
		let b = chain_record(2, Some(3));
		let c = chain_record(3, Some(4));
		let mut run = CompressionRun::new(42, 1, true, false);
		let result = run.run_to_fixpoint(vec![a, b, c]).unwrap();
		assert_eq!(result.len(), 1);
		assert_eq!(result[0].id, 1);
		assert_eq!(result[0].edges_to(), vec![4]);
	}

	#[test]
	fn run_to_fixpoint_is_monotone_non_increasing() {
		// Records 0..18 form a chain into the sink record 19; the sink has no successor, so it
		// can never be absorbed (§4.4) and survives the fixpoint as its own record alongside the
		// single record the rest of the chain collapses into.
		let records: Vec<_> = (0..20)
			.map(|i| chain_record(i, if i < 19 { Some(i + 1) } else { None }))
			.collect();
		let mut run = CompressionRun::new(7, 2, true, false);
		let before = records.len();
		let result = run.run_to_fixpoint(records).unwrap();
		assert!(result.len() <= before);
		assert_eq!(result.len(), 2);
		let sink = result.iter().find(|r| r.id == 19).unwrap();
		assert!(sink.edges_to().is_empty());
		let head = result.iter().find(|r| r.id != 19).unwrap();
		assert_eq!(head.edges_to(), vec![19]);
	}

	#[test]
	fn branch_record_is_rejected_by_a_round() {
		let mut run = CompressionRun::new(1, 1, true, false);
		let mut branchy = chain_record(1, Some(2));
		branchy.add_edge_to(9, true).unwrap();
		assert!(matches!(
			run.run_to_fixpoint(vec![branchy]),
			Err(AssemblyError::InvalidInput { .. })
		));
	}
}
