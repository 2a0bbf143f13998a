//! The assembler façade (§4.7): build -> prune -> compress-to-fixpoint -> tour.
//!
//! Grounded on the teacher's top-level `plow::road::solve`/`plow::fly::solve` orchestration
//! functions in `plow.rs`, which own a single entry point stringing together graph construction,
//! an annealing pass, and a final readout, logging one line per phase at `info!`/`debug!` exactly
//! as this façade does.

use indexmap::IndexMap;

use crate::compressor::CompressionRun;
use crate::config::Config;
use crate::error::AssemblyError;
use crate::euler::{extract_tours, EulerTours};
use crate::graph::Graph;
use crate::pruner::prune_records;
use crate::vertex_record::{Payload, VertexRecord};
use crate::VertexId;

/// The façade's trait seam for the out-of-scope read generator/splitter/parser collaborators
/// (§1, §4.7): a caller supplies a type implementing this, and the façade never depends on how
/// reads were produced or split into k-mers.
pub trait ReadSource<P: Payload> {
	/// Consumes the source, producing the partition-local vertex records derived from its reads
	/// at k-mer size `k`. Multiple records sharing an id are merged by the façade's build phase.
	fn into_records(self, k: usize) -> Vec<VertexRecord<P>>;
}

/// Drives the full pipeline over one partition's worth of records.
pub struct Assembler {
	config: Config,
	seed: u64,
}

impl Assembler {
	pub fn new(config: Config, seed: u64) -> Self {
		Self { config, seed }
	}

	/// Runs build -> prune -> compress -> tour over reads drawn from `source`, returning the
	/// extracted Euler tours. `k` is forwarded to the `ReadSource` unchanged.
	pub fn assemble<P, S>(&self, source: S, k: usize) -> Result<EulerTours, AssemblyError>
	where
		P: Payload,
		S: ReadSource<P>,
	{
		let raw = source.into_records(k);
		log::debug!("build: {} raw records from the read source", raw.len());
		let built = self.build(raw)?;
		log::info!("build: merged into {} distinct records", built.len());

		let pruned = if self.config.pruning_enabled() {
			let before = built.len();
			let out = prune_records(built, self.config.coverage)?;
			log::info!("pruned {} of {} records", before - out.len(), before);
			out
		} else {
			built
		};

		let mut run = CompressionRun::new(
			self.seed,
			self.config.termination_count,
			self.config.compress_multiples_must_match,
			self.config.allow_edge_multiples,
		);
		let compressed = run.run_to_fixpoint(pruned)?;
		log::info!("compression reached fixpoint after {} rounds", run.rounds_run());

		let graph = self.materialize(&compressed)?;
		let tours = extract_tours(&graph);
		log::debug!("tour: extracted {} path(s)", tours.paths.len());
		Ok(tours)
	}

	/// Merges records sharing an id (§4.7 "build"). Grouping uses `IndexMap` for the same
	/// deterministic-order reason the compressor groups pairing keys with it.
	fn build<P: Payload>(&self, raw: Vec<VertexRecord<P>>) -> Result<Vec<VertexRecord<P>>, AssemblyError> {
		let mut by_id: IndexMap<VertexId, VertexRecord<P>> = IndexMap::new();
		for rec in raw {
			match by_id.get_mut(&rec.id) {
				Some(existing) => existing.merge(&rec, self.config.allow_edge_multiples)?,
				None => {
					by_id.insert(rec.id, rec);
				}
			}
		}
		Ok(by_id.into_iter().map(|(_, v)| v).collect())
	}

	/// Materializes a dense `Graph` from the surviving records, sized to the largest id seen plus
	/// one. Ids are expected to already be dense per §3; a sparse id space simply wastes capacity
	/// rather than failing.
	fn materialize<P: Payload>(&self, records: &[VertexRecord<P>]) -> Result<Graph<()>, AssemblyError> {
		let capacity = records.iter().map(|r| r.id).max().map(|m| m as usize + 1).unwrap_or(0);
		let mut graph = Graph::new(capacity, self.config.allow_edge_multiples);
		for rec in records {
			for to in rec.edges_to() {
				graph.add_edge(rec.id, to, ())?;
			}
		}
		Ok(graph)
	}
}
