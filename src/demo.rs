//! A minimal reference `ReadSource` fixture (§6D), feature-gated under `demo`.
//!
//! `DnaReadSource` draws a random string over `{A,C,G,T}` and splits it into overlapping reads
//! with redundancy, exactly the "random read generator" and "read splitter" external
//! collaborators §1 places out of scope for the core. It exists to exercise `Assembler` end to
//! end in the bundled CLI and in integration tests, not as a tuned production component.

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::assembler::ReadSource;
use crate::vertex_record::BytesPayload;
use crate::{VertexId, VertexRecord};

const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// A synthetic DNA source: a random `genome_length`-base string, sliced into `read_count`
/// overlapping reads of `read_length` bases each, with no error model.
pub struct DnaReadSource {
	pub genome_length: usize,
	pub read_length: usize,
	pub read_count: usize,
	pub seed: u64,
}

impl ReadSource<BytesPayload> for DnaReadSource {
	fn into_records(self, k: usize) -> Vec<VertexRecord<BytesPayload>> {
		let mut rng = StdRng::seed_from_u64(self.seed);
		let genome: Vec<u8> = (0..self.genome_length)
			.map(|_| *BASES.choose(&mut rng).expect("BASES is non-empty"))
			.collect();

		let mut ids: IndexMap<Vec<u8>, VertexId> = IndexMap::new();
		let mut records: Vec<VertexRecord<BytesPayload>> = Vec::new();

		let max_start = self.genome_length.saturating_sub(self.read_length);
		for _ in 0..self.read_count {
			let start = if max_start == 0 { 0 } else { rng.gen_range(0..=max_start) };
			let read = &genome[start..(start + self.read_length).min(self.genome_length)];
			if read.len() <= k {
				continue;
			}
			for window in read.windows(k + 1) {
				let prefix = &window[..k];
				let suffix = &window[1..];
				let from = intern(&mut ids, &mut records, prefix);
				let to = intern(&mut ids, &mut records, suffix);
				records[from as usize]
					.add_edge_to(to, true)
					.expect("demo k-mer graphs stay well under the per-direction edge cap");
				records[to as usize]
					.add_edge_from(from, true)
					.expect("demo k-mer graphs stay well under the per-direction edge cap");
			}
		}
		records
	}
}

fn intern(
	ids: &mut IndexMap<Vec<u8>, VertexId>,
	records: &mut Vec<VertexRecord<BytesPayload>>,
	kmer: &[u8],
) -> VertexId {
	if let Some(&id) = ids.get(kmer) {
		return id;
	}
	let id = ids.len() as VertexId;
	ids.insert(kmer.to_vec(), id);
	records.push(VertexRecord::new(id, BytesPayload(kmer.to_vec())));
	id
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn produces_one_record_per_distinct_kmer() {
		let source = DnaReadSource {
			genome_length: 40,
			read_length: 12,
			read_count: 20,
			seed: 5,
		};
		let records = source.into_records(3);
		assert!(!records.is_empty());
		let ids: std::collections::HashSet<_> = records.iter().map(|r| r.id).collect();
		assert_eq!(ids.len(), records.len());
	}

	#[test]
	fn short_reads_below_k_plus_one_contribute_nothing() {
		let source = DnaReadSource {
			genome_length: 10,
			read_length: 2,
			read_count: 5,
			seed: 1,
		};
		let records = source.into_records(4);
		assert!(records.is_empty());
	}
}
