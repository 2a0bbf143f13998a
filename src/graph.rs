//! The fixed-capacity graph container (§3, §4.3).
//!
//! Grounded on the teacher's `Graph<NId, N, E>` (`graph.rs`): a generic directed-graph type with
//! `add_edge`/`get_edges`/degree-shaped queries. Adapted from a `HashMap`-keyed graph to a
//! fixed-capacity dense index, because §3 mandates `VertexId` be a stable dense index in
//! `0..N`, not an arbitrary hashable key.

use std::cell::RefCell;

use crate::adjacency::{AdjacencyList, Keyed};
use crate::error::AssemblyError;
use crate::VertexId;

/// An in-graph edge, parameterized over a weight type. Plain edges use `weight: ()`; weighted
/// edges carry a `noisy_float::N64` so the weight is guaranteed finite and totally ordered, the
/// same trick the teacher applies to road-segment distances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphEdge<W> {
	pub to: VertexId,
	pub weight: W,
}

impl<W: Copy> Keyed for GraphEdge<W> {
	fn key(&self) -> VertexId {
		self.to
	}
}

/// A weighted edge whose weight is guaranteed finite (§4.3's `WeightedEdge`).
pub type Weight = noisy_float::types::N64;

/// A fixed-capacity directed graph. Addressable indices are `0..capacity`.
pub struct Graph<W = ()> {
	capacity: usize,
	allow_multiples: bool,
	out: Vec<AdjacencyList<GraphEdge<W>>>,
	in_: Vec<AdjacencyList<GraphEdge<W>>>,
	out_degree_cache: RefCell<Vec<i64>>,
	in_degree_cache: RefCell<Vec<i64>>,
}

impl<W: Copy + Clone> Graph<W> {
	pub fn new(capacity: usize, allow_multiples: bool) -> Self {
		Self {
			capacity,
			allow_multiples,
			out: (0..capacity).map(|_| AdjacencyList::default()).collect(),
			in_: (0..capacity).map(|_| AdjacencyList::default()).collect(),
			out_degree_cache: RefCell::new(vec![-1; capacity]),
			in_degree_cache: RefCell::new(vec![-1; capacity]),
		}
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	fn in_range(&self, v: VertexId) -> bool {
		v >= 0 && (v as usize) < self.capacity
	}

	/// Adds `from -> to` with the given weight. Out-of-range endpoints are silently ignored
	/// (the engine's tolerance policy, §7): returns `Ok(false)`.
	pub fn add_edge(&mut self, from: VertexId, to: VertexId, weight: W) -> Result<bool, AssemblyError> {
		if !self.in_range(from) || !self.in_range(to) {
			return Ok(false);
		}
		let inserted_out = self.out[from as usize].insert(GraphEdge { to, weight }, self.allow_multiples)?;
		if inserted_out {
			self.in_[to as usize]
				.insert(GraphEdge { to: from, weight }, self.allow_multiples)?;
		}
		self.out_degree_cache.borrow_mut()[from as usize] = -1;
		self.in_degree_cache.borrow_mut()[to as usize] = -1;
		Ok(inserted_out)
	}

	/// Removes every parallel edge `from -> to`. Out-of-range endpoints are silently ignored.
	pub fn remove_edge(&mut self, from: VertexId, to: VertexId) -> bool {
		if !self.in_range(from) || !self.in_range(to) {
			return false;
		}
		let removed = self.out[from as usize].remove_all(to);
		if removed > 0 {
			self.in_[to as usize].remove_all(from);
			self.out_degree_cache.borrow_mut()[from as usize] = -1;
			self.in_degree_cache.borrow_mut()[to as usize] = -1;
		}
		removed > 0
	}

	fn require_range(&self, v: VertexId) -> Result<usize, AssemblyError> {
		if self.in_range(v) {
			Ok(v as usize)
		} else {
			Err(AssemblyError::RangeViolation {
				index: v,
				capacity: self.capacity,
			})
		}
	}

	/// Lazily computed out-degree; raises on an out-of-range vertex (§4.3, §7).
	pub fn out_degree(&self, v: VertexId) -> Result<i64, AssemblyError> {
		let idx = self.require_range(v)?;
		let mut cache = self.out_degree_cache.borrow_mut();
		if cache[idx] < 0 {
			cache[idx] = self.out[idx].len() as i64;
		}
		Ok(cache[idx])
	}

	pub fn in_degree(&self, v: VertexId) -> Result<i64, AssemblyError> {
		let idx = self.require_range(v)?;
		let mut cache = self.in_degree_cache.borrow_mut();
		if cache[idx] < 0 {
			cache[idx] = self.in_[idx].len() as i64;
		}
		Ok(cache[idx])
	}

	/// A typed iterator over `v`'s outgoing edges; raises on an out-of-range vertex.
	pub fn iterate_out_edges(
		&self,
		v: VertexId,
	) -> Result<crate::adjacency::SingleIter<GraphEdge<W>>, AssemblyError> {
		let idx = self.require_range(v)?;
		Ok(self.out[idx].iterate_singles())
	}

	/// Snapshot of `v`'s outgoing destinations in sorted order, used by the Euler extractor's
	/// own (separate, non-mutating) traversal cursors.
	pub fn out_neighbors(&self, v: VertexId) -> Vec<VertexId> {
		if !self.in_range(v) {
			return Vec::new();
		}
		self.out[v as usize].snapshot().into_iter().map(|e| e.to).collect()
	}
}

// `SingleIter`/`GroupIter`/`Keyed` need to be importable from `crate::adjacency` for callers of
// `iterate_out_edges`; re-export nothing extra here to avoid duplicating the adjacency module's
// public surface.
pub use crate::adjacency::SingleIter as GraphEdgeIter;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_edge_out_of_range_is_a_noop() {
		let mut g: Graph<()> = Graph::new(3, false);
		assert_eq!(g.add_edge(0, 10, ()).unwrap(), false);
		assert_eq!(g.out_degree(0).unwrap(), 0);
	}

	#[test]
	fn degree_query_out_of_range_raises() {
		let g: Graph<()> = Graph::new(3, false);
		assert!(matches!(
			g.out_degree(10),
			Err(AssemblyError::RangeViolation { .. })
		));
	}

	#[test]
	fn degrees_update_after_mutation() {
		let mut g: Graph<()> = Graph::new(4, false);
		g.add_edge(0, 1, ()).unwrap();
		g.add_edge(0, 2, ()).unwrap();
		assert_eq!(g.out_degree(0).unwrap(), 2);
		assert_eq!(g.in_degree(1).unwrap(), 1);
		g.remove_edge(0, 1);
		assert_eq!(g.out_degree(0).unwrap(), 1);
		assert_eq!(g.in_degree(1).unwrap(), 0);
	}

	#[test]
	fn out_neighbors_sorted() {
		let mut g: Graph<()> = Graph::new(4, true);
		g.add_edge(0, 3, ()).unwrap();
		g.add_edge(0, 1, ()).unwrap();
		g.add_edge(0, 1, ()).unwrap();
		assert_eq!(g.out_neighbors(0), vec![1, 1, 3]);
	}

	#[test]
	fn weighted_edges_carry_a_finite_weight() {
		use noisy_float::prelude::n64;

		let mut g: Graph<Weight> = Graph::new(3, false);
		g.add_edge(0, 1, n64(4.5)).unwrap();
		g.add_edge(0, 2, n64(1.0)).unwrap();
		let mut out = g.iterate_out_edges(0).unwrap();
		assert_eq!(out.next(), Some(GraphEdge { to: 1, weight: n64(4.5) }));
		assert_eq!(out.next(), Some(GraphEdge { to: 2, weight: n64(1.0) }));
		assert_eq!(out.next(), None);
	}
}
