//! Non-destructive Euler-tour extraction (§4.6).
//!
//! The iterative shape is grounded on the teacher's own non-recursive Tarjan SCC
//! (`Graph::strongly_connected_components` in `graph.rs`), which already demonstrates this
//! codebase's idiom for turning a naturally-recursive graph walk into an explicit work stack
//! (per SPEC_FULL.md §9's note on bounded-stack hosts) - the same trick applies here to
//! Hierholzer's algorithm.

use std::collections::VecDeque;

use crate::graph::Graph;
use crate::VertexId;

/// The ordered set of paths produced by one extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct EulerTours {
	pub paths: Vec<VecDeque<VertexId>>,
}

/// Extracts Euler tours from `g` without mutating it. Every vertex with at least one out-edge
/// contributes exactly its out-edges to exactly one path. When `g` is not Eulerian (some
/// vertex's in-degree != out-degree) the paths are best-effort and a warning is logged once;
/// this is not an error per §7.
pub fn extract_tours<W: Copy + Clone>(g: &Graph<W>) -> EulerTours {
	let n = g.capacity();
	let mut mismatch = false;
	for v in 0..n {
		let vid = v as VertexId;
		let (od, id) = (g.out_degree(vid), g.in_degree(vid));
		if let (Ok(od), Ok(id)) = (od, id) {
			if od != id {
				mismatch = true;
			}
		}
	}
	if mismatch {
		log::warn!("euler extraction on a non-Eulerian graph; emitting best-effort paths");
	}

	let neighbors: Vec<Vec<VertexId>> = (0..n).map(|v| g.out_neighbors(v as VertexId)).collect();
	let mut next_idx = vec![0usize; n];
	let mut paths = Vec::new();

	for s in 0..n {
		if next_idx[s] < neighbors[s].len() {
			log::debug!("starting euler trace from vertex {}", s);
			paths.push(trace(s as VertexId, &neighbors, &mut next_idx));
		}
	}
	EulerTours { paths }
}

/// One full Hierholzer trace starting at `s`: repeatedly walk until stuck, backtrack along the
/// trace stack, and splice in any remaining cycle reachable from a stack vertex, until neither
/// progresses further (§4.6 steps 2-3).
fn trace(s: VertexId, neighbors: &[Vec<VertexId>], next_idx: &mut [usize]) -> VecDeque<VertexId> {
	let mut stack: Vec<VertexId> = Vec::new();
	let mut path: VecDeque<VertexId> = VecDeque::new();
	let mut v = s;
	loop {
		while next_idx[v as usize] < neighbors[v as usize].len() {
			stack.push(v);
			let to = neighbors[v as usize][next_idx[v as usize]];
			next_idx[v as usize] += 1;
			v = to;
		}
		path.push_front(v);
		match stack.pop() {
			Some(u) => v = u,
			None => break,
		}
	}
	path
}
