//! The partition-local vertex record (PLVR, §3, §4.2) - the unit shuffled between compression
//! and pruning workers, and the thing chain compression and coverage pruning actually mutate.

use crate::adjacency::AdjacencyList;
use crate::error::AssemblyError;
use crate::VertexId;

/// Extension hook for a PLVR's opaque payload (e.g. the k-mer sequence fragment a vertex stands
/// for). `fuse` implements the subtype hook `fuseOnCompress` mentioned in §4.2/§9: when chain
/// compression collapses `u -> w` into `u'`, the merged payload is `u.payload.fuse(&w.payload)`.
pub trait Payload: Clone + PartialEq + std::fmt::Debug {
	fn to_bytes(&self) -> Vec<u8>;
	fn from_bytes(bytes: &[u8]) -> Self;
	fn fuse(&self, next: &Self) -> Self;
}

/// The default payload: raw bytes, concatenated on fuse. Suitable when a caller has no
/// k-mer-fragment payload to carry (e.g. the unit-test graphs in §8).
#[derive(Clone, PartialEq, Debug, Default)]
pub struct BytesPayload(pub Vec<u8>);

impl Payload for BytesPayload {
	fn to_bytes(&self) -> Vec<u8> {
		self.0.clone()
	}
	fn from_bytes(bytes: &[u8]) -> Self {
		BytesPayload(bytes.to_vec())
	}
	fn fuse(&self, next: &Self) -> Self {
		let mut out = self.0.clone();
		out.extend_from_slice(&next.0);
		BytesPayload(out)
	}
}

/// Which sides of the record a byte serialization should carry (§4.2).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SerializeFormat {
	EdgesToOnly,
	EdgesToFrom,
}

const TAG_VERTEX_RECORD: u8 = 1;
const FLAG_BRANCH: u8 = 1 << 0;
const FLAG_SOURCE: u8 = 1 << 1;
const FLAG_SINK: u8 = 1 << 2;

/// A partition-local vertex record.
#[derive(Clone, Debug)]
pub struct VertexRecord<P: Payload = BytesPayload> {
	pub id: VertexId,
	edges_to: AdjacencyList<VertexId>,
	edges_from: AdjacencyList<VertexId>,
	pub is_branch: bool,
	pub is_source: bool,
	pub is_sink: bool,
	pub payload: P,
}

impl<P: Payload> PartialEq for VertexRecord<P> {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
			&& self.edges_to.snapshot() == other.edges_to.snapshot()
			&& self.edges_from.snapshot() == other.edges_from.snapshot()
			&& self.is_branch == other.is_branch
			&& self.is_source == other.is_source
			&& self.is_sink == other.is_sink
			&& self.payload == other.payload
	}
}

impl<P: Payload> VertexRecord<P> {
	pub fn new(id: VertexId, payload: P) -> Self {
		Self {
			id,
			edges_to: AdjacencyList::default(),
			edges_from: AdjacencyList::default(),
			is_branch: false,
			is_source: false,
			is_sink: false,
			payload,
		}
	}

	pub fn edges_to(&self) -> Vec<VertexId> {
		self.edges_to.snapshot()
	}

	pub fn edges_from(&self) -> Vec<VertexId> {
		self.edges_from.snapshot()
	}

	pub fn edges_to_list(&self) -> &AdjacencyList<VertexId> {
		&self.edges_to
	}

	pub fn edges_from_list(&self) -> &AdjacencyList<VertexId> {
		&self.edges_from
	}

	pub fn add_edge_to(&mut self, to: VertexId, allow_multiples: bool) -> Result<(), AssemblyError> {
		self.edges_to.insert(to, allow_multiples)?;
		self.recompute_flags();
		Ok(())
	}

	pub fn add_edge_from(&mut self, from: VertexId, allow_multiples: bool) -> Result<(), AssemblyError> {
		self.edges_from.insert(from, allow_multiples)?;
		self.recompute_flags();
		Ok(())
	}

	/// Removes every parallel edge to `to` (the remove-all-parallels policy, see
	/// SPEC_FULL.md §9).
	pub fn remove_edges_to(&mut self, to: VertexId) -> usize {
		let n = self.edges_to.remove_all(to);
		self.recompute_flags();
		n
	}

	pub fn remove_edges_from(&mut self, from: VertexId) -> usize {
		let n = self.edges_from.remove_all(from);
		self.recompute_flags();
		n
	}

	/// Recomputes `is_branch`/`is_source`/`is_sink` from the current edge lists (§3 invariants
	/// 3-4). Called after every mutation; exposed so deserialization and merge/compress can
	/// trigger it explicitly too.
	pub fn recompute_flags(&mut self) {
		self.is_branch = self.edges_to.distinct_key_count() >= 2 || self.edges_from.distinct_key_count() >= 2;
		self.is_source = self.edges_from.is_empty() && !self.edges_to.is_empty();
		self.is_sink = self.edges_to.is_empty() && !self.edges_from.is_empty();
	}

	/// Unions `other`'s edges into `self`. Requires `other.id == self.id`.
	pub fn merge(&mut self, other: &Self, allow_multiples: bool) -> Result<(), AssemblyError> {
		if self.id != other.id {
			return Err(AssemblyError::PreconditionViolation {
				reason: format!("cannot merge records with different ids ({} != {})", self.id, other.id),
			});
		}
		for v in other.edges_to.snapshot() {
			self.edges_to.insert(v, allow_multiples)?;
		}
		for v in other.edges_from.snapshot() {
			self.edges_from.insert(v, allow_multiples)?;
		}
		self.payload = self.payload.fuse(&other.payload);
		self.recompute_flags();
		Ok(())
	}

	/// Serializes the record to the wire format in §4.2.
	pub fn to_bytes(&self, format: SerializeFormat) -> Vec<u8> {
		let mut flags = 0u8;
		if self.is_branch {
			flags |= FLAG_BRANCH;
		}
		if self.is_source {
			flags |= FLAG_SOURCE;
		}
		if self.is_sink {
			flags |= FLAG_SINK;
		}
		let mut out = Vec::new();
		out.push(TAG_VERTEX_RECORD);
		out.push(flags);
		out.extend_from_slice(&self.id.to_be_bytes());
		let to = self.edges_to.snapshot();
		out.extend_from_slice(&(to.len() as i16).to_be_bytes());
		for v in &to {
			out.extend_from_slice(&v.to_be_bytes());
		}
		let from = if format == SerializeFormat::EdgesToFrom {
			self.edges_from.snapshot()
		} else {
			Vec::new()
		};
		out.extend_from_slice(&(from.len() as i16).to_be_bytes());
		for v in &from {
			out.extend_from_slice(&v.to_be_bytes());
		}
		let payload = self.payload.to_bytes();
		out.extend_from_slice(&(payload.len() as i16).to_be_bytes());
		out.extend_from_slice(&payload);
		out
	}

	/// Parses a record from the wire format. On truncation, reconstructs as much as is present
	/// and returns it without error (§4.2, §7 FramingError policy for PLVR reads).
	pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
		if bytes.len() < 2 || bytes[0] != TAG_VERTEX_RECORD {
			return None;
		}
		let flags = bytes[1];
		let mut cursor = 2usize;
		let id = read_i32(bytes, &mut cursor)?;
		let mut record = VertexRecord::new(id, P::from_bytes(&[]));
		record.is_branch = flags & FLAG_BRANCH != 0;
		record.is_source = flags & FLAG_SOURCE != 0;
		record.is_sink = flags & FLAG_SINK != 0;

		let n_to = match read_u16(bytes, &mut cursor) {
			Some(n) => n,
			None => return Some(record),
		};
		for _ in 0..n_to {
			match read_i32(bytes, &mut cursor) {
				Some(v) => {
					let _ = record.edges_to.insert(v, true);
				}
				None => return Some(record),
			}
		}
		let n_from = match read_u16(bytes, &mut cursor) {
			Some(n) => n,
			None => return Some(record),
		};
		for _ in 0..n_from {
			match read_i32(bytes, &mut cursor) {
				Some(v) => {
					let _ = record.edges_from.insert(v, true);
				}
				None => return Some(record),
			}
		}
		let payload_len = match read_u16(bytes, &mut cursor) {
			Some(n) => n,
			None => return Some(record),
		};
		let end = (cursor + payload_len as usize).min(bytes.len());
		record.payload = P::from_bytes(&bytes[cursor..end]);
		Some(record)
	}
}

/// Reads a 16-bit big-endian field as an unsigned byte pair before any signed interpretation,
/// per §4.2/§9: the source this spec generalizes sign-extends the high byte via a signed shift,
/// which corrupts values whose high byte is >= 0x80. Lengths here are never negative, so the
/// unsigned value is used directly.
fn read_u16(bytes: &[u8], cursor: &mut usize) -> Option<u16> {
	if *cursor + 2 > bytes.len() {
		return None;
	}
	let v = ((bytes[*cursor] as u16) << 8) | (bytes[*cursor + 1] as u16);
	*cursor += 2;
	Some(v)
}

fn read_i32(bytes: &[u8], cursor: &mut usize) -> Option<VertexId> {
	if *cursor + 4 > bytes.len() {
		return None;
	}
	let v = i32::from_be_bytes(bytes[*cursor..*cursor + 4].try_into().unwrap());
	*cursor += 4;
	Some(v)
}
