//! The framed record stream (§6): tag-dispatched PLVR and edge records, as exchanged between the
//! core and an external shuffling harness.
//!
//! No teacher analogue reads raw framed bytes off a stream (the teacher's CLI reads YAML/GeoJSON
//! via `serde`), so this module is written directly from §6's byte layout; it reuses
//! `vertex_record`'s big-endian-unsigned-assemble rule for the same sign-extension reason.

use try_all::TryMapAll;

use crate::error::AssemblyError;
use crate::vertex_record::{Payload, SerializeFormat, VertexRecord};
use crate::VertexId;

const TAG_EDGE_RECORD: u8 = 2;

/// A bare `(from, to)` edge, recognized when mixed into an input stream alongside vertex records
/// (§4.2's "edge-record" tag 2, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
	pub from: VertexId,
	pub to: VertexId,
}

const EDGE_RECORD_BYTES: usize = 9;

impl EdgeRecord {
	pub fn to_bytes(self) -> [u8; EDGE_RECORD_BYTES] {
		let mut out = [0u8; EDGE_RECORD_BYTES];
		out[0] = TAG_EDGE_RECORD;
		out[1..5].copy_from_slice(&self.from.to_be_bytes());
		out[5..9].copy_from_slice(&self.to.to_be_bytes());
		out
	}
}

/// One record off the wire, tagged by which variant it was (§6's "readers must distinguish
/// records solely by the leading byte").
#[derive(Debug, Clone, PartialEq)]
pub enum StreamRecord<P: Payload> {
	Vertex(VertexRecord<P>),
	Edge(EdgeRecord),
}

/// Parses every framed record out of `bytes` in order. Unlike a lone `VertexRecord::from_bytes`,
/// which tolerates truncation within one record, an edge record is fixed-size and a truncated
/// one is a hard `FramingError` (§7); an unrecognized leading tag is also a hard error.
pub fn read_records<P: Payload>(bytes: &[u8]) -> Result<Vec<StreamRecord<P>>, AssemblyError> {
	let mut cursor = 0usize;
	let mut chunks: Vec<&[u8]> = Vec::new();
	while cursor < bytes.len() {
		let tag = bytes[cursor];
		match tag {
			1 => {
				// A vertex record's own length fields determine its framed length; scan far
				// enough to find it, then hand the full remainder to `VertexRecord::from_bytes`
				// (it safely ignores any trailing bytes belonging to the next record because its
				// own length-prefixed fields bound the read).
				let end = vertex_record_extent(&bytes[cursor..]).map(|len| cursor + len).ok_or_else(|| {
					AssemblyError::FramingError {
						reason: format!("truncated vertex record at offset {}", cursor),
					}
				})?;
				chunks.push(&bytes[cursor..end]);
				cursor = end;
			}
			TAG_EDGE_RECORD => {
				if cursor + EDGE_RECORD_BYTES > bytes.len() {
					return Err(AssemblyError::FramingError {
						reason: format!("truncated edge record at offset {}", cursor),
					});
				}
				chunks.push(&bytes[cursor..cursor + EDGE_RECORD_BYTES]);
				cursor += EDGE_RECORD_BYTES;
			}
			other => {
				return Err(AssemblyError::FramingError {
					reason: format!("unrecognized record tag {} at offset {}", other, cursor),
				});
			}
		}
	}
	Ok(chunks.into_iter().try_map_all(|chunk| parse_one(chunk))?.collect())
}

fn parse_one<P: Payload>(chunk: &[u8]) -> Result<StreamRecord<P>, AssemblyError> {
	match chunk[0] {
		1 => VertexRecord::from_bytes(chunk)
			.map(StreamRecord::Vertex)
			.ok_or_else(|| AssemblyError::FramingError {
				reason: "vertex record framed length computation disagreed with from_bytes".to_string(),
			}),
		TAG_EDGE_RECORD => {
			let from = i32::from_be_bytes(chunk[1..5].try_into().unwrap());
			let to = i32::from_be_bytes(chunk[5..9].try_into().unwrap());
			Ok(StreamRecord::Edge(EdgeRecord { from, to }))
		}
		other => Err(AssemblyError::FramingError {
			reason: format!("unrecognized record tag {}", other),
		}),
	}
}

/// Computes the full byte length of one vertex record starting at `bytes[0]`, by walking its
/// length-prefixed fields without fully decoding it. Returns `None` if `bytes` is truncated
/// before the extent can be determined.
fn vertex_record_extent(bytes: &[u8]) -> Option<usize> {
	if bytes.len() < 2 || bytes[0] != 1 {
		return None;
	}
	let mut cursor = 2usize + 4; // tag + flags + id
	let n_to = read_u16_at(bytes, cursor)?;
	cursor += 2 + 4 * n_to as usize;
	let n_from = read_u16_at(bytes, cursor)?;
	cursor += 2 + 4 * n_from as usize;
	let payload_len = read_u16_at(bytes, cursor)?;
	cursor += 2 + payload_len as usize;
	if cursor > bytes.len() {
		return None;
	}
	Some(cursor)
}

fn read_u16_at(bytes: &[u8], at: usize) -> Option<u16> {
	if at + 2 > bytes.len() {
		return None;
	}
	Some(((bytes[at] as u16) << 8) | (bytes[at + 1] as u16))
}

/// Serializes vertex records back onto the wire (§6 "Output record stream": identical framing,
/// only vertex records emitted downstream).
pub fn write_vertex_records<P: Payload>(records: &[VertexRecord<P>], format: SerializeFormat) -> Vec<u8> {
	let mut out = Vec::new();
	for r in records {
		out.extend(r.to_bytes(format));
	}
	out
}
