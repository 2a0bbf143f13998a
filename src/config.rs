//! Engine configuration (§6, §6C of the spec).
//!
//! Shaped directly after the teacher's `meta::Parameters`: a flat, `Serialize`/`Deserialize`
//! struct with `Copy` leaf fields, loadable from YAML via `serde_yaml` for parity with the
//! teacher's `meta.yaml`-driven CLI.

use serde::{Deserialize, Serialize};

/// The six configuration keys named in §6's table, with the defaults from that table.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Config {
	/// Permit parallel edges on PLVRs.
	pub allow_edge_multiples: bool,
	/// Refuse chain-compression merges when `u->w` and `w->next` multiplicities differ.
	pub compress_multiples_must_match: bool,
	/// Emit `edgesFrom` in serialized PLVR output.
	pub include_from_edges: bool,
	/// Split output into `branch/*` and `chain/*` streams by `isBranch`.
	pub partition_branches_chains: bool,
	/// Expected coverage for pruning; `-1` disables the pruner.
	pub coverage: i64,
	/// Consecutive silent compression rounds required before the harness stops.
	pub termination_count: u32,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			allow_edge_multiples: false,
			compress_multiples_must_match: true,
			include_from_edges: false,
			partition_branches_chains: true,
			coverage: -1,
			termination_count: 1,
		}
	}
}

impl Config {
	pub fn builder() -> ConfigBuilder {
		ConfigBuilder::default()
	}

	pub fn pruning_enabled(&self) -> bool {
		self.coverage > 0
	}

	pub fn from_yaml_reader<R: std::io::Read>(r: R) -> Result<Self, serde_yaml::Error> {
		serde_yaml::from_reader(r)
	}

	pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
		serde_yaml::to_string(self)
	}
}

/// A small programmatic builder, so tests don't need a YAML fixture per case - the teacher's own
/// tests build `Parameters`/`Graph`s directly in Rust, not from fixture files.
#[derive(Default, Clone, Copy)]
pub struct ConfigBuilder {
	cfg: OptionalFields,
}

#[derive(Default, Clone, Copy)]
struct OptionalFields {
	allow_edge_multiples: Option<bool>,
	compress_multiples_must_match: Option<bool>,
	include_from_edges: Option<bool>,
	partition_branches_chains: Option<bool>,
	coverage: Option<i64>,
	termination_count: Option<u32>,
}

impl ConfigBuilder {
	pub fn allow_edge_multiples(mut self, v: bool) -> Self {
		self.cfg.allow_edge_multiples = Some(v);
		self
	}
	pub fn compress_multiples_must_match(mut self, v: bool) -> Self {
		self.cfg.compress_multiples_must_match = Some(v);
		self
	}
	pub fn include_from_edges(mut self, v: bool) -> Self {
		self.cfg.include_from_edges = Some(v);
		self
	}
	pub fn partition_branches_chains(mut self, v: bool) -> Self {
		self.cfg.partition_branches_chains = Some(v);
		self
	}
	pub fn coverage(mut self, v: i64) -> Self {
		self.cfg.coverage = Some(v);
		self
	}
	pub fn termination_count(mut self, v: u32) -> Self {
		self.cfg.termination_count = Some(v);
		self
	}
	pub fn build(self) -> Config {
		let d = Config::default();
		Config {
			allow_edge_multiples: self.cfg.allow_edge_multiples.unwrap_or(d.allow_edge_multiples),
			compress_multiples_must_match: self
				.cfg
				.compress_multiples_must_match
				.unwrap_or(d.compress_multiples_must_match),
			include_from_edges: self.cfg.include_from_edges.unwrap_or(d.include_from_edges),
			partition_branches_chains: self
				.cfg
				.partition_branches_chains
				.unwrap_or(d.partition_branches_chains),
			coverage: self.cfg.coverage.unwrap_or(d.coverage),
			termination_count: self.cfg.termination_count.unwrap_or(d.termination_count),
		}
	}
}
