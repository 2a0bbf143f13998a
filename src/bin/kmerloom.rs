//! Demo CLI wrapping `kmerloom::Assembler` around the synthetic `DnaReadSource` fixture (§6,
//! §6D). Not part of the core engine's contract - a thin, clearly-separate binary, the way the
//! teacher's `main.rs` wraps its library-shaped solving logic.

use clap::{crate_version, App, Arg, SubCommand};
use itertools::Itertools;

use kmerloom::assembler::Assembler;
use kmerloom::config::Config;
use kmerloom::demo::DnaReadSource;

fn main() -> std::io::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"));
	let matches = App::new("kmerloom")
							.version(crate_version!())
							.about("De-novo sequence assembly over a synthetic DNA read source")
							.subcommand(SubCommand::with_name("assemble")
								.about("Generate synthetic reads and assemble them into tour sequences")
								.arg(Arg::with_name("k")
										.takes_value(true)
										.required(true)
										.index(1)
										.help("k-mer size"))
								.arg(Arg::with_name("genome-length")
										.takes_value(true)
										.required(true)
										.index(2)
										.help("Length of the synthetic genome to assemble"))
								.arg(Arg::with_name("read-length")
										.takes_value(true)
										.required(true)
										.index(3)
										.help("Length of each synthetic read"))
								.arg(Arg::with_name("read-count")
										.takes_value(true)
										.required(true)
										.index(4)
										.help("Number of synthetic reads to draw"))
								.arg(Arg::with_name("meta")
										.takes_value(true)
										.long("meta")
										.help("Engine configuration YAML; defaults used when omitted"))
								.arg(Arg::with_name("seed")
										.takes_value(true)
										.long("seed")
										.default_value("1")
										.validator(|s| s.parse::<u64>().map(|_| ()).map_err(|e| e.to_string()))
										.help("Compression-run RNG seed")))
							.get_matches();
	log::info!("Loading...");
	if let Some(matches) = matches.subcommand_matches("assemble") {
		log::trace!("tracing enabled");
		let k: usize = matches.value_of("k").unwrap().parse().expect("k must be a non-negative integer");
		let genome_length: usize = matches
			.value_of("genome-length")
			.unwrap()
			.parse()
			.expect("genome-length must be a non-negative integer");
		let read_length: usize = matches
			.value_of("read-length")
			.unwrap()
			.parse()
			.expect("read-length must be a non-negative integer");
		let read_count: usize = matches
			.value_of("read-count")
			.unwrap()
			.parse()
			.expect("read-count must be a non-negative integer");
		let seed: u64 = matches.value_of("seed").unwrap().parse().expect("seed must be a u64");

		let config: Config = match matches.value_of("meta") {
			Some(path) => serde_yaml::from_reader(&std::fs::File::open(path)?).expect("meta parameters invalid YAML"),
			None => Config::default(),
		};
		log::info!("Loaded configuration");

		let source = DnaReadSource {
			genome_length,
			read_length,
			read_count,
			seed,
		};
		let assembler = Assembler::new(config, seed);
		let tours = assembler.assemble(source, k).expect("assembly failed");
		log::info!("Extracted {} tour(s)", tours.paths.len());
		for (i, path) in tours.paths.iter().enumerate() {
			println!("tour {}: {}", i, path.iter().join(" -> "));
		}
	}
	Ok(())
}
