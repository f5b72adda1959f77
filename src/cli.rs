use clap::{builder::Styles, Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use crate::config;
use crate::processing::{OutputMode, Strategy};
use crate::storage::PublishMode;

/// Execution provider for ONNX Runtime
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum Provider {
	/// Auto-detect best available (TensorRT → CUDA → CoreML → XNNPACK → CPU)
	#[default]
	Auto,
	/// CPU only
	Cpu,
	/// NVIDIA CUDA GPU
	Cuda,
	/// NVIDIA TensorRT (optimized inference)
	Tensorrt,
	/// Apple CoreML (macOS only)
	Coreml,
	/// XNNPACK (optimized CPU kernels)
	Xnnpack,
}

fn parse_distance(s: &str) -> Result<f32, String> {
	let val: f32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if !(0.0..=2.0).contains(&val) {
		Err(format!("distance must be between 0.0 and 2.0, got {}", val))
	} else {
		Ok(val)
	}
}

fn styles() -> Styles {
	Styles::styled()
		.header(anstyle::Style::new().bold().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.usage(anstyle::Style::new().bold().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))))
		.valid(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.invalid(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))))
}

#[derive(Parser, Debug)]
#[command(
	name = "wordcluster",
	author,
	version,
	about = "Semantic word grouping daemon",
	styles = styles(),
	after_help = format!(
		"{title}
  {bin} {run}     {run_args}         {run_desc}
  {bin} {group}   {group_args}   {group_desc}
  {bin} {matrix}  {matrix_args}       {matrix_desc}",
		title = "Examples:".bright_blue().bold(),
		bin = "wordcluster".bright_blue(),
		run = "run".yellow(),
		run_args = "--store ./data -t 0.168",
		run_desc = "Poll and publish weights".dimmed(),
		group = "group".yellow(),
		group_args = "大根 人参 野菜 りんご --dbscan",
		group_desc = "Group words once".dimmed(),
		matrix = "matrix".yellow(),
		matrix_args = "大根 人参 りんご --distance",
		matrix_desc = "Inspect pairwise distances".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// Execution provider: auto, cpu, cuda, tensorrt, coreml, xnnpack
	#[arg(short = 'p', long = "provider", global = true, default_value = "auto")]
	pub provider: Provider,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Poll the input collection and republish group weights on every change
	Run {
		#[command(flatten)]
		store: StoreArgs,

		#[command(flatten)]
		clustering: ClusterArgs,

		#[command(flatten)]
		model: ModelArgs,

		/// Seconds between polls
		#[arg(short = 'i', long = "interval", env = "WORDCLUSTER_POLL_INTERVAL", default_value_t = config::POLL_INTERVAL_SECS)]
		interval: u64,

		/// Seconds to wait before retrying a failed cycle
		#[arg(long = "retry-delay", default_value_t = config::RETRY_DELAY_SECS)]
		retry_delay: u64,

		/// Shape of the derived documents
		#[arg(long = "mode", value_enum, default_value = "weighted")]
		mode: ModeArg,

		/// How the derived collection is replaced
		#[arg(long = "publish", value_enum, default_value = "swap")]
		publish: PublishArg,
	},

	/// Group words once and print the result
	Group {
		/// Words to group
		#[arg(value_name = "WORD", required = true)]
		words: Vec<String>,

		#[command(flatten)]
		clustering: ClusterArgs,

		#[command(flatten)]
		model: ModelArgs,
	},

	/// Print the pairwise similarity (or distance) matrix for words
	Matrix {
		/// Words to compare
		#[arg(value_name = "WORD", required = true)]
		words: Vec<String>,

		/// Show cosine distance instead of similarity
		#[arg(short = 'd', long = "distance")]
		distance: bool,

		/// Threshold shown alongside the matrix
		#[arg(short = 't', long = "threshold", default_value_t = config::DEFAULT_THRESHOLD, value_parser = parse_distance)]
		threshold: f32,

		#[command(flatten)]
		model: ModelArgs,
	},
}

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
	/// MongoDB connection string; without it the JSON-file store is used
	#[arg(long = "uri", env = "MONGODB_URI")]
	pub uri: Option<String>,

	/// Root directory of the JSON-file store
	#[arg(long = "store", env = "WORDCLUSTER_STORE", default_value = config::DEFAULT_STORE_DIR)]
	pub root: PathBuf,

	/// Database name (a directory under the store root for the file store)
	#[arg(long = "db", env = "WORDCLUSTER_DB", default_value = config::DEFAULT_DATABASE)]
	pub database: String,

	/// Input collection name
	#[arg(long = "input", default_value = config::INPUT_COLLECTION)]
	pub input: String,

	/// Derived collection name
	#[arg(long = "output", default_value = config::OUTPUT_COLLECTION)]
	pub output: String,
}

#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
	/// Distance threshold for hierarchical clustering (0.0-2.0, smaller is stricter)
	#[arg(short = 't', long = "threshold", env = "WORDCLUSTER_THRESHOLD", default_value_t = config::DEFAULT_THRESHOLD, value_parser = parse_distance)]
	pub threshold: f32,

	/// Fixed number of groups instead of a threshold
	#[arg(short = 'k', long = "clusters", conflicts_with = "dbscan")]
	pub clusters: Option<usize>,

	/// Use density-based clustering (outliers become their own group)
	#[arg(long = "dbscan")]
	pub dbscan: bool,

	/// DBSCAN neighbourhood radius (0.0-2.0)
	#[arg(long = "eps", requires = "dbscan", default_value_t = config::DEFAULT_EPS, value_parser = parse_distance)]
	pub eps: f32,

	/// DBSCAN minimum neighbourhood size
	#[arg(long = "min-pts", requires = "dbscan", default_value_t = config::DEFAULT_MIN_PTS)]
	pub min_pts: usize,
}

impl ClusterArgs {
	pub fn strategy(&self) -> Strategy {
		if self.dbscan {
			Strategy::density(self.eps, self.min_pts)
		} else if let Some(k) = self.clusters {
			Strategy::clusters(k)
		} else {
			Strategy::threshold(self.threshold)
		}
	}
}

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
	/// Embedding model identifier
	#[arg(short = 'm', long = "model", env = "WORDCLUSTER_MODEL", default_value = config::DEFAULT_MODEL)]
	pub model: String,

	/// Directory holding cached models (default: models/ next to the executable)
	#[arg(long = "models-dir", env = config::MODELS_DIR_ENV)]
	pub models_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
	/// {word, weight} with weight = group size
	Weighted,
	/// Legacy {word, group_number}, items paired two at a time
	Paired,
}

impl From<ModeArg> for OutputMode {
	fn from(arg: ModeArg) -> Self {
		match arg {
			ModeArg::Weighted => OutputMode::Weighted,
			ModeArg::Paired => OutputMode::Paired,
		}
	}
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PublishArg {
	/// Write aside, then swap in atomically
	Swap,
	/// Clear, then insert (readers may briefly see nothing)
	Clear,
}

impl From<PublishArg> for PublishMode {
	fn from(arg: PublishArg) -> Self {
		match arg {
			PublishArg::Swap => PublishMode::ShadowSwap,
			PublishArg::Clear => PublishMode::ClearThenInsert,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn test_cli_is_consistent() {
		Cli::command().debug_assert();
	}

	#[test]
	fn test_run_defaults() {
		let cli = Cli::try_parse_from(["wordcluster", "run"]).unwrap();
		match cli.command {
			Command::Run { clustering, store, mode, publish, .. } => {
				assert_eq!(clustering.strategy(), Strategy::threshold(config::DEFAULT_THRESHOLD));
				assert_eq!(store.input, "messages");
				assert!(store.uri.is_none() || std::env::var("MONGODB_URI").is_ok());
				assert_eq!(store.output, "correlations");
				assert_eq!(OutputMode::from(mode), OutputMode::Weighted);
				assert_eq!(PublishMode::from(publish), PublishMode::ShadowSwap);
			}
			other => panic!("unexpected command: {:?}", other),
		}
	}

	#[test]
	fn test_strategy_selection() {
		let cli = Cli::try_parse_from(["wordcluster", "group", "a", "b", "--dbscan", "--eps", "0.2", "--min-pts", "2"]).unwrap();
		let Command::Group { clustering, words, .. } = cli.command else {
			panic!("expected group");
		};
		assert_eq!(words, vec!["a", "b"]);
		assert_eq!(clustering.strategy(), Strategy::density(0.2, 2));

		let cli = Cli::try_parse_from(["wordcluster", "group", "a", "-k", "3"]).unwrap();
		let Command::Group { clustering, .. } = cli.command else {
			panic!("expected group");
		};
		assert_eq!(clustering.strategy(), Strategy::clusters(3));
	}

	#[test]
	fn test_density_options_need_dbscan() {
		assert!(Cli::try_parse_from(["wordcluster", "group", "a", "--eps", "0.2"]).is_err());
		assert!(Cli::try_parse_from(["wordcluster", "group", "a", "--min-pts", "3"]).is_err());
		assert!(Cli::try_parse_from(["wordcluster", "group", "a", "--dbscan", "--eps", "0.2"]).is_ok());
		assert!(Cli::try_parse_from(["wordcluster", "group", "a", "--dbscan"]).is_ok());
	}

	#[test]
	fn test_uri_selects_mongo() {
		let cli = Cli::try_parse_from(["wordcluster", "run", "--uri", "mongodb://db:27017", "--db", "db_test"]).unwrap();
		let Command::Run { store, .. } = cli.command else {
			panic!("expected run");
		};
		assert_eq!(store.uri.as_deref(), Some("mongodb://db:27017"));
		assert_eq!(store.database, "db_test");
	}

	#[test]
	fn test_threshold_range_enforced() {
		assert!(Cli::try_parse_from(["wordcluster", "group", "a", "-t", "2.5"]).is_err());
		assert!(Cli::try_parse_from(["wordcluster", "group", "a", "-t", "-0.1"]).is_err());
		assert!(Cli::try_parse_from(["wordcluster", "group", "a", "-t", "2.0"]).is_ok());
	}
}
