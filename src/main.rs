//! Wordcluster - semantic word grouping daemon
//!
//! Polls a collection of short texts, groups them by meaning and publishes
//! how large each text's group is.

use anyhow::Result;
use clap::Parser;

use wordcluster::cli::{Cli, Command};
use wordcluster::commands;
use wordcluster::ui;

fn main() -> Result<()> {
	let cli = Cli::parse();

	ui::Log::set_verbose(cli.verbose);

	match cli.command {
		Command::Run {
			store,
			clustering,
			model,
			interval,
			retry_delay,
			mode,
			publish,
		} => commands::run::run(
			&store,
			&clustering,
			&model,
			cli.provider,
			interval,
			retry_delay,
			mode,
			publish,
		),
		Command::Group { words, clustering, model } => {
			commands::group::run(&words, &clustering, &model, cli.provider)
		}
		Command::Matrix {
			words,
			distance,
			threshold,
			model,
		} => commands::matrix::run(&words, distance, threshold, &model, cli.provider),
	}
}
