//! Unified logging system

use chrono::Local;
use colored::*;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

const LOGO: &str = r#"
                     _      _           _
 __ __ _____ _ _ __| |  __| |_  _ _ __| |_ ___ _ _
 \ V  V / _ \ '_/ _` | / _| | || (_-<  _/ -_) '_|
  \_/\_/\___/_| \__,_| \__|_|\_,_/__/\__\___|_|  "#;

const SLOGANS: &[&str] = &[
	"Carrots, radishes and one lonely apple",
	"Cosine distance, now in cloud form",
	"Every word finds its people",
	"Average linkage, above-average vibes",
	"Noise is just a group of one",
	"Polling since you started me",
	"野菜は野菜へ、果物は果物へ",
];

pub fn random_slogan() -> &'static str {
	SLOGANS[rand::random_range(0..SLOGANS.len())]
}

pub fn print_logo() {
	println!("{}", LOGO.bright_blue().bold());
	println!("{}", random_slogan().dimmed().italic());
}

pub struct Log;

impl Log {
	pub fn set_verbose(enabled: bool) {
		VERBOSE.store(enabled, Ordering::Relaxed);
	}

	pub fn is_verbose() -> bool {
		VERBOSE.load(Ordering::Relaxed)
	}
}

fn timestamp() -> ColoredString {
	format!("[{}]", Local::now().format("%Y-%m-%d %H:%M:%S")).dimmed()
}

pub fn info(msg: &str) {
	println!("{} {} {}", timestamp(), "ℹ".bright_blue().bold(), msg.bright_white());
}

pub fn success(msg: &str) {
	println!("{} {} {}", timestamp(), "✓".bright_green().bold(), msg.bright_white());
}

pub fn warn(msg: &str) {
	println!("{} {} {}", timestamp(), "⚠".bright_yellow().bold(), msg.bright_white());
}

pub fn error(msg: &str) {
	eprintln!("{} {} {}", timestamp(), "✗".bright_red().bold(), msg.bright_white());
}

pub fn debug(msg: &str) {
	if Log::is_verbose() {
		println!("{} {} {}", timestamp(), "⚙".bright_black().bold(), msg.dimmed());
	}
}

pub fn header(text: &str) {
	println!("\n{}", format!("─── {} ───", text).bright_blue().bold());
}

/// One group as "Group i (n items):" followed by its words
pub fn group(index: usize, words: &[&str]) {
	println!(
		"\n{} {}",
		format!("Group {}", index).bright_white().bold(),
		format!("({} items):", words.len()).dimmed()
	);
	for word in words {
		println!("  - {}", word);
	}
}
