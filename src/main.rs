use std::process::ExitCode;

use miette::{NarratableReportHandler, ReportHandler};
use stackcc::config::Config;
use tracing::debug;

struct Narrated<'a>(&'a stackcc::Error);

impl std::fmt::Display for Narrated<'_> {
	fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
		NarratableReportHandler::new().debug(self.0, fmt)
	}
}

fn main() -> ExitCode {
	let config = match Config::from_env() {
		Ok(config) => config,
		Err(e) => {
			eprintln!("{e}");
			return ExitCode::FAILURE;
		}
	};

	tracing_subscriber::fmt()
		.compact()
		.without_time()
		.with_writer(std::io::stderr)
		.with_max_level(config.log_level)
		.init();
	debug!("{config:?}");

	match stackcc::compile(&config.source) {
		Ok(out) => {
			print!("{out}");
			ExitCode::SUCCESS
		}
		Err(e) if config.fancy_errors => {
			eprintln!("{}", Narrated(&e));
			ExitCode::FAILURE
		}
		Err(e) => {
			eprintln!("{e}");
			ExitCode::FAILURE
		}
	}
}

#[cfg(test)]
mod narrated {
	use super::*;

	#[test]
	fn renders_through_miette() {
		let err = stackcc::compile("1+;").unwrap_err();
		let text = Narrated(&err).to_string();
		assert!(text.contains("expected a number"), "{text}");
		assert!(text.contains("stackcc::parse::expected_number"), "{text}");
	}
}
