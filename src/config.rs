use std::ffi::OsString;
use std::fmt;

use tracing::Level;

/// Log level variable, e.g. `STACKCC_LOG=trace`.
pub const LOG_VAR: &str = "STACKCC_LOG";
/// Set to `1` or `true` to render diagnostics through miette.
pub const FANCY_VAR: &str = "STACKCC_FANCY_ERRORS";

#[derive(Debug)]
pub enum Error {
	/// Wrong number of arguments; holds the program name.
	Usage(String),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Usage(program) => write!(fmt, "usage: {program} <source>"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Program text from the single argument. Bytes that are not UTF-8
	/// become U+FFFD and are reported by the lexer.
	pub source: String,
	pub log_level: Level,
	pub fancy_errors: bool,
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		Self::new(std::env::args_os(), |key| std::env::var(key).ok())
	}

	/// `args` includes the program name, as `std::env::args_os` does.
	pub fn new(
		args: impl IntoIterator<Item = impl Into<OsString>>,
		var: impl Fn(&str) -> Option<String>,
	) -> Result<Self, Error> {
		let mut args = args
			.into_iter()
			.map(|arg| arg.into().to_string_lossy().into_owned());
		let program = args.next().unwrap_or_else(|| "stackcc".to_owned());
		let (Some(source), None) = (args.next(), args.next()) else {
			return Err(Error::Usage(program));
		};

		let log_level = var(LOG_VAR)
			.and_then(|lvl| lvl.trim().parse().ok())
			.unwrap_or(Level::WARN);
		let fancy_errors = var(FANCY_VAR)
			.is_some_and(|val| matches!(val.trim(), "1" | "true"));

		Ok(Self {
			source,
			log_level,
			fancy_errors,
		})
	}
}
