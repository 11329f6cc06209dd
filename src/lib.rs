//! Compiles single-letter-variable arithmetic into x86-64 assembly.
//!
//! source -> [`lexer`] -> [`parser`] -> [`codegen`] -> [`Output`]

pub mod asm;
pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod tokens;
pub mod vm;

use tracing::instrument;

pub use diagnostic::Error;
pub use output::Output;

/// Compile `source` into the listing for `main`.
#[instrument(skip_all, fields(len = source.len()))]
pub fn compile(source: &str) -> Result<Output, Error> {
	let tokens = lexer::tokenize(source)?;
	let program = parser::parse(&tokens, source)?;
	Ok(codegen::generate(&program))
}
