//! Positioned compile errors.
//!
//! Every lexical or syntax error points at a byte offset in the source. The
//! plain rendering echoes the offending line and puts a caret under the
//! offset; the [`miette::Diagnostic`] impl exposes the same information to
//! miette report handlers.

use std::fmt;

use miette::{LabeledSpan, SourceCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
	InvalidToken(char),
	NumberTooLarge,
	Expected(&'static str),
	ExpectedNumber,
	NotAssignable,
}

impl Reason {
	fn code(&self) -> &'static str {
		match self {
			Self::InvalidToken(_) => "stackcc::lex::invalid_token",
			Self::NumberTooLarge => "stackcc::lex::number_too_large",
			Self::Expected(_) => "stackcc::parse::expected",
			Self::ExpectedNumber => "stackcc::parse::expected_number",
			Self::NotAssignable => "stackcc::parse::not_assignable",
		}
	}
}

impl fmt::Display for Reason {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InvalidToken(c) => write!(fmt, "invalid token '{c}'"),
			Self::NumberTooLarge => write!(fmt, "number too large"),
			Self::Expected(op) => write!(fmt, "expected '{op}'"),
			Self::ExpectedNumber => write!(fmt, "expected a number"),
			Self::NotAssignable => write!(fmt, "left side of assignment is not a variable"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
	source: String,
	offset: usize,
	len: usize,
	reason: Reason,
}

impl Error {
	/// `offset` is clamped to the end of `source`.
	pub fn at(source: &str, offset: usize, len: usize, reason: Reason) -> Self {
		let offset = offset.min(source.len());
		Self {
			source: source.to_owned(),
			offset,
			len: len.min(source.len() - offset),
			reason,
		}
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn reason(&self) -> &Reason {
		&self.reason
	}

	/// The source line holding the error and the byte column within it.
	fn line(&self) -> (&str, usize) {
		let start = self.source[..self.offset]
			.rfind('\n')
			.map_or(0, |i| i + 1);
		let end = self.source[self.offset..]
			.find('\n')
			.map_or(self.source.len(), |i| i + self.offset);
		(&self.source[start..end], self.offset - start)
	}
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		let (line, column) = self.line();
		writeln!(fmt, "{line}")?;
		write!(fmt, "{:column$}^ {}", "", self.reason)
	}
}

impl miette::Diagnostic for Error {
	fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
		Some(Box::new(self.reason.code()))
	}

	fn source_code(&self) -> Option<&dyn SourceCode> {
		Some(&self.source)
	}

	fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
		let label = LabeledSpan::at((self.offset, self.len), self.reason.to_string());
		Some(Box::new(std::iter::once(label)))
	}
}

#[cfg(test)]
mod render {
	use super::*;

	use miette::Diagnostic;

	#[test]
	fn caret_under_offset() {
		let err = Error::at("1+@;", 2, 1, Reason::InvalidToken('@'));
		assert_eq!(err.to_string(), "1+@;\n  ^ invalid token '@'");
	}

	#[test]
	fn caret_at_start() {
		let err = Error::at("@", 0, 1, Reason::InvalidToken('@'));
		assert_eq!(err.to_string(), "@\n^ invalid token '@'");
	}

	#[test]
	fn caret_past_end() {
		let err = Error::at("1+2", 3, 0, Reason::Expected(";"));
		assert_eq!(err.to_string(), "1+2\n   ^ expected ';'");
	}

	#[test]
	fn offset_clamped() {
		let err = Error::at("1", 40, 3, Reason::Expected(";"));
		assert_eq!(err.offset(), 1);
		assert_eq!(err.to_string(), "1\n ^ expected ';'");
	}

	#[test]
	fn only_offending_line() {
		let err = Error::at("a=1;\nb=#;\nc;", 7, 1, Reason::InvalidToken('#'));
		assert_eq!(err.to_string(), "b=#;\n  ^ invalid token '#'");
	}

	#[test]
	fn miette_label() {
		let err = Error::at("1+x+", 4, 0, Reason::ExpectedNumber);
		let code = err.code().map(|c| c.to_string());
		assert_eq!(code.as_deref(), Some("stackcc::parse::expected_number"));

		let labels: Vec<_> = err.labels().into_iter().flatten().collect();
		assert_eq!(labels.len(), 1);
		assert_eq!(labels[0].offset(), 4);
		assert_eq!(labels[0].len(), 0);
		assert_eq!(labels[0].label(), Some("expected a number"));
		assert!(err.source_code().is_some());
	}
}
