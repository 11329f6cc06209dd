
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	/// Token type
	pub tt: Type,

	/// Start index in the source
	pub idx: u32,

	/// Length in bytes
	pub len: u32,
}

impl Token {
	pub fn new(tt: Type, idx: usize, len: usize) -> Self {
		Self {
			tt,
			idx: idx as u32,
			len: len as u32,
		}
	}

	pub fn offset(&self) -> usize {
		self.idx as usize
	}

	pub fn is_reserved(&self, op: &str) -> bool {
		matches!(self.tt, Type::Reserved(s) if s == op)
	}
}

impl PartialEq<Type> for Token {
	fn eq(&self, rhs: &Type) -> bool {
		self.tt == *rhs
	}
}

impl fmt::Display for Token {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		write!(fmt, "{}", self.tt)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
	/// Punctuator, one of [`PUNCTUATORS`]
	Reserved(&'static str),
	/// Single lowercase letter
	Ident(char),
	Num(i64),
	End,
}

impl fmt::Display for Type {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Reserved(op) => write!(fmt, "{op}"),
			Self::Ident(c) => write!(fmt, "{c}"),
			Self::Num(n) => write!(fmt, "{n}"),
			Self::End => write!(fmt, "EOF"),
		}
	}
}

/// Longest first, so `==` never lexes as two `=`.
pub const PUNCTUATORS: [&str; 14] = [
	"==", "!=", ">=", "<=",
	"+", "-", "*", "/", ">", "<", "(", ")", "=", ";",
];
