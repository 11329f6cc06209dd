
/// Bytes per variable slot.
pub const SLOT_SIZE: i64 = 8;
/// One slot per lowercase letter.
pub const SLOT_COUNT: i64 = 26;
/// Local frame reserved by the prologue, whether or not a slot is used.
pub const FRAME_SIZE: i64 = SLOT_SIZE * SLOT_COUNT;

/// A variable, identified by its letter.
///
/// The frame offset depends only on the letter, so `a` is always at
/// `rbp-8` and `z` at `rbp-208`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Var(u8);

impl Var {
	pub fn new(name: char) -> Option<Self> {
		name.is_ascii_lowercase().then(|| Self(name as u8 - b'a'))
	}

	pub fn name(self) -> char {
		(b'a' + self.0) as char
	}

	/// Distance below the frame base, in bytes.
	pub fn offset(self) -> i64 {
		(self.0 as i64 + 1) * SLOT_SIZE
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
	Add,
	Sub,
	Mul,
	Div,
	Eq,
	Ne,
	Lt,
	Le,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	Num(i64),
	Var(Var),
	Binary(BinOp, Box<Node>, Box<Node>),
	Assign(Box<Node>, Box<Node>),
}

impl Node {
	pub fn binary(op: BinOp, lhs: Node, rhs: Node) -> Self {
		Self::Binary(op, Box::new(lhs), Box::new(rhs))
	}

	pub fn assign(lhs: Node, rhs: Node) -> Self {
		Self::Assign(Box::new(lhs), Box::new(rhs))
	}
}

/// Statements in source order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Program {
	pub stmts: Vec<Node>,
}
