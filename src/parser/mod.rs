use tracing::{debug, instrument, trace};

use crate::diagnostic::{Error, Reason};
use crate::tokens::{Token, Type};

mod node;

pub use node::{BinOp, Node, Program, Var, FRAME_SIZE, SLOT_COUNT, SLOT_SIZE};

type ParseResult<T> = Result<T, Error>;

/// Parse a token stream produced by [`crate::lexer::tokenize`].
///
/// Input ends at the first [`Type::End`] or at the end of `tokens`;
/// `source` is only used to build diagnostics.
#[instrument(skip_all)]
pub fn parse(tokens: &[Token], source: &str) -> ParseResult<Program> {
	let mut parser = Parser {
		index: 0,
		tokens,
		source,
		end: Token::new(Type::End, source.len(), 0),
	};
	let program = parser.program()?;
	debug!("parsed {} statement(s)", program.stmts.len());
	Ok(program)
}

struct Parser<'tok> {
	index: usize,
	tokens: &'tok [Token],
	source: &'tok str,
	/// Read once the cursor runs past `tokens`.
	end: Token,
}

impl Parser<'_> {
	fn curr(&self) -> &Token {
		self.tokens.get(self.index).unwrap_or(&self.end)
	}

	fn is_done(&self) -> bool {
		*self.curr() == Type::End
	}

	fn error(&self, reason: Reason) -> Error {
		let tok = self.curr();
		Error::at(self.source, tok.offset(), tok.len as usize, reason)
	}

	/// Advance past `op` if it is next.
	fn consume(&mut self, op: &str) -> bool {
		if self.curr().is_reserved(op) {
			self.index += 1;
			true
		} else {
			false
		}
	}

	fn expect(&mut self, op: &'static str) -> ParseResult<()> {
		if self.consume(op) {
			Ok(())
		} else {
			Err(self.error(Reason::Expected(op)))
		}
	}

	fn ident(&mut self) -> Option<Var> {
		let Type::Ident(name) = self.curr().tt else {
			return None;
		};
		let var = Var::new(name)?;
		self.index += 1;
		Some(var)
	}

	fn number(&mut self) -> ParseResult<i64> {
		let Type::Num(num) = self.curr().tt else {
			return Err(self.error(Reason::ExpectedNumber));
		};
		self.index += 1;
		Ok(num)
	}

	// program := statement*
	fn program(&mut self) -> ParseResult<Program> {
		let mut program = Program::default();
		while !self.is_done() {
			let stmt = self.statement()?;
			trace!("statement {}: {stmt:?}", program.stmts.len());
			program.stmts.push(stmt);
		}
		Ok(program)
	}

	// statement := expression ";"
	fn statement(&mut self) -> ParseResult<Node> {
		let node = self.expression()?;
		self.expect(";")?;
		Ok(node)
	}

	fn expression(&mut self) -> ParseResult<Node> {
		self.assignment()
	}

	// assignment := equality ("=" assignment)?
	fn assignment(&mut self) -> ParseResult<Node> {
		let start = self.curr().clone();
		let node = self.equality()?;
		if !self.consume("=") {
			return Ok(node);
		}
		if !matches!(node, Node::Var(_)) {
			return Err(Error::at(self.source, start.offset(), start.len as usize, Reason::NotAssignable));
		}
		Ok(Node::assign(node, self.assignment()?))
	}

	// equality := relational (("==" | "!=") relational)*
	fn equality(&mut self) -> ParseResult<Node> {
		let mut node = self.relational()?;
		loop {
			node = if self.consume("==") {
				Node::binary(BinOp::Eq, node, self.relational()?)
			} else if self.consume("!=") {
				Node::binary(BinOp::Ne, node, self.relational()?)
			} else {
				return Ok(node);
			};
		}
	}

	// relational := additive (("<" | "<=" | ">" | ">=") additive)*
	//
	// `>` and `>=` become `<` and `<=` with the operands swapped.
	fn relational(&mut self) -> ParseResult<Node> {
		let mut node = self.additive()?;
		loop {
			node = if self.consume("<") {
				Node::binary(BinOp::Lt, node, self.additive()?)
			} else if self.consume("<=") {
				Node::binary(BinOp::Le, node, self.additive()?)
			} else if self.consume(">") {
				Node::binary(BinOp::Lt, self.additive()?, node)
			} else if self.consume(">=") {
				Node::binary(BinOp::Le, self.additive()?, node)
			} else {
				return Ok(node);
			};
		}
	}

	// additive := multiplicative (("+" | "-") multiplicative)*
	fn additive(&mut self) -> ParseResult<Node> {
		let mut node = self.multiplicative()?;
		loop {
			node = if self.consume("+") {
				Node::binary(BinOp::Add, node, self.multiplicative()?)
			} else if self.consume("-") {
				Node::binary(BinOp::Sub, node, self.multiplicative()?)
			} else {
				return Ok(node);
			};
		}
	}

	// multiplicative := unary (("*" | "/") unary)*
	fn multiplicative(&mut self) -> ParseResult<Node> {
		let mut node = self.unary()?;
		loop {
			node = if self.consume("*") {
				Node::binary(BinOp::Mul, node, self.unary()?)
			} else if self.consume("/") {
				Node::binary(BinOp::Div, node, self.unary()?)
			} else {
				return Ok(node);
			};
		}
	}

	// unary := ("+" | "-")? primary
	fn unary(&mut self) -> ParseResult<Node> {
		if self.consume("+") {
			return self.primary();
		}
		if self.consume("-") {
			return Ok(Node::binary(BinOp::Sub, Node::Num(0), self.primary()?));
		}
		self.primary()
	}

	// primary := number | identifier | "(" expression ")"
	fn primary(&mut self) -> ParseResult<Node> {
		if self.consume("(") {
			let node = self.expression()?;
			self.expect(")")?;
			return Ok(node);
		}
		if let Some(var) = self.ident() {
			return Ok(Node::Var(var));
		}
		self.number().map(Node::Num)
	}
}
