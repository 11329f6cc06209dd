
use std::fmt;

use crate::asm::Asm;

/// Symbol exported as the program entry point.
pub const ENTRY: &str = "main";

/// Instructions of the entry function, in emission order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Output {
	pub(crate) asm: Vec<Asm>,
}

impl Output {
	pub(crate) fn push(&mut self, asm: Asm) {
		self.asm.push(asm);
	}

	pub fn instructions(&self) -> &[Asm] {
		&self.asm
	}

	pub fn len(&self) -> usize {
		self.asm.len()
	}

	pub fn is_empty(&self) -> bool {
		self.asm.is_empty()
	}
}

/// Renders a complete assembly file.
impl fmt::Display for Output {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		writeln!(fmt, ".intel_syntax noprefix")?;
		writeln!(fmt, ".globl {ENTRY}")?;
		writeln!(fmt, "{ENTRY}:")?;
		for asm in &self.asm {
			writeln!(fmt, "    {asm}")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod render {
	use super::*;
	use crate::asm::Reg;

	#[test]
	fn header_then_body() {
		let mut out = Output::default();
		out.push(Asm::PushImm(7));
		out.push(Asm::Pop(Reg::Rax));
		out.push(Asm::Ret);
		assert_eq!(out.len(), 3);
		assert_eq!(
			out.to_string(),
			".intel_syntax noprefix\n.globl main\nmain:\n    push 7\n    pop rax\n    ret\n",
		);
	}
}
