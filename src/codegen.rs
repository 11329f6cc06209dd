//! Stack-machine code generation.
//!
//! Every expression leaves exactly one value on the machine stack. Operands
//! are popped into `rdi` (right) and `rax` (left), combined, and the result
//! pushed back.

use tracing::{debug, instrument, trace};

use crate::asm::{Asm, Cond, Reg};
use crate::output::Output;
use crate::parser::{BinOp, Node, Program, FRAME_SIZE};

/// Lower a whole program into the body of `main`.
#[instrument(skip_all)]
pub fn generate(program: &Program) -> Output {
	let mut out = Output::default();

	out.push(Asm::Push(Reg::Rbp));
	out.push(Asm::Mov(Reg::Rbp, Reg::Rsp));
	out.push(Asm::SubImm(Reg::Rsp, FRAME_SIZE as i32));

	for (idx, stmt) in program.stmts.iter().enumerate() {
		let start = out.len();
		expr(stmt, &mut out);
		// the last pop leaves the program result in rax
		out.push(Asm::Pop(Reg::Rax));
		trace!("statement {idx}: {} instruction(s)", out.len() - start);
	}
	if program.stmts.is_empty() {
		out.push(Asm::MovImm(Reg::Rax, 0));
	}

	out.push(Asm::Mov(Reg::Rsp, Reg::Rbp));
	out.push(Asm::Pop(Reg::Rbp));
	out.push(Asm::Ret);

	debug!("generated {} instruction(s)", out.len());
	out
}

/// Push the address of an assignable node.
fn lvalue(node: &Node, out: &mut Output) {
	let Node::Var(var) = node else {
		unreachable!("assignment target is not a variable: {node:?}");
	};
	out.push(Asm::Mov(Reg::Rax, Reg::Rbp));
	out.push(Asm::SubImm(Reg::Rax, var.offset() as i32));
	out.push(Asm::Push(Reg::Rax));
}

/// Push the value of `node`.
pub(crate) fn expr(node: &Node, out: &mut Output) {
	match node {
		Node::Num(num) => match i32::try_from(*num) {
			Ok(imm) => out.push(Asm::PushImm(imm)),
			Err(_) => {
				out.push(Asm::MovImm(Reg::Rax, *num));
				out.push(Asm::Push(Reg::Rax));
			}
		},
		Node::Var(_) => {
			lvalue(node, out);
			out.push(Asm::Pop(Reg::Rax));
			out.push(Asm::Load(Reg::Rax, Reg::Rax));
			out.push(Asm::Push(Reg::Rax));
		}
		Node::Assign(lhs, rhs) => {
			lvalue(lhs, out);
			expr(rhs, out);
			out.push(Asm::Pop(Reg::Rdi));
			out.push(Asm::Pop(Reg::Rax));
			out.push(Asm::Store(Reg::Rax, Reg::Rdi));
			out.push(Asm::Push(Reg::Rdi));
		}
		Node::Binary(op, lhs, rhs) => {
			expr(lhs, out);
			expr(rhs, out);
			out.push(Asm::Pop(Reg::Rdi));
			out.push(Asm::Pop(Reg::Rax));
			binary(*op, out);
			out.push(Asm::Push(Reg::Rax));
		}
	}
}

/// `rax = rax <op> rdi`
fn binary(op: BinOp, out: &mut Output) {
	match op {
		BinOp::Add => out.push(Asm::Add(Reg::Rax, Reg::Rdi)),
		BinOp::Sub => out.push(Asm::Sub(Reg::Rax, Reg::Rdi)),
		BinOp::Mul => out.push(Asm::IMul(Reg::Rax, Reg::Rdi)),
		BinOp::Div => {
			out.push(Asm::Cqo);
			out.push(Asm::IDiv(Reg::Rdi));
		}
		BinOp::Eq => compare(Cond::Eq, out),
		BinOp::Ne => compare(Cond::Ne, out),
		BinOp::Lt => compare(Cond::Lt, out),
		BinOp::Le => compare(Cond::Le, out),
	}
}

/// Comparisons yield exactly 0 or 1.
fn compare(cond: Cond, out: &mut Output) {
	out.push(Asm::Cmp(Reg::Rax, Reg::Rdi));
	out.push(Asm::Set(cond));
	out.push(Asm::MovZb);
}
