
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
	Rax,
	Rdi,
	Rdx,
	Rbp,
	Rsp,
}

impl fmt::Display for Reg {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		let s = match self {
			Self::Rax => "rax",
			Self::Rdi => "rdi",
			Self::Rdx => "rdx",
			Self::Rbp => "rbp",
			Self::Rsp => "rsp",
		};
		write!(fmt, "{s}")
	}
}

/// Condition tested by `set<cc> al`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
	Eq,
	Ne,
	Lt,
	Le,
}

impl fmt::Display for Cond {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		let s = match self {
			Self::Eq => "e",
			Self::Ne => "ne",
			Self::Lt => "l",
			Self::Le => "le",
		};
		write!(fmt, "{s}")
	}
}

/// The x86-64 subset emitted by the code generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asm {
	///   push imm32
	PushImm(i32),
	///   push reg
	Push(Reg),
	///   pop reg
	Pop(Reg),
	///   mov dst, src
	Mov(Reg, Reg),
	///   mov dst, imm64
	MovImm(Reg, i64),
	///   mov dst, [addr]
	Load(Reg, Reg),
	///   mov [addr], src
	Store(Reg, Reg),
	///   add dst, src
	Add(Reg, Reg),
	///   sub dst, src
	Sub(Reg, Reg),
	///   sub dst, imm32
	SubImm(Reg, i32),
	///   imul dst, src
	IMul(Reg, Reg),
	///   cqo              ; rdx:rax = sign-extend rax
	Cqo,
	///   idiv src         ; rax = rdx:rax / src, rdx = remainder
	IDiv(Reg),
	///   cmp lhs, rhs
	Cmp(Reg, Reg),
	///   set<cc> al
	Set(Cond),
	///   movzb rax, al
	MovZb,
	///   ret
	Ret,
}

impl Asm {
	/// Net change in evaluation stack depth, in words.
	pub fn stack_effect(&self) -> isize {
		match self {
			Self::PushImm(_) | Self::Push(_) => 1,
			Self::Pop(_) => -1,
			_ => 0,
		}
	}
}

impl fmt::Display for Asm {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::PushImm(imm) => write!(fmt, "push {imm}"),
			Self::Push(reg) => write!(fmt, "push {reg}"),
			Self::Pop(reg) => write!(fmt, "pop {reg}"),
			Self::Mov(dst, src) => write!(fmt, "mov {dst}, {src}"),
			Self::MovImm(dst, imm) => write!(fmt, "mov {dst}, {imm}"),
			Self::Load(dst, addr) => write!(fmt, "mov {dst}, [{addr}]"),
			Self::Store(addr, src) => write!(fmt, "mov [{addr}], {src}"),
			Self::Add(dst, src) => write!(fmt, "add {dst}, {src}"),
			Self::Sub(dst, src) => write!(fmt, "sub {dst}, {src}"),
			Self::SubImm(dst, imm) => write!(fmt, "sub {dst}, {imm}"),
			Self::IMul(dst, src) => write!(fmt, "imul {dst}, {src}"),
			Self::Cqo => write!(fmt, "cqo"),
			Self::IDiv(src) => write!(fmt, "idiv {src}"),
			Self::Cmp(lhs, rhs) => write!(fmt, "cmp {lhs}, {rhs}"),
			Self::Set(cc) => write!(fmt, "set{cc} al"),
			Self::MovZb => write!(fmt, "movzb rax, al"),
			Self::Ret => write!(fmt, "ret"),
		}
	}
}

#[cfg(test)]
mod display {
	use super::*;

	#[test]
	fn intel_syntax() {
		assert_eq!(Asm::PushImm(-3).to_string(), "push -3");
		assert_eq!(Asm::Mov(Reg::Rbp, Reg::Rsp).to_string(), "mov rbp, rsp");
		assert_eq!(Asm::MovImm(Reg::Rax, 1 << 40).to_string(), "mov rax, 1099511627776");
		assert_eq!(Asm::Load(Reg::Rax, Reg::Rax).to_string(), "mov rax, [rax]");
		assert_eq!(Asm::Store(Reg::Rax, Reg::Rdi).to_string(), "mov [rax], rdi");
		assert_eq!(Asm::SubImm(Reg::Rsp, 208).to_string(), "sub rsp, 208");
		assert_eq!(Asm::Set(Cond::Le).to_string(), "setle al");
		assert_eq!(Asm::Set(Cond::Eq).to_string(), "sete al");
		assert_eq!(Asm::MovZb.to_string(), "movzb rax, al");
	}

	#[test]
	fn stack_effects() {
		assert_eq!(Asm::PushImm(1).stack_effect(), 1);
		assert_eq!(Asm::Push(Reg::Rax).stack_effect(), 1);
		assert_eq!(Asm::Pop(Reg::Rdi).stack_effect(), -1);
		assert_eq!(Asm::Store(Reg::Rax, Reg::Rdi).stack_effect(), 0);
		assert_eq!(Asm::Ret.stack_effect(), 0);
	}
}
