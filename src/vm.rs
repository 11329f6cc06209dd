//! A model of the x86-64 subset in [`Asm`], enough to run generated code.
//!
//! `run` enters `main` with a sentinel return address on the stack and
//! returns `rax` once `ret` pops that sentinel. Stack memory is tracked per
//! 8-byte word; reading a word that was never written is an error.

use std::collections::HashMap;
use std::fmt;

use tracing::{instrument, trace};

use crate::asm::{Asm, Cond, Reg};
use crate::output::Output;

const STACK_TOP: i64 = 0x7fff_0000;
const RETURN_SENTINEL: i64 = 0x0dea_dbee;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	StackUnderflow(usize),
	Uninitialized(usize, i64),
	DivideByZero(usize),
	DivideOverflow(usize),
	NoFlags(usize),
	BadReturn(usize, i64),
	NoReturn,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::StackUnderflow(pc) => write!(fmt, "stack underflow @ {pc}"),
			Self::Uninitialized(pc, addr) => write!(fmt, "read of uninitialized word ${addr:08X} @ {pc}"),
			Self::DivideByZero(pc) => write!(fmt, "division by zero @ {pc}"),
			Self::DivideOverflow(pc) => write!(fmt, "division overflow @ {pc}"),
			Self::NoFlags(pc) => write!(fmt, "condition tested before any compare @ {pc}"),
			Self::BadReturn(pc, addr) => write!(fmt, "return to unknown address ${addr:08X} @ {pc}"),
			Self::NoReturn => write!(fmt, "ran past the last instruction"),
		}
	}
}

/// Run `output` as the body of `main` and return its result.
#[instrument(skip_all)]
pub fn run(output: &Output) -> Result<i64, Error> {
	let mut machine = Machine::default();
	machine.write(STACK_TOP - 8, RETURN_SENTINEL);
	machine.set(Reg::Rsp, STACK_TOP - 8);

	for (pc, asm) in output.instructions().iter().enumerate() {
		trace!("{pc:4}: {asm}");
		if let Some(result) = machine.step(pc, asm)? {
			return Ok(result);
		}
	}
	Err(Error::NoReturn)
}

#[derive(Debug, Default)]
struct Machine {
	regs: [i64; 5],
	memory: HashMap<i64, i64>,
	/// Operands of the last `cmp`.
	flags: Option<(i64, i64)>,
}

impl Machine {
	fn reg_index(reg: Reg) -> usize {
		match reg {
			Reg::Rax => 0,
			Reg::Rdi => 1,
			Reg::Rdx => 2,
			Reg::Rbp => 3,
			Reg::Rsp => 4,
		}
	}

	fn get(&self, reg: Reg) -> i64 {
		self.regs[Self::reg_index(reg)]
	}

	fn set(&mut self, reg: Reg, val: i64) {
		self.regs[Self::reg_index(reg)] = val;
	}

	fn read(&self, pc: usize, addr: i64) -> Result<i64, Error> {
		self.memory
			.get(&addr)
			.copied()
			.ok_or(Error::Uninitialized(pc, addr))
	}

	fn write(&mut self, addr: i64, val: i64) {
		self.memory.insert(addr, val);
	}

	fn push(&mut self, val: i64) {
		let rsp = self.get(Reg::Rsp) - 8;
		self.set(Reg::Rsp, rsp);
		self.write(rsp, val);
	}

	fn pop(&mut self, pc: usize) -> Result<i64, Error> {
		let rsp = self.get(Reg::Rsp);
		if rsp >= STACK_TOP {
			return Err(Error::StackUnderflow(pc));
		}
		let val = self.read(pc, rsp)?;
		self.set(Reg::Rsp, rsp + 8);
		Ok(val)
	}

	/// Execute one instruction; `Some` holds the result once `main` returns.
	fn step(&mut self, pc: usize, asm: &Asm) -> Result<Option<i64>, Error> {
		match *asm {
			Asm::PushImm(imm) => self.push(imm as i64),
			Asm::Push(reg) => self.push(self.get(reg)),
			Asm::Pop(reg) => {
				let val = self.pop(pc)?;
				self.set(reg, val);
			}
			Asm::Mov(dst, src) => self.set(dst, self.get(src)),
			Asm::MovImm(dst, imm) => self.set(dst, imm),
			Asm::Load(dst, addr) => {
				let val = self.read(pc, self.get(addr))?;
				self.set(dst, val);
			}
			Asm::Store(addr, src) => self.write(self.get(addr), self.get(src)),
			Asm::Add(dst, src) => self.set(dst, self.get(dst).wrapping_add(self.get(src))),
			Asm::Sub(dst, src) => self.set(dst, self.get(dst).wrapping_sub(self.get(src))),
			Asm::SubImm(dst, imm) => self.set(dst, self.get(dst).wrapping_sub(imm as i64)),
			Asm::IMul(dst, src) => self.set(dst, self.get(dst).wrapping_mul(self.get(src))),
			Asm::Cqo => self.set(Reg::Rdx, if self.get(Reg::Rax) < 0 { -1 } else { 0 }),
			Asm::IDiv(src) => {
				let divisor = self.get(src) as i128;
				if divisor == 0 {
					return Err(Error::DivideByZero(pc));
				}
				let dividend = ((self.get(Reg::Rdx) as i128) << 64) | (self.get(Reg::Rax) as u64 as i128);
				let quotient = i64::try_from(dividend / divisor)
					.map_err(|_| Error::DivideOverflow(pc))?;
				self.set(Reg::Rax, quotient);
				self.set(Reg::Rdx, (dividend % divisor) as i64);
			}
			Asm::Cmp(lhs, rhs) => self.flags = Some((self.get(lhs), self.get(rhs))),
			Asm::Set(cond) => {
				let (lhs, rhs) = self.flags.ok_or(Error::NoFlags(pc))?;
				let al = match cond {
					Cond::Eq => lhs == rhs,
					Cond::Ne => lhs != rhs,
					Cond::Lt => lhs < rhs,
					Cond::Le => lhs <= rhs,
				};
				self.set(Reg::Rax, (self.get(Reg::Rax) & !0xFF) | al as i64);
			}
			Asm::MovZb => self.set(Reg::Rax, self.get(Reg::Rax) & 0xFF),
			Asm::Ret => {
				let addr = self.pop(pc)?;
				if addr != RETURN_SENTINEL {
					return Err(Error::BadReturn(pc, addr));
				}
				return Ok(Some(self.get(Reg::Rax)));
			}
		}
		Ok(None)
	}
}
