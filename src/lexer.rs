use tracing::{instrument, trace};

use crate::diagnostic::{Error, Reason};
use crate::tokens::{Token, Type, PUNCTUATORS};

fn skip_while<I: Iterator<Item = (usize, char)>>(
	cur_idx: usize,
	chars: &mut std::iter::Peekable<I>,
	pred: fn(char) -> bool,
) -> usize {
	let mut end = cur_idx;
	while let Some(&(idx, ch)) = chars.peek() {
		if !pred(ch) {
			break;
		}
		end = idx + ch.len_utf8();
		chars.next();
	}
	end - cur_idx
}

fn punctuator(rest: &str) -> Option<&'static str> {
	PUNCTUATORS.into_iter().find(|op| rest.starts_with(op))
}

/// Split `input` into tokens, always ending with a single [`Type::End`].
#[instrument(skip_all)]
pub fn tokenize(input: &str) -> Result<Vec<Token>, Error> {
	let mut results = Vec::new();
	let mut chars = input.char_indices().peekable();

	while let Some(&(cur_idx, cur_char)) = chars.peek() {
		match cur_char {
			c if c.is_ascii_whitespace() => {
				chars.next();
				continue;
			}
			'0'..='9' => {
				let len = skip_while(cur_idx, &mut chars, |ch| ch.is_ascii_digit());
				let txt = &input[cur_idx..][..len];
				let num = txt
					.parse::<i64>()
					.map_err(|_| Error::at(input, cur_idx, len, Reason::NumberTooLarge))?;
				results.push(Token::new(Type::Num(num), cur_idx, len));
			}
			'a'..='z' => {
				chars.next();
				results.push(Token::new(Type::Ident(cur_char), cur_idx, 1));
			}
			c => {
				let Some(op) = punctuator(&input[cur_idx..]) else {
					return Err(Error::at(input, cur_idx, c.len_utf8(), Reason::InvalidToken(c)));
				};
				// punctuators are ASCII, one char per byte
				for _ in 0..op.len() {
					chars.next();
				}
				results.push(Token::new(Type::Reserved(op), cur_idx, op.len()));
			}
		}
		if let Some(tok) = results.last() {
			trace!("lexed {tok:?}");
		}
	}

	results.push(Token::new(Type::End, input.len(), 0));
	Ok(results)
}

#[cfg(test)]
mod can_lex {
	use super::*;

	type TestResult = Result<(), Error>;

	fn types(input: &str) -> Result<Vec<Type>, Error> {
		Ok(tokenize(input)?.into_iter().map(|tok| tok.tt).collect())
	}

	#[test]
	fn empty() -> TestResult {
		let out = tokenize("")?;
		assert_eq!(out, vec![Token::new(Type::End, 0, 0)]);
		Ok(())
	}

	#[test]
	fn whitespace_only() -> TestResult {
		let out = tokenize(" \t\n ")?;
		assert_eq!(out, vec![Token::new(Type::End, 4, 0)]);
		Ok(())
	}

	#[test]
	fn number() -> TestResult {
		let out = tokenize("345")?;
		assert_eq!(out[0], Token::new(Type::Num(345), 0, 3));
		assert_eq!(out[1], Type::End);
		Ok(())
	}

	#[test]
	fn number_no_mid_dash() -> TestResult {
		assert_eq!(types("2-3")?, vec![
			Type::Num(2),
			Type::Reserved("-"),
			Type::Num(3),
			Type::End,
		]);
		Ok(())
	}

	#[test]
	fn ident_is_one_letter() -> TestResult {
		let out = tokenize("ab")?;
		assert_eq!(out[0], Token::new(Type::Ident('a'), 0, 1));
		assert_eq!(out[1], Token::new(Type::Ident('b'), 1, 1));
		assert_eq!(out[2], Type::End);
		Ok(())
	}

	#[test]
	fn two_char_ops_first() -> TestResult {
		assert_eq!(types("a==b!=c<=d>=e")?, vec![
			Type::Ident('a'),
			Type::Reserved("=="),
			Type::Ident('b'),
			Type::Reserved("!="),
			Type::Ident('c'),
			Type::Reserved("<="),
			Type::Ident('d'),
			Type::Reserved(">="),
			Type::Ident('e'),
			Type::End,
		]);
		Ok(())
	}

	#[test]
	fn split_assign_from_eq() -> TestResult {
		assert_eq!(types("a = = 1")?, vec![
			Type::Ident('a'),
			Type::Reserved("="),
			Type::Reserved("="),
			Type::Num(1),
			Type::End,
		]);
		Ok(())
	}

	#[test]
	fn single_char_ops() -> TestResult {
		let out = types("+-*/<>()=;")?;
		let ops: Vec<_> = "+-*/<>()=;"
			.chars()
			.map(|c| Type::Reserved(punctuator(&c.to_string()).unwrap()))
			.chain([Type::End])
			.collect();
		assert_eq!(out, ops);
		Ok(())
	}

	#[test]
	fn positions() -> TestResult {
		let out = tokenize(" a = 12 ;")?;
		let pos: Vec<_> = out.iter().map(|tok| (tok.idx, tok.len)).collect();
		assert_eq!(pos, vec![(1, 1), (3, 1), (5, 2), (8, 1), (9, 0)]);
		Ok(())
	}

	#[test]
	fn statement() -> TestResult {
		assert_eq!(types("a=b=4;")?, vec![
			Type::Ident('a'),
			Type::Reserved("="),
			Type::Ident('b'),
			Type::Reserved("="),
			Type::Num(4),
			Type::Reserved(";"),
			Type::End,
		]);
		Ok(())
	}

	#[test]
	#[should_panic(expected = "1 + A;\n    ^ invalid token 'A'")]
	fn uppercase_rejected() {
		if let Err(e) = tokenize("1 + A;") {
			panic!("{e}");
		}
	}

	#[test]
	#[should_panic(expected = "1!2;\n ^ invalid token '!'")]
	fn lone_bang_rejected() {
		if let Err(e) = tokenize("1!2;") {
			panic!("{e}");
		}
	}

	#[test]
	fn non_ascii_offset() {
		let err = tokenize("1+é").unwrap_err();
		assert_eq!(err.offset(), 2);
		assert_eq!(err.reason(), &Reason::InvalidToken('é'));
	}

	#[test]
	fn number_overflow() {
		let err = tokenize("1+99999999999999999999;").unwrap_err();
		assert_eq!(err.offset(), 2);
		assert_eq!(err.reason(), &Reason::NumberTooLarge);
	}

	#[test]
	fn number_i64_max() -> TestResult {
		assert_eq!(types("9223372036854775807")?[0], Type::Num(i64::MAX));
		Ok(())
	}
}
