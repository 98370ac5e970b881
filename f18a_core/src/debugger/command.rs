//! Debugger command grammar.
//!
//! Commands are matched by unambiguous case-insensitive prefix: a token is
//! accepted for an entry `(min, full)` when `min` is a prefix of the token
//! and the token is a prefix of `full`. So `s`, `st` and `step` all mean
//! step, while `c` on its own is rejected (it does not reach `con`).

use nom::IResult;
use nom::IResult::*;

#[derive(Debug, PartialEq)]
pub enum Command {
    Help,
    Continue,
    Step(u32),
    Dump,
    PrintMem { addr: u32, len: u32 },
    Quit,
}

fn prefix(pre: &str, full: &str) -> bool {
    pre.len() <= full.len()
        && pre
            .chars()
            .zip(full.chars())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
}

fn matches(tok: &str, min: &str, full: &str) -> bool {
    prefix(min, tok) && prefix(tok, full)
}

impl Command {
    /// Parse one input line. Extra trailing tokens are ignored, as the
    /// original debugger's tokenizer did.
    pub fn parse(input: &str) -> Result<Command, String> {
        let mut tokens = input.split_whitespace();
        let tok = match tokens.next() {
            Some(tok) => tok,
            None => return Err("empty command".to_string()),
        };

        if matches(tok, "h", "help") || matches(tok, "?", "?") {
            Ok(Command::Help)
        } else if matches(tok, "con", "continue") {
            Ok(Command::Continue)
        } else if matches(tok, "s", "step") {
            let steps = match tokens.next() {
                None => 1,
                Some(arg) => dec_literal(arg)
                    .ok_or_else(|| "argument to 'step' must be a decimal number".to_string())?,
            };
            Ok(Command::Step(steps))
        } else if matches(tok, "d", "dump") {
            Ok(Command::Dump)
        } else if matches(tok, "p", "print") {
            let arg = tokens
                .next()
                .ok_or_else(|| "print requires an argument".to_string())?;
            let addr = hex_literal(arg).ok_or_else(|| {
                format!("addr argument to 'print' must be a hex number: {}", arg)
            })?;
            let len = match tokens.next() {
                None => 1,
                Some(arg) => dec_literal(arg)
                    .ok_or_else(|| "len argument to 'print' must be a decimal number".to_string())?,
            };
            Ok(Command::PrintMem { addr, len })
        } else if matches(tok, "e", "exit") || matches(tok, "q", "quit") {
            Ok(Command::Quit)
        } else {
            Err(format!("unrecognized or ambiguous command: {}", tok))
        }
    }
}

/// A full-token hex literal, with or without a 0x/$ prefix.
fn hex_literal(tok: &str) -> Option<u32> {
    match parse_hex_literal(tok.as_bytes()) {
        Done(rest, value) if rest.is_empty() => Some(value),
        _ => None,
    }
}

/// A full-token decimal literal.
fn dec_literal(tok: &str) -> Option<u32> {
    match dec_u32(tok.as_bytes()) {
        Done(rest, value) if rest.is_empty() => Some(value),
        _ => None,
    }
}

named!(
    parse_hex_literal<u32>,
    preceded!(
        opt!(complete!(alt_complete!(tag!("0x") | tag!("$")))),
        hex_u32
    )
);

// Modified version of nom's built-in hex_u32 parser: case-insensitive and
// capped at 8 digits.
fn hex_u32(input: &[u8]) -> IResult<&[u8], u32> {
    match is_a!(input, &b"0123456789abcdefABCDEF"[..]) {
        Error(e) => Error(e),
        Incomplete(e) => Incomplete(e),
        Done(i, o) => {
            let mut res = 0u32;

            let mut remaining = i;
            let mut parsed = o;
            if o.len() > 8 {
                remaining = &input[8..];
                parsed = &input[..8];
            }

            for &e in parsed {
                let digit = e as char;
                let value = digit.to_digit(16).unwrap_or(0);
                res = value + (res << 4);
            }
            Done(remaining, res)
        }
    }
}

fn dec_u32(input: &[u8]) -> IResult<&[u8], u32> {
    match is_a!(input, &b"0123456789"[..]) {
        Error(e) => Error(e),
        Incomplete(e) => Incomplete(e),
        Done(i, o) => {
            let mut res = 0u32;
            for &e in o {
                let digit = e as char;
                let value = digit.to_digit(10).unwrap_or(0);
                res = res.wrapping_mul(10).wrapping_add(value);
            }
            Done(i, res)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_letter_prefixes() {
        assert_eq!(Command::parse("s"), Ok(Command::Step(1)));
        assert_eq!(Command::parse("d"), Ok(Command::Dump));
        assert_eq!(Command::parse("h"), Ok(Command::Help));
        assert_eq!(Command::parse("?"), Ok(Command::Help));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
        assert_eq!(Command::parse("e"), Ok(Command::Quit));
    }

    #[test]
    fn longer_prefixes_and_full_words() {
        assert_eq!(Command::parse("step"), Ok(Command::Step(1)));
        assert_eq!(Command::parse("ste 4"), Ok(Command::Step(4)));
        assert_eq!(Command::parse("con"), Ok(Command::Continue));
        assert_eq!(Command::parse("continue"), Ok(Command::Continue));
        assert_eq!(Command::parse("DUMP"), Ok(Command::Dump));
    }

    #[test]
    fn ambiguous_or_unknown_tokens_rejected() {
        // "c" stops short of the documented minimum "con".
        assert!(Command::parse("c").is_err());
        assert!(Command::parse("co").is_err());
        assert!(Command::parse("steps").is_err());
        assert!(Command::parse("xyzzy").is_err());
    }

    #[test]
    fn step_takes_a_decimal_count() {
        assert_eq!(Command::parse("s 12"), Ok(Command::Step(12)));
        assert!(Command::parse("s twelve").is_err());
        assert!(Command::parse("s 0x10").is_err());
    }

    #[test]
    fn print_parses_hex_addr_and_decimal_len() {
        assert_eq!(
            Command::parse("p 15d"),
            Ok(Command::PrintMem { addr: 0x15D, len: 1 })
        );
        assert_eq!(
            Command::parse("print 0x80 16"),
            Ok(Command::PrintMem { addr: 0x80, len: 16 })
        );
        assert_eq!(
            Command::parse("p $FF 2"),
            Ok(Command::PrintMem { addr: 0xFF, len: 2 })
        );
        assert!(Command::parse("p").is_err());
        assert!(Command::parse("p zz").is_err());
        assert!(Command::parse("p 10 ten").is_err());
    }

    #[test]
    fn case_insensitive_matching() {
        assert_eq!(Command::parse("S"), Ok(Command::Step(1)));
        assert_eq!(Command::parse("CoN"), Ok(Command::Continue));
        assert_eq!(Command::parse("Print 1f"), Ok(Command::PrintMem { addr: 0x1F, len: 1 }));
    }
}
