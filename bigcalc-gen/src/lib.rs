//! Expression generators for exercising the calculator service.
//!
//! [`generate_expression`] emits a random well-formed expression of roughly
//! the requested byte size. [`repeat_expression`] stretches a seed
//! expression to a target size by chaining copies with alternating `-` and
//! `+`; with a bracketed seed the result evaluates to the seed's value (odd
//! repeat count) or zero (even), which makes it handy for soak-testing the
//! evaluator at any size.

use anyhow::{ensure, Result};
use rand::Rng;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Number,
    Open,
    Close,
    Math,
}

fn random_number<R: Rng>(rng: &mut R) -> String {
    // never zero, so a generated divisor is always safe
    rng.gen_range(1..=i32::MAX).to_string()
}

fn random_math<R: Rng>(rng: &mut R) -> &'static str {
    match rng.gen_range(0..4) {
        0 => "+",
        1 => "-",
        2 => "*",
        _ => "/",
    }
}

/// What may legally follow `prev`. Groups only close once they contain an
/// operator, which keeps `(x)`-noise down and `()` impossible.
fn next_action<R: Rng>(rng: &mut R, prev: Action, can_close: bool) -> Action {
    match prev {
        Action::Open => Action::Number,
        Action::Number | Action::Close => {
            if can_close && rng.gen() {
                Action::Close
            } else {
                Action::Math
            }
        }
        Action::Math => {
            if rng.gen() {
                Action::Open
            } else {
                Action::Number
            }
        }
    }
}

/// Writes a random newline-terminated expression of approximately
/// `approx_max_size` bytes.
///
/// Every emitted expression is well-formed and evaluates without error: a
/// `/` is always followed by the literal `1`, and all open groups are
/// closed before the terminator.
pub fn generate_expression<W: Write>(out: &mut W, approx_max_size: u64) -> Result<()> {
    ensure!(approx_max_size >= 3, "max size should be at least 3");

    let mut rng = rand::thread_rng();
    let mut size: u64 = 0;
    // one entry per open group: has it received an operator yet?
    let mut groups: Vec<bool> = Vec::new();
    let mut prev = Action::Number;
    let mut next = if rng.gen() { Action::Number } else { Action::Open };

    while size < approx_max_size.saturating_sub(groups.len() as u64) {
        match next {
            Action::Open => groups.push(false),
            Action::Close => {
                groups.pop();
            }
            Action::Math => {
                if let Some(top) = groups.last_mut() {
                    *top = true;
                }
            }
            Action::Number => {}
        }

        let token = match next {
            Action::Number => random_number(&mut rng),
            Action::Open => String::from("("),
            Action::Close => String::from(")"),
            Action::Math => String::from(random_math(&mut rng)),
        };
        out.write_all(token.as_bytes())?;
        size += token.len() as u64;

        if token == "/" {
            out.write_all(b"1")?;
            next = Action::Number;
        }
        prev = next;

        let can_close = groups.last().copied().unwrap_or(false);
        next = next_action(&mut rng, prev, can_close);
    }

    // never end on a dangling operator or a bare bracket
    if prev == Action::Math || prev == Action::Open {
        out.write_all(random_number(&mut rng).as_bytes())?;
    }
    for _ in 0..groups.len() {
        out.write_all(b")")?;
    }
    out.write_all(b"\n")?;
    log::debug!("generated roughly {size} bytes");
    Ok(())
}

/// Writes `seed` repeated up to approximately `approx_size` bytes, joined
/// with alternating `-` and `+`, newline-terminated.
pub fn repeat_expression<W: Write>(out: &mut W, seed: &str, approx_size: u64) -> Result<()> {
    let seed = seed.trim();
    ensure!(!seed.is_empty(), "seed expression is empty");

    let repeats = approx_size / (seed.len() as u64 + 1);
    ensure!(repeats > 0, "target size fits no copy of the seed");

    for i in 0..repeats {
        out.write_all(seed.as_bytes())?;
        if i + 1 != repeats {
            out.write_all(if i % 2 == 0 { b"-" } else { b"+" })?;
        }
    }
    out.write_all(b"\n")?;
    Ok(())
}
