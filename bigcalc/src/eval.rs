//! # Streaming Expression Evaluator
//!
//! An operator-precedence (shunting-yard) evaluator that reads one byte at
//! a time from a [`ChunkQueue`] and therefore never needs the complete
//! expression in memory. It owns two stacks:
//!
//! - a value stack of parsed operands,
//! - an operator stack whose bottom entry for every open bracket group is a
//!   marker ([`Oper::GroupStart`] / [`Oper::GroupNum`]) recording whether
//!   that group has produced an operand yet.
//!
//! Because the markers rank below every real operator, a reduction
//! triggered by `)` or the terminator unwinds exactly to the enclosing
//! bracket. A separate `have_operand` flag tracks whether an operand is
//! available to bind the next operator; it is what tells a subtraction sign
//! from a negative literal and rejects constructs like `1 + +`.
//!
//! The evaluator blocks only inside [`ChunkQueue::peek`], so it makes
//! forward progress on whatever the feeder has buffered and suspends when
//! it genuinely needs more input.

use crate::chunk::ChunkQueue;
use crate::oper::{classify, ByteClass, Oper};
use crate::value::Number;
use crate::CalcError;
use smartstring::alias::String;
use std::sync::Arc;

fn apply<V: Number>(oper: Oper, lhs: V, rhs: V) -> Result<V, CalcError> {
    if oper == Oper::Div && rhs.is_zero() {
        return Err(CalcError::DivisionByZero);
    }
    Ok(match oper {
        Oper::Add => lhs + rhs,
        Oper::Sub => lhs - rhs,
        Oper::Mul => lhs * rhs,
        Oper::Div => lhs / rhs,
        Oper::GroupStart | Oper::GroupNum | Oper::End => unreachable!(),
    })
}

/// One evaluation pass over one expression.
///
/// Consumed by [`Evaluator::run`], which returns the final value once the
/// terminator newline has been read, or the first error encountered.
pub struct Evaluator<V> {
    input: Arc<ChunkQueue>,
    opers: Vec<Oper>,
    values: Vec<V>,
    have_operand: bool,
}

impl<V: Number> Evaluator<V> {
    pub fn new(input: Arc<ChunkQueue>) -> Self {
        Self {
            input,
            opers: Vec::new(),
            values: Vec::new(),
            have_operand: false,
        }
    }

    /// Evaluates one newline-terminated expression from the input queue.
    ///
    /// Blocks whenever the buffered input runs out before the terminator.
    pub fn run(mut self) -> Result<V, CalcError> {
        self.opers.push(Oper::GroupStart);
        let mut finished = false;
        while !finished && !self.opers.is_empty() {
            finished = self.step()?;
        }

        let result = self.values.pop();
        if !self.opers.is_empty() || !self.values.is_empty() || !self.input.residue_is_blank() {
            return Err(CalcError::UnexpectedEnd);
        }
        result.ok_or(CalcError::UnexpectedEnd)
    }

    /// Dispatches on the byte under the cursor. Returns `true` once the
    /// terminator has been consumed.
    fn step(&mut self) -> Result<bool, CalcError> {
        let byte = self.input.peek()?;
        let class = classify(byte)?;
        log::trace!("dispatch {:?} as {:?}", byte as char, class);
        match class {
            ByteClass::Open => {
                self.opers.push(Oper::GroupStart);
                self.have_operand = false;
                self.input.advance();
            }
            ByteClass::Close => {
                self.close_group(false)?;
                self.have_operand = true;
                self.input.advance();
            }
            ByteClass::End => {
                self.close_group(true)?;
                self.input.advance();
                return Ok(true);
            }
            ByteClass::Digit => self.push_literal()?,
            // A minus with no operand to bind starts a negative literal;
            // the same position rejects every other operator.
            ByteClass::Math(_) if byte == b'-' && !self.have_operand => self.push_literal()?,
            ByteClass::Math(_) if !self.have_operand => return Err(CalcError::LeadingOperator),
            ByteClass::Math(oper) => {
                self.reduce(oper)?;
                self.opers.push(oper);
                self.have_operand = false;
                self.input.advance();
            }
            ByteClass::Space => self.input.advance(),
        }
        Ok(false)
    }

    fn push_literal(&mut self) -> Result<(), CalcError> {
        let value = self.parse_number()?;
        log::trace!("operand {:?}", value);
        self.values.push(value);
        self.mark_value()?;
        self.have_operand = true;
        Ok(())
    }

    /// Accumulates an optional sign and the following digits, leaving the
    /// cursor on the byte that ended the literal.
    ///
    /// Digits are read through the space-skipping peek, so a literal may
    /// straddle chunk boundaries (and interleaved spaces). When the digits
    /// run out at a chunk boundary this blocks, since only the next chunk
    /// can tell whether the literal continues.
    fn parse_number(&mut self) -> Result<V, CalcError> {
        let mut literal = String::new();
        let mut byte = self.input.peek()?;
        if byte == b'-' {
            literal.push('-');
            self.input.advance();
            byte = self.input.peek()?;
        }
        while classify(byte)? == ByteClass::Digit {
            literal.push(byte as char);
            self.input.advance();
            byte = self.input.peek()?;
        }
        if literal.is_empty() || literal == "-" {
            return Err(CalcError::InvalidNumber(literal));
        }
        V::from_decimal(&literal).ok_or_else(|| CalcError::InvalidNumber(literal))
    }

    /// Promotes a `GroupStart` on top of the operator stack to `GroupNum`
    /// after an operand landed in that group.
    fn mark_value(&mut self) -> Result<(), CalcError> {
        let Some(top) = self.opers.last_mut() else {
            return Err(CalcError::UnbalancedParens);
        };
        if *top == Oper::GroupStart {
            *top = Oper::GroupNum;
        }
        Ok(())
    }

    /// Pops and applies operators while the incoming one does not bind
    /// tighter, pushing each result back as an operand of the group it
    /// lands in.
    fn reduce(&mut self, incoming: Oper) -> Result<(), CalcError> {
        while let Some(&top) = self.opers.last() {
            if incoming.precedence() > top.precedence() {
                break;
            }
            self.opers.pop();
            let rhs = self.values.pop().ok_or(CalcError::MissingOperands)?;
            let lhs = self.values.pop().ok_or(CalcError::MissingOperands)?;
            let value = apply(top, lhs, rhs)?;
            log::trace!("{:?} reduced to {:?}", top, value);
            self.values.push(value);
            self.mark_value()?;
        }
        Ok(())
    }

    /// Fully reduces the innermost group for `)` or the terminator and pops
    /// its marker.
    fn close_group(&mut self, at_end: bool) -> Result<(), CalcError> {
        self.reduce(Oper::End)?;
        match self.opers.pop() {
            Some(Oper::GroupNum) => {}
            Some(Oper::GroupStart) if at_end => return Err(CalcError::UnexpectedEnd),
            Some(Oper::GroupStart) if self.opers.is_empty() => {
                // a ')' closing the outer expression has no matching '('
                return Err(CalcError::UnbalancedParens);
            }
            Some(Oper::GroupStart) => return Err(CalcError::EmptyGroup),
            _ => return Err(CalcError::UnbalancedParens),
        }
        if !at_end {
            self.mark_value()?;
        }
        Ok(())
    }
}
