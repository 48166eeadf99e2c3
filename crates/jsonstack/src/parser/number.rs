//! Incremental number lexer.
//!
//! Validates the RFC 8259 number grammar one byte at a time and produces an
//! `f64` once a byte arrives that cannot extend the number. Two conversion
//! strategies are supported, see [`NumberPrecision`].
use alloc::vec::Vec;

use crate::{NumberPrecision, error::AllocError};

/// Negative powers of ten for the first sixteen fractional digits.
const PRECISION: [f64; 16] = [
    1e-1, 1e-2, 1e-3, 1e-4, 1e-5, 1e-6, 1e-7, 1e-8, 1e-9, 1e-10, 1e-11, 1e-12, 1e-13, 1e-14,
    1e-15, 1e-16,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    /// After a leading `-`.
    #[default]
    Sign,
    /// A lone leading `0`.
    Zero,
    Integer,
    /// After `.`, before the first fraction digit.
    Point,
    Fraction,
    /// After `e`/`E`.
    Exponent,
    ExponentSign,
    ExponentDigits,
}

impl State {
    /// States in which the number may end.
    fn is_complete(self) -> bool {
        matches!(
            self,
            Self::Zero | Self::Integer | Self::Fraction | Self::ExponentDigits
        )
    }
}

/// Result of offering one byte to the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStep {
    /// The byte was consumed.
    Continue,
    /// The byte does not belong to the number, which is complete. The byte
    /// still needs to be processed.
    End,
    /// The byte cannot follow what has been seen so far.
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct NumberAccumulator {
    state: State,
    precision: NumberPrecision,
    negative: bool,
    value: f64,
    fraction_digits: u8,
    exponent: u32,
    exponent_negative: bool,
    /// Validated number text, kept only for [`NumberPrecision::Exact`].
    text: Vec<u8>,
}

impl NumberAccumulator {
    pub fn new(precision: NumberPrecision) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    /// Starts a number at its first byte, a digit or `-`.
    pub fn start(&mut self, first: u8) -> Result<(), AllocError> {
        self.negative = false;
        self.value = 0.0;
        self.fraction_digits = 0;
        self.exponent = 0;
        self.exponent_negative = false;
        self.text.clear();
        self.state = State::Sign;
        if first == b'-' {
            self.negative = true;
            self.keep(first)
        } else {
            self.advance(first).map(|_| ())
        }
    }

    /// Feeds the next byte.
    pub fn step(&mut self, byte: u8) -> Result<NumberStep, AllocError> {
        self.advance(byte)
    }

    fn advance(&mut self, byte: u8) -> Result<NumberStep, AllocError> {
        let next = match (self.state, byte) {
            (State::Sign, b'0') => State::Zero,
            (State::Sign | State::Integer, b'1'..=b'9') | (State::Integer, b'0') => {
                self.value = self.value * 10.0 + f64::from(byte - b'0');
                State::Integer
            }
            (State::Zero | State::Integer, b'.') => State::Point,
            (State::Point | State::Fraction, b'0'..=b'9') => {
                if usize::from(self.fraction_digits) < PRECISION.len() {
                    self.value += f64::from(byte - b'0') * PRECISION[usize::from(self.fraction_digits)];
                    self.fraction_digits += 1;
                }
                State::Fraction
            }
            (State::Zero | State::Integer | State::Fraction, b'e' | b'E') => State::Exponent,
            (State::Exponent, b'+') => State::ExponentSign,
            (State::Exponent, b'-') => {
                self.exponent_negative = true;
                State::ExponentSign
            }
            (State::Exponent | State::ExponentSign | State::ExponentDigits, b'0'..=b'9') => {
                self.exponent = self
                    .exponent
                    .saturating_mul(10)
                    .saturating_add(u32::from(byte - b'0'));
                State::ExponentDigits
            }
            (state, _) if state.is_complete() => return Ok(NumberStep::End),
            _ => return Ok(NumberStep::Reject),
        };
        self.state = next;
        self.keep(byte)?;
        Ok(NumberStep::Continue)
    }

    fn keep(&mut self, byte: u8) -> Result<(), AllocError> {
        if self.precision == NumberPrecision::Exact {
            self.text.try_reserve(1)?;
            self.text.push(byte);
        }
        Ok(())
    }

    /// Whether the bytes seen so far form a complete number.
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// The final value. `None` if the number is incomplete.
    pub fn finish(&self) -> Option<f64> {
        if !self.is_complete() {
            return None;
        }
        match self.precision {
            NumberPrecision::Exact => core::str::from_utf8(&self.text).ok()?.parse().ok(),
            NumberPrecision::Accumulate => Some(self.accumulated()),
        }
    }

    fn accumulated(&self) -> f64 {
        let mut value = self.value;
        if self.exponent != 0 && value != 0.0 {
            let scale = 10f64.powi(i32::try_from(self.exponent).unwrap_or(i32::MAX));
            if self.exponent_negative {
                value /= scale;
            } else {
                value *= scale;
            }
        }
        if self.negative { -value } else { value }
    }
}
