// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Decimal literal parsing.
//!
//! A literal is parsed against a target type `(precision, scale)`: the
//! digits are accumulated into the unscaled integer at exactly `scale`
//! fractional digits, with excess fractional digits rounded half away
//! from zero (or truncated when `round` is unset).

use crate::error::DecimalParseError;
use crate::scale::POW10_I128;
use crate::value::{DecimalNative, DecimalValue};
use crate::MAX_UNSCALED_DECIMAL16;

/// The significant pieces of a decimal literal: the digit runs on either
/// side of the point, the decimal exponent, and the sign.
#[derive(Debug)]
struct Literal<'a> {
    negative: bool,
    integral: &'a [u8],
    fractional: &'a [u8],
    exp: i32,
}

/// Scans `[ws] [+-] digits [. digits] [eE [+-] digits] [ws]` in one
/// left-to-right pass over the bytes, rejecting anything else.
///
/// The exponent digits saturate at `i32::MAX` instead of being
/// range-checked here; an exponent that large always fails the magnitude
/// checks in [`accumulate`], which keeps all overflow decisions in one
/// place.
fn scan_literal(bytes: &[u8]) -> Result<Literal, DecimalParseError> {
    let mut pos = 0;
    while bytes.get(pos).map_or(false, |b| b.is_ascii_whitespace()) {
        pos += 1;
    }
    if pos == bytes.len() {
        return Err(DecimalParseError::empty());
    }

    let negative = match bytes[pos] {
        b'-' => {
            pos += 1;
            true
        }
        b'+' => {
            pos += 1;
            false
        }
        _ => false,
    };

    let integral_start = pos;
    while bytes.get(pos).map_or(false, |b| b.is_ascii_digit()) {
        pos += 1;
    }
    let integral = &bytes[integral_start..pos];

    let fractional = if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        let fractional_start = pos;
        while bytes.get(pos).map_or(false, |b| b.is_ascii_digit()) {
            pos += 1;
        }
        &bytes[fractional_start..pos]
    } else {
        &bytes[pos..pos]
    };

    if integral.is_empty() && fractional.is_empty() {
        return Err(DecimalParseError::invalid());
    }

    let mut exp: i32 = 0;
    if let Some(b'e') | Some(b'E') = bytes.get(pos) {
        pos += 1;
        let exp_negative = match bytes.get(pos) {
            Some(b'-') => {
                pos += 1;
                true
            }
            Some(b'+') => {
                pos += 1;
                false
            }
            _ => false,
        };
        let exp_start = pos;
        let mut magnitude: i64 = 0;
        while let Some(&d) = bytes.get(pos) {
            if !d.is_ascii_digit() {
                break;
            }
            magnitude = (magnitude * 10 + (d - b'0') as i64).min(i32::max_value() as i64);
            pos += 1;
        }
        if pos == exp_start {
            return Err(DecimalParseError::invalid());
        }
        exp = if exp_negative {
            -(magnitude as i32)
        } else {
            magnitude as i32
        };
    }

    while bytes.get(pos).map_or(false, |b| b.is_ascii_whitespace()) {
        pos += 1;
    }
    if pos != bytes.len() {
        return Err(DecimalParseError::invalid());
    }

    Ok(Literal {
        negative,
        integral,
        fractional,
        exp,
    })
}

/// Accumulates the digit sequence into the unscaled integer of a value at
/// `scale` fractional digits.
fn accumulate(
    literal: &Literal<'_>,
    precision: i32,
    scale: i32,
    round: bool,
) -> Result<i128, DecimalParseError> {
    // Index of the first digit that falls beyond the target scale, in the
    // concatenated integral ++ fractional digit sequence.
    let keep = literal.integral.len() as i64 + literal.exp as i64 + scale as i64;
    let total = (literal.integral.len() + literal.fractional.len()) as i64;

    let mut unscaled: i128 = 0;
    let mut boundary_digit: u8 = 0;
    for (i, &d) in literal
        .integral
        .iter()
        .chain(literal.fractional.iter())
        .enumerate()
    {
        let i = i as i64;
        if i < keep {
            // Reject a 39th significant digit before the multiplication
            // can leave the i128 range.
            if unscaled >= POW10_I128[37] {
                return Err(DecimalParseError::overflow());
            }
            unscaled = unscaled * 10 + (d - b'0') as i128;
        } else {
            if i == keep {
                boundary_digit = d - b'0';
            }
            break;
        }
    }

    // Digits stop short of the target scale: pad with zeros on the right.
    if keep > total {
        let shift = keep - total;
        if unscaled != 0 {
            if shift > 38 || unscaled > MAX_UNSCALED_DECIMAL16 / POW10_I128[shift as usize] {
                return Err(DecimalParseError::overflow());
            }
            unscaled *= POW10_I128[shift as usize];
        }
    } else if round && boundary_digit >= 5 {
        // Half away from zero; the sign is applied by the caller.
        unscaled += 1;
    }

    if unscaled >= POW10_I128[precision as usize] {
        return Err(DecimalParseError::overflow());
    }
    Ok(unscaled)
}

impl<T: DecimalNative> DecimalValue<T> {
    /// Parses a decimal literal as a value of type `(precision, scale)`.
    ///
    /// Accepts optional surrounding whitespace, an optional sign, digits
    /// with at most one decimal point, and an optional exponent. Excess
    /// fractional digits are rounded half away from zero when `round` is
    /// set and truncated otherwise. A value that does not fit the target
    /// type is an overflow error.
    pub fn parse_str(
        s: &str,
        precision: i32,
        scale: i32,
        round: bool,
    ) -> Result<Self, DecimalParseError> {
        debug_assert!(precision >= 1 && precision <= T::MAX_PRECISION);
        debug_assert!(scale >= 0 && scale <= precision);

        let literal = scan_literal(s.as_bytes())?;
        let unscaled = accumulate(&literal, precision, scale, round)?;
        let unscaled = if literal.negative { -unscaled } else { unscaled };
        Ok(DecimalValue::new(T::from_i128(unscaled)))
    }
}
