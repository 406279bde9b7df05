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

//! Fixed-width decimal values.
//!
//! A `DecimalValue<T>` stores only the unscaled integer; precision and
//! scale live in the column metadata and are passed into every operation
//! that needs them. Two mathematically equal numbers at different scales
//! therefore have different unscaled values.

use crate::hash::murmur_hash64a;
use crate::int256::Int256;
use crate::scale::{scale_down_and_round, ScaleInt, POW10_F64, POW10_I128, POW10_I64};
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::ops::{Mul, Neg, Sub};

/// Backing integer of a fixed-width decimal value.
///
/// Implemented for `i32`, `i64` and `i128` (storage widths 4, 8 and 16
/// bytes). The trait is sealed; the kernel's correctness depends on the
/// exact set of widths.
pub trait DecimalNative:
    ScaleInt
    + Eq
    + Ord
    + Hash
    + fmt::Debug
    + fmt::Display
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// Storage width in bytes.
    const WIDTH: usize;
    /// Largest number of decimal digits this width can hold.
    const MAX_PRECISION: i32;
    /// `10^MAX_PRECISION - 1`.
    const MAX_UNSCALED: Self;
    const ZERO: Self;
    const ONE: Self;

    /// Truncating construction; the caller guarantees the value fits.
    fn from_i128(v: i128) -> Self;
    fn to_i128(self) -> i128;
    /// Truncating cast; the caller guarantees the value is in range.
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
    /// Three-way comparison of two values at possibly different scales,
    /// computed in the next-wider integer so rescaling cannot overflow.
    fn cmp_scaled(x: Self, x_scale: i32, y: Self, y_scale: i32) -> Ordering;
    /// Seeded hash over the raw little-endian bytes.
    fn hash_raw(self, seed: u64) -> u64;
}

macro_rules! impl_decimal_native {
    ($t: ty, $width: expr, $max_precision: expr, $wide: ty, $wide_table: expr) => {
        impl DecimalNative for $t {
            const WIDTH: usize = $width;
            const MAX_PRECISION: i32 = $max_precision;
            const MAX_UNSCALED: $t = <$t>::pow(10, $max_precision) - 1;
            const ZERO: $t = 0;
            const ONE: $t = 1;

            #[inline]
            fn from_i128(v: i128) -> $t {
                v as $t
            }

            #[inline]
            fn to_i128(self) -> i128 {
                self as i128
            }

            #[inline]
            fn from_f64(v: f64) -> $t {
                v as $t
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            fn cmp_scaled(x: $t, x_scale: i32, y: $t, y_scale: i32) -> Ordering {
                let delta_scale = x_scale - y_scale;
                let x = x as $wide;
                let y = y as $wide;
                // The wider type fits any value of this width scaled all
                // the way up, so rescaling cannot overflow.
                if delta_scale > 0 {
                    x.cmp(&(y * $wide_table[delta_scale as usize]))
                } else if delta_scale < 0 {
                    (x * $wide_table[-delta_scale as usize]).cmp(&y)
                } else {
                    x.cmp(&y)
                }
            }

            #[inline]
            fn hash_raw(self, seed: u64) -> u64 {
                murmur_hash64a(&self.to_le_bytes(), seed)
            }
        }
    };
}

impl_decimal_native!(i32, 4, 9, i64, POW10_I64);
impl_decimal_native!(i64, 8, 18, i128, POW10_I128);

impl DecimalNative for i128 {
    const WIDTH: usize = 16;
    const MAX_PRECISION: i32 = 38;
    const MAX_UNSCALED: i128 = i128::pow(10, 38) - 1;
    const ZERO: i128 = 0;
    const ONE: i128 = 1;

    #[inline]
    fn from_i128(v: i128) -> i128 {
        v
    }

    #[inline]
    fn to_i128(self) -> i128 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> i128 {
        v as i128
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn cmp_scaled(x: i128, x_scale: i32, y: i128, y_scale: i32) -> Ordering {
        let delta_scale = x_scale - y_scale;
        let x = Int256::from_i128(x);
        let y = Int256::from_i128(y);
        if delta_scale > 0 {
            x.cmp(&(y * Int256::pow10(delta_scale)))
        } else if delta_scale < 0 {
            (x * Int256::pow10(-delta_scale)).cmp(&y)
        } else {
            x.cmp(&y)
        }
    }

    #[inline]
    fn hash_raw(self, seed: u64) -> u64 {
        murmur_hash64a(&self.to_le_bytes(), seed)
    }
}

/// A fixed-width decimal value: the unscaled integer of a `DECIMAL(p, s)`
/// column cell. Immutable plain data; operations build fresh values.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecimalValue<T: DecimalNative> {
    value: T,
}

/// 4-byte decimal, up to 9 digits.
pub type Decimal4 = DecimalValue<i32>;
/// 8-byte decimal, up to 18 digits.
pub type Decimal8 = DecimalValue<i64>;
/// 16-byte decimal, up to 38 digits.
pub type Decimal16 = DecimalValue<i128>;

impl<T: DecimalNative> Default for DecimalValue<T> {
    #[inline]
    fn default() -> Self {
        DecimalValue { value: T::ZERO }
    }
}

impl<T: DecimalNative> DecimalValue<T> {
    /// Wraps an unscaled integer.
    #[inline]
    pub fn new(value: T) -> Self {
        DecimalValue { value }
    }

    /// The unscaled integer.
    #[inline]
    pub fn value(self) -> T {
        self.value
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.value == T::ZERO
    }

    #[inline]
    pub fn abs(self) -> Self {
        DecimalValue::new(self.value.abs_value())
    }

    /// Digits left of the decimal point, truncated toward zero; keeps the
    /// value's sign.
    #[inline]
    pub fn whole_part(self, scale: i32) -> T {
        self.value / T::scale_multiplier(scale)
    }

    /// Digits right of the decimal point, as a non-negative integer.
    #[inline]
    pub fn fractional_part(self, scale: i32) -> T {
        self.value.abs_value() % T::scale_multiplier(scale)
    }

    /// Builds a value of type `(precision, scale)` from an integer,
    /// flagging `overflow` when `i` has more than `precision - scale`
    /// digits.
    pub fn from_int(precision: i32, scale: i32, i: i64, overflow: &mut bool) -> Self {
        let max_whole = POW10_I128[(precision - scale) as usize];
        if (i as i128).abs() >= max_whole {
            *overflow = true;
            return Self::default();
        }
        DecimalValue::new(T::from_i128(i as i128 * POW10_I128[scale as usize]))
    }

    /// Builds a value of type `(precision, scale)` from a double.
    ///
    /// The scaling multiplication is performed in `f64` and is not exact;
    /// near `10^precision` the lost precision can tip the result into
    /// overflow. `NaN` and out-of-range magnitudes flag `overflow`.
    pub fn from_double(precision: i32, scale: i32, d: f64, round: bool, overflow: &mut bool) -> Self {
        let mut d = d * POW10_F64[scale as usize];
        if round {
            d = d.round();
        }
        let max_value = POW10_F64[precision as usize];
        if d.is_nan() || d.abs() >= max_value {
            *overflow = true;
            return Self::default();
        }
        // Truncation toward zero happens in the cast.
        DecimalValue::new(T::from_f64(d))
    }

    /// The value rounded half away from zero to an integer, in `i128`.
    #[inline]
    fn to_rounded_whole(self, scale: i32) -> i128 {
        let v = self.value.to_i128();
        if scale == 0 {
            v
        } else {
            scale_down_and_round(v, scale, true)
        }
    }

    /// Rounds to an `i64`, flagging `overflow` when the result exceeds the
    /// target range.
    pub fn to_i64(self, scale: i32, overflow: &mut bool) -> i64 {
        let result = self.to_rounded_whole(scale);
        *overflow |= result > i64::max_value() as i128 || result < i64::min_value() as i128;
        result as i64
    }

    /// Rounds to an `i32`, flagging `overflow` when the result exceeds the
    /// target range.
    pub fn to_i32(self, scale: i32, overflow: &mut bool) -> i32 {
        let result = self.to_rounded_whole(scale);
        *overflow |= result > i32::max_value() as i128 || result < i32::min_value() as i128;
        result as i32
    }

    /// The approximate `f64` value; loss of precision is tolerated.
    #[inline]
    pub fn to_double(self, scale: i32) -> f64 {
        self.value.to_f64() / POW10_F64[scale as usize]
    }

    /// Adjusts the value from `src_scale` to `dst_scale`, truncating when
    /// scaling down and flagging `overflow` against `10^dst_precision`.
    /// Scaling up can overflow even though the abstract number is
    /// unchanged, because the destination precision may be narrower.
    pub fn scale_to(
        self,
        src_scale: i32,
        dst_scale: i32,
        dst_precision: i32,
        overflow: &mut bool,
    ) -> Self {
        let delta_scale = src_scale - dst_scale;
        let mut result = self.value;
        let max_value = T::scale_multiplier(dst_precision);
        if delta_scale >= 0 {
            if delta_scale != 0 {
                result = result / T::scale_multiplier(delta_scale);
            }
            *overflow |= result.abs_value() >= max_value;
        } else {
            let mult = T::scale_multiplier(-delta_scale);
            if result.abs_value() >= max_value / mult {
                *overflow = true;
            } else {
                result = result * mult;
            }
        }
        DecimalValue::new(result)
    }

    /// Renders the exact decimal text for type `(precision, scale)`:
    /// optional leading `-`, at least one digit left of the point, and
    /// exactly `scale` fractional digits.
    pub fn to_string(self, precision: i32, scale: i32) -> String {
        debug_assert!(scale >= 0 && scale <= precision && precision <= T::MAX_PRECISION);
        let negative = self.value < T::ZERO;
        let mut remaining = self.value.abs_value().to_i128();

        // Worst-case layout: every digit of the precision, a decimal
        // point, a leading zero when there is no whole part, and a sign.
        let capacity = precision
            + (scale > 0) as i32
            + (scale == precision) as i32
            + negative as i32;
        let mut buf = vec![b'0'; capacity as usize];
        let mut idx = buf.len();
        let first_digit_idx = negative as usize;

        if scale > 0 {
            let mut remaining_scale = scale;
            while remaining_scale > 0 {
                idx -= 1;
                buf[idx] = b'0' + (remaining % 10) as u8;
                remaining /= 10;
                remaining_scale -= 1;
            }
            idx -= 1;
            buf[idx] = b'.';
            debug_assert!(idx > first_digit_idx, "no space left for the whole part");
        }
        loop {
            idx -= 1;
            buf[idx] = b'0' + (remaining % 10) as u8;
            remaining /= 10;
            if remaining == 0 {
                if idx > first_digit_idx {
                    buf.drain(..idx - first_digit_idx);
                }
                break;
            }
            if idx == first_digit_idx {
                break;
            }
        }
        if negative {
            buf[0] = b'-';
        }
        // The buffer only ever holds ASCII digits, '.', '-'.
        unsafe { String::from_utf8_unchecked(buf) }
    }

    /// Seeded hash over the raw bytes of the unscaled integer. Hashes are
    /// not comparable across storage widths.
    #[inline]
    pub fn hash(self, seed: u64) -> u64 {
        self.value.hash_raw(seed)
    }
}
