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

//! Decimal arithmetic.
//!
//! Every operation consumes two operand values with their scales, the
//! result type `(precision, scale)` and a rounding flag, and produces a
//! value plus overflow/NaN flags. Flags are only ever set, never cleared,
//! so callers can OR results across bulk loops.
//!
//! The caller's planner is trusted to supply result types consistent with
//! SQL promotion rules; the assertions below document those contracts.

use crate::int256::Int256;
use crate::scale::{scale_down_and_round, FLOOR_LOG2_POW10, MAX_UNSCALED_QUOTIENT, POW10_I128};
use crate::value::{DecimalNative, DecimalValue};
use crate::{MAX_PRECISION, MAX_UNSCALED_DECIMAL16};
use std::cmp::{self, Ordering};

/// Both operands must fit with this many leading zero bits after scale
/// alignment for the 16-byte add fast path: the sum then keeps two leading
/// zeros and `2^126 < 10^38` bounds it within the decimal range.
const ADD_MIN_LZ: i32 = 3;

#[inline]
fn leading_zeros_abs(v: i128) -> i32 {
    v.unsigned_abs().leading_zeros() as i32
}

/// Minimum number of leading zeros a value with `num_lz` of them keeps
/// after multiplication by `10^scale_diff`, via
/// `Lz(a * b) >= Lz(a) - floor(log2(b)) - 1`.
#[inline]
fn min_leading_zeros_after_scaling(num_lz: i32, scale_diff: i32) -> i32 {
    debug_assert!(scale_diff >= 0);
    num_lz - FLOOR_LOG2_POW10[scale_diff as usize] - 1
}

/// Minimum number of leading zeros `x` or `y` keeps after the lower-scale
/// one is rescaled to match the other.
fn min_leading_zeros(x: i128, x_scale: i32, y: i128, y_scale: i32) -> i32 {
    let mut x_lz = leading_zeros_abs(x);
    let mut y_lz = leading_zeros_abs(y);
    if x_scale < y_scale {
        x_lz = min_leading_zeros_after_scaling(x_lz, y_scale - x_scale);
    } else if x_scale > y_scale {
        y_lz = min_leading_zeros_after_scaling(y_lz, x_scale - y_scale);
    }
    cmp::min(x_lz, y_lz)
}

/// Rescales both operands to `max(x_scale, y_scale)` in the result width.
///
/// Returns `true` instead of multiplying when the rescale would leave the
/// 38-digit range, which is only possible in the full-precision 16-byte
/// case; the quotient table makes that check a single comparison.
fn adjust_to_same_scale<T: DecimalNative>(
    x: DecimalValue<T>,
    x_scale: i32,
    y: DecimalValue<T>,
    y_scale: i32,
    result_precision: i32,
    x_scaled: &mut T,
    y_scaled: &mut T,
) -> bool {
    let delta_scale = x_scale - y_scale;
    if delta_scale == 0 {
        *x_scaled = x.value();
        *y_scaled = y.value();
    } else if delta_scale > 0 {
        if T::WIDTH == 16
            && result_precision == MAX_PRECISION
            && MAX_UNSCALED_QUOTIENT[delta_scale as usize] < y.value().abs_value().to_i128()
        {
            return true;
        }
        *x_scaled = x.value();
        *y_scaled = y.value() * T::scale_multiplier(delta_scale);
    } else {
        if T::WIDTH == 16
            && result_precision == MAX_PRECISION
            && MAX_UNSCALED_QUOTIENT[-delta_scale as usize] < x.value().abs_value().to_i128()
        {
            return true;
        }
        *x_scaled = x.value() * T::scale_multiplier(-delta_scale);
        *y_scaled = y.value();
    }
    false
}

/// Splits `x` and `y` into whole and fractional parts at their own scales,
/// then rescales the fractional part of the lower-scale operand so both
/// fractionals share `max(x_scale, y_scale)`.
fn separate_fractional(
    x: i128,
    x_scale: i32,
    y: i128,
    y_scale: i32,
) -> (i128, i128, i128, i128) {
    let x_mult = POW10_I128[x_scale as usize];
    let y_mult = POW10_I128[y_scale as usize];
    let x_left = x / x_mult;
    let y_left = y / y_mult;
    let mut x_right = x % x_mult;
    let mut y_right = y % y_mult;
    if x_scale < y_scale {
        x_right *= POW10_I128[(y_scale - x_scale) as usize];
    } else {
        y_right *= POW10_I128[(x_scale - y_scale) as usize];
    }
    (x_left, x_right, y_left, y_right)
}

/// Adds values too large for the aligned fast path. Both must be
/// non-negative; the sum is assembled from separately added whole and
/// fractional parts so everything stays within 128 bits.
fn add_large(
    x: i128,
    x_scale: i32,
    y: i128,
    y_scale: i32,
    result_scale: i32,
    round: bool,
    overflow: &mut bool,
) -> i128 {
    debug_assert!(x >= 0 && y >= 0);

    let (x_left, x_right, y_left, y_right) = separate_fractional(x, x_scale, y, y_scale);
    debug_assert!(x_left >= 0 && y_left >= 0 && x_right >= 0 && y_right >= 0);

    let max_scale = cmp::max(x_scale, y_scale);
    let result_scale_decrease = max_scale - result_scale;
    debug_assert!(result_scale_decrease >= 0);

    // A carry of one whole unit when the fractional parts alone add up to
    // `10^max_scale` or more.
    let frac_mult = POW10_I128[max_scale as usize];
    let mut carry_to_left: i128 = 0;
    let mut right = if x_right >= frac_mult - y_right {
        carry_to_left = 1;
        x_right - frac_mult + y_right
    } else {
        x_right + y_right
    };
    if result_scale_decrease > 0 {
        right = scale_down_and_round(right, result_scale_decrease, round);
    }
    debug_assert!(right >= 0);
    // Rounding can push `right` up to exactly `10^result_scale`; leaving
    // it there is equivalent to carrying one more unit into the whole
    // part, so the recombination below needs no special case.
    debug_assert!(right <= POW10_I128[result_scale as usize]);

    *overflow |= x_left > MAX_UNSCALED_DECIMAL16 - y_left - carry_to_left;
    let left = x_left.wrapping_add(y_left).wrapping_add(carry_to_left);

    let result_mult = POW10_I128[result_scale as usize];
    if !*overflow && left > (MAX_UNSCALED_DECIMAL16 - right) / result_mult {
        *overflow = true;
    }
    left.wrapping_mul(result_mult).wrapping_add(right)
}

/// Companion of [`add_large`] for operands of opposite signs. Neither may
/// be zero. After summing the whole and fractional parts separately, one
/// whole unit is transferred when the two sums disagree in sign.
fn sub_large(
    x: i128,
    x_scale: i32,
    y: i128,
    y_scale: i32,
    result_scale: i32,
    round: bool,
    overflow: &mut bool,
) -> i128 {
    debug_assert!(x != 0 && y != 0);
    debug_assert!((x > 0) != (y > 0));

    let (x_left, x_right, y_left, y_right) = separate_fractional(x, x_scale, y, y_scale);

    let max_scale = cmp::max(x_scale, y_scale);
    let result_scale_decrease = max_scale - result_scale;
    debug_assert!(result_scale_decrease >= 0);

    // Opposite signs keep both sums inside the 38-digit range.
    let mut right = x_right + y_right;
    let mut left = x_left + y_left;
    debug_assert!(right.abs() < MAX_UNSCALED_DECIMAL16);
    debug_assert!(left.abs() < MAX_UNSCALED_DECIMAL16);

    let frac_mult = POW10_I128[max_scale as usize];
    if left < 0 && right > 0 {
        left += 1;
        right -= frac_mult;
    } else if left > 0 && right < 0 {
        left -= 1;
        right += frac_mult;
    }
    // The transfer moved `left` toward zero.
    debug_assert!(left.abs() <= (x_left + y_left).abs());

    if result_scale_decrease > 0 {
        right = scale_down_and_round(right, result_scale_decrease, round);
    }
    debug_assert!(left == 0 || right == 0 || (left > 0) == (right > 0));
    debug_assert!(right.abs() <= POW10_I128[result_scale as usize]);

    let result_mult = POW10_I128[result_scale as usize];
    if left.abs() > (MAX_UNSCALED_DECIMAL16 - right.abs()) / result_mult {
        *overflow = true;
    }
    left.wrapping_mul(result_mult).wrapping_add(right)
}

impl<T: DecimalNative> DecimalValue<T> {
    /// Three-way comparison against `other`, allowing different scales.
    /// Rescaling happens in the next-wider integer, so it cannot overflow.
    #[inline]
    pub fn compare(self, this_scale: i32, other: Self, other_scale: i32) -> Ordering {
        T::cmp_scaled(self.value(), this_scale, other.value(), other_scale)
    }

    /// `self + other` as a value of type `(result_precision, result_scale)`.
    ///
    /// At widths 4 and 8 the planner guarantees
    /// `result_scale == max(this_scale, other_scale)` and a result
    /// precision the aligned sum cannot leave; the full-precision 16-byte
    /// case splits into an aligned path when the leading-zero estimate
    /// proves the sum fits, and a whole/fractional decomposition
    /// otherwise.
    pub fn add(
        self,
        this_scale: i32,
        other: Self,
        other_scale: i32,
        result_precision: i32,
        result_scale: i32,
        round: bool,
        overflow: &mut bool,
    ) -> Self {
        if T::WIDTH < 16 || result_precision < MAX_PRECISION {
            debug_assert_eq!(result_scale, cmp::max(this_scale, other_scale));
            let mut x = T::ZERO;
            let mut y = T::ZERO;
            let ovf = adjust_to_same_scale(
                self,
                this_scale,
                other,
                other_scale,
                result_precision,
                &mut x,
                &mut y,
            );
            debug_assert!(!ovf, "only the full-precision 16-byte add can overflow");
            *overflow |= ovf;
            return DecimalValue::new(x + y);
        }

        let x128 = self.value().to_i128();
        let y128 = other.value().to_i128();
        let result_scale_decrease =
            cmp::max(this_scale - result_scale, other_scale - result_scale);
        debug_assert!(result_scale_decrease >= 0);

        let min_lz = min_leading_zeros(x128, this_scale, y128, other_scale);
        if min_lz >= ADD_MIN_LZ {
            let mut x = T::ZERO;
            let mut y = T::ZERO;
            let ovf = adjust_to_same_scale(
                self,
                this_scale,
                other,
                other_scale,
                result_precision,
                &mut x,
                &mut y,
            );
            debug_assert!(!ovf, "the leading-zero estimate guarantees the rescale fits");
            let mut sum = x.to_i128() + y.to_i128();
            if result_scale_decrease > 0 {
                sum = scale_down_and_round(sum, result_scale_decrease, round);
            }
            return DecimalValue::new(T::from_i128(sum));
        }

        let result = if x128 >= 0 && y128 >= 0 {
            add_large(x128, this_scale, y128, other_scale, result_scale, round, overflow)
        } else if x128 <= 0 && y128 <= 0 {
            add_large(-x128, this_scale, -y128, other_scale, result_scale, round, overflow)
                .wrapping_neg()
        } else {
            sub_large(x128, this_scale, y128, other_scale, result_scale, round, overflow)
        };
        DecimalValue::new(T::from_i128(result))
    }

    /// `self - other`; the dual of [`DecimalValue::add`] under negation.
    #[inline]
    pub fn subtract(
        self,
        this_scale: i32,
        other: Self,
        other_scale: i32,
        result_precision: i32,
        result_scale: i32,
        round: bool,
        overflow: &mut bool,
    ) -> Self {
        self.add(
            this_scale,
            DecimalValue::new(-other.value()),
            other_scale,
            result_precision,
            result_scale,
            round,
            overflow,
        )
    }

    /// `self * other` as a value of type `(result_precision, result_scale)`.
    ///
    /// The unscaled product already carries scale
    /// `this_scale + other_scale`, so the only scale work is the
    /// non-negative `delta_scale` step down to `result_scale`.
    pub fn multiply(
        self,
        this_scale: i32,
        other: Self,
        other_scale: i32,
        result_precision: i32,
        result_scale: i32,
        round: bool,
        overflow: &mut bool,
    ) -> Self {
        let x = self.value();
        let y = other.value();
        // Also keeps the zero case away from the division in the
        // leading-zero refinement below.
        if x == T::ZERO || y == T::ZERO {
            return DecimalValue::new(T::ZERO);
        }
        let delta_scale = this_scale + other_scale - result_scale;
        debug_assert!(delta_scale >= 0);

        let mut needs_int256 = false;
        if result_precision == MAX_PRECISION {
            debug_assert_eq!(T::WIDTH, 16);
            let total_leading_zeros =
                leading_zeros_abs(x.to_i128()) + leading_zeros_abs(y.to_i128());
            // Quick but conservative: may claim 256 bits are needed when
            // they are not.
            needs_int256 = total_leading_zeros <= 128;
            if needs_int256 && delta_scale == 0 {
                if x.abs_value().to_i128() > MAX_UNSCALED_DECIMAL16 / y.abs_value().to_i128() {
                    // The intermediate cannot fit in 128 bits, and with no
                    // scale-down the final value cannot either.
                    *overflow = true;
                } else {
                    needs_int256 = false;
                }
            }
        }

        let result;
        if needs_int256 {
            if delta_scale == 0 {
                debug_assert!(*overflow);
                result = T::ZERO;
            } else {
                let intermediate =
                    Int256::from_i128(x.to_i128()) * Int256::from_i128(y.to_i128());
                let intermediate = scale_down_and_round(intermediate, delta_scale, round);
                result = T::from_i128(intermediate.to_i128(MAX_UNSCALED_DECIMAL16, overflow));
            }
        } else if delta_scale == 0 {
            let r = x * y;
            if result_precision == MAX_PRECISION
                && r.abs_value().to_i128() > MAX_UNSCALED_DECIMAL16
            {
                // Possible because the leading-zero test only proved the
                // product fits in 128 bits, not in 38 digits.
                *overflow = true;
            }
            result = r;
        } else if delta_scale <= 38 {
            // After a scale-down by at least one digit the product is back
            // under 38 digits, so no overflow check is needed.
            result = scale_down_and_round(x * y, delta_scale, round);
        } else {
            // Multiplying (38,38) by (38,38) into (38,37): the operands
            // are small enough to skip the 256-bit path, so scaling down
            // by 39 digits erases every digit the product has. The scale
            // multiplier 10^39 does not even fit in 128 bits, hence the
            // explicit zero.
            debug_assert_eq!(delta_scale, 39);
            debug_assert!(round);
            result = T::ZERO;
        }
        debug_assert!(*overflow || result.abs_value().to_i128() <= MAX_UNSCALED_DECIMAL16);
        DecimalValue::new(result)
    }

    /// `self / other` as a value of type `(result_precision, result_scale)`.
    ///
    /// Division by zero sets `is_nan` and leaves `overflow` untouched.
    /// The dividend is scaled up by `result_scale + other_scale -
    /// this_scale` (non-negative by the caller's type rules) so the
    /// integer division truncates exactly at the target scale.
    pub fn divide(
        self,
        this_scale: i32,
        other: Self,
        other_scale: i32,
        result_precision: i32,
        result_scale: i32,
        round: bool,
        is_nan: &mut bool,
        overflow: &mut bool,
    ) -> Self {
        debug_assert!(result_scale + other_scale >= this_scale);
        if other.is_zero() {
            *is_nan = true;
            return Self::default();
        }
        let scale_by = result_scale + other_scale - this_scale;

        if T::WIDTH == 16 {
            let x_sp = self.value().to_i128();
            let y_sp = other.value().to_i128();
            let x = Int256::from_i128(x_sp) * Int256::pow10(scale_by);
            let y = Int256::from_i128(y_sp);
            let mut r = (x / y).to_i128(MAX_UNSCALED_DECIMAL16, overflow);
            if round {
                // Doubling the remainder is only safe in the 256-bit
                // intermediate; a 128-bit residual has no headroom.
                let remainder = x % y;
                if (remainder + remainder).abs() >= y.abs() {
                    // Round away from zero, corrected by the sign of
                    // divisor and dividend.
                    if (x_sp < 0) == (y_sp < 0) {
                        r = r.wrapping_add(1);
                    } else {
                        r = r.wrapping_sub(1);
                    }
                }
            }
            // The rounding bump can push the quotient through the limit.
            if result_precision == MAX_PRECISION {
                *overflow |= r.unsigned_abs() > MAX_UNSCALED_DECIMAL16 as u128;
            }
            DecimalValue::new(T::from_i128(r))
        } else {
            debug_assert!(scale_by <= T::MAX_PRECISION);
            let x = self.value().to_i128() * POW10_I128[scale_by as usize];
            let y = other.value().to_i128();
            let mut r = x / y;
            if round {
                let remainder = x % y;
                // Doubling an 8-byte operand's residual fits easily in
                // 128 bits.
                if (2 * remainder).abs() >= y.abs() {
                    if (x < 0) == (y < 0) {
                        r += 1;
                    } else {
                        r -= 1;
                    }
                }
            }
            debug_assert!(r.abs() <= MAX_UNSCALED_DECIMAL16);
            DecimalValue::new(T::from_i128(r))
        }
    }

    /// `self mod other` at `result_scale == max(this_scale, other_scale)`.
    ///
    /// A zero divisor sets `is_nan`. The result keeps the dividend's sign
    /// and its magnitude is strictly below the divisor's, so overflow is
    /// impossible; the narrowing guard on the slow path stays as defense
    /// in depth.
    pub fn modulo(
        self,
        this_scale: i32,
        other: Self,
        other_scale: i32,
        result_precision: i32,
        result_scale: i32,
        _round: bool,
        is_nan: &mut bool,
        overflow: &mut bool,
    ) -> Self {
        debug_assert_eq!(result_scale, cmp::max(this_scale, other_scale));
        if other.is_zero() {
            *is_nan = true;
            return Self::default();
        }

        // Avoid the 256-bit conversion whenever the aligned operands
        // provably fit.
        if T::WIDTH < 16
            || result_precision < MAX_PRECISION
            || this_scale == other_scale
            || min_leading_zeros(
                self.value().to_i128(),
                this_scale,
                other.value().to_i128(),
                other_scale,
            ) >= 2
        {
            let mut x = T::ZERO;
            let mut y = T::ZERO;
            let ovf = adjust_to_same_scale(
                self,
                this_scale,
                other,
                other_scale,
                result_precision,
                &mut x,
                &mut y,
            );
            debug_assert!(!ovf);
            let result = x % y;
            debug_assert!(result.abs_value() < y.abs_value());
            DecimalValue::new(result)
        } else {
            let mut x = Int256::from_i128(self.value().to_i128());
            let mut y = Int256::from_i128(other.value().to_i128());
            if this_scale < other_scale {
                x = x * Int256::pow10(other_scale - this_scale);
            } else {
                y = y * Int256::pow10(this_scale - other_scale);
            }
            let mut narrow_overflow = false;
            let result = (x % y).to_i128(MAX_UNSCALED_DECIMAL16, &mut narrow_overflow);
            debug_assert!(!narrow_overflow);
            *overflow |= narrow_overflow;
            DecimalValue::new(T::from_i128(result))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Decimal16, Decimal4, Decimal8};

    const MAX16: i128 = MAX_UNSCALED_DECIMAL16;

    #[test]
    fn add_aligned() {
        // 1.23 + 0.2 as decimal(4,2) -> 1.43
        let mut overflow = false;
        let r = Decimal4::new(123).add(2, Decimal4::new(2), 1, 4, 2, true, &mut overflow);
        assert!(!overflow);
        assert_eq!(r.value(), 143);

        // commutes
        let mut overflow = false;
        let r = Decimal4::new(2).add(1, Decimal4::new(123), 2, 4, 2, true, &mut overflow);
        assert!(!overflow);
        assert_eq!(r.value(), 143);

        // additive identity and negation
        let mut overflow = false;
        let r = Decimal8::new(-987).add(2, Decimal8::new(0), 2, 10, 2, true, &mut overflow);
        assert_eq!(r.value(), -987);
        let r = Decimal8::new(-987).add(2, Decimal8::new(987), 2, 10, 2, true, &mut overflow);
        assert_eq!(r.value(), 0);
        assert!(!overflow);
    }

    #[test]
    fn add_wide_fast_path_rounds() {
        // 0.5 + 0.05 at (38,1): aligned sum 55 at scale 2, rounded to 6.
        let mut overflow = false;
        let r = Decimal16::new(5).add(1, Decimal16::new(5), 2, 38, 1, true, &mut overflow);
        assert!(!overflow);
        assert_eq!(r.value(), 6);

        // truncation mode keeps 0.5
        let mut overflow = false;
        let r = Decimal16::new(5).add(1, Decimal16::new(5), 2, 38, 1, false, &mut overflow);
        assert!(!overflow);
        assert_eq!(r.value(), 5);

        // 0.9 + 0.05 rounds up with a carry into the whole part.
        let mut overflow = false;
        let r = Decimal16::new(9).add(1, Decimal16::new(5), 2, 38, 1, true, &mut overflow);
        assert!(!overflow);
        assert_eq!(r.value(), 10);
    }

    #[test]
    fn add_large_values() {
        // 9e36 + 2.5 at (38,1); the rescale of 9e36 fails the leading-zero
        // estimate, so this walks the whole/fractional decomposition.
        let x = Decimal16::new(9_000_000_000_000_000_000_000_000_000_000_000_000);
        let mut overflow = false;
        let r = x.add(0, Decimal16::new(25), 1, 38, 1, true, &mut overflow);
        assert!(!overflow);
        assert_eq!(r.value(), 90_000_000_000_000_000_000_000_000_000_000_000_025);

        // both negative
        let mut overflow = false;
        let r = Decimal16::new(-x.value()).add(
            0,
            Decimal16::new(-25),
            1,
            38,
            1,
            true,
            &mut overflow,
        );
        assert!(!overflow);
        assert_eq!(r.value(), -90_000_000_000_000_000_000_000_000_000_000_000_025);
    }

    #[test]
    fn add_overflow_near_max() {
        let mut overflow = false;
        Decimal16::new(MAX16).add(0, Decimal16::new(1), 0, 38, 0, true, &mut overflow);
        assert!(overflow);

        let mut overflow = false;
        Decimal16::new(-MAX16).add(0, Decimal16::new(-1), 0, 38, 0, true, &mut overflow);
        assert!(overflow);

        // max + 0 still fits
        let mut overflow = false;
        let r = Decimal16::new(MAX16).add(0, Decimal16::new(0), 0, 38, 0, true, &mut overflow);
        assert!(!overflow);
        assert_eq!(r.value(), MAX16);

        // scaling the max up by one digit cannot fit either
        let mut overflow = false;
        Decimal16::new(MAX16).add(0, Decimal16::new(5), 1, 38, 1, true, &mut overflow);
        assert!(overflow);
    }

    #[test]
    fn subtract_mixed_signs() {
        // 9e36 - 2.5 at (38,1) via the opposite-sign decomposition.
        let x = Decimal16::new(9_000_000_000_000_000_000_000_000_000_000_000_000);
        let mut overflow = false;
        let r = x.subtract(0, Decimal16::new(25), 1, 38, 1, true, &mut overflow);
        assert!(!overflow);
        assert_eq!(r.value(), 89_999_999_999_999_999_999_999_999_999_999_999_975);

        // x - x == 0
        let mut overflow = false;
        let r = x.subtract(0, x, 0, 38, 0, true, &mut overflow);
        assert!(!overflow);
        assert_eq!(r.value(), 0);
    }

    #[test]
    fn multiply_basic() {
        // 1.23 * 2.5 as decimal(6,3) -> 3.075
        let mut overflow = false;
        let r = Decimal4::new(123).multiply(2, Decimal4::new(25), 1, 6, 3, true, &mut overflow);
        assert!(!overflow);
        assert_eq!(r.value(), 3075);

        // multiplicative identity
        let mut overflow = false;
        let r = Decimal8::new(4567).multiply(2, Decimal8::new(1), 0, 10, 2, true, &mut overflow);
        assert!(!overflow);
        assert_eq!(r.value(), 4567);

        // zero shortcut
        let mut overflow = false;
        let r =
            Decimal16::new(0).multiply(38, Decimal16::new(MAX16), 38, 38, 38, true, &mut overflow);
        assert!(!overflow);
        assert_eq!(r.value(), 0);
    }

    #[test]
    fn multiply_full_precision_wide() {
        // (10^19) * (10^19) at delta_scale 0 overflows 38 digits.
        let mut overflow = false;
        Decimal16::new(10_000_000_000_000_000_000).multiply(
            0,
            Decimal16::new(10_000_000_000_000_000_000),
            0,
            38,
            0,
            true,
            &mut overflow,
        );
        assert!(overflow);

        // The same magnitudes with a scale-down go through 256 bits:
        // 1e19 (scale 0) * 1e18 (scale 18) = 1e19 exactly.
        let mut overflow = false;
        let r = Decimal16::new(10_000_000_000_000_000_000).multiply(
            0,
            Decimal16::new(1_000_000_000_000_000_000),
            18,
            38,
            0,
            true,
            &mut overflow,
        );
        assert!(!overflow);
        assert_eq!(r.value(), 10_000_000_000_000_000_000);

        // 256-bit path with rounding: 0.5 * 0.5 into (38,37).
        let half = Decimal16::new(POW10_I128[38] / 2);
        let mut overflow = false;
        let r = half.multiply(38, half, 38, 38, 37, true, &mut overflow);
        assert!(!overflow);
        assert_eq!(r.value(), 25 * POW10_I128[35]);
    }

    #[test]
    fn multiply_degenerate_scale_down() {
        // Small (38,38) operands into (38,37): delta_scale is 39 and the
        // product is always erased.
        let mut overflow = false;
        let r = Decimal16::new(1).multiply(38, Decimal16::new(1), 38, 38, 37, true, &mut overflow);
        assert!(!overflow);
        assert_eq!(r.value(), 0);

        let mut overflow = false;
        let r = Decimal16::new(-999_999).multiply(
            38,
            Decimal16::new(999_999),
            38,
            38,
            37,
            true,
            &mut overflow,
        );
        assert!(!overflow);
        assert_eq!(r.value(), 0);
    }

    #[test]
    fn divide_narrow() {
        // 1 / 3 at (10,9): 0.333333333 whether rounding or truncating.
        for &round in &[true, false] {
            let mut overflow = false;
            let mut is_nan = false;
            let r = Decimal8::new(1).divide(
                0,
                Decimal8::new(3),
                0,
                10,
                9,
                round,
                &mut is_nan,
                &mut overflow,
            );
            assert!(!overflow && !is_nan);
            assert_eq!(r.value(), 333_333_333);
        }

        // 2 / 3 at (10,9) rounds the last digit up.
        let mut overflow = false;
        let mut is_nan = false;
        let r = Decimal8::new(2).divide(
            0,
            Decimal8::new(3),
            0,
            10,
            9,
            true,
            &mut is_nan,
            &mut overflow,
        );
        assert!(!overflow && !is_nan);
        assert_eq!(r.value(), 666_666_667);

        // -7 / 2 at scale 0: -3.5 rounds away from zero.
        let mut overflow = false;
        let mut is_nan = false;
        let r = Decimal4::new(-7).divide(
            0,
            Decimal4::new(2),
            0,
            9,
            0,
            true,
            &mut is_nan,
            &mut overflow,
        );
        assert_eq!(r.value(), -4);
        let mut is_nan = false;
        let r = Decimal4::new(-7).divide(
            0,
            Decimal4::new(2),
            0,
            9,
            0,
            false,
            &mut is_nan,
            &mut overflow,
        );
        assert_eq!(r.value(), -3);
        assert!(!overflow);
    }

    #[test]
    fn divide_wide() {
        // 1 / 3 at (38,37)
        let expected = (POW10_I128[37] - 1) / 3; // 0.333...3, 37 digits
        let mut overflow = false;
        let mut is_nan = false;
        let r = Decimal16::new(1).divide(
            0,
            Decimal16::new(3),
            0,
            38,
            37,
            true,
            &mut is_nan,
            &mut overflow,
        );
        assert!(!overflow && !is_nan);
        assert_eq!(r.value(), expected);

        // 2 / 3 at (38,37) rounds up in the 256-bit remainder check.
        let mut overflow = false;
        let mut is_nan = false;
        let r = Decimal16::new(2).divide(
            0,
            Decimal16::new(3),
            0,
            38,
            37,
            true,
            &mut is_nan,
            &mut overflow,
        );
        assert!(!overflow && !is_nan);
        assert_eq!(r.value(), 2 * expected + 1);
    }

    #[test]
    fn divide_flags() {
        let mut overflow = false;
        let mut is_nan = false;
        Decimal8::new(1).divide(0, Decimal8::new(0), 0, 10, 2, true, &mut is_nan, &mut overflow);
        assert!(is_nan);
        assert!(!overflow);

        // max / 0.1 leaves the 38-digit range
        let mut overflow = false;
        let mut is_nan = false;
        Decimal16::new(MAX16).divide(
            0,
            Decimal16::new(1),
            1,
            38,
            0,
            true,
            &mut is_nan,
            &mut overflow,
        );
        assert!(!is_nan);
        assert!(overflow);
    }

    #[test]
    fn modulo_aligned() {
        // 7.5 mod 2.1 = 1.2
        let mut overflow = false;
        let mut is_nan = false;
        let r = Decimal4::new(75).modulo(
            1,
            Decimal4::new(21),
            1,
            9,
            1,
            true,
            &mut is_nan,
            &mut overflow,
        );
        assert!(!is_nan && !overflow);
        assert_eq!(r.value(), 12);

        // the result keeps the dividend's sign
        let mut is_nan = false;
        let r = Decimal4::new(-75).modulo(
            1,
            Decimal4::new(21),
            1,
            9,
            1,
            true,
            &mut is_nan,
            &mut overflow,
        );
        assert_eq!(r.value(), -12);

        // mod by zero is NaN
        let mut is_nan = false;
        Decimal4::new(75).modulo(1, Decimal4::new(0), 1, 9, 1, true, &mut is_nan, &mut overflow);
        assert!(is_nan);
        assert!(!overflow);
    }

    #[test]
    fn modulo_wide_rescale() {
        // Large dividend whose rescale must run in 256 bits.
        let mut overflow = false;
        let mut is_nan = false;
        let r = Decimal16::new(MAX16).modulo(
            0,
            Decimal16::new(3),
            1,
            38,
            1,
            true,
            &mut is_nan,
            &mut overflow,
        );
        assert!(!is_nan && !overflow);
        // 10^38 - 1 is all nines, divisible by 3; so is it times ten.
        assert_eq!(r.value(), 0);

        let mut is_nan = false;
        let r = Decimal16::new(MAX16 - 1).modulo(
            0,
            Decimal16::new(3),
            1,
            38,
            1,
            true,
            &mut is_nan,
            &mut overflow,
        );
        assert!(!is_nan && !overflow);
        assert_eq!(r.value(), 2);
    }

    #[test]
    fn compare_is_total_across_scales() {
        // 1.2 == 1.20 < 1.21 < 2
        let a = Decimal4::new(12);
        let b = Decimal4::new(120);
        let c = Decimal4::new(121);
        let d = Decimal4::new(2);
        assert_eq!(a.compare(1, b, 2), Ordering::Equal);
        assert_eq!(b.compare(2, a, 1), Ordering::Equal);
        assert_eq!(a.compare(1, c, 2), Ordering::Less);
        assert_eq!(c.compare(2, a, 1), Ordering::Greater);
        assert_eq!(c.compare(2, d, 0), Ordering::Less);
        assert_eq!(a.compare(1, d, 0), Ordering::Less);

        // negative values order below positive at any scale
        assert_eq!(
            Decimal16::new(-1).compare(38, Decimal16::new(1), 0),
            Ordering::Less
        );
        // full-precision rescale runs in 256 bits
        assert_eq!(
            Decimal16::new(MAX16).compare(0, Decimal16::new(MAX16), 38),
            Ordering::Greater
        );
    }

    #[test]
    fn divide_remainder_law() {
        // For round == false: x - (x / y) * y has magnitude below |y|,
        // evaluated at the result scale.
        let x = Decimal8::new(123_456);
        let y = Decimal8::new(789);
        let mut overflow = false;
        let mut is_nan = false;
        // x, y both at scale 2; quotient at (18, 2).
        let q = x.divide(2, y, 2, 18, 2, false, &mut is_nan, &mut overflow);
        // q * y carries scale 4; step back down to scale 2 by truncation.
        let p = q.multiply(2, y, 2, 18, 4, false, &mut overflow);
        let p = p.scale_to(4, 2, 18, &mut overflow);
        let diff = x.subtract(2, p, 2, 18, 2, false, &mut overflow);
        assert!(!overflow && !is_nan);
        assert!(diff.value().abs() < y.value().abs());
    }
}
