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

//! Scale multiplier tables and the shared scale-down rounding primitive.

use crate::MAX_UNSCALED_DECIMAL16;
use lazy_static::lazy_static;
use std::ops::{Add, Div, Rem};

/// `10^k` for `0 <= k <= 9`.
pub(crate) const POW10_I32: [i32; 10] = {
    let mut table = [0i32; 10];
    let mut i = 0;
    while i < 10 {
        table[i] = 10i32.pow(i as u32);
        i += 1;
    }
    table
};

/// `10^k` for `0 <= k <= 18`.
pub(crate) const POW10_I64: [i64; 19] = {
    let mut table = [0i64; 19];
    let mut i = 0;
    while i < 19 {
        table[i] = 10i64.pow(i as u32);
        i += 1;
    }
    table
};

/// `10^k` for `0 <= k <= 38`.
pub(crate) const POW10_I128: [i128; 39] = {
    let mut table = [0i128; 39];
    let mut i = 0;
    while i < 39 {
        table[i] = 10i128.pow(i as u32);
        i += 1;
    }
    table
};

/// `(10^38 - 1) / 10^k` for `0 <= k <= 38`, the largest magnitude that can
/// be multiplied by `10^k` without leaving the 38-digit range.
pub(crate) const MAX_UNSCALED_QUOTIENT: [i128; 39] = {
    let mut table = [0i128; 39];
    let mut i = 0;
    while i < 39 {
        table[i] = MAX_UNSCALED_DECIMAL16 / POW10_I128[i];
        i += 1;
    }
    table
};

/// `floor(log2(10^k))` for `0 <= k <= 39`, used to bound leading zeros
/// after scaling a value up.
pub(crate) const FLOOR_LOG2_POW10: [i32; 40] = [
    0, 3, 6, 9, 13, 16, 19, 23, 26, 29, 33, 36, 39, 43, 46, 49, 53, 56, 59, 63, 66, 69, 73, 76,
    79, 83, 86, 89, 93, 96, 99, 102, 106, 109, 112, 116, 119, 122, 126, 129,
];

lazy_static! {
    /// `10^k` as `f64` for `0 <= k <= 38`.
    pub(crate) static ref POW10_F64: [f64; 39] = {
        let mut table = [0.0f64; 39];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = POW10_I128[i] as f64;
        }
        table
    };
}

/// Integer type a scaled decimal magnitude lives in; the minimal surface
/// the shared rounding primitive needs. The module is private, which
/// keeps the trait sealed.
pub trait ScaleInt:
    Copy + PartialEq + PartialOrd + Add<Output = Self> + Div<Output = Self> + Rem<Output = Self>
{
    /// Returns `10^exp`; `exp` must be within the type's table.
    fn scale_multiplier(exp: i32) -> Self;

    /// Absolute value.
    fn abs_value(self) -> Self;

    /// `self / 2` for non-negative `self`, computed as an exact shift.
    fn half(self) -> Self;

    /// `-1` for negative values, `1` otherwise.
    fn sign_unit(self) -> Self;
}

macro_rules! impl_scale_int {
    ($t: ty, $table: expr) => {
        impl ScaleInt for $t {
            #[inline]
            fn scale_multiplier(exp: i32) -> Self {
                $table[exp as usize]
            }

            #[inline]
            fn abs_value(self) -> Self {
                self.abs()
            }

            #[inline]
            fn half(self) -> Self {
                debug_assert!(self >= 0);
                self >> 1
            }

            #[inline]
            fn sign_unit(self) -> Self {
                if self < 0 {
                    -1
                } else {
                    1
                }
            }
        }
    };
}

impl_scale_int!(i32, POW10_I32);
impl_scale_int!(i64, POW10_I64);
impl_scale_int!(i128, POW10_I128);

/// Scales `value` down by `10^delta_scale`, rounding half away from zero
/// when `round` is set and truncating toward zero otherwise.
///
/// The multiplier `10^k` is even for `k >= 1`, so the half point is exact
/// under a single right shift. Rounding may carry into the next decimal
/// digit (e.g. `95 -> 10` for `delta_scale == 1`); callers must tolerate a
/// result one unit larger than truncated division would produce.
pub(crate) fn scale_down_and_round<I: ScaleInt>(value: I, delta_scale: i32, round: bool) -> I {
    debug_assert!(delta_scale > 0);
    let multiplier = I::scale_multiplier(delta_scale);
    let result = value / multiplier;
    if round {
        let remainder = value % multiplier;
        if remainder.abs_value() >= multiplier.half() {
            // Bias at zero is corrected by the sign of the dividend.
            return result + value.sign_unit();
        }
    }
    result
}
