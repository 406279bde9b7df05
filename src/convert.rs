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

//! Width-to-width conversions.
//!
//! Conversions never touch the scale: the unscaled integer moves between
//! storage widths unchanged. Widening is infallible; narrowing flags
//! `overflow` when the value exceeds the target integer's range.

use crate::value::{Decimal16, Decimal4, Decimal8, DecimalNative, DecimalValue};

impl From<Decimal4> for Decimal8 {
    #[inline]
    fn from(v: Decimal4) -> Decimal8 {
        Decimal8::new(v.value() as i64)
    }
}

impl From<Decimal4> for Decimal16 {
    #[inline]
    fn from(v: Decimal4) -> Decimal16 {
        Decimal16::new(v.value() as i128)
    }
}

impl From<Decimal8> for Decimal16 {
    #[inline]
    fn from(v: Decimal8) -> Decimal16 {
        Decimal16::new(v.value() as i128)
    }
}

impl<T: DecimalNative> DecimalValue<T> {
    /// Narrows to the 4-byte width, flagging `overflow` when the value
    /// does not fit an `i32`.
    pub fn to_decimal4(self, overflow: &mut bool) -> Decimal4 {
        let v = self.value().to_i128();
        *overflow |= v.abs() > i32::max_value() as i128;
        Decimal4::new(v as i32)
    }

    /// Narrows to the 8-byte width, flagging `overflow` when the value
    /// does not fit an `i64`.
    pub fn to_decimal8(self, overflow: &mut bool) -> Decimal8 {
        let v = self.value().to_i128();
        *overflow |= v.abs() > i64::max_value() as i128;
        Decimal8::new(v as i64)
    }

    /// Converts to the 16-byte width; always fits.
    #[inline]
    pub fn to_decimal16(self) -> Decimal16 {
        Decimal16::new(self.value().to_i128())
    }
}
