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

//! Decimal column type metadata.
//!
//! Scale and precision are never stored inside a value; they travel in
//! the column metadata the planner hands around. `DecimalType` is that
//! metadata in validated form.

use crate::MAX_PRECISION;
use std::fmt;

/// A validated `DECIMAL(precision, scale)` column type.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DecimalType {
    precision: i32,
    scale: i32,
}

impl DecimalType {
    /// Creates a `DecimalType`.
    ///
    /// Returns `None` unless `1 <= precision <= 38` and
    /// `0 <= scale <= precision`.
    #[inline]
    pub fn new(precision: i32, scale: i32) -> Option<DecimalType> {
        if (1..=MAX_PRECISION).contains(&precision) && (0..=precision).contains(&scale) {
            Some(DecimalType { precision, scale })
        } else {
            None
        }
    }

    /// Creates a `DecimalType` with `scale` defaulting to zero.
    #[inline]
    pub fn with_precision(precision: i32) -> Option<DecimalType> {
        DecimalType::new(precision, 0)
    }

    #[inline]
    pub fn precision(self) -> i32 {
        self.precision
    }

    #[inline]
    pub fn scale(self) -> i32 {
        self.scale
    }

    /// Smallest storage width in bytes whose digit capacity covers this
    /// precision.
    #[inline]
    pub fn byte_width(self) -> usize {
        if self.precision <= 9 {
            4
        } else if self.precision <= 18 {
            8
        } else {
            16
        }
    }
}

impl fmt::Display for DecimalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decimal({},{})", self.precision, self.scale)
    }
}
