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

//! Fixed-point decimal arithmetic kernel with SQL `DECIMAL(p, s)`
//! semantics.
//!
//! A decimal is an exact rational number stored as a signed unscaled
//! integer of 4, 8 or 16 bytes ([`Decimal4`], [`Decimal8`],
//! [`Decimal16`]) interpreted against a precision (total significant
//! digits, at most 9, 18 or 38 per width) and a scale (fractional
//! digits). Scale is carried by the caller's column metadata, never by
//! the value.
//!
//! Arithmetic reports failures through flags rather than `Result`s:
//! every operation takes an `overflow` out-parameter (and division and
//! modulo an `is_nan` one for zero divisors), sets it when the
//! mathematical result does not fit the requested result type, and still
//! returns a defined value, so bulk evaluation loops stay
//! branch-predictable and flags can be OR-ed across rows. Values are
//! plain immutable data; everything here is allocation-free except
//! string formatting.
//!
//! ```
//! use sqldecimal::Decimal4;
//!
//! let mut overflow = false;
//! let x = Decimal4::parse_str("1.23", 4, 2, true).unwrap();
//! let y = Decimal4::parse_str("0.2", 4, 2, true).unwrap();
//! let sum = x.add(2, y, 2, 4, 2, true, &mut overflow);
//! assert!(!overflow);
//! assert_eq!(sum.to_string(4, 2), "1.43");
//! ```

mod arith;
mod convert;
mod error;
mod hash;
mod int256;
mod parse;
mod scale;
mod types;
mod value;

pub use crate::error::DecimalParseError;
pub use crate::types::DecimalType;
pub use crate::value::{Decimal16, Decimal4, Decimal8, DecimalNative, DecimalValue};

/// Largest number of decimal digits any width can hold.
pub const MAX_PRECISION: i32 = 38;

/// Largest unscaled magnitude of a 4-byte decimal, `10^9 - 1`.
pub const MAX_UNSCALED_DECIMAL4: i32 = 999_999_999;

/// Largest unscaled magnitude of an 8-byte decimal, `10^18 - 1`.
pub const MAX_UNSCALED_DECIMAL8: i64 = 999_999_999_999_999_999;

/// Largest unscaled magnitude of a 16-byte decimal, `10^38 - 1`.
pub const MAX_UNSCALED_DECIMAL16: i128 = 99_999_999_999_999_999_999_999_999_999_999_999_999;
