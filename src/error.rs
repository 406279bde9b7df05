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

//! Decimal error handling.
//!
//! Only the boundary layer (literal parsing) reports errors through
//! `Result`; bulk arithmetic communicates through overflow/NaN flags so
//! tight loops stay branch-predictable.

use std::error::Error;
use std::fmt;

/// An error which can be returned when parsing a decimal literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalParseError {
    kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseErrorKind {
    Empty,
    Invalid,
    Overflow,
}

impl fmt::Display for DecimalParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.kind {
            ParseErrorKind::Empty => write!(f, "cannot parse decimal from empty string"),
            ParseErrorKind::Invalid => write!(f, "invalid decimal literal"),
            ParseErrorKind::Overflow => write!(f, "value overflows decimal format"),
        }
    }
}

impl Error for DecimalParseError {}

impl DecimalParseError {
    #[inline]
    pub(crate) const fn new(kind: ParseErrorKind) -> Self {
        DecimalParseError { kind }
    }

    #[inline]
    pub(crate) const fn empty() -> Self {
        Self::new(ParseErrorKind::Empty)
    }

    #[inline]
    pub(crate) const fn invalid() -> Self {
        Self::new(ParseErrorKind::Invalid)
    }

    #[inline]
    pub(crate) const fn overflow() -> Self {
        Self::new(ParseErrorKind::Overflow)
    }
}
