//! National identity code value object.
//!
//! An identity code is exactly ten ASCII digits once surrounding whitespace
//! is trimmed. The tenth digit is a mod-11 check digit over the first nine.
//! Construction is the only way to obtain an [`IdentityCode`], so every
//! instance in the system is known to be valid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of digits in an identity code.
pub const IDENTITY_CODE_LEN: usize = 10;

/// Validation errors returned by [`IdentityCode::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityCodeError {
    /// Input was empty or whitespace only.
    Empty,
    /// Trimmed input did not contain exactly ten characters.
    InvalidLength { length: usize },
    /// Trimmed input contained a character other than an ASCII digit.
    NonDigit,
    /// All ten digits are the same.
    RepeatedDigits,
    /// The final digit does not match the computed check digit.
    ChecksumMismatch,
}

impl fmt::Display for IdentityCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "National code is required."),
            Self::InvalidLength { length } => write!(
                f,
                "Invalid national code: expected {IDENTITY_CODE_LEN} digits, got {length}."
            ),
            Self::NonDigit => write!(f, "Invalid national code: only digits are allowed."),
            Self::RepeatedDigits => {
                write!(f, "Invalid national code: digits must not all be identical.")
            }
            Self::ChecksumMismatch => write!(f, "Invalid national code: check digit mismatch."),
        }
    }
}

impl std::error::Error for IdentityCodeError {}

/// Validated ten-digit national identity code.
///
/// ## Invariants
/// - Exactly [`IDENTITY_CODE_LEN`] ASCII digits, no surrounding whitespace.
/// - Not all digits identical.
/// - The last digit equals the check digit of the first nine.
///
/// # Examples
/// ```
/// use identity_gate::domain::IdentityCode;
///
/// let code = IdentityCode::parse(" 0499370899 ").unwrap();
/// assert_eq!(code.as_ref(), "0499370899");
/// assert!(IdentityCode::parse("0499370898").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityCode(String);

impl IdentityCode {
    /// Trim and validate raw caller input.
    pub fn parse(raw: &str) -> Result<Self, IdentityCodeError> {
        let normalized = raw.trim();
        validate(normalized)?;
        Ok(Self(normalized.to_owned()))
    }

    /// Report whether `raw` would parse, without allocating.
    #[must_use]
    pub fn is_valid(raw: &str) -> bool {
        validate(raw.trim()).is_ok()
    }

    /// Masked rendering for logs: keeps the first and last two digits.
    #[must_use]
    pub fn masked(&self) -> String {
        let head = self.0.get(..2).unwrap_or_default();
        let tail = self.0.get(IDENTITY_CODE_LEN - 2..).unwrap_or_default();
        format!("{head}******{tail}")
    }
}

/// Compute the check digit for the first nine digits of a code.
///
/// Weights run from 10 down to 2; remainders below two are used as-is,
/// otherwise the digit is `11 - remainder`.
#[must_use]
pub fn check_digit(leading: &[u8]) -> u8 {
    let sum: u32 = leading
        .iter()
        .zip((2..=10_u32).rev())
        .map(|(digit, weight)| u32::from(*digit) * weight)
        .sum();
    let remainder = sum % 11;
    let check = if remainder < 2 {
        remainder
    } else {
        11 - remainder
    };
    // `check` is always below 10 here.
    u8::try_from(check).unwrap_or(u8::MAX)
}

fn validate(normalized: &str) -> Result<(), IdentityCodeError> {
    if normalized.is_empty() {
        return Err(IdentityCodeError::Empty);
    }

    let length = normalized.chars().count();
    if length != IDENTITY_CODE_LEN {
        return Err(IdentityCodeError::InvalidLength { length });
    }

    let mut digits = [0_u8; IDENTITY_CODE_LEN];
    for (slot, byte) in digits.iter_mut().zip(normalized.bytes()) {
        if !byte.is_ascii_digit() {
            return Err(IdentityCodeError::NonDigit);
        }
        *slot = byte - b'0';
    }

    let [first, .., last] = digits;
    if digits.iter().all(|digit| *digit == first) {
        return Err(IdentityCodeError::RepeatedDigits);
    }

    let (leading, _) = digits.split_at(IDENTITY_CODE_LEN - 1);
    if check_digit(leading) != last {
        return Err(IdentityCodeError::ChecksumMismatch);
    }

    Ok(())
}

impl AsRef<str> for IdentityCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for IdentityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl FromStr for IdentityCode {
    type Err = IdentityCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<IdentityCode> for String {
    fn from(value: IdentityCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for IdentityCode {
    type Error = IdentityCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
