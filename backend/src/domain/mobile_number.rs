//! Mobile phone number normalisation.
//!
//! Directory records carry phone numbers in whatever shape the CRM stored
//! them. Enrichment canonicalises them to the 11-digit `09xxxxxxxxx` form.

use std::fmt;

/// Length of a canonical mobile number.
pub const MOBILE_NUMBER_LEN: usize = 11;

/// Validation errors returned by [`MobileNumber::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MobileNumberError {
    Empty,
    NonDigit,
    UnrecognisedFormat,
}

impl fmt::Display for MobileNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "mobile number must not be empty"),
            Self::NonDigit => write!(f, "mobile number may only contain digits"),
            Self::UnrecognisedFormat => {
                write!(f, "mobile number must start with 09 and have 11 digits")
            }
        }
    }
}

impl std::error::Error for MobileNumberError {}

/// Canonical `09xxxxxxxxx` mobile number.
///
/// # Examples
/// ```
/// use identity_gate::domain::MobileNumber;
///
/// let number = MobileNumber::parse("+98 912 123 4567").unwrap();
/// assert_eq!(number.as_ref(), "09121234567");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Parse and canonicalise a raw phone number.
    ///
    /// Spaces, dashes and parentheses are ignored. Accepted prefixes are
    /// `+98`, `0098`, `98`, `0`, or none before the leading `9`.
    pub fn parse(raw: &str) -> Result<Self, MobileNumberError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MobileNumberError::Empty);
        }

        let without_plus = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let digits: String = without_plus
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '-' | '(' | ')'))
            .collect();
        if !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(MobileNumberError::NonDigit);
        }

        let national = digits
            .strip_prefix("0098")
            .or_else(|| digits.strip_prefix("98").filter(|rest| rest.len() == 10))
            .or_else(|| digits.strip_prefix('0'))
            .unwrap_or(&digits);

        if national.len() != MOBILE_NUMBER_LEN - 1 || !national.starts_with('9') {
            return Err(MobileNumberError::UnrecognisedFormat);
        }

        Ok(Self(format!("0{national}")))
    }
}

impl AsRef<str> for MobileNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<MobileNumber> for String {
    fn from(value: MobileNumber) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("09121234567")]
    #[case("9121234567")]
    #[case("989121234567")]
    #[case("+989121234567")]
    #[case("00989121234567")]
    #[case(" +98 912-123 4567 ")]
    #[case("(0912) 123 4567")]
    fn canonicalises_known_shapes(#[case] raw: &str) {
        let number = MobileNumber::parse(raw).expect("recognised number");
        assert_eq!(number.as_ref(), "09121234567");
    }

    #[test]
    fn canonical_form_is_a_fixed_point() {
        let once = MobileNumber::parse("+989121234567").expect("recognised number");
        let twice = MobileNumber::parse(once.as_ref()).expect("canonical number");
        assert_eq!(once, twice);
    }

    #[rstest]
    #[case("", MobileNumberError::Empty)]
    #[case("   ", MobileNumberError::Empty)]
    #[case("0912abc4567", MobileNumberError::NonDigit)]
    #[case("02112345678", MobileNumberError::UnrecognisedFormat)]
    #[case("0912123456", MobileNumberError::UnrecognisedFormat)]
    #[case("091212345678", MobileNumberError::UnrecognisedFormat)]
    fn rejects_other_shapes(#[case] raw: &str, #[case] expected: MobileNumberError) {
        assert_eq!(MobileNumber::parse(raw), Err(expected));
    }
}
