//! CPF (Cadastro de Pessoas Físicas) masking and check-digit validation.
//!
//! `mask` runs on every keystroke of a document field and `validate` once the
//! value is submitted. Both are total over any input string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of digits in a complete CPF.
pub const CPF_DIGITS: usize = 11;

/// Length of a fully masked CPF (`NNN.NNN.NNN-NN`).
pub const MASKED_LEN: usize = 14;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpfError {
    #[error("CPF must have 11 digits, found {0}")]
    WrongLength(usize),

    #[error("CPF made of a single repeated digit")]
    RepeatedDigits,

    #[error("CPF check digits do not match")]
    CheckDigitMismatch,
}

/// Returns the ASCII digits of `input`, in order.
pub fn digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Formats free-form input as `NNN.NNN.NNN-NN`, progressively.
///
/// Separators are only inserted once the digit that follows them is present,
/// and digits beyond the eleventh are dropped.
pub fn mask(input: &str) -> String {
    let mut masked = String::with_capacity(MASKED_LEN);

    for (i, digit) in input
        .chars()
        .filter(char::is_ascii_digit)
        .take(CPF_DIGITS)
        .enumerate()
    {
        match i {
            3 | 6 => masked.push('.'),
            9 => masked.push('-'),
            _ => {}
        }
        masked.push(digit);
    }

    masked
}

/// Returns `true` iff `input` holds exactly 11 digits forming a valid CPF.
pub fn validate(input: &str) -> bool {
    Cpf::parse(input).is_ok()
}

/// Computes the two check digits for a 9-digit base.
pub fn check_digits(base: &[u8; 9]) -> [u8; 2] {
    let first = check_digit(base);

    let mut extended = [0u8; 10];
    extended[..9].copy_from_slice(base);
    extended[9] = first;

    [first, check_digit(&extended)]
}

// Weights run from len + 1 down to 2.
fn check_digit(digits: &[u8]) -> u8 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * (top - i as u32))
        .sum();

    // (sum * 10) % 11 never reaches 11; both values are kept as in the
    // stored-data scheme.
    match (sum * 10) % 11 {
        10 | 11 => 0,
        remainder => remainder as u8,
    }
}

/// A CPF whose length and check digits have been verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf([u8; CPF_DIGITS]);

impl Cpf {
    pub fn parse(input: &str) -> Result<Self, CpfError> {
        let raw: Vec<u8> = input
            .bytes()
            .filter(u8::is_ascii_digit)
            .map(|b| b - b'0')
            .collect();

        let digits: [u8; CPF_DIGITS] = raw
            .as_slice()
            .try_into()
            .map_err(|_| CpfError::WrongLength(raw.len()))?;

        if digits.iter().all(|&d| d == digits[0]) {
            return Err(CpfError::RepeatedDigits);
        }

        let mut base = [0u8; 9];
        base.copy_from_slice(&digits[..9]);
        if check_digits(&base) != [digits[9], digits[10]] {
            return Err(CpfError::CheckDigitMismatch);
        }

        Ok(Self(digits))
    }

    /// The 11 digits without punctuation.
    pub fn digits(&self) -> String {
        self.0.iter().map(|d| char::from(b'0' + d)).collect()
    }

    pub fn masked(&self) -> String {
        mask(&self.digits())
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl FromStr for Cpf {
    type Err = CpfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Cpf {
    type Error = CpfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.masked()
    }
}

/// State of a CPF input field after a keystroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CpfField {
    pub masked: String,
    pub invalid: bool,
}

impl CpfField {
    /// Masks the input and flags it only once the value is complete.
    pub fn from_input(input: &str) -> Self {
        let masked = mask(input);
        let invalid = masked.len() == MASKED_LEN && !validate(&masked);
        Self { masked, invalid }
    }

    pub fn is_complete(&self) -> bool {
        self.masked.len() == MASKED_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_progressive() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("123"), "123");
        assert_eq!(mask("1234"), "123.4");
        assert_eq!(mask("123456"), "123.456");
        assert_eq!(mask("1234567"), "123.456.7");
        assert_eq!(mask("123456789"), "123.456.789");
        assert_eq!(mask("1234567890"), "123.456.789-0");
        assert_eq!(mask("12345678901"), "123.456.789-01");
    }

    #[test]
    fn test_mask_strips_and_truncates() {
        assert_eq!(mask("529.982.247-25"), "529.982.247-25");
        assert_eq!(mask("abc529 982/24725xyz"), "529.982.247-25");
        assert_eq!(mask("52998224725999"), "529.982.247-25");
        assert_eq!(mask("no digits"), "");
    }

    #[test]
    fn test_validate_reference_values() {
        assert!(validate("529.982.247-25"));
        assert!(validate("52998224725"));
        assert!(validate(&mask("52998224725")));
        assert!(!validate("529.982.247-26"));
        assert!(!validate("123.456.789-00"));
        assert!(!validate("111.111.111-11"));
        assert!(!validate("000.000.000-00"));
    }

    #[test]
    fn test_validate_wrong_length() {
        assert!(!validate("123.456.789-"));
        assert!(!validate(""));
        assert!(!validate("529.982.247-250"));
    }

    #[test]
    fn test_parse_reports_reason() {
        assert_eq!(Cpf::parse("123.456.789-"), Err(CpfError::WrongLength(9)));
        assert_eq!(Cpf::parse("999.999.999-99"), Err(CpfError::RepeatedDigits));
        assert_eq!(
            Cpf::parse("529.982.247-26"),
            Err(CpfError::CheckDigitMismatch)
        );
    }

    #[test]
    fn test_check_digits() {
        assert_eq!(check_digits(&[5, 2, 9, 9, 8, 2, 2, 4, 7]), [2, 5]);
        assert_eq!(check_digits(&[0, 0, 0, 0, 0, 0, 0, 0, 1])[0], 9);
        // 6 * 2 = 12, (12 * 10) % 11 == 10 collapses to 0
        assert_eq!(check_digits(&[0, 0, 0, 0, 0, 0, 0, 0, 6])[0], 0);
    }

    #[test]
    fn test_cpf_display_and_serde() {
        let cpf: Cpf = "52998224725".parse().unwrap();
        assert_eq!(cpf.to_string(), "529.982.247-25");
        assert_eq!(cpf.digits(), "52998224725");

        let json = serde_json::to_string(&cpf).unwrap();
        assert_eq!(json, "\"529.982.247-25\"");
        let back: Cpf = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cpf);

        assert!(serde_json::from_str::<Cpf>("\"123.456.789-00\"").is_err());
    }

    #[test]
    fn test_field_flags_only_complete_values() {
        let partial = CpfField::from_input("5299822");
        assert_eq!(partial.masked, "529.982.2");
        assert!(!partial.invalid);
        assert!(!partial.is_complete());

        let bad = CpfField::from_input("52998224726");
        assert!(bad.is_complete());
        assert!(bad.invalid);

        let good = CpfField::from_input("52998224725");
        assert!(!good.invalid);
    }
}
