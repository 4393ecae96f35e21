//! Sign and decimal styles of numeric printer-parsers.

use alloc::string::String;
use core::fmt;

use icu_locale::Locale;

/// When a sign is printed, and whether one is accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignStyle {
    /// Prints a sign only for negative values. Lenient parsing accepts
    /// either sign, strict parsing only a negative one.
    Normal,
    /// Never prints a sign, parsing never accepts one.
    Never,
    /// Rejects negative values when printing, parsing never accepts a sign.
    NotNegative,
    /// Always prints a sign.
    Always,
    /// Prints a positive sign only when the value has more digits than
    /// the minimum width.
    ExceedsPad,
}

impl SignStyle {
    /// Whether a sign may be parsed.
    pub(crate) const fn parse(self, positive: bool, strict: bool, fixed_width: bool) -> bool {
        match self {
            Self::Normal => !positive || !strict,
            Self::Always | Self::ExceedsPad => true,
            Self::Never | Self::NotNegative => !strict && !fixed_width,
        }
    }
}

impl fmt::Display for SignStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "NORMAL",
            Self::Never => "NEVER",
            Self::NotNegative => "NOT_NEGATIVE",
            Self::Always => "ALWAYS",
            Self::ExceedsPad => "EXCEEDS_PAD",
        })
    }
}

/// The characters used for digits, signs and the decimal point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecimalStyle {
    zero_digit: char,
    positive_sign: char,
    negative_sign: char,
    decimal_separator: char,
}

impl DecimalStyle {
    /// ASCII digits, `+`, `-` and `.`.
    pub const STANDARD: Self = Self {
        zero_digit: '0',
        positive_sign: '+',
        negative_sign: '-',
        decimal_separator: '.',
    };

    /// The decimal style of a locale.
    ///
    /// Only the standard style is bundled.
    pub fn of_locale(_locale: &Locale) -> Self {
        Self::STANDARD
    }

    /// Uses digits starting at `zero_digit`, which must be the first of
    /// ten consecutive digit characters.
    pub const fn with_zero_digit(mut self, zero_digit: char) -> Self {
        self.zero_digit = zero_digit;
        self
    }

    pub const fn with_positive_sign(mut self, sign: char) -> Self {
        self.positive_sign = sign;
        self
    }

    pub const fn with_negative_sign(mut self, sign: char) -> Self {
        self.negative_sign = sign;
        self
    }

    pub const fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    pub const fn zero_digit(&self) -> char {
        self.zero_digit
    }

    pub const fn positive_sign(&self) -> char {
        self.positive_sign
    }

    pub const fn negative_sign(&self) -> char {
        self.negative_sign
    }

    pub const fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    /// The value of a digit character, if it is one.
    pub fn convert_to_digit(&self, ch: char) -> Option<u32> {
        let value = u32::from(ch).checked_sub(u32::from(self.zero_digit))?;
        (value <= 9).then_some(value)
    }

    /// Appends ASCII digits converted to this style.
    pub(crate) fn push_digits(&self, ascii_digits: &str, buf: &mut String) {
        if self.zero_digit == '0' {
            buf.push_str(ascii_digits);
            return;
        }
        let zero = u32::from(self.zero_digit);
        for digit in ascii_digits.chars() {
            let offset = u32::from(digit) - u32::from('0');
            buf.push(char::from_u32(zero + offset).unwrap_or(digit));
        }
    }
}

impl Default for DecimalStyle {
    fn default() -> Self {
        Self::STANDARD
    }
}
