//! The range of valid values for a field.

use alloc::format;
use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{TemporalError, TemporalResult};

/// The range of valid values of a field.
///
/// Both ends may vary, for instance day-of-month has a fixed minimum of 1
/// and a maximum that is 28 in the shortest month and 31 in the longest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueRange {
    min_smallest: i64,
    min_largest: i64,
    max_smallest: i64,
    max_largest: i64,
}

impl ValueRange {
    /// A fixed range from `min` to `max` inclusive.
    ///
    /// `min` must not exceed `max`.
    pub const fn of(min: i64, max: i64) -> Self {
        debug_assert!(min <= max);
        Self {
            min_smallest: min,
            min_largest: min,
            max_smallest: max,
            max_largest: max,
        }
    }

    /// A range with both ends given, the caller upholds the ordering.
    pub(crate) const fn new_unchecked(
        min_smallest: i64,
        min_largest: i64,
        max_smallest: i64,
        max_largest: i64,
    ) -> Self {
        Self {
            min_smallest,
            min_largest,
            max_smallest,
            max_largest,
        }
    }

    /// A range with a fixed minimum and a variable maximum.
    pub const fn of_variable_max(min: i64, max_smallest: i64, max_largest: i64) -> Self {
        debug_assert!(min <= max_smallest && max_smallest <= max_largest);
        Self {
            min_smallest: min,
            min_largest: min,
            max_smallest,
            max_largest,
        }
    }

    /// A range where both ends may vary.
    pub fn of_full(
        min_smallest: i64,
        min_largest: i64,
        max_smallest: i64,
        max_largest: i64,
    ) -> TemporalResult<Self> {
        if min_smallest > min_largest {
            return Err(TemporalError::range()
                .with_message("Smallest minimum value must be less than largest minimum value"));
        }
        if max_smallest > max_largest {
            return Err(TemporalError::range()
                .with_message("Smallest maximum value must be less than largest maximum value"));
        }
        if min_largest > max_largest {
            return Err(
                TemporalError::range().with_message("Minimum value must be less than maximum value")
            );
        }
        if min_smallest > max_smallest {
            return Err(TemporalError::range()
                .with_message("Minimum value must be less than smallest maximum value"));
        }
        Ok(Self {
            min_smallest,
            min_largest,
            max_smallest,
            max_largest,
        })
    }

    pub const fn minimum(&self) -> i64 {
        self.min_smallest
    }

    pub const fn largest_minimum(&self) -> i64 {
        self.min_largest
    }

    pub const fn smallest_maximum(&self) -> i64 {
        self.max_smallest
    }

    pub const fn maximum(&self) -> i64 {
        self.max_largest
    }

    /// Whether neither end of the range varies.
    pub const fn is_fixed(&self) -> bool {
        self.min_smallest == self.min_largest && self.max_smallest == self.max_largest
    }

    /// Whether every value of the range fits in an `i32`.
    pub const fn is_int_value(&self) -> bool {
        self.min_smallest >= i32::MIN as i64 && self.max_largest <= i32::MAX as i64
    }

    /// Whether the value is within the outer bounds of the range.
    pub const fn is_valid_value(&self, value: i64) -> bool {
        value >= self.min_smallest && value <= self.max_largest
    }

    /// Whether the value is valid and the whole range fits in an `i32`.
    pub const fn is_valid_int_value(&self, value: i64) -> bool {
        self.is_int_value() && self.is_valid_value(value)
    }

    /// Returns the value if it is valid, otherwise an error naming the field.
    pub fn check_valid_value(&self, value: i64, field: &str) -> TemporalResult<i64> {
        if !self.is_valid_value(value) {
            return Err(self.invalid_value(value, field));
        }
        Ok(value)
    }

    /// Returns the value as an `i32` if it is valid and the range fits in an `i32`.
    pub fn check_valid_int_value(&self, value: i64, field: &str) -> TemporalResult<i32> {
        if !self.is_valid_int_value(value) {
            return Err(self.invalid_value(value, field));
        }
        i32::try_from(value).map_err(|_| self.invalid_value(value, field))
    }

    fn invalid_value(&self, value: i64, field: &str) -> TemporalError {
        TemporalError::range().with_message(format!(
            "Invalid value for {field} (valid values {self}): {value}"
        ))
    }
}

impl Writeable for ValueRange {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        self.min_smallest.write_to(sink)?;
        if self.min_smallest != self.min_largest {
            sink.write_char('/')?;
            self.min_largest.write_to(sink)?;
        }
        sink.write_str(" - ")?;
        self.max_smallest.write_to(sink)?;
        if self.max_smallest != self.max_largest {
            sink.write_char('/')?;
            self.max_largest.write_to(sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::at_least(5)
    }
}

impl_display_with_writeable!(ValueRange);
