//! The `temporal_format` crate formats and parses dates, times, instants
//! and zoned date-times, and compiles zoneinfo source files into the zone
//! rules that the formatter resolves zone ids with.
//!
//! ```rust
//! use temporal_format::{
//!     format::DateTimeFormatter,
//!     iso::{IsoDate, IsoDateTime, IsoTime},
//!     offset::ZoneOffset,
//!     temporal::OffsetDateTime,
//! };
//!
//! let formatter = DateTimeFormatter::of_pattern("yyyy-MM-dd HH:mm xxx").unwrap();
//! let date_time = IsoDateTime::new(
//!     IsoDate::new(2012, 6, 30).unwrap(),
//!     IsoTime::new(12, 30, 0, 0).unwrap(),
//! );
//! let offset = ZoneOffset::from_total_seconds(3600).unwrap();
//! let text = formatter.format(&OffsetDateTime::new(date_time, offset)).unwrap();
//! assert_eq!(text, "2012-06-30 12:30 +01:00");
//!
//! let resolved = formatter.parse(&text).unwrap();
//! assert_eq!(resolved.date_time(), Some(date_time));
//! ```
//!
//! Formatters are built from [`format::PrinterParser`]s, with a
//! [`format::DateTimeFormatterBuilder`] or from a pattern. Locale text and
//! zone rules come from the traits in [`provider`], the zone rules usually
//! from the [`zoneinfo_compiler`] crate.
//!
//! The crate needs `std`: the caches in [`cache`] are shared between
//! threads behind `std::sync` locks.
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    // Currently throws a false positive regarding dependencies that are only used in tests.
    unused_crate_dependencies,
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::cognitive_complexity,
    clippy::missing_errors_doc,
    clippy::let_unit_value,
    clippy::option_if_let_else,

    // It may be worth to look if we can fix the issues highlighted by these lints.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap,

    // Add temporarily - Needs addressing
    clippy::missing_panics_doc,
)]

extern crate alloc;

pub mod cache;
pub mod chronology;
pub mod error;
pub mod field_values;
pub mod fields;
pub mod format;
pub mod iso;
pub mod offset;
pub mod provider;
pub mod range;
pub mod temporal;

/// Re-export of `TinyAsciiStr` from `tinystr`.
pub use tinystr::TinyAsciiStr;

/// Re-export of the zoneinfo compiler.
pub use zoneinfo_compiler;

#[doc(inline)]
pub use error::{ErrorKind, TemporalError};

/// The `temporal_format` result type
pub type TemporalResult<T> = Result<T, TemporalError>;

/// A library specific trait for unwrapping assertions.
pub(crate) trait TemporalUnwrap {
    type Output;

    /// Assertion for unwrapping. This will panic in debug builds, but
    /// returns an error at runtime.
    fn temporal_unwrap(self) -> TemporalResult<Self::Output>;
}

impl<T> TemporalUnwrap for Option<T> {
    type Output = T;

    fn temporal_unwrap(self) -> TemporalResult<Self::Output> {
        debug_assert!(self.is_some());
        self.ok_or(TemporalError::assert())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! temporal_assert {
    ($condition:expr $(,)*) => {
        if !$condition {
            return Err(TemporalError::assert());
        }
    };
    ($condition:expr, $($args:tt)+) => {
        if !$condition {
            #[cfg(feature = "log")]
            log::error!($($args)+);
            return Err(TemporalError::assert());
        }
    };
}
