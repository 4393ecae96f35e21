//! Fixed offsets from UTC and zone identifiers.

use alloc::{format, string::String};
use core::fmt::Write;

use writeable::{impl_display_with_writeable, LengthHint, Writeable};
use zoneinfo_compiler::ZoneRules;

use crate::{iso::write_padded, provider::ZoneRulesProvider, TemporalError, TemporalResult};

/// The largest offset in either direction, 18 hours.
pub const MAX_OFFSET_SECONDS: i32 = 18 * 3600;

/// A fixed offset from UTC in seconds, within -18:00 to +18:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ZoneOffset(i32);

impl ZoneOffset {
    pub const UTC: Self = Self(0);
    pub const MIN: Self = Self(-MAX_OFFSET_SECONDS);
    pub const MAX: Self = Self(MAX_OFFSET_SECONDS);

    pub fn from_total_seconds(seconds: i32) -> TemporalResult<Self> {
        if seconds.abs() > MAX_OFFSET_SECONDS {
            return Err(TemporalError::range()
                .with_message("Zone offset not in valid range: -18:00 to +18:00"));
        }
        Ok(Self(seconds))
    }

    /// Creates an offset from hours, minutes and seconds that share a sign.
    pub fn from_hours_minutes_seconds(hours: i32, minutes: i32, seconds: i32) -> TemporalResult<Self> {
        if !(-18..=18).contains(&hours) {
            return Err(TemporalError::range().with_message(format!(
                "Zone offset hours not in valid range: value {hours} is not in the range -18 to 18"
            )));
        }
        let signs_agree = if hours > 0 {
            minutes >= 0 && seconds >= 0
        } else if hours < 0 {
            minutes <= 0 && seconds <= 0
        } else {
            (minutes <= 0 && seconds <= 0) || (minutes >= 0 && seconds >= 0)
        };
        if !signs_agree {
            return Err(TemporalError::range()
                .with_message("Zone offset minutes and seconds must have the same sign as hours"));
        }
        if !(-59..=59).contains(&minutes) || !(-59..=59).contains(&seconds) {
            return Err(TemporalError::range()
                .with_message("Zone offset minutes and seconds not in valid range"));
        }
        Self::from_total_seconds(hours * 3600 + minutes * 60 + seconds)
    }

    /// Parses an offset id: `Z`, `+h`, `+hh`, `+hh:mm`, `+hhmm`, `+hh:mm:ss` or `+hhmmss`.
    pub fn from_id(id: &str) -> TemporalResult<Self> {
        if id == "Z" {
            return Ok(Self::UTC);
        }
        let invalid = || TemporalError::range().with_message(format!("Invalid ID for ZoneOffset: {id}"));
        let (sign, digits) = match id.as_bytes().first() {
            Some(b'+') => (1, &id[1..]),
            Some(b'-') => (-1, &id[1..]),
            _ => return Err(invalid()),
        };
        let bytes = digits.as_bytes();
        let pair = |at: usize| -> TemporalResult<i32> {
            match (bytes.get(at), bytes.get(at + 1)) {
                (Some(a @ b'0'..=b'9'), Some(b @ b'0'..=b'9')) => {
                    Ok(i32::from(a - b'0') * 10 + i32::from(b - b'0'))
                }
                _ => Err(invalid()),
            }
        };
        let (hours, minutes, seconds) = match bytes.len() {
            1 if bytes[0].is_ascii_digit() => (i32::from(bytes[0] - b'0'), 0, 0),
            2 => (pair(0)?, 0, 0),
            4 => (pair(0)?, pair(2)?, 0),
            5 if bytes[2] == b':' => (pair(0)?, pair(3)?, 0),
            6 => (pair(0)?, pair(2)?, pair(4)?),
            8 if bytes[2] == b':' && bytes[5] == b':' => (pair(0)?, pair(3)?, pair(6)?),
            _ => return Err(invalid()),
        };
        Self::from_hours_minutes_seconds(sign * hours, sign * minutes, sign * seconds)
    }

    pub const fn total_seconds(&self) -> i32 {
        self.0
    }
}

impl Writeable for ZoneOffset {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        if self.0 == 0 {
            return sink.write_char('Z');
        }
        let abs = self.0.unsigned_abs();
        sink.write_char(if self.0 < 0 { '-' } else { '+' })?;
        write_padded(sink, abs / 3600, 2)?;
        sink.write_char(':')?;
        write_padded(sink, abs / 60 % 60, 2)?;
        if abs % 60 != 0 {
            sink.write_char(':')?;
            write_padded(sink, abs % 60, 2)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::between(1, 9)
    }
}

impl_display_with_writeable!(ZoneOffset);

// ==== ZoneId ====

/// The prefixes that may precede an offset in a zone id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetPrefix {
    Utc,
    Gmt,
    Ut,
}

impl OffsetPrefix {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Utc => "UTC",
            Self::Gmt => "GMT",
            Self::Ut => "UT",
        }
    }

    /// Matches an upper case prefix.
    pub fn from_str_upper(prefix: &str) -> Option<Self> {
        match prefix {
            "UTC" => Some(Self::Utc),
            "GMT" => Some(Self::Gmt),
            "UT" => Some(Self::Ut),
            _ => None,
        }
    }
}

/// A zone identifier: a fixed offset, an offset behind a `UTC`, `GMT` or
/// `UT` prefix, or a region id whose rules come from a
/// [`ZoneRulesProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ZoneId {
    Offset(ZoneOffset),
    Prefixed {
        prefix: OffsetPrefix,
        offset: ZoneOffset,
    },
    Region(String),
}

impl ZoneId {
    /// Parses a zone id.
    ///
    /// Region ids are checked for their format but not looked up.
    pub fn of(id: &str) -> TemporalResult<Self> {
        if id.len() <= 1 || id.starts_with('+') || id.starts_with('-') {
            return ZoneOffset::from_id(id).map(Self::Offset);
        }
        for prefix in [OffsetPrefix::Utc, OffsetPrefix::Gmt, OffsetPrefix::Ut] {
            if let Some(rest) = id.strip_prefix(prefix.as_str()) {
                if rest.is_empty() {
                    return Ok(Self::Prefixed {
                        prefix,
                        offset: ZoneOffset::UTC,
                    });
                }
                if rest.starts_with('+') || rest.starts_with('-') {
                    let offset = ZoneOffset::from_id(rest)?;
                    return Ok(Self::Prefixed { prefix, offset });
                }
            }
        }
        Self::region(id)
    }

    /// Creates a region id, checking only its format.
    pub fn region(id: &str) -> TemporalResult<Self> {
        let mut chars = id.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || "~/._+-".contains(c));
        if !valid || id.len() < 2 {
            return Err(
                TemporalError::range().with_message(format!("Invalid ID for region-based ZoneId: {id}"))
            );
        }
        Ok(Self::Region(id.into()))
    }

    /// The offset when the id is offset based.
    pub fn fixed_offset(&self) -> Option<ZoneOffset> {
        match self {
            Self::Offset(offset) | Self::Prefixed { offset, .. } => Some(*offset),
            Self::Region(_) => None,
        }
    }

    /// Whether this is a bare offset rather than a named zone.
    pub fn is_offset(&self) -> bool {
        matches!(self, Self::Offset(_))
    }

    /// Returns the rules of this zone.
    ///
    /// Offset based ids have fixed rules.
    pub fn rules<'a>(
        &self,
        provider: &'a dyn ZoneRulesProvider,
    ) -> TemporalResult<alloc::borrow::Cow<'a, ZoneRules>> {
        match self {
            Self::Offset(offset) | Self::Prefixed { offset, .. } => Ok(alloc::borrow::Cow::Owned(
                ZoneRules::fixed(i64::from(offset.total_seconds())),
            )),
            Self::Region(id) => provider
                .rules(id)
                .map(alloc::borrow::Cow::Borrowed)
                .ok_or_else(|| {
                    TemporalError::range().with_message(format!("Unknown time-zone ID: {id}"))
                }),
        }
    }

    /// The offset in effect at an instant, given the zone rules.
    pub fn offset_at(
        &self,
        epoch_seconds: i64,
        provider: &dyn ZoneRulesProvider,
    ) -> TemporalResult<ZoneOffset> {
        if let Some(offset) = self.fixed_offset() {
            return Ok(offset);
        }
        let rules = self.rules(provider)?;
        let seconds = i32::try_from(rules.offset_at(epoch_seconds))
            .map_err(|_| TemporalError::range().with_message("Zone offset exceeds range."))?;
        ZoneOffset::from_total_seconds(seconds)
    }
}

impl From<ZoneOffset> for ZoneId {
    fn from(value: ZoneOffset) -> Self {
        Self::Offset(value)
    }
}

impl Writeable for ZoneId {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        match self {
            Self::Offset(offset) => offset.write_to(sink),
            Self::Prefixed { prefix, offset } => {
                sink.write_str(prefix.as_str())?;
                if offset.total_seconds() != 0 {
                    offset.write_to(sink)?;
                }
                Ok(())
            }
            Self::Region(id) => sink.write_str(id),
        }
    }

    fn writeable_length_hint(&self) -> LengthHint {
        match self {
            Self::Region(id) => LengthHint::exact(id.len()),
            _ => LengthHint::between(1, 12),
        }
    }
}

impl_display_with_writeable!(ZoneId);
