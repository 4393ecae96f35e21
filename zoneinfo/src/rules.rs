//! Compiled zone rules and the queries they answer.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    types::{epoch_days_for_rule_date, LocalDateTime, Month, TimeDefinition, WeekDay},
    utils::MAX_YEAR,
};

// ==== ZoneOffsetTransition ====

/// A change of offset at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneOffsetTransition {
    /// The instant of the transition in epoch seconds.
    pub epoch_seconds: i64,
    /// The offset in seconds before the transition.
    pub offset_before: i64,
    /// The offset in seconds after the transition.
    pub offset_after: i64,
}

impl ZoneOffsetTransition {
    /// Creates a transition from the local date-time it occurs at, measured
    /// with the offset before the transition.
    pub const fn new(local: LocalDateTime, offset_before: i64, offset_after: i64) -> Self {
        Self {
            epoch_seconds: local.to_epoch_seconds(offset_before),
            offset_before,
            offset_after,
        }
    }

    /// The local date-time at the transition measured with the offset before.
    pub const fn date_time_before(&self) -> LocalDateTime {
        LocalDateTime::from_epoch_seconds(self.epoch_seconds, self.offset_before)
    }

    /// The local date-time at the transition measured with the offset after.
    pub const fn date_time_after(&self) -> LocalDateTime {
        LocalDateTime::from_epoch_seconds(self.epoch_seconds, self.offset_after)
    }

    /// The change in offset, in seconds.
    pub const fn duration(&self) -> i64 {
        self.offset_after - self.offset_before
    }

    /// A gap skips local time, e.g. the start of daylight savings.
    pub const fn is_gap(&self) -> bool {
        self.offset_after > self.offset_before
    }

    /// An overlap repeats local time, e.g. the end of daylight savings.
    pub const fn is_overlap(&self) -> bool {
        self.offset_after < self.offset_before
    }
}

// ==== ZoneOffsetTransitionRule ====

/// A transition that recurs every year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneOffsetTransitionRule {
    pub month: Month,
    /// A positive day of month, or a negative count back from the month end.
    pub day_of_month_indicator: i8,
    pub day_of_week: Option<WeekDay>,
    pub second_of_day: u32,
    pub time_end_of_day: bool,
    pub time_definition: TimeDefinition,
    pub standard_offset: i64,
    pub offset_before: i64,
    pub offset_after: i64,
}

impl ZoneOffsetTransitionRule {
    /// Creates the transition this rule describes in `year`.
    pub fn create_transition(&self, year: i32) -> ZoneOffsetTransition {
        let mut epoch_days = epoch_days_for_rule_date(
            year as i64,
            self.month,
            self.day_of_month_indicator,
            self.day_of_week,
        );
        if self.time_end_of_day {
            epoch_days += 1;
        }
        let local = LocalDateTime::from_epoch_days(epoch_days, self.second_of_day);
        let transition =
            self.time_definition
                .create_date_time(local, self.standard_offset, self.offset_before);
        ZoneOffsetTransition::new(transition, self.offset_before, self.offset_after)
    }
}

// ==== ZoneRules ====

/// The complete offset history of a zone.
///
/// Instants before the first transition use the initial offsets. Instants
/// after the last wall transition are resolved with the recurring rules
/// when there are any.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneRules {
    pub initial_standard_offset: i64,
    pub initial_wall_offset: i64,
    /// Changes of the standard offset, sorted by instant.
    pub standard_transitions: Vec<ZoneOffsetTransition>,
    /// Changes of the wall offset, sorted by instant.
    pub wall_transitions: Vec<ZoneOffsetTransition>,
    pub recurring_rules: Vec<ZoneOffsetTransitionRule>,
}

impl ZoneRules {
    /// Creates rules for a zone that always uses `offset`.
    pub const fn fixed(offset: i64) -> Self {
        Self {
            initial_standard_offset: offset,
            initial_wall_offset: offset,
            standard_transitions: Vec::new(),
            wall_transitions: Vec::new(),
            recurring_rules: Vec::new(),
        }
    }

    pub fn is_fixed_offset(&self) -> bool {
        self.wall_transitions.is_empty() && self.recurring_rules.is_empty()
    }

    /// Returns the wall offset in seconds in effect at `epoch_seconds`.
    pub fn offset_at(&self, epoch_seconds: i64) -> i64 {
        if self.uses_recurring_rules(epoch_seconds) {
            let year = self.last_historic_year_of(epoch_seconds);
            let transitions = self.recurring_transitions(year);
            let mut last = None;
            for transition in &transitions {
                if epoch_seconds < transition.epoch_seconds {
                    return transition.offset_before;
                }
                last = Some(transition);
            }
            if let Some(last) = last {
                return last.offset_after;
            }
        }
        let index = self
            .wall_transitions
            .partition_point(|t| t.epoch_seconds <= epoch_seconds);
        match index.checked_sub(1) {
            Some(i) => self.wall_transitions[i].offset_after,
            None => self.initial_wall_offset,
        }
    }

    /// Returns the standard offset in seconds in effect at `epoch_seconds`.
    pub fn standard_offset_at(&self, epoch_seconds: i64) -> i64 {
        let index = self
            .standard_transitions
            .partition_point(|t| t.epoch_seconds <= epoch_seconds);
        match index.checked_sub(1) {
            Some(i) => self.standard_transitions[i].offset_after,
            None => self.initial_standard_offset,
        }
    }

    /// Returns the savings in seconds in effect at `epoch_seconds`.
    pub fn daylight_savings_amount(&self, epoch_seconds: i64) -> i64 {
        self.offset_at(epoch_seconds) - self.standard_offset_at(epoch_seconds)
    }

    pub fn is_daylight_savings(&self, epoch_seconds: i64) -> bool {
        self.offset_at(epoch_seconds) != self.standard_offset_at(epoch_seconds)
    }

    /// Returns the first transition strictly after `epoch_seconds`.
    pub fn next_transition(&self, epoch_seconds: i64) -> Option<ZoneOffsetTransition> {
        let last_historic = self.wall_transitions.last();
        if last_historic.map_or(true, |last| epoch_seconds >= last.epoch_seconds) {
            if self.recurring_rules.is_empty() {
                return None;
            }
            let year = self.last_historic_year_of(epoch_seconds);
            if let Some(transition) = self
                .recurring_transitions(year)
                .into_iter()
                .find(|t| epoch_seconds < t.epoch_seconds)
            {
                return Some(transition);
            }
            if year < MAX_YEAR {
                return self.recurring_transitions(year + 1).first().copied();
            }
            return None;
        }
        let index = self
            .wall_transitions
            .partition_point(|t| t.epoch_seconds <= epoch_seconds);
        self.wall_transitions.get(index).copied()
    }

    /// Returns the last transition strictly before `epoch_seconds`.
    pub fn previous_transition(&self, epoch_seconds: i64) -> Option<ZoneOffsetTransition> {
        if self.uses_recurring_rules(epoch_seconds) {
            let year = self.last_historic_year_of(epoch_seconds);
            if let Some(transition) = self
                .recurring_transitions(year)
                .into_iter()
                .rev()
                .find(|t| epoch_seconds > t.epoch_seconds)
            {
                return Some(transition);
            }
            let last_historic_year = self
                .wall_transitions
                .last()
                .map(|t| year_of(t.epoch_seconds, t.offset_after));
            if last_historic_year.map_or(true, |last| year - 1 > last) {
                return self.recurring_transitions(year - 1).last().copied();
            }
        }
        let index = self
            .wall_transitions
            .partition_point(|t| t.epoch_seconds < epoch_seconds);
        index
            .checked_sub(1)
            .and_then(|i| self.wall_transitions.get(i))
            .copied()
    }

    /// Returns the transitions that occur in the local `year`, with
    /// recurring rules expanded past the last explicit transition.
    pub fn transitions_for_year(&self, year: i32) -> Vec<ZoneOffsetTransition> {
        let mut transitions: Vec<ZoneOffsetTransition> = self
            .wall_transitions
            .iter()
            .filter(|t| year_of(t.epoch_seconds, t.offset_before) == year)
            .copied()
            .collect();
        let last_historic = self.wall_transitions.last();
        for transition in self.recurring_transitions(year) {
            if last_historic.map_or(true, |last| transition.epoch_seconds > last.epoch_seconds) {
                transitions.push(transition);
            }
        }
        transitions
    }

    fn uses_recurring_rules(&self, epoch_seconds: i64) -> bool {
        !self.recurring_rules.is_empty()
            && self
                .wall_transitions
                .last()
                .map_or(true, |last| epoch_seconds > last.epoch_seconds)
    }

    fn last_historic_year_of(&self, epoch_seconds: i64) -> i32 {
        let offset = self
            .wall_transitions
            .last()
            .map_or(self.initial_wall_offset, |t| t.offset_after);
        year_of(epoch_seconds, offset)
    }

    fn recurring_transitions(&self, year: i32) -> Vec<ZoneOffsetTransition> {
        self.recurring_rules
            .iter()
            .map(|rule| rule.create_transition(year))
            .collect()
    }
}

fn year_of(epoch_seconds: i64, offset: i64) -> i32 {
    LocalDateTime::from_epoch_seconds(epoch_seconds, offset).year()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Rules of the form `Rule EU 1981 max - Mar lastSun 1:00u 1:00 S`
    // and `Rule EU 1996 max - Oct lastSun 1:00u 0 -` with a standard
    // offset of +01:00.
    fn central_europe() -> ZoneRules {
        let spring = ZoneOffsetTransitionRule {
            month: Month::Mar,
            day_of_month_indicator: 25,
            day_of_week: Some(WeekDay::Sun),
            second_of_day: 3600,
            time_end_of_day: false,
            time_definition: TimeDefinition::Utc,
            standard_offset: 3600,
            offset_before: 3600,
            offset_after: 7200,
        };
        let autumn = ZoneOffsetTransitionRule {
            month: Month::Oct,
            offset_before: 7200,
            offset_after: 3600,
            ..spring
        };
        ZoneRules {
            initial_standard_offset: 3600,
            initial_wall_offset: 3600,
            standard_transitions: Vec::new(),
            wall_transitions: Vec::new(),
            recurring_rules: Vec::from([spring, autumn]),
        }
    }

    #[test]
    fn recurring_rule_transition() {
        let rules = central_europe();
        let spring = rules.recurring_rules[0].create_transition(2025);
        // 2025-03-30T01:00Z
        assert_eq!(spring.epoch_seconds, 1_743_296_400);
        assert_eq!(
            spring.date_time_before(),
            LocalDateTime::new(2025, 3, 30, 2 * 3600)
        );
        assert_eq!(
            spring.date_time_after(),
            LocalDateTime::new(2025, 3, 30, 3 * 3600)
        );
        assert!(spring.is_gap());
        assert_eq!(spring.duration(), 3600);
    }

    #[test]
    fn offsets_from_recurring_rules() {
        let rules = central_europe();
        assert!(!rules.is_fixed_offset());
        // 2025-01-15T00:00Z
        assert_eq!(rules.offset_at(1_736_899_200), 3600);
        // 2025-07-01T00:00Z
        assert_eq!(rules.offset_at(1_751_328_000), 7200);
        assert!(rules.is_daylight_savings(1_751_328_000));
        assert_eq!(rules.daylight_savings_amount(1_751_328_000), 3600);
        assert_eq!(rules.standard_offset_at(1_751_328_000), 3600);
        // Exactly at the transition the new offset applies.
        assert_eq!(rules.offset_at(1_743_296_400), 7200);
        assert_eq!(rules.offset_at(1_743_296_399), 3600);
    }

    #[test]
    fn next_and_previous() {
        let rules = central_europe();
        let next = rules.next_transition(1_736_899_200).unwrap();
        assert_eq!(next.epoch_seconds, 1_743_296_400);
        let after = rules.next_transition(next.epoch_seconds).unwrap();
        assert!(after.is_overlap());
        assert_eq!(
            rules.previous_transition(after.epoch_seconds),
            Some(next)
        );
        // The previous transition of early 2025 is in October 2024.
        let previous = rules.previous_transition(1_736_899_200).unwrap();
        assert_eq!(previous.date_time_before().year(), 2024);
        assert_eq!(rules.transitions_for_year(2025).len(), 2);
    }

    #[test]
    fn fixed_rules() {
        let rules = ZoneRules::fixed(-18_000);
        assert!(rules.is_fixed_offset());
        assert_eq!(rules.offset_at(0), -18_000);
        assert_eq!(rules.next_transition(0), None);
        assert_eq!(rules.previous_transition(0), None);
        assert!(rules.transitions_for_year(2000).is_empty());
    }

    #[test]
    fn historic_lookup() {
        let transition = ZoneOffsetTransition::new(LocalDateTime::new(1970, 1, 2, 0), 0, 3600);
        let rules = ZoneRules {
            initial_standard_offset: 0,
            initial_wall_offset: 0,
            standard_transitions: Vec::from([transition]),
            wall_transitions: Vec::from([transition]),
            recurring_rules: Vec::new(),
        };
        assert_eq!(rules.offset_at(86_399), 0);
        assert_eq!(rules.offset_at(86_400), 3600);
        assert_eq!(rules.standard_offset_at(86_400), 3600);
        assert_eq!(rules.next_transition(0), Some(transition));
        assert_eq!(rules.next_transition(86_400), None);
        assert_eq!(rules.previous_transition(86_400), None);
        assert_eq!(rules.previous_transition(86_401), Some(transition));
        assert_eq!(rules.transitions_for_year(1970), Vec::from([transition]));
    }
}
