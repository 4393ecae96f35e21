//! The zone rules builder.
//!
//! A [`ZoneRulesBuilder`] collects windows of time, each with a standard
//! offset and either a fixed amount of savings or a set of savings rules,
//! and reduces them to [`ZoneRules`] with [`ZoneRulesBuilder::to_rules`].
//! Building consumes the builder.

use alloc::vec::Vec;

use crate::{
    error::ZoneRulesError,
    rules::{ZoneOffsetTransition, ZoneOffsetTransitionRule, ZoneRules},
    types::{epoch_days_for_rule_date, LocalDateTime, Month, TimeDefinition, WeekDay},
    utils::{self, MAX_YEAR, MIN_YEAR},
};

/// The maximum number of rules a single window may hold.
pub const MAX_WINDOW_RULES: usize = 2000;

/// A savings rule to add to the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRule {
    pub start_year: i32,
    /// `MAX_YEAR` marks a rule that recurs forever.
    pub end_year: i32,
    pub month: Month,
    /// A positive day of month, or a negative count back from the month end.
    pub day_of_month_indicator: i8,
    pub day_of_week: Option<WeekDay>,
    pub second_of_day: u32,
    pub time_end_of_day: bool,
    pub time_definition: TimeDefinition,
    pub savings: i64,
}

impl WindowRule {
    fn validate(&self) -> Result<(), ZoneRulesError> {
        for year in [self.start_year, self.end_year] {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                return Err(ZoneRulesError::YearOutOfRange(year));
            }
        }
        if self.start_year > self.end_year {
            return Err(ZoneRulesError::YearOutOfRange(self.end_year));
        }
        if !(-28..=31).contains(&self.day_of_month_indicator) || self.day_of_month_indicator == 0
        {
            return Err(ZoneRulesError::InvalidDayOfMonthIndicator(
                self.day_of_month_indicator,
            ));
        }
        if self.second_of_day >= utils::SECONDS_PER_DAY as u32 {
            return Err(ZoneRulesError::InvalidTimeOfDay(self.second_of_day as i64));
        }
        if self.time_end_of_day && self.second_of_day != 0 {
            return Err(ZoneRulesError::EndOfDayNotMidnight);
        }
        Ok(())
    }
}

/// A rule for one concrete year.
#[derive(Debug, Clone, Copy)]
struct TzRule {
    year: i32,
    month: Month,
    day_of_month_indicator: i8,
    day_of_week: Option<WeekDay>,
    second_of_day: u32,
    time_end_of_day: bool,
    time_definition: TimeDefinition,
    savings: i64,
}

impl TzRule {
    fn new(year: i32, rule: &WindowRule) -> Self {
        Self {
            year,
            month: rule.month,
            day_of_month_indicator: rule.day_of_month_indicator,
            day_of_week: rule.day_of_week,
            second_of_day: rule.second_of_day,
            time_end_of_day: rule.time_end_of_day,
            time_definition: rule.time_definition,
            savings: rule.savings,
        }
    }

    fn as_window_rule(&self, start_year: i32, end_year: i32) -> WindowRule {
        WindowRule {
            start_year,
            end_year,
            month: self.month,
            day_of_month_indicator: self.day_of_month_indicator,
            day_of_week: self.day_of_week,
            second_of_day: self.second_of_day,
            time_end_of_day: self.time_end_of_day,
            time_definition: self.time_definition,
            savings: self.savings,
        }
    }

    fn epoch_days(&self) -> i64 {
        epoch_days_for_rule_date(
            self.year as i64,
            self.month,
            self.day_of_month_indicator,
            self.day_of_week,
        )
    }

    fn sort_key(&self) -> (i32, Month, i64, u32) {
        let end_of_day = if self.time_end_of_day {
            utils::SECONDS_PER_DAY as u32
        } else {
            0
        };
        (
            self.year,
            self.month,
            self.epoch_days(),
            self.second_of_day + end_of_day,
        )
    }

    fn to_transition(&self, standard_offset: i64, savings_before: i64) -> ZoneOffsetTransition {
        let mut epoch_days = self.epoch_days();
        if self.time_end_of_day {
            epoch_days += 1;
        }
        let local = LocalDateTime::from_epoch_days(epoch_days, self.second_of_day);
        let wall_offset = standard_offset + savings_before;
        let date_time = self
            .time_definition
            .create_date_time(local, standard_offset, wall_offset);
        ZoneOffsetTransition::new(date_time, wall_offset, standard_offset + self.savings)
    }

    fn to_transition_rule(
        &self,
        standard_offset: i64,
        savings_before: i64,
    ) -> ZoneOffsetTransitionRule {
        let mut month = self.month;
        let mut day_of_month_indicator = self.day_of_month_indicator;
        let mut day_of_week = self.day_of_week;
        let mut time_end_of_day = self.time_end_of_day;
        // `lastSun` becomes `Sun>=25` outside of February.
        if day_of_month_indicator < 0 && day_of_week.is_some() && month != Month::Feb {
            day_of_month_indicator = month.length(true) as i8 - 6;
        }
        if time_end_of_day
            && day_of_month_indicator > 0
            && !(day_of_month_indicator == 28 && month == Month::Feb)
        {
            let epoch_days =
                utils::epoch_days_from_date(2004, month as u8, day_of_month_indicator as i64) + 1;
            let (_, next_month, next_day) = utils::date_from_epoch_days(epoch_days);
            month = Month::from_number(next_month).unwrap_or(month);
            day_of_month_indicator = next_day as i8;
            day_of_week = day_of_week.map(|d| d.plus(1));
            time_end_of_day = false;
        }
        let transition = self.to_transition(standard_offset, savings_before);
        ZoneOffsetTransitionRule {
            month,
            day_of_month_indicator,
            day_of_week,
            second_of_day: self.second_of_day,
            time_end_of_day,
            time_definition: self.time_definition,
            standard_offset,
            offset_before: transition.offset_before,
            offset_after: transition.offset_after,
        }
    }
}

/// A window of time with a single standard offset.
#[derive(Debug, Clone)]
struct TzWindow {
    standard_offset: i64,
    window_end: LocalDateTime,
    time_definition: TimeDefinition,
    fixed_savings: Option<i64>,
    rules: Vec<TzRule>,
    max_last_rule_start_year: i32,
    last_rules: Vec<TzRule>,
}

impl TzWindow {
    fn new(standard_offset: i64, window_end: LocalDateTime, time_definition: TimeDefinition) -> Self {
        Self {
            standard_offset,
            window_end,
            time_definition,
            fixed_savings: None,
            rules: Vec::new(),
            max_last_rule_start_year: MIN_YEAR,
            last_rules: Vec::new(),
        }
    }

    fn is_forever(&self) -> bool {
        self.window_end == LocalDateTime::MAX
    }

    fn set_fixed_savings(&mut self, savings: i64) -> Result<(), ZoneRulesError> {
        if !self.rules.is_empty() || !self.last_rules.is_empty() {
            return Err(ZoneRulesError::MixedSavings);
        }
        self.fixed_savings = Some(savings);
        Ok(())
    }

    fn add_rule(&mut self, rule: &WindowRule) -> Result<(), ZoneRulesError> {
        if self.fixed_savings.is_some() {
            return Err(ZoneRulesError::MixedSavings);
        }
        rule.validate()?;
        self.add_rule_years(rule)
    }

    /// Adds a concrete rule for every year of `rule`, nothing when its
    /// start year is past its end year.
    fn add_rule_years(&mut self, rule: &WindowRule) -> Result<(), ZoneRulesError> {
        let last_rule = rule.end_year == MAX_YEAR;
        let end_year = if last_rule {
            rule.start_year
        } else {
            rule.end_year
        };
        for year in rule.start_year..=end_year {
            if self.rules.len() >= MAX_WINDOW_RULES {
                return Err(ZoneRulesError::TooManyRules);
            }
            let tz_rule = TzRule::new(year, rule);
            if last_rule {
                self.last_rules.push(tz_rule);
                self.max_last_rule_start_year =
                    self.max_last_rule_start_year.max(rule.start_year);
            } else {
                self.rules.push(tz_rule);
            }
        }
        Ok(())
    }

    /// Expands the recurring rules into concrete rules up to a common
    /// start year, then sorts both lists.
    fn tidy(&mut self, window_start_year: i32) -> Result<(), ZoneRulesError> {
        if self.last_rules.len() == 1 {
            return Err(ZoneRulesError::SingleLastRule);
        }
        if self.is_forever() {
            self.max_last_rule_start_year =
                self.max_last_rule_start_year.max(window_start_year) + 1;
            let max_year = self.max_last_rule_start_year;
            let mut last_rules = core::mem::take(&mut self.last_rules);
            for last_rule in &mut last_rules {
                self.add_rule_years(&last_rule.as_window_rule(last_rule.year, max_year))?;
                last_rule.year = max_year + 1;
            }
            self.last_rules = last_rules;
            if self.max_last_rule_start_year == MAX_YEAR {
                self.last_rules.clear();
            } else {
                self.max_last_rule_start_year += 1;
            }
        } else {
            let end_year = self.window_end.year();
            let last_rules = core::mem::take(&mut self.last_rules);
            // Rules starting after the window add nothing.
            for last_rule in &last_rules {
                self.add_rule_years(&last_rule.as_window_rule(last_rule.year, end_year + 1))?;
            }
            self.max_last_rule_start_year = MAX_YEAR;
        }
        self.rules.sort_by_key(TzRule::sort_key);
        self.last_rules.sort_by_key(TzRule::sort_key);
        if self.rules.is_empty() && self.fixed_savings.is_none() {
            self.fixed_savings = Some(0);
        }
        Ok(())
    }

    fn wall_offset(&self, savings: i64) -> i64 {
        self.standard_offset + savings
    }

    /// The instant the window ends, given the savings in effect at its end.
    fn end_epoch_seconds(&self, savings: i64) -> i64 {
        let wall_offset = self.wall_offset(savings);
        self.time_definition
            .create_date_time(self.window_end, self.standard_offset, wall_offset)
            .to_epoch_seconds(wall_offset)
    }
}

/// Builds the [`ZoneRules`] of one zone from its windows.
#[derive(Debug, Default)]
pub struct ZoneRulesBuilder {
    windows: Vec<TzWindow>,
}

impl ZoneRulesBuilder {
    /// Adds a window that ends at `until`, measured with `time_definition`.
    pub fn add_window(
        &mut self,
        standard_offset: i64,
        until: LocalDateTime,
        time_definition: TimeDefinition,
    ) -> Result<&mut Self, ZoneRulesError> {
        if let Some(previous) = self.windows.last() {
            if previous.is_forever() {
                return Err(ZoneRulesError::WindowAfterForever);
            }
            if until < previous.window_end {
                return Err(ZoneRulesError::WindowsOutOfOrder);
            }
        }
        self.windows
            .push(TzWindow::new(standard_offset, until, time_definition));
        Ok(self)
    }

    /// Adds a window that lasts until the end of time.
    pub fn add_window_forever(&mut self, standard_offset: i64) -> Result<&mut Self, ZoneRulesError> {
        self.add_window(standard_offset, LocalDateTime::MAX, TimeDefinition::Wall)
    }

    /// Sets a fixed amount of savings on the latest window.
    pub fn set_fixed_savings_to_window(
        &mut self,
        savings: i64,
    ) -> Result<&mut Self, ZoneRulesError> {
        self.windows
            .last_mut()
            .ok_or(ZoneRulesError::NoWindows)?
            .set_fixed_savings(savings)?;
        Ok(self)
    }

    /// Adds a savings rule to the latest window.
    pub fn add_rule_to_window(&mut self, rule: WindowRule) -> Result<&mut Self, ZoneRulesError> {
        self.windows
            .last_mut()
            .ok_or(ZoneRulesError::NoWindows)?
            .add_rule(&rule)?;
        Ok(self)
    }

    /// Reduces the windows to zone rules.
    pub fn to_rules(self) -> Result<ZoneRules, ZoneRulesError> {
        let Some(first_window) = self.windows.first() else {
            return Err(ZoneRulesError::NoWindows);
        };
        let initial_standard_offset = first_window.standard_offset;
        let mut loop_standard_offset = first_window.standard_offset;
        let mut loop_savings = first_window.fixed_savings.unwrap_or(0);
        let initial_wall_offset = loop_standard_offset + loop_savings;
        let mut loop_window_start = LocalDateTime::MIN;
        let mut loop_window_offset = initial_wall_offset;

        let mut standard_transitions = Vec::new();
        let mut wall_transitions: Vec<ZoneOffsetTransition> = Vec::new();
        let mut recurring_rules = Vec::new();

        for mut window in self.windows {
            window.tidy(loop_window_start.year())?;
            let window_start_epoch = loop_window_start.to_epoch_seconds(loop_window_offset);

            let effective_savings = match window.fixed_savings {
                Some(savings) => savings,
                None => {
                    let mut savings = 0;
                    for rule in &window.rules {
                        let transition = rule.to_transition(loop_standard_offset, loop_savings);
                        if transition.epoch_seconds > window_start_epoch {
                            break;
                        }
                        savings = rule.savings;
                    }
                    savings
                }
            };

            if loop_standard_offset != window.standard_offset {
                standard_transitions.push(ZoneOffsetTransition {
                    epoch_seconds: window_start_epoch,
                    offset_before: loop_standard_offset,
                    offset_after: window.standard_offset,
                });
                loop_standard_offset = window.standard_offset;
            }

            let effective_wall_offset = loop_standard_offset + effective_savings;
            if loop_window_offset != effective_wall_offset {
                push_wall_transition(
                    &mut wall_transitions,
                    ZoneOffsetTransition::new(
                        loop_window_start,
                        loop_window_offset,
                        effective_wall_offset,
                    ),
                );
            }

            loop_savings = effective_savings;
            for rule in &window.rules {
                let transition = rule.to_transition(loop_standard_offset, loop_savings);
                if transition.epoch_seconds >= window_start_epoch
                    && transition.epoch_seconds < window.end_epoch_seconds(loop_savings)
                    && transition.offset_before != transition.offset_after
                {
                    push_wall_transition(&mut wall_transitions, transition);
                    loop_savings = rule.savings;
                }
            }

            for last_rule in &window.last_rules {
                recurring_rules.push(last_rule.to_transition_rule(loop_standard_offset, loop_savings));
                loop_savings = last_rule.savings;
            }

            loop_window_offset = window.wall_offset(loop_savings);
            loop_window_start = LocalDateTime::from_epoch_seconds(
                window.end_epoch_seconds(loop_savings),
                loop_window_offset,
            );
        }

        #[cfg(feature = "log")]
        log::debug!(
            "Built zone rules with {} wall transitions and {} recurring rules",
            wall_transitions.len(),
            recurring_rules.len()
        );

        Ok(ZoneRules {
            initial_standard_offset,
            initial_wall_offset,
            standard_transitions,
            wall_transitions,
            recurring_rules,
        })
    }
}

/// Keeps the wall transitions strictly increasing.
///
/// A transition at the same instant as the previous one replaces it, and
/// the pair collapses entirely when the offsets end up unchanged.
fn push_wall_transition(
    transitions: &mut Vec<ZoneOffsetTransition>,
    transition: ZoneOffsetTransition,
) {
    match transitions.last_mut() {
        Some(last) if last.epoch_seconds >= transition.epoch_seconds => {
            if last.offset_before == transition.offset_after {
                #[cfg(feature = "log")]
                log::trace!(
                    "Elided transition at {} back to offset {}",
                    transition.epoch_seconds,
                    transition.offset_after
                );
                transitions.pop();
            } else {
                last.offset_after = transition.offset_after;
            }
        }
        _ => transitions.push(transition),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(start_year: i32, end_year: i32, month: Month, savings: i64) -> WindowRule {
        WindowRule {
            start_year,
            end_year,
            month,
            day_of_month_indicator: -1,
            day_of_week: Some(WeekDay::Sun),
            second_of_day: 3600,
            time_end_of_day: false,
            time_definition: TimeDefinition::Utc,
            savings,
        }
    }

    #[test]
    fn fixed_window() {
        let mut builder = ZoneRulesBuilder::default();
        builder.add_window_forever(3600).unwrap();
        let rules = builder.to_rules().unwrap();
        assert!(rules.is_fixed_offset());
        assert_eq!(rules.offset_at(0), 3600);
    }

    #[test]
    fn summer_time_once() {
        // +1 -> +2 -> +1 across the three years 2000 to 2002.
        let mut builder = ZoneRulesBuilder::default();
        builder
            .add_window(3600, LocalDateTime::from_date(2003, 1, 1), TimeDefinition::Wall)
            .unwrap();
        builder.add_rule_to_window(rule(2000, 2000, Month::Mar, 3600)).unwrap();
        builder.add_rule_to_window(rule(2002, 2002, Month::Oct, 0)).unwrap();
        builder.add_window_forever(3600).unwrap();
        let rules = builder.to_rules().unwrap();

        assert_eq!(rules.wall_transitions.len(), 2);
        assert!(rules.wall_transitions[0].epoch_seconds < rules.wall_transitions[1].epoch_seconds);
        assert_eq!(rules.wall_transitions[0].offset_after, 7200);
        assert_eq!(rules.wall_transitions[1].offset_after, 3600);
        assert!(rules.standard_transitions.is_empty());
        assert!(rules.recurring_rules.is_empty());
    }

    #[test]
    fn no_op_rule_is_elided() {
        let mut builder = ZoneRulesBuilder::default();
        builder.add_window_forever(3600).unwrap();
        builder.add_rule_to_window(rule(2000, 2000, Month::Mar, 3600)).unwrap();
        // Still in summer time, so this rule changes nothing.
        builder.add_rule_to_window(rule(2001, 2001, Month::Mar, 3600)).unwrap();
        builder.add_rule_to_window(rule(2002, 2002, Month::Oct, 0)).unwrap();
        let rules = builder.to_rules().unwrap();
        assert_eq!(rules.wall_transitions.len(), 2);
    }

    #[test]
    fn recurring_rules_from_last_rules() {
        let mut builder = ZoneRulesBuilder::default();
        builder
            .add_window(0, LocalDateTime::from_date(1980, 1, 1), TimeDefinition::Wall)
            .unwrap();
        builder.set_fixed_savings_to_window(0).unwrap();
        builder.add_window_forever(3600).unwrap();
        builder.add_rule_to_window(rule(1981, MAX_YEAR, Month::Mar, 3600)).unwrap();
        builder.add_rule_to_window(rule(1996, MAX_YEAR, Month::Oct, 0)).unwrap();
        let rules = builder.to_rules().unwrap();

        assert_eq!(rules.initial_standard_offset, 0);
        assert_eq!(rules.standard_transitions.len(), 1);
        assert_eq!(rules.recurring_rules.len(), 2);
        let spring = rules.recurring_rules[0];
        assert_eq!(spring.month, Month::Mar);
        assert_eq!(spring.day_of_month_indicator, 25);
        assert_eq!((spring.offset_before, spring.offset_after), (3600, 7200));
        let autumn = rules.recurring_rules[1];
        assert_eq!((autumn.offset_before, autumn.offset_after), (7200, 3600));

        // 2025-07-01T00:00Z is in summer time.
        assert_eq!(rules.offset_at(1_751_328_000), 7200);
        // 2025-01-15T00:00Z is not.
        assert_eq!(rules.offset_at(1_736_899_200), 3600);
        for pair in rules.wall_transitions.windows(2) {
            assert!(pair[0].epoch_seconds < pair[1].epoch_seconds);
        }
    }

    #[test]
    fn rejects_invalid_windows() {
        let mut builder = ZoneRulesBuilder::default();
        assert_eq!(
            builder.set_fixed_savings_to_window(0).unwrap_err(),
            ZoneRulesError::NoWindows
        );
        builder
            .add_window(0, LocalDateTime::from_date(1990, 1, 1), TimeDefinition::Wall)
            .unwrap();
        assert_eq!(
            builder
                .add_window(0, LocalDateTime::from_date(1980, 1, 1), TimeDefinition::Wall)
                .unwrap_err(),
            ZoneRulesError::WindowsOutOfOrder
        );
        builder.set_fixed_savings_to_window(0).unwrap();
        assert_eq!(
            builder
                .add_rule_to_window(rule(1985, 1985, Month::Mar, 3600))
                .unwrap_err(),
            ZoneRulesError::MixedSavings
        );
        builder.add_window_forever(0).unwrap();
        assert_eq!(
            builder.add_window_forever(0).unwrap_err(),
            ZoneRulesError::WindowAfterForever
        );
        assert_eq!(
            ZoneRulesBuilder::default().to_rules().unwrap_err(),
            ZoneRulesError::NoWindows
        );
    }

    #[test]
    fn rejects_single_last_rule() {
        let mut builder = ZoneRulesBuilder::default();
        builder.add_window_forever(0).unwrap();
        builder.add_rule_to_window(rule(1981, MAX_YEAR, Month::Mar, 3600)).unwrap();
        assert_eq!(
            builder.to_rules().unwrap_err(),
            ZoneRulesError::SingleLastRule
        );
    }

    #[test]
    fn last_rules_after_window_end_add_nothing() {
        let mut builder = ZoneRulesBuilder::default();
        builder
            .add_window(3600, LocalDateTime::from_date(1920, 1, 1), TimeDefinition::Wall)
            .unwrap();
        builder.add_rule_to_window(rule(2007, MAX_YEAR, Month::Mar, 3600)).unwrap();
        builder.add_rule_to_window(rule(2007, MAX_YEAR, Month::Oct, 0)).unwrap();
        builder.add_window_forever(3600).unwrap();
        builder.add_rule_to_window(rule(2007, MAX_YEAR, Month::Mar, 3600)).unwrap();
        builder.add_rule_to_window(rule(2007, MAX_YEAR, Month::Oct, 0)).unwrap();
        let rules = builder.to_rules().unwrap();

        // 1919-07-01T00:00Z
        assert_eq!(rules.offset_at(-1_593_820_800), 3600);
        assert!(rules
            .wall_transitions
            .iter()
            .all(|t| t.epoch_seconds > 1_167_609_600));
        assert_eq!(rules.recurring_rules.len(), 2);
    }

    #[test]
    fn rule_cap() {
        let mut builder = ZoneRulesBuilder::default();
        builder.add_window_forever(0).unwrap();
        assert_eq!(
            builder
                .add_rule_to_window(rule(1, 3000, Month::Mar, 3600))
                .unwrap_err(),
            ZoneRulesError::TooManyRules
        );
    }

    #[test]
    fn end_of_day_rule_moves_to_next_day() {
        let tz_rule = TzRule::new(
            2000,
            &WindowRule {
                day_of_month_indicator: 8,
                day_of_week: Some(WeekDay::Sat),
                second_of_day: 0,
                time_end_of_day: true,
                time_definition: TimeDefinition::Wall,
                ..rule(2000, MAX_YEAR, Month::Mar, 3600)
            },
        );
        let transition_rule = tz_rule.to_transition_rule(0, 0);
        assert_eq!(transition_rule.day_of_month_indicator, 9);
        assert_eq!(transition_rule.day_of_week, Some(WeekDay::Sun));
        assert!(!transition_rule.time_end_of_day);
    }
}
