//! Implementation of zone info's `Rule` records.

use alloc::{borrow::ToOwned, string::String};

use crate::{
    builder::WindowRule,
    error::ZoneRulesError,
    parser::{next_split, ContextParse, LineParseContext, ZoneInfoParseError},
    types::{DayOfMonth, Month, QualifiedTime, RuleYear, Time},
    utils::{self, SECONDS_PER_DAY},
};

/// A single `Rule` line.
///
/// ```txt
/// # Rule  NAME    FROM    TO      -       IN      ON      AT      SAVE    LETTER/S
/// Rule    EU      1981    max     -       Mar     lastSun  1:00u  1:00    S
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RuleRecord {
    pub from: RuleYear,
    pub to: RuleYear,
    pub in_month: Month,
    pub on_date: DayOfMonth,
    pub at: QualifiedTime,
    pub save: Time,
    pub letter: Option<String>,
}

impl RuleRecord {
    /// Parses a `Rule` line into the rule set name and the record.
    pub fn parse(
        line: &str,
        context: &mut LineParseContext,
    ) -> Result<(String, Self), ZoneInfoParseError> {
        context.enter("Rule");
        let mut splits = line.split_whitespace();
        next_split(&mut splits, context)?; // Consume the Rule
        let identifier = next_split(&mut splits, context)?.to_owned();
        let from = next_split(&mut splits, context)?.context_parse::<RuleYear>(context)?;
        let to = RuleYear::parse_to_year(next_split(&mut splits, context)?, from, context)?;
        next_split(&mut splits, context)?; // The reserved TYPE column
        let in_month = next_split(&mut splits, context)?.context_parse::<Month>(context)?;
        let on_date = next_split(&mut splits, context)?.context_parse::<DayOfMonth>(context)?;
        let at = next_split(&mut splits, context)?.context_parse::<QualifiedTime>(context)?;
        let save = next_split(&mut splits, context)?.context_parse::<Time>(context)?;
        let potential_letter = next_split(&mut splits, context)?;
        let letter = if potential_letter == "-" {
            None
        } else {
            Some(potential_letter.to_owned())
        };

        context.exit();
        let data = RuleRecord {
            from,
            to,
            in_month,
            on_date,
            at,
            save,
            letter,
        };

        Ok((identifier, data))
    }

    /// Returns whether the rule applies savings.
    pub fn is_dst(&self) -> bool {
        self.save != Time::default()
    }

    /// Converts the record into a rule that can be added to a builder window.
    ///
    /// `Sun<=d` days are expressed as `Sun>=(d-6)`. When `d` is below 7 the
    /// start day falls in the previous month, which is resolved against the
    /// leap year 2004.
    pub fn to_window_rule(&self) -> Result<WindowRule, ZoneRulesError> {
        let (mut month, mut day_of_month_indicator, day_of_week) = match self.on_date {
            DayOfMonth::Day(day) => (self.in_month, day as i8, None),
            DayOfMonth::Last(week_day) => (self.in_month, -1, Some(week_day)),
            DayOfMonth::WeekDayGEThanMonthDay(week_day, day) => {
                (self.in_month, day as i8, Some(week_day))
            }
            DayOfMonth::WeekDayLEThanMonthDay(week_day, day) if day >= 7 => {
                (self.in_month, day as i8 - 6, Some(week_day))
            }
            DayOfMonth::WeekDayLEThanMonthDay(week_day, day) => {
                let epoch_days =
                    utils::epoch_days_from_date(2004, self.in_month as u8, day as i64) - 6;
                let (_, month, day) = utils::date_from_epoch_days(epoch_days);
                let month = Month::from_number(month)
                    .ok_or(ZoneRulesError::InvalidDayOfMonthIndicator(day as i8))?;
                (month, day as i8, Some(week_day))
            }
        };

        let time = self.at.time().as_secs();
        if time < 0 {
            return Err(ZoneRulesError::InvalidTimeOfDay(time));
        }
        let mut time_end_of_day = false;
        let mut second_of_day = time;
        if time == SECONDS_PER_DAY {
            time_end_of_day = true;
            second_of_day = 0;
        } else if time > SECONDS_PER_DAY {
            if day_of_month_indicator < 0 {
                return Err(ZoneRulesError::InvalidTimeOfDay(time));
            }
            day_of_month_indicator += (time / SECONDS_PER_DAY) as i8;
            second_of_day = time % SECONDS_PER_DAY;
            if day_of_month_indicator > month.length(true) as i8 {
                day_of_month_indicator -= month.length(true) as i8;
                month = Month::from_number(month as u8 % 12 + 1).unwrap_or(Month::Jan);
            }
        }

        Ok(WindowRule {
            start_year: self.from.to_i32(),
            end_year: self.to.to_i32(),
            month,
            day_of_month_indicator,
            day_of_week,
            second_of_day: second_of_day as u32,
            time_end_of_day,
            time_definition: self.at.time_definition(),
            savings: self.save.as_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Sign, TimeDefinition, WeekDay};
    use crate::utils::MAX_YEAR;

    const TEST_DATA: [&str; 22] = [
        "Rule	Algeria	1916	only	-	Jun	14	23:00s	1:00	S",
        "Rule	Algeria	1916	1919	-	Oct	Sun>=1	23:00s	0	-",
        "Rule	Algeria	1917	only	-	Mar	24	23:00s	1:00	S",
        "Rule	Algeria	1918	only	-	Mar	 9	23:00s	1:00	S",
        "Rule	Algeria	1919	only	-	Mar	 1	23:00s	1:00	S",
        "Rule	Algeria	1920	only	-	Feb	14	23:00s	1:00	S",
        "Rule	Algeria	1920	only	-	Oct	23	23:00s	0	-",
        "Rule	Algeria	1921	only	-	Mar	14	23:00s	1:00	S",
        "Rule	Algeria	1921	only	-	Jun	21	23:00s	0	-",
        "Rule	Algeria	1939	only	-	Sep	11	23:00s	1:00	S",
        "Rule	Algeria	1939	only	-	Nov	19	 1:00	0	-",
        "Rule	Algeria	1944	1945	-	Apr	Mon>=1	 2:00	1:00	S",
        "Rule	Algeria	1944	only	-	Oct	 8	 2:00	0	-",
        "Rule	Algeria	1945	only	-	Sep	16	 1:00	0	-",
        "Rule	Algeria	1971	only	-	Apr	25	23:00s	1:00	S",
        "Rule	Algeria	1971	only	-	Sep	26	23:00s	0	-",
        "Rule	Algeria	1977	only	-	May	 6	 0:00	1:00	S",
        "Rule	Algeria	1977	only	-	Oct	21	 0:00	0	-",
        "Rule	Algeria	1978	only	-	Mar	24	 1:00	1:00	S",
        "Rule	Algeria	1978	only	-	Sep	22	 3:00	0	-",
        "Rule	Algeria	1980	only	-	Apr	25	 0:00	1:00	S",
        "Rule	Algeria	1980	only	-	Oct	31	 2:00	0	-",
    ];

    fn parse(line: &str) -> RuleRecord {
        RuleRecord::parse(line, &mut LineParseContext::default())
            .unwrap()
            .1
    }

    #[test]
    fn rule_test() {
        let (identifier, data) =
            RuleRecord::parse(TEST_DATA[0], &mut LineParseContext::default()).unwrap();
        assert_eq!(identifier, "Algeria");
        assert_eq!(
            data,
            RuleRecord {
                from: RuleYear::Year(1916),
                to: RuleYear::Year(1916),
                in_month: Month::Jun,
                on_date: DayOfMonth::Day(14),
                at: QualifiedTime::Standard(Time {
                    sign: Sign::Positive,
                    hour: 23,
                    minute: 0,
                    second: 0
                }),
                save: Time {
                    sign: Sign::Positive,
                    hour: 1,
                    minute: 0,
                    second: 0
                },
                letter: Some("S".to_owned()),
            }
        );
    }

    #[test]
    fn cycle_test() {
        for line in TEST_DATA {
            let _success = RuleRecord::parse(line, &mut LineParseContext::default()).unwrap();
        }
    }

    #[test]
    fn window_rule_conversion() {
        let rule = parse("Rule	EU	1981	max	-	Mar	lastSun	 1:00u	1:00	S")
            .to_window_rule()
            .unwrap();
        assert_eq!(rule.start_year, 1981);
        assert_eq!(rule.end_year, MAX_YEAR);
        assert_eq!(rule.day_of_month_indicator, -1);
        assert_eq!(rule.day_of_week, Some(WeekDay::Sun));
        assert_eq!(rule.second_of_day, 3600);
        assert_eq!(rule.time_definition, TimeDefinition::Utc);
        assert_eq!(rule.savings, 3600);

        let rule = parse("Rule	Zion	2005	2012	-	Apr	Fri<=1	2:00	1:00	D")
            .to_window_rule()
            .unwrap();
        assert_eq!(rule.month, Month::Mar);
        assert_eq!(rule.day_of_month_indicator, 26);
        assert_eq!(rule.day_of_week, Some(WeekDay::Fri));

        let rule = parse("Rule	Test	2000	only	-	Oct	Sun<=25	2:00	0	S")
            .to_window_rule()
            .unwrap();
        assert_eq!(rule.month, Month::Oct);
        assert_eq!(rule.day_of_month_indicator, 19);

        let rule = parse("Rule	Test	2000	only	-	Oct	 8	24:00	0	S")
            .to_window_rule()
            .unwrap();
        assert!(rule.time_end_of_day);
        assert_eq!(rule.second_of_day, 0);

        let rule = parse("Rule	Test	2000	only	-	Oct	 8	25:00	0	S")
            .to_window_rule()
            .unwrap();
        assert!(!rule.time_end_of_day);
        assert_eq!(rule.day_of_month_indicator, 9);
        assert_eq!(rule.second_of_day, 3600);
    }
}
