//! Weekly operating schedule of a partner location.

use crate::core::model::LocationTerms;
use chrono::Weekday;
use serde::Serialize;

/// Per-day availability keyed `MON`..`SUN`. The default has every day off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct WorkingDays {
    pub mon: bool,
    pub tue: bool,
    pub wed: bool,
    pub thu: bool,
    pub fri: bool,
    pub sat: bool,
    pub sun: bool,
}

impl WorkingDays {
    /// Builds the map from stored day abbreviations; unknown ones are ignored.
    pub fn from_abbreviations<I, S>(days: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        days.into_iter()
            .filter_map(|day| parse_weekday(day.as_ref()))
            .fold(Self::default(), Self::with_day)
    }

    pub fn with_day(self, day: Weekday) -> Self {
        let mut days = self;
        *days.slot(day) = true;
        days
    }

    pub fn is_working(&self, day: Weekday) -> bool {
        match day {
            Weekday::Mon => self.mon,
            Weekday::Tue => self.tue,
            Weekday::Wed => self.wed,
            Weekday::Thu => self.thu,
            Weekday::Fri => self.fri,
            Weekday::Sat => self.sat,
            Weekday::Sun => self.sun,
        }
    }

    fn slot(&mut self, day: Weekday) -> &mut bool {
        match day {
            Weekday::Mon => &mut self.mon,
            Weekday::Tue => &mut self.tue,
            Weekday::Wed => &mut self.wed,
            Weekday::Thu => &mut self.thu,
            Weekday::Fri => &mut self.fri,
            Weekday::Sat => &mut self.sat,
            Weekday::Sun => &mut self.sun,
        }
    }
}

/// Maps a native (`Пн`..`Вс`) or English (`MON`, `Monday`) abbreviation.
pub fn parse_weekday(abbreviation: &str) -> Option<Weekday> {
    let abbreviation = abbreviation.trim();
    match abbreviation {
        "Пн" => Some(Weekday::Mon),
        "Вт" => Some(Weekday::Tue),
        "Ср" => Some(Weekday::Wed),
        "Чт" => Some(Weekday::Thu),
        "Пт" => Some(Weekday::Fri),
        "Сб" => Some(Weekday::Sat),
        "Вс" => Some(Weekday::Sun),
        other => other.parse().ok(),
    }
}

/// Canonical uppercase day code.
pub fn day_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleInfo {
    pub delivery: bool,
    pub office: bool,
    pub working_days: WorkingDays,
    pub time_from: Option<String>,
    pub time_to: Option<String>,
    pub weekend_time_from: Option<String>,
    pub weekend_time_to: Option<String>,
}

impl ScheduleInfo {
    pub fn from_terms(terms: &LocationTerms) -> Self {
        Self {
            delivery: terms.has_delivery,
            office: terms.has_office,
            working_days: WorkingDays::from_abbreviations(&terms.working_days),
            time_from: terms.time_from.clone(),
            time_to: terms.time_to.clone(),
            weekend_time_from: terms.weekend_time_from.clone(),
            weekend_time_to: terms.weekend_time_to.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_every_day_off() {
        let days = WorkingDays::default();
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert!(!days.is_working(day));
        }
    }

    #[test]
    fn test_from_native_abbreviations() {
        let days = WorkingDays::from_abbreviations(["Пн", "Ср", "Сб", "??"]);
        assert!(days.mon);
        assert!(days.wed);
        assert!(days.sat);
        assert!(!days.tue);
        assert!(!days.sun);
    }

    #[test]
    fn test_parse_weekday_accepts_english() {
        assert_eq!(parse_weekday("MON"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("sunday"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("Вс"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("xyz"), None);
        assert_eq!(day_code(Weekday::Thu), "THU");
    }

    #[test]
    fn test_working_days_serialize_in_week_order() {
        let days = WorkingDays::from_abbreviations(["Пт"]);
        let json = serde_json::to_string(&days).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"MON":false,"TUE":false,"WED":false,"THU":false,"#,
                r#""FRI":true,"SAT":false,"SUN":false}"#
            )
        );
    }

    #[test]
    fn test_schedule_from_terms() {
        let terms = LocationTerms {
            has_delivery: true,
            working_days: vec!["Пн".to_string(), "Вт".to_string()],
            time_from: Some("09:00".to_string()),
            time_to: Some("18:00".to_string()),
            weekend_time_from: Some("10:00".to_string()),
            ..Default::default()
        };

        let schedule = ScheduleInfo::from_terms(&terms);
        assert!(schedule.delivery);
        assert!(!schedule.office);
        assert!(schedule.working_days.mon && schedule.working_days.tue);
        assert!(!schedule.working_days.sat);
        assert_eq!(schedule.time_to.as_deref(), Some("18:00"));
        assert_eq!(schedule.weekend_time_from.as_deref(), Some("10:00"));
        assert!(schedule.weekend_time_to.is_none());
    }
}
