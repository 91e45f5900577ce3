//! Cron presets and the human readable schedule summary shown next to
//! scheduled triggers.

/// A ready made schedule the builder offers instead of a blank cron field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePreset {
    label: &'static str,
    cron: &'static str,
    description: &'static str,
}

impl SchedulePreset {
    /// Returns the short label shown in the preset picker.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Returns the five field cron expression this preset stands for.
    #[must_use]
    pub const fn cron(&self) -> &'static str {
        self.cron
    }

    /// Returns the explanatory line shown under the label.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }
}

/// Schedules offered by the builder, most frequent first.
pub const COMMON_SCHEDULES: &[SchedulePreset] = &[
    SchedulePreset {
        label: "Every hour",
        cron: "0 * * * *",
        description: "Top of every hour",
    },
    SchedulePreset {
        label: "Daily digest",
        cron: "0 9 * * *",
        description: "Every day at 9:00",
    },
    SchedulePreset {
        label: "Weekday mornings",
        cron: "0 9 * * 1-5",
        description: "Monday through Friday at 9:00",
    },
    SchedulePreset {
        label: "Monday kickoff",
        cron: "0 8 * * 1",
        description: "Every Monday at 8:00",
    },
    SchedulePreset {
        label: "Monthly review",
        cron: "0 9 1 * *",
        description: "First of the month at 9:00",
    },
];

/// Timezones offered for scheduled triggers, grouped west to east.
pub const AVAILABLE_TIMEZONES: &[&str] = &[
    "America/Los_Angeles",
    "America/Denver",
    "America/Chicago",
    "America/New_York",
    "America/Sao_Paulo",
    "UTC",
    "Europe/London",
    "Europe/Berlin",
    "Europe/Madrid",
    "Asia/Dubai",
    "Asia/Singapore",
    "Asia/Tokyo",
    "Australia/Sydney",
];

/// Renders a small set of common cron shapes as an English sentence.
///
/// Anything outside the recognized shapes, including malformed input, is
/// returned unchanged so the builder can always display something.
#[must_use]
pub fn describe_cron_expression(cron: &str) -> String {
    let fields: Vec<&str> = cron.split_whitespace().collect();
    let &[minute, hour, day_of_month, month, day_of_week] = fields.as_slice() else {
        return cron.to_owned();
    };
    if minute != "0" || month != "*" {
        return cron.to_owned();
    }
    if hour == "*" {
        if day_of_month == "*" && day_of_week == "*" {
            return "Every hour".to_owned();
        }
        return cron.to_owned();
    }
    let Ok(hour) = hour.parse::<u8>() else {
        return cron.to_owned();
    };
    if hour > 23 {
        return cron.to_owned();
    }
    match (day_of_month, day_of_week) {
        ("*", "*") => format!("Daily at {hour}:00"),
        ("*", "1-5") => format!("Weekdays at {hour}:00"),
        ("1", "*") => format!("First of the month at {hour}:00"),
        ("*", day) => weekday_name(day)
            .map(|name| format!("{name}s at {hour}:00"))
            .unwrap_or_else(|| cron.to_owned()),
        _ => cron.to_owned(),
    }
}

fn weekday_name(field: &str) -> Option<&'static str> {
    match field {
        "0" => Some("Sunday"),
        "1" => Some("Monday"),
        "2" => Some("Tuesday"),
        "3" => Some("Wednesday"),
        "4" => Some("Thursday"),
        "5" => Some("Friday"),
        "6" => Some("Saturday"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn recognizes_the_common_shapes() {
        assert_eq!(describe_cron_expression("0 * * * *"), "Every hour");
        assert_eq!(describe_cron_expression("0 9 * * *"), "Daily at 9:00");
        assert_eq!(describe_cron_expression("0 9 * * 1-5"), "Weekdays at 9:00");
        assert_eq!(describe_cron_expression("0 8 * * 1"), "Mondays at 8:00");
        assert_eq!(describe_cron_expression("0 17 * * 0"), "Sundays at 17:00");
        assert_eq!(
            describe_cron_expression("0 9 1 * *"),
            "First of the month at 9:00"
        );
    }

    #[test]
    fn passes_unrecognized_expressions_through_verbatim() {
        for raw in [
            "30 14 15 * 3",
            "0 25 * * *",
            "0 9 * 6 *",
            "0 9 2 * *",
            "0 9 * * 7",
            "*/5 * * * *",
            "0 9 * *",
            "0 9 * * * *",
            "not a cron at all",
            "",
        ] {
            assert_eq!(describe_cron_expression(raw), raw);
        }
    }

    #[test]
    fn hourly_on_a_fixed_day_stays_verbatim() {
        assert_eq!(describe_cron_expression("0 * 1 * *"), "0 * 1 * *");
        assert_eq!(describe_cron_expression("0 * * * 1"), "0 * * * 1");
    }

    #[test]
    fn presets_are_five_field_expressions_with_descriptions() {
        for preset in COMMON_SCHEDULES {
            assert_eq!(preset.cron().split_whitespace().count(), 5);
            assert!(!preset.label().trim().is_empty());
            assert!(!preset.description().trim().is_empty());
        }
    }

    #[test]
    fn every_preset_is_a_recognized_shape() {
        for preset in COMMON_SCHEDULES {
            assert_ne!(describe_cron_expression(preset.cron()), preset.cron());
        }
    }

    proptest! {
        #[test]
        fn daily_shape_is_described_for_every_valid_hour(hour in 0u8..24) {
            let cron = format!("0 {hour} * * *");
            prop_assert_eq!(describe_cron_expression(&cron), format!("Daily at {hour}:00"));
        }

        #[test]
        fn hours_out_of_range_pass_through(hour in 24u32..1000) {
            let cron = format!("0 {hour} * * *");
            prop_assert_eq!(describe_cron_expression(&cron), cron);
        }

        #[test]
        fn description_changes_only_for_five_field_input(raw in ".{0,40}") {
            let described = describe_cron_expression(&raw);
            prop_assert!(described == raw || raw.split_whitespace().count() == 5);
        }
    }
}
