use crate::model::{ContributionDay, StreakStats};
use chrono::NaiveDate;

/// Scan contribution days for the longest run of consecutive calendar days
/// with a positive count, and the run ending on `today` if one exists.
///
/// Input may arrive unsorted and with gaps; consecutiveness is decided by
/// date subtraction between positive-count days, never by sequence position,
/// so an omitted day and an explicit zero day break a run the same way.
/// Days after `today` are ignored. Pure; never fails.
pub fn compute_streaks(days: &[ContributionDay], today: NaiveDate) -> StreakStats {
    let mut sorted: Vec<&ContributionDay> = days.iter().collect();
    sorted.sort_by_key(|day| day.date);

    let mut longest_streak = 0u32;
    let mut longest_streak_start = None;
    let mut longest_streak_end = None;

    let mut run = 0u32;
    let mut run_start = None;
    let mut last_contribution: Option<NaiveDate> = None;

    for day in sorted {
        if day.date > today {
            continue;
        }
        if day.contribution_count == 0 {
            continue;
        }

        match last_contribution {
            Some(prev) if (day.date - prev).num_days() == 1 => run += 1,
            // duplicate date: neither extends nor resets
            Some(prev) if day.date == prev => continue,
            _ => {
                run = 1;
                run_start = Some(day.date);
            }
        }

        if run > longest_streak {
            longest_streak = run;
            longest_streak_start = run_start;
            longest_streak_end = Some(day.date);
        }
        last_contribution = Some(day.date);
    }

    let active = last_contribution == Some(today);
    StreakStats {
        current_streak: if active { run } else { 0 },
        current_streak_start: if active { run_start } else { None },
        longest_streak,
        longest_streak_start,
        longest_streak_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn days(entries: &[(&str, u32)]) -> Vec<ContributionDay> {
        entries
            .iter()
            .map(|(date, count)| ContributionDay {
                date: d(date),
                contribution_count: *count,
            })
            .collect()
    }

    #[test]
    fn empty_input_is_all_zero() {
        let stats = compute_streaks(&[], d("2024-01-04"));
        assert_eq!(stats, StreakStats::default());
    }

    #[test]
    fn single_day_today() {
        let stats = compute_streaks(&days(&[("2024-01-04", 2)]), d("2024-01-04"));
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.current_streak_start, Some(d("2024-01-04")));
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.longest_streak_start, Some(d("2024-01-04")));
        assert_eq!(stats.longest_streak_end, Some(d("2024-01-04")));
    }

    #[test]
    fn single_day_in_the_past() {
        let stats = compute_streaks(&days(&[("2024-01-02", 2)]), d("2024-01-04"));
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.current_streak_start, None);
        assert_eq!(stats.longest_streak, 1);
    }

    #[test]
    fn zero_day_breaks_the_run() {
        let input = days(&[
            ("2024-01-01", 3),
            ("2024-01-02", 0),
            ("2024-01-03", 5),
            ("2024-01-04", 2),
        ]);
        let stats = compute_streaks(&input, d("2024-01-04"));
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.longest_streak_start, Some(d("2024-01-03")));
        assert_eq!(stats.longest_streak_end, Some(d("2024-01-04")));
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.current_streak_start, Some(d("2024-01-03")));
    }

    #[test]
    fn streak_that_ended_yesterday_is_not_current() {
        let input = days(&[
            ("2024-01-01", 3),
            ("2024-01-02", 0),
            ("2024-01-03", 5),
            ("2024-01-04", 2),
        ]);
        let stats = compute_streaks(&input, d("2024-01-05"));
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.current_streak_start, None);
        assert_eq!(stats.longest_streak, 2);
    }

    #[test]
    fn missing_day_breaks_like_a_zero_day() {
        // D, D+1, D+3 positive; D+2 entirely absent
        let input = days(&[("2024-01-01", 1), ("2024-01-02", 1), ("2024-01-04", 1)]);
        let stats = compute_streaks(&input, d("2024-01-04"));
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.longest_streak_start, Some(d("2024-01-01")));
        assert_eq!(stats.longest_streak_end, Some(d("2024-01-02")));
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.current_streak_start, Some(d("2024-01-04")));
    }

    #[test]
    fn order_independent() {
        let sorted = days(&[
            ("2024-01-01", 1),
            ("2024-01-02", 2),
            ("2024-01-03", 0),
            ("2024-01-04", 4),
        ]);
        let mut shuffled = sorted.clone();
        shuffled.swap(0, 3);
        shuffled.swap(1, 2);

        let today = d("2024-01-04");
        assert_eq!(
            compute_streaks(&sorted, today),
            compute_streaks(&shuffled, today)
        );
    }

    #[test]
    fn adjacent_day_extends_current_and_longest() {
        let mut input = days(&[("2024-01-01", 1), ("2024-01-02", 1), ("2024-01-03", 1)]);
        let before = compute_streaks(&input, d("2024-01-03"));
        assert_eq!(before.current_streak, 3);
        assert_eq!(before.longest_streak, 3);

        input.push(ContributionDay {
            date: d("2024-01-04"),
            contribution_count: 9,
        });
        let after = compute_streaks(&input, d("2024-01-04"));
        assert_eq!(after.current_streak, 4);
        assert_eq!(after.longest_streak, 4);
        assert_eq!(after.current_streak_start, Some(d("2024-01-01")));
    }

    #[test]
    fn earliest_maximal_streak_wins_ties() {
        let input = days(&[
            ("2024-01-01", 1),
            ("2024-01-02", 1),
            ("2024-01-05", 1),
            ("2024-01-06", 1),
        ]);
        let stats = compute_streaks(&input, d("2024-01-07"));
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.longest_streak_start, Some(d("2024-01-01")));
        assert_eq!(stats.longest_streak_end, Some(d("2024-01-02")));
    }

    #[test]
    fn future_days_are_ignored() {
        let input = days(&[("2024-01-04", 1), ("2024-01-05", 7)]);
        let stats = compute_streaks(&input, d("2024-01-04"));
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 1);
    }

    #[test]
    fn duplicate_dates_do_not_reset_the_run() {
        let input = days(&[
            ("2024-01-01", 1),
            ("2024-01-02", 1),
            ("2024-01-02", 3),
            ("2024-01-03", 1),
        ]);
        let stats = compute_streaks(&input, d("2024-01-03"));
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.current_streak_start, Some(d("2024-01-01")));
    }

    #[test]
    fn longest_streak_never_below_current() {
        let input = days(&[("2024-01-03", 1), ("2024-01-04", 1)]);
        let stats = compute_streaks(&input, d("2024-01-04"));
        assert!(stats.longest_streak >= stats.current_streak);
        assert_eq!(stats.longest_streak, 2);
    }
}
