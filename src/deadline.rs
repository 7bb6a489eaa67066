use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The five mutually exclusive lateness classifications for a submission
/// timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatenessPeriod {
    TooEarly,
    Early,
    OnTime,
    Late,
    TooLate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointScheme {
    pub early_bonus: i64,
    pub on_time_points: i64,
    pub late_deduction: i64,
    pub out_of_points: i64,
}

/// An assignment's four ordered time boundaries plus its point scheme.
///
/// `outdate <= early <= on_time <= late` is enforced at construction, so a
/// policy in hand is always valid.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadlinePolicy {
    outdate: DateTime<Utc>,
    early: DateTime<Utc>,
    on_time: DateTime<Utc>,
    late: DateTime<Utc>,
    points: PointScheme,
}

impl DeadlinePolicy {
    pub fn new(
        outdate: DateTime<Utc>,
        early: DateTime<Utc>,
        on_time: DateTime<Utc>,
        late: DateTime<Utc>,
        points: PointScheme,
    ) -> Result<Self, Error> {
        if outdate > early || early > on_time || on_time > late {
            return Err(Error::PolicyOrdering(format!(
                "expected outdate <= early <= on_time <= late, got {} / {} / {} / {}",
                outdate, early, on_time, late
            )));
        }
        Ok(Self {
            outdate,
            early,
            on_time,
            late,
            points,
        })
    }

    pub fn outdate(&self) -> DateTime<Utc> {
        self.outdate
    }

    pub fn early(&self) -> DateTime<Utc> {
        self.early
    }

    pub fn on_time(&self) -> DateTime<Utc> {
        self.on_time
    }

    pub fn late(&self) -> DateTime<Utc> {
        self.late
    }

    pub fn points(&self) -> PointScheme {
        self.points
    }

    /// Classify a submission instant. Intervals are half-open on the
    /// right: a submission exactly on a boundary falls into the later,
    /// stricter period, so submitting strictly before `on_time` is what
    /// earns on-time credit.
    pub fn classify(&self, at: DateTime<Utc>) -> LatenessPeriod {
        if at < self.outdate {
            LatenessPeriod::TooEarly
        } else if at < self.early {
            LatenessPeriod::Early
        } else if at < self.on_time {
            LatenessPeriod::OnTime
        } else if at < self.late {
            LatenessPeriod::Late
        } else {
            LatenessPeriod::TooLate
        }
    }

    /// Score for a period. Early submissions earn the bonus on top of full
    /// credit, with no cap. Late ones lose the deduction, floored at zero.
    /// Too-late ones score zero; the caller flags them for manual review.
    pub fn score(&self, period: LatenessPeriod) -> i64 {
        match period {
            LatenessPeriod::TooEarly | LatenessPeriod::Early => {
                self.points.on_time_points + self.points.early_bonus
            }
            LatenessPeriod::OnTime => self.points.on_time_points,
            LatenessPeriod::Late => (self.points.on_time_points - self.points.late_deduction).max(0),
            LatenessPeriod::TooLate => 0,
        }
    }

    /// Shift all four boundaries by the same duration. A uniform shift
    /// preserves ordering, so this cannot fail.
    pub fn shifted(&self, by: Duration) -> Self {
        Self {
            outdate: self.outdate + by,
            early: self.early + by,
            on_time: self.on_time + by,
            late: self.late + by,
            points: self.points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, 0, 0, 0).unwrap()
    }

    fn points() -> PointScheme {
        PointScheme {
            early_bonus: 2,
            on_time_points: 10,
            late_deduction: 3,
            out_of_points: 10,
        }
    }

    fn policy() -> DeadlinePolicy {
        DeadlinePolicy::new(day(1), day(5), day(10), day(12), points()).unwrap()
    }

    #[test]
    fn test_classify_within_each_interval() {
        let p = policy();
        assert_eq!(p.classify(day(1) - Duration::seconds(1)), LatenessPeriod::TooEarly);
        assert_eq!(p.classify(day(3)), LatenessPeriod::Early);
        assert_eq!(p.classify(day(7)), LatenessPeriod::OnTime);
        assert_eq!(p.classify(day(11)), LatenessPeriod::Late);
        assert_eq!(p.classify(day(13)), LatenessPeriod::TooLate);
    }

    #[test]
    fn test_boundaries_belong_to_the_stricter_period() {
        let p = policy();
        assert_eq!(p.classify(day(1)), LatenessPeriod::Early);
        assert_eq!(p.classify(day(5)), LatenessPeriod::OnTime);
        assert_eq!(p.classify(day(10)), LatenessPeriod::Late);
        assert_eq!(p.classify(day(12)), LatenessPeriod::TooLate);
    }

    #[test]
    fn test_scoring_scenario() {
        let p = policy();

        // Exactly on the on-time boundary counts as late.
        let on_boundary = p.classify(day(10));
        assert_eq!(on_boundary, LatenessPeriod::Late);
        assert_eq!(p.score(on_boundary), 7);

        // One second before the early boundary still earns the bonus.
        let just_early = p.classify(day(5) - Duration::seconds(1));
        assert_eq!(just_early, LatenessPeriod::Early);
        assert_eq!(p.score(just_early), 12);

        // One second past the last acceptable instant scores zero.
        let too_late = p.classify(day(12) + Duration::seconds(1));
        assert_eq!(too_late, LatenessPeriod::TooLate);
        assert_eq!(p.score(too_late), 0);
    }

    #[test]
    fn test_late_score_is_floored_at_zero() {
        let p = DeadlinePolicy::new(
            day(1),
            day(5),
            day(10),
            day(12),
            PointScheme {
                early_bonus: 2,
                on_time_points: 10,
                late_deduction: 30,
                out_of_points: 10,
            },
        )
        .unwrap();
        assert_eq!(p.score(LatenessPeriod::Late), 0);
    }

    #[test]
    fn test_unordered_instants_are_a_construction_error() {
        let result = DeadlinePolicy::new(day(1), day(10), day(5), day(12), points());
        assert!(matches!(result, Err(Error::PolicyOrdering(_))));
    }

    #[test]
    fn test_equal_instants_are_allowed() {
        assert!(DeadlinePolicy::new(day(5), day(5), day(10), day(10), points()).is_ok());
    }

    #[test]
    fn test_shift_moves_every_boundary() {
        let p = policy().shifted(Duration::days(2));
        assert_eq!(p.outdate(), day(3));
        assert_eq!(p.early(), day(7));
        assert_eq!(p.on_time(), day(12));
        assert_eq!(p.late(), day(14));
    }
}
