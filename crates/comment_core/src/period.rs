use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodBucket {
    Today,
    Days(i64),
    Weeks(i64),
    Months(i64),
    Years(i64),
}

// Integer division on whole days; anything under a day old (including clock
// skew into the future) is "today".
pub fn classify_days(days: i64) -> PeriodBucket {
    if days >= 365 {
        PeriodBucket::Years(days / 365)
    } else if days >= 30 {
        PeriodBucket::Months(days / 30)
    } else if days >= 7 {
        PeriodBucket::Weeks(days / 7)
    } else if days >= 1 {
        PeriodBucket::Days(days)
    } else {
        PeriodBucket::Today
    }
}

impl fmt::Display for PeriodBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodBucket::Today => write!(f, "today"),
            PeriodBucket::Days(n) => write!(f, "{n} days"),
            PeriodBucket::Weeks(n) => write!(f, "{n} weeks"),
            PeriodBucket::Months(n) => write!(f, "{n} months"),
            PeriodBucket::Years(n) => write!(f, "{n} years"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodLabel {
    NoData,
    Approx(PeriodBucket),
    Range {
        newest: PeriodBucket,
        oldest: PeriodBucket,
    },
}

pub fn label_period(
    oldest: Option<DateTime<Utc>>,
    newest: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> PeriodLabel {
    let (Some(oldest), Some(newest)) = (oldest, newest) else {
        return PeriodLabel::NoData;
    };

    let oldest_bucket = classify_days((now - oldest).num_days());
    let newest_bucket = classify_days((now - newest).num_days());

    if oldest_bucket == newest_bucket {
        PeriodLabel::Approx(newest_bucket)
    } else {
        PeriodLabel::Range {
            newest: newest_bucket,
            oldest: oldest_bucket,
        }
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodLabel::NoData => write!(f, "no period information"),
            PeriodLabel::Approx(bucket) => write!(f, "about {bucket}"),
            PeriodLabel::Range { newest, oldest } => write!(f, "{newest} ~ {oldest}"),
        }
    }
}
