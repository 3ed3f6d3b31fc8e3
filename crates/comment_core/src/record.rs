use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stance {
    Positive,
    Negative,
    Neutral,
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            Stance::Positive => "positive",
            Stance::Negative => "negative",
            Stance::Neutral => "neutral",
        };
        write!(f, "{value}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SentimentLabels {
    pub positive: String,
    pub negative: String,
}

impl Default for SentimentLabels {
    fn default() -> Self {
        // The analyzer writes Korean labels; anything unrecognized is neutral.
        Self {
            positive: "긍정".to_string(),
            negative: "부정".to_string(),
        }
    }
}

impl SentimentLabels {
    pub fn classify(&self, raw: &str) -> Stance {
        if raw == self.positive {
            Stance::Positive
        } else if raw == self.negative {
            Stance::Negative
        } else {
            Stance::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub timestamp: Option<DateTime<Utc>>,
    pub keywords: Vec<String>,
    pub stance: Stance,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTally {
    counts: HashMap<String, usize>,
}

impl KeywordTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&mut self, keyword: &str) {
        *self.counts.entry(keyword.to_string()).or_insert(0) += 1;
    }

    pub fn add(&mut self, keyword: &str, count: usize) {
        *self.counts.entry(keyword.to_string()).or_insert(0) += count;
    }

    pub fn get(&self, keyword: &str) -> usize {
        self.counts.get(keyword).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(keyword, count)| (keyword.as_str(), *count))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StanceTally {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl StanceTally {
    pub fn record(&mut self, stance: Stance) {
        match stance {
            Stance::Positive => self.positive += 1,
            Stance::Negative => self.negative += 1,
            Stance::Neutral => self.neutral += 1,
        }
    }

    pub fn get(&self, stance: Stance) -> usize {
        match stance {
            Stance::Positive => self.positive,
            Stance::Negative => self.negative,
            Stance::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    pub fn max_count(&self) -> usize {
        self.positive.max(self.negative).max(self.neutral)
    }
}

// RFC 3339 first, then the offset format pandas writes, then naive forms read
// as UTC. Unparsable input is the unknown-timestamp sentinel, never an error.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%z"] {
        if let Ok(parsed) = DateTime::parse_from_str(trimmed, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    for format in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&parsed));
        }
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            if let Some(start_of_day) = parsed.and_hms_opt(0, 0, 0) {
                return Some(Utc.from_utc_datetime(&start_of_day));
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels_classify_exact_match_only() {
        let labels = SentimentLabels::default();
        assert_eq!(labels.classify("긍정"), Stance::Positive);
        assert_eq!(labels.classify("부정"), Stance::Negative);
        assert_eq!(labels.classify("중립"), Stance::Neutral);
        assert_eq!(labels.classify(""), Stance::Neutral);
        assert_eq!(labels.classify(" 긍정"), Stance::Neutral);
    }

    #[test]
    fn test_stance_tally_has_all_three_keys() {
        let mut tally = StanceTally::default();
        assert_eq!(tally.get(Stance::Positive), 0);
        assert_eq!(tally.get(Stance::Negative), 0);
        assert_eq!(tally.get(Stance::Neutral), 0);
        tally.record(Stance::Negative);
        tally.record(Stance::Negative);
        tally.record(Stance::Positive);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.max_count(), 2);
    }

    #[test]
    fn test_keyword_tally_bump_and_add() {
        let mut tally = KeywordTally::new();
        tally.bump("rates");
        tally.bump("rates");
        tally.add("rates", 3);
        tally.add("housing", 2);
        assert_eq!(tally.get("rates"), 5);
        assert_eq!(tally.get("housing"), 2);
        assert_eq!(tally.get("absent"), 0);
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-15T09:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15 09:30:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15 09:30:00"), Some(expected));
        assert_eq!(parse_timestamp("  2024-01-15 09:30:00  "), Some(expected));

        let midnight = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-15"), Some(midnight));
    }

    #[test]
    fn test_parse_timestamp_offset_conversion() {
        let parsed = parse_timestamp("2024-01-15 18:30:00+09:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_garbage_is_none() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2024-13-40"), None);
    }
}
