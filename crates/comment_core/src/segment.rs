use crate::record::{CommentRecord, KeywordTally, StanceTally};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SegmentPolicy {
    pub baseline: usize,
    pub records_per_increment: usize,
    pub max_segments: usize,
}

impl Default for SegmentPolicy {
    fn default() -> Self {
        Self {
            baseline: 2,
            records_per_increment: 50,
            max_segments: 5,
        }
    }
}

pub fn segment_count(total: usize, policy: &SegmentPolicy) -> usize {
    let growth = if policy.records_per_increment == 0 {
        0
    } else {
        total / policy.records_per_increment
    };
    (policy.baseline + growth).min(policy.max_segments)
}

#[derive(Debug, Clone)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub keywords: KeywordTally,
    pub stances: StanceTally,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

// Chunks of ceil(total / count) in input order; the input is assumed already
// chronological and is never sorted here. The final chunk may be shorter, and
// fewer than `count` chunks come out when the records run out early.
pub fn segment_records(records: &[CommentRecord], count: usize) -> Vec<Segment> {
    if count == 0 || records.is_empty() {
        return Vec::new();
    }

    let per_segment = records.len().div_ceil(count);
    let mut segments = Vec::new();
    for chunk_index in 0..count {
        let start = chunk_index * per_segment;
        if start >= records.len() {
            break;
        }
        let end = (start + per_segment).min(records.len());
        segments.push(build_segment(records, start, end));
    }
    segments
}

fn build_segment(records: &[CommentRecord], start: usize, end: usize) -> Segment {
    let mut keywords = KeywordTally::new();
    let mut stances = StanceTally::default();
    let mut oldest: Option<DateTime<Utc>> = None;
    let mut newest: Option<DateTime<Utc>> = None;

    for record in &records[start..end] {
        for keyword in &record.keywords {
            keywords.bump(keyword);
        }
        stances.record(record.stance);
        if let Some(timestamp) = record.timestamp {
            oldest = Some(match oldest {
                Some(current) => current.min(timestamp),
                None => timestamp,
            });
            newest = Some(match newest {
                Some(current) => current.max(timestamp),
                None => timestamp,
            });
        }
    }

    Segment {
        start,
        end,
        keywords,
        stances,
        oldest,
        newest,
    }
}
