use chrono::{DateTime, Utc};
use comment_core::color::{ColorAllocator, PaletteConfig};
use comment_core::period::label_period;
use comment_core::record::{KeywordTally, StanceTally};
use comment_core::segment::{segment_count, segment_records, Segment, SegmentPolicy};
use comment_core::store::{CommentStore, VideoEntry};
use comment_core::summary::{rank_keywords, KeywordRanking};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::axis::AxisDivision;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPosition {
    Leading,
    Trailing,
}

#[derive(Debug, Clone)]
pub struct FeedOptions {
    pub overall_top: usize,
    pub segment_top: usize,
    pub overflow_label: String,
    pub overall_overflow: OverflowPosition,
    pub segment_overflow: OverflowPosition,
    pub segments: SegmentPolicy,
    pub palette: PaletteConfig,
    pub axis: AxisDivision,
}

impl Default for FeedOptions {
    fn default() -> Self {
        // The overview historically appended the merged bucket, the segment
        // pies prepended it.
        Self {
            overall_top: 6,
            segment_top: 5,
            overflow_label: "other".to_string(),
            overall_overflow: OverflowPosition::Trailing,
            segment_overflow: OverflowPosition::Leading,
            segments: SegmentPolicy::default(),
            palette: PaletteConfig::default(),
            axis: AxisDivision::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PieSlice {
    pub label: String,
    pub value: usize,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct StancePanel {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub axis_interval: usize,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SegmentPanel {
    pub period: String,
    pub pie: Vec<PieSlice>,
    pub stances: StancePanel,
    pub top_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ChartFeed {
    pub generated_at: String,
    pub comment_rows: usize,
    pub overall_pie: Vec<PieSlice>,
    pub overall_stances: StancePanel,
    pub segments: Vec<SegmentPanel>,
    pub videos: Vec<VideoEntry>,
}

// The overall pie prefers the analyzer's keyword-summary tally when one was
// loaded and falls back to the tally built from the comment rows.
pub fn build_feed(
    store: &CommentStore,
    keyword_summary: Option<&KeywordTally>,
    videos: &[VideoEntry],
    options: &FeedOptions,
    now: DateTime<Utc>,
    colors: &mut ColorAllocator,
) -> ChartFeed {
    let overall_tally = keyword_summary.unwrap_or_else(|| store.keyword_tally());
    let overall_ranking = rank_keywords(overall_tally, options.overall_top);
    let overall_pie = build_pie(
        &overall_ranking,
        options.overall_overflow,
        &options.overflow_label,
        colors,
    );

    let count = segment_count(store.len(), &options.segments);
    let segments = segment_records(store.records(), count)
        .iter()
        .map(|segment| segment_panel(segment, options, now, colors))
        .collect();

    ChartFeed {
        generated_at: now.to_rfc3339(),
        comment_rows: store.len(),
        overall_pie,
        overall_stances: stance_panel(store.stance_tally(), &options.axis),
        segments,
        videos: videos.to_vec(),
    }
}

fn segment_panel(
    segment: &Segment,
    options: &FeedOptions,
    now: DateTime<Utc>,
    colors: &mut ColorAllocator,
) -> SegmentPanel {
    let ranking = rank_keywords(&segment.keywords, options.segment_top);
    let pie = build_pie(&ranking, options.segment_overflow, &options.overflow_label, colors);
    let top_keywords = ranking.top.into_iter().map(|entry| entry.keyword).collect();

    SegmentPanel {
        period: label_period(segment.oldest, segment.newest, now).to_string(),
        pie,
        stances: stance_panel(&segment.stances, &options.axis),
        top_keywords,
    }
}

// One chart population is one allocator session: slice order is allocation
// order, so a leading bucket takes the base hue.
fn build_pie(
    ranking: &KeywordRanking,
    overflow_position: OverflowPosition,
    overflow_label: &str,
    colors: &mut ColorAllocator,
) -> Vec<PieSlice> {
    let mut entries: Vec<(String, usize)> = ranking
        .top
        .iter()
        .map(|entry| (entry.keyword.clone(), entry.count))
        .collect();
    if let Some(bucket) = ranking.overflow {
        let overflow = (overflow_label.to_string(), bucket.total);
        match overflow_position {
            OverflowPosition::Leading => entries.insert(0, overflow),
            OverflowPosition::Trailing => entries.push(overflow),
        }
    }

    colors.reset();
    entries
        .into_iter()
        .map(|(label, value)| PieSlice {
            color: colors.allocate().to_hex(),
            label,
            value,
        })
        .collect()
}

fn stance_panel(tally: &StanceTally, axis: &AxisDivision) -> StancePanel {
    StancePanel {
        positive: tally.positive,
        negative: tally.negative,
        neutral: tally.neutral,
        axis_interval: axis.interval(tally.max_count()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use comment_core::store::load_comments;

    fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn allocator() -> ColorAllocator {
        ColorAllocator::seeded(PaletteConfig::default(), 11)
    }

    fn sample_csv() -> String {
        let mut text = String::from("keyword,sentiment,time\n");
        for day in 1..=30 {
            text.push_str(&format!("금리|물가,긍정,2024-05-{day:02} 10:00:00\n"));
        }
        for day in 1..=30 {
            text.push_str(&format!("환율,부정,2024-05-{day:02} 11:00:00\n"));
        }
        text
    }

    #[test]
    fn test_feed_shape_from_comment_store() {
        let report = load_comments(&sample_csv());
        assert!(report.is_clean());

        let options = FeedOptions::default();
        let mut colors = allocator();
        let feed = build_feed(
            &report.value,
            None,
            &[],
            &options,
            reference_now(),
            &mut colors,
        );

        assert_eq!(feed.comment_rows, 60);
        // 60 records -> baseline 2 + 60/50 = 3 segments
        assert_eq!(feed.segments.len(), 3);
        assert_eq!(feed.overall_stances.positive, 30);
        assert_eq!(feed.overall_stances.negative, 30);
        assert_eq!(feed.overall_stances.neutral, 0);
        assert_eq!(feed.overall_stances.axis_interval, 3);

        // counts tie at 30, so byte order of the keyword decides
        let labels: Vec<&str> = feed.overall_pie.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["금리", "물가", "환율"]);
        for slice in &feed.overall_pie {
            assert!(slice.color.starts_with('#'));
            assert_eq!(slice.color.len(), 7);
        }
    }

    #[test]
    fn test_overall_pie_prefers_keyword_summary() {
        let report = load_comments("keyword,sentiment\na,긍정\n");
        let mut summary = KeywordTally::new();
        summary.add("요약", 9);

        let mut colors = allocator();
        let feed = build_feed(
            &report.value,
            Some(&summary),
            &[],
            &FeedOptions::default(),
            reference_now(),
            &mut colors,
        );
        assert_eq!(feed.overall_pie.len(), 1);
        assert_eq!(feed.overall_pie[0].label, "요약");
        assert_eq!(feed.overall_pie[0].value, 9);
    }

    #[test]
    fn test_overflow_bucket_position_per_view() {
        // interleave keywords so both segments see all six
        let mut text = String::from("keyword,sentiment\n");
        for _ in 0..4 {
            for keyword in ["a", "b", "c", "d", "e", "f"] {
                text.push_str(&format!("{keyword},긍정\n"));
            }
        }
        let report = load_comments(&text);

        let options = FeedOptions {
            overall_top: 2,
            segment_top: 2,
            ..FeedOptions::default()
        };
        let mut colors = allocator();
        let feed = build_feed(
            &report.value,
            None,
            &[],
            &options,
            reference_now(),
            &mut colors,
        );

        // trailing bucket on the overview
        let overall: Vec<&str> = feed.overall_pie.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(overall, vec!["a", "b", "other"]);
        assert_eq!(feed.overall_pie[2].value, 16);

        // leading bucket on segment pies
        let first_segment = &feed.segments[0];
        assert_eq!(first_segment.pie[0].label, "other");
        assert_eq!(first_segment.pie[0].value, 8);
        // the ranked table lists only the top keywords, never the bucket
        assert!(!first_segment.top_keywords.contains(&"other".to_string()));
        assert_eq!(first_segment.top_keywords, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_each_pie_is_its_own_color_session() {
        let report = load_comments("keyword,sentiment\na,긍정\nb,부정\n");
        let mut colors = allocator();
        let feed = build_feed(
            &report.value,
            None,
            &[],
            &FeedOptions::default(),
            reference_now(),
            &mut colors,
        );
        assert_eq!(feed.segments.len(), 2);

        // replay the same seed: one reset per pie, colors in slice order
        let mut replay = allocator();
        replay.reset();
        for slice in &feed.overall_pie {
            assert_eq!(slice.color, replay.allocate().to_hex());
        }
        for panel in &feed.segments {
            replay.reset();
            for slice in &panel.pie {
                assert_eq!(slice.color, replay.allocate().to_hex());
            }
        }
    }

    #[test]
    fn test_empty_store_yields_empty_but_valid_feed() {
        let report = load_comments("keyword,sentiment\n");
        let mut colors = allocator();
        let feed = build_feed(
            &report.value,
            None,
            &[],
            &FeedOptions::default(),
            reference_now(),
            &mut colors,
        );
        assert_eq!(feed.comment_rows, 0);
        assert!(feed.overall_pie.is_empty());
        assert!(feed.segments.is_empty());
        assert_eq!(feed.overall_stances.positive, 0);
        assert_eq!(feed.overall_stances.axis_interval, 1);
    }

    #[test]
    fn test_segment_periods_are_rendered_labels() {
        let now = reference_now();
        let mut text = String::from("keyword,sentiment,time\n");
        text.push_str("a,긍정,2024-05-30 12:00:00\n");
        text.push_str("b,부정,2024-05-31 12:00:00\n");
        let report = load_comments(&text);

        let mut colors = allocator();
        let feed = build_feed(
            &report.value,
            None,
            &[],
            &FeedOptions::default(),
            now,
            &mut colors,
        );
        assert_eq!(feed.segments.len(), 2);
        assert_eq!(feed.segments[0].period, "about 2 days");
        assert_eq!(feed.segments[1].period, "about 1 days");
    }

    #[test]
    fn test_videos_pass_through() {
        let report = load_comments("keyword,sentiment\n");
        let videos = vec![VideoEntry {
            title: "t".to_string(),
            link: "l".to_string(),
            views: 3,
            thumbnail: "u".to_string(),
        }];
        let mut colors = allocator();
        let feed = build_feed(
            &report.value,
            None,
            &videos,
            &FeedOptions::default(),
            reference_now(),
            &mut colors,
        );
        assert_eq!(feed.videos, videos);
    }
}
