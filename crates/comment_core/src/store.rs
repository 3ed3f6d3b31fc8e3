use crate::csvline::{has_unbalanced_quotes, parse_csv_line};
use crate::record::{
    parse_timestamp, CommentRecord, KeywordTally, SentimentLabels, StanceTally,
};
use crate::text::{sanitize_display_text, truncate_display_text, MAX_TITLE_CHARS};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

// Loads never fail; problems are collected as issues next to a best-effort
// value. `row` is the 1-based line number in the input text (header = row 1).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadIssue {
    #[error("missing required column `{column}`")]
    MissingColumn { column: String },
    #[error("row {row}: unparsable {column} value `{value}`")]
    UnparsableField {
        row: usize,
        column: String,
        value: String,
    },
    #[error("file not found: {path}")]
    MissingFile { path: String },
    #[error("row {row}: unbalanced quotes")]
    MalformedQuoting { row: usize },
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

#[derive(Debug, Clone)]
pub struct LoadReport<T> {
    pub value: T,
    pub issues: Vec<LoadIssue>,
}

impl<T> LoadReport<T> {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommentStore {
    records: Vec<CommentRecord>,
    keywords: KeywordTally,
    stances: StanceTally,
}

impl CommentStore {
    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    pub fn keyword_tally(&self) -> &KeywordTally {
        &self.keywords
    }

    pub fn stance_tally(&self) -> &StanceTally {
        &self.stances
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VideoEntry {
    pub title: String,
    pub link: String,
    pub views: u64,
    pub thumbnail: String,
}

pub fn load_comments(text: &str) -> LoadReport<CommentStore> {
    load_comments_with(text, &SentimentLabels::default())
}

pub fn load_comments_with(text: &str, labels: &SentimentLabels) -> LoadReport<CommentStore> {
    let mut issues = Vec::new();

    let (keyword_idx, sentiment_idx, time_idx) = match header_indices(text) {
        Some(header) => {
            let keyword_idx = header.iter().position(|name| name == "keyword");
            let sentiment_idx = header.iter().position(|name| name == "sentiment");
            let time_idx = header.iter().position(|name| name == "time");
            if keyword_idx.is_none() {
                issues.push(missing_column("keyword"));
            }
            if sentiment_idx.is_none() {
                issues.push(missing_column("sentiment"));
            }
            match (keyword_idx, sentiment_idx) {
                (Some(keyword_idx), Some(sentiment_idx)) => (keyword_idx, sentiment_idx, time_idx),
                _ => return LoadReport { value: CommentStore::default(), issues },
            }
        }
        None => {
            issues.push(missing_column("keyword"));
            issues.push(missing_column("sentiment"));
            return LoadReport { value: CommentStore::default(), issues };
        }
    };

    let mut store = CommentStore::default();
    for (line_index, raw) in text.lines().enumerate().skip(1) {
        let row = line_index + 1;
        if raw.trim().is_empty() {
            continue;
        }
        if has_unbalanced_quotes(raw) {
            issues.push(LoadIssue::MalformedQuoting { row });
        }
        let fields = parse_csv_line(raw);

        let mut keywords = Vec::new();
        for part in field_at(&fields, keyword_idx).split('|') {
            let keyword = part.trim();
            if keyword.is_empty() {
                continue;
            }
            keywords.push(keyword.to_string());
            store.keywords.bump(keyword);
        }

        // Exactly one stance increment per row, unrecognized labels included.
        let stance = labels.classify(field_at(&fields, sentiment_idx));
        store.stances.record(stance);

        let timestamp = match time_idx {
            Some(time_idx) => {
                let raw_time = field_at(&fields, time_idx);
                if raw_time.trim().is_empty() {
                    None
                } else {
                    match parse_timestamp(raw_time) {
                        Some(timestamp) => Some(timestamp),
                        None => {
                            issues.push(LoadIssue::UnparsableField {
                                row,
                                column: "time".to_string(),
                                value: raw_time.to_string(),
                            });
                            None
                        }
                    }
                }
            }
            None => None,
        };

        store.records.push(CommentRecord {
            timestamp,
            keywords,
            stance,
        });
    }

    debug!(
        "loaded {} comment rows ({} issues)",
        store.records.len(),
        issues.len()
    );
    LoadReport { value: store, issues }
}

pub fn load_keyword_summary(text: &str) -> LoadReport<KeywordTally> {
    let mut issues = Vec::new();

    let (keyword_idx, count_idx) = match header_indices(text) {
        Some(header) => {
            let keyword_idx = header.iter().position(|name| name == "keyword");
            let count_idx = header.iter().position(|name| name == "count");
            if keyword_idx.is_none() {
                issues.push(missing_column("keyword"));
            }
            if count_idx.is_none() {
                issues.push(missing_column("count"));
            }
            match (keyword_idx, count_idx) {
                (Some(keyword_idx), Some(count_idx)) => (keyword_idx, count_idx),
                _ => return LoadReport { value: KeywordTally::new(), issues },
            }
        }
        None => {
            issues.push(missing_column("keyword"));
            issues.push(missing_column("count"));
            return LoadReport { value: KeywordTally::new(), issues };
        }
    };

    let needed = keyword_idx.max(count_idx);
    let mut tally = KeywordTally::new();
    for (line_index, raw) in text.lines().enumerate().skip(1) {
        let row = line_index + 1;
        if raw.trim().is_empty() {
            continue;
        }
        if has_unbalanced_quotes(raw) {
            issues.push(LoadIssue::MalformedQuoting { row });
        }
        let fields = parse_csv_line(raw);
        if fields.len() <= needed {
            continue;
        }

        let keyword = fields[keyword_idx].trim();
        if keyword.is_empty() {
            continue;
        }

        let raw_count = fields[count_idx].trim();
        let count = if raw_count.is_empty() {
            0
        } else {
            match raw_count.parse::<usize>() {
                Ok(count) => count,
                Err(_) => {
                    issues.push(LoadIssue::UnparsableField {
                        row,
                        column: "count".to_string(),
                        value: raw_count.to_string(),
                    });
                    0
                }
            }
        };

        // Duplicate keyword rows (one per date in the analyzer output) are summed.
        tally.add(keyword, count);
    }

    LoadReport { value: tally, issues }
}

pub fn load_video_catalog(text: &str) -> LoadReport<Vec<VideoEntry>> {
    const COLUMNS: [&str; 4] = ["video_title", "video_link", "views", "thumbnail"];
    let mut issues = Vec::new();

    let indices = match header_indices(text) {
        Some(header) => {
            let found: Vec<Option<usize>> = COLUMNS
                .iter()
                .map(|column| header.iter().position(|name| name == column))
                .collect();
            for (column, index) in COLUMNS.iter().zip(&found) {
                if index.is_none() {
                    issues.push(missing_column(column));
                }
            }
            match (found[0], found[1], found[2], found[3]) {
                (Some(title), Some(link), Some(views), Some(thumbnail)) => {
                    [title, link, views, thumbnail]
                }
                _ => return LoadReport { value: Vec::new(), issues },
            }
        }
        None => {
            for column in COLUMNS {
                issues.push(missing_column(column));
            }
            return LoadReport { value: Vec::new(), issues };
        }
    };
    let [title_idx, link_idx, views_idx, thumbnail_idx] = indices;

    let needed = indices.into_iter().max().unwrap_or(0);
    let mut videos = Vec::new();
    // The collector repeats a video row for every comment it scraped; keep the
    // first occurrence of each link.
    let mut seen_links: HashSet<String> = HashSet::new();

    for (line_index, raw) in text.lines().enumerate().skip(1) {
        let row = line_index + 1;
        if raw.trim().is_empty() {
            continue;
        }
        if has_unbalanced_quotes(raw) {
            issues.push(LoadIssue::MalformedQuoting { row });
        }
        let fields = parse_csv_line(raw);
        if fields.len() <= needed {
            continue;
        }

        let link = fields[link_idx].as_str();
        if !seen_links.insert(link.to_string()) {
            continue;
        }

        let title = truncate_display_text(
            &sanitize_display_text(&fields[title_idx]),
            MAX_TITLE_CHARS,
        );

        let raw_views = fields[views_idx].trim();
        let views = if raw_views.is_empty() {
            0
        } else {
            match raw_views.parse::<u64>() {
                Ok(views) => views,
                Err(_) => {
                    issues.push(LoadIssue::UnparsableField {
                        row,
                        column: "views".to_string(),
                        value: raw_views.to_string(),
                    });
                    0
                }
            }
        };

        videos.push(VideoEntry {
            title,
            link: link.to_string(),
            views,
            thumbnail: fields[thumbnail_idx].clone(),
        });
    }

    LoadReport { value: videos, issues }
}

// The link-search collector writes the same four columns for one video; the
// first valid entry is the primary video.
pub fn load_primary_video(text: &str) -> LoadReport<Option<VideoEntry>> {
    let report = load_video_catalog(text);
    LoadReport {
        value: report.value.into_iter().next(),
        issues: report.issues,
    }
}

pub fn read_comments(path: &Path) -> LoadReport<CommentStore> {
    read_comments_with(path, &SentimentLabels::default())
}

pub fn read_comments_with(path: &Path, labels: &SentimentLabels) -> LoadReport<CommentStore> {
    match fs::read_to_string(path) {
        Ok(text) => {
            debug!("reading comments from {}", path.display());
            load_comments_with(&text, labels)
        }
        Err(err) => LoadReport {
            value: CommentStore::default(),
            issues: vec![read_issue(path, &err)],
        },
    }
}

pub fn read_keyword_summary(path: &Path) -> LoadReport<KeywordTally> {
    match fs::read_to_string(path) {
        Ok(text) => load_keyword_summary(&text),
        Err(err) => LoadReport {
            value: KeywordTally::new(),
            issues: vec![read_issue(path, &err)],
        },
    }
}

pub fn read_video_catalog(path: &Path) -> LoadReport<Vec<VideoEntry>> {
    match fs::read_to_string(path) {
        Ok(text) => load_video_catalog(&text),
        Err(err) => LoadReport {
            value: Vec::new(),
            issues: vec![read_issue(path, &err)],
        },
    }
}

pub fn read_primary_video(path: &Path) -> LoadReport<Option<VideoEntry>> {
    match fs::read_to_string(path) {
        Ok(text) => load_primary_video(&text),
        Err(err) => LoadReport {
            value: None,
            issues: vec![read_issue(path, &err)],
        },
    }
}

// Header row is the first line, matched exactly and case-sensitively. The
// upstream CSVs are saved with a UTF-8 BOM, so one is stripped before
// matching. A missing or blank first line reports every required column as
// missing.
fn header_indices(text: &str) -> Option<Vec<String>> {
    let first_line = text.lines().next()?.trim_start_matches('\u{feff}');
    if first_line.trim().is_empty() {
        return None;
    }
    Some(parse_csv_line(first_line))
}

fn field_at(fields: &[String], index: usize) -> &str {
    fields.get(index).map(String::as_str).unwrap_or("")
}

fn missing_column(column: &str) -> LoadIssue {
    LoadIssue::MissingColumn {
        column: column.to_string(),
    }
}

fn read_issue(path: &Path, err: &std::io::Error) -> LoadIssue {
    if err.kind() == ErrorKind::NotFound {
        LoadIssue::MissingFile {
            path: path.display().to_string(),
        }
    } else {
        LoadIssue::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}
