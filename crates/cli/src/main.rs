use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use schemars::schema_for;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use chartfeed::axis::AxisDivision;
use chartfeed::export::write_feed;
use chartfeed::feed::{build_feed, ChartFeed, FeedOptions, OverflowPosition};
use comment_core::color::{ColorAllocator, PaletteConfig};
use comment_core::period::label_period;
use comment_core::record::SentimentLabels;
use comment_core::segment::{segment_count, segment_records, SegmentPolicy};
use comment_core::store::{
    read_comments_with, read_keyword_summary, read_primary_video, read_video_catalog, LoadIssue,
    VideoEntry,
};
use comment_core::summary::rank_keywords;

#[derive(Parser)]
#[command(name = "commentscope")]
#[command(about = "YouTube comment sentiment chart feed builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the JSON chart feed from the analyzer's CSV output
    Build {
        /// Directory containing the analyzer CSV files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Output directory for the feed files
        #[arg(long, default_value = "feed")]
        out_dir: PathBuf,
        /// TOML config overriding the built-in defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Fixed seed for reproducible chart colors
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print a keyword and stance summary to stdout
    Report {
        /// Directory containing the analyzer CSV files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// How many keywords to list
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// TOML config overriding the built-in defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Export canonical JSON Schemas to the ./schemas directory
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Export JSON Schema files for the feed types
    Export {
        /// Output directory (default: ./schemas)
        #[arg(long, default_value = "schemas")]
        out_dir: PathBuf,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    feed: FeedSection,
    labels: SentimentLabels,
    segments: SegmentPolicy,
    palette: PaletteConfig,
    axis: AxisDivision,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct FeedSection {
    overall_top: usize,
    segment_top: usize,
    overflow_label: String,
    overall_overflow: OverflowPosition,
    segment_overflow: OverflowPosition,
}

impl Default for FeedSection {
    fn default() -> Self {
        let defaults = FeedOptions::default();
        Self {
            overall_top: defaults.overall_top,
            segment_top: defaults.segment_top,
            overflow_label: defaults.overflow_label,
            overall_overflow: defaults.overall_overflow,
            segment_overflow: defaults.segment_overflow,
        }
    }
}

impl ConfigFile {
    fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = fs::read_to_string(path)?;
                let config: ConfigFile = toml::from_str(&raw)?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    fn feed_options(&self) -> FeedOptions {
        FeedOptions {
            overall_top: self.feed.overall_top,
            segment_top: self.feed.segment_top,
            overflow_label: self.feed.overflow_label.clone(),
            overall_overflow: self.feed.overall_overflow,
            segment_overflow: self.feed.segment_overflow,
            segments: self.segments,
            palette: self.palette,
            axis: self.axis,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            data_dir,
            out_dir,
            config,
            seed,
        } => run_build(data_dir, out_dir, config, seed),
        Commands::Report {
            data_dir,
            top,
            config,
        } => run_report(data_dir, top, config),
        Commands::Schema { command } => match command {
            SchemaCommands::Export { out_dir } => schema_export(out_dir),
        },
    }
}

fn run_build(
    data_dir: PathBuf,
    out_dir: PathBuf,
    config: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<()> {
    let config = ConfigFile::load(config.as_deref())?;

    let comments = read_comments_with(&data_dir.join("analyzed_comments.csv"), &config.labels);
    log_issues("comments", &comments.issues);

    let summary = read_keyword_summary(&data_dir.join("analyzed_keywords.csv"));
    log_issues("keyword summary", &summary.issues);
    // without the summary file the overview falls back to the comment tally
    let summary_missing = summary
        .issues
        .iter()
        .any(|issue| matches!(issue, LoadIssue::MissingFile { .. }));

    let videos = read_video_catalog(&data_dir.join("youtube_keyword_results.csv"));
    log_issues("video catalog", &videos.issues);

    let options = config.feed_options();
    let mut colors = match seed {
        Some(seed) => ColorAllocator::seeded(options.palette, seed),
        None => ColorAllocator::new(options.palette),
    };

    let keyword_summary = if summary_missing {
        None
    } else {
        Some(&summary.value)
    };
    let feed = build_feed(
        &comments.value,
        keyword_summary,
        &videos.value,
        &options,
        Utc::now(),
        &mut colors,
    );
    write_feed(&feed, &out_dir)?;

    println!(
        "Built feed from {} comment rows into {}",
        feed.comment_rows,
        out_dir.display()
    );
    Ok(())
}

fn run_report(data_dir: PathBuf, top: usize, config: Option<PathBuf>) -> Result<()> {
    let config = ConfigFile::load(config.as_deref())?;
    let comments = read_comments_with(&data_dir.join("analyzed_comments.csv"), &config.labels);
    log_issues("comments", &comments.issues);

    let store = comments.value;
    let stances = store.stance_tally();
    println!("{} comment rows", store.len());
    println!(
        "stances: {} positive / {} negative / {} neutral",
        stances.positive, stances.negative, stances.neutral
    );

    let primary = read_primary_video(&data_dir.join("youtube_link_results.csv"));
    log_issues("link result", &primary.issues);
    if let Some(video) = &primary.value {
        println!("primary video: {} ({} views)", video.title, video.views);
    }

    let ranking = rank_keywords(store.keyword_tally(), top);
    for (position, entry) in ranking.top.iter().enumerate() {
        println!("{:>3}. {} ({})", position + 1, entry.keyword, entry.count);
    }
    if let Some(bucket) = ranking.overflow {
        println!(
            "     +{} more keywords ({} mentions)",
            bucket.merged, bucket.total
        );
    }

    let now = Utc::now();
    let count = segment_count(store.len(), &config.segments);
    for (position, segment) in segment_records(store.records(), count).iter().enumerate() {
        println!(
            "segment {}: rows {}..{}, {}",
            position + 1,
            segment.start,
            segment.end,
            label_period(segment.oldest, segment.newest, now)
        );
    }
    Ok(())
}

fn schema_export(out_dir: PathBuf) -> Result<()> {
    fs::create_dir_all(&out_dir)?;

    // Export ChartFeed schema
    let feed_schema = schema_for!(ChartFeed);
    let feed_json = serde_json::to_string_pretty(&feed_schema)?;
    fs::write(out_dir.join("ChartFeed.schema.json"), feed_json)?;

    // Export VideoEntry schema
    let video_schema = schema_for!(VideoEntry);
    let video_json = serde_json::to_string_pretty(&video_schema)?;
    fs::write(out_dir.join("VideoEntry.schema.json"), video_json)?;

    println!("Exported schemas to {}", out_dir.display());
    Ok(())
}

fn log_issues(source: &str, issues: &[LoadIssue]) {
    for issue in issues {
        match issue {
            LoadIssue::MissingFile { .. } => info!("{}: {}", source, issue),
            _ => warn!("{}: {}", source, issue),
        }
    }
}
