use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::feed::ChartFeed;

pub struct FeedPaths {
    pub root: PathBuf,
    pub overview: PathBuf,
    pub segments: PathBuf,
    pub videos: PathBuf,
    pub index: PathBuf,
}

impl FeedPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            overview: root.join("feed.overview.json"),
            segments: root.join("feed.segments.json"),
            videos: root.join("feed.videos.json"),
            index: root.join("feed.index.json"),
            root,
        }
    }

    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root).with_context(|| format!("create {:?}", self.root))?;
        Ok(())
    }
}

pub fn write_feed(feed: &ChartFeed, out_dir: &Path) -> Result<()> {
    let paths = FeedPaths::new(out_dir);
    paths.ensure()?;

    // 1) Overview panel
    let overview = json!({
        "generated_at": feed.generated_at,
        "comment_rows": feed.comment_rows,
        "pie": feed.overall_pie,
        "stances": feed.overall_stances,
    });
    write_json(&paths.overview, &overview)?;

    // 2) Segment panels
    write_json(&paths.segments, &feed.segments)?;

    // 3) Video board
    write_json(&paths.videos, &feed.videos)?;

    // 4) Index
    let counts = json!({
        "comment_rows": feed.comment_rows,
        "segments": feed.segments.len(),
        "videos": feed.videos.len(),
    });
    let index = json!({
        "generated_at": feed.generated_at,
        "version": 1,
        "counts": counts,
        "files": [
            "feed.overview.json",
            "feed.segments.json",
            "feed.videos.json",
        ],
    });
    write_json(&paths.index, &index)?;

    info!("wrote chart feed to {}", paths.root.display());
    Ok(())
}

fn write_json<P: AsRef<Path>, T: ?Sized + Serialize>(path: P, value: &T) -> Result<()> {
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .map(|_| ())
        .map_err(|e| e.into())
}
