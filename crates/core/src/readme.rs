//! Splicing generated markup between a pair of marker comments.

use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use regex::Regex;
use tokio::fs;
use tracing::{debug, info};

use crate::{
    error::{Result, TubemarkError},
    format::{MarkupStyle, render_videos},
    types::Video,
};

pub const DEFAULT_TAG: &str = "YOUTUBE-LATEST-VIDEOS";

/// `<!-- TAG:START -->` and `<!-- TAG:END -->`.
#[derive(Clone, Debug)]
pub struct MarkerPair {
    start: String,
    end: String,
    pattern: Regex,
}

impl MarkerPair {
    pub fn new(tag: &str) -> Result<Self> {
        let start = format!("<!-- {tag}:START -->");
        let end = format!("<!-- {tag}:END -->");
        let pattern = Regex::new(&format!(
            "(?s){}(.*?){}",
            regex::escape(&start),
            regex::escape(&end)
        ))?;
        Ok(Self {
            start,
            end,
            pattern,
        })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    /// Byte range of the text between the first start marker and the
    /// first end marker after it.
    pub fn find_region(&self, text: &str) -> Option<Range<usize>> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|interior| interior.range())
    }

    fn not_found(&self) -> TubemarkError {
        TubemarkError::MarkersNotFound {
            start: self.start.clone(),
            end: self.end.clone(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SpliceOutcome {
    Unchanged,
    Updated(String),
}

/// Replace the region's interior with `markup`. Text outside the interior,
/// markers included, is left as is.
pub fn splice(
    text: &str,
    markers: &MarkerPair,
    markup: &str,
    style: MarkupStyle,
) -> Result<SpliceOutcome> {
    let region = markers.find_region(text).ok_or_else(|| markers.not_found())?;

    if text[region.clone()].trim() == markup.trim() {
        return Ok(SpliceOutcome::Unchanged);
    }

    let interior = if markup.is_empty() {
        "\n".to_string()
    } else {
        let padding = style.padding();
        format!("{padding}{markup}{padding}")
    };

    let mut updated = String::with_capacity(text.len() + interior.len());
    updated.push_str(&text[..region.start]);
    updated.push_str(&interior);
    updated.push_str(&text[region.end..]);
    Ok(SpliceOutcome::Updated(updated))
}

#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Unchanged,
    Written,
    /// Dry run: the document that would have been written.
    Pending(String),
}

/// Render `videos` into the document at `path`, writing only on change.
pub async fn update_document(
    path: &Path,
    markers: &MarkerPair,
    videos: &[Video],
    style: MarkupStyle,
    dry_run: bool,
) -> Result<UpdateOutcome> {
    let current = fs::read_to_string(path).await?;
    let markup = render_videos(videos, style);

    match splice(&current, markers, &markup, style)? {
        SpliceOutcome::Unchanged => {
            info!(path = %path.display(), "no changes");
            Ok(UpdateOutcome::Unchanged)
        }
        SpliceOutcome::Updated(document) if dry_run => Ok(UpdateOutcome::Pending(document)),
        SpliceOutcome::Updated(document) => {
            write_replacing(path, &document).await?;
            info!(path = %path.display(), videos = videos.len(), "document updated");
            Ok(UpdateOutcome::Written)
        }
    }
}

/// Write to a sibling file and rename it over `path`, so readers never see
/// a truncated document.
async fn write_replacing(path: &Path, contents: &str) -> Result<()> {
    let tmp = sibling_tmp_path(path);
    debug!(tmp = %tmp.display(), "writing temporary file");

    if let Err(e) = fs::write(&tmp, contents).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    path.with_file_name(format!(".{name}.tubemark.tmp"))
}
