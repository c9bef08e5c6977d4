//! Newline-delimited JSON feed

use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tracing::{debug, instrument};

use crate::common::errors::{EngineError, Result};
use crate::common::traits::MarketFeed;
use crate::common::types::FeedEvent;

/// Reads one [`FeedEvent`] per line from any async reader
///
/// Blank lines are skipped. A malformed line is reported with its line
/// number.
pub struct JsonLinesFeed<R> {
    lines: Lines<BufReader<R>>,
    line_number: usize,
    name: String,
}

impl<R: AsyncRead + Unpin + Send> JsonLinesFeed<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            line_number: 0,
            name: name.into(),
        }
    }
}

impl JsonLinesFeed<File> {
    /// Open a feed file
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).await?;
        Ok(Self::new(file, path.display().to_string()))
    }
}

impl JsonLinesFeed<tokio::io::Stdin> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin(), "stdin")
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> MarketFeed for JsonLinesFeed<R> {
    #[instrument(skip(self), fields(source = %self.name))]
    async fn next_event(&mut self) -> Result<Option<FeedEvent>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_number += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let event = serde_json::from_str(trimmed).map_err(|e| {
                EngineError::Feed(format!("{} line {}: {}", self.name, self.line_number, e))
            })?;
            debug!(line = self.line_number, "Feed event parsed");
            return Ok(Some(event));
        }
        Ok(None)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
