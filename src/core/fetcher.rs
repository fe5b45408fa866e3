use crate::domain::model::{PageEnvelope, RawRecord};
use crate::utils::error::Result;
use reqwest::Client;

/// Outcome of one page request. A non-200 status is not an error: the page
/// yields no records and no page-count information.
#[derive(Debug)]
pub enum PageFetch {
    Fetched(PageEnvelope),
    Unavailable { status: reqwest::StatusCode },
}

/// Result of walking every page the source reports: the concatenated records
/// plus the indices of pages that answered non-200. What to do about the
/// failed pages is the caller's decision, made once at the stage boundary.
#[derive(Debug, Default)]
pub struct PageSweep {
    pub records: Vec<RawRecord>,
    pub failed_pages: Vec<u32>,
}

pub struct PageFetcher {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl PageFetcher {
    pub fn new(base_url: impl Into<String>, page_size: u32) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            page_size,
        }
    }

    /// One GET for one page. Transport errors and undecodable 200 bodies
    /// propagate; any other status code is reported as `Unavailable`.
    pub async fn fetch_page(&self, page: u32) -> Result<PageFetch> {
        tracing::debug!(page, size = self.page_size, url = %self.base_url, "requesting page");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("page", page), ("size", self.page_size)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(page, %status, "page unavailable");
            return Ok(PageFetch::Unavailable { status });
        }

        let envelope: PageEnvelope = response.json().await?;
        Ok(PageFetch::Fetched(envelope))
    }

    /// Fetches every page in ascending order, sequentially. The page count
    /// comes from page 0's envelope; if page 0 itself is unavailable the
    /// count stays 0 and the sweep ends with an empty dataset.
    pub async fn sweep(&self) -> Result<PageSweep> {
        let mut sweep = PageSweep::default();

        let total_pages = match self.fetch_page(0).await? {
            PageFetch::Fetched(envelope) => {
                sweep.records = envelope.data;
                envelope.total_pages
            }
            PageFetch::Unavailable { status } => {
                tracing::warn!(%status, "page 0 unavailable, page count unknown");
                sweep.failed_pages.push(0);
                0
            }
        };

        for page in 1..total_pages {
            match self.fetch_page(page).await? {
                PageFetch::Fetched(envelope) => sweep.records.extend(envelope.data),
                PageFetch::Unavailable { status } => {
                    tracing::debug!(page, %status, "skipping unavailable page");
                    sweep.failed_pages.push(page);
                }
            }
        }

        Ok(sweep)
    }
}
