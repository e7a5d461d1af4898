//! Calendar feed retrieval.
//!
//! The bias engine never does I/O; it consumes whatever event list this
//! collaborator hands it. Fetch failures are absorbed here and surface as
//! an empty event list, which the engine reports as a no-news NEUTRAL.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::calendar::{self, NewsEvent};
use crate::config::Config;
use crate::logging::{json_log, log_at, obj, v_num, v_str, Level};

/// Source of this-week calendar markup. Injectable so tests can feed
/// fixture text through the full pipeline.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_this_week(&self) -> Result<String>;
}

/// HTTP feed client for the Forex Factory weekly calendar.
pub struct CalendarFeed {
    client: Client,
    url: String,
    user_agent: String,
}

impl CalendarFeed {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .unwrap_or_default(),
            url: cfg.feed_url.clone(),
            user_agent: cfg.user_agent.clone(),
        }
    }
}

#[async_trait]
impl FeedSource for CalendarFeed {
    async fn fetch_this_week(&self) -> Result<String> {
        let res = self
            .client
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("feed returned {status}");
        }
        Ok(res.text().await?)
    }
}

/// Fetch and parse the weekly window. Any transport failure degrades to an
/// empty list; the error is logged, never propagated.
pub async fn fetch_week_events(feed: &dyn FeedSource) -> Vec<NewsEvent> {
    match feed.fetch_this_week().await {
        Ok(text) => {
            let events = calendar::parse(&text);
            json_log(
                "feed",
                obj(&[
                    ("status", v_str("fetched")),
                    ("bytes", v_num(text.len() as f64)),
                    ("usd_events", v_num(events.len() as f64)),
                ]),
            );
            events
        }
        Err(err) => {
            log_at(
                Level::Error,
                "feed",
                obj(&[
                    ("status", v_str("fetch_failed")),
                    ("error", v_str(&err.to_string())),
                ]),
            );
            Vec::new()
        }
    }
}
