//! Runtime configuration, read once from the environment at startup.

use url::Url;

use crate::bias::Thresholds;
use crate::logging::{json_log, obj, v_str};

pub const DEFAULT_FEED_URL: &str = "https://nfs.faireconomy.media/ff_calendar_thisweek.xml";

/// Discord caps messages at 2000 chars; leave headroom for formatting.
pub const DEFAULT_CHUNK_LIMIT: usize = 1900;

#[derive(Debug, Clone)]
pub struct Config {
    /// Destination webhook; `None` means preview-to-stdout mode.
    pub webhook_url: Option<Url>,
    pub feed_url: String,
    pub user_agent: String,
    pub chunk_limit: usize,
    pub thresholds: Thresholds,
}

impl Config {
    pub fn from_env() -> Self {
        let webhook_url = std::env::var("NEWS_WEBHOOK_URL").ok().and_then(|raw| {
            match Url::parse(&raw) {
                Ok(url) => Some(url),
                Err(err) => {
                    json_log(
                        "config",
                        obj(&[
                            ("warning", v_str("invalid_webhook_url")),
                            ("error", v_str(&err.to_string())),
                        ]),
                    );
                    None
                }
            }
        });

        let defaults = Thresholds::default();
        Self {
            webhook_url,
            feed_url: std::env::var("FEED_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string()),
            user_agent: std::env::var("FEED_USER_AGENT")
                .unwrap_or_else(|_| "Mozilla/5.0".to_string()),
            chunk_limit: env_parse("CHUNK_LIMIT", DEFAULT_CHUNK_LIMIT),
            thresholds: Thresholds {
                strong: env_parse("BIAS_STRONG_TH", defaults.strong),
                slight: env_parse("BIAS_SLIGHT_TH", defaults.slight),
                conf_high: env_parse("CONF_HIGH_TH", defaults.conf_high),
                conf_medium: env_parse("CONF_MED_TH", defaults.conf_medium),
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
