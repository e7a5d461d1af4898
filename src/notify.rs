//! Outbound notification: Discord webhook with stdout fallback.

use anyhow::Result;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

use crate::config::Config;
use crate::logging::{json_log, log_at, obj, v_num, v_str, Level};

pub struct Notifier {
    client: Client,
    webhook: Option<Url>,
    chunk_limit: usize,
}

impl Notifier {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_default(),
            webhook: cfg.webhook_url.clone(),
            chunk_limit: cfg.chunk_limit,
        }
    }

    /// Deliver a message, splitting into webhook-sized chunks. With no
    /// webhook configured the message is previewed on stdout instead.
    /// Delivery failures are logged and absorbed; a broken webhook must
    /// never abort the run.
    pub async fn send(&self, msg: &str) {
        let Some(webhook) = &self.webhook else {
            json_log("notify", obj(&[("status", v_str("no_webhook_preview"))]));
            println!("--- MESSAGE PREVIEW ---\n{msg}\n--- END PREVIEW ---");
            return;
        };

        match self.deliver(webhook, msg).await {
            Ok(chunks) => json_log(
                "notify",
                obj(&[("status", v_str("sent")), ("chunks", v_num(chunks as f64))]),
            ),
            Err(err) => log_at(
                Level::Error,
                "notify",
                obj(&[
                    ("status", v_str("delivery_failed")),
                    ("error", v_str(&err.to_string())),
                ]),
            ),
        }
    }

    async fn deliver(&self, webhook: &Url, msg: &str) -> Result<usize> {
        let chunks = split_message(msg, self.chunk_limit);
        let total = chunks.len();
        for (i, chunk) in chunks.iter().enumerate() {
            let res = self
                .client
                .post(webhook.clone())
                .json(&json!({ "content": chunk }))
                .send()
                .await?;
            let status = res.status();
            if !status.is_success() {
                anyhow::bail!("webhook returned {status} on chunk {}/{total}", i + 1);
            }
            if i + 1 < total {
                // Space out chunks so the webhook does not rate-limit us.
                sleep(Duration::from_millis(500)).await;
            }
        }
        Ok(total)
    }
}

/// Split on line boundaries so no chunk exceeds `max_len`. A single line
/// longer than the limit becomes its own chunk; the webhook rejecting it
/// is preferable to splitting mid-line.
pub fn split_message(msg: &str, max_len: usize) -> Vec<String> {
    if msg.len() <= max_len {
        return vec![msg.to_string()];
    }
    let mut chunks = Vec::new();
    let mut current = String::new();
    for line in msg.split('\n') {
        if !current.is_empty() && current.len() + 1 + line.len() > max_len {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
