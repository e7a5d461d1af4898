//! Orchestration binary: morning brief, post-release update, weekly
//! preview. Invoked from cron; the mode argument is optional and falls
//! back to a UTC-clock heuristic.

use anyhow::Result;
use chrono::{Datelike, Timelike, Utc, Weekday};
use tokio::time::{sleep, Duration};

use goldbias::bias::{analyze_with, Mode};
use goldbias::calendar::{filter_today, has_released};
use goldbias::config::Config;
use goldbias::feed::{fetch_week_events, CalendarFeed, FeedSource};
use goldbias::format::{morning_message, post_release_message, weekly_preview};
use goldbias::logging::{json_log, obj, v_num, v_str};
use goldbias::notify::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunMode {
    Morning,
    Update,
    Weekly,
}

impl RunMode {
    fn as_str(&self) -> &'static str {
        match self {
            RunMode::Morning => "morning",
            RunMode::Update => "update",
            RunMode::Weekly => "weekly",
        }
    }

    /// Resolve from argv, falling back to the UTC hour: early window is
    /// the morning brief, early-afternoon (after most US releases) is the
    /// post-release update.
    fn resolve(arg: Option<&str>, utc_hour: u32) -> Result<Self> {
        match arg.unwrap_or("auto") {
            "morning" => Ok(RunMode::Morning),
            "update" => Ok(RunMode::Update),
            "weekly" => Ok(RunMode::Weekly),
            "auto" => Ok(match utc_hour {
                13..=15 => RunMode::Update,
                _ => RunMode::Morning,
            }),
            other => anyhow::bail!(
                "unknown mode '{other}' (expected morning|update|weekly|auto)"
            ),
        }
    }
}

fn display_date() -> String {
    Utc::now().format("%a, %d %b %Y").to_string()
}

async fn run_morning(cfg: &Config, feed: &dyn FeedSource, notifier: &Notifier) {
    let date = display_date();
    let all_events = fetch_week_events(feed).await;

    // Monday mornings lead with the week-ahead preview. A failed preview
    // send must not suppress the morning brief.
    if Utc::now().weekday() == Weekday::Mon {
        notifier.send(&weekly_preview(&all_events, &date)).await;
        sleep(Duration::from_secs(1)).await;
    }

    let today = Utc::now().date_naive();
    let todays = filter_today(&all_events, today);
    let analysis = analyze_with(&todays, Mode::Pre, &cfg.thresholds);
    json_log(
        "analysis",
        obj(&[
            ("mode", v_str("pre")),
            ("bias", v_str(analysis.bias.as_str())),
            ("confidence", v_str(analysis.confidence.as_str())),
            ("net_score", v_num(analysis.net_score)),
        ]),
    );
    notifier.send(&morning_message(&analysis, &date)).await;
}

async fn run_update(cfg: &Config, feed: &dyn FeedSource, notifier: &Notifier) {
    let date = display_date();
    let today = Utc::now().date_naive();
    let todays = filter_today(&fetch_week_events(feed).await, today);

    if !has_released(&todays) {
        json_log("system", obj(&[("status", v_str("no_actuals_yet_skipping"))]));
        return;
    }

    let analysis = analyze_with(&todays, Mode::Post, &cfg.thresholds);
    json_log(
        "analysis",
        obj(&[
            ("mode", v_str("post")),
            ("bias", v_str(analysis.bias.as_str())),
            ("confidence", v_str(analysis.confidence.as_str())),
            ("net_score", v_num(analysis.net_score)),
        ]),
    );
    notifier.send(&post_release_message(&analysis, &date)).await;
}

async fn run_weekly(feed: &dyn FeedSource, notifier: &Notifier) {
    let date = display_date();
    let all_events = fetch_week_events(feed).await;
    notifier.send(&weekly_preview(&all_events, &date)).await;
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let arg = std::env::args().nth(1);
    let mode = RunMode::resolve(arg.as_deref(), Utc::now().hour())?;
    json_log(
        "system",
        obj(&[("status", v_str("start")), ("mode", v_str(mode.as_str()))]),
    );

    let feed = CalendarFeed::new(&cfg);
    let notifier = Notifier::from_config(&cfg);

    match mode {
        RunMode::Morning => run_morning(&cfg, &feed, &notifier).await,
        RunMode::Update => run_update(&cfg, &feed, &notifier).await,
        RunMode::Weekly => run_weekly(&feed, &notifier).await,
    }

    json_log("system", obj(&[("status", v_str("done"))]));
    Ok(())
}
