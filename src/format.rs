//! Presentation formatters.
//!
//! These consume an [`AnalysisResult`] (or a raw event list for the weekly
//! preview) plus a display date string and return plain chat text. They
//! impose nothing back on the engine and can be swapped for a JSON
//! renderer without touching it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::bias::{AnalysisResult, BiasLabel, GoldBias};
use crate::calendar::{Impact, NewsEvent};

fn bias_emoji(bias: BiasLabel) -> &'static str {
    match bias {
        BiasLabel::Buy => "🟢",
        BiasLabel::SlightBuy | BiasLabel::SlightSell => "🟡",
        BiasLabel::Neutral => "⚪",
        BiasLabel::Sell => "🔴",
    }
}

fn impact_icon(impact: Impact) -> &'static str {
    match impact {
        Impact::High => "🔴",
        Impact::Medium => "🟠",
    }
}

fn gold_arrow(bias: GoldBias) -> &'static str {
    match bias {
        GoldBias::Buy => "⬆️ Gold",
        GoldBias::Sell => "⬇️ Gold",
        GoldBias::Neutral | GoldBias::Unknown => "➡️ Gold",
    }
}

fn headline(analysis: &AnalysisResult) -> String {
    if analysis.bias == BiasLabel::Neutral {
        "⚪ **NEUTRAL** — No clear direction from news".to_string()
    } else {
        let driver = if analysis.bias.favors_gold() {
            "weakness in USD"
        } else {
            "strength in USD"
        };
        format!(
            "{} **{} GOLD** — News favors {}",
            bias_emoji(analysis.bias),
            analysis.bias.as_str(),
            driver
        )
    }
}

/// Pre-release morning brief for today's calendar.
pub fn morning_message(analysis: &AnalysisResult, date: &str) -> String {
    let mut lines = vec![
        format!("📰 **GOLD NEWS BIAS — {date}**"),
        "━━━━━━━━━━━━━━━━━━━━━━━━".to_string(),
        headline(analysis),
        format!("📊 Confidence: **{}**", analysis.confidence.as_str()),
        format!(
            "📈 USD Bullish Score: {} | USD Bearish Score: {}",
            analysis.bullish_usd, analysis.bearish_usd
        ),
        String::new(),
        "🗓️ **Today's Key Events (UTC):**".to_string(),
    ];

    if analysis.events.is_empty() {
        lines.push("   No high-impact USD news today".to_string());
    } else {
        for e in &analysis.events {
            lines.push(format!("   {} **{}** — {}", impact_icon(e.impact), e.time, e.title));
            if !e.forecast.is_empty() {
                lines.push(format!(
                    "      Forecast: {} | Prev: {} | {}",
                    e.forecast,
                    e.previous,
                    gold_arrow(e.bias)
                ));
            }
        }
    }

    lines.push(String::new());
    lines.push("⚠️ *Bias is pre-release estimate. Always wait for actual data before trading.*".to_string());
    lines.push("🕐 *Check back after releases for confirmation*".to_string());
    lines.join("\n")
}

/// Post-release update once actuals are on the tape.
pub fn post_release_message(analysis: &AnalysisResult, date: &str) -> String {
    let mut lines = vec![
        format!("📊 **GOLD BIAS UPDATE (POST-RELEASE) — {date}**"),
        "━━━━━━━━━━━━━━━━━━━━━━━━".to_string(),
        headline(analysis),
        format!("📊 Confidence: **{}**", analysis.confidence.as_str()),
        format!(
            "📈 USD Bullish Score: {} | USD Bearish Score: {}",
            analysis.bullish_usd, analysis.bearish_usd
        ),
        String::new(),
        "🗓️ **Released / Pending (UTC):**".to_string(),
    ];

    for e in &analysis.events {
        lines.push(format!("   {} **{}** — {}", impact_icon(e.impact), e.time, e.title));
        if !e.actual.is_empty() {
            lines.push(format!(
                "      Actual: {} | Forecast: {} | {} ({})",
                e.actual,
                e.forecast,
                gold_arrow(e.bias),
                e.note
            ));
        } else if !e.forecast.is_empty() {
            lines.push(format!(
                "      Pending — Forecast: {} | Prev: {}",
                e.forecast, e.previous
            ));
        }
    }

    lines.push(String::new());
    lines.push("⚠️ *Post-release bias reflects realized surprises, not price action.*".to_string());
    lines.join("\n")
}

/// Whole-week calendar preview, grouped by day. Takes the raw event list
/// rather than an analysis: no bias call is made days in advance.
pub fn weekly_preview(events: &[NewsEvent], date: &str) -> String {
    let mut lines = vec![
        format!("📆 **USD NEWS WEEK AHEAD — {date}**"),
        "━━━━━━━━━━━━━━━━━━━━━━━━".to_string(),
    ];

    if events.is_empty() {
        lines.push("   No high-impact USD news scheduled this week".to_string());
        return lines.join("\n");
    }

    let mut by_day: BTreeMap<NaiveDate, Vec<&NewsEvent>> = BTreeMap::new();
    let mut undated: Vec<&NewsEvent> = Vec::new();
    for e in events {
        match e.date {
            Some(d) => by_day.entry(d).or_default().push(e),
            None => undated.push(e),
        }
    }

    for (day, day_events) in &by_day {
        lines.push(String::new());
        lines.push(format!("**{}**", day.format("%A %B %d")));
        for e in day_events {
            lines.push(event_line(e));
        }
    }

    if !undated.is_empty() {
        lines.push(String::new());
        lines.push("**Unscheduled**".to_string());
        for e in &undated {
            lines.push(event_line(e));
        }
    }

    lines.join("\n")
}

/// Machine-readable rendering of an analysis, for consumers that want
/// structure instead of chat text.
#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    pub date: &'a str,
    pub mode: &'static str,
    pub bias: &'static str,
    pub confidence: &'static str,
    pub bullish_usd: f64,
    pub bearish_usd: f64,
    pub net_score: f64,
    pub reason: &'a str,
    pub events: Vec<JsonEvent<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonEvent<'a> {
    pub title: &'a str,
    pub time: &'a str,
    pub impact: &'static str,
    pub indicator: Option<&'static str>,
    pub bias: &'static str,
    pub weight: f64,
    pub note: &'a str,
}

pub fn json_summary<'a>(analysis: &'a AnalysisResult, date: &'a str) -> JsonSummary<'a> {
    JsonSummary {
        date,
        mode: analysis.mode.as_str(),
        bias: analysis.bias.as_str(),
        confidence: analysis.confidence.as_str(),
        bullish_usd: analysis.bullish_usd,
        bearish_usd: analysis.bearish_usd,
        net_score: analysis.net_score,
        reason: &analysis.reason,
        events: analysis
            .events
            .iter()
            .map(|e| JsonEvent {
                title: &e.title,
                time: &e.time,
                impact: e.impact.as_str(),
                indicator: e.rule.map(|r| r.keyword),
                bias: e.bias.as_str(),
                weight: e.weight,
                note: &e.note,
            })
            .collect(),
    }
}

fn event_line(e: &NewsEvent) -> String {
    let mut line = format!("   {} {} — {}", impact_icon(e.impact), e.time, e.title);
    if !e.forecast.is_empty() {
        line.push_str(&format!(" (F: {} | P: {})", e.forecast, e.previous));
    }
    line
}
