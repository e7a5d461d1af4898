//! Gold bias engine: converts a filtered USD event list into one
//! directional call.
//!
//! Pure function of (events, mode) plus the static knowledge base. Two
//! modes: pre-release estimates direction from expectations (forecast vs
//! previous only modulates magnitude, polarity fixes direction), while
//! post-release reads the realized surprise (actual vs forecast decides
//! direction). Dollar-bullish weight accumulates against gold, dollar-
//! bearish weight in favor; the net of the two drives the label and
//! confidence tier.

use chrono::NaiveDate;

use crate::calendar::{Impact, NewsEvent};
use crate::knowledge::{match_rule, IndicatorRule};
use crate::numeric::parse_value;

/// Which side of a release the analysis runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Pre,
    Post,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Pre => "pre",
            Mode::Post => "post",
        }
    }
}

/// Per-event gold direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoldBias {
    Buy,
    Sell,
    Neutral,
    Unknown,
}

impl GoldBias {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoldBias::Buy => "BUY",
            GoldBias::Sell => "SELL",
            GoldBias::Neutral => "NEUTRAL",
            GoldBias::Unknown => "UNKNOWN",
        }
    }
}

/// Aggregate call over the full event set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiasLabel {
    Buy,
    SlightBuy,
    Neutral,
    SlightSell,
    Sell,
}

impl BiasLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BiasLabel::Buy => "BUY",
            BiasLabel::SlightBuy => "SLIGHT BUY",
            BiasLabel::Neutral => "NEUTRAL",
            BiasLabel::SlightSell => "SLIGHT SELL",
            BiasLabel::Sell => "SELL",
        }
    }

    pub fn favors_gold(&self) -> bool {
        matches!(self, BiasLabel::Buy | BiasLabel::SlightBuy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "LOW",
            Confidence::Medium => "MEDIUM",
            Confidence::High => "HIGH",
        }
    }
}

/// Calibration constants for the label and confidence cuts. Comparisons
/// are strict everywhere; a net score sitting exactly on a cut stays in
/// the weaker tier.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// |net| above this is a full BUY/SELL call.
    pub strong: f64,
    /// |net| above this (but not `strong`) is a SLIGHT call.
    pub slight: f64,
    pub conf_high: f64,
    pub conf_medium: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            strong: 4.0,
            slight: 2.0,
            conf_high: 6.0,
            conf_medium: 3.0,
        }
    }
}

/// One input event with its resolved classification.
#[derive(Debug, Clone)]
pub struct AnalyzedEvent {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub time: String,
    pub impact: Impact,
    pub rule: Option<&'static IndicatorRule>,
    pub bias: GoldBias,
    /// Effective weight, rounded for display; accumulators use the
    /// unrounded value.
    pub weight: f64,
    pub note: String,
    pub forecast: String,
    pub previous: String,
    pub actual: String,
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub bias: BiasLabel,
    pub confidence: Confidence,
    /// Cumulative dollar-bullish (gold-bearish) weight, one decimal.
    pub bullish_usd: f64,
    /// Cumulative dollar-bearish (gold-bullish) weight, one decimal.
    pub bearish_usd: f64,
    pub net_score: f64,
    pub mode: Mode,
    pub events: Vec<AnalyzedEvent>,
    pub reason: String,
}

const NO_NEWS_REASON: &str = "No high-impact USD news in window";

/// Run the engine with the default calibration.
pub fn analyze(events: &[NewsEvent], mode: Mode) -> AnalysisResult {
    analyze_with(events, mode, &Thresholds::default())
}

/// Run the engine with explicit thresholds. Output order matches input
/// order; unmatched events appear in the list but never touch the
/// accumulators.
pub fn analyze_with(events: &[NewsEvent], mode: Mode, th: &Thresholds) -> AnalysisResult {
    if events.is_empty() {
        return AnalysisResult {
            bias: BiasLabel::Neutral,
            confidence: Confidence::Low,
            bullish_usd: 0.0,
            bearish_usd: 0.0,
            net_score: 0.0,
            mode,
            events: Vec::new(),
            reason: NO_NEWS_REASON.to_string(),
        };
    }

    let mut bullish = 0.0;
    let mut bearish = 0.0;
    let mut analyzed = Vec::with_capacity(events.len());

    for event in events {
        let scored = classify(event, mode);
        bullish += scored.bullish;
        bearish += scored.bearish;
        analyzed.push(scored.event);
    }

    let net = bullish - bearish;
    AnalysisResult {
        bias: label_for(net, th),
        confidence: confidence_for(net, th),
        bullish_usd: round1(bullish),
        bearish_usd: round1(bearish),
        net_score: round1(net),
        mode,
        events: analyzed,
        reason: format!("{} USD events analyzed ({})", events.len(), mode.as_str()),
    }
}

pub fn label_for(net: f64, th: &Thresholds) -> BiasLabel {
    if net > th.strong {
        BiasLabel::Sell
    } else if net < -th.strong {
        BiasLabel::Buy
    } else if net > th.slight {
        BiasLabel::SlightSell
    } else if net < -th.slight {
        BiasLabel::SlightBuy
    } else {
        BiasLabel::Neutral
    }
}

pub fn confidence_for(net: f64, th: &Thresholds) -> Confidence {
    let abs = net.abs();
    if abs > th.conf_high {
        Confidence::High
    } else if abs > th.conf_medium {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

struct ScoredEvent {
    event: AnalyzedEvent,
    bullish: f64,
    bearish: f64,
}

fn classify(event: &NewsEvent, mode: Mode) -> ScoredEvent {
    let Some(rule) = match_rule(&event.title) else {
        return ScoredEvent {
            event: make_analyzed(
                event,
                None,
                GoldBias::Unknown,
                1.0,
                "no matching indicator rule".to_string(),
            ),
            bullish: 0.0,
            bearish: 0.0,
        };
    };

    let base = rule.weight as f64 * if event.impact == Impact::High { 1.5 } else { 1.0 };

    match mode {
        Mode::Post if event.has_actual() => classify_post(event, rule, base),
        // Post mode with nothing released yet falls back to the
        // expectation path for this event.
        _ => classify_pre(event, rule, base),
    }
}

/// Expectation path: direction is fixed by polarity, the forecast-vs-
/// previous comparison only scales the magnitude.
fn classify_pre(event: &NewsEvent, rule: &'static IndicatorRule, base: f64) -> ScoredEvent {
    let (weight, trend) = match (parse_value(&event.forecast), parse_value(&event.previous)) {
        (Some(f), Some(p)) if f > p => (base * 1.2, "expected to improve"),
        (Some(_), Some(_)) => (base * 0.9, "expected to weaken"),
        _ => (base, "no forecast comparison"),
    };

    let (bias, note) = if rule.usd_positive {
        (GoldBias::Sell, format!("data favors USD ({trend})"))
    } else {
        (GoldBias::Buy, format!("data weakens USD ({trend})"))
    };

    scored(event, rule, bias, weight, note)
}

/// Surprise path: actual vs forecast decides direction; polarity decides
/// which side of the dollar the surprise lands on.
fn classify_post(event: &NewsEvent, rule: &'static IndicatorRule, base: f64) -> ScoredEvent {
    match (parse_value(&event.actual), parse_value(&event.forecast)) {
        (Some(a), Some(f)) if a > f => {
            let note = format!("beat forecast{}", surprise_pct(a, f));
            if rule.usd_positive {
                scored(event, rule, GoldBias::Sell, base * 1.2, note)
            } else {
                // A negative indicator coming in hot is dollar-bearish.
                scored(event, rule, GoldBias::Buy, base * 1.2, note)
            }
        }
        (Some(a), Some(f)) if a < f => {
            let note = format!("missed forecast{}", surprise_pct(a, f));
            if rule.usd_positive {
                scored(event, rule, GoldBias::Buy, base * 1.2, note)
            } else {
                scored(event, rule, GoldBias::Sell, base * 1.2, note)
            }
        }
        (Some(_), Some(_)) => {
            // In-line release: no directional surprise, no accumulator
            // contribution.
            let ev = make_analyzed(
                event,
                Some(rule),
                GoldBias::Neutral,
                base * 0.3,
                "released in line with forecast".to_string(),
            );
            ScoredEvent { event: ev, bullish: 0.0, bearish: 0.0 }
        }
        _ => {
            let note = "numeric comparison unavailable, polarity only".to_string();
            if rule.usd_positive {
                scored(event, rule, GoldBias::Sell, base, note)
            } else {
                scored(event, rule, GoldBias::Buy, base, note)
            }
        }
    }
}

fn surprise_pct(actual: f64, forecast: f64) -> String {
    if forecast.abs() < f64::EPSILON {
        return String::new();
    }
    format!(" by {:.1}%", ((actual - forecast) / forecast * 100.0).abs())
}

fn scored(
    event: &NewsEvent,
    rule: &'static IndicatorRule,
    bias: GoldBias,
    weight: f64,
    note: String,
) -> ScoredEvent {
    let (bullish, bearish) = match bias {
        GoldBias::Sell => (weight, 0.0),
        GoldBias::Buy => (0.0, weight),
        GoldBias::Neutral | GoldBias::Unknown => (0.0, 0.0),
    };
    ScoredEvent {
        event: make_analyzed(event, Some(rule), bias, weight, note),
        bullish,
        bearish,
    }
}

fn make_analyzed(
    event: &NewsEvent,
    rule: Option<&'static IndicatorRule>,
    bias: GoldBias,
    weight: f64,
    note: String,
) -> AnalyzedEvent {
    AnalyzedEvent {
        title: event.title.clone(),
        date: event.date,
        time: event.time.clone(),
        impact: event.impact,
        rule,
        bias,
        weight: weight.round(),
        note,
        forecast: event.forecast.clone(),
        previous: event.previous.clone(),
        actual: event.actual.clone(),
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str, impact: Impact, forecast: &str, previous: &str, actual: &str) -> NewsEvent {
        NewsEvent {
            title: title.to_string(),
            date: None,
            date_raw: String::new(),
            time: "1:30pm".to_string(),
            impact,
            currency: "USD".to_string(),
            forecast: forecast.to_string(),
            previous: previous.to_string(),
            actual: actual.to_string(),
        }
    }

    #[test]
    fn empty_input_is_neutral_low() {
        for mode in [Mode::Pre, Mode::Post] {
            let result = analyze(&[], mode);
            assert_eq!(result.bias, BiasLabel::Neutral);
            assert_eq!(result.confidence, Confidence::Low);
            assert!(result.events.is_empty());
            assert_eq!(result.reason, "No high-impact USD news in window");
            assert_eq!(result.net_score, 0.0);
        }
    }

    #[test]
    fn pre_release_cpi_improving_sells_gold() {
        let events = [event("CPI m/m", Impact::High, "3.5%", "3.2%", "")];
        let result = analyze(&events, Mode::Pre);

        // 3 (base) * 1.5 (high impact) * 1.2 (expected improvement)
        assert_eq!(result.bullish_usd, 5.4);
        assert_eq!(result.bearish_usd, 0.0);
        assert_eq!(result.bias, BiasLabel::Sell);
        assert_eq!(result.confidence, Confidence::Medium);
        assert_eq!(result.events[0].bias, GoldBias::Sell);
        assert!(result.events[0].note.contains("expected to improve"));
    }

    #[test]
    fn pre_release_weakening_forecast_scales_down() {
        let events = [event("Retail Sales m/m", Impact::Medium, "0.1%", "0.4%", "")];
        let result = analyze(&events, Mode::Pre);
        // 2 * 1.0 * 0.9; direction still fixed by polarity.
        assert_eq!(result.bullish_usd, 1.8);
        assert_eq!(result.events[0].bias, GoldBias::Sell);
        assert!(result.events[0].note.contains("expected to weaken"));
    }

    #[test]
    fn pre_release_negative_indicator_buys_gold() {
        let events = [event("Unemployment Rate", Impact::High, "4.1%", "3.9%", "")];
        let result = analyze(&events, Mode::Pre);
        assert_eq!(result.events[0].bias, GoldBias::Buy);
        assert_eq!(result.bullish_usd, 0.0);
        // 2 * 1.5 * 1.2 (rising unemployment reinforces the bearish push)
        assert_eq!(result.bearish_usd, 3.6);
        assert_eq!(result.bias, BiasLabel::SlightBuy);
    }

    #[test]
    fn post_release_beat_with_magnitude_note() {
        let events = [event(
            "Non-Farm Employment Change",
            Impact::High,
            "190K",
            "185K",
            "210K",
        )];
        let result = analyze(&events, Mode::Post);
        assert_eq!(result.events[0].bias, GoldBias::Sell);
        // (210000 - 190000) / 190000 * 100 = 10.5%
        assert!(result.events[0].note.contains("10.5%"), "note: {}", result.events[0].note);
        assert!(result.bullish_usd > 0.0);
    }

    #[test]
    fn post_release_unemployment_beat_buys_gold() {
        let events = [event("Unemployment Rate", Impact::High, "3.9%", "3.9%", "4.1%")];
        let result = analyze(&events, Mode::Post);
        // Worse-than-forecast unemployment is dollar-bearish.
        assert_eq!(result.events[0].bias, GoldBias::Buy);
        assert!(result.bearish_usd > 0.0);
        assert_eq!(result.bullish_usd, 0.0);
    }

    #[test]
    fn post_release_miss_mirrors_beat() {
        let events = [event("GDP q/q", Impact::High, "2.3%", "2.1%", "1.8%")];
        let result = analyze(&events, Mode::Post);
        assert_eq!(result.events[0].bias, GoldBias::Buy);
        assert!(result.events[0].note.contains("missed forecast"));
        assert!(result.bearish_usd > 0.0);
    }

    #[test]
    fn post_release_inline_is_neutral_and_unscored() {
        let events = [event("CPI m/m", Impact::High, "3.2%", "3.0%", "3.2%")];
        let result = analyze(&events, Mode::Post);
        assert_eq!(result.events[0].bias, GoldBias::Neutral);
        // 3 * 1.5 * 0.3 ≈ 1.35 → rounds to 1 for display
        assert_eq!(result.events[0].weight, 1.0);
        assert_eq!(result.bullish_usd, 0.0);
        assert_eq!(result.bearish_usd, 0.0);
        assert_eq!(result.bias, BiasLabel::Neutral);
    }

    #[test]
    fn post_release_unparseable_falls_back_to_polarity() {
        let events = [event("FOMC Statement", Impact::High, "", "", "hawkish")];
        let result = analyze(&events, Mode::Post);
        assert_eq!(result.events[0].bias, GoldBias::Sell);
        assert!(result.events[0].note.contains("polarity only"));
        // 3 * 1.5, no magnitude scaling
        assert_eq!(result.bullish_usd, 4.5);
    }

    #[test]
    fn post_mode_without_actual_uses_expectation_path() {
        let events = [event("CPI m/m", Impact::High, "3.5%", "3.2%", "")];
        let result = analyze(&events, Mode::Post);
        assert_eq!(result.bullish_usd, 5.4);
        assert!(result.events[0].note.contains("expected to improve"));
    }

    #[test]
    fn unmatched_event_is_listed_but_not_scored() {
        let events = [
            event("Crude Oil Inventories", Impact::Medium, "2.1M", "1.9M", ""),
            event("CPI m/m", Impact::Medium, "", "", ""),
        ];
        let result = analyze(&events, Mode::Pre);
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.events[0].bias, GoldBias::Unknown);
        assert_eq!(result.events[0].weight, 1.0);
        // Only CPI contributes: 3 * 1.0, no forecast comparison.
        assert_eq!(result.bullish_usd, 3.0);
    }

    #[test]
    fn output_order_matches_input_order() {
        let events = [
            event("GDP q/q", Impact::High, "", "", ""),
            event("Crude Oil Inventories", Impact::Medium, "", "", ""),
            event("Unemployment Rate", Impact::Medium, "", "", ""),
        ];
        let result = analyze(&events, Mode::Pre);
        let titles: Vec<_> = result.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["GDP q/q", "Crude Oil Inventories", "Unemployment Rate"]);
    }

    #[test]
    fn label_cuts_are_strict() {
        let th = Thresholds::default();
        assert_eq!(label_for(4.0, &th), BiasLabel::SlightSell);
        assert_eq!(label_for(4.01, &th), BiasLabel::Sell);
        assert_eq!(label_for(-4.0, &th), BiasLabel::SlightBuy);
        assert_eq!(label_for(-4.01, &th), BiasLabel::Buy);
        assert_eq!(label_for(2.0, &th), BiasLabel::Neutral);
        assert_eq!(label_for(-2.0, &th), BiasLabel::Neutral);
        assert_eq!(label_for(0.0, &th), BiasLabel::Neutral);
    }

    #[test]
    fn confidence_cuts_are_strict() {
        let th = Thresholds::default();
        assert_eq!(confidence_for(6.0, &th), Confidence::Medium);
        assert_eq!(confidence_for(6.1, &th), Confidence::High);
        assert_eq!(confidence_for(-6.1, &th), Confidence::High);
        assert_eq!(confidence_for(3.0, &th), Confidence::Low);
        assert_eq!(confidence_for(3.1, &th), Confidence::Medium);
    }

    #[test]
    fn scores_accumulate_as_sums() {
        let events = [
            event("CPI m/m", Impact::Medium, "", "", ""),
            event("PPI m/m", Impact::Medium, "", "", ""),
            event("Jobless Claims", Impact::Medium, "", "", ""),
        ];
        let result = analyze(&events, Mode::Pre);
        assert_eq!(result.bullish_usd, 5.0); // 3 + 2
        assert_eq!(result.bearish_usd, 2.0);
        assert_eq!(result.net_score, 3.0);
        assert_eq!(result.bias, BiasLabel::SlightSell);
        assert_eq!(result.confidence, Confidence::Low);
    }
}
