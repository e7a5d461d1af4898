//! Static knowledge base mapping USD indicator names to dollar polarity.
//!
//! A stronger-than-expected reading of a `usd_positive` indicator is
//! conventionally dollar-bullish, which is bearish for gold; the inverse
//! holds for indicators like unemployment where strength means a weaker
//! dollar. Matching is a linear first-match-wins scan over the table, so
//! declaration order is load-bearing: narrower keywords that are textual
//! substrings of broader ones ("Core CPI" vs "CPI") must come first or the
//! narrow rule is unreachable.

/// One row of the indicator table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRule {
    /// Matched case-insensitively as a substring of the event title.
    pub keyword: &'static str,
    /// true = indicator strength is bullish for USD (bearish for gold).
    pub usd_positive: bool,
    /// Salience, scaled by impact and surprise in the bias engine.
    pub weight: u32,
    pub desc: &'static str,
}

const fn rule(keyword: &'static str, usd_positive: bool, weight: u32, desc: &'static str) -> IndicatorRule {
    IndicatorRule { keyword, usd_positive, weight, desc }
}

/// Ordered rule table. Categories are documentation only.
pub const RULES: &[IndicatorRule] = &[
    // Inflation
    rule("Core CPI", true, 3, "Core inflation"),
    rule("CPI", true, 3, "Inflation data"),
    rule("PPI", true, 2, "Producer prices"),
    rule("Core PCE", true, 3, "Core PCE"),
    rule("PCE", true, 3, "Fed preferred inflation"),
    // Employment
    rule("NFP", true, 3, "Non-Farm Payrolls"),
    rule("Non-Farm", true, 3, "Non-Farm Payrolls"),
    rule("Unemployment", false, 2, "Unemployment rate"),
    rule("ADP", true, 2, "ADP employment"),
    rule("Jobless Claims", false, 2, "Weekly jobless claims"),
    // Growth
    rule("GDP", true, 3, "Economic growth"),
    rule("Retail Sales", true, 2, "Consumer spending"),
    rule("ISM", true, 2, "Business activity"),
    rule("PMI", true, 2, "Business activity"),
    // Fed / rates
    rule("FOMC", true, 3, "Fed rate decision"),
    rule("Interest Rate", true, 3, "Rate decision"),
    rule("Powell", true, 2, "Fed Chair speech"),
    rule("Fed", true, 2, "Fed speech/statement"),
    // Housing
    rule("Housing", true, 1, "Housing data"),
    rule("Building Permits", true, 1, "Building activity"),
    // Trade
    rule("Trade Balance", false, 2, "Trade deficit/surplus"),
    rule("Current Account", false, 1, "Current account"),
];

/// First rule whose keyword appears in the title, or `None`.
pub fn match_rule(title: &str) -> Option<&'static IndicatorRule> {
    let lower = title.to_lowercase();
    RULES
        .iter()
        .find(|r| lower.contains(&r.keyword.to_lowercase()))
}
