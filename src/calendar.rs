//! Economic calendar feed parsing.
//!
//! The feed is RSS-ish markup: a flat run of `<item>…</item>` blocks, each
//! carrying title/date/time/impact/country/forecast/previous/actual tags.
//! Values may be CDATA-wrapped or plain inline text. Parsing is tolerant by
//! contract: a missing tag yields an empty field, a malformed item is
//! skipped, and nothing in here ever returns an error.

use chrono::NaiveDate;

/// Release importance as tagged by the feed. Low/None entries are dropped
/// at parse time and never reach the bias engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    High,
    Medium,
}

impl Impact {
    fn from_feed(raw: &str) -> Option<Self> {
        match raw.trim() {
            "High" => Some(Impact::High),
            "Medium" => Some(Impact::Medium),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
        }
    }
}

/// One scheduled USD release. Field strings are kept as displayed by the
/// feed; empty string means the tag was absent. `date` is the normalized
/// form of `date_raw`, `None` when the raw text fits no known format.
#[derive(Debug, Clone)]
pub struct NewsEvent {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub date_raw: String,
    pub time: String,
    pub impact: Impact,
    pub currency: String,
    pub forecast: String,
    pub previous: String,
    pub actual: String,
}

impl NewsEvent {
    pub fn has_actual(&self) -> bool {
        !self.actual.trim().is_empty()
    }
}

/// Extract the filtered event list from raw feed markup.
///
/// Only currency "USD" with High/Medium impact survives; that invariant is
/// established here and never revisited downstream.
pub fn parse(feed_text: &str) -> Vec<NewsEvent> {
    let mut events = Vec::new();
    let mut rest = feed_text;

    while let Some(start) = rest.find("<item>") {
        let after_open = &rest[start + "<item>".len()..];
        let Some(end) = after_open.find("</item>") else {
            // Unterminated trailing item: nothing more to scan.
            break;
        };
        let item = &after_open[..end];
        rest = &after_open[end + "</item>".len()..];

        let currency = extract_tag(item, "country");
        if currency != "USD" {
            continue;
        }
        let Some(impact) = Impact::from_feed(&extract_tag(item, "impact")) else {
            continue;
        };

        let date_raw = extract_tag(item, "date");
        events.push(NewsEvent {
            title: extract_tag(item, "title"),
            date: normalize_date(&date_raw),
            date_raw,
            time: extract_tag(item, "time"),
            impact,
            currency,
            forecast: extract_tag(item, "forecast"),
            previous: extract_tag(item, "previous"),
            actual: extract_tag(item, "actual"),
        });
    }

    events
}

/// Inner text of the first `<tag>` in `item`, trimmed, with an optional
/// CDATA wrapper removed. Absent or malformed tags yield "".
fn extract_tag(item: &str, tag: &str) -> String {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let mut search = item;
    loop {
        let Some(pos) = search.find(&open) else {
            return String::new();
        };
        let after = &search[pos + open.len()..];

        // Require '>' or attribute whitespace next, otherwise this was a
        // longer tag name sharing the prefix ("time" vs "timestamp").
        let body_start = match after.bytes().next() {
            Some(b'>') => 1,
            Some(b' ' | b'\t' | b'\n' | b'\r') => match after.find('>') {
                Some(gt) => gt + 1,
                None => return String::new(),
            },
            _ => {
                search = after;
                continue;
            }
        };

        let body = &after[body_start..];
        let Some(close_pos) = body.find(&close) else {
            return String::new();
        };
        return unwrap_cdata(&body[..close_pos]).to_string();
    }
}

fn unwrap_cdata(body: &str) -> &str {
    let body = body.trim();
    body.strip_prefix("<![CDATA[")
        .and_then(|inner| inner.strip_suffix("]]>"))
        .map(str::trim)
        .unwrap_or(body)
}

/// Normalize a feed date to a calendar date. The feed renders either a
/// locale form ("Friday February 27, 2026", weekday optional) or a fixed
/// numeric form (MM-DD-YYYY / YYYY-MM-DD).
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    const FORMATS: &[&str] = &["%A %B %d, %Y", "%B %d, %Y", "%m-%d-%Y", "%Y-%m-%d"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Events scheduled on `today` (UTC calendar day). Events whose date never
/// normalized are excluded, matching the feed's own "all-day unknowns"
/// behavior.
pub fn filter_today(events: &[NewsEvent], today: NaiveDate) -> Vec<NewsEvent> {
    events
        .iter()
        .filter(|e| e.date == Some(today))
        .cloned()
        .collect()
}

/// True once any event in the set carries released actual data.
pub fn has_released(events: &[NewsEvent]) -> bool {
    events.iter().any(NewsEvent::has_actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(
        title: &str,
        date: &str,
        impact: &str,
        country: &str,
        forecast: &str,
        previous: &str,
    ) -> String {
        format!(
            "<item><title><![CDATA[{title}]]></title><date><![CDATA[{date}]]></date>\
             <time><![CDATA[1:30pm]]></time><impact><![CDATA[{impact}]]></impact>\
             <country><![CDATA[{country}]]></country><forecast><![CDATA[{forecast}]]></forecast>\
             <previous><![CDATA[{previous}]]></previous></item>"
        )
    }

    #[test]
    fn keeps_only_usd_medium_and_high() {
        let feed = [
            item("CPI m/m", "02-27-2026", "High", "USD", "0.3%", "0.2%"),
            item("German Ifo", "02-27-2026", "High", "EUR", "", ""),
            item("Crude Oil Inventories", "02-27-2026", "Low", "USD", "", ""),
            item("ADP Non-Farm Employment Change", "02-27-2026", "Medium", "USD", "150K", "146K"),
        ]
        .join("\n");

        let events = parse(&feed);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.currency == "USD"));
        assert_eq!(events[0].impact, Impact::High);
        assert_eq!(events[1].impact, Impact::Medium);
        assert_eq!(events[1].forecast, "150K");
    }

    #[test]
    fn plain_inline_tags_are_accepted() {
        let feed = "<item><title>Unemployment Claims</title><date>02-27-2026</date>\
                    <time>1:30pm</time><impact>High</impact><country>USD</country>\
                    <forecast> 213K </forecast><previous>210K</previous></item>";
        let events = parse(feed);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Unemployment Claims");
        assert_eq!(events[0].forecast, "213K");
    }

    #[test]
    fn missing_tags_default_to_empty() {
        let feed = "<item><title>FOMC Statement</title><impact>High</impact>\
                    <country>USD</country></item>";
        let events = parse(feed);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].forecast, "");
        assert_eq!(events[0].actual, "");
        assert_eq!(events[0].date, None);
        assert!(!events[0].has_actual());
    }

    #[test]
    fn malformed_item_does_not_poison_the_feed() {
        // First item is mangled (unclosed title, no country/impact): it is
        // dropped and scanning resumes at the next item marker.
        let feed = format!(
            "<item><title>Oops, truncated</item>{}",
            item("GDP q/q", "02-27-2026", "High", "USD", "2.1%", "2.3%")
        );
        let events = parse(&feed);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "GDP q/q");
    }

    #[test]
    fn date_forms_normalize_identically() {
        let expected = NaiveDate::from_ymd_opt(2026, 2, 27);
        assert_eq!(normalize_date("Friday February 27, 2026"), expected);
        assert_eq!(normalize_date("February 27, 2026"), expected);
        assert_eq!(normalize_date("02-27-2026"), expected);
        assert_eq!(normalize_date("2026-02-27"), expected);
        assert_eq!(normalize_date("soonish"), None);
        assert_eq!(normalize_date(""), None);
    }

    #[test]
    fn today_filter_is_exact_date_match() {
        let feed = [
            item("CPI m/m", "02-27-2026", "High", "USD", "0.3%", "0.2%"),
            item("GDP q/q", "02-28-2026", "High", "USD", "2.1%", "2.3%"),
        ]
        .join("");
        let events = parse(&feed);
        let today = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
        let todays = filter_today(&events, today);
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].title, "CPI m/m");
    }

    #[test]
    fn has_released_checks_actuals() {
        let mut events = parse(&item("CPI m/m", "02-27-2026", "High", "USD", "0.3%", "0.2%"));
        assert!(!has_released(&events));
        events[0].actual = "0.4%".to_string();
        assert!(has_released(&events));
    }
}
