//! Structured one-line JSON logging.
//!
//! Every entry is a single JSON object on stdout with `ts`, `module` and
//! caller-supplied fields, so a day of cron runs can be grepped and replayed
//! without a log parser. `LOG_LEVEL` gates verbosity; `LOG_FILE`, when set,
//! additionally appends each entry to a file for audit.

use chrono::Utc;
use serde_json::{json, Map, Value};
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::{Mutex, OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("debug") => Level::Debug,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

/// RFC3339 timestamp with millisecond precision.
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

static LOG_SINK: OnceLock<Option<Mutex<std::fs::File>>> = OnceLock::new();

fn sink() -> &'static Option<Mutex<std::fs::File>> {
    LOG_SINK.get_or_init(|| {
        let path = std::env::var("LOG_FILE").ok()?;
        let file = OpenOptions::new().create(true).append(true).open(path).ok()?;
        Some(Mutex::new(file))
    })
}

/// Emit an info-level entry for `module`.
pub fn json_log(module: &str, fields: Map<String, Value>) {
    log_at(Level::Info, module, fields);
}

/// Emit an entry at an explicit level, honoring `LOG_LEVEL`.
pub fn log_at(level: Level, module: &str, mut fields: Map<String, Value>) {
    if level < Level::from_env() {
        return;
    }
    fields.insert("ts".to_string(), Value::String(ts_now()));
    fields.insert("level".to_string(), Value::String(level.as_str().to_string()));
    fields.insert("module".to_string(), Value::String(module.to_string()));
    let line = Value::Object(fields).to_string();
    println!("{line}");
    if let Some(file) = sink() {
        if let Ok(mut f) = file.lock() {
            let _ = writeln!(f, "{line}");
        }
    }
}

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_order() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
        assert_eq!(Level::Warn.as_str(), "warn");
    }

    #[test]
    fn obj_builds_field_maps() {
        let m = obj(&[("a", v_str("x")), ("b", v_num(2.0))]);
        assert_eq!(m.get("a"), Some(&Value::String("x".to_string())));
        assert_eq!(m.get("b"), Some(&json!(2.0)));
    }
}
