//! Named format checks for the `format` keyword

use chrono::{DateTime, NaiveDate, NaiveTime};
use regex::Regex;
use schemata_uri::UriOptions;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, LazyLock};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

static HOST_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("host label pattern is valid")
});

/// A format predicate; values the format does not apply to should pass
pub type FormatCheck = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Format name → predicate table
///
/// Formats without a registered check always pass.
#[derive(Clone, Default)]
pub struct FormatRegistry {
    checks: HashMap<String, FormatCheck>,
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.names())
            .finish()
    }
}

impl FormatRegistry {
    /// An empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in formats
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("date-time", strings(|s| DateTime::parse_from_rfc3339(s).is_ok()));
        registry.register("date", strings(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()));
        registry.register("time", strings(|s| NaiveTime::parse_from_str(s, "%H:%M:%S").is_ok()));
        registry.register("utc-millisec", |value: &Value| match value {
            Value::String(s) => s.parse::<f64>().is_ok_and(f64::is_finite),
            _ => true,
        });
        registry.register("regex", strings(|s| Regex::new(s).is_ok()));
        registry.register(
            "uri",
            strings(|s| schemata_uri::parse_with(s, &UriOptions::strict()).is_valid()),
        );
        registry.register("email", strings(|s| EMAIL.is_match(s)));
        registry.register("ip-address", strings(|s| s.parse::<Ipv4Addr>().is_ok()));
        registry.register("ipv6", strings(|s| s.parse::<Ipv6Addr>().is_ok()));
        registry.register("host-name", strings(is_host_name));
        registry
    }

    /// Register (or replace) a format check
    pub fn register<F>(&mut self, name: impl Into<String>, check: F)
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.checks.insert(name.into(), Arc::new(check));
    }

    /// Remove a format check
    pub fn remove(&mut self, name: &str) -> bool {
        self.checks.remove(name).is_some()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    /// Whether `value` is in format `name`
    #[must_use]
    pub fn check(&self, name: &str, value: &Value) -> bool {
        self.checks.get(name).is_none_or(|check| check(value))
    }

    /// Registered format names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.checks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Lift a string predicate into a check that passes non-strings
fn strings(check: impl Fn(&str) -> bool + Send + Sync + 'static) -> impl Fn(&Value) -> bool + Send + Sync + 'static {
    move |value: &Value| value.as_str().is_none_or(&check)
}

fn is_host_name(s: &str) -> bool {
    !s.is_empty() && s.len() <= 255 && s.split('.').all(|label| HOST_LABEL.is_match(label))
}
