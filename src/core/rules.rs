//! Level rule compilation
//!
//! A rule string is `rule(,rule)*` with `rule := name "=" level`. The name is
//! either an exact cell name, a prefix wildcard `path/*`, or the bare `*` that
//! sets the default level.

use super::error::{Result, VlogError};
use super::log_level::LogLevel;
use std::collections::{BTreeMap, HashMap};

/// Compiled form of a rule string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    default: Option<LogLevel>,
    /// Keyed by prefix including its trailing `/`
    prefixes: BTreeMap<String, LogLevel>,
    exact: HashMap<String, LogLevel>,
}

impl RuleSet {
    /// Compile `input`.
    ///
    /// An unknown level token does not fail the parse: `on_bad_level` is
    /// called with the token and the rule gets `Info`. Syntax errors fail the
    /// whole string.
    ///
    /// ```
    /// use rust_vlog::{LogLevel, RuleSet};
    ///
    /// let rules = RuleSet::parse("*=e,net/*=v1,net/dns=v2", |_| {}).unwrap();
    /// assert_eq!(rules.default_level(), Some(LogLevel::Error));
    /// assert_eq!(rules.resolve("net/tcp", LogLevel::Error), LogLevel::V1);
    /// assert_eq!(rules.resolve("net/dns", LogLevel::Error), LogLevel::V2);
    /// ```
    pub fn parse(input: &str, mut on_bad_level: impl FnMut(&str)) -> Result<Self> {
        let mut rules = RuleSet::default();
        if input.is_empty() {
            return Ok(rules);
        }
        // A lone "," is an empty rule, not an empty string
        let body = input.strip_suffix(',').unwrap_or(input);

        for rule in body.split(',') {
            let (key, token) = rule
                .split_once('=')
                .ok_or_else(|| VlogError::config(input, format!("no level in rule '{}'", rule)))?;

            let mut key = key.to_lowercase();
            let is_prefix = key == "*" || key.ends_with("/*");
            if is_prefix {
                key.pop();
                if key.contains('*') {
                    return Err(VlogError::config(
                        input,
                        format!("multiple wildcards in rule '{}'", rule),
                    ));
                }
            } else if key.contains('*') {
                return Err(VlogError::config(
                    input,
                    format!("wildcard must be trailing '/*' or bare '*' in rule '{}'", rule),
                ));
            }
            let key = key.trim_end_matches('/');

            let level = token.parse::<LogLevel>().unwrap_or_else(|_| {
                on_bad_level(token);
                LogLevel::Info
            });

            if !is_prefix {
                rules.exact.insert(key.to_string(), level);
            } else if key.is_empty() {
                rules.default = Some(level);
            } else {
                rules.prefixes.insert(format!("{}/", key), level);
            }
        }

        Ok(rules)
    }

    /// Level set by a bare `*` rule
    #[must_use]
    pub fn default_level(&self) -> Option<LogLevel> {
        self.default
    }

    /// Prefix rules in the order they are tried: descending lexicographic.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, LogLevel)> {
        self.prefixes.iter().rev().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn exact(&self, name: &str) -> Option<LogLevel> {
        self.exact.get(name).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.prefixes.is_empty() && self.exact.is_empty()
    }

    /// Level of the non-root cell `name` when the default is `default`.
    ///
    /// An exact rule wins. Otherwise the first prefix, in descending
    /// lexicographic order, that is a path prefix of `name` applies. This
    /// ordering is not longest-match: with `a/*` and `ab/*`, the name `a/x`
    /// is tried against `ab/` first and skips it only because it does not match.
    #[must_use]
    pub fn resolve(&self, name: &str, default: LogLevel) -> LogLevel {
        if let Some(level) = self.exact(name) {
            return level;
        }
        self.prefixes()
            .find(|(prefix, _)| {
                name == &prefix[..prefix.len() - 1] || name.starts_with(prefix)
            })
            .map_or(default, |(_, level)| level)
    }
}
