//! Form field validation.
//!
//! Rules run against the raw text of a field; every failing rule yields one
//! message. Forms collect messages per field in [`FieldErrors`].

use std::collections::BTreeMap;

/// A single check applied to a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    /// Numeric lower bound. Non-numeric values are left to [`Rule::Numeric`].
    Min(f64),
    /// Numeric upper bound.
    Max(f64),
    MinLength(usize),
    MaxLength(usize),
    /// `something@host.tld`, whitespace-free around the `@`.
    Email,
    Numeric,
    /// Must equal the given text (password confirmation).
    Equals(String),
}

impl Rule {
    fn check(&self, value: &str) -> Option<String> {
        match self {
            Rule::Required => value
                .trim()
                .is_empty()
                .then(|| "Value is required".to_string()),
            Rule::Min(min) => parse_number(value)
                .filter(|n| n < min)
                .map(|_| format!("Value must be at least {min}")),
            Rule::Max(max) => parse_number(value)
                .filter(|n| n > max)
                .map(|_| format!("Value must be at most {max}")),
            Rule::MinLength(len) => (value.chars().count() < *len)
                .then(|| format!("Must be at least {len} characters")),
            Rule::MaxLength(len) => (value.chars().count() > *len)
                .then(|| format!("Must be at most {len} characters")),
            Rule::Email => (!is_email(value)).then(|| "Invalid email address".to_string()),
            Rule::Numeric => (!value.trim().is_empty() && parse_number(value).is_none())
                .then(|| "Value must be a number".to_string()),
            Rule::Equals(expected) => {
                (value != expected).then(|| "Values do not match".to_string())
            }
        }
    }
}

/// Validate a value against a list of rules.
/// Returns a list of validation error messages (empty = valid).
pub fn validate(value: &str, rules: &[Rule]) -> Vec<String> {
    rules.iter().filter_map(|rule| rule.check(value)).collect()
}

/// Parses a form number, accepting a decimal comma.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Matches `\S+@\S+\.\S+` anywhere in the value.
pub fn is_email(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    chars.iter().enumerate().any(|(at, c)| {
        if *c != '@' || at == 0 || chars[at - 1].is_whitespace() {
            return false;
        }
        let tail: Vec<char> = chars[at + 1..]
            .iter()
            .copied()
            .take_while(|c| !c.is_whitespace())
            .collect();
        tail.iter()
            .enumerate()
            .any(|(i, c)| *c == '.' && i > 0 && i + 1 < tail.len())
    })
}

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `rules` on `value` and record failures under `field`.
    pub fn check(&mut self, field: &str, value: &str, rules: &[Rule]) -> &mut Self {
        for message in validate(value, rules) {
            self.add(field, message);
        }
        self
    }

    /// Run `rules` and record a single fixed `message` if any of them fail.
    pub fn check_as(
        &mut self,
        field: &str,
        value: &str,
        rules: &[Rule],
        message: &str,
    ) -> &mut Self {
        if !validate(value, rules).is_empty() {
            self.add(field, message);
        }
        self
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
        self
    }

    /// Drop the messages of one field, e.g. once it is edited again.
    pub fn clear(&mut self, field: &str) {
        self.fields.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First message for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|m| m.first())
            .map(String::as_str)
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}
