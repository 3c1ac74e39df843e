// src/forms/fields.rs

//! Field definitions, submitted values and per-field validation
//!
//! A form is a plain list of [`FieldDef`] values. Presentation is layered on
//! by decoration functions such as [`styled`], and [`validate_field`] checks
//! one submitted value against a definition, returning every error found.

use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Errors keyed by field name, in field-name order
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Submitted form data, kept in submission order
///
/// Lookups return the first value submitted under a key.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        let mut index = HashMap::new();
        for (pos, (key, _)) in pairs.iter().enumerate() {
            index.entry(key.clone()).or_insert(pos);
        }
        Self { pairs, index }
    }

    /// Build from borrowed pairs
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&pos| self.pairs[pos].1.as_str())
    }

    /// Value for `key`, or the empty string when absent
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in submission order, duplicates included
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::new(pairs)
    }
}

/// A single check applied to a non-empty value
#[derive(Debug, Clone)]
pub enum Validator {
    /// At most this many characters
    MaxLen(usize),
    /// A whole number inside the inclusive range
    IntRange(i64, i64),
    /// Must match the pattern, otherwise report the message
    Pattern(Regex, &'static str),
}

impl Validator {
    fn check(&self, value: &str) -> Option<String> {
        match self {
            Validator::MaxLen(max) => {
                let len = value.chars().count();
                (len > *max).then(|| {
                    format!(
                        "Ensure this value has at most {} characters (it has {}).",
                        max, len
                    )
                })
            }
            Validator::IntRange(min, max) => match value.trim().parse::<i64>() {
                Err(_) => Some("Enter a whole number.".to_string()),
                Ok(n) if n < *min => Some(format!(
                    "Ensure this value is greater than or equal to {}.",
                    min
                )),
                Ok(n) if n > *max => Some(format!(
                    "Ensure this value is less than or equal to {}.",
                    max
                )),
                Ok(_) => None,
            },
            Validator::Pattern(re, message) => {
                (!re.is_match(value)).then(|| message.to_string())
            }
        }
    }
}

/// Description of one form field
#[derive(Debug, Clone, Serialize)]
pub struct FieldDef {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    pub required: bool,
    /// Widget attributes, e.g. `class`
    pub attrs: BTreeMap<String, String>,
    #[serde(skip)]
    pub validators: Vec<Validator>,
}

impl FieldDef {
    pub fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            placeholder: None,
            required: false,
            attrs: BTreeMap::new(),
            validators: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, text: &'static str) -> Self {
        self.placeholder = Some(text);
        self
    }

    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attrs.insert(key.to_string(), value.to_string());
        self
    }

    pub fn max_len(mut self, max: usize) -> Self {
        self.validators.push(Validator::MaxLen(max));
        self
    }

    pub fn int_range(mut self, min: i64, max: i64) -> Self {
        self.validators.push(Validator::IntRange(min, max));
        self
    }

    pub fn pattern(mut self, re: &Regex, message: &'static str) -> Self {
        self.validators.push(Validator::Pattern(re.clone(), message));
        self
    }

    /// Require something shaped like an email address
    pub fn email(self) -> Self {
        self.pattern(&EMAIL_RE, "Enter a valid email address.")
    }
}

static EMAIL_RE: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Add the shared input styling to a field
pub fn styled(field: FieldDef) -> FieldDef {
    let class = match field.attrs.get("class") {
        Some(existing) if !existing.split_whitespace().any(|c| c == "form-control") => {
            format!("{} form-control", existing)
        }
        Some(existing) => existing.clone(),
        None => "form-control".to_string(),
    };
    field.attr("class", &class)
}

/// Check one submitted value, returning every error
///
/// The value is trimmed first, matching what gets stored. A blank value only
/// fails the required check; optional blank fields pass.
pub fn validate_field(field: &FieldDef, value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() {
        return if field.required {
            vec!["This field is required.".to_string()]
        } else {
            Vec::new()
        };
    }

    field
        .validators
        .iter()
        .filter_map(|v| v.check(value))
        .collect()
}

/// Validate every field of a form, keeping only fields with errors
pub fn validate_form(defs: &[FieldDef], fields: &FormFields) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for def in defs {
        let found = validate_field(def, fields.value(def.name));
        if !found.is_empty() {
            errors.insert(def.name.to_string(), found);
        }
    }
    errors
}
