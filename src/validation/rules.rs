use serde::{Deserialize, Serialize};

use super::card::is_valid_card_number;

/// A single failed constraint on a single field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Violation {
    pub field: String,
    pub rule: String,
    pub message: String,
}

impl Violation {
    fn new(field: &str, rule: &str, message: String) -> Self {
        Violation {
            field: field.to_string(),
            rule: rule.to_string(),
            message,
        }
    }
}

/// One declarative constraint over one field value. Rules are built up by the
/// gateway per operation and handed to [`evaluate`], which checks every rule
/// rather than stopping at the first failure.
pub enum FieldRule<'a> {
    /// Char count must be within [min, max]
    Length {
        field: &'static str,
        value: &'a str,
        min: usize,
        max: usize,
    },
    /// Integer must be within (gt, le]
    Range {
        field: &'static str,
        value: i64,
        gt: i64,
        le: i64,
    },
    /// Char count must be at least min, with no upper bound
    MinLength {
        field: &'static str,
        value: &'a str,
        min: usize,
    },
    EmailSyntax {
        field: &'static str,
        value: &'a str,
    },
    UrlSyntax {
        field: &'static str,
        value: &'a str,
    },
    CardChecksum {
        field: &'static str,
        value: &'a str,
    },
    /// Field must be present (used for query/form fields the framework
    /// deserializes as Option)
    Required {
        field: &'static str,
        value: Option<&'a str>,
    },
}

impl FieldRule<'_> {
    pub fn check(&self) -> Option<Violation> {
        match self {
            FieldRule::Length {
                field,
                value,
                min,
                max,
            } => {
                let chars = value.chars().count();
                if chars < *min || chars > *max {
                    return Some(Violation::new(
                        field,
                        "length",
                        format!("must be between {} and {} characters, got {}", min, max, chars),
                    ));
                }
                None
            }
            FieldRule::Range { field, value, gt, le } => {
                if value <= gt || value > le {
                    return Some(Violation::new(
                        field,
                        "range",
                        format!("must be greater than {} and at most {}, got {}", gt, le, value),
                    ));
                }
                None
            }
            FieldRule::MinLength { field, value, min } => {
                let chars = value.chars().count();
                if chars < *min {
                    return Some(Violation::new(
                        field,
                        "min_length",
                        format!("must be at least {} characters, got {}", min, chars),
                    ));
                }
                None
            }
            FieldRule::EmailSyntax { field, value } => {
                if !is_valid_email(value) {
                    return Some(Violation::new(
                        field,
                        "email_syntax",
                        format!("'{}' is not a valid email address", value),
                    ));
                }
                None
            }
            FieldRule::UrlSyntax { field, value } => {
                if !is_valid_url(value) {
                    return Some(Violation::new(
                        field,
                        "url_syntax",
                        format!("'{}' is not a valid http(s) URL", value),
                    ));
                }
                None
            }
            FieldRule::CardChecksum { field, value } => {
                if !is_valid_card_number(value) {
                    return Some(Violation::new(
                        field,
                        "card_checksum",
                        "does not satisfy payment card checksum rules".to_string(),
                    ));
                }
                None
            }
            FieldRule::Required { field, value } => {
                match value {
                    Some(present) if !present.is_empty() => None,
                    _ => Some(Violation::new(
                        field,
                        "required",
                        "is required and must not be empty".to_string(),
                    )),
                }
            }
        }
    }
}

/// Evaluates every rule and aggregates all failures. An empty vec means the
/// input is valid.
pub fn evaluate(rules: &[FieldRule]) -> Vec<Violation> {
    rules.iter().filter_map(FieldRule::check).collect()
}

// Deliberately a syntax check only: one '@', non-empty local part, dotted
// domain, no whitespace. Deliverability is out of scope.
fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = value.splitn(2, '@');

    let local = match parts.next() {
        Some(local) if !local.is_empty() => local,
        _ => return false,
    };

    let domain = match parts.next() {
        Some(domain) if !domain.is_empty() => domain,
        _ => return false,
    };

    if local.contains('@') || domain.contains('@') {
        return false;
    }

    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

// Same spirit as the email check: http(s) scheme plus a non-empty host, no
// whitespace. Reachability is out of scope.
fn is_valid_url(value: &str) -> bool {
    let rest = match value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
    {
        Some(rest) => rest,
        None => return false,
    };

    if rest.chars().any(char::is_whitespace) {
        return false;
    }

    let host = rest.split('/').next().unwrap_or("");

    !host.is_empty()
}
