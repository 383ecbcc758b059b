//! Native constraint validation
//!
//! Mirrors the HTML constraint validation API for the input kinds used by the
//! bill form. Values are sanitized when they are set, exactly like a browser
//! does: a `number` input silently drops anything that is not a valid
//! floating-point number, a `date` input drops anything that is not a valid
//! `YYYY-MM-DD` date, and a `select` drops values absent from its options.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Kind of a form control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    Text,
    TextArea,
    Number,
    Date,
    Select(Vec<String>),
    File,
}

impl InputKind {
    /// Apply the value sanitization algorithm of this kind
    pub fn sanitize(&self, raw: &str) -> String {
        match self {
            InputKind::Text => raw.replace(['\r', '\n'], ""),
            InputKind::TextArea | InputKind::File => raw.to_string(),
            InputKind::Number => {
                if is_valid_number(raw) {
                    raw.to_string()
                } else {
                    String::new()
                }
            }
            InputKind::Date => {
                if is_valid_date(raw) {
                    raw.to_string()
                } else {
                    String::new()
                }
            }
            InputKind::Select(options) => {
                if options.iter().any(|o| o == raw) {
                    raw.to_string()
                } else {
                    String::new()
                }
            }
        }
    }
}

/// Validity flags of one control (`ValidityState`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Validity {
    pub value_missing: bool,
    pub step_mismatch: bool,
    pub range_underflow: bool,
    pub range_overflow: bool,
}

impl Validity {
    pub fn valid(&self) -> bool {
        !(self.value_missing || self.step_mismatch || self.range_underflow || self.range_overflow)
    }
}

/// Constraints attached to a control
///
/// `step`, `min` and `max` only apply to number inputs. A step is counted
/// from `min`, or from zero when there is none.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub kind: InputKind,
    pub required: bool,
    pub step: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Constraint {
    pub fn new(kind: InputKind) -> Self {
        Self {
            kind,
            required: false,
            step: None,
            min: None,
            max: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Validity of an already-sanitized value
    pub fn check(&self, value: &str) -> Validity {
        let mut validity = Validity {
            value_missing: self.required && value.is_empty(),
            ..Validity::default()
        };

        if self.kind != InputKind::Number || value.is_empty() {
            return validity;
        }
        let Ok(number) = value.parse::<f64>() else {
            return validity;
        };

        validity.range_underflow = self.min.is_some_and(|min| number < min);
        validity.range_overflow = self.max.is_some_and(|max| number > max);
        validity.step_mismatch = self.step.is_some_and(|step| {
            let steps = (number - self.min.unwrap_or(0.0)) / step;
            !steps.is_finite() || steps.fract() != 0.0
        });
        validity
    }
}

/// Valid floating-point number per the HTML microsyntax
pub fn is_valid_number(raw: &str) -> bool {
    static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NUMBER_REGEX.get_or_init(|| {
        Regex::new(r"^-?(?:\d+(?:\.\d+)?|\.\d+)(?:[eE][-+]?\d+)?$").expect("number regex is valid")
    });
    regex.is_match(raw)
}

/// Valid date string (`YYYY-MM-DD`, real calendar day)
pub fn is_valid_date(raw: &str) -> bool {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DATE_REGEX
        .get_or_init(|| Regex::new(r"^\d{4,}-\d{2}-\d{2}$").expect("date regex is valid"));
    regex.is_match(raw) && chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}
