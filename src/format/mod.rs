use crate::error::SurveyError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // prefix, integer digits, optional fraction digits, suffix
    static ref PATTERN_RE: Regex =
        Regex::new(r"^([^#0,.]*)([#0,]*)(?:\.([#0]*))?([^#0,.]*)$").unwrap();
}

pub const DEFAULT_AVERAGE_PATTERN: &str = "0.##";

/// A parsed decimal pattern such as `"0.##"`, `"#,##0.00"` or `"0.#%"`.
///
/// `0` is a required digit, `#` an optional one. Optional fraction digits
/// are dropped when they are trailing zeros. A `%` or `‰` in the prefix or
/// suffix scales the value by 100 or 1000.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalPattern {
    prefix: String,
    suffix: String,
    min_integer_digits: usize,
    grouping_size: Option<usize>,
    min_fraction_digits: usize,
    max_fraction_digits: usize,
    multiplier: u32,
}

impl DecimalPattern {
    pub fn parse(pattern: &str) -> Result<Self, SurveyError> {
        if pattern.contains(';') {
            return Err(SurveyError::malformed(pattern, "sub-patterns are not supported"));
        }

        let caps = PATTERN_RE
            .captures(pattern)
            .ok_or_else(|| SurveyError::malformed(pattern, "expected <prefix><digits>[.<digits>]<suffix>"))?;

        let prefix = caps.get(1).map_or("", |m| m.as_str());
        let integer = caps.get(2).map_or("", |m| m.as_str());
        let fraction = caps.get(3).map_or("", |m| m.as_str());
        let suffix = caps.get(4).map_or("", |m| m.as_str());

        let integer_digits: Vec<char> = integer.chars().filter(|c| *c != ',').collect();
        if integer_digits.is_empty() && fraction.is_empty() {
            return Err(SurveyError::malformed(pattern, "no digit placeholders"));
        }

        // Optional integer digits must all come before the required ones
        if let Some(first_zero) = integer_digits.iter().position(|c| *c == '0') {
            if integer_digits[first_zero..].contains(&'#') {
                return Err(SurveyError::malformed(pattern, "unexpected '#' after '0'"));
            }
        }
        // and the reverse holds for the fraction
        if let Some(first_hash) = fraction.find('#') {
            if fraction[first_hash..].contains('0') {
                return Err(SurveyError::malformed(pattern, "unexpected '0' after '#'"));
            }
        }

        let affixes = format!("{}{}", prefix, suffix);
        let multiplier = match (affixes.contains('%'), affixes.contains('‰')) {
            (false, false) => 1,
            (true, false) => 100,
            (false, true) => 1000,
            (true, true) => {
                return Err(SurveyError::malformed(pattern, "both '%' and '‰' given"));
            }
        };

        let grouping_size = match integer.rfind(',') {
            Some(idx) => {
                let size = integer.len() - idx - 1;
                if size == 0 {
                    return Err(SurveyError::malformed(pattern, "grouping separator at end of integer part"));
                }
                Some(size)
            }
            None => None,
        };

        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            min_integer_digits: integer_digits.iter().filter(|c| **c == '0').count(),
            grouping_size,
            min_fraction_digits: fraction.chars().filter(|c| *c == '0').count(),
            max_fraction_digits: fraction.len(),
            multiplier,
        })
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }

        let value = value * f64::from(self.multiplier);
        let negative = value.is_sign_negative();

        if value.is_infinite() {
            let sign = if negative { "-" } else { "" };
            return format!("{}{}∞{}", sign, self.prefix, self.suffix);
        }

        // Rust rounds the exact binary value, ties to even
        let rounded = format!("{:.*}", self.max_fraction_digits, value.abs());
        let (integer, fraction) = match rounded.split_once('.') {
            Some((i, f)) => (i, f),
            None => (rounded.as_str(), ""),
        };

        let mut fraction = fraction.to_string();
        while fraction.len() > self.min_fraction_digits && fraction.ends_with('0') {
            fraction.pop();
        }

        let mut integer = integer.trim_start_matches('0').to_string();
        while integer.len() < self.min_integer_digits {
            integer.insert(0, '0');
        }
        if let Some(size) = self.grouping_size {
            integer = group_digits(&integer, size);
        }
        if integer.is_empty() && fraction.is_empty() {
            integer.push('0');
        }

        let is_zero = !integer.chars().chain(fraction.chars()).any(|c| c.is_ascii_digit() && c != '0');

        let mut out = String::new();
        if negative && !is_zero {
            out.push('-');
        }
        out.push_str(&self.prefix);
        out.push_str(&integer);
        if !fraction.is_empty() {
            out.push('.');
            out.push_str(&fraction);
        }
        out.push_str(&self.suffix);
        out
    }
}

impl Default for DecimalPattern {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            min_integer_digits: 1,
            grouping_size: None,
            min_fraction_digits: 0,
            max_fraction_digits: 2,
            multiplier: 1,
        }
    }
}

fn group_digits(digits: &str, size: usize) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / size);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % size == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
