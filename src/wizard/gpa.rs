//! GPA calculator
//!
//! Editable grade rows plus optional prior GPA/credits. There is always at
//! least one row.

use crate::api::{GpaRequest, GpaResult, Grade, GradeSubmission};
use crate::error::WizardError;

pub const DEFAULT_ROW_CREDITS: &str = "3";

/// One course row in the calculator
#[derive(Debug, Clone, PartialEq)]
pub struct GradeEntry {
    pub course_name: String,
    pub grade: Grade,
    pub credits: String,
}

impl Default for GradeEntry {
    fn default() -> Self {
        Self {
            course_name: String::new(),
            grade: Grade::default(),
            credits: DEFAULT_ROW_CREDITS.to_string(),
        }
    }
}

impl GradeEntry {
    pub fn credits_value(&self) -> f64 {
        parse_float_or_zero(&self.credits)
    }
}

/// Leading-decimal parse ("3.5 credits" -> 3.5). Anything unusable,
/// including infinities, becomes 0.
pub fn parse_float_or_zero(input: &str) -> f64 {
    let trimmed = input.trim_start();
    let len = float_prefix_len(trimmed.as_bytes());

    trimmed[..len]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Length of the longest `[+-]digits[.digits][e[+-]digits]` prefix, 0 when
/// there is no mantissa digit.
fn float_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    end
}

pub fn format_gpa(value: f64) -> String {
    format!("{:.2}", value)
}

/// Whole credit counts print without a fractional part
pub fn format_credits(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GpaCalculator {
    rows: Vec<GradeEntry>,
    pub current_gpa: String,
    pub current_credits: String,
    pub result: Option<GpaResult>,
}

impl Default for GpaCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl GpaCalculator {
    pub fn new() -> Self {
        Self {
            rows: vec![GradeEntry::default()],
            current_gpa: String::new(),
            current_credits: String::new(),
            result: None,
        }
    }

    pub fn rows(&self) -> &[GradeEntry] {
        &self.rows
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut GradeEntry> {
        self.rows.get_mut(index)
    }

    /// Append a fresh row and return its index
    pub fn add_row(&mut self) -> usize {
        self.rows.push(GradeEntry::default());
        self.rows.len() - 1
    }

    /// Remove a row. The last remaining row cannot be removed.
    pub fn remove_row(&mut self, index: usize) -> bool {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        true
    }

    pub fn set_grade(&mut self, index: usize, grade: Grade) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.grade = grade;
                true
            }
            None => false,
        }
    }

    /// Build the `/calculate-gpa` payload. Rows without positive credits are
    /// left out; if none remain the request is refused.
    pub fn build_request(&self) -> Result<GpaRequest, WizardError> {
        let grades: Vec<GradeSubmission> = self
            .rows
            .iter()
            .filter_map(|row| {
                let credits = row.credits_value();
                (credits > 0.0).then_some(GradeSubmission {
                    grade: row.grade,
                    credits,
                })
            })
            .collect();

        if grades.is_empty() {
            return Err(WizardError::Validation(
                "Please add at least one course with credits".to_string(),
            ));
        }

        Ok(GpaRequest {
            grades,
            current_gpa: parse_float_or_zero(&self.current_gpa),
            current_credits: parse_float_or_zero(&self.current_credits),
        })
    }
}
