//! Degree requirement inputs
//!
//! Free-text fields that become the integer map sent to
//! `/submit-requirements`. A field that is blank, non-numeric or zero falls
//! back to its default.

use crate::api::Requirements;

/// One requirement input on the requirements step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementField {
    TotalCredits,
    CompletedCredits,
    ComputerScience,
    Mathematics,
    English,
    Physics,
    History,
    Art,
}

impl RequirementField {
    pub const ALL: [RequirementField; 8] = [
        Self::TotalCredits,
        Self::CompletedCredits,
        Self::ComputerScience,
        Self::Mathematics,
        Self::English,
        Self::Physics,
        Self::History,
        Self::Art,
    ];

    /// Key in the requirements map
    pub fn key(&self) -> &'static str {
        match self {
            Self::TotalCredits => "total_credits",
            Self::CompletedCredits => "completed_credits",
            Self::ComputerScience => "Computer Science",
            Self::Mathematics => "Mathematics",
            Self::English => "English",
            Self::Physics => "Physics",
            Self::History => "History",
            Self::Art => "Art",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::TotalCredits => "Total credits required",
            Self::CompletedCredits => "Credits completed",
            Self::ComputerScience => "Computer Science credits",
            Self::Mathematics => "Mathematics credits",
            Self::English => "English credits",
            Self::Physics => "Physics credits",
            Self::History => "History credits",
            Self::Art => "Art credits",
        }
    }

    pub fn default_value(&self) -> i64 {
        match self {
            Self::TotalCredits => 120,
            _ => 0,
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    /// Look up a field by map key or a loose spelling of it
    /// (`computer_science`, `cs`, `total`).
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key.trim().to_lowercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|f| f.key().to_lowercase().replace('_', " ") == normalized)
            .or(match normalized.as_str() {
                "total" => Some(Self::TotalCredits),
                "completed" => Some(Self::CompletedCredits),
                "cs" => Some(Self::ComputerScience),
                "math" => Some(Self::Mathematics),
                _ => None,
            })
    }
}

/// Leading-integer parse: optional whitespace, optional sign, then digits.
/// Trailing garbage is ignored ("12abc" -> 12). `None` if no digit leads.
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits
        .bytes()
        .try_fold(0i64, |acc, d| acc.checked_mul(10)?.checked_add(i64::from(d - b'0')))
        .unwrap_or(i64::MAX);

    Some(if negative { -magnitude } else { magnitude })
}

/// Parse an integer input, substituting `default` when nothing usable (or a
/// zero) was entered.
pub fn parse_with_default(input: &str, default: i64) -> i64 {
    match parse_int_prefix(input) {
        Some(value) if value != 0 => value,
        _ => default,
    }
}

/// Raw text of every requirement input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementsForm {
    inputs: [String; 8],
}

impl RequirementsForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: RequirementField) -> &str {
        &self.inputs[field.index()]
    }

    pub fn set(&mut self, field: RequirementField, value: impl Into<String>) {
        self.inputs[field.index()] = value.into();
    }

    pub fn input_mut(&mut self, field: RequirementField) -> &mut String {
        &mut self.inputs[field.index()]
    }

    /// Resolved value for one field
    pub fn value(&self, field: RequirementField) -> i64 {
        parse_with_default(self.get(field), field.default_value())
    }

    /// Build the map sent to the backend. Every field is present.
    pub fn to_requirements(&self) -> Requirements {
        RequirementField::ALL
            .into_iter()
            .map(|field| (field.key().to_string(), self.value(field)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 120, 120)]
    #[case("   ", 120, 120)]
    #[case("abc", 120, 120)]
    #[case("0", 120, 120)]
    #[case("96", 120, 96)]
    #[case("  45", 0, 45)]
    #[case("12abc", 0, 12)]
    #[case("7.9", 0, 7)]
    #[case("-3", 0, -3)]
    #[case("+8", 0, 8)]
    #[case("-", 5, 5)]
    #[case("0x10", 0, 0)]
    fn test_parse_with_default(#[case] input: &str, #[case] default: i64, #[case] expected: i64) {
        assert_eq!(parse_with_default(input, default), expected);
    }

    #[test]
    fn test_parse_int_prefix_overflow_saturates() {
        assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_blank_form_uses_defaults() {
        let requirements = RequirementsForm::new().to_requirements();

        assert_eq!(requirements.len(), RequirementField::ALL.len());
        assert_eq!(requirements["total_credits"], 120);
        assert_eq!(requirements["completed_credits"], 0);
        assert_eq!(requirements["Computer Science"], 0);
        assert_eq!(requirements["Art"], 0);
    }

    #[test]
    fn test_filled_form() {
        let mut form = RequirementsForm::new();
        form.set(RequirementField::TotalCredits, "128");
        form.set(RequirementField::CompletedCredits, "60");
        form.input_mut(RequirementField::Mathematics).push_str("9");
        form.set(RequirementField::English, "zero");

        let requirements = form.to_requirements();
        assert_eq!(requirements["total_credits"], 128);
        assert_eq!(requirements["completed_credits"], 60);
        assert_eq!(requirements["Mathematics"], 9);
        assert_eq!(requirements["English"], 0);
    }

    #[rstest]
    #[case("total_credits", Some(RequirementField::TotalCredits))]
    #[case("Computer Science", Some(RequirementField::ComputerScience))]
    #[case("computer_science", Some(RequirementField::ComputerScience))]
    #[case("cs", Some(RequirementField::ComputerScience))]
    #[case("math", Some(RequirementField::Mathematics))]
    #[case("ART", Some(RequirementField::Art))]
    #[case("chemistry", None)]
    fn test_from_key(#[case] key: &str, #[case] expected: Option<RequirementField>) {
        assert_eq!(RequirementField::from_key(key), expected);
    }
}
