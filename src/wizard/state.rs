//! Wizard state
//!
//! Plain data owned by the controller. Nothing here talks to the backend.

use super::requirements::RequirementsForm;
use crate::api::{Answer, Course, Question, QuestionId, Recommendation, Requirements};
use std::collections::BTreeMap;

/// Current step of the advisor wizard. Steps only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Upload,
    Questions,
    Requirements,
    Recommendations,
}

impl Step {
    /// Step number (1-based)
    pub fn number(&self) -> usize {
        match self {
            Self::Upload => 1,
            Self::Questions => 2,
            Self::Requirements => 3,
            Self::Recommendations => 4,
        }
    }

    pub fn total() -> usize {
        4
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Upload => "Course Catalog",
            Self::Questions => "Your Interests",
            Self::Requirements => "Degree Requirements",
            Self::Recommendations => "Recommended Courses",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Self::Upload => "Upload a course selection PDF or start from the sample catalog",
            Self::Questions => "Pick one answer per question, then submit",
            Self::Requirements => "Blank fields fall back to their defaults",
            Self::Recommendations => "Ranked for your interests and remaining requirements",
        }
    }
}

/// Everything the advisor wizard knows. Dropped wholesale on restart.
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    pub courses: Vec<Course>,
    pub answers: Vec<Answer>,
    pub interest_scores: BTreeMap<String, f64>,
    pub requirements: Requirements,
    pub current_step: Step,

    pub questions: Vec<Question>,
    pub recommendations: Vec<Recommendation>,
    pub requirements_form: RequirementsForm,
}

impl WizardState {
    /// Insert or replace the answer for `question_id`.
    pub fn record_answer(&mut self, question_id: QuestionId, answer: impl Into<String>) {
        let answer = Answer {
            question_id,
            answer: answer.into(),
        };
        match self
            .answers
            .iter_mut()
            .find(|a| a.question_id == question_id)
        {
            Some(existing) => *existing = answer,
            None => self.answers.push(answer),
        }
    }

    /// Option currently selected for a question, if any
    pub fn selected_option(&self, question_id: QuestionId) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.question_id == question_id)
            .map(|a| a.answer.as_str())
    }

    pub fn question(&self, question_id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Recommendations paired with their 1-based position in the response.
    pub fn ranked_recommendations(&self) -> impl Iterator<Item = (usize, &Recommendation)> {
        self.recommendations
            .iter()
            .enumerate()
            .map(|(index, rec)| (index + 1, rec))
    }
}

/// Capitalise the first letter of an option for display ("yes" -> "Yes").
pub fn option_label(option: &str) -> String {
    let mut chars = option.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rec(code: &str, score: f64) -> Recommendation {
        Recommendation {
            name: format!("{} course", code),
            code: code.to_string(),
            score,
            description: None,
            reasons: Vec::new(),
            credits: None,
        }
    }

    #[test]
    fn test_record_answer_replaces_existing() {
        let mut state = WizardState::default();
        state.record_answer(0, "yes");
        state.record_answer(1, "no");
        state.record_answer(0, "no");

        assert_eq!(state.answers.len(), 2);
        assert_eq!(state.selected_option(0), Some("no"));
        assert_eq!(state.selected_option(1), Some("no"));
        // replacement keeps the original position
        assert_eq!(state.answers[0].question_id, 0);
    }

    #[test]
    fn test_selecting_one_question_leaves_others_alone() {
        let mut state = WizardState::default();
        state.record_answer(3, "theoretical");
        state.record_answer(4, "yes");
        state.record_answer(3, "practical");
        assert_eq!(state.selected_option(4), Some("yes"));
        assert_eq!(state.selected_option(5), None);
    }

    #[test]
    fn test_rank_is_position_not_score() {
        let mut state = WizardState::default();
        state.recommendations = vec![rec("ART101", 10.0), rec("CS101", 95.0), rec("MATH101", 50.0)];

        let ranked: Vec<(usize, &str)> = state
            .ranked_recommendations()
            .map(|(rank, r)| (rank, r.code.as_str()))
            .collect();
        assert_eq!(ranked, vec![(1, "ART101"), (2, "CS101"), (3, "MATH101")]);
    }

    #[test]
    fn test_format_score_one_decimal() {
        assert_eq!(format_score(45.0), "45.0");
        assert_eq!(format_score(87.46), "87.5");
        assert_eq!(format_score(0.04), "0.0");
    }

    #[test]
    fn test_option_label() {
        assert_eq!(option_label("yes"), "Yes");
        assert_eq!(option_label("theoretical"), "Theoretical");
        assert_eq!(option_label(""), "");
    }

    #[test]
    fn test_step_numbers() {
        assert_eq!(Step::Upload.number(), 1);
        assert_eq!(Step::Recommendations.number(), Step::total());
        assert_eq!(Step::default(), Step::Upload);
    }

    proptest! {
        #[test]
        fn prop_answers_unique_by_question(
            selections in prop::collection::vec((0u32..8, "[a-z]{1,8}"), 0..64)
        ) {
            let mut state = WizardState::default();
            for (question_id, option) in &selections {
                state.record_answer(*question_id, option.clone());
            }

            let mut ids: Vec<QuestionId> = state.answers.iter().map(|a| a.question_id).collect();
            let before = ids.len();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(before, ids.len());

            // last write wins
            for (question_id, _) in &selections {
                let last = selections
                    .iter()
                    .rev()
                    .find(|(q, _)| q == question_id)
                    .map(|(_, o)| o.as_str());
                prop_assert_eq!(state.selected_option(*question_id), last);
            }
        }
    }
}
