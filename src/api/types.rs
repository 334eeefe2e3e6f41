//! Wire types for the course-advisor backend.
//!
//! Response structs default every field the backend may omit, since the
//! controller only cares about a handful of them and error bodies are
//! decoded through the same types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier the backend assigns to each interest question.
pub type QuestionId = u32;

/// A course as parsed by the backend from a transcript or sample catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_course_credits")]
    pub credits: f64,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

fn default_course_credits() -> f64 {
    3.0
}

/// Response of `/upload-pdf` and `/use-sample-data`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionsResponse {
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// One selected option. The controller keeps at most one per question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: QuestionId,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswersRequest {
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswersResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub interest_scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Requirement name -> credit count, e.g. `total_credits` or `Mathematics`.
pub type Requirements = BTreeMap<String, i64>;

#[derive(Debug, Clone, Serialize)]
pub struct RequirementsRequest {
    pub requirements: Requirements,
}

/// Generic `{success, error}` acknowledgement
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub code: String,
    pub score: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub credits: Option<f64>,
}

impl Recommendation {
    /// Description, treating an empty string the same as a missing one.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Letter grades accepted by `/calculate-gpa`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Grade {
    #[default]
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "F")]
    F,
}

impl Grade {
    /// Every grade, in the order the selector shows them
    pub const ALL: [Grade; 13] = [
        Grade::APlus,
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::CMinus,
        Grade::DPlus,
        Grade::D,
        Grade::DMinus,
        Grade::F,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::DMinus => "D-",
            Grade::F => "F",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|g| g == self).unwrap_or(0)
    }

    /// Next grade down the scale, saturating at F
    pub fn lower(&self) -> Grade {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    /// Next grade up the scale, saturating at A+
    pub fn higher(&self) -> Grade {
        Self::ALL[self.index().saturating_sub(1)]
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == wanted)
            .ok_or_else(|| format!("Unknown grade: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeSubmission {
    pub grade: Grade,
    pub credits: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpaRequest {
    pub grades: Vec<GradeSubmission>,
    pub current_gpa: f64,
    pub current_credits: f64,
}

/// GPA figures. Older backends only send a combined `gpa`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GpaResult {
    #[serde(default)]
    pub semester_gpa: Option<f64>,
    #[serde(default)]
    pub cumulative_gpa: Option<f64>,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub total_credits: f64,
}

impl GpaResult {
    pub fn semester(&self) -> f64 {
        self.semester_gpa.or(self.gpa).unwrap_or_default()
    }

    pub fn cumulative(&self) -> f64 {
        self.cumulative_gpa.or(self.gpa).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GpaResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Option<GpaResult>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// A transcript file ready to be sent as the multipart `pdf` field
#[derive(Debug, Clone, PartialEq)]
pub struct PdfUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
