//! Backend API
//!
//! The course-advisor backend does all parsing, scoring and ranking. This
//! module only describes the endpoints the client uses, behind the `Backend`
//! trait so the controller can be driven by a mock in tests.

pub mod http;
pub mod types;

pub use http::HttpBackend;
pub use types::*;

use crate::error::ApiError;
use async_trait::async_trait;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// The endpoints the wizard controller talks to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /upload-pdf` with the transcript as multipart field `pdf`
    async fn upload_pdf(&self, upload: PdfUpload) -> ApiResult<CoursesResponse>;

    /// `POST /use-sample-data`
    async fn use_sample_data(&self) -> ApiResult<CoursesResponse>;

    /// `GET /get-questions`
    async fn get_questions(&self) -> ApiResult<QuestionsResponse>;

    /// `POST /submit-answers`
    async fn submit_answers(&self, answers: Vec<Answer>) -> ApiResult<AnswersResponse>;

    /// `POST /submit-requirements`
    async fn submit_requirements(&self, requirements: Requirements) -> ApiResult<Ack>;

    /// `POST /get-recommendations`
    async fn get_recommendations(&self) -> ApiResult<RecommendationsResponse>;

    /// `POST /calculate-gpa`
    async fn calculate_gpa(&self, request: GpaRequest) -> ApiResult<GpaResponse>;

    /// `GET /health`
    async fn health(&self) -> ApiResult<HealthResponse>;
}
