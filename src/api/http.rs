//! HTTP Backend
//!
//! reqwest implementation of [`Backend`]. Bodies are decoded as JSON whatever
//! the status code, because the backend reports failures as `{ "error": ... }`
//! with a 400.

use super::types::*;
use super::{ApiResult, Backend};
use crate::config::BackendConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Backend client over HTTP
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client from configuration.
    ///
    /// Only the connect phase is bounded; an in-flight request is never
    /// timed out at this layer.
    pub fn new(config: &BackendConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_idle_timeout(DEFAULT_POOL_IDLE_TIMEOUT)
            .build()?;

        Ok(Self::with_client(config.base_url.clone(), client))
    }

    /// Create with custom HTTP client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn decode<T: DeserializeOwned>(endpoint: &'static str, response: Response) -> ApiResult<T> {
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!("{} -> {} ({} bytes)", endpoint, status, body.len());

        serde_json::from_slice(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }

    async fn post_empty<T: DeserializeOwned>(&self, endpoint: &'static str) -> ApiResult<T> {
        let response = self.client.post(self.url(endpoint)).send().await?;
        Self::decode(endpoint, response).await
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn upload_pdf(&self, upload: PdfUpload) -> ApiResult<CoursesResponse> {
        tracing::info!(
            "Uploading {} ({} bytes)",
            upload.file_name,
            upload.bytes.len()
        );

        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("pdf", part);

        let response = self
            .client
            .post(self.url("/upload-pdf"))
            .multipart(form)
            .send()
            .await?;

        Self::decode("/upload-pdf", response).await
    }

    async fn use_sample_data(&self) -> ApiResult<CoursesResponse> {
        self.post_empty("/use-sample-data").await
    }

    async fn get_questions(&self) -> ApiResult<QuestionsResponse> {
        let response = self.client.get(self.url("/get-questions")).send().await?;
        Self::decode("/get-questions", response).await
    }

    async fn submit_answers(&self, answers: Vec<Answer>) -> ApiResult<AnswersResponse> {
        let response = self
            .client
            .post(self.url("/submit-answers"))
            .json(&AnswersRequest { answers })
            .send()
            .await?;

        Self::decode("/submit-answers", response).await
    }

    async fn submit_requirements(&self, requirements: Requirements) -> ApiResult<Ack> {
        let response = self
            .client
            .post(self.url("/submit-requirements"))
            .json(&RequirementsRequest { requirements })
            .send()
            .await?;

        Self::decode("/submit-requirements", response).await
    }

    async fn get_recommendations(&self) -> ApiResult<RecommendationsResponse> {
        self.post_empty("/get-recommendations").await
    }

    async fn calculate_gpa(&self, request: GpaRequest) -> ApiResult<GpaResponse> {
        let response = self
            .client
            .post(self.url("/calculate-gpa"))
            .json(&request)
            .send()
            .await?;

        Self::decode("/calculate-gpa", response).await
    }

    async fn health(&self) -> ApiResult<HealthResponse> {
        let response = self.client.get(self.url("/health")).send().await?;
        Self::decode("/health", response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn backend(server: &mockito::Server) -> HttpBackend {
        HttpBackend::with_client(server.url(), Client::new())
    }

    #[tokio::test]
    async fn test_upload_pdf_sends_multipart_pdf_field() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload-pdf")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data; boundary=.*".to_string()),
            )
            .match_body(Matcher::Regex(r#"name="pdf"; filename="transcript.pdf""#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "courses": [{"code": "CS101", "name": "Intro"}], "count": 1}"#)
            .create_async()
            .await;

        let upload = PdfUpload {
            file_name: "transcript.pdf".to_string(),
            bytes: b"%PDF-1.4 fake".to_vec(),
        };
        let resp = backend(&server).upload_pdf(upload).await.unwrap();

        mock.assert_async().await;
        assert!(resp.success);
        assert_eq!(resp.count, 1);
        assert_eq!(resp.courses[0].code, "CS101");
    }

    #[tokio::test]
    async fn test_error_body_with_400_is_decoded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/get-recommendations")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "No courses loaded. Please upload a PDF or use sample data."}"#)
            .create_async()
            .await;

        let resp = backend(&server).get_recommendations().await.unwrap();

        mock.assert_async().await;
        assert!(!resp.success);
        assert_eq!(
            resp.error.as_deref(),
            Some("No courses loaded. Please upload a PDF or use sample data.")
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/get-questions")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let result = backend(&server).get_questions().await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert!(matches!(err, ApiError::Decode { endpoint: "/get-questions", .. }));
        assert!(err.to_string().contains("/get-questions"));
    }

    #[tokio::test]
    async fn test_submit_answers_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/submit-answers")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "answers": [{"question_id": 0, "answer": "yes"}]
            })))
            .with_status(200)
            .with_body(r#"{"success": true, "interest_scores": {"Computer Science": 3}}"#)
            .create_async()
            .await;

        let answers = vec![Answer {
            question_id: 0,
            answer: "yes".to_string(),
        }];
        let resp = backend(&server).submit_answers(answers).await.unwrap();

        mock.assert_async().await;
        assert!(resp.success);
        assert_eq!(resp.interest_scores.get("Computer Science"), Some(&3.0));
    }

    #[tokio::test]
    async fn test_submit_requirements_wraps_map() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/submit-requirements")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "requirements": {"total_credits": 120, "Mathematics": 6}
            })))
            .with_status(200)
            .with_body(r#"{"success": true, "requirements": {}}"#)
            .create_async()
            .await;

        let mut requirements = Requirements::new();
        requirements.insert("total_credits".to_string(), 120);
        requirements.insert("Mathematics".to_string(), 6);
        let ack = backend(&server)
            .submit_requirements(requirements)
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(ack.success);
    }

    #[tokio::test]
    async fn test_calculate_gpa_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/calculate-gpa")
            .match_body(Matcher::Json(serde_json::json!({
                "grades": [{"grade": "A", "credits": 3.0}],
                "current_gpa": 0.0,
                "current_credits": 0.0
            })))
            .with_status(200)
            .with_body(r#"{"success": true, "result": {"gpa": 4.0, "total_credits": 3.0, "grade_points": 12.0}}"#)
            .create_async()
            .await;

        let request = GpaRequest {
            grades: vec![GradeSubmission {
                grade: Grade::A,
                credits: 3.0,
            }],
            current_gpa: 0.0,
            current_credits: 0.0,
        };
        let resp = backend(&server).calculate_gpa(request).await.unwrap();

        mock.assert_async().await;
        let result = resp.result.unwrap();
        assert_eq!(result.semester(), 4.0);
        assert_eq!(result.total_credits, 3.0);
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status": "healthy", "model": "rule-based"}"#)
            .create_async()
            .await;

        let client = HttpBackend::with_client(format!("{}/", server.url()), Client::new());
        let resp = client.health().await.unwrap();

        mock.assert_async().await;
        assert_eq!(resp.status, "healthy");
        assert_eq!(resp.model.as_deref(), Some("rule-based"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let client = HttpBackend::with_client("http://127.0.0.1:1", Client::new());
        let err = client.use_sample_data().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
