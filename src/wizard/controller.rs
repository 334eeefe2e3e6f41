//! Wizard controller
//!
//! Owns the advisor wizard, the GPA calculator, the status line and the
//! loading indicator. Frontends send [`Action`]s; the controller handles them
//! one at a time, so a request chain always completes before the next action
//! is looked at.

use super::feedback::{LoadingIndicator, StatusKind, StatusLine, StatusMessage};
use super::gpa::GpaCalculator;
use super::requirements::RequirementField;
use super::state::{Step, WizardState};
use crate::api::{Backend, Course, Grade, PdfUpload, QuestionId};
use crate::config::UiConfig;
use crate::error::{ApiError, Result, WizardError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Top-level view: the wizard or the GPA calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Advisor,
    Gpa,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Advisor => "Course Advisor",
            Self::Gpa => "GPA Calculator",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Advisor => Self::Gpa,
            Self::Gpa => Self::Advisor,
        }
    }
}

/// Text inputs owned by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    Requirement(RequirementField),
    CourseName(usize),
    Credits(usize),
    CurrentGpa,
    CurrentCredits,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Insert(char),
    Backspace,
    Clear,
    Replace(String),
}

impl Edit {
    fn apply(self, input: &mut String) {
        match self {
            Edit::Insert(c) => input.push(c),
            Edit::Backspace => {
                input.pop();
            }
            Edit::Clear => input.clear(),
            Edit::Replace(value) => *input = value,
        }
    }
}

/// Everything a frontend can ask the controller to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    UploadFile(PathBuf),
    UseSampleData,
    SelectOption {
        question_id: QuestionId,
        option: String,
    },
    SubmitAnswers,
    Edit {
        target: InputTarget,
        edit: Edit,
    },
    SubmitRequirements,
    Restart,
    SwitchTab(Tab),
    AddGradeRow,
    RemoveGradeRow(usize),
    SetGrade {
        row: usize,
        grade: Grade,
    },
    CalculateGpa,
    ExpireStatus,
}

impl Action {
    /// The wizard step this action belongs to, if it is step-bound
    pub fn required_step(&self) -> Option<Step> {
        match self {
            Action::UploadFile(_) | Action::UseSampleData => Some(Step::Upload),
            Action::SelectOption { .. } | Action::SubmitAnswers => Some(Step::Questions),
            Action::SubmitRequirements => Some(Step::Requirements),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Action::UploadFile(_) => "upload_file",
            Action::UseSampleData => "use_sample_data",
            Action::SelectOption { .. } => "select_option",
            Action::SubmitAnswers => "submit_answers",
            Action::Edit { .. } => "edit",
            Action::SubmitRequirements => "submit_requirements",
            Action::Restart => "restart",
            Action::SwitchTab(_) => "switch_tab",
            Action::AddGradeRow => "add_grade_row",
            Action::RemoveGradeRow(_) => "remove_grade_row",
            Action::SetGrade { .. } => "set_grade",
            Action::CalculateGpa => "calculate_gpa",
            Action::ExpireStatus => "expire_status",
        }
    }
}

/// What a frontend needs to draw the current state
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub wizard: WizardState,
    pub gpa: GpaCalculator,
    pub tab: Tab,
    pub status: Option<StatusMessage>,
}

/// Channels to a controller running on its own task
pub struct ControllerHandle {
    pub actions: mpsc::UnboundedSender<Action>,
    pub snapshots: watch::Receiver<Snapshot>,
    pub loading: watch::Receiver<usize>,
    pub task: JoinHandle<()>,
}

pub struct Controller {
    backend: Arc<dyn Backend>,
    ui: UiConfig,
    wizard: WizardState,
    gpa: GpaCalculator,
    tab: Tab,
    status: StatusLine,
    loading: LoadingIndicator,
    notifier: Option<watch::Sender<Snapshot>>,
}

impl Controller {
    pub fn new(backend: Arc<dyn Backend>, ui: UiConfig) -> Self {
        let status = StatusLine::new(ui.status_timeout());
        Self {
            backend,
            ui,
            wizard: WizardState::default(),
            gpa: GpaCalculator::new(),
            tab: Tab::default(),
            status,
            loading: LoadingIndicator::new(),
            notifier: None,
        }
    }

    /// Publish a snapshot on `tx` after every change
    pub fn with_notifier(mut self, tx: watch::Sender<Snapshot>) -> Self {
        self.notifier = Some(tx);
        self
    }

    pub fn wizard(&self) -> &WizardState {
        &self.wizard
    }

    pub fn gpa(&self) -> &GpaCalculator {
        &self.gpa
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.current()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_active()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            wizard: self.wizard.clone(),
            gpa: self.gpa.clone(),
            tab: self.tab,
            status: self.status.current().cloned(),
        }
    }

    fn publish(&self) {
        if let Some(ref tx) = self.notifier {
            tx.send_replace(self.snapshot());
        }
    }

    fn show_success(&mut self, text: impl Into<String>) {
        self.status.show(text, StatusKind::Success, Instant::now());
        self.publish();
    }

    /// Handle one action. Errors are also shown on the status line.
    pub async fn dispatch(&mut self, action: Action) -> Result<()> {
        tracing::debug!("Dispatching {}", action.name());

        if let Some(step) = action.required_step() {
            if self.wizard.current_step != step {
                tracing::debug!(
                    "Ignoring {} on the {:?} step",
                    action.name(),
                    self.wizard.current_step
                );
                return Ok(());
            }
        }

        let outcome = match action {
            Action::UploadFile(path) => self.upload_file(&path).await,
            Action::UseSampleData => self.use_sample_data().await,
            Action::SelectOption {
                question_id,
                option,
            } => self.select_option(question_id, option),
            Action::SubmitAnswers => self.submit_answers().await,
            Action::Edit { target, edit } => {
                self.edit_input(target, edit);
                Ok(())
            }
            Action::SubmitRequirements => self.submit_requirements().await,
            Action::Restart => {
                self.restart();
                Ok(())
            }
            Action::SwitchTab(tab) => {
                self.tab = tab;
                Ok(())
            }
            Action::AddGradeRow => {
                self.gpa.add_row();
                Ok(())
            }
            Action::RemoveGradeRow(row) => {
                if !self.gpa.remove_row(row) {
                    tracing::debug!("Kept grade row {}", row);
                }
                Ok(())
            }
            Action::SetGrade { row, grade } => {
                self.gpa.set_grade(row, grade);
                Ok(())
            }
            Action::CalculateGpa => self.calculate_gpa().await,
            Action::ExpireStatus => {
                self.status.expire(Instant::now());
                Ok(())
            }
        };

        if let Err(ref err) = outcome {
            self.status
                .show(err.to_string(), StatusKind::Error, Instant::now());
        }
        self.publish();
        outcome
    }

    async fn upload_file(&mut self, path: &Path) -> Result<()> {
        let upload = read_pdf(path).await?;

        let response = {
            let _loading = self.loading.begin();
            self.backend.upload_pdf(upload).await
        }
        .map_err(|e| WizardError::transport("Error uploading file: ", &e))?;

        if !response.success {
            return Err(WizardError::Backend(
                response
                    .error
                    .unwrap_or_else(|| "Failed to parse PDF".to_string()),
            ));
        }

        let message = format!("Successfully loaded {} courses!", response.count);
        self.courses_loaded(response.courses, message).await
    }

    async fn use_sample_data(&mut self) -> Result<()> {
        let response = {
            let _loading = self.loading.begin();
            self.backend.use_sample_data().await
        }
        .map_err(|e| WizardError::transport("Error: ", &e))?;

        if !response.success {
            return Err(WizardError::Backend("Failed to load sample data".to_string()));
        }

        let message = format!("Loaded {} sample courses!", response.count);
        self.courses_loaded(response.courses, message).await
    }

    /// Store the catalog, let the success message sit for the transition
    /// delay, then move on to the questions.
    async fn courses_loaded(&mut self, courses: Vec<Course>, message: String) -> Result<()> {
        self.wizard.courses = courses;
        self.show_success(message);

        tokio::time::sleep(self.ui.transition_delay()).await;
        self.load_questions().await
    }

    async fn load_questions(&mut self) -> Result<()> {
        let response = {
            let _loading = self.loading.begin();
            self.backend.get_questions().await
        }
        .map_err(|e| WizardError::transport("Error loading questions: ", &e))?;

        tracing::info!("Fetched {} questions", response.questions.len());
        self.wizard.questions = response.questions;
        self.wizard.current_step = Step::Questions;
        Ok(())
    }

    fn select_option(&mut self, question_id: QuestionId, option: String) -> Result<()> {
        let question = self.wizard.question(question_id).ok_or_else(|| {
            WizardError::Validation(format!("Unknown question: {}", question_id))
        })?;

        if !question.options.iter().any(|o| *o == option) {
            return Err(WizardError::Validation(format!(
                "Unknown option '{}' for question {}",
                option, question_id
            )));
        }

        self.wizard.record_answer(question_id, option);
        Ok(())
    }

    async fn submit_answers(&mut self) -> Result<()> {
        if self.wizard.answers.is_empty() {
            return Err(WizardError::Validation(
                "Please answer at least one question".to_string(),
            ));
        }

        let response = {
            let _loading = self.loading.begin();
            self.backend.submit_answers(self.wizard.answers.clone()).await
        }
        .map_err(|e| WizardError::transport("Error: ", &e))?;

        if !response.success {
            return Err(WizardError::Backend("Failed to process answers".to_string()));
        }

        self.wizard.interest_scores = response.interest_scores;
        self.wizard.current_step = Step::Requirements;
        Ok(())
    }

    async fn submit_requirements(&mut self) -> Result<()> {
        let requirements = self.wizard.requirements_form.to_requirements();

        let _loading = self.loading.begin();

        // only an unreachable backend stops the chain here
        match self.backend.submit_requirements(requirements.clone()).await {
            Ok(ack) if !ack.success => tracing::warn!(
                "Requirements were not accepted ({}), requesting recommendations anyway",
                ack.error.as_deref().unwrap_or("no reason given")
            ),
            Ok(_) => {}
            Err(err @ ApiError::Decode { .. }) => tracing::warn!(
                "Ignoring unreadable requirements reply, requesting recommendations anyway: {}",
                err
            ),
            Err(err) => return Err(WizardError::transport("Error: ", &err)),
        }

        let response = self
            .backend
            .get_recommendations()
            .await
            .map_err(|e| WizardError::transport("Error: ", &e))?;

        if !response.success {
            return Err(WizardError::Backend(
                response
                    .error
                    .unwrap_or_else(|| "Failed to get recommendations".to_string()),
            ));
        }

        tracing::info!("Received {} recommendations", response.recommendations.len());
        self.wizard.requirements = requirements;
        self.wizard.recommendations = response.recommendations;
        self.wizard.current_step = Step::Recommendations;
        Ok(())
    }

    fn edit_input(&mut self, target: InputTarget, edit: Edit) {
        let input = match target {
            InputTarget::Requirement(field) => self.wizard.requirements_form.input_mut(field),
            InputTarget::CourseName(row) => match self.gpa.row_mut(row) {
                Some(entry) => &mut entry.course_name,
                None => return,
            },
            InputTarget::Credits(row) => match self.gpa.row_mut(row) {
                Some(entry) => &mut entry.credits,
                None => return,
            },
            InputTarget::CurrentGpa => &mut self.gpa.current_gpa,
            InputTarget::CurrentCredits => &mut self.gpa.current_credits,
        };
        edit.apply(input);
    }

    async fn calculate_gpa(&mut self) -> Result<()> {
        let request = self.gpa.build_request()?;

        let response = {
            let _loading = self.loading.begin();
            self.backend.calculate_gpa(request).await
        }
        .map_err(|e| WizardError::transport("Error: ", &e))?;

        match response.result {
            Some(result) if response.success => {
                self.gpa.result = Some(result);
                Ok(())
            }
            _ => Err(WizardError::Backend("Failed to calculate GPA".to_string())),
        }
    }

    fn restart(&mut self) {
        tracing::info!("Restarting wizard");
        self.wizard = WizardState::default();
        self.gpa = GpaCalculator::new();
        self.tab = Tab::default();
        self.status.clear();
    }

    /// Process actions until every sender is gone, clearing the status line
    /// when its time is up.
    pub async fn run(mut self, mut actions: mpsc::UnboundedReceiver<Action>) {
        self.publish();

        loop {
            let deadline = self.status.deadline();
            tokio::select! {
                action = actions.recv() => match action {
                    Some(action) => {
                        if let Err(e) = self.dispatch(action).await {
                            tracing::debug!("Action failed: {}", e);
                        }
                    }
                    None => break,
                },
                _ = wait_until(deadline) => {
                    let _ = self.dispatch(Action::ExpireStatus).await;
                }
            }
        }

        tracing::debug!("Controller stopped");
    }

    /// Move the controller onto its own task
    pub fn spawn(mut self) -> ControllerHandle {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(self.snapshot());
        let loading = self.loading.subscribe();
        self.notifier = Some(snapshot_tx);

        ControllerHandle {
            actions: action_tx,
            snapshots: snapshot_rx,
            loading,
            task: tokio::spawn(self.run(action_rx)),
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Read a transcript from disk. Accepts a `.pdf` name or PDF magic bytes.
async fn read_pdf(path: &Path) -> Result<PdfUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| WizardError::unreadable_file(path, &err))?;

    let pdf_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !pdf_extension && !bytes.starts_with(PDF_MAGIC) {
        return Err(WizardError::Validation("Please upload a PDF file".to_string()));
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("transcript.pdf")
        .to_string();

    Ok(PdfUpload { file_name, bytes })
}
