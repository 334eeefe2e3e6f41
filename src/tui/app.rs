//! TUI Application State
//!
//! View-only state (cursors, the path being typed) on top of the latest
//! controller snapshot. Key presses become controller [`Action`]s; nothing
//! here mutates wizard data directly.

use super::events::keys;
use crate::api::Grade;
use crate::wizard::{Action, Edit, InputTarget, RequirementField, Snapshot, Step, Tab};
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;

/// What the event loop should do after a key press
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Nothing special
    None,
    /// Forward to the controller
    Dispatch(Action),
    /// Leave the TUI
    Quit,
}

/// Focus on the upload step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadFocus {
    #[default]
    Path,
    SampleData,
}

/// Column of a GPA row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpaColumn {
    CourseName,
    #[default]
    Grade,
    Credits,
}

impl GpaColumn {
    fn next(self) -> Self {
        match self {
            Self::CourseName => Self::Grade,
            Self::Grade => Self::Credits,
            Self::Credits => Self::CourseName,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::CourseName => Self::Credits,
            Self::Grade => Self::CourseName,
            Self::Credits => Self::Grade,
        }
    }
}

/// Focus inside the GPA calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpaFocus {
    Row { row: usize, column: GpaColumn },
    CurrentGpa,
    CurrentCredits,
}

impl Default for GpaFocus {
    fn default() -> Self {
        Self::Row {
            row: 0,
            column: GpaColumn::default(),
        }
    }
}

pub struct App {
    pub snapshot: Snapshot,
    pub loading: bool,
    pub ticks: u64,

    pub upload_path: String,
    pub upload_focus: UploadFocus,
    pub question_cursor: usize,
    pub requirement_cursor: usize,
    pub recommendation_scroll: u16,
    pub gpa_focus: GpaFocus,
    /// Row to focus once a snapshot containing it arrives
    pending_row: Option<usize>,
}

impl App {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            loading: false,
            ticks: 0,
            upload_path: String::new(),
            upload_focus: UploadFocus::default(),
            question_cursor: 0,
            requirement_cursor: 0,
            recommendation_scroll: 0,
            gpa_focus: GpaFocus::default(),
            pending_row: None,
        }
    }

    /// Take a newer controller snapshot, keeping cursors in range
    pub fn sync(&mut self, snapshot: Snapshot, loading: bool) {
        if snapshot.wizard.current_step != self.snapshot.wizard.current_step {
            self.question_cursor = 0;
            self.requirement_cursor = 0;
            self.recommendation_scroll = 0;
            if snapshot.wizard.current_step == Step::Upload {
                self.upload_path.clear();
                self.upload_focus = UploadFocus::default();
            }
        }

        let question_count = snapshot.wizard.questions.len();
        self.question_cursor = self.question_cursor.min(question_count.saturating_sub(1));

        let row_count = snapshot.gpa.rows().len();
        if let Some(row) = self.pending_row
            && row < row_count
        {
            self.gpa_focus = GpaFocus::Row {
                row,
                column: GpaColumn::CourseName,
            };
            self.pending_row = None;
        }
        if let GpaFocus::Row { ref mut row, .. } = self.gpa_focus {
            *row = (*row).min(row_count.saturating_sub(1));
        }

        self.snapshot = snapshot;
        self.loading = loading;
    }

    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    pub fn tab(&self) -> Tab {
        self.snapshot.tab
    }

    pub fn step(&self) -> Step {
        self.snapshot.wizard.current_step
    }

    pub fn focused_requirement(&self) -> RequirementField {
        RequirementField::ALL[self.requirement_cursor.min(RequirementField::ALL.len() - 1)]
    }

    /// Map a key press to what should happen next
    pub fn handle_key(&mut self, event: KeyEvent) -> AppAction {
        if keys::is_quit(&event) || keys::is_cancel(&event) {
            return AppAction::Quit;
        }

        // requests run one at a time; ignore input until the current one is done
        if self.loading {
            return AppAction::None;
        }

        if keys::is_switch_tab(&event) {
            return AppAction::Dispatch(Action::SwitchTab(self.tab().toggle()));
        }
        if keys::is_restart(&event) {
            self.pending_row = None;
            return AppAction::Dispatch(Action::Restart);
        }

        match self.tab() {
            Tab::Advisor => match self.step() {
                Step::Upload => self.handle_upload_key(event),
                Step::Questions => self.handle_questions_key(event),
                Step::Requirements => self.handle_requirements_key(event),
                Step::Recommendations => self.handle_recommendations_key(event),
            },
            Tab::Gpa => self.handle_gpa_key(event),
        }
    }

    /// Pasted text goes into whatever input has focus
    pub fn handle_paste(&mut self, text: &str) -> Vec<Action> {
        if self.loading {
            return Vec::new();
        }

        let text = text.trim_end_matches(['\n', '\r']);
        if self.tab() == Tab::Advisor && self.step() == Step::Upload {
            self.upload_focus = UploadFocus::Path;
            self.upload_path.push_str(text);
            return Vec::new();
        }

        match self.focused_input() {
            Some(target) => text
                .chars()
                .map(|c| Action::Edit {
                    target,
                    edit: Edit::Insert(c),
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Controller-owned input under the cursor, if any
    pub fn focused_input(&self) -> Option<InputTarget> {
        match self.tab() {
            Tab::Advisor if self.step() == Step::Requirements => {
                Some(InputTarget::Requirement(self.focused_requirement()))
            }
            Tab::Advisor => None,
            Tab::Gpa => match self.gpa_focus {
                GpaFocus::Row {
                    row,
                    column: GpaColumn::CourseName,
                } => Some(InputTarget::CourseName(row)),
                GpaFocus::Row {
                    row,
                    column: GpaColumn::Credits,
                } => Some(InputTarget::Credits(row)),
                GpaFocus::Row {
                    column: GpaColumn::Grade,
                    ..
                } => None,
                GpaFocus::CurrentGpa => Some(InputTarget::CurrentGpa),
                GpaFocus::CurrentCredits => Some(InputTarget::CurrentCredits),
            },
        }
    }

    fn edit_focused(&self, event: &KeyEvent) -> AppAction {
        let Some(target) = self.focused_input() else {
            return AppAction::None;
        };

        let edit = if keys::is_backspace(event) {
            Edit::Backspace
        } else if let Some(c) = keys::typed_char(event) {
            Edit::Insert(c)
        } else {
            return AppAction::None;
        };

        AppAction::Dispatch(Action::Edit { target, edit })
    }

    // --- Step-specific key handlers ---

    fn handle_upload_key(&mut self, event: KeyEvent) -> AppAction {
        if keys::is_next_field(&event)
            || keys::is_prev_field(&event)
            || keys::is_up(&event)
            || keys::is_down(&event)
        {
            self.upload_focus = match self.upload_focus {
                UploadFocus::Path => UploadFocus::SampleData,
                UploadFocus::SampleData => UploadFocus::Path,
            };
            return AppAction::None;
        }

        match self.upload_focus {
            UploadFocus::Path => {
                if keys::is_enter(&event) {
                    let path = self.upload_path.trim();
                    if path.is_empty() {
                        return AppAction::None;
                    }
                    return AppAction::Dispatch(Action::UploadFile(PathBuf::from(path)));
                }
                if keys::is_backspace(&event) {
                    self.upload_path.pop();
                } else if let Some(c) = keys::typed_char(&event) {
                    self.upload_path.push(c);
                }
                AppAction::None
            }
            UploadFocus::SampleData => {
                if keys::is_enter(&event) {
                    AppAction::Dispatch(Action::UseSampleData)
                } else {
                    AppAction::None
                }
            }
        }
    }

    fn handle_questions_key(&mut self, event: KeyEvent) -> AppAction {
        let questions = &self.snapshot.wizard.questions;
        if questions.is_empty() {
            return AppAction::None;
        }

        if keys::is_up(&event) || keys::is_prev_field(&event) {
            self.question_cursor = self.question_cursor.saturating_sub(1);
            return AppAction::None;
        }
        if keys::is_down(&event) || keys::is_next_field(&event) {
            self.question_cursor = (self.question_cursor + 1).min(questions.len() - 1);
            return AppAction::None;
        }
        if keys::is_enter(&event) {
            return AppAction::Dispatch(Action::SubmitAnswers);
        }

        let question = &questions[self.question_cursor];
        let current = self
            .snapshot
            .wizard
            .selected_option(question.id)
            .and_then(|selected| question.options.iter().position(|o| o == selected));

        let choice = match event.code {
            KeyCode::Left => Some(current.map_or(0, |i| i.saturating_sub(1))),
            KeyCode::Right => Some(current.map_or(0, |i| (i + 1).min(question.options.len() - 1))),
            KeyCode::Char(c) => c
                .to_digit(10)
                .and_then(|d| (d as usize).checked_sub(1))
                .filter(|i| *i < question.options.len()),
            _ => None,
        };

        match choice.and_then(|i| question.options.get(i)) {
            Some(option) => AppAction::Dispatch(Action::SelectOption {
                question_id: question.id,
                option: option.clone(),
            }),
            None => AppAction::None,
        }
    }

    fn handle_requirements_key(&mut self, event: KeyEvent) -> AppAction {
        let count = RequirementField::ALL.len();
        if keys::is_up(&event) || keys::is_prev_field(&event) {
            self.requirement_cursor = (self.requirement_cursor + count - 1) % count;
            return AppAction::None;
        }
        if keys::is_down(&event) || keys::is_next_field(&event) {
            self.requirement_cursor = (self.requirement_cursor + 1) % count;
            return AppAction::None;
        }
        if keys::is_enter(&event) {
            return AppAction::Dispatch(Action::SubmitRequirements);
        }
        self.edit_focused(&event)
    }

    fn handle_recommendations_key(&mut self, event: KeyEvent) -> AppAction {
        if keys::is_up(&event) {
            self.recommendation_scroll = self.recommendation_scroll.saturating_sub(1);
        } else if keys::is_down(&event) {
            self.recommendation_scroll = self.recommendation_scroll.saturating_add(1);
        } else if keys::is_enter(&event) {
            return AppAction::Dispatch(Action::Restart);
        }
        AppAction::None
    }

    fn handle_gpa_key(&mut self, event: KeyEvent) -> AppAction {
        let row_count = self.snapshot.gpa.rows().len();

        if keys::is_add_row(&event) {
            self.pending_row = Some(row_count);
            return AppAction::Dispatch(Action::AddGradeRow);
        }
        if keys::is_remove_row(&event) {
            return match self.gpa_focus {
                GpaFocus::Row { row, .. } => AppAction::Dispatch(Action::RemoveGradeRow(row)),
                _ => AppAction::None,
            };
        }
        if keys::is_enter(&event) {
            return AppAction::Dispatch(Action::CalculateGpa);
        }

        if keys::is_up(&event) {
            self.gpa_focus = match self.gpa_focus {
                GpaFocus::Row { row, column } => GpaFocus::Row {
                    row: row.saturating_sub(1),
                    column,
                },
                GpaFocus::CurrentGpa => GpaFocus::Row {
                    row: row_count.saturating_sub(1),
                    column: GpaColumn::default(),
                },
                GpaFocus::CurrentCredits => GpaFocus::CurrentGpa,
            };
            return AppAction::None;
        }
        if keys::is_down(&event) {
            self.gpa_focus = match self.gpa_focus {
                GpaFocus::Row { row, column } if row + 1 < row_count => GpaFocus::Row {
                    row: row + 1,
                    column,
                },
                GpaFocus::Row { .. } => GpaFocus::CurrentGpa,
                GpaFocus::CurrentGpa | GpaFocus::CurrentCredits => GpaFocus::CurrentCredits,
            };
            return AppAction::None;
        }
        if keys::is_next_field(&event) || keys::is_prev_field(&event) {
            let forward = keys::is_next_field(&event);
            self.gpa_focus = match self.gpa_focus {
                GpaFocus::Row { row, column } => GpaFocus::Row {
                    row,
                    column: if forward { column.next() } else { column.prev() },
                },
                GpaFocus::CurrentGpa => GpaFocus::CurrentCredits,
                GpaFocus::CurrentCredits => GpaFocus::CurrentGpa,
            };
            return AppAction::None;
        }

        if let GpaFocus::Row {
            row,
            column: GpaColumn::Grade,
        } = self.gpa_focus
        {
            let Some(entry) = self.snapshot.gpa.rows().get(row) else {
                return AppAction::None;
            };
            let grade = match event.code {
                KeyCode::Left | KeyCode::Char('+') => entry.grade.higher(),
                KeyCode::Right | KeyCode::Char('-') => entry.grade.lower(),
                KeyCode::Char(c) => match c.to_string().parse::<Grade>() {
                    Ok(grade) => grade,
                    Err(_) => return AppAction::None,
                },
                _ => return AppAction::None,
            };
            return AppAction::Dispatch(Action::SetGrade { row, grade });
        }

        self.edit_focused(&event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Question;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app_at(step: Step) -> App {
        let mut snapshot = Snapshot::default();
        snapshot.wizard.current_step = step;
        snapshot.wizard.questions = vec![
            Question {
                id: 0,
                question: "Do you enjoy working with computers and technology?".to_string(),
                options: vec!["yes".to_string(), "no".to_string()],
            },
            Question {
                id: 1,
                question: "Do you prefer theoretical or practical learning?".to_string(),
                options: vec!["theoretical".to_string(), "practical".to_string()],
            },
        ];
        App::new(snapshot)
    }

    #[test]
    fn test_upload_path_typing_and_submit() {
        let mut app = app_at(Step::Upload);
        for c in "cs.pdf".chars() {
            assert_eq!(app.handle_key(key(KeyCode::Char(c))), AppAction::None);
        }
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Char('f')));

        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            AppAction::Dispatch(Action::UploadFile(PathBuf::from("cs.pdf")))
        );
    }

    #[test]
    fn test_upload_empty_path_does_nothing() {
        let mut app = app_at(Step::Upload);
        assert_eq!(app.handle_key(key(KeyCode::Enter)), AppAction::None);
    }

    #[test]
    fn test_sample_data_button() {
        let mut app = app_at(Step::Upload);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.upload_focus, UploadFocus::SampleData);
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            AppAction::Dispatch(Action::UseSampleData)
        );
    }

    #[test]
    fn test_paste_fills_upload_path() {
        let mut app = app_at(Step::Upload);
        assert!(app.handle_paste("/tmp/transcript.pdf\n").is_empty());
        assert_eq!(app.upload_path, "/tmp/transcript.pdf");
    }

    #[test]
    fn test_question_option_by_number_and_arrow() {
        let mut app = app_at(Step::Questions);
        assert_eq!(
            app.handle_key(key(KeyCode::Char('2'))),
            AppAction::Dispatch(Action::SelectOption {
                question_id: 0,
                option: "no".to_string()
            })
        );

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.question_cursor, 1);
        assert_eq!(
            app.handle_key(key(KeyCode::Right)),
            AppAction::Dispatch(Action::SelectOption {
                question_id: 1,
                option: "theoretical".to_string()
            })
        );
        assert_eq!(app.handle_key(key(KeyCode::Char('9'))), AppAction::None);
    }

    #[test]
    fn test_enter_submits_answers() {
        let mut app = app_at(Step::Questions);
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            AppAction::Dispatch(Action::SubmitAnswers)
        );
    }

    #[test]
    fn test_requirements_typing_targets_focused_field() {
        let mut app = app_at(Step::Requirements);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(
            app.handle_key(key(KeyCode::Char('6'))),
            AppAction::Dispatch(Action::Edit {
                target: InputTarget::Requirement(RequirementField::CompletedCredits),
                edit: Edit::Insert('6'),
            })
        );

        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.focused_requirement(), RequirementField::Art);
    }

    #[test]
    fn test_loading_blocks_input_but_not_quit() {
        let mut app = app_at(Step::Questions);
        app.loading = true;
        assert_eq!(app.handle_key(key(KeyCode::Enter)), AppAction::None);
        assert_eq!(app.handle_key(ctrl('c')), AppAction::Quit);
    }

    #[test]
    fn test_switch_tab_and_restart() {
        let mut app = app_at(Step::Recommendations);
        assert_eq!(
            app.handle_key(key(KeyCode::F(2))),
            AppAction::Dispatch(Action::SwitchTab(Tab::Gpa))
        );
        assert_eq!(app.handle_key(ctrl('r')), AppAction::Dispatch(Action::Restart));
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            AppAction::Dispatch(Action::Restart)
        );
    }

    #[test]
    fn test_gpa_grade_column_steps_grades() {
        let mut app = app_at(Step::Upload);
        app.snapshot.tab = Tab::Gpa;

        assert_eq!(
            app.handle_key(key(KeyCode::Right)),
            AppAction::Dispatch(Action::SetGrade {
                row: 0,
                grade: Grade::A
            })
        );
        assert_eq!(
            app.handle_key(key(KeyCode::Char('b'))),
            AppAction::Dispatch(Action::SetGrade {
                row: 0,
                grade: Grade::B
            })
        );
    }

    #[test]
    fn test_gpa_credits_and_prior_fields() {
        let mut app = app_at(Step::Upload);
        app.snapshot.tab = Tab::Gpa;

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(
            app.handle_key(key(KeyCode::Backspace)),
            AppAction::Dispatch(Action::Edit {
                target: InputTarget::Credits(0),
                edit: Edit::Backspace,
            })
        );

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.gpa_focus, GpaFocus::CurrentGpa);
        assert_eq!(
            app.handle_paste("3.4"),
            vec![
                Action::Edit { target: InputTarget::CurrentGpa, edit: Edit::Insert('3') },
                Action::Edit { target: InputTarget::CurrentGpa, edit: Edit::Insert('.') },
                Action::Edit { target: InputTarget::CurrentGpa, edit: Edit::Insert('4') },
            ]
        );
        assert_eq!(app.handle_key(ctrl('d')), AppAction::None);
    }

    #[test]
    fn test_gpa_rows_add_remove_and_calculate() {
        let mut app = app_at(Step::Upload);
        app.snapshot.tab = Tab::Gpa;

        assert_eq!(app.handle_key(ctrl('n')), AppAction::Dispatch(Action::AddGradeRow));

        // the loop redraws before the controller has added the row
        let stale = app.snapshot.clone();
        app.sync(stale, false);
        assert_eq!(
            app.gpa_focus,
            GpaFocus::Row {
                row: 0,
                column: GpaColumn::Grade
            }
        );

        let mut added = app.snapshot.clone();
        added.gpa.add_row();
        app.sync(added.clone(), false);
        assert_eq!(
            app.gpa_focus,
            GpaFocus::Row {
                row: 1,
                column: GpaColumn::CourseName
            }
        );

        // applied once; later syncs leave the cursor where the user moves it
        app.handle_key(key(KeyCode::Up));
        app.sync(added, false);
        assert_eq!(
            app.gpa_focus,
            GpaFocus::Row {
                row: 0,
                column: GpaColumn::CourseName
            }
        );

        assert_eq!(
            app.handle_key(ctrl('d')),
            AppAction::Dispatch(Action::RemoveGradeRow(0))
        );
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            AppAction::Dispatch(Action::CalculateGpa)
        );
    }

    #[test]
    fn test_sync_resets_cursors_on_step_change() {
        let mut app = app_at(Step::Questions);
        app.question_cursor = 1;

        let mut next = app.snapshot.clone();
        next.wizard.current_step = Step::Requirements;
        app.sync(next, true);

        assert_eq!(app.question_cursor, 0);
        assert!(app.loading);
    }
}
