//! State of one interview and the rules for moving through its questions.
//!
//! A [`Session`] owns the loaded questions of the selected topic together with
//! two cursor families: a flat cursor over every question, and one cursor per
//! level over that level's subset. Only the family picked by the level-checking
//! toggle moves; the other keeps its position until the mode is switched back.

pub mod cursor;

use std::collections::HashMap;

use tracing::{debug, info};

use crate::db::QuestionStore;
use crate::error::{Error, Result};
use crate::models::{Level, Outcome, Question, ResultBreakdown};

pub use cursor::{NavMode, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelShift {
    Changed(Level),
    Saturated(Level),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Started {
    New { candidate_id: i64 },
    AlreadyStarted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicLoaded {
    pub topic: String,
    pub questions: usize,
    pub starting_level: Level,
}

#[derive(Debug, Clone)]
pub struct Session {
    selected_topic: Option<String>,
    has_started: bool,
    candidate_id: Option<i64>,
    interviewee: Option<String>,
    question_index: usize,
    levels: [Level; 3],
    level_index: usize,
    ignore_level_checking: bool,
    individual_level_indexes: [usize; 3],
    questions: Vec<Question>,
    comment: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            selected_topic: None,
            has_started: false,
            candidate_id: None,
            interviewee: None,
            question_index: 0,
            levels: Level::ALL,
            level_index: 0,
            ignore_level_checking: false,
            individual_level_indexes: [0; 3],
            questions: Vec::new(),
            comment: None,
        }
    }

    pub fn selected_topic(&self) -> Option<&str> {
        self.selected_topic.as_deref()
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn candidate_id(&self) -> Option<i64> {
        self.candidate_id
    }

    pub fn interviewee(&self) -> Option<&str> {
        self.interviewee.as_deref()
    }

    pub fn current_level(&self) -> Level {
        self.levels[self.level_index]
    }

    pub fn mode(&self) -> NavMode {
        NavMode::from_ignore_level(self.ignore_level_checking)
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Loads the questions of `topic`. Cursors and the started flag are kept.
    pub fn select_topic<S: QuestionStore + ?Sized>(
        &mut self,
        store: &S,
        topic: &str,
    ) -> Result<TopicLoaded> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(Error::InvalidInput("Usage: use <topic>".to_string()));
        }

        let mut questions = store.questions_for_topic(topic)?;
        if questions.is_empty() {
            return Err(Error::UnknownTopic(topic.to_string()));
        }

        if let Some(candidate_id) = self.candidate_id {
            let answered: HashMap<i64, Outcome> = store
                .answers_for_candidate(candidate_id)?
                .into_iter()
                .map(|a| (a.question_id, a.outcome))
                .collect();
            for q in &mut questions {
                if let Some(outcome) = answered.get(&q.id) {
                    q.result = *outcome;
                }
            }
        }

        let starting_level = find_starting_level(&questions, &self.levels);
        info!(topic, questions = questions.len(), "topic selected");

        self.selected_topic = Some(topic.to_string());
        self.questions = questions;

        Ok(TopicLoaded {
            topic: topic.to_string(),
            questions: self.questions.len(),
            starting_level,
        })
    }

    /// Persists the interviewee and marks the interview as started.
    pub fn start<S: QuestionStore + ?Sized>(&mut self, store: &S, name: &str) -> Result<Started> {
        if self.has_started {
            return Ok(Started::AlreadyStarted);
        }
        self.require_topic()?;

        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }

        let candidate_id = store.create_candidate(name)?;
        info!(candidate_id, "interview started");

        self.candidate_id = Some(candidate_id);
        self.interviewee = Some(name.to_string());
        self.has_started = true;
        Ok(Started::New { candidate_id })
    }

    pub fn advance(&mut self) -> Result<Step> {
        self.require_topic()?;
        if !self.has_started {
            return Err(Error::NotStarted);
        }
        let mode = self.mode();
        let (cursor, visible) = self.cursor_and_view();
        let step = cursor::forward(cursor, visible.len());
        debug!(?mode, ?step, "advance");
        Ok(step)
    }

    pub fn retreat(&mut self) -> Result<Step> {
        self.require_topic()?;
        let mode = self.mode();
        let (cursor, visible) = self.cursor_and_view();
        let step = cursor::backward(cursor, visible.len());
        debug!(?mode, ?step, "retreat");
        Ok(step)
    }

    pub fn set_level_focus(&mut self, level: Level) -> Level {
        self.level_index = level.ordinal();
        self.current_level()
    }

    pub fn shift_level_focus(&mut self, direction: Direction) -> LevelShift {
        let next = match direction {
            Direction::Up if self.level_index + 1 < self.levels.len() => self.level_index + 1,
            Direction::Down if self.level_index > 0 => self.level_index - 1,
            _ => return LevelShift::Saturated(self.current_level()),
        };
        self.level_index = next;
        LevelShift::Changed(self.current_level())
    }

    pub fn toggle_level_filtering(&mut self) -> NavMode {
        self.ignore_level_checking = !self.ignore_level_checking;
        self.mode()
    }

    /// Comment attached to the next recorded answer only.
    pub fn set_comment(&mut self, comment: &str) {
        let comment = comment.trim();
        self.comment = if comment.is_empty() {
            None
        } else {
            Some(comment.to_string())
        };
    }

    /// The question under the active cursor. Stale cursors are clamped here.
    pub fn current_question(&mut self) -> Result<&Question> {
        let index = self.current_index()?;
        Ok(&self.questions[index])
    }

    pub fn record_answer<S: QuestionStore + ?Sized>(
        &mut self,
        store: &S,
        outcome: Outcome,
    ) -> Result<Question> {
        let candidate_id = match (self.has_started, self.candidate_id) {
            (true, Some(id)) => id,
            _ => return Err(Error::NotStarted),
        };
        let index = self.current_index()?;
        let question_id = self.questions[index].id;

        let recorded = store.record_or_update_answer(
            candidate_id,
            question_id,
            outcome,
            self.comment.as_deref(),
        )?;
        info!(candidate_id, question_id, ?outcome, ?recorded, "answer recorded");

        self.questions[index].result = outcome;
        self.comment = None;
        Ok(self.questions[index].clone())
    }

    pub fn stats<S: QuestionStore + ?Sized>(&self, store: &S) -> Result<ResultBreakdown> {
        let candidate_id = self.candidate_id.ok_or(Error::NotStarted)?;
        let counts = store.result_counts(candidate_id)?;
        Ok(ResultBreakdown::from_counts(&counts))
    }

    /// Questions navigable in the current mode, with the cursor position among them.
    pub fn visible_questions(&self) -> (Vec<&Question>, Option<usize>) {
        let visible = self.visible_indexes();
        let cursor = match self.mode() {
            NavMode::Flat => self.question_index,
            NavMode::ByLevel => self.individual_level_indexes[self.current_level().ordinal()],
        };
        let position = if visible.is_empty() {
            None
        } else {
            Some(cursor.min(visible.len() - 1))
        };
        (visible.into_iter().map(|i| &self.questions[i]).collect(), position)
    }

    pub fn level_counts(&self) -> [(Level, usize); 3] {
        self.levels.map(|lvl| {
            let count = self.questions.iter().filter(|q| q.level == lvl).count();
            (lvl, count)
        })
    }

    fn require_topic(&self) -> Result<&str> {
        self.selected_topic.as_deref().ok_or(Error::NoTopic)
    }

    fn visible_indexes(&self) -> Vec<usize> {
        match self.mode() {
            NavMode::Flat => (0..self.questions.len()).collect(),
            NavMode::ByLevel => {
                let level = self.current_level();
                self.questions
                    .iter()
                    .enumerate()
                    .filter(|(_, q)| q.level == level)
                    .map(|(i, _)| i)
                    .collect()
            }
        }
    }

    // Active cursor plus the question indexes it ranges over
    fn cursor_and_view(&mut self) -> (&mut usize, Vec<usize>) {
        let visible = self.visible_indexes();
        let cursor = match self.mode() {
            NavMode::Flat => &mut self.question_index,
            NavMode::ByLevel => {
                let ordinal = self.current_level().ordinal();
                &mut self.individual_level_indexes[ordinal]
            }
        };
        (cursor, visible)
    }

    fn current_index(&mut self) -> Result<usize> {
        self.require_topic()?;
        let level = self.current_level();
        let (cursor, visible) = self.cursor_and_view();
        let position = cursor::clamp(cursor, visible.len()).ok_or(Error::NoQuestion(level.label()))?;
        Ok(visible[position])
    }
}

/// First level in `priority` order that has at least one question.
pub fn find_starting_level(questions: &[Question], priority: &[Level]) -> Level {
    priority
        .iter()
        .copied()
        .find(|lvl| questions.iter().any(|q| q.level == *lvl))
        .unwrap_or(Level::Associate)
}
