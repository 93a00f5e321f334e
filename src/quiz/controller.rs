use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::config::SubmitMode;
use crate::error::{ClientError, ClientResult};
use crate::models::{Attempt, AttemptRecord, OptionLabel, Quiz};
use crate::quiz::{AttemptSink, QuizSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Question list requested, not yet applied
    Loading,
    InProgress,
    Submitted,
    /// Load failed or returned nothing; nothing to answer. A failed load
    /// keeps its error in `load_error`.
    Empty,
}

/// Handle for one load request. Results carrying an old generation are
/// discarded so the latest request always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied(QuizPhase),
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Every attempt the backend recorded for this session, including
    /// those accepted by an earlier failed try
    Submitted { attempts: Vec<AttemptRecord> },
    /// Session was already submitted; nothing was sent
    AlreadySubmitted,
}

/// What a view needs to draw the current question
#[derive(Debug, Clone, Copy)]
pub struct QuizView<'a> {
    pub quiz: &'a Quiz,
    pub index: usize,
    pub total: usize,
    pub selected: Option<OptionLabel>,
    pub submitted: bool,
}

impl QuizView<'_> {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}

/// State machine behind the quiz-taking screen.
///
/// Tracks the ordered quiz list, the displayed index, one selected label
/// per quiz and whether the session has been submitted. Only `submit`
/// performs I/O; every other transition is local.
#[derive(Debug)]
pub struct QuizSessionController {
    phase: QuizPhase,
    quizzes: Vec<Quiz>,
    current: usize,
    answers: HashMap<i64, OptionLabel>,
    selected: Option<OptionLabel>,
    generation: u64,
    mode: SubmitMode,
    // Quiz ids the backend already accepted, so a retried submit never resends them
    sent: HashSet<i64>,
    recorded: Vec<AttemptRecord>,
    load_error: Option<ClientError>,
}

impl QuizSessionController {
    pub fn new(mode: SubmitMode) -> Self {
        Self {
            phase: QuizPhase::Loading,
            quizzes: Vec::new(),
            current: 0,
            answers: HashMap::new(),
            selected: None,
            generation: 0,
            mode,
            sent: HashSet::new(),
            recorded: Vec::new(),
            load_error: None,
        }
    }

    /// Start (or restart) a session. Any state from a previous session is
    /// dropped and loads already in flight become stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.phase = QuizPhase::Loading;
        self.quizzes.clear();
        self.current = 0;
        self.answers.clear();
        self.selected = None;
        self.sent.clear();
        self.recorded.clear();
        self.load_error = None;

        debug!(generation = self.generation, "quiz load started");
        LoadTicket {
            generation: self.generation,
        }
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, result: ClientResult<Vec<Quiz>>) -> LoadOutcome {
        if ticket.generation != self.generation {
            warn!(
                stale = ticket.generation,
                current = self.generation,
                "discarding superseded quiz load"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(quizzes) if !quizzes.is_empty() => {
                debug!(count = quizzes.len(), "quiz session ready");
                self.quizzes = quizzes;
                self.phase = QuizPhase::InProgress;
            }
            Ok(_) => {
                self.phase = QuizPhase::Empty;
            }
            Err(err) => {
                warn!(error = %err, "quiz load failed");
                self.load_error = Some(err);
                self.phase = QuizPhase::Empty;
            }
        }
        LoadOutcome::Applied(self.phase)
    }

    /// Fetch and apply the question list in one step
    pub async fn load<S>(&mut self, source: &S, topic_id: Option<i64>) -> QuizPhase
    where
        S: QuizSource + ?Sized,
    {
        let ticket = self.begin_load();
        let result = source.fetch_quizzes(topic_id).await;
        self.finish_load(ticket, result);
        self.phase
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == QuizPhase::Submitted
    }

    pub fn load_error(&self) -> Option<&ClientError> {
        self.load_error.as_ref()
    }

    /// Hand the load failure to the caller, leaving the session empty
    pub fn take_load_error(&mut self) -> Option<ClientError> {
        self.load_error.take()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    pub fn current_quiz(&self) -> Option<&Quiz> {
        self.quizzes.get(self.current)
    }

    /// Selection shown for the current question
    pub fn selected(&self) -> Option<OptionLabel> {
        self.selected
    }

    pub fn answer_for(&self, quiz_id: i64) -> Option<OptionLabel> {
        self.answers.get(&quiz_id).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn view(&self) -> Option<QuizView<'_>> {
        let quiz = self.current_quiz()?;
        Some(QuizView {
            quiz,
            index: self.current,
            total: self.quizzes.len(),
            selected: self.selected,
            submitted: self.is_submitted(),
        })
    }

    /// Record `label` for `quiz_id`, overwriting any earlier choice.
    /// Only the displayed question may be answered, and an answer the
    /// backend already recorded cannot be changed.
    pub fn select_option(&mut self, quiz_id: i64, label: OptionLabel) -> ClientResult<()> {
        if self.phase != QuizPhase::InProgress {
            return Err(ClientError::NotInProgress);
        }
        let current_id = self
            .current_quiz()
            .map(|q| q.quiz_id)
            .ok_or(ClientError::NotInProgress)?;
        if current_id != quiz_id {
            return Err(ClientError::SelectionOutOfScope { quiz_id });
        }
        if self.sent.contains(&quiz_id) && self.answers.get(&quiz_id) != Some(&label) {
            return Err(ClientError::AlreadyRecorded { quiz_id });
        }

        self.answers.insert(quiz_id, label);
        self.selected = Some(label);
        Ok(())
    }

    /// Answer whatever question is on screen
    pub fn select_current(&mut self, label: OptionLabel) -> ClientResult<()> {
        let quiz_id = self
            .current_quiz()
            .map(|q| q.quiz_id)
            .ok_or(ClientError::NotInProgress)?;
        self.select_option(quiz_id, label)
    }

    /// Move forward one question. Returns false at the last question.
    pub fn next(&mut self) -> bool {
        if !self.can_navigate() || self.current + 1 >= self.quizzes.len() {
            return false;
        }
        self.current += 1;
        self.restore_selection();
        true
    }

    /// Move back one question. Returns false at the first question.
    pub fn prev(&mut self) -> bool {
        if !self.can_navigate() || self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.restore_selection();
        true
    }

    /// Send the answers and close the session.
    ///
    /// The displayed question must have a selection, otherwise
    /// `MissingSelection` is returned before anything is sent. Which
    /// answers are sent depends on the configured `SubmitMode`. If a send
    /// fails the session stays in progress; answers the backend already
    /// accepted are not sent again on the next try. Once submitted, further
    /// calls do nothing.
    pub async fn submit<S>(&mut self, sink: &S, user_id: i64) -> ClientResult<SubmitOutcome>
    where
        S: AttemptSink + ?Sized,
    {
        match self.phase {
            QuizPhase::Submitted => return Ok(SubmitOutcome::AlreadySubmitted),
            QuizPhase::InProgress => {}
            _ => return Err(ClientError::NotInProgress),
        }

        let current_id = self
            .current_quiz()
            .map(|q| q.quiz_id)
            .ok_or(ClientError::NotInProgress)?;
        if !self.answers.contains_key(&current_id) {
            return Err(ClientError::MissingSelection);
        }

        for attempt in self.pending_attempts(user_id, current_id) {
            let record = sink.record_attempt(&attempt).await?;
            self.sent.insert(attempt.quiz_id);
            self.recorded.push(record);
        }

        self.phase = QuizPhase::Submitted;
        info!(attempts = self.recorded.len(), mode = ?self.mode, "quiz submitted");
        Ok(SubmitOutcome::Submitted {
            attempts: self.recorded.clone(),
        })
    }

    fn pending_attempts(&self, user_id: i64, current_id: i64) -> Vec<Attempt> {
        let attempt_for = |quiz_id: i64| {
            self.answers.get(&quiz_id).map(|label| Attempt {
                user_id,
                quiz_id,
                selected_answer: *label,
            })
        };

        let candidates: Vec<Attempt> = match self.mode {
            SubmitMode::AllAnswered => self
                .quizzes
                .iter()
                .filter_map(|q| attempt_for(q.quiz_id))
                .collect(),
            SubmitMode::CurrentOnly => attempt_for(current_id).into_iter().collect(),
        };

        candidates
            .into_iter()
            .filter(|a| !self.sent.contains(&a.quiz_id))
            .collect()
    }

    fn can_navigate(&self) -> bool {
        matches!(self.phase, QuizPhase::InProgress | QuizPhase::Submitted)
    }

    fn restore_selection(&mut self) {
        self.selected = self
            .current_quiz()
            .and_then(|q| self.answers.get(&q.quiz_id).copied());
    }
}
