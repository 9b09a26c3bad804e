//! Survey state machine.
//!
//! The machine performs no I/O. `next` returns a `Transition` naming the
//! request the caller must make; the caller reports the outcome back through
//! `initial_submitted`, `completion` then `commit`, or `fail`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::career::CareerRecommendation;
use crate::models::survey::{AnswerSet, Question, SurveyResult};

/// Where the survey view sends the user once the survey is complete.
pub const RECOMMENDATIONS_PATH: &str = "/api/v1/recommendations";

#[derive(Debug, Error, PartialEq)]
pub enum SurveyError {
    #[error("No survey is in progress")]
    NotStarted,

    #[error("Question '{0}' is not part of the current step")]
    UnknownQuestion(String),

    #[error("'{value}' is not an option for question '{question_id}'")]
    InvalidOption { question_id: String, value: String },

    #[error("Question '{0}' must be answered before continuing")]
    AnswerRequired(String),

    #[error("Already at the first question of this step")]
    AtFirstQuestion,

    #[error("The survey is already complete")]
    AlreadyComplete,

    #[error("Illegal survey transition: {0}")]
    IllegalTransition(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyPhase {
    Initial,
    Adaptive,
    Complete,
}

/// One phase's ordered questions, their answers, and the cursor.
#[derive(Debug, Clone)]
struct Step {
    questions: Vec<Question>,
    answers: AnswerSet,
    index: usize,
}

impl Step {
    fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            answers: AnswerSet::new(),
            index: 0,
        }
    }

    fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    fn is_last(&self) -> bool {
        self.index + 1 >= self.questions.len()
    }

    fn can_advance(&self) -> bool {
        self.current()
            .map_or(true, |q| !q.required || self.answers.contains(&q.id))
    }

    fn record(&mut self, question_id: &str, value: &str) -> Result<(), SurveyError> {
        let question = self
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| SurveyError::UnknownQuestion(question_id.to_string()))?;
        let value = value.trim();
        if !value.is_empty() && !question.accepts(value) {
            return Err(SurveyError::InvalidOption {
                question_id: question_id.to_string(),
                value: value.to_string(),
            });
        }
        self.answers.record(question_id, value);
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum State {
    Initial(Step),
    Adaptive { initial: AnswerSet, step: Step },
    Complete(SurveyResult),
}

/// The request a `next` call requires, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Moved to the next question; nothing to send.
    Moved,
    /// Submit the initial answers; report back with `initial_submitted`.
    SubmitInitial(AnswerSet),
    /// Submit the merged answers to complete the survey; report back with
    /// `completion` and `commit`.
    Complete(AnswerSet),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pending {
    Initial,
    Completion,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyView {
    pub session_id: Option<String>,
    pub phase: SurveyPhase,
    pub question: Option<Question>,
    pub answer: Option<String>,
    /// 1-based position of `question` within its phase.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub can_advance: bool,
    pub can_go_back: bool,
    pub error: Option<String>,
    pub redirect: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct SurveySession {
    session_id: Option<String>,
    state: State,
    pending: Option<Pending>,
    last_error: Option<String>,
}

impl SurveySession {
    pub fn new(session_id: Option<String>, questions: Vec<Question>) -> Self {
        Self {
            session_id,
            state: State::Initial(Step::new(questions)),
            pending: None,
            last_error: None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Adopts the id the service echoed back, if it sent one.
    pub fn adopt_session_id(&mut self, session_id: Option<String>) {
        if session_id.is_some() {
            self.session_id = session_id;
        }
    }

    pub fn phase(&self) -> SurveyPhase {
        match self.state {
            State::Initial(_) => SurveyPhase::Initial,
            State::Adaptive { .. } => SurveyPhase::Adaptive,
            State::Complete(_) => SurveyPhase::Complete,
        }
    }

    pub fn result(&self) -> Option<&SurveyResult> {
        match &self.state {
            State::Complete(result) => Some(result),
            _ => None,
        }
    }

    fn step(&self) -> Option<&Step> {
        match &self.state {
            State::Initial(step) | State::Adaptive { step, .. } => Some(step),
            State::Complete(_) => None,
        }
    }

    fn step_mut(&mut self) -> Result<&mut Step, SurveyError> {
        match &mut self.state {
            State::Initial(step) | State::Adaptive { step, .. } => Ok(step),
            State::Complete(_) => Err(SurveyError::AlreadyComplete),
        }
    }

    /// Records an answer for a question of the current phase. An empty value
    /// clears the answer.
    pub fn record_answer(&mut self, question_id: &str, value: &str) -> Result<(), SurveyError> {
        self.step_mut()?.record(question_id, value)
    }

    /// Advances past the current question. On the last question of a phase
    /// this yields the submission the caller must perform.
    ///
    /// A submission left pending by an abandoned request is superseded.
    pub fn next(&mut self) -> Result<Transition, SurveyError> {
        let step = self.step_mut()?;
        if !step.can_advance() {
            let id = step.current().map(|q| q.id.clone()).unwrap_or_default();
            return Err(SurveyError::AnswerRequired(id));
        }
        if !step.is_last() {
            step.index += 1;
            return Ok(Transition::Moved);
        }

        self.last_error = None;
        match &self.state {
            State::Initial(step) => {
                self.pending = Some(Pending::Initial);
                Ok(Transition::SubmitInitial(step.answers.clone()))
            }
            State::Adaptive { initial, step } => {
                let merged = initial.merged_with(&step.answers);
                self.pending = Some(Pending::Completion);
                Ok(Transition::Complete(merged))
            }
            State::Complete(_) => Err(SurveyError::AlreadyComplete),
        }
    }

    /// Steps back within the current phase. Never crosses back into a phase
    /// that has already been submitted.
    pub fn back(&mut self) -> Result<(), SurveyError> {
        let step = self.step_mut()?;
        if step.index == 0 {
            return Err(SurveyError::AtFirstQuestion);
        }
        step.index -= 1;
        self.pending = None;
        Ok(())
    }

    /// Outcome of a `SubmitInitial`. With no adaptive questions the survey
    /// goes straight to completion using the initial answers alone.
    pub fn initial_submitted(
        &mut self,
        adaptive_questions: Vec<Question>,
    ) -> Result<Transition, SurveyError> {
        if self.pending != Some(Pending::Initial) {
            return Err(SurveyError::IllegalTransition(
                "initial answers accepted without a pending submission",
            ));
        }
        let State::Initial(step) = &self.state else {
            return Err(SurveyError::IllegalTransition(
                "initial answers accepted outside the initial phase",
            ));
        };

        if adaptive_questions.is_empty() {
            self.pending = Some(Pending::Completion);
            return Ok(Transition::Complete(step.answers.clone()));
        }

        let initial = step.answers.clone();
        self.state = State::Adaptive {
            initial,
            step: Step::new(adaptive_questions),
        };
        self.pending = None;
        Ok(Transition::Moved)
    }

    /// Outcome of a `Complete`: the result to persist. The survey stays in
    /// its phase until [`Self::commit`].
    pub fn completion(
        &self,
        recommendations: Vec<CareerRecommendation>,
        completed_at: DateTime<Utc>,
    ) -> Result<SurveyResult, SurveyError> {
        if self.pending != Some(Pending::Completion) {
            return Err(SurveyError::IllegalTransition(
                "recommendations received without a pending completion",
            ));
        }
        let merged_answers = match &self.state {
            State::Initial(step) => step.answers.clone(),
            State::Adaptive { initial, step } => initial.merged_with(&step.answers),
            State::Complete(_) => return Err(SurveyError::AlreadyComplete),
        };

        Ok(SurveyResult {
            session_id: self.session_id.clone(),
            merged_answers,
            recommendations,
            completed_at,
        })
    }

    /// Makes the survey terminal with a result from [`Self::completion`].
    pub fn commit(&mut self, result: SurveyResult) -> Result<(), SurveyError> {
        if self.pending != Some(Pending::Completion) {
            return Err(SurveyError::IllegalTransition(
                "completion committed without a pending completion",
            ));
        }
        self.state = State::Complete(result);
        self.pending = None;
        Ok(())
    }

    /// A submission failed. The phase and every answer are kept; the user
    /// may call `next` again.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.pending = None;
        self.last_error = Some(message.into());
    }

    pub fn view(&self) -> SurveyView {
        let phase = self.phase();
        let Some(step) = self.step() else {
            return SurveyView {
                session_id: self.session_id.clone(),
                phase,
                question: None,
                answer: None,
                position: 0,
                total: 0,
                answered: self.result().map_or(0, |r| r.merged_answers.len()),
                can_advance: false,
                can_go_back: false,
                error: None,
                redirect: Some(RECOMMENDATIONS_PATH),
            };
        };

        let question = step.current().cloned();
        let answer = question
            .as_ref()
            .and_then(|q| step.answers.get(&q.id))
            .map(str::to_string);
        SurveyView {
            session_id: self.session_id.clone(),
            phase,
            position: if question.is_some() { step.index + 1 } else { 0 },
            question,
            answer,
            total: step.questions.len(),
            answered: step.answers.len(),
            can_advance: step.can_advance(),
            can_go_back: step.index > 0,
            error: self.last_error.clone(),
            redirect: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::fake::{career, choice_question, question};

    fn session(questions: Vec<Question>) -> SurveySession {
        SurveySession::new(Some("s1".to_string()), questions)
    }

    fn answer_all(session: &mut SurveySession, ids: &[&str], value: &str) {
        for id in ids {
            session.record_answer(id, value).unwrap();
            if !matches!(session.next().unwrap(), Transition::Moved) {
                return;
            }
        }
    }

    #[test]
    fn test_required_question_blocks_next() {
        let mut s = session(vec![question("q1", true), question("q2", false)]);

        assert!(!s.view().can_advance);
        assert_eq!(s.next(), Err(SurveyError::AnswerRequired("q1".to_string())));

        s.record_answer("q1", "yes").unwrap();
        assert!(s.view().can_advance);
        assert_eq!(s.next(), Ok(Transition::Moved));

        // q2 is optional
        assert!(s.view().can_advance);
    }

    #[test]
    fn test_clearing_answer_blocks_again() {
        let mut s = session(vec![question("q1", true)]);
        s.record_answer("q1", "yes").unwrap();
        s.record_answer("q1", "   ").unwrap();
        assert!(!s.view().can_advance);
    }

    #[test]
    fn test_answer_validation() {
        let mut s = session(vec![choice_question("education", &["Bachelor's", "Master's"])]);

        assert_eq!(
            s.record_answer("nope", "x"),
            Err(SurveyError::UnknownQuestion("nope".to_string()))
        );
        assert!(matches!(
            s.record_answer("education", "PhD"),
            Err(SurveyError::InvalidOption { .. })
        ));
        s.record_answer("education", "Master's").unwrap();
        assert_eq!(s.view().answer.as_deref(), Some("Master's"));
    }

    #[test]
    fn test_back_stays_within_phase() {
        let mut s = session(vec![question("q1", true), question("q2", true)]);
        assert_eq!(s.back(), Err(SurveyError::AtFirstQuestion));

        s.record_answer("q1", "a").unwrap();
        s.next().unwrap();
        assert_eq!(s.view().position, 2);
        s.back().unwrap();
        assert_eq!(s.view().position, 1);
        assert_eq!(s.view().answer.as_deref(), Some("a"));

        s.next().unwrap();
        s.record_answer("q2", "b").unwrap();
        assert!(matches!(s.next().unwrap(), Transition::SubmitInitial(_)));
        assert_eq!(
            s.initial_submitted(vec![question("adaptive_1", false)]),
            Ok(Transition::Moved)
        );

        assert_eq!(s.phase(), SurveyPhase::Adaptive);
        assert_eq!(s.back(), Err(SurveyError::AtFirstQuestion));
        assert_eq!(s.phase(), SurveyPhase::Adaptive);
    }

    #[test]
    fn test_merged_answers_prefer_adaptive() {
        let mut s = session(vec![question("q1", true), question("shared", true)]);
        answer_all(&mut s, &["q1", "shared"], "initial");
        s.initial_submitted(vec![question("shared", false), question("a1", false)])
            .unwrap();

        s.record_answer("shared", "adaptive").unwrap();
        s.next().unwrap();
        s.record_answer("a1", "extra").unwrap();
        let Transition::Complete(merged) = s.next().unwrap() else {
            panic!("expected completion");
        };

        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("q1"), Some("initial"));
        assert_eq!(merged.get("shared"), Some("adaptive"));
        assert_eq!(merged.get("a1"), Some("extra"));
    }

    #[test]
    fn test_no_adaptive_questions_skips_to_completion() {
        let mut s = session(vec![question("q1", true)]);
        s.record_answer("q1", "x").unwrap();
        let Transition::SubmitInitial(answers) = s.next().unwrap() else {
            panic!("expected initial submission");
        };

        assert_eq!(s.initial_submitted(vec![]), Ok(Transition::Complete(answers.clone())));

        let result = s
            .completion(vec![career("c1", "Career", 90.0)], Utc::now())
            .unwrap();
        s.commit(result.clone()).unwrap();
        assert_eq!(result.merged_answers, answers);
        assert_eq!(result.session_id.as_deref(), Some("s1"));
        assert_eq!(s.phase(), SurveyPhase::Complete);
        assert_eq!(s.view().redirect, Some(RECOMMENDATIONS_PATH));
    }

    #[test]
    fn test_completion_waits_for_commit() {
        let mut s = session(vec![question("q1", true)]);
        s.record_answer("q1", "x").unwrap();
        s.next().unwrap();
        s.initial_submitted(vec![]).unwrap();

        let result = s.completion(vec![], Utc::now()).unwrap();
        assert_eq!(s.phase(), SurveyPhase::Initial);

        s.commit(result.clone()).unwrap();
        assert_eq!(s.phase(), SurveyPhase::Complete);
        assert_eq!(s.result(), Some(&result));
        assert!(matches!(s.commit(result), Err(SurveyError::IllegalTransition(_))));
    }

    #[test]
    fn test_outcomes_without_pending_request_are_rejected() {
        let mut s = session(vec![question("q1", false), question("q2", false)]);

        assert!(matches!(
            s.initial_submitted(vec![]),
            Err(SurveyError::IllegalTransition(_))
        ));
        assert!(matches!(
            s.completion(vec![], Utc::now()),
            Err(SurveyError::IllegalTransition(_))
        ));

        s.next().unwrap();
        s.next().unwrap();
        // Initial submission is pending, completion is not.
        assert!(matches!(
            s.completion(vec![], Utc::now()),
            Err(SurveyError::IllegalTransition(_))
        ));
    }

    #[test]
    fn test_failure_keeps_phase_and_answers() {
        let mut s = session(vec![question("q1", true)]);
        s.record_answer("q1", "kept").unwrap();
        s.next().unwrap();

        s.fail("service unavailable");

        let view = s.view();
        assert_eq!(view.phase, SurveyPhase::Initial);
        assert_eq!(view.answer.as_deref(), Some("kept"));
        assert_eq!(view.error.as_deref(), Some("service unavailable"));
        assert!(matches!(
            s.initial_submitted(vec![]),
            Err(SurveyError::IllegalTransition(_))
        ));

        // Manual retry re-issues the same submission.
        assert!(matches!(s.next().unwrap(), Transition::SubmitInitial(_)));
        assert_eq!(s.view().error, None);
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut s = session(vec![]);
        assert!(matches!(s.next().unwrap(), Transition::SubmitInitial(_)));
        s.initial_submitted(vec![]).unwrap();
        let result = s.completion(vec![], Utc::now()).unwrap();
        s.commit(result).unwrap();

        assert_eq!(s.next(), Err(SurveyError::AlreadyComplete));
        assert_eq!(s.back(), Err(SurveyError::AlreadyComplete));
        assert_eq!(s.record_answer("q1", "x"), Err(SurveyError::AlreadyComplete));
    }
}
