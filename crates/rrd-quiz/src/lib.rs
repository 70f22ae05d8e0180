//! Scent-finder quiz session.
//!
//! States: `Question(1)` → `Question(2)` → … → `Results`. The sequence is
//! linear; `previous` walks back one question, `reset` starts over with no
//! answers.

use rrd_api_types::{Product, QuizAnswers, QuizDimension};
use rrd_catalog::{Catalog, QuizQuestion};
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("'{value}' is not an option for {dimension:?}")]
    InvalidOption {
        dimension: QuizDimension,
        value: String,
    },
    #[error("quiz is finished; reset to answer again")]
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    /// 1-based question number.
    Question(usize),
    Results,
}

pub struct QuizSession {
    catalog: Rc<Catalog>,
    step: QuizStep,
    answers: QuizAnswers,
    recommendations: Vec<String>,
}

impl QuizSession {
    pub fn new(catalog: Rc<Catalog>) -> Self {
        Self {
            catalog,
            step: QuizStep::Question(1),
            answers: QuizAnswers::default(),
            recommendations: Vec::new(),
        }
    }

    pub fn step(&self) -> QuizStep {
        self.step
    }

    pub fn answers(&self) -> &QuizAnswers {
        &self.answers
    }

    pub fn total_steps(&self) -> usize {
        self.catalog.quiz_questions().len()
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.step {
            QuizStep::Question(n) => self.catalog.quiz_questions().get(n.checked_sub(1)?),
            QuizStep::Results => None,
        }
    }

    /// Progress bar fill, 0–100.
    pub fn progress_percent(&self) -> f64 {
        let total = self.total_steps();
        if total == 0 {
            return 100.0;
        }
        match self.step {
            QuizStep::Question(n) => n as f64 / total as f64 * 100.0,
            QuizStep::Results => 100.0,
        }
    }

    /// Record the answer for the current question without moving on.
    pub fn record(&mut self, option_id: &str) -> Result<(), QuizError> {
        let question = self.current_question().ok_or(QuizError::Finished)?;
        let dimension = question.dimension;
        if !question.options.iter().any(|o| o.id == option_id) {
            return Err(invalid(dimension, option_id));
        }

        match dimension {
            QuizDimension::Intensity => {
                self.answers.intensity =
                    Some(option_id.parse().map_err(|_| invalid(dimension, option_id))?);
            }
            QuizDimension::Occasion => {
                self.answers.occasion =
                    Some(option_id.parse().map_err(|_| invalid(dimension, option_id))?);
            }
            QuizDimension::Family => {
                self.answers.family =
                    Some(option_id.parse().map_err(|_| invalid(dimension, option_id))?);
            }
        }
        debug!(?dimension, option = option_id, "quiz answer recorded");
        Ok(())
    }

    /// Move to the next question, or to `Results` from the last one.
    pub fn advance(&mut self) -> QuizStep {
        if let QuizStep::Question(n) = self.step {
            if n < self.total_steps() {
                self.step = QuizStep::Question(n + 1);
            } else {
                self.recommendations = self
                    .catalog
                    .recommend(&self.answers)
                    .into_iter()
                    .map(|p| p.id.clone())
                    .collect();
                self.step = QuizStep::Results;
                debug!(picks = ?self.recommendations, "quiz finished");
            }
        }
        self.step
    }

    /// `record` followed by `advance`.
    pub fn answer(&mut self, option_id: &str) -> Result<QuizStep, QuizError> {
        self.record(option_id)?;
        Ok(self.advance())
    }

    /// Step back one question. Recorded answers are kept.
    pub fn previous(&mut self) -> QuizStep {
        if let QuizStep::Question(n) = self.step {
            if n > 1 {
                self.step = QuizStep::Question(n - 1);
            }
        }
        self.step
    }

    /// Manual "next" navigation; never jumps to results.
    pub fn next(&mut self) -> QuizStep {
        if let QuizStep::Question(n) = self.step {
            if n < self.total_steps() {
                self.step = QuizStep::Question(n + 1);
            }
        }
        self.step
    }

    pub fn results(&self) -> Option<Vec<&Product>> {
        match self.step {
            QuizStep::Results => Some(
                self.recommendations
                    .iter()
                    .filter_map(|id| self.catalog.product(id))
                    .collect(),
            ),
            QuizStep::Question(_) => None,
        }
    }

    pub fn reset(&mut self) {
        self.step = QuizStep::Question(1);
        self.answers = QuizAnswers::default();
        self.recommendations.clear();
    }
}

fn invalid(dimension: QuizDimension, value: &str) -> QuizError {
    QuizError::InvalidOption {
        dimension,
        value: value.to_owned(),
    }
}
