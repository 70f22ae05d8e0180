//! Scent-finder quiz wizard.

use crate::dom;
use crate::product_grid;
use crate::state::App;
use gloo_timers::callback::Timeout;
use rrd_quiz::QuizStep;
use std::rc::Rc;
use tracing::{debug, warn};

const AUTO_ADVANCE_MS: u32 = 800;

pub fn render(app: &App) {
    let Some(quiz) = &app.els.quiz else {
        debug!("no .quiz on this page");
        return;
    };
    let session = app.quiz.borrow();
    match session.step() {
        QuizStep::Question(n) => {
            let Some(question) = session.current_question() else {
                warn!("quiz has no question {}", n);
                return;
            };
            let total = session.total_steps();
            let options: String = question
                .options
                .iter()
                .map(|o| {
                    format!(
                        r#"<div class="quiz-option" data-value="{id}" role="button" tabindex="0"><h4>{text}</h4><p>{desc}</p></div>"#,
                        id = dom::escape(&o.id),
                        text = dom::escape(&o.text),
                        desc = dom::escape(&o.description),
                    )
                })
                .collect();
            dom::set_inner_html(
                quiz,
                &format!(
                    r#"<div class="progress"><div class="progress-fill" style="width:{pct}%"></div></div>
<div class="progress-text">Step {n} of {total}</div>
<div class="quiz-step active">
  <div class="step-header"><h3>{question}</h3></div>
  <div class="quiz-options">{options}</div>
</div>
<div class="quiz-nav">
  <button class="btn secondary prev" data-quiz-prev{prev_disabled}>Back</button>
  <button class="btn secondary next" data-quiz-next{next_disabled}>Next</button>
</div>"#,
                    pct = session.progress_percent(),
                    question = dom::escape(&question.question),
                    prev_disabled = if n <= 1 { " disabled" } else { "" },
                    next_disabled = if n >= total { " disabled" } else { "" },
                ),
            );
        }
        QuizStep::Results => {
            let picks = session.results().unwrap_or_default();
            let body = if picks.is_empty() {
                r#"<p class="muted">No exact match. Browse the full collection instead.</p>"#.to_owned()
            } else {
                format!(r#"<div class="grid">{}</div>"#, product_grid::cards_html(app, picks))
            };
            dom::set_inner_html(
                quiz,
                &format!(
                    r#"<div class="quiz-step active">
  <h3>Your Perfect Match</h3>
  <p>Based on your preferences, here are our top recommendations:</p>
  {body}
  <div class="quiz-nav">
    <button class="btn secondary" data-quiz-reset>Take Quiz Again</button>
    <a href="shop.html" class="btn">Shop All Fragrances</a>
  </div>
</div>"#
                ),
            );
        }
    }
}

/// Record the chosen option, highlight it, and move on after a short pause.
pub fn select_option(app: &Rc<App>, option_id: &str) {
    if let Err(err) = app.quiz.borrow_mut().record(option_id) {
        warn!("quiz option rejected: {}", err);
        return;
    }

    if let Some(quiz) = &app.els.quiz {
        for el in dom::query_all_within(quiz, ".quiz-option") {
            let chosen = el.get_attribute("data-value").as_deref() == Some(option_id);
            dom::toggle_class(&el, "selected", chosen);
        }
    }

    let weak = Rc::downgrade(app);
    let timer = Timeout::new(AUTO_ADVANCE_MS, move || {
        let Some(app) = weak.upgrade() else {
            return;
        };
        let step = app.quiz.borrow_mut().advance();
        if step == QuizStep::Results {
            let answers = *app.quiz.borrow().answers();
            app.store.quiz_completed(&answers);
        }
        render(&app);
    });
    app.quiz_timer.replace(Some(timer));
}

pub fn previous(app: &App) {
    app.quiz_timer.replace(None);
    app.quiz.borrow_mut().previous();
    render(app);
}

pub fn next(app: &App) {
    app.quiz_timer.replace(None);
    app.quiz.borrow_mut().next();
    render(app);
}

pub fn reset(app: &App) {
    app.quiz_timer.replace(None);
    app.quiz.borrow_mut().reset();
    render(app);
}
