//! Application state.
//!
//! One `App` is built at startup and shared through `Rc` by every event
//! handler. Stores already carry their own interior mutability; the quiz
//! session and pending timers are the only state owned here.

use crate::api::FetchTransport;
use crate::dom::Elements;
use crate::modal::ModalController;
use crate::toast::Toast;
use gloo_timers::callback::Timeout;
use rrd_newsletter::NewsletterForm;
use rrd_quiz::QuizSession;
use rrd_storefront::Storefront;
use std::cell::RefCell;
use std::rc::Rc;

pub struct App {
    pub els: Elements,
    pub store: Storefront,
    pub quiz: RefCell<QuizSession>,
    pub newsletter: NewsletterForm<FetchTransport>,
    pub toast: Toast,
    pub modal: ModalController,
    /// Pending search re-render; replacing it cancels the previous one.
    pub search_timer: RefCell<Option<Timeout>>,
    /// Pending quiz auto-advance.
    pub quiz_timer: RefCell<Option<Timeout>>,
}

impl App {
    pub fn new(els: Elements, store: Storefront) -> Rc<Self> {
        let quiz = QuizSession::new(Rc::clone(store.catalog()));
        let newsletter = NewsletterForm::new(FetchTransport, store.config().newsletter.clone());
        Rc::new(Self {
            els,
            store,
            quiz: RefCell::new(quiz),
            newsletter,
            toast: Toast::default(),
            modal: ModalController::default(),
            search_timer: RefCell::new(None),
            quiz_timer: RefCell::new(None),
        })
    }
}
