//! Bridges quiz navigation requests onto the router.
//!
//! The quiz loop runs on a tokio task and cannot touch dioxus signals, so
//! `RouteNavigator` only queues requests. The quiz view drains the queue on
//! the UI side and turns each request into a route change.

use tokio::sync::mpsc;

use services::Navigator;
use trivia_core::model::FinalScore;

use crate::routes::Route;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavRequest {
    Results(FinalScore),
    Back,
}

impl NavRequest {
    /// Route for this request. `Back` has no fixed destination.
    #[must_use]
    pub fn route(&self) -> Option<Route> {
        match self {
            Self::Results(score) => Some(Route::results_for(score)),
            Self::Back => None,
        }
    }
}

pub struct RouteNavigator {
    requests: mpsc::UnboundedSender<NavRequest>,
}

impl RouteNavigator {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NavRequest>) {
        let (requests, rx) = mpsc::unbounded_channel();
        (Self { requests }, rx)
    }

    fn send(&self, request: NavRequest) {
        // the view may already be gone; nothing left to navigate
        let _ = self.requests.send(request);
    }
}

impl Navigator for RouteNavigator {
    fn go_to_results(&self, score: FinalScore) {
        self.send(NavRequest::Results(score));
    }

    fn go_back(&self) {
        self.send(NavRequest::Back);
    }
}
