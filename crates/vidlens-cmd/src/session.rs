//! Analysis session state machine.
//!
//! A session shows at most one analysis at a time. Each submission gets a
//! fresh [`Ticket`]; completions carrying an older ticket are ignored, so a
//! slow earlier request can never overwrite a newer one.

use std::time::{Duration, Instant};

use crate::report::Report;

/// Identifies one submission. Later submissions get greater tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// What the session currently shows.
#[derive(Debug, Default)]
pub enum SessionState {
    /// Nothing submitted yet, or reset.
    #[default]
    Idle,
    /// Waiting for the service.
    Loading {
        /// Submission being waited on.
        ticket: Ticket,
        /// Submitted video URL.
        url: String,
        /// When the submission was made.
        started: Instant,
    },
    /// The analysis arrived.
    Ready {
        /// Submission that produced the report.
        ticket: Ticket,
        /// The report.
        report: Box<Report>,
    },
    /// The request failed.
    Failed {
        /// Submission that failed.
        ticket: Ticket,
        /// Submitted video URL.
        url: String,
        /// Error message.
        reason: String,
    },
}

/// Submission state for `analyze`.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    last_ticket: u64,
}

impl Session {
    /// Create an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Start a submission for `url`, dropping whatever was shown before.
    pub fn submit(&mut self, url: impl Into<String>) -> Ticket {
        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);
        let url = url.into();
        tracing::debug!(ticket = ticket.0, %url, "submission started");
        self.state = SessionState::Loading {
            ticket,
            url,
            started: Instant::now(),
        };
        ticket
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        matches!(self.state, SessionState::Loading { ticket: current, .. } if current == ticket)
    }

    /// Show `report` if `ticket` is the submission being waited on.
    /// Returns whether the report was accepted.
    pub fn resolve(&mut self, ticket: Ticket, report: Report) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "ignoring stale result");
            return false;
        }
        self.state = SessionState::Ready {
            ticket,
            report: Box::new(report),
        };
        true
    }

    /// Record a failure if `ticket` is the submission being waited on.
    /// Returns whether the failure was accepted.
    pub fn fail(&mut self, ticket: Ticket, reason: impl Into<String>) -> bool {
        let url = match &self.state {
            SessionState::Loading {
                ticket: current,
                url,
                ..
            } if *current == ticket => url.clone(),
            _ => {
                tracing::debug!(ticket = ticket.0, "ignoring stale failure");
                return false;
            }
        };
        self.state = SessionState::Failed {
            ticket,
            url,
            reason: reason.into(),
        };
        true
    }

    /// Return to [`SessionState::Idle`].
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Time since the pending submission started.
    pub fn elapsed(&self) -> Option<Duration> {
        match self.state {
            SessionState::Loading { started, .. } => Some(started.elapsed()),
            _ => None,
        }
    }

    /// Whether a submission is pending.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading { .. })
    }

    /// The report on display, if any.
    pub fn report(&self) -> Option<&Report> {
        match &self.state {
            SessionState::Ready { report, .. } => Some(report.as_ref()),
            _ => None,
        }
    }

    /// The failure message on display, if any.
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
