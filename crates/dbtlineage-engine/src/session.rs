//! Lineage view session
//!
//! A host shows at most one lineage view at a time. Opening it again reveals
//! the existing view instead of creating a second one, and disposing it drops
//! whatever it was showing. Resolution itself stays stateless; the session
//! only decides which result is on screen.
//!
//! Requests may overlap when the user switches files quickly. Each request
//! takes a [`RequestTicket`] and only the most recently issued ticket may
//! update the view (last request wins).

use dbtlineage_core::LineageResult;

/// Handle for one in-flight lineage request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

/// State of the single lineage view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    /// No view exists
    #[default]
    Absent,

    /// A view exists, possibly with a result on it
    Open {
        focused: bool,
        result: Option<LineageResult>,
    },
}

/// What `open()` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Created,
    Revealed,
}

/// What `complete()` did with a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The view now shows the new result
    Applied,

    /// The model was not found; the view keeps its previous content
    Unchanged,

    /// A newer request was issued after this one
    Stale,

    /// No view is open
    Ignored,
}

/// Owner of the one lineage view a host may display
#[derive(Debug, Default)]
pub struct LineageSession {
    state: ViewState,
    issued: u64,
    latest: Option<RequestTicket>,
}

impl LineageSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ViewState::Open { .. })
    }

    /// Create the view, or reveal it if it already exists
    pub fn open(&mut self) -> OpenOutcome {
        match &mut self.state {
            ViewState::Open { focused, .. } => {
                *focused = true;
                OpenOutcome::Revealed
            }
            ViewState::Absent => {
                self.state = ViewState::Open {
                    focused: true,
                    result: None,
                };
                OpenOutcome::Created
            }
        }
    }

    /// Bring the view to front. Returns false when there is no view.
    pub fn focus(&mut self) -> bool {
        match &mut self.state {
            ViewState::Open { focused, .. } => {
                *focused = true;
                true
            }
            ViewState::Absent => false,
        }
    }

    /// Mark the view as in the background (another editor took focus)
    pub fn blur(&mut self) {
        if let ViewState::Open { focused, .. } = &mut self.state {
            *focused = false;
        }
    }

    /// Drop the view and forget any outstanding request
    pub fn dispose(&mut self) {
        self.state = ViewState::Absent;
        self.latest = None;
    }

    /// Start a request. Returns `None` when no view is open, since there is
    /// nothing to update.
    pub fn begin_request(&mut self) -> Option<RequestTicket> {
        if !self.is_open() {
            return None;
        }

        self.issued += 1;
        let ticket = RequestTicket(self.issued);
        self.latest = Some(ticket);
        Some(ticket)
    }

    /// Deliver the outcome of a request
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Option<LineageResult>,
    ) -> UpdateOutcome {
        let ViewState::Open { result, .. } = &mut self.state else {
            return UpdateOutcome::Ignored;
        };

        if self.latest != Some(ticket) {
            tracing::debug!(?ticket, latest = ?self.latest, "discarding stale lineage result");
            return UpdateOutcome::Stale;
        }

        match outcome {
            Some(lineage) => {
                *result = Some(lineage);
                UpdateOutcome::Applied
            }
            None => UpdateOutcome::Unchanged,
        }
    }

    /// Result currently on the view
    pub fn current(&self) -> Option<&LineageResult> {
        match &self.state {
            ViewState::Open { result, .. } => result.as_ref(),
            ViewState::Absent => None,
        }
    }

    /// Title of the view, once it shows a result
    pub fn title(&self) -> Option<String> {
        self.current().map(LineageResult::title)
    }
}
