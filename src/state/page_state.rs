/// Page state definitions for tracking mirror progress
///
/// Every Target URL moves through `Unseen -> InFlight -> {Saved, Failed}`.
use std::fmt;

/// Represents the current state of a URL in the mirror process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// URL has not been dispatched to a fetch
    Unseen,

    /// URL is in the Visited Set and its fetch has been initiated
    InFlight,

    // ===== Terminal States =====
    /// Body was fetched and written to disk; the URL has a local path
    Saved,

    /// Fetch, status check, body read or disk write failed
    Failed,
}

impl PageState {
    /// Returns true if `self -> next` is a legal transition
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Unseen, Self::InFlight)
                | (Self::InFlight, Self::Saved)
                | (Self::InFlight, Self::Failed)
        )
    }

    /// Short lowercase label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unseen => "unseen",
            Self::InFlight => "in_flight",
            Self::Saved => "saved",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
