pub mod backend;
pub mod controller;
pub mod controls;

pub use backend::{normalize_base_url, BackendError, HttpResultsBackend, ResultsBackend};
pub use controller::{
    ControllerEvent, FetchOutcome, PollVoteController, PollerHandle, StatusMessage, ViewState,
    VoteOutcome, DEFAULT_POLL_INTERVAL,
};
pub use controls::{VoteControl, VoteControls};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
