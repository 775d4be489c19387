use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown vote option '{input}': expected one of option_a, option_b, option_c")]
pub struct ParseVoteOptionError {
    pub input: String,
}

impl ParseVoteOptionError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}
