use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseVoteOptionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOption {
    OptionA,
    OptionB,
    OptionC,
}

impl VoteOption {
    pub const ALL: [VoteOption; 3] = [VoteOption::OptionA, VoteOption::OptionB, VoteOption::OptionC];

    /// Identifier used both as the results field name and as the vote path segment.
    pub fn as_str(self) -> &'static str {
        match self {
            VoteOption::OptionA => "option_a",
            VoteOption::OptionB => "option_b",
            VoteOption::OptionC => "option_c",
        }
    }

    pub fn short_label(self) -> char {
        match self {
            VoteOption::OptionA => 'A',
            VoteOption::OptionB => 'B',
            VoteOption::OptionC => 'C',
        }
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteOption {
    type Err = ParseVoteOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "option_a" | "a" => Ok(VoteOption::OptionA),
            "option_b" | "b" => Ok(VoteOption::OptionB),
            "option_c" | "c" => Ok(VoteOption::OptionC),
            _ => Err(ParseVoteOptionError::new(s)),
        }
    }
}

/// Aggregate tally as reported by `GET /results`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultsSnapshot {
    pub option_a: u64,
    pub option_b: u64,
    pub option_c: u64,
}

impl ResultsSnapshot {
    pub fn new(option_a: u64, option_b: u64, option_c: u64) -> Self {
        Self {
            option_a,
            option_b,
            option_c,
        }
    }

    pub fn count(&self, option: VoteOption) -> u64 {
        match option {
            VoteOption::OptionA => self.option_a,
            VoteOption::OptionB => self.option_b,
            VoteOption::OptionC => self.option_c,
        }
    }

    /// Saturates at `u64::MAX`; counts come from the backend unchecked.
    pub fn total(&self) -> u64 {
        self.option_a
            .saturating_add(self.option_b)
            .saturating_add(self.option_c)
    }
}
