use shared::domain::VoteOption;

use crate::controller::{PollVoteController, VoteOutcome};

/// A vote trigger permanently bound to one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteControl {
    key: char,
    option: VoteOption,
}

impl VoteControl {
    pub const fn new(key: char, option: VoteOption) -> Self {
        Self { key, option }
    }

    pub fn key(&self) -> char {
        self.key
    }

    pub fn option(&self) -> VoteOption {
        self.option
    }

    pub fn label(&self) -> String {
        format!("[{}] Vote {}", self.key, self.option.short_label())
    }

    pub async fn trigger(&self, controller: &PollVoteController) -> VoteOutcome {
        controller.cast_vote(self.option).await
    }
}

#[derive(Debug, Clone)]
pub struct VoteControls {
    controls: [VoteControl; 3],
}

impl Default for VoteControls {
    fn default() -> Self {
        Self {
            controls: [
                VoteControl::new('a', VoteOption::OptionA),
                VoteControl::new('b', VoteOption::OptionB),
                VoteControl::new('c', VoteOption::OptionC),
            ],
        }
    }
}

impl VoteControls {
    pub fn iter(&self) -> impl Iterator<Item = &VoteControl> {
        self.controls.iter()
    }

    /// Matches a control by its key or by its 1-based position.
    pub fn find(&self, input: &str) -> Option<&VoteControl> {
        let mut chars = input.trim().chars();
        let first = chars.next()?.to_ascii_lowercase();
        if chars.next().is_some() {
            return None;
        }
        if let Some(position) = first.to_digit(10) {
            return self
                .controls
                .get((position as usize).checked_sub(1)?);
        }
        self.controls.iter().find(|control| control.key == first)
    }
}
