use clap::ValueEnum;

/// Pair count and time budget for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultySetting {
    pub pairs: usize,
    pub time_budget_secs: u32,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn setting(self) -> DifficultySetting {
        match self {
            Difficulty::Easy => DifficultySetting {
                pairs: 3,
                time_budget_secs: 60,
            },
            Difficulty::Medium => DifficultySetting {
                pairs: 6,
                time_budget_secs: 90,
            },
            Difficulty::Hard => DifficultySetting {
                pairs: 9,
                time_budget_secs: 120,
            },
        }
    }

    pub fn pairs(self) -> usize {
        self.setting().pairs
    }

    pub fn time_budget_secs(self) -> u32 {
        self.setting().time_budget_secs
    }
}
