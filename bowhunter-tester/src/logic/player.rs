use std::fmt;

use bowhunter_game::Question;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Built-in simulated player profiles for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerProfile {
    /// Mostly correct, answers in good time.
    Steady,
    /// Always correct, always fast.
    Sharpshooter,
    /// Frequently wrong and slow.
    Struggling,
    /// Knows the answers but often lets the timer run out.
    Hesitant,
}

impl PlayerProfile {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Steady => "Steady",
            Self::Sharpshooter => "Sharpshooter",
            Self::Struggling => "Struggling",
            Self::Hesitant => "Hesitant",
        }
    }

    /// Probability of typing the correct answer.
    #[must_use]
    pub const fn accuracy(self) -> f64 {
        match self {
            Self::Steady => 0.85,
            Self::Sharpshooter => 1.0,
            Self::Struggling => 0.2,
            Self::Hesitant => 0.9,
        }
    }

    /// Range of the timer (as a fraction) spent before answering.
    #[must_use]
    pub const fn time_used(self) -> (f64, f64) {
        match self {
            Self::Steady => (0.1, 0.6),
            Self::Sharpshooter => (0.05, 0.2),
            Self::Struggling => (0.4, 0.9),
            Self::Hesitant => (0.3, 0.8),
        }
    }

    /// Probability of never pressing submit before the timer runs out.
    #[must_use]
    pub const fn timeout_rate(self) -> f64 {
        match self {
            Self::Steady | Self::Sharpshooter => 0.0,
            Self::Struggling => 0.1,
            Self::Hesitant => 0.5,
        }
    }
}

impl fmt::Display for PlayerProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the simulated player handles one question.
#[derive(Debug, Clone, PartialEq)]
pub enum ShotPlan {
    /// Wait `wait_fraction` of the timer, then submit `input`.
    Submit { wait_fraction: f64, input: String },
    /// Type `draft` and let the timer expire.
    Timeout { draft: String },
}

/// Deterministic stand-in for a person at the keyboard.
pub struct SimulatedPlayer {
    profile: PlayerProfile,
    rng: ChaCha20Rng,
}

impl SimulatedPlayer {
    #[must_use]
    pub fn new(profile: PlayerProfile, seed: u64) -> Self {
        Self {
            profile,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn plan_shot(&mut self, question: &Question) -> ShotPlan {
        let correct = self.rng.random_bool(self.profile.accuracy());
        let input = if correct {
            format_answer(question.answer)
        } else {
            format_answer(question.answer + 1.0)
        };
        if self.rng.random_bool(self.profile.timeout_rate()) {
            return ShotPlan::Timeout { draft: input };
        }
        let (low, high) = self.profile.time_used();
        let wait_fraction = self.rng.random_range(low..=high);
        ShotPlan::Submit {
            wait_fraction,
            input,
        }
    }
}

fn format_answer(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
