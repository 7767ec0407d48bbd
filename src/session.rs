use rand::Rng;

use crate::quiz::answer::compare;
use crate::quiz::stats::Stats;
use crate::quiz::{Category, RoundState, Tense, Verdict, VerbEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Settings {
    pub tense: Tense,
    pub category: Category,
}

/// What survives a change of settings: the tally, the verb last shown and
/// how many rounds have been started in this chat.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Progress {
    pub stats: Stats,
    pub last_verb: Option<String>,
    pub rounds_started: u64,
}

/// One chat's practice session with a round on screen.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Session {
    pub settings: Settings,
    pub stats: Stats,
    pub round: RoundState,
    /// Increases with every round; late replies for older rounds are dropped.
    pub round_number: u64,
}

impl Session {
    /// Returns `None` if the chosen category has no verbs.
    pub fn start<R: Rng + ?Sized>(
        verbs: &[VerbEntry],
        settings: Settings,
        progress: Progress,
        rng: &mut R,
    ) -> Option<Self> {
        let round = RoundState::next(
            verbs,
            settings.category,
            progress.last_verb.as_deref(),
            rng,
        )?;
        Some(Self {
            settings,
            stats: progress.stats,
            round,
            round_number: progress.rounds_started + 1,
        })
    }

    pub fn progress(&self) -> Progress {
        Progress {
            stats: self.stats,
            last_verb: Some(self.round.verb.infinitive.clone()),
            rounds_started: self.round_number,
        }
    }

    pub fn next_round<R: Rng + ?Sized>(&self, verbs: &[VerbEntry], rng: &mut R) -> Option<Self> {
        Self::start(verbs, self.settings, self.progress(), rng)
    }

    pub fn correct_answer(&self) -> &str {
        self.round.correct_answer(self.settings.tense)
    }

    /// Judges the answer and folds the verdict into the stats.
    pub fn submit(&mut self, answer: &str) -> Verdict {
        let verdict = compare(answer, self.correct_answer());
        self.stats.record(&verdict);
        verdict
    }
}
