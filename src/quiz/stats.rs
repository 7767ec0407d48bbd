use crate::quiz::Verdict;

/// Running tally for a practice session. Only cleared on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Stats {
    pub correct: u32,
    pub incorrect: u32,
    pub total: u32,
}

impl Stats {
    /// Accent errors count as incorrect.
    pub fn record(&mut self, verdict: &Verdict) {
        if verdict.is_correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.total += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Share of correct answers as a whole percentage, rounded half up.
    pub fn accuracy_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.correct * 100 + self.total / 2) / self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::answer::compare;

    #[test]
    fn counters_add_up() {
        let mut stats = Stats::default();
        let submissions = [
            ("hablo", "hablo"),
            ("hable", "hablé"),
            ("como", "hablo"),
            ("fui", "fui"),
            ("Fue", "fue"),
        ];
        for (n, (user, correct)) in submissions.iter().enumerate() {
            stats.record(&compare(user, correct));
            assert_eq!(stats.total as usize, n + 1);
            assert_eq!(stats.correct + stats.incorrect, stats.total);
        }
        assert_eq!(stats.correct, 2);
        assert_eq!(stats.incorrect, 3);
    }

    #[test]
    fn reset_clears_everything() {
        let mut stats = Stats::default();
        for _ in 0..7 {
            stats.record(&compare("hablo", "hablo"));
        }
        stats.record(&compare("x", "hablo"));
        stats.reset();
        assert_eq!(stats, Stats { correct: 0, incorrect: 0, total: 0 });
        assert_eq!(stats.accuracy_percent(), 0);
    }

    #[test]
    fn accuracy_rounds_to_nearest_percent() {
        assert_eq!(Stats::default().accuracy_percent(), 0);
        let stats = Stats { correct: 2, incorrect: 1, total: 3 };
        assert_eq!(stats.accuracy_percent(), 67);
        let stats = Stats { correct: 1, incorrect: 2, total: 3 };
        assert_eq!(stats.accuracy_percent(), 33);
        let stats = Stats { correct: 1, incorrect: 1, total: 2 };
        assert_eq!(stats.accuracy_percent(), 50);
        let stats = Stats { correct: 1, incorrect: 7, total: 8 };
        assert_eq!(stats.accuracy_percent(), 13);
    }
}
