use rand::seq::SliceRandom;
use rand::Rng;

use crate::quiz::{Category, RoundState, Subject, VerbEntry};

/// Picks the next verb and subject to drill.
///
/// Only verbs of `category` are considered. The verb shown last round is left
/// out of the draw whenever another verb of that category exists. Returns
/// `None` when the category has no verbs at all.
pub fn select_next_round<'a, R: Rng + ?Sized>(
    verbs: &'a [VerbEntry],
    category: Category,
    previous_infinitive: Option<&str>,
    rng: &mut R,
) -> Option<(&'a VerbEntry, Subject)> {
    let filtered = verbs
        .iter()
        .filter(|v| v.category == category)
        .collect::<Vec<_>>();

    let pool = match previous_infinitive {
        Some(previous) if filtered.len() > 1 => filtered
            .iter()
            .copied()
            .filter(|v| v.infinitive != previous)
            .collect::<Vec<_>>(),
        _ => filtered,
    };

    let verb = *pool.choose(rng)?;
    let subject = *Subject::ALL.choose(rng)?;
    Some((verb, subject))
}

impl RoundState {
    /// Starts the round that follows `previous` (or the first one).
    pub fn next<R: Rng + ?Sized>(
        verbs: &[VerbEntry],
        category: Category,
        previous: Option<&str>,
        rng: &mut R,
    ) -> Option<Self> {
        let (verb, subject) = select_next_round(verbs, category, previous, rng)?;
        Some(RoundState::new(
            verb.clone(),
            subject,
            previous.map(str::to_string),
        ))
    }
}
