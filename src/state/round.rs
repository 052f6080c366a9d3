//! Round arithmetic for the two-thirds-average game.
//!
//! Everything here is pure: callers pass in a snapshot read from the store
//! and get statistics back without touching any shared state.

use std::fmt;

use thiserror::Error;

use crate::dao::models::GuessEntity;

/// Smallest guess a participant may submit.
pub const MIN_GUESS: u8 = 0;
/// Largest guess a participant may submit.
pub const MAX_GUESS: u8 = 100;

/// A numeric guess known to lie within [`MIN_GUESS`]..=[`MAX_GUESS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Guess(u8);

/// Raised when a number falls outside the accepted guess range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("guess {0} is outside {MIN_GUESS}..={MAX_GUESS}")]
pub struct GuessOutOfRange(pub i64);

impl Guess {
    /// Raw numeric value of the guess.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Guess {
    type Error = GuessOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(MIN_GUESS)..=i64::from(MAX_GUESS)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(GuessOutOfRange(value))
        }
    }
}

impl From<Guess> for i64 {
    fn from(guess: Guess) -> Self {
        i64::from(guess.0)
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arithmetic mean of the guesses, or `None` when nothing was submitted.
pub fn mean<I>(guesses: I) -> Option<f64>
where
    I: IntoIterator<Item = Guess>,
{
    let (sum, count) = guesses
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), guess| {
            (sum + u64::from(guess.value()), count + 1)
        });

    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

/// Two thirds of the mean: the value participants are trying to hit.
pub fn target(mean: f64) -> f64 {
    (2.0 / 3.0) * mean
}

/// Entry whose guess lies closest to `target`.
///
/// Ties go to the lowest id (the earliest submission), whatever order the
/// entries arrive in.
pub fn winner(entries: &[GuessEntity], target: f64) -> Option<&GuessEntity> {
    entries.iter().min_by(|left, right| {
        distance(left, target)
            .total_cmp(&distance(right, target))
            .then_with(|| left.id.cmp(&right.id))
    })
}

fn distance(entry: &GuessEntity, target: f64) -> f64 {
    (f64::from(entry.guess.value()) - target).abs()
}

/// Aggregate outcome of a round, as shown on the result pages.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundStats {
    /// Number of recorded guesses.
    pub participants: usize,
    /// Mean of all guesses.
    pub average: f64,
    /// Two thirds of [`RoundStats::average`].
    pub target: f64,
    /// Display name of the winning entry.
    pub winner_name: String,
    /// Guess of the winning entry.
    pub winner_guess: Guess,
}

impl RoundStats {
    /// Compute statistics for a round, or `None` when the round is empty.
    pub fn compute(entries: &[GuessEntity]) -> Option<Self> {
        let average = mean(entries.iter().map(|entry| entry.guess))?;
        let target = target(average);
        let best = winner(entries, target)?;

        Some(Self {
            participants: entries.len(),
            average,
            target,
            winner_name: best.name.clone(),
            winner_guess: best.guess,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    fn entry(id: i64, name: &str, guess: i64) -> GuessEntity {
        GuessEntity {
            id,
            name: name.into(),
            guess: Guess::try_from(guess).unwrap(),
            created_at: SystemTime::UNIX_EPOCH,
        }
    }

    fn guesses(values: &[i64]) -> Vec<Guess> {
        values
            .iter()
            .map(|value| Guess::try_from(*value).unwrap())
            .collect()
    }

    #[test]
    fn guess_accepts_bounds_and_rejects_outside() {
        assert_eq!(Guess::try_from(0_i64).unwrap().value(), 0);
        assert_eq!(Guess::try_from(100_i64).unwrap().value(), 100);
        assert_eq!(Guess::try_from(-1_i64), Err(GuessOutOfRange(-1)));
        assert_eq!(Guess::try_from(101_i64), Err(GuessOutOfRange(101)));
    }

    #[test]
    fn mean_of_empty_input_is_none() {
        assert_eq!(mean(Vec::new()), None);
    }

    #[test]
    fn mean_and_target_follow_the_definition() {
        let average = mean(guesses(&[10, 50, 90])).unwrap();
        assert_eq!(average, 50.0);
        assert_eq!(target(average), (2.0 / 3.0) * 50.0);

        let average = mean(guesses(&[0, 1])).unwrap();
        assert_eq!(average, 0.5);
        assert_eq!(target(average), (2.0 / 3.0) * 0.5);
    }

    #[test]
    fn closest_guess_wins_the_reference_scenario() {
        let entries = vec![entry(1, "A", 10), entry(2, "B", 50), entry(3, "C", 90)];
        let stats = RoundStats::compute(&entries).unwrap();

        assert_eq!(stats.participants, 3);
        assert_eq!(stats.average, 50.0);
        assert!((stats.target - 33.333).abs() < 0.001);
        assert_eq!(stats.winner_name, "B");
        assert_eq!(stats.winner_guess.value(), 50);
    }

    #[test]
    fn ties_go_to_the_lowest_id_regardless_of_order() {
        // target = 2/3 * 30 = 20, both 10 and 30 are 10 away
        let entries = vec![entry(7, "late", 30), entry(3, "early", 10), entry(5, "mid", 50)];
        let best = winner(&entries, 20.0).unwrap();
        assert_eq!(best.name, "early");

        let reversed: Vec<_> = entries.into_iter().rev().collect();
        assert_eq!(winner(&reversed, 20.0).unwrap().name, "early");
    }

    #[test]
    fn winner_minimises_distance_over_every_entry() {
        let entries: Vec<_> = [3, 97, 42, 18, 66, 0, 100, 25]
            .iter()
            .enumerate()
            .map(|(idx, value)| entry(idx as i64 + 1, "p", *value))
            .collect();
        let goal = target(mean(entries.iter().map(|e| e.guess)).unwrap());
        let best = winner(&entries, goal).unwrap();

        assert!(entries.iter().any(|e| e.id == best.id));
        for other in &entries {
            assert!(distance(best, goal) <= distance(other, goal));
        }
    }

    #[test]
    fn empty_round_has_no_stats() {
        assert!(RoundStats::compute(&[]).is_none());
        assert!(winner(&[], 10.0).is_none());
    }
}
