//! Picking the next question of a quiz session.
//!
//! Selection is a pure function of the candidate questions, the ids the
//! player has already seen and a random source, so callers decide where the
//! randomness comes from.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::category_id;
use crate::db::Question;

/// Category type which, paired with the first category, means "any category".
pub const ALL_CATEGORIES_SENTINEL: &str = "click";

#[derive(Debug, PartialEq, Eq)]
pub enum Draw {
    /// Every stored question is a candidate and history is ignored.
    Everything,
    /// Only questions stored under this category key.
    Category(String),
}

/// Decides which questions a quiz draws from. `None` when the id has no store counterpart.
pub fn resolve_draw(client_id: i64, kind: Option<&str>) -> Option<Draw> {
    let store_id = category_id::to_store(client_id)?;
    if store_id == "1" && kind == Some(ALL_CATEGORIES_SENTINEL) {
        Some(Draw::Everything)
    } else {
        Some(Draw::Category(store_id))
    }
}

pub fn pick_any<'a, R: Rng + ?Sized>(questions: &'a [Question], rng: &mut R) -> Option<&'a Question> {
    questions.choose(rng)
}

/// Picks uniformly among questions whose id is not in `previous`.
///
/// Ids in `previous` that are not among `questions`, and repeated ids, are
/// ignored rather than rejected.
///
/// Once everything has been seen the first question is returned again rather
/// than nothing; `None` only comes back for an empty slice.
pub fn pick_unseen<'a, R: Rng + ?Sized>(
    questions: &'a [Question],
    previous: &[i64],
    rng: &mut R,
) -> Option<&'a Question> {
    let seen: HashSet<i64> = previous.iter().copied().collect();
    let unseen: Vec<&Question> = questions.iter().filter(|q| !seen.contains(&q.id)).collect();
    match unseen.choose(rng) {
        Some(question) => Some(*question),
        None => questions.first(),
    }
}

/// Random source shared by all quiz requests.
#[derive(Clone)]
pub struct QuizRng(Arc<Mutex<StdRng>>);

impl QuizRng {
    pub fn seeded(seed: u64) -> Self {
        Self(Arc::new(Mutex::new(StdRng::seed_from_u64(seed))))
    }

    pub fn from_entropy() -> Self {
        Self(Arc::new(Mutex::new(StdRng::from_entropy())))
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Runs `f` with exclusive access to the generator. Must not be held across an await.
    pub fn with<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}
