// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Incumbent management for branch-and-bound
//!
//! An `Incumbent` is an integer-feasible assignment together with its
//! objective and the frontier ordinal of the subtree that produced it.
//! `IncumbentStore` abstracts over where incumbents found by a search are
//! published: `NoSharedIncumbent` keeps the search standalone, while
//! `SharedIncumbent` coordinates several workers.
//!
//! Ordering
//! - A candidate beats the held incumbent if its objective is strictly
//!   better under the program's sense.
//! - On equal objectives the smaller ordinal wins. Frontier ordinals follow
//!   depth-first order, so the surviving incumbent is the one a sequential
//!   search would have found first, whatever the thread interleaving.

use convene_model::{index::VariableIndex, problem::Sense};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

/// An integer-feasible assignment found during search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incumbent {
    objective: i64,
    assignment: Vec<bool>,
    ordinal: usize,
}

impl Incumbent {
    #[inline]
    pub fn new(objective: i64, assignment: Vec<bool>, ordinal: usize) -> Self {
        Self {
            objective,
            assignment,
            ordinal,
        }
    }

    #[inline]
    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// One value per program variable.
    #[inline]
    pub fn assignment(&self) -> &[bool] {
        &self.assignment
    }

    /// Frontier ordinal of the subtree the incumbent was found in.
    #[inline]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// # Panics
    ///
    /// Panics if `variable` is out of bounds.
    #[inline]
    pub fn value(&self, variable: VariableIndex) -> bool {
        self.assignment[variable.get()]
    }
}

impl std::fmt::Display for Incumbent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Incumbent(objective: {}, ones: {}, ordinal: {})",
            self.objective,
            self.assignment.iter().filter(|v| **v).count(),
            self.ordinal
        )
    }
}

/// Where a search publishes its incumbents and reads foreign ones.
///
/// The search keeps its own best incumbent for its subtree; the store only
/// adds what other searches have found.
pub trait IncumbentStore {
    /// Returns `true` if no node of subtree `ordinal` whose bound is `bound`
    /// can yield an incumbent the store would still accept.
    fn dominates(&self, bound: i64, ordinal: usize) -> bool;

    /// Offers a new incumbent. Returns `true` if it was installed.
    fn offer(&self, candidate: &Incumbent) -> bool;
}

/// A store that shares nothing. Use this for standalone searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoSharedIncumbent;

impl IncumbentStore for NoSharedIncumbent {
    #[inline(always)]
    fn dominates(&self, _bound: i64, _ordinal: usize) -> bool {
        false
    }

    #[inline(always)]
    fn offer(&self, _candidate: &Incumbent) -> bool {
        false
    }
}

/// A concurrent holder for the best incumbent across workers.
///
/// The incumbent itself lives behind a `Mutex` and is the source of truth.
/// An `AtomicI64` mirrors its objective as a minimisation key (negated for
/// maximisation) so that most dominance checks and hopeless offers never
/// take the lock. The key only ever decreases, so a stale relaxed read is
/// merely less selective. Ties need the ordinal and are decided under the
/// lock.
#[derive(Debug)]
pub struct SharedIncumbent {
    sense: Sense,
    key_hint: AtomicI64,
    incumbent: Mutex<Option<Incumbent>>,
}

impl SharedIncumbent {
    /// Creates an empty store for a program optimised in `sense`.
    #[inline]
    pub fn new(sense: Sense) -> Self {
        Self {
            sense,
            key_hint: AtomicI64::new(i64::MAX),
            incumbent: Mutex::new(None),
        }
    }

    #[inline]
    pub fn sense(&self) -> Sense {
        self.sense
    }

    #[inline(always)]
    fn key(&self, objective: i64) -> i64 {
        match self.sense {
            Sense::Minimize => objective,
            Sense::Maximize => -objective,
        }
    }

    /// Objective of the held incumbent, read without locking.
    #[inline]
    pub fn best_objective(&self) -> Option<i64> {
        let key = self.key_hint.load(Ordering::Relaxed);
        (key != i64::MAX).then(|| self.key(key))
    }

    /// Returns a copy of the held incumbent, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Incumbent> {
        self.incumbent.lock().clone()
    }

    /// Consumes the store and returns the held incumbent.
    #[inline]
    pub fn into_inner(self) -> Option<Incumbent> {
        self.incumbent.into_inner()
    }

    /// Installs `candidate` if it beats the held incumbent.
    pub fn try_install(&self, candidate: &Incumbent) -> bool {
        let key = self.key(candidate.objective);
        if key > self.key_hint.load(Ordering::Relaxed) {
            return false;
        }

        let mut guard = self.incumbent.lock();
        // The hint may have moved while we waited; decide on the held value.
        if let Some(current) = guard.as_ref() {
            let current_key = self.key(current.objective);
            if key > current_key || (key == current_key && candidate.ordinal >= current.ordinal) {
                return false;
            }
        }

        *guard = Some(candidate.clone());
        self.key_hint.store(key, Ordering::Relaxed);
        true
    }
}

impl std::fmt::Display for SharedIncumbent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.best_objective() {
            Some(objective) => write!(f, "SharedIncumbent(objective: {})", objective),
            None => write!(f, "SharedIncumbent(empty)"),
        }
    }
}

impl IncumbentStore for SharedIncumbent {
    fn dominates(&self, bound: i64, ordinal: usize) -> bool {
        let key = self.key(bound);
        let hint = self.key_hint.load(Ordering::Relaxed);
        if key < hint {
            return false;
        }
        if key > hint {
            return true;
        }

        match self.incumbent.lock().as_ref() {
            Some(current) => {
                let current_key = self.key(current.objective);
                key > current_key || (key == current_key && current.ordinal <= ordinal)
            }
            None => false,
        }
    }

    #[inline]
    fn offer(&self, candidate: &Incumbent) -> bool {
        self.try_install(candidate)
    }
}

impl<S> IncumbentStore for &S
where
    S: IncumbentStore + ?Sized,
{
    #[inline(always)]
    fn dominates(&self, bound: i64, ordinal: usize) -> bool {
        (**self).dominates(bound, ordinal)
    }

    #[inline(always)]
    fn offer(&self, candidate: &Incumbent) -> bool {
        (**self).offer(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn incumbent(objective: i64, ordinal: usize) -> Incumbent {
        Incumbent::new(objective, vec![true, false], ordinal)
    }

    #[test]
    fn test_no_shared_incumbent_is_inert() {
        let store = NoSharedIncumbent;
        assert!(!store.dominates(i64::MIN, 0));
        assert!(!store.offer(&incumbent(1, 0)));
    }

    #[test]
    fn test_minimize_installs_strictly_better_only() {
        let shared = SharedIncumbent::new(Sense::Minimize);
        assert_eq!(shared.best_objective(), None);
        assert!(shared.snapshot().is_none());

        assert!(shared.try_install(&incumbent(5, 3)));
        assert!(!shared.try_install(&incumbent(6, 0)));
        assert!(shared.try_install(&incumbent(4, 9)));
        assert_eq!(shared.best_objective(), Some(4));
        assert_eq!(shared.snapshot().map(|i| i.ordinal()), Some(9));
    }

    #[test]
    fn test_equal_objective_prefers_smaller_ordinal() {
        let shared = SharedIncumbent::new(Sense::Minimize);
        assert!(shared.try_install(&incumbent(3, 5)));
        assert!(!shared.try_install(&incumbent(3, 5)));
        assert!(!shared.try_install(&incumbent(3, 7)));
        assert!(shared.try_install(&incumbent(3, 2)));
        assert_eq!(shared.into_inner().map(|i| i.ordinal()), Some(2));
    }

    #[test]
    fn test_maximize_keys_are_negated() {
        let shared = SharedIncumbent::new(Sense::Maximize);
        assert!(shared.try_install(&incumbent(4, 1)));
        assert!(!shared.try_install(&incumbent(3, 0)));
        assert!(shared.try_install(&incumbent(6, 1)));
        assert_eq!(shared.best_objective(), Some(6));
        assert_eq!(shared.to_string(), "SharedIncumbent(objective: 6)");
    }

    #[test]
    fn test_dominance_respects_sense_and_ordinal() {
        let shared = SharedIncumbent::new(Sense::Maximize);
        assert!(!shared.dominates(0, 0));

        shared.try_install(&incumbent(10, 4));
        // A worse or equal bound from a later subtree is dominated.
        assert!(shared.dominates(9, 0));
        assert!(shared.dominates(10, 4));
        assert!(shared.dominates(10, 6));
        // An equal bound from an earlier subtree may still win the tie.
        assert!(!shared.dominates(10, 3));
        assert!(!shared.dominates(11, 9));
    }

    #[test]
    fn test_concurrent_installs_keep_the_best() {
        let shared = Arc::new(SharedIncumbent::new(Sense::Minimize));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    for objective in (0..50).rev() {
                        shared.try_install(&incumbent(objective + t, t as usize));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let best = shared.snapshot().unwrap();
        assert_eq!(best.objective(), 0);
        assert_eq!(best.ordinal(), 0);
    }
}
