//! Registry of live match instances.
//!
//! Owns the map from match id to state machine. Constructed by the service
//! layer and passed by reference to whatever handles sessions; never a
//! process-wide global.
//!
//! ## Locking discipline
//!
//! Each match is a single logical actor behind its own mutex; cross-match
//! operations need no coordination. The registry's own lock is held only
//! for map operations (and, in the eviction sweeps, briefly per match).
//! Lock order is always registry before match; nothing in this crate
//! acquires the registry lock while holding a match lock.
//!
//! `get_or_create` performs lookup and insert under one lock acquisition,
//! so two concurrent first-accesses for the same id observe a single
//! instance.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::core::error::GameError;
use crate::game::state::{LudoMatch, MatchId};

/// A live match, shareable across sessions.
///
/// All mutating operations go through the mutex, giving each match the
/// per-actor exclusion the state machine assumes.
pub type SharedMatch = Arc<Mutex<LudoMatch>>;

/// Live match instances keyed by match id.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
///
/// use ludo_core::game::{LudoMatch, MatchId};
/// use ludo_core::registry::MatchRegistry;
///
/// let registry = MatchRegistry::new();
/// let id = MatchId::new("room-7");
///
/// let m = registry.get_or_create(&id, || LudoMatch::new(id.clone()));
/// assert!(registry.contains(&id));
/// assert!(Arc::ptr_eq(&m, &registry.get(&id).unwrap()));
/// ```
#[derive(Default)]
pub struct MatchRegistry {
    matches: Mutex<FxHashMap<MatchId, SharedMatch>>,
}

impl MatchRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a live match.
    #[must_use]
    pub fn get(&self, id: &MatchId) -> Option<SharedMatch> {
        self.matches.lock().unwrap().get(id).cloned()
    }

    /// Look up a live match, failing `NotFound` for unknown ids.
    pub fn require(&self, id: &MatchId) -> Result<SharedMatch, GameError> {
        self.get(id).ok_or_else(|| GameError::NotFound {
            id: id.to_string(),
        })
    }

    /// Look up a match, creating it with `init` on first access.
    ///
    /// Atomic per key: concurrent callers for the same id all receive the
    /// same instance, and `init` runs at most once.
    pub fn get_or_create<F>(&self, id: &MatchId, init: F) -> SharedMatch
    where
        F: FnOnce() -> LudoMatch,
    {
        self.matches
            .lock()
            .unwrap()
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(init())))
            .clone()
    }

    /// Evict a match, returning it if it was present.
    ///
    /// Sessions still holding the `Arc` can finish what they are doing;
    /// new lookups no longer find the match.
    pub fn remove(&self, id: &MatchId) -> Option<SharedMatch> {
        self.matches.lock().unwrap().remove(id)
    }

    /// Whether a match id is live.
    #[must_use]
    pub fn contains(&self, id: &MatchId) -> bool {
        self.matches.lock().unwrap().contains_key(id)
    }

    /// Number of live matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.lock().unwrap().len()
    }

    /// Whether no matches are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.lock().unwrap().is_empty()
    }

    /// Ids of all live matches.
    #[must_use]
    pub fn match_ids(&self) -> Vec<MatchId> {
        self.matches.lock().unwrap().keys().cloned().collect()
    }

    /// Evict every finished match. Returns how many were evicted.
    ///
    /// The session layer calls this after draining a finished match's
    /// participants.
    pub fn evict_finished(&self) -> usize {
        self.evict_where(|m| m.is_finished())
    }

    /// Evict every match idle longer than `max_idle`. Returns how many
    /// were evicted.
    ///
    /// The grace window and the sweep timer are the session layer's
    /// policy; the core only measures idleness.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        self.evict_where(|m| m.idle_for() > max_idle)
    }

    fn evict_where(&self, predicate: impl Fn(&LudoMatch) -> bool) -> usize {
        let mut matches = self.matches.lock().unwrap();
        let before = matches.len();
        matches.retain(|_, shared| !predicate(&shared.lock().unwrap()));
        before - matches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;
    use crate::core::player::{Player, PlayerId};
    use std::thread;

    fn new_match(id: &MatchId) -> LudoMatch {
        LudoMatch::with_seed(id.clone(), 5)
    }

    #[test]
    fn test_get_or_create_then_get() {
        let registry = MatchRegistry::new();
        let id = MatchId::new("a");

        assert!(registry.get(&id).is_none());
        assert!(matches!(
            registry.require(&id),
            Err(GameError::NotFound { .. })
        ));

        let created = registry.get_or_create(&id, || new_match(&id));
        let found = registry.require(&id).unwrap();
        assert!(Arc::ptr_eq(&created, &found));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_or_create_reuses_instance() {
        let registry = MatchRegistry::new();
        let id = MatchId::new("a");

        let first = registry.get_or_create(&id, || new_match(&id));
        first
            .lock()
            .unwrap()
            .add_player(Player::new(PlayerId::new(1), Color::Red, "a"))
            .unwrap();

        // The second access must observe the first caller's mutation.
        let second = registry.get_or_create(&id, || new_match(&id));
        assert_eq!(second.lock().unwrap().players().len(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_remove() {
        let registry = MatchRegistry::new();
        let id = MatchId::new("a");
        registry.get_or_create(&id, || new_match(&id));

        assert!(registry.remove(&id).is_some());
        assert!(registry.remove(&id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_first_access_creates_once() {
        let registry = Arc::new(MatchRegistry::new());
        let id = MatchId::new("contested");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let id = id.clone();
                thread::spawn(move || registry.get_or_create(&id, || new_match(&id)))
            })
            .collect();

        let instances: Vec<SharedMatch> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Every thread got the same instance.
        for instance in &instances[1..] {
            assert!(Arc::ptr_eq(&instances[0], instance));
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_mutations_are_serialized_per_match() {
        let registry = Arc::new(MatchRegistry::new());
        let id = MatchId::new("busy");
        registry.get_or_create(&id, || new_match(&id));

        // Four threads race to join the same match; the per-match lock
        // makes the outcome a clean roster of four distinct colors.
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let id = id.clone();
                thread::spawn(move || {
                    let shared = registry.require(&id).unwrap();
                    let color = Color::ALL[i as usize];
                    let mut m = shared.lock().unwrap();
                    m.add_player(Player::new(PlayerId::new(i + 1), color, "p"))
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let shared = registry.require(&id).unwrap();
        let m = shared.lock().unwrap();
        assert_eq!(m.players().len(), 4);
    }

    #[test]
    fn test_evict_finished() {
        let registry = MatchRegistry::new();
        let live = MatchId::new("live");
        let done = MatchId::new("done");

        registry.get_or_create(&live, || new_match(&live));
        let finished = registry.get_or_create(&done, || new_match(&done));

        // Drive the second match to its terminal status.
        {
            let mut m = finished.lock().unwrap();
            m.add_player(Player::new(PlayerId::new(1), Color::Red, "a"))
                .unwrap();
            m.add_player(Player::new(PlayerId::new(2), Color::Green, "b"))
                .unwrap();
            m.start().unwrap();
            let mut safety = 0usize;
            loop {
                if m.is_finished() {
                    break;
                }
                safety += 1;
                assert!(safety < 200_000, "match did not converge");
                let active = m.active_player().unwrap().id;
                let roll = m.roll_dice(active).unwrap();
                if !roll.turn_passed {
                    let mv = roll
                        .legal_moves
                        .iter()
                        .find(|mv| mv.to == m.board().finished_slot())
                        .copied()
                        .unwrap_or(roll.legal_moves[0]);
                    m.move_piece(active, mv.piece_index, roll.value).unwrap();
                }
            }
        }

        assert_eq!(registry.evict_finished(), 1);
        assert!(registry.contains(&live));
        assert!(!registry.contains(&done));
    }

    #[test]
    fn test_evict_idle() {
        let registry = MatchRegistry::new();
        let id = MatchId::new("quiet");
        registry.get_or_create(&id, || new_match(&id));

        // A generous window evicts nothing.
        assert_eq!(registry.evict_idle(Duration::from_secs(3600)), 0);

        // A zero window evicts everything not touched this instant.
        thread::sleep(Duration::from_millis(5));
        assert_eq!(registry.evict_idle(Duration::ZERO), 1);
        assert!(registry.is_empty());
    }
}
