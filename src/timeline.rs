//! Deterministic virtual clock for scheduled callbacks.
//!
//! Replaces chains of one-shot timers. Every callback is scheduled on a
//! channel and stamped with that channel's current generation. Bumping a
//! channel's generation invalidates everything still pending on it, so a
//! callback scheduled for a state the page has since left is dropped instead
//! of firing late.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
struct Scheduled<K, A> {
    at: u64,
    seq: u64,
    channel: K,
    generation: u64,
    action: A,
}

#[derive(Debug, Clone)]
pub struct Timeline<K, A> {
    now: u64,
    seq: u64,
    generations: HashMap<K, u64>,
    pending: Vec<Scheduled<K, A>>,
}

impl<K: Copy + Eq + Hash, A> Timeline<K, A> {
    pub fn new() -> Self {
        Self {
            now: 0,
            seq: 0,
            generations: HashMap::new(),
            pending: Vec::new(),
        }
    }

    /// Milliseconds since the timeline started.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn generation(&self, channel: K) -> u64 {
        self.generations.get(&channel).copied().unwrap_or(0)
    }

    /// Invalidate everything pending on `channel`. Returns the new generation.
    pub fn bump(&mut self, channel: K) -> u64 {
        let generation = self.generations.entry(channel).or_insert(0);
        *generation += 1;
        let current = *generation;
        self.pending
            .retain(|s| s.channel != channel || s.generation == current);
        current
    }

    /// Run `action` on `channel` after `delay_ms`, under the channel's
    /// current generation.
    pub fn schedule(&mut self, delay_ms: u64, channel: K, action: A) {
        self.seq += 1;
        let generation = self.generation(channel);
        self.pending.push(Scheduled {
            at: self.now.saturating_add(delay_ms),
            seq: self.seq,
            channel,
            generation,
            action,
        });
    }

    /// Number of callbacks still waiting, stale ones excluded.
    pub fn pending(&self) -> usize {
        self.pending
            .iter()
            .filter(|s| s.generation == self.generation(s.channel))
            .count()
    }

    /// Move the clock forward and return the actions that came due, in
    /// firing order. Stale actions are discarded.
    pub fn advance(&mut self, ms: u64) -> Vec<A> {
        self.now = self.now.saturating_add(ms);
        let now = self.now;
        let (mut due, rest): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|s| s.at <= now);
        self.pending = rest;
        due.sort_by_key(|s| (s.at, s.seq));
        due.into_iter()
            .filter(|s| s.generation == self.generation(s.channel))
            .map(|s| s.action)
            .collect()
    }

    /// Time of the next live callback, if any.
    pub fn next_due(&self) -> Option<u64> {
        self.pending
            .iter()
            .filter(|s| s.generation == self.generation(s.channel))
            .map(|s| s.at)
            .min()
    }
}

impl<K: Copy + Eq + Hash, A> Default for Timeline<K, A> {
    fn default() -> Self {
        Self::new()
    }
}
