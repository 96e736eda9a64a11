//! Fixed-window request limiter keyed by client address.

use std::{
  collections::HashMap,
  hash::{DefaultHasher, Hash, Hasher},
  sync::{Mutex, PoisonError},
  time::{Duration, Instant},
};

pub const HOUR: Duration = Duration::from_secs(3600);
pub const DEFAULT_SHARDS: usize = 20;
pub const DEFAULT_SHARD_CAPACITY: usize = 4096;

struct Window {
  started: Instant,
  count:   u32,
}

/// Allows `limit` requests per key within each `window`.
///
/// Keys are spread over a fixed number of independently locked shards. When a
/// shard reaches its capacity, windows that have already expired are swept
/// before a new key is added.
pub struct RateLimiter {
  limit:          u32,
  window:         Duration,
  shard_capacity: usize,
  shards:         Box<[Mutex<HashMap<String, Window>>]>,
}

impl RateLimiter {
  pub fn new(limit: u32, window: Duration, shards: usize, shard_capacity: usize) -> Self {
    Self {
      limit,
      window,
      shard_capacity,
      shards: (0..shards.max(1)).map(|_| Mutex::default()).collect(),
    }
  }

  /// `limit` requests per hour with the default shard layout.
  pub fn per_hour(limit: u32) -> Self {
    Self::new(limit, HOUR, DEFAULT_SHARDS, DEFAULT_SHARD_CAPACITY)
  }

  /// Count one request for `key`; `false` if the key is over quota.
  pub fn try_acquire(&self, key: &str) -> bool {
    let now = Instant::now();
    let mut shard = self
      .shard(key)
      .lock()
      .unwrap_or_else(PoisonError::into_inner);

    if shard.len() >= self.shard_capacity && !shard.contains_key(key) {
      shard.retain(|_, w| now.duration_since(w.started) < self.window);
    }

    let window = shard
      .entry(key.to_owned())
      .or_insert(Window { started: now, count: 0 });
    if now.duration_since(window.started) >= self.window {
      *window = Window { started: now, count: 0 };
    }
    if window.count >= self.limit {
      return false;
    }
    window.count += 1;
    true
  }

  fn shard(&self, key: &str) -> &Mutex<HashMap<String, Window>> {
    let mut h = DefaultHasher::new();
    key.hash(&mut h);
    &self.shards[(h.finish() % self.shards.len() as u64) as usize]
  }

  #[cfg(test)]
  fn tracked_keys(&self) -> usize {
    self
      .shards
      .iter()
      .map(|s| s.lock().unwrap_or_else(PoisonError::into_inner).len())
      .sum()
  }
}
