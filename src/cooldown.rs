//! Per-user command cooldowns.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use poise::serenity_prelude::UserId;

/// How many invocations a user gets per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownPolicy {
    pub window: Duration,
    pub bucket_size: u32,
}

/// One `ipinfo` lookup per user every three seconds.
pub const LOOKUP_COOLDOWN: CooldownPolicy = CooldownPolicy {
    window: Duration::from_secs(3),
    bucket_size: 1,
};

#[derive(Debug, Clone, Copy)]
struct Bucket {
    opened_at: Instant,
    used: u32,
}

/// Cooldown buckets keyed by (command, user).
///
/// The lock is held for the bookkeeping of a single check only, never across
/// an await.
#[derive(Debug)]
pub struct Cooldowns {
    policy: CooldownPolicy,
    buckets: Mutex<HashMap<(&'static str, UserId), Bucket>>,
}

impl Cooldowns {
    #[must_use]
    pub fn new(policy: CooldownPolicy) -> Self {
        Self {
            policy,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Consume one use of `command` for `user` at `now`.
    ///
    /// # Errors
    ///
    /// Returns the time left until the bucket refills when it is exhausted.
    pub fn try_acquire(
        &self,
        command: &'static str,
        user: UserId,
        now: Instant,
    ) -> Result<(), Duration> {
        let window = self.policy.window;
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);

        buckets.retain(|_, bucket| now.saturating_duration_since(bucket.opened_at) < window);

        let bucket = buckets.entry((command, user)).or_insert(Bucket {
            opened_at: now,
            used: 0,
        });

        if bucket.used >= self.policy.bucket_size {
            let elapsed = now.saturating_duration_since(bucket.opened_at);
            return Err(window.saturating_sub(elapsed));
        }

        bucket.used += 1;
        Ok(())
    }
}

impl Default for Cooldowns {
    fn default() -> Self {
        Self::new(LOOKUP_COOLDOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: UserId = UserId::new(1);
    const BOB: UserId = UserId::new(2);

    #[test]
    fn second_use_inside_window_is_rejected() {
        let cooldowns = Cooldowns::default();
        let start = Instant::now();

        assert!(cooldowns.try_acquire("ipinfo", ALICE, start).is_ok());
        let remaining = cooldowns
            .try_acquire("ipinfo", ALICE, start + Duration::from_secs(1))
            .expect_err("still cooling down");
        assert_eq!(remaining, Duration::from_secs(2));
    }

    #[test]
    fn window_elapsing_refills_the_bucket() {
        let cooldowns = Cooldowns::default();
        let start = Instant::now();

        assert!(cooldowns.try_acquire("ipinfo", ALICE, start).is_ok());
        assert!(
            cooldowns
                .try_acquire("ipinfo", ALICE, start + Duration::from_secs(3))
                .is_ok()
        );
    }

    #[test]
    fn users_and_commands_have_separate_buckets() {
        let cooldowns = Cooldowns::default();
        let now = Instant::now();

        assert!(cooldowns.try_acquire("ipinfo", ALICE, now).is_ok());
        assert!(cooldowns.try_acquire("ipinfo", BOB, now).is_ok());
        assert!(cooldowns.try_acquire("other", ALICE, now).is_ok());
        assert!(cooldowns.try_acquire("ipinfo", ALICE, now).is_err());
    }

    #[test]
    fn larger_buckets_allow_bursts() {
        let cooldowns = Cooldowns::new(CooldownPolicy {
            window: Duration::from_secs(10),
            bucket_size: 2,
        });
        let now = Instant::now();

        assert!(cooldowns.try_acquire("ipinfo", ALICE, now).is_ok());
        assert!(cooldowns.try_acquire("ipinfo", ALICE, now).is_ok());
        assert!(cooldowns.try_acquire("ipinfo", ALICE, now).is_err());
    }

    #[test]
    fn concurrent_users_do_not_block_each_other() {
        let cooldowns = std::sync::Arc::new(Cooldowns::default());
        let now = Instant::now();

        let handles: Vec<_> = (1..=8)
            .map(|id| {
                let cooldowns = cooldowns.clone();
                std::thread::spawn(move || cooldowns.try_acquire("ipinfo", UserId::new(id), now))
            })
            .collect();

        for handle in handles {
            assert!(handle.join().expect("thread").is_ok());
        }
    }
}
