//! The retry driver: runs the user closure, retries on conflict, backs off
//! under contention.
//!
//! `atomically` is the only entry point here. Everything else in this
//! module is the tunable policy it runs under.

use std::sync::Arc;
use std::time::Duration;

use jsonstm_core::error::{Result, StmError};
use jsonstm_core::limits::Limits;
use jsonstm_core::traits::Storage;

use crate::transaction::TransactionContext;
use crate::validation::{commit, CommitOutcome};

/// Tunables for the retry driver.
///
/// Matches the defaults of the reference engine: up to 1000 attempts, with
/// a sleep inserted every 10th retry, capped at 100ms and growing
/// exponentially with the attempt count up to that cap.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts allowed before giving up with `MaxRetriesExceeded`.
    pub max_attempts: u32,
    /// Insert a backoff sleep every this many retries.
    pub backoff_every: u32,
    /// Upper bound on the backoff sleep, in milliseconds.
    pub backoff_cap_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 1000,
            backoff_every: 10,
            backoff_cap_ms: 100,
        }
    }
}

impl RetryPolicy {
    /// The backoff duration for a given 1-indexed attempt count, or `None`
    /// if this attempt does not fall on a backoff boundary.
    fn backoff_for(&self, attempts: u32) -> Option<Duration> {
        if self.backoff_every == 0 || attempts % self.backoff_every != 0 {
            return None;
        }
        let exp = attempts / self.backoff_every;
        let millis = (1u64 << exp.min(32)).min(self.backoff_cap_ms);
        Some(Duration::from_millis(millis))
    }
}

/// Run `f` to completion against `store`, retrying until it commits or
/// `policy.max_attempts` is exhausted.
///
/// A fresh [`TransactionContext`] is created for every attempt. If `f`
/// returns `Err` at all, that error propagates immediately without
/// retrying and without committing, regardless of variant — this is how a
/// user closure aborts a transaction (see
/// [`jsonstm_core::error::user_error`] for wrapping an arbitrary closure
/// error as `StmError::UserError`). Retries are driven entirely by the
/// commit protocol: a `CommitOutcome::Conflict` from [`commit`] re-runs `f`
/// against a fresh context, subject to `policy`'s backoff and attempt
/// ceiling.
pub fn atomically<F, T>(
    store: &Arc<dyn Storage>,
    policy: &RetryPolicy,
    limits: &Limits,
    mut f: F,
) -> Result<T>
where
    F: FnMut(&mut TransactionContext) -> Result<T>,
{
    let mut attempts: u32 = 0;

    loop {
        let mut ctx = TransactionContext::new(Arc::clone(store));
        let result = f(&mut ctx)?;

        match commit(&ctx, store.as_ref(), limits)? {
            CommitOutcome::Committed => {
                tracing::trace!(attempts, "transaction committed");
                return Ok(result);
            }
            CommitOutcome::Conflict => {
                attempts += 1;
                if attempts >= policy.max_attempts {
                    tracing::debug!(attempts, "retry ceiling reached");
                    return Err(StmError::MaxRetriesExceeded { attempts });
                }
                if let Some(backoff) = policy.backoff_for(attempts) {
                    tracing::trace!(attempts, backoff_ms = backoff.as_millis() as u64, "backing off");
                    std::thread::sleep(backoff);
                }
            }
            CommitOutcome::MissingTVar(id) => {
                return Err(StmError::NotFound(id));
            }
        }
    }
}
