//! The round-robin scanhash driver: six up-city and six down-city
//! strategies interleaved per slot, arbitrated against the lock bitmap,
//! terminating only on restart or nonce-budget exhaustion.

use rand::Rng;

use crate::bitfield::LockMap;
use crate::evaluator::{self, NonceLookup};
use crate::semiresult::{SemiResult, SemiResultStore};
use crate::sha256::State;
use crate::strategy::{DOWN_STRATEGIES, UP_STRATEGIES};

/// External cancellation signal. A single boolean field read by the driver
/// before and during every candidate evaluation; the only cross-thread
/// communication the driver performs. Implementations need only be
/// atomically readable (a word-sized monotonic store is sufficient).
pub trait RestartHandle {
    fn work_restart(&self) -> bool;
}

/// Long-lived scan bookkeeping, reused across scans rather than
/// reallocated. Replaces the source's module-global `_nonceUp`,
/// `_nonceDown`, `usedBlockMap`, and `semiResultBuffer`.
pub struct ScanState {
    lock_map: LockMap,
    store: SemiResultStore,
    nonce_up: [u32; 6],
    nonce_down: [u32; 6],
}

impl ScanState {
    pub fn new(max_nonce: u32) -> Self {
        Self {
            lock_map: LockMap::new(max_nonce),
            store: SemiResultStore::new(),
            nonce_up: [0; 6],
            nonce_down: [0; 6],
        }
    }
}

/// Run one scan to completion (restart or nonce-budget exhaustion).
///
/// Returns `true` iff at least one semi-result was produced before the
/// scan ended; `false` otherwise. `last_nonce` is updated to the most
/// recently evaluated (unlocked) nonce after every non-terminating
/// outcome — `Success` or `InProgress` — matching the source, which
/// assigns `*last_nonce = *nonce` unconditionally after the per-nonce
/// switch for both banks. On return, any accumulated semi-results have
/// already been handed to `on_flush`.
#[allow(clippy::too_many_arguments)]
pub fn scanhash(
    restart: &dyn RestartHandle,
    midstate: &State,
    data: &mut [u8; 64],
    hash1_buf: &mut [u8; 64],
    hash: &mut State,
    target: &[u8; 32],
    max_nonce: u32,
    last_nonce: &mut u32,
    n: u32,
    ctx: &mut ScanState,
    rng: &mut impl Rng,
    mut on_overflow: impl FnMut(&mut Vec<SemiResult>),
    mut on_flush: impl FnMut(Vec<SemiResult>),
) -> bool {
    for slot in ctx.nonce_up.iter_mut() {
        *slot = *last_nonce;
    }
    for slot in ctx.nonce_down.iter_mut() {
        *slot = max_nonce;
    }

    ctx.lock_map.clear_all(max_nonce);
    ctx.store.clear();
    let mut total = n;

    tracing::debug!(max_nonce, n, "scanhash: scan started");

    loop {
        for slot in 0..UP_STRATEGIES.len() {
            if let Some(outcome) = issue_up(
                slot,
                ctx,
                midstate,
                data,
                hash1_buf,
                hash,
                target,
                max_nonce,
                last_nonce,
                &mut total,
                restart,
                rng,
                &mut on_overflow,
            ) {
                if let Some(result) = terminate(outcome, ctx, &mut total, &mut on_flush) {
                    return result;
                }
            }

            if let Some(outcome) = issue_down(
                slot,
                ctx,
                midstate,
                data,
                hash1_buf,
                hash,
                target,
                max_nonce,
                last_nonce,
                &mut total,
                restart,
                rng,
                &mut on_overflow,
            ) {
                if let Some(result) = terminate(outcome, ctx, &mut total, &mut on_flush) {
                    return result;
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn issue_up(
    slot: usize,
    ctx: &mut ScanState,
    midstate: &State,
    data: &mut [u8; 64],
    hash1_buf: &mut [u8; 64],
    hash: &mut State,
    target: &[u8; 32],
    max_nonce: u32,
    last_nonce: &mut u32,
    total: &mut u32,
    restart: &dyn RestartHandle,
    rng: &mut impl Rng,
    on_overflow: &mut impl FnMut(&mut Vec<SemiResult>),
) -> Option<NonceLookup> {
    let strategy = &UP_STRATEGIES[slot];
    ctx.nonce_up[slot] = strategy.next(ctx.nonce_up[slot], max_nonce, total, rng);
    let nonce = ctx.nonce_up[slot];
    if ctx.lock_map.is_locked(nonce) {
        return None;
    }
    data[12..16].copy_from_slice(&nonce.to_ne_bytes());
    let outcome = evaluator::evaluate(
        midstate,
        data,
        hash1_buf,
        hash,
        target,
        max_nonce,
        nonce,
        total,
        restart.work_restart(),
        &mut ctx.lock_map,
        &mut ctx.store,
        on_overflow,
    );
    if matches!(outcome, NonceLookup::Success | NonceLookup::InProgress) {
        *last_nonce = nonce;
    }
    if outcome == NonceLookup::Success {
        tracing::debug!(nonce, strategy = strategy.name(), "scanhash: semi-result found");
    }
    Some(outcome)
}

#[allow(clippy::too_many_arguments)]
fn issue_down(
    slot: usize,
    ctx: &mut ScanState,
    midstate: &State,
    data: &mut [u8; 64],
    hash1_buf: &mut [u8; 64],
    hash: &mut State,
    target: &[u8; 32],
    max_nonce: u32,
    last_nonce: &mut u32,
    total: &mut u32,
    restart: &dyn RestartHandle,
    rng: &mut impl Rng,
    on_overflow: &mut impl FnMut(&mut Vec<SemiResult>),
) -> Option<NonceLookup> {
    let strategy = &DOWN_STRATEGIES[slot];
    ctx.nonce_down[slot] = strategy.next(ctx.nonce_down[slot], max_nonce, total, rng);
    let nonce = ctx.nonce_down[slot];
    if ctx.lock_map.is_locked(nonce) {
        return None;
    }
    data[12..16].copy_from_slice(&nonce.to_ne_bytes());
    let outcome = evaluator::evaluate(
        midstate,
        data,
        hash1_buf,
        hash,
        target,
        max_nonce,
        nonce,
        total,
        restart.work_restart(),
        &mut ctx.lock_map,
        &mut ctx.store,
        on_overflow,
    );
    if matches!(outcome, NonceLookup::Success | NonceLookup::InProgress) {
        *last_nonce = nonce;
    }
    if outcome == NonceLookup::Success {
        tracing::debug!(nonce, strategy = strategy.name(), "scanhash: semi-result found");
    }
    Some(outcome)
}

/// Dispatch on an evaluator outcome. Returns `Some(result)` when the scan
/// should terminate (restart or completion), `None` to keep looping.
fn terminate(
    outcome: NonceLookup,
    ctx: &mut ScanState,
    total: &mut u32,
    on_flush: &mut impl FnMut(Vec<SemiResult>),
) -> Option<bool> {
    match outcome {
        NonceLookup::Success | NonceLookup::InProgress => None,
        NonceLookup::Restart => {
            tracing::debug!(total = *total, found = ctx.store.len(), "scanhash: restarted");
            Some(flush_and_report(ctx, on_flush))
        }
        NonceLookup::Complete => {
            tracing::debug!(total = *total, found = ctx.store.len(), "scanhash: complete");
            Some(flush_and_report(ctx, on_flush))
        }
    }
}

fn flush_and_report(ctx: &mut ScanState, on_flush: &mut impl FnMut(Vec<SemiResult>)) -> bool {
    let found = !ctx.store.is_empty();
    if found {
        on_flush(ctx.store.flush());
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct AlwaysRestart;
    impl RestartHandle for AlwaysRestart {
        fn work_restart(&self) -> bool {
            true
        }
    }

    struct NeverRestart;
    impl RestartHandle for NeverRestart {
        fn work_restart(&self) -> bool {
            false
        }
    }

    #[test]
    fn restart_before_any_hit_returns_false_and_clears_state() {
        let midstate = crate::sha256::IV;
        let mut data = [0u8; 64];
        let mut hash1_buf = [0u8; 64];
        let mut hash = crate::sha256::IV;
        let target = [0u8; 32];
        let mut last_nonce = 0u32;
        let mut ctx = ScanState::new(64);
        let mut rng = StdRng::seed_from_u64(42);
        let mut flushed = Vec::new();

        let found = scanhash(
            &AlwaysRestart,
            &midstate,
            &mut data,
            &mut hash1_buf,
            &mut hash,
            &target,
            64,
            &mut last_nonce,
            0,
            &mut ctx,
            &mut rng,
            |_| {},
            |batch| flushed.extend(batch),
        );
        assert!(!found);
        assert!(flushed.is_empty());
        for n in 0..64u32 {
            assert!(!ctx.lock_map.is_locked(n));
        }
    }

    #[test]
    fn scan_terminates_within_a_bounded_number_of_candidates() {
        let midstate = crate::sha256::IV;
        let mut data = [0u8; 64];
        let mut hash1_buf = [0u8; 64];
        let mut hash = crate::sha256::IV;
        // The outer loop has no fallthrough return; it terminates only via
        // NL_RESTART or NL_COMPLETE. Every evaluator call increments
        // `total`, and `total >= max_nonce` guarantees NL_COMPLETE, so this
        // call is guaranteed to return rather than loop forever.
        let target = [0u8; 32];
        let mut last_nonce = 0u32;
        let max_nonce = 256u32;
        let mut ctx = ScanState::new(max_nonce);
        let mut rng = StdRng::seed_from_u64(7);
        let mut flushed = Vec::new();

        scanhash(
            &NeverRestart,
            &midstate,
            &mut data,
            &mut hash1_buf,
            &mut hash,
            &target,
            max_nonce,
            &mut last_nonce,
            0,
            &mut ctx,
            &mut rng,
            |_| {},
            |batch| flushed.extend(batch),
        );
        // Reaching this point at all proves the call returned; L is
        // cleared on both the restart and completion paths.
        for n in 0..max_nonce {
            assert!(!ctx.lock_map.is_locked(n));
        }
    }

    #[test]
    fn lock_bitmap_is_checked_but_never_set_by_the_driver() {
        // Documented design decision: `lockNonce` is dormant in the
        // canonical flow, so issuing the same nonce twice across distinct
        // strategies within a scan is tolerated, not prevented.
        let midstate = crate::sha256::IV;
        let mut data = [0u8; 64];
        let mut hash1_buf = [0u8; 64];
        let mut hash = crate::sha256::IV;
        let target = [0u8; 32];
        let mut last_nonce = 0u32;
        let mut ctx = ScanState::new(16);
        let mut rng = StdRng::seed_from_u64(3);

        scanhash(
            &AlwaysRestart,
            &midstate,
            &mut data,
            &mut hash1_buf,
            &mut hash,
            &target,
            16,
            &mut last_nonce,
            0,
            &mut ctx,
            &mut rng,
            |_| {},
            |_| {},
        );
        assert!(!ctx.lock_map.is_locked(0));
    }

    #[test]
    fn last_nonce_advances_on_every_evaluated_candidate_not_only_on_a_hit() {
        // Matches the source's unconditional `*last_nonce = *nonce` after
        // the per-candidate switch: even a scan that produces zero
        // semi-results must leave `last_nonce` at the most recently
        // evaluated nonce, not at its initial value.
        let midstate = crate::sha256::IV;
        let mut data = [0u8; 64];
        let mut hash1_buf = [0u8; 64];
        let mut hash = crate::sha256::IV;
        let target = [0u8; 32];
        let mut last_nonce = 0u32;
        let max_nonce = 64u32;
        let mut ctx = ScanState::new(max_nonce);
        let mut rng = StdRng::seed_from_u64(11);
        let mut flushed = Vec::new();

        scanhash(
            &NeverRestart,
            &midstate,
            &mut data,
            &mut hash1_buf,
            &mut hash,
            &target,
            max_nonce,
            &mut last_nonce,
            0,
            &mut ctx,
            &mut rng,
            |_| {},
            |batch| flushed.extend(batch),
        );
        assert_ne!(last_nonce, 0, "last_nonce should have advanced past its initial value");
    }
}
