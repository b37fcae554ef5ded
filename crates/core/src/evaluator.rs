//! Per-candidate nonce evaluation: two SHA-256 transforms (the "midstate
//! trick"), a cheap semi-result trigger, and restart/complete
//! classification.
//!
//! The full target comparison (`crate::target::meets_target`) is
//! deliberately not called on the hot path here — the trailing-word-zero
//! check is the semi-result predicate; the collaborator draining the
//! semi-result buffer applies the full 256-bit compare.

use crate::bitfield::LockMap;
use crate::semiresult::{SemiResult, SemiResultStore};
use crate::sha256::{self, State};

/// Fixed 32-byte padding tail appended after a 32-byte message for
/// single-block SHA-256 framing: `0x80`, twenty-three zero bytes, then the
/// 64-bit big-endian bit-length of a 32-byte message (256 bits).
const SECOND_BLOCK_PADDING: [u8; 32] = {
    let mut pad = [0u8; 32];
    pad[0] = 0x80;
    pad[31] = 0x00;
    pad[30] = 0x01; // 256 == 0x100, low two bytes of the big-endian u64 length
    pad
};

/// Outcome of one evaluator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceLookup {
    InProgress,
    Restart,
    Complete,
    Success,
}

/// Evaluate one candidate nonce.
///
/// `data` must already have the candidate nonce written into bytes 12..16
/// by the caller. `hash1_buf` is scratch space reused across calls: bytes
/// 0..32 receive the intermediate state from the first transform; bytes
/// 32..64 hold the fixed single-block padding tail for that 32-byte
/// intermediate. `hash` receives the final state.
#[allow(clippy::too_many_arguments)]
pub fn evaluate(
    midstate: &State,
    data: &[u8; 64],
    hash1_buf: &mut [u8; 64],
    hash: &mut State,
    target: &[u8; 32],
    max_nonce: u32,
    nonce: u32,
    total: &mut u32,
    restart: bool,
    lock_map: &mut LockMap,
    store: &mut SemiResultStore,
    mut on_overflow: impl FnMut(&mut Vec<SemiResult>),
) -> NonceLookup {
    let mut hash1_state = *midstate;
    sha256::transform(&mut hash1_state, data);

    let (head, tail) = hash1_buf.split_at_mut(32);
    sha256::state_to_be_bytes(&hash1_state, head.try_into().unwrap());
    tail.copy_from_slice(&SECOND_BLOCK_PADDING);

    *hash = sha256::IV;
    sha256::transform(hash, hash1_buf);

    if is_semi_result(hash) {
        let mut hash_bytes = [0u8; 32];
        sha256::state_to_be_bytes(hash, &mut hash_bytes);
        store.push(nonce, hash_bytes, *target, &mut on_overflow);
        return NonceLookup::Success;
    }

    if restart {
        lock_map.clear_all(max_nonce);
        *total = 0;
        return NonceLookup::Restart;
    }

    if *total >= max_nonce {
        lock_map.clear_all(max_nonce);
        *total = 0;
        return NonceLookup::Complete;
    }

    NonceLookup::InProgress
}

/// The semi-result predicate: word 7 (the last 32-bit word, in native
/// order) of the final digest is zero. A cheap proxy for the full target
/// check, applied downstream by the collaborator draining the buffer.
fn is_semi_result(hash: &State) -> bool {
    hash[7] == 0
}
