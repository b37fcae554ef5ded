//! CLI-facing wrapper around `supradrive_core`: hex/arg parsing, a
//! `Ctrl-C`-driven restart signal, and a small driving function tying the
//! engine's callback hooks to plain `Vec` accumulation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use supradrive_core::{scanhash, RestartHandle, ScanState, SemiResult, State};
use thiserror::Error;

pub use supradrive_core::meets_target;

#[derive(Debug, Error)]
pub enum FacadeError {
    #[error("{field} must be {expected} bytes, got {got}")]
    InvalidHexLength {
        field: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("invalid hex in {field}: {source}")]
    HexDecode {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("failed to install interrupt handler: {0}")]
    SignalHandler(#[from] ctrlc::Error),
}

type Result<T> = std::result::Result<T, FacadeError>;

/// Decode a fixed-length hex string into a byte array, tagging any error
/// with the CLI flag it came from.
fn decode_fixed_hex<const N: usize>(field: &'static str, s: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(s).map_err(|source| FacadeError::HexDecode { field, source })?;
    if bytes.len() != N {
        return Err(FacadeError::InvalidHexLength {
            field,
            expected: N,
            got: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Decode the eight 32-bit midstate words from a 32-byte big-endian hex
/// string.
pub fn decode_midstate(s: &str) -> Result<State> {
    let bytes: [u8; 32] = decode_fixed_hex("midstate", s)?;
    Ok(supradrive_core::sha256::state_from_be_bytes(&bytes))
}

pub fn decode_data(s: &str) -> Result<[u8; 64]> {
    decode_fixed_hex("data", s)
}

pub fn decode_target(s: &str) -> Result<[u8; 32]> {
    decode_fixed_hex("target", s)
}

/// `AtomicBool`-backed cancellation flag, set from a `ctrlc` handler and
/// read by the engine on every candidate. Mirrors the stop/pause flag in
/// the GUI facade's `MiningControl`, trimmed to the one signal this
/// engine actually consumes.
#[derive(Clone, Default)]
pub struct RestartSignal(Arc<AtomicBool>);

impl RestartSignal {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RestartHandle for RestartSignal {
    fn work_restart(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One end-to-end scan, wiring the engine's callback hooks up to plain
/// `Vec` accumulation. Returns every semi-result produced before the scan
/// ended (via restart or nonce-budget exhaustion) along with whether it
/// ended with at least one hit.
#[allow(clippy::too_many_arguments)]
pub fn run_once(
    restart: &RestartSignal,
    midstate: &State,
    data: &mut [u8; 64],
    target: &[u8; 32],
    max_nonce: u32,
    last_nonce: &mut u32,
    start_total: u32,
    seed: u64,
) -> (bool, Vec<SemiResult>) {
    let mut hash1_buf = [0u8; 64];
    let mut hash = [0u32; 8];
    let mut ctx = ScanState::new(max_nonce);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut collected = Vec::new();

    let found = scanhash(
        restart,
        midstate,
        data,
        &mut hash1_buf,
        &mut hash,
        target,
        max_nonce,
        last_nonce,
        start_total,
        &mut ctx,
        &mut rng,
        |overflowing| overflowing.clear(),
        |batch| collected.extend(batch),
    );

    (found, collected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_midstate_round_trips_iv() {
        let mut bytes = [0u8; 32];
        supradrive_core::sha256::state_to_be_bytes(&supradrive_core::IV, &mut bytes);
        let decoded = decode_midstate(&hex::encode(bytes)).unwrap();
        assert_eq!(decoded, supradrive_core::IV);
    }

    #[test]
    fn decode_target_rejects_wrong_length() {
        let err = decode_target("aabb").unwrap_err();
        assert!(matches!(
            err,
            FacadeError::InvalidHexLength {
                field: "target",
                expected: 32,
                got: 2,
            }
        ));
    }

    #[test]
    fn decode_data_rejects_invalid_hex() {
        let err = decode_data(&"zz".repeat(64)).unwrap_err();
        assert!(matches!(err, FacadeError::HexDecode { field: "data", .. }));
    }

    #[test]
    fn restart_signal_reports_its_own_state() {
        let sig = RestartSignal::new();
        assert!(!sig.work_restart());
        sig.trigger();
        assert!(sig.work_restart());
        sig.reset();
        assert!(!sig.work_restart());
    }

    #[test]
    fn run_once_with_an_already_triggered_signal_returns_no_hits() {
        let sig = RestartSignal::new();
        sig.trigger();
        let midstate = supradrive_core::IV;
        let mut data = [0u8; 64];
        let target = [0u8; 32];
        let mut last_nonce = 0u32;

        let (found, results) =
            run_once(&sig, &midstate, &mut data, &target, 64, &mut last_nonce, 0, 1);
        assert!(!found);
        assert!(results.is_empty());
    }
}
