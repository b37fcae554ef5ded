//! The twelve stateless nonce-generation strategies, grouped into an
//! ascending ("up-city") and a descending ("down-city") bank of six. The
//! source dispatches these through two arrays of function pointers; here
//! they are tagged variants with a single `next` method, per the
//! re-architecture guidance.

use rand::Rng;

use crate::bitfield::combine_lane;

/// Ascending-bank strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpStrategy {
    Increment,
    Sine,
    Phase,
    Block,
    IRandom,
    Random,
}

/// Descending-bank strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownStrategy {
    Decrement,
    Cosine,
    RPhase,
    RBlock,
    DRandom,
    NRandom,
}

/// The six up-city strategies in round-robin slot order.
pub const UP_STRATEGIES: [UpStrategy; 6] = [
    UpStrategy::Increment,
    UpStrategy::Sine,
    UpStrategy::Phase,
    UpStrategy::Block,
    UpStrategy::IRandom,
    UpStrategy::Random,
];

/// The six down-city strategies in round-robin slot order.
pub const DOWN_STRATEGIES: [DownStrategy; 6] = [
    DownStrategy::Decrement,
    DownStrategy::Cosine,
    DownStrategy::RPhase,
    DownStrategy::RBlock,
    DownStrategy::DRandom,
    DownStrategy::NRandom,
];

impl UpStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            UpStrategy::Increment => "increment",
            UpStrategy::Sine => "sine",
            UpStrategy::Phase => "phase",
            UpStrategy::Block => "block",
            UpStrategy::IRandom => "irandom",
            UpStrategy::Random => "random",
        }
    }

    /// Produce the next nonce for this strategy and increment `total`.
    pub fn next(&self, nonce: u32, max_nonce: u32, total: &mut u32, rng: &mut impl Rng) -> u32 {
        *total = total.wrapping_add(1);
        match self {
            UpStrategy::Increment => wrap_up(nonce.wrapping_add(1), max_nonce),
            // Reserved identity generators: bodies are commented out in
            // the source. Preserve as no-ops.
            UpStrategy::Sine | UpStrategy::Phase => nonce,
            UpStrategy::Block => wrap_up(nonce.wrapping_add(15), max_nonce),
            UpStrategy::IRandom => nonce.wrapping_add(rng.gen_range(0..=255)),
            UpStrategy::Random => uniform_below(max_nonce, rng),
        }
    }
}

impl DownStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            DownStrategy::Decrement => "decrement",
            DownStrategy::Cosine => "cosine",
            DownStrategy::RPhase => "rphase",
            DownStrategy::RBlock => "rblock",
            DownStrategy::DRandom => "drandom",
            DownStrategy::NRandom => "nrandom",
        }
    }

    /// Produce the next nonce for this strategy and increment `total`.
    pub fn next(&self, nonce: u32, max_nonce: u32, total: &mut u32, rng: &mut impl Rng) -> u32 {
        *total = total.wrapping_add(1);
        match self {
            DownStrategy::Decrement => {
                if nonce == 0 {
                    max_nonce
                } else {
                    nonce - 1
                }
            }
            DownStrategy::Cosine => nonce,
            DownStrategy::RPhase => max_nonce,
            // No explicit wrap: underflow wraps through the full u32 range,
            // matching the source's unguarded `nonce -= 0xF`.
            DownStrategy::RBlock => nonce.wrapping_sub(15),
            DownStrategy::DRandom => {
                let lane = (*total % 4) as u8;
                let byte = rng.gen_range(0..=255u8);
                let candidate = combine_lane(nonce, lane, byte);
                if candidate >= max_nonce {
                    combine_lane(0, lane, byte)
                } else {
                    candidate
                }
            }
            DownStrategy::NRandom => max_nonce.saturating_sub(uniform_below(max_nonce, rng)),
        }
    }
}

fn wrap_up(candidate: u32, max_nonce: u32) -> u32 {
    if candidate >= max_nonce {
        0
    } else {
        candidate
    }
}

fn uniform_below(max_nonce: u32, rng: &mut impl Rng) -> u32 {
    if max_nonce == 0 {
        0
    } else {
        rng.gen_range(0..max_nonce)
    }
}
