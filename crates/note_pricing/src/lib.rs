//! # note_pricing (L3: Monte Carlo Engine)
//!
//! Path simulation and the autocallable payoff state machine.
//!
//! The crate is organised around three pieces:
//!
//! 1. Random number generation ([`rng`]): a seeded PRNG behind the
//!    [`rng::SimulationRng`] seam, so a low-discrepancy source can be
//!    plugged in without touching the simulator
//! 2. Path simulation ([`mc`]): advances any
//!    [`note_models::models::stochastic::StochasticProcess`] over an
//!    observation grid into an immutable [`mc::PathBatch`]
//! 3. Payoff evaluation ([`autocall`]): walks each path through the
//!    autocall / coupon-with-memory / protection rules and aggregates the
//!    discounted mean, with [`autocall::AutocallPricer`] wiring the two
//!    stages together
//!
//! ## Reproducibility
//!
//! Paths are drawn sequentially from a single seeded stream, so a given
//! seed always produces the same batch, and growing the path count only
//! appends new paths after the ones already drawn.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod autocall;
pub mod mc;
pub mod rng;
