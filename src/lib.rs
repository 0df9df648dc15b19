//! Inference on discrete hidden Markov models.
//! Given a model (transition matrix, observation matrix, and initial distribution) and
//! an observation sequence, it computes the most probable hidden states (Viterbi),
//! the likelihood of the sequence (Forward and Backward), and the posterior probability of
//! each state at each time (Gamma).
//! Every computation is done in the usual, non-log probability space.
#[macro_use]
extern crate log;
pub mod dptable;
pub mod error;
pub mod gen_seq;
pub mod hmm;
pub mod obs_io;
pub use dptable::DPTable;
pub use error::{HMMError, Result};
pub use hmm::posterior::gamma;
pub use hmm::{HiddenMarkovModel, HMM};
