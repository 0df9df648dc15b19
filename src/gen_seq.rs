//! This module is to generate some random models and sequences to assess the performance.
//! Usually, it would not be used in the real-applications.
use crate::error::{HMMError, Result};
use crate::hmm::HiddenMarkovModel;
use rand::seq::SliceRandom;
use rand::Rng;

// Draw an index with probability proportional to `weights`.
fn choose_index<R: Rng>(rng: &mut R, weights: &[f64]) -> Result<usize> {
    let candidates: Vec<_> = weights.iter().enumerate().collect();
    candidates
        .choose_weighted(rng, |&(_, &w)| w)
        .map(|&(idx, _)| idx)
        .map_err(|why| HMMError::invalid(format!("can not sample from {:?}:{}", weights, why)))
}

/// Run the model for `len` steps, and return the hidden states and the observations.
/// Each row of the model should have at least one positive entry.
pub fn sample<R: Rng>(
    model: &HiddenMarkovModel,
    rng: &mut R,
    len: usize,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let (mut states, mut obs) = (Vec::with_capacity(len), Vec::with_capacity(len));
    if len == 0 {
        return Ok((states, obs));
    }
    let mut current = choose_index(rng, model.initial_distribution())?;
    for t in 0..len {
        if 0 < t {
            current = choose_index(rng, model.transitions(current))?;
        }
        states.push(current);
        obs.push(choose_index(rng, model.observations(current))?);
    }
    Ok((states, obs))
}

/// Return a random model with `states` states and `symbols` symbols.
/// Each row is drawn uniformly and then normalized, so it is stochastic
/// and has no zero entry.
pub fn random_model<R: Rng>(
    rng: &mut R,
    states: usize,
    symbols: usize,
) -> Result<HiddenMarkovModel> {
    fn row<R: Rng>(rng: &mut R, len: usize) -> Vec<f64> {
        let xs: Vec<f64> = (0..len).map(|_| rng.gen_range(0.05..1f64)).collect();
        let sum: f64 = xs.iter().sum();
        xs.iter().map(|x| x / sum).collect()
    }
    let transition: Vec<_> = (0..states).map(|_| row(rng, states)).collect();
    let observation: Vec<_> = (0..states).map(|_| row(rng, symbols)).collect();
    let initial = row(rng, states);
    HiddenMarkovModel::new(&transition, &observation, &initial)
}
