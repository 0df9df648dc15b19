//! Posterior probabilities of the hidden states.
use super::HiddenMarkovModel;
use crate::dptable::DPTable;
use crate::error::{HMMError, Result};

/// Return gamma[(s,t)] = Pr{state at t = s | obs} from the forward table `alpha`
/// and the backward table `beta`, both (states x T) and computed on the same model and observation.
/// Each column of the returned table sums up to 1.
/// If the normalizing factor of a column is zero (e.g., underflowed on a long observation),
/// return `HMMError::DegenerateDistribution` instead of dividing by zero.
pub fn gamma(alpha: &DPTable<f64>, beta: &DPTable<f64>) -> Result<DPTable<f64>> {
    let (states, time_axis) = (alpha.rows(), alpha.columns());
    if (states, time_axis) != (beta.rows(), beta.columns()) {
        let message = format!(
            "alpha is {}x{} while beta is {}x{}",
            states,
            time_axis,
            beta.rows(),
            beta.columns()
        );
        return Err(HMMError::invalid(message));
    }
    if states == 0 || time_axis == 0 {
        return Err(HMMError::invalid("empty forward/backward tables"));
    }
    let mut gamma = DPTable::new(states, time_axis, 0f64);
    for t in 0..time_axis {
        let total: f64 = alpha.column(t).zip(beta.column(t)).map(|(a, b)| a * b).sum();
        if !(0f64 < total && total.is_finite()) {
            warn!("Normalizing factor is {} at {}", total, t);
            return Err(HMMError::DegenerateDistribution { time: t });
        }
        for s in 0..states {
            gamma[(s, t)] = alpha[(s, t)] * beta[(s, t)] / total;
        }
    }
    Ok(gamma)
}

impl HiddenMarkovModel {
    /// Same as [gamma], but also check that the tables are computed on a model with the same number of states.
    pub fn gamma(&self, alpha: &DPTable<f64>, beta: &DPTable<f64>) -> Result<DPTable<f64>> {
        if alpha.rows() != self.states {
            let message = format!("{} rows for {} states", alpha.rows(), self.states);
            return Err(HMMError::invalid(message));
        }
        gamma(alpha, beta)
    }
}
