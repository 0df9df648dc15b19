//! A discrete hidden Markov model and the classical inference algorithms on it.
//! All of them run in O(T|S|^2) time, where T is the length of the observation and S is the states.
//! As a rule of thumb, we do not take logarithm nor scale the tables; every value is a usual probability.
//! Thus, if the observation is long, the likelihood might underflow to zero.
use crate::dptable::DPTable;
use crate::error::{HMMError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
pub mod backward;
pub mod forward;
pub mod posterior;
pub mod viterbi;

/// A hidden Markov model with discrete states and discrete observations.
/// Usually, it is more stressful to use short-hand notation `HMM`.
/// The model is immutable once it is constructed. Each inference borrows it
/// and returns freshly allocated tables.
/// The parameters are checked on their shapes and signs, but not on their row-sums.
/// To check that they are stochastic, call `check_stochastic`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModelRecord", into = "ModelRecord")]
pub struct HiddenMarkovModel {
    // Number of states.
    states: usize,
    // Number of observation symbols.
    symbols: usize,
    // Transition between each states.
    // By accessing from * self.states + to, we can get the transition probability from `from` to `to`.
    transition_matrix: Vec<f64>,
    // By accessing state * self.symbols + symbol, we can get Pr{symbol|state}.
    observation_matrix: Vec<f64>,
    // Initial distribution. Should be normalized to 1.
    initial_distribution: Vec<f64>,
}

/// Shorthand for HiddenMarkovModel.
#[allow(clippy::upper_case_acronyms)]
pub type HMM = HiddenMarkovModel;

/// The serialized form of a model. Matrices are written as nested arrays, row by row.
/// Deserializing a model goes through [HiddenMarkovModel::new], so a malformed record is rejected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelRecord {
    pub transition: Vec<Vec<f64>>,
    pub observation: Vec<Vec<f64>>,
    pub initial: Vec<f64>,
}

impl std::convert::TryFrom<ModelRecord> for HiddenMarkovModel {
    type Error = HMMError;
    fn try_from(record: ModelRecord) -> Result<Self> {
        Self::new(&record.transition, &record.observation, &record.initial)
    }
}

impl std::convert::From<HiddenMarkovModel> for ModelRecord {
    fn from(model: HiddenMarkovModel) -> Self {
        Self {
            transition: model
                .transition_matrix
                .chunks_exact(model.states)
                .map(|row| row.to_vec())
                .collect(),
            observation: model
                .observation_matrix
                .chunks_exact(model.symbols)
                .map(|row| row.to_vec())
                .collect(),
            initial: model.initial_distribution,
        }
    }
}

impl std::fmt::Display for HMM {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "States:{}", self.states)?;
        writeln!(f, "Symbols:{}", self.symbols)?;
        writeln!(f, "Transition:")?;
        for from in 0..self.states {
            let probs: Vec<_> = self
                .transitions(from)
                .iter()
                .map(|x| format!("{:.3}", x))
                .collect();
            writeln!(f, "{}", probs.join("\t"))?;
        }
        writeln!(f, "Observation:")?;
        for state in 0..self.states {
            let probs: Vec<_> = self
                .observations(state)
                .iter()
                .map(|x| format!("{:.3}", x))
                .collect();
            writeln!(f, "{}", probs.join("\t"))?;
        }
        let probs: Vec<_> = self
            .initial_distribution
            .iter()
            .map(|x| format!("{:.3}", x))
            .collect();
        write!(f, "Initial:{}", probs.join("\t"))
    }
}

impl std::default::Default for HMM {
    /// Return the three states, two symbols model used as a running example.
    fn default() -> Self {
        let transition_matrix = [
            vec![0.5, 0.2, 0.3],
            vec![0.3, 0.5, 0.2],
            vec![0.2, 0.3, 0.5],
        ];
        let observation_matrix = [vec![0.5, 0.5], vec![0.4, 0.6], vec![0.7, 0.3]];
        let initial_distribution = [0.2, 0.4, 0.4];
        Self {
            states: 3,
            symbols: 2,
            transition_matrix: transition_matrix.concat(),
            observation_matrix: observation_matrix.concat(),
            initial_distribution: initial_distribution.to_vec(),
        }
    }
}

impl HiddenMarkovModel {
    /// Create a new hidden Markov model.
    /// There is a few restriction on the input arguments.
    /// 1. transition matrix should be states x states matrix. transition_matrix[i][j] = Pr(i -> j).
    /// 2. observation matrix should be states x symbols matrix. observation_matrix[i][k] = Pr(k | i).
    /// 3. initial distribution should be the length of `states`.
    /// 4. Every value should be finite and non-negative, and there should be at least one state and one symbol.
    /// Each row is expected to sum up to 1, but it is not checked here.
    pub fn new(
        transition_matrix: &[Vec<f64>],
        observation_matrix: &[Vec<f64>],
        initial_distribution: &[f64],
    ) -> Result<Self> {
        let states = initial_distribution.len();
        if let Some((i, row)) = transition_matrix
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != states)
        {
            let message = format!(
                "{}-th row of the transition matrix has {} columns, while there are {} states",
                i,
                row.len(),
                states
            );
            return Err(HMMError::invalid(message));
        }
        let symbols = observation_matrix.first().map(|row| row.len()).unwrap_or(0);
        if let Some((i, row)) = observation_matrix
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != symbols)
        {
            let message = format!(
                "{}-th row of the observation matrix has {} columns, while the first has {}",
                i,
                row.len(),
                symbols
            );
            return Err(HMMError::invalid(message));
        }
        Self::from_raw_elements(
            states,
            symbols,
            transition_matrix.concat(),
            observation_matrix.concat(),
            initial_distribution.to_vec(),
        )
    }
    /// transition matrix: the [from * states + to]-th element should be Pr{from->to}
    /// observation_matrix: the [state * symbols + symbol]-th element should be Pr{symbol|state}
    /// initial_distribution: the [i]-th element should be Pr{i} at the beggining.
    pub fn from_raw_elements(
        states: usize,
        symbols: usize,
        transition_matrix: Vec<f64>,
        observation_matrix: Vec<f64>,
        initial_distribution: Vec<f64>,
    ) -> Result<Self> {
        if states == 0 || symbols == 0 {
            let message = format!("{} states and {} symbols", states, symbols);
            return Err(HMMError::invalid(message));
        }
        let shapes = [
            ("transition matrix", transition_matrix.len(), states * states),
            ("observation matrix", observation_matrix.len(), states * symbols),
            ("initial distribution", initial_distribution.len(), states),
        ];
        if let Some((name, len, expected)) = shapes.iter().find(|(_, len, exp)| len != exp) {
            let message = format!("{} has {} elements, expected {}", name, len, expected);
            return Err(HMMError::invalid(message));
        }
        let params = [
            ("transition matrix", &transition_matrix),
            ("observation matrix", &observation_matrix),
            ("initial distribution", &initial_distribution),
        ];
        for (name, values) in params.iter() {
            if let Some(x) = values.iter().find(|x| !x.is_finite() || **x < 0f64) {
                let message = format!("{} contains {}", name, x);
                return Err(HMMError::invalid(message));
            }
        }
        Ok(Self {
            states,
            symbols,
            transition_matrix,
            observation_matrix,
            initial_distribution,
        })
    }
    pub fn states(&self) -> usize {
        self.states
    }
    pub fn symbols(&self) -> usize {
        self.symbols
    }
    /// get transition probability from `from` to `to`
    pub fn transition(&self, from: usize, to: usize) -> f64 {
        self.transition_matrix[from * self.states + to]
    }
    /// Return transition probialities from `from`.
    pub fn transitions(&self, from: usize) -> &[f64] {
        &self.transition_matrix[from * self.states..(from + 1) * self.states]
    }
    /// Return Pr{symbol|state}
    pub fn observe(&self, state: usize, symbol: usize) -> f64 {
        self.observation_matrix[state * self.symbols + symbol]
    }
    /// Return the emission distribution of `state`.
    pub fn observations(&self, state: usize) -> &[f64] {
        &self.observation_matrix[state * self.symbols..(state + 1) * self.symbols]
    }
    pub fn initial(&self, state: usize) -> f64 {
        self.initial_distribution[state]
    }
    pub fn initial_distribution(&self) -> &[f64] {
        &self.initial_distribution
    }
    /// Check that every row of the transition matrix, every row of the observation matrix,
    /// and the initial distribution sum up to 1 within `eps`.
    pub fn check_stochastic(&self, eps: f64) -> Result<()> {
        let rows = self
            .transition_matrix
            .chunks_exact(self.states)
            .enumerate()
            .map(|(i, row)| (format!("{}-th row of the transition matrix", i), row));
        let obs = self
            .observation_matrix
            .chunks_exact(self.symbols)
            .enumerate()
            .map(|(i, row)| (format!("{}-th row of the observation matrix", i), row));
        let init = std::iter::once((
            "initial distribution".to_string(),
            self.initial_distribution.as_slice(),
        ));
        for (name, row) in rows.chain(obs).chain(init) {
            let sum: f64 = row.iter().sum();
            if eps < (sum - 1f64).abs() {
                return Err(HMMError::invalid(format!("{} sums to {}", name, sum)));
            }
        }
        Ok(())
    }
    /// Check that `obs` is non-empty and each symbol is smaller than the number of symbols.
    pub fn check_observations(&self, obs: &[usize]) -> Result<()> {
        if obs.is_empty() {
            return Err(HMMError::invalid("empty observation sequence"));
        }
        match obs.iter().enumerate().find(|(_, o)| self.symbols <= **o) {
            Some((t, o)) => {
                let message = format!("{} at time {} is not in [0,{})", o, t, self.symbols);
                Err(HMMError::invalid(message))
            }
            None => Ok(()),
        }
    }
    /// Frobenius norm, or element-wise-square-sum.
    /// Return None if the two model have different number of states or symbols.
    pub fn dist(&self, other: &Self) -> Option<f64> {
        (self.states == other.states && self.symbols == other.symbols).then(|| {
            fn sq(xs: &[f64], ys: &[f64]) -> f64 {
                xs.iter().zip(ys.iter()).map(|(x, y)| (x - y).powi(2)).sum()
            }
            sq(&self.initial_distribution, &other.initial_distribution)
                + sq(&self.transition_matrix, &other.transition_matrix)
                + sq(&self.observation_matrix, &other.observation_matrix)
        })
    }
    /// Return the probability to observe `obs`. It is the total of the forward algorithm.
    pub fn likelihood(&self, obs: &[usize]) -> Result<f64> {
        self.forward(obs).map(|(lk, _)| lk)
    }
    /// Return the posterior probability table, Pr{state at t = i| obs}, indexed by [(i,t)].
    pub fn posterior(&self, obs: &[usize]) -> Result<DPTable<f64>> {
        let (_, alpha) = self.forward(obs)?;
        let (_, beta) = self.backward(obs)?;
        posterior::gamma(&alpha, &beta)
    }
    /// Return the most probable state at each time, in contrast to the most probable path.
    /// Ties are broken by the smaller state index.
    pub fn posterior_decode(&self, obs: &[usize]) -> Result<Vec<usize>> {
        let gamma = self.posterior(obs)?;
        let path = (0..gamma.columns())
            .map(|t| {
                gamma
                    .column(t)
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |(argmax, max), (s, x)| {
                        if max < x {
                            (s, x)
                        } else {
                            (argmax, max)
                        }
                    })
                    .0
            })
            .collect();
        Ok(path)
    }
    /// Return the joint probability of the `path` and the `obs`.
    pub fn path_probability(&self, obs: &[usize], path: &[usize]) -> Result<f64> {
        self.check_observations(obs)?;
        if obs.len() != path.len() {
            let message = format!(
                "path length {} != observation length {}",
                path.len(),
                obs.len()
            );
            return Err(HMMError::invalid(message));
        }
        if let Some(s) = path.iter().find(|&&s| self.states <= s) {
            let message = format!("state {} is not in [0,{})", s, self.states);
            return Err(HMMError::invalid(message));
        }
        let init = self.initial(path[0]) * self.observe(path[0], obs[0]);
        let lk = path
            .windows(2)
            .zip(obs.iter().skip(1))
            .fold(init, |lk, (w, &o)| {
                lk * self.transition(w[0], w[1]) * self.observe(w[1], o)
            });
        Ok(lk)
    }
    /// Evaluate the likelihood of each sequence in parallel.
    /// The first invalid sequence, if any, makes the whole call fail.
    pub fn likelihoods<T: std::borrow::Borrow<[usize]> + Sync>(
        &self,
        seqs: &[T],
    ) -> Result<Vec<f64>> {
        debug!("Likelihoods\t{} sequences", seqs.len());
        seqs.par_iter()
            .map(|obs| self.likelihood(obs.borrow()))
            .collect()
    }
    /// Decode the Viterbi path of each sequence in parallel.
    pub fn decode_all<T: std::borrow::Borrow<[usize]> + Sync>(
        &self,
        seqs: &[T],
    ) -> Result<Vec<Vec<usize>>> {
        debug!("Decode\t{} sequences", seqs.len());
        seqs.par_iter()
            .map(|obs| self.viterbi(obs.borrow()).map(|(_, _, path)| path))
            .collect()
    }
}
