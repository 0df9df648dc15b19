use super::HiddenMarkovModel;
use crate::dptable::DPTable;
use crate::error::Result;

impl HiddenMarkovModel {
    /// Return the most probable hidden states for `obs`. In other words,
    /// it is the traditional Viterbi algorithm.
    /// The returned values are (delta, psi, path), where delta and psi are (T x states) tables:
    /// delta[(t,s)] is the maximum probability of the paths ending at `s` at time `t`,
    /// and psi[(t,s)] is the state at `t-1` on that path.
    /// Note that the maximum at each cell is searched from zero. If no predecessor
    /// has a positive probability, delta becomes zero and psi becomes 0 (the first state).
    /// It does not mean that state 0 is feasible.
    pub fn viterbi(&self, obs: &[usize]) -> Result<(DPTable<f64>, DPTable<usize>, Vec<usize>)> {
        self.check_observations(obs)?;
        let (time_axis, states) = (obs.len(), self.states);
        let mut delta = DPTable::new(time_axis, states, 0f64);
        let mut psi = DPTable::new(time_axis, states, 0usize);
        for s in 0..states {
            delta[(0, s)] = self.initial(s) * self.observe(s, obs[0]);
        }
        for (t, &o) in obs.iter().enumerate().skip(1) {
            for s in 0..states {
                let (max, argmax) = (0..states).fold((0f64, 0), |(max, argmax), from| {
                    let lk = delta[(t - 1, from)] * self.transition(from, s);
                    if max < lk {
                        (lk, from)
                    } else {
                        (max, argmax)
                    }
                });
                delta[(t, s)] = max * self.observe(s, o);
                psi[(t, s)] = argmax;
            }
            trace!("VITERBI\t{}\t{:?}", t, delta.row(t));
        }
        // The first state attaining the maximum.
        let last = delta.row(time_axis - 1);
        let max = last.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let last_state = last.iter().position(|&x| x == max).unwrap_or(0);
        if max <= 0f64 {
            warn!("The best path has zero probability. T={}", time_axis);
        }
        // Trace back.
        let mut path = vec![0; time_axis];
        path[time_axis - 1] = last_state;
        for t in (0..time_axis - 1).rev() {
            path[t] = psi[(t + 1, path[t + 1])];
        }
        debug!("VITERBI\tT={}\tN={}\tMAX={}", time_axis, states, max);
        Ok((delta, psi, path))
    }
}
