use super::HiddenMarkovModel;
use crate::dptable::DPTable;
use crate::error::Result;

impl HiddenMarkovModel {
    /// Backward algorithm. Return the probability to observe `obs` and the backward table,
    /// where beta[(s,t)] is Pr{obs[t+1..] | state at t = s}. The table is (states x T).
    /// The emission of obs[t+1] is taken from the destination state,
    /// so the returned likelihood equals to the one from the forward algorithm.
    pub fn backward(&self, obs: &[usize]) -> Result<(f64, DPTable<f64>)> {
        self.check_observations(obs)?;
        let (states, time_axis) = (self.states, obs.len());
        let mut beta = DPTable::new(states, time_axis, 0f64);
        for s in 0..states {
            beta[(s, time_axis - 1)] = 1f64;
        }
        for t in (0..time_axis - 1).rev() {
            let next = obs[t + 1];
            for s in 0..states {
                beta[(s, t)] = (0..states)
                    .map(|to| {
                        self.transition(s, to) * self.observe(to, next) * beta[(to, t + 1)]
                    })
                    .sum();
            }
        }
        let lk: f64 = (0..states)
            .map(|s| self.initial(s) * self.observe(s, obs[0]) * beta[(s, 0)])
            .sum();
        if lk <= 0f64 {
            warn!("The likelihood underflowed or is zero. T={}", time_axis);
        }
        debug!("BACKWARD\tT={}\tN={}\tLK={}", time_axis, states, lk);
        Ok((lk, beta))
    }
}

#[cfg(test)]
mod tests {
    use crate::gen_seq;
    use crate::hmm::tests::OBS;
    use crate::HMM;
    use rand::SeedableRng;
    use rand_xoshiro::Xoroshiro128PlusPlus;
    #[test]
    fn backward_test() {
        let hmm = HMM::default();
        let (lk, beta) = hmm.backward(&OBS).unwrap();
        assert!((lk - 0.0600908).abs() < 1e-12, "{}", lk);
        let answer = [
            [0.112462, 0.2461, 0.46, 1.0],
            [0.121737, 0.2312, 0.51, 1.0],
            [0.104881, 0.2577, 0.43, 1.0],
        ];
        for (s, row) in answer.iter().enumerate() {
            for (t, x) in row.iter().enumerate() {
                assert!((beta[(s, t)] - x).abs() < 1e-12, "{},{}\n{}", s, t, beta);
            }
        }
    }
    #[test]
    fn single_observation_test() {
        let hmm = HMM::default();
        let (lk, beta) = hmm.backward(&[1]).unwrap();
        assert_eq!(beta.to_vecs(), vec![vec![1f64]; 3]);
        let (lkf, _) = hmm.forward(&[1]).unwrap();
        assert!((lk - lkf).abs() < 1e-15);
    }
    #[test]
    fn forward_backward_test() {
        for seed in 0..50u64 {
            let mut rng: Xoroshiro128PlusPlus = SeedableRng::seed_from_u64(seed);
            let states = 1 + seed as usize % 6;
            let symbols = 1 + seed as usize % 4;
            let hmm = gen_seq::random_model(&mut rng, states, symbols).unwrap();
            let (_, obs) = gen_seq::sample(&hmm, &mut rng, 60).unwrap();
            let (lkf, alpha) = hmm.forward(&obs).unwrap();
            let (lkb, beta) = hmm.backward(&obs).unwrap();
            assert!((lkf - lkb).abs() <= lkf * 1e-9, "{},{}", lkf, lkb);
            // Sum_s alpha*beta is the likelihood at every time.
            for t in 0..obs.len() {
                let lk: f64 = (0..states).map(|s| alpha[(s, t)] * beta[(s, t)]).sum();
                assert!((lk - lkf).abs() <= lkf * 1e-9, "{},{},{}", t, lk, lkf);
            }
        }
    }
}
