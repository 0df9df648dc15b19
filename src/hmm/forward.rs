use super::HiddenMarkovModel;
use crate::dptable::DPTable;
use crate::error::Result;

impl HiddenMarkovModel {
    /// Forward algorithm. Return the probability to observe `obs` and the forward table,
    /// where alpha[(s,t)] is Pr{obs[..=t], state at t = s}. The table is (states x T).
    pub fn forward(&self, obs: &[usize]) -> Result<(f64, DPTable<f64>)> {
        self.check_observations(obs)?;
        let (states, time_axis) = (self.states, obs.len());
        let mut alpha = DPTable::new(states, time_axis, 0f64);
        // Initialize.
        for s in 0..states {
            alpha[(s, 0)] = self.initial(s) * self.observe(s, obs[0]);
        }
        for (t, &o) in obs.iter().enumerate().skip(1) {
            for s in 0..states {
                let trans: f64 = (0..states)
                    .map(|from| alpha[(from, t - 1)] * self.transition(from, s))
                    .sum();
                alpha[(s, t)] = trans * self.observe(s, o);
            }
        }
        let lk: f64 = alpha.column(time_axis - 1).sum();
        if lk <= 0f64 {
            warn!("The likelihood underflowed or is zero. T={}", time_axis);
        }
        debug!("FORWARD\tT={}\tN={}\tLK={}", time_axis, states, lk);
        Ok((lk, alpha))
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
    fn forward_test() {
        let hmm = HMM::default();
        let (lk, alpha) = hmm.forward(&OBS).unwrap();
        assert!((lk - 0.0600908).abs() < 1e-12, "{}", lk);
        assert_eq!((alpha.rows(), alpha.columns()), (3, 4));
        let answer = [
            [0.1, 0.077, 0.04187, 0.0210779],
            [0.16, 0.1104, 0.035512, 0.02518848],
            [0.28, 0.0606, 0.052836, 0.01382442],
        ];
        for (s, row) in answer.iter().enumerate() {
            for (t, x) in row.iter().enumerate() {
                assert!((alpha[(s, t)] - x).abs() < 1e-12, "{},{}\n{}", s, t, alpha);
            }
        }
        assert!((hmm.likelihood(&OBS).unwrap() - lk).abs() < 1e-15);
    }
    // Sum up the probability over all the paths.
    fn likelihood_naive(hmm: &HMM, obs: &[usize]) -> f64 {
        let (n, len) = (hmm.states(), obs.len());
        (0..n.pow(len as u32))
            .map(|mut code| {
                let path: Vec<_> = (0..len)
                    .map(|_| {
                        let s = code % n;
                        code /= n;
                        s
                    })
                    .collect();
                hmm.path_probability(obs, &path).unwrap()
            })
            .sum()
    }
    #[test]
    fn forward_random_test() {
        for seed in 0..20u64 {
            let mut rng: Xoroshiro128PlusPlus = SeedableRng::seed_from_u64(seed);
            let hmm = gen_seq::random_model(&mut rng, 3, 2).unwrap();
            let (_, obs) = gen_seq::sample(&hmm, &mut rng, 6).unwrap();
            let (lk, _) = hmm.forward(&obs).unwrap();
            let naive = likelihood_naive(&hmm, &obs);
            assert!((lk - naive).abs() <= lk * 1e-9, "{},{}", lk, naive);
        }
    }
    #[test]
    fn total_probability_test() {
        // The likelihoods of all the sequences of a fixed length sum up to 1.
        let hmm = HMM::default();
        let len: usize = 5;
        let total: f64 = (0..1usize << len)
            .map(|code| {
                let obs: Vec<_> = (0..len).map(|i| (code >> i) & 1).collect();
                hmm.likelihood(&obs).unwrap()
            })
            .sum();
        assert!((total - 1f64).abs() < 1e-9, "{}", total);
    }
    #[test]
    fn deterministic_test() {
        let mut rng: Xoroshiro128PlusPlus = SeedableRng::seed_from_u64(98);
        let hmm = gen_seq::random_model(&mut rng, 4, 6).unwrap();
        let (_, obs) = gen_seq::sample(&hmm, &mut rng, 40).unwrap();
        let (lk1, alpha1) = hmm.forward(&obs).unwrap();
        let (lk2, alpha2) = hmm.forward(&obs).unwrap();
        assert_eq!(lk1.to_bits(), lk2.to_bits());
        assert_eq!(alpha1, alpha2);
    }
}
