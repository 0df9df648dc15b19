#![feature(test)]
extern crate test;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
const SEED: u64 = 1293890;
const STATES: usize = 8;
const SYMBOLS: usize = 4;
const LEN: usize = 200;

fn setup() -> (dhmm::HMM, Vec<usize>) {
    let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
    let hmm = dhmm::gen_seq::random_model(&mut rng, STATES, SYMBOLS).unwrap();
    let (_, obs) = dhmm::gen_seq::sample(&hmm, &mut rng, LEN).unwrap();
    (hmm, obs)
}

#[bench]
fn viterbi(b: &mut test::Bencher) {
    let (hmm, obs) = setup();
    b.iter(|| hmm.viterbi(&obs).unwrap());
}

#[bench]
fn forward(b: &mut test::Bencher) {
    let (hmm, obs) = setup();
    b.iter(|| hmm.forward(&obs).unwrap());
}

#[bench]
fn backward(b: &mut test::Bencher) {
    let (hmm, obs) = setup();
    b.iter(|| hmm.backward(&obs).unwrap());
}

#[bench]
fn gamma(b: &mut test::Bencher) {
    let (hmm, obs) = setup();
    let (_, alpha) = hmm.forward(&obs).unwrap();
    let (_, beta) = hmm.backward(&obs).unwrap();
    b.iter(|| dhmm::gamma(&alpha, &beta).unwrap());
}

#[bench]
fn likelihoods_batch(b: &mut test::Bencher) {
    let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
    let hmm = dhmm::gen_seq::random_model(&mut rng, STATES, SYMBOLS).unwrap();
    let seqs: Vec<_> = (0..100)
        .map(|_| dhmm::gen_seq::sample(&hmm, &mut rng, LEN).unwrap().1)
        .collect();
    b.iter(|| hmm.likelihoods(&seqs).unwrap());
}
