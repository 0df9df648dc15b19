use clap::{App, Arg, SubCommand};
use dhmm::obs_io;
use dhmm::HMM;
use std::io::{BufWriter, Write};
#[macro_use]
extern crate log;

const EXAMPLE_OBSERVATIONS: [usize; 4] = [0, 1, 0, 1];

fn verbose() -> Arg<'static, 'static> {
    Arg::with_name("verbose")
        .short("v")
        .multiple(true)
        .help("Debug mode")
}

fn model() -> Arg<'static, 'static> {
    Arg::with_name("model")
        .long("model")
        .short("m")
        .value_name("JSON")
        .takes_value(true)
        .required(true)
        .help("Model. JSON with `transition`, `observation`, and `initial`.")
}

fn subcommand_example() -> App<'static, 'static> {
    SubCommand::with_name("example")
        .version("0.1")
        .about("Run Viterbi/Forward/Backward/Gamma on the three states example.")
        .arg(verbose())
}

fn subcommand_decode() -> App<'static, 'static> {
    SubCommand::with_name("decode")
        .version("0.1")
        .about("Run Viterbi/Forward/Backward/Gamma on an observation.")
        .arg(verbose())
        .arg(model())
        .arg(
            Arg::with_name("observations")
                .long("observations")
                .short("o")
                .value_name("SYMBOLS")
                .takes_value(true)
                .required(true)
                .help("Observation sequence, such as 0,1,0,1."),
        )
}

fn subcommand_evaluate() -> App<'static, 'static> {
    SubCommand::with_name("evaluate")
        .version("0.1")
        .about("Likelihood and Viterbi path of each observation sequence.")
        .arg(verbose())
        .arg(model())
        .arg(
            Arg::with_name("input")
                .long("input")
                .short("i")
                .value_name("FILE")
                .takes_value(true)
                .help("Observation sequences, one per line. If not given, read stdin."),
        )
        .arg(
            Arg::with_name("threads")
                .long("threads")
                .short("t")
                .takes_value(true)
                .default_value("1")
                .help("Number of threads"),
        )
}

fn subcommand_sample() -> App<'static, 'static> {
    SubCommand::with_name("sample")
        .version("0.1")
        .about("Sample observation sequences from a model.")
        .arg(verbose())
        .arg(model())
        .arg(
            Arg::with_name("length")
                .long("length")
                .takes_value(true)
                .default_value("100")
                .help("Length of each sequence."),
        )
        .arg(
            Arg::with_name("num")
                .long("num")
                .takes_value(true)
                .default_value("1")
                .help("Number of sequences."),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .default_value("32389")
                .help("Seed"),
        )
}

fn parse_arg<T: std::str::FromStr>(
    matches: &clap::ArgMatches,
    name: &str,
) -> std::io::Result<T> {
    matches
        .value_of(name)
        .and_then(|e| e.parse().ok())
        .ok_or_else(|| {
            let message = format!("invalid value for --{}", name);
            std::io::Error::new(std::io::ErrorKind::InvalidInput, message)
        })
}

fn read_model(matches: &clap::ArgMatches) -> std::io::Result<HMM> {
    let path = matches.value_of("model").unwrap_or_default();
    let model = obs_io::read_model(path)?;
    if let Err(why) = model.check_stochastic(0.0001) {
        warn!("{} The results may not be probabilities.", why);
    }
    debug!("MODEL\n{}", model);
    Ok(model)
}

fn report(model: &HMM, obs: &[usize]) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut wtr = BufWriter::new(stdout.lock());
    let (delta, psi, path) = model.viterbi(obs)?;
    obs_io::write_table(&mut wtr, "viterbi delta", &delta)?;
    obs_io::write_table(&mut wtr, "viterbi psi", &psi)?;
    obs_io::write_indices(&mut wtr, "viterbi path", &path)?;
    let (lk_forward, alpha) = model.forward(obs)?;
    writeln!(wtr, "forward prob\t{}", lk_forward)?;
    obs_io::write_table(&mut wtr, "forward alpha", &alpha)?;
    let (lk_backward, beta) = model.backward(obs)?;
    writeln!(wtr, "backward prob\t{}", lk_backward)?;
    obs_io::write_table(&mut wtr, "backward beta", &beta)?;
    let gamma = model.gamma(&alpha, &beta)?;
    obs_io::write_table(&mut wtr, "gamma", &gamma)?;
    wtr.flush()
}

fn example(_matches: &clap::ArgMatches) -> std::io::Result<()> {
    let model = HMM::default();
    debug!("MODEL\n{}", model);
    report(&model, &EXAMPLE_OBSERVATIONS)
}

fn decode(matches: &clap::ArgMatches) -> std::io::Result<()> {
    let model = read_model(matches)?;
    let obs = matches.value_of("observations").unwrap_or_default();
    let obs = obs_io::parse_observations(obs)?;
    report(&model, &obs)
}

fn evaluate(matches: &clap::ArgMatches) -> std::io::Result<()> {
    let model = read_model(matches)?;
    let seqs = obs_io::read_observations(&matches.value_of("input"))?;
    debug!("Read {} sequences", seqs.len());
    let lks = model.likelihoods(&seqs)?;
    let paths = model.decode_all(&seqs)?;
    let stdout = std::io::stdout();
    let mut wtr = BufWriter::new(stdout.lock());
    for (i, (lk, path)) in lks.iter().zip(paths.iter()).enumerate() {
        let path: Vec<_> = path.iter().map(|x| format!("{}", x)).collect();
        writeln!(wtr, "{}\t{}\t{}", i, lk, path.join(","))?;
    }
    wtr.flush()
}

fn sample(matches: &clap::ArgMatches) -> std::io::Result<()> {
    use rand::SeedableRng;
    let model = read_model(matches)?;
    let length: usize = parse_arg(matches, "length")?;
    let num: usize = parse_arg(matches, "num")?;
    let seed: u64 = parse_arg(matches, "seed")?;
    let mut rng: rand_xoshiro::Xoshiro256StarStar = SeedableRng::seed_from_u64(seed);
    let stdout = std::io::stdout();
    let mut wtr = BufWriter::new(stdout.lock());
    for _ in 0..num {
        let (_, obs) = dhmm::gen_seq::sample(&model, &mut rng, length)?;
        let obs: Vec<_> = obs.iter().map(|x| format!("{}", x)).collect();
        writeln!(wtr, "{}", obs.join(","))?;
    }
    wtr.flush()
}

fn main() -> std::io::Result<()> {
    let matches = App::new("dhmm")
        .version("0.1")
        .about("Viterbi, Forward, Backward, and posterior probabilities on discrete HMMs.")
        .setting(clap::AppSettings::ArgRequiredElseHelp)
        .subcommand(subcommand_example())
        .subcommand(subcommand_decode())
        .subcommand(subcommand_evaluate())
        .subcommand(subcommand_sample())
        .get_matches();
    if let Some(sub_m) = matches.subcommand().1 {
        let level = match sub_m.occurrences_of("verbose") {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
        if let Some(threads) = sub_m.value_of("threads").and_then(|x| x.parse().ok()) {
            if let Err(why) = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
            {
                debug!("{:?} Global thread pool is already initialized.", why);
            }
        }
    }
    debug!("Start");
    match matches.subcommand() {
        ("example", Some(sub_m)) => example(sub_m),
        ("decode", Some(sub_m)) => decode(sub_m),
        ("evaluate", Some(sub_m)) => evaluate(sub_m),
        ("sample", Some(sub_m)) => sample(sub_m),
        _ => unreachable!(),
    }
}
