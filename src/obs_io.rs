//! Very thin readers and writers for observation sequences and models. Only support batch IO.
//! An observation sequence is a line of symbol indices separated by commas or whitespaces.
//! Empty lines and lines starting with '#' are skipped.
//! A model is a JSON object with `transition`, `observation`, and `initial` fields.
use crate::dptable::DPTable;
use crate::error::{HMMError, Result};
use crate::hmm::HiddenMarkovModel;
use std::io::{BufRead, BufReader};
use std::io::{BufWriter, Write};

/// Parse a line into an observation sequence.
pub fn parse_observations(line: &str) -> Result<Vec<usize>> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse()
                .map_err(|_| HMMError::invalid(format!("{} is not a symbol", token)))
        })
        .collect()
}

/// Read file or stdin, return parsed observation sequences.
pub fn read_observations<P: AsRef<std::path::Path>>(
    file: &Option<P>,
) -> std::io::Result<Vec<Vec<usize>>> {
    let stdin = std::io::stdin();
    let reader: Box<dyn BufRead> = match file {
        Some(file) => std::fs::File::open(file)
            .map(BufReader::new)
            .map(Box::new)?,
        None => {
            let lock = stdin.lock();
            Box::new(BufReader::new(lock))
        }
    };
    let mut seqs = vec![];
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        seqs.push(parse_observations(line)?);
    }
    Ok(seqs)
}

/// Read a model from a JSON file.
pub fn read_model<P: AsRef<std::path::Path>>(file: P) -> std::io::Result<HiddenMarkovModel> {
    let reader = std::fs::File::open(file).map(BufReader::new)?;
    serde_json::from_reader(reader).map_err(|why| why.into())
}

/// Write a model into the writer as a JSON object.
pub fn write_model<W: Write>(
    wtr: &mut BufWriter<W>,
    model: &HiddenMarkovModel,
) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *wtr, model)?;
    writeln!(wtr)
}

/// Write a table with its name into the writer.
pub fn write_table<W: Write, T: Copy + std::fmt::Display>(
    wtr: &mut BufWriter<W>,
    name: &str,
    table: &DPTable<T>,
) -> std::io::Result<()> {
    writeln!(wtr, "{}", name)?;
    writeln!(wtr, "{:.6}", table)
}

/// Write a sequence of indices, comma-separated.
pub fn write_indices<W: Write>(
    wtr: &mut BufWriter<W>,
    name: &str,
    xs: &[usize],
) -> std::io::Result<()> {
    let xs: Vec<_> = xs.iter().map(|x| format!("{}", x)).collect();
    writeln!(wtr, "{}\t{}", name, xs.join(","))
}
