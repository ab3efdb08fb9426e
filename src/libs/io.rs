use anyhow::Context;
use std::io::{BufRead, BufReader, BufWriter, Write};

/// Opens `input` for buffered reading; `stdin` reads standard input and a
/// `.gz` extension is decompressed on the fly.
///
/// ```
/// use std::io::BufRead;
/// let reader = seqmol::reader("tests/ctab/water.mol").unwrap();
/// assert_eq!(reader.lines().count(), 10);
/// assert!(seqmol::reader("tests/ctab/missing.mol").is_err());
/// ```
pub fn reader(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = std::path::Path::new(input);
        let file = std::fs::File::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

pub fn writer(output: &str) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output)
            .with_context(|| format!("could not create {}", output))?;
        Box::new(BufWriter::new(file))
    };

    Ok(writer)
}

pub fn read_lines(input: &str) -> anyhow::Result<Vec<String>> {
    let lines = reader(input)?
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("could not read {}", input))?;
    Ok(lines)
}

/// All records of a FASTA file as `(name, sequence)`, in file order.
pub fn read_fasta(input: &str) -> anyhow::Result<Vec<(String, Vec<u8>)>> {
    let mut fa_in = noodles_fasta::io::Reader::new(reader(input)?);

    let mut records = vec![];
    for result in fa_in.records() {
        let record = result.with_context(|| format!("invalid FASTA record in {}", input))?;
        let name = String::from_utf8(record.name().into())?;
        let seq = record.sequence().as_ref().to_vec();
        records.push((name, seq));
    }
    Ok(records)
}
