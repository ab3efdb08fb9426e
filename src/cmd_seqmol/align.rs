use anyhow::Context;
use clap::*;
use rayon::prelude::*;
use seqmol::libs::align::{align, AlignMode, AlignParams};
use seqmol::libs::seq::SymbolSequence;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    let cmd = Command::new("align")
        .about("Optimal pairwise alignments between two FASTA files")
        .after_help(
            r###"
Every record of <seq1.fa> is aligned against every record of <seq2.fa>.

Output, one block per alignment:
    name1 <TAB> name2 <TAB> score <TAB> identity
    gapped row of seq1
    gapped row of seq2

With --trace, the two rows are replaced by the trace, one column per line,
as 0-based positions in seq1 and seq2; -1 marks a gap.

Modes:
* global - end-to-end on both sequences
* local  - the best-scoring pair of substrings
* semi   - seq1 end-to-end, leading and trailing parts of seq2 are free

Gap penalties are negative. Without --gap or --open/--extend, the
penalty suggested by the matrix is used, or -10/-1 affine.

Examples:
1. Global alignment of nucleotide sequences:
   seqmol align seq1.fa seq2.fa

2. Local alignment of proteins with a linear gap penalty:
   seqmol align --protein --mode local --gap=-4 a.fa b.fa

3. All co-optimal alignments, up to 10 per pair:
   seqmol align --max 10 seq1.fa seq2.fa

"###,
        )
        .arg(
            Arg::new("seq1")
                .required(true)
                .index(1)
                .help("First FASTA file. [stdin] for standard input"),
        )
        .arg(
            Arg::new("seq2")
                .required(true)
                .index(2)
                .help("Second FASTA file"),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .num_args(1)
                .default_value("global")
                .value_parser(value_parser!(AlignMode))
                .help("Alignment mode: global, local or semi"),
        )
        .arg(
            Arg::new("max")
                .long("max")
                .num_args(1)
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Maximum number of co-optimal alignments reported per pair"),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .action(ArgAction::SetTrue)
                .help("Print traces instead of gapped rows"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .short('p')
                .num_args(1)
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Number of threads for parallel processing"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        );

    super::scoring_args(cmd)
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let mut writer = seqmol::writer(args.get_one::<String>("outfile").unwrap())?;
    let opt_mode = *args.get_one::<AlignMode>("mode").unwrap();
    let opt_max = *args.get_one::<usize>("max").unwrap();
    let is_trace = args.get_flag("trace");
    let opt_parallel = *args.get_one::<usize>("parallel").unwrap();

    let (matrix, alphabet, gap) = super::scoring(args)?;
    let params = AlignParams::new(opt_mode, gap).with_max_number(opt_max);

    //----------------------------
    // Load
    //----------------------------
    let load = |infile: &str| -> anyhow::Result<Vec<(String, SymbolSequence)>> {
        seqmol::read_fasta(infile)?
            .into_iter()
            .map(|(name, seq)| {
                let seq = SymbolSequence::from_text(&seq, &alphabet)
                    .with_context(|| format!("sequence {} in {}", name, infile))?;
                Ok((name, seq))
            })
            .collect()
    };
    let records1 = load(args.get_one::<String>("seq1").unwrap())?;
    let records2 = load(args.get_one::<String>("seq2").unwrap())?;

    let pairs: Vec<(usize, usize)> = (0..records1.len())
        .flat_map(|i| (0..records2.len()).map(move |j| (i, j)))
        .collect();
    log::info!("{} pairs to align", pairs.len());

    //----------------------------
    // Process
    //----------------------------
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opt_parallel)
        .build()?;

    // collect() keeps the input order
    let blocks: Vec<anyhow::Result<String>> = pool.install(|| {
        pairs
            .par_iter()
            .map(|&(i, j)| {
                let (name1, seq1) = &records1[i];
                let (name2, seq2) = &records2[j];
                let outcome = align(seq1, seq2, &matrix, &params)
                    .with_context(|| format!("aligning {} with {}", name1, name2))?;
                if let Some(truncation) = outcome.truncated {
                    log::info!(
                        "{} vs {}: more than {} co-optimal alignments, reporting the first {}",
                        name1,
                        name2,
                        truncation.cap,
                        truncation.cap
                    );
                }

                let mut block = String::new();
                for alignment in &outcome.alignments {
                    block += &format!(
                        "{}\t{}\t{}\t{:.4}\n",
                        name1,
                        name2,
                        alignment.score(),
                        alignment.identity()
                    );
                    if is_trace {
                        let table = alignment.trace_table();
                        if !table.is_empty() {
                            block += &format!("{}\n", table);
                        }
                    } else {
                        let (row1, row2) = alignment.gapped_strings(&alphabet);
                        block += &format!("{}\n{}\n", row1, row2);
                    }
                }
                Ok(block)
            })
            .collect()
    });

    //----------------------------
    // Output
    //----------------------------
    for block in blocks {
        writer.write_all(block?.as_bytes())?;
    }
    writer.flush()?;

    Ok(())
}
