use anyhow::Context;
use clap::*;
use rayon::prelude::*;
use seqmol::libs::align::seed::{find_matches, representative_hits, window_around};
use seqmol::libs::align::{align, AlignMode, AlignParams, Alignment, SubstitutionMatrix};
use seqmol::libs::seq::SymbolSequence;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    let cmd = Command::new("search")
        .about("Seed-and-extend search of a query in a genome")
        .after_help(
            r###"
The first record of <query.fa> is searched in every record of <genome.fa>.

Exact word matches between query and genome are used as seeds. Around each
seed, the query is locally aligned to a genome window spanning the query
length plus --margin on both sides. Both strands are searched unless
--protein is set.

Output, one block per genome record with a hit:
    query <TAB> target <TAB> strand <TAB> score <TAB> identity
          <TAB> q_start <TAB> q_end <TAB> t_start <TAB> t_end
    gapped row of the query
    gapped row of the genome

Coordinates are 0-based and half-open on the forward strand.

Examples:
1. Search with 12-mers and a 100 bp margin:
   seqmol search query.fa genome.fa

2. Shorter seeds for a diverged query:
   seqmol search --word 8 --margin 50 query.fa genome.fa

"###,
        )
        .arg(
            Arg::new("query")
                .required(true)
                .index(1)
                .help("Query FASTA file, only the first record is used"),
        )
        .arg(
            Arg::new("genome")
                .required(true)
                .index(2)
                .help("Genome FASTA file. [stdin] for standard input"),
        )
        .arg(
            Arg::new("word")
                .long("word")
                .short('w')
                .num_args(1)
                .default_value("12")
                .value_parser(value_parser!(usize))
                .help("Seed word length"),
        )
        .arg(
            Arg::new("margin")
                .long("margin")
                .num_args(1)
                .default_value("100")
                .value_parser(value_parser!(usize))
                .help("Extra genome sequence on each side of the query window"),
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

struct Hit {
    strand: char,
    alignment: Alignment,
    offset: usize,
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let mut writer = seqmol::writer(args.get_one::<String>("outfile").unwrap())?;
    let opt_word = *args.get_one::<usize>("word").unwrap();
    let opt_margin = *args.get_one::<usize>("margin").unwrap();
    let opt_parallel = *args.get_one::<usize>("parallel").unwrap();
    let is_protein = args.get_flag("protein");

    let (matrix, alphabet, gap) = super::scoring(args)?;
    let params = AlignParams::new(AlignMode::Local, gap).with_max_number(1);

    //----------------------------
    // Load
    //----------------------------
    let query_file = args.get_one::<String>("query").unwrap();
    let (query_name, query) = seqmol::read_fasta(query_file)?
        .into_iter()
        .next()
        .with_context(|| format!("no records in {}", query_file))?;
    let query = SymbolSequence::from_text(&query, &alphabet)
        .with_context(|| format!("sequence {} in {}", query_name, query_file))?;

    let mut strands = vec![('+', query.clone())];
    if !is_protein {
        strands.push(('-', query.reverse_complement()));
    }

    let genome_file = args.get_one::<String>("genome").unwrap();
    let genome = seqmol::read_fasta(genome_file)?
        .into_iter()
        .map(|(name, seq)| {
            let seq = SymbolSequence::from_text(&seq, &alphabet)
                .with_context(|| format!("sequence {} in {}", name, genome_file))?;
            Ok((name, seq))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    //----------------------------
    // Process
    //----------------------------
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opt_parallel)
        .build()?;

    let results: Vec<anyhow::Result<Option<Hit>>> = pool.install(|| {
        genome
            .par_iter()
            .map(|(name, target)| {
                best_hit(&strands, target, &matrix, &params, opt_word, opt_margin)
                    .with_context(|| format!("searching {}", name))
            })
            .collect()
    });

    //----------------------------
    // Output
    //----------------------------
    for ((name, _), result) in genome.iter().zip(results) {
        let hit = match result? {
            Some(hit) => hit,
            None => {
                log::info!("{}: no hit", name);
                continue;
            }
        };

        let alignment = &hit.alignment;
        let (q_range, t_range) = spans(alignment);
        let q_range = if hit.strand == '-' {
            query.len() - q_range.1..query.len() - q_range.0
        } else {
            q_range.0..q_range.1
        };
        let (row1, row2) = alignment.gapped_strings(&alphabet);

        writer.write_fmt(format_args!(
            "{}\t{}\t{}\t{}\t{:.4}\t{}\t{}\t{}\t{}\n{}\n{}\n",
            query_name,
            name,
            hit.strand,
            alignment.score(),
            alignment.identity(),
            q_range.start,
            q_range.end,
            t_range.0 + hit.offset,
            t_range.1 + hit.offset,
            row1,
            row2,
        ))?;
    }
    writer.flush()?;

    Ok(())
}

/// Best local alignment around any seed on either strand; ties keep the
/// first strand and the leftmost window.
fn best_hit(
    strands: &[(char, SymbolSequence)],
    target: &SymbolSequence,
    matrix: &SubstitutionMatrix,
    params: &AlignParams,
    word: usize,
    margin: usize,
) -> anyhow::Result<Option<Hit>> {
    let mut best: Option<Hit> = None;

    for (strand, query) in strands {
        let hits = find_matches(query, target, word);
        let seeds = representative_hits(&hits, margin);
        log::debug!(
            "strand {}: {} word hits, {} windows",
            strand,
            hits.len(),
            seeds.len()
        );

        for seed in seeds {
            let window = window_around(seed, query.len(), target.len(), margin);
            if window.is_empty() {
                continue;
            }
            let offset = window.start;
            let outcome = align(query, &target.slice(window), matrix, params)?;
            let alignment = outcome.alignments.into_iter().next();

            if let Some(alignment) = alignment.filter(|a| !a.is_empty()) {
                let is_better = best
                    .as_ref()
                    .map(|b| alignment.score() > b.alignment.score())
                    .unwrap_or(true);
                if is_better {
                    best = Some(Hit {
                        strand: *strand,
                        alignment,
                        offset,
                    });
                }
            }
        }
    }

    Ok(best)
}

/// Half-open spans covered in the query and the target.
fn spans(alignment: &Alignment) -> ((usize, usize), (usize, usize)) {
    let span = |pos: Vec<usize>| match (pos.first(), pos.last()) {
        (Some(&first), Some(&last)) => (first, last + 1),
        _ => (0, 0),
    };
    let q = span(alignment.trace().iter().filter_map(|c| c.0).collect());
    let t = span(alignment.trace().iter().filter_map(|c| c.1).collect());
    (q, t)
}
