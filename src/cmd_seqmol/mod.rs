//! Subcommand modules for the `seqmol` binary.

pub mod align;
pub mod ctab;
pub mod search;

use seqmol::libs::align::{GapPenalty, SubstitutionMatrix};
use seqmol::libs::seq::Alphabet;

/// Scoring options shared by `align` and `search`.
pub fn scoring_args(cmd: clap::Command) -> clap::Command {
    use clap::*;
    cmd.arg(
        Arg::new("matrix")
            .long("matrix")
            .num_args(1)
            .help("Substitution matrix: nuc, blosum62, identity, or an NCBI-format file"),
    )
    .arg(
        Arg::new("protein")
            .long("protein")
            .action(ArgAction::SetTrue)
            .help("Protein sequences; the default matrix becomes blosum62"),
    )
    .arg(
        Arg::new("gap")
            .long("gap")
            .num_args(1)
            .allow_hyphen_values(true)
            .value_parser(value_parser!(i32))
            .conflicts_with_all(["open", "extend"])
            .help("Linear gap penalty per gap symbol, e.g. -5"),
    )
    .arg(
        Arg::new("open")
            .long("open")
            .num_args(1)
            .allow_hyphen_values(true)
            .value_parser(value_parser!(i32))
            .requires("extend")
            .help("Affine gap opening penalty, e.g. -10"),
    )
    .arg(
        Arg::new("extend")
            .long("extend")
            .num_args(1)
            .allow_hyphen_values(true)
            .value_parser(value_parser!(i32))
            .requires("open")
            .help("Affine gap extension penalty, e.g. -1"),
    )
}

/// Resolves the matrix, the alphabet to encode sequences with and the gap
/// penalty from the options of [`scoring_args`].
pub fn scoring(
    args: &clap::ArgMatches,
) -> anyhow::Result<(SubstitutionMatrix, Alphabet, GapPenalty)> {
    let is_protein = args.get_flag("protein");
    let fallback = if is_protein {
        Alphabet::protein()
    } else {
        Alphabet::nucleotide()
    };

    let matrix = match args.get_one::<String>("matrix").map(|s| s.as_str()) {
        Some("identity") => SubstitutionMatrix::identity(fallback.len(), 1, -1),
        Some(name) => SubstitutionMatrix::from_name(name)?,
        None if is_protein => SubstitutionMatrix::blosum62(),
        None => SubstitutionMatrix::nuc(),
    };
    let alphabet = matrix.alphabet().cloned().unwrap_or(fallback);

    let gap = if let Some(gap) = args.get_one::<i32>("gap") {
        GapPenalty::Linear(*gap)
    } else if let (Some(open), Some(extend)) =
        (args.get_one::<i32>("open"), args.get_one::<i32>("extend"))
    {
        GapPenalty::Affine {
            open: *open,
            extend: *extend,
        }
    } else {
        matrix.gap_penalty().unwrap_or_default()
    };
    log::info!("Scoring with a {0}x{0} matrix, gap penalty {1}", matrix.dim(), gap);

    Ok((matrix, alphabet, gap))
}
