extern crate clap;
use clap::*;

mod cmd_seqmol;

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    // RUST_LOG wins over -v
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let app = Command::new("seqmol")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`seqmol` - Pairwise sequence alignment and MDL connection tables")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true)
                .help("Raise log verbosity: -v info, -vv debug. RUST_LOG overrides"),
        )
        .subcommand(cmd_seqmol::align::make_subcommand())
        .subcommand(cmd_seqmol::search::make_subcommand())
        .subcommand(cmd_seqmol::ctab::make_subcommand())
        .after_help(
            r###"Subcommand groups:

* Sequences:
    * align  - Optimal pairwise alignments: global, local, semi-global
    * search - Seed-and-extend search of a query in a genome

* Molecules:
    * ctab - MDL MOL files: normalize, summarize

"###,
        );

    let matches = app.get_matches();
    setup_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("align", sub_matches)) => cmd_seqmol::align::execute(sub_matches),
        Some(("search", sub_matches)) => cmd_seqmol::search::execute(sub_matches),
        Some(("ctab", sub_matches)) => cmd_seqmol::ctab::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
