pub mod info;
pub mod norm;
pub mod rmsd;

use anyhow::Context;
use seqmol::libs::ctab::{read_mol, MolFile};

pub fn make_subcommand() -> clap::Command {
    clap::Command::new("ctab")
        .about("MDL connection table tools")
        .subcommand_required(true)
        .subcommand(info::make_subcommand())
        .subcommand(norm::make_subcommand())
        .subcommand(rmsd::make_subcommand())
}

pub fn execute(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("info", sub_matches)) => info::execute(sub_matches),
        Some(("norm", sub_matches)) => norm::execute(sub_matches),
        Some(("rmsd", sub_matches)) => rmsd::execute(sub_matches),
        _ => Ok(()),
    }
}

/// Reads a MOL file, reporting advisories as warnings.
pub fn load_mol(infile: &str) -> anyhow::Result<MolFile> {
    let lines = seqmol::read_lines(infile)?;
    let mol = read_mol(&lines).with_context(|| format!("could not parse {}", infile))?;
    for advisory in &mol.parsed.advisories {
        log::warn!("{}: {}", infile, advisory);
    }
    Ok(mol)
}
