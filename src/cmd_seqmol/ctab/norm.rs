use clap::*;
use seqmol::libs::ctab::write_mol;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("norm")
        .about("Rewrites a MOL file in canonical V2000 layout")
        .after_help(
            r###"
The connection table is parsed and written back with fixed-width columns.

* Element symbols are upper-cased
* Coordinates are written with 5 decimals
* Unknown charge codes become 0, unknown bond types become 8 (any)
  Each such fix is reported as a warning
* Properties after the bond block and everything after `M  END` are dropped

Examples:
1. Normalize a file:
   seqmol ctab norm in.mol -o out.mol

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(1)
                .help("Input MOL file. [stdin] for standard input"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infile = args.get_one::<String>("infile").unwrap();
    let mut writer = seqmol::writer(args.get_one::<String>("outfile").unwrap())?;

    let mol = super::load_mol(infile)?;
    let lines = write_mol(&mol.header, &mol.parsed.atoms.into())?;
    for line in lines {
        writer.write_fmt(format_args!("{}\n", line))?;
    }
    writer.flush()?;

    Ok(())
}
