use clap::*;
use indexmap::IndexMap;
use itertools::Itertools;
use seqmol::libs::structure::centroid;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("info")
        .about("Summarizes MOL files")
        .after_help(
            r###"
One TSV line per input file:
1. name: the first header line of the file
2. atoms, bonds: counts
3. charge: total formal charge
4. elements: composition, e.g. C:2,H:6,O:1, in order of first appearance
5. bond_types: histogram, e.g. single:7,double:1
6. centroid: mean x,y,z of all atoms, - when there are none

Examples:
1. Summarize several files:
   seqmol ctab info a.mol b.mol

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Input MOL file(s) to process"),
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
    let mut writer = seqmol::writer(args.get_one::<String>("outfile").unwrap())?;

    writer.write_fmt(format_args!(
        "#name\tatoms\tbonds\tcharge\telements\tbond_types\tcentroid\n"
    ))?;

    for infile in args.get_many::<String>("infiles").unwrap() {
        let mol = super::load_mol(infile)?;
        let atoms = &mol.parsed.atoms;

        let mut elements: IndexMap<&str, usize> = IndexMap::new();
        for element in atoms.element() {
            *elements.entry(element.as_str()).or_insert(0) += 1;
        }

        let mut bond_types: IndexMap<String, usize> = IndexMap::new();
        let bonds = atoms.bonds().map(|b| b.bonds()).unwrap_or_default();
        for bond in bonds {
            *bond_types.entry(bond.bond_type.to_string()).or_insert(0) += 1;
        }

        let center = match centroid(atoms) {
            Some(c) => c.iter().map(|v| format!("{:.3}", v)).join(","),
            None => "-".to_string(),
        };

        writer.write_fmt(format_args!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            mol.header.name,
            atoms.len(),
            bonds.len(),
            atoms.total_charge(),
            elements.iter().map(|(k, v)| format!("{}:{}", k, v)).join(","),
            bond_types.iter().map(|(k, v)| format!("{}:{}", k, v)).join(","),
            center,
        ))?;
    }
    writer.flush()?;

    Ok(())
}
