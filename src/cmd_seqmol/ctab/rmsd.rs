use clap::*;
use seqmol::libs::ctab::AtomArrayStack;
use seqmol::libs::structure;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("rmsd")
        .about("Compares model coordinates against a reference MOL file")
        .after_help(
            r###"
All models must list the same atoms in the same order as the reference.
Coordinates are compared as they are, without superimposition.

Default output, one TSV line per model:
1. model: the input filename
2. rmsd: root-mean-square deviation from the reference

With --per-atom, one TSV line per reference atom instead:
1. atom: 1-based index
2. element
3. rmsf: root-mean-square fluctuation around the reference over all models

Examples:
1. Score several models:
   seqmol ctab rmsd ref.mol model1.mol model2.mol

2. Per-atom fluctuation:
   seqmol ctab rmsd ref.mol model*.mol --per-atom

"###,
        )
        .arg(
            Arg::new("reference")
                .required(true)
                .index(1)
                .help("Reference MOL file"),
        )
        .arg(
            Arg::new("models")
                .required(true)
                .num_args(1..)
                .index(2)
                .help("Model MOL file(s)"),
        )
        .arg(
            Arg::new("per_atom")
                .long("per-atom")
                .action(ArgAction::SetTrue)
                .help("Report per-atom RMSF instead of per-model RMSD"),
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
    let is_per_atom = args.get_flag("per_atom");

    let reference = super::load_mol(args.get_one::<String>("reference").unwrap())?
        .parsed
        .atoms;

    let names: Vec<&String> = args.get_many::<String>("models").unwrap().collect();
    let mut frames = Vec::with_capacity(names.len());
    for name in &names {
        let model = super::load_mol(name)?.parsed.atoms;
        if model.element() != reference.element() {
            anyhow::bail!("{}: atoms differ from the reference", name);
        }
        frames.push(model.coord().to_vec());
    }
    let stack = AtomArrayStack::new(reference.clone(), frames)?;
    log::info!(
        "{} models of {} atoms",
        stack.frame_count(),
        stack.atom_count()
    );

    if is_per_atom {
        writer.write_fmt(format_args!("#atom\telement\trmsf\n"))?;
        let values = structure::rmsf(&reference, &stack)?;
        for (i, (element, value)) in reference.element().iter().zip(values).enumerate() {
            writer.write_fmt(format_args!("{}\t{}\t{:.4}\n", i + 1, element, value))?;
        }
    } else {
        writer.write_fmt(format_args!("#model\trmsd\n"))?;
        let values = structure::rmsd_frames(&reference, &stack)?;
        for (name, value) in names.iter().zip(values) {
            writer.write_fmt(format_args!("{}\t{:.4}\n", name, value))?;
        }
    }
    writer.flush()?;

    Ok(())
}
