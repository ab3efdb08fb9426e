use super::codec::{self, Parsed};
use super::model::Structure;
use super::CtabError;

/// The three header lines of a MOL file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MolHeader {
    pub name: String,
    pub program: String,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MolFile {
    pub header: MolHeader,
    pub parsed: Parsed,
}

/// Reads a MOL file: three header lines, then a connection table. Anything
/// after the first `M  END` line is ignored.
///
/// Line numbers in errors and advisories are counted from the top of the file.
pub fn read_mol<S: AsRef<str>>(lines: &[S]) -> Result<MolFile, CtabError> {
    if lines.len() < 4 {
        return Err(CtabError::malformed(
            lines.len().max(1),
            "a MOL file needs three header lines and a counts line",
        ));
    }

    let header = MolHeader {
        name: lines[0].as_ref().trim_end().to_string(),
        program: lines[1].as_ref().trim_end().to_string(),
        comment: lines[2].as_ref().trim_end().to_string(),
    };

    let body = &lines[3..];
    let end = body
        .iter()
        .position(|l| l.as_ref().starts_with("M  END"))
        .unwrap_or(body.len());
    let parsed = codec::parse_from(&body[..end], 4)?;

    Ok(MolFile { header, parsed })
}

pub fn write_mol(header: &MolHeader, structure: &Structure) -> Result<Vec<String>, CtabError> {
    let mut lines = vec![
        header.name.clone(),
        header.program.clone(),
        header.comment.clone(),
    ];
    lines.extend(codec::serialize(structure)?);
    Ok(lines)
}
