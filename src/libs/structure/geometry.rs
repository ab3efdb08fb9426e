//! Distances, angles and dihedrals between atom positions.
//!
//! Angles are in radians. Positions that coincide leave the direction
//! undefined and give `NaN`.

use crate::libs::ctab::{AtomArray, CtabError};
use nalgebra::Vector3;

fn vec3(p: &[f64; 3]) -> Vector3<f64> {
    Vector3::from(*p)
}

/// Euclidean distance between two positions.
///
/// ```
/// use seqmol::libs::structure::distance;
/// assert_eq!(distance(&[0.0, 0.0, 0.0], &[3.0, 4.0, 0.0]), 5.0);
/// ```
pub fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (vec3(b) - vec3(a)).norm()
}

/// Angle at `b` spanned by `a` and `c`.
pub fn angle(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]) -> f64 {
    let v1 = (vec3(a) - vec3(b)).normalize();
    let v2 = (vec3(c) - vec3(b)).normalize();
    v1.dot(&v2).clamp(-1.0, 1.0).acos()
}

/// Dihedral angle around the `b`-`c` axis, in `-pi..=pi`.
pub fn dihedral(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3], d: &[f64; 3]) -> f64 {
    let v1 = (vec3(b) - vec3(a)).normalize();
    let v2 = (vec3(c) - vec3(b)).normalize();
    let v3 = (vec3(d) - vec3(c)).normalize();

    let n1 = v1.cross(&v2);
    let n2 = v2.cross(&v3);

    let x = n1.dot(&n2);
    let y = n1.cross(&n2).dot(&v2);
    y.atan2(x)
}

/// Mean position of all atoms, `None` for an empty array.
pub fn centroid(atoms: &AtomArray) -> Option<[f64; 3]> {
    if atoms.is_empty() {
        return None;
    }
    let sum = atoms
        .coord()
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + vec3(p));
    let mean = sum / atoms.len() as f64;
    Some([mean.x, mean.y, mean.z])
}

fn position(atoms: &AtomArray, atom: usize) -> Result<&[f64; 3], CtabError> {
    atoms.coord().get(atom).ok_or(CtabError::AtomIndex {
        atom,
        atom_count: atoms.len(),
    })
}

/// [`distance`] for each index pair.
pub fn index_distance(atoms: &AtomArray, indices: &[[usize; 2]]) -> Result<Vec<f64>, CtabError> {
    indices
        .iter()
        .map(|&[a, b]| Ok(distance(position(atoms, a)?, position(atoms, b)?)))
        .collect()
}

/// [`angle`] for each index triple, the middle index being the vertex.
pub fn index_angle(atoms: &AtomArray, indices: &[[usize; 3]]) -> Result<Vec<f64>, CtabError> {
    indices
        .iter()
        .map(|&[a, b, c]| {
            Ok(angle(
                position(atoms, a)?,
                position(atoms, b)?,
                position(atoms, c)?,
            ))
        })
        .collect()
}

pub fn index_dihedral(atoms: &AtomArray, indices: &[[usize; 4]]) -> Result<Vec<f64>, CtabError> {
    indices
        .iter()
        .map(|&[a, b, c, d]| {
            Ok(dihedral(
                position(atoms, a)?,
                position(atoms, b)?,
                position(atoms, c)?,
                position(atoms, d)?,
            ))
        })
        .collect()
}
