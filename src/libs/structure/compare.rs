//! Deviation measures between a reference and one or more models.
//!
//! Coordinates are compared atom by atom as given; no superimposition is
//! done first.

use crate::libs::ctab::{AtomArray, AtomArrayStack, CtabError};
use nalgebra::Vector3;

fn squared_deviations(
    reference: &[[f64; 3]],
    subject: &[[f64; 3]],
) -> Result<Vec<f64>, CtabError> {
    if subject.len() != reference.len() {
        return Err(CtabError::LengthMismatch {
            what: "subject atoms",
            expected: reference.len(),
            found: subject.len(),
        });
    }
    Ok(reference
        .iter()
        .zip(subject)
        .map(|(r, s)| (Vector3::from(*s) - Vector3::from(*r)).norm_squared())
        .collect())
}

fn root_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().sum::<f64>() / values.len() as f64).sqrt()
}

/// Root-mean-square deviation over all atoms; 0 for empty arrays.
///
/// ```
/// use seqmol::libs::ctab::AtomArray;
/// use seqmol::libs::structure::rmsd;
///
/// let a = AtomArray::new(vec![[0.0; 3], [1.0, 0.0, 0.0]], vec!["C".into(), "C".into()]).unwrap();
/// let b = a.clone().with_coord(vec![[0.0, 2.0, 0.0], [1.0, 2.0, 0.0]]).unwrap();
/// assert_eq!(rmsd(&a, &b).unwrap(), 2.0);
/// ```
pub fn rmsd(reference: &AtomArray, subject: &AtomArray) -> Result<f64, CtabError> {
    let deviations = squared_deviations(reference.coord(), subject.coord())?;
    Ok(root_mean(&deviations))
}

/// [`rmsd`] of every frame against `reference`.
pub fn rmsd_frames(reference: &AtomArray, stack: &AtomArrayStack) -> Result<Vec<f64>, CtabError> {
    stack
        .frames()
        .iter()
        .map(|frame| Ok(root_mean(&squared_deviations(reference.coord(), frame)?)))
        .collect()
}

/// Root-mean-square fluctuation of each atom around `reference` across
/// the frames of `stack`.
pub fn rmsf(reference: &AtomArray, stack: &AtomArrayStack) -> Result<Vec<f64>, CtabError> {
    if stack.frame_count() == 0 {
        return Err(CtabError::EmptyStack);
    }

    let mut sums = vec![0.0; reference.len()];
    for frame in stack.frames() {
        let deviations = squared_deviations(reference.coord(), frame)?;
        for (sum, d) in sums.iter_mut().zip(deviations) {
            *sum += d;
        }
    }

    let frames = stack.frame_count() as f64;
    Ok(sums.into_iter().map(|sum| (sum / frames).sqrt()).collect())
}

/// Mean coordinates over all frames, carrying the stack's annotations.
pub fn average(stack: &AtomArrayStack) -> Result<AtomArray, CtabError> {
    if stack.frame_count() == 0 {
        return Err(CtabError::EmptyStack);
    }

    let mut sums = vec![Vector3::<f64>::zeros(); stack.atom_count()];
    for frame in stack.frames() {
        for (sum, p) in sums.iter_mut().zip(frame) {
            *sum += Vector3::from(*p);
        }
    }

    let frames = stack.frame_count() as f64;
    let coord = sums
        .into_iter()
        .map(|sum| {
            let mean = sum / frames;
            [mean.x, mean.y, mean.z]
        })
        .collect();
    stack.atoms().clone().with_coord(coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::ctab::BondList;
    use approx::assert_relative_eq;

    fn water() -> AtomArray {
        AtomArray::new(
            vec![[0.0, 0.0, 0.0], [0.9572, 0.0, 0.0], [-0.24, 0.9266, 0.0]],
            vec!["O".into(), "H".into(), "H".into()],
        )
        .unwrap()
        .with_charge(vec![0, 0, 0])
        .unwrap()
        .with_bonds(BondList::empty(3))
        .unwrap()
    }

    fn shifted(atoms: &AtomArray, by: [f64; 3]) -> Vec<[f64; 3]> {
        atoms
            .coord()
            .iter()
            .map(|p| [p[0] + by[0], p[1] + by[1], p[2] + by[2]])
            .collect()
    }

    #[test]
    fn test_rmsd() {
        let reference = water();
        assert_eq!(rmsd(&reference, &reference).unwrap(), 0.0);

        let moved = reference
            .clone()
            .with_coord(shifted(&reference, [1.0, 0.0, 0.0]))
            .unwrap();
        assert_relative_eq!(rmsd(&reference, &moved).unwrap(), 1.0, epsilon = 1e-12);

        // one atom off by 3 out of three
        let mut coord = reference.coord().to_vec();
        coord[0] = [0.0, 0.0, 3.0];
        let one_off = reference.clone().with_coord(coord).unwrap();
        assert_relative_eq!(rmsd(&reference, &one_off).unwrap(), 3f64.sqrt(), epsilon = 1e-12);

        let fewer = AtomArray::new(vec![[0.0; 3]], vec!["O".into()]).unwrap();
        assert_eq!(
            rmsd(&reference, &fewer),
            Err(CtabError::LengthMismatch {
                what: "subject atoms",
                expected: 3,
                found: 1
            })
        );
        assert_eq!(rmsd(&AtomArray::default(), &AtomArray::default()), Ok(0.0));
    }

    #[test]
    fn test_frames_and_rmsf() {
        let reference = water();
        let stack = AtomArrayStack::new(
            reference.clone(),
            vec![
                shifted(&reference, [1.0, 0.0, 0.0]),
                shifted(&reference, [0.0, -3.0, 0.0]),
                reference.coord().to_vec(),
            ],
        )
        .unwrap();

        let per_frame = rmsd_frames(&reference, &stack).unwrap();
        assert_eq!(per_frame.len(), 3);
        assert_relative_eq!(per_frame[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(per_frame[1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(per_frame[2], 0.0);

        // every atom moved alike: sqrt((1 + 9 + 0) / 3)
        let per_atom = rmsf(&reference, &stack).unwrap();
        assert_eq!(per_atom.len(), 3);
        for value in per_atom {
            assert_relative_eq!(value, (10.0f64 / 3.0).sqrt(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_average() {
        let reference = water();
        let stack = AtomArrayStack::new(
            reference.clone(),
            vec![
                shifted(&reference, [1.0, 2.0, 0.0]),
                shifted(&reference, [-1.0, 0.0, 4.0]),
            ],
        )
        .unwrap();

        let mean = average(&stack).unwrap();
        assert_eq!(mean.element(), reference.element());
        assert_eq!(mean.charge(), reference.charge());
        assert_eq!(mean.bonds(), reference.bonds());
        for (a, b) in mean.coord().iter().zip(shifted(&reference, [0.0, 1.0, 2.0])) {
            for axis in 0..3 {
                assert_relative_eq!(a[axis], b[axis], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_empty_stack() {
        let reference = water();
        let stack = AtomArrayStack::new(reference.clone(), vec![]).unwrap();
        assert_eq!(average(&stack), Err(CtabError::EmptyStack));
        assert_eq!(rmsf(&reference, &stack), Err(CtabError::EmptyStack));
        assert!(rmsd_frames(&reference, &stack).unwrap().is_empty());
    }
}
