//! Geometry and deviation measures over [`crate::libs::ctab`] atom arrays.

mod compare;
mod geometry;

pub use compare::{average, rmsd, rmsd_frames, rmsf};
pub use geometry::{
    angle, centroid, dihedral, distance, index_angle, index_dihedral, index_distance,
};
