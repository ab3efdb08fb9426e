pub mod align;
pub mod ctab;
pub mod io;
pub mod seq;
pub mod structure;
