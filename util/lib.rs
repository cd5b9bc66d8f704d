/*!
This crate contains small utilities shared by the modeleval crates.
*/

pub mod finite;
pub mod table;
