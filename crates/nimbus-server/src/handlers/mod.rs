pub mod index;
pub mod observations;
