pub mod dataset;

mod error;
pub use error::LoadError;
mod matrix;
pub use matrix::{read_matrix_file, rows_to_matrix4};
mod ply;
pub use ply::read_ply;
