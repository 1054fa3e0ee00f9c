pub use matrix::SubstitutionMatrix;

mod matrix;
