pub mod decoder;
pub mod indicator;
