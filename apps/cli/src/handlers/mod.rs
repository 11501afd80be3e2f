pub mod generate;
pub mod param;
pub mod refs;
pub mod validate;
