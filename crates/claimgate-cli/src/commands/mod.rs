pub mod extract;
pub mod finalize;
pub mod validate;
