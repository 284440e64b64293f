pub mod index;
pub mod module;
