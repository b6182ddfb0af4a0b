pub mod catalog;
pub mod crack;
pub mod encrypt;
