pub mod parsers;
pub mod timing;
