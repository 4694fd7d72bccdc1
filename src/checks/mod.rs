pub mod android;
pub mod common;
pub mod registry;
pub mod tool;
pub mod traits;

#[cfg(test)]
pub mod testing;
