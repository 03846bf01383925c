pub mod naming;
pub mod texture;
