pub mod directory;
pub mod gateway;
