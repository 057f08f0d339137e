pub mod location;
pub mod person;
