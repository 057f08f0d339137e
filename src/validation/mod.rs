pub mod card;
pub mod rules;
