// Business domains
pub mod lunch;
