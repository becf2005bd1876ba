pub mod dependant;
pub mod patient;
