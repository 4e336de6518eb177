pub mod send;
pub mod sign;
