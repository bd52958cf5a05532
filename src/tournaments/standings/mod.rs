pub mod breaks;
pub mod compute;
