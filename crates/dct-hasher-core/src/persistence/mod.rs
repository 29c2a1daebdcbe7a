mod hash_log;
mod models;

pub use hash_log::{read_hash_log, HashLog};
pub use models::HashRecord;

#[cfg(test)]
mod tests;
