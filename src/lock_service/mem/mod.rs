mod mem_lock_store;
pub use mem_lock_store::*;
