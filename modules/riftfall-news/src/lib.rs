pub mod cycle;
pub mod daemon;
pub mod history;
pub mod notify;
pub mod source;
pub mod stats;
pub mod store;
pub mod synthesis;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
