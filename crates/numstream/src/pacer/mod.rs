mod interface;
#[cfg(feature = "async-tokio")]
mod tokio_sleep;

pub use interface::*;
#[cfg(feature = "async-tokio")]
pub use tokio_sleep::*;
