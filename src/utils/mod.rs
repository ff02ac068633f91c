pub mod logging;
pub mod sync;

pub use sync::{lock, read, write};
