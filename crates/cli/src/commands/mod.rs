pub mod inspect;
pub mod report;

pub use inspect::*;
pub use report::*;
