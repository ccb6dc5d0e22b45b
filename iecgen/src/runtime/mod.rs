//! Drives the session store: performs its effects and feeds results back.

mod driver;

pub use driver::SessionDriver;
