//! Integer arithmetic that avoids hardware 64-bit division.

pub mod divmod;

pub use divmod::{div64, divmod64, mod64};
