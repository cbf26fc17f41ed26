pub mod finding;
pub mod status;

pub use finding::*;
pub use status::*;
