pub mod annotation;
pub mod positions;
pub mod teams;

pub use annotation::*;
pub use positions::*;
pub use teams::*;
