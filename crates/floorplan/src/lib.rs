//! Floor plan core: turns raw booth annotations into booth markers on a fixed
//! design canvas and answers pointer hit queries against them.
//!
//! Everything here is a pure function of its inputs. Selection, hover and
//! filter state belong to the caller (see [`interaction::MapState`]).

pub mod booths;
pub mod canvas;
pub mod interaction;
pub mod picking;
pub mod query;

pub use booths::*;
pub use canvas::*;
pub use picking::*;
