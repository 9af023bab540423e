//! Exhibit configuration: the category legend and the booth directory.
//!
//! Both tables are plain data handed to the floor plan aggregator, so an
//! alternate exhibit layout is just a different `ExhibitConfig` value.

pub mod config;
pub mod directory;
pub mod gik;
pub mod symbology;

pub use config::*;
pub use directory::*;
pub use symbology::*;
