//! Source world model for the converter.
//!
//! Rebuilds a typed entity graph (countries, provinces, pops and, for saves
//! that came out of a CK2 conversion, the dynastic lineage of characters and
//! feudal titles) from the generic parse tree of a save file.
//!
//! Construction is two-phase: all entities are built first with their
//! cross-references kept as plain identifiers, then a resolution pass links
//! them against the completed indices. Forward references are common in the
//! save format, so nothing may be resolved before the full index exists.

pub mod country;
pub mod date;
pub mod lineage;
pub mod pop;
pub mod province;
pub mod world;

pub use country::Country;
pub use date::Date;
pub use lineage::{GenderLaw, Heir, Lineage, SuccessionLaw, Tier};
pub use pop::{Pop, PopRatio};
pub use province::Province;
pub use world::{Eu4World, WorldError};
