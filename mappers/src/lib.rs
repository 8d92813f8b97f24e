//! Mapping tables and rule-driven passes.
//!
//! Each table is loaded from a small rule file of `link` records and queried
//! by the converter. Loading a required table from an empty file is fatal;
//! missing individual entries are advisory (logged by the checks in
//! [`checks`], conversion proceeds with the entity unmapped).

pub mod checks;
pub mod colonies;
pub mod country_map;
pub mod cultures;
pub mod governments;
pub mod merges;
pub mod provinces;
pub mod religions;
pub mod tech_schools;
pub mod unions;

pub use colonies::ColonyMapper;
pub use country_map::{CountryMapping, CountryMappingRule};
pub use cultures::{CultureMapper, Distinguisher};
pub use governments::GovernmentMapper;
pub use provinces::{ProvinceMapper, StateMapper};
pub use religions::ReligionMapper;
pub use tech_schools::TechSchool;
pub use unions::UnionMapper;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("no {0} mapping definitions loaded")]
    Empty(&'static str),
}
