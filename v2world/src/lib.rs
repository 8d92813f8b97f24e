//! Destination world model and the conversion passes that populate it.
//!
//! Every pass is a pure transform: it reads the source world and the mapping
//! tables and writes destination entities, never the other way around. The
//! two worlds only ever refer to each other by identifier.

pub mod country;
pub mod factory;
pub mod pop;
pub mod province;
pub mod state;
pub mod world;

pub use country::V2Country;
pub use factory::Factory;
pub use pop::V2Pop;
pub use province::V2Province;
pub use state::V2State;
pub use world::V2World;
