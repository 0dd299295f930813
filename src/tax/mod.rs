pub mod legislation;
pub mod pv_immo;
pub mod simulation;
pub mod taxe_habitation;

pub use legislation::{Legislation, LegislationError, Year};
pub use simulation::{Simulation, SimulationReport};
