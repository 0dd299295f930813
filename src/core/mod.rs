pub mod entities;
pub mod inputs;
pub mod population;
pub mod roles;

// Flat public surface for domain types and functions.
pub use entities::{EntityDescriptor, EntityKind, RoleSpec, ENTITIES};
pub use inputs::{
    CessionImmobiliere, FamilleAttrs, Frais, FoyerFiscalAttrs, Individu, MenageAttrs,
    StatutMarital,
};
pub use population::{
    read_population_json, Population, PopulationError, PopulationInput,
};
pub use roles::{assign_roles, enumerate_roles, Member, PersonId, RoleError, RoleValue};
