//! Population loading: individuals plus grouping entity instances, with the
//! per-person membership columns derived from role enumeration.

use super::entities::{EntityKind, RoleSpec};
use super::inputs::{FamilleAttrs, FoyerFiscalAttrs, Individu, MenageAttrs};
use super::roles::{assign_roles, Member, PersonId, RoleError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::Read;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PopulationError {
    #[error("duplicate individual id: {0}")]
    DuplicatePerson(PersonId),
    #[error("{entity} '{instance}' references unknown individual {person}")]
    UnknownPerson {
        entity: &'static str,
        instance: String,
        person: PersonId,
    },
    #[error("individual {person} belongs to both {entity} '{first}' and '{second}'")]
    MultipleMembership {
        entity: &'static str,
        person: PersonId,
        first: String,
        second: String,
    },
    #[error("{instance}: {source}")]
    Role {
        instance: String,
        #[source]
        source: RoleError,
    },
}

/// A grouping entity instance as read from input: optional id, attributes
/// of the kind, and members keyed by role label.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EntityInstance<A> {
    #[serde(default)]
    pub id: Option<String>,
    // Attributes are taken first; every remaining key is a role label.
    #[serde(flatten)]
    pub attributes: A,
    #[serde(flatten)]
    pub members: Member,
}

/// Input root: one list per entity kind, keyed by its plural key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PopulationInput {
    pub individus: Vec<Individu>,
    #[serde(default)]
    pub familles: Vec<EntityInstance<FamilleAttrs>>,
    #[serde(default)]
    pub foyers_fiscaux: Vec<EntityInstance<FoyerFiscalAttrs>>,
    #[serde(default)]
    pub menages: Vec<EntityInstance<MenageAttrs>>,
}

/// Read a population from JSON without validating it.
pub fn read_population_json<R: Read>(reader: R) -> anyhow::Result<PopulationInput> {
    let input: PopulationInput = serde_json::from_reader(reader)?;
    Ok(input)
}

/// A person's place in one grouping entity instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Membership {
    /// Position of the instance in its entity list
    pub entity: usize,
    pub role: usize,
}

/// A member of a validated instance; `person` indexes `Population::individus`.
#[derive(Debug, Clone, Copy)]
pub struct Assignment {
    pub index: usize,
    pub role: &'static RoleSpec,
    pub person: usize,
}

#[derive(Debug, Clone)]
pub struct Instance<A> {
    pub id: String,
    pub attributes: A,
    pub roles: Vec<Assignment>,
}

impl<A> Instance<A> {
    /// Person occupying a role index, if any.
    pub fn at(&self, index: usize) -> Option<usize> {
        self.roles.iter().find(|a| a.index == index).map(|a| a.person)
    }

    pub fn members_in(&self, role: &str) -> impl Iterator<Item = usize> + '_ {
        let role = role.to_string();
        self.roles
            .iter()
            .filter(move |a| a.role.key == role)
            .map(|a| a.person)
    }

    pub fn persons(&self) -> impl Iterator<Item = usize> + '_ {
        self.roles.iter().map(|a| a.person)
    }
}

/// Validated population with its membership columns.
#[derive(Debug, Clone)]
pub struct Population {
    pub individus: Vec<Individu>,
    pub familles: Vec<Instance<FamilleAttrs>>,
    pub foyers_fiscaux: Vec<Instance<FoyerFiscalAttrs>>,
    pub menages: Vec<Instance<MenageAttrs>>,
    columns: HashMap<EntityKind, Vec<Option<Membership>>>,
}

impl Population {
    /// Validate an input, failing on the first malformed instance.
    pub fn from_input(input: PopulationInput) -> Result<Self, PopulationError> {
        let (population, issues) = Self::load(input);
        match issues.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(population),
        }
    }

    /// Validate every instance and report all issues. Malformed instances
    /// are left out of the returned population.
    pub fn load(input: PopulationInput) -> (Self, Vec<PopulationError>) {
        let PopulationInput {
            individus,
            familles,
            foyers_fiscaux,
            menages,
        } = input;
        let mut issues = Vec::new();

        let mut person_index = HashMap::new();
        for (row, individu) in individus.iter().enumerate() {
            match person_index.entry(individu.id.clone()) {
                Entry::Occupied(_) => {
                    issues.push(PopulationError::DuplicatePerson(individu.id.clone()))
                }
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
            }
        }

        let builder = |kind| GroupBuilder {
            kind,
            person_index: &person_index,
            column: vec![None; individus.len()],
            owners: vec![None; individus.len()],
        };

        let mut famille_builder = builder(EntityKind::Famille);
        let familles = famille_builder.build(familles, &mut issues);
        let mut foyer_builder = builder(EntityKind::FoyerFiscal);
        let foyers_fiscaux = foyer_builder.build(foyers_fiscaux, &mut issues);
        let mut menage_builder = builder(EntityKind::Menage);
        let menages = menage_builder.build(menages, &mut issues);

        let columns: HashMap<_, _> = [famille_builder, foyer_builder, menage_builder]
            .into_iter()
            .map(|b| (b.kind, b.column))
            .collect();

        for kind in EntityKind::GROUPS {
            let unassigned = columns[&kind].iter().filter(|m| m.is_none()).count();
            if unassigned > 0 {
                log::warn!("{unassigned} individual(s) belong to no {}", kind.descriptor().key_singular);
            }
        }

        let population = Population {
            individus,
            familles,
            foyers_fiscaux,
            menages,
            columns,
        };
        (population, issues)
    }

    pub fn person(&self, row: usize) -> &Individu {
        &self.individus[row]
    }

    pub fn membership(&self, kind: EntityKind, person: usize) -> Option<Membership> {
        self.columns
            .get(&kind)
            .and_then(|column| column.get(person).copied().flatten())
    }

    /// The membership column of a grouping kind, one entry per individual.
    pub fn column(&self, kind: EntityKind) -> &[Option<Membership>] {
        self.columns.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

struct GroupBuilder<'p> {
    kind: EntityKind,
    person_index: &'p HashMap<PersonId, usize>,
    column: Vec<Option<Membership>>,
    /// Id of the instance owning each person, for error reporting
    owners: Vec<Option<String>>,
}

impl GroupBuilder<'_> {
    fn build<A>(
        &mut self,
        instances: Vec<EntityInstance<A>>,
        issues: &mut Vec<PopulationError>,
    ) -> Vec<Instance<A>> {
        let descriptor = self.kind.descriptor();
        let mut built = Vec::with_capacity(instances.len());

        for (position, instance) in instances.into_iter().enumerate() {
            let id = instance
                .id
                .clone()
                .unwrap_or_else(|| format!("{}_{}", descriptor.key_singular, position));
            match self.instance(built.len(), &id, &instance.members) {
                Ok(roles) => built.push(Instance {
                    id,
                    attributes: instance.attributes,
                    roles,
                }),
                Err(err) => {
                    log::debug!("skipping {} '{}': {}", descriptor.key_singular, id, err);
                    issues.push(err);
                }
            }
        }
        built
    }

    fn instance(
        &mut self,
        entity: usize,
        id: &str,
        members: &Member,
    ) -> Result<Vec<Assignment>, PopulationError> {
        let descriptor = self.kind.descriptor();
        let assignments = assign_roles(descriptor, members)
            .map_err(|source| PopulationError::Role {
                instance: id.to_string(),
                source,
            })?
            .map(|a| {
                let person = *self.person_index.get(a.person).ok_or_else(|| {
                    PopulationError::UnknownPerson {
                        entity: descriptor.key_plural,
                        instance: id.to_string(),
                        person: a.person.clone(),
                    }
                })?;
                if let Some(first) = &self.owners[person] {
                    return Err(PopulationError::MultipleMembership {
                        entity: descriptor.key_plural,
                        person: a.person.clone(),
                        first: first.clone(),
                        second: id.to_string(),
                    });
                }
                Ok(Assignment {
                    index: a.index,
                    role: a.role,
                    person,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for a in &assignments {
            self.owners[a.person] = Some(id.to_string());
            self.column[a.person] = Some(Membership {
                entity,
                role: a.index,
            });
        }
        Ok(assignments)
    }
}
