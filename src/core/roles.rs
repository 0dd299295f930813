//! Role enumeration for grouping entities.
//!
//! Every grouping entity instance lists its members per role label. Members
//! are given role indices in the declared role order; a role with a declared
//! maximum always occupies that many indices, so a household's first child is
//! index 2 whether or not a partner is present.

use super::entities::{EntityDescriptor, RoleSpec};
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("{entity}: missing mandatory role '{role}'")]
    MissingMandatoryRole {
        entity: &'static str,
        role: &'static str,
    },
    #[error("{entity}: role '{role}' has {count} members, expected {}", expected(.mandatory, .max))]
    InvalidRoleCardinality {
        entity: &'static str,
        role: &'static str,
        count: usize,
        mandatory: bool,
        max: Option<usize>,
    },
    #[error("{entity}: null identifier at position {position} of role '{role}'")]
    NullIdentifier {
        entity: &'static str,
        role: &'static str,
        position: usize,
    },
    #[error("{entity}: unknown role '{role}'")]
    UnknownRole { entity: &'static str, role: String },
    #[error("{entity}: individual {person} listed more than once")]
    DuplicateMember {
        entity: &'static str,
        person: PersonId,
    },
    #[error("{entity} is not a grouping entity")]
    NotAGroupingEntity { entity: &'static str },
}

fn expected(mandatory: &bool, max: &Option<usize>) -> String {
    match (*mandatory, *max) {
        (true, Some(max)) => format!("1 to {max}"),
        (false, Some(max)) => format!("at most {max}"),
        (true, None) => "at least 1".to_string(),
        (false, None) => "any number".to_string(),
    }
}

/// Identifier of an individual. JSON input may use strings or integers;
/// `1` and `"1"` name the same person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize, JsonSchema)]
#[serde(untagged)]
enum RawPersonId {
    Number(i64),
    Text(String),
}

impl From<RawPersonId> for PersonId {
    fn from(raw: RawPersonId) -> Self {
        match raw {
            RawPersonId::Number(n) => PersonId(n.to_string()),
            RawPersonId::Text(s) => PersonId(s),
        }
    }
}

impl<'de> Deserialize<'de> for PersonId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawPersonId::deserialize(deserializer).map(Into::into)
    }
}

impl JsonSchema for PersonId {
    fn schema_name() -> String {
        "PersonId".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        RawPersonId::json_schema(gen)
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        PersonId(s.to_string())
    }
}

impl From<u64> for PersonId {
    fn from(n: u64) -> Self {
        PersonId(n.to_string())
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Occupants of one role: a single id or a list. `null` list entries and a
/// `null` mandatory role are kept so that validation can reject them.
/// so that validation can reject them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RoleValue {
    Many(Vec<Option<PersonId>>),
    One(Option<PersonId>),
}

impl RoleValue {
    pub fn entries(&self) -> &[Option<PersonId>] {
        match self {
            RoleValue::Many(ids) => ids,
            RoleValue::One(id) => std::slice::from_ref(id),
        }
    }
}

/// Members of a grouping entity instance keyed by role label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Member(BTreeMap<String, RoleValue>);

impl Member {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I>(self, role: &str, ids: I) -> Self
    where
        I: IntoIterator<Item = PersonId>,
    {
        let ids = ids.into_iter().map(Some).collect();
        self.with_value(role, RoleValue::Many(ids))
    }

    pub fn with_value(mut self, role: &str, value: RoleValue) -> Self {
        self.0.insert(role.to_string(), value);
        self
    }

    pub fn get(&self, role: &str) -> Option<&RoleValue> {
        self.0.get(role)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// One person's role within an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleAssignment<'a> {
    pub index: usize,
    pub role: &'static RoleSpec,
    pub person: &'a PersonId,
}

/// Validated occupants of one role and the first index they receive.
#[derive(Debug)]
struct RoleBlock<'a> {
    role: &'static RoleSpec,
    start: usize,
    ids: Vec<&'a PersonId>,
}

impl<'a> RoleBlock<'a> {
    fn assignments(self) -> impl Iterator<Item = RoleAssignment<'a>> {
        let RoleBlock { role, start, ids } = self;
        ids.into_iter()
            .enumerate()
            .map(move |(offset, person)| RoleAssignment {
                index: start + offset,
                role,
                person,
            })
    }
}

/// Pairs of (role index, individual) for one instance, in canonical order.
///
/// The whole instance is validated before the iterator is returned, so a
/// malformed instance never yields a partial sequence.
pub fn enumerate_roles<'a>(
    entity: &'static EntityDescriptor,
    member: &'a Member,
) -> Result<impl Iterator<Item = (usize, &'a PersonId)> + 'a, RoleError> {
    Ok(assign_roles(entity, member)?.map(|a| (a.index, a.person)))
}

/// Like [`enumerate_roles`], keeping the role each index was assigned from.
pub fn assign_roles<'a>(
    entity: &'static EntityDescriptor,
    member: &'a Member,
) -> Result<impl Iterator<Item = RoleAssignment<'a>> + 'a, RoleError> {
    let blocks = layout(entity, member)?;
    Ok(blocks.into_iter().flat_map(RoleBlock::assignments))
}

fn layout<'a>(
    entity: &'static EntityDescriptor,
    member: &'a Member,
) -> Result<Vec<RoleBlock<'a>>, RoleError> {
    let name = entity.key_plural;
    if entity.is_persons_entity() {
        return Err(RoleError::NotAGroupingEntity { entity: name });
    }

    if let Some(unknown) = member.roles().find(|r| entity.role(r).is_none()) {
        return Err(RoleError::UnknownRole {
            entity: name,
            role: unknown.to_string(),
        });
    }

    let mut seen = HashSet::new();
    let mut blocks = Vec::with_capacity(entity.roles.len());
    let mut start = 0;

    for role in entity.roles {
        let ids = match member.get(role.key) {
            None if role.mandatory => {
                return Err(RoleError::MissingMandatoryRole {
                    entity: name,
                    role: role.key,
                })
            }
            // an explicit null on an optional role means absent
            None => Vec::new(),
            Some(RoleValue::One(None)) if !role.mandatory => Vec::new(),
            Some(value) => value
                .entries()
                .iter()
                .enumerate()
                .map(|(position, id)| {
                    id.as_ref().ok_or(RoleError::NullIdentifier {
                        entity: name,
                        role: role.key,
                        position,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        let count = ids.len();
        if (role.mandatory && count == 0) || role.max.is_some_and(|max| count > max) {
            return Err(RoleError::InvalidRoleCardinality {
                entity: name,
                role: role.key,
                count,
                mandatory: role.mandatory,
                max: role.max,
            });
        }

        for id in &ids {
            if !seen.insert(*id) {
                return Err(RoleError::DuplicateMember {
                    entity: name,
                    person: (*id).clone(),
                });
            }
        }

        log::trace!("{name}: role {} starts at {start} with {count}", role.key);
        blocks.push(RoleBlock { role, start, ids });
        start += role.max.unwrap_or(count);
    }

    Ok(blocks)
}
