use serde::Serialize;

/// Entity kinds known to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Famille,
    FoyerFiscal,
    Individu,
    Menage,
}

impl EntityKind {
    /// Grouping kinds, in the order their membership columns are emitted.
    pub const GROUPS: [EntityKind; 3] = [
        EntityKind::Famille,
        EntityKind::FoyerFiscal,
        EntityKind::Menage,
    ];

    pub fn descriptor(self) -> &'static EntityDescriptor {
        match self {
            EntityKind::Famille => &ENTITIES[0],
            EntityKind::FoyerFiscal => &ENTITIES[1],
            EntityKind::Individu => &ENTITIES[2],
            EntityKind::Menage => &ENTITIES[3],
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.descriptor().key_plural)
    }
}

/// A named membership slot within a grouping entity.
#[derive(Debug, PartialEq, Eq)]
pub struct RoleSpec {
    pub key: &'static str,
    pub label: &'static str,
    /// Declared maximum occupancy. A role with a maximum reserves that many
    /// indices whatever its actual occupancy; a role without one is packed
    /// densely after the previous roles.
    pub max: Option<usize>,
    /// Mandatory roles need between 1 and `max` occupants.
    pub mandatory: bool,
}

/// Static description of an entity kind: keys, labels and role layout.
#[derive(Debug)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    pub key_plural: &'static str,
    pub key_singular: &'static str,
    pub symbol: &'static str,
    pub label: &'static str,
    /// Per-person column holding the index of the instance a person belongs to.
    pub index_variable: Option<&'static str>,
    /// Per-person column holding the person's role index within that instance.
    pub role_variable: Option<&'static str>,
    pub roles: &'static [RoleSpec],
}

impl EntityDescriptor {
    /// The individuals container itself has no roles.
    pub fn is_persons_entity(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn role(&self, key: &str) -> Option<&'static RoleSpec> {
        self.roles.iter().find(|r| r.key == key)
    }
}

/// Registry of every entity kind, indexed by `EntityKind::descriptor`.
pub static ENTITIES: [EntityDescriptor; 4] = [
    EntityDescriptor {
        kind: EntityKind::Famille,
        key_plural: "familles",
        key_singular: "famille",
        symbol: "fam",
        label: "Famille",
        index_variable: Some("idfam"),
        role_variable: Some("quifam"),
        roles: &[
            RoleSpec {
                key: "parents",
                label: "Parents",
                max: Some(2),
                mandatory: true,
            },
            RoleSpec {
                key: "enfants",
                label: "Enfants",
                max: None,
                mandatory: false,
            },
        ],
    },
    EntityDescriptor {
        kind: EntityKind::FoyerFiscal,
        key_plural: "foyers_fiscaux",
        key_singular: "foyer_fiscal",
        symbol: "foy",
        label: "Déclaration d'impôt",
        index_variable: Some("idfoy"),
        role_variable: Some("quifoy"),
        roles: &[
            RoleSpec {
                key: "declarants",
                label: "Déclarants",
                max: Some(2),
                mandatory: true,
            },
            RoleSpec {
                key: "personnes_a_charge",
                label: "Personnes à charge",
                max: None,
                mandatory: false,
            },
        ],
    },
    EntityDescriptor {
        kind: EntityKind::Individu,
        key_plural: "individus",
        key_singular: "individu",
        symbol: "ind",
        label: "Personne",
        index_variable: None,
        role_variable: None,
        roles: &[],
    },
    EntityDescriptor {
        kind: EntityKind::Menage,
        key_plural: "menages",
        key_singular: "menage",
        symbol: "men",
        label: "Logement principal",
        index_variable: Some("idmen"),
        role_variable: Some("quimen"),
        roles: &[
            RoleSpec {
                key: "personne_de_reference",
                label: "Personne de référence",
                max: Some(1),
                mandatory: true,
            },
            RoleSpec {
                key: "conjoint",
                label: "Conjoint",
                max: Some(1),
                mandatory: false,
            },
            RoleSpec {
                key: "enfants",
                label: "Enfants",
                max: None,
                mandatory: false,
            },
            // Appended to the children's range.
            RoleSpec {
                key: "autres",
                label: "Autres",
                max: None,
                mandatory: false,
            },
        ],
    },
];

pub fn by_plural_key(key: &str) -> Option<&'static EntityDescriptor> {
    ENTITIES.iter().find(|e| e.key_plural == key)
}

pub fn by_singular_key(key: &str) -> Option<&'static EntityDescriptor> {
    ENTITIES.iter().find(|e| e.key_singular == key)
}

pub fn by_symbol(symbol: &str) -> Option<&'static EntityDescriptor> {
    ENTITIES.iter().find(|e| e.symbol == symbol)
}

/// Resolve a plural key, singular key or symbol, ignoring case.
pub fn lookup(key: &str) -> Option<&'static EntityDescriptor> {
    let key = key.to_lowercase();
    by_plural_key(&key)
        .or_else(|| by_singular_key(&key))
        .or_else(|| by_symbol(&key))
}
