use super::roles::PersonId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatutMarital {
    Marie,
    #[default]
    Celibataire,
    Divorce,
    Veuf,
    Pacse,
}

/// An individual and the per-person variables the formulas read.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Individu {
    pub id: PersonId,
    /// Age in whole years
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub statut_marital: StatutMarital,
    /// Allocation aux adultes handicapés, annual amount
    #[serde(default)]
    #[schemars(with = "f64")]
    pub aah: Decimal,
    /// Allocation supplémentaire d'invalidité, annual amount
    #[serde(default)]
    #[schemars(with = "f64")]
    pub asi: Decimal,
    /// Allocation de solidarité aux personnes âgées, annual amount
    #[serde(default)]
    #[schemars(with = "f64")]
    pub aspa: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FamilleAttrs {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FoyerFiscalAttrs {
    /// Revenu fiscal de référence
    #[serde(default)]
    #[schemars(with = "f64")]
    pub rfr: Decimal,
    /// Nombre de parts
    #[serde(default = "one_part")]
    #[schemars(with = "f64")]
    pub nbptr: Decimal,
    /// Impôt de solidarité sur la fortune paid, as a positive amount
    #[serde(default)]
    #[schemars(with = "f64")]
    pub isf_tot: Decimal,
    /// Plus-value immobilière nette déclarée (case 3VZ)
    #[serde(default)]
    #[schemars(with = "f64")]
    pub f3vz: Decimal,
    #[serde(default)]
    pub cessions: Vec<CessionImmobiliere>,
}

fn one_part() -> Decimal {
    Decimal::ONE
}

impl Default for FoyerFiscalAttrs {
    fn default() -> Self {
        FoyerFiscalAttrs {
            rfr: Decimal::ZERO,
            nbptr: one_part(),
            isf_tot: Decimal::ZERO,
            f3vz: Decimal::ZERO,
            cessions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MenageAttrs {
    #[serde(default)]
    #[schemars(with = "f64")]
    pub valeur_locative_brute: Decimal,
    /// Average rental value in the municipality
    #[serde(default)]
    #[schemars(with = "f64")]
    pub valeur_locative_moyenne: Decimal,
    /// Defaults to the number of members in the `enfants` role
    #[serde(default)]
    pub nombre_enfants_a_charge: Option<u32>,
    #[serde(default)]
    pub nombre_enfants_majeurs_celibataires_sans_enfant: u32,
    #[serde(default)]
    pub nombre_ascendants_a_charge: u32,
}

/// Frais d'acquisition (line 22): actual amount or the flat rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frais {
    Reel {
        #[schemars(with = "f64")]
        montant: Decimal,
    },
    Forfait,
}

/// One property disposal, as declared on a 2048-IMM-SD page 2.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CessionImmobiliere {
    #[schemars(with = "String")]
    pub date_acquisition: NaiveDate,
    #[schemars(with = "String")]
    pub date_cession: NaiveDate,
    /// Line 10: sale price or expropriation indemnity
    #[schemars(with = "f64")]
    pub prix_cession: Decimal,
    /// Line 11: charges and indemnities borne by the buyer
    #[serde(default)]
    #[schemars(with = "f64")]
    pub charges_cession: Decimal,
    /// Line 12: costs and taxes borne by the seller
    #[serde(default)]
    #[schemars(with = "f64")]
    pub frais_cession: Decimal,
    /// Line 20: acquisition price or market value
    #[schemars(with = "f64")]
    pub prix_acquisition: Decimal,
    /// Line 21: charges and indemnities, actual amount
    #[serde(default)]
    #[schemars(with = "f64")]
    pub charges_acquisition: Decimal,
    /// Line 22: omitted means no acquisition costs
    #[serde(default)]
    pub frais_acquisition: Option<Frais>,
    /// Acquired by gift or inheritance; the flat rate on line 22 does not apply
    #[serde(default)]
    pub a_titre_gratuit: bool,
    /// Line 23: construction and improvement works
    #[serde(default)]
    pub travaux: Option<Frais>,
    #[serde(default = "built")]
    pub immeuble_bati: bool,
    /// Line 24: road and network costs
    #[serde(default)]
    #[schemars(with = "f64")]
    pub frais_voirie: Decimal,
    /// Line 45: first-sale exemption toward a main residence
    #[serde(default)]
    #[schemars(with = "f64")]
    pub exoneration: Decimal,
}

fn built() -> bool {
    true
}
