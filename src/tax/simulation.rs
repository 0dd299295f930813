//! Evaluate the formulas for every tax household and household of a
//! population for one year.

use super::legislation::{Legislation, LegislationError, Year};
use super::pv_immo::{self, LignesCession};
use super::taxe_habitation::{self, BaseTaxeHabitation, ExonerationInputs};
use crate::core::population::Instance;
use crate::core::{EntityKind, FoyerFiscalAttrs, MenageAttrs, Population};
use rust_decimal::Decimal;
use serde::Serialize;

/// Role index of the first declarant of a tax household
pub const VOUS: usize = 0;
/// Role index of a household's reference person
pub const PREF: usize = 0;

pub struct Simulation<'a> {
    population: &'a Population,
    legislation: Legislation,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub year: Year,
    pub foyers_fiscaux: Vec<FoyerFiscalResult>,
    pub menages: Vec<MenageResult>,
}

#[derive(Debug, Serialize)]
pub struct FoyerFiscalResult {
    pub id: String,
    pub cessions: Vec<LignesCession>,
    /// Declared 3VZ plus the net gain of listed disposals
    pub f3vz: Decimal,
    pub ir_pv_immo: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MenageResult {
    pub id: String,
    pub exoneration: ExonerationInputs,
    pub seuil_exoneration: Decimal,
    pub exonere_taxe_habitation: bool,
    pub base: BaseTaxeHabitation,
    pub base_nette: Decimal,
    pub tax_hab: Decimal,
}

impl<'a> Simulation<'a> {
    pub fn new(population: &'a Population, year: Year) -> Result<Self, LegislationError> {
        Ok(Simulation {
            population,
            legislation: year.legislation()?,
        })
    }

    pub fn legislation(&self) -> &Legislation {
        &self.legislation
    }

    pub fn run(&self) -> SimulationReport {
        SimulationReport {
            year: self.legislation.year,
            foyers_fiscaux: self
                .population
                .foyers_fiscaux
                .iter()
                .map(|f| self.foyer_fiscal(f))
                .collect(),
            menages: self
                .population
                .menages
                .iter()
                .map(|m| self.menage(m))
                .collect(),
        }
    }

    pub fn foyer_fiscal(&self, foyer: &Instance<FoyerFiscalAttrs>) -> FoyerFiscalResult {
        let params = &self.legislation.pv_immo;
        let attrs = &foyer.attributes;
        let cessions: Vec<_> = attrs
            .cessions
            .iter()
            .map(|c| pv_immo::lignes_cession(c, params))
            .collect();
        let f3vz = attrs.f3vz + cessions.iter().map(|l| l.plus_value_nette).sum::<Decimal>();
        let ir_pv_immo = pv_immo::ir_pv_immo(f3vz, params);
        log::debug!("foyer {}: f3vz={} ir_pv_immo={}", foyer.id, f3vz, ir_pv_immo);

        FoyerFiscalResult {
            id: foyer.id.clone(),
            cessions,
            f3vz,
            ir_pv_immo,
        }
    }

    pub fn menage(&self, menage: &Instance<MenageAttrs>) -> MenageResult {
        let params = &self.legislation.taxe_habitation;
        let exoneration = self.exoneration_inputs(menage);
        let seuil_exoneration = taxe_habitation::seuil_exoneration(exoneration.nbptr, params);
        let exonere = taxe_habitation::exonere_taxe_habitation(&exoneration, params);

        let base = self.base_taxe_habitation(menage);
        let base_nette = taxe_habitation::base_nette(&base, params);
        let tax_hab = taxe_habitation::tax_hab(&base, exonere, params);
        log::debug!("menage {}: exonere={} tax_hab={}", menage.id, exonere, tax_hab);

        MenageResult {
            id: menage.id.clone(),
            exoneration,
            seuil_exoneration,
            exonere_taxe_habitation: exonere,
            base,
            base_nette,
            tax_hab,
        }
    }

    /// Household view of the exemption inputs: the reference person's age
    /// and status, benefits summed over members, and tax household values
    /// summed over the members who are a tax household's first declarant.
    pub fn exoneration_inputs(&self, menage: &Instance<MenageAttrs>) -> ExonerationInputs {
        let population = self.population;
        let mut inputs = ExonerationInputs::default();

        if let Some(pref) = menage.at(PREF) {
            let person = population.person(pref);
            inputs.age = person.age;
            inputs.statut_marital = person.statut_marital;
        }

        for person in menage.persons() {
            let individu = population.person(person);
            inputs.aah += individu.aah;
            inputs.asi += individu.asi;
            inputs.aspa += individu.aspa;

            if let Some(foyer) = self.foyer_declared_by(person) {
                inputs.rfr += foyer.rfr;
                inputs.nbptr += foyer.nbptr;
                inputs.isf_tot += foyer.isf_tot;
            }
        }
        inputs
    }

    /// Attributes of the tax household whose first declarant is `person`.
    fn foyer_declared_by(&self, person: usize) -> Option<&'a FoyerFiscalAttrs> {
        let population = self.population;
        population
            .membership(EntityKind::FoyerFiscal, person)
            .filter(|m| m.role == VOUS)
            .map(|m| &population.foyers_fiscaux[m.entity].attributes)
    }

    fn base_taxe_habitation(&self, menage: &Instance<MenageAttrs>) -> BaseTaxeHabitation {
        let attrs = &menage.attributes;
        let enfants = attrs
            .nombre_enfants_a_charge
            .unwrap_or_else(|| menage.members_in("enfants").count() as u32);
        BaseTaxeHabitation {
            valeur_locative_brute: attrs.valeur_locative_brute,
            valeur_locative_moyenne: attrs.valeur_locative_moyenne,
            personnes_a_charge: enfants
                + attrs.nombre_enfants_majeurs_celibataires_sans_enfant
                + attrs.nombre_ascendants_a_charge,
        }
    }
}
