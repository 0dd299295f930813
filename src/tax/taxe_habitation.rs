//! Taxe d'habitation: exemption eligibility and the tax on the main residence.

use super::legislation::TaxeHabitationParams;
use crate::core::StatutMarital;
use rust_decimal::Decimal;
use serde::Serialize;

const AGE_EXONERATION: u32 = 60;

/// Household-level values the exemption reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExonerationInputs {
    /// Reference person's age
    pub age: u32,
    /// Reference person's marital status
    pub statut_marital: StatutMarital,
    pub aah: Decimal,
    pub asi: Decimal,
    pub aspa: Decimal,
    pub isf_tot: Decimal,
    pub nbptr: Decimal,
    pub rfr: Decimal,
}

/// Income ceiling for the exemption.
pub fn seuil_exoneration(nbptr: Decimal, params: &TaxeHabitationParams) -> Decimal {
    let parts_supplementaires = ((nbptr - Decimal::ONE) / Decimal::TWO).max(Decimal::ZERO);
    params.plaf_th_1 + params.plaf_th_supp * parts_supplementaires
}

/// Exemption for people over 60 or widowed without wealth tax and under the
/// income ceiling, and for holders of ASI, ASPA or AAH.
pub fn exonere_taxe_habitation(inputs: &ExonerationInputs, params: &TaxeHabitationParams) -> bool {
    let seuil = seuil_exoneration(inputs.nbptr, params);
    let age_ou_veuvage =
        inputs.age >= AGE_EXONERATION || inputs.statut_marital == StatutMarital::Veuf;
    let sous_conditions =
        age_ou_veuvage && inputs.isf_tot <= Decimal::ZERO && inputs.rfr < seuil;

    sous_conditions
        || inputs.asi > Decimal::ZERO
        || inputs.aspa > Decimal::ZERO
        || inputs.aah > Decimal::ZERO
}

/// Rental values and dependents of a main residence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BaseTaxeHabitation {
    pub valeur_locative_brute: Decimal,
    pub valeur_locative_moyenne: Decimal,
    /// Dependent children, single adult children and dependent ascendants
    pub personnes_a_charge: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Abattements {
    pub obligatoire: Decimal,
    pub general: Decimal,
    pub special_modeste: Decimal,
    pub special_invalide: Decimal,
}

impl Abattements {
    pub fn total(&self) -> Decimal {
        self.obligatoire + self.general + self.special_modeste + self.special_invalide
    }
}

pub fn abattements(base: &BaseTaxeHabitation, params: &TaxeHabitationParams) -> Abattements {
    let vlm = base.valeur_locative_moyenne;
    let pac = Decimal::from(base.personnes_a_charge);
    let deux = Decimal::TWO;

    // family allowance: the first two dependents at one rate, the others at another
    let taux_2_premiers = params.taux_minimal_2_premiers + params.majoration_2_premiers;
    let taux_3_et_plus = params.taux_minimal_3_et_plus + params.majoration_3_et_plus;
    let obligatoire = (pac.min(deux) * taux_2_premiers
        + (pac - deux).max(Decimal::ZERO) * taux_3_et_plus)
        * vlm;

    let general =
        params.abattement_general_base_forfaitaire + params.taux_abattement_general_base * vlm;

    let seuil_modeste = (params.seuil_elig_special_modeste
        + params.seuil_elig_special_modeste_add * pac)
        * vlm;
    let special_modeste = if base.valeur_locative_brute <= seuil_modeste {
        params.taux_special_modeste * vlm
    } else {
        Decimal::ZERO
    };

    // TODO: apply taux_special_invalide once every occupant's disability is an input
    let special_invalide = Decimal::ZERO;

    Abattements {
        obligatoire,
        general,
        special_modeste,
        special_invalide,
    }
}

/// Net taxable base, floored at zero.
pub fn base_nette(base: &BaseTaxeHabitation, params: &TaxeHabitationParams) -> Decimal {
    (base.valeur_locative_brute - abattements(base, params).total()).max(Decimal::ZERO)
}

/// Tax due on the main residence, negative, or zero when exempt.
pub fn tax_hab(base: &BaseTaxeHabitation, exonere: bool, params: &TaxeHabitationParams) -> Decimal {
    if exonere {
        return Decimal::ZERO;
    }
    let cotisation = base_nette(base, params) * params.taux_imposition;
    let frais_gestion = cotisation * params.frais_gestion;
    Decimal::ZERO - (cotisation + frais_gestion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::legislation::Year;
    use rust_decimal_macros::dec;

    fn params() -> TaxeHabitationParams {
        Year(2014).legislation().unwrap().taxe_habitation
    }

    fn inputs(age: u32, rfr: Decimal) -> ExonerationInputs {
        ExonerationInputs {
            age,
            nbptr: dec!(1),
            rfr,
            ..ExonerationInputs::default()
        }
    }

    #[test]
    fn ceiling_grows_with_shares() {
        let p = params();
        assert_eq!(seuil_exoneration(dec!(1), &p), dec!(10633));
        assert_eq!(seuil_exoneration(dec!(0.5), &p), dec!(10633));
        // (3 - 1) / 2 = 1 supplement
        assert_eq!(seuil_exoneration(dec!(3), &p), dec!(13472));
    }

    #[test]
    fn elderly_under_ceiling_exempt() {
        assert!(exonere_taxe_habitation(&inputs(65, dec!(9000)), &params()));
    }

    #[test]
    fn elderly_at_ceiling_not_exempt() {
        assert!(!exonere_taxe_habitation(&inputs(65, dec!(10633)), &params()));
    }

    #[test]
    fn young_under_ceiling_not_exempt() {
        assert!(!exonere_taxe_habitation(&inputs(45, dec!(5000)), &params()));
    }

    #[test]
    fn widowed_exempt_at_any_age() {
        let mut i = inputs(40, dec!(5000));
        i.statut_marital = StatutMarital::Veuf;
        assert!(exonere_taxe_habitation(&i, &params()));
    }

    #[test]
    fn wealth_tax_payers_not_exempt() {
        let mut i = inputs(70, dec!(5000));
        i.isf_tot = dec!(1200);
        assert!(!exonere_taxe_habitation(&i, &params()));
    }

    #[test]
    fn benefit_holders_exempt_regardless_of_income() {
        let setters: [fn(&mut ExonerationInputs); 3] = [
            |i| i.aah = dec!(100),
            |i| i.asi = dec!(100),
            |i| i.aspa = dec!(100),
        ];
        for set in setters {
            let mut i = inputs(30, dec!(90000));
            set(&mut i);
            assert!(exonere_taxe_habitation(&i, &params()));
        }
    }

    #[test]
    fn allowances() {
        let base = BaseTaxeHabitation {
            valeur_locative_brute: dec!(4000),
            valeur_locative_moyenne: dec!(3000),
            personnes_a_charge: 3,
        };
        let a = abattements(&base, &params());
        // (2 * 10% + 1 * 15%) * 3000
        assert_eq!(a.obligatoire, dec!(1050));
        assert_eq!(a.general, dec!(300));
        assert_eq!(a.special_modeste, dec!(0));
        assert_eq!(a.total(), dec!(1350));
        assert_eq!(base_nette(&base, &params()), dec!(2650));
    }

    #[test]
    fn modest_income_allowance_under_threshold() {
        let mut p = params();
        p.taux_special_modeste = dec!(0.05);
        let base = BaseTaxeHabitation {
            valeur_locative_brute: dec!(3000),
            valeur_locative_moyenne: dec!(3000),
            personnes_a_charge: 0,
        };
        assert_eq!(abattements(&base, &p).special_modeste, dec!(150));

        let above = BaseTaxeHabitation {
            valeur_locative_brute: dec!(4000),
            ..base
        };
        assert_eq!(abattements(&above, &p).special_modeste, dec!(0));
    }

    #[test]
    fn tax_is_negative_and_zero_when_exempt() {
        let base = BaseTaxeHabitation {
            valeur_locative_brute: dec!(4000),
            valeur_locative_moyenne: dec!(3000),
            personnes_a_charge: 3,
        };
        assert_eq!(tax_hab(&base, false, &params()), dec!(-265));
        assert_eq!(tax_hab(&base, true, &params()), dec!(0));
    }

    #[test]
    fn management_fees_added() {
        let mut p = params();
        p.frais_gestion = dec!(0.03);
        let base = BaseTaxeHabitation {
            valeur_locative_brute: dec!(4000),
            valeur_locative_moyenne: dec!(3000),
            personnes_a_charge: 3,
        };
        assert_eq!(tax_hab(&base, false, &p), dec!(-272.95));
    }

    #[test]
    fn empty_base_is_untaxed() {
        let base = BaseTaxeHabitation::default();
        assert_eq!(base_nette(&base, &params()), dec!(0));
        assert_eq!(tax_hab(&base, false, &params()), dec!(0));
    }
}
