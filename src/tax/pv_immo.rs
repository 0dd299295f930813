//! Impôt sur le revenu afférent à la plus-value immobilière
//! (CGI art. 150 U, 150 UC-I and 150 UD), following form 2048-IMM-SD.

use super::legislation::{PvImmoParams, Tranche};
use crate::core::{CessionImmobiliere, Frais};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Flat acquisition costs for an onerous acquisition, share of line 20
const FORFAIT_FRAIS_ACQUISITION: Decimal = dec!(0.075);
/// Flat works allowance for a built property, share of line 20
const FORFAIT_TRAVAUX: Decimal = dec!(0.15);
/// The flat works allowance needs more than this many years of holding
const DUREE_FORFAIT_TRAVAUX: u32 = 5;

/// Lines of a 2048-IMM-SD page 2 for one disposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LignesCession {
    /// Line 13
    pub prix_cession_corrige: Decimal,
    /// Line 25
    pub prix_acquisition_corrige: Decimal,
    pub plus_value_brute: Decimal,
    /// Line 41
    pub duree_detention: u32,
    pub taux_abattement: Decimal,
    /// Line 46
    pub plus_value_nette: Decimal,
}

/// Full years between acquisition and sale.
pub fn duree_detention(acquisition: NaiveDate, cession: NaiveDate) -> u32 {
    cession.years_since(acquisition).unwrap_or(0)
}

/// Line 13: line 10 + line 11 - line 12.
pub fn prix_cession_corrige(cession: &CessionImmobiliere) -> Decimal {
    cession.prix_cession + cession.charges_cession - cession.frais_cession
}

/// Line 25: lines 20 to 24.
pub fn prix_acquisition_corrige(cession: &CessionImmobiliere) -> Decimal {
    let prix = cession.prix_acquisition;
    let duree = duree_detention(cession.date_acquisition, cession.date_cession);

    let frais = match cession.frais_acquisition {
        Some(Frais::Reel { montant }) => montant,
        Some(Frais::Forfait) if cession.a_titre_gratuit => {
            log::warn!("flat acquisition costs do not apply to a free acquisition");
            Decimal::ZERO
        }
        Some(Frais::Forfait) => prix * FORFAIT_FRAIS_ACQUISITION,
        None => Decimal::ZERO,
    };

    let travaux = match cession.travaux {
        Some(Frais::Reel { montant }) => montant,
        Some(Frais::Forfait) if cession.immeuble_bati && duree > DUREE_FORFAIT_TRAVAUX => {
            prix * FORFAIT_TRAVAUX
        }
        Some(Frais::Forfait) => {
            log::warn!("flat works allowance needs a built property held more than {DUREE_FORFAIT_TRAVAUX} years");
            Decimal::ZERO
        }
        None => Decimal::ZERO,
    };

    prix + cession.charges_acquisition + frais + travaux + cession.frais_voirie
}

pub fn plus_value_brute(cession: &CessionImmobiliere) -> Decimal {
    prix_cession_corrige(cession) - prix_acquisition_corrige(cession)
}

/// Allowance rate for the holding period, capped at 100%.
pub fn taux_abattement(duree: u32, abattements: &[Tranche]) -> Decimal {
    let duree = Decimal::from(duree);
    let mut taux = Decimal::ZERO;
    for (i, tranche) in abattements.iter().enumerate() {
        let debut = Decimal::from(tranche.apres);
        let fin = abattements
            .get(i + 1)
            .map_or(duree, |next| duree.min(Decimal::from(next.apres)));
        taux += (fin - debut).max(Decimal::ZERO) * tranche.taux;
    }
    taux.min(Decimal::ONE)
}

/// Line 46: gross gain after the holding allowance and the line 45
/// exemption, floored at zero.
pub fn plus_value_nette(
    plus_value_brute: Decimal,
    duree: u32,
    exoneration: Decimal,
    params: &PvImmoParams,
) -> Decimal {
    let taux = taux_abattement(duree, &params.abattements);
    let imposable = (Decimal::ONE - taux) * plus_value_brute;
    (imposable - exoneration).max(Decimal::ZERO)
}

pub fn lignes_cession(cession: &CessionImmobiliere, params: &PvImmoParams) -> LignesCession {
    let duree = duree_detention(cession.date_acquisition, cession.date_cession);
    let brute = plus_value_brute(cession);
    LignesCession {
        prix_cession_corrige: prix_cession_corrige(cession),
        prix_acquisition_corrige: prix_acquisition_corrige(cession),
        plus_value_brute: brute,
        duree_detention: duree,
        taux_abattement: taux_abattement(duree, &params.abattements),
        plus_value_nette: plus_value_nette(brute, duree, cession.exoneration, params),
    }
}

/// Line 50: total of line 46 over every disposal.
pub fn plus_value_nette_globale(cessions: &[CessionImmobiliere], params: &PvImmoParams) -> Decimal {
    cessions
        .iter()
        .map(|c| lignes_cession(c, params).plus_value_nette)
        .sum()
}

/// Line 61 for residents. Amounts due are negative.
pub fn ir_pv_immo(f3vz: Decimal, params: &PvImmoParams) -> Decimal {
    Decimal::ZERO - params.taux * f3vz
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::legislation::Year;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn cession(acquired: &str, sold: &str, prix_acquisition: Decimal, prix_cession: Decimal) -> CessionImmobiliere {
        CessionImmobiliere {
            date_acquisition: date(acquired),
            date_cession: date(sold),
            prix_cession,
            charges_cession: Decimal::ZERO,
            frais_cession: Decimal::ZERO,
            prix_acquisition,
            charges_acquisition: Decimal::ZERO,
            frais_acquisition: None,
            a_titre_gratuit: false,
            travaux: None,
            immeuble_bati: true,
            frais_voirie: Decimal::ZERO,
            exoneration: Decimal::ZERO,
        }
    }

    fn params(year: i32) -> PvImmoParams {
        Year(year).legislation().unwrap().pv_immo
    }

    #[test]
    fn holding_period_counts_full_years() {
        assert_eq!(duree_detention(date("2000-06-15"), date("2010-06-14")), 9);
        assert_eq!(duree_detention(date("2000-06-15"), date("2010-06-15")), 10);
        assert_eq!(duree_detention(date("2010-01-01"), date("2009-01-01")), 0);
    }

    #[test]
    fn corrected_prices() {
        let mut c = cession("2000-01-01", "2010-01-01", dec!(100000), dec!(200000));
        c.charges_cession = dec!(1000);
        c.frais_cession = dec!(3000);
        c.charges_acquisition = dec!(500);
        c.frais_voirie = dec!(200);
        assert_eq!(prix_cession_corrige(&c), dec!(198000));
        assert_eq!(prix_acquisition_corrige(&c), dec!(100700));
        assert_eq!(plus_value_brute(&c), dec!(97300));
    }

    #[test]
    fn flat_costs() {
        let mut c = cession("2000-01-01", "2010-01-01", dec!(100000), dec!(200000));
        c.frais_acquisition = Some(Frais::Forfait);
        c.travaux = Some(Frais::Forfait);
        // 100000 + 7.5% + 15%
        assert_eq!(prix_acquisition_corrige(&c), dec!(122500));
    }

    #[test]
    fn flat_costs_denied() {
        let mut c = cession("2008-01-01", "2010-01-01", dec!(100000), dec!(200000));
        c.frais_acquisition = Some(Frais::Forfait);
        c.a_titre_gratuit = true;
        c.travaux = Some(Frais::Forfait);
        assert_eq!(prix_acquisition_corrige(&c), dec!(100000));
    }

    #[test]
    fn actual_costs() {
        let mut c = cession("2008-01-01", "2010-01-01", dec!(100000), dec!(200000));
        c.frais_acquisition = Some(Frais::Reel { montant: dec!(6000) });
        c.travaux = Some(Frais::Reel { montant: dec!(20000) });
        assert_eq!(prix_acquisition_corrige(&c), dec!(126000));
    }

    #[test]
    fn allowance_before_2012() {
        let p = params(2010);
        assert_eq!(taux_abattement(5, &p.abattements), dec!(0));
        assert_eq!(taux_abattement(8, &p.abattements), dec!(0.30));
        assert_eq!(taux_abattement(15, &p.abattements), dec!(1));
        assert_eq!(taux_abattement(30, &p.abattements), dec!(1));
    }

    #[test]
    fn allowance_2012_brackets() {
        let p = params(2012);
        // 12 years at 2%
        assert_eq!(taux_abattement(17, &p.abattements), dec!(0.24));
        // 12 at 2%, 7 at 4%, 2 at 8%
        assert_eq!(taux_abattement(26, &p.abattements), dec!(0.68));
        assert_eq!(taux_abattement(30, &p.abattements), dec!(1));
    }

    #[test]
    fn allowance_since_2014_exempts_after_22_years() {
        let p = params(2015);
        assert_eq!(taux_abattement(10, &p.abattements), dec!(0.30));
        assert_eq!(taux_abattement(21, &p.abattements), dec!(0.96));
        assert_eq!(taux_abattement(22, &p.abattements), dec!(1));
        assert_eq!(taux_abattement(40, &p.abattements), dec!(1));
    }

    #[test]
    fn net_gain_applies_allowance_and_exemption() {
        let p = params(2015);
        assert_eq!(plus_value_nette(dec!(100000), 10, dec!(0), &p), dec!(70000));
        assert_eq!(plus_value_nette(dec!(100000), 10, dec!(20000), &p), dec!(50000));
    }

    #[test]
    fn net_gain_never_negative() {
        let p = params(2015);
        assert_eq!(plus_value_nette(dec!(-5000), 3, dec!(0), &p), dec!(0));
        assert_eq!(plus_value_nette(dec!(1000), 3, dec!(5000), &p), dec!(0));
    }

    #[test]
    fn global_net_gain_sums_disposals() {
        let p = params(2015);
        let cessions = vec![
            // 10 years held, 30% allowance
            cession("2005-03-01", "2015-03-01", dec!(100000), dec!(200000)),
            // loss
            cession("2010-03-01", "2015-03-01", dec!(100000), dec!(90000)),
        ];
        assert_eq!(plus_value_nette_globale(&cessions, &p), dec!(70000));
    }

    #[test]
    fn lines_of_one_disposal() {
        let p = params(2015);
        let c = cession("2005-03-01", "2015-03-01", dec!(100000), dec!(200000));
        let lignes = lignes_cession(&c, &p);
        assert_eq!(lignes.duree_detention, 10);
        assert_eq!(lignes.taux_abattement, dec!(0.30));
        assert_eq!(lignes.plus_value_brute, dec!(100000));
        assert_eq!(lignes.plus_value_nette, dec!(70000));
    }

    #[test]
    fn income_tax_is_negative() {
        assert_eq!(ir_pv_immo(dec!(70000), &params(2015)), dec!(-13300));
        assert_eq!(ir_pv_immo(dec!(10000), &params(2008)), dec!(-1600));
        assert_eq!(ir_pv_immo(dec!(0), &params(2015)), dec!(0));
    }
}
