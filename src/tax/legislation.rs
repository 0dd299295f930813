use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LegislationError {
    #[error("no legislation available for {0}")]
    UnsupportedYear(Year),
}

/// Calendar year a simulation is run for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Year(pub i32);

impl Year {
    pub const FIRST_SUPPORTED: Year = Year(2004);

    pub fn legislation(self) -> Result<Legislation, LegislationError> {
        if self < Self::FIRST_SUPPORTED {
            return Err(LegislationError::UnsupportedYear(self));
        }
        Ok(Legislation {
            year: self,
            pv_immo: self.pv_immo(),
            taxe_habitation: self.taxe_habitation(),
        })
    }

    /// Holding-period allowance and flat rate on property gains
    /// (CGI art. 150 VC and 200 B)
    fn pv_immo(self) -> PvImmoParams {
        let abattements = match self.0 {
            // 2013-09 reform, income tax part: 6% from the 6th to the 21st
            // year, 4% for the 22nd
            2014.. => vec![
                Tranche::new(5, dec!(0.06)),
                Tranche::new(21, dec!(0.04)),
                Tranche::new(22, dec!(0)),
            ],
            2012..=2013 => vec![
                Tranche::new(5, dec!(0.02)),
                Tranche::new(17, dec!(0.04)),
                Tranche::new(24, dec!(0.08)),
            ],
            _ => vec![Tranche::new(5, dec!(0.10))],
        };
        let taux = match self.0 {
            2011.. => dec!(0.19),
            _ => dec!(0.16),
        };
        PvImmoParams { abattements, taux }
    }

    /// Income ceilings of CGI art. 1417-I (metropolitan France) and the
    /// default local rates.
    fn taxe_habitation(self) -> TaxeHabitationParams {
        let (plaf_th_1, plaf_th_supp) = match self.0 {
            2017.. => (dec!(10708), dec!(2859)),
            2016 => (dec!(10697), dec!(2856)),
            2015 => (dec!(10686), dec!(2853)),
            2014 => (dec!(10633), dec!(2839)),
            2011..=2013 => (dec!(10024), dec!(2676)),
            _ => (dec!(9876), dec!(2637)),
        };
        TaxeHabitationParams {
            plaf_th_1,
            plaf_th_supp,
            ..TaxeHabitationParams::default()
        }
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters in force for one year
#[derive(Debug, Clone, Serialize)]
pub struct Legislation {
    pub year: Year,
    pub pv_immo: PvImmoParams,
    pub taxe_habitation: TaxeHabitationParams,
}

/// Allowance bracket: `taux` per full year held beyond `apres` years, up to
/// the start of the next bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tranche {
    pub apres: u32,
    pub taux: Decimal,
}

impl Tranche {
    pub fn new(apres: u32, taux: Decimal) -> Self {
        Tranche { apres, taux }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PvImmoParams {
    /// Brackets ordered by `apres`
    pub abattements: Vec<Tranche>,
    /// Flat income tax rate on the net gain
    pub taux: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxeHabitationParams {
    pub plaf_th_1: Decimal,
    /// Supplement to the ceiling, scaled by the tax shares beyond the first
    pub plaf_th_supp: Decimal,
    pub taux_minimal_2_premiers: Decimal,
    pub majoration_2_premiers: Decimal,
    pub taux_minimal_3_et_plus: Decimal,
    pub majoration_3_et_plus: Decimal,
    /// When non-zero, `taux_abattement_general_base` is expected to be zero
    pub abattement_general_base_forfaitaire: Decimal,
    pub taux_abattement_general_base: Decimal,
    pub taux_special_modeste: Decimal,
    /// Share of the average rental value under which the modest-income
    /// allowance applies
    pub seuil_elig_special_modeste: Decimal,
    /// Added to the threshold per dependent
    pub seuil_elig_special_modeste_add: Decimal,
    pub taux_special_invalide: Decimal,
    /// Rate voted by the local authorities
    pub taux_imposition: Decimal,
    pub frais_gestion: Decimal,
}

impl Default for TaxeHabitationParams {
    fn default() -> Self {
        TaxeHabitationParams {
            plaf_th_1: Decimal::ZERO,
            plaf_th_supp: Decimal::ZERO,
            taux_minimal_2_premiers: dec!(0.10),
            majoration_2_premiers: Decimal::ZERO,
            taux_minimal_3_et_plus: dec!(0.15),
            majoration_3_et_plus: Decimal::ZERO,
            abattement_general_base_forfaitaire: Decimal::ZERO,
            taux_abattement_general_base: dec!(0.10),
            taux_special_modeste: Decimal::ZERO,
            seuil_elig_special_modeste: dec!(1.3),
            seuil_elig_special_modeste_add: dec!(0.1),
            taux_special_invalide: dec!(0.1),
            taux_imposition: dec!(0.10),
            frais_gestion: Decimal::ZERO,
        }
    }
}
