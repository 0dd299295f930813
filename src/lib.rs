//! Entity and role model of the French tax-benefit system, with the
//! property capital gains tax and housing tax formulas built on it.

pub mod cmd;
pub mod core;
pub mod tax;
