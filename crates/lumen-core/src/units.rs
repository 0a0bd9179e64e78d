//! Physical constants in cgs units.
//!
//! The solver works in cgs throughout; these are the values Lumen uses when
//! building models. [`UNITS`] exposes the same values as a lookup table.

/// Astronomical unit, cm.
pub const AU: f64 = 1.495_978_707_00e13;

/// Speed of light in vacuum, cm/s.
pub const C: f64 = 2.997_924_58e10;

/// Newtonian gravitational constant, cm³/g/s².
pub const G: f64 = 6.673_84e-8;

/// Solar luminosity, erg/s.
pub const L_SUN: f64 = 3.828e33;

/// Earth mass, g.
pub const M_EARTH: f64 = 5.9726e27;

/// Solar mass, g.
pub const M_SUN: f64 = 1.9885e33;

/// Earth radius, cm.
pub const R_EARTH: f64 = 6.378_137e8;

/// Solar radius, cm.
pub const R_SUN: f64 = 6.9551e10;

/// Proton mass, g.
pub const M_H: f64 = 1.672_621_898e-24;

/// Boltzmann constant, erg/K.
pub const K_B: f64 = 1.380_648_52e-16;

/// Planck constant, erg s.
pub const H: f64 = 6.626_075_5e-27;

/// One row of [`UNITS`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Unit {
    /// Short symbolic name.
    pub name: &'static str,
    /// Value in cgs.
    pub value: f64,
    /// cgs unit string.
    pub unit: &'static str,
}

/// Every constant in this module, by name.
pub static UNITS: &[Unit] = &[
    Unit { name: "au", value: AU, unit: "cm" },
    Unit { name: "c", value: C, unit: "cm/s" },
    Unit { name: "G", value: G, unit: "cm^3/g/s^2" },
    Unit { name: "Lsun", value: L_SUN, unit: "erg/s" },
    Unit { name: "MEarth", value: M_EARTH, unit: "g" },
    Unit { name: "MSun", value: M_SUN, unit: "g" },
    Unit { name: "REarth", value: R_EARTH, unit: "cm" },
    Unit { name: "RSun", value: R_SUN, unit: "cm" },
    Unit { name: "mH", value: M_H, unit: "g" },
    Unit { name: "kB", value: K_B, unit: "erg/K" },
    Unit { name: "h", value: H, unit: "erg s" },
];

/// Look a constant up by its [`Unit::name`].
pub fn lookup(name: &str) -> Option<&'static Unit> {
    UNITS.iter().find(|u| u.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_constants() {
        assert_eq!(lookup("au").map(|u| u.value), Some(AU));
        assert_eq!(lookup("MSun").map(|u| u.value), Some(M_SUN));
        assert!(lookup("parsec").is_none());
    }

    #[test]
    fn names_are_unique() {
        for (i, a) in UNITS.iter().enumerate() {
            assert!(UNITS[i + 1..].iter().all(|b| b.name != a.name));
        }
    }
}
