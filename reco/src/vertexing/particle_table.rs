//! Particle properties by PDG code.

/// Static properties of a particle species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleData {
    pub pdg: i32,
    pub name: &'static str,
    /// Charge in units of e.
    pub charge: f64,
    /// Mass, GeV.
    pub mass: f64,
}

/// Lookup of species properties. Antiparticles (negative codes) carry the
/// opposite charge.
pub trait ParticleProperties {
    fn particle(&self, pdg: i32) -> Option<ParticleData>;

    fn mass(&self, pdg: i32) -> Option<f64> {
        self.particle(pdg).map(|data| data.mass)
    }

    fn charge(&self, pdg: i32) -> Option<f64> {
        self.particle(pdg).map(|data| data.charge)
    }
}

/// Built-in table of the long-lived species seen by the tracker and
/// calorimeters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdgTable;

#[rustfmt::skip]
const PARTICLES: [ParticleData; 11] = [
    ParticleData { pdg: 11, name: "e-", charge: -1.0, mass: 0.000_510_998_95 },
    ParticleData { pdg: 13, name: "mu-", charge: -1.0, mass: 0.105_658_375_5 },
    ParticleData { pdg: 22, name: "gamma", charge: 0.0, mass: 0.0 },
    ParticleData { pdg: 111, name: "pi0", charge: 0.0, mass: 0.134_976_8 },
    ParticleData { pdg: 130, name: "K0L", charge: 0.0, mass: 0.497_611 },
    ParticleData { pdg: 211, name: "pi+", charge: 1.0, mass: 0.139_570_39 },
    ParticleData { pdg: 310, name: "K0S", charge: 0.0, mass: 0.497_611 },
    ParticleData { pdg: 321, name: "K+", charge: 1.0, mass: 0.493_677 },
    ParticleData { pdg: 2112, name: "n", charge: 0.0, mass: 0.939_565_420_52 },
    ParticleData { pdg: 2212, name: "p", charge: 1.0, mass: 0.938_272_088_16 },
    ParticleData { pdg: 3122, name: "Lambda", charge: 0.0, mass: 1.115_683 },
];

impl ParticleProperties for PdgTable {
    fn particle(&self, pdg: i32) -> Option<ParticleData> {
        let code = pdg.checked_abs()?;
        PARTICLES
            .iter()
            .find(|data| data.pdg == code)
            .map(|data| ParticleData {
                pdg,
                charge: if pdg < 0 { -data.charge } else { data.charge },
                ..*data
            })
    }
}
