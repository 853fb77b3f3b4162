use rand::Rng;
use rand::seq::IndexedRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUp {
    RapidFire,
    MultiShot,
    Firewall,
}

impl PowerUp {
    pub const ALL: [PowerUp; 3] = [PowerUp::RapidFire, PowerUp::MultiShot, PowerUp::Firewall];

    pub fn get_name(&self) -> &'static str {
        match self {
            PowerUp::RapidFire => "Rapid Fire",
            PowerUp::MultiShot => "Multi Shot",
            PowerUp::Firewall => "Firewall",
        }
    }
}

/// Sticky power-up flags. Granted on level-up, cleared only by a session reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerUps {
    pub rapid_fire: bool,
    pub multi_shot: bool,
    pub firewall: bool,
}

impl PowerUps {
    pub fn has(&self, power_up: PowerUp) -> bool {
        match power_up {
            PowerUp::RapidFire => self.rapid_fire,
            PowerUp::MultiShot => self.multi_shot,
            PowerUp::Firewall => self.firewall,
        }
    }

    pub fn set(&mut self, power_up: PowerUp) {
        match power_up {
            PowerUp::RapidFire => self.rapid_fire = true,
            PowerUp::MultiShot => self.multi_shot = true,
            PowerUp::Firewall => self.firewall = true,
        }
    }

    pub fn active(&self) -> impl Iterator<Item = PowerUp> + '_ {
        PowerUp::ALL.into_iter().filter(|p| self.has(*p))
    }

    /// Grants one power-up picked uniformly among those not yet held.
    /// Returns `None` once every flag is already set.
    pub fn grant_random(&mut self, rng: &mut impl Rng) -> Option<PowerUp> {
        let missing: Vec<PowerUp> = PowerUp::ALL
            .into_iter()
            .filter(|p| !self.has(*p))
            .collect();
        let granted = *missing.choose(rng)?;
        self.set(granted);
        Some(granted)
    }
}
