//! Citizen name generation from fixed tables
//!
//! Names come from the injected random source so replays spawn the same
//! people. Names are not guaranteed unique; saves carry the citizen id for
//! stable re-linking.

use crate::core::rng::{pick, RandomSource};
use crate::world::citizen::Gender;

const MALE_GIVEN: &[&str] = &[
    "Aleksei", "Boris", "Dmitri", "Fyodor", "Grigory", "Igor", "Ivan", "Lev", "Mikhail",
    "Nikolai", "Oleg", "Pavel", "Pyotr", "Sergei", "Vasily", "Yuri",
];

const FEMALE_GIVEN: &[&str] = &[
    "Anna", "Darya", "Galina", "Irina", "Katya", "Lyudmila", "Maria", "Natasha", "Nina",
    "Olga", "Raisa", "Svetlana", "Tatyana", "Vera", "Yelena", "Zoya",
];

const SURNAMES: &[&str] = &[
    "Antonov", "Belov", "Fedorov", "Golubev", "Ivanov", "Kozlov", "Kuznetsov", "Lebedev",
    "Morozov", "Nikitin", "Orlov", "Petrov", "Smirnov", "Sokolov", "Volkov", "Zaitsev",
];

/// Generate a full name for a new citizen
pub fn generate_name(rng: &mut dyn RandomSource, gender: Gender) -> String {
    let given_pool = match gender {
        Gender::Male => MALE_GIVEN,
        Gender::Female => FEMALE_GIVEN,
    };
    let given = pick(rng, given_pool).copied().unwrap_or("Comrade");
    let surname = pick(rng, SURNAMES).copied().unwrap_or("Ivanov");
    match gender {
        Gender::Male => format!("{} {}", given, surname),
        Gender::Female => format!("{} {}a", given, surname),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::SeededRng;

    #[test]
    fn test_names_deterministic_per_seed() {
        let mut a = SeededRng::new(11);
        let mut b = SeededRng::new(11);
        for _ in 0..20 {
            assert_eq!(
                generate_name(&mut a, Gender::Male),
                generate_name(&mut b, Gender::Male)
            );
        }
    }

    #[test]
    fn test_female_surname_suffix() {
        let mut rng = SeededRng::new(5);
        let name = generate_name(&mut rng, Gender::Female);
        assert!(name.ends_with('a'), "female surnames take -a: {}", name);
    }
}
