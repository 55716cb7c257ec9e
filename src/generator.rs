//! Synthetic persona generation.
//!
//! Values come from the `fake` crate's English-locale fakers, driven by a
//! single [`StdRng`]. [`PersonaGenerator::new`] seeds it from the wall clock,
//! so two runs never produce the same batch; [`PersonaGenerator::with_seed`]
//! makes a batch reproducible.

use crate::model::{DOCUMENT_TYPES, Persona, Personal, PersonalDocuments, Personas};
use fake::Fake;
use fake::faker::address::en::{CityName, StateName};
use fake::faker::internet::en::SafeEmail;
use fake::faker::job::en::Title;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

pub struct PersonaGenerator {
    rng: StdRng,
}

impl Default for PersonaGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonaGenerator {
    /// Generator seeded from the current time.
    #[must_use]
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        #[allow(clippy::cast_possible_truncation)]
        Self::with_seed(nanos as u64)
    }

    /// Generator with a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        debug!(seed, "seeding persona generator");
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Produce `quantity` personas, in generation order.
    pub fn generate(&mut self, quantity: usize) -> Personas {
        let persona = (0..quantity).map(|_| self.persona()).collect();
        Personas { persona }
    }

    /// One fully populated rich persona.
    pub fn persona(&mut self) -> Persona {
        let person_id = uuid::Builder::from_random_bytes(self.rng.random())
            .into_uuid()
            .to_string();
        let personal = self.personal();
        Persona {
            person_id,
            personal,
            status: self.rng.random_bool(0.5),
        }
    }

    fn personal(&mut self) -> Personal {
        let rng = &mut self.rng;
        Personal {
            name: Name().fake_with_rng(rng),
            email: SafeEmail().fake_with_rng(rng),
            phone: PhoneNumber().fake_with_rng(rng),
            hometown: CityName().fake_with_rng(rng),
            birth_state: StateName().fake_with_rng(rng),
            profession: Title().fake_with_rng(rng),
            income: format!("{},00", rng.random_range(1000..10000)),
            personal_documents: self.documents(),
        }
    }

    fn documents(&mut self) -> PersonalDocuments {
        let rng = &mut self.rng;
        let document_type = DOCUMENT_TYPES[rng.random_range(0..DOCUMENT_TYPES.len())].to_string();
        let document_number = format!(
            "{:03}-{:02}-{:04}",
            rng.random_range(1..900),
            rng.random_range(1..100),
            rng.random_range(1..10000)
        );
        PersonalDocuments {
            document_type,
            document_number,
        }
    }
}
