//! Pre-built persona datasets for tests.

use crate::model::FlatPersona;

/// A small batch of flat personas.
///
/// # Example
///
/// ```
/// use persona_forge::testing::sample_flat_personas;
///
/// let people = sample_flat_personas();
/// assert_eq!(people.len(), 4);
/// ```
#[must_use]
pub fn sample_flat_personas() -> Vec<FlatPersona> {
    [
        ("Ana Souza", "ana.souza@example.com", "7c1e7d1a-0b8e-4f52-9a54-4bb7a1f3c001"),
        ("Bruno Lima", "bruno.lima@example.com", "7c1e7d1a-0b8e-4f52-9a54-4bb7a1f3c002"),
        ("Carla Dias", "carla.dias@example.com", "7c1e7d1a-0b8e-4f52-9a54-4bb7a1f3c003"),
        ("Davi Rocha", "davi.rocha@example.com", "7c1e7d1a-0b8e-4f52-9a54-4bb7a1f3c004"),
    ]
    .into_iter()
    .map(|(name, email, id)| FlatPersona {
        name: name.to_string(),
        email: email.to_string(),
        id: id.to_string(),
    })
    .collect()
}

/// Serialize flat personas as the bare JSON array the converter reads.
///
/// # Panics
///
/// Never in practice: `FlatPersona` only holds strings.
#[must_use]
pub fn flat_personas_json(people: &[FlatPersona]) -> String {
    serde_json::to_string(people).expect("flat personas serialize")
}
