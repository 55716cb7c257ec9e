use persona_forge::PersonaGenerator;
use persona_forge::model::DOCUMENT_TYPES;
use std::collections::HashSet;

#[test]
fn zero_quantity_is_empty() {
    let personas = PersonaGenerator::with_seed(1).generate(0);
    assert!(personas.is_empty());
}

#[test]
fn every_field_is_populated() -> anyhow::Result<()> {
    let personas = PersonaGenerator::new().generate(100);
    assert_eq!(personas.len(), 100);

    let mut ids = HashSet::new();
    for p in &personas.persona {
        uuid::Uuid::parse_str(&p.person_id)?;
        assert!(ids.insert(p.person_id.clone()), "duplicate id {}", p.person_id);

        let personal = &p.personal;
        for (field, value) in [
            ("name", &personal.name),
            ("email", &personal.email),
            ("phone", &personal.phone),
            ("hometown", &personal.hometown),
            ("birthState", &personal.birth_state),
            ("profession", &personal.profession),
            ("documentNumber", &personal.personal_documents.document_number),
        ] {
            assert!(!value.is_empty(), "{field} empty for {}", p.person_id);
        }
        assert!(personal.email.contains('@'));
    }
    Ok(())
}

#[test]
fn income_and_documents_follow_their_formats() -> anyhow::Result<()> {
    let personas = PersonaGenerator::with_seed(42).generate(200);
    for p in &personas.persona {
        let income = &p.personal.income;
        let whole = income
            .strip_suffix(",00")
            .ok_or_else(|| anyhow::anyhow!("income {income} lacks cents"))?;
        let n: u32 = whole.parse()?;
        assert!((1000..10000).contains(&n), "income {n} out of range");

        let docs = &p.personal.personal_documents;
        assert!(DOCUMENT_TYPES.contains(&docs.document_type.as_str()));
        let parts: Vec<_> = docs.document_number.split('-').collect();
        assert_eq!(
            parts.iter().map(|s| s.len()).collect::<Vec<_>>(),
            vec![3, 2, 4]
        );
        assert!(parts.iter().all(|s| s.bytes().all(|b| b.is_ascii_digit())));
    }
    Ok(())
}

#[test]
fn seeded_generators_agree() {
    let a = PersonaGenerator::with_seed(7).generate(25);
    let b = PersonaGenerator::with_seed(7).generate(25);
    let c = PersonaGenerator::with_seed(8).generate(25);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn status_takes_both_values() {
    let personas = PersonaGenerator::with_seed(3).generate(200);
    let active = personas.persona.iter().filter(|p| p.status).count();
    assert!(active > 0 && active < 200);
}
