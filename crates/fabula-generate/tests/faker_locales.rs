use std::sync::Arc;
use std::thread;

use fabula_core::{build_reference_graph_report, validate_locale};
use fabula_generate::{Faker, LocaleKey};

#[test]
fn locale_keys_parse_common_spellings() {
    assert_eq!(LocaleKey::parse("en_US"), Some(LocaleKey::En));
    assert_eq!(LocaleKey::parse("nb-NO"), Some(LocaleKey::NbNo));
    assert_eq!(LocaleKey::parse("nb_no"), Some(LocaleKey::NbNo));
    assert_eq!(LocaleKey::parse("xx"), None);
    assert_eq!(LocaleKey::NbNo.to_string(), "nb_no");
}

#[test]
fn bundled_locales_validate_against_fallback() {
    let fallback = LocaleKey::FALLBACK.load().expect("fallback loads");
    for key in LocaleKey::ALL {
        let store = key.load().expect("bundled locale loads");
        let report = validate_locale(&store, Some(&fallback)).expect("validation runs");
        assert!(report.is_ok(), "{key}: {:?}", report.errors);
        let graph = build_reference_graph_report(&store).expect("graph builds");
        assert!(graph.cycle.is_none(), "{key}: {:?}", graph.cycle);
    }
}

#[test]
fn every_bundled_leaf_resolves() {
    for key in LocaleKey::ALL {
        let faker = Faker::from_key(*key).expect("faker builds").seeded(7);
        let store = key.load().unwrap();
        for (path, _) in store.leaves() {
            let value = faker.fetch(&path);
            assert!(value.is_ok(), "{key} {path}: {:?}", value.err());
        }
    }
}

#[test]
fn norwegian_names_reference_their_own_tables() {
    let faker = Faker::from_key(LocaleKey::NbNo).unwrap().seeded(3);
    for _ in 0..50 {
        let street = faker.fetch("address.street_address").unwrap();
        assert!(!street.contains("#{"), "{street}");
        let company = faker.fetch("company.name").unwrap();
        assert!(!company.contains("#{"), "{company}");
    }
}

#[test]
fn fallback_fills_paths_missing_from_active_locale() {
    let faker = Faker::from_key(LocaleKey::NbNo).unwrap().seeded(3);
    let passport = faker.fetch("identifier.passport").unwrap();
    assert_eq!(passport.len(), 9, "{passport}");
    assert!(passport[..2].chars().all(|ch| ch.is_ascii_uppercase()));
    assert!(passport[2..].chars().all(|ch| ch.is_ascii_digit()));
}

#[test]
fn seeded_fakers_agree() {
    let left = Faker::from_key(LocaleKey::En).unwrap().seeded(99);
    let right = Faker::from_key(LocaleKey::En).unwrap().seeded(99);
    for _ in 0..25 {
        assert_eq!(
            left.fetch("address.full_address").unwrap(),
            right.fetch("address.full_address").unwrap()
        );
        assert_eq!(
            left.regexify("[A-F0-9]{8}").unwrap(),
            right.regexify("[A-F0-9]{8}").unwrap()
        );
    }
}

#[test]
fn bothified_fetch_fills_placeholders() {
    let faker = Faker::from_key(LocaleKey::En).unwrap().seeded(5);
    for _ in 0..20 {
        let value = faker.fetch_bothified("address.secondary_address").unwrap();
        assert!(!value.contains('#'), "{value}");
    }
}

#[test]
fn swapping_locale_changes_resolution() {
    let faker = Faker::from_key(LocaleKey::En).unwrap().seeded(1);
    assert_eq!(faker.active_locale_name().unwrap(), "en");
    assert_eq!(
        faker.fetch("address.default_country").unwrap(),
        "United States of America"
    );

    faker.set_locale_key(LocaleKey::NbNo).unwrap();
    assert_eq!(faker.active_locale_name().unwrap(), "nb_no");
    assert_eq!(faker.fetch("address.default_country").unwrap(), "Norge");
}

#[test]
fn facade_is_shareable_across_threads() {
    let faker = Arc::new(Faker::from_key(LocaleKey::NbNo).unwrap().seeded(11));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let faker = Arc::clone(&faker);
            thread::spawn(move || {
                (0..50)
                    .map(|_| faker.fetch("name.name").map(|name| !name.is_empty()))
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    for handle in handles {
        let results = handle.join().expect("worker finished");
        assert!(results.into_iter().all(|ok| ok.unwrap_or(false)));
    }
}

#[test]
fn facade_primitives_follow_degenerate_range_policy() {
    let faker = Faker::from_key(LocaleKey::En).unwrap().seeded(2);
    assert_eq!(faker.random_int(4, 1).unwrap(), 4);
    assert_eq!(faker.random_int64(7, 7).unwrap(), 7);
    assert_eq!(faker.random_repeat("x", 3, 3).unwrap(), "xxx");
    assert_eq!(faker.random_choice::<u8>(&[]).unwrap(), None);
    assert_eq!(faker.random_alphanumeric(12).len(), 12);
    let digits = faker.numerify("###").unwrap();
    assert!(!digits.starts_with('0'));
    assert!(faker.letterify("??").unwrap().chars().all(|ch| ch.is_ascii_uppercase()));
}

#[test]
fn global_faker_uses_fallback_locale() {
    let faker = Faker::global().expect("global faker");
    assert_eq!(faker.active_locale_name().unwrap(), "en");
    assert!(!faker.fetch("name.name").unwrap().is_empty());
}

#[test]
fn zero_max_depth_is_clamped() {
    let faker = Faker::from_key(LocaleKey::En)
        .unwrap()
        .seeded(4)
        .with_max_depth(0);
    assert!(!faker.fetch("name.first_name").unwrap().is_empty());
}
