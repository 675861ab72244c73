//! End-to-end lifecycle tests over an in-memory store.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(missing_docs)]

mod support;

use googletest::matchers::is_empty as empty;
use googletest::prelude::*;
use serde_json::{
    Map,
    Value,
    json,
};
use support::MemoryStore;
use translatable::config::{
    ConfigError,
    StaticLocales,
    Strategy,
    TranslatableConfig,
};
use translatable::validation::{
    Rule,
    RuleSet,
    ValidationFailure,
};
use translatable::{
    Error,
    FindOptions,
    Locale,
    Record,
    Translatable,
    Translate,
};

fn provider() -> StaticLocales {
    StaticLocales::new("ja", [Locale::new("en"), Locale::new("it"), Locale::new("ja")])
}

fn artist_config() -> TranslatableConfig {
    TranslatableConfig {
        fields: vec!["name".to_string(), "profile".to_string()],
        ..TranslatableConfig::default()
    }
}

fn inline_store() -> MemoryStore {
    MemoryStore::flat(
        "artists",
        &[
            "id",
            "name",
            "profile",
            "something_else",
            "i18n_name_en",
            "i18n_name_it",
            "i18n_profile_en",
            "i18n_profile_it",
        ],
    )
}

fn data(entries: &[(&str, Value)]) -> Map<String, Value> {
    entries.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect()
}

fn inline_model() -> Translatable<MemoryStore> {
    Translatable::new(inline_store(), artist_config(), &provider()).unwrap()
}

fn nested_model() -> Translatable<MemoryStore> {
    Translatable::new(MemoryStore::structured("artists"), artist_config(), &provider()).unwrap()
}

// Scenario A: create with two locales, save, read back with full coverage.
#[test]
fn create_save_and_read_back_all_locales() {
    let mut model = inline_model();
    let mut artist = model
        .create(data(&[
            ("ja.name", json!("リチャード")),
            ("en.name", json!("Richard")),
            ("something_else", json!("Something")),
        ]))
        .unwrap();

    model.save(&mut artist, None).unwrap();

    let found = model.find_first(&FindOptions::new()).unwrap().unwrap();
    let names = model.translations(&found, "name").unwrap();

    assert_that!(names.get("ja"), some(eq(&json!("リチャード"))));
    assert_that!(names.get("en"), some(eq(&json!("Richard"))));
    assert_that!(names.get("it"), some(eq(&json!(null))));
    assert_that!(found.get("something_else"), some(eq(&json!("Something"))));
}

// Scenario B: a partial update of one locale leaves the others untouched.
#[test]
fn partial_update_preserves_sibling_locales() {
    let mut model = inline_model();
    let mut artist = model
        .create(data(&[("ja.name", json!("リチャード")), ("en.name", json!("Richard"))]))
        .unwrap();
    model.save(&mut artist, None).unwrap();

    let mut artist = model.find_first(&FindOptions::new()).unwrap().unwrap();
    model.save(&mut artist, Some(data(&[("it.name", json!("Ricardo"))]))).unwrap();

    let found = model.find_first(&FindOptions::new()).unwrap().unwrap();
    let names = model.translations(&found, "name").unwrap();

    assert_that!(names.get("ja"), some(eq(&json!("リチャード"))));
    assert_that!(names.get("en"), some(eq(&json!("Richard"))));
    assert_that!(names.get("it"), some(eq(&json!("Ricardo"))));
}

// Scenario C: querying by translated field, with and without translation
// processing.
#[test]
fn query_by_translated_field() {
    let mut model = inline_model();
    let mut artist = model
        .create(data(&[
            ("ja.name", json!("リチャード")),
            ("en.name", json!("Richard")),
            ("it.name", json!("Ricardo")),
        ]))
        .unwrap();
    model.save(&mut artist, None).unwrap();

    let found = model
        .find_first(&FindOptions::new().condition("it.name", json!("Ricardo")))
        .unwrap()
        .unwrap();
    assert_that!(
        model.translation(&found, "name", &Locale::new("it")).unwrap(),
        some(eq(&json!("Ricardo")))
    );

    let collapsed = model
        .find_first(
            &FindOptions::new()
                .condition("name", json!("Ricardo"))
                .locale("it")
                .translate(Translate::To(Locale::new("it"))),
        )
        .unwrap()
        .unwrap();
    assert_that!(collapsed.get("name"), some(eq(&json!("Ricardo"))));
    assert_that!(collapsed.i18n().is_empty(), eq(true));

    let raw = model
        .find_first(&FindOptions::new().translate(Translate::Off))
        .unwrap()
        .unwrap();
    assert_that!(raw.get("i18n_name_en"), some(eq(&json!("Richard"))));
    assert_that!(raw.i18n().is_empty(), eq(true));
}

// Scenario D: a missing composed backing field aborts setup, before any
// record is processed.
#[test]
fn missing_backing_field_fails_at_setup() {
    let store = MemoryStore::flat("artists", &["id", "name"]);
    let config = TranslatableConfig {
        locale: Some(Locale::new("en")),
        locales: vec![Locale::new("en"), Locale::new("ja")],
        fields: vec!["name".to_string()],
        strategy: Some(Strategy::Inline),
        ..TranslatableConfig::default()
    };
    let provider = StaticLocales::new("en", [Locale::new("en"), Locale::new("ja")]);

    let result = Translatable::new(store, config, &provider);

    match result {
        Err(Error::Config(ConfigError::MissingBackingField { field, locale, .. })) => {
            assert_that!(field, eq("name"));
            assert_that!(locale, eq(&Locale::new("ja")));
        }
        other => panic!("expected MissingBackingField, got {other:?}"),
    }
}

// Merge-on-write: under the nested strategy a detached partial update must
// fetch the persisted record and keep its other locales.
#[test]
fn nested_merge_on_write_fetches_persisted_translations() {
    let mut model = nested_model();
    let mut artist = model
        .create(data(&[("ja.name", json!("リチャード")), ("en.name", json!("Richard"))]))
        .unwrap();
    model.save(&mut artist, None).unwrap();
    let id = artist.get("id").cloned().unwrap();

    let mut update = Record::new();
    update.set("id", id);
    update.set_exists(true);
    model.save(&mut update, Some(data(&[("it.name", json!("Ricardo"))]))).unwrap();

    let found = model.find_first(&FindOptions::new()).unwrap().unwrap();
    let names = model.translations(&found, "name").unwrap();

    assert_that!(names.get("ja"), some(eq(&json!("リチャード"))));
    assert_that!(names.get("en"), some(eq(&json!("Richard"))));
    assert_that!(names.get("it"), some(eq(&json!("Ricardo"))));

    // The physical slot never stores the canonical locale redundantly.
    let raw = model
        .find_first(&FindOptions::new().translate(Translate::Off))
        .unwrap()
        .unwrap();
    let slot = raw.get("i18n").unwrap();
    assert_that!(slot.pointer("/name/en"), some(eq(&json!("Richard"))));
    assert_that!(slot.pointer("/name/ja"), none());
}

#[test]
fn sub_records_store_one_tagged_record_per_locale() {
    let config = TranslatableConfig {
        strategy: Some(Strategy::SubRecords),
        ..artist_config()
    };
    let mut model =
        Translatable::new(MemoryStore::structured("artists"), config, &provider()).unwrap();

    let mut artist = model
        .create(data(&[
            ("name", json!("Richard")),
            ("profile", json!("Dreaded Rasta")),
            ("locale", json!("en")),
        ]))
        .unwrap();
    model.save(&mut artist, None).unwrap();

    let found = model
        .find_first(&FindOptions::new().condition("name", json!("Richard")).locale("en"))
        .unwrap()
        .unwrap();

    assert_that!(
        model.translation(&found, "name", &Locale::new("en")).unwrap(),
        some(eq(&json!("Richard")))
    );
    assert_that!(found.validation_locale(), some(eq(&Locale::new("en"))));

    let raw = model
        .find_first(&FindOptions::new().translate(Translate::Off))
        .unwrap()
        .unwrap();
    assert_that!(
        raw.get("localizations"),
        some(eq(&json!([
            {"locale": "en", "name": "Richard", "profile": "Dreaded Rasta"}
        ])))
    );
    assert_that!(raw.get("validationLocale"), some(eq(&json!("en"))));
}

#[test]
fn second_record_is_counted_separately() {
    let mut model = inline_model();
    let mut first = model.create(data(&[("ja.name", json!("リチャード"))])).unwrap();
    model.save(&mut first, None).unwrap();
    let mut second = model
        .create(data(&[("name", json!("Richard Japper")), ("locale", json!("ja"))]))
        .unwrap();
    model.save(&mut second, None).unwrap();

    assert_that!(model.store().len(), eq(2));

    let found = model
        .find_first(&FindOptions::new().condition("name", json!("Richard Japper")).locale("ja"))
        .unwrap()
        .unwrap();
    assert_that!(found.get("name"), some(eq(&json!("Richard Japper"))));
}

#[test]
fn find_without_match_returns_none() {
    let model = inline_model();

    let found = model
        .find_first(&FindOptions::new().condition("name", json!("Nobody")))
        .unwrap();

    assert_that!(found, none());
}

fn name_rules() -> RuleSet {
    RuleSet::from([(
        "name".to_string(),
        vec![
            Rule::new("notEmpty").with_message("Name should not be empty."),
            Rule::new("lengthBetween")
                .with_option("min", json!(4))
                .with_option("max", json!(20)),
        ],
    )])
}

// Missing translations pass validation; the canonical locale stays
// mandatory.
#[test]
fn validation_is_relaxed_for_missing_translations() {
    let model = inline_model();
    let artist = model.create(data(&[("ja.name", json!("リチャード"))])).unwrap();

    let failures = model.validates(&artist, &name_rules()).unwrap();

    assert_that!(failures, empty());
}

#[test]
fn present_translations_are_still_validated() {
    let model = inline_model();
    let artist = model
        .create(data(&[("ja.name", json!("リチャード")), ("en.name", json!("abc"))]))
        .unwrap();

    let failures = model.validates(&artist, &name_rules()).unwrap();

    assert_that!(
        failures,
        elements_are![all![
            field!(ValidationFailure.field, eq("i18n.name.en")),
            field!(ValidationFailure.rule, eq("lengthBetween")),
        ]]
    );
}

#[test]
fn canonical_locale_remains_required() {
    let model = inline_model();
    let artist = model.create(data(&[("something_else", json!("Something"))])).unwrap();

    let failures = model.validates(&artist, &name_rules()).unwrap();

    assert_that!(failures.iter().any(|f| f.field == "name"), eq(true));
}
