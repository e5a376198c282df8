use dynform::{
    Catalog, FormSession, MemoryStore,
    form::{CARD_NUMBER_MESSAGE, SessionError, SessionPhase, SubmitOutcome},
    storage::STORAGE_KEY,
};

const USER: &str = "User Information";
const PAYMENT: &str = "Payment Information";

fn session() -> FormSession<MemoryStore> {
    FormSession::new(Catalog::builtin(), MemoryStore::new())
}

fn submit_user(session: &mut FormSession<MemoryStore>, first: &str, last: &str, age: &str) {
    session.select_category(USER);
    session.input("firstName", first);
    session.input("lastName", last);
    session.input("age", age);
    let outcome = session.submit().expect("submit");
    assert!(matches!(outcome, SubmitOutcome::Created { .. }));
}

#[test]
fn selecting_a_category_exposes_its_fields_only() {
    let mut session = session();
    assert_eq!(session.phase(), SessionPhase::Unselected);
    session.select_category(PAYMENT);

    let names: Vec<&str> = session.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["cardNumber", "expiryDate", "cvv", "cardholderName"]);
    assert!(session.values().is_empty());
    assert!(session.errors().is_empty());
    assert_eq!(session.phase(), SessionPhase::CategorySelected);
}

#[test]
fn missing_required_field_blocks_submission() {
    let mut session = session();
    session.select_category(USER);
    session.input("firstName", "Ada");

    let outcome = session.submit().expect("submit");
    assert_eq!(outcome, SubmitOutcome::Invalid { issues: 1 });
    assert_eq!(session.error("lastName"), Some("Last Name is required"));
    assert!(session.store().is_empty());
    assert_eq!(session.backend().raw(STORAGE_KEY), None);
    assert_eq!(session.value("firstName"), "Ada");
}

#[test]
fn typed_card_number_only_holds_digits_and_spaces() {
    let mut session = session();
    session.select_category(PAYMENT);
    let mut typed = String::new();
    for ch in "4111-1111 abcd 1111".chars() {
        let mut candidate = session.value("cardNumber").to_string();
        candidate.push(ch);
        if session.input("cardNumber", candidate.clone()) {
            typed = candidate;
        }
    }
    assert_eq!(session.value("cardNumber"), typed);
    assert_eq!(typed, "41111111  1111");
    assert!(typed.chars().all(|ch| ch.is_ascii_digit() || ch.is_whitespace()));
}

#[test]
fn short_card_number_is_reported_on_submit() {
    let mut session = session();
    session.select_category(PAYMENT);
    session.input("cardNumber", "4111 1111");
    session.input("expiryDate", "2030-01-01");
    session.input("cvv", "123");
    session.input("cardholderName", "Ada Lovelace");

    let outcome = session.submit().expect("submit");
    assert_eq!(outcome, SubmitOutcome::Invalid { issues: 1 });
    assert_eq!(session.error("cardNumber"), Some(CARD_NUMBER_MESSAGE));
}

#[test]
fn age_bounds() {
    let mut session = session();
    session.select_category(USER);
    session.input("firstName", "A");
    session.input("lastName", "B");

    session.input("age", "150");
    assert!(matches!(session.submit(), Ok(SubmitOutcome::Invalid { .. })));
    assert!(session.error("age").is_some());

    session.input("age", "45");
    assert!(session.error("age").is_none());
    assert!(matches!(session.submit(), Ok(SubmitOutcome::Created { index: 0 })));

    session.input("firstName", "C");
    session.input("lastName", "D");
    assert!(matches!(session.submit(), Ok(SubmitOutcome::Created { index: 1 })));
}

#[test]
fn valid_submission_appends_persists_and_clears() {
    let mut session = session();
    submit_user(&mut session, "A", "B", "30");

    let records = session.store().records(USER);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["firstName"], "A");
    assert_eq!(records[0]["age"], "30");
    assert_eq!(
        session.backend().raw(STORAGE_KEY),
        Some(r#"{"User Information":[{"firstName":"A","lastName":"B","age":"30"}]}"#)
    );
    assert!(session.values().is_empty());
    assert_eq!(session.category(), Some(USER));
    assert_eq!(session.progress(), 0.0);
}

#[test]
fn edit_then_resubmit_replaces_in_place() {
    let mut session = session();
    submit_user(&mut session, "A", "B", "30");
    submit_user(&mut session, "C", "D", "40");

    session.select_category("");
    session.edit(USER, 0).expect("edit");
    assert_eq!(session.phase(), SessionPhase::Editing);
    assert_eq!(session.value("lastName"), "B");
    session.input("lastName", "Z");

    assert_eq!(session.submit().expect("submit"), SubmitOutcome::Edited { index: 0 });
    let records = session.store().records(USER);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["lastName"], "Z");
    assert_eq!(records[1]["lastName"], "D");
    assert!(session.edit_cursor().is_none());
}

#[test]
fn delete_shifts_later_records_and_persists() {
    let mut session = session();
    submit_user(&mut session, "A", "B", "");
    submit_user(&mut session, "C", "D", "");
    submit_user(&mut session, "E", "F", "");

    session.delete(USER, 1).expect("delete");
    let firsts: Vec<&str> = session
        .store()
        .records(USER)
        .iter()
        .map(|record| record["firstName"].as_str())
        .collect();
    assert_eq!(firsts, ["A", "E"]);

    let reloaded = FormSession::new(Catalog::builtin(), session.backend().clone());
    assert_eq!(reloaded.store(), session.store());

    let err = session.delete(USER, 5).expect_err("missing index");
    assert!(matches!(err, SessionError::RecordNotFound { index: 5, .. }));
}

#[test]
fn corrupt_blob_loads_as_empty() {
    let backend = MemoryStore::new().with_entry(STORAGE_KEY, "{not json");
    let mut session = FormSession::new(Catalog::builtin(), backend);
    assert!(session.store().is_empty());

    submit_user(&mut session, "A", "B", "");
    assert_eq!(session.store().total_records(), 1);
}

#[test]
fn submit_without_category_is_an_error() {
    let mut session = session();
    assert!(matches!(
        session.submit(),
        Err(SessionError::NoCategorySelected)
    ));
}
