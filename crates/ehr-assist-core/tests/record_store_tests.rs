//! Record store integration tests against a file-backed database.

use anyhow::Result;
use tempfile::TempDir;

use ehr_assist_core::db::{Database, DbError, RecordStore};
use ehr_assist_core::export::NoteTextFormat;
use ehr_assist_core::rules::{ClaimValidator, NoteStructurer};

const RAW: &str = "pt c/o thirst. BP 148/92. dx: t2dm. plan: increase metformin, f/u 3mo";

fn open_temp_db() -> Result<(TempDir, Database)> {
    let dir = tempfile::tempdir()?;
    let db = Database::open(dir.path().join("records.db"))?;
    Ok((dir, db))
}

#[test]
fn test_records_survive_reopen() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("records.db");

    let note = NoteStructurer::new().structure(RAW);
    let text = NoteTextFormat::default().render(&note, Some("PATIENT_001"));

    let saved = {
        let db = Database::open(&path)?;
        db.save_note("user-1", "PATIENT_001", RAW, &text, Some("explanation"))?
    };

    let db = Database::open(&path)?;
    let notes = db.list_notes("user-1")?;
    assert_eq!(notes, vec![saved]);
    assert!(notes[0].verify_fingerprint());
    Ok(())
}

#[test]
fn test_notes_newest_first() -> Result<()> {
    let (_dir, db) = open_temp_db()?;

    let ids: Vec<String> = (0..5)
        .map(|i| {
            db.save_note("user-1", &format!("PATIENT_00{}", i), RAW, "note", None)
                .map(|r| r.id)
        })
        .collect::<Result<_, _>>()?;

    let listed: Vec<String> = db.list_notes("user-1")?.into_iter().map(|r| r.id).collect();
    let expected: Vec<String> = ids.into_iter().rev().collect();
    assert_eq!(listed, expected);
    Ok(())
}

#[test]
fn test_validations_newest_first_and_scoped() -> Result<()> {
    let (_dir, db) = open_temp_db()?;
    let validator = ClaimValidator::new();

    let first = db.save_validation("user-1", "P1", RAW, &validator.validate(RAW))?;
    db.save_validation("user-2", "P2", "nothing here", &validator.validate("nothing here"))?;
    let second = db.save_validation("user-1", "P3", "copd", &validator.validate("copd"))?;

    let listed = db.list_validations("user-1")?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
    assert_eq!(listed[0].icd10_codes[0].code, "J44.9");
    Ok(())
}

#[test]
fn test_delete_is_owner_scoped() -> Result<()> {
    let (_dir, db) = open_temp_db()?;
    let saved = db.save_note("user-1", "P1", RAW, "note", None)?;

    assert!(!db.delete_note("intruder", &saved.id)?);
    assert_eq!(db.list_notes("user-1")?.len(), 1);

    assert!(db.delete_note("user-1", &saved.id)?);
    assert!(db.list_notes("user-1")?.is_empty());
    Ok(())
}

#[test]
fn test_blank_owner_rejected() -> Result<()> {
    let (_dir, db) = open_temp_db()?;
    let result = ClaimValidator::new().validate(RAW);

    assert!(matches!(db.save_validation(" ", "P1", RAW, &result), Err(DbError::NotAuthenticated)));
    assert!(matches!(db.list_validations(""), Err(DbError::NotAuthenticated)));
    assert!(matches!(db.delete_note("", "any-id"), Err(DbError::NotAuthenticated)));
    Ok(())
}

#[test]
fn test_tampered_validation_fails_fingerprint() -> Result<()> {
    let (_dir, db) = open_temp_db()?;
    let saved = db.save_validation("user-1", "P1", RAW, &ClaimValidator::new().validate(RAW))?;

    db.conn().execute(
        "UPDATE billing_validations SET denial_risk_score = 0 WHERE id = ?",
        [&saved.id],
    )?;

    let listed = db.list_validations("user-1")?;
    assert_eq!(listed[0].denial_risk_score, 0);
    assert!(!listed[0].verify_fingerprint());
    Ok(())
}
