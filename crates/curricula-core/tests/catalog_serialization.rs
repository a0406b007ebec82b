use curricula_core::{Catalog, RawTable};

fn table(rows: &[&[&str]]) -> RawTable {
    RawTable::from_rows(
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    )
}

#[test]
fn serializes_course_deterministically() {
    let courses = table(&[
        &["course_code", "course_name", "credits", "type", "term_offered", "pillar"],
        &["50.001", "Introduction to Information Systems", "12", "CORE", "4", "istd"],
    ]);
    let catalog = Catalog::from_tables(
        &courses,
        &RawTable::default(),
        &RawTable::default(),
        &RawTable::default(),
    );

    let json = serde_json::to_string_pretty(&catalog.courses()[0]).expect("serialize course");
    let expected = r#"{
  "code": "50.001",
  "name": "Introduction to Information Systems",
  "credits": 12,
  "type": "core",
  "termOffered": "4",
  "pillar": "ISTD"
}"#;
    assert_eq!(json, expected);
}

#[test]
fn warnings_serialize_without_empty_row() {
    let prereqs = table(&[&["course_code"], &["50.021"]]);
    let catalog = Catalog::from_tables(
        &RawTable::default(),
        &prereqs,
        &RawTable::default(),
        &RawTable::default(),
    );

    let warning = catalog
        .warnings()
        .iter()
        .find(|warning| warning.code == "missing_columns")
        .expect("missing columns warning");
    let json = serde_json::to_value(warning).expect("serialize warning");
    assert_eq!(json["range"], "prerequisites");
    assert!(json.get("row").is_none());
}
