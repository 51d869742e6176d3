use molasse_core::{
    ingest, ingest_file, ingest_named, AgeCollection, AgeField, AgeValidationError, DatingMethod,
    IngestError, IngestFormat, SkipReason,
};
use std::io::Write;

const MIXED_CSV: &str = "mineral,method,age,error
Zircon,U-Pb,500,5
,Ar-Ar,,2
Biotite,Ar-Ar,300,3
";

#[test]
fn json_numeric_strings_are_coerced() {
    let report = ingest(
        r#"[{"mineral":"Zircon","method":"U-Pb","age":"500","error":"5"}]"#,
        IngestFormat::Json,
    )
    .expect("valid json");
    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.age, 500.0);
    assert_eq!(record.error, 5.0);
    assert_eq!(record.mineral.as_deref(), Some("Zircon"));
    assert_eq!(record.method, Some(DatingMethod::UPb));
    assert!(!record.id.is_nil());
    assert!(!record.id.to_string().is_empty());
}

#[test]
fn json_non_numeric_age_yields_no_records() {
    let report = ingest(
        r#"[{"mineral":"Zircon","age":"notanumber","error":5}]"#,
        IngestFormat::Json,
    )
    .expect("valid json");
    assert!(report.records.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert!(matches!(
        report.skipped[0].reason,
        SkipReason::Invalid(AgeValidationError::NotNumeric {
            field: AgeField::Age,
            ..
        })
    ));
}

#[test]
fn delimited_rows_missing_age_are_dropped_in_order() {
    let report = ingest(MIXED_CSV, IngestFormat::Delimited).expect("valid csv");
    let summary: Vec<(Option<&str>, f64)> = report
        .records
        .iter()
        .map(|record| (record.mineral.as_deref(), record.age))
        .collect();
    assert_eq!(summary, vec![(Some("Zircon"), 500.0), (Some("Biotite"), 300.0)]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].position, 3);
    assert_eq!(
        report.skipped[0].reason,
        SkipReason::Invalid(AgeValidationError::Missing(AgeField::Age))
    );
}

#[test]
fn uncertainty_header_maps_to_error() {
    let report = ingest(
        "mineral,method,age,uncertainty\nMuscovite,Ar-Ar,21.4,0.3\n",
        IngestFormat::Delimited,
    )
    .expect("valid csv");
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].error, 0.3);
}

#[test]
fn invalid_json_is_recoverable_and_keeps_collection() {
    let existing = AgeCollection::new().appended(
        ingest(MIXED_CSV, IngestFormat::Delimited)
            .expect("valid csv")
            .records,
    );

    let err = ingest("[{\"age\": 5,", IngestFormat::Json).expect_err("truncated json");
    assert!(matches!(
        err,
        IngestError::MalformedDocument {
            format: IngestFormat::Json,
            ..
        }
    ));
    assert!(err.to_string().starts_with("malformed json document"));

    let after = match ingest("[{\"age\": 5,", IngestFormat::Json) {
        Ok(report) => existing.appended(report.records),
        Err(_) => existing.clone(),
    };
    assert_eq!(after, existing);
}

#[test]
fn repeated_ingestion_appends_batches_in_order() {
    let batch_a = ingest(MIXED_CSV, IngestFormat::Delimited).expect("batch a");
    let batch_b = ingest(
        r#"[{"mineral":"Apatite","method":"FT","age":12,"error":1},{"mineral":"Zircon","method":"U-Pb","age":500,"error":5}]"#,
        IngestFormat::Json,
    )
    .expect("batch b");

    let collection = AgeCollection::new()
        .appended(batch_a.records.clone())
        .appended(batch_b.records.clone());

    let expected: Vec<_> = batch_a
        .records
        .iter()
        .chain(batch_b.records.iter())
        .cloned()
        .collect();
    assert_eq!(collection.as_slice(), expected.as_slice());
    assert_eq!(collection.len(), 4);

    // Exact duplicates of existing entries are kept, under new ids.
    let zircons: Vec<_> = collection
        .iter()
        .filter(|record| record.mineral.as_deref() == Some("Zircon") && record.age == 500.0)
        .collect();
    assert_eq!(zircons.len(), 2);
    assert_ne!(zircons[0].id, zircons[1].id);
}

#[test]
fn named_ingestion_dispatches_on_extension() {
    let report = ingest_named("Ages.CSV", MIXED_CSV).expect("csv by name");
    assert_eq!(report.records.len(), 2);

    let err = ingest_named("ages.txt", MIXED_CSV).expect_err("txt is unsupported");
    assert!(matches!(err, IngestError::UnsupportedFormat(_)));
}

#[test]
fn file_ingestion_reads_whole_document() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("detrital.json");
    let mut file = std::fs::File::create(&path).expect("create file");
    file.write_all(br#"{"mineral":"Monazite","method":"U-Pb","age":"31.2","error":"0.4"}"#)
        .expect("write file");
    drop(file);

    let report = ingest_file(&path).expect("file should ingest");
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].mineral.as_deref(), Some("Monazite"));

    let missing = ingest_file(dir.path().join("absent.csv")).expect_err("missing file");
    assert!(matches!(missing, IngestError::Io(_)));
}

#[test]
fn out_of_range_json_number_skips_only_that_row() {
    let report = ingest(
        r#"[{"mineral":"Zircon","age":500,"error":5},{"mineral":"Zircon","age":1e400,"error":1}]"#,
        IngestFormat::Json,
    )
    .expect("document with an overflowing number still parses");
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].age, 500.0);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].position, 2);
    assert_eq!(
        report.skipped[0].reason,
        SkipReason::Invalid(AgeValidationError::NonFinite(AgeField::Age))
    );
}
