//! End-to-end checks of the loader → normalizer → engine pipeline
use std::io::Write;

use flight_list_check::check::{check_path, check_reader, load_reference};
use flight_list_check::parser::ListFormat;
use flight_list_check::report::{write_report, OutputFormat};
use flight_list_check::validation::{FindingKind, Reference, Report, Rules, Severity};
use flight_list_check::ListError;

fn check_lines(lines: &[&str], format: &ListFormat, rules: &Rules) -> Report {
    let text = lines.join("\n");
    check_reader(text.as_bytes(), "<test>", format, rules).expect("readable input")
}

#[test]
fn test_duplicate_alpha_scenario() {
    let report = check_lines(
        &["ALPHA,100", "BRAVO,200", "ALPHA,150"],
        &ListFormat::default(),
        &Rules::default(),
    );

    assert_eq!(report.findings.len(), 1);
    let finding = &report.findings[0];
    assert_eq!(finding.kind, FindingKind::Duplicate);
    assert_eq!(finding.key.as_deref(), Some("ALPHA"));
    assert_eq!(finding.lines, vec![1, 3]);
    assert!(report.has_errors());
}

#[test]
fn test_missing_charlie_scenario() {
    let rules = Rules {
        reference: Some(Reference::from_keys(["ALPHA", "BRAVO", "CHARLIE"])),
        ..Rules::default()
    };
    let report = check_lines(&["ALPHA,100", "BRAVO,200"], &ListFormat::default(), &rules);

    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].kind, FindingKind::Missing);
    assert_eq!(report.findings[0].key.as_deref(), Some("CHARLIE"));
}

#[test]
fn test_malformed_entry_does_not_stop_evaluation() {
    let format = ListFormat {
        expected_fields: Some(2),
        ..ListFormat::default()
    };
    let rules = Rules {
        strict: true,
        ..Rules::default()
    };
    let report = check_lines(
        &["ALPHA,100", "not,a,valid###entry", "BRAVO,200", "ALPHA,300"],
        &format,
        &rules,
    );

    assert_eq!(report.entries_checked, 4);
    assert_eq!(report.summary.malformed, 1);
    assert_eq!(report.summary.duplicate, 1);

    let malformed: Vec<_> = report.findings_of(FindingKind::Malformed).collect();
    assert_eq!(malformed[0].lines, vec![2]);
    assert_eq!(malformed[0].severity, Severity::Error);
}

#[test]
fn test_clean_flight_plan_with_reference_order() {
    let rules = Rules {
        reference: Some(Reference::from_keys(["KJFK", "MERIT", "HFD", "KBOS"])),
        check_order: true,
        reject_unknown: true,
        ..Rules::default()
    };
    let report = check_lines(
        &["# departure", "kjfk,0", "MERIT,10000", "", "HFD,12000", "KBOS,0"],
        &ListFormat::default(),
        &rules,
    );

    assert!(report.is_clean(), "unexpected findings: {:?}", report.findings);
}

#[test]
fn test_line_numbers_survive_blank_and_comment_lines() {
    let report = check_lines(
        &["", "# header comment", "ALPHA", "", "BRAVO", "# note", "alpha"],
        &ListFormat::default(),
        &Rules::default(),
    );

    assert_eq!(report.findings[0].lines, vec![3, 7]);
}

#[test]
fn test_check_path_and_reference_file() {
    let dir = tempfile::tempdir().expect("tempdir");

    let list_path = dir.path().join("plan.txt");
    std::fs::write(&list_path, "ALPHA,100\nCHARLIE,300\nBRAVO,200\n").unwrap();

    let reference_path = dir.path().join("reference.txt");
    let mut reference_file = std::fs::File::create(&reference_path).unwrap();
    writeln!(reference_file, "# expected route").unwrap();
    writeln!(reference_file, "ALPHA").unwrap();
    writeln!(reference_file, "BRAVO").unwrap();
    writeln!(reference_file, "CHARLIE").unwrap();
    writeln!(reference_file, "DELTA").unwrap();
    drop(reference_file);

    let format = ListFormat::default();
    let reference = load_reference(&reference_path, &format).expect("reference");
    assert_eq!(reference.len(), 4);

    let rules = Rules {
        reference: Some(reference),
        check_order: true,
        ..Rules::default()
    };
    let report = check_path(&list_path, &format, &rules).expect("check");

    let kinds: Vec<_> = report.findings.iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FindingKind::Missing, FindingKind::OutOfOrder]);
    assert_eq!(report.findings[0].key.as_deref(), Some("DELTA"));
    assert_eq!(report.findings[1].lines, vec![2]);
}

#[test]
fn test_unreadable_source_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = check_path(
        &dir.path().join("missing.txt"),
        &ListFormat::default(),
        &Rules::default(),
    );
    assert!(matches!(result, Err(ListError::Read { .. })));
}

#[test]
fn test_reports_are_byte_identical_across_runs() {
    let lines = ["ALPHA,1", "bravo,2", "broken,x,y", "ALPHA,3", "charlie,4", "Bravo,5"];
    let format = ListFormat {
        expected_fields: Some(2),
        ..ListFormat::default()
    };
    let rules = Rules {
        reference: Some(Reference::from_keys(["ALPHA", "BRAVO", "CHARLIE", "DELTA"])),
        check_order: true,
        ..Rules::default()
    };

    let render = || {
        let report = check_lines(&lines, &format, &rules);
        let mut out = Vec::new();
        write_report(&report, "plan.txt", OutputFormat::Text, &mut out).unwrap();
        write_report(&report, "plan.txt", OutputFormat::Json, &mut out).unwrap();
        out
    };

    assert_eq!(render(), render());
}
