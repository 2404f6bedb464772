mod common;

use common::{read_entry, write_file};
use dts_toolkit::files::{gladiator, wind, CleanRule, CleanValue, FileKind, FilesError};
use std::fs;
use std::path::Path;

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn copy_and_clean_takes_single_csv_folders() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    fs::create_dir_all(&dst).unwrap();

    write_file(
        &src,
        "Route1/log.csv",
        "Time,Longitude,RSSI (0)\n1,31.2,-70\n2,,-71\n3,31.4,NaN\n4,31.5,-72\n",
    );
    write_file(&src, "Route2/a.csv", "x\n1\n");
    write_file(&src, "Route2/b.csv", "x\n2\n");
    fs::create_dir_all(src.join("Empty")).unwrap();
    write_file(&src, "loose.csv", "x\n3\n");

    let rule = CleanRule {
        columns: strings(&["Longitude", "RSSI (0)", "Cell ID (0)"]),
        value: CleanValue::Missing,
    };
    let mut lines = Vec::new();
    let report =
        gladiator::copy_and_clean(&src, &dst, FileKind::Csv, &rule, |l| lines.push(l.to_string())).unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(names_in(&dst), vec!["Route1_data.csv"]);
    assert_eq!(
        fs::read_to_string(dst.join("Route1_data.csv")).unwrap(),
        "Time,Longitude,RSSI (0)\n1,31.2,-70\n4,31.5,-72\n"
    );
    assert!(lines.iter().any(|l| l.starts_with("Column 'Cell ID (0)' not found")));
    assert!(lines.iter().any(|l| l.ends_with("then saved as 'Route1_data.csv'.")));
}

#[test]
fn copy_and_clean_blanks_matching_values_into_excel() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    fs::create_dir_all(&dst).unwrap();
    write_file(&src, "North/n.csv", "Cell ID (0),Operator\n-999,Orange\n42,Vodafone\n");

    let rule = CleanRule {
        columns: strings(&["Cell ID (0)"]),
        value: CleanValue::from_input("-999"),
    };
    gladiator::copy_and_clean(&src, &dst, FileKind::Excel, &rule, |_| {}).unwrap();

    let workbook = dst.join("North_data.xlsx");
    let shared = read_entry(&workbook, "xl/sharedStrings.xml");
    assert!(shared.contains(">Operator<"));
    assert!(shared.contains(">Vodafone<"));
    let sheet = read_entry(&workbook, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<v>42</v>"), "{sheet}");
    assert!(!sheet.contains("-999"));
}

#[test]
fn copy_and_clean_requires_destination() {
    let dir = tempfile::tempdir().unwrap();
    let err = gladiator::copy_and_clean(
        dir.path(),
        &dir.path().join("out"),
        FileKind::Csv,
        &CleanRule::none(),
        |_| {},
    )
    .unwrap_err();
    assert!(matches!(err, FilesError::NotFound { what: "Destination folder", .. }));
}

#[test]
fn distribute_moves_files_round_robin_by_number() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for name in ["log10.csv", "log2.csv", "log1.csv", "log3.csv", "route.csv"] {
        write_file(root, name, "x\n");
    }
    write_file(root, "keep.txt", "x");

    let mut lines = Vec::new();
    let report = gladiator::distribute_into_folders(
        root,
        &strings(&["A", "B"]),
        2,
        |l| lines.push(l.to_string()),
    )
    .unwrap();

    assert_eq!(report.succeeded, 5);
    // route (0), log1, log2, log3, log10
    assert_eq!(names_in(&root.join("A")), vec!["log1.csv", "log10.csv", "route.csv"]);
    assert_eq!(names_in(&root.join("B")), vec!["log2.csv", "log3.csv"]);
    assert!(names_in(root).contains(&"keep.txt".to_string()));
    assert_eq!(
        lines,
        vec![
            "Moved 2 CSV files to folder 'A'",
            "Moved 2 CSV files to folder 'B'",
            "Moved 1 CSV files to folder 'A'",
            "CSV files moved to folders successfully!",
        ]
    );
}

#[test]
fn distribute_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_file(root, "a1.csv", "new\n");
    write_file(root, "A/a1.csv", "old\n");

    let report = gladiator::distribute_into_folders(root, &strings(&["A"]), 5, |_| {}).unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(fs::read_to_string(root.join("A/a1.csv")).unwrap(), "old\n");
    assert!(root.join("a1.csv").exists());
}

#[test]
fn rename_cycles_through_names_per_folder() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for name in ["a.csv", "b.csv", "c.csv"] {
        write_file(root, &format!("North/{name}"), "x\n");
    }
    write_file(root, "South/only.csv", "x\n");

    let mut lines = Vec::new();
    let report = gladiator::rename_in_folders(
        root,
        &strings(&["North", "South", "West"]),
        &strings(&["Idle", "Dedicated"]),
        FileKind::Csv,
        |l| lines.push(l.to_string()),
    )
    .unwrap();

    assert_eq!(report.succeeded, 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(names_in(&root.join("North")), vec!["North_Dedicated.csv", "North_Idle.csv", "c.csv"]);
    assert_eq!(names_in(&root.join("South")), vec!["South_Idle.csv"]);
    assert!(lines.contains(&"File 'a.csv' renamed to 'North_Idle.csv'.".to_string()));
    assert!(lines.iter().any(|l| l.starts_with("Failed to rename 'c.csv' to 'North_Idle.csv'")));
    assert!(lines.contains(&format!("Folder '{}' does not exist.", root.join("West").display())));
}

#[test]
fn wind_copies_selection_into_new_folder() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    fs::create_dir_all(&dst).unwrap();
    write_file(&src, "a.csv", "1\n");
    write_file(&src, "b.csv", "2\n");
    write_file(&src, "c.xlsx", "3");

    assert_eq!(wind::list_files(&src, FileKind::Csv).unwrap(), vec!["a.csv", "b.csv"]);

    let mut lines = Vec::new();
    let report = wind::copy_selected(
        &src,
        &dst,
        &strings(&["b.csv", "missing.csv"]),
        &strings(&["Bravo.csv", "Ghost.csv"]),
        Some("Cluster 7"),
        |l| lines.push(l.to_string()),
    )
    .unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    let out = dst.join("Cluster 7");
    assert_eq!(names_in(&out), vec!["Bravo.csv"]);
    assert_eq!(fs::read_to_string(out.join("Bravo.csv")).unwrap(), "2\n");
    assert_eq!(
        fs::metadata(out.join("Bravo.csv")).unwrap().modified().unwrap(),
        fs::metadata(src.join("b.csv")).unwrap().modified().unwrap()
    );
    assert!(lines.iter().any(|l| l.starts_with("Error copying 'missing.csv'")));
    assert!(src.join("b.csv").exists());
}

#[test]
fn wind_requires_existing_folders() {
    let dir = tempfile::tempdir().unwrap();
    let err = wind::list_files(&dir.path().join("nope"), FileKind::Excel).unwrap_err();
    assert!(matches!(err, FilesError::NotFound { what: "Source folder", .. }));

    let err = wind::copy_selected(
        dir.path(),
        &dir.path().join("nope"),
        &strings(&["a.csv"]),
        &strings(&["b.csv"]),
        None,
        |_| {},
    )
    .unwrap_err();
    assert!(matches!(err, FilesError::NotFound { what: "Target folder", .. }));
}

#[test]
fn wind_never_copies_a_file_onto_itself() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.csv", "x,y\n1,2\n");
    write_file(dir.path(), "b.csv", "3\n");

    let mut lines = Vec::new();
    let report = wind::copy_selected(
        dir.path(),
        dir.path(),
        &strings(&["a.csv", "b.csv"]),
        &strings(&["a.csv", "b copy.csv"]),
        None,
        |l| lines.push(l.to_string()),
    )
    .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(fs::read_to_string(dir.path().join("a.csv")).unwrap(), "x,y\n1,2\n");
    assert_eq!(fs::read_to_string(dir.path().join("b copy.csv")).unwrap(), "3\n");
    assert!(lines.contains(&"Error copying 'a.csv': source and target are the same file".to_string()));
}

#[test]
fn distribute_carries_on_past_an_uncreatable_folder() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for name in ["f1.csv", "f2.csv", "f3.csv", "f4.csv"] {
        write_file(root, name, "x\n");
    }
    // a plain file squats on the first folder name
    write_file(root, "A", "not a folder");

    let mut lines = Vec::new();
    let report = gladiator::distribute_into_folders(
        root,
        &strings(&["A", "B"]),
        1,
        |l| lines.push(l.to_string()),
    )
    .unwrap();

    assert_eq!(report.failed, 2);
    assert_eq!(report.succeeded, 2);
    assert_eq!(names_in(&root.join("B")), vec!["f2.csv", "f4.csv"]);
    assert!(root.join("f1.csv").exists());
    assert!(root.join("f3.csv").exists());
    assert_eq!(fs::read_to_string(root.join("A")).unwrap(), "not a folder");
    assert!(lines.iter().any(|l| l.starts_with("Failed to create folder 'A'")));
    assert!(!lines.contains(&"CSV files moved to folders successfully!".to_string()));
}
