//! Integration tests for sheetstream

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sheetstream::{Exporter, IterSource};
use tempfile::tempdir;

fn rows(data: &[&[&str]]) -> IterSource<std::vec::IntoIter<Vec<String>>> {
    let owned: Vec<Vec<String>> = data
        .iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect();
    IterSource::new(owned.into_iter())
}

fn read_entry(path: &Path, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    content
}

#[test]
fn test_archive_contains_every_required_entry_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.xlsx");
    sheetstream::export(&path, &mut rows(&[&["a"]])).unwrap();

    let archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort_unstable();

    let mut expected = vec![
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/app.xml",
        "docProps/core.xml",
        "xl/workbook.xml",
        "xl/_rels/workbook.xml.rels",
        "xl/styles.xml",
        "xl/theme/theme1.xml",
        "xl/worksheets/sheet1.xml",
        "xl/sharedStrings.xml",
    ];
    expected.sort_unstable();
    assert_eq!(names, expected);
}

#[test]
fn test_cells_reference_shared_strings_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.xlsx");
    sheetstream::export(&path, &mut rows(&[&["a", "b"], &["c"]])).unwrap();

    let sheet = read_entry(&path, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<c r=\"A1\" t=\"s\"><v>0</v></c>"));
    assert!(sheet.contains("<c r=\"B1\" t=\"s\"><v>1</v></c>"));
    assert!(sheet.contains("<c r=\"A2\" t=\"s\"><v>2</v></c>"));

    let strings = read_entry(&path, "xl/sharedStrings.xml");
    assert!(strings.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
    assert!(strings.ends_with(
        "count=\"0\" uniqueCount=\"0\">\
         <si><t>a</t></si><si><t>b</t></si><si><t>c</t></si></sst>"
    ));
}

#[test]
fn test_row_numbers_run_gapless_from_one() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.xlsx");

    let data: Vec<Vec<String>> = (0..50).map(|i| vec![format!("row {}", i)]).collect();
    sheetstream::export(&path, &mut IterSource::new(data.into_iter())).unwrap();

    let sheet = read_entry(&path, "xl/worksheets/sheet1.xml");
    assert_eq!(sheet.matches("<row ").count(), 50);
    for n in 1..=50 {
        assert!(sheet.contains(&format!("<row r=\"{}\" ", n)), "row {}", n);
    }
}

#[test]
fn test_empty_source_produces_openable_archive() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.xlsx");
    sheetstream::export(&path, &mut rows(&[])).unwrap();

    let sheet = read_entry(&path, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<sheetData></sheetData>"));

    let strings = read_entry(&path, "xl/sharedStrings.xml");
    assert!(strings.ends_with("count=\"0\" uniqueCount=\"0\"></sst>"));
}

#[test]
fn test_cell_text_is_sanitized_and_escaped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.xlsx");
    sheetstream::export(
        &path,
        &mut rows(&[&["<b>&\"quoted\"</b>", "tab\tkept\u{1}gone"]]),
    )
    .unwrap();

    let strings = read_entry(&path, "xl/sharedStrings.xml");
    assert!(strings.contains("<si><t>&lt;b&gt;&amp;&quot;quoted&quot;&lt;/b&gt;</t></si>"));
    assert!(strings.contains("<si><t>tab\tkeptgone</t></si>"));
}

#[test]
fn test_dedup_collapses_repeated_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.xlsx");
    Exporter::new()
        .dedup_shared_strings(true)
        .export(&path, &mut rows(&[&["yes", "no"], &["yes", "yes"]]))
        .unwrap();

    let strings = read_entry(&path, "xl/sharedStrings.xml");
    assert_eq!(strings.matches("<si>").count(), 2);

    let sheet = read_entry(&path, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<c r=\"A1\" t=\"s\"><v>0</v></c>"));
    assert!(sheet.contains("<c r=\"B1\" t=\"s\"><v>1</v></c>"));
    assert!(sheet.contains("<c r=\"A2\" t=\"s\"><v>0</v></c>"));
    assert!(sheet.contains("<c r=\"B2\" t=\"s\"><v>0</v></c>"));
}

#[test]
fn test_wide_table_column_references() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wide.xlsx");

    let wide: Vec<String> = (0..703).map(|i| format!("col {}", i)).collect();
    sheetstream::export(&path, &mut IterSource::new(vec![wide].into_iter())).unwrap();

    let sheet = read_entry(&path, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<c r=\"AA1\" t=\"s\">"));
    assert!(sheet.contains("<c r=\"ZZ1\" t=\"s\">"));
    assert!(sheet.contains("<c r=\"AAA1\" t=\"s\">"));
}

#[test]
fn test_worksheet_preamble_and_trailer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.xlsx");
    sheetstream::export(&path, &mut rows(&[&["x"]])).unwrap();

    let sheet = read_entry(&path, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\""));
    assert!(sheet.contains("mc:Ignorable=\"x14ac\""));
    assert!(sheet.contains("<sheetFormatPr defaultRowHeight=\"15\" x14ac:dyDescent=\"0.25\"/>"));
    assert!(sheet.contains("<pageMargins left=\"0.7\" right=\"0.7\""));
    assert!(sheet.ends_with("</worksheet>"));
}

#[test]
fn test_many_rows_flush_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("big.xlsx");

    // crosses the default 1000-row flush boundary several times
    let data: Vec<Vec<String>> = (0..3500)
        .map(|i| vec![format!("id{}", i), format!("value {}", i * 7)])
        .collect();
    sheetstream::export(&path, &mut IterSource::new(data.into_iter())).unwrap();

    let sheet = read_entry(&path, "xl/worksheets/sheet1.xml");
    assert_eq!(sheet.matches("<row ").count(), 3500);
    assert!(sheet.contains("<row r=\"3500\" "));

    let strings = read_entry(&path, "xl/sharedStrings.xml");
    assert_eq!(strings.matches("<si>").count(), 7000);
}

#[test]
fn test_failed_export_leaves_no_temp_files() {
    let scratch = tempdir().unwrap();
    let missing = scratch.path().join("nowhere").join("out.xlsx");

    let result = Exporter::new()
        .temp_dir(scratch.path())
        .export(&missing, &mut rows(&[&["a"], &["b"]]));
    assert!(result.is_err());

    let leftovers: Vec<_> = std::fs::read_dir(scratch.path()).unwrap().collect();
    assert!(leftovers.is_empty(), "temp stores not cleaned up");
}
