//! End-to-end tests against the `rust_xlsxwriter` backend.

use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use sheetbeast::{
    EnumCellFormatValue, EnumFormatRef, SheetBeastError, SpecCellFormat,
    SpecWorksheetDefinition, SpecXlsxWriteOptions, generate, generate_with_options, open,
};
use tempfile::tempdir;

struct Person {
    name: &'static str,
    age: u32,
    email: Option<&'static str>,
}

fn derive_people() -> Vec<Person> {
    vec![
        Person {
            name: "Alice",
            age: 30,
            email: Some("alice@example.com"),
        },
        Person {
            name: "Bob",
            age: 25,
            email: None,
        },
    ]
}

fn derive_definition() -> SpecWorksheetDefinition<Person> {
    SpecWorksheetDefinition::builder()
        .worksheet_name("People")
        .column(|c| c.title("Name").width(30).value_with(|p: &Person| p.name))
        .column(|c| {
            c.title("Age")
                .value_with(|p: &Person| p.age)
                .format(|f| f.num_format("0").align("center"))
        })
        .column(|c| c.title("Email").value_with(|p: &Person| p.email))
        .column(|c| c.title("Source").value("import"))
        .column(|c| c.title("Adult").value_with(|p: &Person| p.age >= 18))
        .build()
        .unwrap()
}

struct Pair {
    one: &'static str,
    two: &'static str,
}

fn assert_is_xlsx(path: &Path) {
    let v_bytes = std::fs::read(path).unwrap();
    assert!(v_bytes.starts_with(b"PK"), "not a zip container");
}

fn derive_workbook(path: &Path) -> Xlsx<std::io::BufReader<std::fs::File>> {
    open_workbook(path).unwrap()
}

fn derive_range(path: &Path, sheet_name: &str) -> Range<Data> {
    derive_workbook(path).worksheet_range(sheet_name).unwrap()
}

fn derive_row_texts(range: &Range<Data>, row: u32, n_cols: u32) -> Vec<String> {
    (0..n_cols)
        .map(|col| {
            range
                .get_value((row, col))
                .map(ToString::to_string)
                .unwrap_or_default()
        })
        .collect()
}

#[test]
fn test_generate_writes_workbook() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("people.xlsx");

    let path_out = generate(&path, &derive_people(), &derive_definition()).unwrap();

    assert_eq!(path_out, path);
    assert_is_xlsx(&path);

    let range = derive_range(&path, "People");
    assert_eq!(
        derive_row_texts(&range, 0, 5),
        vec!["Name", "Age", "Email", "Source", "Adult"]
    );
    assert_eq!(
        derive_row_texts(&range, 1, 5),
        vec!["Alice", "30", "alice@example.com", "import", "true"]
    );
    assert_eq!(derive_row_texts(&range, 2, 5), vec!["Bob", "25", "", "import", "true"]);
}

#[test]
fn test_generate_reads_back_header_and_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pairs.xlsx");
    let definition = SpecWorksheetDefinition::builder()
        .worksheet_name("Test")
        .column(|c| c.title("title 1").width(40).value_with(|row: &Pair| row.one))
        .column(|c| c.title("title 2").value_with(|row: &Pair| row.two))
        .build()
        .unwrap();

    generate(&path, &[Pair { one: "a", two: "b" }], &definition).unwrap();

    assert_eq!(derive_workbook(&path).sheet_names(), vec!["Test"]);
    let range = derive_range(&path, "Test");
    assert_eq!(range.height(), 2);
    assert_eq!(derive_row_texts(&range, 0, 2), vec!["title 1", "title 2"]);
    assert_eq!(derive_row_texts(&range, 1, 2), vec!["a", "b"]);
}

#[test]
fn test_generate_with_frozen_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("frozen.xlsx");
    let write_options = SpecXlsxWriteOptions {
        if_freeze_header: true,
        fmt_header: SpecCellFormat::default().bold(true).bg_color("silver"),
        ..Default::default()
    };

    generate_with_options(&path, &derive_people(), &derive_definition(), write_options).unwrap();
    let range = derive_range(&path, "People");
    assert_eq!(derive_row_texts(&range, 0, 2), vec!["Name", "Age"]);
}

#[test]
fn test_generate_rejects_empty_definition_without_creating_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.xlsx");

    let err = generate(&path, &derive_people(), &SpecWorksheetDefinition::default()).unwrap_err();

    assert!(matches!(err, SheetBeastError::InvalidDefinition(_)));
    assert!(!path.exists());
}

#[test]
fn test_open_with_multiple_sheets() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("multi.xlsx");

    let path_out = open(&path, |writer| {
        writer.sheet("eins")?;
        let fmt_red = writer.format(SpecCellFormat::default().font_color("red"))?;
        writer.write(["foo", "bar"], &fmt_red)?;
        writer.write_url(1, 0, "https://example.com", EnumFormatRef::Default)?;

        let sheet_zwei = writer.sheet("zwei")?;
        writer.write([1.5, 2.5], SpecCellFormat::default().num_format("0.00"))?;
        writer.set_column_width(0, 50.0)?;

        writer.use_sheet("eins")?;
        writer.write_cell(5, 5, "late", EnumFormatRef::Default)?;
        writer.use_sheet(sheet_zwei)?;
        writer.write(["after"], EnumFormatRef::Default)?;
        Ok(())
    })
    .unwrap();

    assert_eq!(path_out, path);
    assert_eq!(derive_workbook(&path).sheet_names(), vec!["eins", "zwei"]);

    let range_eins = derive_range(&path, "eins");
    assert_eq!(derive_row_texts(&range_eins, 0, 2), vec!["foo", "bar"]);
    assert_eq!(derive_row_texts(&range_eins, 5, 6)[5], "late");

    let range_zwei = derive_range(&path, "zwei");
    assert_eq!(derive_row_texts(&range_zwei, 0, 2), vec!["1.5", "2.5"]);
    assert_eq!(derive_row_texts(&range_zwei, 1, 1), vec!["after"]);
}

#[test]
fn test_open_saves_file_when_callback_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.xlsx");

    let err = open(&path, |writer| {
        writer.sheet("partial")?;
        writer.write(["kept"], EnumFormatRef::Default)?;
        writer.sheet("bad:name")?;
        Ok(())
    })
    .unwrap_err();

    assert!(matches!(err, SheetBeastError::InvalidSheetName { .. }));
    assert_is_xlsx(&path);
    assert_eq!(derive_row_texts(&derive_range(&path, "partial"), 0, 1), vec!["kept"]);
}

#[test]
fn test_open_rejects_sheet_name_differing_only_in_case() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("case.xlsx");

    let err = open(&path, |writer| {
        writer.sheet("Data")?;
        writer.write(["first"], EnumFormatRef::Default)?;
        writer.sheet("data")?;
        writer.write(["second"], EnumFormatRef::Default)?;
        Ok(())
    })
    .unwrap_err();

    assert!(matches!(err, SheetBeastError::InvalidSheetName { .. }));
    assert_eq!(derive_workbook(&path).sheet_names(), vec!["Data"]);
    let range = derive_range(&path, "Data");
    assert_eq!(range.height(), 1);
    assert_eq!(derive_row_texts(&range, 0, 1), vec!["first"]);
}

#[test]
fn test_unknown_format_option_is_rejected() {
    let err = SpecCellFormat::from_options([("sparkle", EnumCellFormatValue::from(true))])
        .unwrap_err();
    assert!(matches!(err, SheetBeastError::InvalidFormat(_)));
}
