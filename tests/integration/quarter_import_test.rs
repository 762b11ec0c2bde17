// Quarter spreadsheet import over in-memory storage
//
// - student upsert by DNI, address completion, default province
// - skipped rows are reported with their line number
// - invoice numbers from the sheet are kept, missing ones allocated
// - re-imported payments count as duplicates, with or without a number
// - stored totals always add up; rows rejected early write nothing
// - dry runs report the same counts and write nothing

#[path = "../helpers/mod.rs"]
mod helpers;

use std::io::Write;

use autoescuela::core::AppError;
use autoescuela::fees::{DetectionConfidence, FeeSet};
use autoescuela::imports::{AmountPolicy, ImportOptions};
use autoescuela::tax_invoices::InvoiceNumber;
use helpers::*;
use rust_decimal_macros::dec;

const HEADER: &str =
    "Curso,Factura,Fecha,Nombre,DNI,Base,IVA,Tasas,Total,Direccion,CP,Municipio,Provincia";

fn sheet(rows: &[&str]) -> String {
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    content
}

fn mixed_sheet() -> String {
    sheet(&[
        // line 2: new student, sheet number
        "B,2024/0001,10/04/2024,PEREZ LOPEZ ANA,12345678-z,335.50,70.46,94.05,500.01,C/ Mayor 1,,Valencia,",
        // line 3: new student, no number, Spanish amounts
        "A2,,15/05/2024,GARCIA LUIS,87654321X,\"1.000,00\",\"210,00\",\"122,92\",\"1.332,92\",Av. del Puerto 4,46023,Valencia,VALENCIA",
        // line 4: number already used on line 2
        "B,2024/0001,20/05/2024,PEREZ LOPEZ ANA,12345678Z,100.00,21.00,0,121.00,C/ Mayor 1,,Valencia,",
        // line 5: no name
        "B,2024/0010,01/06/2024,,11111111H,100.00,21.00,0,121.00,,,,",
        // line 6: impossible date
        "B,2024/0011,32/13/2024,SANZ MARIA,22222222J,100.00,21.00,0,121.00,,,,",
        // line 7: unknown course
        "Z,2024/0012,01/06/2024,ROIG PAU,33333333P,100.00,21.00,0,121.00,,,,",
        // line 8: known student, completes the postal code, nothing to invoice
        "B,,02/06/2024,PEREZ LOPEZ ANA,12345678Z,0,0,0,0,C/ Mayor 1,46001,Valencia,",
        ",,,,,,,,,,,,",
    ])
}

#[tokio::test]
async fn test_import_mixed_sheet() {
    let ctx = TestContext::new();
    let options = ImportOptions {
        source_name: Some("T2 2024".to_string()),
        ..Default::default()
    };

    let summary = ctx
        .importer()
        .import_reader(mixed_sheet().as_bytes(), &options)
        .await
        .unwrap();

    assert_eq!(summary.rows_read, 7);
    assert_eq!(summary.students_created, 2);
    assert_eq!(summary.students_updated, 1);
    assert_eq!(summary.invoices_created, 2);
    assert_eq!(summary.duplicates_skipped, 1);
    assert_eq!(summary.without_amount, 1);
    let skipped_lines: Vec<usize> = summary.skipped.iter().map(|s| s.row).collect();
    assert_eq!(skipped_lines, vec![5, 6, 7]);

    let students = ctx.students.all();
    assert_eq!(students.len(), 2);
    let ana = students.iter().find(|s| s.dni == "12345678Z").unwrap();
    assert_eq!(ana.first_name, "ANA");
    assert_eq!(ana.last_name, "PEREZ LOPEZ");
    assert_eq!(ana.address.postal_code, "46001");
    assert_eq!(ana.address.province, "VALENCIA");

    let invoices = ctx.invoices.all();
    assert_eq!(invoices.len(), 2);

    let kept = invoices
        .iter()
        .find(|i| i.invoice_number == InvoiceNumber::new(2024, 1))
        .unwrap();
    assert_eq!(kept.totals.total, dec!(500.01));
    assert_eq!(kept.fees, FeeSet::basic());
    assert_eq!(kept.fee_detection, Some(DetectionConfidence::Exact));
    assert_eq!(kept.notes, "Importado de T2 2024");

    let allocated = invoices
        .iter()
        .find(|i| i.invoice_number == InvoiceNumber::new(2024, 2))
        .unwrap();
    assert_eq!(allocated.totals.base_taxable, dec!(1000.00));
    assert_eq!(allocated.totals.total, dec!(1332.92));
    assert_eq!(allocated.fees, FeeSet::basic().with_motorcycle());
    assert_eq!(allocated.recorded_fees_total, Some(dec!(122.92)));
    assert_eq!(allocated.client.name, "LUIS GARCIA");
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let ctx = TestContext::new();
    let options = ImportOptions {
        dry_run: true,
        ..Default::default()
    };

    let summary = ctx
        .importer()
        .import_reader(mixed_sheet().as_bytes(), &options)
        .await
        .unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.students_created, 2);
    assert_eq!(summary.students_updated, 1);
    assert_eq!(summary.invoices_created, 2);
    assert_eq!(summary.duplicates_skipped, 1);
    assert_eq!(summary.rows_skipped(), 3);
    assert!(ctx.students.all().is_empty());
    assert!(ctx.invoices.all().is_empty());
}

#[tokio::test]
async fn test_reimport_counts_duplicates() {
    let ctx = TestContext::new();
    let content = sheet(&[
        "B,2024/0001,10/04/2024,PEREZ LOPEZ ANA,12345678Z,335.50,70.46,94.05,500.01,C/ Mayor 1,46001,Valencia,VALENCIA",
        "A2,,15/05/2024,GARCIA LUIS,87654321X,1000.00,210.00,122.92,1332.92,Av. del Puerto 4,46023,Valencia,VALENCIA",
    ]);
    let importer = ctx.importer();

    let first = importer
        .import_reader(content.as_bytes(), &ImportOptions::default())
        .await
        .unwrap();
    let again = importer
        .import_reader(content.as_bytes(), &ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(first.invoices_created, 2);
    assert_eq!(again.invoices_created, 0);
    assert_eq!(again.duplicates_skipped, 2);
    assert_eq!(again.students_created, 0);

    let numbers: Vec<String> = ctx
        .invoices
        .all()
        .iter()
        .map(|i| i.invoice_number.to_string())
        .collect();
    assert_eq!(numbers, vec!["2024/0001", "2024/0002"]);
}

#[tokio::test]
async fn test_repeated_payment_without_number_in_one_file() {
    let row = "B,,10/04/2024,PEREZ LOPEZ ANA,12345678Z,335.50,70.46,94.05,500.01,,,,";
    let content = sheet(&[row, row]);

    for dry_run in [false, true] {
        let ctx = TestContext::new();
        let options = ImportOptions {
            dry_run,
            ..Default::default()
        };

        let summary = ctx
            .importer()
            .import_reader(content.as_bytes(), &options)
            .await
            .unwrap();

        assert_eq!(summary.invoices_created, 1, "dry_run = {}", dry_run);
        assert_eq!(summary.duplicates_skipped, 1, "dry_run = {}", dry_run);
    }
}

#[tokio::test]
async fn test_unbalanced_recorded_row_is_skipped() {
    let ctx = TestContext::new();
    let content = sheet(&[
        "B,2024/0001,10/04/2024,PEREZ LOPEZ ANA,12345678Z,100.00,21.00,94.05,999.99,C/ Mayor 1,46001,Valencia,",
    ]);

    let summary = ctx
        .importer()
        .import_reader(content.as_bytes(), &ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.invoices_created, 0);
    assert_eq!(summary.students_created, 0);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].row, 2);
    assert!(summary.skipped[0].reason.contains("do not add up"));
    assert!(ctx.students.all().is_empty());
    assert!(ctx.invoices.all().is_empty());
}

#[tokio::test]
async fn test_unbalanced_row_is_accepted_when_regenerating() {
    let ctx = TestContext::new();
    let content = sheet(&[
        "B,2024/0001,10/04/2024,PEREZ LOPEZ ANA,12345678Z,100.00,21.00,94.05,500.00,,,,",
    ]);
    let options = ImportOptions {
        amount_policy: AmountPolicy::Regenerate,
        ..Default::default()
    };

    let summary = ctx
        .importer()
        .import_reader(content.as_bytes(), &options)
        .await
        .unwrap();

    assert_eq!(summary.invoices_created, 1);
    let invoice = &ctx.invoices.all()[0];
    assert!(invoice.totals.is_balanced());
    assert_eq!(invoice.totals.base_taxable, dec!(335.50));
}

#[tokio::test]
async fn test_fee_column_not_matched_by_flags_is_recomputed() {
    let ctx = TestContext::new();
    // 94.50 is no exact fee combination; the detector falls back to one basic fee
    let content = sheet(&[
        "B,2024/0003,10/04/2024,PEREZ LOPEZ ANA,12345678Z,335.05,70.46,94.50,500.01,,,,",
    ]);

    let summary = ctx
        .importer()
        .import_reader(content.as_bytes(), &ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.invoices_created, 1);
    let invoice = &ctx.invoices.all()[0];
    assert_eq!(invoice.fees, FeeSet::basic());
    assert_eq!(invoice.fee_detection, Some(DetectionConfidence::Approximate));
    assert_eq!(invoice.recorded_fees_total, Some(dec!(94.50)));
    assert_eq!(invoice.totals.fees_total, dec!(94.05));
    assert_eq!(invoice.totals.total, dec!(500.01));
    assert!(invoice.totals.is_balanced());
}

#[tokio::test]
async fn test_number_from_another_year_writes_nothing() {
    let ctx = TestContext::new();
    let content = sheet(&[
        "B,2023/0001,10/04/2024,PEREZ LOPEZ ANA,12345678Z,335.50,70.46,94.05,500.01,C/ Mayor 1,46001,Valencia,",
    ]);

    let summary = ctx
        .importer()
        .import_reader(content.as_bytes(), &ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.students_created, 0);
    assert_eq!(summary.students_updated, 0);
    assert_eq!(summary.rows_skipped(), 1);
    assert!(summary.skipped[0].reason.contains("2023/0001 dated in 2024"));
    assert!(ctx.students.all().is_empty());
    assert!(ctx.invoices.all().is_empty());
}

#[tokio::test]
async fn test_regenerate_recomputes_from_total() {
    let ctx = TestContext::new();
    let content = sheet(&[
        "B,,10/04/2024,PEREZ LOPEZ ANA,12345678Z,400.00,10.00,94.05,500.00,C/ Mayor 1,46001,Valencia,VALENCIA",
    ]);
    let options = ImportOptions {
        amount_policy: AmountPolicy::Regenerate,
        ..Default::default()
    };

    ctx.importer()
        .import_reader(content.as_bytes(), &options)
        .await
        .unwrap();

    let invoice = &ctx.invoices.all()[0];
    assert_eq!(invoice.totals.base_taxable, dec!(335.50));
    assert_eq!(invoice.totals.vat, dec!(70.46));
    assert_eq!(invoice.totals.total, dec!(500.01));
    assert_eq!(invoice.notes, "Importado");
}

#[tokio::test]
async fn test_shared_dni_is_skipped() {
    let ctx = TestContext::new();
    ctx.students.seed(new_student("12345678Z", "ANA", "PEREZ"));
    ctx.students.seed(new_student("12345678Z", "ANA", "PEREZ LOPEZ"));
    let content = sheet(&[
        "B,2024/0001,10/04/2024,PEREZ LOPEZ ANA,12345678Z,335.50,70.46,94.05,500.01,,,,",
    ]);

    let summary = ctx
        .importer()
        .import_reader(content.as_bytes(), &ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.rows_skipped(), 1);
    assert!(summary.skipped[0].reason.contains("share DNI"));
    assert!(ctx.invoices.all().is_empty());
}

#[tokio::test]
async fn test_import_from_semicolon_file() {
    let ctx = TestContext::new();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{}\nC;2024/0005;2024-08-01;MARTI JOAN;44444444A;300,00;0;0;300,00;;;;\n",
        HEADER.replace(',', ";")
    )
    .unwrap();
    let options = ImportOptions {
        delimiter: b';',
        ..Default::default()
    };

    let summary = ctx.importer().import_path(file.path(), &options).await.unwrap();

    assert_eq!(summary.invoices_created, 1);
    let invoice = &ctx.invoices.all()[0];
    assert_eq!(invoice.invoice_number.to_string(), "2024/0005");
    assert_eq!(invoice.totals.vat, dec!(0.00));
    assert_eq!(invoice.totals.total, dec!(300.00));
}

#[tokio::test]
async fn test_missing_file_is_an_error() {
    let ctx = TestContext::new();

    let result = ctx
        .importer()
        .import_path(std::path::Path::new("/nonexistent/t1.csv"), &ImportOptions::default())
        .await;

    assert!(matches!(result, Err(AppError::Io(_))));
}
