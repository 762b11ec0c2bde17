use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::core::money::{parse_amount, round2};
use crate::core::{AppError, Result};
use crate::modules::fees::{Course, FeeDetection, FeeDetector, InvoiceTotals};
use crate::modules::imports::models::{AmountPolicy, ImportOptions, ImportSummary, QuarterRow};
use crate::modules::imports::services::parsers::{parse_course, parse_date, split_full_name};
use crate::modules::students::models::normalize_dni;
use crate::modules::students::{NewStudent, Student, StudentRepository};
use crate::modules::tax_invoices::models::{
    ClientSnapshot, InvoiceNumber, IssuerSnapshot, NewTaxInvoice,
};
use crate::modules::tax_invoices::services::TaxInvoiceService;

/// Money columns of a row
struct RowAmounts {
    base_taxable: Decimal,
    vat: Decimal,
    fees: Decimal,
    total: Decimal,
}

/// What happened to a row that was not skipped
enum RowOutcome {
    Invoiced,
    Duplicate,
    WithoutAmount,
}

#[derive(Default)]
struct RunState {
    /// Numbers already used earlier in this file
    seen_numbers: HashSet<InvoiceNumber>,
    /// Payments without a sheet number handled earlier: DNI, date, total
    seen_payments: HashSet<(String, NaiveDate, Decimal)>,
    /// Students a dry run would have created, by DNI
    planned_students: HashMap<String, Student>,
}

/// Invoice number written in the sheet, if it is one. A well-formed
/// number from another year than the row date rejects the row.
fn sheet_number(raw: &str, date: NaiveDate) -> Result<Option<InvoiceNumber>> {
    let number = match raw.parse::<InvoiceNumber>() {
        Ok(number) => number,
        Err(_) => {
            if !raw.is_empty() {
                debug!(raw = %raw, "Unrecognized invoice number, allocating");
            }
            return Ok(None);
        }
    };

    if number.year != date.year() {
        return Err(AppError::validation(format!(
            "invoice {} dated in {}",
            number,
            date.year()
        )));
    }
    Ok(Some(number))
}

/// Loads a quarter spreadsheet: one student upsert and at most one
/// invoice per row. Bad rows are skipped and reported; storage failures
/// abort the run.
pub struct QuarterImporter {
    students: Arc<dyn StudentRepository>,
    invoices: Arc<TaxInvoiceService>,
    detector: FeeDetector,
}

impl QuarterImporter {
    pub fn new(
        students: Arc<dyn StudentRepository>,
        invoices: Arc<TaxInvoiceService>,
        detector: FeeDetector,
    ) -> Self {
        Self {
            students,
            invoices,
            detector,
        }
    }

    pub async fn import_path(&self, path: &Path, options: &ImportOptions) -> Result<ImportSummary> {
        let file = File::open(path)?;
        info!(path = %path.display(), dry_run = options.dry_run, "Importing quarter file");
        self.import_reader(file, options).await
    }

    pub async fn import_reader<R: io::Read>(
        &self,
        reader: R,
        options: &ImportOptions,
    ) -> Result<ImportSummary> {
        let mut summary = ImportSummary {
            dry_run: options.dry_run,
            ..Default::default()
        };

        let rows = {
            let mut csv_reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .delimiter(options.delimiter)
                .from_reader(reader);

            // Header is line 1
            let mut rows = Vec::new();
            for (index, record) in csv_reader.records().enumerate() {
                let line = index + 2;
                match record {
                    Ok(record) => rows.push((line, QuarterRow::from_record(&record))),
                    Err(e) => summary.skip(line, format!("unreadable row: {}", e)),
                }
            }
            rows
        };

        let mut run = RunState::default();
        for (line, row) in rows {
            if row.is_blank() {
                continue;
            }
            summary.rows_read += 1;

            match self
                .import_row(&row, options, &mut summary, &mut run)
                .await
            {
                Ok(RowOutcome::Invoiced) => summary.invoices_created += 1,
                Ok(RowOutcome::Duplicate) => summary.duplicates_skipped += 1,
                Ok(RowOutcome::WithoutAmount) => summary.without_amount += 1,
                Err(e) if e.is_row_scoped() => {
                    warn!(row = line, error = %e, "Skipping row");
                    summary.skip(line, e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            dry_run = summary.dry_run,
            rows = summary.rows_read,
            students_created = summary.students_created,
            students_updated = summary.students_updated,
            invoices_created = summary.invoices_created,
            duplicates = summary.duplicates_skipped,
            skipped = summary.rows_skipped(),
            "Quarter import finished"
        );

        Ok(summary)
    }

    async fn import_row(
        &self,
        row: &QuarterRow,
        options: &ImportOptions,
        summary: &mut ImportSummary,
        run: &mut RunState,
    ) -> Result<RowOutcome> {
        let dni = normalize_dni(&row.dni);
        if dni.is_empty() {
            return Err(AppError::validation("missing DNI"));
        }
        let (first_name, last_name) = split_full_name(&row.full_name)
            .ok_or_else(|| AppError::validation("missing client name"))?;

        let date = parse_date(&row.date)?;
        let course = parse_course(&row.course)?;
        let amounts = RowAmounts {
            base_taxable: parse_amount(&row.base_taxable)?,
            vat: parse_amount(&row.vat)?,
            fees: parse_amount(&row.fees)?,
            total: parse_amount(&row.total)?,
        };
        let number = sheet_number(&row.invoice_number, date)?;

        let detection = self.detector.detect(amounts.fees);
        let totals = if amounts.total > Decimal::ZERO {
            Some(self.invoice_totals(options.amount_policy, &amounts, &detection, course)?)
        } else {
            None
        };

        // Everything above may reject the row; nothing is written before here
        let new_student = NewStudent {
            first_name,
            last_name,
            dni,
            course,
            address: row.address(),
        };
        let student = self
            .upsert_student(new_student, options, summary, run)
            .await?;

        let Some(totals) = totals else {
            debug!(dni = %student.dni, "Row without amount, no invoice");
            return Ok(RowOutcome::WithoutAmount);
        };

        let payment = (student.dni.clone(), date, totals.total);
        match number {
            Some(number) => {
                if run.seen_numbers.contains(&number)
                    || self.invoices.find_by_number(number).await?.is_some()
                {
                    debug!(invoice_number = %number, "Invoice already stored");
                    return Ok(RowOutcome::Duplicate);
                }
            }
            None => {
                let stored = student.id > 0
                    && self
                        .invoices
                        .find_payment(student.id, date, totals.total)
                        .await?
                        .is_some();
                if stored || run.seen_payments.contains(&payment) {
                    debug!(dni = %student.dni, %date, total = %totals.total, "Payment already invoiced");
                    return Ok(RowOutcome::Duplicate);
                }
            }
        }

        let billing = self.invoices.billing();
        let new_invoice = NewTaxInvoice {
            date,
            course,
            student_id: student.id,
            fees: detection.fees,
            totals,
            client: ClientSnapshot::from_student(&student, &billing.default_province),
            issuer: IssuerSnapshot::from(billing),
            recorded_fees_total: Some(detection.original_total),
            fee_detection: Some(detection.confidence),
            notes: options.import_note(),
        };

        if options.dry_run {
            if let Some(number) = number {
                run.seen_numbers.insert(number);
            }
            run.seen_payments.insert(payment);
            return Ok(RowOutcome::Invoiced);
        }

        let invoice = match number {
            Some(number) => match self.invoices.insert_with_number(number, &new_invoice).await {
                Err(AppError::DuplicateInvoiceNumber(_)) => return Ok(RowOutcome::Duplicate),
                other => other?,
            },
            None => self.invoices.insert_with_next_number(&new_invoice).await?,
        };
        run.seen_numbers.insert(invoice.invoice_number);
        run.seen_payments.insert(payment);

        Ok(RowOutcome::Invoiced)
    }

    /// Totals to store for a row with a positive total. Recorded amounts are
    /// kept only when they add up and the detected flags explain the fee
    /// column; otherwise the breakdown is recomputed from the total.
    fn invoice_totals(
        &self,
        policy: AmountPolicy,
        amounts: &RowAmounts,
        detection: &FeeDetection,
        course: Course,
    ) -> Result<InvoiceTotals> {
        let calculator = self.invoices.calculator();
        let total = round2(amounts.total);

        if policy == AmountPolicy::Regenerate {
            return Ok(calculator.compute(total, &detection.fees, course));
        }

        let recorded = InvoiceTotals {
            base_taxable: round2(amounts.base_taxable),
            vat: round2(amounts.vat),
            fees_total: round2(amounts.fees),
            total,
        };
        if !recorded.is_balanced() {
            return Err(AppError::validation(format!(
                "recorded amounts do not add up: {} + {} + {} != {}",
                recorded.base_taxable, recorded.vat, recorded.fees_total, recorded.total
            )));
        }

        if recorded.fees_total != detection.detected_total {
            warn!(
                fees_total = %recorded.fees_total,
                detected_total = %detection.detected_total,
                "Fee column not matched by detected fees, recomputing breakdown"
            );
            return Ok(calculator.compute(total, &detection.fees, course));
        }

        Ok(recorded)
    }

    async fn upsert_student(
        &self,
        new_student: NewStudent,
        options: &ImportOptions,
        summary: &mut ImportSummary,
        run: &mut RunState,
    ) -> Result<Student> {
        let mut matches = self.students.find_by_dni(&new_student.dni).await?;
        if matches.len() > 1 {
            return Err(AppError::validation(format!(
                "{} students share DNI {}",
                matches.len(),
                new_student.dni
            )));
        }

        if let Some(mut student) = matches.pop() {
            let updated = student.address.fill_blanks_from(&new_student.address);
            if !updated.is_empty() {
                if !options.dry_run {
                    self.students
                        .update_address(student.id, &student.address)
                        .await?;
                }
                debug!(student_id = student.id, fields = ?updated, "Address completed");
                summary.students_updated += 1;
            }
            return Ok(student);
        }

        // A dry run never stores students, so later rows find them here
        if let Some(student) = run.planned_students.get_mut(&new_student.dni) {
            if !student.address.fill_blanks_from(&new_student.address).is_empty() {
                summary.students_updated += 1;
            }
            return Ok(student.clone());
        }

        let mut new_student = new_student;
        if new_student.address.province.trim().is_empty() {
            new_student.address.province = self.invoices.billing().default_province.clone();
        }

        summary.students_created += 1;
        if options.dry_run {
            let student = new_student.into_student(0);
            run.planned_students
                .insert(student.dni.clone(), student.clone());
            return Ok(student);
        }

        let student = self.students.create(&new_student).await?;
        info!(student_id = student.id, dni = %student.dni, "Student created");
        Ok(student)
    }
}
