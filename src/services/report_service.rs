// src/services/report_service.rs
//
// Relatórios: planilhas CSV (financeiro e membros), recibo em PDF e o
// resumo do dashboard. A montagem das linhas e totais é pura; o I/O fica
// todo nos repositórios.

use chrono::{Datelike, Days, Months, NaiveDate};
use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, TransactionRepository},
    models::{
        customer::Customer,
        report::{DashboardSummary, FinanceReportRow, FinanceTotals, MembershipReportRow},
        transaction::{Transaction, TransactionKind},
    },
    services::membership::{classify, today_local, MembershipStatus},
};

#[derive(Clone)]
pub struct ReportService {
    customer_repo: CustomerRepository,
    transaction_repo: TransactionRepository,
    gym_name: String,
    fonts_dir: String,
}

impl ReportService {
    pub fn new(
        customer_repo: CustomerRepository,
        transaction_repo: TransactionRepository,
        gym_name: String,
        fonts_dir: String,
    ) -> Self {
        Self { customer_repo, transaction_repo, gym_name, fonts_dir }
    }

    // =========================================================================
    //  PLANILHAS (CSV)
    // =========================================================================

    /// Relatório financeiro do período: uma linha por lançamento + totais
    pub async fn finance_csv(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<u8>, AppError> {
        let transactions = self
            .transaction_repo
            .list_transactions(from, to, None)
            .await?;

        let (rows, totals) = build_finance_rows(&transactions);
        render_finance_csv(&rows, totals)
    }

    /// Relatório de membros com o status calculado no momento da geração
    pub async fn membership_csv(&self) -> Result<Vec<u8>, AppError> {
        let customers = self.customer_repo.list_customers().await?;
        let rows = build_membership_rows(&customers, today_local());
        render_membership_csv(&rows)
    }

    // =========================================================================
    //  RECIBO (PDF)
    // =========================================================================

    pub async fn receipt_pdf(&self, transaction_id: Uuid) -> Result<Vec<u8>, AppError> {
        // 1. Busca os dados
        let transaction = self
            .transaction_repo
            .find_by_id(transaction_id)
            .await?
            .ok_or(AppError::TransactionNotFound)?;

        let customer_name = match transaction.customer_id {
            Some(customer_id) => self
                .customer_repo
                .find_by_id(customer_id)
                .await?
                .map(|c| c.full_name),
            None => None,
        };

        // 2. Configura o PDF
        // Carrega a fonte da pasta configurada (FONTS_DIR)
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None)
            .map_err(|_| {
                AppError::FontNotFound(format!("Fonte não encontrada na pasta {}", self.fonts_dir))
            })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Recibo {}", transaction.id));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(self.gym_name.clone())
                .styled(style::Style::new().bold().with_font_size(18)),
        );

        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new(format!("RECIBO #{}", short_reference(transaction.id)))
                .styled(style::Style::new().bold().with_font_size(14)),
        );

        doc.push(elements::Paragraph::new(format!(
            "Data: {}",
            transaction.date.format("%d/%m/%Y")
        )));

        if let Some(name) = customer_name {
            doc.push(elements::Paragraph::new(format!("Cliente: {}", name)));
        }

        doc.push(elements::Break::new(1));

        doc.push(elements::Paragraph::new(format!("Referente a: {}", transaction.concept)));

        let kind_label = match transaction.kind {
            TransactionKind::Income => "Entrada",
            TransactionKind::Expense => "Saída",
        };
        doc.push(elements::Paragraph::new(format!("Tipo: {}", kind_label)));

        doc.push(elements::Break::new(2));

        // --- VALOR ---
        let mut amount_paragraph =
            elements::Paragraph::new(format!("VALOR: R$ {:.2}", transaction.amount));
        amount_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(amount_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        doc.push(elements::Break::new(2));

        // --- QR DE CONFERÊNCIA ---
        // O QR carrega a referência do recibo para conferência no balcão
        let code = QrCode::new(format!("recibo:{}", transaction.id).as_bytes())
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
            .with_scale(genpdf::Scale::new(0.5, 0.5));

        doc.push(pdf_image);

        // 3. Renderiza para buffer (memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }

    // =========================================================================
    //  DASHBOARD
    // =========================================================================

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, AppError> {
        let today = today_local();
        let (from, to) = month_bounds(today);

        let month_income = self
            .transaction_repo
            .sum_in_period(TransactionKind::Income, from, to)
            .await?;
        let month_expense = self
            .transaction_repo
            .sum_in_period(TransactionKind::Expense, from, to)
            .await?;

        let customers = self.customer_repo.list_active_customers().await?;
        let (due_today, due_tomorrow, overdue) = count_statuses(&customers, today);

        Ok(DashboardSummary {
            month_income,
            month_expense,
            month_net: month_income - month_expense,
            active_customers: customers.len() as i64,
            due_today,
            due_tomorrow,
            overdue,
        })
    }
}

// =========================================================================
//  MONTAGEM PURA (testável sem banco)
// =========================================================================

/// Primeiro e último dia do mês da data dada
fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    // O fallback é inalcançável: dia 1 existe em todo mês
    let first = today.with_day(1).unwrap_or(today);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .unwrap_or(today);
    (first, last)
}

fn build_finance_rows(transactions: &[Transaction]) -> (Vec<FinanceReportRow>, FinanceTotals) {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;

    let rows = transactions
        .iter()
        .map(|t| {
            match t.kind {
                TransactionKind::Income => income += t.amount,
                TransactionKind::Expense => expense += t.amount,
            }
            FinanceReportRow {
                date: t.date,
                kind: t.kind.as_str().to_string(),
                concept: t.concept.clone(),
                amount: t.amount,
            }
        })
        .collect();

    let totals = FinanceTotals { income, expense, net: income - expense };

    (rows, totals)
}

fn build_membership_rows(customers: &[Customer], today: NaiveDate) -> Vec<MembershipReportRow> {
    customers
        .iter()
        .map(|c| MembershipReportRow {
            full_name: c.full_name.clone(),
            phone: c.phone.clone(),
            plan_name: c.plan_name.clone(),
            inscription_date: c.inscription_date,
            due_date: c.due_date,
            monthly_fee: c.monthly_fee,
            lifecycle: c.status.as_str(),
            status: classify(c.due_date, today).as_str(),
        })
        .collect()
}

fn render_finance_csv(
    rows: &[FinanceReportRow],
    totals: FinanceTotals,
) -> Result<Vec<u8>, AppError> {
    // Cabeçalho manual: com has_headers(false) o serialize não duplica
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    csv_err(writer.write_record(["date", "kind", "concept", "amount"]))?;
    for row in rows {
        csv_err(writer.serialize(row))?;
    }

    // Totais computados junto com as linhas
    csv_err(writer.write_record(["", "", "", ""]))?;
    csv_err(writer.write_record(["", "", "total_income", &totals.income.to_string()]))?;
    csv_err(writer.write_record(["", "", "total_expense", &totals.expense.to_string()]))?;
    csv_err(writer.write_record(["", "", "net", &totals.net.to_string()]))?;

    writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))
}

fn render_membership_csv(rows: &[MembershipReportRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    csv_err(writer.write_record([
        "full_name",
        "phone",
        "plan_name",
        "inscription_date",
        "due_date",
        "monthly_fee",
        "lifecycle",
        "status",
    ]))?;
    for row in rows {
        csv_err(writer.serialize(row))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))
}

fn count_statuses(customers: &[Customer], today: NaiveDate) -> (i64, i64, i64) {
    let mut due_today = 0;
    let mut due_tomorrow = 0;
    let mut overdue = 0;

    for customer in customers {
        match classify(customer.due_date, today) {
            MembershipStatus::DueToday => due_today += 1,
            MembershipStatus::DueTomorrow => due_tomorrow += 1,
            MembershipStatus::Overdue => overdue += 1,
            MembershipStatus::Active => {}
        }
    }

    (due_today, due_tomorrow, overdue)
}

fn csv_err(result: Result<(), csv::Error>) -> Result<(), AppError> {
    result.map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))
}

/// Oito primeiros hex do UUID, suficiente como referência humana do recibo
fn short_reference(id: Uuid) -> String {
    id.simple().to_string()[..8].to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customer::CustomerStatus;
    use chrono::Utc;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn transaction(kind: TransactionKind, amount: &str, concept: &str, date: &str) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            kind,
            amount: amount.parse().unwrap(),
            concept: concept.to_string(),
            date: d(date),
            customer_id: None,
            created_at: Utc::now(),
        }
    }

    fn customer(due_date: &str, status: CustomerStatus) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            full_name: "Maria da Silva".to_string(),
            phone: "+5511999990000".to_string(),
            plan_name: "Monthly".to_string(),
            inscription_date: d("2024-01-15"),
            due_date: d(due_date),
            monthly_fee: Decimal::new(8990, 2),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn month_bounds_cover_the_whole_month() {
        assert_eq!(month_bounds(d("2024-02-10")), (d("2024-02-01"), d("2024-02-29")));
        assert_eq!(month_bounds(d("2023-12-31")), (d("2023-12-01"), d("2023-12-31")));
        assert_eq!(month_bounds(d("2024-01-01")), (d("2024-01-01"), d("2024-01-31")));
    }

    #[test]
    fn finance_rows_accumulate_totals_by_kind() {
        let transactions = vec![
            transaction(TransactionKind::Income, "100.00", "Mensalidade", "2024-01-05"),
            transaction(TransactionKind::Income, "50.00", "Diária", "2024-01-06"),
            transaction(TransactionKind::Expense, "30.00", "Água", "2024-01-07"),
        ];

        let (rows, totals) = build_finance_rows(&transactions);

        assert_eq!(rows.len(), 3);
        assert_eq!(totals.income, Decimal::new(15000, 2));
        assert_eq!(totals.expense, Decimal::new(3000, 2));
        assert_eq!(totals.net, Decimal::new(12000, 2));
    }

    #[test]
    fn finance_csv_contains_header_rows_and_totals() {
        let transactions = vec![transaction(
            TransactionKind::Income,
            "100.00",
            "Mensalidade",
            "2024-01-05",
        )];

        let (rows, totals) = build_finance_rows(&transactions);
        let bytes = render_finance_csv(&rows, totals).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("date,kind,concept,amount"));
        assert!(text.contains("2024-01-05,income,Mensalidade,100"));
        assert!(text.contains("total_income,100"));
        assert!(text.contains("net,100"));
    }

    #[test]
    fn membership_rows_carry_the_live_status() {
        let today = d("2024-06-10");
        let customers = vec![
            customer("2024-06-10", CustomerStatus::Active),
            customer("2024-06-05", CustomerStatus::Active),
        ];

        let rows = build_membership_rows(&customers, today);

        assert_eq!(rows[0].status, "DUE_TODAY");
        assert_eq!(rows[1].status, "OVERDUE");
        assert_eq!(rows[0].lifecycle, "active");
    }

    #[test]
    fn membership_csv_has_one_line_per_customer_plus_header() {
        let today = d("2024-06-10");
        let customers = vec![
            customer("2024-06-11", CustomerStatus::Active),
            customer("2024-07-10", CustomerStatus::Inactive),
        ];

        let rows = build_membership_rows(&customers, today);
        let bytes = render_membership_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("DUE_TOMORROW"));
        assert!(text.contains("ACTIVE"));
    }

    #[test]
    fn count_statuses_buckets_customers() {
        let today = d("2024-06-10");
        let customers = vec![
            customer("2024-06-10", CustomerStatus::Active),
            customer("2024-06-11", CustomerStatus::Active),
            customer("2024-06-01", CustomerStatus::Active),
            customer("2024-08-01", CustomerStatus::Active),
        ];

        assert_eq!(count_statuses(&customers, today), (1, 1, 1));
    }

    #[test]
    fn short_reference_is_eight_hex_chars() {
        let reference = short_reference(Uuid::new_v4());
        assert_eq!(reference.len(), 8);
        assert!(reference.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
