// src/services/membership.rs
//
// O coração do domínio: cálculo de vencimento e classificação de status.
// Tudo aqui é função pura sobre NaiveDate: sem I/O, sem estado, sem fuso.

use chrono::{Days, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- ENUMS ---

/// Plano de cobrança do cliente. O nome vem como texto livre do banco,
/// então o parse nunca falha: desconhecido cai no mensal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Plan {
    Monthly,
    Bimonthly,
    Quarterly,
}

impl Plan {
    /// Política fail-open: plano não reconhecido vira Monthly, nunca erro.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("Bimonthly") {
            Plan::Bimonthly
        } else if name.eq_ignore_ascii_case("Quarterly") {
            Plan::Quarterly
        } else {
            Plan::Monthly
        }
    }

    /// Quantos meses de calendário o plano compra.
    pub fn months(self) -> u32 {
        match self {
            Plan::Monthly => 1,
            Plan::Bimonthly => 2,
            Plan::Quarterly => 3,
        }
    }
}

/// Status calculado da mensalidade. Nunca é persistido: é derivado de novo
/// em toda leitura, para a resposta refletir o "hoje" do momento da request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    DueToday,
    DueTomorrow,
    Overdue,
    Active,
}

impl MembershipStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MembershipStatus::DueToday => "DUE_TODAY",
            MembershipStatus::DueTomorrow => "DUE_TOMORROW",
            MembershipStatus::Overdue => "OVERDUE",
            MembershipStatus::Active => "ACTIVE",
        }
    }
}

/// Estratégia de derivação do vencimento, escolhida por perfil de deploy
/// (variável DUE_DATE_STRATEGY). O padrão é o offset por plano.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DueDateStrategy {
    #[default]
    PlanOffset,
    FlatThirtyDays,
}

impl DueDateStrategy {
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "plan_offset" => Ok(DueDateStrategy::PlanOffset),
            "flat_30_days" => Ok(DueDateStrategy::FlatThirtyDays),
            other => anyhow::bail!(
                "DUE_DATE_STRATEGY inválida: '{}' (use 'plan_offset' ou 'flat_30_days')",
                other
            ),
        }
    }
}

// --- FUNÇÕES DO CORE ---

/// Calcula o vencimento a partir da data de inscrição.
///
/// Regras, nesta ordem:
/// 1. Override manual presente → devolvido sem nenhuma aritmética de plano.
/// 2. PlanOffset → inscrição + N meses de calendário (Monthly 1,
///    Bimonthly 2, Quarterly 3; desconhecido cai em 1).
/// 3. FlatThirtyDays → inscrição + 30 dias, ignorando o plano.
///
/// A soma de meses usa o clamp do chrono: 31/jan + 1 mês = 29/fev ou 28/fev,
/// nunca transborda para o mês seguinte. Os testes abaixo pregam isso.
pub fn compute_due_date(
    strategy: DueDateStrategy,
    plan_name: &str,
    inscription_date: NaiveDate,
    manual_due_date: Option<NaiveDate>,
) -> NaiveDate {
    if let Some(manual) = manual_due_date {
        return manual;
    }

    match strategy {
        DueDateStrategy::PlanOffset => {
            let plan = Plan::from_name(plan_name);
            // Satura no limite do calendário (ano ~262k, inalcançável na prática)
            inscription_date
                .checked_add_months(Months::new(plan.months()))
                .unwrap_or(NaiveDate::MAX)
        }
        DueDateStrategy::FlatThirtyDays => inscription_date
            .checked_add_days(Days::new(30))
            .unwrap_or(NaiveDate::MAX),
    }
}

/// Classifica a pontualidade do cliente comparando vencimento com "hoje".
///
/// Função pura e total: todo diff_days cai em exatamente um status.
/// A ordem dos testes importa (primeiro match vence).
pub fn classify(due_date: NaiveDate, today: NaiveDate) -> MembershipStatus {
    let diff_days = due_date.signed_duration_since(today).num_days();

    match diff_days {
        0 => MembershipStatus::DueToday,
        1 => MembershipStatus::DueTomorrow,
        d if d < 0 => MembershipStatus::Overdue,
        _ => MembershipStatus::Active,
    }
}

/// "Hoje" como data de calendário LOCAL, sem componente de hora.
///
/// Importante: nunca construa essa data passando por um timestamp UTC.
/// A oeste de UTC isso desloca o dia e gera off-by-one no status.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // --- compute_due_date: cenários por plano ---

    #[test]
    fn monthly_adds_one_calendar_month() {
        let due = compute_due_date(DueDateStrategy::PlanOffset, "Monthly", d("2024-01-15"), None);
        assert_eq!(due, d("2024-02-15"));
    }

    #[test]
    fn bimonthly_adds_two_calendar_months() {
        let due = compute_due_date(DueDateStrategy::PlanOffset, "Bimonthly", d("2024-01-15"), None);
        assert_eq!(due, d("2024-03-15"));
    }

    #[test]
    fn quarterly_adds_three_calendar_months() {
        let due = compute_due_date(DueDateStrategy::PlanOffset, "Quarterly", d("2024-01-15"), None);
        assert_eq!(due, d("2024-04-15"));
    }

    #[test]
    fn unknown_plan_falls_open_to_monthly() {
        let due = compute_due_date(DueDateStrategy::PlanOffset, "Unknown", d("2024-01-15"), None);
        assert_eq!(due, d("2024-02-15"));
    }

    #[test]
    fn empty_plan_falls_open_to_monthly() {
        let due = compute_due_date(DueDateStrategy::PlanOffset, "", d("2024-01-15"), None);
        assert_eq!(due, d("2024-02-15"));
    }

    #[test]
    fn manual_override_wins_over_any_plan() {
        let due = compute_due_date(
            DueDateStrategy::PlanOffset,
            "Quarterly",
            d("2024-01-15"),
            Some(d("2024-01-20")),
        );
        assert_eq!(due, d("2024-01-20"));

        // Vale também na estratégia flat
        let due = compute_due_date(
            DueDateStrategy::FlatThirtyDays,
            "Monthly",
            d("2024-01-15"),
            Some(d("2025-12-31")),
        );
        assert_eq!(due, d("2025-12-31"));
    }

    // --- compute_due_date: clamp de fim de mês ---

    #[test]
    fn month_add_clamps_to_leap_february() {
        let due = compute_due_date(DueDateStrategy::PlanOffset, "Monthly", d("2024-01-31"), None);
        assert_eq!(due, d("2024-02-29"));
    }

    #[test]
    fn month_add_clamps_to_short_february() {
        let due = compute_due_date(DueDateStrategy::PlanOffset, "Monthly", d("2023-01-31"), None);
        assert_eq!(due, d("2023-02-28"));
    }

    #[test]
    fn quarterly_clamps_across_year_boundary() {
        let due = compute_due_date(DueDateStrategy::PlanOffset, "Quarterly", d("2023-11-30"), None);
        // Nov 30 + 3 meses cai em fevereiro: dia 30 não existe, clampa para 29
        assert_eq!(due, d("2024-02-29"));
    }

    #[test]
    fn bimonthly_clamps_into_short_february() {
        let due = compute_due_date(DueDateStrategy::PlanOffset, "Bimonthly", d("2024-12-31"), None);
        // Dez 31 + 2 meses → Fev, clampa para 28 (2025 não é bissexto)
        assert_eq!(due, d("2025-02-28"));
    }

    // --- compute_due_date: estratégia flat de 30 dias ---

    #[test]
    fn flat_strategy_ignores_plan() {
        let due = compute_due_date(DueDateStrategy::FlatThirtyDays, "Quarterly", d("2024-01-15"), None);
        assert_eq!(due, d("2024-02-14"));
    }

    #[test]
    fn flat_strategy_crosses_month_boundary() {
        let due = compute_due_date(DueDateStrategy::FlatThirtyDays, "Monthly", d("2024-12-15"), None);
        assert_eq!(due, d("2025-01-14"));
    }

    // --- classify: propriedades ---

    #[test]
    fn due_on_the_same_day_is_due_today() {
        let today = d("2024-06-10");
        assert_eq!(classify(today, today), MembershipStatus::DueToday);
    }

    #[test]
    fn due_one_day_ahead_is_due_tomorrow() {
        let today = d("2024-06-10");
        assert_eq!(classify(d("2024-06-11"), today), MembershipStatus::DueTomorrow);
    }

    #[test]
    fn due_two_or_more_days_ahead_is_active() {
        let today = d("2024-06-10");
        for n in 2..60 {
            let due = today.checked_add_days(Days::new(n)).unwrap();
            assert_eq!(classify(due, today), MembershipStatus::Active, "n = {}", n);
        }
    }

    #[test]
    fn any_past_due_date_is_overdue() {
        let today = d("2024-06-10");
        for n in 1..60 {
            let due = today.checked_sub_days(Days::new(n)).unwrap();
            assert_eq!(classify(due, today), MembershipStatus::Overdue, "n = {}", n);
        }
    }

    #[test]
    fn classify_is_idempotent() {
        let today = d("2024-06-10");
        let due = d("2024-06-05");
        assert_eq!(classify(due, today), classify(due, today));
    }

    #[test]
    fn classify_known_dates() {
        assert_eq!(classify(d("2024-06-10"), d("2024-06-10")), MembershipStatus::DueToday);
        assert_eq!(classify(d("2024-06-05"), d("2024-06-10")), MembershipStatus::Overdue);
    }

    #[test]
    fn classify_works_across_month_and_year_boundaries() {
        // 31/dez → 01/jan é exatamente 1 dia de calendário
        assert_eq!(classify(d("2025-01-01"), d("2024-12-31")), MembershipStatus::DueTomorrow);
        assert_eq!(classify(d("2024-03-01"), d("2024-02-29")), MembershipStatus::DueTomorrow);
    }

    // --- nomes de wire ---

    #[test]
    fn status_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&MembershipStatus::DueToday).unwrap();
        assert_eq!(json, "\"DUE_TODAY\"");
        assert_eq!(MembershipStatus::Overdue.as_str(), "OVERDUE");
    }

    // --- estratégia ---

    #[test]
    fn strategy_parses_known_values() {
        assert_eq!(DueDateStrategy::parse("plan_offset").unwrap(), DueDateStrategy::PlanOffset);
        assert_eq!(DueDateStrategy::parse("flat_30_days").unwrap(), DueDateStrategy::FlatThirtyDays);
        assert!(DueDateStrategy::parse("every_full_moon").is_err());
    }
}
