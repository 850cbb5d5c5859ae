use crate::cli::SimulationArgs;
use crate::infra::{parse_date, parse_status_filter, seed_repository, Services};
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use fleet_lease::config::AppConfig;
use fleet_lease::error::AppError;
use fleet_lease::workflows::dashboard::dashboard_summary;
use fleet_lease::workflows::fleet::{FleetRepository, Payment, PaymentId, VehicleId};
use fleet_lease::workflows::intake::{IntakeError, LeaseDraft, LesseeForm, LesseeMode};
use fleet_lease::workflows::payments::{
    ledger, ledger_csv, PaymentRow, PaymentStats, StatusFilter,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DashboardArgs {
    /// Reporting date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum PaymentsCommand {
    /// List the ledger with optional search and status filter
    List(ListArgs),
    /// Charge a payment with the given method
    Process(ProcessArgs),
    /// Retry a payment through the automatic retry path
    Retry(RetryArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// Match on lessee name or vehicle id
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    /// all, paid, pending, overdue or failed
    #[arg(long, value_parser = parse_status_filter, default_value = "all")]
    pub(crate) status: StatusFilter,
    /// Reporting date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Emit the filtered ledger as CSV instead of a table
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ProcessArgs {
    pub(crate) payment_id: String,
    #[arg(long, default_value = "Credit Card")]
    pub(crate) method: String,
    #[command(flatten)]
    pub(crate) simulation: SimulationArgs,
}

#[derive(Args, Debug)]
pub(crate) struct RetryArgs {
    pub(crate) payment_id: String,
    #[command(flatten)]
    pub(crate) simulation: SimulationArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reporting date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    #[command(flatten)]
    pub(crate) simulation: SimulationArgs,
}

fn seeded_services(simulation: &SimulationArgs) -> Result<Services, AppError> {
    let mut config = AppConfig::load()?;
    simulation.apply(&mut config.simulation);
    Ok(Services::new(seed_repository(), &config.simulation))
}

fn today_or_local(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let summary = dashboard_summary(&seed_repository(), today_or_local(args.today))?;
    for line in summary.lines() {
        println!("{line}");
    }
    Ok(())
}

pub(crate) async fn run_payments(command: PaymentsCommand) -> Result<(), AppError> {
    match command {
        PaymentsCommand::List(args) => {
            let repository = seed_repository();
            let today = today_or_local(args.today);
            let payments = repository.payments()?;
            let rows = ledger::search_payments(
                &payments,
                &repository.lessees()?,
                &args.search,
                args.status,
                today,
            );

            if args.csv {
                print!("{}", ledger_csv(&rows)?);
            } else {
                render_ledger(&PaymentStats::from_payments(&payments, today), &rows);
            }
            Ok(())
        }
        PaymentsCommand::Process(args) => {
            let services = seeded_services(&args.simulation)?;
            let payment = services
                .payments
                .process(&PaymentId::from(args.payment_id.as_str()), &args.method)
                .await?;
            println!("{}", outcome_line(&payment));
            Ok(())
        }
        PaymentsCommand::Retry(args) => {
            let services = seeded_services(&args.simulation)?;
            let payment = services
                .payments
                .retry(&PaymentId::from(args.payment_id.as_str()))
                .await?;
            println!("{}", outcome_line(&payment));
            Ok(())
        }
    }
}

fn render_ledger(stats: &PaymentStats, rows: &[PaymentRow]) {
    println!(
        "{} payments: {} paid, {} pending, {} overdue, {} failed",
        stats.total, stats.paid, stats.pending, stats.overdue, stats.failed
    );
    println!(
        "Collected {} of {} ({})",
        stats.total_collected,
        stats.total_expected,
        ledger::format_rate(stats.collection_rate)
    );

    if rows.is_empty() {
        println!("\nNo payments match the current filter");
        return;
    }

    println!();
    for row in rows {
        let overdue_note = if row.days_overdue > 0 {
            format!(" ({} days overdue)", row.days_overdue)
        } else {
            String::new()
        };
        let attempts_note = match row.payment.attempts() {
            0 | 1 => String::new(),
            attempts => format!(", {attempts} attempts"),
        };
        println!(
            "- {} | {} | {} | {} | due {}{} | {}{}",
            row.payment.id,
            row.lessee_name,
            row.payment.vehicle_id,
            row.payment.amount,
            row.payment.due_date,
            overdue_note,
            row.effective_status.label(),
            attempts_note
        );
    }
}

fn outcome_line(payment: &Payment) -> String {
    match &payment.transaction_id {
        Some(transaction) => format!(
            "{} {} via {} ({})",
            payment.id,
            payment.status.label(),
            payment.payment_method.as_deref().unwrap_or("-"),
            transaction
        ),
        None => format!(
            "{} {} after {} attempt(s)",
            payment.id,
            payment.status.label(),
            payment.attempts()
        ),
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let services = seeded_services(&args.simulation)?;
    let today = today_or_local(args.today);

    println!("Fleet lease operations demo");
    println!();
    for line in dashboard_summary(services.repository.as_ref(), today)?.lines() {
        println!("{line}");
    }

    println!("\nRegistering a lessee");
    let mut form = LesseeForm {
        name: "Alex Kim".to_string(),
        vehicle_id: "V004".to_string(),
        email: "alex.kim@email.com".to_string(),
        ..LesseeForm::default()
    };
    for key in "5552468013".chars() {
        let typed = format!("{}{key}", form.phone);
        form.set_phone(&typed);
    }
    match services.intake.register_lessee(&form, today).await {
        Ok(lessee) => println!(
            "- {} registered as {} ({}, {})",
            lessee.name, lessee.id, lessee.phone, lessee.status
        ),
        Err(err) => report_intake_failure(&err),
    }

    println!("\nCreating a lease for a new lessee");
    let vehicle_id = VehicleId::from("V007");
    let vehicle = services.repository.vehicle(&vehicle_id)?;
    let mut draft = LeaseDraft {
        lessee_mode: LesseeMode::New,
        terms: "Twelve month personal lease. Lessee keeps full coverage insurance, \
                services the vehicle on schedule and pays excess mileage at lease end."
            .to_string(),
        ..LeaseDraft::default()
    };
    draft.select_vehicle(vehicle_id.as_str(), vehicle.as_ref());
    draft.set_start_date(Some(today));
    draft.new_lessee.name = "Priya Patel".to_string();
    draft.new_lessee.email = "priya.patel@email.com".to_string();
    draft.set_new_lessee_phone("555 321 7788");

    let quote = draft.quote();
    println!(
        "- Quote: {} months at {} = {}",
        quote
            .duration_months
            .map_or_else(|| "-".to_string(), |months| months.to_string()),
        quote
            .monthly_payment
            .map_or_else(|| "-".to_string(), |amount| amount.to_string()),
        quote
            .total_value
            .map_or_else(|| "-".to_string(), |total| total.to_string()),
    );
    match services.intake.create_lease(&draft).await {
        Ok(lease) => println!(
            "- Lease {} created for {} on {} ({} -> {})",
            lease.id, lease.lessee_id, lease.vehicle_id, lease.start_date, lease.end_date
        ),
        Err(err) => report_intake_failure(&err),
    }

    println!("\nCollecting payments");
    for payment_id in ["P003", "P002"] {
        let payment = services
            .payments
            .process(&PaymentId::from(payment_id), "Bank Transfer")
            .await?;
        println!("- {}", outcome_line(&payment));
    }
    let retried = services.payments.retry(&PaymentId::from("P004")).await?;
    println!("- {}", outcome_line(&retried));

    println!();
    for line in dashboard_summary(services.repository.as_ref(), today)?.lines() {
        println!("{line}");
    }
    Ok(())
}

fn report_intake_failure(err: &IntakeError) {
    match err {
        IntakeError::Invalid(errors) => {
            println!("- Rejected:");
            for (field, message) in errors.iter() {
                println!("    {field}: {message}");
            }
        }
        other => println!("- {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_lease::workflows::fleet::{PaymentStatus, TransactionId};

    fn payment(id: &str) -> Payment {
        let due = NaiveDate::from_ymd_opt(2024, 2, 10).expect("valid date");
        Payment::pending(
            PaymentId::from(id),
            "L003".into(),
            "V003".into(),
            500.into(),
            due,
        )
    }

    #[test]
    fn outcome_line_names_the_transaction_when_settled() {
        let mut settled = payment("P003");
        settled.status = PaymentStatus::Paid;
        settled.payment_method = Some("Bank Transfer".to_string());
        settled.transaction_id = Some(TransactionId::from("TXN000000001"));
        assert_eq!(
            outcome_line(&settled),
            "P003 Paid via Bank Transfer (TXN000000001)"
        );

        let mut declined = payment("P004");
        declined.status = PaymentStatus::Failed;
        declined.attempt_count = Some(4);
        assert_eq!(outcome_line(&declined), "P004 Failed after 4 attempt(s)");
    }
}
