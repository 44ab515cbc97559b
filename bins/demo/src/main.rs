//! Steward ledger walkthrough.
//!
//! Runs one bookkeeping year for a small club against an in-memory store:
//! chart of accounts, postings, a bank reconciliation, and the fiscal
//! period close with a reopen. Every step logs what changed.
//!
//! Usage: cargo run --bin steward

use std::str::FromStr;

use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use steward_core::ledger::{AccountCategory, TransactionKind};
use steward_core::reconcile::ManualMatchEntry;
use steward_core::reports::summarize_accounts;
use steward_shared::{AccountId, ActorId, CoreConfig, OrganizationId};
use steward_store::{
    AccountFilter, AccountRepository, CreateAccountInput, CreatePeriodInput, FiscalRepository,
    ImportLineInput, ImportStatementInput, LedgerStore, OrganizationRepository,
    PostTransactionInput, ReconciliationRepository, TransactionFilter, TransactionRepository,
    UpdateAccountInput,
};

/// Demo actor ID (consistent across runs).
const DEMO_ACTOR_ID: &str = "00000000-0000-0000-0000-000000000001";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steward=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CoreConfig::load().context("Failed to load configuration")?;
    let actor = ActorId::from_uuid(Uuid::from_str(DEMO_ACTOR_ID)?);

    let store = LedgerStore::new();
    let organizations = OrganizationRepository::new(store.clone());
    let accounts = AccountRepository::new(store.clone());
    let transactions = TransactionRepository::new(store.clone());
    let fiscal = FiscalRepository::new(store.clone());
    let reconciliation = ReconciliationRepository::new(store, config.matching);

    // ---- Organization and chart of accounts ---------------------------------

    let organization = organizations.create("Riverside Youth Club", actor)?;
    let organization_id = organization.entity.id;
    info!(organization = %organization_id, "Created organization");

    let chart = [
        ("1000", "Cash", AccountCategory::Asset),
        ("2000", "Accounts Payable", AccountCategory::Liability),
        ("3900", "Fund Balance", AccountCategory::Equity),
        ("4000", "Membership Dues", AccountCategory::Revenue),
        ("4100", "Grants", AccountCategory::Revenue),
        ("5000", "Supplies", AccountCategory::Expense),
        ("5100", "Hall Rent", AccountCategory::Expense),
    ];
    let mut ids: Vec<AccountId> = Vec::with_capacity(chart.len());
    for (code, name, category) in chart {
        let account = accounts.create(
            CreateAccountInput {
                organization_id,
                code: code.to_string(),
                name: name.to_string(),
                description: None,
                category,
                parent_account_id: None,
                is_active: true,
            },
            actor,
        )?;
        ids.push(account.entity.id);
    }
    let [cash, _payable, fund_balance, dues, grants, supplies, rent] = ids[..] else {
        anyhow::bail!("chart of accounts seeding is incomplete");
    };
    organizations.set_fund_balance_account(organization_id, fund_balance, actor)?;
    info!(accounts = chart.len(), "Chart of accounts ready");

    // ---- A year of activity -------------------------------------------------

    let period = fiscal.create_period(
        CreatePeriodInput {
            organization_id,
            name: "FY2025".to_string(),
            start_date: date(2025, 1, 1),
            end_date: date(2025, 12, 31),
        },
        actor,
    )?;
    info!(period = %period.entity.id, "Opened fiscal period FY2025");

    let post = |kind, day: NaiveDate, description: &str, reference: Option<&str>, amount, debit, credit| {
        transactions.post(
            PostTransactionInput {
                organization_id,
                kind,
                date: day,
                description: description.to_string(),
                reference: reference.map(str::to_string),
                amount,
                debit_account_id: debit,
                credit_account_id: credit,
            },
            actor,
        )
    };
    post(
        TransactionKind::Income,
        date(2025, 3, 10),
        "March membership dues",
        Some("REF-1"),
        dec!(1500.00),
        cash,
        dues,
    )?;
    post(
        TransactionKind::Income,
        date(2025, 4, 2),
        "Community grant",
        Some("GRANT-7"),
        dec!(500.00),
        cash,
        grants,
    )?;
    post(
        TransactionKind::Expense,
        date(2025, 5, 12),
        "Office supplies at Staples",
        None,
        dec!(250.00),
        supplies,
        cash,
    )?;
    // The hall rent went out as one bank transfer but was booked in halves.
    post(
        TransactionKind::Expense,
        date(2025, 6, 1),
        "Hall rent June, first half",
        None,
        dec!(125.00),
        rent,
        cash,
    )?;
    post(
        TransactionKind::Expense,
        date(2025, 6, 1),
        "Hall rent June, second half",
        None,
        dec!(125.00),
        rent,
        cash,
    )?;
    let mistake = post(
        TransactionKind::Income,
        date(2025, 6, 3),
        "Dues entered twice",
        None,
        dec!(75.00),
        cash,
        dues,
    )?;
    transactions.void(mistake.entity.id, "Duplicate entry", actor)?;
    info!(
        posted = transactions
            .list(organization_id, TransactionFilter::default())
            .len(),
        "Posted the year's transactions (one voided)"
    );

    log_summary("After posting", &accounts, organization_id);

    // ---- Version history ----------------------------------------------------

    accounts.update(
        cash,
        UpdateAccountInput {
            name: Some("Cash - First National".to_string()),
            ..UpdateAccountInput::default()
        },
        actor,
    )?;
    let history = accounts.history(cash)?;
    info!(
        versions = history.len(),
        current = %history[0].entity.name,
        "Cash account renamed, prior versions retained"
    );

    // ---- Bank reconciliation ------------------------------------------------

    let statement = reconciliation.import_statement(
        ImportStatementInput {
            organization_id,
            account_id: cash,
            name: "Checking, March-June 2025".to_string(),
            statement_date: date(2025, 6, 30),
            lines: vec![
                line(date(2025, 3, 10), "MEMBER DUES DEPOSIT", Some("ref-1"), dec!(1500.00)),
                line(date(2025, 4, 3), "GRANT TRANSFER", Some("GRANT 7"), dec!(500.00)),
                line(date(2025, 5, 13), "STAPLES PURCHASE 1234", None, dec!(-250.00)),
                line(date(2025, 6, 2), "HALL RENT", None, dec!(-250.00)),
                line(date(2025, 6, 30), "MONTHLY SERVICE FEE", None, dec!(-12.00)),
            ],
        },
        actor,
    )?;
    let statement_id = statement.entity.id;
    info!(statement = %statement_id, lines = 5, "Imported bank statement");

    let summary = reconciliation.auto_match(statement_id, actor)?;
    info!(
        exact = summary.exact_matches,
        fuzzy = summary.fuzzy_matches,
        unmatched = summary.unmatched,
        "Auto-match finished"
    );

    // No single ledger entry equals the rent transfer, so the matcher left
    // that line open. Split it by hand across the two bookings.
    let rent_line = find_line(&reconciliation, statement_id, "HALL RENT")?;
    let rent_entries: Vec<ManualMatchEntry> = transactions
        .list(organization_id, TransactionFilter::default())
        .into_iter()
        .filter(|t| t.entity.description.starts_with("Hall rent"))
        .map(|t| ManualMatchEntry {
            transaction_id: t.entity.id,
            amount: t.entity.amount,
        })
        .collect();
    reconciliation.manual_match(rent_line, &rent_entries, actor)?;
    info!(parts = rent_entries.len(), "Manually matched the rent line");

    // The service fee has no ledger side at all.
    let fee_line = find_line(&reconciliation, statement_id, "SERVICE FEE")?;
    reconciliation.skip_line(fee_line, actor)?;
    info!("Skipped the bank fee line");

    let completion = reconciliation.complete_reconciliation(statement_id, actor)?;
    let outstanding = transactions.list(
        organization_id,
        TransactionFilter {
            is_reconciled: Some(false),
            ..TransactionFilter::default()
        },
    );
    info!(
        confirmed_lines = completion.confirmed_lines,
        reconciled_transactions = completion.reconciled_transactions,
        outstanding = outstanding.len(),
        "Reconciliation completed"
    );

    // ---- Fiscal close -------------------------------------------------------

    let preview = fiscal.preview_close(period.entity.id)?;
    info!(
        entries = preview.entries.len(),
        revenue = %preview.total_revenue,
        expenses = %preview.total_expenses,
        net = %preview.net_result,
        "Close preview"
    );

    let closed = fiscal.execute_close(period.entity.id, actor)?;
    info!(
        closing_entries = closed.entity.closing_transaction_ids.len(),
        "Period closed"
    );
    log_summary("After close", &accounts, organization_id);

    // A back-dated posting is now rejected.
    anyhow::ensure!(
        post(
            TransactionKind::Income,
            date(2025, 9, 1),
            "Too late",
            None,
            dec!(10.00),
            cash,
            dues,
        )
        .is_err(),
        "a posting dated inside a closed period must be refused"
    );
    info!("Posting into the closed period refused");

    // Reopen for a correction, then close again.
    fiscal.reopen_period(period.entity.id, actor)?;
    info!("Period reopened, closing entries voided");
    post(
        TransactionKind::Income,
        date(2025, 11, 20),
        "Forgotten dues",
        None,
        dec!(60.00),
        cash,
        dues,
    )?;
    fiscal.execute_close(period.entity.id, actor)?;
    log_summary("After the corrected close", &accounts, organization_id);

    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid demo date")
}

fn line(
    day: NaiveDate,
    description: &str,
    reference: Option<&str>,
    amount: rust_decimal::Decimal,
) -> ImportLineInput {
    ImportLineInput {
        date: day,
        description: description.to_string(),
        reference: reference.map(str::to_string),
        amount,
    }
}

fn find_line(
    reconciliation: &ReconciliationRepository,
    statement_id: steward_shared::StatementId,
    needle: &str,
) -> anyhow::Result<steward_shared::StatementLineId> {
    reconciliation
        .lines(statement_id)?
        .iter()
        .find(|line| line.entity.description.contains(needle))
        .map(|line| line.entity.id)
        .with_context(|| format!("statement line '{needle}' missing"))
}

fn log_summary(label: &str, accounts: &AccountRepository, organization_id: OrganizationId) {
    let snapshots: Vec<_> = accounts
        .list(organization_id, AccountFilter::default())
        .iter()
        .map(|version| version.entity.snapshot())
        .collect();
    let summary = summarize_accounts(&snapshots);
    info!(
        assets = %summary.total_assets,
        liabilities = %summary.total_liabilities,
        equity = %summary.equity_with_net_income(),
        net_income = %summary.net_income,
        balanced = summary.is_balanced(),
        "{label}"
    );
}
