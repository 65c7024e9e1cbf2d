//! Command table and handlers for the ledger shell.

use chrono::NaiveDate;

use crate::ledger::{
    Amount, AmountKind, Category, Entry, EntryDraft, EntryId, FinancialHealth, InstallmentIntent,
    PaymentStatus, YearMonth,
};
use crate::{currency::parse_amount, errors::LedgerError};

use super::core::{CliError, CommandResult, LoopControl, ShellContext};
use super::output;

type Handler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub(crate) struct CommandDefinition {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    pub handler: Handler,
}

const COMMANDS: &[CommandDefinition] = &[
    CommandDefinition {
        name: "add",
        usage: "add <date|today> <description> <category> <income|expense|investment> <amount> [--status paid|unpaid|pending] [--unnecessary] [--recurring] [--installments N]",
        summary: "Record an entry, a fixed bill, or an installment purchase",
        handler: cmd_add,
    },
    CommandDefinition {
        name: "list",
        usage: "list [YYYY-MM]",
        summary: "List entries of the current (or given) month",
        handler: cmd_list,
    },
    CommandDefinition {
        name: "all",
        usage: "all",
        summary: "List every entry",
        handler: cmd_all,
    },
    CommandDefinition {
        name: "pay",
        usage: "pay <entry-id>",
        summary: "Mark an entry as paid",
        handler: cmd_pay,
    },
    CommandDefinition {
        name: "status",
        usage: "status <entry-id> <paid|unpaid|pending>",
        summary: "Change the payment status of an entry",
        handler: cmd_status,
    },
    CommandDefinition {
        name: "delete",
        usage: "delete <entry-id>",
        summary: "Delete a single entry",
        handler: cmd_delete,
    },
    CommandDefinition {
        name: "delete-group",
        usage: "delete-group <group-id>",
        summary: "Delete every installment of a purchase",
        handler: cmd_delete_group,
    },
    CommandDefinition {
        name: "delete-bill",
        usage: "delete-bill <bill-id>",
        summary: "Delete a fixed bill and all entries it generated",
        handler: cmd_delete_bill,
    },
    CommandDefinition {
        name: "bills",
        usage: "bills",
        summary: "List fixed bills",
        handler: cmd_bills,
    },
    CommandDefinition {
        name: "installments",
        usage: "installments",
        summary: "Show installment purchases and their progress",
        handler: cmd_installments,
    },
    CommandDefinition {
        name: "summary",
        usage: "summary",
        summary: "Show totals, balance and savings ratio",
        handler: cmd_summary,
    },
    CommandDefinition {
        name: "categories",
        usage: "categories",
        summary: "Show spending per category",
        handler: cmd_categories,
    },
    CommandDefinition {
        name: "months",
        usage: "months",
        summary: "Show totals per month",
        handler: cmd_months,
    },
    CommandDefinition {
        name: "help",
        usage: "help",
        summary: "Show this help",
        handler: cmd_help,
    },
    CommandDefinition {
        name: "exit",
        usage: "exit",
        summary: "Leave the shell",
        handler: cmd_exit,
    },
];

pub(crate) fn find(name: &str) -> Option<&'static CommandDefinition> {
    let name = if name == "quit" { "exit" } else { name };
    COMMANDS.iter().find(|definition| definition.name == name)
}

pub(crate) fn names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|definition| definition.name)
}

/// Parsed form of the `add` command.
#[derive(Debug, PartialEq)]
pub(crate) struct AddArgs {
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub unnecessary: bool,
    pub recurring: bool,
    pub installments: Option<u32>,
}

pub(crate) fn parse_add(args: &[&str], today: NaiveDate) -> Result<AddArgs, CliError> {
    let mut positional = Vec::new();
    let mut status = PaymentStatus::Unpaid;
    let mut unnecessary = false;
    let mut recurring = false;
    let mut installments = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match *arg {
            "--unnecessary" => unnecessary = true,
            "--recurring" => recurring = true,
            "--status" => {
                let value = iter.next().ok_or_else(|| missing("--status value"))?;
                status = parse_status(value)?;
            }
            "--installments" => {
                let value = iter.next().ok_or_else(|| missing("--installments value"))?;
                let count: u32 = value.parse().map_err(|_| {
                    CliError::Input(format!("`{value}` is not a valid installment count"))
                })?;
                installments = Some(count);
            }
            flag if flag.starts_with("--") => {
                return Err(CliError::Input(format!("unknown option `{flag}`")));
            }
            value => positional.push(value),
        }
    }

    let [date, description, category, kind, amount] = positional[..] else {
        return Err(CliError::Input(
            "add expects <date> <description> <category> <kind> <amount>".into(),
        ));
    };
    let date = parse_date(date, today)?;
    let category = Category::from_name(category)
        .ok_or_else(|| CliError::Input(format!("unknown category `{category}`")))?;
    let kind = AmountKind::parse(kind)
        .ok_or_else(|| CliError::Input(format!("unknown kind `{kind}`")))?;
    let cents = parse_amount(amount)?;

    Ok(AddArgs {
        date,
        description: description.to_string(),
        category,
        amount: Amount::new(kind, cents),
        status,
        unnecessary,
        recurring,
        installments,
    })
}

fn cmd_add(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_add(args, ctx.today)?;
    match parsed.installments {
        Some(count) if count >= 2 => {
            if parsed.recurring {
                output::warning("Installment purchases cannot be recurring; --recurring ignored.");
            }
            let intent = InstallmentIntent::new(
                parsed.date,
                parsed.description,
                parsed.category,
                parsed.amount,
                count,
            )
            .with_status(parsed.status)
            .unnecessary(parsed.unnecessary);
            let group_id = ctx.manager.add_installment_purchase(&intent)?;
            output::success(format!(
                "{count} installments created (group {group_id})."
            ));
        }
        _ => {
            let recurring = parsed.recurring;
            let draft = EntryDraft::new(
                parsed.date,
                parsed.description,
                parsed.category,
                parsed.amount,
            )
            .with_status(parsed.status)
            .unnecessary(parsed.unnecessary)
            .recurring(recurring);
            let id = ctx.manager.add_entry(draft)?;
            output::success(format!("Entry {id} added."));
            if recurring {
                output::info("Registered as a monthly fixed bill.");
            }
        }
    }
    Ok(LoopControl::Continue)
}

fn cmd_list(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period = match args.first() {
        Some(raw) => raw.parse::<YearMonth>()?,
        None => YearMonth::of(ctx.today),
    };
    output::section(format!("Entries for {period}"));
    let entries = ctx.manager.entries_in_period(period);
    print_entries(ctx, &entries);
    Ok(LoopControl::Continue)
}

fn cmd_all(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("All entries");
    let mut entries: Vec<&Entry> = ctx.manager.ledger().entries.iter().collect();
    entries.sort_by_key(|entry| (entry.date, entry.id));
    print_entries(ctx, &entries);
    Ok(LoopControl::Continue)
}

fn cmd_pay(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(args.first().copied(), "entry id")?;
    ctx.manager.mark_paid(id)?;
    output::success(format!("Entry {id} marked as paid."));
    Ok(LoopControl::Continue)
}

fn cmd_status(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(args.first().copied(), "entry id")?;
    let status = parse_status(args.get(1).ok_or_else(|| missing("status"))?)?;
    ctx.manager.set_payment_status(id, status)?;
    output::success(format!("Entry {id} is now {status}."));
    Ok(LoopControl::Continue)
}

fn cmd_delete(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(args.first().copied(), "entry id")?;
    match ctx.manager.delete_entry(id)? {
        Some(entry) => output::success(format!("Deleted `{}`.", entry.description)),
        None => output::warning(format!("No entry with id {id}.")),
    }
    Ok(LoopControl::Continue)
}

fn cmd_delete_group(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let group_id = parse_id(args.first().copied(), "group id")?;
    if !ctx.confirm("Delete ALL installments of this purchase?")? {
        output::info("Nothing deleted.");
        return Ok(LoopControl::Continue);
    }
    let removed = ctx.manager.delete_installment_group(group_id)?;
    output::success(format!("{removed} installment(s) deleted."));
    Ok(LoopControl::Continue)
}

fn cmd_delete_bill(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let bill_id = parse_id(args.first().copied(), "bill id")?;
    if !ctx.confirm("Delete this fixed bill and every entry it generated?")? {
        output::info("Nothing deleted.");
        return Ok(LoopControl::Continue);
    }
    let removal = ctx.manager.delete_fixed_bill(bill_id)?;
    match removal.bill {
        Some(bill) => output::success(format!(
            "Fixed bill `{}` deleted with {} entr{}.",
            bill.description,
            removal.entries_removed,
            if removal.entries_removed == 1 { "y" } else { "ies" }
        )),
        None => output::warning(format!(
            "No fixed bill with id {bill_id}; {} orphaned entries removed.",
            removal.entries_removed
        )),
    }
    Ok(LoopControl::Continue)
}

fn cmd_bills(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Fixed bills");
    let bills = ctx.manager.fixed_bills();
    if bills.is_empty() {
        output::info("No fixed bills registered.");
        return Ok(LoopControl::Continue);
    }
    let rows: Vec<Vec<String>> = bills
        .iter()
        .map(|bill| {
            vec![
                bill.id.to_string(),
                bill.description.clone(),
                format!("{} {}", bill.category.icon(), bill.category),
                bill.amount.kind.to_string(),
                ctx.money(bill.amount.cents),
            ]
        })
        .collect();
    output::render_table(&["ID", "Description", "Category", "Kind", "Amount"], &rows);
    Ok(LoopControl::Continue)
}

fn cmd_installments(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Installment purchases");
    let groups = ctx.manager.installment_groups();
    if groups.is_empty() {
        output::info("No installment purchases.");
        return Ok(LoopControl::Continue);
    }
    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|group| {
            let mut progress = format!("{}/{}", group.paid_installments, group.total_installments);
            if group.missing_installments() > 0 {
                progress.push_str(&format!(" ({} deleted)", group.missing_installments()));
            }
            vec![
                group.group_id.to_string(),
                group.description.clone(),
                format!("{} {}", group.category.icon(), group.category),
                ctx.money(group.per_installment),
                progress,
                ctx.money(group.total_value),
                ctx.money(group.paid_value),
                ctx.money(group.remaining_value),
            ]
        })
        .collect();
    output::render_table(
        &[
            "Group",
            "Description",
            "Category",
            "Installment",
            "Paid",
            "Total",
            "Paid value",
            "Remaining",
        ],
        &rows,
    );
    Ok(LoopControl::Continue)
}

fn cmd_summary(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = ctx.manager.summary();
    output::section("Summary");
    let rows = vec![
        vec!["Income".to_string(), ctx.money(summary.total_incoming)],
        vec!["Expenses".to_string(), ctx.money(summary.total_outgoing)],
        vec!["Investments".to_string(), ctx.money(summary.total_invested)],
        vec!["Unnecessary".to_string(), ctx.money(summary.total_unnecessary)],
        vec!["Available".to_string(), ctx.money(summary.available_balance)],
        vec!["Net worth".to_string(), ctx.money(summary.net_worth)],
        vec!["Saved".to_string(), format!("{:.1}%", summary.savings_ratio)],
        vec!["Largest expense".to_string(), ctx.money(summary.largest_expense)],
        vec!["Entries".to_string(), summary.entry_count.to_string()],
        vec!["Unpaid".to_string(), summary.unpaid_count.to_string()],
    ];
    output::render_table(&["Metric", "Value"], &rows);
    match summary.health() {
        FinancialHealth::Positive => output::success("Status: positive"),
        FinancialHealth::InDebt => output::warning("Status: in debt"),
    }
    Ok(LoopControl::Continue)
}

fn cmd_categories(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Spending by category");
    let rows: Vec<Vec<String>> = ctx
        .manager
        .category_breakdown()
        .iter()
        .map(|row| {
            vec![
                format!("{} {}", row.icon(), row.category),
                ctx.money(row.total),
                format!("{:.1}%", row.percent),
                row.count.to_string(),
            ]
        })
        .collect();
    output::render_table(&["Category", "Spent", "Share", "Entries"], &rows);
    Ok(LoopControl::Continue)
}

fn cmd_months(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Totals per month");
    let rows: Vec<Vec<String>> = ctx
        .manager
        .monthly_totals()
        .iter()
        .map(|month| {
            vec![
                month.period.to_string(),
                ctx.money(month.incoming),
                ctx.money(month.outgoing),
                ctx.money(month.invested),
                ctx.money(month.balance()),
            ]
        })
        .collect();
    output::render_table(
        &["Month", "Income", "Expenses", "Investments", "Balance"],
        &rows,
    );
    Ok(LoopControl::Continue)
}

fn cmd_help(_ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Commands");
    for definition in COMMANDS {
        println!("  {:<14} {}", definition.name, definition.summary);
        println!("  {:<14} usage: {}", "", definition.usage);
    }
    Ok(LoopControl::Continue)
}

fn cmd_exit(_ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Ok(LoopControl::Exit)
}

fn print_entries(ctx: &ShellContext, entries: &[&Entry]) {
    if entries.is_empty() {
        output::info("No entries.");
        return;
    }
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                entry.id.to_string(),
                entry.date.to_string(),
                entry.description.clone(),
                format!("{} {}", entry.category.icon(), entry.category),
                entry.amount.kind.to_string(),
                ctx.money(entry.amount.cents),
                entry.status.to_string(),
                entry_flags(entry),
            ]
        })
        .collect();
    output::render_table(
        &[
            "ID",
            "Date",
            "Description",
            "Category",
            "Kind",
            "Amount",
            "Status",
            "Flags",
        ],
        &rows,
    );
}

fn entry_flags(entry: &Entry) -> String {
    let mut flags = Vec::new();
    if entry.unnecessary {
        flags.push("unnecessary".to_string());
    }
    if let Some(bill_id) = entry.fixed_bill_id() {
        flags.push(format!("bill {bill_id}"));
    }
    if let Some(group_id) = entry.installment_group_id() {
        flags.push(format!("group {group_id}"));
    }
    flags.join(", ")
}

fn parse_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, CliError> {
    if raw.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CliError::Input(format!("`{raw}` is not a YYYY-MM-DD date")))
}

fn parse_status(raw: &str) -> Result<PaymentStatus, CliError> {
    PaymentStatus::parse(raw).ok_or_else(|| CliError::Input(format!("unknown status `{raw}`")))
}

fn parse_id(raw: Option<&str>, what: &str) -> Result<EntryId, CliError> {
    let raw = raw.ok_or_else(|| missing(what))?;
    raw.parse()
        .map_err(|_| CliError::Core(LedgerError::invalid(format!("`{raw}` is not a valid {what}"))))
}

fn missing(what: &str) -> CliError {
    CliError::Input(format!("missing {what}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 14).unwrap()
    }

    #[test]
    fn parses_add_with_options() {
        let args = [
            "today",
            "Notebook",
            "Other",
            "expense",
            "3000",
            "--installments",
            "10",
            "--status",
            "paid",
            "--unnecessary",
        ];
        let parsed = parse_add(&args, today()).unwrap();
        assert_eq!(parsed.date, today());
        assert_eq!(parsed.amount, Amount::expense(300_000));
        assert_eq!(parsed.installments, Some(10));
        assert_eq!(parsed.status, PaymentStatus::Paid);
        assert!(parsed.unnecessary);
        assert!(!parsed.recurring);
    }

    #[test]
    fn add_rejects_non_numeric_amount() {
        let args = ["2025-08-01", "Rent", "Housing", "expense", "lots"];
        let err = parse_add(&args, today()).expect_err("amount must be numeric");
        assert!(matches!(err, CliError::Core(LedgerError::InvalidInput(_))));
    }

    #[test]
    fn add_requires_all_positionals() {
        let err = parse_add(&["today", "Rent"], today()).expect_err("too few arguments");
        assert!(matches!(err, CliError::Input(_)));
    }

    #[test]
    fn quit_is_an_alias_for_exit() {
        assert_eq!(find("quit").map(|definition| definition.name), Some("exit"));
        assert!(find("launch").is_none());
    }
}
