//! Read-only aggregations over the entry store. Nothing here is cached; every
//! call recomputes from the entries it is given.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{
    category::Category,
    entry::{Entry, PaymentStatus},
    period::YearMonth,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinancialHealth {
    Positive,
    InDebt,
}

/// Ledger-wide totals in cents, plus derived ratios.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total_incoming: i64,
    pub total_outgoing: i64,
    pub total_invested: i64,
    pub total_unnecessary: i64,
    pub available_balance: i64,
    pub net_worth: i64,
    /// Net worth as a percentage of income; 0 when there is no income.
    pub savings_ratio: f64,
    pub largest_expense: i64,
    pub entry_count: usize,
    pub unpaid_count: usize,
}

impl Summary {
    pub fn health(&self) -> FinancialHealth {
        if self.net_worth > 0 {
            FinancialHealth::Positive
        } else {
            FinancialHealth::InDebt
        }
    }
}

pub fn summarize(entries: &[Entry]) -> Summary {
    let mut summary = Summary {
        entry_count: entries.len(),
        ..Summary::default()
    };
    for entry in entries {
        let outgoing = entry.amount.outgoing();
        summary.total_incoming += entry.amount.incoming();
        summary.total_outgoing += outgoing;
        summary.total_invested += entry.amount.invested();
        if entry.unnecessary {
            summary.total_unnecessary += outgoing;
        }
        if entry.status == PaymentStatus::Unpaid {
            summary.unpaid_count += 1;
        }
        summary.largest_expense = summary.largest_expense.max(outgoing);
    }
    summary.available_balance =
        summary.total_incoming - summary.total_outgoing - summary.total_invested;
    summary.net_worth = summary.total_incoming - summary.total_outgoing;
    summary.savings_ratio = percentage(summary.net_worth, summary.total_incoming);
    summary
}

/// Outgoing totals for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub total: i64,
    pub count: usize,
    /// Share of the grand outgoing total; 0 when nothing was spent.
    pub percent: f64,
}

impl CategoryBreakdown {
    pub fn icon(&self) -> &'static str {
        self.category.icon()
    }
}

/// One row per category, in display order, including empty categories.
pub fn by_category(entries: &[Entry]) -> Vec<CategoryBreakdown> {
    let grand_total: i64 = entries.iter().map(|entry| entry.amount.outgoing()).sum();
    Category::ALL
        .into_iter()
        .map(|category| {
            let (total, count) = entries
                .iter()
                .filter(|entry| entry.category == category)
                .fold((0i64, 0usize), |(total, count), entry| {
                    (total + entry.amount.outgoing(), count + 1)
                });
            CategoryBreakdown {
                category,
                total,
                count,
                percent: percentage(total, grand_total),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTotals {
    pub period: YearMonth,
    pub incoming: i64,
    pub outgoing: i64,
    pub invested: i64,
}

impl MonthlyTotals {
    pub fn balance(&self) -> i64 {
        self.incoming - self.outgoing - self.invested
    }
}

/// Totals per calendar month, oldest first.
pub fn monthly_totals(entries: &[Entry]) -> Vec<MonthlyTotals> {
    let mut months: BTreeMap<YearMonth, MonthlyTotals> = BTreeMap::new();
    for entry in entries {
        let period = entry.period();
        let totals = months.entry(period).or_insert(MonthlyTotals {
            period,
            incoming: 0,
            outgoing: 0,
            invested: 0,
        });
        totals.incoming += entry.amount.incoming();
        totals.outgoing += entry.amount.outgoing();
        totals.invested += entry.amount.invested();
    }
    months.into_values().collect()
}

pub fn entries_in_period(entries: &[Entry], period: YearMonth) -> Vec<&Entry> {
    entries
        .iter()
        .filter(|entry| period.contains(entry.date))
        .collect()
}

pub fn current_month_entries(entries: &[Entry], today: NaiveDate) -> Vec<&Entry> {
    entries_in_period(entries, YearMonth::of(today))
}

fn percentage(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
