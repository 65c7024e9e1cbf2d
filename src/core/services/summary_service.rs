use chrono::NaiveDate;

use crate::ledger::{
    by_category, current_month_entries, entries_in_period, monthly_totals, summarize,
    CategoryBreakdown, Entry, Ledger, MonthlyTotals, Summary, YearMonth,
};

pub struct SummaryService;

impl SummaryService {
    pub fn totals(ledger: &Ledger) -> Summary {
        summarize(&ledger.entries)
    }

    pub fn by_category(ledger: &Ledger) -> Vec<CategoryBreakdown> {
        by_category(&ledger.entries)
    }

    pub fn monthly(ledger: &Ledger) -> Vec<MonthlyTotals> {
        monthly_totals(&ledger.entries)
    }

    /// Entries of the month containing `today`, oldest first.
    pub fn current_month(ledger: &Ledger, today: NaiveDate) -> Vec<&Entry> {
        sorted(current_month_entries(&ledger.entries, today))
    }

    pub fn period(ledger: &Ledger, period: YearMonth) -> Vec<&Entry> {
        sorted(entries_in_period(&ledger.entries, period))
    }
}

fn sorted(mut entries: Vec<&Entry>) -> Vec<&Entry> {
    entries.sort_by_key(|entry| (entry.date, entry.id));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Amount, Category};

    #[test]
    fn period_entries_are_sorted_by_date() {
        let mut ledger = Ledger::new();
        let late = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();
        let early = NaiveDate::from_ymd_opt(2025, 7, 2).unwrap();
        ledger.add_entry(Entry::new(1, late, "Cinema", Category::Leisure, Amount::expense(3_000)));
        ledger.add_entry(Entry::new(2, early, "Bus", Category::Transport, Amount::expense(450)));
        let ids: Vec<u64> = SummaryService::current_month(&ledger, late)
            .iter()
            .map(|entry| entry.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
