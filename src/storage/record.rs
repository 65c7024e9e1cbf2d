//! Flat key/value record format used on disk.
//!
//! Amounts are stored as three decimal fields where at most one is non-zero.
//! Keys written by the earlier data files are accepted as aliases.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    currency::{cents_to_units, units_to_cents},
    ledger::{Amount, AmountKind, Category, Entry, EntryId, FixedBill, PaymentStatus, Provenance},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryRecord {
    pub id: EntryId,
    #[serde(alias = "data")]
    pub date: NaiveDate,
    #[serde(alias = "descricao")]
    pub description: String,
    #[serde(alias = "categoria")]
    pub category: String,
    #[serde(default, alias = "entrada")]
    pub incoming: f64,
    #[serde(default, alias = "saida")]
    pub outgoing: f64,
    #[serde(default, alias = "investimento")]
    pub invested: f64,
    #[serde(default = "default_status", alias = "statusPagamento")]
    pub payment_status: String,
    #[serde(default, alias = "desnecessario")]
    pub unnecessary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "contaFixaId")]
    pub fixed_bill_id: Option<EntryId>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "grupoParcelaId")]
    pub installment_group_id: Option<EntryId>,
    /// One-based position inside the installment group.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "parcelaAtual")]
    pub installment_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "totalParcelas")]
    pub installment_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "descricaoOriginal")]
    pub original_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixedBillRecord {
    pub id: EntryId,
    #[serde(alias = "descricao")]
    pub description: String,
    #[serde(alias = "categoria")]
    pub category: String,
    #[serde(default, alias = "entrada")]
    pub incoming: f64,
    #[serde(default, alias = "saida")]
    pub outgoing: f64,
    #[serde(default, alias = "investimento")]
    pub invested: f64,
    #[serde(default, alias = "desnecessario")]
    pub unnecessary: bool,
}

fn default_status() -> String {
    PaymentStatus::Unpaid.key().to_string()
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        let (incoming, outgoing, invested) = split_amount(&entry.amount);
        let mut record = EntryRecord {
            id: entry.id,
            date: entry.date,
            description: entry.description.clone(),
            category: entry.category.name().to_string(),
            incoming,
            outgoing,
            invested,
            payment_status: entry.status.key().to_string(),
            unnecessary: entry.unnecessary,
            fixed_bill_id: None,
            installment_group_id: None,
            installment_number: None,
            installment_total: None,
            original_description: None,
        };
        match &entry.provenance {
            Some(Provenance::FixedBill { bill_id }) => record.fixed_bill_id = Some(*bill_id),
            Some(Provenance::Installment {
                group_id,
                index,
                total,
                original_description,
            }) => {
                record.installment_group_id = Some(*group_id);
                record.installment_number = Some(index + 1);
                record.installment_total = Some(*total);
                record.original_description = Some(original_description.clone());
            }
            None => {}
        }
        record
    }
}

impl EntryRecord {
    /// Converts the record into a domain entry. Records that break an entry
    /// invariant are rejected; recoverable oddities are reported in `warnings`.
    pub fn into_entry(self, warnings: &mut Vec<String>) -> Option<Entry> {
        let context = format!("entry {}", self.id);
        let amount = match resolve_amount(self.incoming, self.outgoing, self.invested) {
            Ok(amount) => amount,
            Err(reason) => {
                warnings.push(format!("{context} skipped: {reason}"));
                return None;
            }
        };
        let Some(status) = PaymentStatus::parse(&self.payment_status) else {
            warnings.push(format!(
                "{context} skipped: unknown payment status `{}`",
                self.payment_status
            ));
            return None;
        };
        let provenance = match (self.fixed_bill_id, self.installment_group_id) {
            (Some(_), Some(_)) => {
                warnings.push(format!(
                    "{context} skipped: linked to both a fixed bill and an installment group"
                ));
                return None;
            }
            (Some(bill_id), None) => Some(Provenance::FixedBill { bill_id }),
            (None, Some(group_id)) => Some(Provenance::Installment {
                group_id,
                index: self.installment_number.unwrap_or(1).saturating_sub(1),
                total: self.installment_total.unwrap_or_default(),
                original_description: self
                    .original_description
                    .unwrap_or_else(|| self.description.clone()),
            }),
            (None, None) => None,
        };
        Some(Entry {
            id: self.id,
            date: self.date,
            category: resolve_category(&self.category, &context, warnings),
            description: self.description,
            amount,
            status,
            unnecessary: self.unnecessary,
            provenance,
        })
    }
}

impl From<&FixedBill> for FixedBillRecord {
    fn from(bill: &FixedBill) -> Self {
        let (incoming, outgoing, invested) = split_amount(&bill.amount);
        FixedBillRecord {
            id: bill.id,
            description: bill.description.clone(),
            category: bill.category.name().to_string(),
            incoming,
            outgoing,
            invested,
            unnecessary: bill.unnecessary,
        }
    }
}

impl FixedBillRecord {
    pub fn into_fixed_bill(self, warnings: &mut Vec<String>) -> Option<FixedBill> {
        let context = format!("fixed bill {}", self.id);
        let amount = match resolve_amount(self.incoming, self.outgoing, self.invested) {
            Ok(amount) => amount,
            Err(reason) => {
                warnings.push(format!("{context} skipped: {reason}"));
                return None;
            }
        };
        Some(FixedBill {
            id: self.id,
            category: resolve_category(&self.category, &context, warnings),
            description: self.description,
            amount,
            unnecessary: self.unnecessary,
        })
    }
}

fn split_amount(amount: &Amount) -> (f64, f64, f64) {
    (
        cents_to_units(amount.incoming()),
        cents_to_units(amount.outgoing()),
        cents_to_units(amount.invested()),
    )
}

fn resolve_amount(incoming: f64, outgoing: f64, invested: f64) -> Result<Amount, String> {
    let fields = [
        (AmountKind::Income, incoming),
        (AmountKind::Expense, outgoing),
        (AmountKind::Investment, invested),
    ];
    if fields.iter().any(|(_, value)| !value.is_finite() || *value < 0.0) {
        return Err("amount fields must be finite and non-negative".into());
    }
    let mut set = fields.iter().filter(|(_, value)| *value != 0.0);
    match (set.next(), set.next()) {
        (None, _) => Ok(Amount::expense(0)),
        (Some((kind, value)), None) => Ok(Amount::new(*kind, units_to_cents(*value))),
        (Some(_), Some(_)) => Err("more than one amount field is non-zero".into()),
    }
}

fn resolve_category(name: &str, context: &str, warnings: &mut Vec<String>) -> Category {
    Category::from_name(name).unwrap_or_else(|| {
        warnings.push(format!(
            "{context}: unknown category `{name}`, filed under {}",
            Category::Other
        ));
        Category::Other
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_record() -> &'static str {
        r#"{
            "id": 1717171717000,
            "data": "2024-05-31",
            "descricao": "Geladeira (1/10)",
            "categoria": "Moradia",
            "entrada": 0,
            "saida": 350.5,
            "investimento": 0,
            "statusPagamento": "paga",
            "desnecessario": false,
            "recorrente": false,
            "parcelaAtual": 1,
            "totalParcelas": 10,
            "grupoParcelaId": 1717171716999,
            "descricaoOriginal": "Geladeira"
        }"#
    }

    #[test]
    fn reads_legacy_records() {
        let record: EntryRecord = serde_json::from_str(legacy_record()).unwrap();
        let mut warnings = Vec::new();
        let entry = record.into_entry(&mut warnings).expect("valid record");
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(entry.category, Category::Housing);
        assert_eq!(entry.amount, Amount::expense(35_050));
        assert_eq!(entry.status, PaymentStatus::Paid);
        assert_eq!(
            entry.provenance,
            Some(Provenance::Installment {
                group_id: 1_717_171_716_999,
                index: 0,
                total: 10,
                original_description: "Geladeira".into(),
            })
        );
    }

    #[test]
    fn absent_amount_fields_default_to_zero() {
        let json = r#"{"id": 3, "date": "2025-02-01", "description": "Salary",
            "category": "Income", "incoming": 4200}"#;
        let record: EntryRecord = serde_json::from_str(json).unwrap();
        let mut warnings = Vec::new();
        let entry = record.into_entry(&mut warnings).unwrap();
        assert_eq!(entry.amount, Amount::income(420_000));
        assert_eq!(entry.status, PaymentStatus::Unpaid);
        assert!(entry.provenance.is_none());
    }

    #[test]
    fn rejects_records_with_two_amounts() {
        let json = r#"{"id": 4, "date": "2025-02-01", "description": "Mixed",
            "category": "Other", "incoming": 10, "outgoing": 5}"#;
        let record: EntryRecord = serde_json::from_str(json).unwrap();
        let mut warnings = Vec::new();
        assert!(record.into_entry(&mut warnings).is_none());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("more than one amount"));
    }

    #[test]
    fn unknown_category_falls_back_to_other() {
        let json = r#"{"id": 5, "date": "2025-02-01", "description": "Gift",
            "category": "Presents", "outgoing": 20}"#;
        let record: EntryRecord = serde_json::from_str(json).unwrap();
        let mut warnings = Vec::new();
        let entry = record.into_entry(&mut warnings).unwrap();
        assert_eq!(entry.category, Category::Other);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn fixed_bill_entry_serializes_flat() {
        let mut entry = Entry::new(
            11,
            NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
            "Rent",
            Category::Housing,
            Amount::expense(100_000),
        );
        entry.provenance = Some(Provenance::FixedBill { bill_id: 7 });
        let json = serde_json::to_string_pretty(&EntryRecord::from(&entry)).unwrap();
        insta::assert_snapshot!(json, @r###"
        {
          "id": 11,
          "date": "2025-06-05",
          "description": "Rent",
          "category": "Housing",
          "incoming": 0.0,
          "outgoing": 1000.0,
          "invested": 0.0,
          "payment_status": "unpaid",
          "unnecessary": false,
          "fixed_bill_id": 7
        }
        "###);
    }
}
