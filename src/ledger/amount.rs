use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of money for a single entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AmountKind {
    Income,
    Expense,
    Investment,
}

impl AmountKind {
    pub fn label(self) -> &'static str {
        match self {
            AmountKind::Income => "income",
            AmountKind::Expense => "expense",
            AmountKind::Investment => "investment",
        }
    }

    pub fn parse(value: &str) -> Option<AmountKind> {
        match value.trim().to_lowercase().as_str() {
            "income" | "in" | "incoming" => Some(AmountKind::Income),
            "expense" | "out" | "outgoing" => Some(AmountKind::Expense),
            "investment" | "invest" | "invested" => Some(AmountKind::Investment),
            _ => None,
        }
    }
}

impl fmt::Display for AmountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A money value in integer cents tagged with its direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Amount {
    pub kind: AmountKind,
    pub cents: i64,
}

impl Amount {
    pub fn new(kind: AmountKind, cents: i64) -> Self {
        Self { kind, cents }
    }

    pub fn income(cents: i64) -> Self {
        Self::new(AmountKind::Income, cents)
    }

    pub fn expense(cents: i64) -> Self {
        Self::new(AmountKind::Expense, cents)
    }

    pub fn investment(cents: i64) -> Self {
        Self::new(AmountKind::Investment, cents)
    }

    pub fn incoming(&self) -> i64 {
        self.cents_if(AmountKind::Income)
    }

    pub fn outgoing(&self) -> i64 {
        self.cents_if(AmountKind::Expense)
    }

    pub fn invested(&self) -> i64 {
        self.cents_if(AmountKind::Investment)
    }

    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }

    pub fn with_cents(self, cents: i64) -> Self {
        Self { cents, ..self }
    }

    fn cents_if(&self, kind: AmountKind) -> i64 {
        if self.kind == kind {
            self.cents
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_matching_field_is_non_zero() {
        let amount = Amount::expense(1_250);
        assert_eq!(amount.outgoing(), 1_250);
        assert_eq!(amount.incoming(), 0);
        assert_eq!(amount.invested(), 0);
    }

    #[test]
    fn parses_kind_aliases() {
        assert_eq!(AmountKind::parse("OUT"), Some(AmountKind::Expense));
        assert_eq!(AmountKind::parse("invest"), Some(AmountKind::Investment));
        assert_eq!(AmountKind::parse("gift"), None);
    }
}
