mod common;

use common::{date, open_manager, setup_manager};
use pocket_ledger::{
    errors::LedgerError,
    ledger::{Amount, Category, InstallmentIntent, PaymentStatus},
};

fn notebook(installments: u32) -> InstallmentIntent {
    InstallmentIntent::new(
        date(2025, 1, 10),
        "Notebook",
        Category::Other,
        Amount::expense(300_000),
        installments,
    )
}

#[test]
fn ten_installments_share_group_and_add_up() {
    let (mut manager, _dir) = setup_manager();
    let group_id = manager
        .add_installment_purchase(&notebook(10).with_status(PaymentStatus::Paid))
        .expect("purchase stored");

    let members: Vec<_> = manager
        .ledger()
        .entries
        .iter()
        .filter(|entry| entry.installment_group_id() == Some(group_id))
        .collect();
    assert_eq!(members.len(), 10);
    assert!(members.iter().all(|entry| entry.amount == Amount::expense(30_000)));
    assert_eq!(
        members.iter().map(|entry| entry.amount.cents).sum::<i64>(),
        300_000
    );
    assert_eq!(members[0].description, "Notebook (1/10)");
    assert_eq!(members[9].description, "Notebook (10/10)");
    assert_eq!(members[0].status, PaymentStatus::Paid);
    assert!(members[1..]
        .iter()
        .all(|entry| entry.status == PaymentStatus::Unpaid));
    for pair in members.windows(2) {
        assert_eq!((pair[1].date - pair[0].date).num_days(), 30);
    }
}

#[test]
fn uneven_totals_put_remainder_on_last_installment() {
    let (mut manager, _dir) = setup_manager();
    let intent = InstallmentIntent::new(
        date(2025, 2, 1),
        "Headphones",
        Category::Leisure,
        Amount::expense(10_000),
        3,
    );
    manager.add_installment_purchase(&intent).unwrap();

    let cents: Vec<i64> = manager
        .ledger()
        .entries
        .iter()
        .map(|entry| entry.amount.cents)
        .collect();
    assert_eq!(cents, vec![3_333, 3_333, 3_334]);
}

#[test]
fn fewer_than_two_installments_is_rejected() {
    let (mut manager, _dir) = setup_manager();
    let err = manager
        .add_installment_purchase(&notebook(1))
        .expect_err("a single installment is not a purchase plan");
    assert!(matches!(err, LedgerError::InvalidInput(_)));
    assert_eq!(manager.ledger().entries.len(), 0);
}

#[test]
fn group_view_tracks_payments_and_deleted_members() {
    let (mut manager, dir) = setup_manager();
    let group_id = manager.add_installment_purchase(&notebook(10)).unwrap();
    let ids: Vec<_> = manager
        .ledger()
        .entries
        .iter()
        .map(|entry| entry.id)
        .collect();

    manager.mark_paid(ids[0]).unwrap();
    manager.mark_paid(ids[1]).unwrap();
    manager.delete_entry(ids[9]).unwrap();

    let (reopened, _) = open_manager(&dir);
    let groups = reopened.installment_groups();
    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    assert_eq!(group.group_id, group_id);
    assert_eq!(group.description, "Notebook");
    assert_eq!(group.total_installments, 10);
    assert_eq!(group.missing_installments(), 1);
    assert_eq!(group.paid_installments, 2);
    assert_eq!(group.total_value, 270_000);
    assert_eq!(group.paid_value, 60_000);
    assert_eq!(group.remaining_value, 210_000);
    assert!(!group.is_settled());
}
