mod common;

use common::{date, open_manager, setup_manager};
use pocket_ledger::ledger::{Amount, Category, EntryDraft, InstallmentIntent};

#[test]
fn deleting_fixed_bill_removes_every_generated_entry() {
    let (mut manager, dir) = setup_manager();
    let draft = EntryDraft::new(
        date(2025, 1, 5),
        "Gym",
        Category::Health,
        Amount::expense(8_000),
    )
    .recurring(true);
    let first = manager.add_entry(draft).unwrap();
    let bill_id = manager
        .ledger()
        .entry(first)
        .and_then(|entry| entry.fixed_bill_id())
        .unwrap();
    manager.run_monthly_generation(date(2025, 2, 5)).unwrap();
    manager.run_monthly_generation(date(2025, 3, 5)).unwrap();
    let salary = manager
        .add_entry(EntryDraft::new(
            date(2025, 3, 1),
            "Salary",
            Category::Income,
            Amount::income(500_000),
        ))
        .unwrap();

    let removal = manager.delete_fixed_bill(bill_id).unwrap();
    assert_eq!(removal.entries_removed, 3);
    assert_eq!(removal.bill.map(|bill| bill.description), Some("Gym".to_string()));

    let (reopened, _) = open_manager(&dir);
    assert!(reopened.fixed_bills().is_empty());
    let remaining: Vec<_> = reopened.ledger().entries.iter().map(|e| e.id).collect();
    assert_eq!(remaining, vec![salary]);
}

#[test]
fn deleting_one_occurrence_keeps_the_bill() {
    let (mut manager, _dir) = setup_manager();
    let draft = EntryDraft::new(
        date(2025, 1, 5),
        "Streaming",
        Category::Leisure,
        Amount::expense(3_990),
    )
    .recurring(true);
    let first = manager.add_entry(draft).unwrap();

    let removed = manager.delete_entry(first).unwrap();
    assert!(removed.is_some());
    assert_eq!(manager.fixed_bills().len(), 1);

    let report = manager.run_monthly_generation(date(2025, 2, 5)).unwrap();
    assert_eq!(report.created(), 1);
}

#[test]
fn deleting_group_removes_only_its_members() {
    let (mut manager, dir) = setup_manager();
    let phone = InstallmentIntent::new(
        date(2025, 4, 1),
        "Phone",
        Category::Other,
        Amount::expense(120_000),
        12,
    );
    let bike = InstallmentIntent::new(
        date(2025, 4, 2),
        "Bike",
        Category::Transport,
        Amount::expense(60_000),
        6,
    );
    let phone_group = manager.add_installment_purchase(&phone).unwrap();
    manager.add_installment_purchase(&bike).unwrap();

    assert_eq!(manager.delete_installment_group(phone_group).unwrap(), 12);
    assert_eq!(manager.delete_installment_group(phone_group).unwrap(), 0);

    let (reopened, _) = open_manager(&dir);
    let groups = reopened.installment_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].description, "Bike");
    assert_eq!(reopened.ledger().entries.len(), 6);
}

#[test]
fn deleting_unknown_ids_is_a_no_op() {
    let (mut manager, dir) = setup_manager();
    assert!(manager.delete_entry(42).unwrap().is_none());
    let removal = manager.delete_fixed_bill(42).unwrap();
    assert!(removal.bill.is_none());
    assert_eq!(removal.entries_removed, 0);
    assert!(!dir.join("entries.json").exists());
}
