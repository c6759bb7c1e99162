use super::*;

fn revealed(amount: f64) -> BalanceDisclosure {
    let mut d = BalanceDisclosure::new();
    assert!(d.begin());
    d.record(amount);
    assert!(d.complete());
    d
}

#[test]
fn starts_idle_without_amount() {
    let d = BalanceDisclosure::new();
    assert_eq!(d.status, DisclosureStatus::Idle);
    assert_eq!(d.amount, None);
}

#[test]
fn begin_only_from_idle() {
    let mut d = BalanceDisclosure::new();
    assert!(d.begin());
    assert!(d.is_loading());
    assert!(!d.begin());
    assert_eq!(d.status, DisclosureStatus::Loading);
}

#[test]
fn record_keeps_loading_until_complete() {
    let mut d = BalanceDisclosure::new();
    d.begin();
    d.record(125_000.0);
    assert_eq!(d.status, DisclosureStatus::Loading);
    assert_eq!(d.amount, Some(125_000.0));
    assert_eq!(d.visible_amount(), None);
}

#[test]
fn complete_requires_recorded_amount() {
    let mut d = BalanceDisclosure::new();
    d.begin();
    assert!(!d.complete());
    assert_eq!(d.status, DisclosureStatus::Loading);
}

#[test]
fn record_ignored_outside_loading() {
    let mut d = BalanceDisclosure::new();
    d.record(10.0);
    assert_eq!(d.amount, None);
}

#[test]
fn toggle_flips_between_revealed_and_hidden_keeping_amount() {
    let mut d = revealed(125_000.0);
    assert_eq!(d.visible_amount(), Some(125_000.0));

    assert!(d.toggle());
    assert_eq!(d.status, DisclosureStatus::Hidden);
    assert_eq!(d.amount, Some(125_000.0));
    assert_eq!(d.visible_amount(), None);

    assert!(d.toggle());
    assert_eq!(d.status, DisclosureStatus::Revealed);
}

#[test]
fn toggle_is_noop_before_reveal() {
    let mut d = BalanceDisclosure::new();
    assert!(!d.toggle());
    d.begin();
    assert!(!d.toggle());
    assert_eq!(d.status, DisclosureStatus::Loading);
}

#[test]
fn revealed_machine_never_restarts() {
    let mut d = revealed(1.0);
    assert!(!d.begin());
    d.toggle();
    assert!(!d.begin());
}

#[test]
fn eject_is_terminal() {
    let mut d = BalanceDisclosure::new();
    d.begin();
    d.eject();
    assert_eq!(d.status, DisclosureStatus::Ejected);
    assert!(!d.begin());
    assert!(!d.toggle());
    assert!(!d.complete());
}
