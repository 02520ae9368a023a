//! Integration test: rollback when element code panics.
//!
//! Uses `Probe` from `vessel-test-utils` to count live instances before
//! and after each failed operation. A strong-guarantee operation must leave
//! the array observably unchanged and the live count where it started.

use vessel::DynArray;
use vessel_test_utils::{
    catch_panic, Probe, ProbeScope, INJECTED_CLONE_FAILURE, INJECTED_DEFAULT_FAILURE,
    INJECTED_DROP_FAILURE,
};

fn probes(n: u32) -> DynArray<Probe> {
    DynArray::from_fn(n as usize, |i| Probe::new(i as u32))
}

fn values(a: &DynArray<Probe>) -> Vec<u32> {
    a.iter().map(Probe::value).collect()
}

// ── Construction ─────────────────────────────────────────────────────

#[test]
fn failed_with_len_leaves_nothing_behind() {
    let scope = ProbeScope::new();
    scope.fail_default_after(3);
    let err = catch_panic(|| DynArray::<Probe>::with_len(5)).unwrap_err();
    assert_eq!(err, INJECTED_DEFAULT_FAILURE);
    assert_eq!(scope.live(), 0);
}

#[test]
fn failed_clone_leaves_nothing_behind() {
    let scope = ProbeScope::new();
    let a = probes(5);
    let before = scope.live();
    scope.fail_clone_after(2);
    let err = catch_panic(|| a.clone()).unwrap_err();
    assert_eq!(err, INJECTED_CLONE_FAILURE);
    assert_eq!(scope.live(), before);
    assert_eq!(values(&a), [0, 1, 2, 3, 4]);
}

// ── Copy assignment ──────────────────────────────────────────────────

#[test]
fn failed_clone_from_with_growth_is_strong() {
    let scope = ProbeScope::new();
    let mut a = probes(2);
    let b = DynArray::from_fn(5, |i| Probe::new(10 + i as u32));
    let ptr = a.as_ptr();
    scope.fail_clone_after(3);
    catch_panic(|| a.clone_from(&b)).unwrap_err();
    assert_eq!(values(&a), [0, 1]);
    assert_eq!(a.capacity(), 2);
    assert_eq!(a.as_ptr(), ptr);
    assert_eq!(scope.live(), 7);
}

#[test]
fn failed_clone_from_without_growth_is_basic() {
    let scope = ProbeScope::new();
    let mut a = DynArray::with_capacity(8);
    a.extend((0..4).map(Probe::new));
    let b = DynArray::from_fn(6, |i| Probe::new(10 + i as u32));
    // Four clones for the shared prefix, one for the tail, then failure.
    scope.fail_clone_after(5);
    catch_panic(|| a.clone_from(&b)).unwrap_err();
    // The prefix was overwritten, the partial tail rolled back.
    assert_eq!(values(&a), [10, 11, 12, 13]);
    assert_eq!(scope.live(), a.len() + b.len());
}

// ── Append ───────────────────────────────────────────────────────────

#[test]
fn panicking_constructor_on_full_array_leaves_buffer_untouched() {
    let scope = ProbeScope::new();
    let mut a = probes(4);
    assert_eq!(a.capacity(), 4);
    let ptr = a.as_ptr();
    catch_panic(|| {
        a.emplace_back_with(|| panic!("constructor failed"));
    })
    .unwrap_err();
    assert_eq!(values(&a), [0, 1, 2, 3]);
    assert_eq!(a.capacity(), 4);
    assert_eq!(a.as_ptr(), ptr);
    assert_eq!(scope.live(), 4);
}

#[test]
fn panicking_constructor_with_spare_capacity() {
    let scope = ProbeScope::new();
    let mut a = DynArray::with_capacity(4);
    a.push(Probe::new(1));
    let template = Probe::new(2);
    scope.fail_clone_after(0);
    catch_panic(|| {
        a.emplace_back_with(|| template.clone());
    })
    .unwrap_err();
    assert_eq!(values(&a), [1]);
    assert_eq!(a.capacity(), 4);
    assert_eq!(scope.live(), 2);
}

#[test]
fn push_of_clone_fails_before_touching_array() {
    let scope = ProbeScope::new();
    let mut a = probes(2);
    let extra = Probe::new(7);
    scope.fail_clone_after(0);
    catch_panic(|| {
        a.push(extra.clone());
    })
    .unwrap_err();
    assert_eq!(values(&a), [0, 1]);
    assert_eq!(scope.live(), 3);
}

// ── Insert ───────────────────────────────────────────────────────────

#[test]
fn failed_insert_with_growth_is_strong() {
    let scope = ProbeScope::new();
    let mut a = probes(3);
    let ptr = a.as_ptr();
    catch_panic(|| {
        a.emplace_with(1, || panic!("constructor failed"));
    })
    .unwrap_err();
    assert_eq!(values(&a), [0, 1, 2]);
    assert_eq!(a.capacity(), 3);
    assert_eq!(a.as_ptr(), ptr);
    assert_eq!(scope.live(), 3);
}

#[test]
fn failed_insert_in_place_leaves_no_duplicate() {
    let scope = ProbeScope::new();
    let mut a = DynArray::with_capacity(6);
    a.extend((0..4).map(Probe::new));
    catch_panic(|| {
        a.emplace_with(0, || panic!("constructor failed"));
    })
    .unwrap_err();
    assert_eq!(values(&a), [0, 1, 2, 3]);
    assert_eq!(scope.live(), 4);
}

// ── Resize ───────────────────────────────────────────────────────────

#[test]
fn failed_resize_rolls_back_new_slots() {
    let scope = ProbeScope::new();
    let mut a = probes(2);
    scope.fail_default_after(2);
    let err = catch_panic(|| a.resize(6)).unwrap_err();
    assert_eq!(err, INJECTED_DEFAULT_FAILURE);
    assert_eq!(values(&a), [0, 1]);
    assert_eq!(scope.live(), 2);
    assert_eq!(a.capacity(), 6);
}

// ── Destruction ──────────────────────────────────────────────────────

#[test]
fn panicking_drop_still_drops_every_other_element() {
    let scope = ProbeScope::new();
    let a = probes(5);
    scope.fail_drop_of(2);
    let err = catch_panic(move || drop(a)).unwrap_err();
    assert_eq!(err, INJECTED_DROP_FAILURE);
    assert_eq!(scope.live(), 0);
}

#[test]
fn panicking_drop_during_erase_leaves_array_consistent() {
    let scope = ProbeScope::new();
    let mut a = probes(4);
    scope.fail_drop_of(1);
    catch_panic(|| a.erase(1)).unwrap_err();
    scope.disarm();
    assert_eq!(values(&a), [0, 2, 3]);
    assert_eq!(scope.live(), 3);
}

#[test]
fn panicking_drop_during_truncate_leaves_array_consistent() {
    let scope = ProbeScope::new();
    let mut a = probes(5);
    scope.fail_drop_of(3);
    catch_panic(|| a.truncate(1)).unwrap_err();
    scope.disarm();
    assert_eq!(values(&a), [0]);
    assert_eq!(scope.live(), 1);
}

#[test]
fn owned_iteration_drops_the_rest() {
    let scope = ProbeScope::new();
    let a = probes(6);
    let taken: Vec<Probe> = a.into_iter().take(2).collect();
    assert_eq!(scope.live(), 2);
    drop(taken);
    assert_eq!(scope.live(), 0);
}
