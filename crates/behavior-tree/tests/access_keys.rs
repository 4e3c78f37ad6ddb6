use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use behavior_tree::builder::{access_limit, action, node};
use behavior_tree::{
    AccessKey, AccessKeyProvider, Action, BehaviorParameterCollection, BehaviorResult, BehaviorTree,
    BehaviorTreeState, Clock, CounterLimitAccessKey, ManualClock, Record, SharedAccessKeys,
    TimeLimitAccessKey,
};

/// An agent whose gated job runs for `running_ticks` ticks before succeeding.
fn gated_agent(
    name: &str,
    key: Arc<dyn AccessKey>,
    running_ticks: usize,
    entries: Arc<AtomicUsize>,
) -> BehaviorTree<()> {
    let mut remaining = 0;
    let job = action("use_door", move |_: &mut BehaviorTreeState<()>| {
        if remaining == 0 {
            entries.fetch_add(1, Ordering::SeqCst);
            remaining = running_ticks;
        }
        remaining -= 1;
        if remaining == 0 {
            BehaviorResult::Success
        } else {
            BehaviorResult::Running
        }
    });
    let root = access_limit("door_gate", key, job);
    BehaviorTree::new(name, root.into_behavior(), ())
}

#[test]
fn two_trees_take_turns_on_a_single_slot() {
    let mut registry = SharedAccessKeys::new("keys");
    registry.insert(Arc::new(CounterLimitAccessKey::new("door", 1)));
    let key = registry.lookup("door").expect("registered");

    let (a_entries, b_entries) = (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)));
    let mut a = gated_agent("a", Arc::clone(&key), 5, Arc::clone(&a_entries));
    let mut b = gated_agent("b", Arc::clone(&key), 5, Arc::clone(&b_entries));
    let tick = |tree: &mut BehaviorTree<()>| tree.tick(BehaviorParameterCollection::new());

    // tick 1: a takes the slot, b is denied and laundered to success
    assert_eq!(tick(&mut a), Some(BehaviorResult::Running));
    assert_eq!(tick(&mut b), Some(BehaviorResult::Success));
    assert_eq!(a_entries.load(Ordering::SeqCst), 1);
    assert_eq!(b_entries.load(Ordering::SeqCst), 0);

    // ticks 2..=5: b looks at the key before a finishes its job
    for step in 2..=5 {
        assert_eq!(tick(&mut b), Some(BehaviorResult::Success), "tick {step}");
        let expected = if step == 5 {
            BehaviorResult::Success
        } else {
            BehaviorResult::Running
        };
        assert_eq!(tick(&mut a), Some(expected), "tick {step}");
    }
    assert!(key.is_available());
    assert_eq!(b_entries.load(Ordering::SeqCst), 0);

    // tick 6: the released slot goes to b
    assert_eq!(tick(&mut b), Some(BehaviorResult::Running));
    assert_eq!(b_entries.load(Ordering::SeqCst), 1);
    assert!(!key.is_available());
}

#[test]
fn reset_hands_the_slot_back() {
    let key: Arc<dyn AccessKey> = Arc::new(CounterLimitAccessKey::new("door", 1));
    let mut a = gated_agent("a", Arc::clone(&key), 10, Arc::new(AtomicUsize::new(0)));
    let mut b = gated_agent("b", Arc::clone(&key), 10, Arc::new(AtomicUsize::new(0)));

    a.tick(BehaviorParameterCollection::new());
    assert!(!key.is_available());

    a.reset();
    assert!(key.is_available());
    assert_eq!(b.tick(BehaviorParameterCollection::new()), Some(BehaviorResult::Running));
}

#[test]
fn time_limit_enforces_a_cooldown_between_entries() {
    let clock = Arc::new(ManualClock::new());
    let key: Arc<dyn AccessKey> = Arc::new(TimeLimitAccessKey::new(
        "war_cry",
        Duration::from_secs(2),
        Arc::clone(&clock) as Arc<dyn Clock>,
    ));
    let entries = Arc::new(AtomicUsize::new(0));
    let mut tree = gated_agent("shouter", key, 1, Arc::clone(&entries));

    tree.tick(BehaviorParameterCollection::new());
    assert_eq!(entries.load(Ordering::SeqCst), 1);

    clock.advance(Duration::from_millis(1500));
    tree.tick(BehaviorParameterCollection::new());
    assert_eq!(entries.load(Ordering::SeqCst), 1);

    clock.advance(Duration::from_millis(500));
    tree.tick(BehaviorParameterCollection::new());
    assert_eq!(entries.load(Ordering::SeqCst), 2);
}

#[test]
fn malformed_key_set_keeps_the_well_formed_entry() {
    let record = Record::new("AccessKeys")
        .with_child(
            Record::new("CounterLimit")
                .with_attr("Key", "door")
                .with_attr("MaxAccessCount", 1),
        )
        .with_child(Record::new("Teleporter").with_attr("Key", "portal"));

    let registry = SharedAccessKeys::load(&record, Arc::new(ManualClock::new()));

    assert_eq!(registry.len(), 1);
    assert!(registry.lookup("door").is_some());
    assert_eq!(registry.issues().len(), 1);
}

#[test]
fn concurrent_trees_never_exceed_the_slot_limit() {
    const AGENTS: usize = 8;
    const TICKS: usize = 200;
    const SLOTS: u32 = 2;

    let key = Arc::new(CounterLimitAccessKey::new("forge", SLOTS));
    let inside = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let granted_peak = Arc::new(AtomicU32::new(0));

    thread::scope(|scope| {
        for agent in 0..AGENTS {
            let (inside, peak) = (Arc::clone(&inside), Arc::clone(&peak));
            let (forge, granted_peak) = (Arc::clone(&key), Arc::clone(&granted_peak));
            let left = Arc::clone(&inside);
            let key = Arc::clone(&key) as Arc<dyn AccessKey>;
            scope.spawn(move || {
                let mut remaining = 0_usize;
                let job = Action::new("smith", move |_: &mut BehaviorTreeState<()>| {
                    granted_peak.fetch_max(forge.count(), Ordering::SeqCst);
                    if remaining == 0 {
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        remaining = 3;
                    }
                    remaining -= 1;
                    if remaining == 0 {
                        inside.fetch_sub(1, Ordering::SeqCst);
                        BehaviorResult::Success
                    } else {
                        BehaviorResult::Running
                    }
                })
                // abandoned mid-job: the smith leaves the forge before the slot is released
                .on_reset(move |_| {
                    left.fetch_sub(1, Ordering::SeqCst);
                });
                let root = access_limit("forge_gate", key, node(job));
                let mut tree = BehaviorTree::new(format!("smith-{agent}"), root.into_behavior(), ());
                for _ in 0..TICKS {
                    tree.tick(BehaviorParameterCollection::new());
                    thread::yield_now();
                }
                tree.reset();
            });
        }
    });

    assert!(peak.load(Ordering::SeqCst) <= SLOTS as usize);
    assert!(peak.load(Ordering::SeqCst) >= 1);
    assert!(granted_peak.load(Ordering::SeqCst) <= SLOTS);
    assert_eq!(inside.load(Ordering::SeqCst), 0);
    assert_eq!(key.count(), 0);
}
