//! Property-based invariant tests for the observable sequence.
//!
//! 1. Every insertion emits exactly one `add`, every removal exactly one
//!    `remove`, in operation order.
//! 2. The sequence always matches a plain `Vec` model driven by the same ops.
//! 3. While `item.changed` is active, a listenable element holds exactly one
//!    relay listener iff it is in the sequence, including when `add` /
//!    `remove` listeners mutate the sequence in the middle of a batch.
//! 4. `to_vec` is idempotent between mutations.
//! 5. `replace_with(xs)` then `to_vec()` yields `xs` regardless of prior state.

use std::cell::RefCell;
use std::rc::Rc;

use decal_array::sequence::{ADD, REMOVE};
use decal_array::WeakSequence;
use decal_array::{AsListenable, Emitter, Listenable, ObservableSequence, SequenceEvent};
use proptest::prelude::*;

// ── Strategies ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Push(Vec<u8>),
    Unshift(Vec<u8>),
    Pop,
    Shift,
    InsertAt(usize, u8),
    RemoveAt(usize),
    Remove(u8),
    ReplaceAt(usize, u8),
    Splice(usize, Option<usize>, Vec<u8>),
    Empty,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let value = 0u8..16;
    let values = proptest::collection::vec(0u8..16, 0..4);
    prop_oneof![
        values.clone().prop_map(Op::Push),
        values.clone().prop_map(Op::Unshift),
        Just(Op::Pop),
        Just(Op::Shift),
        (0usize..12, value.clone()).prop_map(|(i, v)| Op::InsertAt(i, v)),
        (0usize..12).prop_map(Op::RemoveAt),
        value.clone().prop_map(Op::Remove),
        (0usize..12, value).prop_map(|(i, v)| Op::ReplaceAt(i, v)),
        (0usize..12, proptest::option::of(0usize..6), values)
            .prop_map(|(s, n, xs)| Op::Splice(s, n, xs)),
        Just(Op::Empty),
    ]
}

/// Apply `op` to a plain vector, returning (added, removed).
fn apply_model(model: &mut Vec<u8>, op: &Op) -> (Vec<u8>, Vec<u8>) {
    match op {
        Op::Push(xs) => {
            model.extend(xs);
            (xs.clone(), vec![])
        }
        Op::Unshift(xs) => {
            model.splice(0..0, xs.iter().copied());
            (xs.clone(), vec![])
        }
        Op::Pop => (vec![], model.pop().into_iter().collect()),
        Op::Shift => {
            if model.is_empty() {
                (vec![], vec![])
            } else {
                (vec![], vec![model.remove(0)])
            }
        }
        Op::InsertAt(i, v) => {
            if *i <= model.len() {
                model.insert(*i, *v);
                (vec![*v], vec![])
            } else {
                (vec![], vec![])
            }
        }
        Op::RemoveAt(i) => {
            if *i < model.len() {
                (vec![], vec![model.remove(*i)])
            } else {
                (vec![], vec![])
            }
        }
        Op::Remove(v) => match model.iter().position(|x| x == v) {
            Some(i) => (vec![], vec![model.remove(i)]),
            None => (vec![], vec![]),
        },
        Op::ReplaceAt(i, v) => {
            if *i < model.len() {
                let old = std::mem::replace(&mut model[*i], *v);
                (vec![*v], vec![old])
            } else {
                (vec![], vec![])
            }
        }
        Op::Splice(start, count, xs) => {
            let start = (*start).min(model.len());
            let available = model.len() - start;
            let count = count.map_or(available, |n| n.min(available));
            let removed: Vec<u8> = model.splice(start..start + count, xs.iter().copied()).collect();
            (xs.clone(), removed)
        }
        Op::Empty => (vec![], std::mem::take(model)),
    }
}

fn apply_sequence(seq: &ObservableSequence<u8>, op: &Op) {
    match op {
        Op::Push(xs) => {
            seq.push(xs.iter().copied());
        }
        Op::Unshift(xs) => {
            seq.unshift(xs.iter().copied());
        }
        Op::Pop => {
            seq.pop();
        }
        Op::Shift => {
            seq.shift();
        }
        Op::InsertAt(i, v) => {
            let _ = seq.insert_at(*i, *v);
        }
        Op::RemoveAt(i) => {
            seq.remove_at(*i);
        }
        Op::Remove(v) => {
            seq.remove(v);
        }
        Op::ReplaceAt(i, v) => {
            let _ = seq.replace_at(*i, *v);
        }
        Op::Splice(start, count, xs) => {
            seq.splice(*start, *count, xs.iter().copied());
        }
        Op::Empty => seq.empty(),
    }
}

fn event_log(seq: &ObservableSequence<u8>) -> Rc<RefCell<Vec<SequenceEvent<u8>>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for event in [ADD, REMOVE] {
        let log = Rc::clone(&log);
        seq.on(event, move |e| log.borrow_mut().push(e.clone()));
    }
    log
}

// ── Listenable elements ───────────────────────────────────────────────────

#[derive(Debug)]
struct Node {
    events: Emitter,
}

impl AsListenable for Node {
    fn as_listenable(&self) -> Option<&dyn Listenable> {
        Some(&self.events)
    }
}

#[derive(Debug, Clone)]
enum NodeOp {
    Push(Vec<usize>),
    Unshift(Vec<usize>),
    Pop,
    Shift,
    RemoveAt(usize),
    ReplaceAt(usize, usize),
    Splice(usize, usize, Vec<usize>),
}

fn node_op_strategy(pool: usize) -> impl Strategy<Value = NodeOp> {
    prop_oneof![
        proptest::collection::vec(0..pool, 1..4).prop_map(NodeOp::Push),
        proptest::collection::vec(0..pool, 1..4).prop_map(NodeOp::Unshift),
        Just(NodeOp::Pop),
        Just(NodeOp::Shift),
        (0usize..8).prop_map(NodeOp::RemoveAt),
        (0usize..8, 0..pool).prop_map(|(i, n)| NodeOp::ReplaceAt(i, n)),
        (0usize..8, 0usize..4, proptest::collection::vec(0..pool, 0..3))
            .prop_map(|(s, c, ns)| NodeOp::Splice(s, c, ns)),
    ]
}

fn pick(pool: &[Rc<Node>], ns: &[usize]) -> Vec<Rc<Node>> {
    ns.iter().map(|n| Rc::clone(&pool[*n])).collect()
}

fn apply_node_op(seq: &ObservableSequence<Rc<Node>>, pool: &[Rc<Node>], op: &NodeOp) {
    match op {
        NodeOp::Push(ns) => {
            seq.push(pick(pool, ns));
        }
        NodeOp::Unshift(ns) => {
            seq.unshift(pick(pool, ns));
        }
        NodeOp::Pop => {
            seq.pop();
        }
        NodeOp::Shift => {
            seq.shift();
        }
        NodeOp::RemoveAt(i) => {
            seq.remove_at(*i);
        }
        NodeOp::ReplaceAt(i, n) => {
            let _ = seq.replace_at(*i, Rc::clone(&pool[*n]));
        }
        NodeOp::Splice(s, c, ns) => {
            seq.splice(*s, Some(*c), pick(pool, ns));
        }
    }
}

fn node_pool(count: usize) -> Vec<Rc<Node>> {
    (0..count)
        .map(|_| Rc::new(Node { events: Emitter::new() }))
        .collect()
}

/// Adding `pool[0]` evicts `pool[1]`; removing `pool[2]` appends `pool[3]`.
fn install_reentrant_listeners(seq: &ObservableSequence<Rc<Node>>, pool: &[Rc<Node>]) {
    let weak: WeakSequence<Rc<Node>> = seq.downgrade();
    let (trigger, victim) = (Rc::clone(&pool[0]), Rc::clone(&pool[1]));
    seq.on(ADD, move |e| {
        if let (Some(seq), Some(item)) = (weak.upgrade(), e.item()) {
            if Rc::ptr_eq(item, &trigger) {
                seq.remove(&victim);
            }
        }
    });

    let weak = seq.downgrade();
    let (trigger, refill) = (Rc::clone(&pool[2]), Rc::clone(&pool[3]));
    seq.on(REMOVE, move |e| {
        if let (Some(seq), Some(item)) = (weak.upgrade(), e.item()) {
            if Rc::ptr_eq(item, &trigger) {
                seq.push([Rc::clone(&refill)]);
            }
        }
    });
}

// ── Properties ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn events_and_contents_match_model(
        initial in proptest::collection::vec(0u8..16, 0..6),
        ops in proptest::collection::vec(op_strategy(), 0..24),
    ) {
        let seq = ObservableSequence::new(initial.clone());
        let log = event_log(&seq);
        let mut model = initial;

        for op in &ops {
            log.borrow_mut().clear();
            let (added, removed) = apply_model(&mut model, op);
            apply_sequence(&seq, op);

            let expected: Vec<SequenceEvent<u8>> = removed
                .into_iter()
                .map(SequenceEvent::Remove)
                .chain(added.into_iter().map(SequenceEvent::Add))
                .collect();
            let actual = log.borrow().clone();
            // push/unshift emit adds only, the rest emit removes first.
            prop_assert_eq!(actual, expected, "op {:?}", op);
            prop_assert_eq!(seq.to_vec(), model.clone());
        }
    }

    #[test]
    fn relay_symmetry(
        ops in proptest::collection::vec(node_op_strategy(5), 0..30),
    ) {
        let pool = node_pool(5);
        let seq = ObservableSequence::new([Rc::clone(&pool[0])]);
        seq.on("item.changed", |_| {});

        for op in &ops {
            apply_node_op(&seq, &pool, op);
            for node in &pool {
                let expected = usize::from(seq.contains(node));
                prop_assert_eq!(node.events.listener_count("changed"), expected);
            }
        }

        seq.destroy();
        for node in &pool {
            prop_assert_eq!(node.events.listener_count("changed"), 0);
        }
    }

    #[test]
    fn relay_symmetry_with_reentrant_listeners(
        ops in proptest::collection::vec(node_op_strategy(5), 0..30),
    ) {
        let pool = node_pool(5);
        let seq = ObservableSequence::new([Rc::clone(&pool[1]), Rc::clone(&pool[2])]);
        seq.on("item.changed", |_| {});
        install_reentrant_listeners(&seq, &pool);

        for op in &ops {
            apply_node_op(&seq, &pool, op);
            for node in &pool {
                let expected = usize::from(seq.contains(node));
                prop_assert_eq!(node.events.listener_count("changed"), expected, "op {:?}", op);
            }
        }
    }

    #[test]
    fn to_vec_is_idempotent(items in proptest::collection::vec(any::<i32>(), 0..32)) {
        let seq = ObservableSequence::new(items.clone());
        prop_assert_eq!(seq.to_vec(), seq.to_vec());
        prop_assert_eq!(seq.to_vec(), items);
    }

    #[test]
    fn replace_with_round_trips(
        before in proptest::collection::vec(any::<i32>(), 0..16),
        after in proptest::collection::vec(any::<i32>(), 0..16),
    ) {
        let seq = ObservableSequence::new(before);
        seq.replace_with(after.clone());
        prop_assert_eq!(seq.to_vec(), after);
    }
}
