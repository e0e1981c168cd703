#[cfg(test)]
mod tests {
    use dual_index::{DualIndex, LinkPolicy};
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    enum Op {
        Add(u8, Vec<u8>),
        RegisterParent(u8),
        RegisterChild(u8),
        SetValue(u8, u32),
        DeleteChild(u8),
        DeleteParent(u8),
        Delete(u8),
    }

    // A small key space so that operations collide often
    fn arb_key() -> impl Strategy<Value = u8> {
        0u8..8
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (arb_key(), prop::collection::vec(arb_key(), 0..4))
                .prop_map(|(child, parents)| Op::Add(child, parents)),
            1 => arb_key().prop_map(Op::RegisterParent),
            1 => arb_key().prop_map(Op::RegisterChild),
            1 => (arb_key(), any::<u32>()).prop_map(|(child, value)| Op::SetValue(child, value)),
            1 => arb_key().prop_map(Op::DeleteChild),
            1 => arb_key().prop_map(Op::DeleteParent),
            1 => arb_key().prop_map(Op::Delete),
        ]
    }

    fn arb_policy() -> impl Strategy<Value = LinkPolicy> {
        prop_oneof![Just(LinkPolicy::Duplicate), Just(LinkPolicy::Unique)]
    }

    fn apply(index: &mut DualIndex<u8, u32>, op: Op) {
        match op {
            Op::Add(child, parents) => index.add_child_under(child, parents),
            Op::RegisterParent(parent) => index.register_parent([parent]),
            Op::RegisterChild(child) => index.register_child([child]),
            Op::SetValue(child, value) => {
                let _ = index.set_value(&child, value);
            }
            Op::DeleteChild(child) => {
                index.delete_child(&child);
            }
            Op::DeleteParent(parent) => {
                index.delete_parent(&parent);
            }
            Op::Delete(key) => {
                index.delete(&key);
            }
        }
    }

    fn build(policy: LinkPolicy, ops: Vec<Op>) -> DualIndex<u8, u32> {
        let mut index = DualIndex::with_policy(policy);
        for op in ops {
            apply(&mut index, op);
        }
        index
    }

    proptest! {
        /// Every parent of a child lists that child, as many times as the child lists the parent.
        #[test]
        fn prop_children_see_their_parents(policy in arb_policy(), ops in prop::collection::vec(arb_op(), 0..40)) {
            let index = build(policy, ops);
            for (child, record) in index.iter_children() {
                for parent in record.parents.iter() {
                    let children = index.children_of(parent);
                    prop_assert!(children.is_ok(), "parent {} of {} is not registered", parent, child);
                    let children = children.unwrap();
                    prop_assert!(children.contains(child));
                    prop_assert_eq!(
                        children.iter().filter(|c| *c == child).count(),
                        index.link_count(child, parent)
                    );
                }
            }
        }

        /// Every child of a parent lists that parent.
        #[test]
        fn prop_parents_see_their_children(policy in arb_policy(), ops in prop::collection::vec(arb_op(), 0..40)) {
            let index = build(policy, ops);
            for (parent, children) in index.iter_parents() {
                for child in children {
                    let parents = index.parents_of(child);
                    prop_assert!(parents.is_ok(), "child {} of {} is not registered", child, parent);
                    prop_assert!(parents.unwrap().contains(parent));
                }
            }
        }

        /// A deleted key leaves nothing behind.
        #[test]
        fn prop_delete_is_complete(ops in prop::collection::vec(arb_op(), 0..40), key in arb_key()) {
            let mut index = build(LinkPolicy::Duplicate, ops);
            index.delete(&key);
            prop_assert!(!index.exists(&key));
            for (_, children) in index.iter_parents() {
                prop_assert!(!children.contains(&key));
            }
            for (_, record) in index.iter_children() {
                prop_assert!(!record.parents.contains(&key));
            }
        }

        /// Orphans and childless parents are exactly the entries with empty sequences.
        #[test]
        fn prop_orphans_and_childless(ops in prop::collection::vec(arb_op(), 0..40)) {
            let index = build(LinkPolicy::Duplicate, ops);
            let orphans = index.orphans();
            for (child, _) in index.iter_children() {
                let empty = index.parents_of(child).unwrap().is_empty();
                prop_assert_eq!(orphans.contains_key(child), empty);
            }
            let childless = index.childless();
            for (parent, _) in index.iter_parents() {
                let empty = index.children_of(parent).unwrap().is_empty();
                prop_assert_eq!(childless.contains_key(parent), empty);
            }
        }

        /// Under the unique policy no link is ever recorded twice.
        #[test]
        fn prop_unique_policy_never_repeats(ops in prop::collection::vec(arb_op(), 0..40)) {
            let index = build(LinkPolicy::Unique, ops);
            for (child, record) in index.iter_children() {
                for parent in record.parents.iter() {
                    prop_assert_eq!(index.link_count(child, parent), 1);
                }
            }
        }
    }
}
