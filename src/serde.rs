use crate::{utils::count_of, ChildRecord, DualIndex, LinkPolicy};
use core::hash::{BuildHasher, Hash};
use hashbrown::HashMap;
use serde::{
    de::Error as DeError,
    ser::{SerializeStruct, Serializer},
    Deserializer, {Deserialize, Serialize},
};

// The wire form of an index, checked for consistency before it becomes a `DualIndex`
#[derive(Deserialize)]
#[serde(bound(
    deserialize = "K: Deserialize<'de> + Eq + Hash, V: Deserialize<'de>, S: BuildHasher + Default"
))]
struct RawIndex<K, V, S> {
    #[serde(default)]
    policy: LinkPolicy,
    parents: HashMap<K, Vec<K>, S>,
    children: HashMap<K, ChildRecord<K, V>, S>,
}

impl<K, V, S> RawIndex<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    // Every link must be recorded the same number of times on both sides, and only between
    // registered keys.
    fn validate(&self) -> Result<(), &'static str> {
        for (parent, children) in self.parents.iter() {
            for child in children {
                let record = self
                    .children
                    .get(child)
                    .ok_or("a parent lists a child that is not registered")?;
                if count_of(children, child) != count_of(&record.parents, parent) {
                    return Err("a link is recorded a different number of times on each side");
                }
            }
        }
        for (child, record) in self.children.iter() {
            for parent in record.parents.iter() {
                let children = self
                    .parents
                    .get(parent)
                    .ok_or("a child lists a parent that is not registered")?;
                if count_of(children, child) != count_of(&record.parents, parent) {
                    return Err("a link is recorded a different number of times on each side");
                }
            }
        }
        Ok(())
    }
}

impl<'de, K, V, S> Deserialize<'de> for DualIndex<K, V, S>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawIndex::<K, V, S>::deserialize(deserializer)?;
        raw.validate().map_err(D::Error::custom)?;
        Ok(DualIndex {
            policy: raw.policy,
            parent_map: raw.parents,
            child_map: raw.children,
        })
    }
}

impl<K, V, H> Serialize for DualIndex<K, V, H>
where
    K: Serialize + Eq + Hash,
    V: Serialize,
    H: BuildHasher,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut index = serializer.serialize_struct("DualIndex", 3)?;
        index.serialize_field("policy", &self.policy)?;
        index.serialize_field("parents", &self.parent_map)?;
        index.serialize_field("children", &self.child_map)?;
        index.end()
    }
}

#[cfg(test)]
mod tests {
    use crate::{DualIndex, LinkPolicy};
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Hash, Debug)]
    struct TestingStruct {
        pub(crate) value: u64,
        pub(crate) data: String,
    }

    fn construct_default_index() -> DualIndex<String, TestingStruct> {
        let mut index: DualIndex<String, TestingStruct> = (1..10)
            .map(|i| (i.to_string(), (i / 3).to_string()))
            .collect();
        index.add_child_under("9".to_string(), ["0".to_string()]);
        index.register_parent(["lonely".to_string()]);
        index.register_child(["stray".to_string()]);
        for i in 0..5 {
            index
                .set_value(&i.to_string(), TestingStruct::from_value(i))
                .ok();
        }
        index
    }

    #[test]
    fn serialize_deserialize_test() {
        let index = construct_default_index();
        let jsonified: String =
            serde_json::to_string(&index).expect("Unable to convert data to json!");
        println!("JSON: {jsonified}");
        let reconsituted: DualIndex<String, TestingStruct> =
            serde_json::from_str(&jsonified).expect("Unable to convert json to an index!");
        println!("From json: {reconsituted:?}");
        assert_eq!(index, reconsituted);
        assert_eq!(reconsituted.parents_of("9").unwrap(), &["3", "0"]);
    }

    #[test]
    fn policy_defaults_when_missing() {
        let json = r#"{"parents":{"p":["c"]},"children":{"c":{"value":7,"parents":["p"]}}}"#;
        let index: DualIndex<String, u64> = serde_json::from_str(json).unwrap();
        assert_eq!(index.policy(), LinkPolicy::Duplicate);
        assert_eq!(index.get_value("c"), Ok(Some(&7)));
        assert!(index.are_linked("c", "p"));
    }

    #[test]
    fn inconsistent_input_is_rejected() {
        // The child side is missing one of the two links
        let json = r#"{"parents":{"p":["c","c"]},"children":{"c":{"value":null,"parents":["p"]}}}"#;
        assert!(serde_json::from_str::<DualIndex<String, u64>>(json).is_err());

        // The child lists a parent that was never registered
        let json = r#"{"parents":{},"children":{"c":{"value":null,"parents":["p"]}}}"#;
        assert!(serde_json::from_str::<DualIndex<String, u64>>(json).is_err());

        // The parent lists a child that was never registered
        let json = r#"{"parents":{"p":["c"]},"children":{}}"#;
        assert!(serde_json::from_str::<DualIndex<String, u64>>(json).is_err());
    }

    #[test]
    fn unique_index_with_earlier_repeats_survives() {
        // Links made before switching to the unique policy are kept as they were
        let mut index: DualIndex<String, u64> = DualIndex::new();
        index.add_child_under("c".to_string(), ["p".to_string(), "p".to_string()]);
        index.set_policy(LinkPolicy::Unique);
        let jsonified = serde_json::to_string(&index).unwrap();
        let reconsituted: DualIndex<String, u64> = serde_json::from_str(&jsonified).unwrap();
        assert_eq!(reconsituted.policy(), LinkPolicy::Unique);
        assert_eq!(reconsituted.link_count("c", "p"), 2);
        assert_eq!(index, reconsituted);

        // New links still follow the policy
        let mut reconsituted = reconsituted;
        reconsituted.add_child_under("c".to_string(), ["p".to_string()]);
        assert_eq!(reconsituted.link_count("c", "p"), 2);
    }

    impl TestingStruct {
        pub(crate) fn from_value(value: u64) -> Self {
            Self {
                value,
                data: value.to_string(),
            }
        }
    }
}
