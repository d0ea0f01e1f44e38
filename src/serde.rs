use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::BstMap;

pub(crate) struct MapVisitor<K, V> {
    pub(crate) desc: &'static str,
    marker: PhantomData<fn() -> BstMap<K, V>>,
}

impl<'de, K, V> Visitor<'de> for MapVisitor<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    type Value = BstMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.desc)
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = BstMap::new();
        while let Some((k, v)) = access.next_entry()? {
            map.insert(k, v);
        }
        Ok(map)
    }
}

impl<K, V> Serialize for BstMap<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, K, V> Deserialize<'de> for BstMap<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map_visitor = MapVisitor {
            desc: "a bst_map::BstMap",
            marker: PhantomData,
        };
        deserializer.deserialize_map(map_visitor)
    }
}

#[cfg(test)]
mod test {
    use crate::BstMap;

    #[test]
    fn json_round_trip() {
        let m = BstMap::from([(3, "c"), (1, "a"), (2, "b")]);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"1":"a","2":"b","3":"c"}"#);

        let back: BstMap<u32, String> = serde_json::from_str(&json).unwrap();
        assert!(back
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .eq([(1, "a"), (2, "b"), (3, "c")]));
        back.check().unwrap();
    }
}
