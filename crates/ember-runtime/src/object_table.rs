use ember_heap::JsValue;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Debugger-visible handle to a heap value retained by the agent.
///
/// Serialized as a decimal string (`"17"`); deserialization also accepts a
/// bare integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ObjectId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u32),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(raw) => Ok(Self(raw)),
            Raw::Text(text) => text
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid object id {text:?}"))),
        }
    }
}

/// Id → value map backing every `objectId` handed to the client.
///
/// Ids are dense and allocated in order starting at 0. Entries are never
/// removed, so an id keeps resolving to the same value for the whole session.
/// Minting is not deduplicated: the same value minted twice gets two ids.
#[derive(Debug, Default)]
pub struct ObjectReferenceTable {
    values: Vec<JsValue>,
}

impl ObjectReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, value: JsValue) -> ObjectId {
        let next = u32::try_from(self.values.len()).unwrap_or(u32::MAX);
        assert!(next != u32::MAX, "object id space exhausted");
        self.values.push(value);
        ObjectId(next)
    }

    pub fn get(&self, id: ObjectId) -> Option<&JsValue> {
        self.values.get(id.0 as usize)
    }

    pub fn resolve(&self, id: ObjectId) -> crate::RuntimeResult<&JsValue> {
        self.get(id).ok_or(crate::RuntimeError::UnknownObjectId(id))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
