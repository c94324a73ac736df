use serde::{Deserialize, Serialize};

/// The number of scenarios each workload family defines.
pub const DEFAULT_SCENARIO_COUNT: u32 = 64;

/// Identifies one reproducible workload definition within a [DataTypeFamily].
///
/// The same id always denotes the same sequence of container operations, for every container
/// kind and across repeated calls.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[display("{_0}")]
pub struct ScenarioId(u32);

impl ScenarioId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Enumerate the dense range `[0, count)` in ascending order.
    pub fn range(count: u32) -> impl Iterator<Item = ScenarioId> {
        (0..count).map(ScenarioId)
    }
}

/// The broad kind of container under test.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DataTypeFamily {
    /// Dynamic sequences, `Vec<T>` and friends.
    Sequence,
    /// Variable-length text buffers, `String` and friends.
    Text,
}

impl DataTypeFamily {
    pub const ALL: [DataTypeFamily; 2] = [DataTypeFamily::Sequence, DataTypeFamily::Text];

    pub fn name(&self) -> &'static str {
        match self {
            DataTypeFamily::Sequence => "sequence",
            DataTypeFamily::Text => "text",
        }
    }
}

impl std::fmt::Display for DataTypeFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
