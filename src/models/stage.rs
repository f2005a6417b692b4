use serde::Deserialize;
use serde_json::Value;

/// Entry of the vacancy stage catalogue. `removed` is a deletion marker
/// (null for live stages).
#[derive(Debug, Clone, Deserialize)]
pub struct Stage {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub removed: Option<Value>,
}

impl Stage {
    pub fn is_removed(&self) -> bool {
        self.removed.is_some()
    }
}
