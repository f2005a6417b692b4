use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Pipeline stage the evaluation verdict points at. Values are the
/// display names used by the Huntflow account, which is Russian-language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStage {
    New,
    Priority,
    Reserve,
    Rejection,
}

impl TargetStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetStage::New => "новые",
            TargetStage::Priority => "приоритет",
            TargetStage::Reserve => "резерв",
            TargetStage::Rejection => "отказ",
        }
    }
}

impl fmt::Display for TargetStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetStage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "новые" => Ok(TargetStage::New),
            "приоритет" => Ok(TargetStage::Priority),
            "резерв" => Ok(TargetStage::Reserve),
            "отказ" => Ok(TargetStage::Rejection),
            other => Err(format!("unknown target stage '{}'", other)),
        }
    }
}

impl Serialize for TargetStage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TargetStage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Structured verdict the LLM call must validate against. A response that
/// does not parse into this shape fails the evaluation outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateEvaluation {
    pub target_stage: TargetStage,
    pub comment: String,
}
