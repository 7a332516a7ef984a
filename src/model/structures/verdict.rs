use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use strum_macros::EnumIter;

/// Judge verdict of the latest submission on a problem
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Verdict {
    #[serde(rename = "AC")]
    Accepted,
    #[serde(rename = "WA")]
    WrongAnswer,
    #[serde(rename = "TLE")]
    TimeLimitExceeded,
    #[serde(rename = "MLE")]
    MemoryLimitExceeded,
    #[serde(rename = "RE")]
    RuntimeError,
    #[serde(rename = "CE")]
    CompilationError,
    /// Still being judged
    Pending
}

impl Verdict {
    pub fn code(&self) -> &'static str {
        match self {
            Verdict::Accepted => "AC",
            Verdict::WrongAnswer => "WA",
            Verdict::TimeLimitExceeded => "TLE",
            Verdict::MemoryLimitExceeded => "MLE",
            Verdict::RuntimeError => "RE",
            Verdict::CompilationError => "CE",
            Verdict::Pending => "Pending"
        }
    }
}

impl TryFrom<&str> for Verdict {
    type Error = ();

    fn try_from(v: &str) -> Result<Self, Self::Error> {
        match v {
            "AC" => Ok(Verdict::Accepted),
            "WA" => Ok(Verdict::WrongAnswer),
            "TLE" => Ok(Verdict::TimeLimitExceeded),
            "MLE" => Ok(Verdict::MemoryLimitExceeded),
            "RE" => Ok(Verdict::RuntimeError),
            "CE" => Ok(Verdict::CompilationError),
            "Pending" => Ok(Verdict::Pending),
            _ => Err(())
        }
    }
}
