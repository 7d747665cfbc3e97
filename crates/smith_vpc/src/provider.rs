//! IaC output provider definitions.

use serde::{Deserialize, Serialize};

/// Template flavours a stack can be synthesized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IacProvider {
    CloudFormation,
    Terraform,
}

impl Default for IacProvider {
    fn default() -> Self {
        Self::CloudFormation
    }
}

impl IacProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            IacProvider::CloudFormation => "cloudformation",
            IacProvider::Terraform => "terraform",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![IacProvider::CloudFormation, IacProvider::Terraform]
    }
}

impl std::str::FromStr for IacProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cloudformation" | "cfn" => Ok(IacProvider::CloudFormation),
            "terraform" | "tf" => Ok(IacProvider::Terraform),
            other => Err(format!("unknown IaC provider: {other}")),
        }
    }
}

impl std::fmt::Display for IacProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
