//! Project configuration written to `brownie-config.yaml`.
//!
//! Every record defaults to the value the toolchain itself assumes, so a
//! config file only needs to name the keys it changes.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::serde_utils;

pub const CONFIG_FILE: &str = "brownie-config.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GasKeyword {
    Max,
    Auto,
}

/// A keyword understood by the toolchain, a fixed amount in wei, or an
/// amount with units such as `20 gwei`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GasSetting {
    Keyword(GasKeyword),
    Amount(u64),
    WithUnits(String),
}

impl GasSetting {
    pub const MAX: Self = Self::Keyword(GasKeyword::Max);
    pub const AUTO: Self = Self::Keyword(GasKeyword::Auto);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub project_structure: ProjectStructure,
    pub networks: Networks,
    pub compiler: Compiler,
    pub console: Console,
    pub reports: Reports,
    pub hypothesis: Hypothesis,
    pub autofetch_sources: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    pub dev_deployment_artifacts: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotenv: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project_structure: ProjectStructure::default(),
            networks: Networks::default(),
            compiler: Compiler::default(),
            console: Console::default(),
            reports: Reports::default(),
            hypothesis: Hypothesis::default(),
            autofetch_sources: false,
            dependencies: vec![],
            dev_deployment_artifacts: false,
            dotenv: None,
        }
    }
}

impl ProjectConfig {
    pub async fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        serde_utils::read_yaml(path).await
    }

    pub async fn write(&self, path: impl AsRef<Path>) -> eyre::Result<()> {
        serde_utils::write_yaml(path, self).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectStructure {
    pub build: String,
    pub contracts: String,
    pub interfaces: String,
    pub reports: String,
    pub scripts: String,
    pub tests: String,
}

impl Default for ProjectStructure {
    fn default() -> Self {
        Self {
            build: "build".to_string(),
            contracts: "contracts".to_string(),
            interfaces: "interfaces".to_string(),
            reports: "reports".to_string(),
            scripts: "scripts".to_string(),
            tests: "tests".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Networks {
    pub default: String,
    pub development: Development,
    pub live: Live,
}

impl Default for Networks {
    fn default() -> Self {
        Self {
            default: "development".to_string(),
            development: Development::default(),
            live: Live::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Development {
    pub gas_limit: GasSetting,
    pub gas_buffer: f64,
    pub gas_price: GasSetting,
    pub max_fee: Option<u64>,
    pub priority_fee: Option<u64>,
    pub reverting_tx_gas_limit: GasSetting,
    pub default_contract_owner: bool,
    /// Extra settings passed to the local development node.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub cmd_settings: BTreeMap<String, serde_yaml::Value>,
}

impl Default for Development {
    fn default() -> Self {
        Self {
            gas_limit: GasSetting::MAX,
            gas_buffer: 1.0,
            gas_price: GasSetting::Amount(0),
            max_fee: None,
            priority_fee: None,
            reverting_tx_gas_limit: GasSetting::MAX,
            default_contract_owner: true,
            cmd_settings: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Live {
    pub gas_limit: GasSetting,
    pub gas_buffer: f64,
    pub gas_price: GasSetting,
    pub max_fee: Option<u64>,
    pub priority_fee: Option<u64>,
    pub reverting_tx_gas_limit: bool,
    pub default_contract_owner: bool,
}

impl Default for Live {
    fn default() -> Self {
        Self {
            gas_limit: GasSetting::AUTO,
            gas_buffer: 1.1,
            gas_price: GasSetting::AUTO,
            max_fee: None,
            priority_fee: None,
            reverting_tx_gas_limit: false,
            default_contract_owner: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compiler {
    pub evm_version: Option<String>,
    pub solc: Solc,
    pub vyper: Vyper,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Solc {
    pub version: Option<String>,
    pub optimizer: Optimizer,
    pub remappings: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Optimizer {
    pub enabled: bool,
    pub runs: u32,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self {
            enabled: true,
            runs: 200,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vyper {
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Console {
    pub show_colors: bool,
    pub color_style: String,
    pub auto_suggest: bool,
    pub completions: bool,
    pub editing_mode: String,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            show_colors: true,
            color_style: "monokai".to_string(),
            auto_suggest: true,
            completions: true,
            editing_mode: "emacs".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reports {
    pub exclude_paths: Option<Vec<String>>,
    pub exclude_contracts: Option<Vec<String>>,
    pub only_include_project: bool,
}

impl Default for Reports {
    fn default() -> Self {
        Self {
            exclude_paths: None,
            exclude_contracts: None,
            only_include_project: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hypothesis {
    /// Milliseconds, `None` disables the deadline.
    pub deadline: Option<u64>,
    pub max_examples: u32,
    pub report_multiple_bugs: bool,
    pub stateful_step_count: u32,
    pub phases: Phases,
}

impl Default for Hypothesis {
    fn default() -> Self {
        Self {
            deadline: None,
            max_examples: 50,
            report_multiple_bugs: false,
            stateful_step_count: 10,
            phases: Phases::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phases {
    pub explicit: bool,
    pub reuse: bool,
    pub generate: bool,
    pub target: bool,
    pub shrink: bool,
}

impl Default for Phases {
    fn default() -> Self {
        Self {
            explicit: true,
            reuse: true,
            generate: true,
            target: true,
            shrink: true,
        }
    }
}
