//! Endpoint profiles: everything that distinguishes one bridge endpoint from
//! another.
//!
//! Each profile names the route, the JSON field carrying the caller's text,
//! the assistant definition created per request, the input guard, the
//! response strategy, and the CORS allow-list. The built-in catalog ships the
//! four stock endpoints; a YAML file can replace it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::guard::InputGuard;
use super::request::InputField;

/// Origins the stock endpoints accept cross-origin requests from.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "https://port-0-test-back-lxlts66g89582f3b.sel5.cloudtype.app",
    "https://web-test-front-lxlts66g89582f3b.sel5.cloudtype.app",
    "http://localhost:3000",
];

/// How the bridge waits for the upstream run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStrategy {
    /// Create a run and re-fetch its status until it completes.
    Poll,
    /// Start a streaming run and fold its events.
    Stream,
}

/// Tool enabled on the per-request assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantTool {
    CodeInterpreter,
    FileSearch,
}

/// Configuration of one bridge endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointProfile {
    /// Short name used in logs.
    pub name: String,
    /// HTTP path, e.g. `/cat`.
    pub route: String,
    #[serde(default)]
    pub input_field: InputField,
    /// Name given to the upstream assistant.
    pub assistant_name: String,
    /// System instructions for the upstream assistant.
    pub instructions: String,
    /// Model override; the configured default is used when absent.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub tools: Vec<AssistantTool>,
    #[serde(default)]
    pub guard: InputGuard,
    pub strategy: ResponseStrategy,
    /// Allowed CORS origins; the server-wide list is used when empty.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl EndpointProfile {
    /// Model to use, falling back to `default_model`.
    pub fn model_or<'a>(&'a self, default_model: &'a str) -> &'a str {
        self.model.as_deref().unwrap_or(default_model)
    }

    /// Cat persona answering by polling.
    pub fn cat() -> Self {
        Self {
            name: "cat".to_string(),
            route: "/cat".to_string(),
            input_field: InputField::Message,
            assistant_name: "고양이임".to_string(),
            instructions: "너는 고양이야. 너의 품종은 암컷 샴고양이고 3살이야. 고양이로써 인간에게 대답해야해. 대답의 끝은 냥으로 끝나야해. ".to_string(),
            model: None,
            tools: Vec::new(),
            guard: InputGuard::None,
            strategy: ResponseStrategy::Poll,
            cors_origins: default_origins(),
        }
    }

    /// Pessimist persona answering by polling.
    pub fn negative() -> Self {
        Self {
            name: "negative".to_string(),
            route: "/negative".to_string(),
            input_field: InputField::Message,
            assistant_name: "부정이".to_string(),
            instructions: "너는 모든 일에 부정적인 사람이야. 어떤 질문을 받아도 비관적이고 회의적인 시각으로 대답해야해.".to_string(),
            model: None,
            tools: Vec::new(),
            guard: InputGuard::None,
            strategy: ResponseStrategy::Poll,
            cors_origins: default_origins(),
        }
    }

    /// Math tutor with the code interpreter, streaming, guarded input.
    pub fn solve_equation() -> Self {
        Self {
            name: "solve-equation".to_string(),
            route: "/solve-equation".to_string(),
            input_field: InputField::Equation,
            assistant_name: "Math Tutor".to_string(),
            instructions: "You are a personal math tutor. Solve the equation step by step. Write and run code to verify the answer, and explain each step briefly.".to_string(),
            model: None,
            tools: vec![AssistantTool::CodeInterpreter],
            guard: InputGuard::PrefixAndSubstring {
                prefix: "Solve:".to_string(),
                required: "=".to_string(),
                instruction: "Please send your equation as `Solve: <equation>`, for example `Solve: 2x + 3 = 7`.".to_string(),
            },
            strategy: ResponseStrategy::Stream,
            cors_origins: default_origins(),
        }
    }

    /// General assistant, streaming.
    pub fn get_response() -> Self {
        Self {
            name: "get-response".to_string(),
            route: "/get-response".to_string(),
            input_field: InputField::Message,
            assistant_name: "Assistant".to_string(),
            instructions: "You are a helpful assistant. Answer clearly and concisely.".to_string(),
            model: None,
            tools: Vec::new(),
            guard: InputGuard::None,
            strategy: ResponseStrategy::Stream,
            cors_origins: default_origins(),
        }
    }
}

fn default_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()
}

/// Errors loading or validating an endpoint catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read endpoint catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid endpoint catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("endpoint catalog is empty")]
    Empty,

    #[error("route `{0}` must start with '/'")]
    InvalidRoute(String),

    #[error("route `{0}` is declared more than once")]
    DuplicateRoute(String),

    #[error("endpoint `{0}` has no instructions")]
    MissingInstructions(String),
}

/// The set of endpoints the server exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointCatalog {
    pub endpoints: Vec<EndpointProfile>,
}

impl Default for EndpointCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EndpointCatalog {
    /// The four stock endpoints.
    pub fn builtin() -> Self {
        Self {
            endpoints: vec![
                EndpointProfile::cat(),
                EndpointProfile::negative(),
                EndpointProfile::solve_equation(),
                EndpointProfile::get_response(),
            ],
        }
    }

    /// Parses and validates a YAML catalog.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reads a YAML catalog from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.endpoints.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for profile in &self.endpoints {
            if !profile.route.starts_with('/') {
                return Err(CatalogError::InvalidRoute(profile.route.clone()));
            }
            if !seen.insert(profile.route.as_str()) {
                return Err(CatalogError::DuplicateRoute(profile.route.clone()));
            }
            if profile.instructions.trim().is_empty() {
                return Err(CatalogError::MissingInstructions(profile.name.clone()));
            }
        }
        Ok(())
    }

    /// Looks up a profile by route.
    pub fn get(&self, route: &str) -> Option<&EndpointProfile> {
        self.endpoints.iter().find(|p| p.route == route)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointProfile> {
        self.endpoints.iter()
    }
}
