//! Domain types for the process topology.
//!
//! A [`Manifest`] holds the declared [`ProcessType`]s in definition order.
//! The planner expands it into one [`InstanceSpec`] per child process.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name of a process type as declared in the manifest (`web`, `worker`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcessName(pub String);

impl fmt::Display for ProcessName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProcessName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProcessName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Globally unique name of one running instance: `{process}-{index}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceName(pub String);

impl InstanceName {
    pub fn new(process: &ProcessName, local_index: usize) -> Self {
        Self(format!("{}-{}", process.0, local_index))
    }
}

impl fmt::Display for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for InstanceName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Environment handed to a child process. Each instance owns its own copy.
pub type Environment = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One `name: command` declaration from the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessType {
    pub name: ProcessName,
    /// Raw command line, passed through verbatim.
    pub command: String,
}

/// Ordered collection of process types.
///
/// Order is the position of a name's first declaration; redeclaring a name
/// replaces its command in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    processes: Vec<ProcessType>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the command for `name`.
    pub fn insert(&mut self, name: ProcessName, command: String) {
        match self.processes.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.command = command,
            None => self.processes.push(ProcessType { name, command }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ProcessType> {
        self.processes.iter().find(|p| p.name.0 == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessType> {
        self.processes.iter()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Keep only the process type called `name`.
    pub fn retain_only(&mut self, name: &str) {
        self.processes.retain(|p| p.name.0 == name);
    }
}

/// Everything needed to launch one child process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceSpec {
    pub name: InstanceName,
    pub process: ProcessName,
    pub command: String,
    pub port: u16,
    #[serde(skip)]
    pub environment: Environment,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
