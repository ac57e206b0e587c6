//! Capability probes
//!
//! A probe answers "is a type with this fully-qualified name defined in the
//! project?". The installer uses marker types as a proxy for "is the
//! DeskyMode / Final IK code installed".

pub mod csharp;
pub mod source_tree;

use std::collections::HashSet;

use serde::Serialize;

use crate::config::Markers;

pub use source_tree::SourceTreeProbe;

/// Answers type presence queries against the host project
pub trait CapabilityProbe {
    fn is_type_present(&self, name: &str) -> bool;
}

/// Presence of the three marker types, computed once per run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PresenceFlags {
    pub scripts_installed: bool,
    pub dependency_present: bool,
    pub full_dependency_present: bool,
}

impl PresenceFlags {
    pub fn detect(probe: &dyn CapabilityProbe, markers: &Markers) -> Self {
        let flags = Self {
            scripts_installed: probe.is_type_present(&markers.scripts),
            dependency_present: probe.is_type_present(&markers.dependency),
            full_dependency_present: probe.is_type_present(&markers.full_dependency),
        };
        tracing::debug!(?flags, "detected presence flags");
        flags
    }

    /// Final IK or its stub is available
    pub fn any_dependency(&self) -> bool {
        self.dependency_present || self.full_dependency_present
    }
}

/// Probe with a fixed set of type names
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    types: HashSet<String>,
}

impl StaticProbe {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    #[cfg(test)]
    pub fn insert(&mut self, name: impl Into<String>) {
        self.types.insert(name.into());
    }
}

impl CapabilityProbe for StaticProbe {
    fn is_type_present(&self, name: &str) -> bool {
        self.types.contains(name)
    }
}

/// A type is present when any inner probe reports it
#[derive(Default)]
pub struct ChainedProbe {
    probes: Vec<Box<dyn CapabilityProbe>>,
}

impl ChainedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, probe: impl CapabilityProbe + 'static) -> Self {
        self.probes.push(Box::new(probe));
        self
    }
}

impl CapabilityProbe for ChainedProbe {
    fn is_type_present(&self, name: &str) -> bool {
        self.probes.iter().any(|p| p.is_type_present(name))
    }
}
