//! Lock file model and parser.
//!
//! Pure functions only, no I/O. The raw document types mirror the YAML
//! shape and are lenient about missing or `null` sections; [`Manifest`] is
//! the typed model the services consume.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::domain::error::ProvisionError;

// ── Typed model ──────────────────────────────────────────────────────────────

/// Checkout target for a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "revision", rename_all = "snake_case")]
pub enum Revision {
    /// Exact commit or tag.
    Pinned(String),
    /// Whatever the default branch points at after clone/fetch.
    Unpinned,
}

impl Revision {
    /// Blank strings count as "no revision".
    #[must_use]
    pub fn from_optional(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => Self::Pinned(v.trim().to_string()),
            _ => Self::Unpinned,
        }
    }

    /// The pinned revision, if any.
    #[must_use]
    pub fn pinned(&self) -> Option<&str> {
        match self {
            Self::Pinned(rev) => Some(rev),
            Self::Unpinned => None,
        }
    }
}

/// Parsed lock file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Revision for the primary application checkout.
    pub core_revision: Revision,
    /// Plugins in document order. Repository URLs are unique.
    pub plugins: Vec<PluginSpec>,
    /// Artifacts in document order.
    pub artifacts: Vec<ArtifactSpec>,
}

/// A plugin repository entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSpec {
    pub repository_url: String,
    pub revision: Revision,
    pub disabled: bool,
}

impl PluginSpec {
    /// Directory name of this plugin's checkout under the plugins directory.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRepositoryUrl` if no usable name can be derived.
    pub fn checkout_name(&self) -> Result<String, ProvisionError> {
        checkout_name(&self.repository_url)
    }
}

/// A downloadable file and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    /// Used in diagnostics only.
    pub identifier: String,
    pub source_url: Option<String>,
    pub destinations: Vec<DestinationPath>,
}

impl ArtifactSpec {
    /// Identifier for status lines, falling back to the URL.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if !self.identifier.is_empty() {
            return &self.identifier;
        }
        self.source_url.as_deref().unwrap_or("<unnamed model>")
    }
}

/// A destination path relative to the installation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPath {
    pub relative_path: String,
}

impl DestinationPath {
    /// Join this path onto `root`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDestination` for empty or absolute paths and for paths
    /// containing `..`.
    pub fn resolve(&self, root: &Path) -> Result<PathBuf, ProvisionError> {
        let rel = Path::new(&self.relative_path);
        let escapes = rel.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        let has_file = rel.components().any(|c| matches!(c, Component::Normal(_)));
        if escapes || !has_file {
            return Err(ProvisionError::InvalidDestination(
                self.relative_path.clone(),
            ));
        }
        Ok(root.join(rel))
    }
}

/// Two enabled plugins that derive the same checkout directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutCollision {
    pub name: String,
    pub first_url: String,
    pub second_url: String,
}

/// Derive a checkout directory name from a repository URL.
///
/// Takes the last path segment and strips a trailing `.git`. Distinct URLs
/// can map to the same name; callers get the same directory back.
///
/// # Errors
///
/// Returns `InvalidRepositoryUrl` when the result is empty, `.` or `..`.
pub fn checkout_name(url: &str) -> Result<String, ProvisionError> {
    let last = url.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() || name == "." || name == ".." || name.contains('\\') {
        return Err(ProvisionError::InvalidRepositoryUrl(url.to_string()));
    }
    Ok(name.to_string())
}

impl Manifest {
    /// Parse lock file text. `source` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns `ManifestParse` on invalid YAML or an unexpected shape.
    pub fn parse(text: &str, source: &Path) -> Result<Self, ProvisionError> {
        let doc: Option<LockDocument> =
            serde_yaml::from_str(text).map_err(|e| ProvisionError::ManifestParse {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(doc.unwrap_or_default().into())
    }

    /// Enabled plugins whose derived checkout names collide, in document order.
    #[must_use]
    pub fn checkout_collisions(&self) -> Vec<CheckoutCollision> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut collisions = Vec::new();
        for plugin in self.plugins.iter().filter(|p| !p.disabled) {
            let Ok(name) = plugin.checkout_name() else {
                continue;
            };
            if let Some(first) = seen.get(&name) {
                collisions.push(CheckoutCollision {
                    name,
                    first_url: (*first).to_string(),
                    second_url: plugin.repository_url.clone(),
                });
            } else {
                seen.insert(name, &plugin.repository_url);
            }
        }
        collisions
    }
}

// ── Raw document ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LockDocument {
    custom_nodes: Option<CustomNodesSection>,
    models: Option<Vec<ModelEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CustomNodesSection {
    #[serde(deserialize_with = "revision_scalar")]
    comfyui: Option<String>,
    git_custom_nodes: Option<OrderedNodes>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NodeEntry {
    #[serde(deserialize_with = "revision_scalar")]
    hash: Option<String>,
    disabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    paths: Option<Vec<PathEntry>>,
}

#[derive(Debug, Deserialize)]
struct PathEntry {
    path: String,
}

/// `git_custom_nodes` mapping with document order preserved.
#[derive(Debug, Default)]
struct OrderedNodes(Vec<(String, NodeEntry)>);

impl<'de> Deserialize<'de> for OrderedNodes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NodesVisitor;

        impl<'de> Visitor<'de> for NodesVisitor {
            type Value = OrderedNodes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of repository URL to node entry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut seen = HashSet::new();
                let mut nodes = Vec::new();
                while let Some((url, entry)) = map.next_entry::<String, Option<NodeEntry>>()? {
                    if !seen.insert(url.clone()) {
                        return Err(de::Error::custom(format!(
                            "duplicate repository URL: {url}"
                        )));
                    }
                    nodes.push((url, entry.unwrap_or_default()));
                }
                Ok(OrderedNodes(nodes))
            }
        }

        deserializer.deserialize_map(NodesVisitor)
    }
}

/// Accept revisions written as strings or bare integers (all-digit hashes).
fn revision_scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "revision must be a string, got {other:?}"
        ))),
    }
}

impl From<LockDocument> for Manifest {
    fn from(doc: LockDocument) -> Self {
        let nodes = doc.custom_nodes.unwrap_or_default();
        let plugins = nodes
            .git_custom_nodes
            .unwrap_or_default()
            .0
            .into_iter()
            .map(|(repository_url, entry)| PluginSpec {
                repository_url,
                revision: Revision::from_optional(entry.hash),
                disabled: entry.disabled.unwrap_or(false),
            })
            .collect();
        let artifacts = doc
            .models
            .unwrap_or_default()
            .into_iter()
            .map(|m| ArtifactSpec {
                identifier: m.model.unwrap_or_default(),
                source_url: m.url.filter(|u| !u.trim().is_empty()),
                destinations: m
                    .paths
                    .unwrap_or_default()
                    .into_iter()
                    .map(|p| DestinationPath {
                        relative_path: p.path,
                    })
                    .collect(),
            })
            .collect();
        Self {
            core_revision: Revision::from_optional(nodes.comfyui),
            plugins,
            artifacts,
        }
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
