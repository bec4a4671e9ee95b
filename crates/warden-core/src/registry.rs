//! Statically built handler registry
//!
//! The host application declares its handler groups once at startup, either in
//! code through [`HandlerRegistry::builder`] or from a TOML manifest:
//!
//! ```toml
//! [[group]]
//! type_name = "RootController"
//!
//! [[group.method]]
//! name = "getList"
//!
//! [[group]]
//! type_name = "UserController"
//! description = "User"
//! api_group = true
//! extends = "RootController"
//! policy = {}
//! filter = { exclude = ["delete"] }
//! ```
//!
//! Groups may extend a base group. The effective method set of a group is its
//! own methods followed by the base methods it does not redeclare; inherited
//! methods are re-owned by the concrete group. Class policy, API-group marker
//! and inheritance filter fall back to the base when the group declares none.
//! A group whose base chain cannot be resolved keeps only its own methods and
//! is flagged on its [`OwnerDescriptor`].

use crate::access::AccessPolicy;
use crate::api::InheritanceFilter;
use crate::errors::{Result, WardenError};
use crate::handler::{HandlerDescriptor, HandlerMetadataSource, OwnerDescriptor};
use crate::identity::{owner_identity, DEFAULT_CONTROLLER_SUFFIX};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

/// Declared handler group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerGroup {
    /// Owner type name, e.g. `UserController`
    pub type_name: String,
    /// Human description; the type name is used when absent
    #[serde(default)]
    pub description: Option<String>,
    /// Protected handler group marker; inherited from the base when unset
    #[serde(default)]
    pub api_group: Option<bool>,
    /// Base group whose methods are inherited
    #[serde(default)]
    pub extends: Option<String>,
    /// Class-level access policy
    #[serde(default)]
    pub policy: Option<AccessPolicy>,
    /// Narrows the methods inherited from the base
    #[serde(default)]
    pub filter: Option<InheritanceFilter>,
    /// Own methods in declaration order
    #[serde(default, rename = "method")]
    pub methods: Vec<HandlerMethod>,
}

impl HandlerGroup {
    /// Protected handler group.
    pub fn api(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            api_group: Some(true),
            ..Self::default()
        }
    }

    /// Group without the marker, typically a shared base.
    pub fn base(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Human description used in catalog display names.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Inherit the methods of `base`.
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.extends = Some(base.into());
        self
    }

    /// Class-level policy.
    pub fn policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Narrow the inherited method set.
    pub fn filter(mut self, filter: InheritanceFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Declare an own method.
    pub fn method(mut self, method: HandlerMethod) -> Self {
        self.methods.push(method);
        self
    }
}

/// Declared handler method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerMethod {
    /// Method name, e.g. `getList`
    pub name: String,
    /// Human description; the method name is used when absent
    #[serde(default)]
    pub description: Option<String>,
    /// Method-level access policy, replaces the class policy when present
    #[serde(default)]
    pub policy: Option<AccessPolicy>,
    /// Whether the method is routable over HTTP
    #[serde(default = "default_http_mapping")]
    pub http_mapping: bool,
}

fn default_http_mapping() -> bool {
    true
}

impl HandlerMethod {
    /// HTTP-mapped method without its own policy.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            policy: None,
            http_mapping: true,
        }
    }

    /// Human description used in catalog display names.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Method-level policy.
    pub fn policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Plain method without an HTTP mapping marker.
    pub fn unmapped(mut self) -> Self {
        self.http_mapping = false;
        self
    }
}

/// TOML manifest listing handler groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryManifest {
    /// Declared groups in declaration order
    #[serde(default, rename = "group")]
    pub groups: Vec<HandlerGroup>,
}

impl RegistryManifest {
    /// Parse a manifest without building it.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read a manifest from disk.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WardenError::invalid(format!(
                "Failed to read handler manifest {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }
}

/// Builder collecting groups in declaration order.
#[derive(Debug)]
pub struct RegistryBuilder {
    groups: Vec<HandlerGroup>,
    controller_suffix: String,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            controller_suffix: DEFAULT_CONTROLLER_SUFFIX.to_string(),
        }
    }
}

impl RegistryBuilder {
    /// Suffix used to derive owner identities when checking them for collisions.
    pub fn controller_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.controller_suffix = suffix.into();
        self
    }

    /// Add every group of a manifest.
    pub fn manifest(self, manifest: RegistryManifest) -> Self {
        self.groups(manifest.groups)
    }

    /// Add one group.
    pub fn group(mut self, group: HandlerGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Add several groups.
    pub fn groups(mut self, groups: impl IntoIterator<Item = HandlerGroup>) -> Self {
        self.groups.extend(groups);
        self
    }

    /// Validate declarations and flatten inheritance.
    ///
    /// Fails with [`WardenError::Invalid`] on malformed names, duplicate
    /// declarations, or two groups deriving the same owner identity.
    pub fn build(self) -> Result<HandlerRegistry> {
        let mut declared: IndexMap<String, HandlerGroup> = IndexMap::new();
        let mut identities: HashMap<String, String> = HashMap::new();
        for group in self.groups {
            validate_group(&group)?;
            if declared.contains_key(&group.type_name) {
                return Err(WardenError::invalid(format!(
                    "handler group {} declared twice",
                    group.type_name
                )));
            }
            let identity = owner_identity(&group.type_name, &self.controller_suffix);
            if let Some(other) = identities.insert(identity.clone(), group.type_name.clone()) {
                return Err(WardenError::invalid(format!(
                    "handler groups {other} and {} share permission identity {identity}",
                    group.type_name
                )));
            }
            declared.insert(group.type_name.clone(), group);
        }

        let mut owners = IndexMap::with_capacity(declared.len());
        let mut handlers = Vec::new();
        for group in declared.values() {
            let mut chain = Vec::new();
            let (resolved, owner) = match flatten(&declared, &group.type_name, &mut chain) {
                Ok(resolved) => {
                    let owner = OwnerDescriptor::new(&group.type_name);
                    (resolved, owner)
                }
                Err(reason) => {
                    warn!(
                        group = %group.type_name,
                        reason = %reason,
                        "Handler group inheritance unresolved, keeping own methods only"
                    );
                    let owner =
                        OwnerDescriptor::new(&group.type_name).with_inheritance_error(reason);
                    (Flattened::own(group), owner)
                }
            };

            let owner = owner
                .with_api_group(resolved.api_group.unwrap_or(false))
                .with_description(group.description.clone())
                .with_inheritance_filter(resolved.filter);

            for method in resolved.methods {
                handlers.push(
                    HandlerDescriptor::new(&group.type_name, method.name)
                        .with_class_policy(resolved.class_policy)
                        .with_method_policy(method.policy)
                        .with_http_mapping(method.http_mapping)
                        .with_description(method.description),
                );
            }
            owners.insert(group.type_name.clone(), owner);
        }

        let mut index: HashMap<String, HashMap<String, usize>> = HashMap::new();
        for (position, handler) in handlers.iter().enumerate() {
            index
                .entry(handler.owner_type().to_string())
                .or_default()
                .insert(handler.method_name().to_string(), position);
        }

        debug!(
            groups = owners.len(),
            handlers = handlers.len(),
            "Handler registry built"
        );

        Ok(HandlerRegistry {
            owners,
            handlers,
            index,
        })
    }
}

/// Names end up inside permission identities, so they must be non-empty
/// and free of whitespace.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

fn validate_group(group: &HandlerGroup) -> Result<()> {
    if !is_valid_name(&group.type_name) {
        return Err(WardenError::invalid(format!(
            "handler group type name '{}' is empty or contains whitespace",
            group.type_name
        )));
    }
    let mut seen = HashSet::new();
    for method in &group.methods {
        if !is_valid_name(&method.name) {
            return Err(WardenError::invalid(format!(
                "handler group {} declares method '{}' with an empty or whitespace name",
                group.type_name, method.name
            )));
        }
        if !seen.insert(method.name.as_str()) {
            return Err(WardenError::invalid(format!(
                "handler {}.{} declared twice",
                group.type_name, method.name
            )));
        }
    }
    Ok(())
}

/// A group with its base chain folded in.
struct Flattened {
    class_policy: Option<AccessPolicy>,
    api_group: Option<bool>,
    filter: Option<InheritanceFilter>,
    methods: Vec<HandlerMethod>,
}

impl Flattened {
    fn own(group: &HandlerGroup) -> Self {
        Self {
            class_policy: group.policy,
            api_group: group.api_group,
            filter: group.filter.clone(),
            methods: group.methods.clone(),
        }
    }
}

fn flatten(
    declared: &IndexMap<String, HandlerGroup>,
    type_name: &str,
    chain: &mut Vec<String>,
) -> std::result::Result<Flattened, String> {
    if chain.iter().any(|seen| seen == type_name) {
        return Err(format!(
            "inheritance cycle: {} -> {type_name}",
            chain.join(" -> ")
        ));
    }
    let group = declared
        .get(type_name)
        .ok_or_else(|| format!("unknown base group {type_name}"))?;

    let mut flattened = Flattened::own(group);
    if let Some(base) = &group.extends {
        chain.push(type_name.to_string());
        let inherited = flatten(declared, base, chain)?;
        chain.pop();

        for method in inherited.methods {
            if !flattened.methods.iter().any(|own| own.name == method.name) {
                flattened.methods.push(method);
            }
        }
        flattened.class_policy = flattened.class_policy.or(inherited.class_policy);
        flattened.api_group = flattened.api_group.or(inherited.api_group);
        flattened.filter = flattened.filter.or(inherited.filter);
    }
    Ok(flattened)
}

/// Registry of every handler of the service, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    owners: IndexMap<String, OwnerDescriptor>,
    handlers: Vec<HandlerDescriptor>,
    /// owner type -> method name -> position in `handlers`
    index: HashMap<String, HashMap<String, usize>>,
}

impl HandlerRegistry {
    /// Builder using the default controller suffix.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Build a registry from a parsed manifest.
    pub fn from_manifest(manifest: RegistryManifest) -> Result<Self> {
        Self::builder().manifest(manifest).build()
    }

    /// Parse and build a TOML manifest.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Self::from_manifest(RegistryManifest::from_toml_str(source)?)
    }

    /// Load a TOML manifest from disk.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::from_manifest(RegistryManifest::load_from_file(path)?)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl HandlerMetadataSource for HandlerRegistry {
    fn handlers(&self) -> &[HandlerDescriptor] {
        &self.handlers
    }

    fn owners(&self) -> Vec<&OwnerDescriptor> {
        self.owners.values().collect()
    }

    fn owner(&self, type_name: &str) -> Option<&OwnerDescriptor> {
        self.owners.get(type_name)
    }

    fn find(&self, owner_type: &str, method: &str) -> Option<&HandlerDescriptor> {
        self.index
            .get(owner_type)
            .and_then(|methods| methods.get(method))
            .and_then(|position| self.handlers.get(*position))
    }
}
