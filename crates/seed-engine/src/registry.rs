//! Loader registry and the ordering it runs in.
//!
//! The ordering list is authored by hand. [`Registry::validate_order`] checks
//! it against declared associations, and [`derive_order`] computes an order
//! that satisfies them.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::time::Instant;

use seed_config::UpdatePolicy;
use seed_core::RunReport;
use seed_store::Store;

use crate::engine::Reconciler;
use crate::error::LoadError;
use crate::loader::EntityTypeLoader;

/// The order loaders run in. A loader may only reference entity types created
/// by loaders before it.
pub const LOADER_ORDER: &[&str] = &[
    "users",
    "groups",
    "object_permissions",
    "custom_fields",
    "custom_links",
    "tags",
    "webhooks",
    "tenant_groups",
    "tenants",
    "regions",
    "sites",
    "locations",
    "rack_roles",
    "racks",
    "power_panels",
    "power_feeds",
    "manufacturers",
    "device_roles",
    "device_types",
    "devices",
    "interfaces",
    "platforms",
    "route_targets",
    "vrfs",
    "rirs",
    "asns",
    "aggregates",
    "prefix_vlan_roles",
    "cluster_types",
    "cluster_groups",
    "clusters",
    "vlan_groups",
    "vlans",
    "virtual_machines",
    "virtualization_interfaces",
    "prefixes",
    "ip_addresses",
    "primary_ips",
    "services",
    "providers",
    "circuit_types",
    "circuits",
    "cables",
    "contact_groups",
    "contact_roles",
    "contacts",
];

/// A loader plus its per-run update flag.
pub struct RegisteredLoader {
    pub loader: Box<dyn EntityTypeLoader>,
    pub updates_allowed: bool,
}

/// Options for [`Registry::run`].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Run only these loaders, still in registry order.
    pub only: Option<Vec<String>>,
    /// Stop at the first failed loader.
    pub fail_fast: bool,
}

/// An association whose target type is produced by a later loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderViolation {
    pub loader: String,
    pub field: String,
    pub target: String,
    /// The loader producing `target`.
    pub producer: String,
    pub required: bool,
}

impl std::fmt::Display for OrderViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.required { "required" } else { "optional" };
        write!(
            f,
            "{}.{} ({kind}) references {} which is created later by {}",
            self.loader, self.field, self.target, self.producer
        )
    }
}

pub struct Registry {
    order: Vec<String>,
    loaders: HashMap<String, RegisteredLoader>,
    policy: UpdatePolicy,
}

impl Registry {
    /// Empty registry using [`LOADER_ORDER`].
    #[must_use]
    pub fn new(policy: UpdatePolicy) -> Self {
        Self::with_order(LOADER_ORDER.iter().map(ToString::to_string), policy)
    }

    #[must_use]
    pub fn with_order(order: impl IntoIterator<Item = String>, policy: UpdatePolicy) -> Self {
        Self {
            order: order.into_iter().collect(),
            loaders: HashMap::new(),
            policy,
        }
    }

    /// Registry with every catalog loader registered.
    #[must_use]
    pub fn standard(policy: UpdatePolicy) -> Self {
        let mut registry = Self::new(policy);
        for spec in crate::catalog::LOADERS {
            registry.register(*spec);
        }
        registry
    }

    /// Bind a loader under its name, setting its update flag from the policy.
    /// A loader already registered under that name is replaced.
    pub fn register(&mut self, loader: impl EntityTypeLoader + 'static) {
        let updates_allowed = self.policy.allows(loader.target_type());
        let name = loader.name().to_string();
        if !self.order.contains(&name) {
            tracing::warn!(loader = %name, "registered loader is not in the ordering list and will not run");
        }
        tracing::debug!(loader = %name, updates_allowed, "registered loader");
        let previous = self.loaders.insert(
            name,
            RegisteredLoader {
                loader: Box::new(loader),
                updates_allowed,
            },
        );
        if let Some(previous) = previous {
            tracing::debug!(loader = previous.loader.name(), "replaced loader");
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredLoader> {
        self.loaders.get(name)
    }

    #[must_use]
    pub fn order(&self) -> &[String] {
        &self.order
    }

    #[must_use]
    pub const fn policy(&self) -> &UpdatePolicy {
        &self.policy
    }

    /// Registered loaders in ordering-list order.
    pub fn ordered(&self) -> impl Iterator<Item = &RegisteredLoader> {
        self.order.iter().filter_map(|name| self.loaders.get(name))
    }

    /// Run every registered loader (or `options.only`) against `store`.
    ///
    /// A failed loader is recorded in the report and the run moves on, unless
    /// `options.fail_fast` is set.
    ///
    /// # Errors
    ///
    /// `LoadError::UnknownLoader` if `options.only` names an unregistered loader.
    pub fn run(
        &self,
        store: &mut dyn Store,
        data_dir: &Path,
        options: &RunOptions,
    ) -> Result<RunReport, LoadError> {
        if let Some(only) = &options.only {
            if let Some(name) = only.iter().find(|n| !self.loaders.contains_key(n.as_str())) {
                return Err(LoadError::UnknownLoader { name: name.clone() });
            }
        }

        let started = Instant::now();
        let mut report = RunReport::default();
        let mut reconciler = Reconciler::new(store);

        for entry in self.ordered() {
            let name = entry.loader.name();
            if let Some(only) = &options.only {
                if !only.iter().any(|n| n == name) {
                    continue;
                }
            }

            tracing::debug!(loader = name, "running loader");
            match reconciler.run_loader(entry.loader.as_ref(), entry.updates_allowed, data_dir) {
                Ok(loader_report) => report.loaders.push(loader_report),
                Err(failure) => {
                    report.loaders.push(failure.report);
                    if options.fail_fast {
                        report.stopped_early = true;
                        break;
                    }
                }
            }
        }

        report.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            created = report.created(),
            updated = report.updated(),
            failed = report.failures().count(),
            "run complete"
        );
        Ok(report)
    }

    /// Associations whose target type is first produced by a loader later in
    /// the order. Targets no registered loader produces are assumed to exist.
    #[must_use]
    pub fn validate_order(&self) -> Vec<OrderViolation> {
        let loaders: Vec<&dyn EntityTypeLoader> =
            self.ordered().map(|entry| entry.loader.as_ref()).collect();
        let mut violations = Vec::new();

        for (position, loader) in loaders.iter().enumerate() {
            let declared = loader
                .required_associations()
                .iter()
                .map(|a| (a, true))
                .chain(loader.optional_associations().iter().map(|a| (a, false)));
            for (association, required) in declared {
                let producers: Vec<usize> = loaders
                    .iter()
                    .enumerate()
                    .filter(|(_, l)| l.target_type().eq_ignore_ascii_case(association.target))
                    .map(|(i, _)| i)
                    .collect();
                let satisfied = producers.is_empty() || producers.iter().any(|&i| i <= position);
                if !satisfied {
                    violations.push(OrderViolation {
                        loader: loader.name().to_string(),
                        field: association.field.to_string(),
                        target: association.target.to_string(),
                        producer: loaders[producers[0]].name().to_string(),
                        required,
                    });
                }
            }
        }
        violations
    }

    /// [`derive_order`] over the registered loaders.
    ///
    /// # Errors
    ///
    /// `LoadError::DependencyCycle` if no valid order exists.
    pub fn derived_order(&self) -> Result<Vec<String>, LoadError> {
        let loaders: Vec<&dyn EntityTypeLoader> =
            self.ordered().map(|entry| entry.loader.as_ref()).collect();
        derive_order(&loaders)
    }
}

/// Topologically sort `loaders` so every association target is created first.
///
/// The producer of a type is the first loader targeting it that creates
/// entities. A loader that only completes existing entities depends on that
/// producer too. Ties keep the input order.
///
/// # Errors
///
/// `LoadError::DependencyCycle` naming the loaders left unordered.
pub fn derive_order(loaders: &[&dyn EntityTypeLoader]) -> Result<Vec<String>, LoadError> {
    let mut producer: HashMap<String, usize> = HashMap::new();
    for (i, loader) in loaders.iter().enumerate() {
        if !loader.completes_existing() {
            producer
                .entry(loader.target_type().to_ascii_lowercase())
                .or_insert(i);
        }
    }

    let mut dependents: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); loaders.len()];
    let mut indegree = vec![0_usize; loaders.len()];
    for (i, loader) in loaders.iter().enumerate() {
        let mut targets: Vec<&str> = loader
            .required_associations()
            .iter()
            .chain(loader.optional_associations())
            .map(|a| a.target)
            .collect();
        if loader.completes_existing() {
            targets.push(loader.target_type());
        }

        let depends_on: BTreeSet<usize> = targets
            .iter()
            .filter_map(|t| producer.get(&t.to_ascii_lowercase()).copied())
            .filter(|&p| p != i)
            .collect();
        for p in depends_on {
            if dependents[p].insert(i) {
                indegree[i] += 1;
            }
        }
    }

    let mut ready: BTreeSet<usize> = (0..loaders.len()).filter(|&i| indegree[i] == 0).collect();
    let mut sorted = Vec::with_capacity(loaders.len());
    while let Some(next) = ready.pop_first() {
        sorted.push(loaders[next].name().to_string());
        for &dependent in &dependents[next] {
            indegree[dependent] -= 1;
            if indegree[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if sorted.len() < loaders.len() {
        let loaders = loaders
            .iter()
            .enumerate()
            .filter(|&(i, _)| indegree[i] > 0)
            .map(|(_, l)| l.name().to_string())
            .collect();
        return Err(LoadError::DependencyCycle { loaders });
    }
    Ok(sorted)
}
