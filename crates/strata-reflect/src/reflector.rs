//! The reflector: entry point for handles and proxies
//!
//! A reflector ties one runtime to a running platform version, a rename
//! table, a constraint chain and the caches (handle arena, proxy
//! descriptors). It is cheap to clone; clones share everything.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use strata_runtime::{ClassId, Runtime};

use crate::alias::{RenameTable, SymbolCategory};
use crate::config::{ConfigError, ReflectConfig};
use crate::constraint::{ConstraintEngine, Declaration};
use crate::error::{ReflectError, ReflectResult};
use crate::handle::{from_class_declaration, ClassHandle, HandleArena};
use crate::proxy::{
    Capability, CapabilityInterface, ProxyDescriptor, ProxyFactory, ReflectiveProxy,
};
use crate::signature::ImportTable;
use crate::version::{PlatformVersion, VersionError, VersionInformation};

struct ReflectorInner {
    runtime: Arc<Runtime>,
    version: PlatformVersion,
    renames: RenameTable,
    constraints: ConstraintEngine,
    imports: ImportTable,
    arena: HandleArena,
    proxies: DashMap<CapabilityInterface, Arc<ProxyDescriptor>>,
}

/// Shared entry point for reflective access
#[derive(Clone)]
pub struct Reflector {
    inner: Arc<ReflectorInner>,
}

impl Reflector {
    /// Reflector with default constraints and imports
    pub fn new(runtime: Arc<Runtime>, version: PlatformVersion) -> Self {
        Self::from_parts(
            runtime,
            version,
            RenameTable::new(),
            ConstraintEngine::with_defaults(),
            ImportTable::with_defaults(),
        )
    }

    /// Builder
    pub fn builder(runtime: Arc<Runtime>) -> ReflectorBuilder {
        ReflectorBuilder {
            runtime,
            version: None,
            renames: RenameTable::new(),
            constraints: ConstraintEngine::with_defaults(),
            imports: ImportTable::with_defaults(),
        }
    }

    /// Reflector configured from a [`ReflectConfig`]
    ///
    /// Without a configured version, the process-wide version is used.
    pub fn from_config(runtime: Arc<Runtime>, config: &ReflectConfig) -> Result<Self, ConfigError> {
        let version = config
            .platform
            .version
            .or_else(VersionInformation::current)
            .ok_or(ConfigError::MissingVersion)?;
        Ok(Self::from_parts(
            runtime,
            version,
            config.rename_table()?,
            config.constraint_engine(),
            ImportTable::with_defaults(),
        ))
    }

    fn from_parts(
        runtime: Arc<Runtime>,
        version: PlatformVersion,
        renames: RenameTable,
        constraints: ConstraintEngine,
        imports: ImportTable,
    ) -> Self {
        tracing::debug!(
            %version,
            renames = renames.len(),
            constraints = constraints.len(),
            "reflector created"
        );
        Self {
            inner: Arc::new(ReflectorInner {
                runtime,
                version,
                renames,
                constraints,
                imports,
                arena: HandleArena::new(),
                proxies: DashMap::new(),
            }),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Runtime handles resolve against
    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.inner.runtime
    }

    /// Running platform version
    pub fn version(&self) -> PlatformVersion {
        self.inner.version
    }

    /// Whether the running version is at least `1.{minor}`
    pub fn supports(&self, minor: u32) -> bool {
        self.inner.version.supports(minor)
    }

    /// Whether the running version is at least `1.{minor}.{patch}`
    pub fn supports_patch(&self, minor: u32, patch: u32) -> bool {
        self.inner.version.supports_patch(minor, patch)
    }

    /// Rename table
    pub fn renames(&self) -> &RenameTable {
        &self.inner.renames
    }

    /// Constraint chain
    pub fn constraints(&self) -> &ConstraintEngine {
        &self.inner.constraints
    }

    /// Default imports for declarations
    pub fn imports(&self) -> &ImportTable {
        &self.inner.imports
    }

    pub(crate) fn arena(&self) -> &HandleArena {
        &self.inner.arena
    }

    pub(crate) fn proxies(&self) -> &DashMap<CapabilityInterface, Arc<ProxyDescriptor>> {
        &self.inner.proxies
    }

    /// Name `name` carries in the running version
    pub fn effective_name(&self, category: SymbolCategory, name: &str) -> String {
        self.inner.renames.resolve(category, name, self.inner.version)
    }

    // ========================================================================
    // Handles
    // ========================================================================

    /// Class handle by binary name
    pub fn class(&self, name: impl Into<String>) -> ClassHandle {
        ClassHandle::top_level(self, vec![name.into()], Declaration::default(), self.imports())
    }

    /// Class handle trying several binary names in order
    pub fn class_any<I, S>(&self, names: I) -> ClassHandle
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect();
        ClassHandle::top_level(self, names, Declaration::default(), self.imports())
    }

    /// Class handle for an already known class
    pub fn of(&self, id: ClassId) -> ReflectResult<ClassHandle> {
        let def = self
            .inner
            .runtime
            .class(id)
            .ok_or_else(|| ReflectError::ClassNotFound {
                names: vec![id.to_string()],
            })?;
        Ok(self.class(def.name.to_string()))
    }

    /// Class handle from a declaration such as `package a.b; public final class C {}`
    pub fn class_declaration(&self, declaration: &str) -> ReflectResult<ClassHandle> {
        from_class_declaration(self, declaration, self.imports())
    }

    /// Namespace with its own imports
    pub fn namespaced(&self) -> Namespace {
        Namespace {
            reflector: self.clone(),
            imports: self.imports().clone(),
        }
    }

    // ========================================================================
    // Proxies
    // ========================================================================

    /// Proxy factory sharing this reflector's descriptor cache
    pub fn proxy_factory(&self) -> ProxyFactory {
        ProxyFactory::new(self.clone())
    }

    /// Unbound typed proxy for `C`
    pub fn proxify<C: Capability>(&self) -> ReflectResult<ReflectiveProxy<C>> {
        ReflectiveProxy::new(&self.proxy_factory())
    }

    // ========================================================================
    // Caches
    // ========================================================================

    /// Number of live handle nodes
    pub fn handle_count(&self) -> usize {
        self.inner.arena.len()
    }

    /// Number of cached proxy descriptors
    pub fn cached_proxies(&self) -> usize {
        self.inner.proxies.len()
    }

    /// Drop every cached node and descriptor. Existing handles stay usable.
    pub fn clear_caches(&self) {
        tracing::debug!(
            handles = self.handle_count(),
            proxies = self.cached_proxies(),
            "clearing reflector caches"
        );
        self.inner.arena.clear();
        self.inner.proxies.clear();
    }
}

impl std::fmt::Debug for Reflector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reflector")
            .field("version", &self.inner.version)
            .field("renames", &self.inner.renames.len())
            .field("constraints", &self.inner.constraints)
            .field("handles", &self.inner.arena.len())
            .field("proxies", &self.inner.proxies.len())
            .finish()
    }
}

/// Builder for [`Reflector`]
#[derive(Debug)]
pub struct ReflectorBuilder {
    runtime: Arc<Runtime>,
    version: Option<PlatformVersion>,
    renames: RenameTable,
    constraints: ConstraintEngine,
    imports: ImportTable,
}

impl ReflectorBuilder {
    /// Running version; defaults to the process-wide version
    pub fn version(mut self, version: PlatformVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Rename table
    pub fn renames(mut self, renames: RenameTable) -> Self {
        self.renames = renames;
        self
    }

    /// Constraint chain
    pub fn constraints(mut self, constraints: ConstraintEngine) -> Self {
        self.constraints = constraints;
        self
    }

    /// Default imports
    pub fn imports(mut self, imports: ImportTable) -> Self {
        self.imports = imports;
        self
    }

    /// Create the reflector
    pub fn build(self) -> ReflectResult<Reflector> {
        let version = match self.version {
            Some(version) => version,
            None => VersionInformation::get()?,
        };
        Ok(Reflector::from_parts(
            self.runtime,
            version,
            self.renames,
            self.constraints,
            self.imports,
        ))
    }
}

/// Reflector view with extra imports for member declarations
#[derive(Debug, Clone)]
pub struct Namespace {
    reflector: Reflector,
    imports: ImportTable,
}

impl Namespace {
    /// Import a binary name under its simple name
    pub fn imports(mut self, binary_name: impl Into<String>) -> Self {
        self.imports.import(binary_name);
        self
    }

    /// Import a binary name under an alias
    pub fn import_as(mut self, alias: impl Into<String>, binary_name: impl Into<String>) -> Self {
        self.imports.import_as(alias, binary_name);
        self
    }

    /// Current imports
    pub fn import_table(&self) -> &ImportTable {
        &self.imports
    }

    /// Class handle by binary name
    pub fn class(&self, name: impl Into<String>) -> ClassHandle {
        ClassHandle::top_level(
            &self.reflector,
            vec![name.into()],
            Declaration::default(),
            &self.imports,
        )
    }

    /// Class handle for an already known class
    pub fn of(&self, id: ClassId) -> ReflectResult<ClassHandle> {
        let name = self.reflector.of(id)?.expected_name().to_string();
        Ok(self.class(name))
    }

    /// Class handle from a class declaration, resolved with these imports
    pub fn class_declaration(&self, declaration: &str) -> ReflectResult<ClassHandle> {
        from_class_declaration(&self.reflector, declaration, &self.imports)
    }
}

// ============================================================================
// Process-wide reflector
// ============================================================================

static GLOBAL: OnceCell<Reflector> = OnceCell::new();

/// Install the process-wide reflector and record its version
pub fn install(reflector: Reflector) -> ReflectResult<&'static Reflector> {
    if let Some(existing) = GLOBAL.get() {
        return Err(ReflectError::Version(VersionError::AlreadyInitialized {
            current: existing.version(),
        }));
    }
    VersionInformation::init(reflector.version())?;
    let version = reflector.version();
    let installed = GLOBAL.get_or_init(|| reflector);
    if installed.version() != version {
        return Err(ReflectError::Version(VersionError::AlreadyInitialized {
            current: installed.version(),
        }));
    }
    Ok(installed)
}

/// Process-wide reflector, if installed
pub fn global() -> Option<&'static Reflector> {
    GLOBAL.get()
}
