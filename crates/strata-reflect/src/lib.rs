//! Strata Reflect - cross-version reflective access
//!
//! This crate layers version-aware handles over a [`strata_runtime::Runtime`]:
//! - **Signatures**: declaration strings parsed into structured signatures (`signature` module)
//! - **Renames**: per-version name lineages for classes and members (`alias` module)
//! - **Constraints**: acceptance rules run on resolved candidates (`constraint` module)
//! - **Handles**: lazily resolved, memoised class and member handles (`handle` module)
//! - **Proxies**: capability interfaces dispatched onto runtime classes (`proxy` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_reflect::{PlatformVersion, Reflector};
//!
//! let reflector = Reflector::new(runtime, PlatformVersion::minor(20));
//! let class = reflector.class("com.example.Player");
//! let name = class.field("private final String name;")?;
//! let value = name.get(&player)?;
//! ```

#![warn(missing_docs)]

pub mod alias;
pub mod config;
pub mod constraint;
pub mod error;
pub mod handle;
pub mod proxy;
pub mod reflector;
pub mod signature;
pub mod version;

pub use alias::{RenameError, RenameRecord, RenameTable, SymbolCategory};
pub use config::{ConfigError, ReflectConfig};
pub use constraint::{
    Candidate, ConstraintContext, ConstraintEngine, ConstraintResult, Declaration,
    ReflectiveConstraint, Verdict,
};
pub use error::{ReflectError, ReflectResult};
pub use handle::{
    AnyOf, ClassHandle, ConstructorHandle, FieldHandle, HandleId, HandleState, MethodHandle,
};
pub use proxy::{
    BoundProxy, Capability, CapabilityInterface, CapabilityMethod, MemberMarker, ProxyDescriptor,
    ProxyFactory, ReflectiveProxy,
};
pub use reflector::{global, install, Namespace, Reflector, ReflectorBuilder};
pub use signature::{ImportTable, Signature, SignatureKind, SignatureParser};
pub use version::{PlatformVersion, VersionError, VersionInformation};
