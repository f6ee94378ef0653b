//! Host API for assetio
//!
//! The [`Manager`] facade wraps a [`ManagerInterface`] implementation and
//! offers hosts every calling convention they need on top of the
//! manager's batch, callback-based primitives:
//!
//! - batch with callbacks (`resolve`, `preflight`, ...)
//! - singular or plural, with errors either returned as
//!   [`AssetIoError::BatchElement`] ([`error_policy::Exception`]) or
//!   captured per element ([`error_policy::Variant`])
//!
//! [`Session`] manages selection and lazy initialization of the manager a
//! host works with.
//!
//! [`ManagerInterface`]: assetio_manager_api::ManagerInterface
//! [`AssetIoError::BatchElement`]: assetio_manager_api::AssetIoError::BatchElement

pub mod call_shapes;
pub mod capability_gate;
pub mod factory;
pub mod manager;
pub mod pager;
pub mod policy;
pub mod session;

pub use assetio_manager_api::ManagerInterfaceFactory;
pub use capability_gate::{verify_required_capabilities, REQUIRED_CAPABILITIES};
pub use factory::ManagerRegistry;
pub use manager::Manager;
pub use pager::{EntityReferencePager, Pages};
pub use policy::{error_policy, BatchElementErrorPolicy, BatchOutcomes};
pub use session::{Session, SessionSettings};

/// Host API version for compatibility checking
pub const HOST_API_VERSION: &str = env!("CARGO_PKG_VERSION");
