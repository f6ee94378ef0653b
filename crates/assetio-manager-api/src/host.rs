//! The host application, as seen by a manager

use crate::{InfoDictionary, LoggerInterface};
use std::fmt;
use std::sync::Arc;

/// Implemented by the host application to describe itself to managers.
pub trait HostInterface: Send + Sync {
    /// Unique, reverse-DNS style identifier of the host
    fn identifier(&self) -> String;

    /// Human readable name of the host
    fn display_name(&self) -> String;

    /// Arbitrary details about the host
    fn info(&self) -> InfoDictionary {
        InfoDictionary::new()
    }
}

/// Manager-facing wrapper around a [`HostInterface`].
#[derive(Clone)]
pub struct Host {
    host_interface: Arc<dyn HostInterface>,
}

impl Host {
    pub fn new(host_interface: Arc<dyn HostInterface>) -> Self {
        Self { host_interface }
    }

    pub fn identifier(&self) -> String {
        self.host_interface.identifier()
    }

    pub fn display_name(&self) -> String {
        self.host_interface.display_name()
    }

    pub fn info(&self) -> InfoDictionary {
        self.host_interface.info()
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("identifier", &self.host_interface.identifier())
            .finish()
    }
}

/// Host-scoped facilities handed to every manager call.
///
/// Shared by the facade, the session and every pager it creates; it must
/// outlive all of them, which `Arc` ownership guarantees.
pub struct HostSession {
    host: Host,
    logger: Arc<dyn LoggerInterface>,
}

impl HostSession {
    pub fn new(host: Host, logger: Arc<dyn LoggerInterface>) -> Self {
        Self { host, logger }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn logger(&self) -> &Arc<dyn LoggerInterface> {
        &self.logger
    }
}

impl fmt::Debug for HostSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostSession")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}
