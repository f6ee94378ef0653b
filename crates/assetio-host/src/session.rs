//! Manager selection and lifetime for a host

use crate::manager::Manager;
use assetio_config::AppConfig;
use assetio_manager_api::constants::SETTING_MANAGER_IDENTIFIER;
use assetio_manager_api::{
    ApiResult, AssetIoError, Host, HostInterface, HostSession, InfoDictionary, LoggerInterface,
    ManagerInterfaceFactory, PropertyValue,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// The selected manager and the settings it will be initialized with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSettings {
    pub manager_identifier: Option<String>,
    pub manager_settings: InfoDictionary,
}

impl SessionSettings {
    pub fn new(manager_identifier: impl Into<String>, manager_settings: InfoDictionary) -> Self {
        Self {
            manager_identifier: Some(manager_identifier.into()),
            manager_settings,
        }
    }

    /// Flatten into a single dictionary, with the manager identifier stored
    /// under [`SETTING_MANAGER_IDENTIFIER`].
    pub fn to_dictionary(&self) -> InfoDictionary {
        let mut dictionary = self.manager_settings.clone();
        if let Some(identifier) = &self.manager_identifier {
            dictionary.insert(
                SETTING_MANAGER_IDENTIFIER.to_string(),
                PropertyValue::from(identifier.as_str()),
            );
        }
        dictionary
    }

    /// Split a flattened dictionary back into identifier and manager
    /// settings.
    pub fn from_dictionary(mut dictionary: InfoDictionary) -> ApiResult<Self> {
        let manager_identifier = match dictionary.remove(SETTING_MANAGER_IDENTIFIER) {
            None => None,
            Some(PropertyValue::Str(identifier)) => Some(identifier),
            Some(other) => {
                return Err(AssetIoError::input_validation(format!(
                    "Setting '{}' must be a string, got {}",
                    SETTING_MANAGER_IDENTIFIER,
                    other.type_name()
                )))
            }
        };
        Ok(Self {
            manager_identifier,
            manager_settings: dictionary,
        })
    }
}

/// Owns the host session and the manager a host is working with.
///
/// Selecting a manager is cheap; the manager is only instantiated and
/// initialized when first requested through
/// [`current_manager`](Self::current_manager).
pub struct Session {
    host_session: Arc<HostSession>,
    factory: Arc<dyn ManagerInterfaceFactory>,
    selection: SessionSettings,
    current_manager: Option<Arc<Manager>>,
}

impl Session {
    pub fn new(
        host_interface: Arc<dyn HostInterface>,
        logger: Arc<dyn LoggerInterface>,
        factory: Arc<dyn ManagerInterfaceFactory>,
    ) -> Self {
        Self {
            host_session: Arc::new(HostSession::new(Host::new(host_interface), logger)),
            factory,
            selection: SessionSettings::default(),
            current_manager: None,
        }
    }

    pub fn host_session(&self) -> &Arc<HostSession> {
        &self.host_session
    }

    /// Identifiers of every manager the factory can provide
    pub fn registered_managers(&self) -> Vec<String> {
        self.factory.identifiers()
    }

    /// Select a manager. It is not instantiated until
    /// [`current_manager`](Self::current_manager) is called.
    pub fn use_manager(&mut self, identifier: &str, settings: InfoDictionary) -> ApiResult<()> {
        if !self.factory.is_registered(identifier) {
            return Err(AssetIoError::configuration(format!(
                "Unknown manager '{}'",
                identifier
            )));
        }

        debug!(manager = %identifier, "Selected manager");
        self.selection = SessionSettings::new(identifier, settings);
        self.current_manager = None;
        Ok(())
    }

    /// Select the manager named in the application config, if any.
    ///
    /// Returns whether a manager was selected.
    pub fn use_configured_manager(&mut self, config: &AppConfig) -> ApiResult<bool> {
        match &config.manager {
            Some(manager_config) => {
                self.use_manager(&manager_config.identifier, manager_config.settings.clone())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The selected manager, instantiating and initializing it on first
    /// use. `None` when no manager has been selected.
    pub fn current_manager(&mut self) -> ApiResult<Option<Arc<Manager>>> {
        if let Some(manager) = &self.current_manager {
            return Ok(Some(Arc::clone(manager)));
        }

        let Some(identifier) = self.selection.manager_identifier.as_deref() else {
            return Ok(None);
        };

        let manager_interface = self.factory.instantiate(identifier)?;
        let mut manager = Manager::new(manager_interface, Arc::clone(&self.host_session));
        manager.initialize(self.selection.manager_settings.clone())?;
        info!(manager = %identifier, "Manager ready");

        let manager = Arc::new(manager);
        self.current_manager = Some(Arc::clone(&manager));
        Ok(Some(manager))
    }

    /// Settings that recreate this session's manager selection. Includes
    /// the manager's own current settings, so the manager is initialized
    /// if it has not been already.
    pub fn settings(&mut self) -> ApiResult<SessionSettings> {
        let Some(manager) = self.current_manager()? else {
            return Ok(SessionSettings::default());
        };
        Ok(SessionSettings {
            manager_identifier: self.selection.manager_identifier.clone(),
            manager_settings: manager.settings()?,
        })
    }

    /// Apply settings previously obtained from [`settings`](Self::settings).
    /// Settings without a manager identifier clear the selection.
    pub fn set_settings(&mut self, settings: SessionSettings) -> ApiResult<()> {
        match settings.manager_identifier {
            Some(identifier) => self.use_manager(&identifier, settings.manager_settings),
            None => {
                self.selection = SessionSettings::default();
                self.current_manager = None;
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("host_session", &self.host_session)
            .field("selection", &self.selection)
            .field("initialized", &self.current_manager.is_some())
            .finish()
    }
}
