//! Host-facing paging over relationship query results

use assetio_manager_api::{ApiResult, EntityReference, EntityReferencePagerInterface, HostSession};
use std::fmt;
use std::sync::Arc;

/// Pages through the entities related to one batch element of a
/// relationship query.
///
/// Created by the facade from the manager's pager; the manager's pager is
/// closed when this is dropped.
pub struct EntityReferencePager {
    pager_interface: Box<dyn EntityReferencePagerInterface>,
    host_session: Arc<HostSession>,
}

impl EntityReferencePager {
    pub(crate) fn new(
        pager_interface: Box<dyn EntityReferencePagerInterface>,
        host_session: Arc<HostSession>,
    ) -> Self {
        Self {
            pager_interface,
            host_session,
        }
    }

    /// Whether a page follows the current one
    pub fn has_next(&mut self) -> ApiResult<bool> {
        self.pager_interface.has_next(&self.host_session)
    }

    /// References on the current page
    pub fn get(&mut self) -> ApiResult<Vec<EntityReference>> {
        self.pager_interface.get(&self.host_session)
    }

    /// Advance to the following page
    pub fn next(&mut self) -> ApiResult<()> {
        self.pager_interface.next(&self.host_session)
    }

    /// Iterate over every remaining page, starting with the current one.
    pub fn pages(self) -> Pages {
        Pages {
            pager: self,
            started: false,
            done: false,
        }
    }
}

impl Drop for EntityReferencePager {
    fn drop(&mut self) {
        self.pager_interface.close(&self.host_session);
    }
}

impl fmt::Debug for EntityReferencePager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityReferencePager").finish_non_exhaustive()
    }
}

/// Iterator over the pages of an [`EntityReferencePager`].
///
/// Stops after the last page, at the first empty page, or after yielding
/// an error.
#[derive(Debug)]
pub struct Pages {
    pager: EntityReferencePager,
    started: bool,
    done: bool,
}

impl Pages {
    fn advance(&mut self) -> ApiResult<Option<Vec<EntityReference>>> {
        if self.started {
            if !self.pager.has_next()? {
                return Ok(None);
            }
            self.pager.next()?;
        }
        self.started = true;

        let page = self.pager.get()?;
        Ok((!page.is_empty()).then_some(page))
    }
}

impl Iterator for Pages {
    type Item = ApiResult<Vec<EntityReference>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(page)) => Some(Ok(page)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
