//! Manager-side paging over relationship query results

use crate::{ApiResult, EntityReference, HostSession};

/// Implemented by managers to page through the results of a relationship
/// query.
///
/// Managers hand a boxed pager to the success callback of
/// `get_with_relationship(s)`. The host wraps it before exposing it, so
/// managers never construct host types.
pub trait EntityReferencePagerInterface: Send {
    /// Whether a page follows the current one
    fn has_next(&mut self, host_session: &HostSession) -> ApiResult<bool>;

    /// References on the current page. Empty once paging is exhausted.
    fn get(&mut self, host_session: &HostSession) -> ApiResult<Vec<EntityReference>>;

    /// Advance to the following page
    fn next(&mut self, host_session: &HostSession) -> ApiResult<()>;

    /// Release any resources held by the query. Called once, when the
    /// host drops its pager.
    fn close(&mut self, _host_session: &HostSession) {}
}
