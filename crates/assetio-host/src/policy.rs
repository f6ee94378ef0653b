//! Batch element error policies
//!
//! The derived call shapes on [`Manager`](crate::Manager) all run the same
//! batch primitive with a pair of aggregation callbacks. The chosen policy
//! decides how element errors are surfaced:
//!
//! - [`error_policy::Exception`]: the first error reported (in callback
//!   invocation order) stops the batch and becomes an
//!   [`AssetIoError::BatchElement`].
//! - [`error_policy::Variant`]: every element is processed and becomes a
//!   [`BatchElementResult`], successful or not.

use assetio_manager_api::{
    batch_element_exception_message, Access, ApiResult, AssetIoError, BatchElementError,
    BatchElementResult, EntityReference,
};
use parking_lot::Mutex;
use std::ops::ControlFlow;

/// Policy tags selecting how per-element errors are reported.
pub mod error_policy {
    /// Return the first element error as `Err(AssetIoError::BatchElement)`
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Exception;

    /// Return a `Result` per element
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Variant;
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::error_policy::Exception {}
    impl Sealed for super::error_policy::Variant {}
}

/// Converts the outcomes of a batch call into the return value of a
/// derived call shape.
pub trait BatchElementErrorPolicy: sealed::Sealed + Copy {
    /// What one element of the result looks like under this policy
    type Element<T>;

    /// Whether the first element error should stop the manager
    const STOP_ON_ERROR: bool;

    /// Materialise the per-element results. `subjects` are the entity
    /// references of the batch, used to render error messages.
    fn finish<T>(
        outcomes: BatchOutcomes<T>,
        subjects: &[EntityReference],
        access: Option<Access>,
    ) -> ApiResult<Vec<Self::Element<T>>>;
}

impl BatchElementErrorPolicy for error_policy::Exception {
    type Element<T> = T;

    const STOP_ON_ERROR: bool = true;

    fn finish<T>(
        mut outcomes: BatchOutcomes<T>,
        subjects: &[EntityReference],
        access: Option<Access>,
    ) -> ApiResult<Vec<T>> {
        if let Some((index, error)) = outcomes.take_first_error() {
            return Err(element_exception(index, error, subjects, access));
        }

        outcomes
            .into_results()?
            .into_iter()
            .enumerate()
            .map(|(index, result)| {
                result.map_err(|error| element_exception(index, error, subjects, access))
            })
            .collect()
    }
}

impl BatchElementErrorPolicy for error_policy::Variant {
    type Element<T> = BatchElementResult<T>;

    const STOP_ON_ERROR: bool = false;

    fn finish<T>(
        outcomes: BatchOutcomes<T>,
        _subjects: &[EntityReference],
        _access: Option<Access>,
    ) -> ApiResult<Vec<BatchElementResult<T>>> {
        outcomes.into_results()
    }
}

fn element_exception(
    index: usize,
    error: BatchElementError,
    subjects: &[EntityReference],
    access: Option<Access>,
) -> AssetIoError {
    let message = batch_element_exception_message(&error, index, subjects.get(index), access);
    AssetIoError::BatchElement {
        index,
        error,
        message,
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// Per-index outcomes recorded during one batch call.
#[derive(Debug)]
pub struct BatchOutcomes<T> {
    slots: Vec<Option<BatchElementResult<T>>>,
    first_error: Option<usize>,
}

impl<T> BatchOutcomes<T> {
    fn take_first_error(&mut self) -> Option<(usize, BatchElementError)> {
        let index = self.first_error.take()?;
        match self.slots.get_mut(index)?.take()? {
            Err(error) => Some((index, error)),
            Ok(_) => None,
        }
    }

    /// Results in input order. Fails if the manager never reported some
    /// index.
    fn into_results(self) -> ApiResult<Vec<BatchElementResult<T>>> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    AssetIoError::unhandled(format!(
                        "Manager did not report a result for batch element {}",
                        index
                    ))
                })
            })
            .collect()
    }
}

struct CollectorState<T> {
    outcomes: BatchOutcomes<T>,
    violation: Option<String>,
}

/// Records the callbacks of one batch call.
///
/// Safe to drive from several threads at once; the manager may report
/// indices in any order.
pub(crate) struct BatchCollector<T> {
    state: Mutex<CollectorState<T>>,
    stop_on_error: bool,
}

impl<T> BatchCollector<T> {
    pub(crate) fn with_len(len: usize, stop_on_error: bool) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Self {
            state: Mutex::new(CollectorState {
                outcomes: BatchOutcomes {
                    slots,
                    first_error: None,
                },
                violation: None,
            }),
            stop_on_error,
        }
    }

    pub(crate) fn on_success(&self, index: usize, value: T) {
        self.record(index, Ok(value));
    }

    /// Record an element error, asking the manager to stop when the
    /// collector was built to stop on the first error.
    pub(crate) fn on_error(&self, index: usize, error: BatchElementError) -> ControlFlow<()> {
        self.record(index, Err(error));
        if self.stop_on_error {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn record(&self, index: usize, outcome: BatchElementResult<T>) {
        let mut state = self.state.lock();
        let len = state.outcomes.slots.len();
        let is_error = outcome.is_err();

        let violation = if index >= len {
            Some(format!(
                "Manager reported batch element {} of a batch of {}",
                index, len
            ))
        } else if state.outcomes.slots[index].is_some() {
            Some(format!(
                "Manager reported more than one result for batch element {}",
                index
            ))
        } else {
            state.outcomes.slots[index] = Some(outcome);
            None
        };

        match violation {
            Some(message) => {
                tracing::warn!(index, len, "{}", message);
                state.violation.get_or_insert(message);
            }
            None if is_error && state.outcomes.first_error.is_none() => {
                state.outcomes.first_error = Some(index);
            }
            None => {}
        }
    }

    /// Consume the collector once the batch call has returned.
    pub(crate) fn finish(self) -> ApiResult<BatchOutcomes<T>> {
        let state = self.state.into_inner();
        match state.violation {
            Some(message) => Err(AssetIoError::unhandled(message)),
            None => Ok(state.outcomes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::error_policy::{Exception, Variant};
    use super::*;
    use assetio_manager_api::ErrorCode;

    fn refs(names: &[&str]) -> Vec<EntityReference> {
        names.iter().map(|n| EntityReference::new_unchecked(*n)).collect()
    }

    fn not_found() -> BatchElementError {
        BatchElementError::new(ErrorCode::InvalidEntityReference, "not found")
    }

    #[test]
    fn out_of_order_reports_land_in_input_order() {
        let collector = BatchCollector::with_len(3, true);
        collector.on_success(2, "c");
        collector.on_success(0, "a");
        collector.on_success(1, "b");

        let values = Exception::finish(collector.finish().unwrap(), &refs(&["x", "y", "z"]), None)
            .unwrap();

        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn exception_surfaces_first_reported_error() {
        let collector = BatchCollector::<u8>::with_len(3, true);
        let _ = collector.on_error(2, BatchElementError::new(ErrorCode::AuthError, "second"));
        let _ = collector.on_error(1, not_found());
        collector.on_success(0, 1);

        let err = Exception::finish(
            collector.finish().unwrap(),
            &refs(&["r0", "r1", "r2"]),
            Some(Access::Read),
        )
        .unwrap_err();

        match err {
            AssetIoError::BatchElement {
                index,
                error,
                message,
            } => {
                assert_eq!(index, 2);
                assert_eq!(error.code, ErrorCode::AuthError);
                assert_eq!(message, "authError: second [index=2] [access=read] [entity=r2]");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn stopping_collector_breaks_on_error_and_skips_unreported_elements() {
        let collector = BatchCollector::<u8>::with_len(3, true);
        collector.on_success(0, 1);

        assert_eq!(collector.on_error(1, not_found()), ControlFlow::Break(()));

        // Element 2 was never reported; the recorded error still wins.
        let err = Exception::finish(collector.finish().unwrap(), &refs(&["a", "b", "c"]), None)
            .unwrap_err();
        assert!(matches!(err, AssetIoError::BatchElement { index: 1, .. }));
    }

    #[test]
    fn variant_keeps_every_outcome() {
        let collector = BatchCollector::with_len(2, false);
        assert_eq!(collector.on_error(1, not_found()), ControlFlow::Continue(()));
        collector.on_success(0, 7);

        let results = Variant::finish(collector.finish().unwrap(), &[], None).unwrap();

        assert_eq!(results, vec![Ok(7), Err(not_found())]);
    }

    #[test]
    fn duplicate_report_is_a_contract_violation() {
        let collector = BatchCollector::with_len(1, false);
        collector.on_success(0, ());
        let _ = collector.on_error(0, not_found());

        let err = collector.finish().unwrap_err();
        assert!(matches!(err, AssetIoError::Unhandled { .. }));
    }

    #[test]
    fn out_of_range_report_is_a_contract_violation() {
        let collector = BatchCollector::with_len(1, false);
        collector.on_success(5, ());

        assert!(collector.finish().is_err());
    }

    #[test]
    fn missing_report_fails_when_materialised() {
        let collector = BatchCollector::<()>::with_len(2, false);
        collector.on_success(0, ());

        let err = Variant::finish(collector.finish().unwrap(), &[], None).unwrap_err();
        assert_eq!(
            err,
            AssetIoError::unhandled("Manager did not report a result for batch element 1")
        );
    }
}
