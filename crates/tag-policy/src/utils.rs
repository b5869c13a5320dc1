use std::fmt;
use tracing::{field, Span};

pub(crate) trait Record: Sized {
  fn record_field(self, field: &'static str) -> Self;
}

impl<T: fmt::Debug> Record for T {
  /// Records `self` on the current span under `field`, which must have been
  /// declared as `field::Empty` when the span was created.
  #[inline]
  fn record_field(self, field: &'static str) -> Self {
    Span::current().record(field, &field::debug(&self));
    self
  }
}
