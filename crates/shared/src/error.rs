use std::{
  backtrace::BacktraceStatus,
  fmt::{Debug, Display},
};

/// Error type returned across crate boundaries and from `main`.
///
/// Anything convertible into [`anyhow::Error`] converts into this, so `?`
/// works on library errors (sea-orm, async-openai, io, serde_json, ...).
pub struct AppError {
  err: anyhow::Error,
}

impl AppError {
  pub fn new<E: Into<anyhow::Error>>(err: E) -> Self {
    Self { err: err.into() }
  }

  /// Attempt to downcast the inner error to a concrete type.
  pub fn downcast_ref<E>(&self) -> Option<&E>
  where
    E: Display + Debug + Send + Sync + 'static,
  {
    self.err.downcast_ref::<E>()
  }
}

// `main` returns `Result<(), AppError>`, so this is what the user sees on failure.
impl Debug for AppError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:#}", self.err)?;
    if cfg!(debug_assertions) {
      let bt = self.err.backtrace();
      if bt.status() == BacktraceStatus::Captured {
        write!(f, "\nBacktrace:\n{bt}")?;
      } else {
        write!(f, "\n(hint: set RUST_BACKTRACE=1 to enable backtrace)")?;
      }
    }
    Ok(())
  }
}

impl Display for AppError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:#}", self.err)
  }
}

impl<E> From<E> for AppError
where
  E: Into<anyhow::Error>,
{
  fn from(err: E) -> Self {
    Self::new(err)
  }
}
