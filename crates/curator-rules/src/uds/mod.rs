//! Rules derived from UDS (Uniform Data Set) forms.

pub mod cognitive;
pub mod demographics;
pub mod missingness;

use curator_core::error::DeriveError;
use curator_core::scope::Scope;

/// Inapplicability check shared by every UDS collection: the current file
/// must be a UDS form. Signalled as `MissingRequiredField` so the
/// orchestrator skips the collection instead of failing the record.
pub(crate) fn require_uds_module(scope: &Scope<'_>) -> Result<(), DeriveError> {
    let module: String = scope.require("module")?;
    if module.eq_ignore_ascii_case("UDS") {
        Ok(())
    } else {
        Err(DeriveError::missing_required([scope.path("module")]))
    }
}
