//! Mapping of form validation failures onto `invalid_request` errors.
//!
//! Details always carry `field` and `code` so clients can highlight the
//! offending input.

use serde_json::json;

use crate::domain::{AuthValidationError, BandValidationError, Error};

fn field_error(field: &str, code: &str, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn map_band_validation_error(err: BandValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

pub(crate) fn map_auth_validation_error(err: AuthValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

/// A band name taken from the URL path.
pub(crate) fn parse_band_name(raw: &str) -> Result<crate::domain::BandName, Error> {
    crate::domain::BandName::new(raw).map_err(map_band_validation_error)
}
