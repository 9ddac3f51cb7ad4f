use actix_web::HttpRequest;
use log::{debug, warn};
use ofg_common::Amount;
use open_fund_engine::fundable_objects::TargetUpdate;

use crate::{
    config::ServerConfig,
    data_objects::NewTargetRequest,
    errors::{AuthError, ServerError},
};

/// Header carrying the admin API key on privileged routes.
pub const API_KEY_HEADER: &str = "ofg-api-key";
/// Header carrying the contributor id, as established by the identity gateway upstream.
pub const USER_ID_HEADER: &str = "ofg-user-id";

pub const MAX_TARGET_NAME_LENGTH: usize = 100;

/// Checks the admin API key on the request against the configured one.
///
/// If no key has been configured, every admin request is refused; an empty key never grants
/// access.
pub fn require_admin(req: &HttpRequest, config: &ServerConfig) -> Result<(), ServerError> {
    let configured = config.admin_api_key.reveal();
    if configured.is_empty() {
        warn!("💻️ An admin route was called, but OFG_ADMIN_API_KEY is not configured. Refusing access.");
        return Err(AuthError::InvalidApiKey.into());
    }
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingApiKey)?;
    if provided != configured {
        debug!("💻️ An admin route was called with an incorrect API key.");
        return Err(AuthError::InvalidApiKey.into());
    }
    Ok(())
}

/// Extracts the calling contributor's id from the request headers.
pub fn require_contributor(req: &HttpRequest) -> Result<String, ServerError> {
    let contributor = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();
    if contributor.is_empty() {
        debug!("💻️ A contributor route was called without a contributor id.");
        return Err(AuthError::MissingContributorId.into());
    }
    Ok(contributor.to_string())
}

pub fn validate_new_target(request: &NewTargetRequest) -> Result<(), ServerError> {
    validate_target_name(&request.name)?;
    validate_description(&request.description)?;
    validate_amount(request.full_amount)
}

pub fn validate_target_update(update: &TargetUpdate) -> Result<(), ServerError> {
    if let Some(name) = update.name.as_deref() {
        validate_target_name(name)?;
    }
    if let Some(description) = update.description.as_deref() {
        validate_description(description)?;
    }
    if let Some(full_amount) = update.full_amount {
        validate_amount(full_amount)?;
    }
    Ok(())
}

pub fn validate_target_name(name: &str) -> Result<(), ServerError> {
    if name.trim().is_empty() {
        return Err(ServerError::InvalidRequestBody("A funding target needs a name".to_string()));
    }
    if name.chars().count() > MAX_TARGET_NAME_LENGTH {
        return Err(ServerError::InvalidRequestBody(format!(
            "A funding target name may be at most {MAX_TARGET_NAME_LENGTH} characters long"
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ServerError> {
    if description.trim().is_empty() {
        return Err(ServerError::InvalidRequestBody("A funding target needs a description".to_string()));
    }
    Ok(())
}

/// Amounts are whole currency units and must be strictly positive. The engine never sees a record
/// that fails this check.
pub fn validate_amount(amount: Amount) -> Result<(), ServerError> {
    if !amount.is_positive() {
        return Err(ServerError::InvalidRequestBody(format!("{amount} is not a valid amount")));
    }
    Ok(())
}
