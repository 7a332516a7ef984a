use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RatingError {
    #[error("Invalid standing row for {user_id}: {reason}")]
    Validation { user_id: String, reason: String },

    #[error("Computed {quantity} for {user_id} is not finite ({value})")]
    NonFinite {
        user_id: String,
        quantity: &'static str,
        value: f64
    }
}

impl RatingError {
    pub fn validation(user_id: &str, reason: impl Into<String>) -> Self {
        RatingError::Validation {
            user_id: user_id.to_string(),
            reason: reason.into()
        }
    }
}

/// Fails with [`RatingError::NonFinite`] instead of letting NaN or infinity
/// reach a stored rating.
pub fn ensure_finite(user_id: &str, quantity: &'static str, value: f64) -> Result<f64, RatingError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RatingError::NonFinite {
            user_id: user_id.to_string(),
            quantity,
            value
        })
    }
}
