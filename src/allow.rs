use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllowError {
    #[error("no allowed values specified")]
    NoAllowedValues,

    #[error("invalid value, must be one of: {allowed}")]
    InvalidValue { allowed: String },

    #[error("invalid value")]
    Rejected,
}

/// What a candidate is checked against: a literal set or a predicate.
pub enum Allowed<'a, T> {
    Values(&'a [T]),
    Predicate(&'a dyn Fn(&T) -> bool),
}

impl<T> Clone for Allowed<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Allowed<'_, T> {}

impl<T: PartialEq> Allowed<'_, T> {
    fn is_usable(&self) -> bool {
        match self {
            Self::Values(values) => !values.is_empty(),
            Self::Predicate(_) => true,
        }
    }

    #[must_use]
    pub fn allows(&self, value: &T) -> bool {
        match self {
            Self::Values(values) => values.contains(value),
            Self::Predicate(check) => check(value),
        }
    }
}

/// A single value or a list of values offered for validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate<T> {
    One(T),
    Many(Vec<T>),
}

/// Keeps the values matching `allowed`, in their original order.
///
/// Returns an empty list when `allowed` is missing or is an empty set.
pub fn keep_allowed_values<T>(values: &[T], allowed: Option<Allowed<'_, T>>) -> Vec<T>
where
    T: PartialEq + Clone,
{
    let Some(allowed) = allowed.filter(Allowed::is_usable) else {
        return Vec::new();
    };

    values
        .iter()
        .filter(|value| allowed.allows(value))
        .cloned()
        .collect()
}

/// Checks a candidate against `allowed`.
///
/// A list candidate is accepted when at least one of its values is allowed, and
/// only the allowed subset is returned. A rejected candidate yields `Ok(None)`
/// unless `throw_on_reject` is set. A missing or empty allow-set is always an
/// error.
pub fn accept_allowed_value<T>(
    candidate: Candidate<T>,
    allowed: Option<Allowed<'_, T>>,
    throw_on_reject: bool,
) -> Result<Option<Candidate<T>>, AllowError>
where
    T: PartialEq + Clone + Display,
{
    let allowed = allowed
        .filter(Allowed::is_usable)
        .ok_or(AllowError::NoAllowedValues)?;

    match candidate {
        Candidate::One(value) => {
            if allowed.allows(&value) {
                return Ok(Some(Candidate::One(value)));
            }
        }
        Candidate::Many(values) => {
            let accepted = keep_allowed_values(&values, Some(allowed));
            if !accepted.is_empty() {
                return Ok(Some(Candidate::Many(accepted)));
            }
        }
    }

    if !throw_on_reject {
        return Ok(None);
    }

    Err(match allowed {
        Allowed::Values(values) => AllowError::InvalidValue {
            allowed: values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        },
        Allowed::Predicate(_) => AllowError::Rejected,
    })
}

/// Like [`accept_allowed_value`] for a single value, failing on rejection.
pub fn require_allowed_value<T>(value: T, allowed: Allowed<'_, T>) -> Result<T, AllowError>
where
    T: PartialEq + Clone + Display,
{
    match accept_allowed_value(Candidate::One(value), Some(allowed), true)? {
        Some(Candidate::One(value)) => Ok(value),
        _ => Err(AllowError::Rejected),
    }
}
