//! Contributor ownership decision.
//!
//! Every fiction or chapter mutation asks the same question: does the
//! fiction exist, and is the requester its contributor? The lookup lives in
//! the api crate; the decision lives here so it is identical everywhere.

use crate::error::CoreError;
use crate::types::DbId;

/// Outcome of checking a requester against a fiction's contributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The fiction exists and the requester is its contributor.
    Authorized,
    /// The fiction exists but belongs to someone else.
    Forbidden,
    /// The fiction does not exist.
    NotFound,
}

/// Decide ownership from the looked-up contributor id.
///
/// `owner` is `None` when the fiction row does not exist. Existence is
/// checked first, so a missing fiction is `NotFound` for every requester.
pub fn decide(owner: Option<DbId>, requester: DbId) -> Ownership {
    match owner {
        None => Ownership::NotFound,
        Some(owner) if owner == requester => Ownership::Authorized,
        Some(_) => Ownership::Forbidden,
    }
}

impl Ownership {
    /// Convert into a `Result`, naming the guarded fiction in the error.
    ///
    /// `action` completes the sentence "You do not have permission to ...".
    pub fn into_result(self, fiction_id: DbId, action: &str) -> Result<(), CoreError> {
        match self {
            Ownership::Authorized => Ok(()),
            Ownership::Forbidden => Err(CoreError::Forbidden(format!(
                "You do not have permission to {action}"
            ))),
            Ownership::NotFound => Err(CoreError::NotFound {
                entity: "Fiction",
                id: fiction_id,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn owner_is_authorized() {
        assert_eq!(decide(Some(7), 7), Ownership::Authorized);
    }

    #[test]
    fn other_user_is_forbidden() {
        assert_eq!(decide(Some(7), 8), Ownership::Forbidden);
    }

    #[test]
    fn missing_fiction_is_not_found_for_everyone() {
        assert_eq!(decide(None, 7), Ownership::NotFound);
        assert_eq!(decide(None, 8), Ownership::NotFound);
    }

    #[test]
    fn into_result_maps_each_outcome() {
        assert!(Ownership::Authorized.into_result(1, "edit this fiction").is_ok());

        assert_matches!(
            Ownership::Forbidden.into_result(1, "edit this fiction"),
            Err(CoreError::Forbidden(msg)) if msg == "You do not have permission to edit this fiction"
        );

        assert_matches!(
            Ownership::NotFound.into_result(3, "edit this fiction"),
            Err(CoreError::NotFound { entity: "Fiction", id: 3 })
        );
    }
}
