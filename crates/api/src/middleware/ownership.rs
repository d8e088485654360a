//! Contributor guard run before every fiction or chapter mutation.

use fictsu_core::ownership::decide;
use fictsu_core::types::DbId;
use fictsu_db::repositories::FictionRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// Require that `user_id` is the contributor of `fiction_id`.
///
/// A missing fiction is 404 for every requester; an existing fiction owned
/// by someone else is 403. `action` completes "You do not have permission
/// to ..." in the 403 message.
///
/// ```ignore
/// require_fiction_owner(&state, fiction_id, user.id, "edit this fiction").await?;
/// ```
pub async fn require_fiction_owner(
    state: &AppState,
    fiction_id: DbId,
    user_id: DbId,
    action: &str,
) -> AppResult<()> {
    let owner = FictionRepo::find_contributor_id(&state.pool, fiction_id).await?;
    decide(owner, user_id).into_result(fiction_id, action)?;
    Ok(())
}
