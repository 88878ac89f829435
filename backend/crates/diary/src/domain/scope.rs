//! Diary Query Scoper
//!
//! Decides which diaries a listing or lookup may return. The session
//! role is carried along but does not widen visibility: an actor only
//! ever sees their own diaries, whatever role they selected.

use kernel::context::{Actor, RequestContext};
use kernel::id::UserId;

use crate::domain::entities::Diary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryScope {
    pub owner: UserId,
    pub active_role: Option<String>,
}

impl DiaryScope {
    /// Scope for single-record lookups (update, delete)
    pub fn for_actor(actor: &Actor) -> Self {
        Self {
            owner: actor.user_id,
            active_role: None,
        }
    }

    /// Scope for listings, which also see the session role
    pub fn for_session(ctx: &RequestContext) -> Self {
        Self {
            owner: ctx.actor.user_id,
            active_role: ctx.active_role.clone(),
        }
    }

    pub fn admits(&self, diary: &Diary) -> bool {
        diary.created_by == self.owner
    }
}
