use pp_dao::activity_log::{ActivityAction, ActivityLogDao};
use uuid::Uuid;

use crate::context::ApiRestCtx;

pub async fn record(ctx: &ApiRestCtx, user_id: &Option<Uuid>, action: &ActivityAction, detail: &str) {
    if let Err(err) = ActivityLogDao::new(user_id, action, detail)
        .db_insert(ctx.dao().db())
        .await
    {
        pp_log::error(
            None,
            format!("[ApiRestServer] Failed to write activity log '{action}': {err}"),
        );
    }
}
