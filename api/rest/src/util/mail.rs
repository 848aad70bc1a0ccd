use pp_mailer::MailPayload;

use crate::context::ApiRestCtx;

/// Queues `payload` on the mailer. Mail problems never fail the request.
pub fn send(ctx: &ApiRestCtx, payload: MailPayload) {
    match ctx.mailer() {
        Some(mailer) => {
            let to = payload.to().to_owned();
            if let Err(err) = mailer.sender().send(payload) {
                pp_log::error(
                    None,
                    format!("[ApiRestServer] Failed to queue mail to {to}: {err}"),
                );
            }
        }
        None => pp_log::warn(
            None,
            format!(
                "[ApiRestServer] Mailer is not configured, skipping mail '{}' to {}",
                payload.subject(),
                payload.to()
            ),
        ),
    }
}

/// Absolute link into the web client.
pub fn link(ctx: &ApiRestCtx, path: &str, token: &str) -> String {
    format!("{}/{}?token={}", ctx.public_url(), path.trim_start_matches('/'), token)
}
