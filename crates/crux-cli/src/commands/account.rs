use super::context::AppContext;
use super::output::print_json;
use anyhow::{Result, bail};
use crux_core::CruxError;
use serde_json::json;

/// Deletes every document stored for the user.
pub async fn delete_account(ctx: &AppContext, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("Refusing to delete account data without --yes");
    }
    ctx.require_session().await?;
    let user_id = ctx.manager.user_id().unwrap_or_default();

    match ctx.manager.delete_all_user_data().await {
        Ok(()) => {
            if ctx.json {
                return print_json(&json!({ "deleted": true, "user_id": user_id }));
            }
            println!("Deleted all data for {}.", user_id);
            Ok(())
        }
        Err(CruxError::AggregateDeleteFailed(failures)) => {
            for failure in &failures {
                eprintln!("  {}", failure);
            }
            bail!(
                "{} deletions failed; run the command again to retry",
                failures.len()
            )
        }
        Err(e) => Err(e.into()),
    }
}
