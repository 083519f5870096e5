use anyhow::{Context, Result};
use chrono::Duration;
use tracing::info;

use flightbook::auth::JwtService;
use flightbook::settings::Settings;

/// Print a bearer token for `user_id`, signed with the configured key
pub fn handle_issue_token(settings: &Settings, user_id: &str, hours: Option<i64>) -> Result<()> {
    let jwt = JwtService::new(&settings.token);
    let lifetime_hours = hours.unwrap_or(settings.token.lifetime_hours);
    if lifetime_hours <= 0 {
        anyhow::bail!("Token lifetime must be a positive number of hours");
    }
    let lifetime =
        Duration::try_hours(lifetime_hours).context("Token lifetime is out of range")?;

    let token = jwt.generate_token_with_lifetime(user_id, lifetime)?;
    info!(
        "Issued token for {} valid for {} hour(s)",
        user_id, lifetime_hours
    );

    println!("{}", token);
    Ok(())
}
