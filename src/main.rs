use std::sync::Arc;

use dotenvy::dotenv;
use tracing::info;

use subscription_sync::{
    adapters::{
        navigation::TerminalNavigator,
        terminal::{Action, Route, pages::visit},
    },
    infra::{
        config::AppConfig,
        setup::{init_app_state, init_session, init_tracing},
    },
};

const USAGE: &str = "usage: subscription-sync [PATH] [subscribe:<plan>|manage-billing]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let mut args = std::env::args().skip(1);
    let target = args.next().unwrap_or_else(|| "/".to_string());
    if target == "-h" || target == "--help" {
        println!("{USAGE}");
        return Ok(());
    }
    let action = args.next().map(|raw| raw.parse::<Action>()).transpose()?;

    let config = AppConfig::from_env()?;
    init_tracing(config.log_file.as_deref())?;

    let session = init_session(&config);
    let navigator = Arc::new(TerminalNavigator::new());
    let app_state = init_app_state(&config, session, navigator.clone())?;

    let route = Route::parse(&config.app_origin, &target);
    info!(?route, ?action, "visiting");

    let page = visit(&app_state, &route, action.as_ref()).await;
    println!("{page}");

    if let Some(url) = navigator.last() {
        info!(%url, "left application");
    }
    app_state.shutdown();

    Ok(())
}
