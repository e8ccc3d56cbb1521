use crate::cli::DispatchArgs;
use crate::dispatch::Dispatcher;
use crate::output::render_summary;
use anyhow::Context;
use serde_json::json;
use std::io::Read;
use tracing::info;

pub async fn execute(args: DispatchArgs) -> anyhow::Result<()> {
    let config = args.config.load()?;
    config.validate()?;

    let code = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .context("Failed to read code from stdin")?;
            code
        }
    };

    let dispatcher = Dispatcher::from_config(&config)?;
    info!(
        "Sending {} bytes of code to {} workers",
        code.len(),
        dispatcher.endpoints().len()
    );

    let response = dispatcher.dispatch(&json!({ "code": code })).await;

    if args.summary {
        println!("{}", render_summary(&response));
    } else {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    Ok(())
}
