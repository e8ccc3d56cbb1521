use crate::cli::WorkerArgs;
use crate::server;
use crate::worker;
use tracing::info;

pub async fn execute(args: WorkerArgs) -> anyhow::Result<()> {
    info!("Starting worker {} ({})", args.worker_id, worker::MODEL);
    server::serve(&args.bind, worker::router(args.worker_id)).await?;
    Ok(())
}
