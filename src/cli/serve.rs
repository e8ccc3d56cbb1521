use crate::cli::ServeArgs;
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::publish::{GitLabPublisher, ReportPublisher};
use crate::server::{self, AppState};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn execute(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = args.config.load()?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    let dispatcher = Dispatcher::from_config(&config)?;
    if dispatcher.endpoints().is_empty() {
        warn!("No workers configured, every review will return empty results");
    } else {
        info!(
            "Dispatching to {} workers (timeout {}s): {:?}",
            dispatcher.endpoints().len(),
            config.worker_timeout_sec,
            dispatcher.endpoints()
        );
    }

    let publisher = match GitLabPublisher::from_config(&config.gitlab)? {
        Some(publisher) => {
            info!(
                "Publishing reviews to GitLab file {} on {}",
                config.gitlab.file_path, config.gitlab.branch
            );
            Some(Arc::new(publisher) as Arc<dyn ReportPublisher>)
        }
        None => {
            info!("GitLab project or token not set, review publishing disabled");
            None
        }
    };

    let state = AppState::new(dispatcher, publisher);
    server::serve(&config.bind, server::router(state)).await?;
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &ServeArgs) {
    if let Some(bind) = &args.bind {
        config.bind = bind.clone();
    }

    let gitlab = &mut config.gitlab;
    if let Some(api_url) = &args.gitlab_api_url {
        gitlab.api_url = api_url.clone();
    }
    if let Some(project) = &args.gitlab_project {
        gitlab.project = Some(project.clone());
    }
    if let Some(token) = &args.gitlab_token {
        gitlab.token = Some(token.clone());
    }
    if let Some(branch) = &args.gitlab_branch {
        gitlab.branch = branch.clone();
    }
    if let Some(file) = &args.gitlab_file {
        gitlab.file_path = file.clone();
    }
}
