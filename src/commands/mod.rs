mod config;
mod delete;
mod export;
mod ls;
mod stats;
mod suggest;

pub use config::{cmd_config_set, cmd_config_show};
pub use delete::cmd_delete;
pub use export::cmd_export;
pub use ls::{cmd_defect_types, cmd_ls};
pub use stats::cmd_stats;
pub use suggest::cmd_suggest;

use std::sync::Arc;

use crate::batch::BatchCoordinator;
use crate::config::Config;
use crate::controller::HistoryController;
use crate::error::Result;
use crate::gateway::{DetectionGateway, HttpGateway};
use crate::suggest::SuggestionDebouncer;

/// Everything a command needs: the controller core wired to the configured
/// server.
pub struct Session {
    pub controller: Arc<HistoryController>,
    pub batch: BatchCoordinator,
    pub suggester: SuggestionDebouncer,
}

/// Build a session from the active configuration.
pub fn open_session(config: &Config) -> Result<Session> {
    let gateway: Arc<dyn DetectionGateway> = Arc::new(HttpGateway::from_config(config)?);
    let controller = Arc::new(HistoryController::new(
        Arc::clone(&gateway),
        config.page_size,
        config.remote_timeout(),
    ));
    let batch = BatchCoordinator::new(
        Arc::clone(&controller),
        Arc::clone(&gateway),
        config.remote_timeout(),
    );
    let suggester = SuggestionDebouncer::new(gateway);

    Ok(Session {
        controller,
        batch,
        suggester,
    })
}
