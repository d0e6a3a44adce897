//! Backend commands queued from UI to backend worker.

use shared::domain::ConfigPayload;

pub enum BackendCommand {
    SaveConfig { payload: ConfigPayload },
    ExecutePlatform,
    LoadSavedConfig,
    FetchOutput { target: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::SaveConfig { .. } => "save_config",
            BackendCommand::ExecutePlatform => "execute_platform",
            BackendCommand::LoadSavedConfig => "load_saved_config",
            BackendCommand::FetchOutput { .. } => "fetch_output",
        }
    }
}
