use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::{self, GateConfig};
use crate::error::GateError;
use crate::gate::{
    ActionInterceptor, BindOutcome, BindReport, EligibilityPolicy, HookBinder, InteractionHost,
    Messenger, PermissionSource, PlayerDirectory, PlayerId, PlaytimeSource, SharedThreshold,
};

/// Services the host must provide before the gate can start
///
/// Each is optional here so a host can hand over whatever it managed to
/// locate; `GateContext::start` refuses to run with any of them missing.
#[derive(Default, Clone)]
pub struct Collaborators {
    pub playtime: Option<Arc<dyn PlaytimeSource>>,
    pub permissions: Option<Arc<dyn PermissionSource>>,
    pub directory: Option<Arc<dyn PlayerDirectory>>,
    pub messenger: Option<Arc<dyn Messenger>>,
}

impl Collaborators {
    fn require<T: ?Sized>(service: Option<Arc<T>>, name: &str) -> Result<Arc<T>, GateError> {
        service.ok_or_else(|| GateError::unavailable(format!("{} service not found", name)))
    }
}

/// Running gate: threshold, policy, interceptor and binder in one place
///
/// Built collaborators first, then config, then hooks. `shutdown` persists the
/// threshold.
pub struct GateContext {
    config_path: PathBuf,
    threshold: SharedThreshold,
    policy: EligibilityPolicy,
    permissions: Arc<dyn PermissionSource>,
    binder: HookBinder,
}

impl GateContext {
    /// Start the gate and hook every online player
    ///
    /// A missing collaborator disables the whole gate. An unreadable config
    /// file is logged and the default threshold is used.
    pub fn start(
        collaborators: Collaborators,
        host: &dyn InteractionHost,
        config_path: impl Into<PathBuf>,
    ) -> Result<Self, GateError> {
        let (context, report) = Self::start_with_report(collaborators, host, config_path)?;
        if !report.failed.is_empty() {
            warn!(
                "{} player(s) could not be hooked and are not gated",
                report.failed.len()
            );
        }
        Ok(context)
    }

    pub fn start_with_report(
        collaborators: Collaborators,
        host: &dyn InteractionHost,
        config_path: impl Into<PathBuf>,
    ) -> Result<(Self, BindReport), GateError> {
        let playtime = Collaborators::require(collaborators.playtime, "Playtime")
            .inspect_err(|e| error!("{}; the gate requires it to function", e))?;
        let permissions = Collaborators::require(collaborators.permissions, "Permission")
            .inspect_err(|e| error!("{}; the gate requires it to function", e))?;
        let directory = Collaborators::require(collaborators.directory, "Player directory")
            .inspect_err(|e| error!("{}; the gate requires it to function", e))?;
        let messenger = Collaborators::require(collaborators.messenger, "Messaging")
            .inspect_err(|e| error!("{}; the gate requires it to function", e))?;

        let config_path = config_path.into();
        let config = read_config(&config_path);

        let threshold = SharedThreshold::new(config.required_playtime());
        let policy =
            EligibilityPolicy::new(threshold.clone(), playtime, permissions.clone(), directory);
        let interceptor = Arc::new(ActionInterceptor::new(policy.clone(), messenger));
        let binder = HookBinder::new(interceptor);

        let report = binder.bind_all(host);

        info!("Required playtime: {} minutes", config.required_minutes);
        info!(
            "Interaction gate active ({} hooked, {} failed)",
            report.hooked.len() + report.already_hooked.len(),
            report.failed.len()
        );

        let context = Self {
            config_path,
            threshold,
            policy,
            permissions,
            binder,
        };
        Ok((context, report))
    }

    /// Hook a player as soon as they connect
    pub fn on_player_join(
        &self,
        host: &dyn InteractionHost,
        player: &PlayerId,
    ) -> Option<BindOutcome> {
        self.binder.on_connect(host, player)
    }

    pub fn policy(&self) -> &EligibilityPolicy {
        &self.policy
    }

    pub fn permissions(&self) -> &dyn PermissionSource {
        self.permissions.as_ref()
    }

    pub fn required_playtime(&self) -> Duration {
        self.threshold.get()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Set the required playtime and persist it
    ///
    /// The new value is live even if saving fails.
    pub fn set_required_minutes(&self, required_minutes: u64) -> Result<()> {
        anyhow::ensure!(
            required_minutes <= config::MAX_REQUIRED_MINUTES,
            GateError::InvalidAdminInput(required_minutes.to_string())
        );

        let config = GateConfig::new(required_minutes);
        self.threshold.set(config.required_playtime());
        config::save_config(&self.config_path, &config)
    }

    /// Re-read the config file and apply its threshold
    pub fn reload(&self) -> Result<GateConfig> {
        let config = config::load_config(&self.config_path)?;
        self.threshold.set(config.required_playtime());
        info!("Reloaded required playtime: {} minutes", config.required_minutes);
        Ok(config)
    }

    /// Persist the threshold and stop
    pub fn shutdown(self) -> Result<()> {
        let config = GateConfig::from_duration(self.threshold.get());
        config::save_config(&self.config_path, &config)?;
        info!("Interaction gate disabled");
        Ok(())
    }
}

fn read_config(path: &Path) -> GateConfig {
    match config::load_or_create_config(path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {:#}", e);
            GateConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::collaborators::{
        MockInteractionHost, MockMessenger, MockPermissionSource, MockPlayerDirectory,
        MockPlaytimeSource,
    };
    use crate::gate::types::minutes;
    use tempfile::tempdir;

    fn empty_host() -> MockInteractionHost {
        let mut host = MockInteractionHost::new();
        host.expect_online_players().returning(Vec::new);
        host
    }

    fn full_collaborators() -> Collaborators {
        Collaborators {
            playtime: Some(Arc::new(MockPlaytimeSource::new())),
            permissions: Some(Arc::new(MockPermissionSource::new())),
            directory: Some(Arc::new(MockPlayerDirectory::new())),
            messenger: Some(Arc::new(MockMessenger::new())),
        }
    }

    #[test]
    fn test_missing_playtime_service_is_fatal() {
        let dir = tempdir().unwrap();
        let mut host = MockInteractionHost::new();
        host.expect_online_players().times(0);

        let collaborators = Collaborators {
            playtime: None,
            ..full_collaborators()
        };
        let result = GateContext::start(collaborators, &host, dir.path().join("config.txt"));
        assert!(matches!(result, Err(GateError::CollaboratorUnavailable(_))));
        assert!(!dir.path().join("config.txt").exists());
    }

    #[test]
    fn test_start_creates_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");

        let context = GateContext::start(full_collaborators(), &empty_host(), &path).unwrap();
        assert_eq!(context.required_playtime(), minutes(60));
        assert!(path.exists());
    }

    #[test]
    fn test_start_reads_existing_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        std::fs::write(&path, "required-playtime-minutes: 15\n").unwrap();

        let context = GateContext::start(full_collaborators(), &empty_host(), &path).unwrap();
        assert_eq!(context.required_playtime(), minutes(15));
        assert_eq!(context.policy().threshold(), minutes(15));
    }

    #[test]
    fn test_unreadable_config_uses_default() {
        let dir = tempdir().unwrap();
        // A directory where the file should be cannot be read as text
        let path = dir.path().join("config.txt");
        std::fs::create_dir(&path).unwrap();

        let context = GateContext::start(full_collaborators(), &empty_host(), &path).unwrap();
        assert_eq!(context.required_playtime(), minutes(60));
    }

    #[test]
    fn test_set_required_minutes_persists_and_applies() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        let context = GateContext::start(full_collaborators(), &empty_host(), &path).unwrap();

        context.set_required_minutes(5).unwrap();
        assert_eq!(context.policy().threshold(), minutes(5));
        assert_eq!(config::load_config(&path).unwrap().required_minutes, 5);
    }

    #[test]
    fn test_set_required_minutes_rejects_unrepresentable_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        let context = GateContext::start(full_collaborators(), &empty_host(), &path).unwrap();

        assert!(context.set_required_minutes(u64::MAX).is_err());
        assert_eq!(context.required_playtime(), minutes(60));
        assert_eq!(config::load_config(&path).unwrap().required_minutes, 60);
    }

    #[test]
    fn test_largest_threshold_survives_shutdown() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        let context = GateContext::start(full_collaborators(), &empty_host(), &path).unwrap();

        context
            .set_required_minutes(config::MAX_REQUIRED_MINUTES)
            .unwrap();
        context.shutdown().unwrap();

        assert_eq!(
            config::load_config(&path).unwrap().required_minutes,
            config::MAX_REQUIRED_MINUTES
        );
    }

    #[test]
    fn test_reload_applies_edited_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        let context = GateContext::start(full_collaborators(), &empty_host(), &path).unwrap();

        std::fs::write(&path, "required-playtime-minutes: 240\n").unwrap();
        context.reload().unwrap();
        assert_eq!(context.required_playtime(), minutes(240));
    }

    #[test]
    fn test_shutdown_persists_threshold() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        let context = GateContext::start(full_collaborators(), &empty_host(), &path).unwrap();

        context.threshold.set(minutes(33));
        std::fs::remove_file(&path).unwrap();
        context.shutdown().unwrap();

        assert_eq!(config::load_config(&path).unwrap().required_minutes, 33);
    }
}
