use loan_eligibility::config::ArtifactConfig;
use loan_eligibility::eligibility::{load_artifacts, EligibilityService};
use loan_eligibility::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Applies a `--model-dir` flag on top of the configured artifact locations.
pub(crate) fn with_model_dir(
    mut config: ArtifactConfig,
    model_dir: Option<PathBuf>,
) -> ArtifactConfig {
    if let Some(dir) = model_dir {
        config.model_dir = dir;
    }
    config
}

/// Loads every artifact up front; a single bad file means no service at all.
pub(crate) fn load_service(config: &ArtifactConfig) -> Result<Arc<EligibilityService>, AppError> {
    let context = load_artifacts(&config.paths())?;
    Ok(Arc::new(EligibilityService::new(Arc::new(context))))
}

#[cfg(test)]
pub(crate) fn shipped_model_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../model")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &str) -> ArtifactConfig {
        ArtifactConfig {
            model_dir: PathBuf::from(dir),
            classifier: None,
            encoders: None,
            scaler: None,
            status_encoder: None,
        }
    }

    #[test]
    fn model_dir_flag_overrides_configured_directory() {
        let updated = with_model_dir(config("./model"), Some(PathBuf::from("/opt/loan")));
        assert_eq!(updated.model_dir, PathBuf::from("/opt/loan"));

        let untouched = with_model_dir(config("./model"), None);
        assert_eq!(untouched.model_dir, PathBuf::from("./model"));
    }

    #[test]
    fn missing_directory_fails_to_load() {
        let err = load_service(&config("/nonexistent/loan-model")).expect_err("no artifacts");
        assert!(matches!(err, AppError::Artifact(_)));
    }

    #[test]
    fn shipped_model_loads() {
        let config = with_model_dir(config("./model"), Some(shipped_model_dir()));
        let service = load_service(&config).expect("shipped artifacts load");
        assert_eq!(service.context().tables().dependents.len(), 4);
    }
}
