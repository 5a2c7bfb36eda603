use std::time::Duration;

/// Feature toggle that turns the cloud migration service on.
pub const FLAG_ON_PREM_TO_CLOUD_MIGRATIONS: &str = "onPremToCloudMigrations";

const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub admin_key: Option<String>,
    /// Installation (stack) ID, used as the realm identifier on GCOM.
    pub stack_id: String,
    /// Installation slug, used as the metrics label.
    pub slug: String,
    /// Set via FEATURE_TOGGLES_ENABLE (comma-separated).
    pub features: FeatureToggles,
    pub cloud_migration: CloudMigrationSettings,
}

#[derive(Debug, Clone)]
pub struct CloudMigrationSettings {
    pub is_target: bool,
    pub region: String,
    pub gcom_api_url: String,
    pub gcom_api_token: String,
    pub fetch_access_policy_timeout: Duration,
    pub delete_access_policy_timeout: Duration,
    pub create_access_policy_timeout: Duration,
    pub create_token_timeout: Duration,
}

impl Default for CloudMigrationSettings {
    fn default() -> Self {
        Self {
            is_target: false,
            region: String::new(),
            gcom_api_url: String::new(),
            gcom_api_token: String::new(),
            fetch_access_policy_timeout: DEFAULT_REMOTE_TIMEOUT,
            delete_access_policy_timeout: DEFAULT_REMOTE_TIMEOUT,
            create_access_policy_timeout: DEFAULT_REMOTE_TIMEOUT,
            create_token_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureToggles {
    enabled: Vec<String>,
}

impl FeatureToggles {
    pub fn new<I, S>(enabled: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: enabled.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_enabled_globally(&self, flag: &str) -> bool {
        self.enabled.iter().any(|f| f == flag)
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();
    let cfg = from_lookup(|key| std::env::var(key).ok());

    if cfg.admin_key.is_none() {
        let env_mode = std::env::var("CLOUDMIGRATION_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default();
        if env_mode == "production" {
            anyhow::bail!(
                "CLOUDMIGRATION_ADMIN_KEY is not set. \
                 Set an admin key before running in production."
            );
        }
        eprintln!("⚠️  CLOUDMIGRATION_ADMIN_KEY is not set. The migration API will reject every request.");
    }

    Ok(cfg)
}

/// Builds a [`Config`] from an arbitrary key lookup. `load()` passes the
/// process environment.
pub fn from_lookup<F>(lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let timeout = |key: &str| match lookup(key) {
        None => DEFAULT_REMOTE_TIMEOUT,
        Some(raw) => parse_duration(&raw).unwrap_or_else(|e| {
            tracing::warn!(
                key,
                value = %raw,
                error = %e,
                default = ?DEFAULT_REMOTE_TIMEOUT,
                "invalid timeout, using default"
            );
            DEFAULT_REMOTE_TIMEOUT
        }),
    };

    Config {
        port: lookup("CLOUDMIGRATION_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000),
        database_url: lookup("DATABASE_URL")
            .unwrap_or_else(|| "postgres://localhost/grafana".into()),
        admin_key: lookup("CLOUDMIGRATION_ADMIN_KEY").filter(|k| !k.is_empty()),
        stack_id: lookup("STACK_ID").unwrap_or_default(),
        slug: lookup("SLUG").unwrap_or_default(),
        features: FeatureToggles::new(
            lookup("FEATURE_TOGGLES_ENABLE")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        ),
        cloud_migration: CloudMigrationSettings {
            is_target: lookup("CLOUD_MIGRATION_IS_TARGET")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            region: lookup("CLOUD_MIGRATION_REGION").unwrap_or_default(),
            gcom_api_url: lookup("CLOUD_MIGRATION_GCOM_API_URL").unwrap_or_default(),
            gcom_api_token: lookup("CLOUD_MIGRATION_GCOM_API_TOKEN").unwrap_or_default(),
            fetch_access_policy_timeout: timeout("CLOUD_MIGRATION_FETCH_ACCESS_POLICY_TIMEOUT"),
            delete_access_policy_timeout: timeout("CLOUD_MIGRATION_DELETE_ACCESS_POLICY_TIMEOUT"),
            create_access_policy_timeout: timeout("CLOUD_MIGRATION_CREATE_ACCESS_POLICY_TIMEOUT"),
            create_token_timeout: timeout("CLOUD_MIGRATION_CREATE_TOKEN_TIMEOUT"),
        },
    }
}

/// Parses a humantime duration ("250ms", "1m30s", "1h"). A bare integer is
/// taken as seconds.
fn parse_duration(raw: &str) -> Result<Duration, humantime::DurationError> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let cfg = from_lookup(|_| None);
        assert_eq!(cfg.port, 3000);
        assert!(cfg.admin_key.is_none());
        assert!(!cfg.cloud_migration.is_target);
        assert_eq!(cfg.cloud_migration.fetch_access_policy_timeout, Duration::from_secs(5));
        assert_eq!(cfg.cloud_migration.delete_access_policy_timeout, Duration::from_secs(5));
        assert_eq!(cfg.cloud_migration.create_access_policy_timeout, Duration::from_secs(5));
        assert_eq!(cfg.cloud_migration.create_token_timeout, Duration::from_secs(5));
        assert!(!cfg.features.is_enabled_globally(FLAG_ON_PREM_TO_CLOUD_MIGRATIONS));
    }

    #[test]
    fn test_timeouts_are_independent() {
        let cfg = from_lookup(lookup_from(&[
            ("CLOUD_MIGRATION_FETCH_ACCESS_POLICY_TIMEOUT", "250ms"),
            ("CLOUD_MIGRATION_DELETE_ACCESS_POLICY_TIMEOUT", "2s"),
            ("CLOUD_MIGRATION_CREATE_ACCESS_POLICY_TIMEOUT", "1m"),
            ("CLOUD_MIGRATION_CREATE_TOKEN_TIMEOUT", "7"),
        ]));
        let s = &cfg.cloud_migration;
        assert_eq!(s.fetch_access_policy_timeout, Duration::from_millis(250));
        assert_eq!(s.delete_access_policy_timeout, Duration::from_secs(2));
        assert_eq!(s.create_access_policy_timeout, Duration::from_secs(60));
        assert_eq!(s.create_token_timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_compound_and_hour_timeouts() {
        let cfg = from_lookup(lookup_from(&[
            ("CLOUD_MIGRATION_FETCH_ACCESS_POLICY_TIMEOUT", "1h"),
            ("CLOUD_MIGRATION_CREATE_TOKEN_TIMEOUT", "1m30s"),
        ]));
        let s = &cfg.cloud_migration;
        assert_eq!(s.fetch_access_policy_timeout, Duration::from_secs(3600));
        assert_eq!(s.create_token_timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_unparsable_timeout_falls_back_to_default() {
        let cfg = from_lookup(lookup_from(&[("CLOUD_MIGRATION_CREATE_TOKEN_TIMEOUT", "soon")]));
        assert_eq!(cfg.cloud_migration.create_token_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overflowing_timeout_falls_back_to_default() {
        let cfg = from_lookup(lookup_from(&[(
            "CLOUD_MIGRATION_DELETE_ACCESS_POLICY_TIMEOUT",
            "307445734561825862m",
        )]));
        assert_eq!(cfg.cloud_migration.delete_access_policy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_feature_toggles_parsed_from_comma_list() {
        let cfg = from_lookup(lookup_from(&[(
            "FEATURE_TOGGLES_ENABLE",
            " someOtherFlag , onPremToCloudMigrations,,",
        )]));
        assert!(cfg.features.is_enabled_globally(FLAG_ON_PREM_TO_CLOUD_MIGRATIONS));
        assert!(cfg.features.is_enabled_globally("someOtherFlag"));
        assert!(!cfg.features.is_enabled_globally("onPremToCloud"));
    }

    #[test]
    fn test_gcom_settings_and_identity() {
        let cfg = from_lookup(lookup_from(&[
            ("CLOUD_MIGRATION_REGION", "prod-us-east-0"),
            ("CLOUD_MIGRATION_GCOM_API_URL", "https://grafana.com/api"),
            ("CLOUD_MIGRATION_GCOM_API_TOKEN", "glc_bootstrap"),
            ("CLOUD_MIGRATION_IS_TARGET", "true"),
            ("STACK_ID", "12345"),
            ("SLUG", "my-stack"),
            ("CLOUDMIGRATION_ADMIN_KEY", ""),
        ]));
        assert_eq!(cfg.cloud_migration.region, "prod-us-east-0");
        assert_eq!(cfg.cloud_migration.gcom_api_url, "https://grafana.com/api");
        assert_eq!(cfg.cloud_migration.gcom_api_token, "glc_bootstrap");
        assert!(cfg.cloud_migration.is_target);
        assert_eq!(cfg.stack_id, "12345");
        assert_eq!(cfg.slug, "my-stack");
        // empty admin key is treated as unset
        assert!(cfg.admin_key.is_none());
    }
}
