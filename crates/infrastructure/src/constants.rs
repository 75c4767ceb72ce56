//! Deployment defaults shared by the config layer.

/// Default on-disk location of the reference galaxy catalog, relative to the
/// process working directory.
pub const DEFAULT_CATALOG_PATH: &str = "data/galaxy_catalog.csv";

/// Default spatial-index resolution (`12 * nside^2` sky cells).
pub const DEFAULT_CATALOG_NSIDE: u32 = 16;

/// Default webhook send timeout [s].
pub const DEFAULT_SEND_TIMEOUT_SECS: u64 = 10;

/// Environment entries historically used for per-channel webhook endpoints.
pub const ENV_WEBHOOK_PRIMARY: &str = "KN_WEBHOOK";
pub const ENV_WEBHOOK_AMATEUR: &str = "KN_WEBHOOK_AMATEUR";
pub const ENV_WEBHOOK_SURVEY: &str = "KN_WEBHOOK_SURVEY";

/// Survey fields eligible for the restricted-survey channel.
pub const DEFAULT_SURVEY_FIELDS: [u32; 5] = [1253, 1510, 1511, 1512, 1513];

/// Upper bound on configured notification channels.
pub const MAX_NOTIFY_CHANNELS: usize = 32;
