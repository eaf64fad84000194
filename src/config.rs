use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_SESSION_HEADER: &str = "X-User-Id";
pub const DEFAULT_BACKOFF_MS: u64 = 1000;
pub const DEFAULT_CLOUDINARY_UPLOAD_URL: &str = "https://api.cloudinary.com/v1_1";
pub const DEFAULT_CLOUDINARY_FOLDER: &str = "thumbnails";
pub const DEFAULT_POLLINATIONS_URL: &str = "https://image.pollinations.ai";
pub const DEFAULT_PICSUM_URL: &str = "https://picsum.photos";
pub const DEFAULT_PLACEHOLD_URL: &str = "https://placehold.co";

#[derive(Debug, Clone, Default)]
pub struct PostgresConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl PostgresConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        PostgresConfig {
            host: env::var("POSTGRES_HOST").ok(),
            port: env::var("POSTGRES_PORT").ok().and_then(|s| s.parse().ok()),
            username: env::var("POSTGRES_USERNAME").ok(),
            password: env::var("POSTGRES_PASSWORD").ok(),
            database: env::var("POSTGRES_DATABASE").ok(),
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_connection_info(
        mut self,
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
    ) -> Self {
        self.host = Some(host.into());
        self.port = Some(port);
        self.database = Some(database.into());
        self
    }
}

/// Credentials and placement for the CDN upload.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub folder: String,
    pub upload_url: String,
    pub staging_dir: PathBuf,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        CloudinaryConfig {
            cloud_name: None,
            api_key: None,
            api_secret: None,
            folder: DEFAULT_CLOUDINARY_FOLDER.to_string(),
            upload_url: DEFAULT_CLOUDINARY_UPLOAD_URL.to_string(),
            staging_dir: env::temp_dir(),
        }
    }
}

impl CloudinaryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        CloudinaryConfig {
            cloud_name: env::var("CLOUDINARY_CLOUD_NAME").ok(),
            api_key: env::var("CLOUDINARY_API_KEY").ok(),
            api_secret: env::var("CLOUDINARY_API_SECRET").ok(),
            folder: env::var("CLOUDINARY_FOLDER").unwrap_or(defaults.folder),
            upload_url: env::var("CLOUDINARY_UPLOAD_URL").unwrap_or(defaults.upload_url),
            staging_dir: env::var("ASSET_STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.staging_dir),
        }
    }

    pub fn with_credentials(
        mut self,
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        self.cloud_name = Some(cloud_name.into());
        self.api_key = Some(api_key.into());
        self.api_secret = Some(api_secret.into());
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }
}

/// Provider endpoints and retry pacing for image acquisition.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub backoff_base_ms: u64,
    pub pollinations_url: String,
    pub picsum_url: String,
    pub placehold_url: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            backoff_base_ms: DEFAULT_BACKOFF_MS,
            pollinations_url: DEFAULT_POLLINATIONS_URL.to_string(),
            picsum_url: DEFAULT_PICSUM_URL.to_string(),
            placehold_url: DEFAULT_PLACEHOLD_URL.to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        GenerationConfig {
            backoff_base_ms: env::var("GENERATION_BACKOFF_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.backoff_base_ms),
            pollinations_url: env::var("POLLINATIONS_URL").unwrap_or(defaults.pollinations_url),
            picsum_url: env::var("PICSUM_URL").unwrap_or(defaults.picsum_url),
            placehold_url: env::var("PLACEHOLD_URL").unwrap_or(defaults.placehold_url),
        }
    }

    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base_ms = base.as_millis() as u64;
        self
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: Option<u16>,
    pub session_header: String,
    pub use_psql: bool,
    pub postgres: Option<PostgresConfig>,
    pub cloudinary: CloudinaryConfig,
    pub generation: GenerationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: None,
            session_header: DEFAULT_SESSION_HEADER.to_string(),
            use_psql: false,
            postgres: None,
            cloudinary: CloudinaryConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let use_psql = env::var("USE_PSQL").ok().map_or(false, |val| val == "true");

        Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT").ok().and_then(|port| port.parse().ok()),
            session_header: env::var("SESSION_HEADER")
                .unwrap_or_else(|_| DEFAULT_SESSION_HEADER.to_string()),
            use_psql,
            postgres: use_psql.then(PostgresConfig::from_env),
            cloudinary: CloudinaryConfig::from_env(),
            generation: GenerationConfig::from_env(),
        }
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_session_header(mut self, header: impl Into<String>) -> Self {
        self.session_header = header.into();
        self
    }

    pub fn with_postgres(mut self, config: PostgresConfig) -> Self {
        self.postgres = Some(config);
        self.use_psql = true;
        self
    }

    pub fn with_cloudinary(mut self, config: CloudinaryConfig) -> Self {
        self.cloudinary = config;
        self
    }

    pub fn with_generation(mut self, config: GenerationConfig) -> Self {
        self.generation = config;
        self
    }
}
