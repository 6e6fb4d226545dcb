use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub port: u16,
    #[serde(default)]
    pub mongodb_uri: String,
    pub db_name: String,
    pub allowed_origins: String,
    pub images_dir: String,
    pub debug: bool,
    pub enable_swagger: bool,
}

/// Cross-origin hosts the API answers for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // PORT, MONGODB_URI, DB_NAME, ALLOWED_ORIGINS, ...
            .add_source(Environment::default())
            .set_default("port", 4000)?
            .set_default("db_name", "after_school")?
            .set_default("allowed_origins", "*")?
            .set_default("images_dir", "public/images")?
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        if settings.mongodb_uri.trim().is_empty() {
            return Err(ConfigError::Message(
                "Missing MONGODB_URI. Set it in your environment variables.".into(),
            ));
        }
        Ok(settings)
    }

    pub fn allowed_origins(&self) -> AllowedOrigins {
        let origins: Vec<String> = self
            .allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    const VARS: [&str; 7] = [
        "PORT",
        "MONGODB_URI",
        "DB_NAME",
        "ALLOWED_ORIGINS",
        "IMAGES_DIR",
        "DEBUG",
        "ENABLE_SWAGGER",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe { std::env::remove_var(var) };
        }
    }

    fn settings_with_origins(origins: &str) -> Settings {
        Settings {
            port: 4000,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            db_name: "after_school".to_string(),
            allowed_origins: origins.to_string(),
            images_dir: "public/images".to_string(),
            debug: false,
            enable_swagger: true,
        }
    }

    #[test]
    fn test_allowed_origins_default_is_any() {
        assert_eq!(settings_with_origins("*").allowed_origins(), AllowedOrigins::Any);
        assert_eq!(settings_with_origins("").allowed_origins(), AllowedOrigins::Any);
        assert_eq!(settings_with_origins(" , ").allowed_origins(), AllowedOrigins::Any);
    }

    #[test]
    fn test_allowed_origins_list_is_trimmed() {
        let settings = settings_with_origins("https://a.example, https://b.example ,");
        assert_eq!(
            settings.allowed_origins(),
            AllowedOrigins::List(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
    }

    #[test]
    #[serial]
    fn test_from_env_requires_mongodb_uri() {
        clear_env();
        let err = Settings::from_env().unwrap_err();
        assert!(err.to_string().contains("MONGODB_URI"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        unsafe { std::env::set_var("MONGODB_URI", "mongodb://localhost:27017") };

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.port, 4000);
        assert_eq!(settings.db_name, "after_school");
        assert_eq!(settings.allowed_origins(), AllowedOrigins::Any);
        assert_eq!(settings.images_dir, "public/images");
        assert!(settings.enable_swagger);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("MONGODB_URI", "mongodb://db:27017");
            std::env::set_var("PORT", "5050");
            std::env::set_var("DB_NAME", "lessons_test");
        }

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.port, 5050);
        assert_eq!(settings.mongodb_uri, "mongodb://db:27017");
        assert_eq!(settings.db_name, "lessons_test");

        clear_env();
    }
}
