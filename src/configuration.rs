use config::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// JWT authentication settings
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiry: i64,   // seconds (e.g., 900 for 15 minutes)
    pub refresh_token_expiry: i64,  // seconds (e.g., 604800 for 7 days)
    pub issuer: String,
}

impl JwtSettings {
    /// Refresh tokens must outlive access tokens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must not be empty".to_string(),
            ));
        }
        if self.access_token_expiry <= 0 {
            return Err(ConfigError::Message(
                "jwt.access_token_expiry must be positive".to_string(),
            ));
        }
        if self.refresh_token_expiry <= self.access_token_expiry {
            return Err(ConfigError::Message(
                "jwt.refresh_token_expiry must be greater than jwt.access_token_expiry"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .build()?;
    let settings = settings.try_deserialize::<Settings>()?;
    settings.jwt.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_settings(access: i64, refresh: i64) -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: access,
            refresh_token_expiry: refresh,
            issuer: "test".to_string(),
        }
    }

    #[test]
    fn test_refresh_expiry_must_exceed_access_expiry() {
        assert!(jwt_settings(3600, 604800).validate().is_ok());
        assert!(jwt_settings(3600, 3600).validate().is_err());
        assert!(jwt_settings(3600, 60).validate().is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut settings = jwt_settings(3600, 604800);
        settings.secret = String::new();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_non_positive_access_expiry_rejected() {
        assert!(jwt_settings(0, 604800).validate().is_err());
        assert!(jwt_settings(-1, 604800).validate().is_err());
    }
}
