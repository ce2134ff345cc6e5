use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    InsufficientPoints(usize),
    NonPositive(&'static str),
    EngineRange { idle: f32, red: f32 },
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InsufficientPoints(n) => {
                write!(f, "curve needs at least 2 points, got {}", n)
            }
            ConfigError::NonPositive(field) => write!(f, "`{}` must be positive", field),
            ConfigError::EngineRange { idle, red } => write!(
                f,
                "engine idle ({} rpm) must be below redline ({} rpm)",
                idle, red
            ),
            ConfigError::Io(e) => write!(f, "failed to read config: {}", e),
            ConfigError::Json(e) => write!(f, "malformed config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

#[derive(Debug)]
pub enum SimError {
    Configuration(ConfigError),
    InvariantViolation { gear: i32 },
    Watch(notify::Error),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Configuration(e) => write!(f, "configuration error: {}", e),
            SimError::InvariantViolation { gear } => {
                write!(f, "gear {} is not in the gear ratio table", gear)
            }
            SimError::Watch(e) => write!(f, "file watch failed: {:?}", e),
            SimError::Io(e) => write!(f, "io error: {}", e),
            SimError::Json(e) => write!(f, "json error: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Configuration(e) => Some(e),
            SimError::Io(e) => Some(e),
            SimError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Configuration(e)
    }
}
impl From<notify::Error> for SimError {
    fn from(e: notify::Error) -> Self {
        SimError::Watch(e)
    }
}
impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e)
    }
}
impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Json(e)
    }
}
