use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Максимальное количество терминалов, для которых нарисованы экраны статуса
pub const MAX_SEAT_COUNT: usize = 5;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub seats: SeatsConfig,
    pub screens: ScreensConfig,
    pub display: DisplayConfig,
    pub udev: UdevConfig,
    #[serde(default)]
    pub dry_run: DryRunConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeatsConfig {
    pub max_seat_count: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScreensConfig {
    pub directory: PathBuf,
    pub wait_image: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub window_name_prefix: String,
    pub message_template: String,
    pub settle_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UdevConfig {
    pub reload_rules: bool,
}

/// Параметры эмуляции для режима сухого запуска
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DryRunConfig {
    pub seats: Vec<String>,
    pub keys: Vec<String>,
    pub key_delay_ms: u64,
}

impl Default for DryRunConfig {
    fn default() -> Self {
        Self {
            seats: vec!["seat0".to_string(), "seat1".to_string(), "seat2".to_string()],
            keys: vec!["F1".to_string()],
            key_delay_ms: 3000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            seats: SeatsConfig {
                max_seat_count: MAX_SEAT_COUNT,
            },
            screens: ScreensConfig {
                directory: PathBuf::from("/usr/share/multiseat-wizard/screens"),
                wait_image: "wait-loading.png".to_string(),
            },
            display: DisplayConfig {
                window_name_prefix: "multi-seat-window-".to_string(),
                message_template: "Remaining seats: {seats}        Available keyboards: {keyboards}"
                    .to_string(),
                settle_delay_ms: 1000,
            },
            udev: UdevConfig { reload_rules: true },
            dry_run: DryRunConfig::default(),
        }
    }
}

impl Config {
    /// Загрузка: значения по умолчанию ← TOML-файл (если есть) ← переменные MULTISEAT_*
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("MULTISEAT_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        if self.seats.max_seat_count == 0 {
            anyhow::bail!("max_seat_count должно быть больше 0");
        }

        if self.screens.directory.as_os_str().is_empty() {
            anyhow::bail!("Не указана директория с экранами");
        }

        let template = &self.display.message_template;
        if !template.contains("{seats}") || !template.contains("{keyboards}") {
            anyhow::bail!(
                "Шаблон сообщения должен содержать {{seats}} и {{keyboards}}: {}",
                template
            );
        }

        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.display.settle_delay_ms)
    }

    pub fn window_name(&self, seat_name: &str) -> String {
        format!("{}{}", self.display.window_name_prefix, seat_name)
    }

    /// Текст строки статуса под картинкой
    pub fn render_message(&self, remaining_seats: usize, available_keyboards: usize) -> String {
        self.display
            .message_template
            .replace("{seats}", &remaining_seats.to_string())
            .replace("{keyboards}", &available_keyboards.to_string())
    }
}
