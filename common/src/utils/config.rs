use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Local,
    Memory,
}

fn default_storage_kind() -> StorageKind {
    StorageKind::Local
}

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_storage_kind")]
    pub storage: StorageKind,
    #[serde(default = "default_search_base_url")]
    pub search_base_url: String,
    #[serde(default = "default_search_index")]
    pub search_index: String,
    #[serde(default = "default_amqp_address")]
    pub amqp_address: String,
    #[serde(default = "default_amqp_exchange")]
    pub amqp_exchange: String,
    #[serde(default = "default_amqp_routing_key")]
    pub amqp_routing_key: String,
    #[serde(default = "default_ocr_command")]
    pub ocr_command: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_search_base_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_search_index() -> String {
    "documents".to_string()
}

fn default_amqp_address() -> String {
    "amqp://localhost:5672".to_string()
}

fn default_amqp_exchange() -> String {
    "document-events".to_string()
}

fn default_amqp_routing_key() -> String {
    "document.lifecycle".to_string()
}

fn default_ocr_command() -> String {
    "tesseract".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage: default_storage_kind(),
            search_base_url: default_search_base_url(),
            search_index: default_search_index(),
            amqp_address: default_amqp_address(),
            amqp_exchange: default_amqp_exchange(),
            amqp_routing_key: default_amqp_routing_key(),
            ocr_command: default_ocr_command(),
        }
    }
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}
