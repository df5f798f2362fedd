use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());

        Ok(Self {
            bind_addr,
            data_dir,
        })
    }
}
