use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub max_room_size: usize,
    pub room_sweep_seconds: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .expect("Invalid PORT"),
            cors_origin: env::var("CLIENT_URL").unwrap_or_else(|_| "*".to_string()),
            max_room_size: env::var("MAX_ROOM_SIZE")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .expect("Invalid MAX_ROOM_SIZE"),
            room_sweep_seconds: env::var("ROOM_SWEEP_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .expect("Invalid ROOM_SWEEP_SECONDS"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
