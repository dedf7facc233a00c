use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub stockfish_path: String,
    pub max_depth: u32,
    pub multipv: u32,
    pub cache_capacity: u64,
    pub engine_pool_size: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            stockfish_path: env::var("STOCKFISH_PATH")
                .unwrap_or_else(|_| "/usr/local/bin/stockfish".to_string()),
            // Floored at 1: route handlers clamp requested depth into 1..=max_depth
            max_depth: env::var("MAX_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(18)
                .max(1),
            multipv: env::var("MULTIPV")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),
            engine_pool_size: env::var("ENGINE_POOL_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(num_cpus::get),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test that touches process env in this binary, so no race
    // with parallel test threads.
    #[test]
    fn test_max_depth_floors_at_one() {
        env::set_var("MAX_DEPTH", "0");
        let config = Config::from_env();
        env::remove_var("MAX_DEPTH");
        assert_eq!(config.max_depth, 1);
    }
}
