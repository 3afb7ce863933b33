use clap::Parser;

pub mod session;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Budget a new session starts with, in whole currency units.
    #[arg(long, env = "DEFAULT_BUDGET", default_value = "5000")]
    pub default_budget: u32,

    /// Upper bound of the budget input.
    #[arg(long, env = "MAX_BUDGET", default_value = "100000")]
    pub max_budget: u32,

    #[arg(long, env = "CURRENCY_SYMBOL", default_value = "₹")]
    pub currency_symbol: String,

    #[arg(long, env = "SESSION_IDLE_MINUTES", default_value = "60")]
    pub session_idle_minutes: i64,

    #[arg(long, env = "SECURE_COOKIES", default_value_t = false)]
    pub secure_cookies: bool,
}

impl Config {
    /// Default budget in cents, never above the configured maximum.
    pub fn default_budget_cents(&self) -> i64 {
        i64::from(self.default_budget.min(self.max_budget)) * 100
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            default_budget: 5000,
            max_budget: 100000,
            currency_symbol: "₹".to_string(),
            session_idle_minutes: 60,
            secure_cookies: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_cli() {
        let config = Config::parse_from(["expense-dashboard"]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_budget_cents(), 500000);
        assert_eq!(config.max_budget, 100000);
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_config_flags() {
        let config = Config::parse_from([
            "expense-dashboard",
            "--default-budget",
            "200000",
            "--max-budget",
            "1000",
            "--currency-symbol",
            "$",
            "--secure-cookies",
        ]);
        assert_eq!(config.default_budget_cents(), 100000);
        assert_eq!(config.currency_symbol, "$");
        assert!(config.secure_cookies);
    }
}
