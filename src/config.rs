use clap::Args;

use crate::binary::{AgeBinary, DEFAULT_BINARY};
use crate::labels::{Labels, Lang};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Settings shared by the terminal and desktop front-ends.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// External encryption binary, looked up on PATH.
    #[arg(long, env = "AGE_GUI_BINARY", default_value = DEFAULT_BINARY)]
    pub binary: String,

    /// Address the UI page is served on.
    #[arg(long, env = "AGE_GUI_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = "AGE_GUI_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, default_value = "AGE")]
    pub title: String,

    #[arg(long, default_value_t = 768)]
    pub width: u32,

    #[arg(long, default_value_t = 640)]
    pub height: u32,

    /// Label language; the system locale decides when unset.
    #[arg(long, env = "AGE_GUI_LANG", value_enum)]
    pub lang: Option<Lang>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            title: "AGE".to_string(),
            width: 768,
            height: 640,
            lang: None,
        }
    }
}

impl Config {
    pub fn ui_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn labels(&self) -> Labels {
        Labels::for_lang(self.lang.unwrap_or_else(Lang::detect))
    }

    pub fn backend(&self) -> AgeBinary {
        AgeBinary::new(self.binary.clone())
    }
}
