use clap::ValueEnum;
use serde::Serialize;

use crate::form::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Lang {
    Zh,
    En,
}

impl Lang {
    /// Picks the language from the system locale, English when it is unknown.
    pub fn detect() -> Self {
        sys_locale::get_locale()
            .map(|tag| Self::from_locale(&tag))
            .unwrap_or(Lang::En)
    }

    pub fn from_locale(tag: &str) -> Self {
        if tag.to_ascii_lowercase().starts_with("zh") {
            Lang::Zh
        } else {
            Lang::En
        }
    }
}

/// Text shown on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labels {
    pub password: &'static str,
    pub input: &'static str,
    pub output: &'static str,
    pub encrypt: &'static str,
    pub decrypt: &'static str,
}

impl Labels {
    pub fn for_lang(lang: Lang) -> Self {
        match lang {
            Lang::Zh => Self {
                password: "密码",
                input: "输入",
                output: "输出",
                encrypt: "加密",
                decrypt: "解密",
            },
            Lang::En => Self {
                password: "Password",
                input: "Input",
                output: "Output",
                encrypt: "Encrypt",
                decrypt: "Decrypt",
            },
        }
    }

    pub fn action(&self, mode: Mode) -> &'static str {
        match mode {
            Mode::Encrypt => self.encrypt,
            Mode::Decrypt => self.decrypt,
        }
    }
}
