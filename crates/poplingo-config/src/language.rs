use poplingo_types::LanguagePair;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

const fn lang(code: &'static str, name: &'static str, flag: &'static str) -> LanguageOption {
    LanguageOption { code, name, flag }
}

pub const POPULAR_LANGUAGES: &[LanguageOption] = &[
    lang("en", "English", "🇺🇸"),
    lang("es", "Spanish", "🇪🇸"),
    lang("fr", "French", "🇫🇷"),
    lang("de", "German", "🇩🇪"),
    lang("it", "Italian", "🇮🇹"),
    lang("pt", "Portuguese", "🇧🇷"),
    lang("ja", "Japanese", "🇯🇵"),
    lang("ko", "Korean", "🇰🇷"),
    lang("zh", "Chinese", "🇨🇳"),
    lang("ru", "Russian", "🇷🇺"),
    lang("ar", "Arabic", "🇸🇦"),
    lang("hi", "Hindi", "🇮🇳"),
    lang("th", "Thai", "🇹🇭"),
    lang("vi", "Vietnamese", "🇻🇳"),
    lang("id", "Indonesian", "🇮🇩"),
    lang("nl", "Dutch", "🇳🇱"),
    lang("tr", "Turkish", "🇹🇷"),
];

pub const DEFAULT_NATIVE: &str = "en";
pub const DEFAULT_TARGET: &str = "es";

const FALLBACK_NATIVE_NAME: &str = "English";
const FALLBACK_TARGET_NAME: &str = "Spanish";

pub fn find_language(code: &str) -> Option<&'static LanguageOption> {
    POPULAR_LANGUAGES
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case(code))
}

fn default_native() -> String {
    DEFAULT_NATIVE.to_string()
}

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

/// Selected language codes
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LanguageConfig {
    #[serde(default = "default_native")]
    pub native: String,
    #[serde(default = "default_target")]
    pub target: String,
}

impl LanguageConfig {
    pub fn new(native: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            native: native.into(),
            target: target.into(),
        }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.native, &mut self.target);
    }

    /// Resolve codes to display names, falling back to English/Spanish
    pub fn pair(&self) -> LanguagePair {
        let native = find_language(&self.native)
            .map(|l| l.name)
            .unwrap_or(FALLBACK_NATIVE_NAME);
        let target = find_language(&self.target)
            .map(|l| l.name)
            .unwrap_or(FALLBACK_TARGET_NAME);

        LanguagePair::new(native, target)
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            native: default_native(),
            target: default_target(),
        }
    }
}
