//! Locale handling for the widget's user-visible strings
//!
//! The token field itself only shows a handful of strings (the "not found"
//! marker, the empty-value marker, kind labels and the empty popup row); the
//! demo app adds its menu and panel titles. All of them live in
//! `locales/app.yml` and are looked up with `t!` against the active locale.
//!
//! The `i18n!` macro is initialized at the crate root (lib.rs).

/// Locale the strings are rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Language {
    #[default]
    English,
    SimplifiedChinese,
}

impl Language {
    /// Key of this language's block in `locales/app.yml`
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::SimplifiedChinese => "zh-CN",
        }
    }

    /// Name shown in the language menu
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::SimplifiedChinese => "简体中文",
        }
    }

    pub fn all() -> &'static [Language] {
        &[Language::English, Language::SimplifiedChinese]
    }

    /// Match a locale tag such as `en`, `zh-CN`, `zh_CN` or `en_US.UTF-8`.
    ///
    /// Only the primary subtag decides; region and encoding are ignored.
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Language::English),
            "zh" => Some(Language::SimplifiedChinese),
            _ => None,
        }
    }

    /// Language of the user's environment (`LC_ALL`, `LC_MESSAGES`, `LANG`),
    /// or English when none of them names a supported locale
    pub fn detect() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|value| Self::from_code(&value))
            .unwrap_or_default()
    }
}

/// Switch the locale used by every later `t!` lookup
pub fn set_language(lang: Language) {
    tracing::debug!(locale = lang.code(), "switching locale");
    rust_i18n::set_locale(lang.code());
}

/// Language of the active locale
pub fn current_language() -> Language {
    Language::from_code(&rust_i18n::locale()).unwrap_or_default()
}
