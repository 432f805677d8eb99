/// Locales the instance UI is translated into, with their native names
pub const SUPPORTED: &[(&str, &str)] = &[
    ("ar", "العربية"),
    ("de", "Deutsch"),
    ("en", "English"),
    ("es", "Español"),
    ("fr", "Français"),
    ("it", "Italiano"),
    ("ja", "日本語"),
    ("ko", "한국어"),
    ("nl", "Nederlands"),
    ("pl", "Polski"),
    ("pt", "Português"),
    ("pt-BR", "Português (Brasil)"),
    ("ru", "Русский"),
    ("tr", "Türkçe"),
    ("uk", "Українська"),
    ("zh-CN", "简体中文"),
    ("zh-TW", "繁體中文"),
];

pub const DEFAULT: &str = "en";

/// Map a preferred tag onto a supported locale.
///
/// Tries the exact tag, then its primary language subtag, then `en`.
pub fn resolve(preferred: &str) -> &'static str {
    let wanted = preferred.trim().replace('_', "-");
    if let Some((tag, _)) = SUPPORTED.iter().find(|(tag, _)| tag.eq_ignore_ascii_case(&wanted)) {
        return *tag;
    }
    let primary = wanted.split('-').next().unwrap_or_default();
    SUPPORTED
        .iter()
        .find(|(tag, _)| tag.eq_ignore_ascii_case(primary))
        .map(|(tag, _)| *tag)
        .unwrap_or(DEFAULT)
}

/// Native name for a supported locale tag
pub fn display_name(tag: &str) -> Option<&'static str> {
    SUPPORTED.iter().find(|(t, _)| *t == tag).map(|(_, name)| *name)
}

/// Turn a POSIX locale value (`de_DE.UTF-8@euro`) into a tag (`de-DE`)
pub fn normalize(raw: &str) -> Option<String> {
    let tag = raw.split(['.', '@']).next().unwrap_or_default().trim();
    if tag.is_empty() || tag == "C" || tag == "POSIX" {
        return None;
    }
    Some(tag.replace('_', "-"))
}

/// Locale requested by the environment (`LC_ALL`, `LC_MESSAGES`, then `LANG`)
pub fn from_env() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|value| normalize(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact() {
        assert_eq!(resolve("pt-BR"), "pt-BR");
        assert_eq!(resolve("zh_tw"), "zh-TW");
        assert_eq!(resolve("de"), "de");
    }

    #[test]
    fn test_resolve_primary_subtag() {
        assert_eq!(resolve("de-AT"), "de");
        assert_eq!(resolve("pt-PT"), "pt");
    }

    #[test]
    fn test_resolve_fallback() {
        assert_eq!(resolve("xx"), "en");
        assert_eq!(resolve(""), "en");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("de_DE.UTF-8").as_deref(), Some("de-DE"));
        assert_eq!(normalize("fr_FR@euro").as_deref(), Some("fr-FR"));
        assert_eq!(normalize("C.UTF-8"), None);
        assert_eq!(normalize("POSIX"), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("en"), Some("English"));
        assert_eq!(display_name("xx"), None);
    }
}
