//! Display language
//!
//! The web layer renders every label in Arabic or English. Arabic is the
//! default and is laid out right-to-left.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Ar,
    En,
}

impl Lang {
    /// Pick the label matching this language
    pub fn pick<'a>(self, ar: &'a str, en: &'a str) -> &'a str {
        match self {
            Lang::Ar => ar,
            Lang::En => en,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Lang::Ar => "ar",
            Lang::En => "en",
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Lang::Ar)
    }

    /// Value for the HTML `dir` attribute
    pub fn dir(self) -> &'static str {
        if self.is_rtl() { "rtl" } else { "ltr" }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnknownLang(pub String);

impl FromStr for Lang {
    type Err = UnknownLang;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ar" | "ar-sa" | "arabic" => Ok(Lang::Ar),
            "en" | "en-us" | "english" => Ok(Lang::En),
            other => Err(UnknownLang(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_arabic() {
        assert_eq!(Lang::default(), Lang::Ar);
        assert_eq!(Lang::default().dir(), "rtl");
    }

    #[test]
    fn test_parse() {
        assert_eq!("EN".parse::<Lang>().unwrap(), Lang::En);
        assert_eq!(" ar-SA ".parse::<Lang>().unwrap(), Lang::Ar);
        assert!("fr".parse::<Lang>().is_err());
    }

    #[test]
    fn test_pick() {
        assert_eq!(Lang::En.pick("نعم", "Yes"), "Yes");
        assert_eq!(Lang::Ar.pick("نعم", "Yes"), "نعم");
    }
}
