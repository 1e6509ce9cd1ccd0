//! Regex intent matching for chat messages.
//!
//! Patterns accept English and Spanish phrasings. Evaluation order matters:
//! a message mentioning both "recommend" and "similar to 3" is a
//! recommendation request.

use std::sync::LazyLock;

use regex::Regex;

use crate::product::ProductId;

static RECOMMEND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)recom(?:m?e|i[eé]?)nd").expect("valid recommend pattern"));

static SIMILAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)similar(?:es)?\s+(?:to|al?)?\s*(?:the\s+|el\s+)?(?:product(?:o)?\s+)?#?(\d+)")
        .expect("valid similar pattern")
});

static INFO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:info|informaci[oó]n|details?|detalles?)\D*(\d+)").expect("valid info pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Recommend,
    Similar(ProductId),
    Info(ProductId),
    Unknown,
}

impl Intent {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if RECOMMEND.is_match(text) {
            return Self::Recommend;
        }
        if let Some(id) = capture_id(&SIMILAR, text) {
            return Self::Similar(id);
        }
        if let Some(id) = capture_id(&INFO, text) {
            return Self::Info(id);
        }
        Self::Unknown
    }
}

fn capture_id(re: &Regex, text: &str) -> Option<ProductId> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_variants() {
        for msg in ["Recommend me something", "recomiéndame productos", "recomienda algo", "RECOMEND pls"] {
            assert_eq!(Intent::parse(msg), Intent::Recommend, "{}", msg);
        }
    }

    #[test]
    fn test_similar_variants() {
        assert_eq!(Intent::parse("products similar to 3"), Intent::Similar(3));
        assert_eq!(Intent::parse("productos similares al 12"), Intent::Similar(12));
        assert_eq!(Intent::parse("similar to product #7"), Intent::Similar(7));
        assert_eq!(Intent::parse("similares a 4"), Intent::Similar(4));
    }

    #[test]
    fn test_info_takes_whole_number() {
        assert_eq!(Intent::parse("info 23"), Intent::Info(23));
        assert_eq!(Intent::parse("información del producto 3"), Intent::Info(3));
        assert_eq!(Intent::parse("details for product 105"), Intent::Info(105));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(Intent::parse("hello there"), Intent::Unknown);
        assert_eq!(Intent::parse("info please"), Intent::Unknown);
        assert_eq!(Intent::parse(""), Intent::Unknown);
    }
}
