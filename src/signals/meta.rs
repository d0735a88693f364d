//! Title and meta description length scoring

use serde::Serialize;

/// Length band of a title or description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthClass {
    TooShort,
    /// Within the acceptable range but outside the optimal one
    Acceptable,
    Optimal,
    TooLong,
}

impl LengthClass {
    /// Optimal lengths are also acceptable
    pub fn is_acceptable(&self) -> bool {
        matches!(self, Self::Acceptable | Self::Optimal)
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, Self::Optimal)
    }

    /// Too short or too long
    pub fn is_violation(&self) -> bool {
        !self.is_acceptable()
    }
}

/// Inclusive length bands, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min_acceptable: usize,
    pub min_optimal: usize,
    pub max_optimal: usize,
    pub max_acceptable: usize,
}

pub const TITLE_BOUNDS: LengthBounds = LengthBounds {
    min_acceptable: 30,
    min_optimal: 50,
    max_optimal: 60,
    max_acceptable: 65,
};

pub const DESCRIPTION_BOUNDS: LengthBounds = LengthBounds {
    min_acceptable: 120,
    min_optimal: 150,
    max_optimal: 160,
    max_acceptable: 165,
};

/// Places a length into exactly one band
pub fn classify(length: usize, bounds: &LengthBounds) -> LengthClass {
    if length < bounds.min_acceptable {
        LengthClass::TooShort
    } else if length > bounds.max_acceptable {
        LengthClass::TooLong
    } else if (bounds.min_optimal..=bounds.max_optimal).contains(&length) {
        LengthClass::Optimal
    } else {
        LengthClass::Acceptable
    }
}

/// Classifies a title by its length in characters
pub fn classify_title(title: &str) -> LengthClass {
    classify(title.chars().count(), &TITLE_BOUNDS)
}

/// Classifies a meta description by its length in characters
pub fn classify_description(description: &str) -> LengthClass {
    classify(description.chars().count(), &DESCRIPTION_BOUNDS)
}

/// Length scores for a page's title and description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaScore {
    pub has_title: bool,
    pub title_length: usize,
    pub title_class: LengthClass,
    pub has_description: bool,
    pub description_length: usize,
    pub description_class: LengthClass,
}

impl MetaScore {
    /// Present title with a length outside the acceptable band
    pub fn title_issue(&self) -> bool {
        self.has_title && self.title_class.is_violation()
    }

    /// Present description with a length outside the acceptable band
    pub fn description_issue(&self) -> bool {
        self.has_description && self.description_class.is_violation()
    }
}

/// Scores title and description; presence is independent of length
pub fn score_meta(title: &str, description: &str) -> MetaScore {
    MetaScore {
        has_title: !title.is_empty(),
        title_length: title.chars().count(),
        title_class: classify_title(title),
        has_description: !description.is_empty(),
        description_length: description.chars().count(),
        description_class: classify_description(description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bands() {
        assert_eq!(classify(0, &TITLE_BOUNDS), LengthClass::TooShort);
        assert_eq!(classify(29, &TITLE_BOUNDS), LengthClass::TooShort);
        assert_eq!(classify(30, &TITLE_BOUNDS), LengthClass::Acceptable);
        assert_eq!(classify(49, &TITLE_BOUNDS), LengthClass::Acceptable);
        assert_eq!(classify(50, &TITLE_BOUNDS), LengthClass::Optimal);
        assert_eq!(classify(60, &TITLE_BOUNDS), LengthClass::Optimal);
        assert_eq!(classify(61, &TITLE_BOUNDS), LengthClass::Acceptable);
        assert_eq!(classify(65, &TITLE_BOUNDS), LengthClass::Acceptable);
        assert_eq!(classify(66, &TITLE_BOUNDS), LengthClass::TooLong);
    }

    #[test]
    fn test_description_bands() {
        assert_eq!(classify(119, &DESCRIPTION_BOUNDS), LengthClass::TooShort);
        assert_eq!(classify(120, &DESCRIPTION_BOUNDS), LengthClass::Acceptable);
        assert_eq!(classify(150, &DESCRIPTION_BOUNDS), LengthClass::Optimal);
        assert_eq!(classify(160, &DESCRIPTION_BOUNDS), LengthClass::Optimal);
        assert_eq!(classify(165, &DESCRIPTION_BOUNDS), LengthClass::Acceptable);
        assert_eq!(classify(166, &DESCRIPTION_BOUNDS), LengthClass::TooLong);
    }

    #[test]
    fn test_classification_is_total_and_optimal_is_acceptable() {
        for bounds in [TITLE_BOUNDS, DESCRIPTION_BOUNDS] {
            for len in 0..300 {
                let class = classify(len, &bounds);
                assert_eq!(class, classify(len, &bounds));
                if class.is_optimal() {
                    assert!(class.is_acceptable());
                }
                assert_ne!(class.is_acceptable(), class.is_violation());
            }
        }
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 30 two-byte characters
        let title = "ż".repeat(30);
        assert_eq!(classify_title(&title), LengthClass::Acceptable);
    }

    #[test]
    fn test_presence_independent_of_length() {
        let score = score_meta("", "");
        assert!(!score.has_title);
        assert_eq!(score.title_class, LengthClass::TooShort);
        assert!(!score.title_issue());
        assert!(!score.description_issue());

        let score = score_meta("Short", &"d".repeat(200));
        assert!(score.has_title);
        assert!(score.title_issue());
        assert_eq!(score.description_class, LengthClass::TooLong);
        assert!(score.description_issue());
    }
}
