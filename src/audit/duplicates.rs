//! Cross-page duplicate titles and descriptions

use crate::crawler::PageResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// Texts shared by more than one page, mapped to the pages sharing them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Duplicates {
    pub title: BTreeMap<String, Vec<String>>,
    pub description: BTreeMap<String, Vec<String>>,
}

impl Duplicates {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty()
    }
}

/// Groups analyzed pages by exact trimmed title and description
///
/// Excluded and noindex pages are ignored, as are empty texts. Only groups
/// with at least two pages are kept.
pub fn find_duplicates<'a, I>(results: I) -> Duplicates
where
    I: IntoIterator<Item = &'a PageResult>,
{
    let mut titles: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut descriptions: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for result in results {
        if result.excluded || result.is_noindex() {
            continue;
        }
        let Some(signals) = &result.signals else {
            continue;
        };

        let title = signals.title.trim();
        if !title.is_empty() {
            titles
                .entry(title.to_string())
                .or_default()
                .push(result.url.clone());
        }

        let description = signals.description.trim();
        if !description.is_empty() {
            descriptions
                .entry(description.to_string())
                .or_default()
                .push(result.url.clone());
        }
    }

    titles.retain(|_, urls| urls.len() > 1);
    descriptions.retain(|_, urls| urls.len() > 1);

    Duplicates {
        title: titles,
        description: descriptions,
    }
}
