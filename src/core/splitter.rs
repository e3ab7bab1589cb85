use crate::domain::model::{ContentItem, Language, SplitDocuments};

/// Concatenates item contents per language, in input order. Unknown tags are dropped.
pub fn split(items: &[ContentItem]) -> SplitDocuments {
    let mut documents = SplitDocuments::default();

    for item in items {
        match item.language() {
            Some(Language::French) => documents.french.push_str(&item.content),
            Some(Language::English) => documents.english.push_str(&item.content),
            None => tracing::debug!("Skipping item with language tag {:?}", item.language),
        }
    }

    documents
}
