//! Client-side text filtering.

/// Keep the items whose `field` contains `needle`, ignoring case.
///
/// The needle is matched literally. An empty needle keeps everything.
pub fn filter_by_text<T, F>(items: Vec<T>, needle: &str, field: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    if needle.is_empty() {
        return items;
    }

    let needle = needle.to_lowercase();
    items
        .into_iter()
        .filter(|item| field(item).to_lowercase().contains(&needle))
        .collect()
}
