//! Genre tokenization and per-reader genre profiles.
//!
//! Every place that compares genre text goes through `tokenize_genres`.

use data_loader::{CatalogItem, ItemId};
use std::collections::{HashMap, HashSet};

/// Split a genre tag string on commas, trim, lowercase, drop empties.
///
/// Duplicate tokens are kept in order; callers that need a set dedupe.
pub fn tokenize_genres(genres: &str) -> Vec<String> {
    genres
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Distinct tokens of one item, first occurrence order
pub fn distinct_genres(item: &CatalogItem) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize_genres(&item.genres)
        .into_iter()
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// Liked-genre ranking and disliked-genre set derived from one reader's
/// interactions.
#[derive(Debug, Clone, Default)]
pub struct GenreProfile {
    /// Liked genres, most frequent first; ties keep first-seen order
    ranking: Vec<(String, usize)>,
    disliked_genres: HashSet<String>,
    disliked_ids: HashSet<ItemId>,
}

impl GenreProfile {
    pub fn from_items(liked: &[CatalogItem], disliked: &[CatalogItem]) -> Self {
        let mut first_seen: HashMap<String, usize> = HashMap::new();
        let mut ranking: Vec<(String, usize)> = Vec::new();

        for token in liked.iter().flat_map(|item| tokenize_genres(&item.genres)) {
            match first_seen.get(&token) {
                Some(&idx) => ranking[idx].1 += 1,
                None => {
                    first_seen.insert(token.clone(), ranking.len());
                    ranking.push((token, 1));
                }
            }
        }
        // Stable: equal counts keep first-seen order
        ranking.sort_by(|a, b| b.1.cmp(&a.1));

        let disliked_genres = disliked
            .iter()
            .flat_map(|item| tokenize_genres(&item.genres))
            .collect();
        let disliked_ids = disliked.iter().map(|item| item.id).collect();

        Self {
            ranking,
            disliked_genres,
            disliked_ids,
        }
    }

    /// No liked and no disliked signal at all
    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty() && self.disliked_genres.is_empty() && self.disliked_ids.is_empty()
    }

    /// Number of distinct liked genres
    pub fn liked_genre_count(&self) -> usize {
        self.ranking.len()
    }

    /// Top `n` liked genres with their like counts
    pub fn top_genres(&self, n: usize) -> &[(String, usize)] {
        &self.ranking[..n.min(self.ranking.len())]
    }

    /// `N - rank_index` for a liked genre, 0 for anything else
    pub fn affinity(&self, genre: &str) -> i64 {
        let n = self.ranking.len();
        self.ranking
            .iter()
            .position(|(g, _)| g == genre)
            .map(|idx| (n - idx) as i64)
            .unwrap_or(0)
    }

    pub fn is_disliked_genre(&self, genre: &str) -> bool {
        self.disliked_genres.contains(genre)
    }

    pub fn is_disliked_item(&self, id: ItemId) -> bool {
        self.disliked_ids.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: ItemId, genres: &str) -> CatalogItem {
        CatalogItem::new(id, format!("Book {}", id), "Author", genres)
    }

    #[test]
    fn test_tokenize_trims_and_lowercases() {
        assert_eq!(
            tokenize_genres("  Sci-Fi ,Fantasy,, , ROMANCE "),
            vec!["sci-fi", "fantasy", "romance"]
        );
        assert!(tokenize_genres("").is_empty());
        assert!(tokenize_genres(" , ,").is_empty());
    }

    #[test]
    fn test_distinct_genres_dedupes() {
        assert_eq!(distinct_genres(&item(1, "Drama, drama ,Noir")), vec!["drama", "noir"]);
    }

    #[test]
    fn test_ranking_by_frequency_then_first_seen() {
        let liked = vec![
            item(1, "fantasy, horror"),
            item(2, "horror, sci-fi"),
            item(3, "sci-fi"),
            item(4, "mystery"),
        ];
        let profile = GenreProfile::from_items(&liked, &[]);

        // horror and sci-fi both appear twice; horror was seen first
        let names: Vec<&str> = profile.top_genres(5).iter().map(|(g, _)| g.as_str()).collect();
        assert_eq!(names, vec!["horror", "sci-fi", "fantasy", "mystery"]);

        assert_eq!(profile.affinity("horror"), 4);
        assert_eq!(profile.affinity("sci-fi"), 3);
        assert_eq!(profile.affinity("mystery"), 1);
        assert_eq!(profile.affinity("western"), 0);
    }

    #[test]
    fn test_disliked_genres_and_ids() {
        let profile = GenreProfile::from_items(&[], &[item(7, "Romance, Drama")]);

        assert!(profile.is_disliked_genre("romance"));
        assert!(profile.is_disliked_genre("drama"));
        assert!(profile.is_disliked_item(7));
        assert!(!profile.is_empty());
        assert_eq!(profile.liked_genre_count(), 0);
    }
}
