//! Prompt construction for the ranking oracle.

use data_loader::CatalogItem;
use sources::UserContext;
use std::fmt::Write;

pub const SYSTEM_PROMPT: &str = "You are a book recommendation assistant for a reading app. \
You rank candidate books for a single reader based on their history. \
You answer only with candidate ids.";

/// Full user-turn prompt: three labeled interaction lists, the id-tagged
/// candidate list, and the answer format.
pub fn build_prompt(context: &UserContext, catalog: &[CatalogItem], limit: usize) -> String {
    let mut prompt = String::new();

    section(
        &mut prompt,
        "Books the reader LIKED. Favor candidates that share these genres and authors:",
        &context.liked,
    );
    section(
        &mut prompt,
        "Books the reader DISLIKED. Penalize and avoid candidates with these genres and authors:",
        &context.disliked,
    );
    section(
        &mut prompt,
        "Books the reader COMPLETED. Treat them as additional taste signal:",
        &context.completed,
    );

    prompt.push_str("Candidate books. Choose only from these ids:\n");
    for item in catalog {
        let _ = writeln!(prompt, "[{}] {}", item.id, describe(item));
    }
    prompt.push('\n');

    let _ = write!(
        prompt,
        "Reply with the ids of the {} best candidates for this reader, best first, \
         as a comma-separated list of numbers and nothing else.",
        limit
    );
    prompt
}

fn section(prompt: &mut String, heading: &str, items: &[CatalogItem]) {
    prompt.push_str(heading);
    prompt.push('\n');
    if items.is_empty() {
        prompt.push_str("- (none)\n");
    }
    for item in items {
        let _ = writeln!(prompt, "- {}", describe(item));
    }
    prompt.push('\n');
}

fn describe(item: &CatalogItem) -> String {
    let genres = item.genres.trim();
    if genres.is_empty() {
        format!("\"{}\" by {}", item.title, item.author)
    } else {
        format!("\"{}\" by {} (genres: {})", item.title, item.author, genres)
    }
}
