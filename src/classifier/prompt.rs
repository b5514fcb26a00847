//! Prompt builder for the AI disambiguation stage.
//!
//! [`PromptBuilder`] produces either a flat prompt (Gemini `generateContent`)
//! or a `(system_msg, user_msg)` pair (OpenAI-compatible chat).  Both
//! enumerate the four taxonomy entries, describe the candidate, and ask for a
//! single JSON object `{"typeId", "typeName", "confidence"}`.

use crate::place::PlaceCandidate;
use crate::taxonomy::{CampsiteType, ClassificationResult};

// ---------------------------------------------------------------------------
// System instruction
// ---------------------------------------------------------------------------

const SYSTEM_INSTRUCTION: &str = "\
You classify accommodation listings in Thailand for a camping and glamping platform.
Listing names and addresses may be in Thai, English, or both.

Rules:
1. Choose exactly one category from the list below.
2. Camping means guests pitch or rent basic tents on a campground.
3. Glamping means furnished, upscale tents or domes with real beds.
4. Tented Resort means a resort whose rooms are permanent tent structures.
5. Bungalow means small huts, cabins, or cottages rather than tents.
6. Reply with ONLY a JSON object: {\"typeId\": <1-4>, \"typeName\": \"<name>\", \"confidence\": <0.0-1.0>}
7. Do not add explanations, markdown, or extra keys.";

const EXAMPLES: &str = "
Examples:
Listing: name=\"Khao Yai Camping Ground\", tags=[campground], price=1
Reply: {\"typeId\": 1, \"typeName\": \"Camping\", \"confidence\": 0.9}

Listing: name=\"แกลมปิ้ง ม่อนแจ่ม\", tags=[lodging], price=3
Reply: {\"typeId\": 2, \"typeName\": \"Glamping\", \"confidence\": 0.9}

Listing: name=\"Koh Kood Beach Bungalows\", tags=[lodging], price=2
Reply: {\"typeId\": 4, \"typeName\": \"Bungalow\", \"confidence\": 0.85}
";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds classification prompts.
///
/// # Example
/// ```rust
/// use campsite_classifier::classifier::PromptBuilder;
/// use campsite_classifier::place::PlaceCandidate;
///
/// let place = PlaceCandidate::new("บ้านสวนริมดอย").with_tags(["point_of_interest"]);
/// let (system, user) = PromptBuilder::new().build_chat(&place, None);
/// assert!(system.contains("Tented Resort"));
/// assert!(user.contains("บ้านสวนริมดอย"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a single flat prompt string.
    ///
    /// Structure: system instruction, categories, examples, optional
    /// heuristic hint, listing, `Reply:` cue.
    pub fn build(&self, place: &PlaceCandidate, hint: Option<&ClassificationResult>) -> String {
        let (system, user) = self.build_chat(place, hint);
        format!("{system}\n{user}")
    }

    /// Build a `(system_msg, user_msg)` pair.
    pub fn build_chat(
        &self,
        place: &PlaceCandidate,
        hint: Option<&ClassificationResult>,
    ) -> (String, String) {
        let mut system_msg = String::with_capacity(1024);
        system_msg.push_str(SYSTEM_INSTRUCTION);
        system_msg.push_str("\n\nCategories:\n");
        for ty in CampsiteType::ALL {
            system_msg.push_str(&format!("{} = {} ({})\n", ty.id(), ty.name(), ty.thai_name()));
        }

        let mut user_msg = String::with_capacity(1024);
        user_msg.push_str(EXAMPLES);
        if let Some(h) = hint {
            user_msg.push_str(&format!(
                "\nKeyword heuristic guess (low confidence): {} ({:.2})\n",
                h.type_name(),
                h.confidence()
            ));
        }
        user_msg.push_str("\nListing:\n");
        user_msg.push_str(&describe(place));
        user_msg.push_str("\nReply:\n");

        (system_msg, user_msg)
    }
}

/// One `key: value` line per known attribute; absent fields are omitted.
fn describe(place: &PlaceCandidate) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(&format!("name: {}\n", place.name.trim()));
    if !place.formatted_address.trim().is_empty() {
        out.push_str(&format!("address: {}\n", place.formatted_address.trim()));
    }
    if !place.category_tags.is_empty() {
        out.push_str(&format!("tags: [{}]\n", place.category_tags.join(", ")));
    }
    if let Some(p) = place.price_level {
        out.push_str(&format!("price level (0-4): {p}\n"));
    }
    if let Some(r) = place.rating {
        out.push_str(&format!("rating (0-5): {r:.1}\n"));
    }
    if let Some(n) = place.user_ratings_total {
        out.push_str(&format!("reviews: {n}\n"));
    }
    out.push_str(&format!("photos: {}\n", place.photo_count));
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlaceCandidate {
        PlaceCandidate::new("ไร่องุ่น วิวดอย")
            .with_address("Mon Chaem, Chiang Mai")
            .with_tags(["point_of_interest", "establishment"])
            .with_price_level(2)
            .with_rating(4.4)
            .with_user_ratings_total(87)
            .with_photo_count(6)
    }

    #[test]
    fn system_msg_lists_all_categories() {
        let (system, _) = PromptBuilder::new().build_chat(&sample(), None);
        assert!(system.contains("1 = Camping"));
        assert!(system.contains("2 = Glamping"));
        assert!(system.contains("3 = Tented Resort"));
        assert!(system.contains("4 = Bungalow"));
        assert!(system.contains("บังกะโล"), "Thai glosses must be present");
        assert!(system.contains("JSON"));
    }

    #[test]
    fn user_msg_describes_candidate() {
        let (_, user) = PromptBuilder::new().build_chat(&sample(), None);
        assert!(user.contains("name: ไร่องุ่น วิวดอย"));
        assert!(user.contains("address: Mon Chaem, Chiang Mai"));
        assert!(user.contains("tags: [point_of_interest, establishment]"));
        assert!(user.contains("price level (0-4): 2"));
        assert!(user.contains("rating (0-5): 4.4"));
        assert!(user.contains("reviews: 87"));
        assert!(user.contains("photos: 6"));
        assert!(user.trim_end().ends_with("Reply:"));
    }

    #[test]
    fn absent_fields_are_omitted() {
        let (_, user) = PromptBuilder::new().build_chat(&PlaceCandidate::new("X"), None);
        let listing = user.rsplit("Listing:").next().unwrap();
        assert!(!listing.contains("address:"));
        assert!(!listing.contains("tags:"));
        assert!(!listing.contains("price level"));
        assert!(!listing.contains("rating"));
    }

    #[test]
    fn hint_is_embedded_when_given() {
        let hint = ClassificationResult::new(CampsiteType::Camping, 0.3);
        let (_, user) = PromptBuilder::new().build_chat(&sample(), Some(&hint));
        assert!(user.contains("heuristic guess (low confidence): Camping (0.30)"));

        let (_, without) = PromptBuilder::new().build_chat(&sample(), None);
        assert!(!without.contains("heuristic guess"));
    }

    #[test]
    fn flat_prompt_contains_all_sections() {
        let prompt = PromptBuilder::new().build(&sample(), None);
        assert!(prompt.contains("Categories:"));
        assert!(prompt.contains("Examples:"));
        assert!(prompt.contains("ไร่องุ่น วิวดอย"));
        assert!(prompt.contains("Reply:"));
    }
}
