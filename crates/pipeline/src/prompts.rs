//! Fixed prompt templates for the three enrichment stages.
//!
//! Wording is part of the product behavior (tone, reading level, output
//! language), so the templates live in one place rather than inline at the
//! call sites.

/// Prompt for the image stage. The original drawing URL is embedded as
/// context only; the image model does not fetch it.
pub fn image_prompt(original_image_url: &str) -> String {
    format!(
        "Generate a cute monster illustration as if it is based on a child's drawing.\n\
         Make it colorful and imaginative, suitable for a children's monster encyclopedia.\n\
         (Note: The original drawing URL is {original_image_url}, but treat this only as context.)"
    )
}

/// Prompt for the metadata stage. Requests strict JSON with exactly the
/// keys the stage parses.
pub fn profile_prompt(original_image_url: &str, ai_image_url: &str) -> String {
    format!(
        "You are an expert children's monster encyclopedia creator.\n\
         \n\
         Based on the child's drawing and the AI-generated monster image:\n\
         \n\
         Original Drawing: {original_image_url}\n\
         AI Image: {ai_image_url}\n\
         \n\
         Generate the following information in JSON:\n\
         \n\
         {{\n\
           \"monster_name\": string,\n\
           \"description\": string,\n\
           \"traits\": string\n\
         }}\n\
         \n\
         Rules:\n\
         - Make the monster name unique, cute, and kid-friendly.\n\
         - Description should be 1~2 sentences, simple enough for a 6-year-old.\n\
         - Traits is a short summary of personality or special ability.\n\
         - Respond with the JSON object only, no surrounding text."
    )
}

/// Prompt for the story stage. The protagonist name is caller-supplied.
pub fn story_prompt(child_name: &str, monster_name: &str, description: &str) -> String {
    format!(
        "You are a children's storyteller.\n\
         \n\
         Create a short, warm, exciting story about a child and a monster.\n\
         \n\
         Child name: {child_name}\n\
         Monster name: {monster_name}\n\
         Monster description: {description}\n\
         \n\
         Constraints:\n\
         - Write in Korean\n\
         - 8~12 sentences\n\
         - Easy enough for a 6-year-old to understand\n\
         - Friendly, heartwarming, adventurous tone"
    )
}
