use crate::models::{Post, ScrapedPage};
use crate::options::{variation_label, GenerationOptions, Platform};

pub const DEFAULT_AUDIENCE: &str = "a general audience";
pub const NO_CTA: &str = "None provided";
pub const NO_CUSTOM_INSTRUCTIONS: &str = "None";

/// Builds the single instruction block sent to the model.
pub fn build_prompt(page: &ScrapedPage, options: &GenerationOptions, existing_posts: &[Post]) -> String {
    let mut prompt = String::with_capacity(page.body_text.len() + 4096);

    prompt.push_str(
        "You are an expert social media strategist. Your task is to generate a set of social media posts \
         based on the provided website content, tailored to specific requirements.\n\n",
    );
    prompt.push_str("**CRITICAL INSTRUCTIONS:**\n");

    let image_key = if options.include_image_prompt {
        " and \"imagePrompt\" (a one-sentence description of an image that would accompany the post)"
    } else {
        ""
    };
    push_line(&mut prompt, &format!(
        "1. **OUTPUT FORMAT:** Your entire response MUST be a single, valid JSON object. The object must have a key \
         \"scrapedSummary\" containing a brief, one-sentence summary of the provided content, and a key \"posts\" which \
         is an array of objects. Each object in the \"posts\" array must have the keys \"variation\" (the requested post \
         type it satisfies), \"content\" (the post text) and \"engagementScore\" (your estimate from 1 to 100 of how \
         well the post will perform){image_key}. Do not wrap the JSON in Markdown."
    ));
    prompt.push_str(
        "2. **LANGUAGE STYLE:** Use clear, simple, and direct language. Avoid jargon and overly complex words. \
         The tone should be natural and easy to understand.\n",
    );
    push_line(&mut prompt, &format!("3. **LANGUAGE:** Write all posts in {}.", options.language.label()));
    push_line(&mut prompt, &format!("4. **TONE:** Adopt a '{}' tone.", options.tone.label()));

    push_line(&mut prompt, &format!(
        "5. **PLATFORM OPTIMIZATION:** Tailor each post's content and length for the specified platform: '{}'.",
        options.platform.label()
    ));
    for platform in Platform::ALL {
        push_line(&mut prompt, &format!("   - For '{}': {}", platform.label(), platform.formatting_rule()));
    }

    push_line(&mut prompt, &format!("6. **HASHTAGS:** {}", options.hashtag_strategy.policy()));
    push_line(&mut prompt, &format!(
        "7. **AUDIENCE:** Write for {}.",
        options.audience.as_deref().unwrap_or(DEFAULT_AUDIENCE)
    ));
    push_line(&mut prompt, &format!(
        "8. **CALL TO ACTION:** {}",
        options.cta.as_deref().unwrap_or(NO_CTA)
    ));
    push_line(&mut prompt, &format!(
        "9. **CUSTOM INSTRUCTIONS:** {}",
        options.custom_instructions.as_deref().unwrap_or(NO_CUSTOM_INSTRUCTIONS)
    ));

    let count = options.post_variations.len();
    let noun = if count == 1 { "variation" } else { "variations" };
    push_line(&mut prompt, &format!(
        "10. **POST VARIATIONS:** Generate exactly one post for EACH of the following {count} requested {noun}, \
         using the variation id as the \"variation\" value:"
    ));
    for variation in &options.post_variations {
        match variation_label(variation) {
            Some(label) => push_line(&mut prompt, &format!("   - \"{variation}\" ({label})")),
            None => push_line(&mut prompt, &format!("   - \"{variation}\"")),
        }
    }

    if !existing_posts.is_empty() {
        prompt.push_str(
            "11. **AVOID REPETITION:** These posts already exist. Do not repeat them or write close paraphrases:\n",
        );
        for post in existing_posts {
            push_line(&mut prompt, &format!("   - {}", post.content.replace('\n', " ")));
        }
    }

    prompt.push_str("\n**Website Content to Analyze:**\n");
    push_line(&mut prompt, &format!("Title: {}", page.title));
    push_line(&mut prompt, &format!("Description: {}", page.description));
    push_line(&mut prompt, &format!("Body Content Preview: {}", page.body_text));

    prompt
}

fn push_line(prompt: &mut String, line: &str) {
    prompt.push_str(line);
    prompt.push('\n');
}
