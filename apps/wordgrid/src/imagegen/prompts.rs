// Prompt constants for the image generator.

/// Default text-to-image prompt. Replace `{words}` before sending.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "A symbolic illustration representing the concepts of '{words}', \
    minimalist art style, clean lines, symbolic representation, \
    digital art, concept art, highly detailed, 8k resolution";

/// Negative prompt sent with every request.
pub const NEGATIVE_PROMPT: &str = "ugly, blurry, low quality, distorted, deformed, \
    text, watermark, signature, nsfw, explicit";

pub const WORDS_PLACEHOLDER: &str = "{words}";
