/// Generative API configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    /// Bearer token for the generative API.
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API (no trailing slash).
    pub base_url: String,
    /// Model used for image generation.
    pub image_model: String,
    /// Square image size requested from the image endpoint.
    pub image_size: String,
    /// Model used for chat completions.
    pub chat_model: String,
}

impl GenAiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default                     |
    /// |---------------------|-----------------------------|
    /// | `GENAI_API_KEY`     | (required)                  |
    /// | `GENAI_BASE_URL`    | `https://api.openai.com/v1` |
    /// | `GENAI_IMAGE_MODEL` | `dall-e-2`                  |
    /// | `GENAI_IMAGE_SIZE`  | `1024x1024`                 |
    /// | `GENAI_CHAT_MODEL`  | `gpt-5-nano`                |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GENAI_API_KEY").expect("GENAI_API_KEY must be set");

        let base_url = std::env::var("GENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".into())
            .trim_end_matches('/')
            .to_string();

        let image_model =
            std::env::var("GENAI_IMAGE_MODEL").unwrap_or_else(|_| "dall-e-2".into());

        let image_size = std::env::var("GENAI_IMAGE_SIZE").unwrap_or_else(|_| "1024x1024".into());

        let chat_model = std::env::var("GENAI_CHAT_MODEL").unwrap_or_else(|_| "gpt-5-nano".into());

        Self {
            api_key,
            base_url,
            image_model,
            image_size,
            chat_model,
        }
    }
}
