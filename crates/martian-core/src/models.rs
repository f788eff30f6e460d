//! The catalog of models the Martian API can route to and judge with.
//!
//! Model identifiers are "{provider}/{vendor}/{model}" strings. The catalog
//! is advisory: the server accepts any identifier it knows about, and this
//! list tracks the publicly documented set.

// OpenAI models
pub const GPT_4_5_PREVIEW: &str = "openai/openai/gpt-4.5-preview";
pub const GPT_4_1: &str = "openai/openai/gpt-4.1";
pub const GPT_4_1_MINI: &str = "openai/openai/gpt-4.1-mini";
pub const GPT_4_1_NANO: &str = "openai/openai/gpt-4.1-nano";
pub const GPT_4O: &str = "openai/openai/gpt-4o";
pub const GPT_4O_MINI: &str = "openai/openai/gpt-4o-mini";

// Anthropic models
pub const CLAUDE_3_OPUS: &str = "anthropic/anthropic/claude-3-opus-latest";
pub const CLAUDE_3_5_HAIKU: &str = "anthropic/anthropic/claude-3-5-haiku-latest";
pub const CLAUDE_3_5_SONNET: &str = "anthropic/anthropic/claude-3-5-sonnet-latest";
pub const CLAUDE_3_7_SONNET: &str = "anthropic/anthropic/claude-3-7-sonnet-latest";

// Together models
pub const DEEPSEEK_R1: &str = "together/deepseek-ai/DeepSeek-R1";
pub const DEEPSEEK_V3: &str = "together/deepseek-ai/DeepSeek-V3";
pub const MISTRAL_SMALL_24B: &str = "together/mistralai/Mistral-Small-24B-Instruct-2501";
pub const NEMOTRON_70B: &str = "together/nvidia/Llama-3.1-Nemotron-70B-Instruct-HF";
pub const LLAMA_3_3_70B: &str = "together/meta-llama/Llama-3.3-70B-Instruct-Turbo";
pub const LLAMA_3_1_405B: &str = "together/meta-llama/Meta-Llama-3.1-405B-Instruct-Turbo";
pub const QWEN_72B: &str = "together/Qwen/Qwen2.5-72B-Instruct-Turbo";
pub const QWEN_CODER_32B: &str = "together/Qwen/Qwen2.5-Coder-32B-Instruct";
pub const GEMMA_2_27B: &str = "together/google/gemma-2-27b-it";

// Gemini models
pub const GEMINI_1_5_FLASH: &str = "gemini/gemini/gemini-1.5-flash";
pub const GEMINI_1_5_FLASH_8B: &str = "gemini/gemini/gemini-1.5-flash-8b";
pub const GEMINI_1_5_FLASH_8B_LATEST: &str = "gemini/gemini/gemini-1.5-flash-8b-latest";
pub const GEMINI_1_5_FLASH_LATEST: &str = "gemini/gemini/gemini-1.5-flash-latest";
pub const GEMINI_1_5_PRO: &str = "gemini/gemini/gemini-1.5-pro";
pub const GEMINI_1_5_PRO_LATEST: &str = "gemini/gemini/gemini-1.5-pro-latest";
pub const GEMINI_2_0_FLASH: &str = "gemini/gemini/gemini-2.0-flash";

/// Models served through OpenAI.
pub const OPENAI_MODELS: &[&str] = &[
    GPT_4_5_PREVIEW,
    GPT_4_1,
    GPT_4_1_MINI,
    GPT_4_1_NANO,
    GPT_4O,
    GPT_4O_MINI,
];

/// Models served through Anthropic.
pub const ANTHROPIC_MODELS: &[&str] = &[
    CLAUDE_3_OPUS,
    CLAUDE_3_5_HAIKU,
    CLAUDE_3_5_SONNET,
    CLAUDE_3_7_SONNET,
];

/// Models served through Together.
pub const TOGETHER_MODELS: &[&str] = &[
    DEEPSEEK_R1,
    DEEPSEEK_V3,
    MISTRAL_SMALL_24B,
    NEMOTRON_70B,
    LLAMA_3_3_70B,
    LLAMA_3_1_405B,
    QWEN_72B,
    QWEN_CODER_32B,
    GEMMA_2_27B,
];

/// Models served through Gemini.
pub const GEMINI_MODELS: &[&str] = &[
    GEMINI_1_5_FLASH,
    GEMINI_1_5_FLASH_8B,
    GEMINI_1_5_FLASH_8B_LATEST,
    GEMINI_1_5_FLASH_LATEST,
    GEMINI_1_5_PRO,
    GEMINI_1_5_PRO_LATEST,
    GEMINI_2_0_FLASH,
];

/// Every model in the catalog.
pub fn all_models() -> impl Iterator<Item = &'static str> {
    OPENAI_MODELS
        .iter()
        .chain(ANTHROPIC_MODELS)
        .chain(TOGETHER_MODELS)
        .chain(GEMINI_MODELS)
        .copied()
}

/// Whether a model identifier is in the catalog.
pub fn is_cataloged(model: &str) -> bool {
    all_models().any(|m| m == model)
}
