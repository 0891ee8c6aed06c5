//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allow cross-origin requests from any origin (browser frontends)
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors: true,
        }
    }
}

/// Resource limits to protect against problematic inputs and slow upstreams.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in megabytes (base64 inflates images by ~4/3)
    pub max_payload_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,

    /// Longest side of the image uploaded for captioning; larger images are downscaled
    pub caption_max_dimension: u32,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// Captioning call timeout in milliseconds
    pub caption_timeout_ms: u64,

    /// LLM call timeout in milliseconds
    pub llm_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_payload_mb: 20,
            max_image_dimension: 10000,
            caption_max_dimension: 1024,
            decode_timeout_ms: 5000,
            caption_timeout_ms: 60000,
            llm_timeout_ms: 60000,
        }
    }
}

impl LimitsConfig {
    /// Request body limit in bytes.
    pub fn max_payload_bytes(&self) -> usize {
        (self.max_payload_mb as usize).saturating_mul(1024 * 1024)
    }
}

/// Captioning provider configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptioningConfig {
    /// Active provider: "huggingface" or "ollama"
    pub provider: String,

    /// HuggingFace Inference API configuration
    pub huggingface: Option<HuggingFaceConfig>,

    /// Ollama (local vision model) configuration
    pub ollama: Option<OllamaCaptionConfig>,
}

impl Default for CaptioningConfig {
    fn default() -> Self {
        Self {
            provider: "huggingface".to_string(),
            huggingface: None,
            ollama: None,
        }
    }
}

/// HuggingFace Inference API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HuggingFaceConfig {
    /// Base URL of the inference API; the model id is appended
    pub endpoint: String,

    /// API token (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Image-to-text model id
    pub model: String,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co/models".to_string(),
            api_key: "${HF_API_TOKEN}".to_string(),
            model: "Salesforce/blip-image-captioning-large".to_string(),
        }
    }
}

/// Ollama captioning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaCaptionConfig {
    /// Ollama API endpoint
    pub endpoint: String,

    /// Vision model name
    pub model: String,
}

impl Default for OllamaCaptionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llava".to_string(),
        }
    }
}

/// LLM provider configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Active provider: "openai", "anthropic" or "ollama"
    pub provider: String,

    /// OpenAI configuration
    pub openai: Option<OpenAiConfig>,

    /// Anthropic configuration
    pub anthropic: Option<AnthropicConfig>,

    /// Ollama (local) configuration
    pub ollama: Option<OllamaConfig>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            openai: None,
            anthropic: None,
            ollama: None,
        }
    }
}

/// OpenAI (or OpenAI-compatible) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API base URL; point at any Chat Completions compatible service
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4".to_string(),
        }
    }
}

/// Anthropic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: "${ANTHROPIC_API_KEY}".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
        }
    }
}

/// Ollama LLM configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Ollama API endpoint
    pub endpoint: String,

    /// Model name
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
        }
    }
}

/// Analysis pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Token cap for the enhanced description call
    pub description_max_tokens: u32,

    /// Token cap for the precautions call
    pub precautions_max_tokens: u32,

    /// Sampling temperature for both LLM calls. Unset uses the provider default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Seed for the severity fallback RNG. Unset means unseeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity_seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            description_max_tokens: 200,
            precautions_max_tokens: 150,
            temperature: None,
            severity_seed: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
