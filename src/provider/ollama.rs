//! Ollama model catalogue: splits pulled models into LLMs and embedding models.

/// Base names (before the `:tag`) of models used for embeddings.
pub const EMBEDDING_MODELS: &[&str] = &["nomic-embed-text"];

/// The embedding model the console requires for indexing.
pub const REQUIRED_EMBEDDING_MODEL: &str = "nomic-embed-text";

fn base_name(model: &str) -> &str {
    model.split(':').next().unwrap_or(model)
}

fn is_embedding_model(model: &str) -> bool {
    EMBEDDING_MODELS.contains(&base_name(model))
}

/// Models usable as chat LLMs
pub fn llm_models(models: &[String]) -> Vec<String> {
    models
        .iter()
        .filter(|m| !is_embedding_model(m))
        .cloned()
        .collect()
}

/// Models usable for embeddings
pub fn embedding_models(models: &[String]) -> Vec<String> {
    models
        .iter()
        .filter(|m| is_embedding_model(m))
        .cloned()
        .collect()
}

/// Catalogue of pulled Ollama models with what is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaCatalogue {
    pub llm: Vec<String>,
    pub embedding: Vec<String>,
}

impl OllamaCatalogue {
    pub fn from_models(models: &[String]) -> Self {
        Self {
            llm: llm_models(models),
            embedding: embedding_models(models),
        }
    }

    /// Operator-facing hints about models that still need pulling.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.llm.is_empty() {
            warnings.push(
                "There is no LLM model available using Ollama. Please pull one from https://ollama.com/library"
                    .to_string(),
            );
        } else if self.embedding.is_empty() {
            warnings.push(format!(
                "The embedding model {} is required. Please pull it from https://ollama.com/library/{}",
                REQUIRED_EMBEDDING_MODEL, REQUIRED_EMBEDDING_MODEL
            ));
        }
        warnings
    }
}
