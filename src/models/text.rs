//! Text model (multilingual E5) for label embeddings

use anyhow::{Context, Result};
use ort::session::Session;
use std::path::Path;
use tokenizers::Tokenizer;

use crate::config::{MAX_TOKENS, QUERY_PREFIX};
use crate::core::Embedding;
use crate::runtime::Provider;

pub struct TextModel {
    session: Session,
    tokenizer: Tokenizer,
    provider: &'static str,
}

impl TextModel {
    pub fn load(model_path: &Path, tokenizer_path: &Path, provider: Provider) -> Result<Self> {
        let (session, provider) = crate::runtime::create_session(model_path, provider)
            .context("Failed to load text model")?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        Ok(Self { session, tokenizer, provider })
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    pub fn encode(&mut self, text: &str) -> Result<Embedding> {
        let prefixed = format!("{}{}", QUERY_PREFIX, text);
        let encoding = self.tokenizer.encode(prefixed, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let mut input_ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
        let mut mask: Vec<i64> = encoding.get_attention_mask().iter().map(|&x| x as i64).collect();
        input_ids.truncate(MAX_TOKENS);
        mask.truncate(MAX_TOKENS);

        let len = input_ids.len();
        let ids_value = ort::value::Value::from_array((vec![1, len], input_ids))?;
        let mask_value = ort::value::Value::from_array((vec![1, len], mask.clone()))?;

        let outputs = self.session.run(ort::inputs![
            "input_ids" => ids_value,
            "attention_mask" => mask_value
        ])?;
        let pooled = mean_pool(&outputs, &mask)?;

        Ok(Embedding::new(pooled))
    }
}

/// Masked mean over `last_hidden_state` [1, tokens, dim]
fn mean_pool(outputs: &ort::session::SessionOutputs, mask: &[i64]) -> Result<Vec<f32>> {
    let hidden = outputs.get("last_hidden_state")
        .context("No last_hidden_state output found")?;

    let (shape, data) = hidden.try_extract_tensor::<f32>()?;
    let dims: Vec<usize> = shape.iter().map(|&x| x as usize).collect();

    match dims.as_slice() {
        [1, n, dim] => {
            let mut pooled = vec![0.0f32; *dim];
            let mut count = 0.0f32;
            for t in 0..*n {
                if mask.get(t).copied().unwrap_or(0) == 0 {
                    continue;
                }
                count += 1.0;
                for j in 0..*dim {
                    pooled[j] += data[t * dim + j];
                }
            }
            if count > 0.0 {
                pooled.iter_mut().for_each(|v| *v /= count);
            }
            Ok(pooled)
        }
        // Already pooled
        [1, _] => Ok(data.to_vec()),
        other => anyhow::bail!("Unexpected hidden state shape: {:?}", other),
    }
}
