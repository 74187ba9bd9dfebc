//! ONNX Runtime backend for sentence-transformers models.
//!
//! Mean-pooled, L2-normalized embeddings. The model directory must contain
//! `model.onnx` and `tokenizer.json` (e.g. all-MiniLM-L6-v2, 384 dims).

use std::path::Path;
use std::sync::Mutex;

use anyhow::anyhow;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::info;

use super::{cosine_similarity, TextEmbedder};
use crate::error::InitError;

const MAX_TOKENS: usize = 256;
const FALLBACK_DIM: usize = 384;

pub struct OnnxEmbedder {
    // Session::run needs exclusive access.
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dim: usize,
}

impl OnnxEmbedder {
    pub fn load(model_dir: &Path) -> Result<Self, InitError> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        for (path, file) in [(&model_path, "model.onnx"), (&tokenizer_path, "tokenizer.json")] {
            if !path.exists() {
                return Err(InitError::ModelFileMissing {
                    dir: model_dir.to_path_buf(),
                    file,
                });
            }
        }

        let load_err = |e: &dyn std::fmt::Display| InitError::Load(e.to_string());

        let session = Session::builder()
            .and_then(|b| b.commit_from_file(&model_path))
            .map_err(|e| load_err(&e))?;

        let dim = infer_dim(session.outputs()[0].dtype()).unwrap_or(FALLBACK_DIM);

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| load_err(&e))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| load_err(&e))?;
        tokenizer.with_padding(Some(tokenizers::PaddingParams::default()));

        info!(dim, model = %model_path.display(), "loaded embedding model");
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            dim,
        })
    }

    /// One normalized vector per input text.
    pub fn embed_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let batch_size = texts.len();
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow!("tokenize: {e}"))?;

        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = vec![0i64; batch_size * seq_len];
        let mut attention_mask = vec![0i64; batch_size * seq_len];
        let mut token_type_ids = vec![0i64; batch_size * seq_len];

        for (i, encoding) in encodings.iter().enumerate() {
            let offset = i * seq_len;
            for (j, &id) in encoding.get_ids().iter().enumerate() {
                input_ids[offset + j] = id as i64;
            }
            for (j, &mask) in encoding.get_attention_mask().iter().enumerate() {
                attention_mask[offset + j] = mask as i64;
            }
            for (j, &tid) in encoding.get_type_ids().iter().enumerate() {
                token_type_ids[offset + j] = tid as i64;
            }
        }

        let shape = [batch_size as i64, seq_len as i64];
        let ids_tensor = Tensor::from_array((shape, input_ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, attention_mask.clone().into_boxed_slice()))?;
        let type_tensor = Tensor::from_array((shape, token_type_ids.into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("embedding session poisoned"))?;
        let outputs = session.run(ort::inputs![
            "input_ids" => ids_tensor,
            "attention_mask" => mask_tensor,
            "token_type_ids" => type_tensor,
        ])?;

        // [batch_size, seq_len, dim]
        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        anyhow::ensure!(
            dims.len() == 3 && dims[0] as usize == batch_size && dims[2] as usize == self.dim,
            "unexpected output shape: {dims:?}, expected [{batch_size}, {seq_len}, {}]",
            self.dim
        );
        let actual_seq_len = dims[1] as usize;

        let mut embeddings = Vec::with_capacity(batch_size);
        for i in 0..batch_size {
            let mut pooled = vec![0.0f32; self.dim];
            let mut token_count = 0.0f32;

            for j in 0..actual_seq_len {
                let mask_val = attention_mask[i * seq_len + j] as f32;
                if mask_val > 0.0 {
                    let offset = (i * actual_seq_len + j) * self.dim;
                    for (d, p) in pooled.iter_mut().enumerate() {
                        *p += output_data[offset + d] * mask_val;
                    }
                    token_count += mask_val;
                }
            }

            if token_count > 0.0 {
                for p in &mut pooled {
                    *p /= token_count;
                }
            }
            normalize(&mut pooled);
            embeddings.push(pooled);
        }

        Ok(embeddings)
    }
}

impl TextEmbedder for OnnxEmbedder {
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| anyhow!("embedding model returned no vector"))
    }

    fn similarity(&self, a: &str, b: &str) -> anyhow::Result<f32> {
        let vecs = self.embed_batch(&[a, b])?;
        anyhow::ensure!(vecs.len() == 2, "expected 2 embeddings, got {}", vecs.len());
        Ok(cosine_similarity(&vecs[0], &vecs[1]))
    }
}

fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Last dimension of the model's output tensor, when static.
fn infer_dim(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}
