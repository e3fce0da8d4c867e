//! Hashed Embedder
//!
//! Bag-of-words plus character trigrams, hashed into a fixed number of
//! buckets and L2-normalized. No model, no randomness.

use sha2::{Digest, Sha256};

use super::Embedder;
use crate::config::EmbeddingConfig;
use crate::utils::text::{is_stopword, tokenize};

#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dimensions: usize,
    trigram_weight: f32,
}

impl HashedEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            dimensions: config.dimensions.max(1),
            trigram_weight: config.trigram_weight,
        }
    }

    fn bucket(&self, feature: &str) -> usize {
        let digest = Sha256::digest(feature.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        (u64::from_le_bytes(head) % self.dimensions as u64) as usize
    }

    fn normalize(vec: &mut [f32]) {
        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in vec {
                *x /= norm;
            }
        }
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self::new(&EmbeddingConfig::default())
    }
}

impl Embedder for HashedEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dimensions];

        let tokens = tokenize(text)
            .into_iter()
            .filter(|t| t.chars().count() > 2 && !is_stopword(t));

        for token in tokens {
            vec[self.bucket(&token)] += 1.0;

            let chars: Vec<char> = token.chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                vec[self.bucket(&trigram)] += self.trigram_weight;
            }
        }

        Self::normalize(&mut vec);
        vec
    }
}
