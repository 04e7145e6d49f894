//! Beam-search decoding over a [`CausalLm`].
//!
//! Standard HF-style semantics: a fixed number of live beams, per-beam
//! log-probability accumulation, a pool of finished hypotheses ranked by
//! length-penalty-normalized score, and optional early stopping once the
//! pool is full.

use crate::error::Result;
use crate::model::CausalLm;

/// Constraints for one generation call.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Maximum total sequence length, prompt included.
    pub max_length: usize,
    /// Number of beams kept alive at each step.
    pub num_beams: usize,
    /// Stop once `num_beams` finished hypotheses exist.
    pub early_stopping: bool,
    /// Exponent applied to hypothesis length when ranking finished beams.
    pub length_penalty: f32,
    /// Token that terminates a hypothesis, if the model defines one.
    pub eos_token_id: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_length: 1024,
            num_beams: 5,
            early_stopping: true,
            length_penalty: 1.0,
            eos_token_id: None,
        }
    }
}

/// One candidate output sequence with its accumulated log-probability.
#[derive(Debug, Clone)]
pub struct BeamHypothesis {
    pub tokens: Vec<u32>,
    pub score: f32,
}

impl BeamHypothesis {
    /// Score divided by generated-length^penalty, for cross-length ranking.
    pub fn normalized_score(&self, length_penalty: f32, prompt_len: usize) -> f32 {
        let gen_len = self.tokens.len().saturating_sub(prompt_len) as f32;
        if gen_len > 0.0 {
            self.score / gen_len.powf(length_penalty)
        } else {
            self.score
        }
    }
}

/// Pool of completed hypotheses, capped at `num_beams`.
pub(crate) struct FinishedHypotheses {
    hypotheses: Vec<BeamHypothesis>,
    length_penalty: f32,
    prompt_len: usize,
    num_beams: usize,
    worst_score: f32,
}

impl FinishedHypotheses {
    pub(crate) fn new(num_beams: usize, length_penalty: f32, prompt_len: usize) -> Self {
        Self {
            hypotheses: Vec::with_capacity(num_beams),
            length_penalty,
            prompt_len,
            num_beams,
            worst_score: f32::NEG_INFINITY,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.hypotheses.len()
    }

    pub(crate) fn add(&mut self, hypothesis: BeamHypothesis) {
        if hypothesis.score == f32::NEG_INFINITY {
            return;
        }
        let score = hypothesis.normalized_score(self.length_penalty, self.prompt_len);
        if self.len() < self.num_beams || score > self.worst_score {
            self.hypotheses.push(hypothesis);
            self.hypotheses.sort_by(|a, b| {
                b.normalized_score(self.length_penalty, self.prompt_len)
                    .total_cmp(&a.normalized_score(self.length_penalty, self.prompt_len))
            });
            self.hypotheses.truncate(self.num_beams);
            self.worst_score = self
                .hypotheses
                .last()
                .map(|h| h.normalized_score(self.length_penalty, self.prompt_len))
                .unwrap_or(f32::NEG_INFINITY);
        }
    }

    /// Whether the search can stop. With early stopping the pool being full
    /// is enough; otherwise the best live beam must no longer be able to
    /// beat the worst finished hypothesis.
    pub(crate) fn is_done(&self, early_stopping: bool, best_live_score: f32, cur_len: usize) -> bool {
        if self.len() < self.num_beams {
            return false;
        }
        if early_stopping {
            return true;
        }
        let gen_len = cur_len.saturating_sub(self.prompt_len) as f32;
        let lp = if gen_len > 0.0 { gen_len.powf(self.length_penalty) } else { 1.0 };
        self.worst_score >= best_live_score / lp
    }

    pub(crate) fn best(&self) -> Option<&BeamHypothesis> {
        self.hypotheses.first()
    }
}

fn log_softmax(logits: &[f32]) -> Vec<f32> {
    let max_val = logits.iter().fold(f32::NEG_INFINITY, |acc, &x| acc.max(x));
    let exp_sum: f32 = logits.iter().map(|&x| (x - max_val).exp()).sum();
    let log_sum = exp_sum.ln();
    logits.iter().map(|&x| x - max_val - log_sum).collect()
}

fn top_k(log_probs: &[f32], k: usize) -> Vec<(u32, f32)> {
    let mut indexed: Vec<(u32, f32)> = log_probs
        .iter()
        .enumerate()
        .map(|(i, &lp)| (i as u32, lp))
        .collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed.truncate(k);
    indexed
}

/// Run beam search from `prompt`, returning the best full token sequence
/// (prompt included).
///
/// A prompt already at or past `max_length` is returned unchanged; the
/// total-length bound follows the usual `max_length` convention rather
/// than counting only new tokens.
pub fn beam_search(
    model: &mut dyn CausalLm,
    prompt: &[u32],
    config: &GenerationConfig,
) -> Result<Vec<u32>> {
    let prompt_len = prompt.len();
    if prompt_len >= config.max_length {
        return Ok(prompt.to_vec());
    }

    let num_beams = config.num_beams.max(1);

    // All beams start on the prompt; only the first carries weight so the
    // initial step does not select the same candidate num_beams times.
    let mut beams: Vec<BeamHypothesis> = (0..num_beams)
        .map(|i| BeamHypothesis {
            tokens: prompt.to_vec(),
            score: if i == 0 { 0.0 } else { f32::NEG_INFINITY },
        })
        .collect();
    let mut finished = FinishedHypotheses::new(num_beams, config.length_penalty, prompt_len);
    let mut cur_len = prompt_len;

    while cur_len < config.max_length {
        let mut candidates: Vec<(usize, u32, f32)> = Vec::with_capacity(num_beams * num_beams);
        for (beam_idx, beam) in beams.iter().enumerate() {
            if beam.score == f32::NEG_INFINITY && cur_len > prompt_len {
                continue;
            }
            let logits = model.next_token_logits(&beam.tokens)?;
            let log_probs = log_softmax(&logits);
            for (token, lp) in top_k(&log_probs, num_beams) {
                candidates.push((beam_idx, token, beam.score + lp));
            }
        }
        candidates.sort_by(|a, b| b.2.total_cmp(&a.2));

        let mut next_beams: Vec<BeamHypothesis> = Vec::with_capacity(num_beams);
        for &(beam_idx, token, score) in &candidates {
            let mut tokens = beams[beam_idx].tokens.clone();
            tokens.push(token);
            if Some(token) == config.eos_token_id {
                finished.add(BeamHypothesis { tokens, score });
            } else if next_beams.len() < num_beams {
                next_beams.push(BeamHypothesis { tokens, score });
            }
        }
        if next_beams.is_empty() {
            break;
        }
        beams = next_beams;
        cur_len += 1;

        let best_live = beams
            .iter()
            .map(|b| b.score)
            .fold(f32::NEG_INFINITY, f32::max);
        if finished.is_done(config.early_stopping, best_live, cur_len) {
            break;
        }
    }

    if let Some(best) = finished.best() {
        return Ok(best.tokens.clone());
    }

    // Nothing finished within max_length: fall back to the best live beam.
    let best = beams
        .iter()
        .max_by(|a, b| {
            a.normalized_score(config.length_penalty, prompt_len)
                .total_cmp(&b.normalized_score(config.length_penalty, prompt_len))
        })
        .cloned()
        .unwrap_or(BeamHypothesis { tokens: prompt.to_vec(), score: 0.0 });
    Ok(best.tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    const EOS: u32 = 2;

    /// Deterministic toy model over a 3-token vocabulary {0, 1, EOS}.
    ///
    /// Probabilities depend only on the last token of the context:
    ///   after 0:  P(0)=0.55, P(1)=0.45, P(EOS)~0
    ///   after runs ending 0,0: handled by `after_zero_zero`
    ///   after 1:  P(EOS)=0.9
    struct ScriptedLm;

    fn ln(p: f32) -> f32 {
        p.ln()
    }

    impl CausalLm for ScriptedLm {
        fn next_token_logits(&mut self, tokens: &[u32]) -> Result<Vec<f32>> {
            if tokens.is_empty() {
                return Err(EngineError::Inference("empty token sequence".to_string()));
            }
            let n = tokens.len();
            let last = tokens[n - 1];
            let prev = if n >= 2 { Some(tokens[n - 2]) } else { None };
            let probs = match (prev, last) {
                // Greedy trap: 0 looks best first, but the path through 1
                // reaches EOS with much higher mass.
                (None, 0) => [0.55, 0.45, 0.0001],
                (Some(0), 0) => [0.25, 0.25, 0.50],
                (_, 1) => [0.05, 0.05, 0.90],
                _ => [0.40, 0.40, 0.20],
            };
            Ok(probs.iter().map(|&p| ln(p)).collect())
        }
    }

    /// Model that never emits EOS.
    struct Chatterbox;

    impl CausalLm for Chatterbox {
        fn next_token_logits(&mut self, _tokens: &[u32]) -> Result<Vec<f32>> {
            Ok(vec![ln(0.6), ln(0.3), ln(0.1)])
        }
    }

    fn config(num_beams: usize, max_length: usize) -> GenerationConfig {
        GenerationConfig {
            max_length,
            num_beams,
            early_stopping: true,
            length_penalty: 1.0,
            eos_token_id: Some(EOS),
        }
    }

    #[test]
    fn single_beam_takes_the_greedy_path() {
        let out = beam_search(&mut ScriptedLm, &[0], &config(1, 16)).unwrap();
        // Greedy: 0 (p=.55), then EOS (p=.50 after 0,0).
        assert_eq!(out, vec![0, 0, EOS]);
    }

    #[test]
    fn wider_beam_finds_the_better_path() {
        let out = beam_search(&mut ScriptedLm, &[0], &config(2, 16)).unwrap();
        // 0,1,EOS scores .45*.90 = .405 > 0,0,EOS at .55*.50 = .275.
        assert_eq!(out, vec![0, 1, EOS]);
    }

    #[test]
    fn beam_search_is_deterministic() {
        let a = beam_search(&mut ScriptedLm, &[0], &config(5, 32)).unwrap();
        let b = beam_search(&mut ScriptedLm, &[0], &config(5, 32)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn total_length_is_capped() {
        let cfg = GenerationConfig {
            eos_token_id: None,
            ..config(3, 10)
        };
        let out = beam_search(&mut Chatterbox, &[0, 1], &cfg).unwrap();
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn prompt_at_max_length_is_returned_unchanged() {
        let prompt: Vec<u32> = vec![0; 8];
        let out = beam_search(&mut ScriptedLm, &prompt, &config(5, 8)).unwrap();
        assert_eq!(out, prompt);
    }

    #[test]
    fn model_error_propagates() {
        let err = beam_search(&mut ScriptedLm, &[], &config(2, 4)).unwrap_err();
        assert!(err.to_string().contains("empty token sequence"));
    }

    #[test]
    fn finished_pool_keeps_the_best_num_beams() {
        let mut pool = FinishedHypotheses::new(2, 1.0, 0);
        pool.add(BeamHypothesis { tokens: vec![0], score: -3.0 });
        pool.add(BeamHypothesis { tokens: vec![1], score: -1.0 });
        pool.add(BeamHypothesis { tokens: vec![2], score: -2.0 });
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.best().unwrap().tokens, vec![1]);
    }

    #[test]
    fn early_stopping_triggers_once_pool_is_full() {
        let mut pool = FinishedHypotheses::new(2, 1.0, 0);
        pool.add(BeamHypothesis { tokens: vec![0, 1], score: -1.0 });
        assert!(!pool.is_done(true, -0.5, 4));
        pool.add(BeamHypothesis { tokens: vec![0, 0], score: -1.5 });
        assert!(pool.is_done(true, -0.5, 4));
        // Without early stopping a strong live beam keeps the search open.
        assert!(!pool.is_done(false, -0.1, 4));
    }

    #[test]
    fn length_penalty_normalizes_scores() {
        let hyp = BeamHypothesis { tokens: vec![0, 1, 0, 1], score: -2.0 };
        // 2 generated tokens past the prompt, penalty 1.0 -> -2.0 / 2.
        assert!((hyp.normalized_score(1.0, 2) - (-1.0)).abs() < 1e-6);
        // Penalty 2.0 -> -2.0 / 4.
        assert!((hyp.normalized_score(2.0, 2) - (-0.5)).abs() < 1e-6);
    }
}
