//! Multi-event processing.

use crate::candidate::Candidate;
use crate::pipeline::{Decision, EventProcessor};
use crate::score::Scorer;
use crate::trace::{stage, trace_event, trace_span};
use crate::util::W3PiResult;

impl<S: Scorer + Sync> EventProcessor<S> {
    /// Processes independent events, returning one result per event in input order.
    ///
    /// With the `rayon` feature and `parallel = true` events run on the rayon
    /// pool; the results are identical to the sequential path.
    pub fn process_batch<E>(&self, events: &[E]) -> Vec<W3PiResult<Decision>>
    where
        E: AsRef<[Candidate]> + Sync,
    {
        let _span = trace_span!(stage::BATCH, events = events.len()).entered();

        #[cfg(feature = "rayon")]
        if self.config().parallel {
            use rayon::prelude::*;
            let out: Vec<_> = events.par_iter().map(|e| self.process(e.as_ref())).collect();
            trace_event!("batch_done", parallel = true);
            return out;
        }

        let out: Vec<_> = events.iter().map(|e| self.process(e.as_ref())).collect();
        trace_event!("batch_done", parallel = false);
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::candidate::{Candidate, ParticleId};
    use crate::pipeline::{EventProcessor, PipelineConfig};
    use crate::triplet::FeatureVector;

    #[test]
    fn batch_matches_single_event_calls() {
        let by_mass = |f: &FeatureVector| f[2];
        let processor = EventProcessor::new(PipelineConfig::default(), by_mass).unwrap();
        let events: Vec<Vec<Candidate>> = (0..4)
            .map(|e| {
                (0..6)
                    .map(|i| {
                        let pid = if (i + e) % 2 == 0 {
                            ParticleId::HadronPlus
                        } else {
                            ParticleId::HadronMinus
                        };
                        let pt = 3.0 + (i * 7 + e) as f32;
                        Candidate::from_physical(pt, 0.2, i as f32, pid, 0.0)
                    })
                    .collect()
            })
            .collect();
        let batch = processor.process_batch(&events);
        assert_eq!(batch.len(), events.len());
        for (event, result) in events.iter().zip(&batch) {
            assert_eq!(result, &processor.process(event));
        }
    }
}
