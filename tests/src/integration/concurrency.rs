//! # Concurrent Construction
//!
//! Ids must stay unique when many threads build envelopes at once with no
//! coordination between them.

#[cfg(test)]
mod tests {
    use bus_envelope::{generate_id, Envelope, EnvelopeFactory, SequentialIdGenerator};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    const THREADS: usize = 8;
    const PER_THREAD: usize = 1_000;

    fn collect_ids<F>(make: F) -> HashSet<String>
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        let make = Arc::new(make);
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let make = Arc::clone(&make);
                thread::spawn(move || (0..PER_THREAD).map(|_| make()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(!id.is_empty());
                assert!(seen.insert(id), "duplicate id generated");
            }
        }
        seen
    }

    #[test]
    fn test_uuid_ids_unique_across_threads() {
        let ids = collect_ids(|| generate_id().into_string());
        assert_eq!(ids.len(), THREADS * PER_THREAD);
    }

    #[test]
    fn test_fresh_envelopes_unique_across_threads() {
        let ids = collect_ids(|| {
            let msg: Envelope = Envelope::new("shared-parent");
            assert_ne!(msg.id(), msg.parent_id());
            msg.id().to_string()
        });
        assert_eq!(ids.len(), THREADS * PER_THREAD);
        assert!(!ids.contains("shared-parent"));
    }

    #[test]
    fn test_shared_factory_clones_unique_across_threads() {
        let factory = Arc::new(
            EnvelopeFactory::default()
                .with_id_generator(Arc::new(SequentialIdGenerator::new("par"))),
        );
        let original = Arc::new(factory.new_envelope(""));

        let ids = collect_ids(move || factory.clone_envelope(&original).id().to_string());
        assert_eq!(ids.len(), THREADS * PER_THREAD);
    }
}
