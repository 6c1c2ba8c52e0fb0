//! # Correlation Flows
//!
//! A producer module builds a request, a consumer module answers it with a
//! response or an error, and the producer matches the answer back to its
//! request by `parent_msg_id`.
//!
//! ## Flows Tested:
//!
//! 1. **edgehub → edged → edgehub**: pod insert answered by a response
//! 2. **Root request failing**: error reply correlation under both policies
//! 3. **Fan-out**: one logical message cloned to several groups

#[cfg(test)]
mod tests {
    use super::super::init_test_logging;
    use bus_envelope::{
        resource, Envelope, EnvelopeFactory, ErrorCorrelation, ManualClock, Operation,
        SequentialIdGenerator,
    };
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Arc;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct PodStatus {
        status: String,
    }

    fn pod_insert() -> Envelope {
        Envelope::new("")
            .with_route("edgehub", "edged", resource::POD, Operation::Insert)
            .with_content(json!({ "name": "pod-1" }))
    }

    // =============================================================================
    // RESPONSE FLOW
    // =============================================================================

    #[test]
    fn test_pod_insert_response_flow() {
        init_test_logging();
        let factory = EnvelopeFactory::default();

        let a = pod_insert();
        let b = factory.new_response(&a, json!({ "status": "ok" }));

        assert_eq!(b.parent_id(), a.id());
        assert_eq!(b.operation(), Some(&Operation::Response));
        assert_eq!(b.source(), "edgehub");
        assert_eq!(b.group(), "edged");
        assert_eq!(b.resource(), "pod");
        assert_eq!(b.content(), &json!({ "status": "ok" }));
        assert_ne!(b.id(), a.id());

        // The producer decodes the reply into its own type.
        let status: PodStatus = b.decode_content().unwrap();
        assert_eq!(status.status, "ok");
    }

    #[test]
    fn test_response_timestamp_is_stamped_at_derivation() {
        let clock = Arc::new(ManualClock::new(10_000));
        let factory = EnvelopeFactory::default().with_clock(clock.clone());

        let request = factory.new_envelope("");
        clock.advance(1_500);
        let response = factory.new_response(&request, json!(null));

        assert_eq!(request.timestamp(), 10_000);
        assert_eq!(response.timestamp(), 11_500);
    }

    #[test]
    fn test_typed_response_content() {
        let request = pod_insert();
        let response = request.response(PodStatus {
            status: "running".into(),
        });
        assert_eq!(response.content().status, "running");
        assert!(response.is_reply_to(&request));

        let on_the_bus = response.into_untyped().unwrap();
        assert_eq!(on_the_bus.content(), &json!({ "status": "running" }));
    }

    // =============================================================================
    // ERROR FLOW
    // =============================================================================

    #[test]
    fn test_root_request_error_keeps_parent() {
        init_test_logging();
        let a: Envelope = Envelope::new("");
        let c: Envelope = EnvelopeFactory::default().new_error(&a, "not found");

        assert_eq!(c.parent_id(), a.parent_id());
        assert!(c.parent_id().is_empty());
        assert_eq!(c.operation(), Some(&Operation::Error));
        assert_eq!(c.content(), &json!("not found"));
    }

    #[test]
    fn test_error_of_a_reply_points_at_the_request() {
        // With the default policy an error raised while handling a reply is
        // correlated to the request that reply answered.
        let factory = EnvelopeFactory::default();
        let request = pod_insert();
        let reply = factory.new_response(&request, json!({ "status": "ok" }));

        let error: Envelope = factory.new_error(&reply, "decode failed");
        assert!(error.is_reply_to(&request));
        assert_eq!(error.resource(), "pod");
        assert_eq!(error.source(), "");
        assert_eq!(error.group(), "");
    }

    #[test]
    fn test_origin_policy_correlates_error_to_failing_message() {
        let factory = EnvelopeFactory::default().with_error_correlation(ErrorCorrelation::Origin);
        let request = pod_insert();

        let error: Envelope<String> = factory.new_error(&request, "quota exceeded");
        assert!(error.is_reply_to(&request));
        assert!(error.is_error());
        assert_eq!(error.content(), "quota exceeded");
    }

    // =============================================================================
    // FAN-OUT
    // =============================================================================

    #[test]
    fn test_clone_twice_for_fan_out() {
        init_test_logging();
        let factory = EnvelopeFactory::default()
            .with_id_generator(Arc::new(SequentialIdGenerator::new("fan")));
        let a = factory
            .new_envelope("upstream")
            .with_route("edgehub", "edged", resource::POD, Operation::Update)
            .with_content(json!({ "name": "pod-1", "image": "nginx" }));

        let first = factory.clone_envelope(&a);
        let second = factory.clone_envelope(&a);

        let ids: HashSet<_> = [a.id(), first.id(), second.id()].into_iter().collect();
        assert_eq!(ids.len(), 3);

        for clone in [&first, &second] {
            assert_eq!(clone.parent_id(), a.parent_id());
            assert_eq!(clone.timestamp(), a.timestamp());
            assert_eq!(clone.route(), a.route());
            assert_eq!(clone.content(), a.content());
            // A clone is not a reply.
            assert!(!clone.is_reply_to(&a));
        }
        assert_eq!(first.route(), second.route());
        assert_eq!(first.content(), second.content());
    }

    #[test]
    fn test_clone_then_reroute_leaves_original_untouched() {
        let a = pod_insert();
        let rerouted = a.duplicate().with_source("edgehub", "metamanager");

        assert_eq!(a.group(), "edged");
        assert_eq!(rerouted.group(), "metamanager");
        assert_eq!(rerouted.resource(), a.resource());
    }
}
