//! Prometheus metrics setup and metric definitions

use metrics::{counter, describe_counter, describe_histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const REGISTRATIONS_TOTAL: &str = "donor_registrations_total";
pub const REGISTRATION_FAILURES_TOTAL: &str = "donor_registration_failures_total";
pub const ATTRIBUTE_WRITE_FAILURES_TOTAL: &str = "donor_attribute_write_failures_total";
pub const AGGREGATE_QUERY_DURATION_SECONDS: &str = "donor_aggregate_query_duration_seconds";

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, BuildError> {
    // Store round-trips are usually sub-second; keep fine buckets at the low end.
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5];

    PrometheusBuilder::new()
        .set_buckets(&buckets)?
        .install_recorder()
}

/// Register metric descriptions and emit initial zero values.
pub fn describe_metrics() {
    describe_counter!(
        REGISTRATIONS_TOTAL,
        "Donor registrations by outcome (created/attached)"
    );
    describe_counter!(
        REGISTRATION_FAILURES_TOTAL,
        "Donor registrations rejected, by reason"
    );
    describe_counter!(
        ATTRIBUTE_WRITE_FAILURES_TOTAL,
        "Donor attribute writes that failed and were skipped"
    );
    describe_histogram!(
        AGGREGATE_QUERY_DURATION_SECONDS,
        "Donation aggregate query duration in seconds"
    );

    counter!(REGISTRATIONS_TOTAL, "outcome" => "created").absolute(0);
    counter!(REGISTRATIONS_TOTAL, "outcome" => "attached").absolute(0);
    counter!(REGISTRATION_FAILURES_TOTAL, "reason" => "missing_email").absolute(0);
    counter!(ATTRIBUTE_WRITE_FAILURES_TOTAL).absolute(0);
}
