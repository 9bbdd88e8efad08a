mod logs;
mod metrics;
mod otel;
mod service_tracer;
mod shutdown;

pub use self::logs::init_logger;
pub use self::metrics::{Method, Metrics, Status, SystemMetrics, run_metrics_collector};
pub use self::otel::{Telemetry, TracingContext};
pub use self::service_tracer::ServiceTracer;
pub use self::shutdown::shutdown_signal;
