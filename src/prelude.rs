pub use crate::builder::FrequencyListBuilder;
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::ds::DEFAULT_BUCKET_PREALLOC;
pub use crate::error::{FeatureNotEnabled, InvariantError};
pub use crate::frequency_list::FrequencyList;
pub use crate::iter::Iter;

#[cfg(feature = "metrics")]
pub use crate::metrics::exporter::PrometheusTextExporter;
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::FrequencyListMetricsSnapshot;
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::{MetricsExporter, MetricsReset, MetricsSnapshotProvider};
