use async_trait::async_trait;
use strum::Display;
use tracing::info;

/// Destinations the core can ask the hosting shell to show. The shell owns
/// the actual routes and URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum NavTarget {
    Dashboard,
    GrnForm,
    GrnList,
}

/// Shell-owned navigation seam.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate_to(&self, target: NavTarget);
}

/// Navigator that records intent to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

#[async_trait]
impl Navigator for TracingNavigator {
    async fn navigate_to(&self, target: NavTarget) {
        info!(%target, "navigate");
    }
}
