use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::PageView;
use crate::core::Performance;

#[allow(clippy::expect_used)]
static RUNTIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Runtime\s*\n*\s*(\d+(?:\.\d+)?)\s*(ms|s)").expect("valid regex")
});

#[allow(clippy::expect_used)]
static RUNTIME_PERCENTILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Runtime.*?Beats\s+(\d+(?:\.\d+)?)\s*%").expect("valid regex")
});

#[allow(clippy::expect_used)]
static MEMORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Memory\s*\n*\s*(\d+(?:\.\d+)?)\s*(MB|KB|GB)").expect("valid regex")
});

#[allow(clippy::expect_used)]
static MEMORY_PERCENTILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Memory.*?Beats\s+(\d+(?:\.\d+)?)\s*%").expect("valid regex")
});

fn amount(re: &Regex, text: &str) -> Option<String> {
    let caps = re.captures(text)?;
    Some(format!("{} {}", caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

fn percentile(re: &Regex, text: &str) -> Option<String> {
    let caps = re.captures(text)?;
    Some(format!("{}%", caps.get(1)?.as_str()))
}

/// Runtime, memory and their "Beats N%" percentiles; each independently `None` on a miss.
#[must_use]
pub fn extract_performance(view: &PageView<'_>) -> Performance {
    let text = view.text();
    let perf = Performance {
        runtime: amount(&RUNTIME, text),
        memory: amount(&MEMORY, text),
        runtime_percentile: percentile(&RUNTIME_PERCENTILE, text),
        memory_percentile: percentile(&MEMORY_PERCENTILE, text),
    };
    debug!(?perf, "performance extracted");
    perf
}
