//! The `GuideGenerator` trait, producing care text for a plant type.

use std::future::Future;

/// Label of the fact whose value names the plant's type. Generation is only
/// possible once a plant carries such a fact.
pub const PLANT_TYPE_LABEL: &str = "Plant Type";

/// Label given to generated facts when the caller does not supply one.
pub const DEFAULT_GUIDE_LABEL: &str = "Care Guidelines";

/// A source of generated care guidelines.
///
/// One call is one attempt: implementations neither retry nor cache.
pub trait GuideGenerator: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Produce plain-text care guidelines for `plant_type`. The returned text
  /// is already trimmed and never empty.
  fn care_guidelines<'a>(
    &'a self,
    plant_type: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}
