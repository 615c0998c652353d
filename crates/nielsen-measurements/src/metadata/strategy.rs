use crate::metadata::builder::{NielsenMetadataBuilder, length_from_duration};
use crate::metadata::record::{ContentMetadata, NielsenMetadata, PartialMetadata};
use crate::player::{Ad, PlayerApi};

/// Integrator hook replacing the default metadata construction.
///
/// Both methods are optional: returning `None` falls back to
/// [`NielsenMetadataBuilder`]. A returned record is dispatched as is.
pub trait MetadataStrategy: Send + Sync {
    fn build_content_metadata(
        &self,
        _player: &dyn PlayerApi,
    ) -> Option<anyhow::Result<NielsenMetadata>> {
        None
    }

    fn build_ad_metadata(
        &self,
        _ad: &Ad,
        _player: &dyn PlayerApi,
    ) -> Option<anyhow::Result<NielsenMetadata>> {
        None
    }
}

pub(crate) fn content_metadata(
    strategy: Option<&dyn MetadataStrategy>,
    content: Option<&ContentMetadata>,
    player: &dyn PlayerApi,
) -> anyhow::Result<NielsenMetadata> {
    if let Some(custom) = strategy.and_then(|s| s.build_content_metadata(player)) {
        return custom;
    }
    let record = NielsenMetadataBuilder::new(PartialMetadata::seeded("content", content))
        .with_content(player)
        .build()?;
    Ok(record)
}

pub(crate) fn ad_metadata(
    strategy: Option<&dyn MetadataStrategy>,
    content: Option<&ContentMetadata>,
    ad: &Ad,
    player: &dyn PlayerApi,
) -> anyhow::Result<NielsenMetadata> {
    if let Some(custom) = strategy.and_then(|s| s.build_ad_metadata(ad, player)) {
        return custom;
    }
    let record = NielsenMetadataBuilder::new(PartialMetadata::seeded("ad", content))
        .with_length(length_from_duration(player.duration()))
        .with_ad(ad)
        .build()?;
    Ok(record)
}
