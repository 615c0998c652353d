use tracing::warn;
use uuid::Uuid;

use crate::error::MetadataError;
use crate::metadata::record::{
    ClientMedium, CustomField, IsLive, LIVE_STREAM_LENGTH_SECONDS, NielsenMetadata,
    PartialMetadata, TRIM_ORDER,
};
use crate::metadata::wire::{MAX_PAYLOAD_BYTES, payload_size};
use crate::player::{Ad, PlayerApi};

const UNTITLED_AD: &str = "Untitled Ad";
const UNKNOWN_AD_PROGRAM: &str = "Unknown Program";

/// Characters the vendor protocol uses as delimiters inside custom values.
pub const RESERVED_DELIMITERS: [char; 2] = ['|', '~'];

/// Converts a player duration to whole seconds.
///
/// Non-finite durations (live or unknown) map to the live length.
pub fn length_from_duration(duration: f64) -> u64 {
    if !duration.is_finite() {
        return LIVE_STREAM_LENGTH_SECONDS;
    }
    duration.max(0.0) as u64
}

/// Fluent accumulator for one metadata record.
///
/// Values passed to [`NielsenMetadataBuilder::new`] win over values derived
/// from the player or an ad; the explicit `with_*` setters always overwrite.
#[derive(Debug, Clone, Default)]
pub struct NielsenMetadataBuilder {
    metadata: PartialMetadata,
}

impl NielsenMetadataBuilder {
    pub fn new(defaults: PartialMetadata) -> Self {
        Self { metadata: defaults }
    }

    pub fn with_content(mut self, player: &dyn PlayerApi) -> Self {
        let source = player.source().unwrap_or_default();
        let title = non_empty(source.title);
        let metadata = &mut self.metadata;
        metadata.kind = Some("content".to_string());

        if is_unset(&metadata.title) && title.is_some() {
            metadata.title = title.clone();
        }
        if is_unset(&metadata.program) {
            if let Some(locator) = non_empty(source.dash).or_else(|| non_empty(source.hls)) {
                metadata.program = Some(locator);
            } else if title.is_some() {
                metadata.program = metadata.title.clone();
            }
        }

        let live = player.is_live();
        metadata.length = Some(if live {
            LIVE_STREAM_LENGTH_SECONDS
        } else {
            length_from_duration(player.duration())
        });
        metadata.islive = Some(IsLive::from_live(live));
        self
    }

    pub fn with_ad(mut self, ad: &Ad) -> Self {
        let metadata = &mut self.metadata;
        metadata.kind = Some("ad".to_string());
        metadata.asset_id = Some(
            ad.id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        );
        if let Some(duration) = ad.duration.filter(|d| *d != 0.0 && !d.is_nan()) {
            metadata.length = Some(length_from_duration(duration));
        }

        let data = ad.data.clone().unwrap_or_default();
        metadata.title = data
            .ad_title
            .or_else(|| ad.media_file_url.clone())
            .or_else(|| Some(UNTITLED_AD.to_string()));
        metadata.program = data
            .ad_description
            .or_else(|| ad.media_file_url.clone())
            .or_else(|| Some(UNKNOWN_AD_PROGRAM.to_string()));
        metadata.islive = Some(IsLive::No);
        self
    }

    pub fn with_asset_id(mut self, asset_id: impl Into<String>) -> Self {
        self.metadata.asset_id = Some(asset_id.into());
        self
    }

    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.metadata.kind = Some(kind.into());
        self
    }

    pub fn with_is_live(mut self, islive: IsLive) -> Self {
        self.metadata.islive = Some(islive);
        self
    }

    pub fn with_length(mut self, length: u64) -> Self {
        self.metadata.length = Some(length);
        self
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.metadata.program = Some(program.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    pub fn with_cli_md(mut self, cli_md: ClientMedium) -> Self {
        self.metadata.cli_md = Some(cli_md);
        self
    }

    pub fn with_cli_ch(mut self, cli_ch: impl Into<String>) -> Self {
        self.metadata.cli_ch = Some(cli_ch.into());
        self
    }

    /// Sets a custom slot unless the value contains a reserved delimiter,
    /// in which case the value is dropped with a warning.
    pub fn with_custom_field(mut self, field: CustomField, value: impl Into<String>) -> Self {
        let value = value.into();
        if value.contains(RESERVED_DELIMITERS) {
            warn!(
                field = field.key(),
                "custom field contains reserved delimiter characters, skipping"
            );
            return self;
        }
        self.metadata.custom.insert(field, value);
        self
    }

    pub fn build(self) -> Result<NielsenMetadata, MetadataError> {
        let PartialMetadata {
            kind,
            asset_id,
            program,
            title,
            length,
            islive,
            subbrand,
            cli_md,
            cli_ch,
            custom,
        } = self.metadata;

        let record = NielsenMetadata {
            kind: required(kind, "type")?,
            asset_id: required(asset_id, "assetId")?,
            program: required(program, "program")?,
            title: required(title, "title")?,
            length: required(length, "length")?,
            islive: required(islive, "islive")?,
            subbrand: required(subbrand, "subbrand")?,
            cli_md,
            cli_ch,
            custom,
        };
        fit_payload(record)
    }
}

fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, MetadataError> {
    value.ok_or(MetadataError::MissingField { field })
}

/// Drops optional fields in [`TRIM_ORDER`] until the record fits.
fn fit_payload(mut record: NielsenMetadata) -> Result<NielsenMetadata, MetadataError> {
    if payload_size(&record) <= MAX_PAYLOAD_BYTES {
        return Ok(record);
    }
    for field in TRIM_ORDER {
        if !record.has_optional(field) {
            continue;
        }
        record.remove_optional(field);
        if payload_size(&record) <= MAX_PAYLOAD_BYTES {
            return Ok(record);
        }
    }
    Err(MetadataError::SizeExceeded {
        limit: MAX_PAYLOAD_BYTES,
    })
}
