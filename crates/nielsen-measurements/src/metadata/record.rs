use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Length reported for live or otherwise unbounded streams.
pub const LIVE_STREAM_LENGTH_SECONDS: u64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IsLive {
    #[serde(rename = "y")]
    Yes,
    #[serde(rename = "n")]
    No,
}

impl IsLive {
    pub fn from_live(live: bool) -> Self {
        if live {
            Self::Yes
        } else {
            Self::No
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "y",
            Self::No => "n",
        }
    }
}

/// Distribution classifier (`cli_md`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClientMedium {
    Live,
    Timeshifting,
    Tvod,
    Vod,
    Svod,
    Aod,
}

impl ClientMedium {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "LIVE",
            Self::Timeshifting => "TIMESHIFTING",
            Self::Tvod => "TVOD",
            Self::Vod => "VOD",
            Self::Svod => "SVOD",
            Self::Aod => "AOD",
        }
    }
}

/// Free-form custom slots `nol_p0` through `nol_p19`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CustomField {
    #[serde(rename = "nol_p0")]
    P0,
    #[serde(rename = "nol_p1")]
    P1,
    #[serde(rename = "nol_p2")]
    P2,
    #[serde(rename = "nol_p3")]
    P3,
    #[serde(rename = "nol_p4")]
    P4,
    #[serde(rename = "nol_p5")]
    P5,
    #[serde(rename = "nol_p6")]
    P6,
    #[serde(rename = "nol_p7")]
    P7,
    #[serde(rename = "nol_p8")]
    P8,
    #[serde(rename = "nol_p9")]
    P9,
    #[serde(rename = "nol_p10")]
    P10,
    #[serde(rename = "nol_p11")]
    P11,
    #[serde(rename = "nol_p12")]
    P12,
    #[serde(rename = "nol_p13")]
    P13,
    #[serde(rename = "nol_p14")]
    P14,
    #[serde(rename = "nol_p15")]
    P15,
    #[serde(rename = "nol_p16")]
    P16,
    #[serde(rename = "nol_p17")]
    P17,
    #[serde(rename = "nol_p18")]
    P18,
    #[serde(rename = "nol_p19")]
    P19,
}

impl CustomField {
    pub const ALL: [CustomField; 20] = [
        CustomField::P0,
        CustomField::P1,
        CustomField::P2,
        CustomField::P3,
        CustomField::P4,
        CustomField::P5,
        CustomField::P6,
        CustomField::P7,
        CustomField::P8,
        CustomField::P9,
        CustomField::P10,
        CustomField::P11,
        CustomField::P12,
        CustomField::P13,
        CustomField::P14,
        CustomField::P15,
        CustomField::P16,
        CustomField::P17,
        CustomField::P18,
        CustomField::P19,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CustomField::P0 => "nol_p0",
            CustomField::P1 => "nol_p1",
            CustomField::P2 => "nol_p2",
            CustomField::P3 => "nol_p3",
            CustomField::P4 => "nol_p4",
            CustomField::P5 => "nol_p5",
            CustomField::P6 => "nol_p6",
            CustomField::P7 => "nol_p7",
            CustomField::P8 => "nol_p8",
            CustomField::P9 => "nol_p9",
            CustomField::P10 => "nol_p10",
            CustomField::P11 => "nol_p11",
            CustomField::P12 => "nol_p12",
            CustomField::P13 => "nol_p13",
            CustomField::P14 => "nol_p14",
            CustomField::P15 => "nol_p15",
            CustomField::P16 => "nol_p16",
            CustomField::P17 => "nol_p17",
            CustomField::P18 => "nol_p18",
            CustomField::P19 => "nol_p19",
        }
    }
}

/// Fields that may be dropped to satisfy the payload ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalField {
    Custom(CustomField),
    ClientChannel,
    ClientMedium,
}

impl OptionalField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Custom(field) => field.key(),
            Self::ClientChannel => "cli_ch",
            Self::ClientMedium => "cli_md",
        }
    }
}

/// Drop order when trimming, least important first.
pub const TRIM_ORDER: [OptionalField; 22] = [
    OptionalField::Custom(CustomField::P19),
    OptionalField::Custom(CustomField::P18),
    OptionalField::Custom(CustomField::P17),
    OptionalField::Custom(CustomField::P16),
    OptionalField::Custom(CustomField::P15),
    OptionalField::Custom(CustomField::P14),
    OptionalField::Custom(CustomField::P13),
    OptionalField::Custom(CustomField::P12),
    OptionalField::Custom(CustomField::P11),
    OptionalField::Custom(CustomField::P10),
    OptionalField::Custom(CustomField::P9),
    OptionalField::Custom(CustomField::P8),
    OptionalField::Custom(CustomField::P7),
    OptionalField::Custom(CustomField::P6),
    OptionalField::Custom(CustomField::P5),
    OptionalField::Custom(CustomField::P4),
    OptionalField::Custom(CustomField::P3),
    OptionalField::Custom(CustomField::P2),
    OptionalField::Custom(CustomField::P1),
    OptionalField::Custom(CustomField::P0),
    OptionalField::ClientChannel,
    OptionalField::ClientMedium,
];

/// A complete, validated metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NielsenMetadata {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "assetId")]
    pub asset_id: String,
    pub program: String,
    pub title: String,
    pub length: u64,
    pub islive: IsLive,
    pub subbrand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cli_md: Option<ClientMedium>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cli_ch: Option<String>,
    #[serde(flatten)]
    pub custom: BTreeMap<CustomField, String>,
}

impl NielsenMetadata {
    pub fn custom_field(&self, field: CustomField) -> Option<&str> {
        self.custom.get(&field).map(String::as_str)
    }

    pub fn has_optional(&self, field: OptionalField) -> bool {
        match field {
            OptionalField::Custom(field) => self.custom.contains_key(&field),
            OptionalField::ClientChannel => self.cli_ch.is_some(),
            OptionalField::ClientMedium => self.cli_md.is_some(),
        }
    }

    pub fn remove_optional(&mut self, field: OptionalField) {
        match field {
            OptionalField::Custom(field) => {
                self.custom.remove(&field);
            },
            OptionalField::ClientChannel => self.cli_ch = None,
            OptionalField::ClientMedium => self.cli_md = None,
        }
    }

    /// Wire key/value pairs of every present field, sorted by key.
    pub fn wire_fields(&self) -> BTreeMap<&'static str, String> {
        let mut fields = BTreeMap::new();
        fields.insert("type", self.kind.clone());
        fields.insert("assetId", self.asset_id.clone());
        fields.insert("program", self.program.clone());
        fields.insert("title", self.title.clone());
        fields.insert("length", self.length.to_string());
        fields.insert("islive", self.islive.as_str().to_string());
        fields.insert("subbrand", self.subbrand.clone());
        if let Some(cli_md) = self.cli_md {
            fields.insert("cli_md", cli_md.as_str().to_string());
        }
        if let Some(cli_ch) = &self.cli_ch {
            fields.insert("cli_ch", cli_ch.clone());
        }
        for (field, value) in &self.custom {
            fields.insert(field.key(), value.clone());
        }
        fields
    }
}

/// Metadata supplied by the integrator when attaching a player.
///
/// `program` and `title` are required on the wire but may be left out here;
/// the builder derives them from the player source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentMetadata {
    #[serde(rename = "assetId")]
    pub asset_id: String,
    pub subbrand: String,
    pub program: Option<String>,
    pub title: Option<String>,
    pub cli_md: Option<ClientMedium>,
    pub cli_ch: Option<String>,
    #[serde(flatten)]
    pub custom: BTreeMap<CustomField, String>,
}

/// A record under construction; every field may still be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialMetadata {
    pub kind: Option<String>,
    pub asset_id: Option<String>,
    pub program: Option<String>,
    pub title: Option<String>,
    pub length: Option<u64>,
    pub islive: Option<IsLive>,
    pub subbrand: Option<String>,
    pub cli_md: Option<ClientMedium>,
    pub cli_ch: Option<String>,
    pub custom: BTreeMap<CustomField, String>,
}

impl PartialMetadata {
    /// Seeds a record of the given kind from integrator supplied metadata.
    pub fn seeded(kind: &str, content: Option<&ContentMetadata>) -> Self {
        let mut partial = content.cloned().map(Self::from).unwrap_or_default();
        partial.kind = Some(kind.to_string());
        partial
    }
}

impl From<ContentMetadata> for PartialMetadata {
    fn from(content: ContentMetadata) -> Self {
        Self {
            asset_id: Some(content.asset_id),
            subbrand: Some(content.subbrand),
            program: content.program,
            title: content.title,
            cli_md: content.cli_md,
            cli_ch: content.cli_ch,
            custom: content.custom,
            ..Self::default()
        }
    }
}

impl From<NielsenMetadata> for PartialMetadata {
    fn from(record: NielsenMetadata) -> Self {
        Self {
            kind: Some(record.kind),
            asset_id: Some(record.asset_id),
            program: Some(record.program),
            title: Some(record.title),
            length: Some(record.length),
            islive: Some(record.islive),
            subbrand: Some(record.subbrand),
            cli_md: record.cli_md,
            cli_ch: record.cli_ch,
            custom: record.custom,
        }
    }
}
