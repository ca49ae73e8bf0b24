use std::fmt;

use serde::{Deserialize, Serialize};

/// Video resolution tier.
///
/// Variants are declared best first, so the derived `Ord` sorts the most
/// desirable resolution to the front.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Resolution {
    /// 2160p, Ultra HD / 4K
    #[serde(rename = "2160p")]
    Uhd2160,
    /// 1080p, Full HD
    #[serde(rename = "1080p")]
    Fhd1080,
    /// 720p, HD
    #[serde(rename = "720p")]
    Hd720,
    /// 480p, Standard Definition
    #[serde(rename = "480p")]
    Sd480,
    /// No resolution tag found.
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uhd2160 => write!(f, "2160p"),
            Self::Fhd1080 => write!(f, "1080p"),
            Self::Hd720 => write!(f, "720p"),
            Self::Sd480 => write!(f, "480p"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// HDR format tier, best first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HdrFormat {
    DolbyVision,
    Hdr10Plus,
    Hdr10,
    Hdr,
    #[default]
    None,
}

impl HdrFormat {
    /// Returns `true` for any HDR variant.
    #[must_use]
    pub fn is_hdr(self) -> bool {
        self != Self::None
    }
}

impl fmt::Display for HdrFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DolbyVision => write!(f, "Dolby Vision"),
            Self::Hdr10Plus => write!(f, "HDR10+"),
            Self::Hdr10 => write!(f, "HDR10"),
            Self::Hdr => write!(f, "HDR"),
            Self::None => write!(f, "SDR"),
        }
    }
}

/// Audio quality tier, best first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AudioTier {
    Atmos,
    TrueHd,
    DtsHd,
    Ddp71,
    Dd71,
    Ddp51,
    Dd51,
    Aac,
    Ac3,
    #[default]
    Unknown,
}

impl AudioTier {
    /// The best tier a release can carry.
    pub const TOP: Self = Self::Atmos;
}

impl fmt::Display for AudioTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atmos => write!(f, "Atmos"),
            Self::TrueHd => write!(f, "TrueHD"),
            Self::DtsHd => write!(f, "DTS-HD"),
            Self::Ddp71 => write!(f, "DDP7.1"),
            Self::Dd71 => write!(f, "DD7.1"),
            Self::Ddp51 => write!(f, "DDP5.1"),
            Self::Dd51 => write!(f, "DD5.1"),
            Self::Aac => write!(f, "AAC"),
            Self::Ac3 => write!(f, "AC3"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Video codec tag, in preference order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    H265,
    Hevc,
    X265,
    H264,
    X264,
    #[default]
    Unknown,
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::H265 => write!(f, "H.265"),
            Self::Hevc => write!(f, "HEVC"),
            Self::X265 => write!(f, "x265"),
            Self::H264 => write!(f, "H.264"),
            Self::X264 => write!(f, "x264"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
