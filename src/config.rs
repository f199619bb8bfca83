//! Fixed endpoints and controlled vocabularies for the PATS API.
//!
//! The buy-category and served-by lists are upstream contract facts: PATS
//! rejects values outside them, so the SDK validates at construction time
//! instead of burning a request attempt.

use crate::models::line_item::{MediaKind, PackageType};

/// Demo agency-side (buyer) API endpoint.
pub const AGENCY_API_BASE: &str = "https://prisma-demo.api.mediaocean.com";

/// Demo publisher-side (seller) API endpoint.
pub const PUBLISHER_API_BASE: &str = "https://demo-publishers.api.mediaocean.com";

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("PATS Rust SDK/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key (lowercase, as it goes on the wire).
pub const API_KEY_HEADER: &str = "x-mo-api-key";

pub const MEDIA_SUBTYPES_PRINT: &[&str] =
    &["DISPLAY_PRINT", "CLASSIFIED", "INSERTS", "PRINT_CUSTOM"];

pub const MEDIA_SUBTYPES_DIGITAL: &[&str] =
    &["DISPLAY_DIGITAL", "VIDEO", "MOBILE", "TABLET", "APP"];

/// The sub-media-type vocabulary for a media kind.
pub fn media_subtypes(media: MediaKind) -> &'static [&'static str] {
    match media {
        MediaKind::Print => MEDIA_SUBTYPES_PRINT,
        MediaKind::Digital => MEDIA_SUBTYPES_DIGITAL,
    }
}

/// Product catalogue categories accepted by the vendor.
pub const PRODUCT_CATEGORIES: &[&str] = &[
    "ARTS_AND_ENTERTAINMENT",
    "AUTOMOTIVE",
    "BUSINESS",
    "CAREERS",
    "EDUCATION",
    "FAMILY_AND_PARENTING",
    "HEALTH_AND_FITNESS",
    "FOOD_AND_DRINK",
    "HOBBIES_AND_INTERESTS",
    "HOME_AND_GARDEN",
    "LAW_GOVERNMENT_AND_POLITICS",
    "NEWS",
    "PERSONAL_FINANCE",
    "SOCIETY",
    "SCIENCE",
    "PETS",
    "SPORTS",
    "STYLE_AND_FASHION",
    "TECHNOLOGY_AND_COMPUTING",
    "TRAVEL",
    "REAL_ESTATE",
    "SHOPPING",
    "RELIGION_AND_SPIRITUALITY",
    "SOCIAL_MEDIA",
];

/// Accepted `servedBy` values on digital line items.
pub const SERVED_BY: &[&str] = &["1st party", "3rd party"];

const BUY_CATEGORIES_PRINT: &[&str] = &[
    "Display",
    "Classified",
    "Insert",
    "Advertorial",
    "Guaranteed Position",
    "Custom",
];

const BUY_CATEGORIES_DIGITAL: &[&str] = &[
    "Standard",
    "Rich Media",
    "Mobile",
    "Tablet",
    "Video",
    "Sponsorship",
    "Takeover",
    "Custom",
];

// Children inherit the package's positioning, so the premium placement
// categories are not valid on them.
const BUY_CATEGORIES_DIGITAL_CHILD: &[&str] =
    &["Standard", "Rich Media", "Mobile", "Tablet", "Video", "Custom"];

/// The buy categories accepted for a line, keyed by media kind and package
/// role. Returns `None` for Package and Roadblock headers, which carry no
/// commercial terms of their own.
pub fn buy_categories(media: MediaKind, package: PackageType) -> Option<&'static [&'static str]> {
    match package {
        PackageType::Package | PackageType::Roadblock => None,
        PackageType::Standalone => Some(match media {
            MediaKind::Print => BUY_CATEGORIES_PRINT,
            MediaKind::Digital => BUY_CATEGORIES_DIGITAL,
        }),
        PackageType::Child => Some(match media {
            MediaKind::Print => BUY_CATEGORIES_PRINT,
            MediaKind::Digital => BUY_CATEGORIES_DIGITAL_CHILD,
        }),
    }
}
